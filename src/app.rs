use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::bail;
use clap::error::ErrorKind;
use clap::CommandFactory;
use clap::Parser;
use comfy_table::Table;
use console::Style;
use fieldx::fxstruct;
use garde::Validate;

use crate::geocode::FallbackGeocoder;
use crate::geocode::OfflineGeocoder;
use crate::route::MapView;
use crate::route::Projection;
use crate::route::RouteProjector;
use crate::seed;
use crate::shipment::ShipmentRequest;
use crate::store::ProvenanceStore;
use crate::traits::Wallet;
use crate::types::abbreviate;
use crate::verification::Verdict;
use crate::wallet::StaticWallet;
use crate::wallet::UnavailableWallet;
use crate::wallet::WalletStatus;

pub const DEFAULT_CONTRACT_ADDRESS: &str = "0x4A5dFFb678c123456789C01234567890B";

#[derive(Debug, Clone, clap::Parser, Validate)]
#[fxstruct(no_new, get)]
#[clap(about, version, author, name = "provtrace")]
struct Cli {
    /// JSON file with initial product records. The built-in mock ledger is used if omitted.
    #[clap(long, env = "PROVTRACE_SEED")]
    #[garde(skip)]
    seed: Option<PathBuf>,

    /// How long a shipment waits for its confirmation, in milliseconds.
    #[clap(long, env = "PROVTRACE_CONFIRMATION_DELAY_MS", default_value_t = 2_000)]
    #[fieldx(get(copy))]
    #[garde(range(max = 60_000))]
    confirmation_delay_ms: u64,

    /// Wallet account to connect with. No wallet is available without it.
    #[clap(long, env = "PROVTRACE_ACCOUNT")]
    #[garde(skip)]
    account: Option<String>,

    /// Address of the ledger contract.
    #[clap(long, env = "PROVTRACE_CONTRACT", default_value = DEFAULT_CONTRACT_ADDRESS)]
    #[garde(length(min = 10))]
    contract: String,

    /// Don't initialize logging.
    #[clap(long, short)]
    #[fieldx(get(copy))]
    #[garde(skip)]
    quiet: bool,

    #[clap(subcommand)]
    #[garde(skip)]
    command: Command,
}

#[derive(Debug, Clone, clap::Subcommand)]
enum Command {
    /// List traceable product IDs.
    List,
    /// Check product authenticity and show its timeline.
    Verify { product_id: String },
    /// Show the journey of a product.
    Trace { product_id: String },
    /// Mark a product as delivered.
    Ship {
        product_id:        String,
        #[clap(long)]
        recipient:         String,
        /// Recipient's wallet address.
        #[clap(long)]
        address:           String,
        #[clap(long)]
        location:          String,
    },
    /// Suggest a place name for a partial input.
    Suggest { query: String },
}

#[derive(Debug, Default)]
pub struct DashboardApp {
    cli_args: Option<Vec<String>>,
}

impl DashboardApp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the given arguments instead of the process command line. The first one is the program name.
    pub fn with_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cli_args: Some(args.into_iter().map(Into::into).collect()),
        }
    }

    fn parse_cli(&self) -> Result<Cli, clap::Error> {
        match self.cli_args {
            Some(ref args) => Cli::try_parse_from(args),
            None => Cli::try_parse(),
        }
    }

    fn validate(cli: &Cli) -> Result<(), clap::Error> {
        cli.validate()
            .map_err(|report| <Cli as CommandFactory>::command().error(ErrorKind::InvalidValue, report))
    }

    fn setup_tracing() -> anyhow::Result<()> {
        use tracing::info;
        use tracing_subscriber::layer::SubscriberExt;
        use tracing_subscriber::util::SubscriberInitExt;

        let filter = tracing_subscriber::EnvFilter::from_default_env();

        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()?;

        info!("Tracing initialized");

        Ok(())
    }

    fn build_store(cli: &Cli) -> anyhow::Result<Arc<ProvenanceStore>> {
        let builder = ProvenanceStore::builder()
            .name("dashboard".to_string())
            .confirmation_delay(Duration::from_millis(cli.confirmation_delay_ms()));
        let mut builder = match cli.seed() {
            Some(path) => builder.seed(seed::load_records(path)?),
            None => builder,
        };
        Ok(builder.build()?)
    }

    /// Parse arguments and run the command. Parsing errors, including requests for help, are returned as errors.
    pub async fn execute(&self) -> anyhow::Result<()> {
        let cli = self.parse_cli()?;
        Self::validate(&cli)?;
        self.execute_cli(cli).await
    }

    async fn execute_cli(&self, cli: Cli) -> anyhow::Result<()> {
        if !cli.quiet() {
            Self::setup_tracing()?;
        }

        let store = Self::build_store(&cli)?;
        let projector = RouteProjector::new();

        match cli.command() {
            Command::List => Self::list(&store),
            Command::Verify { product_id } => Self::verify(&cli, &store, product_id.trim()),
            Command::Trace { product_id } => Self::trace(&store, &projector, product_id.trim()),
            Command::Ship {
                product_id,
                recipient,
                address,
                location,
            } => {
                let request = ShipmentRequest::new(
                    product_id.as_str(),
                    recipient.as_str(),
                    address.as_str(),
                    location.as_str(),
                );
                Self::ship(&cli, &store, &projector, request).await?;
            }
            Command::Suggest { query } => {
                let suggestion = FallbackGeocoder::new(OfflineGeocoder).suggestion(query).await;
                println!("{suggestion}");
            }
        }

        store.close().await;
        Ok(())
    }

    fn list(store: &ProvenanceStore) {
        let ids = store.product_ids();
        if ids.is_empty() {
            println!("{}", Style::new().red().apply_to("No traceable products found in the log data."));
            return;
        }
        println!(
            "{}",
            Style::new()
                .green()
                .apply_to(format!("{} traceable products loaded.", ids.len()))
        );
        for id in ids {
            println!("  {id}");
        }
    }

    fn verify(cli: &Cli, store: &ProvenanceStore, product_id: &str) {
        println!("Contract: {}", abbreviate(cli.contract(), 10));

        let report = store.verify(product_id);
        let style = match report.verdict {
            Verdict::Authentic { returned: false, .. } => Style::new().green(),
            Verdict::Authentic { returned: true, .. } => Style::new().yellow(),
            Verdict::Counterfeit => Style::new().red(),
        };
        println!("{}", style.apply_to(&report.verdict));

        let Some(details) = report.details
        else {
            println!("No verifiable history exists for this ID.");
            return;
        };

        println!("Recipient: {}", details.recipient_or_na());
        println!("Owner:     {}", details.owner_address_or_na());
        println!("Tx Hash:   {}", details.tx_hash);
        println!("QR Code:   {}", details.qr_image_url);
        println!();

        if report.timeline.is_empty() {
            println!("No traceable events.");
        }
        for entry in report.timeline {
            println!(
                "[{:^7}] {}  {}\n          Location: {}",
                entry.icon, entry.event.timestamp, entry.event.action, entry.event.location
            );
        }
    }

    fn trace(store: &ProvenanceStore, projector: &RouteProjector, product_id: &str) {
        let route = match projector.project(&store.get_history(product_id)) {
            Projection::Route(route) => route,
            insufficient @ Projection::InsufficientData { .. } => {
                println!("{}", Style::new().red().apply_to(&insufficient));
                println!("Product {product_id} requires more than one event to trace a journey.");
                return;
            }
        };

        println!("{}", route.title());
        let mut table = Table::new();
        table.set_header(vec!["#", "Action", "Location", "Coordinates", "Stop"]);
        for stop in &route.stops {
            table.add_row(vec![
                stop.index.to_string(),
                stop.label.clone(),
                stop.location.clone(),
                stop.coordinate.map_or_else(|| "unresolved".to_string(), |c| c.to_string()),
                stop.role.to_string(),
            ]);
        }
        println!("{table}");

        for (idx, line) in route.summary_lines.iter().enumerate() {
            println!("{:>3}. {line}", idx + 1);
        }

        match route.view {
            MapView::FitBounds { bounds, padding } => println!(
                "Map: fit to [{}] - [{}], padding {}x{}",
                bounds.south_west, bounds.north_east, padding.0, padding.1
            ),
            MapView::World { center, zoom } => println!("Map: world view at [{center}], zoom {zoom}"),
        }
        println!("{}", Style::new().green().apply_to(route.headline()));
    }

    async fn ship(
        cli: &Cli,
        store: &ProvenanceStore,
        projector: &RouteProjector,
        request: ShipmentRequest,
    ) -> anyhow::Result<()> {
        let wallet: Box<dyn Wallet> = match cli.account() {
            Some(account) => Box::new(StaticWallet::new(account.clone())),
            None => Box::new(UnavailableWallet),
        };
        let status = WalletStatus::connect(wallet.as_ref()).await;
        println!("Wallet: {status}");
        if !status.is_connected() {
            bail!("Please connect your wallet first.");
        }

        let ticket = store.submit_shipment(&request)?;
        println!(
            "{}",
            Style::new()
                .yellow()
                .apply_to("Submitting transaction to testnet (check wallet)...")
        );

        let receipt = ticket.confirmed().await?;
        println!("{}", Style::new().green().apply_to("SUCCESS: Product Marked Delivered!"));
        println!("Tx Hash: {}", receipt.short_hash());
        println!(
            "Transaction completed! Use ID {} to verify in the Verification tab.",
            receipt.product_id
        );
        println!();

        Self::trace(store, projector, &receipt.product_id);
        Ok(())
    }

    pub async fn run() -> anyhow::Result<()> {
        let app = Self::new();
        let cli = app
            .parse_cli()
            .and_then(|cli| Self::validate(&cli).map(|_| cli))
            .unwrap_or_else(|err| err.exit());

        app.execute_cli(cli).await
    }
}
