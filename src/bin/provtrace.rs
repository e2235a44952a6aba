use provenance_trace::app::DashboardApp;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    DashboardApp::run()
        .await
        .inspect_err(|err| eprintln!("Application errored out: {err:#}"))
}
