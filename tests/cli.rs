#![cfg(feature = "cli")]

use std::io::Write;

use provenance_trace::app::DashboardApp;
use provenance_trace::seed::mock_records;

#[tokio::test]
async fn verify_and_trace() -> Result<(), Box<dyn std::error::Error>> {
    for command in [
        vec!["provtrace", "--quiet", "list"],
        vec!["provtrace", "--quiet", "verify", "P20251025202605"],
        vec!["provtrace", "--quiet", "verify", "P00000000000000"],
        vec!["provtrace", "--quiet", "trace", "P20251026093114"],
        vec!["provtrace", "--quiet", "trace", "P20251027120000"],
        vec!["provtrace", "--quiet", "suggest", "new y"],
    ] {
        let app = DashboardApp::with_args(command.clone());
        assert!(app.execute().await.is_ok(), "Command failed: {command:?}");
    }

    Ok(())
}

#[tokio::test]
async fn ship_requires_wallet() {
    let app = DashboardApp::with_args([
        "provtrace",
        "--quiet",
        "ship",
        "P20251101080000",
        "--recipient=Akash",
        "--address=0x9fA3",
        "--location=Mumbai",
    ]);
    let err = app.execute().await.unwrap_err();
    assert_eq!(err.to_string(), "Please connect your wallet first.");
}

#[tokio::test]
async fn ship_with_wallet() {
    let app = DashboardApp::with_args([
        "provtrace",
        "--quiet",
        "--account=0x9fA3c0ffee",
        "--confirmation-delay-ms=0",
        "ship",
        "P20251101080000",
        "--recipient=Akash",
        "--address=0x9fA3",
        "--location=Mumbai",
    ]);
    assert!(app.execute().await.is_ok());
}

#[tokio::test]
async fn missing_seed_file_is_an_error() {
    let app = DashboardApp::with_args(["provtrace", "--quiet", "--seed=/nonexistent/seed.json", "list"]);
    assert!(app.execute().await.is_err());
}

#[tokio::test]
async fn seed_file_replaces_built_in_ledger() -> Result<(), Box<dyn std::error::Error>> {
    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(serde_json::to_string(&mock_records())?.as_bytes())?;
    file.flush()?;

    let seed_arg = format!("--seed={}", file.path().display());
    for command in [
        vec!["provtrace", "--quiet", seed_arg.as_str(), "list"],
        vec!["provtrace", "--quiet", seed_arg.as_str(), "trace", "P20251025202605"],
    ] {
        let app = DashboardApp::with_args(command.clone());
        assert!(app.execute().await.is_ok(), "Command failed: {command:?}");
    }

    Ok(())
}
