use clap::Parser;
use miette::{IntoDiagnostic, Result};
use serde_json::json;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use walletpay::application::client::WalletPayClient;
use walletpay::config::WalletConfig;
use walletpay::domain::ports::TelemetryHandle;
use walletpay::domain::sheet::{AmountControl, Sheet};
use walletpay::infrastructure::telemetry::TracingTelemetry;
use walletpay::interfaces::csv::line_item_reader::LineItemReader;
use walletpay::interfaces::scenario::Scenario;
use walletpay::observability::{LogFormat, init_observability};

const AMOUNT_CONTROL_ID: &str = "amountID";

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Scripted wallet session (JSON)
    scenario: PathBuf,

    /// Wallet configuration (TOML)
    #[arg(long)]
    config: PathBuf,

    /// Sheet line items CSV (id, label, amount, pending, display_text)
    #[arg(long)]
    sheet: Option<PathBuf>,

    #[arg(long, default_value = "USD")]
    currency: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_observability(LogFormat::from_env());
    let cli = Cli::parse();

    let config = WalletConfig::load(&cli.config).into_diagnostic()?;
    let mut scenario = Scenario::load(&cli.scenario).into_diagnostic()?;

    let telemetry: TelemetryHandle = Arc::new(TracingTelemetry);
    let client = WalletPayClient::new(scenario.capability(), config, telemetry);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let availability = client.check_availability().await;
    writeln!(out, "{}", json!({ "availability": &availability })).into_diagnostic()?;
    if !availability.is_ready() {
        info!("wallet not ready, skipping payment");
        return Ok(());
    }

    let amount = match &cli.sheet {
        Some(path) => {
            let file = File::open(path).into_diagnostic()?;
            LineItemReader::new(file)
                .into_amount_control(AMOUNT_CONTROL_ID, &cli.currency)
                .into_diagnostic()?
        }
        None => AmountControl::new(AMOUNT_CONTROL_ID, &cli.currency),
    };
    let sheet = Sheet::new().with_control(amount).into_diagnostic()?;

    let request = client
        .create_payment_info()
        .into_diagnostic()?
        .sheet(sheet)
        .build()
        .into_diagnostic()?;
    let manager = client.create_payment_manager().into_diagnostic()?;

    let result = client
        .request_payment(&manager, request, &mut scenario.listener)
        .await;
    writeln!(out, "{}", serde_json::to_string(&result).into_diagnostic()?).into_diagnostic()?;

    Ok(())
}
