#![allow(dead_code)]

use serde_json::{Value, json};
use std::io::{Error, Write};
use std::sync::Arc;
use tempfile::NamedTempFile;
use walletpay::application::client::WalletPayClient;
use walletpay::config::WalletConfig;
use walletpay::domain::ports::PlatformCapability;
use walletpay::infrastructure::in_memory::ScriptedPlatform;
use walletpay::infrastructure::telemetry::RecordingTelemetry;

pub const WALLET_TOML: &str = r#"
environment = "sandbox"
service_id = "service-123"
merchant_id = "merchant-abc"
merchant_display_name = "Bakery"
supported_card_brands = ["visa", "mastercard"]
session_id = "session-xyz"
"#;

pub fn write_temp(contents: &str) -> Result<NamedTempFile, Error> {
    let mut file = NamedTempFile::new()?;
    file.write_all(contents.as_bytes())?;
    file.flush()?;
    Ok(file)
}

pub fn wallet_config() -> WalletConfig {
    WalletConfig::from_toml_str(WALLET_TOML).unwrap()
}

pub fn client_for(platform: &ScriptedPlatform) -> (WalletPayClient, RecordingTelemetry) {
    let telemetry = RecordingTelemetry::new();
    let client = WalletPayClient::new(
        PlatformCapability::Available(Arc::new(platform.clone())),
        wallet_config(),
        Arc::new(telemetry.clone()),
    );
    (client, telemetry)
}

/// A success payload as the wallet returns it: two string-encoded `data` envelopes.
pub fn success_payload(brand: &str, last4: &str, bin_data: Value) -> String {
    let tokenized = json!({
        "tokenizeSamsungPayCard": {
            "paymentMethod": {
                "id": format!("tokensam_{}", last4),
                "details": { "brand": brand, "last4": last4, "binData": bin_data }
            }
        }
    });
    let envelope = json!({ "data": tokenized.to_string() });
    json!({ "data": envelope.to_string() }).to_string()
}
