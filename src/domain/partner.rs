use super::ports::Extras;
use crate::config::WalletConfig;
use serde::Serialize;
use serde_json::{Value, json};

pub const PARTNER_SERVICE_TYPE: &str = "PartnerServiceType";
pub const EXTRA_KEY_TEST_MODE: &str = "test_mode";
pub const EXTRA_ADDITIONAL_DATA: &str = "additionalData";
pub const SERVICE_TYPE_INAPP_PAYMENT: &str = "INAPP_PAYMENT";
pub const TOKENIZATION_API_VERSION: &str = "2018-10-01";

/// Partner identity presented to the wallet platform on every call.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct PartnerInfo {
    pub service_id: String,
    pub extras: Extras,
}

impl PartnerInfo {
    pub fn from_config(config: &WalletConfig, session_id: &str) -> Self {
        let metadata = json!({
            "integration": config.integration,
            "sessionId": session_id,
            "version": env!("CARGO_PKG_VERSION"),
        });
        let additional_data = json!({
            "braintreeTokenizationApiVersion": TOKENIZATION_API_VERSION,
            "clientSdkMetadata": metadata,
        });

        let mut extras = Extras::new();
        extras.insert(
            PARTNER_SERVICE_TYPE.to_string(),
            Value::from(SERVICE_TYPE_INAPP_PAYMENT),
        );
        extras.insert(
            EXTRA_KEY_TEST_MODE.to_string(),
            Value::from(config.is_sandbox()),
        );
        extras.insert(
            EXTRA_ADDITIONAL_DATA.to_string(),
            Value::from(additional_data.to_string()),
        );

        Self {
            service_id: config.service_id.clone(),
            extras,
        }
    }

    pub fn is_test_mode(&self) -> bool {
        self.extras
            .get(EXTRA_KEY_TEST_MODE)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}
