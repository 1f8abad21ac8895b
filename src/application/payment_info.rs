use super::events;
use crate::config::WalletConfig;
use crate::domain::payment_request::PaymentRequestBuilder;
use crate::domain::ports::TelemetryHandle;
use crate::error::{Result, WalletError};
use tracing::warn;

/// Pre-fills a [`PaymentRequestBuilder`] with merchant identity and accepted brands.
pub struct PaymentInfoBuilder<'a> {
    config: &'a WalletConfig,
    telemetry: TelemetryHandle,
}

impl<'a> PaymentInfoBuilder<'a> {
    pub fn new(config: &'a WalletConfig, telemetry: TelemetryHandle) -> Self {
        Self { config, telemetry }
    }

    /// Fails with [`WalletError::Configuration`] when merchant id or name is missing.
    pub fn create(&self) -> Result<PaymentRequestBuilder> {
        let identity = merchant_field(&self.config.merchant_id, "merchant_id").and_then(|id| {
            merchant_field(&self.config.merchant_display_name, "merchant_display_name")
                .map(|name| (id, name))
        });

        let (merchant_id, merchant_name) = match identity {
            Ok(identity) => identity,
            Err(e) => {
                warn!(error = %e, "cannot create payment info");
                self.telemetry.send_event(events::CREATE_PAYMENT_INFO_FAILED);
                return Err(e);
            }
        };

        self.telemetry.send_event(events::CREATE_PAYMENT_INFO_SUCCESS);
        Ok(PaymentRequestBuilder::new()
            .merchant_id(merchant_id)
            .merchant_name(merchant_name)
            .allowed_brands(self.config.accepted_brands()))
    }
}

fn merchant_field(value: &Option<String>, name: &str) -> Result<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| WalletError::Configuration(format!("{name} is not configured")))
}
