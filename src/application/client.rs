use super::availability::AvailabilityResolver;
use super::events;
use super::orchestrator::PaymentManager;
use super::payment_info::PaymentInfoBuilder;
use crate::config::WalletConfig;
use crate::domain::partner::PartnerInfo;
use crate::domain::payment_request::{PaymentRequest, PaymentRequestBuilder};
use crate::domain::ports::{PlatformCapability, TelemetryHandle, TransactionUpdateListener};
use crate::domain::status::Availability;
use crate::domain::transaction::TransactionResult;
use crate::error::{Result, WalletError};
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// Entry point for a host application integrating wallet payments.
///
/// A client is bound to one session: the platform capability, the merchant
/// configuration and the partner info derived from them are fixed at
/// construction. Nothing is cached globally, so independent clients never
/// share state.
pub struct WalletPayClient {
    capability: PlatformCapability,
    config: WalletConfig,
    partner: PartnerInfo,
    telemetry: TelemetryHandle,
}

impl WalletPayClient {
    /// Creates a client for the given platform capability.
    ///
    /// Uses the configured session id, or a fresh UUID v4 when none is set.
    pub fn new(
        capability: PlatformCapability,
        config: WalletConfig,
        telemetry: TelemetryHandle,
    ) -> Self {
        let session_id = config
            .session_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let partner = PartnerInfo::from_config(&config, &session_id);
        debug!(session_id = %session_id, test_mode = partner.is_test_mode(), "wallet client created");

        Self {
            capability,
            config,
            partner,
            telemetry,
        }
    }

    pub fn partner(&self) -> &PartnerInfo {
        &self.partner
    }

    /// Resolves whether the wallet can take a payment right now.
    pub async fn check_availability(&self) -> Availability {
        AvailabilityResolver::new(
            self.capability.clone(),
            self.partner.clone(),
            self.config.accepted_brands(),
            self.telemetry.clone(),
        )
        .resolve()
        .await
    }

    /// Starts a payment request pre-filled with merchant identity and accepted brands.
    pub fn create_payment_info(&self) -> Result<PaymentRequestBuilder> {
        PaymentInfoBuilder::new(&self.config, self.telemetry.clone()).create()
    }

    pub fn create_payment_manager(&self) -> Result<PaymentManager> {
        let PlatformCapability::Available(platform) = &self.capability else {
            return Err(WalletError::Configuration(
                "wallet platform is not available".to_string(),
            ));
        };

        self.telemetry
            .send_event(events::CREATE_PAYMENT_MANAGER_SUCCESS);
        Ok(PaymentManager::new(
            platform.clone(),
            self.partner.clone(),
            self.telemetry.clone(),
        ))
    }

    /// Runs one payment attempt to completion. See [`PaymentManager::request_payment`].
    pub async fn request_payment<L>(
        &self,
        manager: &PaymentManager,
        request: PaymentRequest,
        listener: &mut L,
    ) -> TransactionResult
    where
        L: TransactionUpdateListener + ?Sized,
    {
        manager.request_payment(request, listener).await
    }

    /// Sends the user to the platform's update page.
    ///
    /// The request is always recorded in telemetry; without a platform nothing opens.
    #[instrument(skip(self))]
    pub async fn open_platform_update_page(&self) {
        self.telemetry.send_event(events::GOTO_UPDATE_PAGE);
        match &self.capability {
            PlatformCapability::Available(platform) => {
                info!("opening wallet update page");
                platform.go_to_update_page(&self.partner).await;
            }
            PlatformCapability::Unavailable => debug!("no wallet platform to update"),
        }
    }

    /// Sends the user to the platform's setup page.
    ///
    /// The request is always recorded in telemetry; without a platform nothing opens.
    #[instrument(skip(self))]
    pub async fn open_platform_activation_page(&self) {
        self.telemetry.send_event(events::ACTIVATE_SAMSUNG_PAY);
        match &self.capability {
            PlatformCapability::Available(platform) => {
                info!("opening wallet activation page");
                platform.activate(&self.partner).await;
            }
            PlatformCapability::Unavailable => debug!("no wallet platform to activate"),
        }
    }
}
