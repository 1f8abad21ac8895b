use super::card::CardDescriptor;
use super::partner::PartnerInfo;
use super::payment_request::PaymentRequest;
use super::sheet::{Address, Sheet, SheetUpdate};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

/// Diagnostic key/value bundle attached to platform callbacks.
pub type Extras = BTreeMap<String, serde_json::Value>;

/// A failure code reported by the wallet platform, with its optional diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformFailure {
    pub code: i32,
    #[serde(default)]
    pub extras: Extras,
}

impl PlatformFailure {
    pub fn new(code: i32) -> Self {
        Self {
            code,
            extras: Extras::new(),
        }
    }
}

/// The platform's own readiness answer: a raw status plus an optional reason code.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: i32,
    #[serde(default)]
    pub reason: Option<i32>,
}

/// Events the platform pushes for a single payment attempt.
///
/// Zero or more updates precede exactly one of `Success` / `Failure`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PaymentEvent {
    CardInfoUpdated {
        card: Option<CardDescriptor>,
    },
    AddressUpdated {
        address: Option<Address>,
    },
    Success {
        credential: String,
        #[serde(default)]
        extras: Extras,
    },
    Failure(PlatformFailure),
}

impl PaymentEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success { .. } | Self::Failure(_))
    }
}

pub type PaymentEventSender = UnboundedSender<PaymentEvent>;

/// The external wallet platform, as seen by this crate.
#[async_trait]
pub trait WalletPlatform: Send + Sync {
    async fn query_status(&self, partner: &PartnerInfo) -> Result<StatusResponse, PlatformFailure>;
    /// Cards provisioned in the wallet; `None` when the platform has nothing to report.
    async fn query_card_info(
        &self,
        partner: &PartnerInfo,
        filter: &Extras,
    ) -> Result<Option<Vec<CardDescriptor>>, PlatformFailure>;
    /// Starts the payment sheet. Events for this attempt are sent on `events`.
    ///
    /// The call may stay pending for the whole attempt, for example while it
    /// waits for an [`update_sheet`](Self::update_sheet) reply; events are
    /// read while it runs. It is dropped once a terminal event arrives.
    async fn start_payment(
        &self,
        partner: &PartnerInfo,
        request: &PaymentRequest,
        events: PaymentEventSender,
    ) -> Result<(), PlatformFailure>;
    async fn update_sheet(
        &self,
        partner: &PartnerInfo,
        sheet: &Sheet,
    ) -> Result<(), PlatformFailure>;
    async fn go_to_update_page(&self, partner: &PartnerInfo);
    async fn activate(&self, partner: &PartnerInfo);
}

pub type WalletPlatformHandle = Arc<dyn WalletPlatform>;

/// Whether the platform client library is present on this device.
#[derive(Clone)]
pub enum PlatformCapability {
    Available(WalletPlatformHandle),
    Unavailable,
}

/// Fire-and-forget analytics sink.
pub trait Telemetry: Send + Sync {
    fn send_event(&self, event: &str);
}

pub type TelemetryHandle = Arc<dyn Telemetry>;

/// Host callbacks invoked while a payment sheet is on screen.
///
/// Update hooks return the sheet changes to apply; the orchestrator applies
/// them and pushes the sheet back to the platform.
pub trait TransactionUpdateListener: Send {
    fn on_card_info_updated(&mut self, card: &CardDescriptor, sheet: &Sheet) -> Vec<SheetUpdate>;

    fn on_address_updated(&mut self, _address: &Address, _sheet: &Sheet) -> Vec<SheetUpdate> {
        Vec::new()
    }

    fn on_success(&mut self, _sheet: &Sheet, _extras: &Extras) {}
}
