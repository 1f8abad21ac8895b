use crate::domain::card::CardDescriptor;
use crate::domain::partner::PartnerInfo;
use crate::domain::payment_request::PaymentRequest;
use crate::domain::ports::{
    Extras, PaymentEvent, PaymentEventSender, PlatformFailure, StatusResponse, WalletPlatform,
};
use crate::domain::sheet::Sheet;
use crate::domain::status::SPAY_READY;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Canned answers for every platform call.
#[derive(Debug, Clone, Deserialize)]
pub struct PlatformScript {
    #[serde(default = "ready_status")]
    pub status: StatusResponse,
    /// When set, the status query fails instead of answering `status`.
    #[serde(default)]
    pub status_failure: Option<PlatformFailure>,
    #[serde(default)]
    pub cards: Option<Vec<CardDescriptor>>,
    #[serde(default)]
    pub card_failure: Option<PlatformFailure>,
    #[serde(default)]
    pub start_failure: Option<PlatformFailure>,
    /// When set, every sheet push is rejected with this failure.
    #[serde(default)]
    pub update_failure: Option<PlatformFailure>,
    /// Pushed, in order, once a payment starts.
    #[serde(default)]
    pub events: Vec<PaymentEvent>,
}

fn ready_status() -> StatusResponse {
    StatusResponse {
        status: SPAY_READY,
        reason: None,
    }
}

impl Default for PlatformScript {
    fn default() -> Self {
        Self {
            status: ready_status(),
            status_failure: None,
            cards: None,
            card_failure: None,
            start_failure: None,
            update_failure: None,
            events: Vec::new(),
        }
    }
}

#[derive(Debug, Default)]
struct Recorded {
    status_queries: usize,
    card_queries: usize,
    started: Vec<PaymentRequest>,
    pushed_sheets: Vec<Sheet>,
    update_page_opened: usize,
    activation_opened: usize,
}

/// A wallet platform that plays back a [`PlatformScript`] and records what it was asked.
///
/// `Clone` shares the recorded state, so a test can keep one handle and give
/// another to the client under test.
#[derive(Debug, Default, Clone)]
pub struct ScriptedPlatform {
    script: Arc<PlatformScript>,
    recorded: Arc<RwLock<Recorded>>,
}

impl ScriptedPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_script(script: PlatformScript) -> Self {
        Self {
            script: Arc::new(script),
            recorded: Arc::default(),
        }
    }

    pub fn with_status(self, status: StatusResponse) -> Self {
        self.edit(|script| script.status = status)
    }

    pub fn with_status_failure(self, failure: PlatformFailure) -> Self {
        self.edit(|script| script.status_failure = Some(failure))
    }

    pub fn with_cards(self, cards: Option<Vec<CardDescriptor>>) -> Self {
        self.edit(|script| script.cards = cards)
    }

    pub fn with_card_failure(self, failure: PlatformFailure) -> Self {
        self.edit(|script| script.card_failure = Some(failure))
    }

    pub fn with_start_failure(self, failure: PlatformFailure) -> Self {
        self.edit(|script| script.start_failure = Some(failure))
    }

    pub fn with_update_failure(self, failure: PlatformFailure) -> Self {
        self.edit(|script| script.update_failure = Some(failure))
    }

    pub fn with_events(self, events: Vec<PaymentEvent>) -> Self {
        self.edit(|script| script.events = events)
    }

    fn edit(self, apply: impl FnOnce(&mut PlatformScript)) -> Self {
        let mut script = PlatformScript::clone(&self.script);
        apply(&mut script);
        Self::from_script(script)
    }

    pub async fn status_queries(&self) -> usize {
        self.recorded.read().await.status_queries
    }

    pub async fn card_queries(&self) -> usize {
        self.recorded.read().await.card_queries
    }

    pub async fn started(&self) -> Vec<PaymentRequest> {
        self.recorded.read().await.started.clone()
    }

    pub async fn pushed_sheets(&self) -> Vec<Sheet> {
        self.recorded.read().await.pushed_sheets.clone()
    }

    pub async fn update_page_opened(&self) -> usize {
        self.recorded.read().await.update_page_opened
    }

    pub async fn activation_opened(&self) -> usize {
        self.recorded.read().await.activation_opened
    }
}

#[async_trait]
impl WalletPlatform for ScriptedPlatform {
    async fn query_status(&self, _partner: &PartnerInfo) -> Result<StatusResponse, PlatformFailure> {
        self.recorded.write().await.status_queries += 1;
        match &self.script.status_failure {
            Some(failure) => Err(failure.clone()),
            None => Ok(self.script.status),
        }
    }

    async fn query_card_info(
        &self,
        _partner: &PartnerInfo,
        _filter: &Extras,
    ) -> Result<Option<Vec<CardDescriptor>>, PlatformFailure> {
        self.recorded.write().await.card_queries += 1;
        match &self.script.card_failure {
            Some(failure) => Err(failure.clone()),
            None => Ok(self.script.cards.clone()),
        }
    }

    async fn start_payment(
        &self,
        _partner: &PartnerInfo,
        request: &PaymentRequest,
        events: PaymentEventSender,
    ) -> Result<(), PlatformFailure> {
        self.recorded.write().await.started.push(request.clone());
        if let Some(failure) = &self.script.start_failure {
            return Err(failure.clone());
        }

        for event in &self.script.events {
            if events.send(event.clone()).is_err() {
                debug!("payment listener gone, dropping scripted event");
                break;
            }
        }
        Ok(())
    }

    async fn update_sheet(
        &self,
        _partner: &PartnerInfo,
        sheet: &Sheet,
    ) -> Result<(), PlatformFailure> {
        if let Some(failure) = &self.script.update_failure {
            return Err(failure.clone());
        }
        self.recorded.write().await.pushed_sheets.push(sheet.clone());
        Ok(())
    }

    async fn go_to_update_page(&self, _partner: &PartnerInfo) {
        self.recorded.write().await.update_page_opened += 1;
    }

    async fn activate(&self, _partner: &PartnerInfo) {
        self.recorded.write().await.activation_opened += 1;
    }
}
