use super::events;
use crate::domain::credential::Credential;
use crate::domain::partner::PartnerInfo;
use crate::domain::payment_request::PaymentRequest;
use crate::domain::ports::{
    Extras, PaymentEvent, PlatformFailure, TelemetryHandle, TransactionUpdateListener,
    WalletPlatformHandle,
};
use crate::domain::sheet::{Sheet, SheetUpdate};
use crate::domain::transaction::{ERROR_INVALID_PAYLOAD, ERROR_LISTENER_CLOSED, TransactionResult};
use crate::error::{Result, WalletError};
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// Handle for driving payment sheets on a wallet platform.
///
/// Each [`request_payment`](Self::request_payment) call is an independent
/// attempt with its own copy of the sheet.
#[derive(Clone)]
pub struct PaymentManager {
    platform: WalletPlatformHandle,
    partner: PartnerInfo,
    telemetry: TelemetryHandle,
}

impl PaymentManager {
    pub fn new(
        platform: WalletPlatformHandle,
        partner: PartnerInfo,
        telemetry: TelemetryHandle,
    ) -> Self {
        Self {
            platform,
            partner,
            telemetry,
        }
    }

    /// Starts one payment attempt and waits for its outcome.
    ///
    /// Live updates are forwarded to `listener`; the sheet changes it returns
    /// are applied and pushed back before the next event is read. The first
    /// terminal event ends the attempt and later events are never observed.
    ///
    /// Events are consumed while `start_payment` is still running, so a
    /// platform may keep the start call open until the user finishes.
    #[instrument(skip_all, fields(merchant_id = %request.merchant_id()))]
    pub async fn request_payment<L>(
        &self,
        request: PaymentRequest,
        listener: &mut L,
    ) -> TransactionResult
    where
        L: TransactionUpdateListener + ?Sized,
    {
        let (sender, mut receiver) = mpsc::unbounded_channel();
        let mut start = self.platform.start_payment(&self.partner, &request, sender);
        let mut started = false;
        let mut sheet = request.sheet().clone();

        loop {
            tokio::select! {
                biased;
                outcome = &mut start, if !started => {
                    started = true;
                    if let Err(failure) = outcome {
                        warn!(code = failure.code, "wallet refused to start payment");
                        return self.fail(failure);
                    }
                }
                event = receiver.recv() => {
                    let Some(event) = event else { break };
                    if let Some(result) = self.handle_event(event, &mut sheet, &mut *listener).await {
                        return result;
                    }
                }
            }
        }

        warn!("wallet closed the attempt without an outcome");
        self.fail(PlatformFailure::new(ERROR_LISTENER_CLOSED))
    }

    async fn handle_event<L>(
        &self,
        event: PaymentEvent,
        sheet: &mut Sheet,
        listener: &mut L,
    ) -> Option<TransactionResult>
    where
        L: TransactionUpdateListener + ?Sized,
    {
        match event {
            PaymentEvent::CardInfoUpdated { card: Some(card) } => {
                debug!(brand = ?card.brand, "card changed");
                let updates = listener.on_card_info_updated(&card, sheet);
                self.apply_and_push(sheet, &updates).await;
                None
            }
            PaymentEvent::AddressUpdated {
                address: Some(address),
            } => {
                debug!("address changed");
                let updates = listener.on_address_updated(&address, sheet);
                self.apply_and_push(sheet, &updates).await;
                None
            }
            PaymentEvent::CardInfoUpdated { card: None }
            | PaymentEvent::AddressUpdated { address: None } => {
                debug!("ignoring empty update probe");
                None
            }
            PaymentEvent::Success { credential, extras } => {
                listener.on_success(sheet, &extras);
                Some(self.succeed(&credential))
            }
            PaymentEvent::Failure(failure) => Some(self.fail(failure)),
        }
    }

    /// Pushes a sheet to the wallet outside of the update callbacks.
    pub async fn update_sheet(&self, sheet: &Sheet) -> Result<()> {
        self.platform
            .update_sheet(&self.partner, sheet)
            .await
            .map_err(|failure| WalletError::platform(failure.code, failure.extras))
    }

    async fn apply_and_push(&self, sheet: &mut Sheet, updates: &[SheetUpdate]) {
        if let Err(e) = sheet.apply(updates) {
            warn!(error = %e, "discarding sheet updates");
        }
        if let Err(failure) = self.platform.update_sheet(&self.partner, sheet).await {
            warn!(code = failure.code, "wallet rejected sheet update");
        }
    }

    fn succeed(&self, credential: &str) -> TransactionResult {
        match Credential::from_payment_data(credential) {
            Ok(credential) => {
                self.telemetry.send_event(events::REQUEST_PAYMENT_SUCCESS);
                info!(brand = %credential.card_brand, "payment credential issued");
                TransactionResult::Success(credential)
            }
            Err(e) => {
                warn!(error = %e, "undecodable payment credential");
                let mut extras = Extras::new();
                extras.insert("error".to_string(), Value::from(e.to_string()));
                self.fail(PlatformFailure {
                    code: ERROR_INVALID_PAYLOAD,
                    extras,
                })
            }
        }
    }

    fn fail(&self, failure: PlatformFailure) -> TransactionResult {
        let result = TransactionResult::from_failure(failure);
        match &result {
            TransactionResult::Cancelled => {
                info!("payment cancelled by user");
                self.telemetry
                    .send_event(events::REQUEST_PAYMENT_USER_CANCELED);
            }
            TransactionResult::Failure { code, .. } => {
                warn!(code, "payment failed");
                self.telemetry.send_event(events::REQUEST_PAYMENT_FAILED);
            }
            TransactionResult::Success(_) => {}
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WalletConfig;
    use crate::domain::card::{CardBrand, CardDescriptor};
    use crate::domain::payment_request::PaymentRequestBuilder;
    use crate::domain::sheet::{Address, AmountControl, LineItem};
    use crate::domain::ports::{PaymentEventSender, StatusResponse, WalletPlatform};
    use crate::domain::status::{ERROR_USER_CANCELED, SPAY_READY};
    use crate::infrastructure::in_memory::ScriptedPlatform;
    use crate::infrastructure::telemetry::RecordingTelemetry;
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio::sync::Notify;
    use tokio::time::timeout;

    /// Re-prices shipping per card brand and records what it saw.
    #[derive(Default)]
    struct ShippingByBrand {
        cards_seen: Vec<CardBrand>,
        addresses_seen: usize,
        succeeded: bool,
    }

    impl TransactionUpdateListener for ShippingByBrand {
        fn on_card_info_updated(&mut self, card: &CardDescriptor, _sheet: &Sheet) -> Vec<SheetUpdate> {
            self.cards_seen.push(card.brand);
            let shipping = match card.brand {
                CardBrand::Visa => dec!(1.00),
                _ => dec!(5.00),
            };
            vec![SheetUpdate::Value {
                control_id: "amountID".to_string(),
                item_id: "shippingId".to_string(),
                amount: shipping,
            }]
        }

        fn on_address_updated(&mut self, _address: &Address, _sheet: &Sheet) -> Vec<SheetUpdate> {
            self.addresses_seen += 1;
            vec![SheetUpdate::Value {
                control_id: "amountID".to_string(),
                item_id: "taxId".to_string(),
                amount: dec!(2.00),
            }]
        }

        fn on_success(&mut self, _sheet: &Sheet, _extras: &Extras) {
            self.succeeded = true;
        }
    }

    fn request() -> PaymentRequest {
        let amount = AmountControl::new("amountID", "USD")
            .with_item(LineItem::new("itemId", "Items", dec!(10.00)))
            .unwrap()
            .with_item(LineItem::new("taxId", "Tax", dec!(1.00)))
            .unwrap()
            .with_item(LineItem::new("shippingId", "Shipping", dec!(0)))
            .unwrap();
        PaymentRequestBuilder::new()
            .merchant_id("merchant")
            .merchant_name("Shop")
            .sheet(Sheet::new().with_control(amount).unwrap())
            .build()
            .unwrap()
    }

    fn success_payload() -> String {
        json!({ "data": { "data": { "tokenizeSamsungPayCard": { "paymentMethod": {
            "id": "tok-1",
            "details": { "brand": "Visa", "last4": "1111", "binData": { "debit": "YES" } }
        } } } } })
        .to_string()
    }

    fn manager(platform: &ScriptedPlatform, telemetry: &RecordingTelemetry) -> PaymentManager {
        let config = WalletConfig::from_toml_str(r#"service_id = "svc""#).unwrap();
        PaymentManager::new(
            Arc::new(platform.clone()),
            PartnerInfo::from_config(&config, "session"),
            Arc::new(telemetry.clone()),
        )
    }

    fn total(sheet: &Sheet) -> Decimal {
        sheet.total().unwrap_or_default()
    }

    #[tokio::test]
    async fn test_card_updates_reprice_sheet_before_success() {
        let platform = ScriptedPlatform::new().with_events(vec![
            PaymentEvent::CardInfoUpdated { card: None },
            PaymentEvent::CardInfoUpdated {
                card: Some(CardDescriptor::new(CardBrand::Mastercard)),
            },
            PaymentEvent::CardInfoUpdated {
                card: Some(CardDescriptor::new(CardBrand::Visa)),
            },
            PaymentEvent::Success {
                credential: success_payload(),
                extras: Extras::new(),
            },
        ]);
        let telemetry = RecordingTelemetry::new();
        let mut listener = ShippingByBrand::default();

        let result = manager(&platform, &telemetry)
            .request_payment(request(), &mut listener)
            .await;

        let credential = result.credential().unwrap();
        assert_eq!(credential.token, "tok-1");
        assert_eq!(listener.cards_seen, vec![CardBrand::Mastercard, CardBrand::Visa]);
        assert!(listener.succeeded);

        let pushed = platform.pushed_sheets().await;
        assert_eq!(pushed.len(), 2);
        assert_eq!(total(&pushed[0]), dec!(16.00));
        assert_eq!(total(&pushed[1]), dec!(12.00));
        assert_eq!(telemetry.events(), vec![events::REQUEST_PAYMENT_SUCCESS]);
    }

    #[tokio::test]
    async fn test_address_updates_are_applied_and_null_ignored() {
        let platform = ScriptedPlatform::new().with_events(vec![
            PaymentEvent::AddressUpdated { address: None },
            PaymentEvent::AddressUpdated {
                address: Some(Address::default()),
            },
            PaymentEvent::Failure(PlatformFailure::new(ERROR_USER_CANCELED)),
        ]);
        let telemetry = RecordingTelemetry::new();
        let mut listener = ShippingByBrand::default();

        let result = manager(&platform, &telemetry)
            .request_payment(request(), &mut listener)
            .await;

        assert_eq!(result, TransactionResult::Cancelled);
        assert_eq!(listener.addresses_seen, 1);
        let pushed = platform.pushed_sheets().await;
        assert_eq!(pushed.len(), 1);
        assert_eq!(total(&pushed[0]), dec!(12.00));
        assert_eq!(telemetry.events(), vec![events::REQUEST_PAYMENT_USER_CANCELED]);
    }

    #[tokio::test]
    async fn test_events_after_terminal_are_ignored() {
        let platform = ScriptedPlatform::new().with_events(vec![
            PaymentEvent::Failure(PlatformFailure::new(-1)),
            PaymentEvent::CardInfoUpdated {
                card: Some(CardDescriptor::new(CardBrand::Visa)),
            },
            PaymentEvent::Success {
                credential: success_payload(),
                extras: Extras::new(),
            },
        ]);
        let telemetry = RecordingTelemetry::new();
        let mut listener = ShippingByBrand::default();

        let result = manager(&platform, &telemetry)
            .request_payment(request(), &mut listener)
            .await;

        assert!(matches!(result, TransactionResult::Failure { code: -1, .. }));
        assert!(listener.cards_seen.is_empty());
        assert!(!listener.succeeded);
        assert!(platform.pushed_sheets().await.is_empty());
        assert_eq!(telemetry.events(), vec![events::REQUEST_PAYMENT_FAILED]);
    }

    #[tokio::test]
    async fn test_rejected_updates_keep_sheet_and_still_push() {
        struct BadListener;
        impl TransactionUpdateListener for BadListener {
            fn on_card_info_updated(&mut self, _card: &CardDescriptor, _sheet: &Sheet) -> Vec<SheetUpdate> {
                vec![SheetUpdate::Value {
                    control_id: "amountID".to_string(),
                    item_id: "fuelId".to_string(),
                    amount: dec!(9.99),
                }]
            }
        }

        let platform = ScriptedPlatform::new().with_events(vec![
            PaymentEvent::CardInfoUpdated {
                card: Some(CardDescriptor::new(CardBrand::Visa)),
            },
            PaymentEvent::Failure(PlatformFailure::new(-1)),
        ]);
        let telemetry = RecordingTelemetry::new();

        manager(&platform, &telemetry)
            .request_payment(request(), &mut BadListener)
            .await;

        let pushed = platform.pushed_sheets().await;
        assert_eq!(pushed, vec![request().sheet().clone()]);
    }

    #[tokio::test]
    async fn test_start_failure_is_reported_once() {
        let platform = ScriptedPlatform::new().with_start_failure(PlatformFailure::new(-103));
        let telemetry = RecordingTelemetry::new();

        let result = manager(&platform, &telemetry)
            .request_payment(request(), &mut ShippingByBrand::default())
            .await;

        assert!(matches!(result, TransactionResult::Failure { code: -103, .. }));
        assert_eq!(telemetry.events(), vec![events::REQUEST_PAYMENT_FAILED]);
    }

    #[tokio::test]
    async fn test_closed_channel_without_outcome_fails() {
        let platform = ScriptedPlatform::new().with_events(vec![PaymentEvent::CardInfoUpdated {
            card: None,
        }]);
        let telemetry = RecordingTelemetry::new();

        let result = manager(&platform, &telemetry)
            .request_payment(request(), &mut ShippingByBrand::default())
            .await;

        assert!(matches!(
            result,
            TransactionResult::Failure { code: ERROR_LISTENER_CLOSED, .. }
        ));
    }

    #[tokio::test]
    async fn test_undecodable_credential_is_failure_after_listener_success() {
        let platform = ScriptedPlatform::new().with_events(vec![PaymentEvent::Success {
            credential: "{}".to_string(),
            extras: Extras::new(),
        }]);
        let telemetry = RecordingTelemetry::new();
        let mut listener = ShippingByBrand::default();

        let result = manager(&platform, &telemetry)
            .request_payment(request(), &mut listener)
            .await;

        match result {
            TransactionResult::Failure { code, extras } => {
                assert_eq!(code, ERROR_INVALID_PAYLOAD);
                assert!(extras.contains_key("error"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(listener.succeeded);
        assert_eq!(telemetry.events(), vec![events::REQUEST_PAYMENT_FAILED]);
    }

    /// Keeps `start_payment` open until the sheet for its card update comes back.
    #[derive(Default)]
    struct HandshakePlatform {
        sheet_pushed: Notify,
        pushed: Mutex<Vec<Sheet>>,
    }

    #[async_trait]
    impl WalletPlatform for HandshakePlatform {
        async fn query_status(
            &self,
            _partner: &PartnerInfo,
        ) -> std::result::Result<StatusResponse, PlatformFailure> {
            Ok(StatusResponse {
                status: SPAY_READY,
                reason: None,
            })
        }

        async fn query_card_info(
            &self,
            _partner: &PartnerInfo,
            _filter: &Extras,
        ) -> std::result::Result<Option<Vec<CardDescriptor>>, PlatformFailure> {
            Ok(None)
        }

        async fn start_payment(
            &self,
            _partner: &PartnerInfo,
            _request: &PaymentRequest,
            events: PaymentEventSender,
        ) -> std::result::Result<(), PlatformFailure> {
            let _ = events.send(PaymentEvent::CardInfoUpdated {
                card: Some(CardDescriptor::new(CardBrand::Visa)),
            });
            self.sheet_pushed.notified().await;
            let _ = events.send(PaymentEvent::Failure(PlatformFailure::new(ERROR_USER_CANCELED)));
            Ok(())
        }

        async fn update_sheet(
            &self,
            _partner: &PartnerInfo,
            sheet: &Sheet,
        ) -> std::result::Result<(), PlatformFailure> {
            self.pushed.lock().unwrap().push(sheet.clone());
            self.sheet_pushed.notify_one();
            Ok(())
        }

        async fn go_to_update_page(&self, _partner: &PartnerInfo) {}

        async fn activate(&self, _partner: &PartnerInfo) {}
    }

    #[tokio::test]
    async fn test_updates_are_answered_while_start_is_pending() {
        let platform = Arc::new(HandshakePlatform::default());
        let config = WalletConfig::from_toml_str(r#"service_id = "svc""#).unwrap();
        let telemetry = RecordingTelemetry::new();
        let manager = PaymentManager::new(
            platform.clone(),
            PartnerInfo::from_config(&config, "session"),
            Arc::new(telemetry.clone()),
        );
        let mut listener = ShippingByBrand::default();

        let result = timeout(
            Duration::from_secs(2),
            manager.request_payment(request(), &mut listener),
        )
        .await
        .expect("payment attempt should not stall");

        assert_eq!(result, TransactionResult::Cancelled);
        assert_eq!(listener.cards_seen, vec![CardBrand::Visa]);
        let pushed = platform.pushed.lock().unwrap();
        assert_eq!(pushed.len(), 1);
        assert_eq!(total(&pushed[0]), dec!(12.00));
    }

    #[tokio::test]
    async fn test_manual_sheet_push_reaches_platform() {
        let platform = ScriptedPlatform::new();
        let telemetry = RecordingTelemetry::new();
        let sheet = request().sheet().clone();

        manager(&platform, &telemetry)
            .update_sheet(&sheet)
            .await
            .unwrap();

        assert_eq!(platform.pushed_sheets().await, vec![sheet]);
    }

    #[tokio::test]
    async fn test_manual_sheet_push_failure_is_platform_error() {
        let mut failure = PlatformFailure::new(-6);
        failure
            .extras
            .insert("reason".to_string(), json!("sheet rejected"));
        let platform = ScriptedPlatform::new().with_update_failure(failure);
        let telemetry = RecordingTelemetry::new();

        let result = manager(&platform, &telemetry)
            .update_sheet(request().sheet())
            .await;

        match result {
            Err(WalletError::Platform { code, extras }) => {
                assert_eq!(code, -6);
                assert_eq!(extras["reason"], "sheet rejected");
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(platform.pushed_sheets().await.is_empty());
    }
}
