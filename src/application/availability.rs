use super::events;
use crate::domain::card::CardBrand;
use crate::domain::partner::PartnerInfo;
use crate::domain::ports::{Extras, PlatformCapability, TelemetryHandle, WalletPlatformHandle};
use crate::domain::status::{Availability, AvailabilityReason, AvailabilityStatus, map_status};
use std::collections::BTreeSet;
use tracing::{debug, instrument, warn};

/// Runs the readiness pipeline: capability probe, platform status, then card brands.
///
/// Every stage runs at most once per [`resolve`](Self::resolve) call and any of
/// them can end the pipeline. The returned future resolves exactly once.
pub struct AvailabilityResolver {
    capability: PlatformCapability,
    partner: PartnerInfo,
    accepted_brands: BTreeSet<CardBrand>,
    telemetry: TelemetryHandle,
}

impl AvailabilityResolver {
    pub fn new(
        capability: PlatformCapability,
        partner: PartnerInfo,
        accepted_brands: BTreeSet<CardBrand>,
        telemetry: TelemetryHandle,
    ) -> Self {
        Self {
            capability,
            partner,
            accepted_brands,
            telemetry,
        }
    }

    #[instrument(skip(self), fields(service_id = %self.partner.service_id))]
    pub async fn resolve(&self) -> Availability {
        let platform = match &self.capability {
            PlatformCapability::Available(platform) => platform,
            PlatformCapability::Unavailable => {
                debug!("wallet platform client unavailable");
                self.telemetry
                    .send_event(events::IS_READY_TO_PAY_CLASS_UNAVAILABLE);
                return Availability::not_supported();
            }
        };

        let response = match platform.query_status(&self.partner).await {
            Ok(response) => response,
            Err(failure) => {
                warn!(code = failure.code, "platform status query failed");
                self.telemetry.send_event(events::IS_READY_TO_PAY_FAILED);
                return Availability::error(AvailabilityReason::Unknown, Some(failure));
            }
        };

        let availability = map_status(response.status, response.reason);
        debug!(status = ?availability.status(), reason = ?availability.reason(), "platform status");

        match availability.status() {
            AvailabilityStatus::Ready => self.check_cards(platform).await,
            AvailabilityStatus::NotSupported => {
                self.telemetry
                    .send_event(events::IS_READY_TO_PAY_DEVICE_NOT_SUPPORTED);
                availability
            }
            AvailabilityStatus::NotReady => {
                self.telemetry.send_event(events::IS_READY_TO_PAY_NOT_READY);
                availability
            }
            AvailabilityStatus::Error => {
                self.telemetry.send_event(events::IS_READY_TO_PAY_FAILED);
                availability
            }
        }
    }

    async fn check_cards(&self, platform: &WalletPlatformHandle) -> Availability {
        let cards = match platform
            .query_card_info(&self.partner, &Extras::new())
            .await
        {
            Ok(cards) => cards.unwrap_or_default(),
            Err(failure) => {
                warn!(code = failure.code, "card info query failed");
                self.telemetry.send_event(events::REQUEST_CARD_INFO_FAILED);
                return Availability::error(AvailabilityReason::Unknown, Some(failure));
            }
        };

        let supported = cards
            .iter()
            .any(|card| self.accepted_brands.contains(&card.brand));

        if !supported {
            debug!(cards = cards.len(), "no accepted card brand in wallet");
            self.telemetry
                .send_event(events::REQUEST_CARD_INFO_NO_SUPPORTED_CARDS);
            return Availability::not_ready(AvailabilityReason::NoSupportedCardsInWallet);
        }

        self.telemetry.send_event(events::IS_READY_TO_PAY_READY);
        Availability::ready()
    }
}
