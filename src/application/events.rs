//! Analytics event names emitted at each terminal branch.

pub const IS_READY_TO_PAY_CLASS_UNAVAILABLE: &str =
    "samsung-pay.is-ready-to-pay.samsung-pay-class-unavailable";
pub const IS_READY_TO_PAY_DEVICE_NOT_SUPPORTED: &str =
    "samsung-pay.is-ready-to-pay.device-not-supported";
pub const IS_READY_TO_PAY_NOT_READY: &str = "samsung-pay.is-ready-to-pay.not-ready";
pub const IS_READY_TO_PAY_READY: &str = "samsung-pay.is-ready-to-pay.ready";
pub const IS_READY_TO_PAY_FAILED: &str = "samsung-pay.is-ready-to-pay.failed";

pub const REQUEST_CARD_INFO_NO_SUPPORTED_CARDS: &str =
    "samsung-pay.request-card-info.no-supported-cards-in-wallet";
pub const REQUEST_CARD_INFO_FAILED: &str = "samsung-pay.request-card-info.failed";

pub const CREATE_PAYMENT_INFO_SUCCESS: &str = "samsung-pay.create-payment-info.success";
pub const CREATE_PAYMENT_INFO_FAILED: &str = "samsung-pay.create-payment-info.failed";
pub const CREATE_PAYMENT_MANAGER_SUCCESS: &str = "samsung-pay.create-payment-manager.success";

pub const REQUEST_PAYMENT_SUCCESS: &str = "samsung-pay.request-payment.success";
pub const REQUEST_PAYMENT_USER_CANCELED: &str = "samsung-pay.request-payment.user-canceled";
pub const REQUEST_PAYMENT_FAILED: &str = "samsung-pay.request-payment.failed";

pub const GOTO_UPDATE_PAGE: &str = "samsung-pay.goto-update-page";
pub const ACTIVATE_SAMSUNG_PAY: &str = "samsung-pay.activate-samsung-pay";
