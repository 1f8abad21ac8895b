use crate::domain::ports::PlatformFailure;
use serde::Serialize;

/// Raw wallet platform status codes.
pub const SPAY_NOT_SUPPORTED: i32 = 0;
pub const SPAY_NOT_READY: i32 = 1;
pub const SPAY_READY: i32 = 2;
pub const SPAY_NOT_ALLOWED_TEMPORALLY: i32 = 3;

/// Raw reason codes attached to a not-ready status.
pub const ERROR_DEVICE_NOT_SAMSUNG: i32 = -350;
pub const ERROR_SPAY_PKG_NOT_FOUND: i32 = -351;
pub const ERROR_SPAY_SETUP_NOT_COMPLETED: i32 = -356;
pub const ERROR_SPAY_APP_NEED_TO_UPDATE: i32 = -357;
pub const SPAY_NO_SUPPORTED_CARDS_IN_WALLET: i32 = -10000;

/// Failure code the platform reports when the user backs out of the sheet.
pub const ERROR_USER_CANCELED: i32 = -7;

#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AvailabilityStatus {
    Ready,
    NotReady,
    NotSupported,
    Error,
}

#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AvailabilityReason {
    SetupNotCompleted,
    AppNeedsUpdate,
    NoSupportedCardsInWallet,
    DeviceNotSupported,
    PlatformNotInstalled,
    NotAllowedTemporarily,
    Unknown,
}

impl AvailabilityReason {
    pub fn from_code(code: i32) -> Self {
        match code {
            ERROR_SPAY_SETUP_NOT_COMPLETED => Self::SetupNotCompleted,
            ERROR_SPAY_APP_NEED_TO_UPDATE => Self::AppNeedsUpdate,
            SPAY_NO_SUPPORTED_CARDS_IN_WALLET => Self::NoSupportedCardsInWallet,
            ERROR_DEVICE_NOT_SAMSUNG => Self::DeviceNotSupported,
            ERROR_SPAY_PKG_NOT_FOUND => Self::PlatformNotInstalled,
            _ => Self::Unknown,
        }
    }
}

/// Outcome of a readiness resolution.
///
/// `reason` is only ever present for `NotReady` and `Error`; the constructors
/// are the only way to build one outside this module.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct Availability {
    status: AvailabilityStatus,
    reason: Option<AvailabilityReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cause: Option<PlatformFailure>,
}

impl Availability {
    pub fn ready() -> Self {
        Self {
            status: AvailabilityStatus::Ready,
            reason: None,
            cause: None,
        }
    }

    pub fn not_supported() -> Self {
        Self {
            status: AvailabilityStatus::NotSupported,
            reason: None,
            cause: None,
        }
    }

    pub fn not_ready(reason: AvailabilityReason) -> Self {
        Self {
            status: AvailabilityStatus::NotReady,
            reason: Some(reason),
            cause: None,
        }
    }

    pub fn error(reason: AvailabilityReason, cause: Option<PlatformFailure>) -> Self {
        Self {
            status: AvailabilityStatus::Error,
            reason: Some(reason),
            cause,
        }
    }

    pub fn status(&self) -> AvailabilityStatus {
        self.status
    }

    pub fn reason(&self) -> Option<AvailabilityReason> {
        self.reason
    }

    pub fn cause(&self) -> Option<&PlatformFailure> {
        self.cause.as_ref()
    }

    pub fn is_ready(&self) -> bool {
        self.status == AvailabilityStatus::Ready
    }
}

/// Translates a raw platform status and optional reason code into an [`Availability`].
///
/// Total over its input: unrecognised statuses become `Error`/`Unknown`, and a
/// not-ready status without a reason code gets `Unknown`.
pub fn map_status(raw_status: i32, raw_reason: Option<i32>) -> Availability {
    let reason = raw_reason
        .map(AvailabilityReason::from_code)
        .unwrap_or(AvailabilityReason::Unknown);

    match raw_status {
        SPAY_READY => Availability::ready(),
        SPAY_NOT_SUPPORTED => Availability::not_supported(),
        SPAY_NOT_READY => Availability::not_ready(reason),
        SPAY_NOT_ALLOWED_TEMPORALLY => {
            Availability::not_ready(AvailabilityReason::NotAllowedTemporarily)
        }
        _ => Availability::error(AvailabilityReason::Unknown, None),
    }
}
