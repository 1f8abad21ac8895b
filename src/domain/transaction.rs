use super::credential::Credential;
use super::ports::{Extras, PlatformFailure};
use super::status::ERROR_USER_CANCELED;
use serde::Serialize;

/// The platform dropped its event channel without reporting an outcome.
pub const ERROR_LISTENER_CLOSED: i32 = -10001;
/// The success payload could not be decoded into a credential.
pub const ERROR_INVALID_PAYLOAD: i32 = -10002;

/// The single outcome of one payment attempt.
#[derive(Debug, Serialize, PartialEq, Clone)]
#[serde(tag = "result", rename_all = "lowercase")]
pub enum TransactionResult {
    Success(Credential),
    Cancelled,
    Failure { code: i32, extras: Extras },
}

impl TransactionResult {
    /// Maps a terminal failure from the platform; user cancellation is not an error.
    pub fn from_failure(failure: PlatformFailure) -> Self {
        match failure.code {
            ERROR_USER_CANCELED => Self::Cancelled,
            code => Self::Failure {
                code,
                extras: failure.extras,
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn credential(&self) -> Option<&Credential> {
        match self {
            Self::Success(credential) => Some(credential),
            _ => None,
        }
    }
}
