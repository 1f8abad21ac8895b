//! Wallet payment readiness and transaction orchestration.
//!
//! The crate decides whether a device wallet can take a payment, builds the
//! priced payment sheet, drives one payment attempt at a time through the
//! wallet while keeping the sheet in sync with live updates, and turns the
//! wallet's success payload into a tokenized [`Credential`].
//!
//! The wallet itself is reached through the [`WalletPlatform`] port; an
//! in-memory scripted implementation lives in [`infrastructure::in_memory`].
//!
//! [`Credential`]: domain::credential::Credential
//! [`WalletPlatform`]: domain::ports::WalletPlatform

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod interfaces;
pub mod observability;
