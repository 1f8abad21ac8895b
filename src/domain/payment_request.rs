use super::card::CardBrand;
use super::sheet::Sheet;
use crate::error::{Result, WalletError};
use serde::Serialize;
use std::collections::BTreeSet;

/// Which addresses the wallet should collect on the sheet.
#[derive(Debug, Serialize, PartialEq, Clone, Copy, Default)]
#[serde(rename_all = "snake_case")]
pub enum AddressRequirement {
    #[default]
    DoNotShow,
    NeedBillingSpay,
    NeedShippingSpay,
    NeedBillingAndShipping,
}

/// Everything the wallet needs to present a payment sheet. Immutable once built.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct PaymentRequest {
    merchant_id: String,
    merchant_name: String,
    allowed_brands: BTreeSet<CardBrand>,
    sheet: Sheet,
    order_number: Option<String>,
    address_requirement: AddressRequirement,
}

impl PaymentRequest {
    pub fn merchant_id(&self) -> &str {
        &self.merchant_id
    }

    pub fn merchant_name(&self) -> &str {
        &self.merchant_name
    }

    pub fn allowed_brands(&self) -> &BTreeSet<CardBrand> {
        &self.allowed_brands
    }

    pub fn sheet(&self) -> &Sheet {
        &self.sheet
    }

    pub fn order_number(&self) -> Option<&str> {
        self.order_number.as_deref()
    }

    pub fn address_requirement(&self) -> AddressRequirement {
        self.address_requirement
    }
}

/// Builder handed to the host with merchant identity and brands already filled in.
#[derive(Debug, Clone, Default)]
pub struct PaymentRequestBuilder {
    merchant_id: Option<String>,
    merchant_name: Option<String>,
    allowed_brands: BTreeSet<CardBrand>,
    sheet: Sheet,
    order_number: Option<String>,
    address_requirement: AddressRequirement,
}

impl PaymentRequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn merchant_id(mut self, merchant_id: impl Into<String>) -> Self {
        self.merchant_id = Some(merchant_id.into());
        self
    }

    pub fn merchant_name(mut self, merchant_name: impl Into<String>) -> Self {
        self.merchant_name = Some(merchant_name.into());
        self
    }

    pub fn allowed_brands(mut self, brands: BTreeSet<CardBrand>) -> Self {
        self.allowed_brands = brands;
        self
    }

    pub fn sheet(mut self, sheet: Sheet) -> Self {
        self.sheet = sheet;
        self
    }

    pub fn order_number(mut self, order_number: impl Into<String>) -> Self {
        self.order_number = Some(order_number.into());
        self
    }

    pub fn address_requirement(mut self, requirement: AddressRequirement) -> Self {
        self.address_requirement = requirement;
        self
    }

    pub fn build(self) -> Result<PaymentRequest> {
        let merchant_id = non_blank(self.merchant_id)
            .ok_or_else(|| WalletError::Configuration("merchant id is missing".to_string()))?;
        let merchant_name = non_blank(self.merchant_name)
            .ok_or_else(|| WalletError::Configuration("merchant name is missing".to_string()))?;

        Ok(PaymentRequest {
            merchant_id,
            merchant_name,
            allowed_brands: self.allowed_brands,
            sheet: self.sheet,
            order_number: self.order_number,
            address_requirement: self.address_requirement,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
