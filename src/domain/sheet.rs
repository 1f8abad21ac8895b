use crate::error::{Result, WalletError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single priced row in an amount control.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct LineItem {
    pub id: String,
    pub label: String,
    pub amount: Decimal,
    /// Pending items are shown with `display_text` instead of a price and do not count towards the total.
    #[serde(default)]
    pub pending: bool,
    #[serde(default)]
    pub display_text: Option<String>,
}

impl LineItem {
    pub fn new(id: impl Into<String>, label: impl Into<String>, amount: Decimal) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            amount,
            pending: false,
            display_text: None,
        }
    }

    pub fn pending(
        id: impl Into<String>,
        label: impl Into<String>,
        amount: Decimal,
        display_text: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            amount,
            pending: true,
            display_text: Some(display_text.into()),
        }
    }
}

/// How the wallet renders the total line.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisplayFormat {
    #[default]
    TotalPriceOnly,
    TotalEstimatedAmount,
    TotalPendingTextOnly,
}

/// The priced part of a sheet: ordered line items and the total shown to the user.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct AmountControl {
    pub id: String,
    pub currency: String,
    #[serde(default)]
    pub display_format: DisplayFormat,
    items: Vec<LineItem>,
    total_override: Option<Decimal>,
}

impl AmountControl {
    pub fn new(id: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            currency: currency.into(),
            display_format: DisplayFormat::default(),
            items: Vec::new(),
            total_override: None,
        }
    }

    pub fn with_display_format(mut self, display_format: DisplayFormat) -> Self {
        self.display_format = display_format;
        self
    }

    pub fn add_item(&mut self, item: LineItem) -> Result<()> {
        if self.items.iter().any(|existing| existing.id == item.id) {
            return Err(WalletError::DuplicateLineItem {
                control: self.id.clone(),
                item: item.id,
            });
        }
        self.items.push(item);
        Ok(())
    }

    pub fn with_item(mut self, item: LineItem) -> Result<Self> {
        self.add_item(item)?;
        Ok(self)
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn value(&self, item_id: &str) -> Option<Decimal> {
        self.items
            .iter()
            .find(|item| item.id == item_id)
            .map(|item| item.amount)
    }

    /// Replaces the amount of an existing line item. Unknown ids leave the control untouched.
    pub fn update_value(&mut self, item_id: &str, amount: Decimal) -> Result<()> {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id == item_id)
            .ok_or_else(|| WalletError::UnknownLineItem {
                control: self.id.clone(),
                item: item_id.to_string(),
            })?;
        item.amount = amount;
        Ok(())
    }

    /// Pins the displayed total, overriding the computed sum.
    pub fn set_total(&mut self, amount: Decimal) {
        self.total_override = Some(amount);
    }

    pub fn clear_total(&mut self) {
        self.total_override = None;
    }

    /// The pinned total if one was set, otherwise the sum of non-pending items.
    pub fn total(&self) -> Decimal {
        self.total_override.unwrap_or_else(|| {
            self.items
                .iter()
                .filter(|item| !item.pending)
                .map(|item| item.amount)
                .sum()
        })
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum AddressKind {
    Billing,
    Shipping,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct Address {
    #[serde(default)]
    pub addressee: Option<String>,
    #[serde(default)]
    pub address_line1: Option<String>,
    #[serde(default)]
    pub address_line2: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct AddressControl {
    pub id: String,
    pub kind: AddressKind,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub address: Option<Address>,
}

impl AddressControl {
    pub fn new(id: impl Into<String>, kind: AddressKind) -> Self {
        Self {
            id: id.into(),
            kind,
            title: None,
            address: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SheetControl {
    Amount(AmountControl),
    Address(AddressControl),
}

impl SheetControl {
    pub fn id(&self) -> &str {
        match self {
            Self::Amount(control) => &control.id,
            Self::Address(control) => &control.id,
        }
    }
}

impl From<AmountControl> for SheetControl {
    fn from(control: AmountControl) -> Self {
        Self::Amount(control)
    }
}

impl From<AddressControl> for SheetControl {
    fn from(control: AddressControl) -> Self {
        Self::Address(control)
    }
}

/// A change requested by the host while the payment sheet is live.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(tag = "update", rename_all = "snake_case")]
pub enum SheetUpdate {
    Value {
        control_id: String,
        item_id: String,
        amount: Decimal,
    },
    Total {
        control_id: String,
        amount: Decimal,
    },
    Address {
        control_id: String,
        address: Option<Address>,
    },
}

/// The sheet shown inside the wallet: an ordered set of uniquely named controls.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct Sheet {
    controls: Vec<SheetControl>,
}

impl Sheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_control(&mut self, control: impl Into<SheetControl>) -> Result<()> {
        let control = control.into();
        if self.control(control.id()).is_some() {
            return Err(WalletError::DuplicateControl(control.id().to_string()));
        }
        self.controls.push(control);
        Ok(())
    }

    pub fn with_control(mut self, control: impl Into<SheetControl>) -> Result<Self> {
        self.add_control(control)?;
        Ok(self)
    }

    pub fn controls(&self) -> &[SheetControl] {
        &self.controls
    }

    pub fn control(&self, id: &str) -> Option<&SheetControl> {
        self.controls.iter().find(|control| control.id() == id)
    }

    /// Replaces the control with the same id, keeping its position.
    pub fn update_control(&mut self, control: impl Into<SheetControl>) -> Result<()> {
        let control = control.into();
        let slot = self
            .controls
            .iter_mut()
            .find(|existing| existing.id() == control.id())
            .ok_or_else(|| WalletError::UnknownControl(control.id().to_string()))?;
        *slot = control;
        Ok(())
    }

    pub fn amount_control(&self, id: &str) -> Result<&AmountControl> {
        match self.control(id) {
            Some(SheetControl::Amount(control)) => Ok(control),
            Some(SheetControl::Address(_)) => Err(WalletError::WrongControlKind(id.to_string())),
            None => Err(WalletError::UnknownControl(id.to_string())),
        }
    }

    fn amount_control_mut(&mut self, id: &str) -> Result<&mut AmountControl> {
        match self.controls.iter_mut().find(|control| control.id() == id) {
            Some(SheetControl::Amount(control)) => Ok(control),
            Some(SheetControl::Address(_)) => Err(WalletError::WrongControlKind(id.to_string())),
            None => Err(WalletError::UnknownControl(id.to_string())),
        }
    }

    fn address_control_mut(&mut self, id: &str) -> Result<&mut AddressControl> {
        match self.controls.iter_mut().find(|control| control.id() == id) {
            Some(SheetControl::Address(control)) => Ok(control),
            Some(SheetControl::Amount(_)) => Err(WalletError::WrongControlKind(id.to_string())),
            None => Err(WalletError::UnknownControl(id.to_string())),
        }
    }

    pub fn update_value(&mut self, control_id: &str, item_id: &str, amount: Decimal) -> Result<()> {
        self.amount_control_mut(control_id)?
            .update_value(item_id, amount)
    }

    pub fn set_total(&mut self, control_id: &str, amount: Decimal) -> Result<()> {
        self.amount_control_mut(control_id)?.set_total(amount);
        Ok(())
    }

    /// Applies every update or none of them.
    pub fn apply(&mut self, updates: &[SheetUpdate]) -> Result<()> {
        let mut staged = self.clone();
        for update in updates {
            match update {
                SheetUpdate::Value {
                    control_id,
                    item_id,
                    amount,
                } => staged.update_value(control_id, item_id, *amount)?,
                SheetUpdate::Total { control_id, amount } => {
                    staged.set_total(control_id, *amount)?
                }
                SheetUpdate::Address {
                    control_id,
                    address,
                } => staged.address_control_mut(control_id)?.address = address.clone(),
            }
        }
        *self = staged;
        Ok(())
    }

    /// Total of the first amount control, if the sheet has one.
    pub fn total(&self) -> Option<Decimal> {
        self.controls.iter().find_map(|control| match control {
            SheetControl::Amount(amount) => Some(amount.total()),
            SheetControl::Address(_) => None,
        })
    }
}
