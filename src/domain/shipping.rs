use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Address {
    pub line1: Option<String>,
    pub line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

/// Where the purchased items should be shipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ShippingInformation {
    pub address: Option<Address>,
    pub name: Option<String>,
    pub phone: Option<String>,
}

/// How the purchased items should be shipped.
///
/// `amount` is expressed in the currency's minor units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingMethod {
    pub label: String,
    pub identifier: String,
    pub amount: u64,
    pub currency: String,
    pub detail: Option<String>,
}

impl ShippingMethod {
    pub fn new(
        label: impl Into<String>,
        identifier: impl Into<String>,
        amount: u64,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            identifier: identifier.into(),
            amount,
            currency: currency.into(),
            detail: None,
        }
    }
}

/// Shipping form fields a host can hide or mark optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingInfoField {
    AddressLineOne,
    AddressLineTwo,
    City,
    PostalCode,
    State,
    Phone,
}
