use serde::{Deserialize, Serialize};

/// Card details attached to a card payment method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CardDetails {
    pub brand: Option<String>,
    pub last4: Option<String>,
    pub exp_month: Option<u8>,
    pub exp_year: Option<u16>,
    pub country: Option<String>,
}

/// A payment method selected by the customer.
///
/// `id` is the stable identifier remembered across sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PaymentMethod {
    pub id: Option<String>,
    pub r#type: Option<String>,
    pub livemode: bool,
    pub customer_id: Option<String>,
    pub card: Option<CardDetails>,
}

impl PaymentMethod {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn card(id: impl Into<String>, card: CardDetails) -> Self {
        Self {
            id: Some(id.into()),
            r#type: Some("card".to_string()),
            card: Some(card),
            ..Self::default()
        }
    }
}
