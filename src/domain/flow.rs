use super::config::SessionConfig;
use super::payment_method::PaymentMethod;
use super::session_data::SessionData;
use serde::{Deserialize, Serialize};

/// External flows whose completion signals a session consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlowKind {
    PaymentMethodSelection,
    ShippingCollection,
}

impl FlowKind {
    /// Request code the host receives back with the completion signal.
    pub const fn request_code(self) -> i32 {
        match self {
            FlowKind::PaymentMethodSelection => 6000,
            FlowKind::ShippingCollection => 6002,
        }
    }

    pub fn from_request_code(request_code: i32) -> Option<Self> {
        match request_code {
            6000 => Some(FlowKind::PaymentMethodSelection),
            6002 => Some(FlowKind::ShippingCollection),
            _ => None,
        }
    }
}

/// Coarse outcome of an external flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowOutcome {
    Ok,
    Canceled,
    Other(i32),
}

impl FlowOutcome {
    pub const RESULT_OK: i32 = -1;
    pub const RESULT_CANCELED: i32 = 0;

    /// Maps a host result code.
    pub fn from_result_code(code: i32) -> Self {
        match code {
            Self::RESULT_OK => FlowOutcome::Ok,
            Self::RESULT_CANCELED => FlowOutcome::Canceled,
            other => FlowOutcome::Other(other),
        }
    }

    pub fn result_code(self) -> i32 {
        match self {
            FlowOutcome::Ok => Self::RESULT_OK,
            FlowOutcome::Canceled => Self::RESULT_CANCELED,
            FlowOutcome::Other(code) => code,
        }
    }
}

/// An opaque completion signal forwarded by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowResult {
    pub request_code: i32,
    pub outcome: FlowOutcome,
    pub payload: Option<Vec<u8>>,
}

impl FlowResult {
    pub fn new(request_code: i32, outcome: FlowOutcome, payload: Option<Vec<u8>>) -> Self {
        Self {
            request_code,
            outcome,
            payload,
        }
    }

    pub fn ok(kind: FlowKind, payload: Vec<u8>) -> Self {
        Self::new(kind.request_code(), FlowOutcome::Ok, Some(payload))
    }

    pub fn canceled(kind: FlowKind) -> Self {
        Self::new(kind.request_code(), FlowOutcome::Canceled, None)
    }

    pub fn kind(&self) -> Option<FlowKind> {
        FlowKind::from_request_code(self.request_code)
    }
}

/// Arguments for launching the payment-method chooser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethodsArgs {
    pub initial_payment_method_id: Option<String>,
    pub should_require_postal_code: bool,
    pub is_payment_session_active: bool,
}

/// Arguments for launching the shipping-details flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingFlowArgs {
    pub config: SessionConfig,
    pub session_data: SessionData,
    pub is_payment_session_active: bool,
}

/// Payload returned by the payment-method chooser on success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PaymentMethodsResult {
    pub payment_method: Option<PaymentMethod>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_codes_are_distinct_and_reversible() {
        for kind in [FlowKind::PaymentMethodSelection, FlowKind::ShippingCollection] {
            assert_eq!(FlowKind::from_request_code(kind.request_code()), Some(kind));
        }
        assert_ne!(
            FlowKind::PaymentMethodSelection.request_code(),
            FlowKind::ShippingCollection.request_code()
        );
        assert_eq!(FlowKind::from_request_code(999), None);
    }

    #[test]
    fn test_outcome_from_result_code() {
        assert_eq!(FlowOutcome::from_result_code(-1), FlowOutcome::Ok);
        assert_eq!(FlowOutcome::from_result_code(0), FlowOutcome::Canceled);
        assert_eq!(FlowOutcome::from_result_code(7), FlowOutcome::Other(7));
        assert_eq!(FlowOutcome::Other(7).result_code(), 7);
    }
}
