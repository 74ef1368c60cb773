//! JSON codec for the payloads carried by flow completion signals.
//!
//! Decoders never fail outward: a missing or malformed payload decodes to
//! `None` so the session merges nothing and stays consistent.

use crate::domain::flow::PaymentMethodsResult;
use crate::domain::payment_method::PaymentMethod;
use crate::domain::session_data::SessionData;
use crate::error::Result;

pub fn encode_payment_methods_result(result: &PaymentMethodsResult) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(result)?)
}

/// Decodes the payment method chosen in the payment-method flow.
pub fn decode_payment_method(payload: Option<&[u8]>) -> Option<PaymentMethod> {
    let bytes = payload?;
    match serde_json::from_slice::<PaymentMethodsResult>(bytes) {
        Ok(result) => result.payment_method,
        Err(e) => {
            tracing::warn!("Ignoring undecodable payment method payload: {}", e);
            None
        }
    }
}

pub fn encode_session_data(data: &SessionData) -> Result<Vec<u8>> {
    data.to_bytes()
}

/// Decodes the replacement snapshot returned by the shipping flow.
pub fn decode_session_data(payload: Option<&[u8]>) -> Option<SessionData> {
    let bytes = payload?;
    match SessionData::from_bytes(bytes) {
        Ok(data) => Some(data),
        Err(e) => {
            tracing::warn!("Ignoring undecodable shipping flow payload: {}", e);
            None
        }
    }
}
