use super::config::SessionConfig;
use super::payment_method::PaymentMethod;
use super::shipping::{ShippingInformation, ShippingMethod};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// The payment-relevant facts accumulated during a session.
///
/// `ready_to_charge` is derived: every mutator takes the active
/// [`SessionConfig`] and re-evaluates the readiness rule before returning,
/// so the flag can never go stale.
///
/// Field order is the persisted layout: cart total, readiness, payment
/// method, shipping information, shipping method, shipping total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SessionData {
    cart_total: u64,
    ready_to_charge: bool,
    payment_method: Option<PaymentMethod>,
    shipping_information: Option<ShippingInformation>,
    shipping_method: Option<ShippingMethod>,
    shipping_total: u64,
}

impl SessionData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total of all non-shipping, non-tax items, in minor units.
    pub fn cart_total(&self) -> u64 {
        self.cart_total
    }

    pub fn shipping_total(&self) -> u64 {
        self.shipping_total
    }

    pub fn payment_method(&self) -> Option<&PaymentMethod> {
        self.payment_method.as_ref()
    }

    pub fn shipping_information(&self) -> Option<&ShippingInformation> {
        self.shipping_information.as_ref()
    }

    pub fn shipping_method(&self) -> Option<&ShippingMethod> {
        self.shipping_method.as_ref()
    }

    pub fn is_ready_to_charge(&self) -> bool {
        self.ready_to_charge
    }

    pub fn set_cart_total(&mut self, cart_total: u64, config: &SessionConfig) {
        self.cart_total = cart_total;
        self.update_ready_to_charge(config);
    }

    pub fn set_shipping_total(&mut self, shipping_total: u64, config: &SessionConfig) {
        self.shipping_total = shipping_total;
        self.update_ready_to_charge(config);
    }

    pub fn set_payment_method(
        &mut self,
        payment_method: Option<PaymentMethod>,
        config: &SessionConfig,
    ) {
        self.payment_method = payment_method;
        self.update_ready_to_charge(config);
    }

    pub fn set_shipping_information(
        &mut self,
        shipping_information: Option<ShippingInformation>,
        config: &SessionConfig,
    ) {
        self.shipping_information = shipping_information;
        self.update_ready_to_charge(config);
    }

    pub fn set_shipping_method(
        &mut self,
        shipping_method: Option<ShippingMethod>,
        config: &SessionConfig,
    ) {
        self.shipping_method = shipping_method;
        self.update_ready_to_charge(config);
    }

    /// Evaluates the readiness rule without touching the stored flag.
    ///
    /// A payment method is always needed; shipping information and a
    /// shipping method only when `config` requires them.
    pub fn meets_requirements(&self, config: &SessionConfig) -> bool {
        self.payment_method.is_some()
            && (!config.shipping_info_required || self.shipping_information.is_some())
            && (!config.shipping_method_required || self.shipping_method.is_some())
    }

    /// Re-evaluates the readiness rule and stores the result.
    pub fn update_ready_to_charge(&mut self, config: &SessionConfig) -> bool {
        self.ready_to_charge = self.meets_requirements(config);
        self.ready_to_charge
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
