use super::shipping::{ShippingInfoField, ShippingInformation};
use serde::{Deserialize, Serialize};

/// Host-supplied snapshot stating what a session needs before it can charge.
///
/// Read once at `init`. Only the two `*_required` flags feed the readiness
/// rule; the remaining fields are forwarded to the shipping flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub shipping_info_required: bool,
    pub shipping_method_required: bool,
    pub hidden_shipping_info_fields: Vec<ShippingInfoField>,
    pub optional_shipping_info_fields: Vec<ShippingInfoField>,
    pub prepopulated_shipping_info: Option<ShippingInformation>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            shipping_info_required: true,
            shipping_method_required: true,
            hidden_shipping_info_fields: Vec::new(),
            optional_shipping_info_fields: Vec::new(),
            prepopulated_shipping_info: None,
        }
    }
}

impl SessionConfig {
    pub fn builder() -> SessionConfigBuilder {
        SessionConfigBuilder::default()
    }
}

#[derive(Debug, Default)]
pub struct SessionConfigBuilder {
    config: SessionConfig,
}

impl SessionConfigBuilder {
    pub fn shipping_info_required(mut self, required: bool) -> Self {
        self.config.shipping_info_required = required;
        self
    }

    pub fn shipping_method_required(mut self, required: bool) -> Self {
        self.config.shipping_method_required = required;
        self
    }

    pub fn hidden_shipping_info_fields(mut self, fields: Vec<ShippingInfoField>) -> Self {
        self.config.hidden_shipping_info_fields = fields;
        self
    }

    pub fn optional_shipping_info_fields(mut self, fields: Vec<ShippingInfoField>) -> Self {
        self.config.optional_shipping_info_fields = fields;
        self
    }

    pub fn prepopulated_shipping_info(mut self, info: ShippingInformation) -> Self {
        self.config.prepopulated_shipping_info = Some(info);
        self
    }

    pub fn build(self) -> SessionConfig {
        self.config
    }
}
