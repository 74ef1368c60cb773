//! Domain layer: session value objects, the readiness rule and the ports
//! the orchestrator talks to.

pub mod config;
pub mod customer;
pub mod flow;
pub mod payment_method;
pub mod ports;
pub mod session_data;
pub mod shipping;
