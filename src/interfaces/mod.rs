//! Wire formats at the edges of the session: flow payloads and recorded
//! flow signals.

pub mod csv;
pub mod flow_result;
