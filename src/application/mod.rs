//! Application layer containing the session orchestration.
//!
//! This module defines `PaymentSession`, which owns the session state and
//! reconciles customer fetches and external flow results into it. Async
//! completions are marshaled back through a `tokio` channel so all state
//! changes happen on the owner's task.

pub mod session;
