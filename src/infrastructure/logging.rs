use crate::domain::flow::FlowKind;
use crate::domain::ports::{FlowLauncher, SessionListener};
use crate::domain::session_data::SessionData;
use std::fmt::Debug;

/// A listener that reports session notifications through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingSessionListener;

impl SessionListener for LoggingSessionListener {
    fn on_communicating_state_changed(&mut self, is_communicating: bool) {
        tracing::debug!(is_communicating, "Communicating state changed");
    }

    fn on_error(&mut self, code: i32, message: &str) {
        tracing::error!(code, "Payment session error: {}", message);
    }

    fn on_session_data_changed(&mut self, data: &SessionData) {
        tracing::info!(
            cart_total = data.cart_total(),
            ready_to_charge = data.is_ready_to_charge(),
            "Session data changed"
        );
    }
}

/// A launcher for hosts without a UI: it records the launch in the log and
/// expects the flow's completion to be replayed later.
#[derive(Debug, Clone, Copy)]
pub struct LoggingFlowLauncher {
    kind: FlowKind,
}

impl LoggingFlowLauncher {
    pub fn new(kind: FlowKind) -> Self {
        Self { kind }
    }
}

impl<A: Debug> FlowLauncher<A> for LoggingFlowLauncher {
    fn launch(&self, args: A) {
        tracing::info!(
            request_code = self.kind.request_code(),
            "Launching {:?} flow with {:?}",
            self.kind,
            args
        );
    }
}
