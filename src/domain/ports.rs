use super::customer::{Customer, CustomerFetchError};
use super::session_data::SessionData;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Access to the customer the session is attached to.
#[async_trait]
pub trait CustomerAccessor: Send + Sync {
    /// The last customer seen by this accessor. May be stale.
    async fn cached_customer(&self) -> Option<Customer>;

    /// Fetches the current customer from the backend.
    ///
    /// Resolves exactly once, with either the customer or an error.
    async fn fetch_current_customer(&self) -> std::result::Result<Customer, CustomerFetchError>;

    /// Marks a subsystem as actively using the customer session.
    ///
    /// Fails with [`SessionError::CustomerSessionUnavailable`] when no
    /// customer identity has been established.
    ///
    /// [`SessionError::CustomerSessionUnavailable`]: crate::error::SessionError::CustomerSessionUnavailable
    async fn add_usage_marker(&self, token: &str) -> Result<()>;

    async fn reset_usage_markers(&self) -> Result<()>;
}

/// Remembers the last payment method each customer selected.
#[async_trait]
pub trait SessionPreferences: Send + Sync {
    async fn selected_payment_method_id(&self, customer_id: &str) -> Result<Option<String>>;
    async fn save_selected_payment_method_id(
        &self,
        customer_id: &str,
        payment_method_id: &str,
    ) -> Result<()>;
}

/// Keeps suspended session state between host process lifetimes.
#[async_trait]
pub trait SessionStateStore: Send + Sync {
    async fn save(&self, key: &str, data: &SessionData) -> Result<()>;
    async fn load(&self, key: &str) -> Result<Option<SessionData>>;
}

/// Starts an external UI flow. Completion arrives later as a
/// [`FlowResult`](super::flow::FlowResult) forwarded by the host.
pub trait FlowLauncher<A>: Send + Sync {
    fn launch(&self, args: A);
}

/// Host-side receiver of session notifications.
///
/// Calls are independent notifications, not one atomic update.
pub trait SessionListener: Send {
    fn on_communicating_state_changed(&mut self, is_communicating: bool);
    fn on_error(&mut self, code: i32, message: &str);
    fn on_session_data_changed(&mut self, data: &SessionData);
}

pub type CustomerAccessorRef = Arc<dyn CustomerAccessor>;
pub type SessionPreferencesBox = Box<dyn SessionPreferences>;
pub type SessionStateStoreBox = Box<dyn SessionStateStore>;
pub type FlowLauncherBox<A> = Box<dyn FlowLauncher<A>>;
pub type SessionListenerBox = Box<dyn SessionListener>;
