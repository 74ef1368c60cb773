use crate::domain::config::SessionConfig;
use crate::domain::customer::{Customer, CustomerFetchError};
use crate::domain::flow::{
    FlowKind, FlowOutcome, FlowResult, PaymentMethodsArgs, ShippingFlowArgs,
};
use crate::domain::payment_method::PaymentMethod;
use crate::domain::ports::{
    CustomerAccessorRef, FlowLauncherBox, SessionListenerBox, SessionPreferencesBox,
};
use crate::domain::session_data::SessionData;
use crate::error::Result;
use crate::interfaces::flow_result;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Usage marker registered while a payment session is active.
pub const TOKEN_PAYMENT_SESSION: &str = "PaymentSession";

/// Error code reported when a customer fetch task dies without completing.
pub const FETCH_ABORTED_CODE: i32 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Active,
    Destroyed,
}

/// Completions of async work, delivered back to the session's owner.
#[derive(Debug)]
enum SessionEvent {
    CustomerFetched {
        sequence: u64,
        result: std::result::Result<Customer, CustomerFetchError>,
    },
}

/// A single start-to-finish payment operation.
///
/// `PaymentSession` owns the [`SessionData`] and the registered listener.
/// Customer fetches run on spawned tasks; their completions queue up on an
/// internal channel and are only applied when the owner drives the session
/// with [`process_next_event`](Self::process_next_event),
/// [`process_pending_events`](Self::process_pending_events) or
/// [`settle`](Self::settle). Session data is therefore never mutated
/// concurrently with another mutation.
///
/// Fetches are never canceled. When fetches overlap, completions apply in
/// arrival order; a completion older than one already applied is stale and
/// only recomputes readiness and closes its `communicating` bracket. A
/// fetch whose task panics completes as an error with
/// [`FETCH_ABORTED_CODE`].
pub struct PaymentSession {
    customer_accessor: CustomerAccessorRef,
    preferences: SessionPreferencesBox,
    payment_methods_launcher: FlowLauncherBox<PaymentMethodsArgs>,
    shipping_flow_launcher: FlowLauncherBox<ShippingFlowArgs>,
    data: SessionData,
    config: SessionConfig,
    listener: Option<SessionListenerBox>,
    state: SessionState,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    events_rx: mpsc::UnboundedReceiver<SessionEvent>,
    next_fetch_sequence: u64,
    last_applied_fetch: Option<u64>,
    fetches_in_flight: usize,
}

impl PaymentSession {
    /// Creates a new, uninitialized `PaymentSession`.
    ///
    /// # Arguments
    ///
    /// * `customer_accessor` - Access to the customer this session belongs to.
    /// * `preferences` - Store remembering each customer's last payment method.
    /// * `payment_methods_launcher` - Starts the payment-method chooser.
    /// * `shipping_flow_launcher` - Starts the shipping-details flow.
    pub fn new(
        customer_accessor: CustomerAccessorRef,
        preferences: SessionPreferencesBox,
        payment_methods_launcher: FlowLauncherBox<PaymentMethodsArgs>,
        shipping_flow_launcher: FlowLauncherBox<ShippingFlowArgs>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            customer_accessor,
            preferences,
            payment_methods_launcher,
            shipping_flow_launcher,
            data: SessionData::new(),
            config: SessionConfig::default(),
            listener: None,
            state: SessionState::Uninitialized,
            events_tx,
            events_rx,
            next_fetch_sequence: 0,
            last_applied_fetch: None,
            fetches_in_flight: 0,
        }
    }

    /// Seeds the session with existing data before `init`.
    ///
    /// Readiness is recomputed against the current config. To resume a
    /// saved snapshot as-is, pass it to `init` instead.
    pub fn with_session_data(mut self, mut data: SessionData) -> Self {
        data.update_ready_to_charge(&self.config);
        self.data = data;
        self
    }

    /// Initializes the session and registers `listener`.
    ///
    /// Without `restored_state` the customer session's usage markers are reset
    /// first, since this is a new unit of work, and readiness is recomputed
    /// against `config`. With it, the session is resuming: markers accumulate
    /// and the live data is replaced by the restored snapshot.
    ///
    /// Fails with [`SessionError::CustomerSessionUnavailable`] when no
    /// customer identity exists; the listener then stays unset.
    ///
    /// Calling `init` again re-registers the listener and may start another
    /// fetch.
    ///
    /// [`SessionError::CustomerSessionUnavailable`]: crate::error::SessionError::CustomerSessionUnavailable
    pub async fn init(
        &mut self,
        listener: SessionListenerBox,
        config: SessionConfig,
        restored_state: Option<SessionData>,
        prefetch_customer: bool,
    ) -> Result<()> {
        if let Err(e) = self.register_usage(restored_state.is_none()).await {
            tracing::warn!("Payment session init failed: {}", e);
            self.listener = None;
            return Err(e);
        }

        self.listener = Some(listener);
        self.config = config;
        match restored_state {
            Some(data) => {
                tracing::debug!("Resuming payment session from saved state");
                self.data = data;
            }
            None => {
                self.data.update_ready_to_charge(&self.config);
            }
        }
        self.state = SessionState::Active;

        if prefetch_customer {
            self.fetch_customer();
        }
        Ok(())
    }

    async fn register_usage(&self, new_unit_of_work: bool) -> Result<()> {
        if new_unit_of_work {
            self.customer_accessor.reset_usage_markers().await?;
        }
        self.customer_accessor
            .add_usage_marker(TOKEN_PAYMENT_SESSION)
            .await
    }

    /// Detaches the listener. Later completions still update the data but
    /// notify no one.
    pub fn destroy(&mut self) {
        self.listener = None;
        self.state = SessionState::Destroyed;
    }

    /// Notifies the customer session that this payment is complete.
    pub async fn on_completed(&self) {
        if let Err(e) = self.customer_accessor.reset_usage_markers().await {
            tracing::warn!("Failed to reset usage markers on completion: {}", e);
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn session_data(&self) -> &SessionData {
        &self.data
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn fetches_in_flight(&self) -> usize {
        self.fetches_in_flight
    }

    /// Sets the total of all non-shipping items, in minor units.
    pub fn set_cart_total(&mut self, cart_total: u64) {
        self.data.set_cart_total(cart_total, &self.config);
    }

    /// Serializes the session data so it can be restored through `init`.
    pub fn save_instance_state(&self) -> Result<Vec<u8>> {
        self.data.to_bytes()
    }

    /// Launches the payment-method chooser.
    ///
    /// The initially selected method follows
    /// [`selected_payment_method_id`](Self::selected_payment_method_id).
    pub async fn present_payment_method_selection(
        &self,
        should_require_postal_code: bool,
        user_selected_payment_method_id: Option<&str>,
    ) {
        let args = PaymentMethodsArgs {
            initial_payment_method_id: self
                .selected_payment_method_id(user_selected_payment_method_id)
                .await,
            should_require_postal_code,
            is_payment_session_active: true,
        };
        tracing::debug!(
            "Launching payment method selection (initial: {:?})",
            args.initial_payment_method_id
        );
        self.payment_methods_launcher.launch(args);
    }

    /// Launches the shipping-details flow with the current config and data.
    pub fn present_shipping_flow(&self) {
        tracing::debug!("Launching shipping flow");
        self.shipping_flow_launcher.launch(ShippingFlowArgs {
            config: self.config.clone(),
            session_data: self.data.clone(),
            is_payment_session_active: true,
        });
    }

    /// Resolves which payment method should appear selected.
    ///
    /// Priority: the explicit override, then the method already on the
    /// session, then the method remembered for the cached customer.
    pub async fn selected_payment_method_id(
        &self,
        user_selected_payment_method_id: Option<&str>,
    ) -> Option<String> {
        if let Some(id) = user_selected_payment_method_id {
            return Some(id.to_string());
        }
        if let Some(id) = self.data.payment_method().and_then(|pm| pm.id.clone()) {
            return Some(id);
        }

        let customer_id = self.customer_accessor.cached_customer().await?.id?;
        match self.preferences.selected_payment_method_id(&customer_id).await {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!("Failed to read payment method preference: {}", e);
                None
            }
        }
    }

    /// Consumes a completion signal from an external flow.
    ///
    /// Returns `false` when the signal does not belong to a session flow or
    /// carries an outcome other than ok/canceled. A canceled flow triggers a
    /// customer fetch to resynchronize with the backend and merges nothing.
    pub async fn handle_flow_result(&mut self, result: FlowResult) -> bool {
        let Some(kind) = result.kind() else {
            return false;
        };

        match result.outcome {
            FlowOutcome::Canceled => {
                tracing::debug!("{:?} flow canceled, refreshing customer", kind);
                self.fetch_customer();
                true
            }
            FlowOutcome::Ok => {
                let payload = result.payload.as_deref();
                match kind {
                    FlowKind::PaymentMethodSelection => {
                        self.on_payment_method_selected(payload).await
                    }
                    FlowKind::ShippingCollection => self.on_shipping_collected(payload),
                }
                true
            }
            FlowOutcome::Other(code) => {
                tracing::debug!("Ignoring {:?} flow result with code {}", kind, code);
                false
            }
        }
    }

    async fn on_payment_method_selected(&mut self, payload: Option<&[u8]>) {
        let Some(payment_method) = flow_result::decode_payment_method(payload) else {
            return;
        };

        self.persist_payment_method(&payment_method).await;
        self.data.set_payment_method(Some(payment_method), &self.config);
        self.notify_session_data_changed();
        self.notify_communicating(false);
    }

    async fn persist_payment_method(&self, payment_method: &PaymentMethod) {
        let Some(payment_method_id) = payment_method.id.as_deref() else {
            return;
        };
        let Some(customer_id) = self
            .customer_accessor
            .cached_customer()
            .await
            .and_then(|c| c.id)
        else {
            return;
        };

        if let Err(e) = self
            .preferences
            .save_selected_payment_method_id(&customer_id, payment_method_id)
            .await
        {
            tracing::warn!("Failed to save payment method preference: {}", e);
        }
    }

    fn on_shipping_collected(&mut self, payload: Option<&[u8]>) {
        let Some(mut data) = flow_result::decode_session_data(payload) else {
            return;
        };

        data.update_ready_to_charge(&self.config);
        self.data = data;
        self.notify_session_data_changed();
    }

    fn fetch_customer(&mut self) {
        self.notify_communicating(true);

        self.next_fetch_sequence += 1;
        let sequence = self.next_fetch_sequence;
        self.fetches_in_flight += 1;

        let accessor = Arc::clone(&self.customer_accessor);
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            let fetch = tokio::spawn(async move { accessor.fetch_current_customer().await });
            let result = fetch.await.unwrap_or_else(|e| {
                tracing::error!("Customer fetch {} aborted: {}", sequence, e);
                Err(CustomerFetchError::new(
                    FETCH_ABORTED_CODE,
                    format!("customer fetch aborted: {}", e),
                ))
            });
            if events
                .send(SessionEvent::CustomerFetched { sequence, result })
                .is_err()
            {
                tracing::debug!("Session dropped before customer fetch {} completed", sequence);
            }
        });
    }

    /// Waits for the next async completion and applies it.
    ///
    /// Returns `false` immediately when nothing is in flight.
    pub async fn process_next_event(&mut self) -> bool {
        if self.fetches_in_flight == 0 {
            return false;
        }
        match self.events_rx.recv().await {
            Some(event) => {
                self.apply_event(event);
                true
            }
            None => false,
        }
    }

    /// Applies every completion that has already arrived, without waiting.
    pub fn process_pending_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply_event(event);
            applied += 1;
        }
        applied
    }

    /// Applies completions until no fetch is in flight.
    pub async fn settle(&mut self) {
        while self.process_next_event().await {}
    }

    fn apply_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::CustomerFetched { sequence, result } => {
                self.apply_customer_fetch(sequence, result)
            }
        }
    }

    fn apply_customer_fetch(
        &mut self,
        sequence: u64,
        result: std::result::Result<Customer, CustomerFetchError>,
    ) {
        self.fetches_in_flight = self.fetches_in_flight.saturating_sub(1);

        let stale = self.last_applied_fetch.is_some_and(|last| sequence < last);
        if stale {
            tracing::warn!(
                "Customer fetch {} completed after a newer fetch; suppressing its notification",
                sequence
            );
        } else {
            self.last_applied_fetch = Some(sequence);
        }

        match result {
            Ok(_customer) => {
                self.data.update_ready_to_charge(&self.config);
                if !stale {
                    self.notify_session_data_changed();
                }
            }
            Err(e) => {
                tracing::debug!("Customer fetch {} failed: {}", sequence, e);
                if !stale && let Some(listener) = self.listener.as_mut() {
                    listener.on_error(e.code, &e.message);
                }
            }
        }
        self.notify_communicating(false);
    }

    fn notify_communicating(&mut self, is_communicating: bool) {
        if let Some(listener) = self.listener.as_mut() {
            listener.on_communicating_state_changed(is_communicating);
        }
    }

    fn notify_session_data_changed(&mut self) {
        if let Some(listener) = self.listener.as_mut() {
            listener.on_session_data_changed(&self.data);
        }
    }
}
