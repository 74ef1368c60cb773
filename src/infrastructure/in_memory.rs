use crate::domain::customer::{Customer, CustomerFetchError};
use crate::domain::ports::{CustomerAccessor, SessionPreferences, SessionStateStore};
use crate::domain::session_data::SessionData;
use crate::error::{Result, SessionError};
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// A thread-safe in-memory store for payment-method preferences.
///
/// Uses `Arc<RwLock<HashMap<String, String>>>` keyed by customer id.
/// Cloning shares the underlying map.
#[derive(Default, Clone)]
pub struct InMemorySessionPreferences {
    selections: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemorySessionPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionPreferences for InMemorySessionPreferences {
    async fn selected_payment_method_id(&self, customer_id: &str) -> Result<Option<String>> {
        let selections = self.selections.read().await;
        Ok(selections.get(customer_id).cloned())
    }

    async fn save_selected_payment_method_id(
        &self,
        customer_id: &str,
        payment_method_id: &str,
    ) -> Result<()> {
        let mut selections = self.selections.write().await;
        selections.insert(customer_id.to_string(), payment_method_id.to_string());
        Ok(())
    }
}

/// A thread-safe in-memory store for suspended session state.
///
/// Snapshots are kept in their serialized form so a load goes through the
/// same decoding path as a persistent store.
#[derive(Default, Clone)]
pub struct InMemorySessionStateStore {
    states: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl InMemorySessionStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStateStore for InMemorySessionStateStore {
    async fn save(&self, key: &str, data: &SessionData) -> Result<()> {
        let bytes = data.to_bytes()?;
        let mut states = self.states.write().await;
        states.insert(key.to_string(), bytes);
        Ok(())
    }

    async fn load(&self, key: &str) -> Result<Option<SessionData>> {
        let states = self.states.read().await;
        states
            .get(key)
            .map(|bytes| SessionData::from_bytes(bytes))
            .transpose()
    }
}

/// An in-memory customer backend.
///
/// Serves a fixed customer, caching it after the first successful fetch.
/// Constructed with [`unavailable`](Self::unavailable) it behaves like a
/// customer session that was never started: usage markers cannot be
/// registered and fetches fail.
#[derive(Default, Clone)]
pub struct InMemoryCustomerAccessor {
    customer: Option<Customer>,
    cached: Arc<RwLock<Option<Customer>>>,
    next_error: Arc<RwLock<Option<CustomerFetchError>>>,
    usage_markers: Arc<RwLock<BTreeSet<String>>>,
    fetch_count: Arc<AtomicUsize>,
    reset_count: Arc<AtomicUsize>,
}

impl InMemoryCustomerAccessor {
    pub fn new(customer: Customer) -> Self {
        Self {
            customer: Some(customer),
            ..Self::default()
        }
    }

    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Pre-populates the cache, as if a fetch had already completed.
    pub fn with_cached_customer(self, customer: Customer) -> Self {
        Self {
            cached: Arc::new(RwLock::new(Some(customer))),
            ..self
        }
    }

    /// Makes the next fetch fail with `error`.
    pub async fn fail_next_fetch(&self, error: CustomerFetchError) {
        *self.next_error.write().await = Some(error);
    }

    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }

    pub fn reset_count(&self) -> usize {
        self.reset_count.load(Ordering::SeqCst)
    }

    pub async fn usage_markers(&self) -> BTreeSet<String> {
        self.usage_markers.read().await.clone()
    }

    fn ensure_available(&self) -> Result<()> {
        if self.customer.is_some() {
            Ok(())
        } else {
            Err(SessionError::CustomerSessionUnavailable(
                "no customer session has been started".to_string(),
            ))
        }
    }
}

#[async_trait]
impl CustomerAccessor for InMemoryCustomerAccessor {
    async fn cached_customer(&self) -> Option<Customer> {
        self.cached.read().await.clone()
    }

    async fn fetch_current_customer(&self) -> std::result::Result<Customer, CustomerFetchError> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }
        let customer = self
            .customer
            .clone()
            .ok_or_else(|| CustomerFetchError::new(401, "No customer session available"))?;

        *self.cached.write().await = Some(customer.clone());
        Ok(customer)
    }

    async fn add_usage_marker(&self, token: &str) -> Result<()> {
        self.ensure_available()?;
        self.usage_markers.write().await.insert(token.to_string());
        Ok(())
    }

    async fn reset_usage_markers(&self) -> Result<()> {
        self.ensure_available()?;
        self.reset_count.fetch_add(1, Ordering::SeqCst);
        self.usage_markers.write().await.clear();
        Ok(())
    }
}
