#![allow(dead_code)]

use async_trait::async_trait;
use paysession::application::session::PaymentSession;
use paysession::domain::config::SessionConfig;
use paysession::domain::customer::{Customer, CustomerFetchError};
use paysession::domain::flow::{FlowKind, FlowResult, PaymentMethodsResult};
use paysession::domain::payment_method::{CardDetails, PaymentMethod};
use paysession::domain::ports::{
    CustomerAccessor, CustomerAccessorRef, FlowLauncher, SessionListener,
};
use paysession::domain::session_data::SessionData;
use paysession::domain::shipping::{Address, ShippingInformation, ShippingMethod};
use paysession::error::Result;
use paysession::infrastructure::in_memory::InMemorySessionPreferences;
use paysession::interfaces::flow_result;
use std::fs::File;
use std::io::Error;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Communicating(bool),
    Error(i32, String),
    DataChanged(SessionData),
}

/// Listener recording every notification in order.
#[derive(Clone, Default)]
pub struct RecordingListener {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn boxed(&self) -> Box<Self> {
        Box::new(self.clone())
    }
}

impl SessionListener for RecordingListener {
    fn on_communicating_state_changed(&mut self, is_communicating: bool) {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Communicating(is_communicating));
    }

    fn on_error(&mut self, code: i32, message: &str) {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Error(code, message.to_string()));
    }

    fn on_session_data_changed(&mut self, data: &SessionData) {
        self.calls
            .lock()
            .unwrap()
            .push(Call::DataChanged(data.clone()));
    }
}

/// Launcher recording the arguments of every launch.
pub struct RecordingLauncher<A> {
    launched: Arc<Mutex<Vec<A>>>,
}

impl<A> RecordingLauncher<A> {
    pub fn new() -> Self {
        Self {
            launched: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl<A> Clone for RecordingLauncher<A> {
    fn clone(&self) -> Self {
        Self {
            launched: Arc::clone(&self.launched),
        }
    }
}

impl<A: Clone> RecordingLauncher<A> {
    pub fn launched(&self) -> Vec<A> {
        self.launched.lock().unwrap().clone()
    }
}

impl<A: Send> FlowLauncher<A> for RecordingLauncher<A> {
    fn launch(&self, args: A) {
        self.launched.lock().unwrap().push(args);
    }
}

/// Customer accessor whose fetches stay pending until the test releases
/// them, so completion order can be chosen explicitly.
type FetchSender = oneshot::Sender<std::result::Result<Customer, CustomerFetchError>>;

#[derive(Clone)]
pub struct GatedCustomerAccessor {
    customer: Customer,
    pending: Arc<Mutex<Vec<Option<FetchSender>>>>,
}

impl GatedCustomerAccessor {
    pub fn new(customer: Customer) -> Self {
        Self {
            customer,
            pending: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn started(&self) -> usize {
        self.pending.lock().unwrap().len()
    }

    pub async fn wait_for_fetches(&self, count: usize) {
        while self.started() < count {
            tokio::task::yield_now().await;
        }
    }

    /// Completes the `index`-th fetch (in start order).
    pub fn release(&self, index: usize, result: std::result::Result<Customer, CustomerFetchError>) {
        let sender = self.pending.lock().unwrap()[index]
            .take()
            .expect("fetch already released");
        sender.send(result).expect("fetch task dropped");
    }

    pub fn customer(&self) -> Customer {
        self.customer.clone()
    }
}

#[async_trait]
impl CustomerAccessor for GatedCustomerAccessor {
    async fn cached_customer(&self) -> Option<Customer> {
        Some(self.customer.clone())
    }

    async fn fetch_current_customer(&self) -> std::result::Result<Customer, CustomerFetchError> {
        let (tx, rx) = oneshot::channel();
        self.pending.lock().unwrap().push(Some(tx));
        rx.await
            .unwrap_or_else(|_| Err(CustomerFetchError::new(499, "fetch abandoned")))
    }

    async fn add_usage_marker(&self, _token: &str) -> Result<()> {
        Ok(())
    }

    async fn reset_usage_markers(&self) -> Result<()> {
        Ok(())
    }
}

pub struct Harness {
    pub session: PaymentSession,
    pub listener: RecordingListener,
    pub preferences: InMemorySessionPreferences,
    pub payment_methods: RecordingLauncher<paysession::domain::flow::PaymentMethodsArgs>,
    pub shipping: RecordingLauncher<paysession::domain::flow::ShippingFlowArgs>,
}

pub fn harness(accessor: CustomerAccessorRef) -> Harness {
    let preferences = InMemorySessionPreferences::new();
    let payment_methods = RecordingLauncher::new();
    let shipping = RecordingLauncher::new();
    let session = PaymentSession::new(
        accessor,
        Box::new(preferences.clone()),
        Box::new(payment_methods.clone()),
        Box::new(shipping.clone()),
    );
    Harness {
        session,
        listener: RecordingListener::new(),
        preferences,
        payment_methods,
        shipping,
    }
}

pub fn lenient_config() -> SessionConfig {
    SessionConfig::builder()
        .shipping_info_required(false)
        .shipping_method_required(false)
        .build()
}

pub fn card_payment_method(id: &str) -> PaymentMethod {
    PaymentMethod::card(
        id,
        CardDetails {
            brand: Some("visa".to_string()),
            last4: Some("4242".to_string()),
            exp_month: Some(8),
            exp_year: Some(2030),
            country: Some("US".to_string()),
        },
    )
}

pub fn shipping_information() -> ShippingInformation {
    ShippingInformation {
        address: Some(Address {
            line1: Some("510 Townsend St".to_string()),
            line2: None,
            city: Some("San Francisco".to_string()),
            state: Some("CA".to_string()),
            postal_code: Some("94103".to_string()),
            country: Some("US".to_string()),
        }),
        name: Some("Jenny Rosen".to_string()),
        phone: Some("555-0100".to_string()),
    }
}

pub fn shipping_method() -> ShippingMethod {
    ShippingMethod::new("UPS Ground", "ups-ground", 599, "usd")
}

/// Session data with every field populated.
pub fn full_session_data(config: &SessionConfig) -> SessionData {
    let mut data = SessionData::new();
    data.set_cart_total(4200, config);
    data.set_shipping_total(599, config);
    data.set_payment_method(Some(card_payment_method("pm_full")), config);
    data.set_shipping_information(Some(shipping_information()), config);
    data.set_shipping_method(Some(shipping_method()), config);
    data
}

pub fn payment_method_payload(id: &str) -> Vec<u8> {
    flow_result::encode_payment_methods_result(&PaymentMethodsResult {
        payment_method: Some(card_payment_method(id)),
    })
    .unwrap()
}

pub fn payment_method_signal(id: &str) -> FlowResult {
    FlowResult::ok(FlowKind::PaymentMethodSelection, payment_method_payload(id))
}

pub fn shipping_signal(data: &SessionData) -> FlowResult {
    FlowResult::ok(
        FlowKind::ShippingCollection,
        flow_result::encode_session_data(data).unwrap(),
    )
}

/// Writes a recorded signal file for the CLI.
pub fn write_signals(path: &Path, rows: &[(i32, &str, String)]) -> std::result::Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);

    wtr.write_record(["request_code", "outcome", "payload"])?;
    for (request_code, outcome, payload) in rows {
        wtr.write_record([request_code.to_string().as_str(), *outcome, payload.as_str()])?;
    }

    wtr.flush()?;
    Ok(())
}
