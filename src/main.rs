use clap::Parser;
use miette::{IntoDiagnostic, Result};
use paysession::application::session::PaymentSession;
use paysession::domain::config::SessionConfig;
use paysession::domain::customer::Customer;
use paysession::domain::flow::FlowKind;
use paysession::domain::ports::{CustomerAccessorRef, SessionPreferencesBox, SessionStateStoreBox};
use paysession::domain::session_data::SessionData;
use paysession::infrastructure::in_memory::{
    InMemoryCustomerAccessor, InMemorySessionPreferences, InMemorySessionStateStore,
};
use paysession::infrastructure::logging::{LoggingFlowLauncher, LoggingSessionListener};
use paysession::interfaces::csv::signal_reader::FlowSignalReader;
use serde::Serialize;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Recorded flow signals CSV file (request_code, outcome, payload)
    input: PathBuf,

    /// Customer the session belongs to. Without it no session can start.
    #[arg(long)]
    customer_id: Option<String>,

    /// Cart total in minor units, excluding shipping
    #[arg(long)]
    cart_total: Option<u64>,

    /// Require shipping information before the session is ready to charge
    /// (off unless given, unlike the library's `SessionConfig` default)
    #[arg(long)]
    shipping_info_required: bool,

    /// Require a shipping method before the session is ready to charge
    /// (off unless given, unlike the library's `SessionConfig` default)
    #[arg(long)]
    shipping_method_required: bool,

    /// Skip fetching the customer during init
    #[arg(long)]
    no_prefetch: bool,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,
}

#[derive(Serialize)]
struct SessionSummary<'a> {
    selected_payment_method_id: Option<String>,
    session: &'a SessionData,
}

fn in_memory_stores() -> (SessionPreferencesBox, SessionStateStoreBox) {
    (
        Box::new(InMemorySessionPreferences::new()),
        Box::new(InMemorySessionStateStore::new()),
    )
}

#[cfg(feature = "storage-rocksdb")]
fn open_stores(
    db_path: Option<PathBuf>,
) -> Result<(SessionPreferencesBox, SessionStateStoreBox)> {
    use paysession::infrastructure::rocksdb::RocksDBStore;

    match db_path {
        Some(path) => {
            let store = RocksDBStore::open(path).into_diagnostic()?;
            Ok((Box::new(store.clone()), Box::new(store)))
        }
        None => Ok(in_memory_stores()),
    }
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_stores(
    db_path: Option<PathBuf>,
) -> Result<(SessionPreferencesBox, SessionStateStoreBox)> {
    if db_path.is_some() {
        tracing::warn!(
            "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
        );
    }
    Ok(in_memory_stores())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "paysession=info".into()),
        )
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();
    let (preferences, state_store) = open_stores(cli.db_path)?;

    let accessor: CustomerAccessorRef = match &cli.customer_id {
        Some(id) => Arc::new(InMemoryCustomerAccessor::new(Customer::new(id.as_str()))),
        None => Arc::new(InMemoryCustomerAccessor::unavailable()),
    };

    let restored = match &cli.customer_id {
        Some(id) => state_store.load(id).await.into_diagnostic()?,
        None => None,
    };
    if restored.is_some() {
        tracing::info!("Restored saved session state");
    }

    let config = SessionConfig::builder()
        .shipping_info_required(cli.shipping_info_required)
        .shipping_method_required(cli.shipping_method_required)
        .build();

    let mut session = PaymentSession::new(
        accessor,
        preferences,
        Box::new(LoggingFlowLauncher::new(FlowKind::PaymentMethodSelection)),
        Box::new(LoggingFlowLauncher::new(FlowKind::ShippingCollection)),
    );
    session
        .init(
            Box::new(LoggingSessionListener),
            config,
            restored,
            !cli.no_prefetch,
        )
        .await
        .into_diagnostic()?;
    session.settle().await;

    if let Some(cart_total) = cli.cart_total {
        session.set_cart_total(cart_total);
    }

    // Replay flow completions
    let file = File::open(cli.input).into_diagnostic()?;
    let reader = FlowSignalReader::new(file);
    for signal in reader.signals() {
        match signal {
            Ok(signal) => {
                let request_code = signal.request_code;
                if !session.handle_flow_result(signal).await {
                    tracing::warn!("Unhandled flow signal for request code {}", request_code);
                }
                session.settle().await;
            }
            Err(e) => {
                tracing::error!("Error reading flow signal: {}", e);
            }
        }
    }

    session.on_completed().await;

    if let Some(id) = &cli.customer_id {
        state_store
            .save(id, session.session_data())
            .await
            .into_diagnostic()?;
    }

    let summary = SessionSummary {
        selected_payment_method_id: session.selected_payment_method_id(None).await,
        session: session.session_data(),
    };
    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer(&mut out, &summary).into_diagnostic()?;
    writeln!(out).into_diagnostic()?;

    Ok(())
}
