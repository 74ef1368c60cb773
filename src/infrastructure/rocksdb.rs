use crate::domain::ports::{SessionPreferences, SessionStateStore};
use crate::domain::session_data::SessionData;
use crate::error::{Result, SessionError};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, Options};
use std::path::Path;
use std::sync::Arc;

/// Column Family for remembered payment-method selections.
pub const CF_PREFERENCES: &str = "preferences";
/// Column Family for suspended session state.
pub const CF_SESSION_STATE: &str = "session_state";

/// A persistent store implementation using RocksDB.
///
/// Keeps payment-method preferences and suspended session snapshots in
/// separate Column Families, both keyed by customer id.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the required column families exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_preferences = ColumnFamilyDescriptor::new(CF_PREFERENCES, Options::default());
        let cf_session_state = ColumnFamilyDescriptor::new(CF_SESSION_STATE, Options::default());

        let db = DB::open_cf_descriptors(&opts, path, vec![cf_preferences, cf_session_state])?;

        Ok(Self { db: Arc::new(db) })
    }

    fn column_family(&self, name: &str) -> Result<&ColumnFamily> {
        self.db.cf_handle(name).ok_or_else(|| {
            SessionError::InternalError(Box::new(std::io::Error::other(format!(
                "Column family '{}' not found",
                name
            ))))
        })
    }
}

#[async_trait]
impl SessionPreferences for RocksDBStore {
    async fn selected_payment_method_id(&self, customer_id: &str) -> Result<Option<String>> {
        let cf = self.column_family(CF_PREFERENCES)?;

        match self.db.get_cf(&cf, customer_id.as_bytes())? {
            Some(bytes) => {
                let id = String::from_utf8(bytes).map_err(|e| {
                    SessionError::InternalError(Box::new(std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        format!("Invalid payment method id: {}", e),
                    )))
                })?;
                Ok(Some(id))
            }
            None => Ok(None),
        }
    }

    async fn save_selected_payment_method_id(
        &self,
        customer_id: &str,
        payment_method_id: &str,
    ) -> Result<()> {
        let cf = self.column_family(CF_PREFERENCES)?;
        self.db
            .put_cf(&cf, customer_id.as_bytes(), payment_method_id.as_bytes())?;
        Ok(())
    }
}

#[async_trait]
impl SessionStateStore for RocksDBStore {
    async fn save(&self, key: &str, data: &SessionData) -> Result<()> {
        let cf = self.column_family(CF_SESSION_STATE)?;
        self.db.put_cf(&cf, key.as_bytes(), data.to_bytes()?)?;
        Ok(())
    }

    async fn load(&self, key: &str) -> Result<Option<SessionData>> {
        let cf = self.column_family(CF_SESSION_STATE)?;

        self.db
            .get_cf(&cf, key.as_bytes())?
            .map(|bytes| SessionData::from_bytes(&bytes))
            .transpose()
    }
}
