//! Persistence for users, administrators and scored transactions

use crate::models::{AdminAccount, RiskStats, TransactionRecord, UserProfile};
use dashmap::DashMap;
use parking_lot::RwLock;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Duplicate transaction id {0}")]
    DuplicateTransaction(Uuid),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Backing store for the dashboard and simulation workflow.
///
/// Implementations serialize their own writes; callers share one instance
/// behind an `Arc`.
pub trait TransactionStore: Send + Sync {
    fn find_user(&self, user_id: &str) -> StoreResult<Option<UserProfile>>;

    /// All users, or only the one matching `user_id`
    fn list_users(&self, user_id: Option<&str>) -> StoreResult<Vec<UserProfile>>;

    fn find_admin(&self, username: &str) -> StoreResult<Option<AdminAccount>>;

    fn insert_transaction(&self, record: TransactionRecord) -> StoreResult<TransactionRecord>;

    /// Most recent transactions first
    fn recent_transactions(&self, limit: usize) -> StoreResult<Vec<TransactionRecord>>;

    fn risk_stats(&self) -> StoreResult<RiskStats>;
}

/// In-process store
#[derive(Default)]
pub struct InMemoryStore {
    users: DashMap<String, UserProfile>,
    admins: DashMap<String, AdminAccount>,
    // Append order is insertion order; created_at ties keep it
    transactions: RwLock<Vec<TransactionRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with users and administrators
    pub fn seeded(users: Vec<UserProfile>, admins: Vec<AdminAccount>) -> Self {
        let store = Self::new();
        for user in users {
            store.upsert_user(user);
        }
        for admin in admins {
            store.upsert_admin(admin);
        }
        info!(
            "In-memory store seeded with {} users and {} admins",
            store.users.len(),
            store.admins.len()
        );
        store
    }

    pub fn upsert_user(&self, user: UserProfile) {
        self.users.insert(user.user_id.clone(), user);
    }

    pub fn upsert_admin(&self, admin: AdminAccount) {
        self.admins.insert(admin.username.clone(), admin);
    }
}

impl TransactionStore for InMemoryStore {
    fn find_user(&self, user_id: &str) -> StoreResult<Option<UserProfile>> {
        Ok(self.users.get(user_id).map(|entry| entry.value().clone()))
    }

    fn list_users(&self, user_id: Option<&str>) -> StoreResult<Vec<UserProfile>> {
        let mut users: Vec<UserProfile> = match user_id {
            Some(id) => self.find_user(id)?.into_iter().collect(),
            None => self.users.iter().map(|entry| entry.value().clone()).collect(),
        };
        users.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        Ok(users)
    }

    fn find_admin(&self, username: &str) -> StoreResult<Option<AdminAccount>> {
        Ok(self.admins.get(username).map(|entry| entry.value().clone()))
    }

    fn insert_transaction(&self, record: TransactionRecord) -> StoreResult<TransactionRecord> {
        let mut transactions = self.transactions.write();
        if transactions
            .iter()
            .any(|t| t.transaction_id == record.transaction_id)
        {
            return Err(StoreError::DuplicateTransaction(record.transaction_id));
        }
        debug!("Storing transaction {}", record.transaction_id);
        transactions.push(record.clone());
        Ok(record)
    }

    fn recent_transactions(&self, limit: usize) -> StoreResult<Vec<TransactionRecord>> {
        let transactions = self.transactions.read();
        let mut recent: Vec<TransactionRecord> = transactions.iter().rev().cloned().collect();
        // Stable sort keeps newest-inserted first among equal timestamps
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent.truncate(limit);
        Ok(recent)
    }

    fn risk_stats(&self) -> StoreResult<RiskStats> {
        let transactions = self.transactions.read();
        let mut stats = RiskStats::default();
        for record in transactions.iter() {
            stats.record(record.risk_level);
        }
        Ok(stats)
    }
}
