/*!
 * Explicit transaction scopes
 *
 * Every repository call takes a `&TxScope`. A scope owns one database
 * transaction plus an identity map, so an entity loaded twice within the same
 * scope is the same `Arc`. Dropping a scope without `commit` rolls back.
 */

use crate::errors::ServiceError;
use dashmap::DashMap;
use sea_orm::{
    AccessMode, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbBackend,
    TransactionTrait,
};
use std::any::{Any, TypeId};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxMode {
    ReadWrite,
    ReadOnly,
}

/// Per-scope cache of loaded entities keyed by model type and primary key.
#[derive(Default)]
pub struct IdentityMap {
    entries: DashMap<(TypeId, i64), Arc<dyn Any + Send + Sync>>,
}

impl IdentityMap {
    pub fn get<M>(&self, id: i64) -> Option<Arc<M>>
    where
        M: Any + Send + Sync,
    {
        self.entries
            .get(&(TypeId::of::<M>(), id))
            .and_then(|entry| entry.value().clone().downcast::<M>().ok())
    }

    /// Stores `model` under `id`, replacing any earlier entry, and returns the shared handle.
    pub fn register<M>(&self, id: i64, model: M) -> Arc<M>
    where
        M: Any + Send + Sync,
    {
        let shared = Arc::new(model);
        self.entries
            .insert((TypeId::of::<M>(), id), shared.clone() as Arc<dyn Any + Send + Sync>);
        shared
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

pub struct TxScope {
    txn: DatabaseTransaction,
    mode: TxMode,
    identity: IdentityMap,
    id: Uuid,
    started: Instant,
}

impl TxScope {
    /// Opens a read-write scope.
    pub async fn begin(db: &DatabaseConnection) -> Result<Self, ServiceError> {
        let txn = db.begin().await?;
        Ok(Self::new(txn, TxMode::ReadWrite))
    }

    /// Opens a read-only scope. SQLite has no per-transaction access mode, so
    /// there the read-only guarantee is enforced by [`TxScope::ensure_writable`] alone.
    pub async fn begin_read_only(db: &DatabaseConnection) -> Result<Self, ServiceError> {
        let txn = match db.get_database_backend() {
            DbBackend::Sqlite => db.begin().await?,
            _ => {
                db.begin_with_config(None, Some(AccessMode::ReadOnly))
                    .await?
            }
        };
        Ok(Self::new(txn, TxMode::ReadOnly))
    }

    fn new(txn: DatabaseTransaction, mode: TxMode) -> Self {
        let scope = Self {
            txn,
            mode,
            identity: IdentityMap::default(),
            id: Uuid::new_v4(),
            started: Instant::now(),
        };
        debug!(scope_id = %scope.id, mode = ?mode, "transaction scope opened");
        scope
    }

    pub fn conn(&self) -> &DatabaseTransaction {
        &self.txn
    }

    pub fn backend(&self) -> DbBackend {
        self.txn.get_database_backend()
    }

    pub fn identity(&self) -> &IdentityMap {
        &self.identity
    }

    pub fn is_read_only(&self) -> bool {
        self.mode == TxMode::ReadOnly
    }

    /// Rejects writes issued through a read-only scope.
    pub fn ensure_writable(&self) -> Result<(), ServiceError> {
        if self.is_read_only() {
            warn!(scope_id = %self.id, "write attempted in read-only transaction scope");
            return Err(ServiceError::InvalidOperation(
                "write attempted in a read-only transaction".to_string(),
            ));
        }
        Ok(())
    }

    pub async fn commit(self) -> Result<(), ServiceError> {
        let Self {
            txn,
            id,
            started,
            identity,
            ..
        } = self;
        match txn.commit().await {
            Ok(()) => {
                crate::db::record_transaction("commit", started.elapsed());
                debug!(
                    scope_id = %id,
                    cached_entities = identity.len(),
                    "transaction scope committed"
                );
                Ok(())
            }
            Err(e) => {
                crate::db::record_transaction("error", started.elapsed());
                Err(ServiceError::DatabaseError(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Widget(&'static str);

    #[derive(Debug, PartialEq)]
    struct Gadget(&'static str);

    #[test]
    fn identity_map_returns_same_arc() {
        let map = IdentityMap::default();
        let stored = map.register(1, Widget("a"));
        let found = map.get::<Widget>(1).unwrap();
        assert!(Arc::ptr_eq(&stored, &found));
    }

    #[test]
    fn identity_map_keys_by_type() {
        let map = IdentityMap::default();
        map.register(1, Widget("a"));
        assert!(map.get::<Gadget>(1).is_none());

        map.register(1, Gadget("b"));
        assert_eq!(map.len(), 2);
        assert_eq!(*map.get::<Gadget>(1).unwrap(), Gadget("b"));
    }

    #[test]
    fn register_replaces_previous_entry() {
        let map = IdentityMap::default();
        let first = map.register(7, Widget("old"));
        let second = map.register(7, Widget("new"));
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(*map.get::<Widget>(7).unwrap(), Widget("new"));
    }
}
