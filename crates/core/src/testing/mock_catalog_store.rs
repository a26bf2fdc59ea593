//! Mock catalog store for testing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::Gate;
use crate::local::{CachedCatalog, CatalogStore, LocalCatalog, StoreError};

/// A store operation recorded for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreMessage {
    Delete,
    Insert(LocalCatalog, DateTime<Utc>),
    Retrieve,
}

/// Mock implementation of the CatalogStore trait.
///
/// Behaves like a working in-memory store unless told otherwise:
/// - Fail the next delete, insert or retrieve with a given error
/// - Seed or inspect the cached entry directly
/// - Track received messages in order for assertions
/// - Hold operations in flight with [`pause`](Self::pause)
#[derive(Debug, Clone)]
pub struct MockCatalogStore {
    cached: Arc<RwLock<Option<CachedCatalog>>>,
    messages: Arc<RwLock<Vec<StoreMessage>>>,
    next_delete_error: Arc<RwLock<Option<StoreError>>>,
    next_insert_error: Arc<RwLock<Option<StoreError>>>,
    next_retrieve_error: Arc<RwLock<Option<StoreError>>>,
    gate: Gate,
}

impl Default for MockCatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCatalogStore {
    /// Create a new empty mock store.
    pub fn new() -> Self {
        Self {
            cached: Arc::new(RwLock::new(None)),
            messages: Arc::new(RwLock::new(Vec::new())),
            next_delete_error: Arc::new(RwLock::new(None)),
            next_insert_error: Arc::new(RwLock::new(None)),
            next_retrieve_error: Arc::new(RwLock::new(None)),
            gate: Gate::new(),
        }
    }

    // =========================================================================
    // State
    // =========================================================================

    /// Replace the cached entry without recording a message.
    pub async fn set_cached(&self, cached: Option<CachedCatalog>) {
        *self.cached.write().await = cached;
    }

    /// Get the cached entry without recording a message.
    pub async fn cached(&self) -> Option<CachedCatalog> {
        self.cached.read().await.clone()
    }

    /// Get all received messages, oldest first.
    pub async fn messages(&self) -> Vec<StoreMessage> {
        self.messages.read().await.clone()
    }

    // =========================================================================
    // Failure Simulation
    // =========================================================================

    /// Make the next delete fail.
    pub async fn fail_next_delete(&self, error: StoreError) {
        *self.next_delete_error.write().await = Some(error);
    }

    /// Make the next insert fail.
    pub async fn fail_next_insert(&self, error: StoreError) {
        *self.next_insert_error.write().await = Some(error);
    }

    /// Make the next retrieve fail.
    pub async fn fail_next_retrieve(&self, error: StoreError) {
        *self.next_retrieve_error.write().await = Some(error);
    }

    // =========================================================================
    // Flow Control
    // =========================================================================

    /// Hold subsequent operations until [`resume`](Self::resume).
    pub fn pause(&self) {
        self.gate.pause();
    }

    /// Release held operations.
    pub fn resume(&self) {
        self.gate.resume();
    }

    /// Wait until at least `count` operations are being held.
    pub async fn wait_for_pending(&self, count: usize) {
        self.gate.wait_for_pending(count).await;
    }

    async fn receive(&self, message: StoreMessage) {
        self.messages.write().await.push(message);
        self.gate.pass().await;
    }
}

#[async_trait]
impl CatalogStore for MockCatalogStore {
    async fn delete_cached_catalog(&self) -> Result<(), StoreError> {
        self.receive(StoreMessage::Delete).await;

        if let Some(error) = self.next_delete_error.write().await.take() {
            return Err(error);
        }
        *self.cached.write().await = None;
        Ok(())
    }

    async fn insert(
        &self,
        catalog: &LocalCatalog,
        timestamp: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.receive(StoreMessage::Insert(catalog.clone(), timestamp))
            .await;

        if let Some(error) = self.next_insert_error.write().await.take() {
            return Err(error);
        }
        *self.cached.write().await = Some(CachedCatalog::new(catalog.clone(), timestamp));
        Ok(())
    }

    async fn retrieve(&self) -> Result<Option<CachedCatalog>, StoreError> {
        self.receive(StoreMessage::Retrieve).await;

        if let Some(error) = self.next_retrieve_error.write().await.take() {
            return Err(error);
        }
        Ok(self.cached.read().await.clone())
    }
}
