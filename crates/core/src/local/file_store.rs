//! JSON-file catalog store served by a single worker task.
//!
//! Every operation is sent as a command over a channel to one
//! [`FileStoreWorker`], which executes commands strictly in the order they
//! were submitted. Inserts write a sibling temp file and rename it over the
//! cache file, so readers never observe a partial write.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use super::{CachedCatalog, CatalogStore, LocalCatalog, StoreError};

/// Default capacity of the command channel.
pub const DEFAULT_QUEUE_SIZE: usize = 64;

/// On-disk record.
#[derive(Debug, Serialize, Deserialize)]
struct CacheFile {
    catalog: LocalCatalog,
    timestamp: DateTime<Utc>,
}

type Reply<T> = oneshot::Sender<Result<T, StoreError>>;

enum StoreCommand {
    Delete {
        reply: Reply<()>,
    },
    Insert {
        catalog: LocalCatalog,
        timestamp: DateTime<Utc>,
        reply: Reply<()>,
    },
    Retrieve {
        reply: Reply<Option<CachedCatalog>>,
    },
}

/// Handle to a file-backed catalog store.
///
/// Cheap to clone; all clones feed the same worker and share its ordering.
#[derive(Debug, Clone)]
pub struct FileCatalogStore {
    tx: mpsc::Sender<StoreCommand>,
    path: PathBuf,
}

/// Background task that owns the cache file.
pub struct FileStoreWorker {
    rx: mpsc::Receiver<StoreCommand>,
    path: PathBuf,
}

impl std::fmt::Debug for StoreCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StoreCommand::Delete { .. } => "Delete",
            StoreCommand::Insert { .. } => "Insert",
            StoreCommand::Retrieve { .. } => "Retrieve",
        };
        f.write_str(name)
    }
}

impl FileCatalogStore {
    /// Create a store handle and its worker without starting the worker.
    ///
    /// Spawn the worker with `tokio::spawn(worker.run())`.
    pub fn new(path: impl Into<PathBuf>, queue_size: usize) -> (Self, FileStoreWorker) {
        let path = path.into();
        let (tx, rx) = mpsc::channel(queue_size);
        let store = Self {
            tx,
            path: path.clone(),
        };
        let worker = FileStoreWorker { rx, path };
        (store, worker)
    }

    /// Create a store and spawn its worker on the current tokio runtime.
    pub fn spawn(path: impl Into<PathBuf>) -> Self {
        let (store, worker) = Self::new(path, DEFAULT_QUEUE_SIZE);
        tokio::spawn(worker.run());
        store
    }

    /// Path of the cache file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn submit<T>(
        &self,
        make: impl FnOnce(Reply<T>) -> StoreCommand,
    ) -> Result<T, StoreError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(make(reply))
            .await
            .map_err(|_| StoreError::Unavailable("file store worker has stopped".to_string()))?;
        rx.await
            .map_err(|_| StoreError::Unavailable("file store worker dropped the reply".to_string()))?
    }
}

#[async_trait]
impl CatalogStore for FileCatalogStore {
    async fn delete_cached_catalog(&self) -> Result<(), StoreError> {
        self.submit(|reply| StoreCommand::Delete { reply }).await
    }

    async fn insert(
        &self,
        catalog: &LocalCatalog,
        timestamp: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let catalog = catalog.clone();
        self.submit(|reply| StoreCommand::Insert {
            catalog,
            timestamp,
            reply,
        })
        .await
    }

    async fn retrieve(&self) -> Result<Option<CachedCatalog>, StoreError> {
        self.submit(|reply| StoreCommand::Retrieve { reply }).await
    }
}

impl FileStoreWorker {
    /// Run the worker until every store handle has been dropped.
    pub async fn run(mut self) {
        info!("File catalog store started at {:?}", self.path);

        while let Some(command) = self.rx.recv().await {
            debug!("File store executing {:?}", command);
            // A dropped reply receiver means the caller gave up; the
            // operation has still been applied.
            match command {
                StoreCommand::Delete { reply } => {
                    let _ = reply.send(self.delete().await);
                }
                StoreCommand::Insert {
                    catalog,
                    timestamp,
                    reply,
                } => {
                    let _ = reply.send(self.insert(catalog, timestamp).await);
                }
                StoreCommand::Retrieve { reply } => {
                    let _ = reply.send(self.retrieve().await);
                }
            }
        }

        info!("File catalog store at {:?} shutting down", self.path);
    }

    async fn delete(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn insert(
        &self,
        catalog: LocalCatalog,
        timestamp: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let record = CacheFile { catalog, timestamp };
        let encoded = serde_json::to_vec(&record)
            .map_err(|e| StoreError::Io(std::io::Error::new(ErrorKind::InvalidData, e)))?;

        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, encoded).await?;
        if let Err(e) = fs::rename(&tmp_path, &self.path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(e.into());
        }

        Ok(())
    }

    async fn retrieve(&self) -> Result<Option<CachedCatalog>, StoreError> {
        let data = match fs::read(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let record: CacheFile = serde_json::from_slice(&data)
            .map_err(|e| StoreError::Corrupted(format!("{}: {}", self.path.display(), e)))?;

        Ok(Some(CachedCatalog::new(record.catalog, record.timestamp)))
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
