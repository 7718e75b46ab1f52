pub mod debounce;
pub mod graph;
pub mod rows;
pub mod worker;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{mpsc, watch};
use uuid::Uuid;

use crate::config::SyncConfig;
use debounce::{DebounceState, Debouncer};
use rows::{SheetRecord, SheetRow, SheetSnapshot};

/// The five worksheets mirrored to the remote workbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Table {
    Projects,
    Resources,
    ProjectLinks,
    TimeEntries,
    ProjectManagers,
}

impl Table {
    pub const ALL: [Table; 5] = [
        Table::Projects,
        Table::Resources,
        Table::ProjectLinks,
        Table::TimeEntries,
        Table::ProjectManagers,
    ];

    pub fn sheet_name(self) -> &'static str {
        match self {
            Table::Projects => "Projects",
            Table::Resources => "Resources",
            Table::ProjectLinks => "ProjectLinks",
            Table::TimeEntries => "TimeEntries",
            Table::ProjectManagers => "ProjectManagers",
        }
    }

    /// Header row, in column order. `ID` is always first.
    pub fn headers(self) -> &'static [&'static str] {
        match self {
            Table::Projects => &[
                "ID",
                "Name",
                "Description",
                "Status",
                "StartDate",
                "EndDate",
                "CreatedBy",
            ],
            Table::Resources => &[
                "ID",
                "Name",
                "Email",
                "Role",
                "Department",
                "ManagerID",
                "Skills",
                "Avatar",
            ],
            Table::ProjectLinks => &[
                "ID",
                "ProjectID",
                "ResourceID",
                "ManagerID",
                "AllocationPercentage",
            ],
            Table::TimeEntries => &[
                "ID",
                "ResourceID",
                "ProjectID",
                "ManagerID",
                "Date",
                "ForecastHours",
                "ActualHours",
                "Notes",
            ],
            Table::ProjectManagers => &["ID", "Name", "Email", "Department", "Avatar"],
        }
    }
}

#[derive(Debug)]
pub enum SyncError {
    NotConnected,
    Api { status: u16, message: String },
    Transport(String),
    Malformed(String),
}

impl std::fmt::Display for SyncError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncError::NotConnected => write!(f, "Mirror is not connected"),
            SyncError::Api { status, message } => write!(f, "Mirror API error ({status}): {message}"),
            SyncError::Transport(msg) => write!(f, "Mirror transport error: {msg}"),
            SyncError::Malformed(msg) => write!(f, "Malformed mirror response: {msg}"),
        }
    }
}

impl std::error::Error for SyncError {}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        SyncError::Transport(err.to_string())
    }
}

/// The external copy of the five tables. It never owns the data; the
/// in-memory store wins except right after a pull.
#[async_trait]
pub trait Mirror: Send + Sync {
    fn name(&self) -> &str;
    async fn connect(&self) -> Result<(), SyncError>;
    /// Upsert keyed by the row's `ID` column.
    async fn push_record(&self, table: Table, record: SheetRow) -> Result<(), SyncError>;
    async fn remove_record(&self, table: Table, id: Uuid) -> Result<(), SyncError>;
    async fn push_all(&self, sheets: SheetSnapshot) -> Result<(), SyncError>;
    async fn pull_all(&self) -> Result<SheetSnapshot, SyncError>;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SyncHealth {
    pub configured: bool,
    pub connected: bool,
    pub auto_sync: bool,
    pub last_sync: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub push: DebounceState,
}

/// One queued per-record write.
#[derive(Debug)]
enum MirrorOp {
    Upsert(Table, SheetRow),
    Remove(Table, Uuid),
}

/// Propagates committed local mutations to the mirror without ever failing
/// them. Failures only show up in [`SyncHealth`].
///
/// Per-record writes go through one queue with a single consumer, so the
/// mirror applies them in commit order.
pub struct SyncDispatcher {
    mirror: Option<Arc<dyn Mirror>>,
    health: Arc<watch::Sender<SyncHealth>>,
    debouncer: Debouncer,
    pull_interval: Duration,
    queue: mpsc::UnboundedSender<MirrorOp>,
    consumer: Mutex<Option<mpsc::UnboundedReceiver<MirrorOp>>>,
}

impl SyncDispatcher {
    pub fn new(mirror: Option<Arc<dyn Mirror>>, config: &SyncConfig) -> Self {
        let health = SyncHealth {
            configured: mirror.is_some(),
            auto_sync: config.auto_sync,
            ..Default::default()
        };
        let (queue, consumer) = mpsc::unbounded_channel();
        Self {
            mirror,
            health: Arc::new(watch::Sender::new(health)),
            debouncer: Debouncer::new(config.debounce),
            pull_interval: config.pull_interval,
            queue,
            consumer: Mutex::new(Some(consumer)),
        }
    }

    pub fn disabled() -> Self {
        Self::new(None, &SyncConfig::default())
    }

    pub fn mirror(&self) -> Result<&Arc<dyn Mirror>, SyncError> {
        self.mirror.as_ref().ok_or(SyncError::NotConnected)
    }

    pub fn debouncer(&self) -> &Debouncer {
        &self.debouncer
    }

    pub fn pull_interval(&self) -> Duration {
        self.pull_interval
    }

    pub fn health(&self) -> SyncHealth {
        SyncHealth {
            push: self.debouncer.state(),
            ..self.health.borrow().clone()
        }
    }

    pub fn is_connected(&self) -> bool {
        self.health.borrow().connected
    }

    pub fn auto_sync(&self) -> bool {
        self.health.borrow().auto_sync
    }

    pub fn set_auto_sync(&self, enabled: bool) {
        self.health.send_modify(|h| h.auto_sync = enabled);
        if !enabled {
            self.debouncer.cancel();
        }
    }

    pub async fn connect(&self) -> Result<(), SyncError> {
        let mirror = self.mirror()?;
        match mirror.connect().await {
            Ok(()) => {
                tracing::info!("Connected to {} mirror", mirror.name());
                self.start_consumer(mirror.clone());
                self.health.send_modify(|h| h.connected = true);
                self.record_success();
                Ok(())
            }
            Err(e) => {
                self.health.send_modify(|h| h.connected = false);
                self.record_failure(&e);
                Err(e)
            }
        }
    }

    pub(crate) fn record_success(&self) {
        record_success(&self.health);
    }

    pub(crate) fn record_failure(&self, err: &SyncError) {
        record_failure(&self.health, err);
    }

    /// A record was created or changed locally.
    pub fn upserted<R: SheetRecord>(&self, record: &R) {
        self.enqueue(MirrorOp::Upsert(R::TABLE, record.to_row()));
    }

    /// A record was removed locally.
    pub fn removed(&self, table: Table, id: Uuid) {
        self.enqueue(MirrorOp::Remove(table, id));
    }

    fn enqueue(&self, op: MirrorOp) {
        if self.mirror.is_none() || !self.is_connected() {
            return;
        }
        if self.queue.send(op).is_err() {
            tracing::warn!("Mirror write queue is closed");
            return;
        }
        if self.auto_sync() {
            self.debouncer.touch();
        }
    }

    /// Spawn the queue consumer once; later connects reuse it.
    fn start_consumer(&self, mirror: Arc<dyn Mirror>) {
        let Some(ops) = self.consumer.lock().ok().and_then(|mut slot| slot.take()) else {
            return;
        };
        tokio::spawn(drain(mirror, self.health.clone(), ops));
    }
}

async fn drain(
    mirror: Arc<dyn Mirror>,
    health: Arc<watch::Sender<SyncHealth>>,
    mut ops: mpsc::UnboundedReceiver<MirrorOp>,
) {
    while let Some(op) = ops.recv().await {
        let (name, result) = match op {
            MirrorOp::Upsert(table, row) => ("push", mirror.push_record(table, row).await),
            MirrorOp::Remove(table, id) => ("remove", mirror.remove_record(table, id).await),
        };
        match result {
            Ok(()) => record_success(&health),
            Err(e) => {
                tracing::warn!("Mirror {name} failed: {e}");
                record_failure(&health, &e);
            }
        }
    }
    tracing::debug!("Mirror write queue closed");
}

fn record_success(health: &watch::Sender<SyncHealth>) {
    health.send_modify(|h| {
        h.last_sync = Some(Utc::now());
        h.last_error = None;
    });
}

fn record_failure(health: &watch::Sender<SyncHealth>, err: &SyncError) {
    health.send_modify(|h| h.last_error = Some(err.to_string()));
}
