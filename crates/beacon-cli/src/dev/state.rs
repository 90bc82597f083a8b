//! Shared state for the development server.
//!
//! Everything except the shutdown signal is fixed at startup and read
//! without locks.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use beacon_bundler::SHELL_FILE_NAME;
use tokio::sync::watch;

use crate::config::DevSettings;
use crate::dev::mock::MockData;
use crate::dev::routes::RouteTable;
use crate::error::Result;

/// State shared by every request handler and socket task.
#[derive(Debug)]
pub struct DevState {
    out_dir: PathBuf,
    settings: DevSettings,
    mock: MockData,
    routes: RouteTable,
    /// Flipped to `true` once on shutdown. Each open socket holds a receiver,
    /// so the sender sees the channel close when the last socket is gone.
    shutdown: watch::Sender<bool>,
}

impl DevState {
    pub fn new(out_dir: impl Into<PathBuf>, settings: DevSettings) -> Result<Arc<Self>> {
        let mock = MockData::new(&settings.name, chrono::Utc::now())?;
        let (shutdown, _) = watch::channel(false);

        Ok(Arc::new(Self {
            out_dir: out_dir.into(),
            settings,
            mock,
            routes: RouteTable::standard(),
            shutdown,
        }))
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    pub fn shell_path(&self) -> PathBuf {
        self.out_dir.join(SHELL_FILE_NAME)
    }

    pub fn settings(&self) -> &DevSettings {
        &self.settings
    }

    pub fn mock(&self) -> &MockData {
        &self.mock
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Receiver for the shutdown signal. Hold it for the lifetime of a socket.
    pub fn subscribe_shutdown(&self) -> watch::Receiver<bool> {
        self.shutdown.subscribe()
    }

    /// Number of sockets currently open.
    pub fn open_sockets(&self) -> usize {
        self.shutdown.receiver_count()
    }

    /// Tell every open socket to close.
    pub fn close_sockets(&self) {
        self.shutdown.send_replace(true);
    }

    pub fn is_shutting_down(&self) -> bool {
        *self.shutdown.borrow()
    }

    /// Wait until every socket task has finished, at most `limit`.
    ///
    /// Returns `false` if sockets were still open when the limit passed.
    pub async fn wait_for_sockets(&self, limit: Duration) -> bool {
        tokio::time::timeout(limit, self.shutdown.closed())
            .await
            .is_ok()
    }
}
