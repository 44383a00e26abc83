use std::fmt;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::file::DataFile;

/// Error type for StorePool operations.
#[derive(Debug)]
pub enum StoreError {
    /// The actor task has stopped; the data file is no longer reachable.
    ActorStopped,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::ActorStopped => write!(f, "Bookmark store actor has stopped"),
        }
    }
}

impl std::error::Error for StoreError {}

type StoreJob = Box<dyn FnOnce(&DataFile) + Send>;

/// Serialized access to the bookmark data file.
///
/// All operations run on a single actor task that owns the `DataFile`, one at a
/// time, so a load-mutate-persist cycle never interleaves with another one in
/// this process. There is no cross-process locking.
#[derive(Clone)]
pub struct StorePool {
    tx: mpsc::Sender<StoreJob>,
}

impl StorePool {
    /// Create a new StorePool, spawning the actor task.
    pub fn new(file: DataFile) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel::<StoreJob>(256);
        let handle = tokio::spawn(actor_loop(file, rx));
        (StorePool { tx }, handle)
    }

    /// Run a closure against the data file on the actor task.
    ///
    /// Returns `Err(StoreError::ActorStopped)` if the actor has shut down.
    pub async fn run<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&DataFile) -> T + Send + 'static,
        T: Send + 'static,
    {
        let (resp_tx, resp_rx) = oneshot::channel();

        let job: StoreJob = Box::new(move |file| {
            // The caller may have gone away; nothing to do then.
            let _ = resp_tx.send(f(file));
        });

        self.tx.send(job).await.map_err(|_| StoreError::ActorStopped)?;
        resp_rx.await.map_err(|_| StoreError::ActorStopped)
    }
}

async fn actor_loop(file: DataFile, mut rx: mpsc::Receiver<StoreJob>) {
    info!("Bookmark store actor started ({})", file.path().display());

    while let Some(job) = rx.recv().await {
        job(&file);
        debug!("Bookmark store job completed");
    }

    info!("Bookmark store actor stopped");
}
