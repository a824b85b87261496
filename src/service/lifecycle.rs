//! Startup phase: tasks registered here run once, in order, before the
//! process reports ready.

use crate::error::BootstrapError;
use futures::future::BoxFuture;
use tokio::sync::watch;
use tracing::{debug, error, info};

/// A unit of work that must finish before the process is ready.
pub trait StartupTask: Send + Sync {
    fn name(&self) -> &'static str;

    fn run(&self) -> BoxFuture<'_, Result<(), BootstrapError>>;
}

/// Cloneable view of the readiness flag.
#[derive(Clone)]
pub struct Readiness {
    rx: watch::Receiver<bool>,
}

impl Readiness {
    pub fn is_ready(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once startup has completed. Returns `false` if the lifecycle
    /// was dropped without becoming ready.
    pub async fn wait(&mut self) -> bool {
        self.rx.wait_for(|ready| *ready).await.is_ok()
    }
}

pub struct Lifecycle {
    tasks: Vec<Box<dyn StartupTask>>,
    ready_tx: watch::Sender<bool>,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        let (ready_tx, _) = watch::channel(false);
        Self {
            tasks: Vec::new(),
            ready_tx,
        }
    }

    pub fn register(&mut self, task: impl StartupTask + 'static) -> &mut Self {
        self.tasks.push(Box::new(task));
        self
    }

    pub fn readiness(&self) -> Readiness {
        Readiness {
            rx: self.ready_tx.subscribe(),
        }
    }

    /// Run every registered task in order. Consumes the lifecycle so the
    /// startup phase cannot be run twice. Stops at the first failure and
    /// leaves readiness unset.
    pub async fn run_startup(self) -> Result<Readiness, BootstrapError> {
        let readiness = self.readiness();
        for task in &self.tasks {
            debug!(task = task.name(), "running startup task");
            if let Err(e) = task.run().await {
                error!(task = task.name(), error = %e, "startup task failed");
                return Err(e);
            }
        }
        self.ready_tx.send_replace(true);
        info!(tasks = self.tasks.len(), "startup complete; ready");
        Ok(readiness)
    }
}
