//! Executors for the asynchronous half of activation.

use std::rc::Rc;

use futures::task::{LocalFutureObj, LocalSpawn, SpawnError};
use tokio::task::LocalSet;

/// Queues activation tasks onto a shared `tokio` [`LocalSet`].
///
/// Queued tasks run the next time the set is driven, for example through
/// [`LocalSet::block_on`] or [`LocalSet::run_until`]. Spawning works from any
/// context, including editor callbacks running outside the set.
#[derive(Debug, Clone)]
pub struct LocalSetSpawner {
    set: Rc<LocalSet>,
}

impl LocalSetSpawner {
    /// Spawns onto `set`.
    #[must_use]
    pub const fn new(set: Rc<LocalSet>) -> Self {
        Self { set }
    }
}

impl LocalSpawn for LocalSetSpawner {
    fn spawn_local_obj(&self, future: LocalFutureObj<'static, ()>) -> Result<(), SpawnError> {
        // Detached; completion is observed through the controller outcome.
        drop(self.set.spawn_local(future));
        Ok(())
    }
}
