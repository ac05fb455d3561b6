//! Reminder repository backed by a dedicated store worker thread.
//!
//! # Responsibility
//! - Translate store outcomes into the `OperationResult` contract.
//! - Serialize every store access through one worker-owned store handle.
//! - Offer a fault-injection switch for tests.
//!
//! # Invariants
//! - Only the worker thread touches the store.
//! - Commands issued sequentially by one caller execute in issue order.
//! - Dropping the repository lets queued commands finish, then joins the
//!   worker.

use crate::db::open_db;
use crate::model::reminder::{ReminderId, ReminderRecord};
use crate::repo::reminder_store::{
    InMemoryReminderStore, RepoError, RepoResult, ReminderStore, SqliteReminderStore,
};
use crate::repo::result::{DataError, OperationResult, ReminderDataSource};
use log::{debug, error, info, warn};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::Instant;

const WORKER_THREAD_NAME: &str = "reminder-store";

type Reply<T> = Sender<RepoResult<T>>;

enum Command {
    GetAll(Reply<Vec<ReminderRecord>>),
    GetById(ReminderId, Reply<Option<ReminderRecord>>),
    Save(ReminderRecord, Reply<()>),
    DeleteAll(Reply<()>),
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::GetAll(_) => "get_all",
            Self::GetById(..) => "get_by_id",
            Self::Save(..) => "save",
            Self::DeleteAll(_) => "delete_all",
        }
    }
}

/// Repository mediating between callers and a reminder store.
pub struct ReminderRepository {
    commands: Option<Sender<Command>>,
    worker: Option<JoinHandle<()>>,
    return_error: AtomicBool,
}

impl ReminderRepository {
    /// Moves an already-built store onto a new worker thread.
    pub fn new<S>(store: S) -> RepoResult<Self>
    where
        S: ReminderStore + Send + 'static,
    {
        Self::spawn(move || Ok(store))
    }

    /// Starts a worker that builds its store on the worker thread.
    ///
    /// Store construction errors are returned to the caller and the worker
    /// exits.
    pub fn spawn<S, F>(open_store: F) -> RepoResult<Self>
    where
        S: ReminderStore + 'static,
        F: FnOnce() -> RepoResult<S> + Send + 'static,
    {
        let (command_tx, command_rx) = channel::<Command>();
        let (ready_tx, ready_rx) = channel::<RepoResult<()>>();

        let worker = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || match open_store() {
                Ok(mut store) => {
                    let _ = ready_tx.send(Ok(()));
                    run_worker(&mut store, command_rx);
                }
                Err(err) => {
                    let _ = ready_tx.send(Err(err));
                }
            })
            .map_err(|err| RepoError::WorkerUnavailable(err.to_string()))?;

        match ready_rx.recv() {
            Ok(Ok(())) => {
                info!("event=repo_start module=repo status=ok");
                Ok(Self {
                    commands: Some(command_tx),
                    worker: Some(worker),
                    return_error: AtomicBool::new(false),
                })
            }
            Ok(Err(err)) => {
                error!("event=repo_start module=repo status=error error_code=store_open_failed error={err}");
                let _ = worker.join();
                Err(err)
            }
            Err(_) => {
                error!("event=repo_start module=repo status=error error_code=worker_exited");
                let _ = worker.join();
                Err(RepoError::WorkerUnavailable(
                    "store worker exited during startup".to_string(),
                ))
            }
        }
    }

    /// Opens the SQLite database at `path` on the worker thread.
    pub fn open(path: impl Into<PathBuf>) -> RepoResult<Self> {
        let path = path.into();
        Self::spawn(move || SqliteReminderStore::try_new(open_db(path)?))
    }

    /// Starts a repository over an empty, non-durable in-memory store.
    pub fn in_memory() -> RepoResult<Self> {
        Self::new(InMemoryReminderStore::new())
    }

    /// Forces every operation to return `DataError::Unavailable` while set.
    pub fn set_return_error(&self, value: bool) {
        self.return_error.store(value, Ordering::SeqCst);
    }

    fn call<T>(&self, build: impl FnOnce(Reply<T>) -> Command) -> Result<T, DataError> {
        if self.return_error.load(Ordering::SeqCst) {
            warn!("event=repo_call module=repo status=error error_code=forced_failure");
            return Err(DataError::Unavailable);
        }

        let commands = self.commands.as_ref().ok_or(DataError::Unavailable)?;
        let (reply_tx, reply_rx) = channel();
        let command = build(reply_tx);
        let op = command.name();
        let started_at = Instant::now();

        if commands.send(command).is_err() {
            error!("event=repo_call module=repo status=error op={op} error_code=worker_stopped");
            return Err(DataError::Unavailable);
        }

        match reply_rx.recv() {
            Ok(Ok(value)) => {
                debug!(
                    "event=repo_call module=repo status=ok op={op} duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(value)
            }
            Ok(Err(err)) => {
                error!(
                    "event=repo_call module=repo status=error op={op} duration_ms={} error_code=store_failed error={err}",
                    started_at.elapsed().as_millis()
                );
                Err(err.into())
            }
            Err(_) => {
                error!("event=repo_call module=repo status=error op={op} error_code=worker_stopped");
                Err(DataError::Unavailable)
            }
        }
    }
}

impl ReminderDataSource for ReminderRepository {
    fn get_reminders(&self) -> OperationResult<Vec<ReminderRecord>> {
        self.call(Command::GetAll).into()
    }

    fn get_reminder(&self, id: &str) -> OperationResult<ReminderRecord> {
        let lookup_id = id.to_string();
        self.call(|reply| Command::GetById(lookup_id, reply))
            .and_then(|found| found.ok_or_else(|| DataError::NotFound(id.to_string())))
            .into()
    }

    fn save_reminder(&self, reminder: ReminderRecord) -> OperationResult<()> {
        self.call(|reply| Command::Save(reminder, reply)).into()
    }

    fn delete_all_reminders(&self) -> OperationResult<()> {
        self.call(Command::DeleteAll).into()
    }
}

impl Drop for ReminderRepository {
    fn drop(&mut self) {
        drop(self.commands.take());
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!("event=repo_stop module=repo status=error error_code=worker_panicked");
            }
        }
    }
}

fn run_worker<S: ReminderStore>(store: &mut S, commands: Receiver<Command>) {
    // The send side is dropped only when the repository goes away, so `recv`
    // drains everything already queued before the loop exits.
    while let Ok(command) = commands.recv() {
        match command {
            Command::GetAll(reply) => {
                let _ = reply.send(store.get_all());
            }
            Command::GetById(id, reply) => {
                let _ = reply.send(store.get_by_id(&id));
            }
            Command::Save(record, reply) => {
                let _ = reply.send(store.save(&record));
            }
            Command::DeleteAll(reply) => {
                let _ = reply.send(store.delete_all());
            }
        }
    }
    info!("event=repo_stop module=repo status=ok");
}

#[cfg(test)]
mod tests {
    use super::ReminderRepository;
    use crate::model::reminder::ReminderRecord;
    use crate::repo::reminder_store::{InMemoryReminderStore, RepoError};
    use crate::repo::result::{DataError, OperationResult, ReminderDataSource};
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn store_open_failure_is_returned_from_spawn() {
        let result = ReminderRepository::spawn(|| -> Result<InMemoryReminderStore, RepoError> {
            Err(RepoError::InvalidData("boom".to_string()))
        });
        assert!(matches!(result, Err(RepoError::InvalidData(_))));
    }

    #[test]
    fn forced_failure_can_be_toggled() {
        let repo = ReminderRepository::in_memory().expect("repo should start");
        repo.set_return_error(true);
        assert_eq!(
            repo.save_reminder(ReminderRecord::with_id("id1", "t")),
            OperationResult::Error(DataError::Unavailable)
        );

        repo.set_return_error(false);
        assert!(repo.save_reminder(ReminderRecord::with_id("id1", "t")).is_success());
        assert!(repo.get_reminder("id1").is_success());
    }

    #[test]
    fn concurrent_callers_share_one_serialized_store() {
        let repo = Arc::new(ReminderRepository::in_memory().expect("repo should start"));
        let handles = (0..4)
            .map(|worker| {
                let repo = Arc::clone(&repo);
                thread::spawn(move || {
                    for index in 0..25 {
                        let id = format!("w{worker}-{index}");
                        assert!(repo.save_reminder(ReminderRecord::with_id(id, "t")).is_success());
                    }
                })
            })
            .collect::<Vec<_>>();
        for handle in handles {
            handle.join().expect("writer thread should not panic");
        }

        let all = repo.get_reminders().success().expect("list should succeed");
        assert_eq!(all.len(), 100);
    }
}
