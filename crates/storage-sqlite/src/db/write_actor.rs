use super::DbPool;
use crate::errors::StorageError;
use diesel::SqliteConnection;
use jurisdesk_core::errors::{DatabaseError, Error, Result};
use std::any::Any;
use tokio::sync::{mpsc, oneshot};

type Reply = Box<dyn Any + Send + 'static>;

// A write job runs on the actor's connection inside one immediate transaction.
type Job = Box<dyn FnOnce(&mut SqliteConnection) -> Result<Reply> + Send + 'static>;

type Envelope = (Job, oneshot::Sender<Result<Reply>>);

/// Bound of the job queue.
const QUEUE_SIZE: usize = 1024;

/// Handle for sending write jobs to the writer actor.
///
/// SQLite allows one writer at a time; every write in the process goes
/// through this handle so writes never contend for the database lock.
#[derive(Clone)]
pub struct WriteHandle {
    tx: mpsc::Sender<Envelope>,
}

fn writer_gone() -> Error {
    Error::Database(DatabaseError::Internal(
        "Database writer is not running".to_string(),
    ))
}

impl WriteHandle {
    /// Runs `job` on the writer connection and returns its result.
    ///
    /// The job is rolled back if it returns an error.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let (ret_tx, ret_rx) = oneshot::channel();
        let job: Job = Box::new(move |conn| job(conn).map(|value| Box::new(value) as Reply));

        self.tx
            .send((job, ret_tx))
            .await
            .map_err(|_| writer_gone())?;

        let reply = ret_rx.await.map_err(|_| writer_gone())??;
        reply.downcast::<T>().map(|boxed| *boxed).map_err(|_| {
            Error::Database(DatabaseError::Internal(
                "Writer returned an unexpected result type".to_string(),
            ))
        })
    }
}

/// Spawns the writer actor on the current Tokio runtime.
///
/// The actor takes one connection from `pool` for its whole lifetime and
/// processes jobs in arrival order. It stops once every handle is dropped.
pub fn spawn_writer(pool: &DbPool) -> Result<WriteHandle> {
    let mut conn = pool.get().map_err(StorageError::from)?;
    let (tx, mut rx) = mpsc::channel::<Envelope>(QUEUE_SIZE);

    tokio::spawn(async move {
        while let Some((job, reply_tx)) = rx.recv().await {
            let result: Result<Reply> = conn
                .immediate_transaction::<_, StorageError, _>(|c| job(c).map_err(StorageError::from))
                .map_err(Error::from);

            // The caller may have given up waiting.
            let _ = reply_tx.send(result);
        }
    });

    Ok(WriteHandle { tx })
}
