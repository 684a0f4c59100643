use super::DbPool;
use crate::errors::StorageError;
use diesel::SqliteConnection;
use goalpost_core::errors::{DatabaseError, Error, Result};
use log::debug;
use std::any::Any;
use tokio::sync::{mpsc, oneshot};

/// Capacity of the job queue in front of the writer.
const WRITE_QUEUE_CAPACITY: usize = 1024;

// A job receives the writer's connection, already inside a transaction.
type Job<T> = Box<dyn FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static>;

type AnyResult = Result<Box<dyn Any + Send + 'static>>;

/// Handle for sending jobs to the writer actor.
///
/// Cloning is cheap; every clone feeds the same single writer, so writes from
/// all clones are totally ordered.
#[derive(Clone)]
pub struct WriteHandle {
    // Each job is boxed with its return type erased; the reply comes back on a
    // oneshot channel and is downcast in `exec`.
    #[allow(clippy::type_complexity)]
    tx: mpsc::Sender<(Job<Box<dyn Any + Send + 'static>>, oneshot::Sender<AnyResult>)>,
}

impl WriteHandle {
    /// Executes a database job on the writer actor's dedicated connection.
    ///
    /// The job runs inside an immediate transaction: it either commits as a
    /// whole or, if it returns `Err`, is rolled back. Dropping the returned
    /// future does not cancel a job that was already queued.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static + Any,
    {
        let (ret_tx, ret_rx) = oneshot::channel();

        self.tx
            .send((
                Box::new(move |c| job(c).map(|v| Box::new(v) as Box<dyn Any + Send>)),
                ret_tx,
            ))
            .await
            .map_err(|_| {
                Error::Database(DatabaseError::WriterUnavailable(
                    "writer queue is closed".to_string(),
                ))
            })?;

        let boxed = ret_rx.await.map_err(|_| {
            Error::Database(DatabaseError::WriterUnavailable(
                "writer dropped the reply without a result".to_string(),
            ))
        })??;

        boxed.downcast::<T>().map(|value| *value).map_err(|_| {
            Error::Unexpected("writer returned a value of an unexpected type".to_string())
        })
    }
}

/// Spawns a background Tokio task that acts as the single writer to the database.
///
/// The connection is taken from the pool before spawning so a pool that cannot
/// hand out connections fails here, at startup, rather than inside the task.
/// Must be called from within a Tokio runtime.
pub fn spawn_writer(pool: DbPool) -> Result<WriteHandle> {
    let mut conn = pool.get().map_err(StorageError::from)?;

    let (tx, mut rx) = mpsc::channel::<(
        Job<Box<dyn Any + Send + 'static>>,
        oneshot::Sender<AnyResult>,
    )>(WRITE_QUEUE_CAPACITY);

    tokio::spawn(async move {
        while let Some((job, reply_tx)) = rx.recv().await {
            // StorageError carries core errors through the transaction untouched,
            // so callers still see UsernameTaken and friends.
            let result: AnyResult = conn
                .immediate_transaction::<_, StorageError, _>(|c| job(c).map_err(StorageError::from))
                .map_err(Error::from);

            if let Err(e) = &result {
                debug!("Write job rolled back: {}", e);
            }

            // The caller may have gone away; the transaction is settled either way.
            let _ = reply_tx.send(result);
        }
        debug!("Writer actor stopped: all write handles were dropped");
    });

    Ok(WriteHandle { tx })
}
