/*
 * job/queue.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Worker-pool job queue for template compilation.
 */

//! Worker-pool job queue.
//!
//! Jobs are sent over a bounded channel to a fixed number of worker tasks.
//! Each job carries a oneshot responder, so its result goes back to the
//! caller that submitted it and to no one else. The compiler itself is
//! blocking and runs on tokio's blocking thread pool.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc, oneshot};
use tokio::task::JoinHandle;
use xjst_error_reporting::CompileFailure;

use super::{CompileJobClient, CompiledTemplate, TemplateCompiler};
use crate::config::CompileConfig;

/// Queued-but-unstarted jobs allowed per worker before `submit` waits
const QUEUE_DEPTH_PER_WORKER: usize = 16;

/// Channel for sending one job result back to its submitter
type JobResponder = oneshot::Sender<Result<CompiledTemplate, CompileFailure>>;

/// One unit of work for a worker.
struct CompileJob {
    payload: String,
    config: CompileConfig,
    resp: JobResponder,
}

/// A pool of workers running a [`TemplateCompiler`].
///
/// Must be created inside a tokio runtime. Dropping the queue closes the
/// channel; workers finish the jobs already queued and then exit.
pub struct JobQueue {
    sender: mpsc::Sender<CompileJob>,
    workers: Vec<JoinHandle<()>>,
}

impl JobQueue {
    /// Start `workers` workers (at least one) sharing `compiler`.
    pub fn new(compiler: Arc<dyn TemplateCompiler>, workers: usize) -> Self {
        let workers = workers.max(1);
        let (sender, receiver) = mpsc::channel(workers * QUEUE_DEPTH_PER_WORKER);
        let receiver = Arc::new(Mutex::new(receiver));

        let handles = (0..workers)
            .map(|worker_id| {
                tokio::spawn(run_worker(
                    worker_id,
                    Arc::clone(&receiver),
                    Arc::clone(&compiler),
                ))
            })
            .collect();

        tracing::debug!(workers, "Started compile job queue");

        Self {
            sender,
            workers: handles,
        }
    }

    /// Number of workers in the pool.
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Stop accepting jobs and wait until every queued job has finished.
    pub async fn shutdown(self) {
        drop(self.sender);
        for handle in self.workers {
            if let Err(e) = handle.await {
                tracing::warn!("Compile worker ended abnormally: {}", e);
            }
        }
    }
}

async fn run_worker(
    worker_id: usize,
    receiver: Arc<Mutex<mpsc::Receiver<CompileJob>>>,
    compiler: Arc<dyn TemplateCompiler>,
) {
    loop {
        // The lock is only held while waiting for the next job
        let job = receiver.lock().await.recv().await;
        let Some(CompileJob {
            payload,
            config,
            resp,
        }) = job
        else {
            break;
        };

        tracing::debug!(worker_id, bytes = payload.len(), "Running compile job");

        let compiler = Arc::clone(&compiler);
        let result = tokio::task::spawn_blocking(move || compiler.compile(&payload, &config))
            .await
            .unwrap_or_else(|e| {
                Err(CompileFailure::unpositioned(format!(
                    "Compile worker {} failed: {}",
                    worker_id, e
                )))
            });

        if resp.send(result).is_err() {
            tracing::debug!(worker_id, "Compile job submitter went away before the result");
        }
    }

    tracing::debug!(worker_id, "Compile worker stopped");
}

#[async_trait]
impl CompileJobClient for JobQueue {
    async fn submit(
        &self,
        payload: String,
        config: &CompileConfig,
    ) -> Result<CompiledTemplate, CompileFailure> {
        let (resp, result) = oneshot::channel();
        let job = CompileJob {
            payload,
            config: config.clone(),
            resp,
        };

        self.sender
            .send(job)
            .await
            .map_err(|_| CompileFailure::unpositioned("Compile job queue is shut down"))?;

        result.await.map_err(|_| {
            CompileFailure::unpositioned("Compile job was dropped before it completed")
        })?
    }
}
