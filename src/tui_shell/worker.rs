use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use anyhow::{Context, Result};

use crate::catalog::SharedCatalog;
use crate::resolver::{Expansion, PendingFetch, expand};

/// Runs expansions off the UI thread. Results come back in submission order;
/// the resolver decides which of them are still current.
pub(super) struct Worker {
    jobs: Sender<PendingFetch>,
    done: Receiver<(PendingFetch, Expansion)>,
}

impl Worker {
    pub(super) fn spawn(catalog: SharedCatalog) -> Result<Self> {
        let (jobs, job_rx) = mpsc::channel::<PendingFetch>();
        let (done_tx, done) = mpsc::channel();

        thread::Builder::new()
            .name("fitment-fetch".to_string())
            .spawn(move || {
                for fetch in job_rx {
                    let expansion = expand(&catalog, &fetch);
                    if done_tx.send((fetch, expansion)).is_err() {
                        break;
                    }
                }
            })
            .context("spawn fetch worker")?;

        Ok(Self { jobs, done })
    }

    pub(super) fn submit(&self, fetch: PendingFetch) {
        if self.jobs.send(fetch).is_err() {
            tracing::warn!("fetch worker has stopped");
        }
    }

    pub(super) fn try_recv(&self) -> Option<(PendingFetch, Expansion)> {
        match self.done.try_recv() {
            Ok(done) => Some(done),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    #[cfg(test)]
    pub(super) fn recv_timeout(
        &self,
        timeout: std::time::Duration,
    ) -> Option<(PendingFetch, Expansion)> {
        self.done.recv_timeout(timeout).ok()
    }
}
