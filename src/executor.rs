//! Fetch, store and rewrite for every pending repair.

use std::io;
use std::path::{Path, PathBuf};

use futures::{StreamExt, stream};
use tracing::{error, info};

use crate::helpers::icon_progress_bar;
use crate::helpers::transport::{Transport, TransportError};
use crate::platform::{IconDirectory, PersistError, ShortcutPlatform};
use crate::shortcut::RepairItem;

/// Why a single repair did not complete. Never fatal to the batch.
#[derive(thiserror::Error, Debug)]
pub enum RepairFailure {
    #[error("Failed to download icon. Response code was {0}.")]
    DownloadStatus(u16),
    #[error("Failed to download icon: {0}")]
    DownloadTransport(#[source] TransportError),
    #[error("Failed to write the icon to disk: {0}")]
    Write(#[source] PersistError),
    #[error("Failed to update application shortcut: {0}")]
    Rewrite(#[source] io::Error),
}

/// Outcome of one executor run.
#[derive(Debug, Default)]
pub struct ExecutionReport {
    repaired: Vec<(String, PathBuf)>,
    failures: Vec<(String, RepairFailure)>,
}

impl ExecutionReport {
    /// Game ids with the icon path that was written for them.
    pub fn repaired(&self) -> &[(String, PathBuf)] {
        &self.repaired
    }

    pub fn failures(&self) -> &[(String, RepairFailure)] {
        &self.failures
    }

    pub fn error_count(&self) -> usize {
        self.failures.len()
    }
}

pub struct Executor<'a> {
    platform: &'a dyn ShortcutPlatform,
    transport: &'a dyn Transport,
    base_url: &'a str,
    icon_dir: &'a IconDirectory,
    search_root: &'a Path,
    concurrency: usize,
}

impl<'a> Executor<'a> {
    pub fn new(
        platform: &'a dyn ShortcutPlatform,
        transport: &'a dyn Transport,
        base_url: &'a str,
        icon_dir: &'a IconDirectory,
        search_root: &'a Path,
    ) -> Self {
        Self {
            platform,
            transport,
            base_url,
            icon_dir,
            search_root,
            concurrency: 1,
        }
    }

    /// Allow up to `concurrency` repairs in flight. Items share no state, so
    /// the order they finish in does not matter.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// `{base}{game_id}/{icon_token}`; `base_url` ends in `/`.
    pub fn download_url(&self, item: &RepairItem) -> String {
        format!("{}{}/{}", self.base_url, item.game_id(), item.icon_token())
    }

    async fn repair(&self, item: &RepairItem) -> Result<PathBuf, RepairFailure> {
        let url = self.download_url(item);
        let response = self
            .transport
            .fetch(&url)
            .await
            .map_err(RepairFailure::DownloadTransport)?;

        if !response.is_success() {
            return Err(RepairFailure::DownloadStatus(response.status()));
        }

        let stored = self
            .platform
            .persist_icon(item, response.bytes(), self.icon_dir)
            .map_err(RepairFailure::Write)?;

        self.platform
            .rewrite_shortcut(item, self.search_root, &stored)
            .map_err(RepairFailure::Rewrite)?;

        Ok(stored)
    }

    pub async fn run(&self, items: impl IntoIterator<Item = RepairItem>) -> ExecutionReport {
        let items: Vec<RepairItem> = items.into_iter().collect();
        let pb = icon_progress_bar(items.len() as u64);

        let results: Vec<(String, Result<PathBuf, RepairFailure>)> = stream::iter(items)
            .map(|item| async move {
                let result = self.repair(&item).await;
                (item.game_id().to_string(), result)
            })
            .buffer_unordered(self.concurrency)
            .inspect(|(game_id, result)| {
                pb.suspend(|| match result {
                    Ok(_) => info!("{game_id}: Downloaded and saved successfully."),
                    Err(failure) => error!("{game_id}: {failure}"),
                });
                pb.inc(1);
            })
            .collect()
            .await;

        pb.finish_and_clear();

        let mut report = ExecutionReport::default();
        for (game_id, result) in results {
            match result {
                Ok(stored) => report.repaired.push((game_id, stored)),
                Err(failure) => report.failures.push((game_id, failure)),
            }
        }
        report
    }
}
