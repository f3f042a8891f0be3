//! Discovery, confirmation and execution of a whole repair run.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, error, info, warn};

use crate::config::Settings;
use crate::executor::{ExecutionReport, Executor};
use crate::helpers::transport::Transport;
use crate::platform::ShortcutPlatform;
use crate::registry::RepairRegistry;
use crate::shortcut::{ParseOutcome, SkipReason};
use crate::steam::{IconResolver, MetadataLookup};

/// Tally of everything discovery looked at and why it was dropped.
#[derive(Debug, Default)]
pub struct DiscoveryReport {
    scanned: usize,
    skipped: HashMap<SkipReason, usize>,
    unreadable: usize,
    lookup_failures: usize,
    replaced_duplicates: usize,
}

impl DiscoveryReport {
    /// Shortcut files that were parsed (or failed to read).
    pub fn scanned(&self) -> usize {
        self.scanned
    }

    pub fn skipped(&self, reason: SkipReason) -> usize {
        self.skipped.get(&reason).copied().unwrap_or(0)
    }

    pub fn unreadable(&self) -> usize {
        self.unreadable
    }

    pub fn lookup_failures(&self) -> usize {
        self.lookup_failures
    }

    pub fn replaced_duplicates(&self) -> usize {
        self.replaced_duplicates
    }
}

#[derive(Debug)]
pub enum RunOutcome {
    /// No shortcut needed a repair.
    NothingToDo,
    /// The operator did not confirm.
    Declined,
    Completed(ExecutionReport),
}

pub struct Pipeline<'a> {
    platform: &'a dyn ShortcutPlatform,
    lookup: &'a dyn MetadataLookup,
    transport: &'a dyn Transport,
    settings: &'a Settings,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        platform: &'a dyn ShortcutPlatform,
        lookup: &'a dyn MetadataLookup,
        transport: &'a dyn Transport,
        settings: &'a Settings,
    ) -> Self {
        Self {
            platform,
            lookup,
            transport,
            settings,
        }
    }

    /// Regular files directly inside `search_root` that look like shortcuts,
    /// ordered by name so duplicate handling is reproducible.
    fn shortcut_files(&self, search_root: &Path) -> io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(search_root)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            if !self.platform.is_shortcut(&path) {
                debug!("Ignoring {}", path.display());
                continue;
            }
            files.push(path);
        }
        files.sort();
        Ok(files)
    }

    /// Scan `search_root` and collect every repairable shortcut.
    pub async fn discover(&self, search_root: &Path) -> Result<(RepairRegistry, DiscoveryReport)> {
        info!("Searching for valid Steam shortcuts in {}...", search_root.display());

        let files = self
            .shortcut_files(search_root)
            .with_context(|| format!("list shortcuts in {}", search_root.display()))?;

        let resolver = IconResolver::new(self.lookup, self.platform.icon_extension());
        let mut registry = RepairRegistry::new();
        let mut report = DiscoveryReport::default();

        for path in files {
            report.scanned += 1;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());

            let candidate = match self.platform.parse_shortcut(&path) {
                Ok(ParseOutcome::Ready(candidate)) => {
                    debug!("{name}: game {} has no icon at '{}'", candidate.game_id(), candidate.original_icon_ref());
                    candidate
                }
                Ok(ParseOutcome::Skipped(reason)) => {
                    *report.skipped.entry(reason).or_default() += 1;
                    let message = reason.describe(self.platform.shortcut_kind());
                    match reason {
                        SkipReason::AlreadyPresent => info!("{name}: {message}"),
                        SkipReason::NotSteamShortcut => warn!("{name}: {message}"),
                        SkipReason::InvalidFormat | SkipReason::UnfixableManualIntervention => {
                            error!("{name}: {message}")
                        }
                    }
                    continue;
                }
                Err(err) => {
                    report.unreadable += 1;
                    error!(
                        "{name}: Could not open the file. Make sure it's not in use and its permissions are set correctly. Skipping. ({err})"
                    );
                    continue;
                }
            };

            match resolver.resolve(candidate).await {
                Ok(item) => {
                    info!("{name}: Icon missing, valid Steam game. Will be redownloaded.");
                    if let Some(replaced) = registry.insert(item) {
                        report.replaced_duplicates += 1;
                        warn!(
                            "{name}: Replaces {} as the shortcut repaired for game {}.",
                            replaced.source_shortcut_path().display(),
                            replaced.game_id()
                        );
                    }
                }
                Err(err) => {
                    report.lookup_failures += 1;
                    error!("{name}: Could not fetch icon name from Steam API. Skipping. ({err})");
                }
            }
        }

        Ok((registry, report))
    }

    /// Full run. `confirm` receives the number of pending repairs and decides
    /// whether any network or write activity happens.
    pub async fn run<F>(&self, search_root: &Path, icon_output: Option<&Path>, confirm: F) -> Result<RunOutcome>
    where
        F: FnOnce(usize) -> io::Result<bool>,
    {
        let (registry, report) = self.discover(search_root).await?;
        debug!(
            "Scanned {} shortcuts: {} already fixed, {} unreadable, {} failed lookups, {} duplicates replaced",
            report.scanned(),
            report.skipped(SkipReason::AlreadyPresent),
            report.unreadable(),
            report.lookup_failures(),
            report.replaced_duplicates()
        );

        if registry.is_empty() {
            info!("No icons need to be redownloaded. Refer to the log above for any errors.");
            return Ok(RunOutcome::NothingToDo);
        }

        let pending = registry.len();
        for (game_id, item) in registry.entries() {
            debug!("Pending {game_id}: {} ({})", item.icon_token(), item.source_shortcut_path().display());
        }
        info!("Found {pending} missing icons.");

        if !confirm(pending).context("read confirmation")? {
            warn!("Cancelled.");
            return Ok(RunOutcome::Declined);
        }

        let icon_dir = self
            .platform
            .resolve_icon_directory(icon_output)
            .context("prepare icon directory")?;
        info!("Downloading {pending} icons to {icon_dir}...");

        let executor = Executor::new(
            self.platform,
            self.transport,
            self.settings.icon_base_url(),
            &icon_dir,
            search_root,
        )
        .with_concurrency(self.settings.concurrency());
        let report = executor.run(registry.into_items()).await;

        info!(
            "Downloading completed with {} errors. Refer to the above log for details.",
            report.error_count()
        );

        Ok(RunOutcome::Completed(report))
    }
}
