//! Configuration file watcher for hot reload.
//!
//! `notify` only wakes a reload task; the task debounces bursts of events,
//! reloads through the same path as startup (file, then CLI overrides, then
//! validation) and forwards configs that actually changed.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::{load_with_overrides, Overrides};
use crate::config::schema::EdgeConfig;

/// Editors tend to emit several events per save.
const DEBOUNCE: Duration = Duration::from_millis(100);

/// Reloads one config file, keeping CLI overrides in force.
pub struct ConfigWatcher {
    path: PathBuf,
    overrides: Overrides,
    last: Option<EdgeConfig>,
}

impl ConfigWatcher {
    pub fn new(path: &Path, overrides: Overrides) -> Self {
        Self {
            path: path.to_path_buf(),
            overrides,
            last: None,
        }
    }

    /// The config already live, so an unchanged file is not resent.
    pub fn with_current(mut self, config: EdgeConfig) -> Self {
        self.last = Some(config);
        self
    }

    /// Reload the file. Returns the new config only when it is valid and
    /// differs from the last one returned.
    pub fn reload(&mut self) -> Option<EdgeConfig> {
        let config = match load_with_overrides(Some(&self.path), &self.overrides) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(
                    path = ?self.path,
                    error = %e,
                    "Failed to reload config. Keeping current configuration."
                );
                return None;
            }
        };

        if self.last.as_ref() == Some(&config) {
            tracing::debug!(path = ?self.path, "Config unchanged after reload");
            return None;
        }

        self.last = Some(config.clone());
        Some(config)
    }

    /// Start watching. Updates arrive on the returned receiver for as long
    /// as the returned `notify` handle is kept alive.
    pub fn spawn(
        mut self,
    ) -> Result<(RecommendedWatcher, mpsc::UnboundedReceiver<EdgeConfig>), notify::Error> {
        let (events_tx, mut events_rx) = mpsc::unbounded_channel::<()>();
        let (updates_tx, updates_rx) = mpsc::unbounded_channel();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
                    let _ = events_tx.send(());
                }
                Ok(_) => {}
                Err(e) => tracing::error!(error = ?e, "Watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;
        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;
        tracing::info!(path = ?self.path, overrides = ?self.overrides, "Config watcher started");

        tokio::spawn(async move {
            while events_rx.recv().await.is_some() {
                tokio::time::sleep(DEBOUNCE).await;
                while events_rx.try_recv().is_ok() {}

                tracing::info!(path = ?self.path, "Config file change detected, reloading...");
                if let Some(config) = self.reload() {
                    if updates_tx.send(config).is_err() {
                        break;
                    }
                }
            }
        });

        Ok((watcher, updates_rx))
    }
}
