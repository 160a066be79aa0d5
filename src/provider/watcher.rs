//! Pool directory watcher for hot reload.

use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};

use super::DirectoryProvider;

/// Watches a [`DirectoryProvider`]'s directory and reloads it on change.
pub struct PoolWatcher {
    provider: DirectoryProvider,
    poll_interval: Duration,
}

impl PoolWatcher {
    pub fn new(provider: DirectoryProvider, poll_interval: Duration) -> Self {
        Self {
            provider,
            poll_interval,
        }
    }

    /// Start watching in the background.
    ///
    /// Watching stops when the returned handle is dropped.
    pub fn start(self) -> Result<RecommendedWatcher, notify::Error> {
        let provider = self.provider.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if triggers_reload(&event) {
                        tracing::info!(paths = ?event.paths, "Pool directory change detected, reloading");
                        match provider.reload() {
                            Ok(count) => tracing::info!(documents = count, "Pool documents reloaded"),
                            Err(e) => tracing::error!(
                                error = %e,
                                "Failed to reload pool documents. Keeping current snapshot."
                            ),
                        }
                    }
                }
                Err(e) => tracing::error!(error = ?e, "Watch error"),
            },
            Config::default().with_poll_interval(self.poll_interval),
        )?;

        watcher.watch(self.provider.directory(), RecursiveMode::NonRecursive)?;

        tracing::info!(directory = %self.provider.directory().display(), "Pool watcher started");
        Ok(watcher)
    }
}

fn triggers_reload(event: &Event) -> bool {
    event.kind.is_modify() || event.kind.is_create() || event.kind.is_remove()
}
