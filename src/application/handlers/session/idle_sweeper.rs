//! Background eviction of idle sessions.
//!
//! | Setting | Default | Meaning |
//! |---------|---------|---------|
//! | `sweep_interval` | 60s | How often the registry is scanned |
//! | `max_idle` | 1h | Idle time after which a session is dropped |

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time;

use super::SessionRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdleSweeperConfig {
    pub sweep_interval: Duration,
    pub max_idle: Duration,
}

impl Default for IdleSweeperConfig {
    fn default() -> Self {
        Self {
            sweep_interval: Duration::from_secs(60),
            max_idle: Duration::from_secs(3600),
        }
    }
}

pub struct IdleSweeper {
    registry: Arc<SessionRegistry>,
    config: IdleSweeperConfig,
}

impl IdleSweeper {
    pub fn new(registry: Arc<SessionRegistry>, config: IdleSweeperConfig) -> Self {
        Self { registry, config }
    }

    /// Sweeps on every interval tick until `shutdown` turns true.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = time::interval(self.config.sweep_interval);
        // the first tick completes immediately
        interval.tick().await;

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        tracing::debug!("idle sweeper stopped");
                        return;
                    }
                }
                _ = interval.tick() => {
                    self.sweep_once().await;
                }
            }
        }
    }

    /// One eviction pass; returns the number of sessions dropped.
    pub async fn sweep_once(&self) -> usize {
        self.registry.evict_idle(self.config.max_idle).await
    }
}
