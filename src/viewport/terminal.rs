use super::{ListenerId, SimulatedViewport, ViewportPlatform, WidthListener};
use crate::config::ViewConfig;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// The controlling terminal as a viewport.
///
/// The terminal size is polled on an interval and converted from columns to
/// CSS pixels, so the same breakpoints apply as in a browser.
pub struct TerminalViewport {
    viewport: Arc<SimulatedViewport>,
    poller: JoinHandle<()>,
}

impl TerminalViewport {
    /// Start polling. Must be called from within a Tokio runtime.
    pub fn spawn(config: &ViewConfig) -> io::Result<Self> {
        let px_per_column = config.px_per_column.max(1);
        let (columns, _rows) = crossterm::terminal::size()?;
        let viewport = Arc::new(SimulatedViewport::new(columns_to_px(columns, px_per_column)));
        debug!("Terminal viewport: {} columns x {}px", columns, px_per_column);

        let poller = {
            let viewport = Arc::clone(&viewport);
            let period = Duration::from_millis(config.poll_interval_ms.max(10));
            tokio::spawn(async move {
                let mut ticker = tokio::time::interval(period);
                loop {
                    ticker.tick().await;
                    match crossterm::terminal::size() {
                        Ok((columns, _)) => {
                            viewport.set_width(columns_to_px(columns, px_per_column))
                        }
                        Err(e) => {
                            warn!("Terminal size unavailable, stopping resize polling: {}", e);
                            break;
                        }
                    }
                }
            })
        };

        Ok(Self { viewport, poller })
    }
}

impl ViewportPlatform for TerminalViewport {
    fn width(&self) -> u32 {
        self.viewport.width()
    }

    fn add_listener(&self, listener: WidthListener) -> ListenerId {
        self.viewport.add_listener(listener)
    }

    fn remove_listener(&self, id: ListenerId) {
        self.viewport.remove_listener(id)
    }
}

/// Terminal columns as CSS pixels, clamped at `u32::MAX`.
fn columns_to_px(columns: u16, px_per_column: u32) -> u32 {
    u32::from(columns).saturating_mul(px_per_column)
}

impl Drop for TerminalViewport {
    fn drop(&mut self) {
        self.poller.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_to_px() {
        assert_eq!(columns_to_px(112, 8), 896);
        assert_eq!(columns_to_px(113, 8), 904);
        assert_eq!(columns_to_px(0, 8), 0);
    }

    #[test]
    fn test_columns_to_px_saturates() {
        assert_eq!(columns_to_px(u16::MAX, u32::MAX), u32::MAX);
        assert_eq!(columns_to_px(200, u32::MAX / 100), u32::MAX);
    }
}
