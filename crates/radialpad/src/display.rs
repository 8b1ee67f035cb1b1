use radialpad_core::monitor::{MonitorLayout, Rect, Result, Topology, TopologyError};

use crate::config::DisplayConfig;

/// Screen geometry read once from the config file.
#[derive(Debug, Clone)]
pub struct StaticTopology {
    window: Option<Rect>,
    layout: MonitorLayout,
}

impl StaticTopology {
    pub fn new(config: &DisplayConfig) -> Self {
        let window = config.reference_window.or_else(|| {
            config
                .monitors
                .primary()
                .or_else(|| config.monitors.monitors().first())
                .map(|m| m.rect)
        });

        Self {
            window,
            layout: config.monitors.clone(),
        }
    }

    /// Smallest rectangle covering every monitor and the reference window.
    pub fn desktop(&self) -> Rect {
        let rects = self
            .layout
            .monitors()
            .iter()
            .map(|m| m.rect)
            .chain(self.window);

        rects
            .reduce(|a, b| {
                let left = a.left.min(b.left);
                let top = a.top.min(b.top);
                Rect::new(
                    left,
                    top,
                    a.right().max(b.right()) - left,
                    a.bottom().max(b.bottom()) - top,
                )
            })
            .unwrap_or_default()
    }
}

impl Topology for StaticTopology {
    fn reference_window(&self) -> Result<Rect> {
        self.window
            .ok_or_else(|| TopologyError::WindowUnavailable("no window or monitor configured".into()))
    }

    fn monitors(&self) -> Result<MonitorLayout> {
        if self.layout.is_empty() {
            return Err(TopologyError::MonitorsUnavailable("no monitors configured".into()));
        }

        Ok(self.layout.clone())
    }
}
