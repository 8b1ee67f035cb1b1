use log::info;

use super::{ContactPoint, Injector, Result};
use crate::monitor::Point;

/// Logs every call at info level and never fails.
#[derive(Debug, Default)]
pub struct LogInjector {
    button: bool,
}

impl LogInjector {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Injector for LogInjector {
    fn driver_name(&self) -> &'static str {
        "log"
    }

    fn press_key(&mut self, key: char) -> Result<()> {
        info!("key {:?} down", key);
        Ok(())
    }

    fn release_key(&mut self, key: char) -> Result<()> {
        info!("key {:?} up", key);
        Ok(())
    }

    fn move_cursor(&mut self, to: Point) -> Result<()> {
        info!("cursor to ({}, {})", to.x, to.y);
        Ok(())
    }

    fn set_button(&mut self, pressed: bool) -> Result<()> {
        if pressed != self.button {
            info!("button {}", if pressed { "down" } else { "up" });
        }
        self.button = pressed;
        Ok(())
    }

    fn inject_contacts(&mut self, contacts: &[ContactPoint]) -> Result<()> {
        let summary = contacts
            .iter()
            .map(|c| format!("{}:{:?}@({}, {})", c.id.value(), c.phase, c.position.x, c.position.y))
            .collect::<Vec<_>>()
            .join(" ");

        info!("contacts [{}]", summary);
        Ok(())
    }
}
