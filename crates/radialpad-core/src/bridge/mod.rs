use std::io;

use enum_iterator::Sequence;
use serde::{Deserialize, Serialize};

use crate::{
    contact::{ContactId, ContactPhase},
    monitor::{Compensation, Point, Rect},
};

pub mod dry_run;
pub mod record;
#[cfg(target_os = "linux")]
pub mod uinput;

pub use dry_run::LogInjector;
pub use record::{Call, Recorder};

pub type Result<T> = std::result::Result<T, Error>;

/// Delivers synthetic input to the focused application.
pub trait Injector {
    fn driver_name(&self) -> &'static str;
    fn press_key(&mut self, key: char) -> Result<()>;
    fn release_key(&mut self, key: char) -> Result<()>;
    fn move_cursor(&mut self, to: Point) -> Result<()>;
    fn set_button(&mut self, pressed: bool) -> Result<()>;
    /// Applies every contact update of one tick as a single frame.
    fn inject_contacts(&mut self, contacts: &[ContactPoint]) -> Result<()>;
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactPoint {
    pub id: ContactId,
    pub position: Point,
    pub phase: ContactPhase,
}

impl ContactPoint {
    pub const fn new(id: ContactId, position: Point, phase: ContactPhase) -> Self {
        Self {
            id,
            position,
            phase,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] io::Error),
    #[error("no key code for {0:?}")]
    UnsupportedKey(char),
    #[error("contact {0:?} has no slot")]
    UnknownContact(ContactId),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Sequence)]
#[serde(rename_all = "lowercase")]
pub enum Driver {
    /// Logs every call without touching the system.
    Log,
    #[cfg(target_os = "linux")]
    UInput,
}

impl Driver {
    /// Creates the injector. `desktop` bounds every monitor and sets the
    /// range of absolute axes.
    pub fn create_injector(self, desktop: Rect) -> Result<Box<dyn Injector>> {
        match self {
            Self::Log => Ok(Box::new(LogInjector::new())),
            #[cfg(target_os = "linux")]
            Self::UInput => Ok(Box::new(uinput::UInputInjector::new(desktop)?)),
        }
    }
}

impl Driver {
    /// Monitor compensation the driver's coordinate space needs.
    ///
    /// The log driver reports the coordinates a primary-relative host
    /// injector would receive. uinput devices span the whole desktop, so
    /// absolute pixels already land where they should.
    pub const fn compensation(self) -> Compensation {
        match self {
            Self::Log => Compensation::OppositeMonitor,
            #[cfg(target_os = "linux")]
            Self::UInput => Compensation::None,
        }
    }
}

impl Default for Driver {
    fn default() -> Self {
        Self::last().expect("No input drivers available")
    }
}
