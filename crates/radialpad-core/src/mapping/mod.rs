use enum_iterator::Sequence;
use serde::{Deserialize, Serialize};

use crate::{
    bridge::{self, Injector},
    contact::Steps,
    dispatch,
    monitor::{CoordinateMapper, Topology},
};

pub mod keyboard;
pub mod mouse;
pub mod touch;

pub use keyboard::KeyboardMode;
pub use mouse::MouseMode;
pub use touch::TouchMode;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Inject(#[from] bridge::Error),
    #[error("reference window has never been located")]
    NoWindow,
}

/// What a mode needs to turn emissions into injected input.
pub struct Surface<'a> {
    pub injector: &'a mut dyn Injector,
    pub mapper: &'a mut CoordinateMapper,
    pub topology: &'a dyn Topology,
}

/// Translates both limbs' emissions for a tick into injector calls.
pub trait Mode {
    fn name(&self) -> &'static str;

    /// Whether the palm button starts a cluster in this mode.
    fn palm_enabled(&self) -> bool {
        false
    }

    /// Delivers one tick. Called every tick, with or without emissions, so
    /// work left over from a failed call can be retried.
    ///
    /// Must tolerate the same emissions again after an error, since the
    /// caller repeats a tick that was not delivered.
    fn emit(&mut self, steps: &Steps, surface: &mut Surface) -> Result<()>;
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Sequence)]
#[serde(rename_all = "snake_case")]
pub enum ModeKind {
    #[default]
    Touch,
    Mouse,
    Keyboard,
}

impl ModeKind {
    pub fn create_mode(self, config: &dispatch::Config) -> Box<dyn Mode> {
        match self {
            Self::Touch => Box::new(TouchMode::new(config.palm)),
            Self::Mouse => Box::new(MouseMode::new()),
            Self::Keyboard => Box::new(KeyboardMode::new(config.keys)),
        }
    }
}
