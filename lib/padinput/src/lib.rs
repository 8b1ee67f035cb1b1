#![deny(clippy::all)]
use enum_iterator::{cardinality, Sequence};
use serde::{Deserialize, Serialize};

pub const STICK_RANGE: StickRange = StickRange {
    min: -1.0,
    max: 1.0,
};

pub struct StickRange {
    pub min: f64,
    pub max: f64,
}

impl StickRange {
    pub fn clamp(&self, n: f64) -> f64 {
        n.clamp(self.min, self.max)
    }
}

/// One of the two independent stick/button groups.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Sequence)]
#[serde(rename_all = "snake_case")]
pub enum Limb {
    Left,
    Right,
}

impl Limb {
    pub const COUNT: usize = cardinality::<Self>();

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
        }
    }

    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Normalized analog stick position. Both axes are in `[-1, 1]` with up and
/// right positive.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Stick {
    pub x: f64,
    pub y: f64,
}

impl Stick {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Builds a stick from raw axis values, clamping them into range.
    pub fn clamped(x: f64, y: f64) -> Self {
        Self::new(STICK_RANGE.clamp(x), STICK_RANGE.clamp(y))
    }

    #[must_use]
    pub fn is_centered(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    #[cfg(feature = "nalgebra")]
    pub fn to_vector(self) -> nalgebra::Vector2<f64> {
        nalgebra::Vector2::<f64>::from(self)
    }
}

#[cfg(feature = "nalgebra")]
impl From<Stick> for nalgebra::Vector2<f64> {
    fn from(stick: Stick) -> Self {
        Self::new(stick.x, stick.y)
    }
}


/// Buttons that drive a single limb.
///
/// `primary` holds a contact (a bumper), `lock` freezes it to the held
/// direction (a trigger) and `palm` swaps the single contact for a cluster
/// (a stick click).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Buttons {
    pub primary: bool,
    pub lock: bool,
    pub palm: bool,
}

impl Buttons {
    #[must_use]
    pub const fn any(self) -> bool {
        self.primary || self.lock || self.palm
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LimbInput {
    pub stick: Stick,
    pub buttons: Buttons,
}

/// One sample of the whole controller.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Input {
    pub left: LimbInput,
    pub right: LimbInput,
    /// Set while the designated exit input is held.
    pub exit: bool,
}

impl Input {
    pub const fn limb(&self, limb: Limb) -> &LimbInput {
        match limb {
            Limb::Left => &self.left,
            Limb::Right => &self.right,
        }
    }
}
