use nalgebra::Vector2;
use padinput::Limb;
use serde::{Deserialize, Serialize};

pub mod lock;
pub mod palm;
pub mod state;

pub use lock::LockStyle;
pub use palm::{PalmConfig, PalmPattern, PalmShape, PALM_SLOTS};
pub use state::{ContactState, Options, Phase};

/// Identifies one synthetic touch point for its whole down-to-up lifetime.
///
/// Limb contacts take the first [`Limb::COUNT`] IDs. Each limb then owns a
/// block of [`PALM_SLOTS`] IDs for its palm cluster, so no two logical
/// contacts ever share an ID.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContactId(u32);

impl ContactId {
    /// Number of IDs the allocation scheme can hand out.
    pub const COUNT: u32 = (Limb::COUNT * (1 + PALM_SLOTS)) as u32;

    #[must_use]
    pub const fn limb(limb: Limb) -> Self {
        Self(limb.index() as u32)
    }

    /// ID of point `point` in `limb`'s palm cluster.
    #[must_use]
    pub const fn palm(limb: Limb, point: usize) -> Self {
        Self((Limb::COUNT + limb.index() * PALM_SLOTS + point) as u32)
    }

    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactPhase {
    Down,
    Move,
    Up,
}

/// A contact event in logical stick space, before coordinate resolution.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Emission {
    pub phase: ContactPhase,
    pub position: Vector2<f64>,
}

impl Emission {
    pub const fn new(phase: ContactPhase, position: Vector2<f64>) -> Self {
        Self { phase, position }
    }

    pub const fn down(position: Vector2<f64>) -> Self {
        Self::new(ContactPhase::Down, position)
    }

    pub const fn moved(position: Vector2<f64>) -> Self {
        Self::new(ContactPhase::Move, position)
    }

    pub const fn up(position: Vector2<f64>) -> Self {
        Self::new(ContactPhase::Up, position)
    }
}

/// Everything one limb emitted during a tick.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Step {
    pub contact: Option<Emission>,
    pub palm: Option<Emission>,
}

impl Step {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.contact.is_none() && self.palm.is_none()
    }
}

pub type Steps = [Step; Limb::COUNT];
