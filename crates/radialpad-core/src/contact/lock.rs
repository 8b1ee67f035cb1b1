use enum_iterator::Sequence;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::direction::{angle, Direction};

/// How a locked contact is positioned.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Sequence)]
#[serde(rename_all = "snake_case")]
pub enum LockStyle {
    /// Freeze the contact on the held sector's canonical position.
    #[default]
    Snap,
    /// Slide the contact along the chord from the held sector toward
    /// whichever neighbor of its opposite the stick is closer to.
    Glide,
}

impl LockStyle {
    /// Returns the locked direction and the position to emit.
    pub fn lock(self, held: Direction, stick: Vector2<f64>) -> (Direction, Vector2<f64>) {
        match self {
            Self::Snap => (held, held.canonical_position()),
            Self::Glide => {
                let end = glide_target(held, stick);
                (end, project_onto_chord(held, end, stick))
            }
        }
    }
}

fn glide_target(held: Direction, stick: Vector2<f64>) -> Direction {
    let (ccw, cw) = held.opposite().neighbors();

    match angle(stick.x, stick.y) {
        Some(current) if current.distance(ccw.center_angle()) < current.distance(cw.center_angle()) => ccw,
        _ => cw,
    }
}

fn project_onto_chord(from: Direction, to: Direction, stick: Vector2<f64>) -> Vector2<f64> {
    let start = from.canonical_position();
    let chord = to.canonical_position() - start;
    let length = chord.norm();

    if length <= f64::EPSILON {
        return start;
    }

    let unit = chord / length;
    let t = (stick - start).dot(&unit).clamp(0.0, length);

    start + unit * t
}
