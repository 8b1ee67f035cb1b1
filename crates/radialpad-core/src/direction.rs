//! Quantizes stick vectors into the eight radial sectors.
//!
//! Angles are measured in degrees clockwise from screen-up, so `0°` points
//! up, `90°` right, `180°` down and `270°` left. Sector `n` covers
//! `[n * 45°, (n + 1) * 45°)`.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

pub const SECTORS: u8 = 8;
pub const DEGREES_PER_SECTOR: f64 = 360.0 / SECTORS as f64;

#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct Angle(f64);

impl Angle {
    /// Wraps any bearing into `[0, 360)`.
    pub fn from_degrees(degrees: f64) -> Self {
        let wrapped = degrees.rem_euclid(360.0);
        // rem_euclid rounds tiny negative inputs up to exactly 360.
        Self(if wrapped >= 360.0 { 0.0 } else { wrapped })
    }

    pub const fn degrees(self) -> f64 {
        self.0
    }

    /// Shortest angular distance to `other`, in `[0, 180]`.
    pub fn distance(self, other: Self) -> f64 {
        let diff = (self.0 - other.0).abs();
        if diff > 180.0 {
            360.0 - diff
        } else {
            diff
        }
    }
}

/// Bearing of a stick vector, or `None` for a centered stick.
pub fn angle(x: f64, y: f64) -> Option<Angle> {
    if x == 0.0 && y == 0.0 {
        return None;
    }

    // atan2 is counter-clockwise from screen-right.
    let raw = y.atan2(x).to_degrees();
    Some(Angle::from_degrees(90.0 - raw))
}

pub fn direction(angle: Option<Angle>) -> Option<Direction> {
    angle.map(Direction::from_angle)
}

/// One of the eight 45° sectors.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Direction(u8);

impl Direction {
    pub const UP: Self = Self(0);
    pub const RIGHT: Self = Self(2);
    pub const DOWN: Self = Self(4);
    pub const LEFT: Self = Self(6);

    pub const fn new(index: u8) -> Option<Self> {
        if index < SECTORS {
            Some(Self(index))
        } else {
            None
        }
    }

    pub fn from_angle(angle: Angle) -> Self {
        let sector = (angle.degrees() / DEGREES_PER_SECTOR).floor() as u8;
        if sector >= SECTORS {
            Self(0)
        } else {
            Self(sector)
        }
    }

    /// Direction of a raw stick vector.
    pub fn of(x: f64, y: f64) -> Option<Self> {
        direction(angle(x, y))
    }

    pub fn all() -> impl Iterator<Item = Self> {
        (0..SECTORS).map(Self)
    }

    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn opposite(self) -> Self {
        Self((self.0 + SECTORS / 2) % SECTORS)
    }

    /// The (counter-clockwise, clockwise) neighbors.
    #[must_use]
    pub const fn neighbors(self) -> (Self, Self) {
        (
            Self((self.0 + SECTORS - 1) % SECTORS),
            Self((self.0 + 1) % SECTORS),
        )
    }

    pub fn center_angle(self) -> Angle {
        Angle::from_degrees(f64::from(self.0).mul_add(DEGREES_PER_SECTOR, DEGREES_PER_SECTOR / 2.0))
    }

    /// Unit-circle position at the middle of the sector's arc.
    pub fn canonical_position(self) -> Vector2<f64> {
        let radians = self.center_angle().degrees().to_radians();
        Vector2::new(radians.sin(), radians.cos())
    }
}

impl From<Direction> for u8 {
    fn from(direction: Direction) -> Self {
        direction.index()
    }
}

impl TryFrom<u8> for Direction {
    type Error = FromDirectionError;

    fn try_from(src: u8) -> Result<Self, Self::Error> {
        Self::new(src).ok_or(FromDirectionError::OutOfRange(src))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FromDirectionError {
    #[error("direction {0} out of range")]
    OutOfRange(u8),
}

#[cfg(test)]
mod tests {
    use super::{angle, direction, Angle, Direction, SECTORS};

    const EPSILON: f64 = 1e-9;

    #[test]
    fn centered_stick_has_no_direction() {
        assert!(angle(0.0, 0.0).is_none());
        assert_eq!(direction(angle(0.0, 0.0)), None);
        assert_eq!(direction(angle(-0.0, 0.0)), None);
    }

    #[test]
    fn cardinal_fixtures() {
        let up = angle(0.0, 1.0).unwrap();
        assert!(up.degrees().abs() < EPSILON, "expected up to be 0°, was {up:?}");

        let tests = [
            ((0.0, 1.0), Direction::UP),
            ((1.0, 0.0), Direction::RIGHT),
            ((0.0, -1.0), Direction::DOWN),
            ((-1.0, 0.0), Direction::LEFT),
        ];

        for ((x, y), expected) in tests.into_iter() {
            let d = direction(angle(x, y));
            assert_eq!(
                d,
                Some(expected),
                "expected ({x}, {y}) to be {expected:?}, was {d:?}"
            );
        }
    }

    #[test]
    fn angles_run_clockwise_from_up() {
        let tests = [
            ((1.0, 1.0), 45.0),
            ((1.0, 0.0), 90.0),
            ((1.0, -1.0), 135.0),
            ((0.0, -1.0), 180.0),
            ((-1.0, -1.0), 225.0),
            ((-1.0, 0.0), 270.0),
            ((-1.0, 1.0), 315.0),
        ];

        for ((x, y), expected) in tests.into_iter() {
            let a = angle(x, y).unwrap().degrees();
            assert!(
                (a - expected).abs() < EPSILON,
                "expected angle of ({x}, {y}) to be {expected}, was {a}"
            );
        }
    }

    #[test]
    fn nonzero_samples_land_in_range_and_ignore_magnitude() {
        for i in 0..720 {
            // Offset so no sample sits exactly on a sector boundary.
            let theta = f64::from(i).mul_add(0.5, 0.2).to_radians();
            let (x, y) = (theta.cos(), theta.sin());
            let d = Direction::of(x, y).expect("nonzero sample must have a direction");
            assert!(d.index() < SECTORS);

            for scale in [0.01, 0.3, 0.999] {
                assert_eq!(
                    Direction::of(x * scale, y * scale),
                    Some(d),
                    "expected scaling ({x}, {y}) by {scale} to keep {d:?}"
                );
            }
        }
    }

    #[test]
    fn boundaries_round_down_and_wrap() {
        assert_eq!(Direction::from_angle(Angle::from_degrees(45.0)), Direction::new(1).unwrap());
        assert_eq!(Direction::from_angle(Angle::from_degrees(44.999)), Direction::UP);
        assert_eq!(Direction::from_angle(Angle::from_degrees(359.999)), Direction::new(7).unwrap());
        assert_eq!(Direction::from_angle(Angle::from_degrees(360.0)), Direction::UP);
        assert_eq!(Direction::from_angle(Angle(360.0)), Direction::UP);
    }

    #[test]
    fn canonical_positions_sit_mid_sector() {
        for d in Direction::all() {
            let p = d.canonical_position();
            assert!((p.norm() - 1.0).abs() < EPSILON);
            assert_eq!(
                Direction::of(p.x, p.y),
                Some(d),
                "expected canonical position of {d:?} to quantize back to it"
            );
        }
    }

    #[test]
    fn neighbors_and_opposites_wrap() {
        let (ccw, cw) = Direction::UP.neighbors();
        assert_eq!(ccw.index(), 7);
        assert_eq!(cw.index(), 1);
        assert_eq!(Direction::UP.opposite(), Direction::DOWN);
        assert_eq!(Direction::new(7).unwrap().opposite().index(), 3);
        assert!(Direction::new(SECTORS).is_none());
    }

    #[test]
    fn angular_distance_takes_short_way() {
        let a = Angle::from_degrees(350.0);
        let b = Angle::from_degrees(10.0);
        assert!((a.distance(b) - 20.0).abs() < EPSILON);
        assert!((b.distance(a) - 20.0).abs() < EPSILON);
    }
}
