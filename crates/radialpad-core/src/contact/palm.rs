use enum_iterator::Sequence;
use nalgebra::Vector2;
use padinput::Limb;
use serde::{Deserialize, Serialize};

use super::ContactId;

/// IDs reserved per limb for a palm cluster; enough for the largest shape.
pub const PALM_SLOTS: usize = 9;

pub const DEFAULT_RADIUS: f64 = 125.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Sequence)]
#[serde(rename_all = "snake_case")]
pub enum PalmShape {
    /// Center plus the four diagonals.
    Cross,
    /// Center plus all eight compass points.
    #[default]
    Ring,
}

impl PalmShape {
    pub const fn point_count(self) -> usize {
        match self {
            Self::Cross => 5,
            Self::Ring => 9,
        }
    }

    /// Bearings of the outer points, clockwise from up.
    fn outer_degrees(self) -> &'static [f64] {
        match self {
            Self::Cross => &[45.0, 135.0, 225.0, 315.0],
            Self::Ring => &[0.0, 45.0, 90.0, 135.0, 180.0, 225.0, 270.0, 315.0],
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PalmConfig {
    pub shape: PalmShape,
    /// Distance from the center to each outer point, in physical pixels.
    pub radius: f64,
}

impl Default for PalmConfig {
    fn default() -> Self {
        Self {
            shape: Default::default(),
            radius: DEFAULT_RADIUS,
        }
    }
}

/// Geometry of a palm cluster.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PalmPattern {
    shape: PalmShape,
    radius: f64,
}

impl PalmPattern {
    pub const fn new(config: PalmConfig) -> Self {
        Self {
            shape: config.shape,
            radius: config.radius,
        }
    }

    pub const fn shape(&self) -> PalmShape {
        self.shape
    }

    /// Offsets of every point from the cluster center in logical units, the
    /// center first.
    ///
    /// The pixel radius is divided by `reference_radius` so the physical
    /// spacing stays fixed whatever logical scale is in use.
    pub fn offsets(&self, reference_radius: f64) -> Vec<Vector2<f64>> {
        let scale = if reference_radius > 0.0 {
            self.radius / reference_radius
        } else {
            0.0
        };

        std::iter::once(Vector2::zeros())
            .chain(self.shape.outer_degrees().iter().map(|degrees| {
                let radians = degrees.to_radians();
                Vector2::new(radians.sin(), radians.cos()) * scale
            }))
            .collect()
    }

    /// Contact IDs and logical positions of a cluster centered on `center`.
    pub fn points(
        &self,
        limb: Limb,
        center: Vector2<f64>,
        reference_radius: f64,
    ) -> Vec<(ContactId, Vector2<f64>)> {
        self.offsets(reference_radius)
            .into_iter()
            .enumerate()
            .map(|(i, offset)| (ContactId::palm(limb, i), center + offset))
            .collect()
    }
}
