use enum_iterator::all;
use padinput::Limb;

use super::{Error, Mode, Result, Surface};
use crate::{
    bridge::ContactPoint,
    contact::{ContactId, PalmConfig, PalmPattern, Step, Steps},
};

/// Injects limb contacts and palm clusters as multitouch points.
///
/// Every point of both limbs goes out in one call per tick. Receivers read
/// two separate single-point updates as the other point lifting.
pub struct TouchMode {
    palm: PalmPattern,
}

impl TouchMode {
    pub const fn new(palm: PalmConfig) -> Self {
        Self {
            palm: PalmPattern::new(palm),
        }
    }
}

impl Mode for TouchMode {
    fn name(&self) -> &'static str {
        "touch"
    }

    fn palm_enabled(&self) -> bool {
        true
    }

    fn emit(&mut self, steps: &Steps, surface: &mut Surface) -> Result<()> {
        if steps.iter().all(Step::is_empty) {
            return Ok(());
        }

        let reference_radius = surface.mapper.radius(surface.topology).ok_or(Error::NoWindow)?;
        let mut contacts = Vec::new();

        for limb in all::<Limb>() {
            let step = &steps[limb.index()];

            let limb_point = step
                .contact
                .map(|e| (ContactId::limb(limb), e.position, e.phase))
                .into_iter();
            let palm_points = step.palm.into_iter().flat_map(|e| {
                self.palm
                    .points(limb, e.position, reference_radius)
                    .into_iter()
                    .map(move |(id, position)| (id, position, e.phase))
            });

            for (id, offset, phase) in limb_point.chain(palm_points) {
                let position = surface
                    .mapper
                    .resolve(surface.topology, offset)
                    .ok_or(Error::NoWindow)?;

                contacts.push(ContactPoint::new(id, position, phase));
            }
        }

        surface.injector.inject_contacts(&contacts)?;
        Ok(())
    }
}
