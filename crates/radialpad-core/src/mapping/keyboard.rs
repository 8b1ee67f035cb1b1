use enum_iterator::all;
use padinput::Limb;

use super::{Mode, Result, Surface};
use crate::{
    bridge::{self, Injector},
    contact::{ContactPhase, Emission, Steps},
    direction::{Direction, SECTORS},
};

/// One key per direction, in sector order starting from up.
pub type KeyTable = [char; SECTORS as usize];

pub const DEFAULT_KEYS: KeyTable = ['1', '2', '3', '4', '5', '6', '7', '8'];

/// Holds the key for the direction each active limb points in.
#[derive(Debug)]
pub struct KeyboardMode {
    keys: KeyTable,
    held: [Option<char>; Limb::COUNT],
}

impl KeyboardMode {
    pub const fn new(keys: KeyTable) -> Self {
        Self {
            keys,
            held: [None; Limb::COUNT],
        }
    }

    fn key_for(&self, emission: Emission) -> Option<char> {
        if emission.phase == ContactPhase::Up {
            return None;
        }

        Direction::of(emission.position.x, emission.position.y)
            .map(|d| self.keys[usize::from(d.index())])
    }

    fn update(
        &mut self,
        limb: Limb,
        wanted: Option<char>,
        injector: &mut dyn Injector,
    ) -> bridge::Result<()> {
        // Two limbs never hold the same key.
        let wanted = wanted.filter(|&key| self.held[limb.other().index()] != Some(key));
        let held = &mut self.held[limb.index()];

        if *held == wanted {
            return Ok(());
        }

        if let Some(old) = *held {
            injector.release_key(old)?;
            *held = None;
        }

        if let Some(new) = wanted {
            injector.press_key(new)?;
            *held = Some(new);
        }

        Ok(())
    }
}

impl Default for KeyboardMode {
    fn default() -> Self {
        Self::new(DEFAULT_KEYS)
    }
}

impl Mode for KeyboardMode {
    fn name(&self) -> &'static str {
        "keyboard"
    }

    fn emit(&mut self, steps: &Steps, surface: &mut Surface) -> Result<()> {
        let mut result: bridge::Result<()> = Ok(());

        for limb in all::<Limb>() {
            if let Some(emission) = steps[limb.index()].contact {
                let wanted = self.key_for(emission);
                result = result.and(self.update(limb, wanted, &mut *surface.injector));
            }
        }

        Ok(result?)
    }
}

#[cfg(test)]
mod tests {
    use padinput::Limb;

    use super::{KeyboardMode, DEFAULT_KEYS};
    use crate::{
        bridge::{Call, Recorder},
        contact::{Emission, Steps},
        mapping::{
            test_util::{at, both, steps, SingleScreen},
            Mode, Surface,
        },
        monitor::{Compensation, CoordinateMapper},
    };

    struct Harness {
        mode: KeyboardMode,
        recorder: Recorder,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                mode: KeyboardMode::default(),
                recorder: Recorder::new(),
            }
        }

        fn try_tick(&mut self, steps: &Steps) -> bool {
            let mut injector = self.recorder.clone();
            let mut mapper = CoordinateMapper::new(200.0, Compensation::None);
            let mut surface = Surface {
                injector: &mut injector,
                mapper: &mut mapper,
                topology: &SingleScreen,
            };
            self.mode.emit(steps, &mut surface).is_ok()
        }

        fn tick(&mut self, steps: &Steps) -> Vec<Call> {
            assert!(self.try_tick(steps));
            self.recorder.take()
        }
    }

    #[test]
    fn direction_change_swaps_keys() {
        let mut h = Harness::new();

        let calls = h.tick(&steps(Limb::Left, Some(Emission::down(at(0.1, 1.0)))));
        assert_eq!(calls, vec![Call::PressKey('1')]);

        let calls = h.tick(&steps(Limb::Left, Some(Emission::moved(at(0.15, 0.9)))));
        assert!(calls.is_empty(), "expected same sector to keep key, got {calls:?}");

        let calls = h.tick(&steps(Limb::Left, Some(Emission::moved(at(0.0, -1.0)))));
        assert_eq!(calls, vec![Call::ReleaseKey('1'), Call::PressKey('5')]);

        let calls = h.tick(&steps(Limb::Left, Some(Emission::up(at(0.0, -1.0)))));
        assert_eq!(calls, vec![Call::ReleaseKey('5')]);
    }

    #[test]
    fn every_sector_uses_its_key() {
        for (i, key) in DEFAULT_KEYS.iter().enumerate() {
            let mut h = Harness::new();
            let theta = (i as f64 * 45.0 + 22.5).to_radians();

            let calls = h.tick(&steps(
                Limb::Right,
                Some(Emission::down(at(theta.sin(), theta.cos()))),
            ));
            assert_eq!(calls, vec![Call::PressKey(*key)], "sector {i}");
        }
    }

    #[test]
    fn centered_stick_releases_key() {
        let mut h = Harness::new();
        h.tick(&steps(Limb::Left, Some(Emission::down(at(1.0, -0.1)))));

        let calls = h.tick(&steps(Limb::Left, Some(Emission::moved(at(0.0, 0.0)))));
        assert_eq!(calls, vec![Call::ReleaseKey('3')]);
    }

    #[test]
    fn limbs_never_share_a_key() {
        let mut h = Harness::new();
        h.tick(&steps(Limb::Left, Some(Emission::down(at(1.0, 0.1)))));
        h.tick(&steps(Limb::Right, Some(Emission::down(at(-1.0, 0.1)))));

        let calls = h.tick(&both(
            Emission::moved(at(1.0, 0.1)),
            Emission::moved(at(1.0, 0.2)),
        ));
        assert_eq!(calls, vec![Call::ReleaseKey('7')]);
    }

    #[test]
    fn failed_press_is_retried() {
        let mut h = Harness::new();

        h.recorder.set_failing(true);
        assert!(!h.try_tick(&steps(Limb::Left, Some(Emission::down(at(0.0, 1.0))))));
        h.recorder.set_failing(false);

        let calls = h.tick(&steps(Limb::Left, Some(Emission::moved(at(0.0, 1.0)))));
        assert_eq!(calls, vec![Call::PressKey('1')]);
    }
}
