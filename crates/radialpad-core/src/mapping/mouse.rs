use enum_iterator::all;
use padinput::Limb;

use super::{Error, Mode, Result, Surface};
use crate::contact::{ContactPhase, Steps};

/// Drives the system cursor with the left button held while any limb is
/// down. With both limbs down the cursor alternates between them each tick.
#[derive(Debug)]
pub struct MouseMode {
    active: [bool; Limb::COUNT],
    button: bool,
    /// Set once the button is up until the cursor is back on the monitor
    /// center.
    recenter: bool,
    turn: Limb,
}

impl MouseMode {
    pub const fn new() -> Self {
        Self {
            active: [false; Limb::COUNT],
            button: false,
            recenter: false,
            turn: Limb::Left,
        }
    }
}

impl Default for MouseMode {
    fn default() -> Self {
        Self::new()
    }
}

impl Mode for MouseMode {
    fn name(&self) -> &'static str {
        "mouse"
    }

    fn emit(&mut self, steps: &Steps, surface: &mut Surface) -> Result<()> {
        let mut targets = [None; Limb::COUNT];

        for limb in all::<Limb>() {
            if let Some(emission) = steps[limb.index()].contact {
                let down = emission.phase != ContactPhase::Up;
                self.active[limb.index()] = down;
                if down {
                    targets[limb.index()] = Some(emission.position);
                }
            }
        }

        let left = targets[Limb::Left.index()];
        let right = targets[Limb::Right.index()];
        let target = match (left, right) {
            (Some(_), Some(_)) => {
                let limb = self.turn;
                self.turn = limb.other();
                targets[limb.index()]
            }
            _ => left.or(right),
        };

        if let Some(offset) = target {
            let point = surface
                .mapper
                .uncompensated(surface.topology, offset)
                .ok_or(Error::NoWindow)?;
            surface.injector.move_cursor(point)?;
        }

        let any_active = self.active.iter().any(|&a| a);

        if any_active && !self.button {
            surface.injector.set_button(true)?;
            self.button = true;
            self.recenter = false;
        } else if !any_active && self.button {
            surface.injector.set_button(false)?;
            self.button = false;
            self.recenter = true;
        }

        if self.recenter && !any_active {
            if let Some(center) = surface.mapper.current_monitor_center(surface.topology) {
                surface.injector.move_cursor(center)?;
            }
            self.recenter = false;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use padinput::Limb;

    use super::MouseMode;
    use crate::{
        bridge::{self, Call, ContactPoint, Injector, Recorder},
        contact::{Emission, Steps},
        mapping::{
            test_util::{at, both, steps, SingleScreen},
            Mode, Surface,
        },
        monitor::{Compensation, CoordinateMapper, Point},
    };

    struct Harness {
        mode: MouseMode,
        recorder: Recorder,
        mapper: CoordinateMapper,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                mode: MouseMode::new(),
                recorder: Recorder::new(),
                mapper: CoordinateMapper::new(200.0, Compensation::OppositeMonitor),
            }
        }

        fn tick(&mut self, steps: &Steps) -> Vec<Call> {
            let mut injector = self.recorder.clone();
            let mut surface = Surface {
                injector: &mut injector,
                mapper: &mut self.mapper,
                topology: &SingleScreen,
            };
            self.mode.emit(steps, &mut surface).unwrap();

            self.recorder.take()
        }
    }

    #[test]
    fn press_moves_then_clicks_once() {
        let mut h = Harness::new();

        let calls = h.tick(&steps(Limb::Left, Some(Emission::down(at(0.5, 0.0)))));
        assert_eq!(
            calls,
            vec![Call::MoveCursor(Point::new(1060, 540)), Call::SetButton(true)]
        );

        let calls = h.tick(&steps(Limb::Right, Some(Emission::down(at(0.0, 0.5)))));
        assert_eq!(calls, vec![Call::MoveCursor(Point::new(960, 440))]);
    }

    #[test]
    fn both_limbs_alternate() {
        let mut h = Harness::new();
        let left = Emission::moved(at(-1.0, 0.0));
        let right = Emission::moved(at(1.0, 0.0));

        let mut xs = Vec::new();
        for _ in 0..4 {
            for call in h.tick(&both(left, right)) {
                if let Call::MoveCursor(p) = call {
                    xs.push(p.x);
                }
            }
        }

        assert_eq!(xs, vec![760, 1160, 760, 1160]);
    }

    #[test]
    fn release_centers_cursor_on_monitor() {
        let mut h = Harness::new();
        h.tick(&steps(Limb::Left, Some(Emission::down(at(0.2, 0.2)))));
        h.tick(&steps(Limb::Right, Some(Emission::down(at(0.2, 0.2)))));

        let calls = h.tick(&steps(Limb::Left, Some(Emission::up(at(0.2, 0.2)))));
        assert!(
            !calls.contains(&Call::SetButton(false)),
            "expected button to stay down while right limb is active, got {calls:?}"
        );

        let calls = h.tick(&steps(Limb::Right, Some(Emission::up(at(0.2, 0.2)))));
        assert_eq!(
            calls,
            vec![Call::SetButton(false), Call::MoveCursor(Point::new(960, 540))]
        );
    }

    #[test]
    fn failed_click_is_retried() {
        let mut h = Harness::new();

        h.recorder.set_failing(true);
        let mut injector = h.recorder.clone();
        let mut surface = Surface {
            injector: &mut injector,
            mapper: &mut h.mapper,
            topology: &SingleScreen,
        };
        let held = steps(Limb::Left, Some(Emission::down(at(0.0, 0.0))));
        assert!(h.mode.emit(&held, &mut surface).is_err());
        h.recorder.set_failing(false);

        let calls = h.tick(&steps(Limb::Left, Some(Emission::moved(at(0.0, 0.0)))));
        assert!(calls.contains(&Call::SetButton(true)));
    }

    #[test]
    fn failed_recenter_is_retried_on_idle_tick() {
        let mut h = Harness::new();
        h.tick(&steps(Limb::Left, Some(Emission::down(at(0.2, 0.2)))));

        let mut injector = NoCursor(h.recorder.clone());
        let mut surface = Surface {
            injector: &mut injector,
            mapper: &mut h.mapper,
            topology: &SingleScreen,
        };
        let up = steps(Limb::Left, Some(Emission::up(at(0.2, 0.2))));
        assert!(h.mode.emit(&up, &mut surface).is_err());
        assert_eq!(h.recorder.take(), vec![Call::SetButton(false)]);

        let calls = h.tick(&Steps::default());
        assert_eq!(calls, vec![Call::MoveCursor(Point::new(960, 540))]);

        assert!(h.tick(&Steps::default()).is_empty());
    }

    /// Records everything except cursor moves, which always fail.
    struct NoCursor(Recorder);

    impl Injector for NoCursor {
        fn driver_name(&self) -> &'static str {
            "no-cursor"
        }

        fn press_key(&mut self, key: char) -> bridge::Result<()> {
            self.0.press_key(key)
        }

        fn release_key(&mut self, key: char) -> bridge::Result<()> {
            self.0.release_key(key)
        }

        fn move_cursor(&mut self, _to: Point) -> bridge::Result<()> {
            Err(bridge::Error::Io(io::Error::new(
                io::ErrorKind::Other,
                "cursor unavailable",
            )))
        }

        fn set_button(&mut self, pressed: bool) -> bridge::Result<()> {
            self.0.set_button(pressed)
        }

        fn inject_contacts(&mut self, contacts: &[ContactPoint]) -> bridge::Result<()> {
            self.0.inject_contacts(contacts)
        }
    }
}
