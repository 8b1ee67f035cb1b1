use std::mem;

use log::debug;
use nalgebra::Vector2;
use padinput::{Buttons, Limb, LimbInput};
use serde::{Deserialize, Serialize};

use super::{Emission, LockStyle, Step};
use crate::direction::Direction;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    Pressed,
    Locked,
    Palm,
}

impl Phase {
    #[must_use]
    pub const fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// Per-tick behavior switches shared by both limbs.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Options {
    pub lock_style: LockStyle,
    pub palm_enabled: bool,
}

/// Edge-triggered contact state for one limb.
///
/// Every call to [`ContactState::advance`] compares the sampled buttons with
/// the previous sample and yields at most one contact emission and one palm
/// emission.
#[derive(Debug, Clone)]
pub struct ContactState {
    limb: Limb,
    active: bool,
    locked: bool,
    held_direction: Option<Direction>,
    locked_direction: Option<Direction>,
    last_position: Vector2<f64>,
    palm_active: bool,
    palm_center: Vector2<f64>,
    previous: Buttons,
}

impl ContactState {
    pub fn new(limb: Limb) -> Self {
        Self {
            limb,
            active: false,
            locked: false,
            held_direction: None,
            locked_direction: None,
            last_position: Vector2::zeros(),
            palm_active: false,
            palm_center: Vector2::zeros(),
            previous: Buttons::default(),
        }
    }

    pub const fn limb(&self) -> Limb {
        self.limb
    }

    pub const fn phase(&self) -> Phase {
        if self.palm_active {
            Phase::Palm
        } else if self.locked {
            Phase::Locked
        } else if self.active {
            Phase::Pressed
        } else {
            Phase::Idle
        }
    }

    /// Whether a limb contact is down.
    pub const fn is_active(&self) -> bool {
        self.active
    }

    pub const fn is_palm_active(&self) -> bool {
        self.palm_active
    }

    pub const fn held_direction(&self) -> Option<Direction> {
        self.held_direction
    }

    pub const fn locked_direction(&self) -> Option<Direction> {
        self.locked_direction
    }

    /// Position of the most recent contact emission.
    pub const fn last_position(&self) -> Vector2<f64> {
        self.last_position
    }

    pub const fn palm_center(&self) -> Vector2<f64> {
        self.palm_center
    }

    pub fn advance(&mut self, input: &LimbInput, options: Options) -> Step {
        let buttons = input.buttons;
        let previous = mem::replace(&mut self.previous, buttons);
        let stick = input.stick.to_vector();

        let mut step = Step::default();

        if self.palm_active {
            if options.palm_enabled && buttons.palm {
                self.palm_center = stick;
                step.palm = Some(Emission::moved(stick));
            } else {
                step.palm = self.release_palm();
            }
            return step;
        }

        if options.palm_enabled && buttons.palm {
            if !previous.palm {
                step.contact = self.release_contact();
                self.palm_active = true;
                self.palm_center = stick;
                step.palm = Some(Emission::down(stick));
                debug!("{:?} palm down", self.limb);
            }
            return step;
        }

        if !self.active {
            if buttons.primary && !previous.primary {
                self.active = true;
                self.held_direction = Direction::of(stick.x, stick.y);
                self.last_position = stick;
                step.contact = Some(Emission::down(stick));
            }
            return step;
        }

        if !buttons.primary {
            step.contact = self.release_contact();
            return step;
        }

        let position = match self.held_direction {
            Some(held) if buttons.lock => {
                let (locked, position) = options.lock_style.lock(held, stick);
                if !self.locked {
                    debug!("{:?} locked on {:?}", self.limb, locked);
                }
                self.locked = true;
                self.locked_direction = Some(locked);
                position
            }
            _ => {
                if self.locked {
                    debug!("{:?} unlocked", self.limb);
                }
                self.locked = false;
                self.locked_direction = None;
                stick
            }
        };

        self.last_position = position;
        step.contact = Some(Emission::moved(position));

        step
    }

    /// Emits up for everything still down and returns to idle.
    ///
    /// Button history is kept, so a primary button that is still held does
    /// not count as a new press afterwards.
    pub fn release(&mut self) -> Step {
        Step {
            contact: self.release_contact(),
            palm: self.release_palm(),
        }
    }

    fn release_contact(&mut self) -> Option<Emission> {
        if !self.active {
            return None;
        }

        self.active = false;
        self.locked = false;
        self.held_direction = None;
        self.locked_direction = None;

        Some(Emission::up(self.last_position))
    }

    fn release_palm(&mut self) -> Option<Emission> {
        if !self.palm_active {
            return None;
        }

        self.palm_active = false;
        debug!("{:?} palm up", self.limb);

        Some(Emission::up(self.palm_center))
    }
}
