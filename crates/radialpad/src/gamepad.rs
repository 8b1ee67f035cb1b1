use gilrs::{Axis, Button, EventType, GamepadId, Gilrs};
use log::{info, warn};
use padinput::{Buttons, Input, LimbInput, Stick};
use radialpad_core::source::InputSource;

/// Reads the first connected gamepad through gilrs.
///
/// Bumpers hold a contact, triggers lock it, stick clicks start a palm and
/// Select+Start together exits.
pub struct GilrsSource {
    gilrs: Option<Gilrs>,
    active: Option<GamepadId>,
    invert_y: bool,
}

impl GilrsSource {
    pub fn new(invert_y: bool) -> Self {
        let gilrs = match Gilrs::new() {
            Ok(g) => Some(g),
            Err(e) => {
                warn!("Failed to initialize gamepad support: {}", e);
                None
            }
        };

        Self {
            gilrs,
            active: None,
            invert_y,
        }
    }
}

impl InputSource for GilrsSource {
    fn poll(&mut self) -> Option<Input> {
        let gilrs = self.gilrs.as_mut()?;

        while let Some(event) = gilrs.next_event() {
            match event.event {
                EventType::Connected if self.active.is_none() => {
                    info!("Using gamepad {}", event.id);
                    self.active = Some(event.id);
                }
                EventType::Disconnected if self.active == Some(event.id) => {
                    info!("Gamepad {} disconnected", event.id);
                    self.active = None;
                }
                _ => {}
            }
        }

        if self.active.is_none() {
            self.active = gilrs.gamepads().next().map(|(id, _)| id);
            if let Some(id) = self.active {
                info!("Using gamepad {}", id);
            }
        }

        let gamepad = gilrs.connected_gamepad(self.active?)?;

        Some(sample(
            |button| gamepad.is_pressed(button),
            |axis| gamepad.value(axis),
            self.invert_y,
        ))
    }
}

/// Builds a controller sample from button and axis readers.
pub fn sample(
    pressed: impl Fn(Button) -> bool,
    value: impl Fn(Axis) -> f32,
    invert_y: bool,
) -> Input {
    let y_sign = if invert_y { -1.0 } else { 1.0 };
    let stick = |x: Axis, y: Axis| {
        Stick::clamped(f64::from(value(x)), y_sign * f64::from(value(y)))
    };

    Input {
        left: LimbInput {
            stick: stick(Axis::LeftStickX, Axis::LeftStickY),
            buttons: Buttons {
                primary: pressed(Button::LeftTrigger),
                lock: pressed(Button::LeftTrigger2),
                palm: pressed(Button::LeftThumb),
            },
        },
        right: LimbInput {
            stick: stick(Axis::RightStickX, Axis::RightStickY),
            buttons: Buttons {
                primary: pressed(Button::RightTrigger),
                lock: pressed(Button::RightTrigger2),
                palm: pressed(Button::RightThumb),
            },
        },
        exit: pressed(Button::Select) && pressed(Button::Start),
    }
}
