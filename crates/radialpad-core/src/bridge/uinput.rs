use evdev::{
    uinput::{VirtualDevice, VirtualDeviceBuilder},
    AbsInfo, AbsoluteAxisType, AttributeSet, EventType, InputEvent, Key, PropType,
    UinputAbsSetup,
};
use log::info;

use super::{ContactPoint, Error, Injector, Result};
use crate::{
    contact::{ContactId, ContactPhase},
    monitor::{Point, Rect},
};

const SLOTS: usize = ContactId::COUNT as usize;

/// Three virtual devices: a keyboard, an absolute pointer and a type-B
/// multitouch screen spanning the whole desktop.
pub struct UInputInjector {
    keyboard: VirtualDevice,
    pointer: VirtualDevice,
    touch: VirtualDevice,
    slots: [bool; SLOTS],
    next_tracking_id: i32,
}

impl UInputInjector {
    pub fn new(desktop: Rect) -> Result<Self> {
        let injector = Self {
            keyboard: create_keyboard()?,
            pointer: create_pointer(desktop)?,
            touch: create_touch(desktop)?,
            slots: [false; SLOTS],
            next_tracking_id: 0,
        };

        info!(
            "Created uinput devices spanning {}x{} at ({}, {})",
            desktop.width, desktop.height, desktop.left, desktop.top
        );

        Ok(injector)
    }

    fn key(&mut self, key: char, value: i32) -> Result<()> {
        let code = key_code(key).ok_or(Error::UnsupportedKey(key))?;
        self.keyboard
            .emit(&[InputEvent::new(EventType::KEY, code.0, value)])?;
        Ok(())
    }

    fn tracking_id(&mut self) -> i32 {
        let id = self.next_tracking_id;
        self.next_tracking_id = self.next_tracking_id.wrapping_add(1) & i32::MAX;
        id
    }
}

impl Injector for UInputInjector {
    fn driver_name(&self) -> &'static str {
        "uinput"
    }

    fn press_key(&mut self, key: char) -> Result<()> {
        self.key(key, 1)
    }

    fn release_key(&mut self, key: char) -> Result<()> {
        self.key(key, 0)
    }

    fn move_cursor(&mut self, to: Point) -> Result<()> {
        self.pointer.emit(&[
            abs(AbsoluteAxisType::ABS_X, to.x),
            abs(AbsoluteAxisType::ABS_Y, to.y),
        ])?;
        Ok(())
    }

    fn set_button(&mut self, pressed: bool) -> Result<()> {
        self.pointer.emit(&[InputEvent::new(
            EventType::KEY,
            Key::BTN_LEFT.0,
            i32::from(pressed),
        )])?;
        Ok(())
    }

    fn inject_contacts(&mut self, contacts: &[ContactPoint]) -> Result<()> {
        let mut events = Vec::with_capacity(contacts.len() * 4 + 1);
        let mut slots = self.slots;

        for contact in contacts {
            let slot = contact.id.value() as usize;
            if slot >= SLOTS {
                return Err(Error::UnknownContact(contact.id));
            }

            events.push(abs(AbsoluteAxisType::ABS_MT_SLOT, slot as i32));

            match contact.phase {
                ContactPhase::Down => {
                    let tracking_id = self.tracking_id();
                    events.push(abs(AbsoluteAxisType::ABS_MT_TRACKING_ID, tracking_id));
                    slots[slot] = true;
                }
                ContactPhase::Up => {
                    events.push(abs(AbsoluteAxisType::ABS_MT_TRACKING_ID, -1));
                    slots[slot] = false;
                    continue;
                }
                ContactPhase::Move => {}
            }

            events.push(abs(AbsoluteAxisType::ABS_MT_POSITION_X, contact.position.x));
            events.push(abs(AbsoluteAxisType::ABS_MT_POSITION_Y, contact.position.y));
        }

        let touching = slots.iter().any(|&down| down);
        if touching != self.slots.iter().any(|&down| down) {
            events.push(InputEvent::new(
                EventType::KEY,
                Key::BTN_TOUCH.0,
                i32::from(touching),
            ));
        }

        self.touch.emit(&events)?;
        self.slots = slots;

        Ok(())
    }
}

fn abs(axis: AbsoluteAxisType, value: i32) -> InputEvent {
    InputEvent::new(EventType::ABSOLUTE, axis.0, value)
}

fn axis_info(min: i32, extent: i32) -> AbsInfo {
    AbsInfo::new(min, min, min + extent.max(1) - 1, 0, 0, 0)
}

fn create_keyboard() -> Result<VirtualDevice> {
    let mut keys = AttributeSet::<Key>::new();
    for code in ('0'..='9').chain('a'..='z').filter_map(key_code) {
        keys.insert(code);
    }

    let device = VirtualDeviceBuilder::new()?
        .name("radialpad | Keyboard")
        .with_keys(&keys)?
        .build()?;

    Ok(device)
}

fn create_pointer(desktop: Rect) -> Result<VirtualDevice> {
    let mut keys = AttributeSet::<Key>::new();
    keys.insert(Key::BTN_LEFT);

    let device = VirtualDeviceBuilder::new()?
        .name("radialpad | Pointer")
        .with_keys(&keys)?
        .with_absolute_axis(&UinputAbsSetup::new(
            AbsoluteAxisType::ABS_X,
            axis_info(desktop.left, desktop.width),
        ))?
        .with_absolute_axis(&UinputAbsSetup::new(
            AbsoluteAxisType::ABS_Y,
            axis_info(desktop.top, desktop.height),
        ))?
        .build()?;

    Ok(device)
}

fn create_touch(desktop: Rect) -> Result<VirtualDevice> {
    let mut keys = AttributeSet::<Key>::new();
    keys.insert(Key::BTN_TOUCH);

    let x = axis_info(desktop.left, desktop.width);
    let y = axis_info(desktop.top, desktop.height);

    let device = VirtualDeviceBuilder::new()?
        .name("radialpad | Touch")
        .with_keys(&keys)?
        .with_properties(&touch_properties())?
        .with_absolute_axis(&UinputAbsSetup::new(AbsoluteAxisType::ABS_X, x))?
        .with_absolute_axis(&UinputAbsSetup::new(AbsoluteAxisType::ABS_Y, y))?
        .with_absolute_axis(&UinputAbsSetup::new(
            AbsoluteAxisType::ABS_MT_SLOT,
            AbsInfo::new(0, 0, SLOTS as i32 - 1, 0, 0, 0),
        ))?
        .with_absolute_axis(&UinputAbsSetup::new(
            AbsoluteAxisType::ABS_MT_TRACKING_ID,
            AbsInfo::new(0, 0, i32::MAX, 0, 0, 0),
        ))?
        .with_absolute_axis(&UinputAbsSetup::new(AbsoluteAxisType::ABS_MT_POSITION_X, x))?
        .with_absolute_axis(&UinputAbsSetup::new(AbsoluteAxisType::ABS_MT_POSITION_Y, y))?
        .build()?;

    Ok(device)
}

/// DIRECT marks the device as a touchscreen, mapped one to one onto the
/// desktop, rather than a touchpad.
fn touch_properties() -> AttributeSet<PropType> {
    let mut properties = AttributeSet::<PropType>::new();
    properties.insert(PropType::DIRECT);
    properties
}

fn key_code(key: char) -> Option<Key> {
    let code = match key.to_ascii_lowercase() {
        '0' => Key::KEY_0,
        '1' => Key::KEY_1,
        '2' => Key::KEY_2,
        '3' => Key::KEY_3,
        '4' => Key::KEY_4,
        '5' => Key::KEY_5,
        '6' => Key::KEY_6,
        '7' => Key::KEY_7,
        '8' => Key::KEY_8,
        '9' => Key::KEY_9,
        'a' => Key::KEY_A,
        'b' => Key::KEY_B,
        'c' => Key::KEY_C,
        'd' => Key::KEY_D,
        'e' => Key::KEY_E,
        'f' => Key::KEY_F,
        'g' => Key::KEY_G,
        'h' => Key::KEY_H,
        'i' => Key::KEY_I,
        'j' => Key::KEY_J,
        'k' => Key::KEY_K,
        'l' => Key::KEY_L,
        'm' => Key::KEY_M,
        'n' => Key::KEY_N,
        'o' => Key::KEY_O,
        'p' => Key::KEY_P,
        'q' => Key::KEY_Q,
        'r' => Key::KEY_R,
        's' => Key::KEY_S,
        't' => Key::KEY_T,
        'u' => Key::KEY_U,
        'v' => Key::KEY_V,
        'w' => Key::KEY_W,
        'x' => Key::KEY_X,
        'y' => Key::KEY_Y,
        'z' => Key::KEY_Z,
        _ => return None,
    };

    Some(code)
}
