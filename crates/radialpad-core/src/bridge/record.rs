use std::{
    io,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
};

use super::{ContactPoint, Error, Injector, Result};
use crate::monitor::Point;

/// A single injector call as seen by [`Recorder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    PressKey(char),
    ReleaseKey(char),
    MoveCursor(Point),
    SetButton(bool),
    Contacts(Vec<ContactPoint>),
}

/// Keeps every call in memory. Clones share the same log, so a handle kept
/// outside the dispatcher can inspect what was injected.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    calls: Arc<Mutex<Vec<Call>>>,
    failing: Arc<AtomicBool>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Drains the recorded calls.
    pub fn take(&self) -> Vec<Call> {
        std::mem::take(&mut *self.calls.lock().unwrap())
    }

    /// While set, every call fails and nothing is recorded.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Release);
    }

    fn record(&self, call: Call) -> Result<()> {
        if self.failing.load(Ordering::Acquire) {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::Other,
                "recorder set to fail",
            )));
        }

        self.calls.lock().unwrap().push(call);
        Ok(())
    }
}

impl Injector for Recorder {
    fn driver_name(&self) -> &'static str {
        "recorder"
    }

    fn press_key(&mut self, key: char) -> Result<()> {
        self.record(Call::PressKey(key))
    }

    fn release_key(&mut self, key: char) -> Result<()> {
        self.record(Call::ReleaseKey(key))
    }

    fn move_cursor(&mut self, to: Point) -> Result<()> {
        self.record(Call::MoveCursor(to))
    }

    fn set_button(&mut self, pressed: bool) -> Result<()> {
        self.record(Call::SetButton(pressed))
    }

    fn inject_contacts(&mut self, contacts: &[ContactPoint]) -> Result<()> {
        self.record(Call::Contacts(contacts.to_vec()))
    }
}
