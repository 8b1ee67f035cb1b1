use std::collections::VecDeque;

use padinput::Input;

/// Produces one controller sample per tick.
pub trait InputSource {
    /// The current sample, or `None` while no controller is available.
    fn poll(&mut self) -> Option<Input>;
}

impl<F> InputSource for F
where
    F: FnMut() -> Option<Input>,
{
    fn poll(&mut self) -> Option<Input> {
        self()
    }
}

/// Replays queued samples, then reports the device as gone.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    samples: VecDeque<Option<Input>>,
}

impl ScriptedSource {
    pub fn new(samples: impl IntoIterator<Item = Option<Input>>) -> Self {
        Self {
            samples: samples.into_iter().collect(),
        }
    }
}

impl InputSource for ScriptedSource {
    fn poll(&mut self) -> Option<Input> {
        self.samples.pop_front().flatten()
    }
}
