use std::{
    mem,
    ops::ControlFlow,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::Duration,
};

use enum_iterator::all;
use log::{debug, info, warn};
use padinput::{Input, Limb};
use serde::{Deserialize, Serialize};

use crate::{
    bridge::{Driver, Injector},
    contact::{ContactState, LockStyle, Options, PalmConfig, Phase, Steps},
    direction::Direction,
    mapping::{
        keyboard::{KeyTable, DEFAULT_KEYS},
        Mode, ModeKind, Surface,
    },
    monitor::{Compensation, CoordinateMapper, Topology},
    source::InputSource,
    util::AverageTimer,
};

pub type Callback = dyn FnMut(&Record);

/// Summary of one tick for observers such as an overlay.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Record {
    pub input: Input,
    pub directions: [Option<Direction>; Limb::COUNT],
    pub phases: [Phase; Limb::COUNT],
    pub tick_time: Duration,
}

/// Sets the stop flag of a [`Dispatcher`] from anywhere.
#[derive(Debug, Clone)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Runs the sample → contact state → injection pipeline one tick at a time
/// on the calling thread.
pub struct Dispatcher<S: InputSource> {
    config: Config,
    source: S,
    topology: Box<dyn Topology>,
    injector: Box<dyn Injector>,
    mode: Box<dyn Mode>,
    states: [ContactState; Limb::COUNT],
    mapper: CoordinateMapper,
    stop_flag: Arc<AtomicBool>,
    connected: Option<bool>,
    failing: bool,
    timer: AverageTimer,
    callbacks: Vec<Box<Callback>>,
}

impl<S: InputSource> Dispatcher<S> {
    pub fn new(
        config: Config,
        source: S,
        topology: Box<dyn Topology>,
        injector: Box<dyn Injector>,
    ) -> Self {
        Self {
            config,
            source,
            topology,
            injector,
            mode: config.mode.create_mode(&config),
            states: [ContactState::new(Limb::Left), ContactState::new(Limb::Right)],
            mapper: CoordinateMapper::new(config.reference_radius, config.compensation())
                .with_window_scale(config.window_scale),
            stop_flag: Default::default(),
            connected: None,
            failing: false,
            timer: AverageTimer::start(Duration::from_secs(1)),
            callbacks: Vec::new(),
        }
    }

    pub const fn config(&self) -> &Config {
        &self.config
    }

    pub fn on_tick(&mut self, callback: impl FnMut(&Record) + 'static) {
        self.callbacks.push(Box::new(callback));
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle(Arc::clone(&self.stop_flag))
    }

    #[must_use]
    pub fn connected(&self) -> bool {
        self.connected.unwrap_or(false)
    }

    pub fn state(&self, limb: Limb) -> &ContactState {
        &self.states[limb.index()]
    }

    #[must_use]
    pub const fn average_tick_time(&self) -> Option<Duration> {
        self.timer.read_avg()
    }

    /// Ticks until the exit input or the stop flag, sleeping
    /// `poll_interval_ms` between ticks. Every contact is up on return unless
    /// the final release could not be injected.
    pub fn run(&mut self) {
        info!(
            "Dispatching in {} mode via {}",
            self.mode.name(),
            self.injector.driver_name()
        );

        let interval = Duration::from_millis(self.config.poll_interval_ms);
        while self.tick().is_continue() {
            thread::sleep(interval);
        }

        match self.average_tick_time() {
            Some(average) => info!("Dispatch stopped, average tick {:?}", average),
            None => info!("Dispatch stopped"),
        }
    }

    pub fn tick(&mut self) -> ControlFlow<()> {
        self.timer.reset();

        let input = self.poll();

        if input.exit || self.stop_flag.load(Ordering::Acquire) {
            self.release_all();
            return ControlFlow::Break(());
        }

        let options = Options {
            lock_style: self.config.lock_style,
            palm_enabled: self.mode.palm_enabled(),
        };

        let committed = self.states.clone();
        let mut steps = Steps::default();
        for limb in all::<Limb>() {
            steps[limb.index()] = self.states[limb.index()].advance(input.limb(limb), options);
        }

        // Undelivered transitions are produced again from the same state.
        if !self.deliver(&steps) {
            self.states = committed;
        }

        let record = Record {
            input,
            directions: [Limb::Left, Limb::Right]
                .map(|limb| Direction::of(input.limb(limb).stick.x, input.limb(limb).stick.y)),
            phases: [Limb::Left, Limb::Right].map(|limb| self.states[limb.index()].phase()),
            tick_time: self.timer.read(),
        };

        for callback in self.callbacks.iter_mut() {
            callback(&record);
        }

        self.timer.lap();

        ControlFlow::Continue(())
    }

    /// Lifts every active contact and palm cluster. If the ups cannot be
    /// injected the contacts stay active for a later call.
    pub fn release_all(&mut self) {
        let committed = self.states.clone();
        let steps: Steps = [
            self.states[Limb::Left.index()].release(),
            self.states[Limb::Right.index()].release(),
        ];

        if !self.deliver(&steps) {
            self.states = committed;
        }
    }

    fn poll(&mut self) -> Input {
        let sample = self.source.poll();
        let connected = sample.is_some();

        if self.connected != Some(connected) {
            if connected {
                info!("Controller connected");
            } else {
                warn!("Controller unavailable, treating all input as released");
            }
            self.connected = Some(connected);
        }

        sample.unwrap_or_default()
    }

    /// Hands `steps` to the mode and reports whether they were delivered.
    fn deliver(&mut self, steps: &Steps) -> bool {
        let mut surface = Surface {
            injector: self.injector.as_mut(),
            mapper: &mut self.mapper,
            topology: self.topology.as_ref(),
        };

        match self.mode.emit(steps, &mut surface) {
            Ok(()) => {
                if mem::take(&mut self.failing) {
                    info!("Injection recovered");
                }
                true
            }
            Err(e) => {
                if mem::replace(&mut self.failing, true) {
                    debug!("Injection still failing: {}", e);
                } else {
                    warn!("Injection failed in {} mode, retrying: {}", self.mode.name(), e);
                }
                false
            }
        }
    }
}

impl<S: InputSource> Drop for Dispatcher<S> {
    fn drop(&mut self) {
        self.release_all();
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub mode: ModeKind,
    pub driver: Driver,
    pub poll_interval_ms: u64,
    /// Pixels per logical stick unit.
    pub reference_radius: f64,
    /// When set, replaces `reference_radius` with this fraction of the
    /// reference window's height.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_scale: Option<f64>,
    pub lock_style: LockStyle,
    /// Defaults to what the driver needs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compensation: Option<Compensation>,
    pub keys: KeyTable,
    pub palm: PalmConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Default::default(),
            driver: Default::default(),
            poll_interval_ms: 4,
            reference_radius: 200.0,
            window_scale: None,
            lock_style: Default::default(),
            compensation: None,
            keys: DEFAULT_KEYS,
            palm: Default::default(),
        }
    }
}

impl Config {
    /// The configured compensation, else the driver's own.
    pub fn compensation(&self) -> Compensation {
        self.compensation.unwrap_or_else(|| self.driver.compensation())
    }
}
