//! Resolves logical stick-space offsets into the pixel coordinates handed to
//! the injector.
//!
//! Some hosts route injected coordinates against the primary monitor's frame
//! and land them on the wrong screen when the primary sits to the right of or
//! below the secondary. [`CoordinateMapper`] reproduces the empirical fix-up
//! for those layouts and never clamps its output.

use enum_iterator::Sequence;
use log::debug;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

pub type Result<T> = std::result::Result<T, TopologyError>;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub const fn right(&self) -> i32 {
        self.left + self.width
    }

    pub const fn bottom(&self) -> i32 {
        self.top + self.height
    }

    pub const fn center(&self) -> Point {
        Point::new(self.left + self.width / 2, self.top + self.height / 2)
    }

    pub const fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x < self.right() && p.y >= self.top && p.y < self.bottom()
    }

    /// Squared distance from `p` to the nearest point of the rectangle.
    pub fn distance_squared(&self, p: Point) -> i64 {
        let dx = i64::from((self.left - p.x).max(0).max(p.x - self.right() + 1));
        let dy = i64::from((self.top - p.y).max(0).max(p.y - self.bottom() + 1));
        dx * dx + dy * dy
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Monitor {
    #[serde(default)]
    pub primary: bool,
    pub rect: Rect,
}

impl Monitor {
    pub const fn new(rect: Rect, primary: bool) -> Self {
        Self { primary, rect }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonitorLayout {
    monitors: Vec<Monitor>,
}

impl MonitorLayout {
    pub fn new(monitors: impl IntoIterator<Item = Monitor>) -> Self {
        Self {
            monitors: monitors.into_iter().collect(),
        }
    }

    pub fn monitors(&self) -> &[Monitor] {
        &self.monitors
    }

    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }

    pub fn primary(&self) -> Option<&Monitor> {
        self.monitors.iter().find(|m| m.primary)
    }

    /// The first monitor that is not primary.
    pub fn secondary(&self) -> Option<&Monitor> {
        self.monitors.iter().find(|m| !m.primary)
    }

    /// The monitor containing `p`, else the one nearest to it.
    pub fn at(&self, p: Point) -> Option<&Monitor> {
        self.monitors
            .iter()
            .find(|m| m.rect.contains(p))
            .or_else(|| self.monitors.iter().min_by_key(|m| m.rect.distance_squared(p)))
    }
}

/// Screen geometry the mapper reads on every resolution.
pub trait Topology {
    /// Screen rectangle of the window the user aligns the reference circle
    /// with.
    fn reference_window(&self) -> Result<Rect>;
    fn monitors(&self) -> Result<MonitorLayout>;
}

#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    #[error("reference window unavailable: {0}")]
    WindowUnavailable(String),
    #[error("monitor layout unavailable: {0}")]
    MonitorsUnavailable(String),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Sequence)]
#[serde(rename_all = "snake_case")]
pub enum Compensation {
    /// Always inject the absolute pixel.
    None,
    /// Re-route coordinates for layouts where the primary monitor follows
    /// the secondary.
    #[default]
    OppositeMonitor,
}

/// Where the primary monitor sits relative to the secondary on one axis.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Placement {
    /// Right of or below.
    After,
    /// Left of, above or aligned.
    NotAfter,
}

impl Placement {
    const fn of(primary_start: i32, secondary_start: i32) -> Self {
        if primary_start > secondary_start {
            Self::After
        } else {
            Self::NotAfter
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Route {
    Absolute,
    /// Relative to the current monitor plus its own extent.
    PastOwnEdge,
    /// Proportionally scaled into the other monitor.
    Scaled,
}

const fn route(placement: Placement, on_primary: bool) -> Route {
    match (placement, on_primary) {
        (Placement::After, true) => Route::PastOwnEdge,
        (Placement::After, false) => Route::Scaled,
        (Placement::NotAfter, _) => Route::Absolute,
    }
}

/// One axis of a monitor rectangle: (origin, extent).
type Span = (i32, i32);

fn compensate_axis(absolute: i32, placement: Placement, current: Span, other: Span, on_primary: bool) -> i32 {
    let relative = absolute - current.0;

    match route(placement, on_primary) {
        Route::Absolute => absolute,
        Route::PastOwnEdge => relative + current.1,
        Route::Scaled if current.1 > 0 => {
            other.0 + (f64::from(relative) * f64::from(other.1) / f64::from(current.1)).trunc() as i32
        }
        Route::Scaled => absolute,
    }
}

#[derive(Debug, Clone)]
pub struct CoordinateMapper {
    reference_radius: f64,
    window_scale: Option<f64>,
    compensation: Compensation,
    last_window: Option<Rect>,
}

impl CoordinateMapper {
    pub const fn new(reference_radius: f64, compensation: Compensation) -> Self {
        Self {
            reference_radius,
            window_scale: None,
            compensation,
            last_window: None,
        }
    }

    /// Derives the radius from the reference window instead: `scale` times
    /// its height, re-read on every resolution.
    #[must_use]
    pub const fn with_window_scale(mut self, scale: Option<f64>) -> Self {
        self.window_scale = scale;
        self
    }

    pub const fn compensation(&self) -> Compensation {
        self.compensation
    }

    /// Pixels per logical unit for `window`.
    pub fn radius_for(&self, window: Rect) -> f64 {
        match self.window_scale {
            Some(scale) => f64::from(window.height) * scale,
            None => self.reference_radius,
        }
    }

    /// Pixels per logical unit for the current reference window, or `None`
    /// if it has never been located.
    pub fn radius(&mut self, topology: &dyn Topology) -> Option<f64> {
        let window = self.window(topology)?;
        Some(self.radius_for(window))
    }

    /// Pixel for `offset` relative to `window`'s center, with logical up
    /// mapped to screen up.
    pub fn absolute(&self, window: Rect, offset: Vector2<f64>) -> Point {
        let center = window.center();
        let radius = self.radius_for(window);
        Point::new(
            center.x + (offset.x * radius).trunc() as i32,
            center.y - (offset.y * radius).trunc() as i32,
        )
    }

    /// The absolute pixel without any monitor compensation.
    pub fn uncompensated(&mut self, topology: &dyn Topology, offset: Vector2<f64>) -> Option<Point> {
        let window = self.window(topology)?;
        Some(self.absolute(window, offset))
    }

    /// The pixel to inject for `offset`, or `None` if the reference window has
    /// never been located.
    pub fn resolve(&mut self, topology: &dyn Topology, offset: Vector2<f64>) -> Option<Point> {
        let window = self.window(topology)?;
        let absolute = self.absolute(window, offset);

        if self.compensation == Compensation::None {
            return Some(absolute);
        }

        let layout = match topology.monitors() {
            Ok(layout) => layout,
            Err(e) => {
                debug!("Using uncompensated position: {}", e);
                return Some(absolute);
            }
        };

        Some(Self::compensate(&layout, window.center(), absolute))
    }

    /// Center of the monitor the reference window is on.
    pub fn current_monitor_center(&mut self, topology: &dyn Topology) -> Option<Point> {
        let window = self.window(topology)?;

        let center = topology
            .monitors()
            .ok()
            .and_then(|layout| layout.at(window.center()).map(|m| m.rect.center()))
            .unwrap_or_else(|| window.center());

        Some(center)
    }

    fn compensate(layout: &MonitorLayout, window_center: Point, absolute: Point) -> Point {
        if layout.len() <= 1 {
            return absolute;
        }

        let (primary, secondary, current) =
            match (layout.primary(), layout.secondary(), layout.at(window_center)) {
                (Some(p), Some(s), Some(c)) => (p.rect, s.rect, *c),
                _ => return absolute,
            };

        let on_primary = current.primary;
        let other = if on_primary { secondary } else { primary };
        let rect = current.rect;

        Point::new(
            compensate_axis(
                absolute.x,
                Placement::of(primary.left, secondary.left),
                (rect.left, rect.width),
                (other.left, other.width),
                on_primary,
            ),
            compensate_axis(
                absolute.y,
                Placement::of(primary.top, secondary.top),
                (rect.top, rect.height),
                (other.top, other.height),
                on_primary,
            ),
        )
    }

    fn window(&mut self, topology: &dyn Topology) -> Option<Rect> {
        match topology.reference_window() {
            Ok(window) => Some(*self.last_window.insert(window)),
            Err(e) => {
                debug!("Using last known window: {}", e);
                self.last_window
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use nalgebra::Vector2;

    use super::{
        route, Compensation, CoordinateMapper, Monitor, MonitorLayout, Placement, Point, Rect,
        Result, Route, Topology, TopologyError,
    };

    struct Fixture {
        window: Cell<Option<Rect>>,
        monitors: Option<Vec<Monitor>>,
    }

    impl Fixture {
        fn new(window: Rect, monitors: &[Monitor]) -> Self {
            Self {
                window: Cell::new(Some(window)),
                monitors: Some(monitors.to_vec()),
            }
        }
    }

    impl Topology for Fixture {
        fn reference_window(&self) -> Result<Rect> {
            self.window
                .get()
                .ok_or_else(|| TopologyError::WindowUnavailable("closed".into()))
        }

        fn monitors(&self) -> Result<MonitorLayout> {
            self.monitors
                .clone()
                .map(MonitorLayout::new)
                .ok_or_else(|| TopologyError::MonitorsUnavailable("query failed".into()))
        }
    }

    const HD: (i32, i32) = (1920, 1080);

    fn monitor(left: i32, top: i32, size: (i32, i32), primary: bool) -> Monitor {
        Monitor::new(Rect::new(left, top, size.0, size.1), primary)
    }

    fn window_centered_on(m: &Monitor) -> Rect {
        let c = m.rect.center();
        Rect::new(c.x - 200, c.y - 200, 400, 400)
    }

    fn mapper() -> CoordinateMapper {
        CoordinateMapper::new(200.0, Compensation::OppositeMonitor)
    }

    #[test]
    fn decision_table() {
        let tests = [
            ((Placement::After, true), Route::PastOwnEdge),
            ((Placement::After, false), Route::Scaled),
            ((Placement::NotAfter, true), Route::Absolute),
            ((Placement::NotAfter, false), Route::Absolute),
        ];

        for ((placement, on_primary), expected) in tests.into_iter() {
            assert_eq!(
                route(placement, on_primary),
                expected,
                "expected {placement:?} on_primary={on_primary} to route {expected:?}"
            );
        }
    }

    #[test]
    fn absolute_inverts_y() {
        let m = mapper();
        let window = Rect::new(100, 100, 400, 400);

        assert_eq!(m.absolute(window, Vector2::new(0.0, 0.0)), Point::new(300, 300));
        assert_eq!(m.absolute(window, Vector2::new(1.0, 1.0)), Point::new(500, 100));
        assert_eq!(m.absolute(window, Vector2::new(-0.5, -0.25)), Point::new(200, 350));
        assert_eq!(m.absolute(window, Vector2::new(0.0049, 0.0)), Point::new(300, 300));
    }

    #[test]
    fn single_monitor_uses_absolute() {
        let only = monitor(0, 0, HD, true);
        let topology = Fixture::new(window_centered_on(&only), &[only]);
        let mut m = mapper();

        for offset in [Vector2::new(0.0, 0.0), Vector2::new(0.7, -0.3), Vector2::new(-1.0, 1.0)] {
            let window = topology.reference_window().unwrap();
            assert_eq!(m.resolve(&topology, offset), Some(m.absolute(window, offset)));
        }
    }

    #[test]
    fn primary_right_of_secondary_pushes_past_own_edge() {
        let primary = monitor(1920, 0, HD, true);
        let secondary = monitor(0, 0, HD, false);
        let topology = Fixture::new(window_centered_on(&primary), &[primary, secondary]);

        let resolved = mapper().resolve(&topology, Vector2::zeros()).unwrap();
        assert_eq!(resolved.x, 2880);
        assert_eq!(resolved.y, 540);
    }

    #[test]
    fn window_on_secondary_scales_into_primary() {
        let primary = monitor(1920, 0, (2560, 1440), true);
        let secondary = monitor(0, 0, HD, false);
        let topology = Fixture::new(window_centered_on(&secondary), &[primary, secondary]);

        let resolved = mapper().resolve(&topology, Vector2::new(0.5, 0.0)).unwrap();
        // Relative x 1060 of 1920 lands at 1413 of 2560.
        assert_eq!(resolved, Point::new(1920 + 1413, 540));
    }

    #[test]
    fn primary_below_secondary_pushes_past_own_height() {
        let primary = monitor(0, 1080, HD, true);
        let secondary = monitor(0, 0, HD, false);
        let topology = Fixture::new(window_centered_on(&primary), &[primary, secondary]);

        let resolved = mapper().resolve(&topology, Vector2::new(0.0, 1.0)).unwrap();
        assert_eq!(resolved, Point::new(960, 1080 + 340));
    }

    #[test]
    fn primary_left_of_secondary_is_untouched() {
        let primary = monitor(0, 0, HD, true);
        let secondary = monitor(1920, 0, HD, false);

        for current in [primary, secondary] {
            let topology = Fixture::new(window_centered_on(&current), &[primary, secondary]);
            let window = topology.reference_window().unwrap();
            let mut m = mapper();
            let offset = Vector2::new(0.3, 0.3);

            assert_eq!(m.resolve(&topology, offset), Some(m.absolute(window, offset)));
        }
    }

    #[test]
    fn results_are_not_clamped() {
        let only = monitor(0, 0, HD, true);
        let topology = Fixture::new(window_centered_on(&only), &[only]);
        let mut m = mapper();

        let resolved = m.resolve(&topology, Vector2::new(6.0, -4.0)).unwrap();
        assert_eq!(resolved, Point::new(960 + 1200, 540 + 800));
        assert!(!only.rect.contains(resolved));
    }

    #[test]
    fn disabled_compensation_uses_absolute() {
        let primary = monitor(1920, 0, HD, true);
        let secondary = monitor(0, 0, HD, false);
        let topology = Fixture::new(window_centered_on(&primary), &[primary, secondary]);
        let mut m = CoordinateMapper::new(200.0, Compensation::None);

        assert_eq!(m.resolve(&topology, Vector2::zeros()), Some(Point::new(2880, 540)));
    }

    #[test]
    fn topology_failures_fall_back() {
        let primary = monitor(1920, 0, HD, true);
        let window = window_centered_on(&primary);
        let mut topology = Fixture::new(window, &[primary, monitor(0, 0, HD, false)]);
        topology.monitors = None;

        let mut m = mapper();
        assert_eq!(m.resolve(&topology, Vector2::zeros()), Some(window.center()));

        topology.window.set(None);
        assert_eq!(m.resolve(&topology, Vector2::zeros()), Some(window.center()));

        let mut fresh = mapper();
        assert_eq!(fresh.resolve(&topology, Vector2::zeros()), None);
    }

    #[test]
    fn window_off_every_monitor_uses_nearest() {
        let layout = MonitorLayout::new([monitor(0, 0, HD, true), monitor(1920, 0, HD, false)]);

        let nearest = layout.at(Point::new(5000, 200)).unwrap();
        assert_eq!(nearest.rect.left, 1920);

        let nearest = layout.at(Point::new(-10, -10)).unwrap();
        assert!(nearest.primary);
    }

    #[test]
    fn monitor_center_follows_window() {
        let primary = monitor(1920, 0, HD, true);
        let secondary = monitor(0, 0, HD, false);
        let topology = Fixture::new(window_centered_on(&secondary), &[primary, secondary]);

        assert_eq!(
            mapper().current_monitor_center(&topology),
            Some(Point::new(960, 540))
        );
    }

    #[test]
    fn primary_below_secondary_scales_y_from_secondary() {
        let primary = monitor(0, 1080, (2560, 1440), true);
        let secondary = monitor(0, 0, HD, false);
        let topology = Fixture::new(window_centered_on(&secondary), &[primary, secondary]);

        let resolved = mapper().resolve(&topology, Vector2::new(0.0, -0.5)).unwrap();
        // Relative y 640 of 1080 lands at 853 of 1440; x is left alone.
        assert_eq!(resolved, Point::new(960, 1080 + 853));
    }

    #[test]
    fn window_scale_follows_window_height() {
        let only = monitor(0, 0, HD, true);
        let small = Rect::new(760, 340, 400, 400);
        let topology = Fixture::new(small, &[only]);
        let mut m = mapper().with_window_scale(Some(0.5));

        assert_eq!(m.radius(&topology), Some(200.0));
        assert_eq!(m.resolve(&topology, Vector2::new(1.0, 0.0)), Some(Point::new(1160, 540)));

        topology.window.set(Some(Rect::new(560, 140, 800, 800)));
        assert_eq!(m.radius(&topology), Some(400.0));
        assert_eq!(m.resolve(&topology, Vector2::new(0.0, 1.0)), Some(Point::new(960, 140)));
    }
}
