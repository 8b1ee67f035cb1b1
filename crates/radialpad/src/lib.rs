#![deny(clippy::all)]
pub mod config;
pub mod display;
pub mod gamepad;
pub mod log;
