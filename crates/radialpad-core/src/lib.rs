#![deny(clippy::all)]
pub mod bridge;
pub mod contact;
pub mod direction;
pub mod dispatch;
pub mod mapping;
pub mod monitor;
pub mod source;
pub mod util;
