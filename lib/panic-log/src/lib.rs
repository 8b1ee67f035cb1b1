#![deny(clippy::all)]
use std::{
    fs, io,
    panic::{self, PanicInfo},
    path::PathBuf,
    sync::atomic::{AtomicBool, Ordering},
    thread,
};

use backtrace::Backtrace;
use once_cell::sync::OnceCell;

static PANICKED: AtomicBool = AtomicBool::new(false);
static LOG_PATH: OnceCell<PathBuf> = OnceCell::new();

pub const DEFAULT_FILE_NAME: &str = "panic.log";

/// Installs a panic hook that writes the panic message and a backtrace to
/// `path`, then runs whichever hook was installed before.
///
/// Only the first call picks the path; later calls keep it.
pub fn install(path: impl Into<PathBuf>) {
    let _ = LOG_PATH.set(path.into());

    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        hook(info);
        previous(info);
    }));
}

/// Writes panic information to the installed path, or `panic.log` in the
/// current working directory when [`install`] was never called.
pub fn hook(info: &PanicInfo<'_>) {
    let path = LOG_PATH
        .get()
        .cloned()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_FILE_NAME));

    if let Ok(mut log) = fs::File::create(path) {
        let _ = write_report(&mut log, info);
    }

    PANICKED.store(true, Ordering::Release);
}

pub fn panicked() -> bool {
    PANICKED.load(Ordering::Acquire)
}

fn write_report(out: &mut dyn io::Write, info: &PanicInfo<'_>) -> io::Result<()> {
    let msg = match info.payload().downcast_ref::<&'static str>() {
        Some(s) => *s,
        None => match info.payload().downcast_ref::<String>() {
            Some(s) => &s[..],
            None => "Box<dyn Any>",
        },
    };
    let thread = thread::current();
    let name = thread.name().unwrap_or("<unnamed>");

    match info.location() {
        Some(location) => writeln!(out, "thread '{name}' panicked at '{msg}', {location}")?,
        None => writeln!(out, "thread '{name}' panicked at '{msg}'")?,
    }

    writeln!(out, "stack backtrace:")?;
    writeln!(out, "{:?}", Backtrace::new())
}
