#![deny(clippy::all)]

use std::error::Error;

use crossbeam::channel;
use log::info;
use radialpad::{config, display::StaticTopology, gamepad::GilrsSource, log::LoggerBuilder};
use radialpad_core::dispatch::Dispatcher;

pub fn main() -> Result<(), Box<dyn Error>> {
    let config_path = config::default_path().ok_or("Failed to get config directory")?;

    if let Some(dir) = config_path.parent() {
        panic_log::install(dir.join(panic_log::DEFAULT_FILE_NAME));
    }

    let (log_tx, log_rx) = channel::unbounded();
    LoggerBuilder::new()
        .sender(log_tx)
        .with_level(log::LevelFilter::Trace)
        .build()?
        .init()?;
    radialpad::log::spawn_writer(log_rx)?;

    let config = config::load_or_create(&config_path);
    log::set_max_level(config.log_level.into());

    let topology = StaticTopology::new(&config.display);
    let injector = config.dispatch.driver.create_injector(topology.desktop())?;
    info!("Injecting through {}", injector.driver_name());

    let mut dispatcher = Dispatcher::new(
        config.dispatch,
        GilrsSource::new(config.invert_y),
        Box::new(topology),
        injector,
    );

    dispatcher.run();
    Ok(())
}
