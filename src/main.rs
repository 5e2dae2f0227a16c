mod cli;

use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use clap::Parser;
use cli::Cli;
use log::{error, info, LevelFilter};
use wind_monitor::{Manager, Result};

fn main() -> ExitCode {
    //Parse the arguments and build the Cli structure from them
    let cli = Cli::parse();
    init_logging(cli.debug);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(debug: bool) {
    let mut builder = env_logger::Builder::from_default_env();
    if debug {
        builder.filter_module("wind_monitor", LevelFilter::Debug);
    } else if std::env::var_os("RUST_LOG").is_none() {
        builder.filter_level(LevelFilter::Info);
    }
    builder.init();
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.monitor_config()?;

    //the manager owns the speed pin; prepare() starts the sampling thread
    let mut manager = Manager::new(&config)?;
    manager.prepare()?;
    let pending = manager.pending();

    info!("Waiting for wind data to be ready");

    //Main consumer loop
    loop {
        if !pending.is_empty()? {
            for datapoint in pending.take()? {
                println!(
                    "Wind speed for timestamp {} : {:.2} m/s",
                    datapoint.timestamp,
                    datapoint.avg_speed.meters_per_sec()
                );
                println!(
                    "Wind gust for timestamp {} : {:.2} m/s",
                    datapoint.timestamp,
                    datapoint.gust_speed.meters_per_sec()
                );
            }
        }

        //Wait a moment before the next check to keep this core mostly idle
        thread::sleep(Duration::from_millis(cli.poll_interval_ms));
    }
}
