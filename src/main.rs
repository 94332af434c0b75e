use clap::Parser;
use log::{info, warn};
use snafu::ErrorCompat;

mod args;
mod report;

fn main() {
    let args = args::Args::parse();

    let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
    if args.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
    info!("args: {:?}", args);

    if let Err(e) = report::run(&args) {
        warn!("Error occured {:?}", e);
        eprintln!("An error occured: {}", e);
        let mut cause = std::error::Error::source(&e);
        while let Some(err) = cause {
            eprintln!("  caused by: {}", err);
            cause = std::error::Error::source(err);
        }
        if let Some(bt) = ErrorCompat::backtrace(&e) {
            eprintln!("trace: {}", bt);
        }
        std::process::exit(1);
    }
}
