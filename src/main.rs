//! `linux-resolver` command-line entry point.

use clap::Parser;
use linux_resolver::{Cli, Config, Host, Messages, execute};
use tracing_subscriber::EnvFilter;

#[allow(clippy::print_stderr)]
fn main() {
    let config = Cli::parse().into_config();
    init_logging(&config);

    if let Err(e) = execute(&config, &Host::system()) {
        eprintln!("{}", Messages::new(config.language).fatal(&e));
        std::process::exit(1);
    }
}

fn init_logging(config: &Config) {
    let default_level = if config.quiet { "warn" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}
