//! Entry point for **qs-recolor**.
//!
//! Loads the config, applies command-line overrides, runs one sync and
//! exits with status 0 on success or 1 on a fatal error.

use log::{error, info};
use qs_recolor::cli::{Args, USAGE};
use qs_recolor::config::{default_config_path, Config};
use qs_recolor::process::system::SystemProcesses;
use qs_recolor::sync;
use std::io::Write;
use std::path::PathBuf;

/// Load the config file.
///
/// The default file may be missing or broken, in which case the compiled-in
/// defaults are used; an explicit `--config` that cannot be loaded is fatal.
fn load_config(explicit: Option<&PathBuf>) -> Option<Config> {
    let Some(path) = explicit else {
        return Some(Config::load_or_default(&default_config_path()));
    };
    match Config::load(path) {
        Ok(cfg) => {
            info!("loaded config from {}", path.display());
            Some(cfg)
        }
        Err(e) => {
            error!("{}", e);
            None
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match Args::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", USAGE);
            std::process::exit(1);
        }
    };
    if args.help {
        println!("{}", USAGE);
        return;
    }

    let Some(mut config) = load_config(args.config.as_ref()) else {
        std::process::exit(1);
    };
    args.apply(&mut config);

    let result = sync::run(&config, SystemProcesses::new(), args.dry_run);
    match &result {
        Ok(report) if args.dry_run => {
            let mut out = std::io::stdout().lock();
            if let Err(e) = out.write_all(report.patch.text.as_bytes()) {
                error!("failed to print patched file: {}", e);
            }
        }
        Ok(_) => info!("done"),
        Err(e) => error!("{}", e),
    }
    std::process::exit(sync::exit_code(&result));
}
