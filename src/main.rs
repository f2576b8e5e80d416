//! cache-stride CLI
//!
//! Usage:
//!   cache-stride --row_size <INT> [--col_size <INT>] [--alignment]
//!
//! Exit codes: 0 success, 1 missing or invalid parameters, 2 allocation failure.

use clap::error::ErrorKind;
use clap::Parser;
use tracing_subscriber::{filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cache_stride::{Cli, Config};

fn init_logging(level: LevelFilter) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = err.print();
            std::process::exit(code);
        }
    };

    init_logging(cli.log_level);

    let result = Config::from_cli(&cli).and_then(|config| cache_stride::run(&config));
    match result {
        Ok(summary) => println!("{summary}"),
        Err(e) => {
            println!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
