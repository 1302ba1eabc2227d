use nbparam::cli::commands::{CliArgs, Commands};
use nbparam::cli::handlers::{handle_config, handle_parameterize, handle_scan};
use nbparam::util::logging::{init_logging, json_from_env, parse_level, LoggingConfig};
use nbparam::VERSION;

use clap::Parser;
use std::env;
use std::process;
use tracing::{debug, Level};

fn main() {
    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("nbparam v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Parameterize(parameterize_args) => handle_parameterize(parameterize_args),
        Commands::Scan(scan_args) => handle_scan(scan_args),
        Commands::Config(config_args) => handle_config(config_args),
    };

    process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs) {
    let level = if let Some(level_str) = &args.log_level {
        parse_level(level_str)
    } else if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::ERROR
    } else {
        let level_str = env::var("NBPARAM_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        parse_level(&level_str)
    };

    init_logging(LoggingConfig {
        level,
        use_json: json_from_env(),
    });
}
