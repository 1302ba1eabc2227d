//! Command handlers. Each returns the process exit code.

use super::commands::{ConfigArgs, ParameterizeArgs, ScanArgs};
use super::output::{OutputFormat, OutputFormatter};
use crate::config::NbParamConfig;
use crate::fs::RealFileSystem;
use crate::pipeline::{ParameterizeReport, Parameterizer};
use tracing::{error, info};

pub fn handle_parameterize(args: &ParameterizeArgs) -> i32 {
    let Some(parameterizer) = load_parameterizer() else {
        return 1;
    };

    let report = match parameterizer.parameterize(
        &args.input,
        args.output.as_deref(),
        args.snippet.into(),
    ) {
        Ok(r) => r,
        Err(e) => {
            error!("Parameterization failed: {}", e);
            return 1;
        }
    };

    if let Some(output) = &report.output {
        info!("Output written to: {}", output.display());
    }
    print_report(&report, args.format.into())
}

pub fn handle_scan(args: &ScanArgs) -> i32 {
    let Some(parameterizer) = load_parameterizer() else {
        return 1;
    };

    match parameterizer.scan(&args.input) {
        Ok(report) => print_report(&report, args.format.into()),
        Err(e) => {
            error!("Scan failed: {}", e);
            1
        }
    }
}

pub fn handle_config(args: &ConfigArgs) -> i32 {
    let config = NbParamConfig::default();
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return 1;
    }

    let formatter = OutputFormatter::new(args.format.into());
    match formatter.format_config(&config) {
        Ok(output) => {
            println!("{}", output);
            0
        }
        Err(e) => {
            error!("Failed to format configuration: {}", e);
            1
        }
    }
}

fn load_parameterizer() -> Option<Parameterizer<RealFileSystem>> {
    let config = NbParamConfig::default();
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        eprintln!("\nPlease check your NBPARAM_* environment variables.");
        return None;
    }
    Some(Parameterizer::new(RealFileSystem::new(), config))
}

fn print_report(report: &ParameterizeReport, format: OutputFormat) -> i32 {
    let formatter = OutputFormatter::new(format);
    match formatter.format_report(report) {
        Ok(output) => {
            println!("{}", output);
            0
        }
        Err(e) => {
            error!("Failed to format output: {}", e);
            1
        }
    }
}
