use crate::snippets::SnippetKind;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Turns literal values in notebook code cells into injectable parameters
#[derive(Parser, Debug)]
#[command(
    name = "nbparam",
    about = "Turns literal values in notebook code cells into injectable parameters",
    version,
    author,
    long_about = "nbparam scans the code cells of a Jupyter notebook for hard-coded values \
                  (quoted assignments, %env directives, file references and storage URIs), \
                  replaces each with a PARAM_* name, and declares every name once in a tagged \
                  header cell that runners such as papermill can override."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(
        short = 'v',
        long,
        global = true,
        help = "Enable debug logging"
    )]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - only log errors"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Parameterize a notebook and write the result",
        long_about = "Rewrites literal values into PARAM_* names, prepends a header cell that \
                      declares them and optionally a runner snippet, then writes a new \
                      notebook.\n\n\
                      Examples:\n  \
                      nbparam parameterize train.ipynb\n  \
                      nbparam parameterize train.ipynb -o train-params.ipynb\n  \
                      nbparam parameterize train.ipynb --snippet papermill --format json"
    )]
    Parameterize(ParameterizeArgs),

    #[command(
        about = "Show the parameters a notebook would get, without writing",
        long_about = "Runs detection and the document-wide sync in memory and prints the \
                      resulting parameter table.\n\n\
                      Examples:\n  \
                      nbparam scan train.ipynb\n  \
                      nbparam scan train.ipynb --format yaml"
    )]
    Scan(ScanArgs),

    #[command(about = "Show the effective configuration")]
    Config(ConfigArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct ParameterizeArgs {
    #[arg(value_name = "INPUT", help = "Notebook to parameterize")]
    pub input: PathBuf,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Where to write the result (defaults to <input>-parameterized.ipynb)"
    )]
    pub output: Option<PathBuf>,

    #[arg(
        short = 's',
        long,
        value_enum,
        default_value = "none",
        help = "Usage snippet to prepend"
    )]
    pub snippet: SnippetArg,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Report format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct ScanArgs {
    #[arg(value_name = "INPUT", help = "Notebook to scan")]
    pub input: PathBuf,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Report format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct ConfigArgs {
    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnippetArg {
    None,
    Papermill,
    Nbrun,
}

impl From<SnippetArg> for SnippetKind {
    fn from(arg: SnippetArg) -> Self {
        match arg {
            SnippetArg::None => SnippetKind::None,
            SnippetArg::Papermill => SnippetKind::Papermill,
            SnippetArg::Nbrun => SnippetKind::NbRun,
        }
    }
}
