//! Output formatting for multiple formats
//!
//! Reports and configuration render as JSON, YAML or human-readable text.

use anyhow::{Context, Result};

use crate::config::NbParamConfig;
use crate::header::render_declaration;
use crate::pipeline::ParameterizeReport;

const RULE: &str = "\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}";

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format
    Yaml,
    /// Human-readable formatted text
    Human,
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats the result of a `parameterize` or `scan` run
    pub fn format_report(&self, report: &ParameterizeReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(report)
                .context("Failed to serialize report to JSON"),
            OutputFormat::Yaml => {
                serde_yaml::to_string(report).context("Failed to serialize report to YAML")
            }
            OutputFormat::Human => Ok(self.format_report_human(report)),
        }
    }

    pub fn format_config(&self, config: &NbParamConfig) -> Result<String> {
        let config_map = config.to_display_map();
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&config_map)
                .context("Failed to serialize config to JSON"),
            OutputFormat::Yaml => {
                serde_yaml::to_string(&config_map).context("Failed to serialize config to YAML")
            }
            OutputFormat::Human => Ok(config.to_string()),
        }
    }

    fn format_report_human(&self, report: &ParameterizeReport) -> String {
        let mut output = String::new();

        match &report.output {
            Some(path) => {
                output.push_str("\u{2713} Notebook Parameterized\n");
                output.push_str(RULE);
                output.push_str("\n\n");
                output.push_str(&format!("Input:   {}\n", report.input.display()));
                output.push_str(&format!("Output:  {}\n", path.display()));
                output.push_str(&format!("Snippet: {}\n\n", report.snippet));
            }
            None => {
                output.push_str("Notebook Scan (nothing written)\n");
                output.push_str(RULE);
                output.push_str("\n\n");
                output.push_str(&format!("Input:   {}\n\n", report.input.display()));
            }
        }

        if report.parameters.is_empty() {
            output.push_str("Parameters: (none found)\n");
        } else {
            output.push_str(&format!(
                "Parameters ({} new, {} reused):\n",
                report.new_parameters, report.reused_parameters
            ));
            let last = report.parameters.len() - 1;
            for (i, p) in report.parameters.iter().enumerate() {
                let connector = if i == last { "\u{2514}" } else { "\u{251C}" };
                output.push_str(&format!(
                    "{}\u{2500} {}\n",
                    connector,
                    render_declaration(&p.name, &p.value)
                ));
            }
        }

        let stats = &report.stats;
        output.push_str("\nRewrite Summary:\n");
        output.push_str(&format!(
            "\u{251C}\u{2500} Code cells:     {}\n",
            stats.code_cells
        ));
        output.push_str(&format!(
            "\u{251C}\u{2500} Lines scanned:  {}\n",
            stats.lines_scanned
        ));
        output.push_str(&format!(
            "\u{251C}\u{2500} Lines rewritten: {} (+{} synced)\n",
            stats.lines_rewritten, stats.lines_synced
        ));
        output.push_str(&format!(
            "\u{2514}\u{2500} Missed:         {}\n",
            stats.missed_substitutions
        ));

        if stats.missed_substitutions > 0 {
            output.push_str(
                "\n\u{26A0} Some captured literals could not be located in their line and were left in place.\n",
            );
        }

        output
    }
}
