//! Command line arguments
//!
//! Every value is optional so the configuration layer can tell an explicit
//! flag apart from a default. See [`super::config`] for how these are
//! merged with the TOML file.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, Default, PartialEq)]
#[command(name = "trafficlight")]
#[command(about = "Randomized traffic light simulation")]
#[command(version)]
pub struct Args {
    /// Configuration file path
    #[arg(short = 'c', long = "config-file", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Number of independent lights
    #[arg(short = 'n', long = "lights", value_name = "COUNT")]
    pub lights: Option<usize>,

    /// Number of vehicles spread over the lights
    #[arg(short = 'v', long = "vehicles", value_name = "COUNT")]
    pub vehicles: Option<usize>,

    /// Shortest phase duration in milliseconds
    #[arg(long = "min-cycle-ms", value_name = "MS")]
    pub min_cycle_ms: Option<u64>,

    /// Longest phase duration in milliseconds (exclusive)
    #[arg(long = "max-cycle-ms", value_name = "MS")]
    pub max_cycle_ms: Option<u64>,

    /// Order in which queued transitions are handed out
    #[arg(long = "pop-order", value_name = "ORDER", value_parser = ["lifo", "fifo"])]
    pub pop_order: Option<String>,

    /// Stop after this many seconds (runs until interrupted when unset)
    #[arg(short = 'd', long = "duration", value_name = "SECONDS")]
    pub duration: Option<u64>,

    /// Interval between phase reports in milliseconds
    #[arg(short = 'r', long = "report-ms", value_name = "MS")]
    pub report_ms: Option<u64>,

    /// Log level
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = ["trace", "debug", "info", "warn", "error", "off"])]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(short = 'o', long = "log-format", value_name = "FORMAT", value_parser = ["text", "ext", "json"])]
    pub log_format: Option<String>,

    /// Log file path (use 'none' to disable file logging)
    #[arg(short = 'f', long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Force colored log output
    #[arg(short = 'g', long = "color", conflicts_with = "no_color")]
    pub color: bool,

    /// Disable colored log output
    #[arg(long = "no-color", conflicts_with = "color")]
    pub no_color: bool,
}

impl Args {
    /// Parse from an explicit argument list, including the program name
    pub fn parse_from_args(args: &[String]) -> Result<Self, clap::Error> {
        Self::try_parse_from(args)
    }

    /// Color choice from the flags: `Some(true)` for --color,
    /// `Some(false)` for --no-color, `None` when neither was given
    pub fn color_override(&self) -> Option<bool> {
        match (self.color, self.no_color) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }

    /// Log file with the magic values "none" and "-" mapped to no file
    pub fn effective_log_file(&self) -> Option<PathBuf> {
        self.log_file.as_ref().and_then(|path| {
            let value = path.to_string_lossy();
            if value.eq_ignore_ascii_case("none") || value == "-" {
                None
            } else {
                Some(path.clone())
            }
        })
    }
}
