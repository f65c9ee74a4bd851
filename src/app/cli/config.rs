//! TOML configuration file loading and settings resolution
//!
//! Settings are resolved in three layers: built-in defaults, then the
//! TOML file, then command line flags. TOML keys use the long flag names.

use crate::app::cli::args::Args;
use crate::core::error_handling::ContextualError;
use crate::light::{CycleInterval, LightConfig, DEFAULT_MAX_CYCLE_MS, DEFAULT_MIN_CYCLE_MS};
use crate::queue::PopOrder;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Directory under the platform config dir holding the default file
pub const CONFIG_DIR_NAME: &str = "Trafficlight";
pub const CONFIG_FILE_NAME: &str = "trafficlight.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for '{field}': {message}")]
    Invalid { field: String, message: String },

    #[error("Error reading configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error parsing configuration file {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

impl ConfigError {
    fn invalid(field: &str, message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl ContextualError for ConfigError {
    fn is_user_actionable(&self) -> bool {
        true
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            ConfigError::Invalid { message, .. } => Some(message),
            ConfigError::Parse { message, .. } => Some(message),
            ConfigError::Read { .. } => None,
        }
    }
}

/// Fully resolved simulation settings
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub lights: usize,
    pub vehicles: usize,
    pub min_cycle_ms: u64,
    pub max_cycle_ms: u64,
    pub pop_order: PopOrder,
    /// Run time in seconds; `None` runs until interrupted
    pub duration: Option<u64>,
    pub report_ms: u64,
    pub log_level: String,
    pub log_format: String,
    pub log_file: Option<PathBuf>,
    /// `None` means detect from the terminal
    pub color: Option<bool>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            lights: 2,
            vehicles: 4,
            min_cycle_ms: DEFAULT_MIN_CYCLE_MS,
            max_cycle_ms: DEFAULT_MAX_CYCLE_MS,
            pop_order: PopOrder::default(),
            duration: None,
            report_ms: 1000,
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            log_file: None,
            color: None,
        }
    }
}

/// Platform default location of the config file
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load the config file as a raw TOML table
///
/// An explicitly given file must exist. Without one the default location
/// is used only if a file is present there.
pub async fn load_config_file(
    config_file: Option<&Path>,
) -> Result<Option<(PathBuf, toml::Table)>, ConfigError> {
    let path = match config_file {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(None),
        },
    };

    let contents = tokio::fs::read_to_string(&path)
        .await
        .map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
    let table = toml::from_str::<toml::Table>(&contents).map_err(|e| ConfigError::Parse {
        path: path.clone(),
        message: e.to_string(),
    })?;

    log::debug!("Loaded configuration from {}", path.display());
    Ok(Some((path, table)))
}

fn toml_count(config: &toml::Table, key: &str) -> Result<Option<u64>, ConfigError> {
    match config.get(key) {
        None => Ok(None),
        Some(value) => match value.as_integer() {
            Some(n) if n >= 0 => Ok(Some(n as u64)),
            Some(n) => Err(ConfigError::invalid(key, format!("{} must not be negative (got {})", key, n))),
            None => Err(ConfigError::invalid(key, format!("{} must be an integer", key))),
        },
    }
}

fn toml_string<'a>(config: &'a toml::Table, key: &str) -> Result<Option<&'a str>, ConfigError> {
    match config.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_str()
            .map(Some)
            .ok_or_else(|| ConfigError::invalid(key, format!("{} must be a string", key))),
    }
}

// Whether a wait of this length can be turned into a deadline
fn fits_deadline(wait: Duration) -> bool {
    Instant::now().checked_add(wait).is_some()
}

fn parse_pop_order(field: &str, value: &str) -> Result<PopOrder, ConfigError> {
    value
        .parse::<PopOrder>()
        .map_err(|message| ConfigError::invalid(field, message))
}

impl SimulationConfig {
    /// Resolve settings from defaults, the config file and the command line
    pub async fn resolve(args: &Args) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some((_, table)) = load_config_file(args.config_file.as_deref()).await? {
            config.apply_toml_values(&table)?;
        }
        config.apply_args(args)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply TOML configuration values; unknown keys are ignored
    pub fn apply_toml_values(&mut self, config: &toml::Table) -> Result<(), ConfigError> {
        if let Some(lights) = toml_count(config, "lights")? {
            self.lights = lights as usize;
        }
        if let Some(vehicles) = toml_count(config, "vehicles")? {
            self.vehicles = vehicles as usize;
        }
        if let Some(min) = toml_count(config, "min-cycle-ms")? {
            self.min_cycle_ms = min;
        }
        if let Some(max) = toml_count(config, "max-cycle-ms")? {
            self.max_cycle_ms = max;
        }
        if let Some(order) = toml_string(config, "pop-order")? {
            self.pop_order = parse_pop_order("pop-order", order)?;
        }
        if let Some(duration) = toml_count(config, "duration")? {
            // 0 in the file means run until interrupted
            self.duration = (duration > 0).then_some(duration);
        }
        if let Some(report_ms) = toml_count(config, "report-ms")? {
            self.report_ms = report_ms;
        }
        if let Some(log_level) = toml_string(config, "log-level")? {
            self.log_level = log_level.to_string();
        }
        if let Some(log_format) = toml_string(config, "log-format")? {
            self.log_format = log_format.to_string();
        }
        if let Some(log_file) = toml_string(config, "log-file")? {
            if log_file.eq_ignore_ascii_case("none") || log_file == "-" {
                self.log_file = None;
            } else {
                self.log_file = Some(PathBuf::from(log_file));
            }
        }
        if let Some(value) = config.get("color") {
            let color = value
                .as_bool()
                .ok_or_else(|| ConfigError::invalid("color", "color must be true or false"))?;
            self.color = Some(color);
        }
        Ok(())
    }

    /// Apply command line flags (override the config file)
    pub fn apply_args(&mut self, args: &Args) -> Result<(), ConfigError> {
        if let Some(lights) = args.lights {
            self.lights = lights;
        }
        if let Some(vehicles) = args.vehicles {
            self.vehicles = vehicles;
        }
        if let Some(min) = args.min_cycle_ms {
            self.min_cycle_ms = min;
        }
        if let Some(max) = args.max_cycle_ms {
            self.max_cycle_ms = max;
        }
        if let Some(order) = &args.pop_order {
            self.pop_order = parse_pop_order("pop-order", order)?;
        }
        if let Some(duration) = args.duration {
            self.duration = (duration > 0).then_some(duration);
        }
        if let Some(report_ms) = args.report_ms {
            self.report_ms = report_ms;
        }
        if let Some(log_level) = &args.log_level {
            self.log_level = log_level.clone();
        }
        if let Some(log_format) = &args.log_format {
            self.log_format = log_format.clone();
        }
        if args.log_file.is_some() {
            self.log_file = args.effective_log_file();
        }
        if let Some(color) = args.color_override() {
            self.color = Some(color);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lights == 0 {
            return Err(ConfigError::invalid("lights", "at least one light is required"));
        }
        if self.report_ms == 0 {
            return Err(ConfigError::invalid("report-ms", "report interval must be greater than 0ms"));
        }
        if !matches!(self.log_format.as_str(), "text" | "ext" | "json") {
            return Err(ConfigError::invalid(
                "log-format",
                format!("unknown log format '{}' (expected text, ext or json)", self.log_format),
            ));
        }
        if let Some(duration) = self.duration {
            if !fits_deadline(Duration::from_secs(duration)) {
                return Err(ConfigError::invalid(
                    "duration",
                    format!("run time of {}s is too long", duration),
                ));
            }
        }
        if !fits_deadline(Duration::from_millis(self.max_cycle_ms)) {
            return Err(ConfigError::invalid(
                "max-cycle-ms",
                format!("cycle of {}ms is too long", self.max_cycle_ms),
            ));
        }
        self.interval()?;
        Ok(())
    }

    pub fn interval(&self) -> Result<CycleInterval, ConfigError> {
        CycleInterval::from_millis(self.min_cycle_ms, self.max_cycle_ms).map_err(|e| {
            let field = if self.min_cycle_ms == 0 {
                "min-cycle-ms"
            } else {
                "max-cycle-ms"
            };
            match e.user_message() {
                Some(reason) => ConfigError::invalid(field, reason),
                None => ConfigError::invalid(field, e.to_string()),
            }
        })
    }

    pub fn light_config(&self) -> Result<LightConfig, ConfigError> {
        Ok(LightConfig {
            interval: self.interval()?,
            pop_order: self.pop_order,
        })
    }

    pub fn duration(&self) -> Option<Duration> {
        self.duration.map(Duration::from_secs)
    }

    pub fn report_interval(&self) -> Duration {
        Duration::from_millis(self.report_ms)
    }

    /// Color setting with terminal detection for the unset case
    pub fn use_color(&self) -> bool {
        self.color
            .unwrap_or_else(|| std::io::IsTerminal::is_terminal(&std::io::stderr()))
    }
}
