use std::{env, path::Path};

use dispatch_derive::{CliOptions, CliValue, KvDisplay};
use log::LevelFilter;

use crate::{
    Error, Result,
    constants::{
        DEFAULT_GEOCODE_ENDPOINT, DEFAULT_GEOCODE_INTERVAL_MS, DEFAULT_REGION, DEFAULT_USER_AGENT,
    },
};

/// Runtime options for a dispatch run.
#[derive(Clone, Debug, CliOptions, KvDisplay)]
pub struct DispatchOptions {
    /// Geocoding search endpoint (Nominatim-compatible).
    #[cli(long = "geocode-endpoint")]
    pub geocode_endpoint: String,
    /// `User-Agent` sent to the geocoding service; its usage policy requires one.
    #[cli(long = "user-agent")]
    pub user_agent: String,
    /// Pause between geocoding requests. Values under 1100 are raised.
    #[cli(long = "geocode-interval-ms")]
    pub geocode_interval_ms: u64,
    /// State/region used by the coarsest fallback query.
    #[cli(long = "region")]
    pub region: String,
    /// Geocode orders without coordinates before routing.
    #[cli(flag = "geocode")]
    pub geocode: bool,
    /// Fixed seed for cluster initialization. Unset means a fresh random seed.
    #[cli(long = "seed")]
    #[kv(fmt = "opt")]
    pub seed: Option<u64>,
    /// How orders are split between technicians.
    #[cli(long = "strategy", parse_with = "RouteStrategy::parse")]
    pub strategy: RouteStrategy,
    /// Comma-separated technician ids; overrides the ones in the input document.
    #[cli(long = "technicians")]
    pub technicians: String,
    /// Structured logging level.
    #[cli(long = "log-level", parse_with = "LogLevel::parse")]
    pub log_level: LogLevel,
    /// Logging output format.
    #[cli(long = "log-format", parse_with = "LogFormat::parse")]
    pub log_format: LogFormat,
    /// Include timestamps in log lines.
    #[cli(flag = "log-timestamp")]
    pub log_timestamp: bool,
    /// Optional output file path for logs. Empty means stderr.
    #[cli(long = "log-output")]
    pub log_output: String,
    /// Optional input file path for the dispatch document. Empty means stdin.
    #[cli(long = "input")]
    pub input: String,
    /// Optional output file path for the result. Empty means stdout.
    #[cli(long = "output")]
    pub output: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, CliValue)]
#[cli_value(option = "log-level")]
pub enum LogLevel {
    Error,
    #[cli(alias = "warning")]
    Warn,
    Info,
    Debug,
    Trace,
    Off,
}

impl LogLevel {
    pub fn to_filter(self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
            Self::Off => LevelFilter::Off,
        }
    }
}

/// `kmeans` clusters by proximity and sequences each cluster; `latitude`
/// cuts the orders into north-to-south bands.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, CliValue)]
#[cli_value(option = "strategy")]
pub enum RouteStrategy {
    #[default]
    #[cli(alias = "k-means")]
    Kmeans,
    #[cli(alias = "lat")]
    Latitude,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, CliValue)]
#[cli_value(option = "log-format")]
pub enum LogFormat {
    Compact,
    Pretty,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            geocode_endpoint: DEFAULT_GEOCODE_ENDPOINT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            geocode_interval_ms: DEFAULT_GEOCODE_INTERVAL_MS,
            region: DEFAULT_REGION.to_string(),
            geocode: true,
            seed: None,
            strategy: RouteStrategy::Kmeans,
            technicians: String::new(),
            log_level: LogLevel::Warn,
            log_format: LogFormat::Compact,
            log_timestamp: true,
            log_output: String::new(),
            input: String::new(),
            output: String::new(),
        }
    }
}

impl DispatchOptions {
    pub fn from_args() -> Result<Self> {
        Self::parse_from_iter(env::args().skip(1))
    }

    fn parse_from_iter<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = Self::default();
        let mut args = args
            .into_iter()
            .map(|arg| arg.as_ref().to_owned())
            .peekable();

        while let Some(arg) = args.next() {
            if arg == "--help" || arg == "-h" {
                return Err(Error::invalid_input(Self::usage()));
            }

            let Some(raw_name) = arg.strip_prefix("--") else {
                return Err(Error::invalid_input(format!(
                    "Unexpected argument: {arg}\n\n{}",
                    Self::usage()
                )));
            };

            if raw_name.is_empty() {
                return Err(Error::invalid_input(format!(
                    "Invalid option name: {arg}\n\n{}",
                    Self::usage()
                )));
            }

            let (name, value) = Self::split_arg(raw_name, &mut args);
            if !options.apply_cli_option(&name, value)? {
                return Err(Error::invalid_input(format!(
                    "Unknown option: --{name}\n\n{}",
                    Self::usage()
                )));
            }
        }

        Ok(options)
    }

    pub fn usage() -> String {
        format!(
            concat!(
                "Usage:\n",
                "  route-dispatch [options] [--input dispatch.json]\n",
                "  route-dispatch [options] < dispatch.json\n\n",
                "Input is either {{\"technicians\": [..], \"orders\": [..]}} or a bare\n",
                "array of orders combined with --technicians.\n\n",
                "Options:\n",
                "  --geocode-endpoint <url>\n",
                "  --user-agent <string>\n",
                "  --geocode-interval-ms <u64>   (minimum 1100)\n",
                "  --region <string>\n",
                "  --geocode[=<bool>]\n",
                "  --no-geocode\n",
                "  --seed <u64>\n",
                "  --strategy <{}>\n",
                "  --technicians <id,id,...>\n",
                "  --log-level <{}>\n",
                "  --log-format <{}>\n",
                "  --log-timestamp[=<bool>]\n",
                "  --no-log-timestamp\n",
                "  --log-output <path>\n",
                "  --input <path>\n",
                "  --output <path>\n",
                "  --help\n",
                "\n",
                "Examples:\n",
                "  route-dispatch --input dispatch.json --output routes.json\n",
                "  route-dispatch --no-geocode --seed 42 --technicians ana,bruno < orders.json\n",
                "  route-dispatch --log-level=info --log-output run.log < dispatch.json\n",
            ),
            RouteStrategy::VALUES,
            LogLevel::VALUES,
            LogFormat::VALUES,
        )
    }

    pub fn log_output_path(&self) -> Option<&Path> {
        non_stdio_path(&self.log_output)
    }

    pub fn input_path(&self) -> Option<&Path> {
        non_stdio_path(&self.input)
    }

    pub fn output_path(&self) -> Option<&Path> {
        non_stdio_path(&self.output)
    }

    /// Technician ids given on the command line, if any.
    pub fn technician_ids(&self) -> Option<Vec<String>> {
        let ids: Vec<String> = self
            .technicians
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect();
        (!ids.is_empty()).then_some(ids)
    }
}

fn non_stdio_path(raw: &str) -> Option<&Path> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "-" {
        None
    } else {
        Some(Path::new(trimmed))
    }
}
