use crate::ConfigError;
use serde::Deserialize;
use std::fmt;
use std::ops::Range;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Default API host of the ordering system
pub const DEFAULT_BASE_URL: &str = "https://olo-api.kfcclub.com.tw/";

/// Browser identity presented to the API
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/103.0.0.0 Safari/537.36";

pub const DEFAULT_ORIGIN: &str = "https://www.kfcclub.com.tw";
pub const DEFAULT_REFERER: &str = "https://www.kfcclub.com.tw/";

/// Main configuration structure for kcouper
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub shop: ShopConfig,
    pub harvest: HarvestConfig,
    pub retry: RetryConfig,
    pub pacing: PacingConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

/// Remote API endpoint and transport identity
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    #[serde(rename = "base-url")]
    pub base_url: String,

    #[serde(rename = "user-agent")]
    pub user_agent: String,

    pub origin: String,

    pub referer: String,

    /// Per-request timeout in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            origin: DEFAULT_ORIGIN.to_string(),
            referer: DEFAULT_REFERER.to_string(),
            timeout_secs: 30,
        }
    }
}

/// Shop context every query is issued against
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ShopConfig {
    pub code: String,
}

/// Code ranges to harvest and to existence-check
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HarvestConfig {
    pub ranges: Vec<CodeRange>,

    #[serde(rename = "check-ranges")]
    pub check_ranges: Vec<CodeRange>,

    /// Flavor option names dropped from normalized records
    #[serde(rename = "exclude-names")]
    pub exclude_names: Vec<String>,
}

/// Back-off policy for HTTP 502 responses
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    #[serde(rename = "delay-ms")]
    pub delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 10,
            delay_ms: 30_000,
        }
    }
}

impl RetryConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Rate limiting between candidates and between ranges
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Pause after each accepted candidate (milliseconds)
    #[serde(rename = "candidate-delay-ms")]
    pub candidate_delay_ms: u64,

    /// Pause after each completed range (milliseconds)
    #[serde(rename = "range-delay-ms")]
    pub range_delay_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            candidate_delay_ms: 300,
            range_delay_ms: 30_000,
        }
    }
}

impl PacingConfig {
    pub fn candidate_delay(&self) -> Duration {
        Duration::from_millis(self.candidate_delay_ms)
    }

    pub fn range_delay(&self) -> Duration {
        Duration::from_millis(self.range_delay_ms)
    }

    /// No pauses at all; used by tests and dry local runs
    pub fn none() -> Self {
        Self {
            candidate_delay_ms: 0,
            range_delay_ms: 0,
        }
    }
}

/// Where the catalog artifacts are written
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
        }
    }
}

/// Log file location; stdout logging is always on
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: Some(PathBuf::from("debug.log")),
        }
    }
}

/// Half-open range of candidate coupon codes, written as `start-end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct CodeRange {
    pub start: u32,
    pub end: u32,
}

impl CodeRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Iterates candidate codes in ascending order
    pub fn codes(&self) -> Range<u32> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Parses a comma-separated list such as `"20000-21000, 24000-25000"`
    pub fn parse_list(raw: &str) -> Result<Vec<Self>, ConfigError> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse)
            .collect()
    }
}

impl FromStr for CodeRange {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidRange(s.to_string());
        let (start, end) = s.trim().split_once('-').ok_or_else(invalid)?;
        let start = start.trim().parse().map_err(|_| invalid())?;
        let end = end.trim().parse().map_err(|_| invalid())?;
        Ok(Self { start, end })
    }
}

impl TryFrom<String> for CodeRange {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for CodeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}
