//! Daemon configuration from environment variables

use relayq_api_http::ApiServerConfig;
use relayq_core::application::worker::constants::{
    DEFAULT_DRAIN_TIMEOUT, DEFAULT_LIST_LIMIT, DEFAULT_MAX_ATTEMPTS, DEFAULT_POLL_INTERVAL,
    DEFAULT_RETRY_INTERVAL,
};
use relayq_core::application::{DispatcherConfig, RetryPolicy, SuccessCriterion};
use relayq_core::error::{AppError, Result};
use relayq_infra_redis::{redis_url, DEFAULT_QUEUE_KEY, DEFAULT_REDIS_ADDR};
use relayq_infra_system::DEFAULT_FAILURE_LOG;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Operational log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            other => Err(format!("expected 'json' or 'pretty', got '{}'", other)),
        }
    }
}

/// Everything the daemon needs to wire itself up
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub redis_url: String,
    pub queue_key: String,
    pub http: ApiServerConfig,
    pub failure_log: PathBuf,
    pub max_attempts: u32,
    pub retry_interval: Duration,
    pub poll_interval: Duration,
    pub drain_timeout: Duration,
    pub max_in_flight: Option<usize>,
    pub success_criterion: SuccessCriterion,
    pub list_limit: usize,
    pub log_format: LogFormat,
    pub log_dir: Option<PathBuf>,
}

impl DaemonConfig {
    /// Read the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (the environment in production, a map in tests)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        // RELAYQ_REDIS_URL wins; otherwise REDIS_ADDR + REDIS_DB
        let redis_url = match get("RELAYQ_REDIS_URL") {
            Some(url) => url,
            None => {
                let addr = get("REDIS_ADDR").unwrap_or_else(|| DEFAULT_REDIS_ADDR.to_string());
                let db: i64 = parse(&get, "REDIS_DB", 0)?;
                redis_url(&addr, db)
            }
        };

        let defaults = ApiServerConfig::default();
        let http = ApiServerConfig {
            host: get("RELAYQ_HTTP_HOST").unwrap_or(defaults.host),
            port: parse(&get, "RELAYQ_HTTP_PORT", defaults.port)?,
            rate_limit_burst: parse(&get, "RELAYQ_RATE_LIMIT_BURST", defaults.rate_limit_burst)?,
            rate_limit_per_sec: parse(
                &get,
                "RELAYQ_RATE_LIMIT_RATE",
                defaults.rate_limit_per_sec,
            )?,
        };

        let failure_log =
            get("RELAYQ_FAILURE_LOG").unwrap_or_else(|| DEFAULT_FAILURE_LOG.to_string());
        let failure_log = PathBuf::from(shellexpand::tilde(&failure_log).into_owned());

        let max_attempts: u32 = parse(&get, "RELAYQ_MAX_RETRIES", DEFAULT_MAX_ATTEMPTS)?;
        if max_attempts == 0 {
            return Err(AppError::Config(
                "RELAYQ_MAX_RETRIES must be at least 1".to_string(),
            ));
        }

        let max_in_flight = match get("RELAYQ_MAX_IN_FLIGHT") {
            Some(_) => {
                let n: usize = parse(&get, "RELAYQ_MAX_IN_FLIGHT", 0)?;
                if n == 0 {
                    return Err(AppError::Config(
                        "RELAYQ_MAX_IN_FLIGHT must be at least 1 when set".to_string(),
                    ));
                }
                Some(n)
            }
            None => None,
        };

        let poll_interval = parse_millis(&get, "RELAYQ_POLL_INTERVAL_MS", DEFAULT_POLL_INTERVAL)?;
        if poll_interval.is_zero() {
            return Err(AppError::Config(
                "RELAYQ_POLL_INTERVAL_MS must be at least 1".to_string(),
            ));
        }

        let success_criterion =
            parse(&get, "RELAYQ_SUCCESS_CRITERION", SuccessCriterion::AnyResponse)?;
        let log_dir = get("RELAYQ_LOG_DIR")
            .map(|d| PathBuf::from(shellexpand::tilde(&d).into_owned()));

        Ok(Self {
            redis_url,
            queue_key: get("RELAYQ_QUEUE_KEY").unwrap_or_else(|| DEFAULT_QUEUE_KEY.to_string()),
            http,
            failure_log,
            max_attempts,
            retry_interval: parse_millis(&get, "RELAYQ_RETRY_INTERVAL_MS", DEFAULT_RETRY_INTERVAL)?,
            poll_interval,
            drain_timeout: parse_millis(&get, "RELAYQ_DRAIN_TIMEOUT_MS", DEFAULT_DRAIN_TIMEOUT)?,
            max_in_flight,
            success_criterion,
            list_limit: parse(&get, "RELAYQ_LIST_LIMIT", DEFAULT_LIST_LIMIT)?,
            log_format: parse(&get, "RELAYQ_LOG_FORMAT", LogFormat::Pretty)?,
            log_dir,
        })
    }

    pub fn retry_policy(&self) -> Result<RetryPolicy> {
        Ok(RetryPolicy::new(self.max_attempts, self.retry_interval)?
            .with_success_criterion(self.success_criterion))
    }

    pub fn dispatcher_config(&self) -> DispatcherConfig {
        DispatcherConfig {
            poll_interval: self.poll_interval,
            max_in_flight: self.max_in_flight,
            drain_timeout: self.drain_timeout,
        }
    }
}

fn parse<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid {}={:?}: {}", key, raw, e))),
        None => Ok(default),
    }
}

fn parse_millis(
    get: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: Duration,
) -> Result<Duration> {
    let ms: u64 = parse(get, key, default.as_millis() as u64)?;
    Ok(Duration::from_millis(ms))
}
