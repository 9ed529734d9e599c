//! Firmament logging facade
//!
//! Re-exports the `log` macros and provides a small target-filtering logger, so every crate of
//! the workspace writes to the same subscriber.

pub use log::{debug, error, info, log, log_enabled, trace, warn, Level, LevelFilter};
use once_cell::sync::OnceCell;

static LOG: OnceCell<Log> = OnceCell::new();

/// Logger with ordered per-target level rules
pub struct Log {
    /// Subscription timestamp
    pub instant: std::time::Instant,
    /// Target prefix rules, the first matching prefix wins
    pub targets: Vec<(String, LevelFilter)>,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            instant: std::time::Instant::now(),
            targets: vec![
                (String::from("wgpu"), LevelFilter::Warn),
                (String::from("naga"), LevelFilter::Warn),
                (String::from("firmament"), LevelFilter::Info),
                (String::from(""), LevelFilter::Debug),
            ],
        }
    }
}

impl Log {
    /// Puts a rule in front of the existing ones
    #[must_use]
    pub fn with_target(mut self, prefix: &str, level: LevelFilter) -> Self {
        self.targets.insert(0, (String::from(prefix), level));
        self
    }

    /// Applies overrides from an environment variable in `target=level,...` form
    ///
    /// A bare level without a target applies to every target.
    #[must_use]
    pub fn from_env(self, var: &str) -> Self {
        match std::env::var(var) {
            Ok(value) => self.with_rules(&value),
            Err(_) => self,
        }
    }

    /// Puts `target=level,...` rules in front of the existing ones, keeping their order
    #[must_use]
    pub fn with_rules(mut self, value: &str) -> Self {
        for (prefix, level) in parse_rules(value).into_iter().rev() {
            self = self.with_target(&prefix, level);
        }
        self
    }

    /// Returns level filter of the first rule matching the target
    pub fn level_for(&self, target: &str) -> LevelFilter {
        self.targets
            .iter()
            .find(|(prefix, _)| target.starts_with(prefix.as_str()))
            .map(|(_, level)| *level)
            .unwrap_or(LevelFilter::Off)
    }

    fn max_level(&self) -> LevelFilter {
        self.targets
            .iter()
            .map(|(_, level)| *level)
            .max()
            .unwrap_or(LevelFilter::Off)
    }
}

impl log::Log for Log {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level().to_level_filter() <= self.level_for(metadata.target())
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            println!(
                "{:.4} {} {} - {}",
                self.instant.elapsed().as_secs_f64(),
                level_mark(record.level()),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {}
}

/// Error of the logger subscription
#[derive(Debug, Eq, PartialEq)]
pub enum SubscribeError {
    /// `subscribe` was already called in this process
    AlreadySubscribed,
    /// Some other logger was installed into the `log` crate
    LoggerExists,
}

impl std::error::Error for SubscribeError {}

impl std::fmt::Display for SubscribeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubscribeError::AlreadySubscribed => {
                write!(f, "Log subscription must be initiated only once")
            }
            SubscribeError::LoggerExists => write!(f, "Other log subscription already exists"),
        }
    }
}

/// Installs the logger, reporting a repeated subscription as an error
///
/// `AlreadySubscribed` is returned only while a `Log` is the installed logger. If another
/// logger took the `log` crate first, every attempt reports `LoggerExists`.
pub fn try_subscribe(logger: Log) -> Result<(), SubscribeError> {
    let max_level = logger.max_level();

    if LOG.set(logger).is_err() {
        return Err(match LOG.get() {
            Some(stored) if is_installed(stored) => SubscribeError::AlreadySubscribed,
            _ => SubscribeError::LoggerExists,
        });
    }
    let logger = LOG.get().ok_or(SubscribeError::LoggerExists)?;

    log::set_logger(logger)
        .map(|()| log::set_max_level(max_level))
        .map_err(|_| SubscribeError::LoggerExists)
}

fn is_installed(logger: &'static Log) -> bool {
    std::ptr::eq(
        log::logger() as *const dyn log::Log as *const u8,
        logger as *const Log as *const u8,
    )
}

/// Installs the logger
///
/// Panics if called twice
pub fn subscribe(logger: Log) {
    if let Err(err) = try_subscribe(logger) {
        panic!("{}", err);
    }
}

fn level_mark(level: Level) -> &'static str {
    match level {
        Level::Error => "!!",
        Level::Warn => "!~",
        Level::Info => "--",
        Level::Debug => "**",
        Level::Trace => "->",
    }
}

/// Parses `target=level` pairs separated by commas
fn parse_rules(value: &str) -> Vec<(String, LevelFilter)> {
    value
        .split(',')
        .map(str::trim)
        .filter(|rule| !rule.is_empty())
        .filter_map(|rule| match rule.split_once('=') {
            Some((target, level)) => level
                .trim()
                .parse::<LevelFilter>()
                .ok()
                .map(|level| (String::from(target.trim()), level)),
            None => rule
                .parse::<LevelFilter>()
                .ok()
                .map(|level| (String::new(), level)),
        })
        .collect()
}
