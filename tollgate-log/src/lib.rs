//! Tollgate Logging
//!
//! Structured logging shared by the Tollgate crates. Output goes to stderr and
//! is controlled through `TOLLGATE_*` environment variables.
//!
//! # Usage
//!
//! ```rust
//! use tollgate_log::{debug, info, warn};
//!
//! info!("codec ready");
//! let subject = "user-42";
//! debug!("token issued"; subject = subject, lifetime = 3600);
//! warn!(target: "tollgate::auth", "rejected request from {}", "10.0.0.1");
//! ```
//!
//! # Environment Variables
//!
//! - `TOLLGATE_DEBUG=1` - Enable debug logging
//! - `TOLLGATE_LOG_LEVEL=trace|debug|info|warn|error|off` - Set log level
//! - `TOLLGATE_LOG_FORMAT=json|pretty|compact` - Set output format
//! - `TOLLGATE_LOG_COLOR=1|0` - Enable/disable colors (pretty format only)
//! - `TOLLGATE_LOG_TIMESTAMPS=1|0` - Include timestamps

use once_cell::sync::Lazy;
use std::env;
use std::fmt::{Display, Write as _};
use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

// ============================================================================
// Log Levels
// ============================================================================

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Level {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    /// No logging at all
    Off = 5,
}

impl Level {
    /// Parse a level name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Some(Level::Trace),
            "debug" => Some(Level::Debug),
            "info" => Some(Level::Info),
            "warn" | "warning" => Some(Level::Warn),
            "error" => Some(Level::Error),
            "off" | "none" => Some(Level::Off),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Off => "OFF",
        }
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Level::Trace,
            1 => Level::Debug,
            2 => Level::Info,
            3 => Level::Warn,
            4 => Level::Error,
            _ => Level::Off,
        }
    }

    /// Equivalent filter for the `log` facade.
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Level::Trace => log::LevelFilter::Trace,
            Level::Debug => log::LevelFilter::Debug,
            Level::Info => log::LevelFilter::Info,
            Level::Warn => log::LevelFilter::Warn,
            Level::Error => log::LevelFilter::Error,
            Level::Off => log::LevelFilter::Off,
        }
    }

    #[cfg(feature = "color")]
    fn colored(&self) -> colored::ColoredString {
        use colored::Colorize;
        match self {
            Level::Trace => "TRACE".magenta(),
            Level::Debug => "DEBUG".blue(),
            Level::Info => "INFO".green(),
            Level::Warn => "WARN".yellow(),
            Level::Error => "ERROR".red().bold(),
            Level::Off => "OFF".white(),
        }
    }
}

impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Trace => Level::Trace,
            log::Level::Debug => Level::Debug,
            log::Level::Info => Level::Info,
            log::Level::Warn => Level::Warn,
            log::Level::Error => Level::Error,
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Log Format
// ============================================================================

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Multi-part human readable line
    Pretty,
    /// Terse single-line format
    Compact,
    /// One JSON object per line
    Json,
}

impl Format {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Some(Format::Pretty),
            "compact" => Some(Format::Compact),
            "json" => Some(Format::Json),
            _ => None,
        }
    }
}

// ============================================================================
// Global Configuration
// ============================================================================

static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);

static LOG_LEVEL: AtomicU8 = AtomicU8::new(Level::Info as u8);

static CONFIG: Lazy<LogConfig> = Lazy::new(|| {
    let config = LogConfig::from_env();
    DEBUG_ENABLED.store(config.debug, Ordering::SeqCst);
    LOG_LEVEL.store(config.level as u8, Ordering::SeqCst);
    config
});

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub debug: bool,
    /// Minimum level written
    pub level: Level,
    pub format: Format,
    pub color: bool,
    pub timestamps: bool,
    /// Whether to print the target (module path)
    pub module_path: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            debug: false,
            level: Level::Info,
            format: Format::Json,
            color: false,
            timestamps: true,
            module_path: true,
        }
    }
}

fn env_flag(key: &str) -> Option<bool> {
    env::var(key)
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

impl LogConfig {
    /// Read configuration from `TOLLGATE_*` environment variables.
    pub fn from_env() -> Self {
        let debug = env_flag("TOLLGATE_DEBUG").unwrap_or(false);

        let level = env::var("TOLLGATE_LOG_LEVEL")
            .ok()
            .and_then(|s| Level::parse(&s))
            .unwrap_or(if debug { Level::Debug } else { Level::Info });

        let format = env::var("TOLLGATE_LOG_FORMAT")
            .ok()
            .and_then(|s| Format::parse(&s))
            .unwrap_or(Format::Json);

        // NO_COLOR wins over terminal detection
        let color = env_flag("TOLLGATE_LOG_COLOR")
            .unwrap_or_else(|| env::var("NO_COLOR").is_err() && env::var("TERM").is_ok());

        Self {
            debug,
            level,
            format,
            color,
            timestamps: env_flag("TOLLGATE_LOG_TIMESTAMPS").unwrap_or(true),
            module_path: env_flag("TOLLGATE_LOG_MODULE").unwrap_or(true),
        }
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Initialize the logging system eagerly.
///
/// Configuration is otherwise read on first use.
pub fn init() {
    Lazy::force(&CONFIG);
}

#[inline]
pub fn is_debug_enabled() -> bool {
    Lazy::force(&CONFIG);
    DEBUG_ENABLED.load(Ordering::Relaxed)
}

#[inline]
pub fn is_level_enabled(level: Level) -> bool {
    Lazy::force(&CONFIG);
    level != Level::Off && level as u8 >= LOG_LEVEL.load(Ordering::Relaxed)
}

pub fn current_level() -> Level {
    Lazy::force(&CONFIG);
    Level::from_u8(LOG_LEVEL.load(Ordering::Relaxed))
}

/// Change the minimum level at runtime.
pub fn set_level(level: Level) {
    Lazy::force(&CONFIG);
    LOG_LEVEL.store(level as u8, Ordering::SeqCst);
    log::set_max_level(level.to_level_filter());
}

/// Toggle debug mode at runtime. Enabling it lowers the level to `Debug`.
pub fn set_debug(enabled: bool) {
    Lazy::force(&CONFIG);
    DEBUG_ENABLED.store(enabled, Ordering::SeqCst);
    if enabled && current_level() > Level::Debug {
        set_level(Level::Debug);
    }
}

pub fn config() -> &'static LogConfig {
    &CONFIG
}

// ============================================================================
// Log Output
// ============================================================================

/// A structured key/value pair attached to a log line.
pub type Field<'a> = (&'a str, &'a dyn Display);

#[doc(hidden)]
pub fn log(level: Level, target: &str, message: &str) {
    log_with_fields(level, target, message, &[]);
}

#[doc(hidden)]
pub fn log_with_fields(level: Level, target: &str, message: &str, fields: &[Field<'_>]) {
    if !is_level_enabled(level) {
        return;
    }

    let line = format_line(config(), level, target, message, fields);
    let mut stderr = std::io::stderr().lock();
    let _ = writeln!(stderr, "{}", line);
}

/// Render a single log line without writing it.
pub fn format_line(
    config: &LogConfig,
    level: Level,
    target: &str,
    message: &str,
    fields: &[Field<'_>],
) -> String {
    match config.format {
        Format::Pretty => format_pretty(config, level, target, message, fields),
        Format::Compact => format_compact(config, level, target, message, fields),
        Format::Json => format_json(config, level, target, message, fields),
    }
}

fn format_pretty(
    config: &LogConfig,
    level: Level,
    target: &str,
    message: &str,
    fields: &[Field<'_>],
) -> String {
    let mut line = String::new();

    if config.timestamps {
        let now = chrono::Local::now();
        let _ = write!(line, "{} ", now.format("%Y-%m-%d %H:%M:%S%.3f"));
    }

    #[cfg(feature = "color")]
    if config.color {
        let _ = write!(line, "{:5} ", level.colored());
    } else {
        let _ = write!(line, "{:5} ", level.as_str());
    }

    #[cfg(not(feature = "color"))]
    let _ = write!(line, "{:5} ", level.as_str());

    if config.module_path && !target.is_empty() {
        let _ = write!(line, "[{}] ", target);
    }

    line.push_str(message);
    for (key, value) in fields {
        let _ = write!(line, " {}={}", key, value);
    }
    line
}

fn format_compact(
    config: &LogConfig,
    level: Level,
    target: &str,
    message: &str,
    fields: &[Field<'_>],
) -> String {
    let mut line = String::new();

    if config.timestamps {
        let _ = write!(line, "{} ", chrono::Local::now().format("%H:%M:%S"));
    }

    line.push(level.as_str().chars().next().unwrap_or('?'));
    line.push(' ');

    if config.module_path && !target.is_empty() {
        let _ = write!(line, "{}: ", target);
    }

    line.push_str(message);
    for (key, value) in fields {
        let _ = write!(line, " {}={}", key, value);
    }
    line
}

#[cfg(feature = "json")]
fn format_json(
    config: &LogConfig,
    level: Level,
    target: &str,
    message: &str,
    fields: &[Field<'_>],
) -> String {
    use serde::Serialize;

    #[derive(Serialize)]
    struct LogEntry<'a> {
        #[serde(skip_serializing_if = "Option::is_none")]
        timestamp: Option<String>,
        level: &'a str,
        target: &'a str,
        message: &'a str,
        #[serde(skip_serializing_if = "serde_json::Map::is_empty")]
        fields: serde_json::Map<String, serde_json::Value>,
    }

    let entry = LogEntry {
        timestamp: config.timestamps.then(|| chrono::Utc::now().to_rfc3339()),
        level: level.as_str(),
        target,
        message,
        fields: fields
            .iter()
            .map(|(key, value)| (key.to_string(), serde_json::Value::String(value.to_string())))
            .collect(),
    };

    serde_json::to_string(&entry).unwrap_or_else(|_| message.to_string())
}

#[cfg(not(feature = "json"))]
fn format_json(
    config: &LogConfig,
    level: Level,
    target: &str,
    message: &str,
    fields: &[Field<'_>],
) -> String {
    let mut line = String::from("{");
    if config.timestamps {
        let _ = write!(line, r#""timestamp":"{}","#, chrono::Utc::now().to_rfc3339());
    }
    let _ = write!(
        line,
        r#""level":"{}","target":"{}","message":"{}""#,
        level.as_str(),
        escape_json(target),
        escape_json(message)
    );
    if !fields.is_empty() {
        line.push_str(r#","fields":{"#);
        for (i, (key, value)) in fields.iter().enumerate() {
            if i > 0 {
                line.push(',');
            }
            let _ = write!(
                line,
                r#""{}":"{}""#,
                escape_json(key),
                escape_json(&value.to_string())
            );
        }
        line.push('}');
    }
    line.push('}');
    line
}

#[cfg(not(feature = "json"))]
fn escape_json(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(result, "\\u{:04x}", c as u32);
            }
            c => result.push(c),
        }
    }
    result
}

// ============================================================================
// `log` facade bridge
// ============================================================================

/// Routes records from the `log` facade into the Tollgate sink, so
/// dependencies that log through `log` share one output format.
pub struct LogBridge;

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        is_level_enabled(Level::from(metadata.level()))
    }

    fn log(&self, record: &log::Record<'_>) {
        if self.enabled(record.metadata()) {
            log(
                Level::from(record.level()),
                record.target(),
                &record.args().to_string(),
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static BRIDGE: LogBridge = LogBridge;

/// Install [`LogBridge`] as the global `log` logger.
///
/// Fails if another logger was installed first.
pub fn install_log_bridge() -> Result<(), log::SetLoggerError> {
    log::set_logger(&BRIDGE)?;
    log::set_max_level(current_level().to_level_filter());
    Ok(())
}

// ============================================================================
// Macros
// ============================================================================

#[doc(hidden)]
#[macro_export]
macro_rules! __emit {
    ($level:expr, target: $target:expr, $msg:literal; $($key:ident = $value:expr),+ $(,)?) => {
        if $crate::is_level_enabled($level) {
            $crate::log_with_fields(
                $level,
                $target,
                &format!($msg),
                &[$((stringify!($key), &$value as &dyn ::std::fmt::Display)),+],
            );
        }
    };
    ($level:expr, $msg:literal; $($key:ident = $value:expr),+ $(,)?) => {
        $crate::__emit!($level, target: module_path!(), $msg; $($key = $value),+)
    };
    ($level:expr, target: $target:expr, $($arg:tt)+) => {
        if $crate::is_level_enabled($level) {
            $crate::log($level, $target, &format!($($arg)+));
        }
    };
    ($level:expr, $($arg:tt)+) => {
        $crate::__emit!($level, target: module_path!(), $($arg)+)
    };
}

/// Log a trace message.
#[macro_export]
macro_rules! trace {
    ($($arg:tt)+) => { $crate::__emit!($crate::Level::Trace, $($arg)+) };
}

/// Log a debug message.
///
/// Enabled by `TOLLGATE_DEBUG=1` or `TOLLGATE_LOG_LEVEL=debug`.
///
/// # Example
///
/// ```rust
/// use tollgate_log::debug;
///
/// debug!("Processing request");
/// let subject = "user-1";
/// debug!("token decoded"; subject = subject);
/// debug!(target: "tollgate::jwt", "issued {} tokens", 2);
/// ```
#[macro_export]
macro_rules! debug {
    ($($arg:tt)+) => { $crate::__emit!($crate::Level::Debug, $($arg)+) };
}

/// Log an info message.
#[macro_export]
macro_rules! info {
    ($($arg:tt)+) => { $crate::__emit!($crate::Level::Info, $($arg)+) };
}

/// Log a warning message.
#[macro_export]
macro_rules! warn {
    ($($arg:tt)+) => { $crate::__emit!($crate::Level::Warn, $($arg)+) };
}

/// Log an error message.
#[macro_export]
macro_rules! error {
    ($($arg:tt)+) => { $crate::__emit!($crate::Level::Error, $($arg)+) };
}

// ============================================================================
// Tracing Integration
// ============================================================================

#[cfg(feature = "tracing")]
pub mod tracing_compat {
    //! Builds a `tracing` subscriber that honours the `TOLLGATE_*` level.

    use super::*;

    pub fn subscriber() -> impl tracing::Subscriber {
        use tracing_subscriber::prelude::*;
        use tracing_subscriber::{EnvFilter, fmt};

        let config = config();
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.level.as_str().to_lowercase()));

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_ansi(config.color))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(format: Format) -> LogConfig {
        LogConfig {
            format,
            timestamps: false,
            color: false,
            ..LogConfig::default()
        }
    }

    #[test]
    fn test_level_ordering() {
        assert!(Level::Trace < Level::Debug);
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warn);
        assert!(Level::Warn < Level::Error);
        assert!(Level::Error < Level::Off);
    }

    #[test]
    fn test_level_parse() {
        assert_eq!(Level::parse("debug"), Some(Level::Debug));
        assert_eq!(Level::parse(" DEBUG "), Some(Level::Debug));
        assert_eq!(Level::parse("warning"), Some(Level::Warn));
        assert_eq!(Level::parse("none"), Some(Level::Off));
        assert_eq!(Level::parse("loud"), None);
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(Format::parse("pretty"), Some(Format::Pretty));
        assert_eq!(Format::parse("Compact"), Some(Format::Compact));
        assert_eq!(Format::parse("json"), Some(Format::Json));
        assert_eq!(Format::parse("xml"), None);
    }

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(Level::from(log::Level::Warn), Level::Warn);
        assert_eq!(Level::Off.to_level_filter(), log::LevelFilter::Off);
        assert_eq!(Level::Trace.to_level_filter(), log::LevelFilter::Trace);
    }

    #[test]
    fn test_compact_line_with_fields() {
        let subject = "user-1";
        let line = format_line(
            &plain(Format::Compact),
            Level::Debug,
            "tollgate::jwt",
            "token issued",
            &[("subject", &subject as &dyn Display), ("lifetime", &3600 as &dyn Display)],
        );
        assert_eq!(line, "D tollgate::jwt: token issued subject=user-1 lifetime=3600");
    }

    #[test]
    fn test_pretty_line_without_target() {
        let config = LogConfig {
            module_path: false,
            ..plain(Format::Pretty)
        };
        let line = format_line(&config, Level::Warn, "ignored", "slow decode", &[]);
        assert_eq!(line, "WARN  slow decode");
    }

    #[test]
    fn test_json_line_carries_fields() {
        let line = format_line(
            &plain(Format::Json),
            Level::Info,
            "tollgate",
            "say \"hi\"",
            &[("subject", &"a" as &dyn Display)],
        );
        assert_eq!(
            line,
            r#"{"level":"INFO","target":"tollgate","message":"say \"hi\"","fields":{"subject":"a"}}"#
        );
    }

    #[test]
    fn test_json_line_omits_empty_fields() {
        let line = format_line(&plain(Format::Json), Level::Error, "t", "boom", &[]);
        assert!(!line.contains("fields"));
        assert!(line.contains(r#""level":"ERROR""#));
    }

    #[test]
    fn test_set_level_and_debug() {
        let original = current_level();

        set_level(Level::Error);
        assert_eq!(current_level(), Level::Error);
        assert!(!is_level_enabled(Level::Warn));
        assert!(is_level_enabled(Level::Error));

        set_debug(true);
        assert!(is_debug_enabled());
        assert_eq!(current_level(), Level::Debug);

        set_debug(false);
        set_level(original);
    }

    #[test]
    fn test_off_is_never_enabled() {
        assert!(!is_level_enabled(Level::Off));
    }

    #[test]
    fn test_macros_compile() {
        trace!("trace message");
        debug!("debug message");
        info!("info message");
        warn!("warn message");
        error!("error message");

        debug!(target: "test", "with target {}", 1);
        info!("with fields"; subject = "a", count = 2);
        warn!(target: "test", "with target and fields"; reason = "bad signature");

        let x = 42;
        debug!("formatted: {}", x);
        debug!("inline {x}");
    }
}
