use chrono::Local;
use log::{LevelFilter, Metadata, Record, SetLoggerError};
use std::collections::HashSet;
use std::io::{self, Write};
use std::sync::OnceLock;

/// Debug topics accepted by `--debug-filter`
pub const TOPICS: [&str; 5] = ["arena", "movement", "sight", "combat", "world"];

// Custom logger structure
#[derive(Debug)]
struct ArenaLogger {
    level: LevelFilter,
    debug_filters: Option<HashSet<String>>,
}

impl log::Log for ArenaLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        if metadata.level() > self.level {
            return false;
        }
        // Topic filters only narrow down debug and trace output
        if let Some(filters) = &self.debug_filters {
            if metadata.level() >= log::Level::Debug {
                return filters.contains(metadata.target())
                    || filters.iter().any(|f| metadata.target().starts_with(f.as_str()));
            }
        }
        true
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let level_color = match record.level() {
            log::Level::Error => "\x1B[31m", // Red
            log::Level::Warn => "\x1B[33m",  // Yellow
            log::Level::Info => "\x1B[32m",  // Green
            log::Level::Debug => "\x1B[36m", // Cyan
            log::Level::Trace => "\x1B[35m", // Magenta
        };
        let reset = "\x1B[0m";
        let timestamp = Local::now().format("%H:%M:%S%.3f");

        let mut output = format!(
            "{timestamp} {level_color}{level:5}{reset} {target}: {message}",
            level = record.level(),
            target = record.target(),
            message = record.args()
        );

        // Add module path if available and different from target
        if let Some(module_path) = record.module_path() {
            if module_path != record.target() {
                output.push_str(&format!(" [{}]", module_path));
            }
        }

        // A closed stdout is not worth crashing the simulation over
        let mut stdout = io::stdout().lock();
        let _ = writeln!(stdout, "{}", output);
        let _ = stdout.flush();
    }

    fn flush(&self) {
        let _ = io::stdout().flush();
    }
}

static LOGGER: OnceLock<ArenaLogger> = OnceLock::new();

/// Parses a comma separated topic list such as "movement, sight"
pub fn parse_debug_filter(filter: &str) -> HashSet<String> {
    filter
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Maps a `--log-level` value to a filter, defaulting to Info
pub fn parse_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

/// Installs the arena logger with optional debug topic filters.
/// When RUST_LOG is set, env_logger takes over and the arguments are ignored.
pub fn init_logger(level: LevelFilter, debug_filter: Option<String>) -> Result<(), SetLoggerError> {
    if std::env::var_os("RUST_LOG").is_some() {
        return env_logger::Builder::from_default_env().try_init();
    }

    let debug_filters = debug_filter.as_deref().map(parse_debug_filter);
    let unknown: Vec<String> = debug_filters
        .iter()
        .flatten()
        .filter(|t| !TOPICS.contains(&t.as_str()))
        .cloned()
        .collect();

    let logger = LOGGER.get_or_init(|| ArenaLogger {
        level,
        debug_filters,
    });
    log::set_logger(logger).map(|()| log::set_max_level(level))?;

    if !unknown.is_empty() {
        log::warn!(
            "Unknown debug topics {:?}, available: {}",
            unknown,
            TOPICS.join(", ")
        );
    }
    Ok(())
}

// Topic macros. Call as `debug_movement!(body_id, tick; "fmt", args..)` to
// prefix the message with body and tick, or without the `id, tick;` part.
#[macro_export]
macro_rules! debug_movement {
    ($body_id:expr, $tick:expr; $($arg:tt)*) => {
        log::debug!(target: "movement", "[B{:02}][T{:05}] {}", $body_id, $tick, format_args!($($arg)*))
    };
    ($($arg:tt)*) => {
        log::debug!(target: "movement", "{}", format_args!($($arg)*))
    }
}

#[macro_export]
macro_rules! debug_sight {
    ($body_id:expr, $tick:expr; $($arg:tt)*) => {
        log::debug!(target: "sight", "[B{:02}][T{:05}] {}", $body_id, $tick, format_args!($($arg)*))
    };
    ($($arg:tt)*) => {
        log::debug!(target: "sight", "{}", format_args!($($arg)*))
    }
}

#[macro_export]
macro_rules! debug_arena {
    ($($arg:tt)*) => {
        log::debug!(target: "arena", "{}", format_args!($($arg)*))
    }
}

#[macro_export]
macro_rules! debug_combat {
    ($body_id:expr, $tick:expr; $($arg:tt)*) => {
        log::debug!(target: "combat", "[B{:02}][T{:05}] {}", $body_id, $tick, format_args!($($arg)*))
    };
    ($($arg:tt)*) => {
        log::debug!(target: "combat", "{}", format_args!($($arg)*))
    }
}

#[macro_export]
macro_rules! debug_world {
    ($($arg:tt)*) => {
        log::debug!(target: "world", "{}", format_args!($($arg)*))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Log;

    #[test]
    fn test_parse_debug_filter() {
        let filters = parse_debug_filter("movement, sight,,combat ");
        assert_eq!(filters.len(), 3);
        assert!(filters.contains("movement"));
        assert!(filters.contains("combat"));
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("DEBUG"), LevelFilter::Debug);
        assert_eq!(parse_level("off"), LevelFilter::Off);
        assert_eq!(parse_level("nonsense"), LevelFilter::Info);
    }

    #[test]
    fn test_topic_filters_only_apply_to_debug() {
        let logger = ArenaLogger {
            level: LevelFilter::Trace,
            debug_filters: Some(parse_debug_filter("sight")),
        };
        let debug_sight = Metadata::builder().level(log::Level::Debug).target("sight").build();
        let debug_movement = Metadata::builder()
            .level(log::Level::Debug)
            .target("movement")
            .build();
        let info_movement = Metadata::builder()
            .level(log::Level::Info)
            .target("movement")
            .build();

        assert!(logger.enabled(&debug_sight));
        assert!(!logger.enabled(&debug_movement));
        assert!(logger.enabled(&info_movement));
    }

    #[test]
    fn test_level_cutoff() {
        let logger = ArenaLogger {
            level: LevelFilter::Warn,
            debug_filters: None,
        };
        let info = Metadata::builder().level(log::Level::Info).target("world").build();
        let error = Metadata::builder().level(log::Level::Error).target("world").build();
        assert!(!logger.enabled(&info));
        assert!(logger.enabled(&error));
    }
}
