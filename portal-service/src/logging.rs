use std::env;

use chrono::{SecondsFormat, Utc};
use once_cell::sync::OnceCell;
use serde::Serialize;
use serde_json::{Map, Value};

const DEFAULT_SERVICE: &str = "portal-service";

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
}

impl LogLevel {
    fn label(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        }
    }

    fn from_env_value(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "error" => LogLevel::Error,
            "warn" | "warning" => LogLevel::Warn,
            "debug" | "trace" => LogLevel::Debug,
            _ => LogLevel::Info,
        }
    }
}

/// Writes one JSON object per line. Identity fields (`service`, `env`,
/// `host`) are resolved once and prefixed to every event.
pub struct Logger {
    identity: Map<String, Value>,
    threshold: LogLevel,
}

static LOGGER: OnceCell<Logger> = OnceCell::new();

pub fn init_logger(service: &'static str) -> &'static Logger {
    LOGGER.get_or_init(|| Logger::new(service))
}

/// Process logger; falls back to the default service name when
/// `init_logger` has not run (tests, library use).
pub fn logger() -> &'static Logger {
    LOGGER.get_or_init(|| Logger::new(DEFAULT_SERVICE))
}

impl Logger {
    fn new(service: &str) -> Self {
        let environment = env::var("APP_ENV")
            .or_else(|_| env::var("RUST_ENV"))
            .unwrap_or_else(|_| "development".to_string());
        let host = hostname::get()
            .ok()
            .and_then(|name| name.into_string().ok())
            .or_else(|| env::var("HOSTNAME").ok())
            .unwrap_or_else(|| "unknown".to_string());

        let mut identity = Map::new();
        identity.insert("service".into(), Value::from(service));
        identity.insert("env".into(), Value::from(environment));
        identity.insert("host".into(), Value::from(host));

        Self {
            identity,
            threshold: env::var("LOG_LEVEL")
                .map(|value| LogLevel::from_env_value(&value))
                .unwrap_or(LogLevel::Info),
        }
    }

    fn line<T: Serialize>(&self, level: LogLevel, event: &str, context: T) -> Value {
        let mut line = Map::with_capacity(self.identity.len() + 4);
        line.insert(
            "timestamp".into(),
            Value::from(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        line.extend(self.identity.clone());
        line.insert("level".into(), Value::from(level.label()));
        line.insert("event".into(), Value::from(event));

        match serde_json::to_value(context) {
            Ok(Value::Object(fields)) => {
                for (key, value) in fields {
                    // identity fields win over context keys
                    line.entry(key).or_insert(value);
                }
            }
            Ok(Value::Null) | Err(_) => {}
            Ok(other) => {
                line.insert("context".into(), other);
            }
        }
        Value::Object(line)
    }

    fn write<T: Serialize>(&self, level: LogLevel, event: &str, context: T) {
        if level > self.threshold {
            return;
        }
        let line = self.line(level, event, context);
        if level <= LogLevel::Warn {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    }

    pub fn debug<T: Serialize>(&self, event: &str, context: T) {
        self.write(LogLevel::Debug, event, context);
    }

    pub fn info<T: Serialize>(&self, event: &str, context: T) {
        self.write(LogLevel::Info, event, context);
    }

    pub fn warn<T: Serialize>(&self, event: &str, context: T) {
        self.write(LogLevel::Warn, event, context);
    }

    pub fn error<T: Serialize>(&self, event: &str, context: T) {
        self.write(LogLevel::Error, event, context);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn context_is_flattened_without_overriding_identity() {
        let logger = Logger::new("portal-test");
        let line = logger.line(
            LogLevel::Info,
            "station.created",
            json!({ "stationId": "lima", "service": "spoofed" }),
        );
        assert_eq!(line["event"], "station.created");
        assert_eq!(line["stationId"], "lima");
        assert_eq!(line["service"], "portal-test");
        assert_eq!(line["level"], "info");
    }

    #[test]
    fn scalar_context_is_nested() {
        let line = Logger::new("portal-test").line(LogLevel::Warn, "seed.skipped", 12);
        assert_eq!(line["context"], 12);
    }

    #[test]
    fn levels_filter_by_severity() {
        assert!(LogLevel::Error <= LogLevel::Info);
        assert!(LogLevel::Debug > LogLevel::Info);
        assert_eq!(LogLevel::from_env_value("WARNING"), LogLevel::Warn);
        assert_eq!(LogLevel::from_env_value("nonsense"), LogLevel::Info);
    }
}
