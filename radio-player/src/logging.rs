use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::env;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Level {
    Error,
    Warn,
    Info,
    Debug,
}

impl Level {
    fn as_str(self) -> &'static str {
        match self {
            Level::Error => "error",
            Level::Warn => "warn",
            Level::Info => "info",
            Level::Debug => "debug",
        }
    }
}

/// JSON-lines logger handed to every player task. Cheap to clone.
#[derive(Clone)]
pub struct Logger {
    component: Arc<str>,
    host: Arc<str>,
    min_level: Level,
}

impl Logger {
    pub fn new(component: &'static str) -> Self {
        let host = hostname::get()
            .ok()
            .and_then(|h| h.into_string().ok())
            .unwrap_or_else(|| "unknown".to_string());
        let min_level = match env::var("LOG_LEVEL").ok().as_deref() {
            Some("error") => Level::Error,
            Some("warn") | Some("warning") => Level::Warn,
            Some("debug") | Some("trace") => Level::Debug,
            _ => Level::Info,
        };
        Self {
            component: Arc::from(component),
            host: Arc::from(host),
            min_level,
        }
    }

    /// Same host and level, different component name.
    pub fn named(&self, component: &'static str) -> Self {
        Self {
            component: Arc::from(component),
            ..self.clone()
        }
    }

    fn emit<T: Serialize>(&self, level: Level, event: &str, context: T) {
        if level > self.min_level {
            return;
        }
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let mut payload = Map::new();
        payload.insert("timestamp".into(), Value::String(timestamp));
        payload.insert("component".into(), Value::String(self.component.to_string()));
        payload.insert("host".into(), Value::String(self.host.to_string()));
        payload.insert("level".into(), Value::String(level.as_str().to_string()));
        payload.insert("event".into(), Value::String(event.to_string()));

        match serde_json::to_value(context).unwrap_or(Value::Null) {
            Value::Object(map) => {
                for (key, value) in map {
                    payload.entry(key).or_insert(value);
                }
            }
            Value::Null => {}
            other => {
                payload.insert("context".into(), other);
            }
        }

        let line = Value::Object(payload).to_string();
        match level {
            Level::Error | Level::Warn => eprintln!("{}", line),
            _ => println!("{}", line),
        }
    }

    pub fn debug<T: Serialize>(&self, event: &str, context: T) {
        self.emit(Level::Debug, event, context);
    }

    pub fn info<T: Serialize>(&self, event: &str, context: T) {
        self.emit(Level::Info, event, context);
    }

    pub fn warn<T: Serialize>(&self, event: &str, context: T) {
        self.emit(Level::Warn, event, context);
    }

    pub fn error<T: Serialize>(&self, event: &str, context: T) {
        self.emit(Level::Error, event, context);
    }
}
