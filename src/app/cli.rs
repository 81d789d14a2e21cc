use crate::config::Config;
use crate::domain::{LogEvent, Severity};
use clap::Parser;
use serde_json::Value;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Send a test error report to Opbeat", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub config: Config,

    /// Severity of the report (panic, fatal, error, ...)
    #[arg(long, default_value = "error")]
    pub level: Severity,

    /// Extra field as key=value; values are parsed as JSON when possible
    #[arg(long = "field", value_name = "KEY=VALUE", value_parser = parse_field)]
    pub fields: Vec<(String, Value)>,

    /// Report message
    pub message: String,
}

impl Cli {
    pub fn event(&self) -> LogEvent {
        self.fields.iter().cloned().fold(
            LogEvent::new(self.level, self.message.clone()),
            |event, (key, value)| event.with_field(key, value),
        )
    }
}

fn parse_field(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    if key.is_empty() {
        return Err(format!("empty key in '{raw}'"));
    }

    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::from(value));
    Ok((key.to_string(), value))
}
