//! Example demonstrating parsers for host-defined types

use patchpanel::{PatchPanel, ParseError, Tagged, TypeInfo};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            other => Err(format!("unknown log level {other:?}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Percent(u8);

#[derive(Debug, Tagged)]
struct Config {
    #[tag(default = "info")]
    pub log_level: LogLevel,

    #[tag(default = "75%")]
    pub cache_fill: Percent,
}

fn main() -> anyhow::Result<()> {
    let panel = PatchPanel::default();

    // Reuse an existing FromStr implementation
    panel.register_from_str::<LogLevel>();

    // Or write the parser inline
    panel.register_type::<Percent, _>(|raw, _hints| {
        let digits = raw.strip_suffix('%').unwrap_or(raw);
        let value = digits.parse::<u8>().map_err(ParseError::new)?;
        if value > 100 {
            return Err(
                ParseError::new(format!("{value}% is more than 100%")).with_partial(Percent(100)),
            );
        }
        Ok(Percent(value))
    });

    let ty = Some(TypeInfo::of::<Config>());
    let no_hints: &[&str] = &[];
    let config = Config {
        log_level: panel.get_default_as("log_level", ty, no_hints)?,
        cache_fill: panel.get_default_as("cache_fill", ty, no_hints)?,
    };

    println!("Configuration loaded:");
    println!("  Log level: {:?}", config.log_level);
    println!("  Cache fill: {}%", config.cache_fill.0);

    Ok(())
}
