//! Basic example: read defaults off a config struct

use patchpanel::{PanelError, PatchPanel, Tagged, TypeInfo};
use std::time::Duration;

#[derive(Debug, Tagged)]
struct Config {
    #[tag(default = "8080")]
    pub port: i64,

    #[tag(default = "127.0.0.1")]
    pub host: String,

    #[tag(default = "true")]
    pub debug: bool,

    #[tag(default = "30s")]
    pub request_timeout: Duration,

    // No default: the caller supplies the fallback
    pub database_url: String,
}

fn main() -> anyhow::Result<()> {
    let panel = PatchPanel::default();
    let ty = Some(TypeInfo::of::<Config>());
    let no_hints: &[&str] = &[];

    let database_url = match panel.get_default_as::<String, _>("database_url", ty, no_hints) {
        Ok(url) => url,
        Err(PanelError::NoValue { .. }) => "postgres://localhost/dev".to_string(),
        Err(e) => return Err(e.into()),
    };

    let config = Config {
        port: panel.get_default_as("port", ty, no_hints)?,
        host: panel.get_default_as("host", ty, no_hints)?,
        debug: panel.get_default_as("debug", ty, no_hints)?,
        request_timeout: panel.get_default_as("request_timeout", ty, no_hints)?,
        database_url,
    };

    println!("Configuration loaded:");
    println!("  Port: {}", config.port);
    println!("  Host: {}", config.host);
    println!("  Debug: {}", config.debug);
    println!("  Request timeout: {:?}", config.request_timeout);
    println!("  Database URL: {}", config.database_url);

    Ok(())
}
