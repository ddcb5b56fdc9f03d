//! Example demonstrating composite tag values

use patchpanel::{PatchPanel, ParseError, Tagged, TypeInfo};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Ports(BTreeMap<String, u16>);

#[derive(Debug, Tagged)]
struct Config {
    // Split with the panel's separators
    #[tag(default = "http:80·https:443")]
    pub ports: Ports,

    // JSON for lists and maps
    #[tag(default = r#"["1.2","1.3"]"#)]
    pub allowed_tls: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    let panel = PatchPanel::default();

    let separators = panel.separators().clone();
    panel.register_type::<Ports, _>(move |raw, _hints| {
        let mut ports = BTreeMap::new();
        for (name, port) in separators.pairs(raw) {
            ports.insert(name.to_string(), port.parse::<u16>().map_err(ParseError::new)?);
        }
        Ok(Ports(ports))
    });
    panel.register_json::<Vec<String>>();

    let ty = Some(TypeInfo::of::<Config>());
    let no_hints: &[&str] = &[];
    let config = Config {
        ports: panel.get_default_as("ports", ty, no_hints)?,
        allowed_tls: panel.get_default_as("allowed_tls", ty, no_hints)?,
    };

    println!("Composite configuration:");
    for (name, port) in &config.ports.0 {
        println!("  {name} -> {port}");
    }
    println!("  Allowed TLS: {:?}", config.allowed_tls);

    Ok(())
}
