//! Example demonstrating config file path resolution
//!
//! Run with `--config_file <path>` or set `CONFIG_FILE`; the flag wins.

use patchpanel::config_path::{get_file_env_or_path, ENV_CONFIG_FILE, FLAG_CONFIG_FILE};
use patchpanel::{PatchPanel, Tagged, TypeInfo};

#[derive(Debug, Tagged)]
struct Config {
    #[tag(default = "config.toml")]
    pub fallback_path: String,
}

fn main() -> anyhow::Result<()> {
    let mut path = get_file_env_or_path(ENV_CONFIG_FILE, FLAG_CONFIG_FILE);
    if path.is_empty() {
        let panel = PatchPanel::default();
        path = panel.get_default_as(
            "fallback_path",
            Some(TypeInfo::of::<Config>()),
            &[] as &[&str],
        )?;
    }

    println!("Values file: {path}");
    Ok(())
}
