//! Locating the file that holds configuration values.
//!
//! A command-line flag wins over an environment variable; neither being set
//! yields an empty path.

use clap::{Arg, ArgAction, Command};
use std::ffi::OsString;

/// Environment variable naming the values file.
pub const ENV_CONFIG_FILE: &str = "CONFIG_FILE";

/// Command-line flag naming the values file (`--config_file <path>`).
pub const FLAG_CONFIG_FILE: &str = "config_file";

/// Resolve the values file path from the process arguments and environment.
pub fn get_file_env_or_path(env_key: &str, flag_key: &str) -> String {
    file_path_from(std::env::args_os(), env_key, flag_key)
}

/// Resolve the values file path from `args` (program name first) and the
/// environment.
///
/// `--flag path`, `--flag=path`, and the single-dash forms are recognized.
/// Other arguments are ignored. An empty flag value falls back to the
/// environment variable.
pub fn file_path_from<I, T>(args: I, env_key: &str, flag_key: &str) -> String
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    flag_value(args, flag_key)
        .filter(|path| !path.is_empty())
        .or_else(|| std::env::var(env_key).ok())
        .unwrap_or_default()
}

fn flag_value<I, T>(args: I, flag_key: &str) -> Option<String>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut args = args.into_iter().map(Into::<OsString>::into);
    let program = args.next().unwrap_or_else(|| OsString::from("patchpanel"));

    // clap stops at the first unknown argument, so only our flag is passed on.
    let mut relevant = vec![program];
    while let Some(arg) = args.next() {
        let Some(text) = arg.to_str() else {
            continue;
        };
        if text == "--" {
            break;
        }
        let Some(name) = text
            .strip_prefix("--")
            .or_else(|| text.strip_prefix('-'))
        else {
            continue;
        };
        let (flag, attached) = match name.split_once('=') {
            Some((flag, _)) => (flag, true),
            None => (name, false),
        };
        if flag != flag_key {
            continue;
        }
        relevant.push(OsString::from(format!("--{name}")));
        if !attached {
            relevant.extend(args.next());
        }
    }

    let command = Command::new("patchpanel")
        .disable_help_flag(true)
        .disable_version_flag(true)
        .ignore_errors(true)
        .arg(
            Arg::new(flag_key.to_string())
                .long(flag_key.to_string())
                .value_name("PATH")
                .help("path to target file of values")
                .allow_hyphen_values(true)
                .action(ArgAction::Set),
        );
    command
        .try_get_matches_from(relevant)
        .ok()?
        .get_one::<String>(flag_key)
        .cloned()
}
