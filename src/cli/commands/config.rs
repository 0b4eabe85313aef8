//! `init` and `config` commands.

use crate::config::{ConfigError, Settings};
use crate::io::ExitCode;
use std::path::Path;

pub fn run_init(force: bool) -> ExitCode {
    match Settings::init_config_file(force) {
        Ok(path) => {
            println!("Created configuration file at: {}", path.display());
            ExitCode::Success
        }
        Err(ConfigError::AlreadyExists(path)) => {
            eprintln!(
                "Configuration already exists at {} (use --force to overwrite)",
                path.display()
            );
            ExitCode::ConfigError
        }
        Err(e) => {
            eprintln!("Could not create configuration: {e}");
            ExitCode::ConfigError
        }
    }
}

pub fn run_config(settings: &Settings, config_path: Option<&Path>) -> ExitCode {
    let source = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(Settings::default_config_path);
    match settings.to_toml() {
        Ok(toml) => {
            println!("# Source: {}", source.display());
            println!(
                "# Resolved stubs root: {}",
                settings.resolve_stubs_root(config_path).display()
            );
            println!();
            print!("{toml}");
            ExitCode::Success
        }
        Err(e) => {
            eprintln!("Could not render configuration: {e}");
            ExitCode::ConfigError
        }
    }
}
