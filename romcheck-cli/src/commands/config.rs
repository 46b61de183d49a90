use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use romcheck_lib::settings::{load_settings_from, load_settings_string, settings_path};

use crate::CliError;

/// Show the settings file status and the effective validation options.
pub(crate) fn run_config_show() -> Result<(), CliError> {
    let path = settings_path();

    log::info!(
        "{}",
        "Validation Settings".if_supports_color(Stdout, |t| t.bold()),
    );
    crate::log_blank();

    if path.exists() {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    crate::log_blank();

    let options = load_settings_from(&path)?.validation_options();
    match options.read_timeout {
        Some(limit) => log::info!("  read_timeout_secs: {}", limit.as_secs()),
        None => log::info!(
            "  read_timeout_secs: {}",
            "none".if_supports_color(Stdout, |t| t.dimmed()),
        ),
    }
    log::info!("  verify_integrity:  {}", options.verify_integrity);

    if let Some(contents) = load_settings_string(&path)? {
        log::debug!("Parsed settings file:\n{}", contents);
    }
    Ok(())
}

/// Print the settings file path.
pub(crate) fn run_config_path() -> Result<(), CliError> {
    println!("{}", settings_path().display());
    Ok(())
}
