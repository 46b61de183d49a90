use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use romcheck_lib::settings::load_settings;
use romcheck_lib::{
    DetectedRom, FileManifestSource, FileRomSource, RomValidationResult, RomValidator,
    ValidationOptions,
};

use crate::CliError;
use crate::cli_types::ValidateArgs;

/// Settings-file defaults with command-line flags applied on top.
fn resolve_options(args: &ValidateArgs) -> Result<ValidationOptions, CliError> {
    let mut options = load_settings()?.validation_options();
    if let Some(secs) = args.timeout {
        options = options.read_timeout((secs > 0).then(|| Duration::from_secs(secs)));
    }
    if args.no_integrity {
        options = options.verify_integrity(false);
    }
    Ok(options)
}

/// Run one validation pass over files on disk.
///
/// Unreadable paths do not fail the command; they show up as warnings in the
/// report.
fn validate_paths(
    roms: &[PathBuf],
    manifest: Option<&PathBuf>,
    options: ValidationOptions,
) -> Result<RomValidationResult, CliError> {
    let roms: Vec<FileRomSource> = roms.iter().map(FileRomSource::new).collect();
    let manifest = manifest.map(FileManifestSource::new);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::runtime(format!("Failed to create runtime: {}", e)))?;

    let validator = RomValidator::new(options);
    rt.block_on(validator.validate(roms, manifest))
        .ok_or_else(|| CliError::runtime("validation run was superseded"))
}

/// Run the validate command. Returns whether the report is valid.
pub(crate) fn run_validate(args: ValidateArgs) -> Result<bool, CliError> {
    let options = resolve_options(&args)?;
    log::debug!(
        "Options: timeout {:?}, integrity {}",
        options.read_timeout,
        options.verify_integrity
    );

    let report = validate_paths(&args.roms, args.manifest.as_ref(), options)?;

    if args.json {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        render_report(&report);
    }

    Ok(report.is_valid)
}

fn format_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * KIB;
    if bytes >= MIB {
        format!("{:.1} MiB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.1} KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{} B", bytes)
    }
}

fn rom_line(rom: &DetectedRom) -> String {
    let format = match &rom.format {
        Some(label) => label.if_supports_color(Stdout, |t| t.cyan()).to_string(),
        None => "unknown format"
            .if_supports_color(Stdout, |t| t.dimmed())
            .to_string(),
    };
    format!(
        "  {} [{}] {}",
        rom.file.name.if_supports_color(Stdout, |t| t.bold()),
        format,
        format_size(rom.file.size),
    )
}

fn summary(report: &RomValidationResult) -> String {
    let verdict = if report.is_valid { "VALID" } else { "INVALID" };
    format!(
        "{} ({} error{}, {} warning{})",
        verdict,
        report.errors.len(),
        if report.errors.len() == 1 { "" } else { "s" },
        report.warnings.len(),
        if report.warnings.len() == 1 { "" } else { "s" },
    )
}

fn render_report(report: &RomValidationResult) {
    if !report.roms.is_empty() {
        log::info!("{}", "Files:".if_supports_color(Stdout, |t| t.bold()));
        for rom in &report.roms {
            log::info!("{}", rom_line(rom));
        }
        crate::log_blank();
    }

    if let Some(manifest) = &report.manifest {
        log::info!(
            "{} {} [{}], {} entries",
            "Manifest:".if_supports_color(Stdout, |t| t.bold()),
            manifest.title.as_deref().unwrap_or("(untitled)"),
            manifest.system.as_deref().unwrap_or("?"),
            manifest.roms.as_ref().map_or(0, Vec::len),
        );
        if let Some(region) = &manifest.region {
            log::info!("  Region: {}", region);
        }
        crate::log_blank();
    }

    for error in &report.errors {
        log::error!("{}", error);
    }
    for warning in &report.warnings {
        log::warn!("{}", warning);
    }

    let line = summary(report);
    if report.is_valid {
        log::info!("{}", line.if_supports_color(Stdout, |t| t.green()));
    } else {
        log::info!("{}", line.if_supports_color(Stdout, |t| t.red()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(40976), "40.0 KiB");
        assert_eq!(format_size(4 * 1024 * 1024), "4.0 MiB");
    }

    #[test]
    fn test_summary_pluralization() {
        let report =
            RomValidationResult::new(vec![], vec!["no manifest file provided".into()], vec![], None);
        assert_eq!(summary(&report), "VALID (0 errors, 1 warning)");

        let report = RomValidationResult::new(
            vec!["no files selected".into()],
            vec!["a".into(), "b".into()],
            vec![],
            None,
        );
        assert_eq!(summary(&report), "INVALID (1 error, 2 warnings)");
    }

    #[test]
    fn test_flags_override_timeout() {
        let args = ValidateArgs {
            roms: vec![],
            manifest: None,
            json: false,
            timeout: Some(0),
            no_integrity: true,
        };
        // A settings file may exist on the test machine; flags win either way.
        if let Ok(options) = resolve_options(&args) {
            assert!(options.read_timeout.is_none());
            assert!(!options.verify_integrity);
        }
    }

    #[test]
    fn test_missing_input_still_produces_a_report() {
        let missing = PathBuf::from("/nonexistent/romcheck/game.nes");
        let report = validate_paths(&[missing], None, ValidationOptions::default()).unwrap();
        assert!(report.is_valid);
        assert_eq!(report.roms.len(), 1);
        assert_eq!(report.roms[0].format.as_deref(), Some("NES"));
        assert_eq!(report.roms[0].file.byte_length, None);
        assert!(report.warnings[0].starts_with("could not read \"game.nes\""));
        assert_eq!(report.warnings[1], "no manifest file provided");
    }

    #[test]
    fn test_missing_manifest_is_an_error_in_the_report() {
        let report = validate_paths(
            &[],
            Some(&PathBuf::from("/nonexistent/romcheck/set.json")),
            ValidationOptions::default(),
        )
        .unwrap();
        assert!(!report.is_valid);
        assert_eq!(report.errors[0], "no files selected");
        assert!(report.errors[1].contains("set.json"));
    }
}
