use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use romcheck_lib::Catalog;

use crate::CliError;

pub(crate) fn run_list() -> Result<(), CliError> {
    log::info!("Supported formats:");
    crate::log_blank();

    for format in Catalog::builtin() {
        log::info!(
            "  {} [{}]",
            format.id.if_supports_color(Stdout, |t| t.bold()),
            format.label.if_supports_color(Stdout, |t| t.cyan()),
        );
        log::info!("    Extensions: {}", format.extensions.join(", "));
        match &format.signature {
            Some(signature) => log::info!("    Signature: {}", signature),
            None => log::info!(
                "    Signature: {}",
                "none (extension only)".if_supports_color(Stdout, |t| t.dimmed()),
            ),
        }
    }
    Ok(())
}
