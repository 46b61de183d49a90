//! Validation runs: read inputs, detect, cross-check, publish.
//!
//! A run never fails as a whole. Every problem with a single input becomes an
//! error or warning string in the report, and the run always produces a
//! [`RomValidationResult`]. The only way a result goes missing is when a newer
//! run supersedes it before it finishes.
//!
//! # Supersession
//!
//! [`RomValidator`] hands each run a [`RunToken`] carrying the generation
//! number current when the run started. Starting a new run bumps the
//! generation; a finished run publishes only if its token still matches.
//! In-flight reads of a superseded run are allowed to finish and their result
//! is dropped.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::future::join_all;
use romcheck_core::Catalog;
use tokio::sync::watch;
use tokio::time::Duration;

use crate::error::SourceError;
use crate::integrity::check_integrity;
use crate::manifest::{RomManifest, parse_manifest, validate_manifest};
use crate::report::{DetectedRom, FileRef, RomValidationResult};
use crate::source::{ManifestSource, RomSource};

pub const NO_FILES_SELECTED: &str = "no files selected";
pub const NO_MANIFEST_PROVIDED: &str = "no manifest file provided";

/// Options that control a validation run.
#[derive(Debug, Clone)]
pub struct ValidationOptions {
    /// Upper bound for each individual read. `None` waits indefinitely.
    pub read_timeout: Option<Duration>,

    /// Compare manifest-declared sizes and SHA-1s with the files read.
    pub verify_integrity: bool,

    /// Catalog to detect against. `None` uses the built-in catalog.
    pub catalog: Option<Arc<Catalog>>,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            read_timeout: None,
            verify_integrity: true,
            catalog: None,
        }
    }
}

impl ValidationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn verify_integrity(mut self, verify: bool) -> Self {
        self.verify_integrity = verify;
        self
    }

    pub fn catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = Some(Arc::new(catalog));
        self
    }

    fn active_catalog(&self) -> &Catalog {
        self.catalog.as_deref().unwrap_or(Catalog::builtin())
    }
}

async fn with_timeout<T>(
    limit: Option<Duration>,
    read: impl Future<Output = Result<T, SourceError>>,
) -> Result<T, SourceError> {
    match limit {
        Some(limit) => tokio::time::timeout(limit, read)
            .await
            .map_err(|_| SourceError::TimedOut)?,
        None => read.await,
    }
}

/// Read the manifest and parse it, recording failures in `errors`.
async fn load_manifest<M: ManifestSource>(
    source: &M,
    options: &ValidationOptions,
    errors: &mut Vec<String>,
) -> Option<RomManifest> {
    let text = match with_timeout(options.read_timeout, source.read_text()).await {
        Ok(text) => text,
        Err(SourceError::TimedOut) => {
            errors.push(format!("{}: read timed out", source.name()));
            return None;
        }
        Err(e) => {
            errors.push(format!("failed to read manifest \"{}\": {}", source.name(), e));
            return None;
        }
    };

    match parse_manifest(&text) {
        Ok(manifest) => Some(manifest),
        Err(e) => {
            log::debug!("Manifest {} rejected: {}", source.name(), e);
            errors.push(e.to_string());
            None
        }
    }
}

/// Run one validation pass over `roms` and an optional manifest.
///
/// ROM reads are issued together and joined; the report lists files in input
/// order regardless of which read finished first.
pub async fn run_validation<R, M>(
    roms: &[R],
    manifest: Option<&M>,
    options: &ValidationOptions,
) -> RomValidationResult
where
    R: RomSource,
    M: ManifestSource,
{
    let catalog = options.active_catalog();
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if roms.is_empty() {
        errors.push(NO_FILES_SELECTED.to_string());
    }

    let reads = join_all(
        roms.iter()
            .map(|rom| with_timeout(options.read_timeout, rom.read_bytes())),
    )
    .await;

    let mut detected = Vec::with_capacity(roms.len());
    let mut contents: Vec<(&str, Vec<u8>)> = Vec::new();
    for (rom, read) in roms.iter().zip(reads) {
        let name = rom.name();
        let (format, byte_length) = match read {
            Ok(bytes) => {
                let format = catalog
                    .detect(name, Some(bytes.as_slice()))
                    .map(|f| f.label.clone());
                let len = bytes.len() as u64;
                contents.push((name, bytes));
                (format, Some(len))
            }
            Err(e) => {
                match e {
                    SourceError::TimedOut => errors.push(format!("{}: read timed out", name)),
                    e => {
                        log::warn!("Failed to read {}: {}", name, e);
                        warnings.push(format!("could not read \"{}\": {}", name, e));
                    }
                }
                (catalog.detect(name, None).map(|f| f.label.clone()), None)
            }
        };

        if format.is_none() {
            warnings.push(format!("could not detect format of \"{}\"", name));
        }
        detected.push(DetectedRom {
            file: FileRef {
                name: name.to_string(),
                size: rom.size(),
                byte_length,
            },
            format,
        });
    }

    let parsed = match manifest {
        Some(source) => load_manifest(source, options, &mut errors).await,
        None => {
            warnings.push(NO_MANIFEST_PROVIDED.to_string());
            None
        }
    };

    if let Some(manifest) = &parsed {
        let selected: Vec<&str> = roms.iter().map(|r| r.name()).collect();
        validate_manifest(manifest, &selected, catalog, &mut errors, &mut warnings);

        if options.verify_integrity {
            let files: Vec<(&str, &[u8])> = contents
                .iter()
                .map(|(name, bytes)| (*name, bytes.as_slice()))
                .collect();
            check_integrity(manifest, &files, &mut warnings);
        }
    }

    RomValidationResult::new(errors, warnings, detected, parsed)
}

/// Identity of one validation run, captured when the run starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunToken {
    generation: u64,
}

impl RunToken {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Runs validations and publishes the latest non-superseded report.
///
/// Subscribers see [`RomValidationResult::initial`] until the first run
/// completes.
pub struct RomValidator {
    options: ValidationOptions,
    generation: AtomicU64,
    report_tx: watch::Sender<RomValidationResult>,
}

impl Default for RomValidator {
    fn default() -> Self {
        Self::new(ValidationOptions::default())
    }
}

impl RomValidator {
    pub fn new(options: ValidationOptions) -> Self {
        let (report_tx, _) = watch::channel(RomValidationResult::initial());
        Self {
            options,
            generation: AtomicU64::new(0),
            report_tx,
        }
    }

    pub fn options(&self) -> &ValidationOptions {
        &self.options
    }

    /// Receive every published report.
    pub fn subscribe(&self) -> watch::Receiver<RomValidationResult> {
        self.report_tx.subscribe()
    }

    /// The most recently published report.
    pub fn latest(&self) -> RomValidationResult {
        self.report_tx.borrow().clone()
    }

    /// Start a new run, superseding any run still in flight.
    pub fn begin_run(&self) -> RunToken {
        let mut generation = 0;
        // Bump under the channel lock so it cannot interleave with a publish.
        self.report_tx.send_if_modified(|_| {
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            false
        });
        RunToken { generation }
    }

    /// Whether `token` belongs to the most recently started run.
    pub fn is_current(&self, token: &RunToken) -> bool {
        self.generation.load(Ordering::SeqCst) == token.generation
    }

    /// Publish `report` unless `token` has been superseded.
    ///
    /// Returns the report if it was published.
    pub fn publish(
        &self,
        token: &RunToken,
        report: RomValidationResult,
    ) -> Option<RomValidationResult> {
        let mut published = None;
        self.report_tx.send_if_modified(|current| {
            if !self.is_current(token) {
                return false;
            }
            *current = report.clone();
            published = Some(report);
            true
        });

        if published.is_none() {
            log::debug!(
                "Discarding result of superseded run {} (current: {})",
                token.generation,
                self.generation.load(Ordering::SeqCst)
            );
        }
        published
    }

    /// Validate a new input pair.
    ///
    /// The run token is taken when this is called, not when the returned
    /// future is first polled, so calling `validate` again supersedes this
    /// run even if it has not started reading yet. Resolves to the report if
    /// it was published, or `None` if a newer run superseded it.
    pub fn validate<R, M>(
        &self,
        roms: Vec<R>,
        manifest: Option<M>,
    ) -> impl Future<Output = Option<RomValidationResult>>
    where
        R: RomSource,
        M: ManifestSource,
    {
        let token = self.begin_run();
        log::debug!(
            "Starting validation run {} ({} files, manifest: {})",
            token.generation,
            roms.len(),
            manifest.as_ref().map(|m| m.name()).unwrap_or("none"),
        );

        async move {
            let report = run_validation(&roms, manifest.as_ref(), &self.options).await;
            log::debug!(
                "Run {} finished: {} errors, {} warnings",
                token.generation,
                report.errors.len(),
                report.warnings.len(),
            );
            self.publish(&token, report)
        }
    }
}

#[cfg(test)]
#[path = "tests/orchestrator_tests.rs"]
mod tests;
