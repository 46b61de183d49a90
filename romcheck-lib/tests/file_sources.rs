use std::fs;
use std::path::Path;

use romcheck_lib::integrity::sha1_hex;
use romcheck_lib::{
    FileManifestSource, FileRomSource, RomSource, RomValidator, ValidationOptions, run_validation,
};
use tempfile::TempDir;

fn write(dir: &Path, name: &str, content: &[u8]) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Minimal iNES image: header plus one 16 KB PRG bank.
fn ines_image() -> Vec<u8> {
    let mut rom = vec![0u8; 16 + 16 * 1024];
    rom[..4].copy_from_slice(b"NES\x1A");
    rom[4] = 1;
    rom
}

#[test]
fn file_source_reports_name_and_size() {
    let tmp = TempDir::new().unwrap();
    let path = write(tmp.path(), "Zelda (USA).nes", &ines_image());
    let source = FileRomSource::new(&path);
    assert_eq!(source.name(), "Zelda (USA).nes");
    assert_eq!(source.size(), 16 + 16 * 1024);
    assert_eq!(source.path(), path);
}

#[tokio::test]
async fn missing_file_is_reported_not_fatal() {
    let tmp = TempDir::new().unwrap();
    let source = FileRomSource::new(tmp.path().join("nope.nes"));
    assert_eq!(source.name(), "nope.nes");
    assert_eq!(source.size(), 0);

    let report = run_validation(
        &[source],
        None::<&FileManifestSource>,
        &ValidationOptions::default(),
    )
    .await;
    assert!(report.is_valid);
    assert_eq!(report.roms[0].format.as_deref(), Some("NES"));
    assert_eq!(report.roms[0].file.byte_length, None);
    assert!(report.warnings[0].starts_with("could not read \"nope.nes\""));
}

#[tokio::test]
async fn validates_files_on_disk() {
    let tmp = TempDir::new().unwrap();
    let image = ines_image();
    let rom = write(tmp.path(), "game.bin", &image);
    let other = write(tmp.path(), "tetris.gb", &[0u8; 64]);
    let manifest = write(
        tmp.path(),
        "manifest.json",
        format!(
            r#"{{
                "title": "Weekend Set",
                "system": "nes",
                "region": "USA",
                "roms": [
                    {{ "name": "Game", "file": "game.bin", "size": {}, "sha1": "{}" }},
                    {{ "name": "Tetris", "file": "tetris.gb", "size": 64 }}
                ]
            }}"#,
            image.len(),
            sha1_hex(&image)
        )
        .as_bytes(),
    );

    let roms = vec![FileRomSource::new(&rom), FileRomSource::new(&other)];
    let manifest = FileManifestSource::new(&manifest);
    let report = run_validation(&roms, Some(&manifest), &ValidationOptions::default()).await;

    assert!(report.is_valid, "{:?}", report.errors);
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    assert_eq!(report.roms[0].format.as_deref(), Some("NES"));
    assert_eq!(report.roms[1].format.as_deref(), Some("Game Boy"));
    assert_eq!(
        report.manifest.as_ref().and_then(|m| m.region.as_deref()),
        Some("USA")
    );
}

#[tokio::test]
async fn file_deleted_after_selection_is_a_warning() {
    let tmp = TempDir::new().unwrap();
    let path = write(tmp.path(), "gone.gba", &[0u8; 8]);
    let source = FileRomSource::new(&path);
    fs::remove_file(&path).unwrap();

    let validator = RomValidator::default();
    let report = validator
        .validate(vec![source], None::<FileManifestSource>)
        .await
        .unwrap();

    assert!(report.is_valid);
    assert_eq!(report.roms[0].format.as_deref(), Some("Game Boy Advance"));
    assert_eq!(report.roms[0].file.size, 8);
    assert_eq!(report.roms[0].file.byte_length, None);
    assert!(report.warnings[0].contains("gone.gba"));
}

#[tokio::test]
async fn unreadable_manifest_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let rom = write(tmp.path(), "game.nes", &ines_image());
    let manifest = FileManifestSource::new(tmp.path().join("missing.json"));

    let report = run_validation(
        &[FileRomSource::new(&rom)],
        Some(&manifest),
        &ValidationOptions::default(),
    )
    .await;

    assert!(!report.is_valid);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].contains("missing.json"));
    assert!(report.manifest.is_none());
}

#[tokio::test]
async fn non_utf8_manifest_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let rom = write(tmp.path(), "game.nes", &ines_image());
    let manifest = write(tmp.path(), "manifest.json", &[0xFF, 0xFE, 0x7B, 0x7D]);

    let report = run_validation(
        &[FileRomSource::new(&rom)],
        Some(&FileManifestSource::new(&manifest)),
        &ValidationOptions::default(),
    )
    .await;

    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].contains("UTF-8"));
}
