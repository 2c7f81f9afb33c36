//! Keyword files on disk: format detection and configuration

#![allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable

use ecl_keyword::{ByteOrder, CodecConfig, FileFormat, FormatSelection, FortIo, Keyword};
use tempfile::TempDir;

fn write_file(path: &std::path::Path, config: &CodecConfig) {
    let mut out = FortIo::create(path, config).unwrap();
    out.write_keyword(&Keyword::from_values("INTEHEAD", &[2015i32, 7, 1]))
        .unwrap();
    out.write_keyword(&Keyword::from_values("DOUBHEAD", &[0.5f64, 365.25]))
        .unwrap();
    out.flush().unwrap();
}

#[test]
fn test_format_follows_extension() {
    let dir = TempDir::new().unwrap();
    let config = CodecConfig::default();

    let binary = dir.path().join("CASE.UNRST");
    let formatted = dir.path().join("CASE.FUNRST");
    write_file(&binary, &config);
    write_file(&formatted, &config);

    let input = FortIo::open(&binary, &config).unwrap();
    assert_eq!(input.format(), FileFormat::Binary);
    let input = FortIo::open(&formatted, &config).unwrap();
    assert!(input.is_formatted());

    let text = std::fs::read_to_string(&formatted).unwrap();
    assert!(text.starts_with(" 'INTEHEAD'           3 'INTE'"));
}

#[test]
fn test_report_step_extensions() {
    assert_eq!(
        FileFormat::from_path(std::path::Path::new("CASE.X0012")),
        Some(FileFormat::Binary)
    );
    assert_eq!(
        FileFormat::from_path(std::path::Path::new("CASE.F0012")),
        Some(FileFormat::Formatted)
    );
    assert_eq!(FileFormat::from_path(std::path::Path::new("CASE.DATA")), None);
}

#[test]
fn test_unknown_extension_is_sniffed() {
    let dir = TempDir::new().unwrap();
    let binary = dir.path().join("restart.bin");
    let text = dir.path().join("restart.txt");

    write_file(&binary, &CodecConfig::binary(ByteOrder::BigEndian));
    write_file(&text, &CodecConfig::formatted());

    let auto = CodecConfig::default();
    let mut input = FortIo::open(&binary, &auto).unwrap();
    assert_eq!(input.format(), FileFormat::Binary);
    assert_eq!(input.read_all().unwrap().len(), 2);

    let mut input = FortIo::open(&text, &auto).unwrap();
    assert_eq!(input.format(), FileFormat::Formatted);
    let keywords = input.read_all().unwrap();
    assert_eq!(keywords[1].values::<f64>(), vec![0.5, 365.25]);
}

#[test]
fn test_little_endian_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("CASE.INIT");
    let config = CodecConfig::binary(ByteOrder::LittleEndian);
    write_file(&path, &config);

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[..4], &[16, 0, 0, 0]);

    let mut input = FortIo::open(&path, &config).unwrap();
    let intehead = input.read_keyword().unwrap().unwrap();
    assert_eq!(intehead.values::<i32>(), vec![2015, 7, 1]);
}

#[test]
fn test_explicit_selection_overrides_extension() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("CASE.UNRST");
    let config = CodecConfig {
        byte_order: ByteOrder::BigEndian,
        format: FormatSelection::Formatted,
    };
    write_file(&path, &config);

    let input = FortIo::open(&path, &config).unwrap();
    assert!(input.is_formatted());
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let result = FortIo::open(dir.path().join("NOPE.EGRID"), &CodecConfig::default());
    assert!(matches!(result, Err(ecl_keyword::EclError::Io(_))));
}
