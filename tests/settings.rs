use std::path::PathBuf;

use searchdoc::{Codec, Format, Settings};

fn scratch(name: &str, contents: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("searchdoc-settings-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("temp dir");
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("write settings file");
    path
}

#[test]
fn defaults_without_a_file() {
    let settings = Settings::load_from("/nonexistent/searchdoc-settings").expect("defaults load");
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.format, Format::Json);
    assert!(!settings.pretty);
    assert_eq!(settings.max_document_bytes, None);
    assert_eq!(settings.log, "info");
}

#[test]
fn file_overrides_defaults() {
    let path = scratch(
        "searchdoc.toml",
        "format = \"binary\"\nmax_document_bytes = 4096\nlog = \"searchdoc=debug\"\n",
    );
    let settings = Settings::load_from(path.to_str().unwrap()).expect("file loads");
    assert_eq!(settings.format, Format::Binary);
    assert_eq!(settings.max_document_bytes, Some(4096));
    assert_eq!(settings.log, "searchdoc=debug");
    assert!(!settings.pretty, "untouched keys keep their default");

    let codec = Codec::from_settings(&settings);
    assert_eq!(codec.format(), Format::Binary);
    assert_eq!(codec.max_bytes(), Some(4096));
}

#[test]
fn bad_file_is_a_config_error() {
    let path = scratch("broken.toml", "format = \"yaml-ish\"\n");
    let err = Settings::load_from(path.to_str().unwrap()).unwrap_err();
    assert!(err.to_string().starts_with("Config error"), "{}", err);
}

#[test]
fn format_names_parse() {
    assert_eq!("json".parse::<Format>().unwrap(), Format::Json);
    assert_eq!("CBOR".parse::<Format>().unwrap(), Format::Binary);
    assert_eq!(Format::Binary.to_string(), "binary");
    assert!("xml".parse::<Format>().is_err());
}
