use searchdoc::{Format, Settings};

// kept in its own test binary so no other test observes the variables
#[test]
fn environment_overrides_file_and_defaults() {
    let dir = std::env::temp_dir().join(format!("searchdoc-env-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("temp dir");
    let path = dir.join("searchdoc.toml");
    std::fs::write(&path, "format = \"binary\"\npretty = false\n").expect("write settings file");

    unsafe {
        std::env::set_var("SEARCHDOC_FORMAT", "json");
        std::env::set_var("SEARCHDOC_PRETTY", "true");
    }
    let settings = Settings::load_from(path.to_str().unwrap()).expect("settings load");
    unsafe {
        std::env::remove_var("SEARCHDOC_FORMAT");
        std::env::remove_var("SEARCHDOC_PRETTY");
    }

    assert_eq!(settings.format, Format::Json);
    assert!(settings.pretty);
}
