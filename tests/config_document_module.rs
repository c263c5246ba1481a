use aws_profile_switcher::config::{
    load_config_document, save_config_document, ConfigDocument, ConfigError, KeyValue,
    ParseErrorKind,
};
use std::fs;
use tempfile::tempdir;

const SAMPLE: &str = "# managed by hand\n[default]\nregion = us-west-2\n\n[profile dev]\n; dev account\nregion: eu-central-1\ns3 =\n    max_concurrent_requests = 20\n\n[sso-session corp]\nsso_start_url = https://corp.awsapps.com/start\n";

#[test]
fn untouched_documents_render_byte_for_byte() {
    let crlf = SAMPLE.replace('\n', "\r\n");
    let no_final_newline = SAMPLE.trim_end_matches('\n');
    for text in [SAMPLE, crlf.as_str(), no_final_newline, ""] {
        let doc = ConfigDocument::parse(text).expect("parse");
        assert_eq!(doc.render(), text);
    }
}

#[test]
fn sections_expose_names_and_values_in_file_order() {
    let doc = ConfigDocument::parse(SAMPLE).expect("parse");
    let names = doc
        .sections()
        .iter()
        .map(|section| section.name())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["default", "profile dev", "sso-session corp"]);

    let dev = doc.section("profile dev").expect("dev section");
    assert_eq!(dev.get("region"), Some("eu-central-1"));
    assert_eq!(dev.get("s3"), Some("\nmax_concurrent_requests = 20"));
    assert_eq!(dev.len(), 2);
}

#[test]
fn parse_errors_carry_line_numbers() {
    let cases = [
        ("region = x\n", 1, ParseErrorKind::EntryOutsideSection),
        ("[a]\n[ ]\n", 2, ParseErrorKind::EmptySectionName),
        (
            "[a]\nnot a pair\n",
            2,
            ParseErrorKind::UnrecognizedLine("not a pair".to_string()),
        ),
        ("[a]\n = x\n", 2, ParseErrorKind::EmptyKey),
        (
            "[a]\n[b]\n[a]\n",
            3,
            ParseErrorKind::DuplicateSection("a".to_string()),
        ),
        (
            "[a]\nk = 1\nk = 2\n",
            3,
            ParseErrorKind::DuplicateKey {
                section: "a".to_string(),
                key: "k".to_string(),
            },
        ),
    ];
    for (text, line, kind) in cases {
        let err = ConfigDocument::parse(text).expect_err(text);
        assert_eq!(err.line, line, "{text:?}");
        assert_eq!(err.kind, kind, "{text:?}");
    }
}

#[test]
fn replacing_entries_keeps_surrounding_comments() {
    let mut doc =
        ConfigDocument::parse("[default]\n# primary\nregion = a\noutput = json\n# tail\n\n[profile x]\n")
            .expect("parse");
    doc.section_mut("default")
        .expect("default")
        .replace_entries([KeyValue::new("region", "b")]);
    assert_eq!(
        doc.render(),
        "[default]\n# primary\nregion = b\n# tail\n\n[profile x]\n"
    );
}

#[test]
fn load_and_save_round_trip_through_disk() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("config");
    fs::write(&path, SAMPLE).expect("write config");

    let doc = load_config_document(&path).expect("load");
    save_config_document(&doc, &path).expect("save");

    assert_eq!(fs::read_to_string(&path).expect("read back"), SAMPLE);
}

#[test]
fn load_reports_missing_files_and_parse_failures() {
    let temp = tempdir().expect("tempdir");
    let missing = temp.path().join("missing");
    assert!(matches!(
        load_config_document(&missing),
        Err(ConfigError::Read { .. })
    ));

    let broken = temp.path().join("broken");
    fs::write(&broken, "[a]\nbroken line\n").expect("write config");
    let err = load_config_document(&broken).expect_err("parse failure");
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("line 2"));
}
