use regfile::*;

fn resource_path(name: &str) -> String {
    format!("{}/tests/resources/{}", env!("CARGO_MANIFEST_DIR"), name)
}

const DEMO: &str = r"HKEY_LOCAL_MACHINE\SOFTWARE\Demo";

#[test]
fn load_v5_export_from_file() -> anyhow::Result<()> {
    let doc = RegistryParser::default().load_from_file(resource_path("export_v5.reg"))?;
    assert_eq!(doc.encoding(), TextEncoding::Utf8);
    assert_eq!(
        doc.keys().collect::<Vec<_>>(),
        [
            DEMO,
            r"HKEY_LOCAL_MACHINE\SOFTWARE\Demo\Empty",
            r"HKEY_CURRENT_USER\Software\Demo",
            "SomeRandomKey",
        ]
    );

    let demo = doc.get_key(DEMO).expect("demo key");
    assert_eq!(demo.hive(), Some(Hive::LocalMachine));
    assert_eq!(demo.path_without_root(), r"SOFTWARE\Demo");
    assert_eq!(demo.default_value().and_then(|v| v.as_str()), Some("Demo application"));
    assert_eq!(
        demo.get_value("InstallDir").and_then(|v| v.as_str()),
        Some(r"C:\Program Files\Demo\")
    );
    assert_eq!(demo.get_value("Quoted").and_then(|v| v.as_str()), Some("say \"hi\""));
    assert_eq!(demo.get_value("Version").and_then(|v| v.as_dword()), Some(42));
    assert_eq!(demo.get_value("Flags").and_then(|v| v.as_dword()), Some(u32::MAX));
    assert_eq!(
        demo.get_value("Stamp").and_then(|v| v.as_qword()),
        Some(0x0001_d63c_b28a_e000)
    );
    assert_eq!(
        demo.get_value("Blob").and_then(|v| v.as_binary()),
        Some(&[0x01, 0x02, 0x0a, 0xff][..])
    );
    assert_eq!(
        demo.get_value("LongBlob").and_then(|v| v.as_binary()).map(<[u8]>::to_vec),
        Some((0u8..0x20).collect::<Vec<_>>())
    );
    assert_eq!(
        demo.get_value("Paths").and_then(|v| v.as_multi_string()),
        Some(&["A".to_string(), "BC".to_string()][..])
    );
    assert_eq!(demo.get_value("EmptyList").and_then(|v| v.as_multi_string()), Some(&[][..]));
    assert_eq!(demo.get_value("Expand").and_then(|v| v.as_str()), Some("%SystemRoot%"));
    assert_eq!(demo.get_value("Nothing").map(|v| v.kind()), Some(RegValueKind::None));
    assert_eq!(demo.get_value("Late").and_then(|v| v.as_dword()), Some(1));

    let empty = doc.get_key(r"HKEY_LOCAL_MACHINE\SOFTWARE\Demo\Empty").expect("empty key kept");
    assert!(empty.is_empty());

    let plain = doc.get_value("SomeRandomKey", "Plain").expect("plain value");
    assert_eq!(plain.root(), "");
    assert_eq!(plain.key_path_without_root(), "SomeRandomKey");
    Ok(())
}

#[test]
fn utf16_export_matches_utf8_export() -> anyhow::Result<()> {
    let parser = RegistryParser::default();
    let utf8 = parser.load_from_file(resource_path("export_v5.reg"))?;
    let utf16 = parser.load_from_file(resource_path("export_v5_utf16.reg"))?;
    assert_eq!(utf8, utf16);
    Ok(())
}

#[test]
fn load_from_reader_matches_file() -> anyhow::Result<()> {
    let parser = RegistryParser::default();
    let file = std::fs::File::open(resource_path("export_v5.reg"))?;
    let from_reader = parser.load_from_reader(file)?;
    let from_file = RegistryDocument::from_file(resource_path("export_v5.reg"))?;
    assert_eq!(from_reader, from_file);
    assert_eq!(from_file.value_count(), 15);
    Ok(())
}

#[test]
fn load_regedit4_export_uses_legacy_encoding() -> anyhow::Result<()> {
    let doc = RegistryDocument::from_file(resource_path("regedit4.reg"))?;
    assert_eq!(doc.encoding(), TextEncoding::Legacy8Bit);
    let key = doc.get_key(r"HKEY_CURRENT_USER\Software\Legacy").expect("legacy key");
    assert_eq!(
        key.get_value("Items").and_then(|v| v.as_multi_string()),
        Some(&["one".to_string(), "two".to_string(), "\u{e9}".to_string()][..])
    );
    assert_eq!(key.get_value("Count").and_then(|v| v.as_dword()), Some(16));
    assert!(key.iter().all(|v| v.encoding() == TextEncoding::Legacy8Bit));
    Ok(())
}

#[test]
fn malformed_header_fails_whole_file() {
    let err = RegistryDocument::from_file(resource_path("malformed_header.reg")).unwrap_err();
    match err {
        ParseError::MalformedHeader { line, header, .. } => {
            assert_eq!(line, 6);
            assert_eq!(header, r"[HKEY_CURRENT_USER\Software\Bad]]");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn invalid_value_fails_whole_file_by_default() {
    let err = RegistryDocument::from_file(resource_path("invalid_value.reg")).unwrap_err();
    match &err {
        ParseError::InvalidValue { key, name, raw, source, key_line } => {
            assert_eq!(key, r"HKEY_CURRENT_USER\Software\Values");
            assert_eq!(name, "Broken");
            assert_eq!(raw, "dword:zz");
            assert_eq!(*key_line, 3);
            assert_eq!(source, &ValueDecodeError::InvalidDword("zz".into()));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn invalid_value_can_be_skipped() -> anyhow::Result<()> {
    let parser = RegistryParser::new(ParseOptions {
        invalid_values: InvalidValuePolicy::Skip,
        ..ParseOptions::default()
    });
    let doc = parser.load_from_file(resource_path("invalid_value.reg"))?;
    let key = doc.get_key(r"HKEY_CURRENT_USER\Software\Values").expect("key");
    assert_eq!(key.names().collect::<Vec<_>>(), ["Good", "AlsoGood"]);
    assert_eq!(doc.skipped().len(), 1);
    assert_eq!(doc.skipped()[0].name, "Broken");
    assert_eq!(doc.skipped()[0].error, ValueDecodeError::InvalidDword("zz".into()));
    Ok(())
}

#[test]
fn missing_file_is_an_io_error() {
    let err = RegistryDocument::from_file(resource_path("does_not_exist.reg")).unwrap_err();
    assert!(matches!(err, ParseError::Io(_)));
}
