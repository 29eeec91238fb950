//! Integration tests for the conversion pipeline and extractor registry.

use doc2md::model::{Document, Heading, ImageReference, Metadata, Paragraph, Section, Table};
use doc2md::{
    ConversionConfig, Converter, Error, ExtractorRegistry, ImageAsset, OutputEncoding,
    OutputWriter, SourceFormat,
};
use std::path::PathBuf;

const PNG: &[u8] = b"\x89PNG\r\n\x1a\n0000";

/// Stands in for a Word extractor.
fn extract_fixture(_data: &[u8]) -> doc2md::Result<Document> {
    let mut doc = Document::with_metadata(Metadata {
        title: Some("Inventory".to_string()),
        ..Default::default()
    });
    doc.add_section(
        Section::with_heading(Heading::new(1, "Inventory")).with_block(Table::from_rows(
            vec!["Item", "Qty"],
            vec![vec!["Apple", "3"], vec!["Pear", "12"]],
        )),
    );
    Ok(doc)
}

fn extract_failing(_data: &[u8]) -> doc2md::Result<Document> {
    Err(Error::extract("docx", "corrupt package"))
}

#[test]
fn test_registry_defaults() {
    let registry = ExtractorRegistry::with_defaults();
    assert!(registry.supports(SourceFormat::Json));
    assert!(registry.supports(SourceFormat::PlainText));
    assert!(!registry.supports(SourceFormat::Docx));
    assert!(!registry.supports(SourceFormat::Pdf));
}

#[test]
fn test_custom_extractor() {
    let mut registry = ExtractorRegistry::with_defaults();
    registry.register(SourceFormat::Docx, extract_fixture);

    let converter = Converter::default().with_extractors(registry);
    let outcome = converter
        .convert_bytes(b"PK\x03\x04word/document.xml", Some("inventory.docx"))
        .unwrap();

    assert_eq!(outcome.source_format, Some(SourceFormat::Docx));
    assert_eq!(
        outcome.markdown,
        "# Inventory\n\n| Item  | Qty |\n| ----- | --- |\n| Apple | 3   |\n| Pear  | 12  |\n"
    );
    assert_eq!(outcome.stats.table_count, 1);
    assert!(outcome.is_valid());
}

#[test]
fn test_extractor_failure_is_reported() {
    let mut registry = ExtractorRegistry::new();
    registry.register(SourceFormat::Docx, extract_failing);

    let converter = Converter::default().with_extractors(registry);
    let err = converter
        .convert_bytes(b"PK\x03\x04word/", None)
        .unwrap_err();
    assert!(matches!(err, Error::Extract { .. }));
    assert!(err.to_string().contains("corrupt package"));
}

#[test]
fn test_unregistered_format() {
    let err = Converter::default()
        .convert_bytes(b"%PDF-1.7\n", Some("scan.pdf"))
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat(_)));
}

#[test]
fn test_json_source() {
    let mut doc = Document::new();
    doc.add_section(Section::new().with_block(Paragraph::new("From JSON")));
    let json = serde_json::to_vec(&doc).unwrap();

    let outcome = Converter::default().convert_bytes(&json, None).unwrap();
    assert_eq!(outcome.source_format, Some(SourceFormat::Json));
    assert_eq!(outcome.markdown, "From JSON\n");
}

#[test]
fn test_convert_batch_keeps_order() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");

    let mut paths = Vec::new();
    for (name, body) in [
        ("a.txt", "# A\n\nfirst".as_bytes()),
        ("b.txt", "# B\n\nsecond".as_bytes()),
        ("broken.bin", b"\x00\x01\x02".as_slice()),
        ("d.txt", "# D\n\nfourth".as_bytes()),
    ] {
        let path = dir.path().join(name);
        std::fs::write(&path, body).unwrap();
        paths.push(path);
    }

    let converter = Converter::default();
    let results = converter.convert_batch(&paths, &OutputWriter::new(&out));

    assert_eq!(results.len(), 4);
    assert!(matches!(results[2], Err(Error::UnknownFormat)));
    for (idx, stem) in [(0, "a"), (1, "b"), (3, "d")] {
        let conversion = results[idx].as_ref().unwrap();
        assert_eq!(conversion.source, paths[idx]);
        assert_eq!(conversion.output, out.join(format!("{}.md", stem)));
        assert!(conversion.output.exists());
    }

    let written = std::fs::read_to_string(out.join("b.md")).unwrap();
    assert_eq!(written, "# B\n\nsecond\n");
}

#[test]
fn test_convert_batch_distinct_outputs_for_shared_stems() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    std::fs::create_dir_all(dir.path().join("x")).unwrap();
    std::fs::create_dir_all(dir.path().join("y")).unwrap();

    let mut doc = Document::new();
    doc.add_section(Section::new().with_block(Paragraph::new("third")));

    let paths = vec![
        dir.path().join("x/a.txt"),
        dir.path().join("y/a.txt"),
        dir.path().join("a.json"),
    ];
    std::fs::write(&paths[0], "first").unwrap();
    std::fs::write(&paths[1], "second").unwrap();
    std::fs::write(&paths[2], serde_json::to_vec(&doc).unwrap()).unwrap();

    let results = Converter::default().convert_batch(&paths, &OutputWriter::new(&out));

    let outputs: Vec<PathBuf> = results
        .iter()
        .map(|r| r.as_ref().unwrap().output.clone())
        .collect();
    assert_eq!(
        outputs,
        vec![out.join("a.md"), out.join("a_2.md"), out.join("a_3.md")]
    );
    for (output, body) in outputs.iter().zip(["first\n", "second\n", "third\n"]) {
        assert_eq!(std::fs::read_to_string(output).unwrap(), body);
    }
}

#[test]
fn test_convert_batch_with_progress() {
    let dir = tempfile::tempdir().unwrap();
    let paths: Vec<PathBuf> = (0..5)
        .map(|i| {
            let path = dir.path().join(format!("note{}.txt", i));
            std::fs::write(&path, format!("Note {}", i)).unwrap();
            path
        })
        .collect();

    let (tx, rx) = crossbeam_channel::unbounded();
    let writer = OutputWriter::new(dir.path().join("out"));
    let results = Converter::default().convert_batch_with_progress(&paths, &writer, &tx);
    drop(tx);

    assert!(results.iter().all(|r| r.is_ok()));

    let mut indices: Vec<usize> = rx
        .iter()
        .map(|progress| {
            assert!(progress.success);
            assert_eq!(progress.path, paths[progress.index]);
            progress.index
        })
        .collect();
    indices.sort_unstable();
    assert_eq!(indices, vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_images_and_diagrams_written() {
    let dir = tempfile::tempdir().unwrap();
    let writer = OutputWriter::new(dir.path());
    let source = PathBuf::from("/input/report.docx");

    let mut doc = Document::new();
    doc.add_section(
        Section::new().with_block(
            ImageReference::new("rId5")
                .with_alt_text("Flow")
                .with_diagram_markup("graph LR\n    A-->B"),
        ),
    );
    let assets = vec![ImageAsset::new("rId5", PNG.to_vec())];

    let converter = Converter::default();
    let (outcome, images) = converter
        .convert_with_images(&doc, &assets, &source, &writer)
        .unwrap();
    assert_eq!(images, vec![dir.path().join("report/images/image_001.png")]);
    assert!(outcome
        .markdown
        .starts_with("![Flow](report/images/image_001.png)\n"));

    let conversion = converter.write(&source, outcome, &writer).unwrap();
    assert_eq!(conversion.output, dir.path().join("report.md"));
    assert_eq!(
        std::fs::read_to_string(dir.path().join("report/images/image_001.mmd")).unwrap(),
        "graph LR\n    A-->B"
    );
    assert_eq!(
        std::fs::read(dir.path().join("report/images/image_001.png")).unwrap(),
        PNG
    );
}

#[test]
fn test_image_extraction_disabled() {
    let dir = tempfile::tempdir().unwrap();
    let writer = OutputWriter::new(dir.path());

    let mut doc = Document::new();
    doc.add_section(Section::new().with_block(ImageReference::new("rId5")));
    let assets = vec![ImageAsset::new("rId5", PNG.to_vec())];

    let config = ConversionConfig {
        extract_images: false,
        ..Default::default()
    };
    let (outcome, images) = Converter::new(config)
        .convert_with_images(&doc, &assets, &PathBuf::from("report.docx"), &writer)
        .unwrap();

    assert!(images.is_empty());
    assert_eq!(outcome.markdown, "<!-- Image extraction failed: rId5 -->\n");
    assert_eq!(outcome.stats.missing_image_count, 1);
    assert!(!dir.path().join("report").exists());
}

#[test]
fn test_dry_run_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("memo.txt");
    std::fs::write(&input, "# Memo\n\nbody").unwrap();

    let out = dir.path().join("out");
    let writer = OutputWriter::new(&out).with_dry_run(true);
    let conversion = Converter::default().convert_file_to(&input, &writer).unwrap();

    assert_eq!(conversion.written, vec![out.join("memo.md")]);
    assert!(!out.exists());
}

#[test]
fn test_latin1_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("menu.txt");
    std::fs::write(&input, "Café 日本").unwrap();

    let writer = OutputWriter::new(dir.path()).with_encoding(OutputEncoding::Latin1);
    let conversion = Converter::default().convert_file_to(&input, &writer).unwrap();

    let bytes = std::fs::read(&conversion.output).unwrap();
    assert_eq!(bytes, b"Caf\xe9 ??\n");
}

#[test]
fn test_roundtrip_and_config_from_yaml() {
    let config = ConversionConfig::from_yaml_str(
        "heading_offset: 1\nverify_roundtrip: true\nvalidate_output: false\n",
    )
    .unwrap();
    let converter = Converter::new(config);

    let outcome = converter
        .convert_bytes("# Plan\n\nShip it".as_bytes(), Some("plan.txt"))
        .unwrap();
    assert_eq!(outcome.markdown, "## Plan\n\nShip it\n");
    assert!(outcome.validation.issues.is_empty());
    assert!(outcome.roundtrip.unwrap().equivalent);
}
