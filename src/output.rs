//! Output layout and file writing.
//!
//! For a source `report.docx` converted into `out/`:
//!
//! ```text
//! out/report.md
//! out/report/images/image_001.png
//! out/report/images/image_001.mmd     (diagram markup, when present)
//! ```
//!
//! Image references in the Markdown are relative to the Markdown file.

use crate::error::{Error, Result};
use crate::model::Document;
use crate::render::DiagramArtifact;
use base64::{engine::general_purpose::STANDARD, Engine};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Encoding of written Markdown files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputEncoding {
    #[default]
    Utf8,
    /// UTF-8 with a byte order mark
    Utf8Sig,
    /// 7-bit ASCII, other characters become `?`
    Ascii,
    /// ISO-8859-1, other characters become `?`
    Latin1,
}

impl OutputEncoding {
    pub fn name(self) -> &'static str {
        match self {
            OutputEncoding::Utf8 => "utf-8",
            OutputEncoding::Utf8Sig => "utf-8-sig",
            OutputEncoding::Ascii => "ascii",
            OutputEncoding::Latin1 => "latin-1",
        }
    }

    /// Encode `text`, returning the bytes and the number of characters
    /// that had to be replaced.
    pub fn encode(self, text: &str) -> (Vec<u8>, usize) {
        match self {
            OutputEncoding::Utf8 => (text.as_bytes().to_vec(), 0),
            OutputEncoding::Utf8Sig => {
                let mut bytes = Vec::with_capacity(text.len() + 3);
                bytes.extend_from_slice(b"\xEF\xBB\xBF");
                bytes.extend_from_slice(text.as_bytes());
                (bytes, 0)
            }
            OutputEncoding::Ascii => encode_single_byte(text, 0x7F),
            OutputEncoding::Latin1 => encode_single_byte(text, 0xFF),
        }
    }
}

fn encode_single_byte(text: &str, max: u32) -> (Vec<u8>, usize) {
    let mut replaced = 0;
    let bytes = text
        .chars()
        .map(|c| match u8::try_from(u32::from(c)) {
            Ok(b) if u32::from(b) <= max => b,
            _ => {
                replaced += 1;
                b'?'
            }
        })
        .collect();
    (bytes, replaced)
}

impl FromStr for OutputEncoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "utf-8" | "utf8" => Ok(OutputEncoding::Utf8),
            "utf-8-sig" | "utf8-sig" => Ok(OutputEncoding::Utf8Sig),
            "ascii" | "us-ascii" => Ok(OutputEncoding::Ascii),
            "latin-1" | "latin1" | "iso-8859-1" => Ok(OutputEncoding::Latin1),
            _ => Err(Error::UnsupportedEncoding(s.to_string())),
        }
    }
}

impl fmt::Display for OutputEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw image bytes handed over by an extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    /// Matches `ImageReference::source_identifier`
    pub source_identifier: String,

    pub data: Vec<u8>,

    /// File name inside the source document, when known
    pub original_name: Option<String>,
}

impl ImageAsset {
    pub fn new(source_identifier: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            source_identifier: source_identifier.into(),
            data,
            original_name: None,
        }
    }

    pub fn with_original_name(mut self, name: impl Into<String>) -> Self {
        self.original_name = Some(name.into());
        self
    }
}

/// File extension for image bytes, from their magic number.
pub fn image_extension(data: &[u8]) -> &'static str {
    if data.starts_with(b"\x89PNG\r\n\x1a\n") {
        "png"
    } else if data.starts_with(b"\xFF\xD8\xFF") {
        "jpg"
    } else if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        "gif"
    } else if data.starts_with(b"BM") {
        "bmp"
    } else if data.starts_with(b"II*\0") || data.starts_with(b"MM\0*") {
        "tiff"
    } else if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
        "webp"
    } else if data.starts_with(b"\x01\0\0\0") && data.len() >= 44 && &data[40..44] == b" EMF" {
        "emf"
    } else {
        "png"
    }
}

/// MIME type for image bytes, from their magic number.
pub fn image_mime_type(data: &[u8]) -> &'static str {
    match image_extension(data) {
        "jpg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tiff" => "image/tiff",
        "webp" => "image/webp",
        "emf" => "image/emf",
        _ => "image/png",
    }
}

/// Base64 `data:` URL carrying the image bytes.
pub fn data_url(data: &[u8]) -> String {
    format!("data:{};base64,{}", image_mime_type(data), STANDARD.encode(data))
}

/// Return a copy of `doc` whose images point at `data:` URLs built from
/// the matching assets. Nothing is written.
pub fn embed_images(doc: &Document, assets: &[ImageAsset]) -> Document {
    let urls: HashMap<&str, String> = assets
        .iter()
        .map(|asset| (asset.source_identifier.as_str(), data_url(&asset.data)))
        .collect();
    log::debug!("Embedding {} images as data URLs", urls.len());

    doc.map_images(|image| match urls.get(image.source_identifier.as_str()) {
        Some(url) => image.clone().with_relative_path(url.clone()),
        None => image.clone(),
    })
}

/// Where and how images of one document are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageLayout {
    /// Directory holding the Markdown file
    pub output_dir: PathBuf,

    /// Source file name without extension
    pub document_stem: String,

    /// Keep `ImageAsset::original_name` when available
    pub preserve_names: bool,

    /// Compute paths without writing
    pub dry_run: bool,
}

impl ImageLayout {
    pub fn new(output_dir: impl Into<PathBuf>, document_stem: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            document_stem: document_stem.into(),
            preserve_names: true,
            dry_run: false,
        }
    }

    pub fn with_preserve_names(mut self, preserve: bool) -> Self {
        self.preserve_names = preserve;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Image directory, relative to the Markdown file.
    pub fn relative_dir(&self) -> String {
        format!("{}/images", self.document_stem)
    }
}

/// Result of [`persist_images`].
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedImages {
    /// Copy of the input document with `relative_path` set on every
    /// persisted image
    pub document: Document,

    /// Files written (or that would be written in a dry run)
    pub written: Vec<PathBuf>,
}

/// Write image assets to disk and return a document whose references
/// point at them.
///
/// Assets are numbered in the order given, starting at 1. Images without
/// a matching asset keep whatever path they already had. The input
/// document is left untouched.
pub fn persist_images(
    doc: &Document,
    assets: &[ImageAsset],
    layout: &ImageLayout,
) -> Result<PersistedImages> {
    if assets.is_empty() {
        return Ok(PersistedImages {
            document: doc.clone(),
            written: Vec::new(),
        });
    }

    let relative_dir = layout.relative_dir();
    let images_dir = layout.output_dir.join(&relative_dir);
    if !layout.dry_run {
        std::fs::create_dir_all(&images_dir)?;
    }

    let mut paths: HashMap<&str, String> = HashMap::new();
    let mut used: HashSet<String> = HashSet::new();
    let mut written = Vec::with_capacity(assets.len());

    for (idx, asset) in assets.iter().enumerate() {
        let file_name = image_file_name(asset, idx + 1, layout.preserve_names, &used);
        let path = images_dir.join(&file_name);

        if layout.dry_run {
            log::info!("Dry run: would write image {}", path.display());
        } else {
            std::fs::write(&path, &asset.data)?;
            log::debug!("Wrote image {} ({} bytes)", path.display(), asset.data.len());
        }

        paths.insert(
            asset.source_identifier.as_str(),
            format!("{}/{}", relative_dir, file_name),
        );
        used.insert(name_key(&file_name));
        written.push(path);
    }

    let document = doc.map_images(|image| match paths.get(image.source_identifier.as_str()) {
        Some(path) => image.clone().with_relative_path(path.clone()),
        None => image.clone(),
    });

    Ok(PersistedImages { document, written })
}

/// Names compare by lowercased stem, so `chart.png` and `Chart.jpg` clash
/// and cannot share a diagram artifact.
fn name_key(file_name: &str) -> String {
    Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name)
        .to_lowercase()
}

fn image_file_name(
    asset: &ImageAsset,
    index: usize,
    preserve: bool,
    used: &HashSet<String>,
) -> String {
    let ext = image_extension(&asset.data);

    if preserve {
        let original = asset
            .original_name
            .as_deref()
            .and_then(|n| Path::new(n).file_name())
            .and_then(|n| n.to_str())
            .filter(|n| !n.trim().is_empty());
        if let Some(name) = original {
            let name = if Path::new(name).extension().is_some() {
                name.to_string()
            } else {
                format!("{}.{}", name, ext)
            };
            if !used.contains(&name_key(&name)) {
                return name;
            }
            log::debug!("Image name '{}' already used, numbering instead", name);
        }
    }

    let mut number = index;
    loop {
        let name = format!("image_{:03}.{}", number, ext);
        if !used.contains(&name_key(&name)) {
            return name;
        }
        number += 1;
    }
}

/// Output stems for a batch, one per source, in input order.
///
/// The first source keeps its stem. Later sources whose stem is already
/// taken, ignoring case, get `_2`, `_3` and so on.
pub fn unique_stems<P: AsRef<Path>>(sources: &[P]) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::new();
    sources
        .iter()
        .map(|source| {
            let source = source.as_ref();
            let stem = document_stem(source);
            let mut candidate = stem.clone();
            let mut suffix = 1;
            while !taken.insert(candidate.to_lowercase()) {
                suffix += 1;
                candidate = format!("{}_{}", stem, suffix);
            }
            if suffix > 1 {
                log::warn!(
                    "{}: output name '{}' already used, writing '{}.md'",
                    source.display(),
                    stem,
                    candidate
                );
            }
            candidate
        })
        .collect()
}

/// Writes Markdown files and diagram artifacts.
#[derive(Debug, Clone)]
pub struct OutputWriter {
    output_dir: PathBuf,
    encoding: OutputEncoding,
    dry_run: bool,
}

impl OutputWriter {
    /// Create a writer rooted at `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            encoding: OutputEncoding::Utf8,
            dry_run: false,
        }
    }

    pub fn with_encoding(mut self, encoding: OutputEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Markdown path for a source file: `{output_dir}/{stem}.md`.
    pub fn markdown_path(&self, source: &Path) -> PathBuf {
        self.markdown_path_for(&document_stem(source))
    }

    /// Markdown path for an explicit output stem.
    pub fn markdown_path_for(&self, stem: &str) -> PathBuf {
        self.output_dir.join(format!("{}.md", stem))
    }

    /// Image layout for a source file.
    pub fn image_layout(&self, source: &Path) -> ImageLayout {
        ImageLayout::new(&self.output_dir, document_stem(source)).with_dry_run(self.dry_run)
    }

    /// Write Markdown to `path` in the configured encoding.
    pub fn write_markdown(&self, path: &Path, content: &str) -> Result<PathBuf> {
        let (bytes, replaced) = self.encoding.encode(content);
        if replaced > 0 {
            log::warn!(
                "{}: {} characters not representable in {} were replaced",
                path.display(),
                replaced,
                self.encoding
            );
        }
        self.write_bytes(path, &bytes)?;
        Ok(path.to_path_buf())
    }

    /// Write diagram markup next to the images it belongs to.
    pub fn write_artifacts(&self, artifacts: &[DiagramArtifact]) -> Result<Vec<PathBuf>> {
        artifacts
            .iter()
            .map(|artifact| {
                let path = self.output_dir.join(&artifact.relative_path);
                self.write_bytes(&path, artifact.markup.as_bytes())?;
                Ok(path)
            })
            .collect()
    }

    fn write_bytes(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        if self.dry_run {
            log::info!("Dry run: would write {} ({} bytes)", path.display(), bytes.len());
            return Ok(());
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, bytes)?;
        log::debug!("Wrote {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }
}

/// Source file name without extension, `document` when there is none.
pub fn document_stem(source: &Path) -> String {
    source
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("document")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ImageReference, Section};

    const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";
    const JPEG: &[u8] = b"\xFF\xD8\xFF\xE0\0\x10JFIF";

    fn doc_with_images(ids: &[&str]) -> Document {
        let mut section = Section::new();
        for id in ids {
            section.push(ImageReference::new(*id));
        }
        let mut doc = Document::new();
        doc.add_section(section);
        doc
    }

    #[test]
    fn test_encoding_parse() {
        assert_eq!("UTF-8".parse::<OutputEncoding>().unwrap(), OutputEncoding::Utf8);
        assert_eq!("utf_8_sig".parse::<OutputEncoding>().unwrap(), OutputEncoding::Utf8Sig);
        assert_eq!("ISO-8859-1".parse::<OutputEncoding>().unwrap(), OutputEncoding::Latin1);
        assert!(matches!(
            "cp1252".parse::<OutputEncoding>(),
            Err(Error::UnsupportedEncoding(_))
        ));
    }

    #[test]
    fn test_encode_replaces_unrepresentable() {
        assert_eq!(OutputEncoding::Ascii.encode("a\u{e9}b"), (b"a?b".to_vec(), 1));
        assert_eq!(OutputEncoding::Latin1.encode("a\u{e9}\u{4e2d}"), (vec![b'a', 0xE9, b'?'], 1));
        assert_eq!(OutputEncoding::Utf8Sig.encode("x").0, b"\xEF\xBB\xBFx".to_vec());
    }

    #[test]
    fn test_image_extension() {
        assert_eq!(image_extension(PNG), "png");
        assert_eq!(image_extension(JPEG), "jpg");
        assert_eq!(image_extension(b"GIF89a..."), "gif");
        assert_eq!(image_extension(b"RIFF\0\0\0\0WEBPVP8 "), "webp");
        assert_eq!(image_extension(b"unknown"), "png");
    }

    #[test]
    fn test_embed_images() {
        let doc = doc_with_images(&["a", "b"]);
        let assets = vec![ImageAsset::new("a", JPEG.to_vec())];

        let embedded = embed_images(&doc, &assets);
        let paths: Vec<Option<String>> = embedded
            .images()
            .map(|i| i.relative_path.clone())
            .collect();
        assert_eq!(
            paths,
            vec![Some("data:image/jpeg;base64,/9j/4AAQSkZJRg==".to_string()), None]
        );
        assert_eq!(data_url(b"GIF89a"), "data:image/gif;base64,R0lGODlh");
    }

    #[test]
    fn test_persist_images_sequential_names() {
        let dir = tempfile::tempdir().unwrap();
        let doc = doc_with_images(&["a", "b", "c"]);
        let assets = vec![
            ImageAsset::new("a", PNG.to_vec()),
            ImageAsset::new("b", JPEG.to_vec()),
        ];
        let layout = ImageLayout::new(dir.path(), "report").with_preserve_names(false);

        let persisted = persist_images(&doc, &assets, &layout).unwrap();

        let paths: Vec<Option<String>> = persisted
            .document
            .images()
            .map(|i| i.relative_path.clone())
            .collect();
        assert_eq!(
            paths,
            vec![
                Some("report/images/image_001.png".to_string()),
                Some("report/images/image_002.jpg".to_string()),
                None,
            ]
        );
        assert!(dir.path().join("report/images/image_002.jpg").exists());
        assert_eq!(persisted.written.len(), 2);

        // input untouched
        assert!(doc.images().all(|i| i.relative_path.is_none()));
    }

    #[test]
    fn test_persist_images_preserves_names() {
        let dir = tempfile::tempdir().unwrap();
        let doc = doc_with_images(&["a", "b", "c"]);
        let assets = vec![
            ImageAsset::new("a", PNG.to_vec()).with_original_name("media/chart.png"),
            ImageAsset::new("b", JPEG.to_vec()).with_original_name("photo"),
            ImageAsset::new("c", PNG.to_vec()).with_original_name("chart.png"),
        ];
        let layout = ImageLayout::new(dir.path(), "deck");

        let persisted = persist_images(&doc, &assets, &layout).unwrap();
        let paths: Vec<String> = persisted
            .document
            .images()
            .filter_map(|i| i.relative_path.clone())
            .collect();
        assert_eq!(
            paths,
            vec![
                "deck/images/chart.png",
                "deck/images/photo.jpg",
                "deck/images/image_003.png",
            ]
        );
    }

    #[test]
    fn test_numbered_name_skips_preserved_name() {
        let dir = tempfile::tempdir().unwrap();
        let doc = doc_with_images(&["a", "b", "c"]);
        let assets = vec![
            ImageAsset::new("a", PNG.to_vec()).with_original_name("image_002.png"),
            ImageAsset::new("b", PNG.to_vec()),
            ImageAsset::new("c", PNG.to_vec()),
        ];
        let layout = ImageLayout::new(dir.path(), "scan");

        let persisted = persist_images(&doc, &assets, &layout).unwrap();
        let paths: Vec<String> = persisted
            .document
            .images()
            .filter_map(|i| i.relative_path.clone())
            .collect();
        assert_eq!(
            paths,
            vec![
                "scan/images/image_002.png",
                "scan/images/image_003.png",
                "scan/images/image_004.png",
            ]
        );
        let distinct: HashSet<&PathBuf> = persisted.written.iter().collect();
        assert_eq!(distinct.len(), 3);
    }

    #[test]
    fn test_preserved_names_clash_on_stem() {
        let dir = tempfile::tempdir().unwrap();
        let doc = doc_with_images(&["a", "b"]);
        let assets = vec![
            ImageAsset::new("a", PNG.to_vec()).with_original_name("Chart.png"),
            ImageAsset::new("b", JPEG.to_vec()).with_original_name("chart.jpg"),
        ];
        let persisted = persist_images(&doc, &assets, &ImageLayout::new(dir.path(), "d")).unwrap();
        let paths: Vec<String> = persisted
            .document
            .images()
            .filter_map(|i| i.relative_path.clone())
            .collect();
        assert_eq!(paths, vec!["d/images/Chart.png", "d/images/image_002.jpg"]);
    }

    #[test]
    fn test_unique_stems() {
        let stems = unique_stems(&["x/a.txt", "y/a.txt", "a.json", "b.txt", "y/A.md"]);
        assert_eq!(stems, vec!["a", "a_2", "a_3", "b", "A_4"]);

        let taken = unique_stems(&["a_2.txt", "a.txt", "x/a.txt"]);
        assert_eq!(taken, vec!["a_2", "a", "a_3"]);
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let doc = doc_with_images(&["a"]);
        let assets = vec![ImageAsset::new("a", PNG.to_vec())];
        let layout = ImageLayout::new(dir.path(), "x").with_dry_run(true);

        let persisted = persist_images(&doc, &assets, &layout).unwrap();
        assert_eq!(persisted.written.len(), 1);
        assert!(!dir.path().join("x").exists());
        assert!(persisted.document.images().all(|i| i.is_persisted()));

        let writer = OutputWriter::new(dir.path()).with_dry_run(true);
        let path = writer.markdown_path(Path::new("in/x.docx"));
        writer.write_markdown(&path, "# x\n").unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_write_markdown_and_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let writer = OutputWriter::new(dir.path().join("out")).with_encoding(OutputEncoding::Latin1);

        let path = writer.markdown_path(Path::new("/src/caf\u{e9}.docx"));
        assert!(path.ends_with("caf\u{e9}.md"));
        writer.write_markdown(&path, "caf\u{e9}\n").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), vec![b'c', b'a', b'f', 0xE9, b'\n']);

        let artifacts = vec![DiagramArtifact {
            relative_path: "caf\u{e9}/images/image_001.mmd".to_string(),
            markup: "graph TD; A-->B".to_string(),
        }];
        let written = writer.write_artifacts(&artifacts).unwrap();
        assert_eq!(
            std::fs::read_to_string(&written[0]).unwrap(),
            "graph TD; A-->B"
        );
    }

    #[test]
    fn test_document_stem() {
        assert_eq!(document_stem(Path::new("a/b/report.final.docx")), "report.final");
        assert_eq!(document_stem(Path::new("")), "document");
    }
}
