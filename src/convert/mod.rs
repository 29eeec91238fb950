//! Conversion orchestration.
//!
//! A [`Converter`] runs one document through the pipeline:
//!
//! 1. detect the source format and extract a [`Document`]
//! 2. serialize it to Markdown
//! 3. pretty print the Markdown
//! 4. validate it, when `validate_output` is set
//! 5. re-parse and compare, when `verify_roundtrip` is set
//!
//! Validation findings never stop a conversion. Output is produced and
//! written even when the result is invalid; the findings travel with it.
//!
//! # Example
//!
//! ```no_run
//! use doc2md::convert::Converter;
//! use doc2md::ConversionConfig;
//!
//! fn main() -> doc2md::Result<()> {
//!     let converter = Converter::new(ConversionConfig::default());
//!     let outcome = converter.convert_file("notes.txt")?;
//!     println!("{}", outcome.markdown);
//!     Ok(())
//! }
//! ```

use crate::config::ConversionConfig;
use crate::detect::{self, SourceFormat};
use crate::error::{Error, Result};
use crate::extract::ExtractorRegistry;
use crate::model::Document;
use crate::output::{
    document_stem, embed_images, persist_images, unique_stems, ImageAsset, OutputWriter,
};
use crate::render::{self, DiagramArtifact, RenderStats};
use crate::roundtrip::{self, RoundTripReport};
use crate::validate::{ValidationResult, Validator};
use crossbeam_channel::Sender;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Everything produced by converting one document.
#[derive(Debug, Clone)]
pub struct ConversionOutcome {
    /// Pretty-printed Markdown
    pub markdown: String,

    /// Validator findings; the default (valid, no issues) when validation
    /// is disabled
    pub validation: ValidationResult,

    /// Diagram markup to persist next to its image
    pub artifacts: Vec<DiagramArtifact>,

    pub stats: RenderStats,

    /// Present when round-trip verification is enabled
    pub roundtrip: Option<RoundTripReport>,

    /// Detected source format, `None` for documents handed over directly
    pub source_format: Option<SourceFormat>,

    pub duration: Duration,
}

impl ConversionOutcome {
    /// Whether the Markdown passed validation.
    pub fn is_valid(&self) -> bool {
        self.validation.valid
    }
}

/// A converted file and the paths written for it.
#[derive(Debug, Clone)]
pub struct FileConversion {
    pub source: PathBuf,
    pub output: PathBuf,
    pub outcome: ConversionOutcome,

    /// Markdown, images and diagram artifacts, in write order
    pub written: Vec<PathBuf>,
}

/// Progress message sent by [`Converter::convert_batch_with_progress`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchProgress {
    /// Position of the file in the input list
    pub index: usize,
    pub path: PathBuf,
    pub success: bool,
}

/// Document conversion pipeline.
#[derive(Debug, Clone)]
pub struct Converter {
    config: ConversionConfig,
    extractors: ExtractorRegistry,
    validator: Validator,
}

impl Converter {
    /// Create a converter with the built-in extractors.
    pub fn new(config: ConversionConfig) -> Self {
        Self {
            config,
            extractors: ExtractorRegistry::with_defaults(),
            validator: Validator::new(),
        }
    }

    /// Replace the extractor registry.
    pub fn with_extractors(mut self, extractors: ExtractorRegistry) -> Self {
        self.extractors = extractors;
        self
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    pub fn extractors(&self) -> &ExtractorRegistry {
        &self.extractors
    }

    /// Run serialize, pretty print, validate and round trip on a document.
    pub fn convert_document(&self, doc: &Document) -> ConversionOutcome {
        self.render(doc, None, Instant::now())
    }

    /// Detect, extract and convert in-memory source bytes.
    ///
    /// Empty input and input above `max_file_size_mb` are rejected before
    /// detection.
    pub fn convert_bytes(&self, data: &[u8], file_name: Option<&str>) -> Result<ConversionOutcome> {
        let started = Instant::now();
        self.check_size(data.len() as u64, file_name.unwrap_or("<bytes>"))?;
        let format = detect::detect_format(data, file_name)?;
        log::debug!(
            "Detected {} for {}",
            format,
            file_name.unwrap_or("<bytes>")
        );
        let doc = self.extractors.extract(format, data)?;
        Ok(self.render(&doc, Some(format), started))
    }

    /// Detect, extract and convert a file.
    pub fn convert_file<P: AsRef<Path>>(&self, path: P) -> Result<ConversionOutcome> {
        let path = path.as_ref();
        log::info!("Converting {}", path.display());
        let size = std::fs::metadata(path)?.len();
        self.check_size(size, &path.display().to_string())?;
        let data = std::fs::read(path)?;
        let name = path.file_name().and_then(|n| n.to_str());
        self.convert_bytes(&data, name)
    }

    fn check_size(&self, size: u64, name: &str) -> Result<()> {
        if size == 0 {
            return Err(Error::EmptyInput(name.to_string()));
        }
        let limit = self.config.max_file_size_bytes();
        if size > limit {
            return Err(Error::FileTooLarge {
                name: name.to_string(),
                size,
                limit,
            });
        }
        Ok(())
    }

    /// Persist image assets, then convert the document that points at
    /// them. Returns the outcome and the image files written.
    ///
    /// With `extract_images` disabled the assets are ignored and images
    /// render as placeholders unless they already carry a path. With
    /// `embed_images_base64` set the images become `data:` URLs and no
    /// image file is written.
    pub fn convert_with_images(
        &self,
        doc: &Document,
        assets: &[ImageAsset],
        source: &Path,
        writer: &OutputWriter,
    ) -> Result<(ConversionOutcome, Vec<PathBuf>)> {
        let started = Instant::now();
        if !self.config.extract_images {
            log::debug!("Image extraction disabled, skipping {} assets", assets.len());
            return Ok((self.render(doc, None, started), Vec::new()));
        }
        if self.config.embed_images_base64 {
            let embedded = embed_images(doc, assets);
            return Ok((self.render(&embedded, None, started), Vec::new()));
        }

        let layout = writer
            .image_layout(source)
            .with_preserve_names(self.config.preserve_image_names);
        let persisted = persist_images(doc, assets, &layout)?;
        Ok((
            self.render(&persisted.document, None, started),
            persisted.written,
        ))
    }

    /// Convert a file and write its Markdown and diagram artifacts.
    pub fn convert_file_to(&self, path: &Path, writer: &OutputWriter) -> Result<FileConversion> {
        let outcome = self.convert_file(path)?;
        self.write(path, outcome, writer)
    }

    /// [`Converter::convert_file_to`], writing `{stem}.md` instead of
    /// deriving the name from `path`.
    pub fn convert_file_as(
        &self,
        path: &Path,
        stem: &str,
        writer: &OutputWriter,
    ) -> Result<FileConversion> {
        let outcome = self.convert_file(path)?;
        self.write_as(path, stem, outcome, writer)
    }

    /// Write an outcome's Markdown and diagram artifacts for `source`.
    pub fn write(
        &self,
        source: &Path,
        outcome: ConversionOutcome,
        writer: &OutputWriter,
    ) -> Result<FileConversion> {
        self.write_as(source, &document_stem(source), outcome, writer)
    }

    fn write_as(
        &self,
        source: &Path,
        stem: &str,
        outcome: ConversionOutcome,
        writer: &OutputWriter,
    ) -> Result<FileConversion> {
        let output = writer.markdown_path_for(stem);
        let mut written = vec![writer.write_markdown(&output, &outcome.markdown)?];
        written.extend(writer.write_artifacts(&outcome.artifacts)?);

        Ok(FileConversion {
            source: source.to_path_buf(),
            output,
            outcome,
            written,
        })
    }

    /// Convert files in parallel. Results are in input order and one
    /// failure does not affect the others.
    ///
    /// Sources sharing a file stem get distinct outputs: the first keeps
    /// `{stem}.md`, later ones get `{stem}_2.md` and so on.
    pub fn convert_batch(
        &self,
        paths: &[PathBuf],
        writer: &OutputWriter,
    ) -> Vec<Result<FileConversion>> {
        log::info!("Converting {} files", paths.len());
        let stems = unique_stems(paths);
        paths
            .par_iter()
            .zip(stems.par_iter())
            .map(|(path, stem)| self.convert_file_as(path, stem, writer))
            .collect()
    }

    /// [`Converter::convert_batch`], reporting each finished file on
    /// `progress`. A closed receiver does not stop the batch.
    pub fn convert_batch_with_progress(
        &self,
        paths: &[PathBuf],
        writer: &OutputWriter,
        progress: &Sender<BatchProgress>,
    ) -> Vec<Result<FileConversion>> {
        let stems = unique_stems(paths);
        paths
            .par_iter()
            .enumerate()
            .map_with(progress.clone(), |tx, (index, path)| {
                let result = self.convert_file_as(path, &stems[index], writer);
                if let Err(ref e) = result {
                    log::warn!("Failed to convert {}: {}", path.display(), e);
                }
                let _ = tx.send(BatchProgress {
                    index,
                    path: path.clone(),
                    success: result.is_ok(),
                });
                result
            })
            .collect()
    }

    fn render(
        &self,
        doc: &Document,
        source_format: Option<SourceFormat>,
        started: Instant,
    ) -> ConversionOutcome {
        let options = self.config.serialize_options();
        let result = render::to_markdown_with_stats(doc, &options);
        let markdown = render::format(&result.content);

        let validation = if self.config.validate_output {
            let validation = self.validator.validate(&markdown);
            if !validation.valid {
                log::warn!(
                    "Markdown has {} validation errors",
                    validation.error_count()
                );
            }
            validation
        } else {
            ValidationResult::default()
        };

        let roundtrip = self
            .config
            .verify_roundtrip
            .then(|| roundtrip::check(doc, &markdown));
        if let Some(ref report) = roundtrip {
            if !report.equivalent {
                log::warn!(
                    "Round trip lost {} text blocks",
                    report.missing.len()
                );
            }
        }

        let duration = started.elapsed();
        log::debug!(
            "Converted document: {} bytes of Markdown in {:?}",
            markdown.len(),
            duration
        );

        ConversionOutcome {
            markdown,
            validation,
            artifacts: result.artifacts,
            stats: result.stats,
            roundtrip,
            source_format,
            duration,
        }
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(ConversionConfig::default())
    }
}
