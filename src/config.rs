//! Conversion configuration.
//!
//! A [`ConversionConfig`] is loaded from YAML, merged with command-line
//! overrides and validated once. The serializer only ever sees the
//! [`SerializeOptions`] projection.

use crate::error::{Error, Result};
use crate::output::OutputEncoding;
use crate::render::{RaggedRows, SerializeOptions, TableStyle};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Settings for a conversion run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConversionConfig {
    /// Added to every heading level, result clamped to 1..=6
    pub heading_offset: i32,

    /// Emit a front matter block with document metadata
    pub include_metadata: bool,

    pub table_style: TableStyle,

    /// Run the validator on the produced Markdown
    pub validate_output: bool,

    /// Encoding of written Markdown files
    pub output_encoding: String,

    /// Rows whose width differs from the header
    pub ragged_rows: RaggedRows,

    /// Persist image bytes supplied by extractors
    pub extract_images: bool,

    /// Keep original image file names when known
    pub preserve_image_names: bool,

    /// Inline images as base64 `data:` URLs instead of writing files
    pub embed_images_base64: bool,

    /// Inputs larger than this many MiB are rejected before extraction
    pub max_file_size_mb: u64,

    /// Re-parse the Markdown and compare it with the document
    pub verify_roundtrip: bool,

    /// Report output paths without writing anything
    pub dry_run: bool,

    /// Default log filter for the command line tool
    pub log_level: String,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            heading_offset: 0,
            include_metadata: false,
            table_style: TableStyle::Standard,
            validate_output: true,
            output_encoding: "utf-8".to_string(),
            ragged_rows: RaggedRows::Normalize,
            extract_images: true,
            preserve_image_names: true,
            embed_images_base64: false,
            max_file_size_mb: 100,
            verify_roundtrip: false,
            dry_run: false,
            log_level: "info".to_string(),
        }
    }
}

impl ConversionConfig {
    /// Load and validate a YAML configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        log::debug!("Loading configuration from {}", path.display());
        Self::from_yaml_str(&text)
    }

    /// Parse and validate YAML configuration text. An empty document
    /// yields the defaults.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: Self = if text.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(text).map_err(|e| Error::Config(e.to_string()))?
        };
        config.validate()?;
        Ok(config)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Check values that the type system does not.
    pub fn validate(&self) -> Result<()> {
        self.encoding()?;
        if self.max_file_size_mb == 0 {
            return Err(Error::Config("max_file_size_mb must be at least 1".to_string()));
        }
        log::LevelFilter::from_str(&self.log_level)
            .map_err(|_| Error::Config(format!("invalid log_level: {}", self.log_level)))?;
        Ok(())
    }

    /// The configured output encoding.
    pub fn encoding(&self) -> Result<OutputEncoding> {
        self.output_encoding.parse()
    }

    /// Input size limit in bytes.
    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb.saturating_mul(1024 * 1024)
    }

    /// Apply command-line overrides on top of this configuration.
    pub fn apply(mut self, overrides: &ConfigOverrides) -> Self {
        if let Some(offset) = overrides.heading_offset {
            self.heading_offset = offset;
        }
        if let Some(include) = overrides.include_metadata {
            self.include_metadata = include;
        }
        if let Some(validate) = overrides.validate_output {
            self.validate_output = validate;
        }
        if let Some(ref encoding) = overrides.output_encoding {
            self.output_encoding = encoding.clone();
        }
        if let Some(policy) = overrides.ragged_rows {
            self.ragged_rows = policy;
        }
        if let Some(extract) = overrides.extract_images {
            self.extract_images = extract;
        }
        if let Some(embed) = overrides.embed_images_base64 {
            self.embed_images_base64 = embed;
        }
        if let Some(limit) = overrides.max_file_size_mb {
            self.max_file_size_mb = limit;
        }
        if let Some(verify) = overrides.verify_roundtrip {
            self.verify_roundtrip = verify;
        }
        if let Some(dry_run) = overrides.dry_run {
            self.dry_run = dry_run;
        }
        if let Some(ref level) = overrides.log_level {
            self.log_level = level.clone();
        }
        self
    }

    /// Serializer options for this configuration.
    pub fn serialize_options(&self) -> SerializeOptions {
        SerializeOptions::new()
            .with_heading_offset(self.heading_offset)
            .with_metadata(self.include_metadata)
            .with_table_style(self.table_style)
            .with_ragged_rows(self.ragged_rows)
    }
}

/// Values given on the command line; `None` keeps the configured value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub heading_offset: Option<i32>,
    pub include_metadata: Option<bool>,
    pub validate_output: Option<bool>,
    pub output_encoding: Option<String>,
    pub ragged_rows: Option<RaggedRows>,
    pub extract_images: Option<bool>,
    pub embed_images_base64: Option<bool>,
    pub max_file_size_mb: Option<u64>,
    pub verify_roundtrip: Option<bool>,
    pub dry_run: Option<bool>,
    pub log_level: Option<String>,
}
