//! doc2md CLI - document to Markdown conversion tool

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use doc2md::{
    ConfigOverrides, ConversionConfig, Converter, FileConversion, JsonFormat, OutputWriter,
    RaggedRows, Severity, ValidationResult,
};

#[derive(Parser)]
#[command(name = "doc2md")]
#[command(author = "doc2md contributors")]
#[command(version)]
#[command(about = "Convert documents to validated Markdown", long_about = None)]
struct Cli {
    /// Input file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output directory
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Show debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert one or more documents to Markdown
    Convert {
        /// Input files
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// YAML configuration file
        #[arg(short, long, value_name = "FILE", env = "DOC2MD_CONFIG")]
        config: Option<PathBuf>,

        /// Added to every heading level (result clamped to 1-6)
        #[arg(long, allow_negative_numbers = true)]
        heading_offset: Option<i32>,

        /// Include YAML front matter with document metadata
        #[arg(short, long)]
        metadata: bool,

        /// Skip Markdown validation
        #[arg(long)]
        no_validate: bool,

        /// Output encoding (utf-8, utf-8-sig, ascii, latin-1)
        #[arg(long, value_name = "ENCODING")]
        encoding: Option<String>,

        /// Handling of table rows whose width differs from the header
        #[arg(long, value_enum)]
        ragged_rows: Option<RaggedMode>,

        /// Inline images as base64 data URLs instead of writing files
        #[arg(long)]
        embed_images_base64: bool,

        /// Reject inputs larger than this many MiB
        #[arg(long, value_name = "MB")]
        max_file_size: Option<u64>,

        /// Report output paths without writing files
        #[arg(long)]
        dry_run: bool,

        /// Re-parse the Markdown and compare it with the document
        #[arg(long)]
        roundtrip: bool,

        /// Print Markdown to stdout instead of writing files (single input)
        #[arg(long, conflicts_with = "output")]
        stdout: bool,
    },

    /// Pretty print a Markdown file
    #[command(alias = "fmt")]
    Format {
        /// Markdown file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Exit with status 1 if the file is not already formatted
        #[arg(long, conflicts_with = "output")]
        check: bool,
    },

    /// Validate a Markdown file
    Validate {
        /// Markdown file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show document structure statistics
    Info {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Dump the document model as JSON
    Json {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum RaggedMode {
    /// Pad or truncate rows to the header width (default)
    Normalize,
    /// Emit rows as they are; the validator reports the mismatch
    Preserve,
}

impl From<RaggedMode> for RaggedRows {
    fn from(mode: RaggedMode) -> Self {
        match mode {
            RaggedMode::Preserve => RaggedRows::Preserve,
            RaggedMode::Normalize => RaggedRows::Normalize,
        }
    }
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn main() {
    let cli = Cli::parse();
    let logging = Logging {
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    let result = match cli.command {
        Some(Commands::Convert {
            inputs,
            output,
            config,
            heading_offset,
            metadata,
            no_validate,
            encoding,
            ragged_rows,
            embed_images_base64,
            max_file_size,
            dry_run,
            roundtrip,
            stdout,
        }) => {
            let overrides = ConfigOverrides {
                heading_offset,
                include_metadata: metadata.then_some(true),
                validate_output: no_validate.then_some(false),
                output_encoding: encoding,
                ragged_rows: ragged_rows.map(Into::into),
                embed_images_base64: embed_images_base64.then_some(true),
                max_file_size_mb: max_file_size,
                dry_run: dry_run.then_some(true),
                verify_roundtrip: roundtrip.then_some(true),
                ..Default::default()
            };
            cmd_convert(
                &inputs,
                output.as_deref(),
                config.as_deref(),
                &overrides,
                stdout,
                logging,
            )
        }
        Some(Commands::Format {
            input,
            output,
            check,
        }) => {
            logging.init(None);
            cmd_format(&input, output.as_deref(), check)
        }
        Some(Commands::Validate { input, json }) => {
            logging.init(None);
            cmd_validate(&input, json)
        }
        Some(Commands::Info { input, json }) => {
            logging.init(None);
            cmd_info(&input, json)
        }
        Some(Commands::Json {
            input,
            output,
            compact,
        }) => {
            logging.init(None);
            cmd_json(&input, output.as_deref(), compact)
        }
        Some(Commands::Version) => {
            cmd_version();
            Ok(true)
        }
        None => {
            // Default behavior: convert if input is provided
            if let Some(input) = cli.input {
                cmd_convert(
                    &[input],
                    cli.output.as_deref(),
                    None,
                    &ConfigOverrides::default(),
                    false,
                    logging,
                )
            } else {
                println!("{}", "Usage: doc2md <FILE> [OUTPUT]".yellow());
                println!("       doc2md --help for more information");
                Ok(true)
            }
        }
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            std::process::exit(2);
        }
    }
}

#[derive(Clone, Copy)]
struct Logging {
    verbose: bool,
    quiet: bool,
}

impl Logging {
    /// `RUST_LOG` wins; otherwise the flags, then the configured level.
    fn init(self, configured: Option<&str>) {
        let level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            configured.unwrap_or("warn")
        };
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
            .try_init();
    }
}

fn load_config(path: Option<&Path>, overrides: &ConfigOverrides) -> CliResult<ConversionConfig> {
    let base = match path {
        Some(path) => ConversionConfig::from_file(path)?,
        None => ConversionConfig::default(),
    };
    let config = base.apply(overrides);
    config.validate()?;
    Ok(config)
}

fn cmd_convert(
    inputs: &[PathBuf],
    output: Option<&Path>,
    config_path: Option<&Path>,
    overrides: &ConfigOverrides,
    stdout: bool,
    logging: Logging,
) -> CliResult<bool> {
    let config = load_config(config_path, overrides)?;
    logging.init(Some(&config.log_level));
    log::debug!("Configuration: {:?}", config);

    let writer = OutputWriter::new(output.unwrap_or_else(|| Path::new(".")))
        .with_encoding(config.encoding()?)
        .with_dry_run(config.dry_run);
    let dry_run = config.dry_run;
    let converter = Converter::new(config);

    if stdout {
        let [input] = inputs else {
            return Err("--stdout takes exactly one input file".into());
        };
        let outcome = converter.convert_file(input)?;
        print!("{}", outcome.markdown);
        std::io::stdout().flush()?;
        print_issues(&outcome.validation, true);
        return Ok(outcome.is_valid());
    }

    let results = if inputs.len() == 1 {
        vec![converter.convert_file_to(&inputs[0], &writer)]
    } else {
        convert_with_progress(&converter, inputs, &writer)?
    };

    let mut failed = 0;
    let mut invalid = 0;
    println!();
    for (input, result) in inputs.iter().zip(&results) {
        match result {
            Ok(converted) => {
                if !converted.outcome.is_valid() {
                    invalid += 1;
                }
                print_conversion(converted, dry_run);
            }
            Err(e) => {
                failed += 1;
                println!("{} {}: {}", "✗".red(), input.display(), e);
            }
        }
    }

    println!();
    let converted = results.len() - failed;
    let summary = format!(
        "{} converted, {} failed, {} with validation errors",
        converted, failed, invalid
    );
    if failed == 0 {
        println!("{} {}", "Done!".green().bold(), summary);
    } else {
        println!("{} {}", "Finished with errors:".yellow().bold(), summary);
    }

    Ok(failed == 0)
}

fn convert_with_progress(
    converter: &Converter,
    inputs: &[PathBuf],
    writer: &OutputWriter,
) -> CliResult<Vec<doc2md::Result<FileConversion>>> {
    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let (tx, rx) = crossbeam_channel::unbounded();
    let results = std::thread::scope(|scope| {
        let worker = scope.spawn(move || converter.convert_batch_with_progress(inputs, writer, &tx));
        for progress in rx.iter() {
            let name = progress
                .path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            pb.set_message(name);
            pb.inc(1);
        }
        worker.join()
    })
    .map_err(|_| "batch conversion panicked")?;

    pb.finish_with_message("done");
    Ok(results)
}

fn print_conversion(converted: &FileConversion, dry_run: bool) {
    let outcome = &converted.outcome;
    let mark = if outcome.is_valid() {
        "✓".green()
    } else {
        "!".yellow()
    };
    let verb = if dry_run { "would write" } else { "→" };
    println!(
        "{} {} {} {} ({:.2?})",
        mark,
        converted.source.display(),
        verb.dimmed(),
        converted.output.display(),
        outcome.duration
    );
    for path in converted.written.iter().skip(1) {
        println!("    {} {}", "└─".dimmed(), path.display());
    }
    print_issues(&outcome.validation, false);
    if let Some(ref report) = outcome.roundtrip {
        if !report.equivalent {
            println!(
                "    {} round trip lost {} text blocks",
                "warning:".yellow(),
                report.missing.len()
            );
        }
    }
}

fn print_issues(result: &ValidationResult, to_stderr: bool) {
    for issue in &result.issues {
        let label = match issue.severity {
            Severity::Error => "error".red().bold(),
            Severity::Warning => "warning".yellow(),
            Severity::Info => "info".cyan(),
        };
        let line = format!("    {}: line {}: {}", label, issue.line, issue.message);
        if to_stderr {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }
}

fn cmd_format(input: &Path, output: Option<&Path>, check: bool) -> CliResult<bool> {
    let markup = fs::read_to_string(input)?;
    let formatted = doc2md::format(&markup);

    if check {
        if formatted == markup {
            println!("{} {}", "Formatted".green(), input.display());
            return Ok(true);
        }
        println!("{} {}", "Would reformat".yellow(), input.display());
        return Ok(false);
    }

    if let Some(path) = output {
        fs::write(path, &formatted)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        print!("{}", formatted);
    }

    Ok(true)
}

fn cmd_validate(input: &Path, json: bool) -> CliResult<bool> {
    let markup = fs::read_to_string(input)?;
    let result = doc2md::validate(&markup);

    if json {
        println!("{}", doc2md::render::to_json(&result, JsonFormat::Pretty)?);
        return Ok(result.valid);
    }

    if result.issues.is_empty() {
        println!("{} {}", "Valid".green().bold(), input.display());
        return Ok(true);
    }

    println!("{}", result.report());
    if result.valid {
        println!("{} {}", "Valid".green().bold(), input.display());
    } else {
        println!("{} {}", "Invalid".red().bold(), input.display());
    }
    Ok(result.valid)
}

fn cmd_info(input: &Path, json: bool) -> CliResult<bool> {
    let doc = doc2md::parse_file(input)?;
    let rendered = doc2md::render::to_markdown_with_stats(&doc, &Default::default());
    let stats = &rendered.stats;

    if json {
        let value = serde_json::json!({
            "file": input.display().to_string(),
            "metadata": doc.metadata,
            "stats": stats,
            "markdown_bytes": rendered.content_len(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(true);
    }

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    if let Some(ref format) = doc.metadata.source_format {
        println!("{}: {}", "Format".bold(), format);
    }
    if let Some(ref title) = doc.metadata.title {
        println!("{}: {}", "Title".bold(), title);
    }
    if let Some(ref author) = doc.metadata.author {
        println!("{}: {}", "Author".bold(), author);
    }
    if let Some(pages) = doc.metadata.page_count {
        println!("{}: {}", "Pages".bold(), pages);
    }
    if let Some(sheets) = doc.metadata.sheet_count {
        println!("{}: {}", "Sheets".bold(), sheets);
    }
    if let Some(ref created) = doc.metadata.created {
        println!("{}: {}", "Created".bold(), created);
    }
    if let Some(ref modified) = doc.metadata.modified {
        println!("{}: {}", "Modified".bold(), modified);
    }

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Sections".bold(), stats.section_count);
    println!("{}: {}", "Headings".bold(), stats.heading_count);
    println!("{}: {}", "Paragraphs".bold(), stats.paragraph_count);
    println!("{}: {}", "Tables".bold(), stats.table_count);
    println!(
        "{}: {} ({} items)",
        "Lists".bold(),
        stats.list_count,
        stats.list_item_count
    );
    println!(
        "{}: {} ({} missing)",
        "Images".bold(),
        stats.image_count,
        stats.missing_image_count
    );
    println!("{}: {}", "Diagrams".bold(), stats.diagram_count);
    println!("{}: {}", "Code blocks".bold(), stats.code_block_count);
    println!("{}: {}", "Words".bold(), stats.word_count);
    println!("{}: {}", "Characters".bold(), stats.char_count);

    Ok(true)
}

fn cmd_json(input: &Path, output: Option<&Path>, compact: bool) -> CliResult<bool> {
    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = doc2md::to_json(input, format)?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(true)
}

fn cmd_version() {
    println!("{} {}", "doc2md".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Document to Markdown conversion tool");
    println!();
    println!("Repository: {}", "https://github.com/doc2md/doc2md".dimmed());
    println!("License: MIT");
}
