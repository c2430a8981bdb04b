//! docnorm CLI - document normalization tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;

use docnorm::render::to_json;
use docnorm::{
    correct_mime_type, mime_for_extension, ConvertOptions, ConverterRegistry, Envelope, JsonFormat,
};

#[derive(Parser)]
#[command(name = "docnorm")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Normalize documents into paginated text JSON", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a document and print the response envelope
    Parse {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Declared MIME type (inferred from the extension if omitted)
        #[arg(short, long)]
        mime: Option<String>,

        /// Lines per page for line-batched formats
        #[arg(short, long, env = "DOCNORM_LINES_PER_PAGE")]
        lines_per_page: Option<usize>,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Include the error chain in failure envelopes
        #[arg(long, env = "DOCNORM_DEV")]
        dev: bool,
    },

    /// List recognized MIME types
    Formats,

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Parse {
            input,
            mime,
            lines_per_page,
            output,
            compact,
            dev,
        }) => cmd_parse(
            &input,
            mime.as_deref(),
            lines_per_page,
            output.as_deref(),
            compact,
            dev,
        ),
        Some(Commands::Formats) => {
            cmd_formats();
            Ok(true)
        }
        Some(Commands::Version) => {
            cmd_version();
            Ok(true)
        }
        None => {
            println!("{}", "Usage: docnorm parse <FILE> [--mime TYPE]".yellow());
            println!("       docnorm --help for more information");
            Ok(true)
        }
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(2),
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

/// Resolve the MIME type the pipeline receives, as the upload layer would.
fn resolve_mime(input: &Path, declared: Option<&str>) -> Result<String, Box<dyn std::error::Error>> {
    match declared {
        Some(mime) => Ok(correct_mime_type(input, mime).to_string()),
        None => input
            .extension()
            .and_then(|e| e.to_str())
            .and_then(mime_for_extension)
            .map(str::to_string)
            .ok_or_else(|| {
                format!(
                    "cannot infer a MIME type for {}; pass --mime",
                    input.display()
                )
                .into()
            }),
    }
}

/// Returns whether the document was normalized successfully.
fn cmd_parse(
    input: &Path,
    mime: Option<&str>,
    lines_per_page: Option<usize>,
    output: Option<&Path>,
    compact: bool,
    dev: bool,
) -> Result<bool, Box<dyn std::error::Error>> {
    let mime = resolve_mime(input, mime)?;
    log::debug!("{} declared as {}", input.display(), mime);

    let mut options = ConvertOptions::new();
    if let Some(lines) = lines_per_page {
        options = options.with_lines_per_page(lines);
    }

    let result = ConverterRegistry::with_defaults().normalize(input, &mime, &options);
    if let Err(e) = &result {
        log::warn!("{}: {}", input.display(), e);
    }
    let envelope = Envelope::from_result(result, dev);

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let json = to_json(&envelope, format)?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(envelope.success)
}

fn cmd_formats() {
    println!("{}", "Recognized MIME types".cyan().bold());
    for mime in ConverterRegistry::with_defaults().supported_mime_types() {
        println!("  {}", mime);
    }
}

fn cmd_version() {
    println!("{} {}", "docnorm".cyan().bold(), env!("CARGO_PKG_VERSION"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_mime_from_extension() {
        let mime = resolve_mime(Path::new("a/123_notes.md"), None).unwrap();
        assert_eq!(mime, "text/markdown");
        assert!(resolve_mime(Path::new("archive.tar"), None).is_err());
    }

    #[test]
    fn test_resolve_mime_corrects_octet_stream() {
        let mime = resolve_mime(Path::new("readme.md"), Some("application/octet-stream")).unwrap();
        assert_eq!(mime, "text/markdown");
        let mime = resolve_mime(Path::new("data.bin"), Some("application/octet-stream")).unwrap();
        assert_eq!(mime, "application/octet-stream");
    }

    #[test]
    fn test_parse_writes_envelope() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("1700000000_notes.txt");
        fs::write(&input, "one\ntwo\n").unwrap();
        let output = dir.path().join("out.json");

        let ok = cmd_parse(&input, None, Some(1), Some(&output), true, false).unwrap();
        assert!(ok);

        let json = fs::read_to_string(&output).unwrap();
        let envelope: Envelope = serde_json::from_str(&json).unwrap();
        assert_eq!(envelope.code, 200);
        let data = envelope.data.unwrap();
        assert_eq!(data.file_name.as_deref(), Some("notes.txt"));
        assert_eq!(data.pages.len(), 2);
    }

    #[test]
    fn test_parse_failure_envelope() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("image.png");
        fs::write(&input, [0u8; 4]).unwrap();
        let output = dir.path().join("out.json");

        let ok = cmd_parse(&input, Some("image/png"), None, Some(&output), false, true).unwrap();
        assert!(!ok);

        let envelope: Envelope = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(envelope.code, 415);
        assert!(!envelope.success);
        assert!(envelope.stack.is_some());
    }
}
