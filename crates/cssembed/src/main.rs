//! cssembed CLI - embed images referenced from CSS.
//!
//! Reads a stylesheet (file or stdin), replaces `url(...)` image
//! references with data URIs (or MHTML tokens with `--mhtml`), and writes
//! the result to a file or stdout. Diagnostics go to stderr.

mod error;
mod output;

use std::fs;
use std::io::{Read, Write};
use std::path::{PathBuf, MAIN_SEPARATOR};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cssembed_core::{EmbedOptions, Embedder, OutputMode, DEFAULT_MAX_URI_LENGTH};
use error::CliError;
use output::Output;

/// Embed images in CSS as data URIs or MHTML.
#[derive(Parser)]
#[command(name = "cssembed", version, about)]
struct Cli {
    /// Input CSS file. Reads stdin when omitted.
    input: Option<PathBuf>,

    /// Place the output into FILE. Defaults to stdout.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Prepend ROOT to all relative URLs. Defaults to the input file's
    /// directory; required when reading from stdin.
    #[arg(long, value_name = "ROOT")]
    root: Option<String>,

    /// Enable MHTML mode.
    #[arg(long)]
    mhtml: bool,

    /// Use ROOT as the MHTML root for the file.
    #[arg(long = "mhtmlroot", value_name = "ROOT")]
    mhtml_root: Option<String>,

    /// Place the MHTML output into FILE instead of prepending it to the
    /// CSS output. FILE's basename becomes the content-location root.
    #[arg(long = "mhtmlfile", value_name = "FILE")]
    mhtml_file: Option<PathBuf>,

    /// Don't fail on missing image files; keep their references as-is.
    #[arg(long)]
    skip_missing: bool,

    /// Maximum length for a data URI (0 = unlimited).
    #[arg(long, value_name = "LEN", default_value_t = DEFAULT_MAX_URI_LENGTH)]
    max_uri_length: usize,

    /// Maximum image size in bytes to convert (0 = unlimited).
    #[arg(long, value_name = "BYTES", default_value_t = 0)]
    max_image_size: u64,

    /// Display informational messages and warnings.
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(&cli) {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    if cli.mhtml && cli.mhtml_root.is_none() {
        return Err(CliError::Validation(
            "--mhtmlroot is required with --mhtml".to_owned(),
        ));
    }

    // Buffer the whole input up front so the output path may be the same
    // file as the input.
    let css = match &cli.input {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let root = resolve_root(cli)?;
    tracing::info!("using '{root}' as root for relative file paths");

    let options = EmbedOptions {
        mode: if cli.mhtml {
            OutputMode::Mhtml
        } else {
            OutputMode::DataUri
        },
        skip_missing: cli.skip_missing,
        max_uri_length: cli.max_uri_length,
        max_image_size: cli.max_image_size,
        mhtml_root: cli.mhtml_root.clone().unwrap_or_default(),
        // The MHTML file's basename overrides the CSS output's as the
        // content-location root.
        output_filename: cli
            .mhtml_file
            .as_deref()
            .or(cli.output.as_deref())
            .and_then(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
    };

    let outcome = Embedder::new(options).embed(&css, Some(&root))?;

    let mut text = String::with_capacity(outcome.css.len());
    if let Some(mhtml) = &outcome.mhtml {
        match &cli.mhtml_file {
            Some(path) => fs::write(path, mhtml)?,
            None => text.push_str(mhtml),
        }
    }
    text.push_str(&outcome.css);

    match &cli.output {
        Some(path) => fs::write(path, text)?,
        None => std::io::stdout().write_all(text.as_bytes())?,
    }

    Ok(())
}

/// Determine the root prefix for relative URLs, normalized to end with a
/// path separator.
fn resolve_root(cli: &Cli) -> Result<String, CliError> {
    let mut root = match (&cli.root, &cli.input) {
        (Some(root), _) => root.clone(),
        (None, Some(input)) => {
            let canonical = fs::canonicalize(input)?;
            canonical
                .parent()
                .map(|dir| dir.to_string_lossy().into_owned())
                .ok_or_else(|| {
                    CliError::Validation("cannot determine input file directory".to_owned())
                })?
        }
        (None, None) => {
            return Err(CliError::Validation(
                "--root is required when reading from stdin".to_owned(),
            ));
        }
    };

    if !root.ends_with(MAIN_SEPARATOR) && !root.ends_with('/') {
        root.push(MAIN_SEPARATOR);
    }
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cli_parses() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_explicit_root_normalized() {
        let cli = Cli::parse_from(["cssembed", "--root", "/assets"]);
        let root = resolve_root(&cli).unwrap();
        assert!(root.ends_with(MAIN_SEPARATOR) || root.ends_with('/'));
        assert!(root.starts_with("/assets"));
    }

    #[test]
    fn test_root_with_trailing_slash_unchanged() {
        let cli = Cli::parse_from(["cssembed", "--root", "http://example.com/assets/"]);
        assert_eq!(resolve_root(&cli).unwrap(), "http://example.com/assets/");
    }

    #[test]
    fn test_stdin_without_root_rejected() {
        let cli = Cli::parse_from(["cssembed"]);
        assert!(matches!(
            resolve_root(&cli),
            Err(CliError::Validation(_))
        ));
    }

    #[test]
    fn test_root_defaults_to_input_directory() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("style.css");
        fs::write(&input, "a {}").unwrap();

        let cli = Cli::parse_from(["cssembed", input.to_str().unwrap()]);
        let root = resolve_root(&cli).unwrap();
        assert!(root.ends_with(MAIN_SEPARATOR) || root.ends_with('/'));
    }

    #[test]
    fn test_mhtml_requires_mhtmlroot() {
        let cli = Cli::parse_from(["cssembed", "--mhtml", "--root", "/assets/"]);
        assert!(matches!(run(&cli), Err(CliError::Validation(_))));
    }

    #[test]
    fn test_end_to_end_file_rewrite() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("folder.png"), b"\x89PNGdata").unwrap();
        let input = dir.path().join("style.css");
        fs::write(&input, "background: url(folder.png);").unwrap();
        let out = dir.path().join("out.css");

        let cli = Cli::parse_from([
            "cssembed",
            input.to_str().unwrap(),
            "-o",
            out.to_str().unwrap(),
        ]);
        run(&cli).unwrap();

        let written = fs::read_to_string(&out).unwrap();
        assert!(written.starts_with("background: url(data:image/png;base64,"));
    }

    #[test]
    fn test_mhtml_split_output() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("folder.png"), b"\x89PNGdata").unwrap();
        let input = dir.path().join("style.css");
        fs::write(&input, "background: url(folder.png);").unwrap();
        let out = dir.path().join("out.css");
        let mhtml_out = dir.path().join("styles_ie.mhtml");

        let cli = Cli::parse_from([
            "cssembed",
            input.to_str().unwrap(),
            "-o",
            out.to_str().unwrap(),
            "--mhtml",
            "--mhtmlroot",
            "http://example.com/dir/",
            "--mhtmlfile",
            mhtml_out.to_str().unwrap(),
        ]);
        run(&cli).unwrap();

        // The MHTML file's basename, not the CSS output's, names the
        // content-location root, and the CSS stays envelope-free.
        let css = fs::read_to_string(&out).unwrap();
        assert_eq!(
            css,
            "background: url(mhtml:http://example.com/dir/styles_ie.mhtml!folder.png);"
        );

        let envelope = fs::read_to_string(&mhtml_out).unwrap();
        assert!(envelope.starts_with("/*\nContent-Type: multipart/related;"));
        assert!(envelope.contains("Content-Location:folder.png"));
    }

    #[test]
    fn test_mhtml_file_not_written_without_conversions() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("style.css");
        fs::write(&input, "background: url(folder.txt);").unwrap();
        let out = dir.path().join("out.css");
        let mhtml_out = dir.path().join("out.mhtml");

        let cli = Cli::parse_from([
            "cssembed",
            input.to_str().unwrap(),
            "-o",
            out.to_str().unwrap(),
            "--mhtml",
            "--mhtmlroot",
            "http://example.com/dir/",
            "--mhtmlfile",
            mhtml_out.to_str().unwrap(),
        ]);
        run(&cli).unwrap();

        assert_eq!(
            fs::read_to_string(&out).unwrap(),
            "background: url(folder.txt);"
        );
        assert!(!mhtml_out.exists());
    }

    #[test]
    fn test_rewrite_in_place() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("folder.png"), b"\x89PNGdata").unwrap();
        let file = dir.path().join("style.css");
        fs::write(&file, "background: url(folder.png);").unwrap();

        let cli = Cli::parse_from([
            "cssembed",
            file.to_str().unwrap(),
            "-o",
            file.to_str().unwrap(),
        ]);
        run(&cli).unwrap();

        let written = fs::read_to_string(&file).unwrap();
        assert!(written.contains("data:image/png;base64,"));
        assert!(!written.contains("url(folder.png)"));
    }
}
