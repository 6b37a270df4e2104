//! html-epub - Package HTML documents as an EPUB 3 book

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::{DateTime, Utc};
use clap::Parser;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use html_epub::{Book, Contributor, EpubBuilder, HtmlItem, ResourceRoot};

#[derive(Parser)]
#[command(name = "html-epub")]
#[command(version, about = "Package HTML documents as an EPUB 3 book", long_about = None)]
#[command(after_help = "EXAMPLES:
    html-epub -o book.epub --title \"My Book\" ch1.html ch2.html
    html-epub -o book.epub --metadata book.json -r https://example.com/assets/ ch1.html
    html-epub -o book.epub --title T --contributor \"Ann Editor:edt\" ch1.html
    html-epub -o - --title T ch1.html | ssh host 'cat > book.epub'")]
struct Cli {
    /// HTML documents, in reading order
    #[arg(value_name = "INPUT", required = true)]
    inputs: Vec<PathBuf>,

    /// Output EPUB file, or `-` for stdout
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    /// Directory or URL all images and stylesheets must resolve under
    /// [default: the first input's directory]
    #[arg(short, long, value_name = "DIR|URL")]
    resource_root: Option<String>,

    /// JSON file with book metadata; flags override its fields
    #[arg(short, long, value_name = "FILE")]
    metadata: Option<PathBuf>,

    /// Book title
    #[arg(long)]
    title: Option<String>,

    /// Unique book identifier [default: a random urn:uuid]
    #[arg(long)]
    identifier: Option<String>,

    /// Book language tag [default: en-US]
    #[arg(long)]
    language: Option<String>,

    /// Last-modified timestamp (RFC 3339) [default: now]
    #[arg(long)]
    updated: Option<String>,

    /// License URL
    #[arg(long)]
    license: Option<String>,

    /// Contributor as NAME or NAME:ROLE (MARC relator code); repeatable
    #[arg(long = "contributor", value_name = "NAME[:ROLE]")]
    contributors: Vec<String>,

    /// Suppress output messages
    #[arg(short, long)]
    quiet: bool,
}

/// Book metadata as read from `--metadata`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MetadataFile {
    identifier: Option<String>,
    title: Option<String>,
    language: Option<String>,
    updated: Option<String>,
    #[serde(alias = "licenseURL")]
    license_url: Option<String>,
    #[serde(default)]
    contributors: Vec<ContributorEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ContributorEntry {
    Name(String),
    Full { name: String, role: Option<String> },
}

impl From<ContributorEntry> for Contributor {
    fn from(entry: ContributorEntry) -> Self {
        match entry {
            ContributorEntry::Name(name) => Contributor::new(name),
            ContributorEntry::Full { name, role } => Contributor {
                name,
                role: role.filter(|r| !r.is_empty()),
            },
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.quiet);

    match convert(&cli) {
        Ok(summary) => {
            // Keep stdout clean when the archive itself goes there
            if !cli.quiet && writes_stdout(&cli.output) {
                eprintln!("{summary}");
            } else if !cli.quiet {
                println!("{summary}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(quiet: bool) {
    let default = if quiet { "error" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn convert(cli: &Cli) -> Result<String, String> {
    let book = build_book(cli)?;

    let root = match &cli.resource_root {
        Some(root) => ResourceRoot::parse(root),
        None => ResourceRoot::from_dir(default_root(&cli.inputs[0])),
    }
    .map_err(|e| e.to_string())?;

    let items = cli
        .inputs
        .iter()
        .map(|path| {
            fs::read(path)
                .map(HtmlItem::new)
                .map_err(|e| format!("{}: {e}", path.display()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut builder = EpubBuilder::new(book, root);
    builder.load(items).map_err(|e| e.to_string())?;
    if writes_stdout(&cli.output) {
        let mut out = BufWriter::new(io::stdout().lock());
        builder.write_stream(&mut out).map_err(|e| e.to_string())?;
        out.flush().map_err(|e| format!("stdout: {e}"))?;
    } else {
        builder
            .write_epub_file(&cli.output)
            .map_err(|e| e.to_string())?;
    }

    Ok(format!(
        "Wrote {} ({} documents, {} resources)",
        if writes_stdout(&cli.output) {
            "EPUB to stdout".to_string()
        } else {
            cli.output.display().to_string()
        },
        builder.documents().len(),
        builder.resources().len()
    ))
}

fn build_book(cli: &Cli) -> Result<Book, String> {
    let file = match &cli.metadata {
        Some(path) => {
            let json = fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?;
            serde_json::from_str::<MetadataFile>(&json)
                .map_err(|e| format!("{}: {e}", path.display()))?
        }
        None => MetadataFile::default(),
    };

    let title = cli
        .title
        .clone()
        .or(file.title)
        .ok_or("a book title is required (--title or \"title\" in --metadata)")?;
    let identifier = cli
        .identifier
        .clone()
        .or(file.identifier)
        .unwrap_or_else(|| format!("urn:uuid:{}", uuid::Uuid::new_v4()));

    let mut book = Book::new(identifier, title);
    if let Some(language) = cli.language.clone().or(file.language) {
        book = book.with_language(language);
    }
    if let Some(updated) = cli.updated.as_deref().or(file.updated.as_deref()) {
        book = book.with_updated(parse_timestamp(updated)?);
    }
    if let Some(license) = cli.license.clone().or(file.license_url) {
        book = book.with_license_url(license);
    }

    // Contributors given on the command line replace those in the file
    let contributors: Vec<Contributor> = if cli.contributors.is_empty() {
        file.contributors.into_iter().map(Contributor::from).collect()
    } else {
        cli.contributors.iter().map(|c| parse_contributor(c)).collect()
    };
    for contributor in contributors {
        book = book.with_contributor(contributor);
    }

    Ok(book)
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("invalid timestamp `{value}`: {e}"))
}

fn parse_contributor(value: &str) -> Contributor {
    match value.rsplit_once(':') {
        Some((name, role)) if !name.is_empty() && !role.is_empty() => {
            Contributor::new(name).with_role(role)
        }
        _ => Contributor::new(value),
    }
}

fn writes_stdout(output: &Path) -> bool {
    output.as_os_str() == "-"
}

fn default_root(input: &Path) -> PathBuf {
    match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
