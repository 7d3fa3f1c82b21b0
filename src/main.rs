//! schemadoc — generate documentation trees from API schema files.
//!
//! Two modes:
//!
//! - **stdin mode**: `schemadoc < api/tabs.json` prints the tree to stdout
//!   (a JSON list when the document holds several namespaces)
//! - **file mode**: `schemadoc -o out/ api/*.json` writes one
//!   `<namespace>.json` per namespace

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use schemadoc::{parser, Generator, Namespace, ReferenceResolver, SymbolIndex, TypeLinkResolver};
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "schemadoc",
    about = "Compile API schema files into documentation trees for templates"
)]
struct Cli {
    /// Schema files (glob patterns and directories supported). If omitted, reads from stdin.
    files: Vec<String>,

    /// Output directory (required when files are given)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// How reference tokens become links: `index` looks them up across all
    /// loaded namespaces, `simple` links every token to a type anchor.
    #[arg(long, value_enum, default_value_t = LinkMode::Index)]
    links: LinkMode,

    /// Write compact JSON instead of pretty-printed
    #[arg(long)]
    compact: bool,

    /// Increase log verbosity (-v, -vv, -vvv). RUST_LOG takes precedence.
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LinkMode {
    Index,
    Simple,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.files.is_empty() {
        return stdin_mode(&cli);
    }

    file_mode(&cli)
}

/// Log to stderr. Warnings are always shown; `-v` raises the level.
fn init_tracing(verbose: u8) {
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn".to_string(),
            1 => "info,schemadoc=info".to_string(),
            2 => "info,schemadoc=debug".to_string(),
            _ => "debug,schemadoc=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(verbose >= 2)
                .with_level(true)
                .with_file(verbose >= 3)
                .with_line_number(verbose >= 3)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

/// stdin mode: read one schema document, print its tree(s) to stdout.
fn stdin_mode(cli: &Cli) -> Result<()> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;

    let raws = parser::read_document(&input).context("failed to parse schema from stdin")?;
    let namespaces = raws
        .iter()
        .map(parser::load_namespace)
        .collect::<schemadoc::Result<Vec<_>>>()
        .context("invalid schema on stdin")?;

    let resolver = build_resolver(cli.links, namespaces.iter().flatten());
    let mut trees: Vec<Value> = namespaces
        .iter()
        .map(|ns| Generator::new(ns.as_ref(), &*resolver).generate())
        .collect();

    let output = match trees.len() {
        1 => trees.swap_remove(0),
        _ => Value::Array(trees),
    };
    println!("{}", to_json(&output, cli.compact)?);
    Ok(())
}

/// file mode: load every schema file, then write one tree per namespace.
fn file_mode(cli: &Cli) -> Result<()> {
    let output_dir = cli
        .output
        .as_deref()
        .context("--output is required when files are given")?;

    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory: {}", output_dir.display()))?;

    let input_files = collect_schema_files(&cli.files)?;

    // Load everything first so the symbol index sees every namespace.
    let mut loaded: Vec<(PathBuf, Option<Namespace>)> = Vec::new();
    for path in &input_files {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let raws = match parser::read_document(&content) {
            Ok(raws) => raws,
            Err(e) => {
                warn!("skipping {}: {}", path.display(), e);
                continue;
            }
        };
        for raw in &raws {
            let namespace = parser::load_namespace(raw)
                .with_context(|| format!("invalid schema in {}", path.display()))?;
            loaded.push((path.clone(), namespace));
        }
    }

    let resolver = build_resolver(cli.links, loaded.iter().filter_map(|(_, ns)| ns.as_ref()));

    let mut written: HashMap<&str, &Path> = HashMap::new();
    for (source, namespace) in &loaded {
        let Some(namespace) = namespace else {
            debug!(source = %source.display(), "namespace excluded by nodoc, nothing written");
            continue;
        };
        if let Some(first) = written.insert(namespace.name.as_str(), source.as_path()) {
            warn!(
                namespace = %namespace.name,
                first = %first.display(),
                second = %source.display(),
                "namespace declared more than once, later declaration overwrites"
            );
        }

        let tree = Generator::new(Some(namespace), &*resolver).generate();
        let out_path = output_dir.join(format!("{}.json", namespace.name));
        let mut text = to_json(&tree, cli.compact)?;
        text.push('\n');
        fs::write(&out_path, text)
            .with_context(|| format!("failed to write {}", out_path.display()))?;
        info!(namespace = %namespace.name, path = %out_path.display(), "wrote documentation tree");
    }

    Ok(())
}

fn build_resolver<'a, I>(mode: LinkMode, namespaces: I) -> Box<dyn ReferenceResolver>
where
    I: IntoIterator<Item = &'a Namespace>,
{
    match mode {
        LinkMode::Index => {
            let index = SymbolIndex::from_namespaces(namespaces);
            debug!(symbols = index.len(), "built symbol index");
            Box::new(index)
        }
        LinkMode::Simple => Box::new(TypeLinkResolver),
    }
}

fn to_json(value: &Value, compact: bool) -> Result<String> {
    let text = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    Ok(text)
}

const SCHEMA_EXTENSION: &str = "json";

fn is_schema_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(SCHEMA_EXTENSION))
}

/// Resolve command-line inputs to schema files, sorted and deduplicated.
///
/// A file is taken as-is, a directory contributes its top-level `*.json`
/// files, and anything else is treated as a glob pattern.
fn collect_schema_files(inputs: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = BTreeSet::new();
    for input in inputs {
        let path = Path::new(input);
        if path.is_file() {
            files.insert(path.to_path_buf());
        } else if path.is_dir() {
            let entries = fs::read_dir(path)
                .with_context(|| format!("failed to read directory: {}", path.display()))?;
            files.extend(
                entries
                    .filter_map(|entry| entry.ok().map(|e| e.path()))
                    .filter(|p| is_schema_file(p)),
            );
        } else {
            let matched: Vec<PathBuf> = glob::glob(input)
                .with_context(|| format!("invalid glob pattern: {}", input))?
                .filter_map(|r| r.ok())
                .filter(|p| p.is_file())
                .collect();
            if matched.is_empty() {
                warn!(pattern = %input, "no schema files matched");
            }
            files.extend(matched);
        }
    }
    Ok(files.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn directory_scan_keeps_json_only() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.json"), "{}").unwrap();
        fs::write(dir.path().join("a.json"), "{}").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();

        let files = collect_schema_files(&[dir.path().to_string_lossy().to_string()]).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, ["a.json", "b.json"]);
    }

    #[test]
    fn duplicate_patterns_dedup() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.json");
        fs::write(&file, "{}").unwrap();
        let pattern = file.to_string_lossy().to_string();

        let files = collect_schema_files(&[pattern.clone(), pattern]).unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn schema_extension_is_case_insensitive() {
        let dir = TempDir::new().unwrap();
        let upper = dir.path().join("API.JSON");
        let text = dir.path().join("api.txt");
        fs::write(&upper, "{}").unwrap();
        fs::write(&text, "").unwrap();

        assert!(is_schema_file(&upper));
        assert!(!is_schema_file(&text));
        assert!(!is_schema_file(dir.path()));
    }

    #[test]
    fn simple_links_ignore_index() {
        let ns = Namespace {
            name: "demo".into(),
            ..Default::default()
        };
        let resolver = build_resolver(LinkMode::Simple, [&ns]);
        assert_eq!(resolver.resolve("demo", "tabs.Tab").href, "tabs.html#type-Tab");
    }

    #[test]
    fn compact_output() {
        let value = serde_json::json!({ "a": 1 });
        assert_eq!(to_json(&value, true).unwrap(), r#"{"a":1}"#);
        assert!(to_json(&value, false).unwrap().contains('\n'));
    }
}
