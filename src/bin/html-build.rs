//! html-build: build sanitized HTML from YAML/JSON node descriptions.
//!
//! Run with: cargo run --bin html-build -- page.yaml

use clap::Parser;
use nulltrace_html::{
    save_html, to_html, AttributeMap, BuildConfig, CollectingSink, HtmlCatalog, HtmlError,
    NodeBuilder, WarningSink,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

/// Build sanitized HTML from YAML or JSON node descriptions
#[derive(Parser, Debug)]
#[command(name = "html-build")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print the HTML for one file
    html-build page.yaml

    # Check several files, failing on any sanitization warning
    html-build --strict demos/*.yaml

    # Resolve attributes through a named attribute map
    html-build --attrs-map attrs.yaml demos/attrs-map.yaml
"#)]
struct Cli {
    /// Node description files (YAML or JSON)
    #[arg(value_name = "FILE", required = true)]
    files: Vec<PathBuf>,

    /// Write output here instead of stdout (a directory when several files are given)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Maximum nesting depth (overrides --config)
    #[arg(long, value_name = "N")]
    max_depth: Option<usize>,

    /// Build settings file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Attribute map table used for `attrs_map_identifier` lookups
    #[arg(long, value_name = "FILE")]
    attrs_map: Option<PathBuf>,

    /// Treat sanitization warnings as failures
    #[arg(long)]
    strict: bool,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("✗ invalid settings:");
            print_error(&e);
            process::exit(1);
        }
    };

    let attrs_map = match cli.attrs_map.as_deref().map(load_attrs_map).transpose() {
        Ok(map) => map,
        Err(e) => {
            eprintln!("✗ invalid attribute map:");
            print_error(&e);
            process::exit(1);
        }
    };

    let mut builder = NodeBuilder::new(&HtmlCatalog).with_config(config);
    if let Some(map) = &attrs_map {
        builder = builder.with_resolver(map);
    }

    let mut exit_code = 0;
    for file_path in &cli.files {
        let mut sink = CollectingSink::new();
        match build_file(&builder, file_path, &mut sink) {
            Ok(html) => {
                for warning in &sink.warnings {
                    tracing::warn!(file = %file_path.display(), tag = warning.tag(), "{}", warning);
                }
                if cli.strict && !sink.is_empty() {
                    eprintln!("✗ {} produced {} warning(s)", file_path.display(), sink.len());
                    exit_code = 1;
                    continue;
                }
                if let Err(e) = emit(&cli, file_path, &html) {
                    eprintln!("✗ {} could not be written:", file_path.display());
                    print_error(&e);
                    exit_code = 1;
                    continue;
                }
                eprintln!("✓ {} built", file_path.display());
            }
            Err(e) => {
                eprintln!("✗ {} has errors:", file_path.display());
                print_error(&e);
                exit_code = 1;
            }
        }
    }

    process::exit(exit_code);
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<BuildConfig, HtmlError> {
    let mut config = match &cli.config {
        Some(path) => BuildConfig::from_yaml(&fs::read_to_string(path)?)?,
        None => BuildConfig::default(),
    };
    if let Some(max_depth) = cli.max_depth {
        config = config.with_max_depth(max_depth);
    }
    Ok(config)
}

fn load_attrs_map(path: &Path) -> Result<AttributeMap, HtmlError> {
    AttributeMap::from_yaml(&fs::read_to_string(path)?)
}

fn build_file(builder: &NodeBuilder<'_>, path: &Path, sink: &mut dyn WarningSink) -> Result<String, HtmlError> {
    let content = fs::read_to_string(path)?;
    let node = builder.parse_with_sink(&content, sink)?;
    Ok(to_html(&node))
}

fn emit(cli: &Cli, input: &Path, html: &str) -> Result<(), HtmlError> {
    match &cli.output {
        None => {
            println!("{}", html);
            Ok(())
        }
        Some(output) if cli.files.len() == 1 => save_html(html, output),
        Some(dir) => {
            fs::create_dir_all(dir)?;
            let stem = input.file_stem().unwrap_or(input.as_os_str());
            save_html(html, dir.join(stem).with_extension("html"))
        }
    }
}

fn print_error(error: &HtmlError) {
    match error {
        HtmlError::RecursionLimitExceeded { max_depth } => {
            eprintln!("  Maximum recursion depth ({}) exceeded", max_depth);
            eprintln!("    Nodes are nested too deeply");
        }
        HtmlError::InvalidTagName { tag } => {
            eprintln!("  Invalid tag name '{}':", tag);
            eprintln!("    Only lowercase letters, digits and hyphens are allowed");
        }
        HtmlError::UnsupportedTag { tag } => {
            eprintln!("  Unsupported tag '{}'", tag);
        }
        HtmlError::InvalidInputType { field, expected, found } => {
            eprintln!("  Invalid type for '{}':", field);
            eprintln!("    Expected {}, got {}", expected, found);
        }
        HtmlError::Yaml(msg) => {
            eprintln!("  YAML error:");
            eprintln!("    {}", msg);
        }
        HtmlError::Io(msg) => {
            eprintln!("  I/O error:");
            eprintln!("    {}", msg);
        }
        e => {
            eprintln!("  {}", e);
        }
    }
}
