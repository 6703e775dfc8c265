//! `json-sanitizer`: strip nulls, secrets and PII from a JSON file.
//!
//! ```text
//! json-sanitizer people.json --keyword internal --key mobileNumber,bloodGroup
//! json-sanitizer people.json --config sanitizer.toml --markdown
//! json-sanitizer people.json --interactive
//! ```
//!
//! The output (default `<input stem>_sanitized.json`) is rewritten after every
//! pass, so an interrupted run leaves the result of the last completed pass.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use dialoguer::{Confirm, Input, theme::ColorfulTheme};
use json_sanitizer::{
    DetectorVariant, KeyScope, KeySet, KeywordSet, SanitizerConfig, Session, store,
};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "json-sanitizer", version, about)]
struct Cli {
    /// JSON document to sanitize.
    input: PathBuf,

    /// Where to write the result [default: <input stem>_sanitized.json].
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// TOML configuration file. Flags override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// PII detector: auto, statistical or regex.
    #[arg(long)]
    detector: Option<DetectorVariant>,

    /// Base URL of a Presidio analyzer.
    #[arg(long)]
    presidio_url: Option<String>,

    /// Drop entries whose key or value contains this keyword (repeatable, comma separated).
    #[arg(short, long = "keyword", value_delimiter = ',')]
    keywords: Vec<String>,

    /// Drop entries with this key (repeatable, comma separated).
    #[arg(long = "key", value_delimiter = ',')]
    keys: Vec<String>,

    /// Skip PII redaction of string values.
    #[arg(long)]
    no_pii: bool,

    /// Keep entries whose key names look like secrets.
    #[arg(long)]
    no_sensitive_keys: bool,

    /// Only remove --key entries of top-level records.
    #[arg(long)]
    root_keys_only: bool,

    /// Also drop empty strings and empty arrays along with nulls.
    #[arg(long)]
    prune_empty: bool,

    /// Also write a Markdown rendering next to the output.
    #[arg(long)]
    markdown: bool,

    /// Prompt for keywords and keys after the automatic pass.
    #[arg(short, long)]
    interactive: bool,

    /// More log output (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn load_config(&self) -> Result<SanitizerConfig> {
        let mut config = match &self.config {
            Some(path) => SanitizerConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => SanitizerConfig::default(),
        };

        if let Some(variant) = self.detector {
            config.detector_variant = variant;
        }
        if let Some(url) = &self.presidio_url {
            config.presidio_url = Some(url.clone());
        }
        config.keywords.extend(self.keywords.iter().cloned());
        config.keys_to_remove.extend(self.keys.iter().cloned());
        if self.no_pii {
            config.apply_pii = false;
        }
        if self.no_sensitive_keys {
            config.sensitive_key_heuristic = false;
        }
        if self.root_keys_only {
            config.key_scope = KeyScope::RootOnly;
        }
        if self.prune_empty {
            config.prune_empty = true;
        }
        Ok(config)
    }

    fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| store::sibling_output_path(&self.input, "json"))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    run(&cli)
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.load_config()?;
    let output = cli.output_path();
    let tree = store::load_document(&cli.input)
        .with_context(|| format!("reading {}", cli.input.display()))?;

    let session = Session::from_config(&config);
    tracing::info!(detector = session.detector().name(), "session ready");

    let save = |tree: &Value| store::save_document(&output, tree);
    let tree = if cli.interactive {
        let tree = session.run(tree, &config.all_rounds(), save)?;
        prompt_rounds(&session, tree, &output)?
    } else {
        session.run(tree, &config.all_rounds(), save)?
    };

    if cli.markdown {
        let markdown = output.with_extension("md");
        store::save_markdown(&markdown, &tree)?;
        println!("Markdown written to {}", markdown.display());
    }
    println!("Sanitized JSON written to {}", output.display());
    Ok(())
}

/// Asks for keywords and keys until the user declines another round.
fn prompt_rounds(session: &Session, mut tree: Value, output: &Path) -> Result<Value> {
    let theme = ColorfulTheme::default();
    loop {
        let keywords: String = Input::with_theme(&theme)
            .with_prompt("Keywords to remove (comma separated, blank to skip)")
            .allow_empty(true)
            .interact_text()?;
        let keywords: KeywordSet = split_terms(&keywords).collect();
        if !keywords.is_empty() {
            tree = session.run_keyword_pass(tree, &keywords);
            store::save_document(output, &tree)?;
        }

        let keys: String = Input::with_theme(&theme)
            .with_prompt("Keys to remove (comma separated, blank to skip)")
            .allow_empty(true)
            .interact_text()?;
        let keys: KeySet = split_terms(&keys).collect();
        if !keys.is_empty() {
            tree = session.run_key_pass(tree, &keys);
            store::save_document(output, &tree)?;
        }

        let again = Confirm::with_theme(&theme)
            .with_prompt("Run another round?")
            .default(false)
            .interact()?;
        if !again {
            return Ok(tree);
        }
    }
}

fn split_terms(line: &str) -> impl Iterator<Item = &str> {
    line.split(',').map(str::trim).filter(|term| !term.is_empty())
}
