// ABOUTME: CLI for previewing link metadata and enriching bookmark blocks with notionpresso-client.
// ABOUTME: Prints JSON: a single preview, or the enriched block tree read from a file or stdin.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use notionpresso_client::{
    preprocessor, stock, Block, BlockProcessor, BookmarkFieldKey, HttpFetcher, Options,
};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

/// Preview bookmark metadata and enrich Notion block trees.
#[derive(Parser, Debug)]
#[command(name = "notionpresso")]
#[command(about = "Fetch link previews and enrich Notion bookmark blocks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// HTML fetch timeout in seconds
    #[arg(long, global = true, default_value_t = 10)]
    timeout: u64,

    /// User-Agent sent when fetching pages
    #[arg(long, global = true)]
    user_agent: Option<String>,

    /// Output compact JSON instead of pretty.
    #[arg(long, global = true, default_value_t = false)]
    compact: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the title, description, image and favicon of a page
    Preview {
        /// Page URL (http/https)
        url: String,

        #[command(flatten)]
        transforms: Transforms,
    },

    /// Enrich every bookmark block in a JSON array of blocks
    Enrich {
        /// JSON file holding an array of blocks. Use "-" for stdin.
        input: String,

        /// Maximum number of sibling blocks processed at once
        #[arg(long)]
        max_concurrency: Option<usize>,

        #[command(flatten)]
        transforms: Transforms,
    },
}

#[derive(Args, Debug)]
struct Transforms {
    /// Trim whitespace from titles and descriptions
    #[arg(long)]
    trim: bool,

    /// Lowercase titles
    #[arg(long)]
    lowercase_title: bool,

    /// Cut descriptions to at most N characters
    #[arg(long, value_name = "N")]
    truncate_description: Option<usize>,
}

impl Transforms {
    fn register(&self, processor: &mut BlockProcessor) {
        let trim = self.trim;
        match (trim, self.lowercase_title) {
            (true, true) => processor.register_preprocessor(
                BookmarkFieldKey::Title,
                preprocessor(|v| v.trim().to_lowercase()),
            ),
            (true, false) => processor.register_preprocessor(BookmarkFieldKey::Title, stock::trim()),
            (false, true) => {
                processor.register_preprocessor(BookmarkFieldKey::Title, stock::normalize())
            }
            (false, false) => {}
        }

        match (trim, self.truncate_description) {
            (true, Some(n)) => processor.register_preprocessor(
                BookmarkFieldKey::Description,
                preprocessor(move |v| v.trim().chars().take(n).collect()),
            ),
            (true, None) => {
                processor.register_preprocessor(BookmarkFieldKey::Description, stock::trim())
            }
            (false, Some(n)) => {
                processor.register_preprocessor(BookmarkFieldKey::Description, stock::truncate(n))
            }
            (false, None) => {}
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut opts = Options {
        timeout: Duration::from_secs(cli.timeout),
        ..Options::default()
    };
    if let Some(ua) = &cli.user_agent {
        opts.user_agent = ua.clone();
    }

    let output = match &cli.command {
        Command::Preview { url, transforms } => {
            let processor = build_processor(&opts, transforms)?;
            let metadata = processor.preview(url).await?;
            serde_json::to_value(metadata)?
        }
        Command::Enrich {
            input,
            max_concurrency,
            transforms,
        } => {
            opts.max_concurrency = max_concurrency.map(|n| n.max(1));
            let processor = build_processor(&opts, transforms)?;
            let blocks = load_blocks(input)?;
            let enriched = processor.enrich_tree(blocks).await?;
            serde_json::to_value(enriched)?
        }
    };

    print_json(&output, cli.compact)
}

fn build_processor(opts: &Options, transforms: &Transforms) -> Result<BlockProcessor> {
    let fetcher = HttpFetcher::new(opts)?;
    let mut processor = BlockProcessor::new(Arc::new(fetcher), opts);
    transforms.register(&mut processor);
    Ok(processor)
}

fn load_blocks(input: &str) -> Result<Vec<Block>> {
    let raw = if input == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        let path = PathBuf::from(input);
        fs::read_to_string(&path).with_context(|| format!("failed to read {}", path.display()))?
    };
    serde_json::from_str(&raw).context("input must be a JSON array of blocks")
}

fn print_json(value: &Value, compact: bool) -> Result<()> {
    if compact {
        println!("{}", serde_json::to_string(value)?);
    } else {
        println!("{}", serde_json::to_string_pretty(value)?);
    }
    Ok(())
}
