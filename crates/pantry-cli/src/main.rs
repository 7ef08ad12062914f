//! Pantry CLI - Browse a storefront catalog from the terminal

mod demo;

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use futures::future::join_all;
use pantry_browse::{
    BrowseConfig, CatalogSession, CatalogView, GrowthTrigger, RevealPhase, ViewStatus, PAGE_SIZE_OPTIONS,
};
use pantry_client::{ClientConfig, HttpCatalogClient, MemoryFetcher, PageFetcher, DEFAULT_API_URL};
use pantry_core::{CatalogItem, CatalogKind, ItemId};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Pantry CLI - storefront catalog browser
#[derive(Debug, Parser)]
#[command(name = "pantry")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Base URL of the catalog REST API
    #[arg(long, env = "PANTRY_API_URL", default_value = DEFAULT_API_URL, global = true)]
    api: String,

    /// Request timeout in seconds (none by default)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Serve the built-in sample catalog instead of calling the API
    #[arg(long, global = true)]
    demo: bool,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List a catalog page, optionally filtered and grown
    Browse(BrowseArgs),
    /// Show the top suggestions for a query
    Suggest(SuggestArgs),
    /// Fetch single items by id
    Item(ItemArgs),
}

#[derive(Debug, Args)]
struct BrowseArgs {
    /// Catalog to browse: food or drink
    kind: CatalogKind,

    /// Fuzzy search query
    #[arg(long, short)]
    query: Option<String>,

    /// Exact category to keep
    #[arg(long, short)]
    category: Option<String>,

    /// Items per page: 6, 12, 24 or 48
    #[arg(long, default_value_t = PAGE_SIZE_OPTIONS[0], value_parser = page_size_option)]
    page_size: u32,

    /// Growth steps to run after the first page
    #[arg(long, default_value_t = 0)]
    grow: usize,
}

#[derive(Debug, Args)]
struct SuggestArgs {
    kind: CatalogKind,
    query: String,

    /// Items per page loaded before suggesting
    #[arg(long, default_value_t = PAGE_SIZE_OPTIONS[3], value_parser = page_size_option)]
    page_size: u32,
}

#[derive(Debug, Args)]
struct ItemArgs {
    kind: CatalogKind,

    #[arg(required = true)]
    ids: Vec<String>,
}

/// Page sizes offered by the storefront selector
fn page_size_option(value: &str) -> std::result::Result<u32, String> {
    let size = value.parse::<u32>().map_err(|e| e.to_string())?;
    if PAGE_SIZE_OPTIONS.contains(&size) {
        Ok(size)
    } else {
        Err(format!("expected one of {:?}", PAGE_SIZE_OPTIONS))
    }
}

impl Cli {
    fn kind(&self) -> CatalogKind {
        match &self.command {
            Command::Browse(args) => args.kind,
            Command::Suggest(args) => args.kind,
            Command::Item(args) => args.kind,
        }
    }

    fn client_config(&self) -> ClientConfig {
        let config = ClientConfig::new(self.api.clone(), self.kind());
        match self.timeout {
            Some(secs) => config.with_timeout(Duration::from_secs(secs)),
            None => config,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so --json output stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("pantry=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.demo {
        info!("Using the built-in {} catalog", cli.kind());
        let fetcher = MemoryFetcher::new(demo::items(cli.kind()));
        run(&cli, &fetcher).await
    } else {
        let client = HttpCatalogClient::new(cli.client_config())?;
        info!("Browsing the {} catalog at {}", client.kind(), client.url());
        run(&cli, &client).await
    }
}

async fn run<F>(cli: &Cli, fetcher: &F) -> Result<()>
where
    F: PageFetcher<Item = CatalogItem>,
{
    match &cli.command {
        Command::Browse(args) => browse(fetcher, args, cli.json).await,
        Command::Suggest(args) => suggest(fetcher, args, cli.json).await,
        Command::Item(args) => items(fetcher, args, cli.json).await,
    }
}

async fn browse<F>(fetcher: &F, args: &BrowseArgs, json: bool) -> Result<()>
where
    F: PageFetcher<Item = CatalogItem>,
{
    let mut session = open_session(fetcher, args.page_size).await?;

    if let Some(query) = &args.query {
        session.set_query(query.as_str())?;
    }
    if args.category.is_some() {
        session.set_category(args.category.clone())?;
    }

    for step in 0..args.grow {
        if session.phase() == RevealPhase::Exhausted {
            debug!("Nothing left to reveal after {} steps", step);
            break;
        }
        session.grow(fetcher, GrowthTrigger::LoadMore).await?;
    }

    let view = session.view();
    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print_view(&view);
    }
    Ok(())
}

async fn suggest<F>(fetcher: &F, args: &SuggestArgs, json: bool) -> Result<()>
where
    F: PageFetcher<Item = CatalogItem>,
{
    let mut session = open_session(fetcher, args.page_size).await?;
    session.set_draft(args.query.as_str())?;
    let suggestions = session.view().suggestions;

    if json {
        println!("{}", serde_json::to_string_pretty(&suggestions)?);
    } else if suggestions.is_empty() {
        println!("No suggestions for \"{}\"", args.query);
    } else {
        for item in &suggestions {
            print_item(item);
        }
    }
    Ok(())
}

async fn items<F>(fetcher: &F, args: &ItemArgs, json: bool) -> Result<()>
where
    F: PageFetcher<Item = CatalogItem>,
{
    let ids: Vec<ItemId> = args.ids.iter().map(|id| ItemId::new(id.as_str())).collect();
    let fetched = join_all(ids.iter().map(|id| fetcher.fetch_item(id))).await;

    for (id, result) in ids.iter().zip(fetched) {
        let item = result.with_context(|| format!("Failed to fetch item {}", id))?;
        if json {
            println!("{}", serde_json::to_string_pretty(&item)?);
        } else {
            print_item(&item);
            if let Some(description) = &item.description {
                println!("        {}", description);
            }
        }
    }
    Ok(())
}

async fn open_session<F>(fetcher: &F, page_size: u32) -> Result<CatalogSession<CatalogItem>>
where
    F: PageFetcher<Item = CatalogItem>,
{
    let config = BrowseConfig::default()
        .with_page_size(page_size)
        .with_reveal_delay(Duration::ZERO);
    let mut session = CatalogSession::new(config)?;
    session.load(fetcher).await.context("Failed to load the first page")?;
    Ok(session)
}

fn print_view(view: &CatalogView<CatalogItem>) {
    match &view.status {
        ViewStatus::Empty => {
            println!("No items match the current filter");
            return;
        }
        ViewStatus::Failed { message } => {
            println!("Failed to load: {}", message);
            return;
        }
        _ => {}
    }

    for item in &view.items {
        print_item(item);
    }

    println!();
    println!(
        "Showing {} of {} matching ({} loaded){}",
        view.items.len(),
        view.total_filtered,
        view.total_loaded,
        if view.reveal.has_more { ", more available" } else { "" }
    );
    if !view.categories.is_empty() {
        println!("Categories: {}", view.categories.join(", "));
    }
    if let Some(notice) = &view.notice {
        println!("Warning: {}", notice);
    }
}

fn print_item(item: &CatalogItem) {
    let stock = if item.in_stock() { "" } else { "  (sold out)" };
    println!(
        "  {:>4}  {:<24} {:<14} {:>7.2}{}",
        item.id.as_str(),
        item.name,
        item.category.as_deref().unwrap_or("-"),
        item.price,
        stock
    );
}
