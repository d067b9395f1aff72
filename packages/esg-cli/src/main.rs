// Command-line front end for ESG scoring

mod config;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use esg_scout::ai::{OpenAiExplainer, OpenAiSignalExtractor};
use esg_scout::{
    CrawlConfig, DomainResolver, HttpFetcher, NoopSearcher, PageFetcher, RatingStatus,
    ScoreResult, Scout, ScoutConfig, ScoutDeps, ScoutError, SerperSearcher, SiteCrawler,
    WebSearcher,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

#[derive(Parser)]
#[command(name = "esg", about = "Estimate a company's ESG score from public sources")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score a company by name or website
    Score {
        /// Company name, domain or full URL
        input: String,

        /// Print the full result record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve a company name to its website
    Lookup {
        company: String,
    },

    /// Run a single crawl pass and list what was found
    Crawl {
        url: String,

        /// Follow every same-domain link, not only ESG-looking ones
        #[arg(long)]
        all: bool,

        #[arg(long)]
        max_pages: Option<usize>,

        #[arg(long)]
        max_depth: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Diagnostics go to stderr so stdout stays clean for results
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,esg_scout=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;

    match cli.command {
        Command::Score { input, json } => score(&config, &input, json).await,
        Command::Lookup { company } => lookup(&company).await,
        Command::Crawl {
            url,
            all,
            max_pages,
            max_depth,
        } => crawl(&url, all, max_pages, max_depth).await,
    }
}

fn http_fetcher() -> Result<Arc<dyn PageFetcher>> {
    let fetcher = HttpFetcher::new().context("Failed to build HTTP client")?;
    Ok(Arc::new(fetcher))
}

fn build_scout(config: &Config) -> Result<Scout> {
    let scout_config = ScoutConfig::default();

    let searcher: Arc<dyn WebSearcher> = match &config.serper_api_key {
        Some(key) => Arc::new(
            SerperSearcher::with_key(key.clone()).with_scout_config(&scout_config),
        ),
        None => {
            tracing::info!("SERPER_API_KEY not set, external search disabled");
            Arc::new(NoopSearcher)
        }
    };

    let deps = ScoutDeps::new(
        http_fetcher()?,
        searcher,
        Arc::new(
            OpenAiSignalExtractor::new(config.extract_credentials()?)
                .with_timeout(scout_config.timeouts.model),
        ),
        Arc::new(
            OpenAiExplainer::new(config.explain_credentials()?)
                .with_timeout(scout_config.timeouts.model),
        ),
    );

    Scout::new(deps, scout_config).context("Invalid pipeline configuration")
}

async fn score(config: &Config, input: &str, json: bool) -> Result<()> {
    let scout = build_scout(config)?;

    let normalized = match scout.normalize_input(input).await {
        Ok(normalized) => normalized,
        Err(ScoutError::InvalidInput { .. }) => {
            eprintln!(
                "{} nothing to score: pass a company name (e.g. {}) or a website (e.g. {})",
                "✗".bright_red(),
                "patagonia".bold(),
                "patagonia.com".bold()
            );
            std::process::exit(2);
        }
        Err(e) => return Err(e).context("Failed to interpret input"),
    };
    tracing::info!(url = %normalized.url, "Scoring website");

    let result = scout
        .score_website(&normalized.url, normalized.company_hint.as_deref())
        .await
        .context("Scoring failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result)?;
    }

    Ok(())
}

async fn lookup(company: &str) -> Result<()> {
    let resolver = DomainResolver::new(http_fetcher()?);

    match resolver.lookup_domain(company).await {
        Some(domain) => println!("{} {}", "✓".bright_green(), domain),
        None => println!("{} no website found for {}", "✗".bright_red(), company.bold()),
    }

    Ok(())
}

async fn crawl(
    url: &str,
    all: bool,
    max_pages: Option<usize>,
    max_depth: Option<usize>,
) -> Result<()> {
    let mut crawl_config = if all {
        CrawlConfig::broad()
    } else {
        CrawlConfig::focused()
    };
    if let Some(max_pages) = max_pages {
        crawl_config = crawl_config.with_max_pages(max_pages);
    }
    if let Some(max_depth) = max_depth {
        crawl_config = crawl_config.with_max_depth(max_depth);
    }

    let crawler = SiteCrawler::new(http_fetcher()?);
    let outcome = crawler.crawl(url, &crawl_config).await;

    print_section("Pages", &outcome.crawled_urls());
    print_section("PDFs", &outcome.pdf_url_list());

    Ok(())
}

fn print_result(result: &ScoreResult) -> Result<()> {
    println!();
    println!("{} {}", "ESG score for".bold(), result.root_url.bright_cyan());
    println!();

    let scores = &result.esg_scores;
    println!("  {:<12} {}", "Environment", scores.environment);
    println!("  {:<12} {}", "Social", scores.social);
    println!("  {:<12} {}", "Governance", scores.governance);
    println!(
        "  {:<12} {}",
        "Total".bold(),
        scores.total.to_string().bold()
    );

    let rating = match result.rating {
        RatingStatus::Rated => "rated".bright_green(),
        RatingStatus::LowConfidence => "low confidence".bright_yellow(),
        RatingStatus::NoRating => "no rating".bright_red(),
    };
    println!("  {:<12} {}", "Rating", rating);

    print_section("On-site pages", &result.crawled_urls);
    print_section("External pages", &result.external_html_urls);
    print_section("On-site PDFs", &result.pdf_urls_on_site);
    print_section("External PDFs", &result.external_pdf_urls);

    println!();
    println!(
        "{} {}",
        "Search snippets used:".bright_blue(),
        result.external_snippets_count
    );

    if let Some(signals) = &result.esg_signals {
        println!();
        println!("{}", "Signals".bright_blue().bold());
        println!("{}", serde_json::to_string_pretty(signals)?);
    }

    println!();
    println!("{}", "Explanation".bright_blue().bold());
    println!("{}", result.explanation);

    Ok(())
}

fn print_section(title: &str, urls: &[String]) {
    println!();
    println!("{} ({})", title.bright_blue().bold(), urls.len());
    if urls.is_empty() {
        println!("  {}", "none".dimmed());
    }
    for url in urls {
        println!("  - {url}");
    }
}
