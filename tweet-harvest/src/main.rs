use std::path::{Path, PathBuf};
use std::process;
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Local, NaiveDate};
use clap::Parser;
use tracing::error;
use twitter::TwitterClient;

use crate::config::Config;
use crate::query::QuerySpec;

mod api;
mod config;
mod crawl;
mod project;
mod query;
mod reply;
mod report;
mod sink;
mod tweet;

/// Collect tweets matching configured keyword queries
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Language code selecting the keyword set to crawl
    #[clap(short, long, default_value = "en")]
    lang: String,

    /// Include retweets in the search results
    #[clap(long)]
    retweet: bool,

    /// Skip the implicit last-N-days window
    #[clap(long)]
    range: bool,

    /// Credential set to authenticate with (1-based)
    #[clap(short, long, default_value_t = 1)]
    index: usize,

    /// Window start, format: 2020-01-08
    #[clap(long)]
    since: Option<NaiveDate>,

    /// Window end, format: 2020-01-15
    #[clap(long)]
    until: Option<NaiveDate>,

    /// Config file location
    #[clap(short, long, default_value_os_t = default_config_path(), value_parser)]
    config: PathBuf,
}

fn default_config_path() -> PathBuf {
    directories::ProjectDirs::from("", "", "Tweet Harvest")
        .unwrap()
        .config_dir()
        .join("config.toml")
}

#[tokio::main]
async fn main() {
    match run().await {
        Ok(_) => process::exit(0),
        Err(err) => {
            eprintln!("{:#}", err);
            process::exit(1);
        }
    }
}

async fn run() -> Result<()> {
    let args = Args::parse();
    let config = Config::read(&args.config)?;

    let now = Local::now();
    init_logging(&config.parameters.log_path, &now)?;

    // Explicit windows go through the premium-tier credential sets.
    let index = if args.since.is_some() && args.until.is_some() {
        args.index + 3
    } else {
        args.index
    };
    let client = TwitterClient::new(config.bearer(index)?);

    let today = now.date_naive();
    let run_date = now.format("%y%m%d").to_string();
    let mut sink = sink::build(&config, &args.lang, &run_date).await?;

    let keywords = config.keywords_for(&args.lang)?;
    for keyword in keywords.split("OR").map(str::trim).filter(|k| !k.is_empty()) {
        let spec = QuerySpec {
            keyword: keyword.to_string(),
            lang: args.lang.clone(),
            since: args.since,
            until: args.until,
            unbounded: args.range,
            include_retweets: args.retweet,
            page_size: config.parameters.count,
            max_posts: config.parameters.max_number,
        };
        let params = crawl::CrawlParams {
            query: spec.query_text(today, config.parameters.date_range),
            lang: spec.lang.clone(),
            page_size: spec.page_size,
            max_posts: spec.max_posts,
            rate_limit_window: config.parameters.rate_limit_window,
        };

        // A keyword failing outright must not stop the remaining ones.
        match crawl::run(&client, sink.as_mut(), &params).await {
            Ok(total) => println!("Total: {} <{}> tweets", total, args.lang),
            Err(err) => error!("crawl for keyword [{}] failed: {:#}", keyword, err),
        }
    }

    if let Some(report) = &config.report {
        let previous = today - Duration::days(config.parameters.date_range);
        report::generate(
            report,
            &sink::collection_name(&args.lang),
            &previous.format("%Y-%m-%d").to_string(),
            &today.format("%Y-%m-%d").to_string(),
        )
        .await;
    }

    Ok(())
}

fn init_logging(log_path: &Path, now: &DateTime<Local>) -> Result<()> {
    std::fs::create_dir_all(log_path)
        .with_context(|| format!("failed to create log directory {}", log_path.display()))?;
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path.join(format!("tweet_{}.log", now.format("%y%m%d"))))?;

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();

    Ok(())
}
