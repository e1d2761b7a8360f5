// src/cli.rs
use crate::config::AppConfig;
use crate::database::JobStore;
use crate::filters::{
    city_locations, filter_city_location, filter_keyword, filter_min_salary, filter_remote,
};
use crate::normalize::{normalize_batch, RawJob};
use crate::search_api::{store_raw_results, JobSearchClient};
use crate::spreadsheet;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "jobscout")]
#[command(about = "Scrape, cache and filter job listings")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Override the database path from config.yaml
    #[arg(long)]
    pub database_path: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create the local cache database
    Init,
    /// Fetch pages of listings from the search API and cache them
    Fetch {
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Import listings from a spreadsheet export (CSV)
    Import { file: PathBuf },
    /// List cached listings, optionally filtered
    List {
        #[arg(long)]
        keyword: Option<String>,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        remote: bool,
        #[arg(long)]
        min_salary: Option<f64>,
    },
    /// Print the cities available for location filtering
    Cities,
}

pub async fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::load()?;
    let database_path = cli
        .database_path
        .unwrap_or_else(|| config.database_path.clone());

    match cli.command {
        Command::Init => {
            JobStore::connect(&database_path).await?;
            info!("Database ready at {}", database_path.display());
        }
        Command::Fetch { pages } => {
            let store = JobStore::connect(&database_path).await?;
            let client = JobSearchClient::new(
                AppConfig::api_key()?,
                config.search_query.clone(),
                config.search_location.clone(),
            )?;

            let mut raw = Vec::new();
            for page in 0..pages {
                raw.extend(client.fetch_page(page).await?);
            }
            store_raw_results(&raw, &config.results_path).await?;

            let records =
                normalize_batch(raw.into_iter().map(|j| RawJob::Api(Box::new(j))).collect());
            let stats = store.insert_jobs(&records).await?;
            println!(
                "Fetched {} pages: {} new, {} duplicates, {} failed",
                pages, stats.inserted, stats.duplicates, stats.failed
            );
        }
        Command::Import { file } => {
            let store = JobStore::connect(&database_path).await?;
            let rows = spreadsheet::read_jobs(&file)?;
            let records = normalize_batch(rows.into_iter().map(RawJob::Sheet).collect());
            let stats = store.insert_jobs(&records).await?;
            println!(
                "Imported {}: {} new, {} duplicates, {} failed",
                file.display(),
                stats.inserted,
                stats.duplicates,
                stats.failed
            );
        }
        Command::List {
            keyword,
            city,
            remote,
            min_salary,
        } => {
            let store = JobStore::connect(&database_path).await?;
            let mut jobs = store.load_all().await?;

            // Same fixed order the GUI applied; each step narrows the
            // previous step's output.
            jobs = filter_remote(jobs, remote);
            if let Some(min) = min_salary {
                jobs = filter_min_salary(jobs, min);
            }
            if let Some(keyword) = keyword.as_deref() {
                jobs = filter_keyword(jobs, keyword);
            }
            if let Some(city) = city.as_deref() {
                jobs = filter_city_location(jobs, city);
            }

            for job in &jobs {
                println!("{}", job.title);
                println!("  {}", job.company_name);
                if !job.location.is_empty() {
                    println!("  {}", job.location);
                }
                if !job.salary.is_empty() && job.salary != "0" {
                    println!("  {}", job.salary);
                }
                if job.remote {
                    println!("  Remote");
                }
                println!();
            }
            println!("{} job(s)", jobs.len());
        }
        Command::Cities => {
            let store = JobStore::connect(&database_path).await?;
            let jobs = store.load_all().await?;
            for city in city_locations(&jobs) {
                println!("{}", city);
            }
        }
    }

    Ok(())
}
