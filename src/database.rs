// src/database.rs
//! SQLite cache for normalized job listings: one parent table plus two
//! child tables (links, qualifications) keyed by job_id. Ingest-only from
//! the core's perspective; records are never updated or deleted.

use crate::model::JobRecord;
use anyhow::{Context, Result};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{info, warn};

/// Outcome counters for one ingestion batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub inserted: usize,
    pub duplicates: usize,
    pub failed: usize,
}

#[derive(Debug, sqlx::FromRow)]
struct JobRow {
    job_id: String,
    title: String,
    company_name: String,
    location: String,
    description: String,
    posted_at: String,
    salary: String,
    remote: bool,
}

pub struct JobStore {
    pool: SqlitePool,
}

impl JobStore {
    /// Open (creating if needed) the database file and run migrations.
    pub async fn connect(database_path: &Path) -> Result<Self> {
        if let Some(parent) = database_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .context("Failed to create database directory")?;
            }
        }

        let database_url = format!("sqlite:{}?mode=rwc", database_path.display());
        Self::connect_url(&database_url).await
    }

    /// Connect via a raw sqlx URL. Tests use `sqlite::memory:`.
    pub async fn connect_url(database_url: &str) -> Result<Self> {
        // Single logical writer and reader; one connection also keeps an
        // in-memory database alive across statements.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(database_url)
            .await
            .with_context(|| format!("Failed to connect to database: {}", database_url))?;

        info!("Database connection established: {}", database_url);

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Idempotently create the jobs table and its two child tables. Failure
    /// here is the only batch-fatal error; it propagates to the caller.
    async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS jobs (
                job_id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                company_name TEXT NOT NULL,
                location TEXT DEFAULT '',
                description TEXT DEFAULT '',
                posted_at TEXT DEFAULT '',
                salary TEXT DEFAULT '',
                remote BOOLEAN DEFAULT FALSE
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS related_links (
                link_id INTEGER PRIMARY KEY,
                job_id TEXT NOT NULL,
                url TEXT NOT NULL,
                FOREIGN KEY (job_id) REFERENCES jobs(job_id)
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS qualifications (
                qualification_id INTEGER PRIMARY KEY,
                job_id TEXT NOT NULL,
                qualification TEXT NOT NULL,
                FOREIGN KEY (job_id) REFERENCES jobs(job_id)
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        info!("Database migrations completed");
        Ok(())
    }

    /// Insert a batch of records, committed as one unit. First write wins:
    /// a job_id already present is skipped whole, children included. A
    /// statement failure on one record is logged and the batch continues.
    pub async fn insert_jobs(&self, jobs: &[JobRecord]) -> Result<IngestStats> {
        let mut tx = self.pool.begin().await?;
        let mut stats = IngestStats::default();

        for job in jobs {
            match insert_one(&mut tx, job).await {
                Ok(true) => stats.inserted += 1,
                Ok(false) => {
                    info!("Job {} already cached, skipping", job.job_id);
                    stats.duplicates += 1;
                }
                Err(e) => {
                    warn!("Failed to store job {}: {}", job.job_id, e);
                    stats.failed += 1;
                }
            }
        }

        tx.commit().await?;
        info!(
            "Batch stored: {} inserted, {} duplicates, {} failed",
            stats.inserted, stats.duplicates, stats.failed
        );
        Ok(stats)
    }

    /// Load every cached record in parent-insertion order, children joined
    /// back in as ordered lists. A parent without children gets empty lists.
    pub async fn load_all(&self) -> Result<Vec<JobRecord>> {
        let rows = sqlx::query_as::<_, JobRow>(
            r#"
            SELECT job_id, title, company_name, location, description,
                   posted_at, salary, remote
            FROM jobs
            ORDER BY rowid
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut links = child_map(
            sqlx::query_as::<_, (String, String)>(
                "SELECT job_id, url FROM related_links ORDER BY link_id",
            )
            .fetch_all(&self.pool)
            .await?,
        );

        let mut qualifications = child_map(
            sqlx::query_as::<_, (String, String)>(
                "SELECT job_id, qualification FROM qualifications ORDER BY qualification_id",
            )
            .fetch_all(&self.pool)
            .await?,
        );

        Ok(rows
            .into_iter()
            .map(|row| JobRecord {
                links: links.remove(&row.job_id).unwrap_or_default(),
                qualifications: qualifications.remove(&row.job_id).unwrap_or_default(),
                job_id: row.job_id,
                title: row.title,
                company_name: row.company_name,
                location: row.location,
                description: row.description,
                posted_at: row.posted_at,
                salary: row.salary,
                remote: row.remote,
            })
            .collect())
    }
}

fn child_map(rows: Vec<(String, String)>) -> HashMap<String, Vec<String>> {
    let mut map: HashMap<String, Vec<String>> = HashMap::new();
    for (job_id, value) in rows {
        map.entry(job_id).or_default().push(value);
    }
    map
}

/// Insert one record inside the batch transaction. Returns false when the
/// job_id already existed and the whole record was skipped.
async fn insert_one(tx: &mut Transaction<'_, Sqlite>, job: &JobRecord) -> Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT OR IGNORE INTO jobs
            (job_id, title, company_name, location, description, posted_at, salary, remote)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&job.job_id)
    .bind(&job.title)
    .bind(&job.company_name)
    .bind(&job.location)
    .bind(&job.description)
    .bind(&job.posted_at)
    .bind(&job.salary)
    .bind(job.remote)
    .execute(&mut **tx)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(false);
    }

    // Duplicate links within one record are dropped, first occurrence wins.
    // Qualifications go in verbatim, duplicates included.
    let mut seen = HashSet::new();
    for link in &job.links {
        if !seen.insert(link.as_str()) {
            continue;
        }
        sqlx::query("INSERT INTO related_links (job_id, url) VALUES (?, ?)")
            .bind(&job.job_id)
            .bind(link)
            .execute(&mut **tx)
            .await?;
    }

    for qualification in &job.qualifications {
        sqlx::query("INSERT INTO qualifications (job_id, qualification) VALUES (?, ?)")
            .bind(&job.job_id)
            .bind(qualification)
            .execute(&mut **tx)
            .await?;
    }

    Ok(true)
}
