// src/filters.rs
//! Filter chain over the loaded record set. Each filter is a pure function
//! from a record list to a subset; they compose by sequential narrowing and
//! never touch the store.

use crate::model::JobRecord;
use crate::salary::to_yearly;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

fn trailing_zip_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[0-9-]+$").expect("invalid zip pattern"))
}

/// Keep records containing `keyword` as a case-insensitive substring in any
/// string field, link, or qualification. An empty keyword matches everything.
pub fn filter_keyword(jobs: Vec<JobRecord>, keyword: &str) -> Vec<JobRecord> {
    let needle = keyword.to_lowercase();
    jobs.into_iter()
        .filter(|job| keyword_in_job(&needle, job))
        .collect()
}

fn keyword_in_job(needle: &str, job: &JobRecord) -> bool {
    let fields = [
        &job.title,
        &job.company_name,
        &job.location,
        &job.description,
        &job.posted_at,
        &job.salary,
    ];
    fields.iter().any(|f| f.to_lowercase().contains(needle))
        || job.links.iter().any(|l| l.to_lowercase().contains(needle))
        || job
            .qualifications
            .iter()
            .any(|q| q.to_lowercase().contains(needle))
}

/// Keep records whose derived city string exactly equals the selected city.
/// An empty selection is a no-op.
pub fn filter_city_location(jobs: Vec<JobRecord>, user_city: &str) -> Vec<JobRecord> {
    if user_city.is_empty() {
        return jobs;
    }
    jobs.into_iter()
        .filter(|job| !job.location.is_empty() && city_str(&job.location) == user_city)
        .collect()
}

/// When enabled, keep only remote records; when disabled, pass through.
pub fn filter_remote(jobs: Vec<JobRecord>, remote_only: bool) -> Vec<JobRecord> {
    if !remote_only {
        return jobs;
    }
    jobs.into_iter().filter(|job| job.remote).collect()
}

/// Keep records whose yearly-equivalent salary is at or above the threshold.
pub fn filter_min_salary(jobs: Vec<JobRecord>, min_salary: f64) -> Vec<JobRecord> {
    jobs.into_iter()
        .filter(|job| to_yearly(&job.salary) >= min_salary)
        .collect()
}

/// Cut a parenthesized suffix off a location, e.g.
/// "Boston, MA (+2 others)" becomes "Boston, MA".
pub fn remove_parenthesis(location: &str) -> String {
    match location.rfind('(') {
        Some(idx) => location[..idx].trim_end().to_string(),
        None => location.to_string(),
    }
}

/// Derive the comparable city string from a raw location: strip any
/// parenthesized suffix, then a trailing zip-code token.
pub fn city_str(location: &str) -> String {
    let city = remove_parenthesis(location);
    if trailing_zip_re().is_match(&city) {
        let mut parts: Vec<&str> = city.split(' ').collect();
        parts.pop();
        parts.join(" ")
    } else {
        city
    }
}

/// Alphabetically sorted distinct city strings across the working set, for
/// presentation as selectable filter options.
pub fn city_locations(jobs: &[JobRecord]) -> Vec<String> {
    jobs.iter()
        .filter(|job| !job.location.is_empty())
        .map(|job| city_str(&job.location))
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect()
}

/// A record projected down to what the map window needs.
#[derive(Debug, Clone, PartialEq)]
pub struct MapPin {
    pub job_id: String,
    pub title: String,
    pub company_name: String,
    pub location: String,
}

/// Project records for map display, with parenthesized location suffixes
/// stripped so the geocoder sees a plain address.
pub fn format_for_map(jobs: &[JobRecord]) -> Vec<MapPin> {
    jobs.iter()
        .map(|job| MapPin {
            job_id: job.job_id.clone(),
            title: job.title.clone(),
            company_name: job.company_name.clone(),
            location: remove_parenthesis(&job.location),
        })
        .collect()
}
