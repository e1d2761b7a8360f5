// src/normalize.rs
//! Record normalization: one adapter per source shape, both producing the
//! canonical `JobRecord`. Source-shape knowledge stays here; persistence and
//! filtering only ever see normalized records.

use crate::error::NormalizeError;
use crate::model::JobRecord;
use crate::salary::{extract_salary_range, format_salary};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Location value that implies a remote listing when the source set no
/// explicit work-from-home flag.
const REMOTE_LOCATION: &str = "anywhere";

/// Highlight section titles, matched case-sensitively.
const QUALIFICATIONS_SECTION: &str = "Qualifications";
const BENEFITS_SECTION: &str = "Benefits";

/// One job result as returned by the search API (shape A).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiJob {
    pub job_id: Option<String>,
    pub title: Option<String>,
    pub company_name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub detected_extensions: DetectedExtensions,
    #[serde(default)]
    pub related_links: Vec<RelatedLink>,
    #[serde(default)]
    pub job_highlights: Vec<HighlightSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectedExtensions {
    #[serde(default)]
    pub posted_at: Option<String>,
    #[serde(default)]
    pub salary: Option<String>,
    #[serde(default)]
    pub work_from_home: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelatedLink {
    #[serde(default)]
    pub link: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighlightSection {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub items: Vec<String>,
}

/// One spreadsheet row (shape B), cells in sheet column order.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetRow {
    pub company: String,
    pub posting_age: String,
    pub job_id: String,
    pub country: String,
    pub location: String,
    pub publish_date: String,
    pub salary_max: String,
    pub salary_min: String,
    pub salary_type: String,
    pub title: String,
}

/// A raw record tagged by its source shape.
#[derive(Debug, Clone)]
pub enum RawJob {
    Api(Box<ApiJob>),
    Sheet(SheetRow),
}

impl RawJob {
    pub fn normalize(self) -> Result<JobRecord, NormalizeError> {
        match self {
            RawJob::Api(job) => normalize_api(*job),
            RawJob::Sheet(row) => normalize_sheet(row),
        }
    }
}

/// Normalize a whole batch, skipping records that fail with a logged warning.
pub fn normalize_batch(raw: Vec<RawJob>) -> Vec<JobRecord> {
    let mut records = Vec::with_capacity(raw.len());
    for item in raw {
        match item.normalize() {
            Ok(record) => records.push(record),
            Err(e) => warn!("Skipping record: {}", e),
        }
    }
    records
}

fn required(value: Option<String>, field: &'static str) -> Result<String, NormalizeError> {
    let value = value.map(|v| v.trim().to_string()).unwrap_or_default();
    if value.is_empty() {
        return Err(NormalizeError::MissingField(field));
    }
    Ok(value)
}

fn optional(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

/// Items of the first highlight section with the given title, trimmed.
fn section_items(highlights: &[HighlightSection], title: &str) -> Vec<String> {
    highlights
        .iter()
        .find(|section| section.title == title)
        .map(|section| section.items.iter().map(|i| i.trim().to_string()).collect())
        .unwrap_or_default()
}

fn normalize_api(job: ApiJob) -> Result<JobRecord, NormalizeError> {
    let job_id = required(job.job_id, "job_id")?;
    let title = required(job.title, "title")?;
    let company_name = required(job.company_name, "company_name")?;
    let location = optional(job.location);
    let description = optional(job.description);

    let ext = job.detected_extensions;
    let posted_at = optional(ext.posted_at);

    // A listing is remote when the source says so, or when the location is
    // the literal "anywhere". No other inference.
    let remote = match ext.work_from_home {
        Some(flag) => flag,
        None => location.to_lowercase() == REMOTE_LOCATION,
    };

    let salary = match ext.salary.map(|s| s.trim().to_string()) {
        Some(s) if !s.is_empty() => s,
        _ => {
            // No explicit salary: infer one from the Benefits section or the
            // description text.
            let benefits = section_items(&job.job_highlights, BENEFITS_SECTION);
            let (min, max) = extract_salary_range(&benefits, &description);
            format_salary(min, max)
        }
    };

    let links = job
        .related_links
        .iter()
        .map(|l| l.link.trim().to_string())
        .collect();
    let qualifications = section_items(&job.job_highlights, QUALIFICATIONS_SECTION);

    Ok(JobRecord {
        job_id,
        title,
        company_name,
        location,
        description,
        posted_at,
        salary,
        remote,
        links,
        qualifications,
    })
}

fn normalize_sheet(row: SheetRow) -> Result<JobRecord, NormalizeError> {
    let job_id = required(Some(row.job_id), "job_id")?;
    let title = required(Some(row.title), "title")?;
    let company_name = required(Some(row.company), "company_name")?;

    let min = row.salary_min.trim();
    let max = row.salary_max.trim();
    let mut salary = if min == max {
        min.to_string()
    } else {
        format!("{} - {}", min, max)
    };
    let salary_type = row.salary_type.trim();
    if !salary.is_empty() && !salary_type.is_empty() && salary_type != "N/A" {
        salary.push(' ');
        salary.push_str(salary_type);
    }

    Ok(JobRecord {
        job_id,
        title,
        company_name,
        location: row.location.trim().to_string(),
        description: String::new(),
        posted_at: row.posting_age.trim().to_string(),
        salary,
        remote: false,
        links: Vec::new(),
        qualifications: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn api_job(value: serde_json::Value) -> ApiJob {
        serde_json::from_value(value).expect("fixture should deserialize")
    }

    fn full_api_fixture() -> serde_json::Value {
        json!({
            "job_id": "asdf1234",
            "title": "  Software Engineer Intern ",
            "company_name": "Studious Studios",
            "location": "Austin, Indiana",
            "description": "Developing Applications",
            "detected_extensions": {
                "posted_at": "3 days ago",
                "salary": "10K - 12K a year",
                "work_from_home": false
            },
            "related_links": [{"link": "google.com"}, {"link": " something.com "}],
            "job_highlights": [
                {"title": "Qualifications", "items": ["React", "Python"]},
                {"title": "Benefits", "items": ["Dental"]}
            ]
        })
    }

    #[test]
    fn test_normalize_api_full_record() {
        let record = RawJob::Api(Box::new(api_job(full_api_fixture())))
            .normalize()
            .unwrap();
        assert_eq!(record.job_id, "asdf1234");
        assert_eq!(record.title, "Software Engineer Intern");
        assert_eq!(record.company_name, "Studious Studios");
        assert_eq!(record.posted_at, "3 days ago");
        assert_eq!(record.salary, "10K - 12K a year");
        assert!(!record.remote);
        assert_eq!(record.links, vec!["google.com", "something.com"]);
        assert_eq!(record.qualifications, vec!["React", "Python"]);
    }

    #[test]
    fn test_normalize_api_missing_job_id() {
        let mut fixture = full_api_fixture();
        fixture.as_object_mut().unwrap().remove("job_id");
        let err = RawJob::Api(Box::new(api_job(fixture)))
            .normalize()
            .unwrap_err();
        assert!(matches!(err, NormalizeError::MissingField("job_id")));
    }

    #[test]
    fn test_normalize_api_defaults() {
        let record = RawJob::Api(Box::new(api_job(json!({
            "job_id": "1",
            "title": "Engineer",
            "company_name": "ABC Inc."
        }))))
        .normalize()
        .unwrap();
        assert_eq!(record.location, "");
        assert_eq!(record.description, "");
        assert_eq!(record.posted_at, "");
        assert!(!record.remote);
        assert!(record.links.is_empty());
        assert!(record.qualifications.is_empty());
    }

    #[test]
    fn test_normalize_api_anywhere_implies_remote() {
        let record = RawJob::Api(Box::new(api_job(json!({
            "job_id": "1",
            "title": "Engineer",
            "company_name": "ABC Inc.",
            "location": " Anywhere "
        }))))
        .normalize()
        .unwrap();
        assert!(record.remote);

        // An explicit flag wins over the location heuristic.
        let record = RawJob::Api(Box::new(api_job(json!({
            "job_id": "1",
            "title": "Engineer",
            "company_name": "ABC Inc.",
            "location": "Anywhere",
            "detected_extensions": {"work_from_home": false}
        }))))
        .normalize()
        .unwrap();
        assert!(!record.remote);
    }

    #[test]
    fn test_normalize_api_infers_salary_from_benefits() {
        let record = RawJob::Api(Box::new(api_job(json!({
            "job_id": "1",
            "title": "Engineer",
            "company_name": "ABC Inc.",
            "job_highlights": [
                {"title": "Benefits", "items": ["Salary range: 40,000 - 55,000"]}
            ]
        }))))
        .normalize()
        .unwrap();
        assert_eq!(record.salary, "40000 - 55000 Yearly");
    }

    #[test]
    fn test_normalize_api_no_salary_found_is_zero() {
        let record = RawJob::Api(Box::new(api_job(json!({
            "job_id": "1",
            "title": "Engineer",
            "company_name": "ABC Inc."
        }))))
        .normalize()
        .unwrap();
        assert_eq!(record.salary, "0");
    }

    fn sheet_fixture() -> SheetRow {
        SheetRow {
            company: "ABC Inc.".to_string(),
            posting_age: "5".to_string(),
            job_id: "sheet-1".to_string(),
            country: "US".to_string(),
            location: "Boston, MA".to_string(),
            publish_date: "2024-03-01".to_string(),
            salary_max: "120000".to_string(),
            salary_min: "100000".to_string(),
            salary_type: "Yearly".to_string(),
            title: "Software Engineer".to_string(),
        }
    }

    #[test]
    fn test_normalize_sheet_row() {
        let record = RawJob::Sheet(sheet_fixture()).normalize().unwrap();
        assert_eq!(record.job_id, "sheet-1");
        assert_eq!(record.title, "Software Engineer");
        assert_eq!(record.company_name, "ABC Inc.");
        assert_eq!(record.location, "Boston, MA");
        assert_eq!(record.posted_at, "5");
        assert_eq!(record.salary, "100000 - 120000 Yearly");
        assert!(!record.remote);
        assert!(record.links.is_empty());
        assert!(record.qualifications.is_empty());
    }

    #[test]
    fn test_normalize_sheet_equal_bounds_and_na_type() {
        let mut row = sheet_fixture();
        row.salary_min = "90000".to_string();
        row.salary_max = "90000".to_string();
        row.salary_type = "N/A".to_string();
        let record = RawJob::Sheet(row).normalize().unwrap();
        assert_eq!(record.salary, "90000");
    }

    #[test]
    fn test_normalize_batch_skips_bad_records() {
        let mut bad = full_api_fixture();
        bad.as_object_mut().unwrap().remove("title");
        let records = normalize_batch(vec![
            RawJob::Api(Box::new(api_job(bad))),
            RawJob::Sheet(sheet_fixture()),
        ]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].job_id, "sheet-1");
    }
}
