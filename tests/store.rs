//! Integration tests for the SQLite job cache, run against an in-memory
//! database.

use jobscout::{JobRecord, JobStore};

fn fixture_record() -> JobRecord {
    JobRecord {
        job_id: "asdf1234".to_string(),
        title: "Software Engineer Intern".to_string(),
        company_name: "Studious Studios".to_string(),
        location: "Austin, Indiana".to_string(),
        description: "Developing Applications".to_string(),
        posted_at: "3 days ago".to_string(),
        salary: "10K - 12K a year".to_string(),
        remote: true,
        links: vec!["google.com".to_string(), "something.com".to_string()],
        qualifications: vec!["React".to_string(), "Python".to_string()],
    }
}

async fn memory_store() -> JobStore {
    JobStore::connect_url("sqlite::memory:")
        .await
        .expect("in-memory store should open")
}

#[tokio::test]
async fn test_insert_and_load_round_trip() {
    let store = memory_store().await;
    let record = fixture_record();

    let stats = store.insert_jobs(std::slice::from_ref(&record)).await.unwrap();
    assert_eq!(stats.inserted, 1);
    assert_eq!(stats.duplicates, 0);
    assert_eq!(stats.failed, 0);

    let loaded = store.load_all().await.unwrap();
    assert_eq!(loaded, vec![record]);
}

#[tokio::test]
async fn test_duplicate_insert_is_whole_record_noop() {
    let store = memory_store().await;
    let record = fixture_record();

    store.insert_jobs(std::slice::from_ref(&record)).await.unwrap();

    // Same id again, different payload: first write wins, children included.
    let mut changed = record.clone();
    changed.title = "Senior Engineer".to_string();
    changed.links = vec!["other.com".to_string()];
    let stats = store.insert_jobs(&[changed]).await.unwrap();
    assert_eq!(stats.inserted, 0);
    assert_eq!(stats.duplicates, 1);

    let loaded = store.load_all().await.unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].title, "Software Engineer Intern");
    assert_eq!(loaded[0].links, vec!["google.com", "something.com"]);
    assert_eq!(loaded[0].qualifications.len(), 2);
}

#[tokio::test]
async fn test_duplicate_in_same_batch_absorbed() {
    let store = memory_store().await;
    let record = fixture_record();

    let stats = store
        .insert_jobs(&[record.clone(), record])
        .await
        .unwrap();
    assert_eq!(stats.inserted, 1);
    assert_eq!(stats.duplicates, 1);
    assert_eq!(store.load_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_links_deduplicated_qualifications_not() {
    let store = memory_store().await;
    let mut record = fixture_record();
    record.links = vec![
        "google.com".to_string(),
        "google.com".to_string(),
        "something.com".to_string(),
        "google.com".to_string(),
    ];
    record.qualifications = vec!["Python".to_string(), "Python".to_string()];

    store.insert_jobs(&[record]).await.unwrap();

    let loaded = store.load_all().await.unwrap();
    assert_eq!(loaded[0].links, vec!["google.com", "something.com"]);
    assert_eq!(loaded[0].qualifications, vec!["Python", "Python"]);
}

#[tokio::test]
async fn test_record_without_children_loads_empty_lists() {
    let store = memory_store().await;
    let mut record = fixture_record();
    record.links.clear();
    record.qualifications.clear();

    store.insert_jobs(&[record]).await.unwrap();

    let loaded = store.load_all().await.unwrap();
    assert!(loaded[0].links.is_empty());
    assert!(loaded[0].qualifications.is_empty());
}

#[tokio::test]
async fn test_load_all_preserves_insertion_order() {
    let store = memory_store().await;
    let mut second = fixture_record();
    second.job_id = "zzz".to_string();
    let mut first = fixture_record();
    first.job_id = "aaa".to_string();

    store.insert_jobs(&[second, first]).await.unwrap();

    let loaded = store.load_all().await.unwrap();
    let ids: Vec<&str> = loaded.iter().map(|j| j.job_id.as_str()).collect();
    assert_eq!(ids, vec!["zzz", "aaa"]);
}

#[tokio::test]
async fn test_migrate_is_idempotent_and_keeps_data() {
    let dir = std::env::temp_dir().join(format!("jobscout_store_test_{}", std::process::id()));
    let path = dir.join("jobs.sqlite");

    {
        let store = JobStore::connect(&path).await.unwrap();
        store.insert_jobs(&[fixture_record()]).await.unwrap();
    }

    // Reopening runs the migrations again on an existing store.
    let store = JobStore::connect(&path).await.unwrap();
    assert_eq!(store.load_all().await.unwrap().len(), 1);

    std::fs::remove_dir_all(&dir).ok();
}
