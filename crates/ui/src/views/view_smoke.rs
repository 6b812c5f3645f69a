use std::sync::Arc;

use storage::repository::{KeyValueRepository, Storage, StorageError};

use super::test_harness::{ViewKind, setup_view_harness, setup_view_harness_with_storage};

const PLANTS: &str = r#"{"topic":"Plants","subtopics":[
    {"title":"Roots","description":"How roots work.","key_concepts":["soil","water"],
     "status":"unmastered","answered":4,"correct":3,"quiz":[
        {"question":"Roots absorb?","options":["water","light"],"answer":"water","explanation":"Roots take up water."}
     ]},
    {"title":"Leaves","description":"Where light is captured.","key_concepts":["chlorophyll"],
     "status":"unmastered","quiz":[]}
]}"#;

#[tokio::test(flavor = "current_thread")]
async fn home_view_smoke_lists_maps_and_mastery() {
    let mut harness = setup_view_harness(ViewKind::Home, &[PLANTS, "{broken"]).await;
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Plants"), "missing topic in {html}");
    assert!(html.contains("Roots"), "missing subtopic in {html}");
    assert!(html.contains("Mastery: 75%"), "missing mastery in {html}");
    assert!(html.contains("Start quiz (1)"), "missing quiz link in {html}");
    assert!(html.contains("No questions yet"), "missing empty quiz note in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_smoke_renders_empty_library() {
    let mut harness = setup_view_harness(ViewKind::Home, &[]).await;
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Upload a PDF"), "missing upload form in {html}");
    assert!(html.contains("No knowledge maps yet"), "missing empty state in {html}");
}

struct FailingKv;

#[async_trait::async_trait]
impl KeyValueRepository for FailingKv {
    async fn get_value(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }

    async fn put_value(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }

    async fn delete_value(&self, _key: &str) -> Result<bool, StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }

    async fn list_keys(&self) -> Result<Vec<String>, StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_smoke_renders_error_state() {
    let storage = Storage {
        kv: Arc::new(FailingKv),
    };
    let mut harness = setup_view_harness_with_storage(ViewKind::Home, storage);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Something went wrong"), "missing error in {html}");
    assert!(html.contains("Retry"), "missing retry in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_renders_first_question() {
    let mut harness = setup_view_harness(ViewKind::Quiz("Roots".to_string()), &[PLANTS]).await;
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Question 1 of 1"), "missing progress in {html}");
    assert!(html.contains("Roots absorb?"), "missing question in {html}");
    assert!(html.contains("light"), "missing option in {html}");
    assert!(html.contains("Check answer"), "missing check button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_without_questions_shows_fallback() {
    let mut harness = setup_view_harness(ViewKind::Quiz("Leaves".to_string()), &[PLANTS]).await;
    harness.settle().await;
    let html = harness.render();
    assert!(
        html.contains("No more questions available."),
        "missing fallback in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn fill_blank_view_smoke_renders_sentence_and_pool() {
    let mut harness = setup_view_harness(ViewKind::FillBlank, &[]).await;
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Question 1 of 2"), "missing progress in {html}");
    assert!(html.contains("fox jumps over the"), "missing sentence in {html}");
    assert!(html.contains("quick"), "missing option in {html}");
    assert!(html.contains("lazy"), "missing option in {html}");
    assert!(html.contains("Check"), "missing check button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn sorting_view_smoke_renders_every_item() {
    let mut harness = setup_view_harness(ViewKind::Sorting, &[]).await;
    harness.rebuild();
    let html = harness.render();
    for item in ["First", "Second", "Third", "Fourth"] {
        assert!(html.contains(item), "missing {item} in {html}");
    }
    assert!(html.contains("Check order"), "missing check button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn roadmap_view_smoke_lists_subtopic_lessons() {
    let mut harness = setup_view_harness(ViewKind::Roadmap, &[PLANTS]).await;
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("My Roadmap"), "missing heading in {html}");
    assert!(html.contains("Roots"), "missing lesson in {html}");
    assert!(html.contains("30 points"), "missing points in {html}");
    assert!(html.contains("1 of 2 lessons started"), "missing started count in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn grade_views_smoke_render_catalog_and_errors() {
    let mut harness = setup_view_harness(ViewKind::GradeSelect, &[]).await;
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Kindergarten"), "missing grade card in {html}");

    let mut harness = setup_view_harness(ViewKind::GradeRoadmap("K".to_string()), &[]).await;
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Grade K Roadmap"), "missing heading in {html}");
    assert!(html.contains("Letter Sounds"), "missing lesson in {html}");
    assert!(html.contains("25%"), "missing progress in {html}");

    let mut harness = setup_view_harness(ViewKind::GradeRoadmap("9".to_string()), &[]).await;
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Unknown grade level"), "missing error in {html}");
}
