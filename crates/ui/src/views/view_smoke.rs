use quiz_core::model::{Category, SessionResult, Username};
use storage::repository::{ResultSink, Storage};

use super::test_harness::{ViewKind, setup_view_harness, setup_view_harness_with_storage};

fn result(name: &str, score: u32, total: u32, category: &str) -> SessionResult {
    SessionResult::new(
        Username::parse(name).unwrap(),
        score,
        total,
        Category::new(category).unwrap(),
    )
    .unwrap()
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_starts_with_name_entry() {
    let mut harness = setup_view_harness(ViewKind::Quiz).await;
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("Enter your name:"), "missing name prompt in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn scores_view_smoke_lists_saved_results() {
    let storage = Storage::in_memory();
    storage
        .results
        .append(&result("Ada", 1, 2, "Science"))
        .await
        .expect("append result");
    storage
        .results
        .append(&result("Grace", 0, 0, "History"))
        .await
        .expect("append result");

    let mut harness = setup_view_harness_with_storage(ViewKind::Scores, storage);
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("Ada"), "missing player in {html}");
    assert!(html.contains("1/2"), "missing score in {html}");
    assert!(html.contains("50%"), "missing percentage in {html}");
    assert!(html.contains("0/0"), "missing empty session in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn scores_view_smoke_renders_empty_state() {
    let mut harness = setup_view_harness(ViewKind::Scores).await;
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("No quizzes played yet."), "missing empty state in {html}");
}
