use quiz_core::model::{Category, OptionIndex, SessionResult, Username};
use storage::repository::{NewQuestionRecord, QuestionRepository, ResultSink, Storage};
use storage::sqlite::{SqliteRepository, seed_sample_questions};

fn record(prompt: &str, correct: i64, category: &str) -> NewQuestionRecord {
    NewQuestionRecord {
        prompt: prompt.into(),
        options: ["one", "two", "three", "four"].map(String::from),
        correct: OptionIndex::new(correct).unwrap(),
        category: Category::new(category).unwrap(),
    }
}

#[tokio::test]
async fn sqlite_roundtrip_questions_by_category() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_questions?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");
    // Running migrations twice is a no-op.
    repo.migrate().await.expect("migrate again");

    let first = repo
        .insert_question(record("Largest ocean?", 4, "Geography"))
        .await
        .unwrap();
    repo.insert_question(record("Speed of light?", 1, "Science"))
        .await
        .unwrap();
    let third = repo
        .insert_question(record("Longest river?", 2, "Geography"))
        .await
        .unwrap();

    let categories = repo.list_categories().await.unwrap();
    let labels: Vec<&str> = categories.iter().map(Category::as_str).collect();
    assert_eq!(labels, vec!["Geography", "Science"]);

    let geography = repo
        .questions_for(&Category::new("Geography").unwrap())
        .await
        .unwrap();
    assert_eq!(geography.len(), 2);
    assert_eq!(geography[0].id(), first);
    assert_eq!(geography[1].id(), third);
    assert_eq!(geography[0].correct(), OptionIndex::new(4).unwrap());
    assert_eq!(geography[1].options()[1], "two");

    let missing = repo
        .questions_for(&Category::new("History").unwrap())
        .await
        .unwrap();
    assert!(missing.is_empty());
}

#[tokio::test]
async fn sqlite_seed_runs_once() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_seed?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    assert_eq!(seed_sample_questions(&repo).await.unwrap(), 3);
    assert_eq!(seed_sample_questions(&repo).await.unwrap(), 0);
    assert_eq!(repo.count_questions().await.unwrap(), 3);

    let geography = repo
        .questions_for(&Category::new("Geography").unwrap())
        .await
        .unwrap();
    assert_eq!(geography.len(), 1);
    assert_eq!(geography[0].prompt(), "What is the capital of France?");
    assert_eq!(geography[0].option(geography[0].correct()), "Paris");
}

#[tokio::test]
async fn open_wires_sqlite_questions_and_csv_results() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("quiz_app.db");
    let results_path = dir.path().join("quiz_scores.csv");
    let url = format!("sqlite://{}?mode=rwc", db_path.display());

    let storage = Storage::open(&url, &results_path).await.expect("open");
    assert_eq!(storage.questions.list_categories().await.unwrap().len(), 3);

    let result = SessionResult::new(
        Username::parse("ada").unwrap(),
        1,
        1,
        Category::new("Geography").unwrap(),
    )
    .unwrap();
    storage.results.append(&result).await.unwrap();

    let rows = storage.results.list_results().await.unwrap();
    assert_eq!(rows, vec![result]);
    assert!(results_path.exists());
}
