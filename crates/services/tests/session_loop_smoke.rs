use std::sync::Arc;

use quiz_core::model::{AnswerChoice, Category, OptionIndex};
use services::{Persistence, QuizLoopService, QuizSession, QuizStep, ScoreHistoryService, SessionPhase};
use storage::repository::{InMemoryRepository, InMemoryResultSink, ResultSink};
use storage::sqlite::seed_sample_questions;

async fn seeded() -> (QuizLoopService, InMemoryResultSink) {
    let repo = InMemoryRepository::new();
    seed_sample_questions(&repo).await.unwrap();
    let sink = InMemoryResultSink::new();
    let svc = QuizLoopService::new(Arc::new(repo), Arc::new(sink.clone()));
    (svc, sink)
}

async fn start_geography(svc: &QuizLoopService, session: &mut QuizSession) -> QuizStep {
    session.submit_name("Ada").unwrap();
    svc.submit_setup(session, Category::new("Geography").unwrap(), "10")
        .await
        .unwrap()
}

#[tokio::test]
async fn correct_answer_before_timeout_scores_one_of_one() {
    let (svc, sink) = seeded().await;
    let mut session = QuizSession::new();

    let QuizStep::Question(ticket) = start_geography(&svc, &mut session).await else {
        panic!("expected a question");
    };
    assert_eq!(
        session.current_question().unwrap().prompt(),
        "What is the capital of France?"
    );

    // A couple of seconds pass, then the player picks Paris.
    svc.tick(&mut session, ticket).await;
    svc.tick(&mut session, ticket).await;
    session.select(ticket, AnswerChoice::Option(OptionIndex::new(3).unwrap()));
    let step = svc.answer_selected(&mut session, ticket).await;

    let QuizStep::Finished {
        result,
        persistence,
    } = step
    else {
        panic!("expected the quiz to finish");
    };
    assert_eq!((result.score(), result.total_questions()), (1, 1));
    assert_eq!(persistence, Persistence::Saved);
    assert_eq!(sink.list_results().await.unwrap(), vec![result]);

    // Double click on Submit after the fact.
    assert_eq!(svc.answer_selected(&mut session, ticket).await, QuizStep::Unchanged);
    assert_eq!(sink.list_results().await.unwrap().len(), 1);
}

#[tokio::test]
async fn countdown_running_out_scores_zero_of_one() {
    let (svc, sink) = seeded().await;
    let mut session = QuizSession::new();

    let QuizStep::Question(ticket) = start_geography(&svc, &mut session).await else {
        panic!("expected a question");
    };

    let mut last = svc.tick(&mut session, ticket).await;
    for _ in 0..10 {
        last = svc.tick(&mut session, ticket).await;
    }

    let QuizStep::Finished { result, .. } = last else {
        panic!("expected the countdown to finish the quiz");
    };
    assert_eq!((result.score(), result.total_questions()), (0, 1));
    assert_eq!(session.phase(), SessionPhase::Completed);

    // Stray tick after completion.
    assert_eq!(svc.tick(&mut session, ticket).await, QuizStep::Unchanged);
    assert_eq!(sink.list_results().await.unwrap().len(), 1);
}

#[tokio::test]
async fn empty_name_never_produces_a_result() {
    let (_svc, sink) = seeded().await;
    let mut session = QuizSession::new();

    assert!(session.submit_name("  ").is_err());
    assert_eq!(session.phase(), SessionPhase::AwaitingName);
    assert!(sink.list_results().await.unwrap().is_empty());
}

#[tokio::test]
async fn play_again_appends_a_second_row() {
    let (svc, sink) = seeded().await;
    let mut session = QuizSession::new();

    let QuizStep::Question(ticket) = start_geography(&svc, &mut session).await else {
        panic!("expected a question");
    };
    svc.answer(&mut session, ticket, AnswerChoice::Unset).await;

    let QuizStep::Question(ticket) = svc
        .submit_setup(&mut session, Category::new("Science").unwrap(), "30")
        .await
        .unwrap()
    else {
        panic!("expected a question");
    };
    assert_eq!(session.remaining_secs(), Some(30));
    svc.answer(
        &mut session,
        ticket,
        AnswerChoice::Option(OptionIndex::new(3).unwrap()),
    )
    .await;

    let history = ScoreHistoryService::new(Arc::new(sink)).recent(10).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].category, "Science");
    assert_eq!((history[0].score, history[0].total), (1, 1));
    assert_eq!(history[1].category, "Geography");
    assert_eq!(history[1].score, 0);
}
