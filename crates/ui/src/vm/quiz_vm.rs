use quiz_core::model::{AnswerChoice, Category, OptionIndex, TimeLimit};
use services::{
    Persistence, QuestionTicket, QuizLoopService, QuizSession, QuizStep, SessionError,
    SessionPhase,
};

use super::time_fmt::format_remaining;
use crate::views::ViewError;

const NAME_WARNING: &str = "Please enter a valid name.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuizIntent {
    SubmitName(String),
    SubmitSetup { category: String, time_limit: String },
    Select {
        ticket: QuestionTicket,
        option: OptionIndex,
    },
    Submit(QuestionTicket),
    Tick(QuestionTicket),
    PlayAgain,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SetupVm {
    pub username: String,
    pub categories: Vec<String>,
    pub default_time_limit: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub index: OptionIndex,
    pub label: String,
    pub checked: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionVm {
    pub ticket: QuestionTicket,
    pub progress_label: String,
    pub prompt: String,
    pub options: Vec<OptionVm>,
    pub timer_label: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletedVm {
    pub username: String,
    pub category: String,
    pub score_label: String,
    pub save_warning: Option<String>,
}

/// What the quiz page should render right now.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuizScreen {
    Name { warning: Option<String> },
    Setup(SetupVm),
    Question(QuestionVm),
    Completed(CompletedVm),
}

/// Wraps the quiz session together with the bits of screen state the session
/// does not track (warnings, the "play again" setup screen).
pub struct QuizVm {
    session: QuizSession,
    categories: Vec<Category>,
    name_warning: Option<String>,
    save_warning: Option<String>,
    replaying: bool,
}

impl QuizVm {
    #[must_use]
    pub fn new(categories: Vec<Category>) -> Self {
        Self {
            session: QuizSession::new(),
            categories,
            name_warning: None,
            save_warning: None,
            replaying: false,
        }
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.session.phase()
    }

    /// Ticket of the question on screen; the countdown runs only while this is
    /// `Some`.
    #[must_use]
    pub fn active_ticket(&self) -> Option<QuestionTicket> {
        self.session.ticket()
    }

    #[must_use]
    pub fn screen(&self) -> QuizScreen {
        match self.session.phase() {
            SessionPhase::AwaitingName => QuizScreen::Name {
                warning: self.name_warning.clone(),
            },
            SessionPhase::AwaitingSetup => QuizScreen::Setup(self.setup_vm()),
            SessionPhase::Completed if self.replaying => QuizScreen::Setup(self.setup_vm()),
            SessionPhase::InQuestion => self
                .question_vm()
                .map_or_else(|| QuizScreen::Completed(self.completed_vm()), QuizScreen::Question),
            SessionPhase::Completed => QuizScreen::Completed(self.completed_vm()),
        }
    }

    /// # Errors
    ///
    /// Returns `ViewError::UnknownCategory` for a category the store does not
    /// offer, or `ViewError::Unknown` for other service failures.
    pub async fn dispatch(
        &mut self,
        quiz_loop: &QuizLoopService,
        intent: QuizIntent,
    ) -> Result<(), ViewError> {
        match intent {
            QuizIntent::SubmitName(raw) => {
                self.submit_name(&raw);
                Ok(())
            }
            QuizIntent::SubmitSetup {
                category,
                time_limit,
            } => self.submit_setup(quiz_loop, &category, &time_limit).await,
            QuizIntent::Select { ticket, option } => {
                self.session.select(ticket, AnswerChoice::Option(option));
                Ok(())
            }
            QuizIntent::Submit(ticket) => {
                let step = quiz_loop.answer_selected(&mut self.session, ticket).await;
                self.apply(step);
                Ok(())
            }
            QuizIntent::Tick(ticket) => {
                let mut step = quiz_loop.tick(&mut self.session, ticket).await;
                // The second that reaches zero ends the question.
                if step == (QuizStep::Counting { remaining_secs: 0 }) {
                    step = quiz_loop.tick(&mut self.session, ticket).await;
                }
                self.apply(step);
                Ok(())
            }
            QuizIntent::PlayAgain => {
                self.play_again();
                Ok(())
            }
        }
    }

    fn submit_name(&mut self, raw: &str) {
        match self.session.submit_name(raw) {
            Ok(()) => self.name_warning = None,
            Err(SessionError::Validation(_)) => {
                self.name_warning = Some(NAME_WARNING.to_string());
            }
            Err(err) => tracing::debug!(error = %err, "name submission ignored"),
        }
    }

    async fn submit_setup(
        &mut self,
        quiz_loop: &QuizLoopService,
        category_label: &str,
        time_limit_text: &str,
    ) -> Result<(), ViewError> {
        let category = Category::new(category_label).map_err(|_| ViewError::UnknownCategory)?;
        let step = quiz_loop
            .submit_setup(&mut self.session, category, time_limit_text)
            .await
            .map_err(|err| match err {
                SessionError::UnknownCategory(_) => ViewError::UnknownCategory,
                _ => ViewError::Unknown,
            })?;
        self.replaying = false;
        self.save_warning = None;
        self.apply(step);
        Ok(())
    }

    fn play_again(&mut self) {
        if self.session.phase() == SessionPhase::Completed {
            self.replaying = true;
            self.save_warning = None;
        }
    }

    fn apply(&mut self, step: QuizStep) {
        if let QuizStep::Finished {
            persistence: Persistence::Failed(message),
            ..
        } = step
        {
            self.save_warning = Some(format!("Your score could not be saved: {message}"));
        }
    }

    fn setup_vm(&self) -> SetupVm {
        SetupVm {
            username: self
                .session
                .username()
                .map(|name| name.as_str().to_string())
                .unwrap_or_default(),
            categories: self
                .categories
                .iter()
                .map(|category| category.as_str().to_string())
                .collect(),
            default_time_limit: TimeLimit::DEFAULT.to_string(),
        }
    }

    fn question_vm(&self) -> Option<QuestionVm> {
        let question = self.session.current_question()?;
        let ticket = self.session.ticket()?;
        let progress = self.session.progress();
        let selected = self.session.selected().option();

        let options = OptionIndex::all()
            .into_iter()
            .map(|index| OptionVm {
                index,
                label: question.option(index).to_string(),
                checked: selected == Some(index),
            })
            .collect();

        Some(QuestionVm {
            ticket,
            progress_label: format!("Question {} of {}", progress.position(), progress.total),
            prompt: question.prompt().to_string(),
            options,
            timer_label: format_remaining(progress.remaining_secs.unwrap_or(0)),
        })
    }

    fn completed_vm(&self) -> CompletedVm {
        let (username, category, score_label) = self.session.result().map_or_else(
            || {
                let progress = self.session.progress();
                (
                    String::new(),
                    String::new(),
                    format!("{}/{}", progress.score, progress.total),
                )
            },
            |result| {
                (
                    result.username().as_str().to_string(),
                    result.category().as_str().to_string(),
                    format!("{}/{}", result.score(), result.total_questions()),
                )
            },
        );
        CompletedVm {
            username,
            category,
            score_label,
            save_warning: self.save_warning.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use storage::repository::{InMemoryRepository, InMemoryResultSink, ResultSink};
    use storage::sqlite::seed_sample_questions;

    async fn seeded_vm() -> (QuizVm, QuizLoopService, InMemoryResultSink) {
        let repo = InMemoryRepository::new();
        seed_sample_questions(&repo).await.unwrap();
        let sink = InMemoryResultSink::new();
        let quiz_loop = QuizLoopService::new(Arc::new(repo), Arc::new(sink.clone()));
        let categories = quiz_loop.list_categories().await.unwrap();
        (QuizVm::new(categories), quiz_loop, sink)
    }

    async fn start(vm: &mut QuizVm, quiz_loop: &QuizLoopService, category: &str) -> QuestionVm {
        vm.dispatch(quiz_loop, QuizIntent::SubmitName("Ada".into()))
            .await
            .unwrap();
        vm.dispatch(
            quiz_loop,
            QuizIntent::SubmitSetup {
                category: category.into(),
                time_limit: "10".into(),
            },
        )
        .await
        .unwrap();
        let QuizScreen::Question(question) = vm.screen() else {
            panic!("expected the question screen");
        };
        question
    }

    #[tokio::test]
    async fn blank_name_shows_warning() {
        let (mut vm, quiz_loop, _) = seeded_vm().await;
        vm.dispatch(&quiz_loop, QuizIntent::SubmitName("   ".into()))
            .await
            .unwrap();
        assert_eq!(
            vm.screen(),
            QuizScreen::Name {
                warning: Some(NAME_WARNING.to_string())
            }
        );

        vm.dispatch(&quiz_loop, QuizIntent::SubmitName(" Ada ".into()))
            .await
            .unwrap();
        let QuizScreen::Setup(setup) = vm.screen() else {
            panic!("expected the setup screen");
        };
        assert_eq!(setup.username, "Ada");
        assert_eq!(setup.categories, vec!["Geography", "Science", "Technology"]);
        assert_eq!(setup.default_time_limit, "10");
    }

    #[tokio::test]
    async fn question_screen_tracks_selection_and_countdown() {
        let (mut vm, quiz_loop, _) = seeded_vm().await;
        let question = start(&mut vm, &quiz_loop, "Geography").await;
        assert_eq!(question.prompt, "What is the capital of France?");
        assert_eq!(question.progress_label, "Question 1 of 1");
        assert_eq!(question.timer_label, "Time remaining: 10 seconds");
        assert!(question.options.iter().all(|option| !option.checked));

        let paris = OptionIndex::new(3).unwrap();
        vm.dispatch(
            &quiz_loop,
            QuizIntent::Select {
                ticket: question.ticket,
                option: paris,
            },
        )
        .await
        .unwrap();
        vm.dispatch(&quiz_loop, QuizIntent::Tick(question.ticket))
            .await
            .unwrap();

        let QuizScreen::Question(question) = vm.screen() else {
            panic!("expected the question screen");
        };
        assert_eq!(question.timer_label, "Time remaining: 9 seconds");
        let checked: Vec<_> = question
            .options
            .iter()
            .filter(|option| option.checked)
            .map(|option| option.index)
            .collect();
        assert_eq!(checked, vec![paris]);
    }

    #[tokio::test]
    async fn submitting_the_right_option_completes_with_full_score() {
        let (mut vm, quiz_loop, sink) = seeded_vm().await;
        let question = start(&mut vm, &quiz_loop, "Geography").await;

        vm.dispatch(
            &quiz_loop,
            QuizIntent::Select {
                ticket: question.ticket,
                option: OptionIndex::new(3).unwrap(),
            },
        )
        .await
        .unwrap();
        vm.dispatch(&quiz_loop, QuizIntent::Submit(question.ticket))
            .await
            .unwrap();

        assert_eq!(vm.active_ticket(), None);
        assert_eq!(
            vm.screen(),
            QuizScreen::Completed(CompletedVm {
                username: "Ada".into(),
                category: "Geography".into(),
                score_label: "1/1".into(),
                save_warning: None,
            })
        );
        assert_eq!(sink.list_results().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn countdown_expiry_scores_zero() {
        let (mut vm, quiz_loop, _) = seeded_vm().await;
        let question = start(&mut vm, &quiz_loop, "Science").await;

        for _ in 0..9 {
            vm.dispatch(&quiz_loop, QuizIntent::Tick(question.ticket))
                .await
                .unwrap();
        }
        let QuizScreen::Question(last_second) = vm.screen() else {
            panic!("expected the question screen");
        };
        assert_eq!(last_second.timer_label, "Time remaining: 1 second");

        vm.dispatch(&quiz_loop, QuizIntent::Tick(question.ticket))
            .await
            .unwrap();
        assert_eq!(vm.active_ticket(), None);
        let QuizScreen::Completed(done) = vm.screen() else {
            panic!("expected the completed screen");
        };
        assert_eq!(done.score_label, "0/1");
    }

    #[tokio::test]
    async fn failed_save_is_reported_but_score_is_kept() {
        let (mut vm, quiz_loop, sink) = seeded_vm().await;
        sink.set_fail_writes(true);
        let question = start(&mut vm, &quiz_loop, "Technology").await;

        vm.dispatch(
            &quiz_loop,
            QuizIntent::Select {
                ticket: question.ticket,
                option: OptionIndex::new(2).unwrap(),
            },
        )
        .await
        .unwrap();
        vm.dispatch(&quiz_loop, QuizIntent::Submit(question.ticket))
            .await
            .unwrap();

        let QuizScreen::Completed(done) = vm.screen() else {
            panic!("expected the completed screen");
        };
        assert_eq!(done.score_label, "1/1");
        assert!(done.save_warning.is_some());
    }

    #[tokio::test]
    async fn play_again_returns_to_setup_with_the_same_name() {
        let (mut vm, quiz_loop, sink) = seeded_vm().await;
        let first = start(&mut vm, &quiz_loop, "Geography").await;
        vm.dispatch(&quiz_loop, QuizIntent::Submit(first.ticket))
            .await
            .unwrap();

        vm.dispatch(&quiz_loop, QuizIntent::PlayAgain).await.unwrap();
        let QuizScreen::Setup(setup) = vm.screen() else {
            panic!("expected the setup screen");
        };
        assert_eq!(setup.username, "Ada");

        vm.dispatch(
            &quiz_loop,
            QuizIntent::SubmitSetup {
                category: "Science".into(),
                time_limit: "abc".into(),
            },
        )
        .await
        .unwrap();
        let QuizScreen::Question(question) = vm.screen() else {
            panic!("expected the question screen");
        };
        assert_eq!(question.timer_label, "Time remaining: 10 seconds");

        // A late submit for the first attempt does nothing.
        vm.dispatch(&quiz_loop, QuizIntent::Submit(first.ticket))
            .await
            .unwrap();
        assert!(matches!(vm.screen(), QuizScreen::Question(_)));

        vm.dispatch(&quiz_loop, QuizIntent::Submit(question.ticket))
            .await
            .unwrap();
        assert_eq!(sink.list_results().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn unknown_category_is_an_error_and_keeps_setup() {
        let (mut vm, quiz_loop, _) = seeded_vm().await;
        vm.dispatch(&quiz_loop, QuizIntent::SubmitName("Ada".into()))
            .await
            .unwrap();

        let err = vm
            .dispatch(
                &quiz_loop,
                QuizIntent::SubmitSetup {
                    category: "History".into(),
                    time_limit: "10".into(),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err, ViewError::UnknownCategory);
        assert!(matches!(vm.screen(), QuizScreen::Setup(_)));
    }
}
