use std::time::Duration;

use dioxus::core::Task;
use dioxus::prelude::*;
use services::QuestionTicket;

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{CompletedVm, QuestionVm, QuizIntent, QuizScreen, QuizVm, SetupVm};

#[component]
pub fn QuizView() -> Element {
    let ctx = use_context::<AppContext>();
    let quiz_loop = ctx.quiz_loop();

    let error = use_signal(|| None::<ViewError>);
    let vm = use_signal(|| None::<QuizVm>);
    let active_ticket = use_signal(|| None::<QuestionTicket>);
    // Screen shown while the vm is out of its signal handling an event.
    let pending_screen = use_signal(|| None::<QuizScreen>);
    let mut countdown = use_signal(|| None::<Task>);

    let quiz_loop_for_resource = quiz_loop.clone();
    let resource = use_resource(move || {
        let quiz_loop = quiz_loop_for_resource.clone();
        let mut vm = vm;
        async move {
            let categories = quiz_loop
                .list_categories()
                .await
                .map_err(|_| ViewError::Unknown)?;
            vm.set(Some(QuizVm::new(categories)));
            Ok::<_, ViewError>(())
        }
    });
    let state = view_state_from_resource(&resource);

    let dispatch = {
        let quiz_loop = quiz_loop.clone();
        use_callback(move |intent: QuizIntent| {
            let quiz_loop = quiz_loop.clone();
            let mut error = error;
            let mut vm = vm;
            let mut active_ticket = active_ticket;
            let mut pending_screen = pending_screen;
            spawn(async move {
                let taken = vm.write().take();
                // Still busy with the previous event.
                let Some(mut vm_value) = taken else {
                    return;
                };
                pending_screen.set(Some(vm_value.screen()));

                let result = vm_value.dispatch(&quiz_loop, intent).await;
                let next_ticket = vm_value.active_ticket();
                vm.set(Some(vm_value));
                pending_screen.set(None);

                error.set(result.err());
                if *active_ticket.peek() != next_ticket {
                    active_ticket.set(next_ticket);
                }
            });
        })
    };

    // One countdown task per question ticket; any transition cancels it.
    use_effect(move || {
        let ticket = active_ticket();
        let previous = countdown.write().take();
        if let Some(task) = previous {
            task.cancel();
        }
        let Some(ticket) = ticket else {
            return;
        };
        let task = spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_secs(1)).await;
                dispatch.call(QuizIntent::Tick(ticket));
            }
        });
        countdown.set(Some(task));
    });

    let screen = visible_screen(vm.read().as_ref(), pending_screen());
    let body = match state {
        ViewState::Idle => rsx! {
            p { "Idle" }
        },
        ViewState::Loading => rsx! {
            p { "Loading..." }
        },
        ViewState::Error(err) => rsx! {
            p { "{err.message()}" }
        },
        ViewState::Ready(()) => render_screen(screen, dispatch),
    };

    rsx! {
        div { class: "page quiz-page",
            h2 { "Quiz" }
            if let Some(err) = error() {
                p { class: "error", "{err.message()}" }
            }
            {body}
        }
    }
}

fn visible_screen(vm: Option<&QuizVm>, pending: Option<QuizScreen>) -> Option<QuizScreen> {
    vm.map(QuizVm::screen).or(pending)
}

fn render_screen(screen: Option<QuizScreen>, on_intent: Callback<QuizIntent>) -> Element {
    match screen {
        Some(QuizScreen::Name { warning }) => rsx! {
            NameStep { warning, on_intent }
        },
        Some(QuizScreen::Setup(setup)) => rsx! {
            SetupStep { setup, on_intent }
        },
        Some(QuizScreen::Question(question)) => rsx! {
            QuestionStep { question, on_intent }
        },
        Some(QuizScreen::Completed(done)) => rsx! {
            CompletedStep { done, on_intent }
        },
        None => rsx! {
            p { "Loading..." }
        },
    }
}

#[component]
fn NameStep(warning: Option<String>, on_intent: Callback<QuizIntent>) -> Element {
    let mut name = use_signal(String::new);

    rsx! {
        div { class: "quiz-step quiz-name",
            label { r#for: "quiz-name-input", "Enter your name:" }
            input {
                id: "quiz-name-input",
                r#type: "text",
                value: "{name}",
                oninput: move |evt| name.set(evt.value()),
            }
            button {
                class: "primary",
                r#type: "button",
                onclick: move |_| on_intent.call(QuizIntent::SubmitName(name())),
                "Continue"
            }
            if let Some(warning) = warning {
                p { class: "warning", "{warning}" }
            }
        }
    }
}

#[component]
fn SetupStep(setup: SetupVm, on_intent: Callback<QuizIntent>) -> Element {
    let first_category = setup.categories.first().cloned().unwrap_or_default();
    let default_time_limit = setup.default_time_limit.clone();
    let mut category = use_signal(move || first_category);
    let mut time_limit = use_signal(move || default_time_limit);

    rsx! {
        div { class: "quiz-step quiz-setup",
            p { "Welcome, {setup.username}!" }
            if setup.categories.is_empty() {
                p { "No questions available yet." }
            } else {
                label { r#for: "quiz-category", "Select a category:" }
                select {
                    id: "quiz-category",
                    value: "{category}",
                    onchange: move |evt| category.set(evt.value()),
                    for name in setup.categories.clone() {
                        option { key: "{name}", value: "{name}", "{name}" }
                    }
                }
                label { r#for: "quiz-time-limit", "Seconds per question (5-60):" }
                input {
                    id: "quiz-time-limit",
                    r#type: "text",
                    value: "{time_limit}",
                    oninput: move |evt| time_limit.set(evt.value()),
                }
                button {
                    class: "primary",
                    r#type: "button",
                    onclick: move |_| {
                        on_intent.call(QuizIntent::SubmitSetup {
                            category: category(),
                            time_limit: time_limit(),
                        });
                    },
                    "Start quiz"
                }
            }
        }
    }
}

#[component]
fn QuestionStep(question: QuestionVm, on_intent: Callback<QuizIntent>) -> Element {
    let ticket = question.ticket;

    rsx! {
        div { class: "quiz-step quiz-question",
            p { class: "quiz-progress", "{question.progress_label}" }
            h3 { class: "quiz-prompt", "{question.prompt}" }
            div { class: "quiz-options", role: "radiogroup",
                for option in question.options.clone() {
                    label { key: "{option.index}", class: "quiz-option",
                        input {
                            r#type: "radio",
                            name: "quiz-answer",
                            checked: option.checked,
                            onchange: move |_| {
                                on_intent.call(QuizIntent::Select {
                                    ticket,
                                    option: option.index,
                                });
                            },
                        }
                        "{option.label}"
                    }
                }
            }
            button {
                class: "primary",
                r#type: "button",
                onclick: move |_| on_intent.call(QuizIntent::Submit(ticket)),
                "Submit"
            }
            p { class: "quiz-timer", "{question.timer_label}" }
        }
    }
}

#[component]
fn CompletedStep(done: CompletedVm, on_intent: Callback<QuizIntent>) -> Element {
    rsx! {
        div { class: "quiz-step quiz-completed",
            h3 { "Quiz completed!" }
            p { class: "quiz-score", "Your score: {done.score_label}" }
            p { class: "quiz-meta", "{done.username} · {done.category}" }
            if let Some(warning) = done.save_warning.clone() {
                p { class: "warning", "{warning}" }
            }
            button {
                class: "primary",
                r#type: "button",
                onclick: move |_| on_intent.call(QuizIntent::PlayAgain),
                "Play again"
            }
        }
    }
}
