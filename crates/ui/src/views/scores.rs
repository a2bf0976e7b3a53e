use dioxus::prelude::*;

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{ScoreRowVm, map_score_rows};

const RECENT_LIMIT: usize = 50;

#[component]
pub fn ScoresView() -> Element {
    let ctx = use_context::<AppContext>();
    let score_history = ctx.score_history();

    let resource = use_resource(move || {
        let score_history = score_history.clone();
        async move {
            let items = score_history
                .recent(RECENT_LIMIT)
                .await
                .map_err(|_| ViewError::Unknown)?;
            Ok::<_, ViewError>(map_score_rows(&items))
        }
    });

    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page",
            h2 { "Scores" }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(rows) => rsx! {
                    if rows.is_empty() {
                        p { "No quizzes played yet." }
                    } else {
                        table { class: "scores-table",
                            thead {
                                tr {
                                    th { "Player" }
                                    th { "Category" }
                                    th { "Score" }
                                    th { "%" }
                                }
                            }
                            tbody {
                                for row in rows {
                                    ScoreRow { row }
                                }
                            }
                        }
                    }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                },
            }
        }
    }
}

#[component]
fn ScoreRow(row: ScoreRowVm) -> Element {
    rsx! {
        tr {
            td { "{row.username}" }
            td { "{row.category}" }
            td { "{row.score_label}" }
            td { "{row.percent_label}" }
        }
    }
}
