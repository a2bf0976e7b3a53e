use services::ScoreListItem;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreRowVm {
    pub username: String,
    pub category: String,
    pub score_label: String,
    pub percent_label: String,
}

#[must_use]
pub fn map_score_rows(items: &[ScoreListItem]) -> Vec<ScoreRowVm> {
    items
        .iter()
        .map(|item| ScoreRowVm {
            username: item.username.clone(),
            category: item.category.clone(),
            score_label: format!("{}/{}", item.score, item.total),
            percent_label: item
                .percent
                .map_or_else(|| "-".to_string(), |percent| format!("{percent}%")),
        })
        .collect()
}
