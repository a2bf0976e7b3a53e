/// Countdown label shown under the question.
#[must_use]
pub fn format_remaining(secs: u32) -> String {
    if secs == 1 {
        "Time remaining: 1 second".to_string()
    } else {
        format!("Time remaining: {secs} seconds")
    }
}
