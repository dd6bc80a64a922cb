use crate::domain::notification::{ActivityAction, NotificationMessage};

/// Shown in place of an actor whose name could not be resolved.
pub const UNKNOWN_ACTOR: &str = "Someone";

pub fn compose(action: &ActivityAction, actor_name: &str, subject_label: &str) -> NotificationMessage {
    let actor = match actor_name.trim() {
        "" => UNKNOWN_ACTOR,
        name => name,
    };

    let (title, body) = match action {
        ActivityAction::Create => (
            "New item added",
            format!("{actor} added \"{subject_label}\" to the collection"),
        ),
        ActivityAction::Update => ("Item updated", format!("{actor} edited \"{subject_label}\"")),
        ActivityAction::Delete => (
            "Item removed",
            format!("{actor} removed \"{subject_label}\" from the collection"),
        ),
        ActivityAction::Other(_) => ("Activity", format!("{actor} changed \"{subject_label}\"")),
    };

    NotificationMessage {
        title: title.to_string(),
        body,
    }
}
