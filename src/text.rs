//! Pure string helpers for timeline events and commit messages.

/// Kind of a pull-request timeline event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A commit was pushed.
    Committed,
    /// Someone was mentioned.
    Mentioned,
    /// Someone subscribed.
    Subscribed,
    /// A comment was posted.
    Commented,
    /// A review was submitted.
    Reviewed,
    /// Any label not listed above.
    Other,
}

impl EventKind {
    /// Classifies an event label. Matching is exact and case-sensitive;
    /// unknown labels map to [`EventKind::Other`].
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label {
            "committed" => Self::Committed,
            "mentioned" => Self::Mentioned,
            "subscribed" => Self::Subscribed,
            "commented" => Self::Commented,
            "reviewed" => Self::Reviewed,
            _ => Self::Other,
        }
    }

    /// Lowercase name of the kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Committed => "committed",
            Self::Mentioned => "mentioned",
            Self::Subscribed => "subscribed",
            Self::Commented => "commented",
            Self::Reviewed => "reviewed",
            Self::Other => "other",
        }
    }
}

impl From<&str> for EventKind {
    fn from(label: &str) -> Self {
        Self::from_label(label)
    }
}

/// Classifies an event label; see [`EventKind::from_label`].
#[must_use]
pub fn classify_event_kind(label: &str) -> EventKind {
    EventKind::from_label(label)
}

/// Splits a message at its first `\n` into `(title, body)`.
///
/// Without a newline the whole message is the title and the body is empty.
/// Everything after the first newline is returned verbatim.
#[must_use]
pub fn split_title_and_body(message: &str) -> (&str, &str) {
    message.split_once('\n').unwrap_or((message, ""))
}
