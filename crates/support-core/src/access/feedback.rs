//! ============================================================================
//! Feedback Messages - Keyed overrides for host UI strings
//! ============================================================================
//! When a restricted view denies a visitor, the forum software's stock
//! feedback strings ("no topics found", "cannot reply", ...) are replaced with
//! wording that names product ownership as the requirement. Overrides are
//! keyed by an explicit (scope, message) enumeration; the only string matching
//! offered is a helper that maps the host's stock text back to a key, for
//! hosts that surface nothing else.
//! ============================================================================

use std::borrow::Cow;
use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// The host feedback messages this crate knows how to replace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKey {
    /// Shown when a forum's topic listing comes back empty.
    NoTopicsFound,
    /// Shown when the visitor may not reply to the current topic.
    CannotReply,
    /// Shown when the visitor may not open new topics.
    CannotCreateTopics,
}

impl MessageKey {
    pub const ALL: [MessageKey; 3] = [
        MessageKey::NoTopicsFound,
        MessageKey::CannotReply,
        MessageKey::CannotCreateTopics,
    ];

    /// The forum software's stock wording for this message.
    pub fn default_text(&self) -> &'static str {
        match self {
            MessageKey::NoTopicsFound => "Oh bother! No topics were found here!",
            MessageKey::CannotReply => "You cannot reply to this topic.",
            MessageKey::CannotCreateTopics => "You cannot create new topics at this time.",
        }
    }

    /// Map stock wording back to its key. Exact match only: any other string
    /// belongs to something else on the page and must pass through untouched.
    pub fn from_default_text(text: &str) -> Option<Self> {
        static BY_TEXT: Lazy<HashMap<&'static str, MessageKey>> = Lazy::new(|| {
            MessageKey::ALL
                .iter()
                .map(|key| (key.default_text(), *key))
                .collect()
        });
        BY_TEXT.get(text).copied()
    }
}

/// Which kind of restricted view the overrides were built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Scope {
    Topic,
    Forum,
}

/// The set of message overrides active for one rendered view.
///
/// Built by [`AccessGate::feedback_overrides`](crate::access::AccessGate::feedback_overrides);
/// inactive outside restricted single-topic / single-forum views, in which
/// case every message passes through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackOverrides {
    scope: Option<Scope>,
}

impl FeedbackOverrides {
    /// No overrides: every message passes through.
    pub fn none() -> Self {
        Self { scope: None }
    }

    pub(crate) fn topic() -> Self {
        Self {
            scope: Some(Scope::Topic),
        }
    }

    pub(crate) fn forum() -> Self {
        Self {
            scope: Some(Scope::Forum),
        }
    }

    pub fn is_active(&self) -> bool {
        self.scope.is_some()
    }

    /// The replacement text for a message in this view, if one applies.
    pub fn message_for(&self, key: MessageKey) -> Option<&'static str> {
        match (self.scope?, key) {
            (Scope::Topic, MessageKey::CannotReply) => {
                Some("Replying to this topic is restricted to product owners.")
            }
            (Scope::Forum, MessageKey::NoTopicsFound) => {
                Some("This forum is restricted to product owners.")
            }
            (Scope::Forum, MessageKey::CannotCreateTopics) => {
                Some("Only product owners can create topics.")
            }
            _ => None,
        }
    }

    /// Convenience for hosts that only surface raw strings: rewrite `text` if
    /// it is exactly one of the stock messages this view overrides.
    pub fn rewrite<'t>(&self, text: &'t str) -> Cow<'t, str> {
        match MessageKey::from_default_text(text).and_then(|key| self.message_for(key)) {
            Some(replacement) => Cow::Borrowed(replacement),
            None => Cow::Borrowed(text),
        }
    }
}
