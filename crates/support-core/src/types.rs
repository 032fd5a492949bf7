//! ============================================================================
//! Core Types for Product Support
//! ============================================================================
//! Identifier newtypes, commerce order statuses, and the view context that
//! every access decision is evaluated against. All IDs are opaque handles
//! minted by the host platform; this crate never interprets their values.
//! ============================================================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// A commerce product owned by the host's catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u64);

/// A discussion forum (or group) owned by the host's forum software.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ForumId(pub u64);

/// A topic inside a forum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicId(pub u64);

/// A registered user. Anonymous visitors are represented as `Option::None`
/// at the API seams, never as a sentinel ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ForumId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for TopicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Commerce order status, as reported by the host's order records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Processing,
    #[serde(rename = "on-hold")]
    OnHold,
    Completed,
    Cancelled,
    Refunded,
    Failed,
}

impl OrderStatus {
    /// The host-side status slug (matches the commerce system's own naming).
    pub fn slug(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::OnHold => "on-hold",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Refunded => "refunded",
            OrderStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// What the visitor is currently looking at.
///
/// Restriction checks are only meaningful inside a single forum or a single
/// topic; on index/archive views every gate is a no-op. The context is always
/// passed explicitly — the gate never reads ambient request state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "view")]
pub enum ViewContext {
    /// Forum index, archive, search results — anything that is not a single
    /// forum or topic.
    Index,
    /// A single forum's topic listing.
    SingleForum { forum: ForumId },
    /// A single topic and its replies. Carries the parent forum so the gate
    /// can fall back from topic-level to forum-level restriction.
    SingleTopic { topic: TopicId, forum: ForumId },
}

impl ViewContext {
    /// The forum governing this view, if any.
    pub fn forum(&self) -> Option<ForumId> {
        match self {
            ViewContext::Index => None,
            ViewContext::SingleForum { forum } => Some(*forum),
            ViewContext::SingleTopic { forum, .. } => Some(*forum),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_slugs() {
        assert_eq!(OrderStatus::Processing.slug(), "processing");
        assert_eq!(OrderStatus::OnHold.slug(), "on-hold");
        assert_eq!(OrderStatus::Completed.to_string(), "completed");
    }

    #[test]
    fn test_order_status_serde_matches_slug() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Processing,
            OrderStatus::OnHold,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
            OrderStatus::Refunded,
            OrderStatus::Failed,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.slug()));
        }
    }

    #[test]
    fn test_view_context_forum() {
        assert_eq!(ViewContext::Index.forum(), None);
        assert_eq!(
            ViewContext::SingleForum { forum: ForumId(10) }.forum(),
            Some(ForumId(10))
        );
        assert_eq!(
            ViewContext::SingleTopic {
                topic: TopicId(42),
                forum: ForumId(10)
            }
            .forum(),
            Some(ForumId(10))
        );
    }

    #[test]
    fn test_id_serde_transparent() {
        let id = ProductId(5);
        assert_eq!(serde_json::to_string(&id).unwrap(), "5");
        let back: ProductId = serde_json::from_str("5").unwrap();
        assert_eq!(back, id);
    }
}
