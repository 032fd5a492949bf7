//! ============================================================================
//! Access Module - Purchase-gated content restriction
//! ============================================================================
//! Decides whether forum content is shown, hidden, or replaced with a
//! restriction notice, based on product ownership.
//!
//! ## Outcomes
//! - **Allow**: content renders unchanged
//! - **Deny**: content is suppressed with no explanation (forum listings)
//! - **DenyWithNotice**: content is replaced by a notice linking the product
//!
//! ## Usage
//! ```rust,ignore
//! use support_core::access::AccessGate;
//!
//! let gate = AccessGate::new(&store);
//! let decision = gate.evaluate_topic_access(topic, forum, Some(user));
//! ```
//! ============================================================================

mod checker;
mod feedback;
mod gate;
mod types;

pub(crate) use types::escape_html;

// Re-export public types
pub use checker::{AccessChecker, PURCHASE_STATUSES};
pub use feedback::{FeedbackOverrides, MessageKey};
pub use gate::AccessGate;
pub use types::{
    AccessDecision, RestrictionNotice, TopicQuery, NO_ACCESS_POST_TYPE, TOPIC_POST_TYPE,
};
