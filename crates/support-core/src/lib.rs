//! ============================================================================
//! SUPPORT-CORE: Purchase-gated support forum engine
//! ============================================================================
//! This crate decides who may see and post to product-support forum content:
//! - Access gate: allow / deny / deny-with-notice decisions per view
//! - Ownership checks against commerce order records (processing/completed)
//! - Support-link rendering for products and customers
//! - Forum provisioning on product publish, membership sync on order completion
//!
//! All durable data lives in the host platform; it plugs in through the
//! read-only traits in [`store`] and the write seams in [`provision`].
//! ============================================================================

pub mod access;
pub mod links;
pub mod provision;
pub mod store;
pub mod types;

// Re-export main types for convenience
pub use access::{AccessDecision, AccessGate, FeedbackOverrides, MessageKey, RestrictionNotice};
pub use links::SupportLinks;
pub use provision::{ProvisionConfig, Provisioner};
pub use store::{ContentStore, MemoryStore, OrderStore, StoreError, SupportStore, UserStore};
pub use types::{ForumId, OrderStatus, ProductId, TopicId, UserId, ViewContext};
