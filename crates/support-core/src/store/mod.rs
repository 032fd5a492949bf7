//! ============================================================================
//! Store Module - Host storage seams
//! ============================================================================
//! The host platform owns every durable record this crate consumes: product
//! metadata, forum/topic metadata, commerce orders, and user capabilities.
//! These traits are the read-only seams a host implements to plug its storage
//! in. The crate ships `MemoryStore`, an in-process reference backend used by
//! the test suite and by embedders that want a worked example.
//! ============================================================================

mod memory;

pub use memory::MemoryStore;

use thiserror::Error;
use url::Url;

use crate::types::{ForumId, OrderStatus, ProductId, TopicId, UserId};

/// Errors surfaced by a storage backend.
///
/// Callers inside this crate treat every variant as "fail soft": a lookup
/// error resolves to not-restricted / not-owned rather than propagating.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend could not be reached at all.
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    /// A single lookup failed.
    #[error("storage lookup failed: {0}")]
    Lookup(String),
}

/// Read-only access to product/forum/topic metadata.
pub trait ContentStore {
    /// The product connected to a forum, if any.
    fn product_for_forum(&self, forum: ForumId) -> Result<Option<ProductId>, StoreError>;

    /// The product connected directly to a topic, if any. A topic may carry
    /// its own product link independent of its parent forum's.
    fn product_for_topic(&self, topic: TopicId) -> Result<Option<ProductId>, StoreError>;

    /// Whether the product's "restrict access" flag is set.
    fn restricts_access(&self, product: ProductId) -> Result<bool, StoreError>;

    /// Display title of a product.
    fn product_title(&self, product: ProductId) -> Result<Option<String>, StoreError>;

    /// Public permalink of a product.
    fn product_permalink(&self, product: ProductId) -> Result<Option<Url>, StoreError>;

    /// Display title of a forum.
    fn forum_title(&self, forum: ForumId) -> Result<Option<String>, StoreError>;

    /// Public permalink of a forum.
    fn forum_permalink(&self, forum: ForumId) -> Result<Option<Url>, StoreError>;

    /// Reverse lookup: the support forum connected to a product. When several
    /// forums point at the same product the host returns the first match.
    fn support_forum_for_product(&self, product: ProductId)
        -> Result<Option<ForumId>, StoreError>;
}

/// Read-only access to commerce order records.
pub trait OrderStore {
    /// Whether the user has at least one order containing the product with a
    /// status in `statuses`.
    ///
    /// The allowed status set is an explicit per-call argument. Implementations
    /// must not treat it as configuration: the store's own default status set
    /// is never consulted or modified by this query.
    fn customer_bought_product(
        &self,
        user: UserId,
        product: ProductId,
        statuses: &[OrderStatus],
    ) -> Result<bool, StoreError>;

    /// The status set the commerce system itself considers a completed
    /// purchase. Only exposed so callers (and tests) can observe that
    /// ownership checks leave it untouched.
    fn default_purchase_statuses(&self) -> Vec<OrderStatus>;

    /// Every product the user has ordered, in any status. Used for the
    /// navigational support-forum list, not for access decisions.
    fn purchased_products(&self, user: UserId) -> Result<Vec<ProductId>, StoreError>;
}

/// Read-only access to user capabilities.
pub trait UserStore {
    /// Whether the user holds the administrative capability that bypasses
    /// every restriction (the host's `manage_options` equivalent).
    fn can_manage(&self, user: UserId) -> Result<bool, StoreError>;
}

/// Convenience supertrait for backends that implement all three seams.
pub trait SupportStore: ContentStore + OrderStore + UserStore {}

impl<T: ContentStore + OrderStore + UserStore + ?Sized> SupportStore for T {}
