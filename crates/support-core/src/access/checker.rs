//! ============================================================================
//! Access Checker - Restriction resolution and product ownership
//! ============================================================================
//! Answers the two questions every gate decision is built from:
//! - is this forum/topic restricted, and by which product?
//! - does this user own that product?
//!
//! Every lookup fails soft: a missing link, a missing flag, a store error, or
//! an anonymous user resolves to "not restricted" / "does not own".
//! ============================================================================

use tracing::{debug, warn};

use crate::store::SupportStore;
use crate::types::{ForumId, OrderStatus, ProductId, TopicId, UserId};

/// Order statuses that count as ownership. Deliberately narrower than the
/// commerce system's own default purchase-status set: refunded, cancelled,
/// pending, and on-hold orders never grant access.
pub const PURCHASE_STATUSES: &[OrderStatus] = &[OrderStatus::Processing, OrderStatus::Completed];

/// Resolves restriction and ownership facts against a host store.
pub struct AccessChecker<'a, S: SupportStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: SupportStore + ?Sized> AccessChecker<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// The product restricting a forum, if any.
    ///
    /// A forum with no connected product is never restricted, regardless of
    /// any stray flag values elsewhere.
    pub fn forum_restriction(&self, forum: ForumId) -> Option<ProductId> {
        let product = match self.store.product_for_forum(forum) {
            Ok(product) => product?,
            Err(e) => {
                warn!("forum {} product lookup failed: {} - treating as unrestricted", forum, e);
                return None;
            }
        };
        self.restriction_for(product)
    }

    /// The product restricting a topic directly (its own connected product,
    /// not its parent forum's).
    pub fn topic_restriction(&self, topic: TopicId) -> Option<ProductId> {
        let product = match self.store.product_for_topic(topic) {
            Ok(product) => product?,
            Err(e) => {
                warn!("topic {} product lookup failed: {} - treating as unrestricted", topic, e);
                return None;
            }
        };
        self.restriction_for(product)
    }

    fn restriction_for(&self, product: ProductId) -> Option<ProductId> {
        match self.store.restricts_access(product) {
            Ok(true) => Some(product),
            Ok(false) => None,
            Err(e) => {
                warn!("product {} restrict flag lookup failed: {} - treating as unrestricted", product, e);
                None
            }
        }
    }

    /// Whether the user owns the product, counting only orders in
    /// [`PURCHASE_STATUSES`].
    ///
    /// Anonymous users resolve false immediately, without touching the order
    /// store.
    pub fn user_owns_product(&self, user: Option<UserId>, product: ProductId) -> bool {
        let Some(user) = user else {
            debug!("ownership check for product {}: anonymous user, skipping query", product);
            return false;
        };

        match self
            .store
            .customer_bought_product(user, product, PURCHASE_STATUSES)
        {
            Ok(owned) => owned,
            Err(e) => {
                warn!("ownership query failed for user {} product {}: {} - resolving false", user, product, e);
                false
            }
        }
    }

    /// Whether the user holds the administrative bypass capability.
    pub fn can_manage(&self, user: Option<UserId>) -> bool {
        let Some(user) = user else { return false };
        match self.store.can_manage(user) {
            Ok(admin) => admin,
            Err(e) => {
                warn!("capability lookup failed for user {}: {} - resolving false", user, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn restricted_fixture() -> MemoryStore {
        let mut store = MemoryStore::new();
        store.add_product(ProductId(5), "Widget Pro");
        store.add_forum(ForumId(10), "Widget Pro Support");
        store.connect_forum(ForumId(10), ProductId(5));
        store.set_restricted(ProductId(5), true);
        store
    }

    #[test]
    fn test_forum_with_no_product_never_restricted() {
        let mut store = MemoryStore::new();
        // A stray restrict flag on an unconnected product must not leak.
        store.add_product(ProductId(5), "Widget Pro");
        store.set_restricted(ProductId(5), true);
        store.add_forum(ForumId(10), "General");

        let checker = AccessChecker::new(&store);
        assert_eq!(checker.forum_restriction(ForumId(10)), None);
        assert_eq!(checker.forum_restriction(ForumId(0)), None);
    }

    #[test]
    fn test_unflagged_product_not_restricted() {
        let mut store = restricted_fixture();
        store.set_restricted(ProductId(5), false);

        let checker = AccessChecker::new(&store);
        assert_eq!(checker.forum_restriction(ForumId(10)), None);
    }

    #[test]
    fn test_flagged_product_restricts_forum() {
        let store = restricted_fixture();
        let checker = AccessChecker::new(&store);
        assert_eq!(checker.forum_restriction(ForumId(10)), Some(ProductId(5)));
    }

    #[test]
    fn test_topic_restriction_is_independent() {
        let mut store = restricted_fixture();
        store.add_product(ProductId(6), "Widget Lite");
        store.set_restricted(ProductId(6), true);
        store.connect_topic(TopicId(42), ProductId(6));

        let checker = AccessChecker::new(&store);
        assert_eq!(checker.topic_restriction(TopicId(42)), Some(ProductId(6)));
        assert_eq!(checker.topic_restriction(TopicId(43)), None);
    }

    #[test]
    fn test_anonymous_never_owns_without_query() {
        let store = restricted_fixture();
        let checker = AccessChecker::new(&store);

        assert!(!checker.user_owns_product(None, ProductId(5)));
        assert_eq!(store.order_query_count(), 0);
    }

    #[test]
    fn test_only_processing_and_completed_count() {
        let mut store = restricted_fixture();
        store.add_order(UserId(7), ProductId(5), OrderStatus::Refunded);
        store.add_order(UserId(8), ProductId(5), OrderStatus::Completed);
        store.add_order(UserId(9), ProductId(5), OrderStatus::Processing);
        store.add_order(UserId(11), ProductId(5), OrderStatus::Pending);
        store.add_order(UserId(12), ProductId(5), OrderStatus::OnHold);
        store.add_order(UserId(13), ProductId(5), OrderStatus::Cancelled);

        let checker = AccessChecker::new(&store);
        assert!(!checker.user_owns_product(Some(UserId(7)), ProductId(5)));
        assert!(checker.user_owns_product(Some(UserId(8)), ProductId(5)));
        assert!(checker.user_owns_product(Some(UserId(9)), ProductId(5)));
        assert!(!checker.user_owns_product(Some(UserId(11)), ProductId(5)));
        assert!(!checker.user_owns_product(Some(UserId(12)), ProductId(5)));
        assert!(!checker.user_owns_product(Some(UserId(13)), ProductId(5)));
    }

    #[test]
    fn test_ownership_check_leaves_default_statuses_alone() {
        use crate::store::OrderStore;

        let mut store = restricted_fixture();
        store.add_order(UserId(7), ProductId(5), OrderStatus::Completed);
        let before = store.default_purchase_statuses();

        let checker = AccessChecker::new(&store);
        assert!(checker.user_owns_product(Some(UserId(7)), ProductId(5)));
        assert!(!checker.user_owns_product(Some(UserId(8)), ProductId(5)));

        assert_eq!(store.default_purchase_statuses(), before);
    }

    #[test]
    fn test_can_manage() {
        let mut store = MemoryStore::new();
        store.grant_admin(UserId(1));

        let checker = AccessChecker::new(&store);
        assert!(checker.can_manage(Some(UserId(1))));
        assert!(!checker.can_manage(Some(UserId(2))));
        assert!(!checker.can_manage(None));
    }
}
