//! ============================================================================
//! MemoryStore - In-process reference backend
//! ============================================================================
//! Implements every storage seam against plain HashMaps. Used throughout the
//! test suite as the stand-in host platform, and usable by embedders as a
//! worked example of the trait contracts.
//! ============================================================================

use std::cell::Cell;
use std::collections::{HashMap, HashSet};

use anyhow::{anyhow, Result};
use tracing::debug;
use url::Url;

use super::{ContentStore, OrderStore, StoreError, UserStore};
use crate::provision::{ForumHost, NewForum, NewTopic, SupportMetaWriter};
use crate::types::{ForumId, OrderStatus, ProductId, TopicId, UserId};

/// One order line: a user bought a product, and the order sits in a status.
#[derive(Debug, Clone)]
struct OrderLine {
    user: UserId,
    product: ProductId,
    status: OrderStatus,
}

/// In-memory host platform.
///
/// Evaluation is single-request and single-threaded, so interior counters use
/// `Cell` rather than atomics.
pub struct MemoryStore {
    base_url: Url,
    next_id: Cell<u64>,

    // Content metadata
    forum_products: HashMap<ForumId, ProductId>,
    topic_products: HashMap<TopicId, ProductId>,
    restricted: HashSet<ProductId>,
    product_titles: HashMap<ProductId, String>,
    forum_titles: HashMap<ForumId, String>,
    support_forums: HashMap<ProductId, ForumId>,
    support_enabled: HashSet<ProductId>,

    // Forum content created through provisioning
    topics: HashMap<TopicId, NewTopic>,
    members: HashMap<ForumId, HashSet<UserId>>,

    // Commerce
    orders: Vec<OrderLine>,
    default_statuses: Vec<OrderStatus>,
    order_queries: Cell<u64>,

    // Users
    admins: HashSet<UserId>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            base_url: Url::parse("https://shop.example.test/").expect("static base url"),
            next_id: Cell::new(1000),
            forum_products: HashMap::new(),
            topic_products: HashMap::new(),
            restricted: HashSet::new(),
            product_titles: HashMap::new(),
            forum_titles: HashMap::new(),
            support_forums: HashMap::new(),
            support_enabled: HashSet::new(),
            topics: HashMap::new(),
            members: HashMap::new(),
            orders: Vec::new(),
            // The commerce system's own notion of a "completed purchase" is
            // deliberately broader than what ownership checks are allowed to
            // count.
            default_statuses: vec![
                OrderStatus::Pending,
                OrderStatus::Processing,
                OrderStatus::OnHold,
                OrderStatus::Completed,
            ],
            order_queries: Cell::new(0),
            admins: HashSet::new(),
        }
    }

    // ========================================================================
    // Fixture setup
    // ========================================================================

    pub fn add_product(&mut self, product: ProductId, title: &str) {
        self.product_titles.insert(product, title.to_string());
    }

    pub fn add_forum(&mut self, forum: ForumId, title: &str) {
        self.forum_titles.insert(forum, title.to_string());
    }

    /// Link a forum to its product (both directions, as the host's meta does).
    pub fn connect_forum(&mut self, forum: ForumId, product: ProductId) {
        self.forum_products.insert(forum, product);
        self.support_forums.entry(product).or_insert(forum);
    }

    /// Link a topic directly to a product, independent of its parent forum.
    pub fn connect_topic(&mut self, topic: TopicId, product: ProductId) {
        self.topic_products.insert(topic, product);
    }

    pub fn set_restricted(&mut self, product: ProductId, restricted: bool) {
        if restricted {
            self.restricted.insert(product);
        } else {
            self.restricted.remove(&product);
        }
    }

    pub fn add_order(&mut self, user: UserId, product: ProductId, status: OrderStatus) {
        self.orders.push(OrderLine {
            user,
            product,
            status,
        });
    }

    pub fn grant_admin(&mut self, user: UserId) {
        self.admins.insert(user);
    }

    // ========================================================================
    // Introspection used by tests
    // ========================================================================

    /// Number of order-record queries issued so far.
    pub fn order_query_count(&self) -> u64 {
        self.order_queries.get()
    }

    /// Whether a user was added to a forum's member roster.
    pub fn is_member(&self, forum: ForumId, user: UserId) -> bool {
        self.members
            .get(&forum)
            .is_some_and(|roster| roster.contains(&user))
    }

    /// Whether support was enabled for a product via provisioning.
    pub fn support_enabled(&self, product: ProductId) -> bool {
        self.support_enabled.contains(&product)
    }

    /// Topics created through the `ForumHost` seam, for a forum.
    pub fn topics_in(&self, forum: ForumId) -> Vec<&NewTopic> {
        self.topics.values().filter(|t| t.forum == forum).collect()
    }

    fn mint_id(&self) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }
}

impl ContentStore for MemoryStore {
    fn product_for_forum(&self, forum: ForumId) -> Result<Option<ProductId>, StoreError> {
        Ok(self.forum_products.get(&forum).copied())
    }

    fn product_for_topic(&self, topic: TopicId) -> Result<Option<ProductId>, StoreError> {
        Ok(self.topic_products.get(&topic).copied())
    }

    fn restricts_access(&self, product: ProductId) -> Result<bool, StoreError> {
        Ok(self.restricted.contains(&product))
    }

    fn product_title(&self, product: ProductId) -> Result<Option<String>, StoreError> {
        Ok(self.product_titles.get(&product).cloned())
    }

    fn product_permalink(&self, product: ProductId) -> Result<Option<Url>, StoreError> {
        if !self.product_titles.contains_key(&product) {
            return Ok(None);
        }
        let link = self
            .base_url
            .join(&format!("product/{product}/"))
            .map_err(|e| StoreError::Lookup(e.to_string()))?;
        Ok(Some(link))
    }

    fn forum_title(&self, forum: ForumId) -> Result<Option<String>, StoreError> {
        Ok(self.forum_titles.get(&forum).cloned())
    }

    fn forum_permalink(&self, forum: ForumId) -> Result<Option<Url>, StoreError> {
        if !self.forum_titles.contains_key(&forum) {
            return Ok(None);
        }
        let link = self
            .base_url
            .join(&format!("forums/forum/{forum}/"))
            .map_err(|e| StoreError::Lookup(e.to_string()))?;
        Ok(Some(link))
    }

    fn support_forum_for_product(
        &self,
        product: ProductId,
    ) -> Result<Option<ForumId>, StoreError> {
        Ok(self.support_forums.get(&product).copied())
    }
}

impl OrderStore for MemoryStore {
    fn customer_bought_product(
        &self,
        user: UserId,
        product: ProductId,
        statuses: &[OrderStatus],
    ) -> Result<bool, StoreError> {
        self.order_queries.set(self.order_queries.get() + 1);
        let owned = self
            .orders
            .iter()
            .any(|o| o.user == user && o.product == product && statuses.contains(&o.status));
        debug!("order query: user {} product {} -> {}", user, product, owned);
        Ok(owned)
    }

    fn default_purchase_statuses(&self) -> Vec<OrderStatus> {
        self.default_statuses.clone()
    }

    fn purchased_products(&self, user: UserId) -> Result<Vec<ProductId>, StoreError> {
        let mut seen = HashSet::new();
        let mut products = Vec::new();
        for order in self.orders.iter().filter(|o| o.user == user) {
            if seen.insert(order.product) {
                products.push(order.product);
            }
        }
        Ok(products)
    }
}

impl UserStore for MemoryStore {
    fn can_manage(&self, user: UserId) -> Result<bool, StoreError> {
        Ok(self.admins.contains(&user))
    }
}

impl ForumHost for MemoryStore {
    fn create_forum(&mut self, forum: NewForum) -> Result<ForumId> {
        let id = ForumId(self.mint_id());
        self.forum_titles.insert(id, forum.title);
        self.members.insert(id, HashSet::new());
        Ok(id)
    }

    fn create_topic(&mut self, topic: NewTopic) -> Result<TopicId> {
        if !self.forum_titles.contains_key(&topic.forum) {
            return Err(anyhow!("no such forum: {}", topic.forum));
        }
        let id = TopicId(self.mint_id());
        self.topics.insert(id, topic);
        Ok(id)
    }

    fn add_member(&mut self, forum: ForumId, user: UserId) -> Result<()> {
        if !self.forum_titles.contains_key(&forum) {
            return Err(anyhow!("no such forum: {}", forum));
        }
        self.members.entry(forum).or_default().insert(user);
        Ok(())
    }
}

impl SupportMetaWriter for MemoryStore {
    fn save_support_settings(
        &mut self,
        product: ProductId,
        enabled: bool,
        forum: Option<ForumId>,
    ) -> Result<()> {
        if enabled {
            self.support_enabled.insert(product);
        } else {
            self.support_enabled.remove(&product);
        }
        if let Some(forum) = forum {
            self.support_forums.insert(product, forum);
            self.forum_products.insert(forum, product);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connected_product_lookup() {
        let mut store = MemoryStore::new();
        store.add_product(ProductId(5), "Widget Pro");
        store.add_forum(ForumId(10), "Widget Pro Support");
        store.connect_forum(ForumId(10), ProductId(5));

        assert_eq!(
            store.product_for_forum(ForumId(10)).unwrap(),
            Some(ProductId(5))
        );
        assert_eq!(store.product_for_forum(ForumId(11)).unwrap(), None);
        assert_eq!(
            store.support_forum_for_product(ProductId(5)).unwrap(),
            Some(ForumId(10))
        );
    }

    #[test]
    fn test_order_query_respects_explicit_statuses() {
        let mut store = MemoryStore::new();
        store.add_order(UserId(7), ProductId(5), OrderStatus::Refunded);

        assert!(!store
            .customer_bought_product(
                UserId(7),
                ProductId(5),
                &[OrderStatus::Processing, OrderStatus::Completed]
            )
            .unwrap());
        assert!(store
            .customer_bought_product(UserId(7), ProductId(5), &[OrderStatus::Refunded])
            .unwrap());
    }

    #[test]
    fn test_purchased_products_deduplicates() {
        let mut store = MemoryStore::new();
        store.add_order(UserId(7), ProductId(5), OrderStatus::Completed);
        store.add_order(UserId(7), ProductId(5), OrderStatus::Refunded);
        store.add_order(UserId(7), ProductId(6), OrderStatus::Pending);

        let products = store.purchased_products(UserId(7)).unwrap();
        assert_eq!(products, vec![ProductId(5), ProductId(6)]);
    }

    #[test]
    fn test_permalinks_only_for_known_content() {
        let mut store = MemoryStore::new();
        store.add_product(ProductId(5), "Widget Pro");

        assert!(store.product_permalink(ProductId(5)).unwrap().is_some());
        assert!(store.product_permalink(ProductId(99)).unwrap().is_none());
        assert!(store.forum_permalink(ForumId(99)).unwrap().is_none());
    }
}
