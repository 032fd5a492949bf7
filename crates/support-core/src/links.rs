//! ============================================================================
//! Support Links - Forum link rendering for products and customers
//! ============================================================================
//! Navigational helpers: the permalink of a product's support forum, a
//! formatted anchor for it, and the list of support-forum links for everything
//! a customer has ordered. These render links only; they make no access
//! decisions (a restricted forum's link still appears — the gate takes over
//! once the visitor arrives).
//! ============================================================================

use tracing::warn;
use url::Url;

use crate::access::escape_html;
use crate::store::{ContentStore, OrderStore};
use crate::types::{ProductId, UserId};

/// CSS class carried by every rendered user forum list.
pub const USER_FORUM_LIST_CLASS: &str = "product-support-user-forum-list";

/// Renders support-forum links against a host store.
pub struct SupportLinks<'a, S: ContentStore + OrderStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: ContentStore + OrderStore + ?Sized> SupportLinks<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Raw permalink of the product's support forum, if one is connected.
    pub fn forum_permalink(&self, product: ProductId) -> Option<Url> {
        let forum = match self.store.support_forum_for_product(product) {
            Ok(forum) => forum?,
            Err(e) => {
                warn!("support forum lookup failed for product {}: {}", product, e);
                return None;
            }
        };
        match self.store.forum_permalink(forum) {
            Ok(link) => link,
            Err(e) => {
                warn!("permalink lookup failed for forum {}: {}", forum, e);
                None
            }
        }
    }

    /// Formatted anchor for the product's support forum.
    pub fn forum_link_html(&self, product: ProductId) -> Option<String> {
        let forum = match self.store.support_forum_for_product(product) {
            Ok(forum) => forum?,
            Err(e) => {
                warn!("support forum lookup failed for product {}: {}", product, e);
                return None;
            }
        };
        let link = self.store.forum_permalink(forum).ok().flatten()?;
        let title = self
            .store
            .forum_title(forum)
            .ok()
            .flatten()
            .unwrap_or_else(|| link.to_string());
        Some(format!("<a href=\"{}\">{}</a>", link, escape_html(&title)))
    }

    /// `<ul>` of support-forum links for every product the user has ordered,
    /// in any status. Returns an empty string for users with no orders.
    ///
    /// `extra_classes` lets the embedder append its own CSS classes, matching
    /// the host-side filter the original markup exposed.
    pub fn user_forum_list_html(&self, user: UserId, extra_classes: &[&str]) -> String {
        let purchases = match self.store.purchased_products(user) {
            Ok(purchases) => purchases,
            Err(e) => {
                warn!("order lookup failed for user {}: {}", user, e);
                return String::new();
            }
        };
        if purchases.is_empty() {
            return String::new();
        }

        let mut classes: Vec<String> = extra_classes.iter().map(|c| c.to_string()).collect();
        classes.push(USER_FORUM_LIST_CLASS.to_string());
        classes.push(format!("product-support-user-{user}"));

        let mut list = format!("<ul class=\"{}\">", classes.join(" "));
        for product in purchases {
            if let Some(link) = self.forum_link_html(product) {
                list.push_str(&format!("<li>{}</li>", link));
            }
        }
        list.push_str("</ul>");
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::types::{ForumId, OrderStatus};

    fn fixture() -> MemoryStore {
        let mut store = MemoryStore::new();
        store.add_product(ProductId(5), "Widget Pro");
        store.add_forum(ForumId(10), "Widget Pro Support");
        store.connect_forum(ForumId(10), ProductId(5));
        store.add_product(ProductId(6), "Widget Lite");
        store
    }

    #[test]
    fn test_forum_permalink() {
        let store = fixture();
        let links = SupportLinks::new(&store);

        let url = links.forum_permalink(ProductId(5)).unwrap();
        assert_eq!(url.as_str(), "https://shop.example.test/forums/forum/10/");
        // No forum connected to Widget Lite.
        assert!(links.forum_permalink(ProductId(6)).is_none());
    }

    #[test]
    fn test_forum_link_html() {
        let store = fixture();
        let links = SupportLinks::new(&store);

        let html = links.forum_link_html(ProductId(5)).unwrap();
        assert_eq!(
            html,
            "<a href=\"https://shop.example.test/forums/forum/10/\">Widget Pro Support</a>"
        );
    }

    #[test]
    fn test_user_forum_list_includes_all_order_statuses() {
        let mut store = fixture();
        // Navigational list follows the customer's orders in any status.
        store.add_order(UserId(7), ProductId(5), OrderStatus::Refunded);
        let links = SupportLinks::new(&store);

        let list = links.user_forum_list_html(UserId(7), &[]);
        assert!(list.contains(USER_FORUM_LIST_CLASS));
        assert!(list.contains("product-support-user-7"));
        assert!(list.contains("Widget Pro Support"));
    }

    #[test]
    fn test_user_forum_list_empty_without_orders() {
        let store = fixture();
        let links = SupportLinks::new(&store);
        assert_eq!(links.user_forum_list_html(UserId(7), &[]), "");
    }

    #[test]
    fn test_user_forum_list_skips_products_without_forums() {
        let mut store = fixture();
        store.add_order(UserId(7), ProductId(6), OrderStatus::Completed);
        let links = SupportLinks::new(&store);

        let list = links.user_forum_list_html(UserId(7), &[]);
        assert!(!list.contains("<li>"));
    }

    #[test]
    fn test_extra_classes_are_rendered() {
        let mut store = fixture();
        store.add_order(UserId(7), ProductId(5), OrderStatus::Completed);
        let links = SupportLinks::new(&store);

        let list = links.user_forum_list_html(UserId(7), &["sidebar-widget"]);
        assert!(list.contains("sidebar-widget"));
    }
}
