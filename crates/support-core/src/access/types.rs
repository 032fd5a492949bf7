//! ============================================================================
//! Access Types - Decisions, notices, and listing queries
//! ============================================================================
//! The outcome vocabulary of the access gate: a three-way decision, the
//! restriction notice shown in place of denied content, and the topic listing
//! query the gate can force into a no-results form.
//! ============================================================================

use serde::{Deserialize, Serialize};
use url::Url;

use crate::types::{ForumId, ProductId};

/// Sentinel post type that matches nothing in the host's listing layer.
pub const NO_ACCESS_POST_TYPE: &str = "no_access";

/// Post type of a normal topic listing.
pub const TOPIC_POST_TYPE: &str = "topic";

/// Outcome of an access evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum AccessDecision {
    /// Show the content unchanged.
    Allow,
    /// Suppress the content entirely (no explanation rendered).
    Deny,
    /// Replace the content with a restriction notice naming the product.
    DenyWithNotice { notice: RestrictionNotice },
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allow)
    }
}

/// The notice rendered in place of restricted content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestrictionNotice {
    /// The product whose ownership unlocks the content.
    pub product: ProductId,
    /// Product display title.
    pub title: String,
    /// Product permalink, when the host can resolve one.
    pub permalink: Option<Url>,
}

impl RestrictionNotice {
    /// Render the notice as the HTML fragment handed back to the host's
    /// content filter.
    pub fn to_html(&self) -> String {
        let product_ref = match &self.permalink {
            Some(link) => format!(
                "<a href=\"{}\">{}</a>",
                link,
                escape_html(&self.title)
            ),
            None => escape_html(&self.title),
        };
        format!(
            "<div class=\"product-support-restricted\">This content is restricted to owners of {}.</div>",
            product_ref
        )
    }
}

/// Minimal escaping for text interpolated into notice markup.
pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// A draft topic-listing query, as the host's listing layer would run it.
///
/// The gate either returns it untouched or rewrites the post type to a
/// sentinel the listing layer can never match, which the host must render as
/// "no results".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicQuery {
    pub post_type: String,
    pub forum: Option<ForumId>,
    pub per_page: Option<u32>,
}

impl TopicQuery {
    /// A query for the topics of one forum.
    pub fn topics(forum: ForumId) -> Self {
        Self {
            post_type: TOPIC_POST_TYPE.to_string(),
            forum: Some(forum),
            per_page: None,
        }
    }

    /// Rewrite the query so it can never match a post.
    pub fn suppress(&mut self) {
        self.post_type = NO_ACCESS_POST_TYPE.to_string();
    }

    pub fn is_suppressed(&self) -> bool {
        self.post_type == NO_ACCESS_POST_TYPE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_html_links_product() {
        let notice = RestrictionNotice {
            product: ProductId(5),
            title: "Widget Pro".to_string(),
            permalink: Some(Url::parse("https://shop.example.test/product/5/").unwrap()),
        };
        let html = notice.to_html();
        assert!(html.contains("Widget Pro"));
        assert!(html.contains("https://shop.example.test/product/5/"));
        assert!(html.starts_with("<div class=\"product-support-restricted\">"));
    }

    #[test]
    fn test_notice_html_without_permalink() {
        let notice = RestrictionNotice {
            product: ProductId(5),
            title: "Widget Pro".to_string(),
            permalink: None,
        };
        let html = notice.to_html();
        assert!(html.contains("Widget Pro"));
        assert!(!html.contains("<a "));
    }

    #[test]
    fn test_notice_escapes_title() {
        let notice = RestrictionNotice {
            product: ProductId(5),
            title: "Widget <Pro> & Co".to_string(),
            permalink: None,
        };
        assert!(notice.to_html().contains("Widget &lt;Pro&gt; &amp; Co"));
    }

    #[test]
    fn test_query_suppression() {
        let mut query = TopicQuery::topics(ForumId(10));
        assert!(!query.is_suppressed());
        query.suppress();
        assert!(query.is_suppressed());
        assert_eq!(query.post_type, NO_ACCESS_POST_TYPE);
        // The forum scope is preserved so the host can still attribute the
        // empty result to the right view.
        assert_eq!(query.forum, Some(ForumId(10)));
    }
}
