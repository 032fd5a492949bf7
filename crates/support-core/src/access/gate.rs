//! ============================================================================
//! Access Gate - Purchase-gated content decisions
//! ============================================================================
//! Decides, per rendered view, whether forum content is shown, hidden, or
//! replaced with a restriction notice. Stateless: every call re-derives
//! restriction and ownership from the host store, with no caching across
//! requests.
//!
//! Resolution order for topic content: administrative bypass, then the topic's
//! own connected product, then the parent forum's. Forum listings only ever
//! consult the forum-level link.
//! ============================================================================

use tracing::{debug, info};

use super::checker::AccessChecker;
use super::feedback::FeedbackOverrides;
use super::types::{AccessDecision, RestrictionNotice, TopicQuery};
use crate::store::SupportStore;
use crate::types::{ForumId, ProductId, TopicId, UserId, ViewContext};

/// Stateless access gate over a host store.
pub struct AccessGate<'a, S: SupportStore + ?Sized> {
    store: &'a S,
    checker: AccessChecker<'a, S>,
}

impl<'a, S: SupportStore + ?Sized> AccessGate<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            checker: AccessChecker::new(store),
        }
    }

    /// Whether the user may see a topic and its replies.
    ///
    /// The topic's own product link takes precedence over the parent forum's;
    /// denial carries a notice naming the restricting product.
    pub fn evaluate_topic_access(
        &self,
        topic: TopicId,
        forum: ForumId,
        user: Option<UserId>,
    ) -> AccessDecision {
        if self.checker.can_manage(user) {
            return AccessDecision::Allow;
        }

        let restricted_to = self
            .checker
            .topic_restriction(topic)
            .or_else(|| self.checker.forum_restriction(forum));

        let Some(product) = restricted_to else {
            return AccessDecision::Allow;
        };

        if self.checker.user_owns_product(user, product) {
            AccessDecision::Allow
        } else {
            info!("topic {} denied: product {} not owned", topic, product);
            AccessDecision::DenyWithNotice {
                notice: self.notice_for(product),
            }
        }
    }

    /// Whether the user may see a forum's topic listing at all.
    ///
    /// Only meaningful in a single-forum view; on index/archive views this is
    /// a no-op. Denial suppresses the listing entirely, with no notice.
    /// Topic-level product links are deliberately never consulted here: a listing
    /// concerns the forum as a whole.
    pub fn evaluate_forum_listing_access(
        &self,
        view: &ViewContext,
        user: Option<UserId>,
    ) -> AccessDecision {
        if self.checker.can_manage(user) {
            return AccessDecision::Allow;
        }

        let ViewContext::SingleForum { forum } = view else {
            return AccessDecision::Allow;
        };

        let Some(product) = self.checker.forum_restriction(*forum) else {
            return AccessDecision::Allow;
        };

        if user.is_none() || !self.checker.user_owns_product(user, product) {
            info!("forum {} listing suppressed: product {} not owned", forum, product);
            AccessDecision::Deny
        } else {
            AccessDecision::Allow
        }
    }

    /// Whether "new topic" / "new reply" controls should be shown in this
    /// view. Collapses the topic-access resolution to a boolean; the controls
    /// are simply omitted, no notice is rendered.
    pub fn evaluate_form_access(&self, view: &ViewContext, user: Option<UserId>) -> bool {
        if self.checker.can_manage(user) {
            return true;
        }

        let restricted_to = match view {
            ViewContext::Index => None,
            ViewContext::SingleForum { forum } => self.checker.forum_restriction(*forum),
            ViewContext::SingleTopic { topic, forum } => self
                .checker
                .topic_restriction(*topic)
                .or_else(|| self.checker.forum_restriction(*forum)),
        };

        match restricted_to {
            None => true,
            Some(product) => self.checker.user_owns_product(user, product),
        }
    }

    /// Listing-query modifier: returns the draft query unchanged, or rewritten
    /// to a form the listing layer must render as "no results".
    pub fn filter_topic_listing(
        &self,
        mut query: TopicQuery,
        view: &ViewContext,
        user: Option<UserId>,
    ) -> TopicQuery {
        if self.evaluate_forum_listing_access(view, user) == AccessDecision::Deny {
            query.suppress();
        }
        query
    }

    /// Content transform: returns the rendered body unchanged, or the
    /// restriction notice HTML when the user is denied.
    pub fn filter_reply_content(
        &self,
        content: &str,
        topic: TopicId,
        forum: ForumId,
        user: Option<UserId>,
    ) -> String {
        match self.evaluate_topic_access(topic, forum, user) {
            AccessDecision::DenyWithNotice { notice } => notice.to_html(),
            _ => content.to_string(),
        }
    }

    /// The feedback-message overrides active for a view.
    ///
    /// Active only inside a restricted single-topic or single-forum view, so
    /// stock messages elsewhere on the site are never altered. Overrides do
    /// not depend on the user: they surface wherever the forum software is
    /// already denying.
    pub fn feedback_overrides(&self, view: &ViewContext) -> FeedbackOverrides {
        match view {
            ViewContext::SingleTopic { topic, forum } => {
                let restricted = self
                    .checker
                    .topic_restriction(*topic)
                    .or_else(|| self.checker.forum_restriction(*forum));
                if restricted.is_some() {
                    FeedbackOverrides::topic()
                } else {
                    FeedbackOverrides::none()
                }
            }
            ViewContext::SingleForum { forum } => {
                if self.checker.forum_restriction(*forum).is_some() {
                    FeedbackOverrides::forum()
                } else {
                    FeedbackOverrides::none()
                }
            }
            ViewContext::Index => FeedbackOverrides::none(),
        }
    }

    fn notice_for(&self, product: ProductId) -> RestrictionNotice {
        let title = self
            .store
            .product_title(product)
            .ok()
            .flatten()
            .unwrap_or_else(|| {
                debug!("no title for product {}, using placeholder", product);
                "this product".to_string()
            });
        let permalink = self.store.product_permalink(product).ok().flatten();
        RestrictionNotice {
            product,
            title,
            permalink,
        }
    }
}
