//! ============================================================================
//! Provisioning - Support forum creation and membership sync
//! ============================================================================
//! Write-side companion to the access gate:
//! - when a product is published with support enabled and no forum selected,
//!   create a private support forum (optionally seeded with a closed, sticky
//!   first topic) and persist the product<->forum link
//! - when an order completes, add the customer to each purchased product's
//!   support forum
//!
//! Writes go through the `ForumHost` / `SupportMetaWriter` seams; the gate
//! itself stays read-only.
//! ============================================================================

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::store::ContentStore;
use crate::types::{ForumId, ProductId, TopicId, UserId};

/// Placeholder expanded to the product title in first-topic templates.
pub const PRODUCT_TITLE_PLACEHOLDER: &str = "%product_title%";

/// Title/body template for the auto-created first topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicTemplate {
    pub title: String,
    pub body: String,
}

impl TopicTemplate {
    /// Expand `%product_title%` in both fields.
    pub fn render(&self, product_title: &str) -> (String, String) {
        (
            self.title.replace(PRODUCT_TITLE_PLACEHOLDER, product_title),
            self.body.replace(PRODUCT_TITLE_PLACEHOLDER, product_title),
        )
    }
}

/// Provisioning configuration. Defaults mirror the stock settings shipped to
/// site administrators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvisionConfig {
    pub first_topic: TopicTemplate,
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            first_topic: TopicTemplate {
                title: format!("[IMPORTANT] {PRODUCT_TITLE_PLACEHOLDER} Support Guidelines"),
                body: format!(
                    "Welcome to the {PRODUCT_TITLE_PLACEHOLDER} support forum!\n\n\
                     To expedite your help requests, please include the version numbers \
                     you're currently running for {PRODUCT_TITLE_PLACEHOLDER}, along with \
                     the URL of the website in question. This helps us to research and \
                     test and provide faster support.\n\n\
                     Please do not post your username, password, licenses or any other \
                     personal or sensitive information.\n\nThank you!"
                ),
            },
        }
    }
}

/// A forum to create on the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewForum {
    pub title: String,
    /// Private forums are only reachable by members and site staff.
    pub private: bool,
    /// Closed comments: the forum body itself takes no replies.
    pub comments_closed: bool,
}

/// A topic to create on the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTopic {
    pub forum: ForumId,
    pub title: String,
    pub body: String,
    /// Closed topics take no replies (used for the guidelines post).
    pub closed: bool,
    /// Sticky topics pin to the top of the listing.
    pub sticky: bool,
}

/// Write seam onto the host's forum software.
pub trait ForumHost {
    fn create_forum(&mut self, forum: NewForum) -> Result<ForumId>;
    fn create_topic(&mut self, topic: NewTopic) -> Result<TopicId>;
    fn add_member(&mut self, forum: ForumId, user: UserId) -> Result<()>;
}

/// Write seam onto the host's product metadata.
pub trait SupportMetaWriter {
    /// Persist the support toggle and the selected forum for a product.
    fn save_support_settings(
        &mut self,
        product: ProductId,
        enabled: bool,
        forum: Option<ForumId>,
    ) -> Result<()>;
}

/// The admin's choices when publishing a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishRequest {
    pub product: ProductId,
    pub product_title: String,
    /// The "enable support for this product" checkbox.
    pub enable_support: bool,
    /// An existing forum selected by the admin; `None` means create one.
    pub forum: Option<ForumId>,
    /// Seed the new forum with the first-topic template.
    pub create_first_topic: bool,
}

/// A completed order, as reported by the commerce system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedOrder {
    pub customer: UserId,
    pub products: Vec<ProductId>,
}

/// Runs the provisioning flows against host write seams.
pub struct Provisioner {
    config: ProvisionConfig,
}

impl Default for Provisioner {
    fn default() -> Self {
        Self::new(ProvisionConfig::default())
    }
}

impl Provisioner {
    pub fn new(config: ProvisionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProvisionConfig {
        &self.config
    }

    /// Handle a product publish: create or link the support forum and persist
    /// the product's support settings. Returns the linked forum, if support
    /// ended up enabled.
    pub fn publish_product<H>(&self, host: &mut H, request: &PublishRequest) -> Result<Option<ForumId>>
    where
        H: ForumHost + SupportMetaWriter,
    {
        if !request.enable_support {
            host.save_support_settings(request.product, false, None)?;
            debug!("product {}: support disabled", request.product);
            return Ok(None);
        }

        let forum = match request.forum {
            Some(forum) => {
                debug!("product {}: using existing forum {}", request.product, forum);
                forum
            }
            None => {
                let forum = host.create_forum(NewForum {
                    title: request.product_title.clone(),
                    private: true,
                    comments_closed: true,
                })?;
                info!("product {}: created support forum {}", request.product, forum);

                if request.create_first_topic {
                    let (title, body) = self.config.first_topic.render(&request.product_title);
                    let topic = host.create_topic(NewTopic {
                        forum,
                        title,
                        body,
                        closed: true,
                        sticky: true,
                    })?;
                    debug!("forum {}: seeded first topic {}", forum, topic);
                }
                forum
            }
        };

        host.save_support_settings(request.product, true, Some(forum))?;
        Ok(Some(forum))
    }

    /// Handle a completed order: add the customer to each purchased product's
    /// support forum. Products without a support forum are skipped. Returns
    /// how many memberships were added.
    pub fn order_completed<H>(&self, host: &mut H, order: &CompletedOrder) -> Result<usize>
    where
        H: ContentStore + ForumHost,
    {
        let mut added = 0;
        for &product in &order.products {
            let forum = match host.support_forum_for_product(product) {
                Ok(Some(forum)) => forum,
                Ok(None) => continue,
                Err(e) => {
                    warn!("support forum lookup failed for product {}: {}", product, e);
                    continue;
                }
            };
            host.add_member(forum, order.customer)?;
            added += 1;
        }
        info!(
            "order for user {}: joined {} support forum(s)",
            order.customer, added
        );
        Ok(added)
    }
}
