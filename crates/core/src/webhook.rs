use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;
use crate::event::{EventCategory, EventRecord};

/// A subscription flag on a webhook registration.
///
/// Several related event categories share one flag; see
/// [`EventCategory::subscription`] for the mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subscription {
    SafeCreations,
    MultisigTransactions,
    Confirmations,
    EtherTransfers,
    TokenTransfers,
    ModuleTransactions,
    Messages,
    Reorgs,
    Delegates,
}

impl Subscription {
    /// Every flag, in declaration order.
    pub const ALL: [Self; 9] = [
        Self::SafeCreations,
        Self::MultisigTransactions,
        Self::Confirmations,
        Self::EtherTransfers,
        Self::TokenTransfers,
        Self::ModuleTransactions,
        Self::Messages,
        Self::Reorgs,
        Self::Delegates,
    ];
}

/// An externally configured delivery target and its subscription rules.
///
/// Registrations are owned by the persistence layer; the engine only reads
/// snapshots of them.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookRegistration {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,

    #[serde(default)]
    pub description: String,

    /// Endpoint the event is POSTed to.
    pub url: String,

    /// Value of the `Authorization` header sent with every delivery.
    #[serde(default)]
    pub authorization: Option<String>,

    /// Chains this registration is scoped to. Empty means every chain.
    #[serde(default)]
    pub chains: Vec<String>,

    /// Enabled subscription flags. A missing flag means "not subscribed".
    #[serde(default)]
    pub subscriptions: BTreeMap<Subscription, bool>,

    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl WebhookRegistration {
    /// Create an active registration for `url` with no subscriptions and no
    /// chain restriction.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: String::new(),
            url: url.into(),
            authorization: None,
            chains: Vec::new(),
            subscriptions: BTreeMap::new(),
            is_active: true,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_authorization(mut self, authorization: impl Into<String>) -> Self {
        self.authorization = Some(authorization.into());
        self
    }

    /// Restrict the registration to the given chains.
    #[must_use]
    pub fn with_chains<I, S>(mut self, chains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.chains = chains.into_iter().map(Into::into).collect();
        self
    }

    /// Set one subscription flag.
    #[must_use]
    pub fn with_subscription(mut self, subscription: Subscription, enabled: bool) -> Self {
        self.subscriptions.insert(subscription, enabled);
        self
    }

    /// Enable every subscription flag.
    #[must_use]
    pub fn subscribed_to_all(mut self) -> Self {
        for subscription in Subscription::ALL {
            self.subscriptions.insert(subscription, true);
        }
        self
    }

    #[must_use]
    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Whether the flag gating `category` is enabled.
    pub fn is_subscribed(&self, category: EventCategory) -> bool {
        self.subscriptions
            .get(&category.subscription())
            .copied()
            .unwrap_or(false)
    }

    /// Whether events from `chain_id` are in scope.
    pub fn covers_chain(&self, chain_id: &str) -> bool {
        self.chains.is_empty() || self.chains.iter().any(|chain| chain == chain_id)
    }

    /// The subscription predicate: category flag enabled and chain in scope.
    pub fn matches(&self, event: &EventRecord) -> bool {
        self.is_subscribed(event.category()) && self.covers_chain(event.chain_id())
    }

    pub fn has_endpoint(&self) -> bool {
        !self.url.trim().is_empty()
    }

    /// Check the structural invariants of the registration.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !self.has_endpoint() {
            return Err(CoreError::InvalidRegistration(format!(
                "webhook {} has an empty url",
                self.id
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for WebhookRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookRegistration")
            .field("id", &self.id)
            .field("description", &self.description)
            .field("url", &self.url)
            .field(
                "authorization",
                &self.authorization.as_ref().map(|_| "[REDACTED]"),
            )
            .field("chains", &self.chains)
            .field("subscriptions", &self.subscriptions)
            .field("is_active", &self.is_active)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn safe_created(chain_id: &str) -> EventRecord {
        EventRecord::new(chain_id, EventCategory::SafeCreated)
    }

    #[test]
    fn new_registration_defaults() {
        let webhook = WebhookRegistration::new("https://example.com/hook");
        assert_eq!(webhook.url, "https://example.com/hook");
        assert!(webhook.is_active);
        assert!(webhook.chains.is_empty());
        assert!(webhook.subscriptions.is_empty());
        assert!(webhook.authorization.is_none());
    }

    #[test]
    fn missing_flag_is_not_subscribed() {
        let webhook = WebhookRegistration::new("https://example.com");
        for category in EventCategory::ALL {
            assert!(!webhook.is_subscribed(category));
        }
    }

    #[test]
    fn disabled_flag_never_matches() {
        let webhook = WebhookRegistration::new("https://example.com")
            .with_subscription(Subscription::SafeCreations, false);
        assert!(!webhook.matches(&safe_created("1")));
        assert!(!webhook.matches(&safe_created("100")));
    }

    #[test]
    fn shared_flag_covers_related_categories() {
        let webhook = WebhookRegistration::new("https://example.com")
            .with_subscription(Subscription::EtherTransfers, true);
        assert!(webhook.is_subscribed(EventCategory::IncomingEther));
        assert!(webhook.is_subscribed(EventCategory::OutgoingEther));
        assert!(!webhook.is_subscribed(EventCategory::IncomingToken));
    }

    #[test]
    fn empty_chains_match_every_chain() {
        let webhook = WebhookRegistration::new("https://example.com").subscribed_to_all();
        for chain in ["1", "4", "137", "11155111"] {
            assert!(webhook.matches(&safe_created(chain)));
        }
    }

    #[test]
    fn chain_scope_is_respected() {
        let webhook = WebhookRegistration::new("https://example.com")
            .subscribed_to_all()
            .with_chains(["1", "4"]);
        assert!(webhook.matches(&safe_created("1")));
        assert!(webhook.matches(&safe_created("4")));
        assert!(!webhook.matches(&safe_created("5")));
        assert!(!webhook.matches(&safe_created("14")));
    }

    #[test]
    fn validate_rejects_empty_url() {
        let webhook = WebhookRegistration::new("  ");
        assert!(!webhook.has_endpoint());
        assert!(matches!(
            webhook.validate(),
            Err(CoreError::InvalidRegistration(_))
        ));
        assert!(WebhookRegistration::new("http://localhost").validate().is_ok());
    }

    #[test]
    fn fixed_id_is_kept_and_reported() {
        let id = Uuid::new_v4();
        let webhook = WebhookRegistration::new("").with_id(id);
        assert_eq!(webhook.id, id);

        let Err(CoreError::InvalidRegistration(msg)) = webhook.validate() else {
            panic!("expected an invalid registration");
        };
        assert!(msg.contains(&id.to_string()));

        let json = serde_json::to_value(&webhook).unwrap();
        let back: WebhookRegistration = serde_json::from_value(json).unwrap();
        assert_eq!(back.id, id);
    }

    #[test]
    fn debug_redacts_authorization() {
        let secret = "Basic dGVzdDp0ZXN0";
        let webhook = WebhookRegistration::new("https://example.com").with_authorization(secret);
        let debug = format!("{webhook:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains(secret));
    }

    #[test]
    fn deserializes_with_defaults() {
        let json = serde_json::json!({
            "url": "https://example.com/hook",
            "chains": ["1"],
            "subscriptions": {"safe_creations": true, "reorgs": false}
        });
        let webhook: WebhookRegistration = serde_json::from_value(json).unwrap();
        assert!(webhook.is_active);
        assert!(webhook.is_subscribed(EventCategory::SafeCreated));
        assert!(!webhook.is_subscribed(EventCategory::ReorgDetected));
        assert_eq!(webhook.chains, vec!["1".to_owned()]);
    }
}
