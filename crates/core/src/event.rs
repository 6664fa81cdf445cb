use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::webhook::Subscription;

/// The kind of an inbound event.
///
/// The set is closed: every category maps to exactly one [`Subscription`]
/// flag through [`EventCategory::subscription`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventCategory {
    SafeCreated,
    PendingMultisigTransaction,
    ExecutedMultisigTransaction,
    DeletedMultisigTransaction,
    NewConfirmation,
    IncomingEther,
    OutgoingEther,
    IncomingToken,
    OutgoingToken,
    ModuleTransaction,
    MessageCreated,
    MessageConfirmation,
    ReorgDetected,
    NewDelegate,
    UpdatedDelegate,
    DeletedDelegate,
}

impl EventCategory {
    /// Every category, in declaration order.
    pub const ALL: [Self; 16] = [
        Self::SafeCreated,
        Self::PendingMultisigTransaction,
        Self::ExecutedMultisigTransaction,
        Self::DeletedMultisigTransaction,
        Self::NewConfirmation,
        Self::IncomingEther,
        Self::OutgoingEther,
        Self::IncomingToken,
        Self::OutgoingToken,
        Self::ModuleTransaction,
        Self::MessageCreated,
        Self::MessageConfirmation,
        Self::ReorgDetected,
        Self::NewDelegate,
        Self::UpdatedDelegate,
        Self::DeletedDelegate,
    ];

    /// Returns the wire name of the category (e.g. `SAFE_CREATED`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SafeCreated => "SAFE_CREATED",
            Self::PendingMultisigTransaction => "PENDING_MULTISIG_TRANSACTION",
            Self::ExecutedMultisigTransaction => "EXECUTED_MULTISIG_TRANSACTION",
            Self::DeletedMultisigTransaction => "DELETED_MULTISIG_TRANSACTION",
            Self::NewConfirmation => "NEW_CONFIRMATION",
            Self::IncomingEther => "INCOMING_ETHER",
            Self::OutgoingEther => "OUTGOING_ETHER",
            Self::IncomingToken => "INCOMING_TOKEN",
            Self::OutgoingToken => "OUTGOING_TOKEN",
            Self::ModuleTransaction => "MODULE_TRANSACTION",
            Self::MessageCreated => "MESSAGE_CREATED",
            Self::MessageConfirmation => "MESSAGE_CONFIRMATION",
            Self::ReorgDetected => "REORG_DETECTED",
            Self::NewDelegate => "NEW_DELEGATE",
            Self::UpdatedDelegate => "UPDATED_DELEGATE",
            Self::DeletedDelegate => "DELETED_DELEGATE",
        }
    }

    /// The subscription flag that gates delivery of this category.
    pub fn subscription(self) -> Subscription {
        match self {
            Self::SafeCreated => Subscription::SafeCreations,
            Self::PendingMultisigTransaction
            | Self::ExecutedMultisigTransaction
            | Self::DeletedMultisigTransaction => Subscription::MultisigTransactions,
            Self::NewConfirmation => Subscription::Confirmations,
            Self::IncomingEther | Self::OutgoingEther => Subscription::EtherTransfers,
            Self::IncomingToken | Self::OutgoingToken => Subscription::TokenTransfers,
            Self::ModuleTransaction => Subscription::ModuleTransactions,
            Self::MessageCreated | Self::MessageConfirmation => Subscription::Messages,
            Self::ReorgDetected => Subscription::Reorgs,
            Self::NewDelegate | Self::UpdatedDelegate | Self::DeletedDelegate => {
                Subscription::Delegates
            }
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventCategory {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| CoreError::UnknownCategory(s.to_owned()))
    }
}

/// One inbound event to fan out to webhooks.
///
/// Besides the chain and the category, an event carries arbitrary payload
/// fields (`address`, `safeTxHash`, ...). They are flattened next to
/// `chainId` and `type` when serialized, so the JSON body delivered to a
/// webhook is exactly the event as it was received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(rename = "chainId")]
    chain_id: String,

    #[serde(rename = "type")]
    category: EventCategory,

    #[serde(flatten)]
    payload: serde_json::Map<String, serde_json::Value>,
}

impl EventRecord {
    /// Create an event with an empty payload.
    pub fn new(chain_id: impl Into<String>, category: EventCategory) -> Self {
        Self {
            chain_id: chain_id.into(),
            category,
            payload: serde_json::Map::new(),
        }
    }

    /// Add a payload field.
    ///
    /// `chainId` and `type` are reserved and ignored here; they always come
    /// from the typed fields.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        let key = key.into();
        if key != "chainId" && key != "type" {
            self.payload.insert(key, value.into());
        }
        self
    }

    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    pub fn category(&self) -> EventCategory {
        self.category
    }

    /// Free-form payload fields, excluding `chainId` and `type`.
    pub fn payload(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_wire_names_match_serde() {
        for category in EventCategory::ALL {
            let json = serde_json::to_value(category).unwrap();
            assert_eq!(json, serde_json::Value::String(category.as_str().into()));
        }
    }

    #[test]
    fn category_from_str() {
        assert_eq!(
            "SAFE_CREATED".parse::<EventCategory>().unwrap(),
            EventCategory::SafeCreated
        );
        assert_eq!(
            "OUTGOING_TOKEN".parse::<EventCategory>().unwrap(),
            EventCategory::OutgoingToken
        );
        assert_eq!(
            "safe_created".parse::<EventCategory>(),
            Err(CoreError::UnknownCategory("safe_created".into()))
        );
    }

    #[test]
    fn every_category_has_a_subscription() {
        assert_eq!(
            EventCategory::SafeCreated.subscription(),
            Subscription::SafeCreations
        );
        assert_eq!(
            EventCategory::DeletedMultisigTransaction.subscription(),
            Subscription::MultisigTransactions
        );
        assert_eq!(
            EventCategory::MessageConfirmation.subscription(),
            Subscription::Messages
        );
        assert_eq!(
            EventCategory::UpdatedDelegate.subscription(),
            Subscription::Delegates
        );
    }

    #[test]
    fn event_serializes_flat() {
        let event = EventRecord::new("1", EventCategory::SafeCreated)
            .with_field("address", "0x0275FC2adfF11270F3EcC4D2F7Aa0a9784601Ca6")
            .with_field("blockNumber", 42);

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["chainId"], "1");
        assert_eq!(json["type"], "SAFE_CREATED");
        assert_eq!(json["address"], "0x0275FC2adfF11270F3EcC4D2F7Aa0a9784601Ca6");
        assert_eq!(json["blockNumber"], 42);
    }

    #[test]
    fn event_deserializes_payload_fields() {
        let json = serde_json::json!({
            "chainId": "137",
            "type": "INCOMING_ETHER",
            "address": "0xabc",
            "value": "1000",
        });

        let event: EventRecord = serde_json::from_value(json).unwrap();
        assert_eq!(event.chain_id(), "137");
        assert_eq!(event.category(), EventCategory::IncomingEther);
        assert_eq!(event.payload().len(), 2);
        assert_eq!(event.payload()["value"], "1000");
    }

    #[test]
    fn reserved_fields_are_not_overwritten() {
        let event = EventRecord::new("1", EventCategory::SafeCreated)
            .with_field("chainId", "5")
            .with_field("type", "REORG_DETECTED");

        assert!(event.payload().is_empty());
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["chainId"], "1");
        assert_eq!(json["type"], "SAFE_CREATED");
    }

    #[test]
    fn unknown_category_is_rejected() {
        let json = serde_json::json!({"chainId": "1", "type": "SOMETHING_ELSE"});
        assert!(serde_json::from_value::<EventRecord>(json).is_err());
    }
}
