//! Domain identifier types with proper encapsulation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// User identifier - newtype for type safety.
///
/// The inner String is private to ensure all construction goes through
/// the defined constructors. User identities are minted by the account
/// collaborator, so this type never generates values itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    /// Create a new `UserId` from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the user ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Market identifier - newtype for type safety.
///
/// The inner String is private to ensure all construction goes through
/// the defined constructors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarketId(String);

impl MarketId {
    /// Create a new `MarketId` from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the market ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MarketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for MarketId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for MarketId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Unique identifier for a bet.
///
/// Generated as UUID v4 for new bets, or constructed from an existing
/// string for persistence/deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BetId(String);

impl BetId {
    /// Create a new `BetId` with a generated UUID.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Get the bet ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for BetId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for BetId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for BetId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Unique identifier for a credit transaction.
///
/// Generated as UUID v4 for new transactions, or constructed from an
/// existing string for persistence/deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId(String);

impl TransactionId {
    /// Create a new `TransactionId` with a generated UUID.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Get the transaction ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TransactionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TransactionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Unique identifier for a credit hold.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HoldId(String);

impl HoldId {
    /// Create a new `HoldId` with a generated UUID.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Get the hold ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for HoldId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HoldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for HoldId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for HoldId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_new_and_as_str() {
        let id = UserId::new("user-1");
        assert_eq!(id.as_str(), "user-1");
    }

    #[test]
    fn user_id_from_string() {
        let id = UserId::from("hello".to_string());
        assert_eq!(id.as_str(), "hello");
    }

    #[test]
    fn user_id_display() {
        let id = UserId::new("display-test");
        assert_eq!(format!("{}", id), "display-test");
    }

    #[test]
    fn market_id_new_and_as_str() {
        let id = MarketId::new("market-1");
        assert_eq!(id.as_str(), "market-1");
    }

    #[test]
    fn market_id_from_str() {
        let id = MarketId::from("world");
        assert_eq!(id.as_str(), "world");
    }

    #[test]
    fn bet_id_generates_unique_ids() {
        let id1 = BetId::new();
        let id2 = BetId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn bet_id_as_str_returns_uuid_format() {
        let id = BetId::new();
        // UUID v4 format: 8-4-4-4-12 hex chars
        assert_eq!(id.as_str().len(), 36);
        assert!(id.as_str().chars().filter(|c| *c == '-').count() == 4);
    }

    #[test]
    fn bet_id_from_string() {
        let id = BetId::from("existing-id".to_string());
        assert_eq!(id.as_str(), "existing-id");
    }

    #[test]
    fn transaction_id_generates_unique_ids() {
        let id1 = TransactionId::new();
        let id2 = TransactionId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn transaction_id_display() {
        let id = TransactionId::from("display-test".to_string());
        assert_eq!(format!("{}", id), "display-test");
    }

    #[test]
    fn hold_id_generates_unique_ids() {
        let id1 = HoldId::new();
        let id2 = HoldId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn hold_id_default_generates_new() {
        let id1 = HoldId::default();
        let id2 = HoldId::default();
        assert_ne!(id1, id2);
    }
}
