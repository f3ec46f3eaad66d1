// Entity Models
//
// Each entity has:
// - Integer identity assigned by the store on append
// - A draft (record sans id and creation timestamp) used to create it
// - A patch (partial fields) used to update it in place

pub mod rabbit;
pub mod stock;
pub mod finance;
pub mod reproduction;
pub mod health;

pub use rabbit::{Rabbit, RabbitDraft, RabbitPatch, RabbitStatus, Sex};
pub use stock::{StockDraft, StockItem, StockPatch, StockType};
pub use finance::{FinanceDraft, FinanceKind, FinancePatch, FinanceTransaction};
pub use reproduction::{ReproductionDraft, ReproductionEvent, ReproductionPatch};
pub use health::{HealthDraft, HealthEvent, HealthEventType, HealthPatch};

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;

use crate::error::ValidationError;

/// Identifier of a record inside its collection
pub type RecordId = i64;

// ============================================================================
// COLLECTIONS
// ============================================================================

/// The named collections held by the store, one per entity type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Rabbits,
    Stocks,
    Finances,
    Reproductions,
    Health,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Collection::Rabbits,
        Collection::Stocks,
        Collection::Finances,
        Collection::Reproductions,
        Collection::Health,
    ];

    /// Stable key of the collection in the key-value namespace
    pub fn key(&self) -> &'static str {
        match self {
            Collection::Rabbits => "rabbits",
            Collection::Stocks => "stocks",
            Collection::Finances => "finances",
            Collection::Reproductions => "reproductions",
            Collection::Health => "health",
        }
    }

    /// Singular entity name, used in the audit trail
    pub fn entity_type(&self) -> &'static str {
        match self {
            Collection::Rabbits => "rabbit",
            Collection::Stocks => "stock",
            Collection::Finances => "finance",
            Collection::Reproductions => "reproduction",
            Collection::Health => "health",
        }
    }

    pub fn from_entity_type(name: &str) -> Option<Collection> {
        Collection::ALL
            .into_iter()
            .find(|c| c.entity_type() == name || c.key() == name)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ============================================================================
// RECORD CONTRACT
// ============================================================================

/// A flat record stored in one of the store's collections.
pub trait Record: Serialize + DeserializeOwned + Clone + fmt::Debug {
    const COLLECTION: Collection;

    /// Fields supplied by the caller on append
    type Draft;

    /// Partial fields supplied by the caller on replace
    type Patch;

    fn id(&self) -> RecordId;

    fn created_at(&self) -> DateTime<Utc>;

    /// Build the stored record from a draft plus store-assigned fields
    fn from_draft(id: RecordId, created_at: DateTime<Utc>, draft: Self::Draft) -> Self;

    /// Overwrite the fields present in `patch`
    fn apply(&mut self, patch: Self::Patch);

    fn validate(&self) -> Result<(), ValidationError>;

    /// Recompute derived fields before the record is persisted
    fn refresh(&mut self, _now: DateTime<Utc>) {}
}

/// Reject blank text fields
pub(crate) fn require_text(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(())
    }
}

pub(crate) fn require_non_negative(value: f64, field: &'static str) -> Result<(), ValidationError> {
    // NaN fails too
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::Negative(field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_keys_are_stable() {
        let keys: Vec<&str> = Collection::ALL.iter().map(|c| c.key()).collect();
        assert_eq!(keys, vec!["rabbits", "stocks", "finances", "reproductions", "health"]);
    }

    #[test]
    fn test_collection_from_entity_type() {
        assert_eq!(Collection::from_entity_type("rabbit"), Some(Collection::Rabbits));
        assert_eq!(Collection::from_entity_type("finances"), Some(Collection::Finances));
        assert_eq!(Collection::from_entity_type("goat"), None);
    }

    #[test]
    fn test_require_helpers() {
        assert!(require_text("  ", "name").is_err());
        assert!(require_text("Flopsy", "name").is_ok());
        assert!(require_non_negative(0.0, "weight").is_ok());
        assert_eq!(require_non_negative(-1.0, "weight"), Err(ValidationError::Negative("weight")));
        assert!(require_non_negative(f64::NAN, "weight").is_err());
    }
}
