// 📦 Stock Entity - feed, medicine and equipment inventory

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{require_non_negative, require_text, Collection, Record, RecordId};
use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockType {
    Feed,
    Medicine,
    Equipment,
}

impl StockType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockType::Feed => "feed",
            StockType::Medicine => "medicine",
            StockType::Equipment => "equipment",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockItem {
    pub id: RecordId,
    pub name: String,

    #[serde(rename = "type")]
    pub kind: StockType,

    /// Amount on hand, in `unit`
    pub quantity: f64,

    /// Free-text unit label (kg, bag, dose...)
    pub unit: String,

    pub alert_threshold: f64,
    pub unit_price: f64,

    #[serde(default)]
    pub supplier: String,

    pub created_at: DateTime<Utc>,
}

impl StockItem {
    /// Derived, never stored: at or below the alert threshold
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.alert_threshold
    }

    /// quantity × unit price
    pub fn value(&self) -> f64 {
        self.quantity * self.unit_price
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StockDraft {
    pub name: String,
    pub kind: StockType,
    pub quantity: f64,
    pub unit: String,
    pub alert_threshold: f64,
    pub unit_price: f64,
    pub supplier: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StockPatch {
    pub name: Option<String>,
    pub kind: Option<StockType>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub alert_threshold: Option<f64>,
    pub unit_price: Option<f64>,
    pub supplier: Option<String>,
}

impl Record for StockItem {
    const COLLECTION: Collection = Collection::Stocks;
    type Draft = StockDraft;
    type Patch = StockPatch;

    fn id(&self) -> RecordId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn from_draft(id: RecordId, created_at: DateTime<Utc>, draft: StockDraft) -> Self {
        StockItem {
            id,
            name: draft.name,
            kind: draft.kind,
            quantity: draft.quantity,
            unit: draft.unit,
            alert_threshold: draft.alert_threshold,
            unit_price: draft.unit_price,
            supplier: draft.supplier,
            created_at,
        }
    }

    fn apply(&mut self, patch: StockPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity;
        }
        if let Some(unit) = patch.unit {
            self.unit = unit;
        }
        if let Some(threshold) = patch.alert_threshold {
            self.alert_threshold = threshold;
        }
        if let Some(price) = patch.unit_price {
            self.unit_price = price;
        }
        if let Some(supplier) = patch.supplier {
            self.supplier = supplier;
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text(&self.name, "name")?;
        require_text(&self.unit, "unit")?;
        require_non_negative(self.unit_price, "unit_price")?;
        Ok(())
    }
}
