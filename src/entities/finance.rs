// 💰 Finance Entity - cash transactions (sales and purchases)
//
// The only entity that supports delete-by-identifier.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{require_text, Collection, Record, RecordId};
use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinanceKind {
    /// Money coming in
    Sale,
    /// Money going out
    Purchase,
}

impl FinanceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FinanceKind::Sale => "sale",
            FinanceKind::Purchase => "purchase",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinanceTransaction {
    pub id: RecordId,

    #[serde(rename = "type")]
    pub kind: FinanceKind,

    pub amount: f64,
    pub description: String,
    pub date: NaiveDate,

    /// May be empty; reports bucket those as "uncategorized"
    #[serde(default)]
    pub category: String,

    pub created_at: DateTime<Utc>,
}

impl FinanceTransaction {
    pub fn is_sale(&self) -> bool {
        self.kind == FinanceKind::Sale
    }

    pub fn is_purchase(&self) -> bool {
        self.kind == FinanceKind::Purchase
    }
}

/// Also the row format of the finance CSV ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinanceDraft {
    #[serde(rename = "type")]
    pub kind: FinanceKind,
    pub amount: f64,
    pub description: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub category: String,
}

impl FinanceDraft {
    pub fn new(kind: FinanceKind, amount: f64, description: impl Into<String>, date: NaiveDate, category: impl Into<String>) -> Self {
        FinanceDraft {
            kind,
            amount,
            description: description.into(),
            date,
            category: category.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FinancePatch {
    pub kind: Option<FinanceKind>,
    pub amount: Option<f64>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub category: Option<String>,
}

impl Record for FinanceTransaction {
    const COLLECTION: Collection = Collection::Finances;
    type Draft = FinanceDraft;
    type Patch = FinancePatch;

    fn id(&self) -> RecordId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn from_draft(id: RecordId, created_at: DateTime<Utc>, draft: FinanceDraft) -> Self {
        FinanceTransaction {
            id,
            kind: draft.kind,
            amount: draft.amount,
            description: draft.description,
            date: draft.date,
            category: draft.category,
            created_at,
        }
    }

    fn apply(&mut self, patch: FinancePatch) {
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text(&self.description, "description")?;
        if !(self.amount > 0.0) {
            return Err(ValidationError::NonPositiveAmount);
        }
        Ok(())
    }
}
