// Health Entity - diseases, vaccinations and treatments per rabbit

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{require_text, Collection, Record, RecordId};
use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthEventType {
    Disease,
    Vaccine,
    Treatment,
}

impl HealthEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthEventType::Disease => "disease",
            HealthEventType::Vaccine => "vaccine",
            HealthEventType::Treatment => "treatment",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthEvent {
    pub id: RecordId,
    pub rabbit_id: RecordId,

    #[serde(rename = "type")]
    pub kind: HealthEventType,

    pub description: String,
    pub start_date: NaiveDate,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medication: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl HealthEvent {
    /// Open-ended or not yet finished on `day`
    pub fn is_ongoing(&self, day: NaiveDate) -> bool {
        self.start_date <= day && self.end_date.map_or(true, |end| end >= day)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HealthDraft {
    pub rabbit_id: RecordId,
    pub kind: HealthEventType,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub medication: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HealthPatch {
    pub description: Option<String>,
    pub end_date: Option<Option<NaiveDate>>,
    pub medication: Option<Option<String>>,
}

impl Record for HealthEvent {
    const COLLECTION: Collection = Collection::Health;
    type Draft = HealthDraft;
    type Patch = HealthPatch;

    fn id(&self) -> RecordId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn from_draft(id: RecordId, created_at: DateTime<Utc>, draft: HealthDraft) -> Self {
        HealthEvent {
            id,
            rabbit_id: draft.rabbit_id,
            kind: draft.kind,
            description: draft.description,
            start_date: draft.start_date,
            end_date: draft.end_date,
            medication: draft.medication,
            created_at,
        }
    }

    fn apply(&mut self, patch: HealthPatch) {
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(end_date) = patch.end_date {
            self.end_date = end_date;
        }
        if let Some(medication) = patch.medication {
            self.medication = medication;
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text(&self.description, "description")
    }
}
