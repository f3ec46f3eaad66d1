// Reproduction Entity - matings and kindlings

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{Collection, Record, RecordId};
use crate::error::ValidationError;

/// Typical rabbit gestation in days.
///
/// Only a default for `expected_kindling_date`; a patch can set another date.
pub const GESTATION_DAYS: i64 = 31;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReproductionEvent {
    pub id: RecordId,
    pub mother_id: RecordId,
    pub father_id: RecordId,
    pub mating_date: NaiveDate,
    pub expected_kindling_date: NaiveDate,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_kindling_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub litter_size: Option<u32>,

    pub created_at: DateTime<Utc>,
}

impl ReproductionEvent {
    /// Still waiting for the litter
    pub fn is_pending(&self) -> bool {
        self.actual_kindling_date.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReproductionDraft {
    pub mother_id: RecordId,
    pub father_id: RecordId,
    pub mating_date: NaiveDate,
    pub expected_kindling_date: NaiveDate,
    pub actual_kindling_date: Option<NaiveDate>,
    pub litter_size: Option<u32>,
}

impl ReproductionDraft {
    /// Mating with the expected kindling date set one gestation later
    pub fn mating(mother_id: RecordId, father_id: RecordId, mating_date: NaiveDate) -> Self {
        ReproductionDraft {
            mother_id,
            father_id,
            mating_date,
            expected_kindling_date: mating_date + Duration::days(GESTATION_DAYS),
            actual_kindling_date: None,
            litter_size: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReproductionPatch {
    pub expected_kindling_date: Option<NaiveDate>,
    pub actual_kindling_date: Option<Option<NaiveDate>>,
    pub litter_size: Option<Option<u32>>,
}

impl Record for ReproductionEvent {
    const COLLECTION: Collection = Collection::Reproductions;
    type Draft = ReproductionDraft;
    type Patch = ReproductionPatch;

    fn id(&self) -> RecordId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn from_draft(id: RecordId, created_at: DateTime<Utc>, draft: ReproductionDraft) -> Self {
        ReproductionEvent {
            id,
            mother_id: draft.mother_id,
            father_id: draft.father_id,
            mating_date: draft.mating_date,
            expected_kindling_date: draft.expected_kindling_date,
            actual_kindling_date: draft.actual_kindling_date,
            litter_size: draft.litter_size,
            created_at,
        }
    }

    fn apply(&mut self, patch: ReproductionPatch) {
        if let Some(expected) = patch.expected_kindling_date {
            self.expected_kindling_date = expected;
        }
        if let Some(actual) = patch.actual_kindling_date {
            self.actual_kindling_date = actual;
        }
        if let Some(litter_size) = patch.litter_size {
            self.litter_size = litter_size;
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mating_sets_expected_kindling() {
        let draft = ReproductionDraft::mating(1, 2, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(draft.expected_kindling_date, NaiveDate::from_ymd_opt(2025, 4, 1).unwrap());

        let event = ReproductionEvent::from_draft(1, Utc::now(), draft);
        assert!(event.is_pending());
    }

    #[test]
    fn test_record_kindling() {
        let draft = ReproductionDraft::mating(1, 2, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        let mut event = ReproductionEvent::from_draft(1, Utc::now(), draft);

        event.apply(ReproductionPatch {
            actual_kindling_date: Some(NaiveDate::from_ymd_opt(2025, 4, 2)),
            litter_size: Some(Some(8)),
            ..Default::default()
        });

        assert!(!event.is_pending());
        assert_eq!(event.litter_size, Some(8));
    }
}
