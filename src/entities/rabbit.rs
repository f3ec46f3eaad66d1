// 🐇 Rabbit Entity - livestock record with derived lifecycle status
//
// Parent links (mother_id / father_id) are weak references into the same
// collection: plain ids, resolved by lookup, allowed to dangle.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{require_non_negative, require_text, Collection, Record, RecordId};
use crate::error::ValidationError;
use crate::status;

// ============================================================================
// ENUMS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RabbitStatus {
    Young,
    Weaned,
    ReadyForSale,
    Breeder,
    /// Terminal: never overwritten by derivation
    Sick,
    /// Terminal: never overwritten by derivation
    Sold,
}

impl RabbitStatus {
    pub const ALL: [RabbitStatus; 6] = [
        RabbitStatus::Young,
        RabbitStatus::Weaned,
        RabbitStatus::ReadyForSale,
        RabbitStatus::Breeder,
        RabbitStatus::Sick,
        RabbitStatus::Sold,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RabbitStatus::Young => "young",
            RabbitStatus::Weaned => "weaned",
            RabbitStatus::ReadyForSale => "ready_for_sale",
            RabbitStatus::Breeder => "breeder",
            RabbitStatus::Sick => "sick",
            RabbitStatus::Sold => "sold",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RabbitStatus::Sick | RabbitStatus::Sold)
    }
}

// ============================================================================
// RABBIT ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rabbit {
    pub id: RecordId,
    pub name: String,
    pub sex: Sex,
    pub breed: String,

    /// Absent only in legacy data; new rabbits always carry one
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,

    /// Kilograms
    pub current_weight: f64,

    pub status: RabbitStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mother_id: Option<RecordId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub father_id: Option<RecordId>,

    pub created_at: DateTime<Utc>,
}

impl Rabbit {
    /// Age in whole days (rounded up), if the birth date is known
    pub fn age_in_days(&self, now: DateTime<Utc>) -> Option<i64> {
        self.birth_date.map(|birth| status::age_in_days(birth, now))
    }

    /// True when `parent_id` is recorded as this rabbit's mother or father
    pub fn is_child_of(&self, parent_id: RecordId) -> bool {
        self.mother_id == Some(parent_id) || self.father_id == Some(parent_id)
    }
}

/// Fields supplied when registering a rabbit
#[derive(Debug, Clone, PartialEq)]
pub struct RabbitDraft {
    pub name: String,
    pub sex: Sex,
    pub breed: String,
    pub birth_date: NaiveDate,
    pub current_weight: f64,
    /// Usually `None`; a terminal status given here sticks
    pub status: Option<RabbitStatus>,
    pub mother_id: Option<RecordId>,
    pub father_id: Option<RecordId>,
}

impl RabbitDraft {
    pub fn new(name: impl Into<String>, sex: Sex, breed: impl Into<String>, birth_date: NaiveDate, current_weight: f64) -> Self {
        RabbitDraft {
            name: name.into(),
            sex,
            breed: breed.into(),
            birth_date,
            current_weight,
            status: None,
            mother_id: None,
            father_id: None,
        }
    }

    pub fn with_parents(mut self, mother_id: Option<RecordId>, father_id: Option<RecordId>) -> Self {
        self.mother_id = mother_id;
        self.father_id = father_id;
        self
    }
}

/// Partial update; `None` leaves a field untouched.
/// Parent fields take `Some(None)` to clear the link.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RabbitPatch {
    pub name: Option<String>,
    pub sex: Option<Sex>,
    pub breed: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub current_weight: Option<f64>,
    pub status: Option<RabbitStatus>,
    pub mother_id: Option<Option<RecordId>>,
    pub father_id: Option<Option<RecordId>>,
}

impl Record for Rabbit {
    const COLLECTION: Collection = Collection::Rabbits;
    type Draft = RabbitDraft;
    type Patch = RabbitPatch;

    fn id(&self) -> RecordId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn from_draft(id: RecordId, created_at: DateTime<Utc>, draft: RabbitDraft) -> Self {
        Rabbit {
            id,
            name: draft.name,
            sex: draft.sex,
            breed: draft.breed,
            birth_date: Some(draft.birth_date),
            current_weight: draft.current_weight,
            // Placeholder until refresh() derives the real status
            status: draft.status.unwrap_or(RabbitStatus::Young),
            mother_id: draft.mother_id,
            father_id: draft.father_id,
            created_at,
        }
    }

    fn apply(&mut self, patch: RabbitPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(sex) = patch.sex {
            self.sex = sex;
        }
        if let Some(breed) = patch.breed {
            self.breed = breed;
        }
        if let Some(birth_date) = patch.birth_date {
            self.birth_date = Some(birth_date);
        }
        if let Some(weight) = patch.current_weight {
            self.current_weight = weight;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(mother_id) = patch.mother_id {
            self.mother_id = mother_id;
        }
        if let Some(father_id) = patch.father_id {
            self.father_id = father_id;
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text(&self.name, "name")?;
        require_text(&self.breed, "breed")?;
        require_non_negative(self.current_weight, "current_weight")?;
        Ok(())
    }

    fn refresh(&mut self, now: DateTime<Utc>) {
        self.status = status::derive_status(self.birth_date, self.current_weight, Some(self.status), now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()
    }

    fn draft() -> RabbitDraft {
        RabbitDraft::new(
            "Flopsy",
            Sex::Female,
            "Californian",
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            3.2,
        )
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&RabbitStatus::ReadyForSale).unwrap();
        assert_eq!(json, "\"ready_for_sale\"");

        let parsed: RabbitStatus = serde_json::from_str("\"breeder\"").unwrap();
        assert_eq!(parsed, RabbitStatus::Breeder);
    }

    #[test]
    fn test_from_draft_then_refresh_derives_status() {
        let mut rabbit = Rabbit::from_draft(7, now(), draft());
        rabbit.refresh(now());

        assert_eq!(rabbit.id, 7);
        assert_eq!(rabbit.birth_date, NaiveDate::from_ymd_opt(2025, 1, 1));
        // 151 days old
        assert_eq!(rabbit.status, RabbitStatus::Breeder);
    }

    #[test]
    fn test_terminal_draft_status_sticks() {
        let mut d = draft();
        d.status = Some(RabbitStatus::Sold);

        let mut rabbit = Rabbit::from_draft(1, now(), d);
        rabbit.refresh(now());

        assert_eq!(rabbit.status, RabbitStatus::Sold);
    }

    #[test]
    fn test_apply_patch_touches_only_given_fields() {
        let mut rabbit = Rabbit::from_draft(1, now(), draft().with_parents(Some(3), Some(4)));
        let before = rabbit.clone();

        rabbit.apply(RabbitPatch {
            current_weight: Some(3.9),
            father_id: Some(None),
            ..Default::default()
        });

        assert_eq!(rabbit.current_weight, 3.9);
        assert_eq!(rabbit.father_id, None);
        assert_eq!(rabbit.mother_id, Some(3));
        assert_eq!(rabbit.name, before.name);
        assert_eq!(rabbit.created_at, before.created_at);
    }

    #[test]
    fn test_validation() {
        let mut rabbit = Rabbit::from_draft(1, now(), draft());
        assert!(rabbit.validate().is_ok());

        rabbit.breed = String::new();
        assert_eq!(rabbit.validate(), Err(ValidationError::MissingField("breed")));

        rabbit.breed = "Rex".to_string();
        rabbit.current_weight = -0.1;
        assert_eq!(rabbit.validate(), Err(ValidationError::Negative("current_weight")));
    }

    #[test]
    fn test_legacy_record_without_birth_date_loads() {
        let json = r#"{
            "id": 5, "name": "Old", "sex": "male", "breed": "Rex",
            "current_weight": 2.0, "status": "breeder",
            "created_at": "2024-01-01T00:00:00Z"
        }"#;
        let mut rabbit: Rabbit = serde_json::from_str(json).unwrap();
        assert_eq!(rabbit.birth_date, None);
        assert_eq!(rabbit.age_in_days(now()), None);

        rabbit.refresh(now());
        assert_eq!(rabbit.status, RabbitStatus::Young);
    }

    #[test]
    fn test_is_child_of() {
        let rabbit = Rabbit::from_draft(9, now(), draft().with_parents(Some(1), None));
        assert!(rabbit.is_child_of(1));
        assert!(!rabbit.is_child_of(2));
    }
}
