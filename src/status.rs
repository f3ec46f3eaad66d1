// 🐇 Status Deriver - lifecycle state from age and weight
//
// Rules are an ordered if/else chain. Order matters: a rabbit aged 60-119 days
// under the sale weight falls through every rule and stays `young`.

use chrono::{DateTime, NaiveDate, Utc};

use crate::entities::RabbitStatus;

// ============================================================================
// RULE TABLE
// ============================================================================

/// First day of the weaning window (inclusive)
pub const WEANING_START_DAYS: i64 = 40;

/// First day after weaning; start of the sale window (inclusive)
pub const SALE_WINDOW_START_DAYS: i64 = 60;

/// Age at which a rabbit counts as a breeder (inclusive)
pub const BREEDER_AGE_DAYS: i64 = 120;

/// Minimum weight in kilograms to be sold
pub const SALE_WEIGHT_KG: f64 = 2.5;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Whole days between midnight UTC of `birth_date` and `now`, rounded up.
///
/// The distance is absolute, so a birth date in the future still yields a
/// positive age.
pub fn age_in_days(birth_date: NaiveDate, now: DateTime<Utc>) -> i64 {
    let birth = birth_date.and_time(chrono::NaiveTime::MIN).and_utc();
    let millis = (now - birth).num_milliseconds().abs();
    (millis + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY
}

/// Compute a rabbit's lifecycle status.
///
/// `sick` and `sold` are terminal: once set they are returned unchanged.
pub fn derive_status(
    birth_date: Option<NaiveDate>,
    current_weight: f64,
    existing_status: Option<RabbitStatus>,
    now: DateTime<Utc>,
) -> RabbitStatus {
    if let Some(status) = existing_status.filter(|s| s.is_terminal()) {
        return status;
    }

    let Some(birth_date) = birth_date else {
        return RabbitStatus::Young;
    };

    let age = age_in_days(birth_date, now);

    if (WEANING_START_DAYS..SALE_WINDOW_START_DAYS).contains(&age) {
        RabbitStatus::Weaned
    } else if current_weight >= SALE_WEIGHT_KG && (SALE_WINDOW_START_DAYS..BREEDER_AGE_DAYS).contains(&age) {
        RabbitStatus::ReadyForSale
    } else if age >= BREEDER_AGE_DAYS {
        RabbitStatus::Breeder
    } else {
        RabbitStatus::Young
    }
}
