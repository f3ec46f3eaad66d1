// 📊 Aggregator - KPIs, period reports and list filters
//
// Pure functions over snapshots of the collections. Every function takes the
// current time explicitly; nothing here reads a clock.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::entities::{FinanceKind, FinanceTransaction, Rabbit, RabbitStatus, StockItem};

/// Bucket for purchases recorded without a category
pub const UNCATEGORIZED: &str = "uncategorized";

/// How many expense categories a report keeps
pub const TOP_EXPENSE_CATEGORIES: usize = 5;

// ============================================================================
// PERIODS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    /// Rolling 7 days back from now
    ThisWeek,
    /// Calendar month to date
    #[default]
    ThisMonth,
    /// Calendar year to date
    ThisYear,
}

impl Period {
    pub const ALL: [Period; 3] = [Period::ThisWeek, Period::ThisMonth, Period::ThisYear];

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::ThisWeek => "this_week",
            Period::ThisMonth => "this_month",
            Period::ThisYear => "this_year",
        }
    }

    /// `[start, now]` covered by the period
    pub fn range(&self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = match self {
            Period::ThisWeek => now - Duration::days(7),
            Period::ThisMonth => Utc
                .with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
                .single()
                .unwrap_or(now),
            Period::ThisYear => Utc
                .with_ymd_and_hms(now.year(), 1, 1, 0, 0, 0)
                .single()
                .unwrap_or(now),
        };
        (start, now)
    }

    /// Cycle used by the dashboard
    pub fn next(&self) -> Period {
        match self {
            Period::ThisWeek => Period::ThisMonth,
            Period::ThisMonth => Period::ThisYear,
            Period::ThisYear => Period::ThisWeek,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "this_week" | "week" => Ok(Period::ThisWeek),
            "this_month" | "month" => Ok(Period::ThisMonth),
            "this_year" | "year" => Ok(Period::ThisYear),
            other => Err(format!("unknown period '{}'", other)),
        }
    }
}

/// Transactions carry a calendar date; they count from midnight UTC of that day
fn date_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

// ============================================================================
// KPIs
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Kpis {
    pub total_rabbits: usize,
    pub ready_for_sale_count: usize,
    pub breeder_count: usize,
    pub monthly_revenue: f64,
    pub monthly_expenses: f64,
    pub monthly_profit: f64,
    pub low_stock_count: usize,
}

/// Dashboard snapshot; "monthly" is the calendar month and year of `as_of`
pub fn compute_kpis(rabbits: &[Rabbit], finances: &[FinanceTransaction], stocks: &[StockItem], as_of: NaiveDate) -> Kpis {
    let in_month = |f: &&FinanceTransaction| f.date.month() == as_of.month() && f.date.year() == as_of.year();

    let monthly_revenue: f64 = finances
        .iter()
        .filter(in_month)
        .filter(|f| f.kind == FinanceKind::Sale)
        .map(|f| f.amount)
        .sum();

    let monthly_expenses: f64 = finances
        .iter()
        .filter(in_month)
        .filter(|f| f.kind == FinanceKind::Purchase)
        .map(|f| f.amount)
        .sum();

    Kpis {
        total_rabbits: rabbits.len(),
        ready_for_sale_count: count_status(rabbits, RabbitStatus::ReadyForSale),
        breeder_count: count_status(rabbits, RabbitStatus::Breeder),
        monthly_revenue,
        monthly_expenses,
        monthly_profit: monthly_revenue - monthly_expenses,
        low_stock_count: stocks.iter().filter(|s| s.is_low_stock()).count(),
    }
}

fn count_status(rabbits: &[Rabbit], status: RabbitStatus) -> usize {
    rabbits.iter().filter(|r| r.status == status).count()
}

// ============================================================================
// PERIOD REPORT
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub young: usize,
    pub weaned: usize,
    pub ready_for_sale: usize,
    pub breeder: usize,
    pub sick: usize,
    pub sold: usize,
}

impl StatusCounts {
    pub fn tally(rabbits: &[Rabbit]) -> Self {
        let mut counts = StatusCounts::default();
        for rabbit in rabbits {
            *counts.slot(rabbit.status) += 1;
        }
        counts
    }

    pub fn get(&self, status: RabbitStatus) -> usize {
        match status {
            RabbitStatus::Young => self.young,
            RabbitStatus::Weaned => self.weaned,
            RabbitStatus::ReadyForSale => self.ready_for_sale,
            RabbitStatus::Breeder => self.breeder,
            RabbitStatus::Sick => self.sick,
            RabbitStatus::Sold => self.sold,
        }
    }

    fn slot(&mut self, status: RabbitStatus) -> &mut usize {
        match status {
            RabbitStatus::Young => &mut self.young,
            RabbitStatus::Weaned => &mut self.weaned,
            RabbitStatus::ReadyForSale => &mut self.ready_for_sale,
            RabbitStatus::Breeder => &mut self.breeder,
            RabbitStatus::Sick => &mut self.sick,
            RabbitStatus::Sold => &mut self.sold,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub period: Period,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub total_rabbits: usize,
    pub status_counts: StatusCounts,
    pub revenue: f64,
    pub expenses: f64,
    pub profit: f64,
    pub stock_count: usize,
    pub low_stock_count: usize,
    pub stock_value: f64,
    pub top_expense_categories: Vec<CategoryTotal>,
    /// Transactions dated inside the period
    pub finances: Vec<FinanceTransaction>,
}

/// Aggregate the collections over `period` ending at `now`.
///
/// Rabbit and stock figures describe the whole herd and inventory; only the
/// finance figures are restricted to the period.
pub fn compute_report(
    rabbits: &[Rabbit],
    finances: &[FinanceTransaction],
    stocks: &[StockItem],
    period: Period,
    now: DateTime<Utc>,
) -> Report {
    let (start, end) = period.range(now);

    let in_period: Vec<FinanceTransaction> = finances
        .iter()
        .filter(|f| {
            let at = date_start(f.date);
            at >= start && at <= end
        })
        .cloned()
        .collect();

    let totals = finance_totals(&in_period);

    Report {
        period,
        start,
        end,
        total_rabbits: rabbits.len(),
        status_counts: StatusCounts::tally(rabbits),
        revenue: totals.sales,
        expenses: totals.purchases,
        profit: totals.balance,
        stock_count: stocks.len(),
        low_stock_count: stocks.iter().filter(|s| s.is_low_stock()).count(),
        stock_value: stock_value(stocks),
        top_expense_categories: top_expense_categories(&in_period, TOP_EXPENSE_CATEGORIES),
        finances: in_period,
    }
}

/// Σ quantity × unit price
pub fn stock_value(stocks: &[StockItem]) -> f64 {
    stocks.iter().map(StockItem::value).sum()
}

/// Purchases grouped by category, largest first. Ties keep first-seen order.
pub fn top_expense_categories(finances: &[FinanceTransaction], limit: usize) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();

    for tx in finances.iter().filter(|f| f.is_purchase()) {
        let category = match tx.category.trim() {
            "" => UNCATEGORIZED,
            name => name,
        };

        match totals.iter_mut().find(|t| t.category == category) {
            Some(total) => total.amount += tx.amount,
            None => totals.push(CategoryTotal {
                category: category.to_string(),
                amount: tx.amount,
            }),
        }
    }

    totals.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    totals.truncate(limit);
    totals
}

// ============================================================================
// LIST FILTERS AND TOTALS
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FinanceTotals {
    pub sales: f64,
    pub purchases: f64,
    /// sales - purchases
    pub balance: f64,
}

pub fn finance_totals<'a>(finances: impl IntoIterator<Item = &'a FinanceTransaction>) -> FinanceTotals {
    let mut totals = FinanceTotals::default();
    for tx in finances {
        match tx.kind {
            FinanceKind::Sale => totals.sales += tx.amount,
            FinanceKind::Purchase => totals.purchases += tx.amount,
        }
    }
    totals.balance = totals.sales - totals.purchases;
    totals
}

/// Case-insensitive search on name or breed, optionally narrowed to one status
pub fn filter_rabbits<'a>(rabbits: &'a [Rabbit], search: &str, status: Option<RabbitStatus>) -> Vec<&'a Rabbit> {
    let needle = search.trim().to_lowercase();

    rabbits
        .iter()
        .filter(|r| {
            needle.is_empty()
                || r.name.to_lowercase().contains(&needle)
                || r.breed.to_lowercase().contains(&needle)
        })
        .filter(|r| status.map_or(true, |s| r.status == s))
        .collect()
}

/// Ledger view: optionally one kind, newest date first
pub fn filter_finances(finances: &[FinanceTransaction], kind: Option<FinanceKind>) -> Vec<&FinanceTransaction> {
    let mut filtered: Vec<&FinanceTransaction> = finances
        .iter()
        .filter(|f| kind.map_or(true, |k| f.kind == k))
        .collect();
    filtered.sort_by(|a, b| b.date.cmp(&a.date));
    filtered
}

pub fn low_stock_items(stocks: &[StockItem]) -> Vec<&StockItem> {
    stocks.iter().filter(|s| s.is_low_stock()).collect()
}

/// (low, regular)
pub fn partition_stocks(stocks: &[StockItem]) -> (Vec<&StockItem>, Vec<&StockItem>) {
    stocks.iter().partition(|s| s.is_low_stock())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Record, Sex, StockType};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 18, 15, 30, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rabbit(id: i64, name: &str, breed: &str, status: RabbitStatus) -> Rabbit {
        Rabbit {
            id,
            name: name.to_string(),
            sex: Sex::Female,
            breed: breed.to_string(),
            birth_date: Some(date(2025, 1, 1)),
            current_weight: 3.0,
            status,
            mother_id: None,
            father_id: None,
            created_at: now(),
        }
    }

    fn tx(id: i64, kind: FinanceKind, amount: f64, day: NaiveDate, category: &str) -> FinanceTransaction {
        FinanceTransaction {
            id,
            kind,
            amount,
            description: format!("tx {}", id),
            date: day,
            category: category.to_string(),
            created_at: now(),
        }
    }

    fn stock(id: i64, quantity: f64, threshold: f64, price: f64) -> StockItem {
        StockItem {
            id,
            name: format!("item {}", id),
            kind: StockType::Feed,
            quantity,
            unit: "kg".to_string(),
            alert_threshold: threshold,
            unit_price: price,
            supplier: String::new(),
            created_at: now(),
        }
    }

    #[test]
    fn test_kpis_without_finances_are_zero() {
        let kpis = compute_kpis(&[], &[], &[], now().date_naive());

        assert_eq!(kpis.monthly_revenue, 0.0);
        assert_eq!(kpis.monthly_expenses, 0.0);
        assert_eq!(kpis.monthly_profit, 0.0);
        assert_eq!(kpis, Kpis::default());
    }

    #[test]
    fn test_kpis_match_calendar_month_and_year() {
        let rabbits = vec![
            rabbit(1, "A", "Rex", RabbitStatus::ReadyForSale),
            rabbit(2, "B", "Rex", RabbitStatus::Breeder),
            rabbit(3, "C", "Rex", RabbitStatus::Breeder),
            rabbit(4, "D", "Rex", RabbitStatus::Sick),
        ];
        let finances = vec![
            tx(1, FinanceKind::Sale, 100.0, date(2025, 6, 1), ""),
            tx(2, FinanceKind::Sale, 50.0, date(2025, 6, 30), ""),
            tx(3, FinanceKind::Purchase, 30.0, date(2025, 6, 10), "Feed"),
            // Previous month and same month of another year are excluded
            tx(4, FinanceKind::Sale, 999.0, date(2025, 5, 31), ""),
            tx(5, FinanceKind::Purchase, 999.0, date(2024, 6, 10), ""),
        ];
        let stocks = vec![stock(1, 2.0, 5.0, 1.0), stock(2, 5.0, 5.0, 1.0), stock(3, 9.0, 5.0, 1.0)];

        let kpis = compute_kpis(&rabbits, &finances, &stocks, now().date_naive());

        assert_eq!(kpis.total_rabbits, 4);
        assert_eq!(kpis.ready_for_sale_count, 1);
        assert_eq!(kpis.breeder_count, 2);
        assert_eq!(kpis.monthly_revenue, 150.0);
        assert_eq!(kpis.monthly_expenses, 30.0);
        assert_eq!(kpis.monthly_profit, 120.0);
        assert_eq!(kpis.low_stock_count, 2);
    }

    #[test]
    fn test_stock_value() {
        let stocks = vec![stock(1, 10.0, 0.0, 5.0), stock(2, 2.0, 0.0, 100.0)];
        assert_eq!(stock_value(&stocks), 250.0);

        let report = compute_report(&[], &[], &stocks, Period::ThisMonth, now());
        assert_eq!(report.stock_value, 250.0);
        assert_eq!(report.stock_count, 2);
        assert_eq!(report.low_stock_count, 0);
    }

    #[test]
    fn test_category_ranking() {
        let finances = vec![
            tx(1, FinanceKind::Purchase, 100.0, date(2025, 6, 2), "Feed"),
            tx(2, FinanceKind::Purchase, 50.0, date(2025, 6, 3), "Feed"),
            tx(3, FinanceKind::Purchase, 30.0, date(2025, 6, 4), "Medicine"),
            tx(4, FinanceKind::Sale, 500.0, date(2025, 6, 4), "Feed"),
        ];

        let report = compute_report(&[], &finances, &[], Period::ThisMonth, now());

        assert_eq!(
            report.top_expense_categories,
            vec![
                CategoryTotal { category: "Feed".to_string(), amount: 150.0 },
                CategoryTotal { category: "Medicine".to_string(), amount: 30.0 },
            ]
        );
    }

    #[test]
    fn test_category_ranking_uncategorized_and_top_five() {
        let finances = vec![
            tx(1, FinanceKind::Purchase, 10.0, date(2025, 6, 2), ""),
            tx(2, FinanceKind::Purchase, 20.0, date(2025, 6, 2), "  "),
            tx(3, FinanceKind::Purchase, 60.0, date(2025, 6, 2), "A"),
            tx(4, FinanceKind::Purchase, 50.0, date(2025, 6, 2), "B"),
            tx(5, FinanceKind::Purchase, 40.0, date(2025, 6, 2), "C"),
            tx(6, FinanceKind::Purchase, 40.0, date(2025, 6, 2), "D"),
            tx(7, FinanceKind::Purchase, 5.0, date(2025, 6, 2), "E"),
        ];

        let top = top_expense_categories(&finances, TOP_EXPENSE_CATEGORIES);
        let names: Vec<&str> = top.iter().map(|t| t.category.as_str()).collect();

        assert_eq!(names, vec!["A", "B", "C", "D", UNCATEGORIZED]);
        assert_eq!(top[4].amount, 30.0);
    }

    #[test]
    fn test_report_period_filtering() {
        let finances = vec![
            tx(1, FinanceKind::Sale, 10.0, date(2025, 6, 18), ""),
            // Midnight of June 11 is before now - 7 days (June 11 15:30)
            tx(2, FinanceKind::Sale, 20.0, date(2025, 6, 11), ""),
            tx(3, FinanceKind::Sale, 40.0, date(2025, 6, 12), ""),
            tx(4, FinanceKind::Purchase, 15.0, date(2025, 6, 1), ""),
            tx(5, FinanceKind::Sale, 80.0, date(2025, 1, 1), ""),
            tx(6, FinanceKind::Sale, 160.0, date(2024, 12, 31), ""),
            // Future-dated entries are past the end of every period
            tx(7, FinanceKind::Sale, 320.0, date(2025, 6, 19), ""),
        ];

        let week = compute_report(&[], &finances, &[], Period::ThisWeek, now());
        assert_eq!(week.revenue, 50.0);
        assert_eq!(week.expenses, 0.0);

        let month = compute_report(&[], &finances, &[], Period::ThisMonth, now());
        assert_eq!(month.revenue, 70.0);
        assert_eq!(month.expenses, 15.0);
        assert_eq!(month.profit, 55.0);
        assert_eq!(month.finances.len(), 4);
        assert_eq!(month.start, Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap());
        assert_eq!(month.end, now());

        let year = compute_report(&[], &finances, &[], Period::ThisYear, now());
        assert_eq!(year.revenue, 150.0);
    }

    #[test]
    fn test_report_status_counts() {
        let rabbits = vec![
            rabbit(1, "A", "Rex", RabbitStatus::Young),
            rabbit(2, "B", "Rex", RabbitStatus::Young),
            rabbit(3, "C", "Rex", RabbitStatus::Sold),
            rabbit(4, "D", "Rex", RabbitStatus::Weaned),
        ];

        let report = compute_report(&rabbits, &[], &[], Period::ThisYear, now());

        assert_eq!(report.total_rabbits, 4);
        assert_eq!(report.status_counts.get(RabbitStatus::Young), 2);
        assert_eq!(report.status_counts.sold, 1);
        assert_eq!(report.status_counts.weaned, 1);
        assert_eq!(report.status_counts.breeder, 0);
    }

    #[test]
    fn test_report_is_deterministic() {
        let finances = vec![tx(1, FinanceKind::Purchase, 10.0, date(2025, 6, 2), "Feed")];
        let a = compute_report(&[], &finances, &[], Period::ThisMonth, now());
        let b = compute_report(&[], &finances, &[], Period::ThisMonth, now());
        assert_eq!(a, b);
    }

    #[test]
    fn test_filter_rabbits() {
        let rabbits = vec![
            rabbit(1, "Flopsy", "Californian", RabbitStatus::Young),
            rabbit(2, "Mopsy", "Rex", RabbitStatus::Breeder),
            rabbit(3, "Peter", "New Zealand", RabbitStatus::Breeder),
        ];

        let names = |v: Vec<&Rabbit>| v.into_iter().map(|r| r.name.clone()).collect::<Vec<_>>();

        assert_eq!(names(filter_rabbits(&rabbits, "", None)).len(), 3);
        assert_eq!(names(filter_rabbits(&rabbits, "OPSY", None)), vec!["Flopsy", "Mopsy"]);
        assert_eq!(names(filter_rabbits(&rabbits, "zealand", None)), vec!["Peter"]);
        assert_eq!(names(filter_rabbits(&rabbits, "", Some(RabbitStatus::Breeder))), vec!["Mopsy", "Peter"]);
        assert_eq!(names(filter_rabbits(&rabbits, "mop", Some(RabbitStatus::Young))), Vec::<String>::new());
    }

    #[test]
    fn test_filter_finances_newest_first() {
        let finances = vec![
            tx(1, FinanceKind::Sale, 1.0, date(2025, 6, 1), ""),
            tx(2, FinanceKind::Purchase, 2.0, date(2025, 6, 5), ""),
            tx(3, FinanceKind::Sale, 3.0, date(2025, 6, 3), ""),
        ];

        let all: Vec<i64> = filter_finances(&finances, None).iter().map(|f| f.id()).collect();
        assert_eq!(all, vec![2, 3, 1]);

        let sales: Vec<i64> = filter_finances(&finances, Some(FinanceKind::Sale)).iter().map(|f| f.id).collect();
        assert_eq!(sales, vec![3, 1]);

        let totals = finance_totals(&finances);
        assert_eq!(totals, FinanceTotals { sales: 4.0, purchases: 2.0, balance: 2.0 });
    }

    #[test]
    fn test_partition_stocks() {
        let stocks = vec![stock(1, 1.0, 2.0, 1.0), stock(2, 3.0, 2.0, 1.0), stock(3, 2.0, 2.0, 1.0)];

        let (low, regular) = partition_stocks(&stocks);
        assert_eq!(low.iter().map(|s| s.id).collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(regular.iter().map(|s| s.id).collect::<Vec<_>>(), vec![2]);
        assert_eq!(low_stock_items(&stocks).len(), 2);
    }

    #[test]
    fn test_period_parsing() {
        assert_eq!("this-week".parse::<Period>(), Ok(Period::ThisWeek));
        assert_eq!("MONTH".parse::<Period>(), Ok(Period::ThisMonth));
        assert_eq!("this_year".parse::<Period>(), Ok(Period::ThisYear));
        assert!("decade".parse::<Period>().is_err());
        assert_eq!(Period::ThisYear.next(), Period::ThisWeek);
    }
}
