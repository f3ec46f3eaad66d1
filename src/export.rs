// 📤 Export - report snapshot documents and the finance CSV ledger

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::aggregator::Report;
use crate::db::Store;
use crate::entities::{FinanceDraft, FinanceTransaction, Rabbit, Record, RecordId, StockItem};
use crate::error::Result;
use crate::i18n::{translate, Locale};

// ============================================================================
// REPORT DOCUMENT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSummary {
    pub total_rabbits: usize,
    pub ready_for_sale: usize,
    pub breeders: usize,
    pub total_sales: f64,
    pub total_purchases: f64,
    pub low_stock: usize,
}

/// The downloadable report: summary plus full detail lists.
///
/// Keys are English snake_case (`period`, `generated_at`, `summary.total_sales`...).
/// Reports written by the older French-keyed exporter (`periode`,
/// `dateGeneration`, `resume`, `detailsLapins`) do not load back into this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportExport {
    /// Localized period label ("Ce mois", "This week"...)
    pub period: String,
    pub generated_at: DateTime<Utc>,
    pub summary: ExportSummary,
    pub rabbits: Vec<Rabbit>,
    /// Only the transactions inside the period
    pub finances: Vec<FinanceTransaction>,
    pub stocks: Vec<StockItem>,
}

pub fn export_report(
    report: &Report,
    rabbits: &[Rabbit],
    stocks: &[StockItem],
    locale: Locale,
    generated_at: DateTime<Utc>,
) -> ReportExport {
    ReportExport {
        period: translate(locale, report.period.message_key()).to_string(),
        generated_at,
        summary: ExportSummary {
            total_rabbits: report.total_rabbits,
            ready_for_sale: report.status_counts.ready_for_sale,
            breeders: report.status_counts.breeder,
            total_sales: report.revenue,
            total_purchases: report.expenses,
            low_stock: report.low_stock_count,
        },
        rabbits: rabbits.to_vec(),
        finances: report.finances.clone(),
        stocks: stocks.to_vec(),
    }
}

/// `rabbitry-report-YYYY-MM-DD.json`
pub fn default_report_filename(day: NaiveDate) -> String {
    format!("rabbitry-report-{}.json", day.format("%Y-%m-%d"))
}

/// Write the report as pretty-printed JSON; returns the path written
pub fn write_report(export: &ReportExport, path: &Path) -> Result<PathBuf> {
    let json = serde_json::to_string_pretty(export)?;
    fs::write(path, json)?;
    info!(path = %path.display(), "report exported");
    Ok(path.to_path_buf())
}

// ============================================================================
// FINANCE CSV
// ============================================================================

/// Write the ledger as CSV (`type,amount,description,date,category`)
pub fn export_finances_csv(path: &Path, finances: &[FinanceTransaction]) -> Result<usize> {
    let mut writer = csv::Writer::from_path(path)?;

    for tx in finances {
        writer.serialize(FinanceDraft {
            kind: tx.kind,
            amount: tx.amount,
            description: tx.description.clone(),
            date: tx.date,
            category: tx.category.clone(),
        })?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = finances.len(), "finance ledger exported");
    Ok(finances.len())
}

pub fn load_finances_csv(csv_path: &Path) -> Result<Vec<FinanceDraft>> {
    let mut rdr = csv::Reader::from_path(csv_path)?;

    let mut drafts = Vec::new();
    for result in rdr.deserialize() {
        let draft: FinanceDraft = result?;
        drafts.push(draft);
    }

    Ok(drafts)
}

/// Load a CSV ledger and append every row.
///
/// All rows are validated first; one bad row rejects the whole file.
pub fn import_finances_csv(store: &Store, csv_path: &Path) -> Result<Vec<RecordId>> {
    let drafts = load_finances_csv(csv_path)?;

    let now = store.now();
    for draft in &drafts {
        FinanceTransaction::from_draft(0, now, draft.clone()).validate()?;
    }

    let ids = drafts
        .into_iter()
        .map(|draft| store.append::<FinanceTransaction>(draft))
        .collect::<Result<Vec<_>>>()?;

    info!(path = %csv_path.display(), rows = ids.len(), "finance ledger imported");
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::{compute_report, Period};
    use crate::entities::{FinanceKind, RabbitStatus, Sex, StockType};
    use crate::error::{StoreError, ValidationError};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 18, 9, 0, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn finances() -> Vec<FinanceTransaction> {
        vec![
            FinanceTransaction::from_draft(1, now(), FinanceDraft::new(FinanceKind::Sale, 120.0, "Six fryers", date(2025, 6, 3), "Rabbit sales")),
            FinanceTransaction::from_draft(2, now(), FinanceDraft::new(FinanceKind::Purchase, 45.5, "Pellets, 25kg", date(2025, 6, 5), "Feed")),
            FinanceTransaction::from_draft(3, now(), FinanceDraft::new(FinanceKind::Purchase, 10.0, "Old invoice", date(2025, 4, 1), "")),
        ]
    }

    #[test]
    fn test_export_report_document() {
        let rabbits = vec![Rabbit {
            id: 1,
            name: "Doe".to_string(),
            sex: Sex::Female,
            breed: "Rex".to_string(),
            birth_date: Some(date(2024, 1, 1)),
            current_weight: 4.1,
            status: RabbitStatus::Breeder,
            mother_id: None,
            father_id: None,
            created_at: now(),
        }];
        let stocks = vec![StockItem {
            id: 1,
            name: "Pellets".to_string(),
            kind: StockType::Feed,
            quantity: 2.0,
            unit: "bag".to_string(),
            alert_threshold: 3.0,
            unit_price: 12.0,
            supplier: String::new(),
            created_at: now(),
        }];

        let report = compute_report(&rabbits, &finances(), &stocks, Period::ThisMonth, now());
        let export = export_report(&report, &rabbits, &stocks, Locale::Fr, now());

        assert_eq!(export.period, "Ce mois");
        assert_eq!(export.summary, ExportSummary {
            total_rabbits: 1,
            ready_for_sale: 0,
            breeders: 1,
            total_sales: 120.0,
            total_purchases: 45.5,
            low_stock: 1,
        });
        assert_eq!(export.finances.len(), 2);

        let json = serde_json::to_value(&export).unwrap();
        assert_eq!(json["generated_at"], "2025-06-18T09:00:00Z");
        assert_eq!(json["rabbits"][0]["status"], "breeder");
        assert_eq!(json["stocks"][0]["type"], "feed");
    }

    #[test]
    fn test_write_report_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(default_report_filename(now().date_naive()));
        assert!(path.ends_with("rabbitry-report-2025-06-18.json"));

        let report = compute_report(&[], &finances(), &[], Period::ThisYear, now());
        let export = export_report(&report, &[], &[], Locale::En, now());
        write_report(&export, &path).unwrap();

        let parsed: ReportExport = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed, export);
        assert_eq!(parsed.period, "This year");
    }

    #[test]
    fn test_french_keyed_report_does_not_load() {
        let legacy = r#"{
            "periode": "Ce mois",
            "dateGeneration": "2025-06-18T09:00:00Z",
            "resume": {"totalLapins": 1, "totalVentes": 120.0, "totalAchats": 45.5},
            "detailsLapins": []
        }"#;

        assert!(serde_json::from_str::<ReportExport>(legacy).is_err());
    }

    #[test]
    fn test_finance_csv_export_then_import() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.csv");

        assert_eq!(export_finances_csv(&path, &finances()).unwrap(), 3);

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("type,amount,description,date,category\n"));
        assert!(text.contains("\"Pellets, 25kg\""));

        let store = Store::open_in_memory().unwrap();
        let ids = import_finances_csv(&store, &path).unwrap();
        assert_eq!(ids, vec![1, 2, 3]);

        let stored = store.finances().unwrap();
        assert_eq!(stored[1].description, "Pellets, 25kg");
        assert_eq!(stored[1].kind, FinanceKind::Purchase);
        assert_eq!(stored[2].category, "");
    }

    #[test]
    fn test_import_rejects_whole_file_on_bad_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        fs::write(
            &path,
            "type,amount,description,date,category\n\
             sale,10,Fryer,2025-06-01,Rabbit sales\n\
             purchase,0,Free hay,2025-06-02,Feed\n",
        )
        .unwrap();

        let store = Store::open_in_memory().unwrap();
        let err = import_finances_csv(&store, &path).unwrap_err();

        assert!(matches!(err, StoreError::Validation(ValidationError::NonPositiveAmount)));
        assert!(store.finances().unwrap().is_empty());
    }

    #[test]
    fn test_malformed_csv_is_storage_fault() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.csv");
        fs::write(&path, "type,amount,description,date,category\nbarter,ten,Goat,yesterday,\n").unwrap();

        let err = load_finances_csv(&path).unwrap_err();
        assert!(err.is_storage_fault());
    }
}
