// 🌍 Static translations - typed message keys per locale
//
// Every key has a French and an English string. String keys ("nav.rabbits")
// still resolve through `lookup`, which echoes unknown keys back unchanged.

use serde::{Deserialize, Serialize};

use crate::aggregator::Period;
use crate::entities::{FinanceKind, HealthEventType, RabbitStatus, Sex, StockType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Fr,
    En,
}

impl Locale {
    pub fn code(&self) -> &'static str {
        match self {
            Locale::Fr => "fr",
            Locale::En => "en",
        }
    }

    pub fn from_code(code: &str) -> Option<Locale> {
        match code.trim().to_ascii_lowercase().as_str() {
            "fr" => Some(Locale::Fr),
            "en" => Some(Locale::En),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    CommonSuccess,
    CommonError,
    CommonLoading,
    AppTitle,
    AppSubtitle,
    DatabaseInitialized,
    NavDashboard,
    NavRabbits,
    NavStocks,
    NavFinances,
    NavReports,
    DashboardTotalRabbits,
    DashboardReadyForSale,
    DashboardBreeders,
    DashboardMonthlyRevenue,
    DashboardMonthlyExpenses,
    DashboardMonthlyProfit,
    DashboardLowStock,
    DashboardAlerts,
    RabbitsMale,
    RabbitsFemale,
    RabbitsDays,
    StatusYoung,
    StatusWeaned,
    StatusReadyForSale,
    StatusBreeder,
    StatusSick,
    StatusSold,
    StockTypeFeed,
    StockTypeMedicine,
    StockTypeEquipment,
    FinanceSale,
    FinancePurchase,
    HealthDisease,
    HealthVaccine,
    HealthTreatment,
    ReportsTitle,
    ReportsStockValue,
    ReportsTopExpenses,
    ReportsThisWeek,
    ReportsThisMonth,
    ReportsThisYear,
}

impl MessageKey {
    pub const ALL: [MessageKey; 42] = [
        MessageKey::CommonSuccess,
        MessageKey::CommonError,
        MessageKey::CommonLoading,
        MessageKey::AppTitle,
        MessageKey::AppSubtitle,
        MessageKey::DatabaseInitialized,
        MessageKey::NavDashboard,
        MessageKey::NavRabbits,
        MessageKey::NavStocks,
        MessageKey::NavFinances,
        MessageKey::NavReports,
        MessageKey::DashboardTotalRabbits,
        MessageKey::DashboardReadyForSale,
        MessageKey::DashboardBreeders,
        MessageKey::DashboardMonthlyRevenue,
        MessageKey::DashboardMonthlyExpenses,
        MessageKey::DashboardMonthlyProfit,
        MessageKey::DashboardLowStock,
        MessageKey::DashboardAlerts,
        MessageKey::RabbitsMale,
        MessageKey::RabbitsFemale,
        MessageKey::RabbitsDays,
        MessageKey::StatusYoung,
        MessageKey::StatusWeaned,
        MessageKey::StatusReadyForSale,
        MessageKey::StatusBreeder,
        MessageKey::StatusSick,
        MessageKey::StatusSold,
        MessageKey::StockTypeFeed,
        MessageKey::StockTypeMedicine,
        MessageKey::StockTypeEquipment,
        MessageKey::FinanceSale,
        MessageKey::FinancePurchase,
        MessageKey::HealthDisease,
        MessageKey::HealthVaccine,
        MessageKey::HealthTreatment,
        MessageKey::ReportsTitle,
        MessageKey::ReportsStockValue,
        MessageKey::ReportsTopExpenses,
        MessageKey::ReportsThisWeek,
        MessageKey::ReportsThisMonth,
        MessageKey::ReportsThisYear,
    ];

    /// (dotted key, French, English)
    fn entry(&self) -> (&'static str, &'static str, &'static str) {
        match self {
            MessageKey::CommonSuccess => ("common.success", "Succès", "Success"),
            MessageKey::CommonError => ("common.error", "Erreur", "Error"),
            MessageKey::CommonLoading => ("common.loading", "Chargement...", "Loading..."),
            MessageKey::AppTitle => ("app.title", "CuniGestion", "CuniGestion"),
            MessageKey::AppSubtitle => ("app.subtitle", "Gestion d'élevage de lapins", "Rabbit farming management"),
            MessageKey::DatabaseInitialized => ("database.initialized", "Base de données initialisée", "Database initialized"),
            MessageKey::NavDashboard => ("nav.dashboard", "Tableau de bord", "Dashboard"),
            MessageKey::NavRabbits => ("nav.rabbits", "Lapins", "Rabbits"),
            MessageKey::NavStocks => ("nav.stocks", "Stocks", "Stocks"),
            MessageKey::NavFinances => ("nav.finances", "Finances", "Finances"),
            MessageKey::NavReports => ("nav.reports", "Rapports", "Reports"),
            MessageKey::DashboardTotalRabbits => ("dashboard.totalRabbits", "Total lapins", "Total rabbits"),
            MessageKey::DashboardReadyForSale => ("dashboard.readyForSale", "Prêts vente", "Ready for sale"),
            MessageKey::DashboardBreeders => ("dashboard.breeders", "Reproducteurs", "Breeders"),
            MessageKey::DashboardMonthlyRevenue => ("dashboard.monthlyRevenue", "Revenus mois", "Monthly revenue"),
            MessageKey::DashboardMonthlyExpenses => ("dashboard.monthlyExpenses", "Dépenses mois", "Monthly expenses"),
            MessageKey::DashboardMonthlyProfit => ("dashboard.monthlyProfit", "Bénéfice mois", "Monthly profit"),
            MessageKey::DashboardLowStock => ("dashboard.lowStock", "Stocks bas", "Low stock"),
            MessageKey::DashboardAlerts => ("dashboard.alerts", "Alertes", "Alerts"),
            MessageKey::RabbitsMale => ("rabbits.male", "Mâle", "Male"),
            MessageKey::RabbitsFemale => ("rabbits.female", "Femelle", "Female"),
            MessageKey::RabbitsDays => ("rabbits.days", "jours", "days"),
            MessageKey::StatusYoung => ("rabbits.status_young", "Jeune", "Young"),
            MessageKey::StatusWeaned => ("rabbits.status_weaned", "Sevré", "Weaned"),
            MessageKey::StatusReadyForSale => ("rabbits.status_ready_for_sale", "Prêt vente", "Ready for sale"),
            MessageKey::StatusBreeder => ("rabbits.status_breeder", "Reproducteur", "Breeder"),
            MessageKey::StatusSick => ("rabbits.status_sick", "Malade", "Sick"),
            MessageKey::StatusSold => ("rabbits.status_sold", "Vendu", "Sold"),
            MessageKey::StockTypeFeed => ("stocks.type_feed", "Aliment", "Feed"),
            MessageKey::StockTypeMedicine => ("stocks.type_medicine", "Médicament", "Medicine"),
            MessageKey::StockTypeEquipment => ("stocks.type_equipment", "Matériel", "Equipment"),
            MessageKey::FinanceSale => ("finances.type_sale", "Vente", "Sale"),
            MessageKey::FinancePurchase => ("finances.type_purchase", "Achat", "Purchase"),
            MessageKey::HealthDisease => ("health.type_disease", "Maladie", "Disease"),
            MessageKey::HealthVaccine => ("health.type_vaccine", "Vaccin", "Vaccine"),
            MessageKey::HealthTreatment => ("health.type_treatment", "Traitement", "Treatment"),
            MessageKey::ReportsTitle => ("reports.title", "Rapports et analyses", "Reports and analytics"),
            MessageKey::ReportsStockValue => ("reports.stockValue", "Valeur des stocks", "Stock value"),
            MessageKey::ReportsTopExpenses => ("reports.topExpenses", "Principales dépenses", "Top expenses"),
            MessageKey::ReportsThisWeek => ("reports.thisWeek", "Cette semaine", "This week"),
            MessageKey::ReportsThisMonth => ("reports.thisMonth", "Ce mois", "This month"),
            MessageKey::ReportsThisYear => ("reports.thisYear", "Cette année", "This year"),
        }
    }

    /// Dotted string form, e.g. `nav.rabbits`
    pub fn as_key(&self) -> &'static str {
        self.entry().0
    }

    pub fn from_key(key: &str) -> Option<MessageKey> {
        MessageKey::ALL.into_iter().find(|k| k.as_key() == key)
    }
}

/// The one typed lookup
pub fn translate(locale: Locale, key: MessageKey) -> &'static str {
    let (_, fr, en) = key.entry();
    match locale {
        Locale::Fr => fr,
        Locale::En => en,
    }
}

/// Resolve a dotted string key; unknown keys come back as-is
pub fn lookup(locale: Locale, key: &str) -> String {
    match MessageKey::from_key(key) {
        Some(k) => translate(locale, k).to_string(),
        None => key.to_string(),
    }
}

// ============================================================================
// DOMAIN LABELS
// ============================================================================

impl RabbitStatus {
    pub fn message_key(&self) -> MessageKey {
        match self {
            RabbitStatus::Young => MessageKey::StatusYoung,
            RabbitStatus::Weaned => MessageKey::StatusWeaned,
            RabbitStatus::ReadyForSale => MessageKey::StatusReadyForSale,
            RabbitStatus::Breeder => MessageKey::StatusBreeder,
            RabbitStatus::Sick => MessageKey::StatusSick,
            RabbitStatus::Sold => MessageKey::StatusSold,
        }
    }
}

impl Sex {
    pub fn message_key(&self) -> MessageKey {
        match self {
            Sex::Male => MessageKey::RabbitsMale,
            Sex::Female => MessageKey::RabbitsFemale,
        }
    }
}

impl StockType {
    pub fn message_key(&self) -> MessageKey {
        match self {
            StockType::Feed => MessageKey::StockTypeFeed,
            StockType::Medicine => MessageKey::StockTypeMedicine,
            StockType::Equipment => MessageKey::StockTypeEquipment,
        }
    }
}

impl FinanceKind {
    pub fn message_key(&self) -> MessageKey {
        match self {
            FinanceKind::Sale => MessageKey::FinanceSale,
            FinanceKind::Purchase => MessageKey::FinancePurchase,
        }
    }
}

impl HealthEventType {
    pub fn message_key(&self) -> MessageKey {
        match self {
            HealthEventType::Disease => MessageKey::HealthDisease,
            HealthEventType::Vaccine => MessageKey::HealthVaccine,
            HealthEventType::Treatment => MessageKey::HealthTreatment,
        }
    }
}

impl Period {
    pub fn message_key(&self) -> MessageKey {
        match self {
            Period::ThisWeek => MessageKey::ReportsThisWeek,
            Period::ThisMonth => MessageKey::ReportsThisMonth,
            Period::ThisYear => MessageKey::ReportsThisYear,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_translate_per_locale() {
        assert_eq!(translate(Locale::Fr, MessageKey::NavRabbits), "Lapins");
        assert_eq!(translate(Locale::En, MessageKey::NavRabbits), "Rabbits");
        assert_eq!(translate(Locale::Fr, RabbitStatus::ReadyForSale.message_key()), "Prêt vente");
    }

    #[test]
    fn test_lookup_by_dotted_key() {
        assert_eq!(lookup(Locale::En, "dashboard.lowStock"), "Low stock");
        assert_eq!(lookup(Locale::Fr, "reports.thisYear"), "Cette année");
    }

    #[test]
    fn test_lookup_falls_back_to_raw_key() {
        assert_eq!(lookup(Locale::En, "dashboard.unknown"), "dashboard.unknown");
        assert_eq!(lookup(Locale::Fr, "nav"), "nav");
        assert_eq!(lookup(Locale::Fr, ""), "");
    }

    #[test]
    fn test_dotted_keys_are_unique_and_round_trip() {
        let keys: HashSet<&str> = MessageKey::ALL.iter().map(|k| k.as_key()).collect();
        assert_eq!(keys.len(), MessageKey::ALL.len());

        for key in MessageKey::ALL {
            assert_eq!(MessageKey::from_key(key.as_key()), Some(key));
        }
    }

    #[test]
    fn test_locale_codes() {
        assert_eq!(Locale::default(), Locale::Fr);
        assert_eq!(Locale::from_code(" EN "), Some(Locale::En));
        assert_eq!(Locale::from_code("de"), None);
        assert_eq!(Locale::En.code(), "en");
    }
}
