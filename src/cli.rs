//! CLI command definitions and argument parsing.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use rabbitry::{
    Collection, FinanceKind, HealthEventType, Locale, Period, RabbitStatus, RecordId, Sex,
    StockType,
};

/// Rabbitry - record keeping for a small rabbit farm.
#[derive(Debug, Parser)]
#[command(name = "rabbitry")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Store file (overrides the configuration)
    #[arg(long, global = true, env = "RABBITRY_DB")]
    pub db: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create the store file with empty collections
    Init,

    /// Manage rabbits
    #[command(subcommand)]
    Rabbit(RabbitCommand),

    /// Manage feed, medicine and equipment stock
    #[command(subcommand)]
    Stock(StockCommand),

    /// Manage sales and purchases
    #[command(subcommand)]
    Finance(FinanceCommand),

    /// Record matings and kindlings
    #[command(subcommand)]
    Reproduction(ReproductionCommand),

    /// Record diseases, vaccines and treatments
    #[command(subcommand)]
    Health(HealthCommand),

    /// Show the dashboard KPIs
    Dashboard,

    /// Summarize a reporting period
    Report {
        /// this_week, this_month or this_year
        #[arg(short, long, default_value_t = Period::ThisMonth)]
        period: Period,
    },

    /// Write the period report as a JSON document
    Export {
        #[arg(short, long, default_value_t = Period::ThisMonth)]
        period: Period,

        /// Output file (default: rabbitry-report-YYYY-MM-DD.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show or change the interface language
    Lang {
        #[arg(value_enum)]
        language: Option<LangArg>,
    },

    /// Audit trail of one record
    History {
        #[arg(value_enum)]
        entity: EntityArg,
        id: RecordId,
    },

    /// Interactive dashboard
    Tui,
}

// ============================================================================
// RABBITS
// ============================================================================

#[derive(Debug, Subcommand)]
pub enum RabbitCommand {
    /// Register a rabbit; status is derived from age and weight
    Add(RabbitAddArgs),

    /// List rabbits
    List {
        /// Case-insensitive match on name or breed
        #[arg(short, long, default_value = "")]
        search: String,

        #[arg(long, value_enum)]
        status: Option<StatusArg>,
    },

    /// Change fields of a rabbit
    Update(RabbitUpdateArgs),

    /// Details, parents, offspring and health history of one rabbit
    Show { id: RecordId },
}

#[derive(Debug, Args)]
pub struct RabbitAddArgs {
    pub name: String,

    #[arg(long, value_enum)]
    pub sex: SexArg,

    #[arg(long)]
    pub breed: String,

    /// YYYY-MM-DD
    #[arg(long)]
    pub birth_date: NaiveDate,

    /// Kilograms
    #[arg(long)]
    pub weight: f64,

    /// Only sick and sold survive derivation
    #[arg(long, value_enum)]
    pub status: Option<StatusArg>,

    #[arg(long)]
    pub mother: Option<RecordId>,

    #[arg(long)]
    pub father: Option<RecordId>,
}

#[derive(Debug, Args)]
pub struct RabbitUpdateArgs {
    pub id: RecordId,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long, value_enum)]
    pub sex: Option<SexArg>,

    #[arg(long)]
    pub breed: Option<String>,

    #[arg(long)]
    pub birth_date: Option<NaiveDate>,

    #[arg(long)]
    pub weight: Option<f64>,

    #[arg(long, value_enum)]
    pub status: Option<StatusArg>,

    #[arg(long, conflicts_with = "clear_parents")]
    pub mother: Option<RecordId>,

    #[arg(long, conflicts_with = "clear_parents")]
    pub father: Option<RecordId>,

    /// Forget both parent references
    #[arg(long)]
    pub clear_parents: bool,
}

// ============================================================================
// STOCK
// ============================================================================

#[derive(Debug, Subcommand)]
pub enum StockCommand {
    Add(StockAddArgs),

    List {
        /// Only items at or below their alert threshold
        #[arg(long)]
        low: bool,
    },

    Update(StockUpdateArgs),
}

#[derive(Debug, Args)]
pub struct StockAddArgs {
    pub name: String,

    #[arg(long = "type", value_enum)]
    pub kind: StockTypeArg,

    #[arg(long)]
    pub quantity: f64,

    /// kg, bag, dose...
    #[arg(long)]
    pub unit: String,

    #[arg(long)]
    pub threshold: f64,

    #[arg(long)]
    pub price: f64,

    #[arg(long, default_value = "")]
    pub supplier: String,
}

#[derive(Debug, Args)]
pub struct StockUpdateArgs {
    pub id: RecordId,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long = "type", value_enum)]
    pub kind: Option<StockTypeArg>,

    #[arg(long)]
    pub quantity: Option<f64>,

    #[arg(long)]
    pub unit: Option<String>,

    #[arg(long)]
    pub threshold: Option<f64>,

    #[arg(long)]
    pub price: Option<f64>,

    #[arg(long)]
    pub supplier: Option<String>,
}

// ============================================================================
// FINANCES
// ============================================================================

#[derive(Debug, Subcommand)]
pub enum FinanceCommand {
    Add(FinanceAddArgs),

    /// Newest first, with totals
    List {
        #[arg(long = "type", value_enum)]
        kind: Option<FinanceKindArg>,
    },

    Update(FinanceUpdateArgs),

    Delete { id: RecordId },

    /// Append every row of a CSV ledger (type,amount,description,date,category)
    Import { path: PathBuf },

    /// Write the ledger as CSV
    Export { path: PathBuf },
}

#[derive(Debug, Args)]
pub struct FinanceAddArgs {
    #[arg(value_enum)]
    pub kind: FinanceKindArg,

    pub amount: f64,

    pub description: String,

    /// YYYY-MM-DD (default: today)
    #[arg(long)]
    pub date: Option<NaiveDate>,

    #[arg(long, default_value = "")]
    pub category: String,
}

#[derive(Debug, Args)]
pub struct FinanceUpdateArgs {
    pub id: RecordId,

    #[arg(long = "type", value_enum)]
    pub kind: Option<FinanceKindArg>,

    #[arg(long)]
    pub amount: Option<f64>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub date: Option<NaiveDate>,

    #[arg(long)]
    pub category: Option<String>,
}

// ============================================================================
// REPRODUCTION & HEALTH
// ============================================================================

#[derive(Debug, Subcommand)]
pub enum ReproductionCommand {
    /// Record a mating; kindling is expected 31 days later
    Add {
        #[arg(long)]
        mother: RecordId,

        #[arg(long)]
        father: RecordId,

        #[arg(long)]
        date: Option<NaiveDate>,
    },

    List {
        /// Only events involving this rabbit
        #[arg(long)]
        rabbit: Option<RecordId>,
    },

    /// Record the kindling of a mating
    Kindle {
        id: RecordId,

        #[arg(long)]
        litter: u32,

        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

#[derive(Debug, Subcommand)]
pub enum HealthCommand {
    Add {
        #[arg(long)]
        rabbit: RecordId,

        #[arg(long = "type", value_enum)]
        kind: HealthTypeArg,

        description: String,

        #[arg(long)]
        start: Option<NaiveDate>,

        #[arg(long)]
        end: Option<NaiveDate>,

        #[arg(long)]
        medication: Option<String>,
    },

    List {
        #[arg(long)]
        rabbit: Option<RecordId>,
    },

    /// Close an ongoing health event
    Close {
        id: RecordId,

        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

// ============================================================================
// VALUE ENUMS
// ============================================================================

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SexArg {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum StatusArg {
    Young,
    Weaned,
    ReadyForSale,
    Breeder,
    Sick,
    Sold,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum StockTypeArg {
    Feed,
    Medicine,
    Equipment,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum FinanceKindArg {
    Sale,
    Purchase,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum HealthTypeArg {
    Disease,
    Vaccine,
    Treatment,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum LangArg {
    Fr,
    En,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum EntityArg {
    Rabbit,
    Stock,
    Finance,
    Reproduction,
    Health,
}

impl From<SexArg> for Sex {
    fn from(sex: SexArg) -> Self {
        match sex {
            SexArg::Male => Sex::Male,
            SexArg::Female => Sex::Female,
        }
    }
}

impl From<StatusArg> for RabbitStatus {
    fn from(status: StatusArg) -> Self {
        match status {
            StatusArg::Young => RabbitStatus::Young,
            StatusArg::Weaned => RabbitStatus::Weaned,
            StatusArg::ReadyForSale => RabbitStatus::ReadyForSale,
            StatusArg::Breeder => RabbitStatus::Breeder,
            StatusArg::Sick => RabbitStatus::Sick,
            StatusArg::Sold => RabbitStatus::Sold,
        }
    }
}

impl From<StockTypeArg> for StockType {
    fn from(kind: StockTypeArg) -> Self {
        match kind {
            StockTypeArg::Feed => StockType::Feed,
            StockTypeArg::Medicine => StockType::Medicine,
            StockTypeArg::Equipment => StockType::Equipment,
        }
    }
}

impl From<FinanceKindArg> for FinanceKind {
    fn from(kind: FinanceKindArg) -> Self {
        match kind {
            FinanceKindArg::Sale => FinanceKind::Sale,
            FinanceKindArg::Purchase => FinanceKind::Purchase,
        }
    }
}

impl From<HealthTypeArg> for HealthEventType {
    fn from(kind: HealthTypeArg) -> Self {
        match kind {
            HealthTypeArg::Disease => HealthEventType::Disease,
            HealthTypeArg::Vaccine => HealthEventType::Vaccine,
            HealthTypeArg::Treatment => HealthEventType::Treatment,
        }
    }
}

impl From<LangArg> for Locale {
    fn from(lang: LangArg) -> Self {
        match lang {
            LangArg::Fr => Locale::Fr,
            LangArg::En => Locale::En,
        }
    }
}

impl From<EntityArg> for Collection {
    fn from(entity: EntityArg) -> Self {
        match entity {
            EntityArg::Rabbit => Collection::Rabbits,
            EntityArg::Stock => Collection::Stocks,
            EntityArg::Finance => Collection::Finances,
            EntityArg::Reproduction => Collection::Reproductions,
            EntityArg::Health => Collection::Health,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_rabbit_add() {
        let cli = Cli::try_parse_from([
            "rabbitry", "rabbit", "add", "Caramel", "--sex", "female", "--breed", "Rex",
            "--birth-date", "2025-03-01", "--weight", "1.8", "--mother", "4",
        ])
        .unwrap();

        let Some(Command::Rabbit(RabbitCommand::Add(args))) = cli.command else {
            panic!("expected rabbit add");
        };
        assert_eq!(args.name, "Caramel");
        assert_eq!(args.birth_date, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(Sex::from(args.sex), Sex::Female);
        assert_eq!(args.mother, Some(4));
        assert_eq!(args.father, None);
    }

    #[test]
    fn test_parse_report_period_aliases() {
        let cli = Cli::try_parse_from(["rabbitry", "--json", "report", "--period", "week"]).unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Some(Command::Report { period: Period::ThisWeek })));

        let cli = Cli::try_parse_from(["rabbitry", "report"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Report { period: Period::ThisMonth })));

        assert!(Cli::try_parse_from(["rabbitry", "report", "--period", "decade"]).is_err());
    }

    #[test]
    fn test_parse_finance_add_and_bad_date() {
        let cli = Cli::try_parse_from([
            "rabbitry", "finance", "add", "purchase", "45.5", "Pellets", "--category", "Feed",
        ])
        .unwrap();
        let Some(Command::Finance(FinanceCommand::Add(args))) = cli.command else {
            panic!("expected finance add");
        };
        assert_eq!(FinanceKind::from(args.kind), FinanceKind::Purchase);
        assert_eq!(args.date, None);
        assert_eq!(args.category, "Feed");

        assert!(Cli::try_parse_from([
            "rabbitry", "finance", "add", "sale", "10", "Fryer", "--date", "18/06/2025",
        ])
        .is_err());
    }

    #[test]
    fn test_no_subcommand_is_allowed() {
        let cli = Cli::try_parse_from(["rabbitry", "--db", "/tmp/farm.db"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/farm.db")));
    }

    #[test]
    fn test_history_entity_maps_to_collection() {
        let cli = Cli::try_parse_from(["rabbitry", "history", "finance", "3"]).unwrap();
        let Some(Command::History { entity, id }) = cli.command else {
            panic!("expected history");
        };
        assert_eq!(Collection::from(entity), Collection::Finances);
        assert_eq!(id, 3);
    }
}
