mod cli;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::Parser;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::debug;

use cli::{
    Cli, Command, FinanceAddArgs, FinanceCommand, FinanceUpdateArgs, HealthCommand,
    RabbitAddArgs, RabbitCommand, RabbitUpdateArgs, ReproductionCommand, StockAddArgs,
    StockCommand, StockUpdateArgs,
};
use rabbitry::{
    compute_kpis, compute_report, default_report_filename, export_finances_csv, export_report,
    filter_finances, filter_rabbits, finance_totals, import_finances_csv, logging, low_stock_items,
    stock_value, translate, write_report, Config, FinanceDraft, FinancePatch, FinanceTransaction,
    HealthDraft, HealthEvent, HealthPatch, Locale, MessageKey, Period, Rabbit, RabbitDraft,
    RabbitPatch, RecordId, ReproductionDraft, ReproductionEvent, ReproductionPatch, StockDraft,
    StockItem, StockPatch, Store, StoreError,
};

/// Everything a command needs: the open store plus presentation settings
struct Session {
    store: Store,
    config: Config,
    locale: Locale,
    json: bool,
    now: DateTime<Utc>,
}

impl Session {
    fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }

    fn t(&self, key: MessageKey) -> &'static str {
        translate(self.locale, key)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;
    let level = if cli.verbose { "debug" } else { config.log_level.as_str() };
    logging::init_tracing(level);

    let db_path = cli.db.clone().unwrap_or_else(|| config.database_path.clone());
    let store = open_store(&db_path)?;
    let locale = store.language()?;
    let now = store.now();

    let mut session = Session { store, config, locale, json: cli.json, now };

    match cli.command {
        Some(Command::Init) => run_init(&session, &db_path)?,
        Some(Command::Rabbit(cmd)) => run_rabbit(&session, cmd)?,
        Some(Command::Stock(cmd)) => run_stock(&session, cmd)?,
        Some(Command::Finance(cmd)) => run_finance(&session, cmd)?,
        Some(Command::Reproduction(cmd)) => run_reproduction(&session, cmd)?,
        Some(Command::Health(cmd)) => run_health(&session, cmd)?,
        Some(Command::Dashboard) => run_dashboard(&session)?,
        Some(Command::Report { period }) => run_report(&session, period)?,
        Some(Command::Export { period, output }) => run_export(&session, period, output.as_deref())?,
        Some(Command::Lang { language }) => run_lang(&mut session, language.map(Into::into))?,
        Some(Command::History { entity, id }) => run_history(&session, entity.into(), id)?,
        Some(Command::Tui) => run_ui_mode(&mut session)?,
        None if cfg!(feature = "tui") => run_ui_mode(&mut session)?,
        None => run_dashboard(&session)?,
    }

    session.store.close()?;
    Ok(())
}

fn open_store(path: &Path) -> Result<Store> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    debug!(path = %path.display(), "opening store");
    Store::open(path).with_context(|| format!("Failed to open store {}", path.display()))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn not_found(collection: &'static str, id: RecordId) -> anyhow::Error {
    StoreError::NotFound { collection, id }.into()
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

// ============================================================================
// INIT & SETTINGS
// ============================================================================

fn run_init(session: &Session, db_path: &Path) -> Result<()> {
    if session.json {
        return print_json(&serde_json::json!({ "database": db_path, "language": session.locale }));
    }
    println!("✓ {}: {}", session.t(MessageKey::DatabaseInitialized), db_path.display());
    Ok(())
}

fn run_lang(session: &mut Session, language: Option<Locale>) -> Result<()> {
    if let Some(locale) = language {
        session.store.set_language(locale)?;
        session.locale = locale;
    }

    if session.json {
        return print_json(&session.locale);
    }
    println!("{}", session.locale.code());
    Ok(())
}

fn run_history(session: &Session, collection: rabbitry::Collection, id: RecordId) -> Result<()> {
    let events = session.store.events_for(collection, id)?;

    if session.json {
        return print_json(&events);
    }
    if events.is_empty() {
        println!("No events for {} #{}", collection.entity_type(), id);
        return Ok(());
    }
    for event in &events {
        println!(
            "{}  {:<8}  {} #{}  ({})",
            event.timestamp.format("%Y-%m-%d %H:%M:%S"),
            event.event_type,
            event.entity_type,
            event.entity_id,
            event.event_id,
        );
    }
    Ok(())
}

// ============================================================================
// RABBITS
// ============================================================================

fn run_rabbit(session: &Session, cmd: RabbitCommand) -> Result<()> {
    match cmd {
        RabbitCommand::Add(args) => rabbit_add(session, args),
        RabbitCommand::List { search, status } => {
            let rabbits = session.store.rabbits()?;
            let visible = filter_rabbits(&rabbits, &search, status.map(Into::into));
            if session.json {
                return print_json(&visible);
            }
            print_rabbits(session, &visible);
            Ok(())
        }
        RabbitCommand::Update(args) => rabbit_update(session, args),
        RabbitCommand::Show { id } => rabbit_show(session, id),
    }
}

fn rabbit_add(session: &Session, args: RabbitAddArgs) -> Result<()> {
    let mut draft = RabbitDraft::new(args.name, args.sex.into(), args.breed, args.birth_date, args.weight)
        .with_parents(args.mother, args.father);
    draft.status = args.status.map(Into::into);

    let id = session.store.append::<Rabbit>(draft)?;
    let rabbit = session
        .store
        .find::<Rabbit>(id)?
        .ok_or_else(|| not_found("rabbits", id))?;
    print_rabbit_saved(session, &rabbit)
}

fn rabbit_update(session: &Session, args: RabbitUpdateArgs) -> Result<()> {
    let (mother_id, father_id) = if args.clear_parents {
        (Some(None), Some(None))
    } else {
        (args.mother.map(Some), args.father.map(Some))
    };

    let patch = RabbitPatch {
        name: args.name,
        sex: args.sex.map(Into::into),
        breed: args.breed,
        birth_date: args.birth_date,
        current_weight: args.weight,
        status: args.status.map(Into::into),
        mother_id,
        father_id,
    };

    let rabbit = session.store.replace::<Rabbit>(args.id, patch)?;
    print_rabbit_saved(session, &rabbit)
}

fn print_rabbit_saved(session: &Session, rabbit: &Rabbit) -> Result<()> {
    if session.json {
        return print_json(rabbit);
    }
    println!(
        "✓ #{} {} - {}",
        rabbit.id,
        rabbit.name,
        session.t(rabbit.status.message_key())
    );
    Ok(())
}

fn rabbit_show(session: &Session, id: RecordId) -> Result<()> {
    let store = &session.store;
    let rabbit = store.find::<Rabbit>(id)?.ok_or_else(|| not_found("rabbits", id))?;

    let mother = store.mother_of(&rabbit)?;
    let father = store.father_of(&rabbit)?;
    let offspring = store.offspring_of(id)?;
    let health = store.health_events_for(id)?;
    let reproductions = store.reproductions_for(id)?;
    let age = rabbit.age_in_days(session.now);

    if session.json {
        return print_json(&serde_json::json!({
            "rabbit": rabbit,
            "age_days": age,
            "mother": mother,
            "father": father,
            "offspring": offspring,
            "health": health,
            "reproductions": reproductions,
        }));
    }

    let days = session.t(MessageKey::RabbitsDays);
    println!("🐇 #{} {}", rabbit.id, rabbit.name);
    println!("   {} / {}", session.t(rabbit.sex.message_key()), rabbit.breed);
    match (rabbit.birth_date, age) {
        (Some(born), Some(age)) => println!("   {} ({} {})", born, age, days),
        _ => println!("   -"),
    }
    println!("   {:.2} kg - {}", rabbit.current_weight, session.t(rabbit.status.message_key()));

    let parent_label = |parent: &Option<Rabbit>, parent_id: Option<RecordId>| match (parent, parent_id) {
        (Some(p), _) => format!("#{} {}", p.id, p.name),
        (None, Some(dangling)) => format!("#{} ?", dangling),
        (None, None) => "-".to_string(),
    };
    println!("   ♀ {}", parent_label(&mother, rabbit.mother_id));
    println!("   ♂ {}", parent_label(&father, rabbit.father_id));

    if !offspring.is_empty() {
        println!("\n   Offspring:");
        for child in &offspring {
            println!("     #{} {} ({})", child.id, child.name, session.t(child.status.message_key()));
        }
    }

    if !health.is_empty() {
        println!("\n   Health:");
        for event in &health {
            print_health_line(session, event);
        }
    }

    if !reproductions.is_empty() {
        println!("\n   Reproduction:");
        for event in &reproductions {
            print_reproduction_line(event);
        }
    }

    Ok(())
}

fn print_rabbits(session: &Session, rabbits: &[&Rabbit]) {
    let days = session.t(MessageKey::RabbitsDays);

    println!(
        "{:>4}  {:<16} {:<8} {:<14} {:>10} {:>8}  {}",
        "ID", "Name", "Sex", "Breed", "Age", "Weight", "Status"
    );
    for rabbit in rabbits {
        let age = rabbit
            .age_in_days(session.now)
            .map(|d| format!("{} {}", d, days))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>4}  {:<16} {:<8} {:<14} {:>10} {:>8.2}  {}",
            rabbit.id,
            truncate(&rabbit.name, 16),
            session.t(rabbit.sex.message_key()),
            truncate(&rabbit.breed, 14),
            age,
            rabbit.current_weight,
            session.t(rabbit.status.message_key()),
        );
    }
    println!("\n{}: {}", session.t(MessageKey::DashboardTotalRabbits), rabbits.len());
}

// ============================================================================
// STOCK
// ============================================================================

fn run_stock(session: &Session, cmd: StockCommand) -> Result<()> {
    match cmd {
        StockCommand::Add(args) => stock_add(session, args),
        StockCommand::List { low } => {
            let stocks = session.store.stocks()?;
            let visible: Vec<&StockItem> = if low {
                low_stock_items(&stocks)
            } else {
                stocks.iter().collect()
            };
            if session.json {
                return print_json(&visible);
            }
            print_stocks(session, &visible);
            println!(
                "\n{}: {}",
                session.t(MessageKey::ReportsStockValue),
                session.config.money(stock_value(&stocks))
            );
            Ok(())
        }
        StockCommand::Update(args) => stock_update(session, args),
    }
}

fn stock_add(session: &Session, args: StockAddArgs) -> Result<()> {
    let draft = StockDraft {
        name: args.name,
        kind: args.kind.into(),
        quantity: args.quantity,
        unit: args.unit,
        alert_threshold: args.threshold,
        unit_price: args.price,
        supplier: args.supplier,
    };
    let id = session.store.append::<StockItem>(draft)?;
    let item = session
        .store
        .find::<StockItem>(id)?
        .ok_or_else(|| not_found("stocks", id))?;
    print_stock_saved(session, &item)
}

fn stock_update(session: &Session, args: StockUpdateArgs) -> Result<()> {
    let patch = StockPatch {
        name: args.name,
        kind: args.kind.map(Into::into),
        quantity: args.quantity,
        unit: args.unit,
        alert_threshold: args.threshold,
        unit_price: args.price,
        supplier: args.supplier,
    };
    let item = session.store.replace::<StockItem>(args.id, patch)?;
    print_stock_saved(session, &item)
}

fn print_stock_saved(session: &Session, item: &StockItem) -> Result<()> {
    if session.json {
        return print_json(item);
    }
    let alert = if item.is_low_stock() { "  ⚠" } else { "" };
    println!("✓ #{} {} - {} {}{}", item.id, item.name, item.quantity, item.unit, alert);
    Ok(())
}

fn print_stocks(session: &Session, stocks: &[&StockItem]) {
    println!(
        "{:>4}  {:<20} {:<12} {:>10} {:<6} {:>8} {:>14}",
        "ID", "Name", "Type", "Quantity", "Unit", "Alert", "Value"
    );
    for item in stocks {
        let marker = if item.is_low_stock() { " ⚠" } else { "" };
        println!(
            "{:>4}  {:<20} {:<12} {:>10} {:<6} {:>8} {:>14}{}",
            item.id,
            truncate(&item.name, 20),
            session.t(item.kind.message_key()),
            item.quantity,
            truncate(&item.unit, 6),
            item.alert_threshold,
            session.config.money(item.value()),
            marker,
        );
    }
}

// ============================================================================
// FINANCES
// ============================================================================

fn run_finance(session: &Session, cmd: FinanceCommand) -> Result<()> {
    match cmd {
        FinanceCommand::Add(args) => finance_add(session, args),
        FinanceCommand::List { kind } => {
            let finances = session.store.finances()?;
            let visible = filter_finances(&finances, kind.map(Into::into));
            if session.json {
                return print_json(&visible);
            }
            print_finances(session, &visible);
            Ok(())
        }
        FinanceCommand::Update(args) => finance_update(session, args),
        FinanceCommand::Delete { id } => {
            let removed = session.store.remove_finance(id)?;
            if session.json {
                return print_json(&removed);
            }
            println!("✓ #{} {} ({})", removed.id, removed.description, session.config.money(removed.amount));
            Ok(())
        }
        FinanceCommand::Import { path } => {
            let ids = import_finances_csv(&session.store, &path)?;
            if session.json {
                return print_json(&ids);
            }
            println!("✓ {} transactions imported from {}", ids.len(), path.display());
            Ok(())
        }
        FinanceCommand::Export { path } => {
            let count = export_finances_csv(&path, &session.store.finances()?)?;
            if session.json {
                return print_json(&serde_json::json!({ "path": path, "rows": count }));
            }
            println!("✓ {} transactions exported to {}", count, path.display());
            Ok(())
        }
    }
}

fn finance_add(session: &Session, args: FinanceAddArgs) -> Result<()> {
    let draft = FinanceDraft::new(
        args.kind.into(),
        args.amount,
        args.description,
        args.date.unwrap_or_else(|| session.today()),
        args.category,
    );
    let id = session.store.append::<FinanceTransaction>(draft)?;
    let tx = session
        .store
        .find::<FinanceTransaction>(id)?
        .ok_or_else(|| not_found("finances", id))?;
    print_finance_saved(session, &tx)
}

fn finance_update(session: &Session, args: FinanceUpdateArgs) -> Result<()> {
    let patch = FinancePatch {
        kind: args.kind.map(Into::into),
        amount: args.amount,
        description: args.description,
        date: args.date,
        category: args.category,
    };
    let tx = session.store.replace::<FinanceTransaction>(args.id, patch)?;
    print_finance_saved(session, &tx)
}

fn print_finance_saved(session: &Session, tx: &FinanceTransaction) -> Result<()> {
    if session.json {
        return print_json(tx);
    }
    println!(
        "✓ #{} {} {} - {}",
        tx.id,
        session.t(tx.kind.message_key()),
        session.config.money(tx.amount),
        tx.description
    );
    Ok(())
}

fn print_finances(session: &Session, finances: &[&FinanceTransaction]) {
    println!(
        "{:>4}  {:<10} {:<9} {:>14}  {:<28} {}",
        "ID", "Date", "Type", "Amount", "Description", "Category"
    );
    for tx in finances {
        let signed = if tx.is_sale() { tx.amount } else { -tx.amount };
        println!(
            "{:>4}  {:<10} {:<9} {:>14}  {:<28} {}",
            tx.id,
            tx.date,
            session.t(tx.kind.message_key()),
            session.config.money(signed),
            truncate(&tx.description, 28),
            tx.category,
        );
    }

    let totals = finance_totals(finances.iter().copied());
    println!();
    println!("↑ {}: {}", session.t(MessageKey::FinanceSale), session.config.money(totals.sales));
    println!("↓ {}: {}", session.t(MessageKey::FinancePurchase), session.config.money(totals.purchases));
    println!("= {}", session.config.money(totals.balance));
}

// ============================================================================
// REPRODUCTION & HEALTH
// ============================================================================

fn run_reproduction(session: &Session, cmd: ReproductionCommand) -> Result<()> {
    let store = &session.store;
    match cmd {
        ReproductionCommand::Add { mother, father, date } => {
            let draft = ReproductionDraft::mating(mother, father, date.unwrap_or_else(|| session.today()));
            let id = store.append::<ReproductionEvent>(draft)?;
            let event = store
                .find::<ReproductionEvent>(id)?
                .ok_or_else(|| not_found("reproductions", id))?;
            if session.json {
                return print_json(&event);
            }
            print_reproduction_line(&event);
            Ok(())
        }
        ReproductionCommand::List { rabbit } => {
            let events = match rabbit {
                Some(id) => store.reproductions_for(id)?,
                None => store.reproductions()?,
            };
            if session.json {
                return print_json(&events);
            }
            for event in &events {
                print_reproduction_line(event);
            }
            Ok(())
        }
        ReproductionCommand::Kindle { id, litter, date } => {
            let patch = ReproductionPatch {
                actual_kindling_date: Some(Some(date.unwrap_or_else(|| session.today()))),
                litter_size: Some(Some(litter)),
                ..ReproductionPatch::default()
            };
            let event = store.replace::<ReproductionEvent>(id, patch)?;
            if session.json {
                return print_json(&event);
            }
            print_reproduction_line(&event);
            Ok(())
        }
    }
}

fn print_reproduction_line(event: &ReproductionEvent) {
    let outcome = match (event.actual_kindling_date, event.litter_size) {
        (Some(day), Some(size)) => format!("kindled {} ({} kits)", day, size),
        (Some(day), None) => format!("kindled {}", day),
        _ => format!("expected {}", event.expected_kindling_date),
    };
    println!(
        "  #{} ♀{} × ♂{}  mated {}  {}",
        event.id, event.mother_id, event.father_id, event.mating_date, outcome
    );
}

fn run_health(session: &Session, cmd: HealthCommand) -> Result<()> {
    let store = &session.store;
    match cmd {
        HealthCommand::Add { rabbit, kind, description, start, end, medication } => {
            let draft = HealthDraft {
                rabbit_id: rabbit,
                kind: kind.into(),
                description,
                start_date: start.unwrap_or_else(|| session.today()),
                end_date: end,
                medication,
            };
            let id = store.append::<HealthEvent>(draft)?;
            let event = store.find::<HealthEvent>(id)?.ok_or_else(|| not_found("health", id))?;
            if session.json {
                return print_json(&event);
            }
            print_health_line(session, &event);
            Ok(())
        }
        HealthCommand::List { rabbit } => {
            let events = match rabbit {
                Some(id) => store.health_events_for(id)?,
                None => store.health_events()?,
            };
            if session.json {
                return print_json(&events);
            }
            for event in &events {
                print_health_line(session, event);
            }
            Ok(())
        }
        HealthCommand::Close { id, date } => {
            let patch = HealthPatch {
                end_date: Some(Some(date.unwrap_or_else(|| session.today()))),
                ..HealthPatch::default()
            };
            let event = store.replace::<HealthEvent>(id, patch)?;
            if session.json {
                return print_json(&event);
            }
            print_health_line(session, &event);
            Ok(())
        }
    }
}

fn print_health_line(session: &Session, event: &HealthEvent) {
    let span = match event.end_date {
        Some(end) => format!("{} → {}", event.start_date, end),
        None if event.is_ongoing(session.today()) => format!("{} → …", event.start_date),
        None => event.start_date.to_string(),
    };
    let medication = event.medication.as_deref().map(|m| format!(" [{}]", m)).unwrap_or_default();
    println!(
        "  #{} 🐇{} {}: {}{}  {}",
        event.id,
        event.rabbit_id,
        session.t(event.kind.message_key()),
        event.description,
        medication,
        span
    );
}

// ============================================================================
// DASHBOARD, REPORTS, EXPORT
// ============================================================================

fn run_dashboard(session: &Session) -> Result<()> {
    let snapshot = session.store.snapshot()?;
    let kpis = compute_kpis(&snapshot.rabbits, &snapshot.finances, &snapshot.stocks, session.today());

    if session.json {
        return print_json(&kpis);
    }

    let money = |amount| session.config.money(amount);
    println!("{} - {}", session.t(MessageKey::AppTitle), session.t(MessageKey::NavDashboard));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("{:<22} {}", session.t(MessageKey::DashboardTotalRabbits), kpis.total_rabbits);
    println!("{:<22} {}", session.t(MessageKey::DashboardReadyForSale), kpis.ready_for_sale_count);
    println!("{:<22} {}", session.t(MessageKey::DashboardBreeders), kpis.breeder_count);
    println!("{:<22} {}", session.t(MessageKey::DashboardMonthlyRevenue), money(kpis.monthly_revenue));
    println!("{:<22} {}", session.t(MessageKey::DashboardMonthlyExpenses), money(kpis.monthly_expenses));
    println!("{:<22} {}", session.t(MessageKey::DashboardMonthlyProfit), money(kpis.monthly_profit));
    println!("{:<22} {}", session.t(MessageKey::DashboardLowStock), kpis.low_stock_count);

    let low = low_stock_items(&snapshot.stocks);
    if !low.is_empty() {
        println!("\n⚠ {}", session.t(MessageKey::DashboardAlerts));
        for item in low {
            println!("  {} - {} {} (≤ {})", item.name, item.quantity, item.unit, item.alert_threshold);
        }
    }
    Ok(())
}

fn run_report(session: &Session, period: Period) -> Result<()> {
    let snapshot = session.store.snapshot()?;
    let report = compute_report(&snapshot.rabbits, &snapshot.finances, &snapshot.stocks, period, session.now);

    if session.json {
        return print_json(&report);
    }

    let money = |amount| session.config.money(amount);
    println!("{} - {}", session.t(MessageKey::ReportsTitle), session.t(period.message_key()));
    println!("{} → {}", report.start.format("%Y-%m-%d"), report.end.format("%Y-%m-%d"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    println!("{}: {}", session.t(MessageKey::DashboardTotalRabbits), report.total_rabbits);
    for status in rabbitry::RabbitStatus::ALL {
        println!("  {:<16} {}", session.t(status.message_key()), report.status_counts.get(status));
    }

    println!();
    println!("↑ {}: {}", session.t(MessageKey::FinanceSale), money(report.revenue));
    println!("↓ {}: {}", session.t(MessageKey::FinancePurchase), money(report.expenses));
    println!("= {}", money(report.profit));

    println!();
    println!(
        "{}: {} ({} items, {} {})",
        session.t(MessageKey::ReportsStockValue),
        money(report.stock_value),
        report.stock_count,
        report.low_stock_count,
        session.t(MessageKey::DashboardLowStock).to_lowercase(),
    );

    if !report.top_expense_categories.is_empty() {
        println!("\n{}:", session.t(MessageKey::ReportsTopExpenses));
        for (rank, entry) in report.top_expense_categories.iter().enumerate() {
            println!("  {}. {:<20} {}", rank + 1, entry.category, money(entry.amount));
        }
    }
    Ok(())
}

fn run_export(session: &Session, period: Period, output: Option<&Path>) -> Result<()> {
    let snapshot = session.store.snapshot()?;
    let report = compute_report(&snapshot.rabbits, &snapshot.finances, &snapshot.stocks, period, session.now);
    let export = export_report(&report, &snapshot.rabbits, &snapshot.stocks, session.locale, session.now);

    let path = match output {
        Some(path) => path.to_path_buf(),
        None => {
            let dir = session.config.export_dir.clone().unwrap_or_else(|| ".".into());
            fs::create_dir_all(&dir)?;
            dir.join(default_report_filename(session.today()))
        }
    };

    let written = write_report(&export, &path)?;
    if session.json {
        return print_json(&serde_json::json!({ "path": written }));
    }
    println!("✓ {}", written.display());
    Ok(())
}

// ============================================================================
// DASHBOARD UI
// ============================================================================

#[cfg(feature = "tui")]
fn run_ui_mode(session: &mut Session) -> Result<()> {
    let snapshot = session.store.snapshot()?;
    let mut app = rabbitry::ui::App::new(snapshot, session.locale, session.config.currency.clone(), session.now);
    rabbitry::ui::run_ui(&mut app)?;

    // Language toggled in the dashboard sticks
    if app.locale != session.locale {
        session.store.set_language(app.locale)?;
        session.locale = app.locale;
    }
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_session: &mut Session) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use: rabbitry dashboard");
    std::process::exit(1);
}
