use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use strsim::levenshtein;
use tracing::warn;
use uuid::Uuid;

use super::{errors::CliError, output};
use crate::{
    config::{ConfigManager, EngineConfig},
    core::services::{InsightService, SpendSearch},
    errors::InsightError,
    ledger::{category, DateWindow, MonetaryRecord},
    storage::{load_snapshot_from_path, save_snapshot_to_path, JsonStorage, SnapshotStore},
    utils::build_info,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub(crate) struct CommandInfo {
    pub name: &'static str,
    pub usage: &'static str,
    pub summary: &'static str,
}

impl CommandInfo {
    const fn new(name: &'static str, usage: &'static str, summary: &'static str) -> Self {
        Self {
            name,
            usage,
            summary,
        }
    }
}

pub(crate) const COMMANDS: &[CommandInfo] = &[
    CommandInfo::new("help", "help [command]", "List commands or show one command's usage"),
    CommandInfo::new("version", "version", "Show build information"),
    CommandInfo::new("new", "new", "Start an empty snapshot"),
    CommandInfo::new("load", "load <path>", "Load a snapshot file"),
    CommandInfo::new("save", "save <path>", "Write the snapshot to a file"),
    CommandInfo::new("open", "open <name>", "Load a named snapshot from the data directory"),
    CommandInfo::new(
        "store",
        "store <name>",
        "Save the snapshot under a name in the data directory",
    ),
    CommandInfo::new("snapshots", "snapshots", "List named snapshots"),
    CommandInfo::new("category", "category <name>", "Add a category"),
    CommandInfo::new("categories", "categories", "List categories"),
    CommandInfo::new("user", "user <id|new>", "Select the active user"),
    CommandInfo::new("users", "users", "List users seen in the snapshot"),
    CommandInfo::new("today", "today [YYYY-MM-DD]", "Show or set the reference date"),
    CommandInfo::new(
        "budget",
        "budget <category> <amount> <start> <end>",
        "Record a budget for the active user",
    ),
    CommandInfo::new(
        "spend",
        "spend <category> <amount> [date] [memo]",
        "Record a spend for the active user",
    ),
    CommandInfo::new("recommend", "recommend <amount>", "Split a total budget across categories"),
    CommandInfo::new(
        "analytics",
        "analytics",
        "Compare spending with last month, past weekdays and peers",
    ),
    CommandInfo::new("pace", "pace", "Show today's overall allowance"),
    CommandInfo::new("consult", "consult [--json]", "Morning spending advice"),
    CommandInfo::new("report", "report [--json]", "Evening spending report"),
    CommandInfo::new(
        "spends",
        "spends <start> <end> [--category NAME] [--min N] [--max N]",
        "Search the active user's spends",
    ),
    CommandInfo::new("config", "config", "Show the engine configuration"),
    CommandInfo::new("exit", "exit", "Leave the shell"),
];

/// Mutable state of one shell session.
pub struct ShellContext {
    pub mode: CliMode,
    pub running: bool,
    store: Option<SnapshotStore>,
    config: EngineConfig,
    user: Option<Uuid>,
    today: NaiveDate,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Self {
        let config = match ConfigManager::new().and_then(|manager| manager.load()) {
            Ok(config) => config,
            Err(err) => {
                warn!(error = %err, "falling back to default engine configuration");
                EngineConfig::default()
            }
        };
        Self::with_config(mode, config)
    }

    pub fn with_config(mode: CliMode, config: EngineConfig) -> Self {
        Self {
            mode,
            running: true,
            store: None,
            config,
            user: None,
            today: Local::now().date_naive(),
        }
    }

    pub fn prompt(&self) -> String {
        match self.user {
            Some(user) => format!("budget_insight [{}]> ", short_id(user)),
            None => "budget_insight> ".into(),
        }
    }

    pub fn load_path(&mut self, path: &Path) -> Result<(), CliError> {
        let store = load_snapshot_from_path(path)?;
        output::success(format!(
            "Loaded {} categories and {} records from {}",
            store.categories.len(),
            store.record_count(),
            path.display()
        ));
        self.replace_store(store);
        Ok(())
    }

    pub(crate) fn dispatch(&mut self, command: &str, args: &[&str]) -> Result<LoopControl, CliError> {
        match command {
            "help" => self.help(args.first().copied()),
            "version" => output::info(build_info::current().summary()),
            "new" => {
                self.replace_store(SnapshotStore::new());
                output::success("Started an empty snapshot");
            }
            "load" => {
                let path = PathBuf::from(require_arg(args, 0, "load <path>")?);
                self.load_path(&path)?;
            }
            "save" => {
                let path = PathBuf::from(require_arg(args, 0, "save <path>")?);
                save_snapshot_to_path(self.store()?, &path)?;
                output::success(format!("Snapshot saved to {}", path.display()));
            }
            "open" => {
                let name = require_arg(args, 0, "open <name>")?;
                let store = JsonStorage::new_default()?.load(name)?;
                output::success(format!("Opened snapshot `{}`", name));
                self.replace_store(store);
            }
            "store" => {
                let name = require_arg(args, 0, "store <name>")?;
                let path = JsonStorage::new_default()?.save(self.store()?, name)?;
                output::success(format!("Snapshot stored at {}", path.display()));
            }
            "snapshots" => {
                let names = JsonStorage::new_default()?.list()?;
                if names.is_empty() {
                    output::info("No stored snapshots.");
                }
                for name in names {
                    println!("{}", name);
                }
            }
            "category" => {
                let name = args.join(" ");
                if name.trim().is_empty() {
                    return Err(usage_error("category <name>"));
                }
                let id = self.store_mut()?.add_category(name.trim());
                output::success(format!("Category `{}` ({})", name.trim(), id));
            }
            "categories" => {
                for category in &self.store()?.categories {
                    println!("{}  {}", category.id, category.name);
                }
            }
            "user" => {
                let raw = require_arg(args, 0, "user <id|new>")?;
                let user = if raw.eq_ignore_ascii_case("new") {
                    Uuid::new_v4()
                } else {
                    Uuid::parse_str(raw)
                        .map_err(|_| CliError::Input(format!("`{}` is not a user id", raw)))?
                };
                self.user = Some(user);
                output::success(format!("Active user: {}", user));
            }
            "users" => {
                for user in self.store()?.users() {
                    println!("{}", user);
                }
            }
            "today" => {
                if let Some(raw) = args.first() {
                    self.today = parse_date(raw)?;
                }
                output::info(format!("Today is {}", self.today));
            }
            "budget" => self.add_budget(args)?,
            "spend" => self.add_spend(args)?,
            "recommend" => {
                let amount = parse_amount(require_arg(args, 0, "recommend <amount>")?)?;
                output::json(&self.service()?.recommend(amount)?)?;
            }
            "analytics" => {
                let user = self.user()?;
                output::json(&self.service()?.analytics(user, self.today)?)?;
            }
            "pace" => {
                let user = self.user()?;
                output::json(&self.service()?.pace(user, self.today)?)?;
            }
            "consult" => {
                let consult = self.service()?.consult(self.user()?, self.today)?;
                if args.contains(&"--json") {
                    output::json(&consult)?;
                } else {
                    output::section(format!("Consult for {}", self.today));
                    output::block(&consult.render());
                }
            }
            "report" => {
                let report = self.service()?.report(self.user()?, self.today)?;
                if args.contains(&"--json") {
                    output::json(&report)?;
                } else {
                    output::section(format!("Report for {}", self.today));
                    output::block(&report.render());
                }
            }
            "spends" => self.search_spends(args)?,
            "config" => output::json(&self.config)?,
            "exit" | "quit" => return Ok(LoopControl::Exit),
            other => self.suggest_command(other),
        }
        Ok(LoopControl::Continue)
    }

    pub(crate) fn report_error(&self, err: CliError) {
        match err {
            CliError::Input(message) => {
                output::error(format!("Invalid input: {}", message));
                output::hint("Use `help <command>` for usage details.");
            }
            CliError::NoSnapshot => {
                output::error(err.to_string());
                output::hint("Try `new` to start from scratch.");
            }
            other => output::error(other.to_string()),
        }
    }

    fn help(&self, topic: Option<&str>) {
        if let Some(topic) = topic {
            match COMMANDS.iter().find(|spec| spec.name == topic) {
                Some(spec) => output::info(format!("{}  {}", spec.usage, spec.summary)),
                None => self.suggest_command(topic),
            }
            return;
        }
        output::section("Commands");
        for spec in COMMANDS {
            println!("  {:<58} {}", spec.usage, spec.summary);
        }
    }

    fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));
        let best = COMMANDS
            .iter()
            .map(|spec| (levenshtein(spec.name, input), spec.name))
            .min_by_key(|(distance, _)| *distance);
        if let Some((distance, name)) = best {
            if distance <= 3 {
                output::hint(format!("Suggestion: `{}`?", name));
            }
        }
    }

    fn add_budget(&mut self, args: &[&str]) -> Result<(), CliError> {
        const USAGE: &str = "budget <category> <amount> <start> <end>";
        if args.len() != 4 {
            return Err(usage_error(USAGE));
        }
        let user = self.user()?;
        let amount = positive_amount(args[1])?;
        let window = DateWindow::new(parse_date(args[2])?, parse_date(args[3])?)?;
        let category_id = self.category_id(args[0])?;
        let record = MonetaryRecord::budget(user, category_id, amount, window.start, window.end);
        self.store_mut()?.add_record(record);
        output::success(format!(
            "Budget of {} for `{}` from {} to {}",
            amount, args[0], window.start, window.end
        ));
        Ok(())
    }

    fn add_spend(&mut self, args: &[&str]) -> Result<(), CliError> {
        const USAGE: &str = "spend <category> <amount> [date] [memo]";
        if args.len() < 2 {
            return Err(usage_error(USAGE));
        }
        let user = self.user()?;
        let amount = positive_amount(args[1])?;
        let date = match args.get(2) {
            Some(raw) => parse_date(raw)?,
            None => self.today,
        };
        let category_id = self.category_id(args[0])?;
        let mut record = MonetaryRecord::spend(user, category_id, amount, date);
        if args.len() > 3 {
            record = record.with_memo(args[3..].join(" "));
        }
        self.store_mut()?.add_record(record);
        output::success(format!("Spend of {} on `{}` recorded for {}", amount, args[0], date));
        Ok(())
    }

    fn search_spends(&self, args: &[&str]) -> Result<(), CliError> {
        const USAGE: &str = "spends <start> <end> [--category NAME] [--min N] [--max N]";
        if args.len() < 2 {
            return Err(usage_error(USAGE));
        }
        let mut search = SpendSearch::new(parse_date(args[0])?, parse_date(args[1])?)?;
        let (mut min, mut max) = (None, None);
        let mut rest = args[2..].iter();
        while let Some(flag) = rest.next() {
            let value = rest.next().ok_or_else(|| usage_error(USAGE))?;
            match *flag {
                "--category" => search = search.category(*value),
                "--min" => min = Some(parse_unsigned(value)?),
                "--max" => max = Some(parse_unsigned(value)?),
                _ => return Err(usage_error(USAGE)),
            }
        }
        if min.is_some() || max.is_some() {
            search = search.amounts(min.unwrap_or(0), max.unwrap_or(u64::MAX))?;
        }
        let user = self.user()?;
        output::json(&self.service()?.search_spends(user, &search)?)
    }

    fn service(&self) -> Result<InsightService<&SnapshotStore>, CliError> {
        Ok(InsightService::new(self.store()?, self.config.clone()))
    }

    fn category_id(&self, name: &str) -> Result<Uuid, CliError> {
        category::find_by_name(&self.store()?.categories, name)
            .map(|category| category.id)
            .ok_or_else(|| InsightError::UnknownCategory(name.trim().to_string()).into())
    }

    fn store(&self) -> Result<&SnapshotStore, CliError> {
        self.store.as_ref().ok_or(CliError::NoSnapshot)
    }

    fn store_mut(&mut self) -> Result<&mut SnapshotStore, CliError> {
        self.store.as_mut().ok_or(CliError::NoSnapshot)
    }

    fn user(&self) -> Result<Uuid, CliError> {
        self.user.ok_or(CliError::NoUser)
    }

    /// Swaps in a new snapshot, selecting its only user when there is exactly one.
    fn replace_store(&mut self, store: SnapshotStore) {
        if let [only] = store.users().as_slice() {
            self.user = Some(*only);
        }
        self.store = Some(store);
    }
}

fn require_arg<'a>(args: &[&'a str], index: usize, usage: &str) -> Result<&'a str, CliError> {
    args.get(index).copied().ok_or_else(|| usage_error(usage))
}

fn usage_error(usage: &str) -> CliError {
    CliError::Input(format!("usage: {}", usage))
}

fn parse_amount(raw: &str) -> Result<i64, CliError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| CliError::InvalidAmount(raw.to_string()))
}

fn positive_amount(raw: &str) -> Result<u64, CliError> {
    let amount = parse_amount(raw)?;
    if amount <= 0 {
        return Err(InsightError::InvalidAmount(amount).into());
    }
    Ok(amount as u64)
}

fn parse_unsigned(raw: &str) -> Result<u64, CliError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| CliError::InvalidAmount(raw.to_string()))
}

fn parse_date(raw: &str) -> Result<NaiveDate, CliError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| CliError::Input(format!("`{}` is not a YYYY-MM-DD date", raw)))
}

fn short_id(id: Uuid) -> String {
    id.to_string().chars().take(8).collect()
}
