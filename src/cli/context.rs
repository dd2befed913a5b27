//! Session state and command dispatch for the expense shell.

use std::path::PathBuf;

use strsim::levenshtein;
use thiserror::Error;
use tracing::info;

use crate::errors::{DateError, SheetError};
use crate::ledger::LineItem;
use crate::storage::{validate_sheet_name, JsonStore};

use super::commands;
use super::output;
use super::registry::{CommandEntry, CommandRegistry};
use super::table;

/// Sheet loaded when a session starts.
pub const DEFAULT_SHEET: &str = "expenses";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

/// Per-command failures. Everything except persistence trouble is reported
/// to the user and the session keeps running.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Sheet(#[from] SheetError),
    #[error("exit requested")]
    ExitRequested,
}

impl From<DateError> for CommandError {
    fn from(err: DateError) -> Self {
        CommandError::Sheet(SheetError::Date(err))
    }
}

/// Failures that terminate the shell.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Sheet(#[from] SheetError),
    #[error("readline error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Owns the active sheet name, the committed sequence, and the one working
/// item. Every command handler goes through this context.
pub struct ShellContext {
    registry: CommandRegistry,
    store: JsonStore,
    sheet: String,
    items: Vec<LineItem>,
    working: LineItem,
}

impl ShellContext {
    /// Opens a session with its store rooted at `dir`, loading the default
    /// sheet. An absent sheet file silently starts the session empty.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, SheetError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let store = JsonStore::new(dir);
        let sheet = DEFAULT_SHEET.to_string();
        let items = store.load(&sheet)?;

        Ok(Self {
            registry,
            store,
            sheet,
            items,
            working: LineItem::new(),
        })
    }

    pub fn prompt(&self) -> String {
        format!("({}) ", self.sheet)
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn working(&self) -> &LineItem {
        &self.working
    }

    pub fn working_mut(&mut self) -> &mut LineItem {
        &mut self.working
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn command_entries(&self) -> impl Iterator<Item = &CommandEntry> + '_ {
        self.registry.entries()
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        arg: &str,
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, arg) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let mut suggestions: Vec<_> = self
            .registry
            .names()
            .map(|name| (levenshtein(name, input), name))
            .collect();
        suggestions.sort_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = suggestions.first() {
            if *distance <= 3 {
                output::hint(format!("Did you mean `{}`?", best));
            }
        }
    }

    /// Reports a command failure. Date trouble is a warning, bad input is an
    /// error message, and persistence failures are fatal to the session.
    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                output::error(message);
                Ok(())
            }
            CommandError::Sheet(SheetError::Date(warned)) => {
                output::warning(warned);
                Ok(())
            }
            CommandError::Sheet(fatal @ (SheetError::Io(_) | SheetError::Serde(_))) => {
                Err(CliError::Sheet(fatal))
            }
            CommandError::Sheet(reported) => {
                output::error(reported);
                Ok(())
            }
        }
    }

    /// Appends a copy of the working item to the sheet, persists the full
    /// sequence, and shows the sheet. The working item keeps its values as
    /// the starting point for the next entry.
    pub fn commit(&mut self) -> CommandResult {
        self.items.push(self.working.clone());
        self.store.save(&self.sheet, &self.items)?;
        info!(sheet = %self.sheet, items = self.items.len(), "item committed");
        self.show();
        Ok(())
    }

    /// Removes the item at the 1-based `index` and makes it the working
    /// item. An index outside `[1, len]` is a silent no-op.
    pub fn delete(&mut self, index: usize) -> CommandResult {
        if index == 0 || index > self.items.len() {
            return Ok(());
        }
        self.working = self.items.remove(index - 1);
        self.store.save(&self.sheet, &self.items)?;
        Ok(())
    }

    /// Sums cost, vat, and gross over the committed items into a synthetic
    /// footer row.
    pub fn totals(&self) -> LineItem {
        let (mut cost, mut vat, mut gross) = (0.0, 0.0, 0.0);
        for item in &self.items {
            cost += item.cost;
            vat += item.vat;
            gross += item.gross;
        }
        LineItem::totals(cost, vat, gross)
    }

    /// Prints the sheet: header, committed rows in commit order, totals
    /// footer, then the highlighted working row. Never mutates state.
    pub fn show(&self) {
        table::print_header();
        for (idx, item) in self.items.iter().enumerate() {
            table::print_row(&(idx + 1).to_string(), item, false);
        }
        table::print_totals(&self.totals());
        self.print_working();
    }

    pub fn print_working(&self) {
        table::print_row(table::WORKING_LABEL, &self.working, true);
    }

    /// With a name: switch the active sheet (absent file means an empty
    /// sheet) and show it. With no name: list the sheets on disk without
    /// touching the session.
    pub fn load(&mut self, arg: &str) -> CommandResult {
        let name = arg.trim();
        if name.is_empty() {
            let names = self.store.list_sheets()?;
            output::listing(names.join("\t"));
            return Ok(());
        }

        validate_sheet_name(name)?;
        self.items = self.store.load(name)?;
        self.sheet = name.to_string();
        info!(sheet = %self.sheet, items = self.items.len(), "sheet selected");
        self.show();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::super::shell::handle_line;
    use super::*;

    fn session() -> (ShellContext, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let context = ShellContext::new(temp.path()).expect("session");
        (context, temp)
    }

    fn run(context: &mut ShellContext, line: &str) {
        handle_line(context, line).expect("command");
    }

    fn approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn session_starts_on_the_default_sheet() {
        let (context, _guard) = session();
        assert_eq!(context.sheet_name(), DEFAULT_SHEET);
        assert_eq!(context.prompt(), "(expenses) ");
        assert!(context.items().is_empty());
    }

    #[test]
    fn commit_appends_without_resetting_the_working_item() {
        let (mut context, _guard) = session();
        run(&mut context, "desc taxi");
        run(&mut context, "gross 12.00");
        run(&mut context, "commit");

        assert_eq!(context.items().len(), 1);
        assert_eq!(context.working().desc, "taxi");
        approx(context.working().gross, 12.0);

        run(&mut context, "commit");
        assert_eq!(context.items().len(), 2);
        assert_eq!(context.items()[1], context.items()[0]);
    }

    #[test]
    fn desc_keeps_the_rest_of_the_line_verbatim() {
        let (mut context, _guard) = session();
        run(&mut context, "desc train journey Edinburgh to Grindelwald");
        assert_eq!(
            context.working().desc,
            "train journey Edinburgh to Grindelwald"
        );
    }

    #[test]
    fn trip_scenario_totals() {
        let (mut context, _guard) = session();
        run(&mut context, "date 2024-01-01");
        run(&mut context, "desc taxi");
        run(&mut context, "rate 0.20");
        run(&mut context, "gross 12.00");
        run(&mut context, "commit");
        approx(context.items()[0].cost, 10.0);
        approx(context.items()[0].vat, 2.0);

        run(&mut context, "desc lunch");
        run(&mut context, "cost 8.00");
        run(&mut context, "commit");
        approx(context.items()[1].gross, 9.6);
        approx(context.items()[1].vat, 1.6);

        let totals = context.totals();
        approx(totals.cost, 18.0);
        approx(totals.vat, 3.6);
        approx(totals.gross, 21.6);
    }

    #[test]
    fn delete_restores_the_item_into_the_working_slot() {
        let (mut context, _guard) = session();
        run(&mut context, "desc first");
        run(&mut context, "gross 1");
        run(&mut context, "commit");
        run(&mut context, "desc second");
        run(&mut context, "gross 2");
        run(&mut context, "commit");

        run(&mut context, "del 1");
        assert_eq!(context.items().len(), 1);
        assert_eq!(context.items()[0].desc, "second");
        assert_eq!(context.working().desc, "first");

        // re-committing appends at the end, not at the old position
        run(&mut context, "commit");
        assert_eq!(context.items()[1].desc, "first");
    }

    #[test]
    fn out_of_range_delete_is_a_silent_no_op() {
        let (mut context, _guard) = session();
        run(&mut context, "desc only");
        run(&mut context, "gross 5");
        run(&mut context, "commit");

        run(&mut context, "del 0");
        run(&mut context, "del 2");
        assert_eq!(context.items().len(), 1);
        assert_eq!(context.working().desc, "only");
    }

    #[test]
    fn show_does_not_mutate_the_sheet() {
        let (mut context, _guard) = session();
        run(&mut context, "desc taxi");
        run(&mut context, "gross 12.00");
        run(&mut context, "commit");
        let before = context.items().to_vec();
        let working_before = context.working().clone();

        run(&mut context, "show");
        assert_eq!(context.items(), &before[..]);
        assert_eq!(context.working(), &working_before);
    }

    #[test]
    fn load_switches_sheets_and_reads_them_back() {
        let (mut context, _guard) = session();
        run(&mut context, "desc taxi");
        run(&mut context, "gross 12.00");
        run(&mut context, "load trip");
        assert!(context.items().is_empty());
        run(&mut context, "commit");

        run(&mut context, "load other");
        assert_eq!(context.sheet_name(), "other");
        assert!(context.items().is_empty());

        run(&mut context, "load trip");
        assert_eq!(context.items().len(), 1);
        assert_eq!(context.items()[0].desc, "taxi");
    }

    #[test]
    fn load_rejects_names_outside_the_pattern() {
        let (mut context, _guard) = session();
        let err = context.load("no/slashes").unwrap_err();
        assert!(matches!(
            err,
            CommandError::Sheet(SheetError::InvalidSheetName(_))
        ));
        assert_eq!(context.sheet_name(), DEFAULT_SHEET);
    }

    #[test]
    fn load_without_a_name_does_not_change_the_active_sheet() {
        let (mut context, _guard) = session();
        run(&mut context, "load trip");
        run(&mut context, "commit");
        run(&mut context, "load");
        assert_eq!(context.sheet_name(), "trip");
    }

    #[test]
    fn committed_items_survive_a_new_session() {
        let temp = TempDir::new().expect("temp dir");
        {
            let mut context = ShellContext::new(temp.path()).expect("session");
            run(&mut context, "date 2024-01-01");
            run(&mut context, "desc taxi");
            run(&mut context, "gross 12.00");
            run(&mut context, "commit");
        }
        let context = ShellContext::new(temp.path()).expect("session");
        assert_eq!(context.items().len(), 1);
        assert_eq!(context.items()[0].desc, "taxi");
        approx(context.items()[0].cost, 10.0);
    }

    #[test]
    fn bad_numeric_input_is_reported_but_not_fatal() {
        let (mut context, _guard) = session();
        let err = handle_line(&mut context, "gross twelve").unwrap_err();
        assert!(context.report_error(err).is_ok());
        approx(context.working().gross, 0.0);
    }

    #[test]
    fn bye_requests_exit() {
        let (mut context, _guard) = session();
        assert_eq!(
            handle_line(&mut context, "bye").expect("command"),
            LoopControl::Exit
        );
    }

    #[test]
    fn unknown_commands_keep_the_loop_running() {
        let (mut context, _guard) = session();
        assert_eq!(
            handle_line(&mut context, "comit").expect("command"),
            LoopControl::Continue
        );
    }
}
