//! Command table and handlers.

use super::context::{CommandError, CommandResult, ShellContext};
use super::output;
use super::registry::{CommandEntry, CommandRegistry};

pub fn register_all(registry: &mut CommandRegistry) {
    registry.register(CommandEntry::new(
        "date",
        "Set the working item's date",
        "date today | date +N | date -N | date YYYY-MM-DD",
        cmd_date,
    ));
    registry.register(CommandEntry::new(
        "desc",
        "Set the working item's description",
        "desc <free text>",
        cmd_desc,
    ));
    registry.register(CommandEntry::new(
        "cost",
        "Set the net cost; gross and vat follow",
        "cost <number>",
        cmd_cost,
    ));
    registry.register(CommandEntry::new(
        "gross",
        "Set the gross amount; cost and vat follow",
        "gross <number>",
        cmd_gross,
    ));
    registry.register(CommandEntry::new(
        "rate",
        "Set the tax rate as a fraction or percentage",
        "rate 0.2 | rate 20",
        cmd_rate,
    ));
    registry.register(CommandEntry::new(
        "commit",
        "Append the working item to the sheet and save",
        "commit",
        cmd_commit,
    ));
    registry.register(CommandEntry::new(
        "del",
        "Remove an item and place it back in the working slot",
        "del <index>",
        cmd_del,
    ));
    registry.register(CommandEntry::new(
        "show",
        "Show the sheet with running totals",
        "show",
        cmd_show,
    ));
    registry.register(CommandEntry::new(
        "load",
        "Switch sheets, or list sheets on disk",
        "load [name]",
        cmd_load,
    ));
    registry.register(CommandEntry::new(
        "help",
        "List commands, or describe one",
        "help [command]",
        cmd_help,
    ));
    registry.register(CommandEntry::new("bye", "Exit the shell", "bye", cmd_bye));
}

fn cmd_date(context: &mut ShellContext, arg: &str) -> CommandResult {
    context.working_mut().set_date(arg)?;
    Ok(())
}

fn cmd_desc(context: &mut ShellContext, arg: &str) -> CommandResult {
    context.working_mut().set_desc(arg);
    Ok(())
}

fn cmd_cost(context: &mut ShellContext, arg: &str) -> CommandResult {
    context.working_mut().set_cost(arg)?;
    Ok(())
}

fn cmd_gross(context: &mut ShellContext, arg: &str) -> CommandResult {
    context.working_mut().set_gross(arg)?;
    Ok(())
}

fn cmd_rate(context: &mut ShellContext, arg: &str) -> CommandResult {
    context.working_mut().set_rate(arg)?;
    Ok(())
}

fn cmd_commit(context: &mut ShellContext, _arg: &str) -> CommandResult {
    context.commit()
}

fn cmd_del(context: &mut ShellContext, arg: &str) -> CommandResult {
    let index: usize = arg
        .trim()
        .parse()
        .map_err(|_| CommandError::InvalidArguments("usage: del <index>".into()))?;
    context.delete(index)
}

fn cmd_show(context: &mut ShellContext, _arg: &str) -> CommandResult {
    context.show();
    Ok(())
}

fn cmd_load(context: &mut ShellContext, arg: &str) -> CommandResult {
    context.load(arg)
}

fn cmd_help(context: &mut ShellContext, arg: &str) -> CommandResult {
    let topic = arg.trim();
    if topic.is_empty() {
        for entry in context.command_entries() {
            output::info(format!("  {:<8} {}", entry.name, entry.description));
        }
        return Ok(());
    }
    match context.command(topic) {
        Some(entry) => {
            output::info(format!("{} - {}", entry.name, entry.description));
            output::info(format!("usage: {}", entry.usage));
            Ok(())
        }
        None => Err(CommandError::InvalidArguments(format!(
            "unknown command `{}`",
            topic
        ))),
    }
}

fn cmd_bye(_context: &mut ShellContext, _arg: &str) -> CommandResult {
    Err(CommandError::ExitRequested)
}
