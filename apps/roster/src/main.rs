mod config;
mod terminal;

use std::{path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    render_view, ActionOutcome, ClientError, EmployeeStore, HttpTransport, ListLoader, LoadState,
    RenderTrigger, RosterApi, RosterController,
};
use shared::{
    domain::{EmployeeId, ShiftTime},
    protocol::DebugAction,
};
use terminal::{ConsoleNotifier, PresetFields, TerminalDialog};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "roster", about = "Manage the employee roster of a running backend")]
struct Args {
    /// Backend base URL, e.g. http://127.0.0.1:8080/
    #[arg(long, global = true)]
    server_url: Option<String>,
    /// Settings file; defaults to ./roster.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug, Default)]
struct FieldArgs {
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    last_name: Option<String>,
    #[arg(long)]
    shift_start: Option<ShiftTime>,
    #[arg(long)]
    shift_end: Option<ShiftTime>,
}

impl From<FieldArgs> for PresetFields {
    fn from(args: FieldArgs) -> Self {
        Self {
            first_name: args.first_name,
            last_name: args.last_name,
            shift_start: args.shift_start,
            shift_end: args.shift_end,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the employee list.
    List,
    /// Add an employee, prompting for any field not given.
    Add(FieldArgs),
    /// Edit an employee; prompts are prefilled from the current record.
    Edit {
        id: EmployeeId,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Delete an employee after confirmation.
    Delete {
        id: EmployeeId,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// Run a backend maintenance task: create-table, seed, undelete-all, delete-all,
    /// truncate-table.
    Debug { action: DebugAction },
    /// Reload and redraw the employee list.
    Rerender,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let mut args = Args::parse();
    init_tracing(args.verbose);

    let mut settings = config::load_settings(args.config.as_deref())?;
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }
    info!(server_url = %settings.server_url, "roster: starting");

    let transport = HttpTransport::new(&settings.server_url, settings.request_timeout)
        .with_context(|| format!("cannot use server url '{}'", settings.server_url))?;
    let api = RosterApi::new(Arc::new(transport));
    let renderer: Arc<dyn RenderTrigger> =
        Arc::new(|state: &LoadState| println!("{}", render_view(state)));
    let loader = Arc::new(
        ListLoader::new(api.clone(), Arc::new(EmployeeStore::new()), renderer)
            .with_retry_policy(settings.retry)
            .with_terminal_signatures(settings.terminal_signatures),
    );

    let preset = match &mut args.command {
        Command::Add(fields) | Command::Edit { fields, .. } => std::mem::take(fields).into(),
        _ => PresetFields::default(),
    };

    let controller = RosterController::new(
        api,
        loader.clone(),
        Arc::new(TerminalDialog::new(preset)),
        Arc::new(ConsoleNotifier),
    );

    let outcome = match args.command {
        Command::List => {
            loader.load().await;
            Ok(ActionOutcome::Completed)
        }
        Command::Add(_) => controller.add_employee().await,
        Command::Edit { id, .. } => controller.edit_employee(id).await,
        Command::Delete { id, yes: true } => controller.delete_confirmed(id).await,
        Command::Delete { id, yes: false } => controller.delete_employee(id).await,
        Command::Debug { action } => controller.run_debug(action).await,
        Command::Rerender => {
            controller.rerender().await;
            Ok(ActionOutcome::Completed)
        }
    };

    if matches!(outcome, Ok(ActionOutcome::Cancelled)) {
        println!("Cancelled.");
    }
    if succeeded(&outcome, &loader.store().get_state().await) {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Failed actions were already reported by the notifier.
fn succeeded(outcome: &Result<ActionOutcome, ClientError>, state: &LoadState) -> bool {
    match outcome {
        Err(_) => false,
        Ok(ActionOutcome::Cancelled) => true,
        Ok(ActionOutcome::Completed) => !render_view(state).is_error(),
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
