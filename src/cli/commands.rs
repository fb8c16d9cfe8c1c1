//! Command dispatch: each subcommand is a thin wrapper over the application layer.

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::{QueueUpdate, StateFile, StateStore};
use crate::cli::args::{Cli, Commands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::Settings;
use crate::domain::{traversal, NodeFields, StreamType, SwitchState};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let settings = Settings::load(cli.config.as_deref())?;
    debug!(?settings, "settings loaded");

    match &cli.command {
        Some(Commands::Show { file }) => cmd_show(&settings, file.as_deref()),
        Some(Commands::Check { file }) => cmd_check(&settings, file.as_deref()),
        Some(Commands::SetQueue {
            file,
            port,
            queue,
            weight,
            priority,
            stream_type,
            dry_run,
        }) => {
            let update = QueueUpdate {
                port: *port,
                queue: *queue,
                weight: *weight,
                priority: *priority,
                stream_type: *stream_type,
            };
            cmd_set_queue(&settings, file.as_deref(), &update, *dry_run)
        }
        Some(Commands::Config) => cmd_config(&settings),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, see `swstate --help`".to_string(),
        )),
    }
}

/// Explicit file, else the configured `state_file`.
fn resolve_file(settings: &Settings, file: Option<&Path>) -> CliResult<PathBuf> {
    file.map(Path::to_path_buf)
        .or_else(|| settings.state_file.clone())
        .ok_or_else(|| {
            CliError::Usage("no state file given and no state_file configured".to_string())
        })
}

fn state_file(settings: &Settings, file: Option<&Path>) -> CliResult<StateFile> {
    Ok(StateFile::new(
        resolve_file(settings, file)?,
        settings.pretty_json,
    ))
}

#[instrument(skip(settings))]
fn cmd_show(settings: &Settings, file: Option<&Path>) -> CliResult<()> {
    let state = state_file(settings, file)?.load()?;
    output::info(&traversal::to_tree(state.as_ref()));
    Ok(())
}

#[instrument(skip(settings))]
fn cmd_check(settings: &Settings, file: Option<&Path>) -> CliResult<()> {
    let source = state_file(settings, file)?;
    let state = source.load()?;
    output::success(&format!(
        "{}: {}",
        source.path().display(),
        summary(&state)
    ));
    Ok(())
}

#[instrument(skip(settings))]
fn cmd_set_queue(
    settings: &Settings,
    file: Option<&Path>,
    update: &QueueUpdate,
    dry_run: bool,
) -> CliResult<()> {
    if update.is_empty() {
        return Err(CliError::InvalidArgs(
            "nothing to change, pass --weight, --priority or --stream-type".to_string(),
        ));
    }
    let target = state_file(settings, file)?;
    let store = StateStore::new(target.load()?, settings.pool_capacity);

    let before = queue_label(&store.snapshot(), update);
    let next = store.apply(update)?;
    let after = queue_label(&next, update);

    output::header(&format!("port {} queue {}", update.port, update.queue));
    if let Some(before) = before {
        output::diff_remove(&before);
    }
    if let Some(after) = after {
        output::diff_add(&after);
    }

    if dry_run {
        output::info("(dry run, nothing written)");
        return Ok(());
    }
    target.save(&next)?;
    output::action("Saved", &target.path().display());
    Ok(())
}

fn cmd_config(settings: &Settings) -> CliResult<()> {
    output::info(&settings.to_toml()?);
    Ok(())
}

fn queue_label(state: &SwitchState, update: &QueueUpdate) -> Option<String> {
    let queue = state.port(update.port)?.queue(update.queue)?;
    Some(queue.fields().label())
}

fn summary(state: &SwitchState) -> String {
    let queues: usize = state.ports().iter().map(|p| p.queues().len()).sum();
    let unicast = state
        .ports()
        .iter()
        .flat_map(|p| p.queues())
        .filter(|q| q.stream_type() == StreamType::Unicast)
        .count();
    format!(
        "{} ports, {} queues ({} unicast), {} nodes, depth {}",
        state.ports().len(),
        queues,
        unicast,
        traversal::count_nodes(state),
        traversal::depth(state)
    )
}
