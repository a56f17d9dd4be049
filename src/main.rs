//! ccqp - Switch Claude Code between API credential profiles.

use ccqp::cli::{AutostartCommands, Cli, Commands, ProfileCommands};
use ccqp::commands::{self, Output};
use ccqp::config::{AppPaths, LOG_ENV};
use ccqp::engine::ProfileManager;
use clap::Parser;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let human = cli.human_readable;

    let result = AppPaths::resolve()
        .and_then(|paths| ProfileManager::open(&paths))
        .and_then(|manager| run_command(cli.command, &manager, human));

    if let Err(e) = result {
        if human {
            eprintln!("Error: {}", e);
        } else {
            eprintln!("{}", serde_json::json!({ "error": e.to_string() }));
        }
        process::exit(1);
    }
}

/// Log to stderr so stdout stays parseable. Level comes from `CCQP_LOG`.
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run_command(
    command: Option<Commands>,
    manager: &ProfileManager,
    human: bool,
) -> Result<(), ccqp::Error> {
    match command.unwrap_or(Commands::Status) {
        Commands::Status => output(&commands::status(manager)?, human),
        Commands::Reconcile => output(&commands::reconcile(manager)?, human),
        Commands::Enable => output(&commands::enable(manager)?, human),
        Commands::Disable => output(&commands::disable(manager)?, human),
        Commands::Profile { command } => match command {
            ProfileCommands::List => output(&commands::profile_list(manager)?, human),
            ProfileCommands::Show { name } => {
                output(&commands::profile_show(manager, &name)?, human)
            }
            ProfileCommands::Add {
                name,
                url,
                key,
                activate,
            } => output(
                &commands::profile_add(manager, &name, &url, &key, activate)?,
                human,
            ),
            ProfileCommands::Update {
                name,
                new_name,
                url,
                key,
            } => output(
                &commands::profile_update(
                    manager,
                    &name,
                    new_name.as_deref(),
                    url.as_deref(),
                    key.as_deref(),
                )?,
                human,
            ),
            ProfileCommands::Remove { name } => {
                output(&commands::profile_remove(manager, &name)?, human)
            }
            ProfileCommands::Use { name } => {
                output(&commands::profile_use(manager, &name)?, human)
            }
        },
        Commands::Autostart { command } => match command {
            AutostartCommands::Status => output(&commands::autostart_status(manager)?, human),
            AutostartCommands::On => output(&commands::autostart_set(manager, true)?, human),
            AutostartCommands::Off => output(&commands::autostart_set(manager, false)?, human),
        },
    }
    Ok(())
}

fn output<T: Output>(result: &T, human: bool) {
    if human {
        println!("{}", result.to_human());
    } else {
        println!("{}", result.to_json());
    }
}
