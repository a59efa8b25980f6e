//! Command dispatch

use std::io;

use clap::CommandFactory;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::application::services::CommentRequest;
use crate::cli::args::{Cli, Commands, CommentCommands, ConfigCommands, PostCommands, UserCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, see `numchain --help`".to_string(),
        ));
    };

    match command {
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        Commands::Config { command } => {
            let settings = load_settings(cli)?;
            cmd_config(&settings, command)
        }
        Commands::User { command } => {
            let container = open(cli)?;
            cmd_user(&container, command)
        }
        Commands::Post { command } => {
            let container = open(cli)?;
            cmd_post(&container, command)
        }
        Commands::Comment { command } => {
            let container = open(cli)?;
            cmd_comment(&container, command)
        }
    }
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let settings = Settings::load(cli.config.as_deref())?;
    Ok(match &cli.store {
        Some(path) => settings.with_store_path(path),
        None => settings,
    })
}

fn open(cli: &Cli) -> CliResult<ServiceContainer> {
    let settings = load_settings(cli)?;
    debug!("settings: {:?}", settings);
    Ok(ServiceContainer::new(settings)?)
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> CliResult<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(InfraError::from)?;
    output::info(&json);
    Ok(())
}

#[instrument(skip(settings))]
fn cmd_config(settings: &Settings, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => match global_config_path() {
            Some(path) => output::info(&path.display()),
            None => output::warning("cannot determine config directory"),
        },
    }
    Ok(())
}

#[instrument(skip(c))]
fn cmd_user(c: &ServiceContainer, command: &UserCommands) -> CliResult<()> {
    match command {
        UserCommands::Add { name } => {
            let user = c.users.register(name)?;
            output::success(&format!("registered {}", user.username));
            output::detail(&user.id);
        }
    }
    Ok(())
}

#[instrument(skip(c))]
fn cmd_post(c: &ServiceContainer, command: &PostCommands) -> CliResult<()> {
    let pretty = c.settings.pretty_json;
    match command {
        PostCommands::Create { user, number } => {
            let owner = c.users.find(user)?;
            let post = c.posts.create_post(owner.id, Some(*number))?;
            output::success(&format!("post {} created", post.post.id));
            output::info(&output::post_tree(&post));
        }
        PostCommands::List { json } => {
            let forest = c.posts.forest()?;
            if *json {
                print_json(&forest, pretty)?;
            } else if forest.is_empty() {
                output::info("no posts yet");
            } else {
                for post in &forest {
                    output::info(&output::post_tree(post));
                }
            }
        }
        PostCommands::Show { id, json } => {
            let post = c.posts.post_tree(*id)?;
            if *json {
                print_json(&post, pretty)?;
            } else {
                output::info(&output::post_tree(&post));
            }
        }
    }
    Ok(())
}

#[instrument(skip(c))]
fn cmd_comment(c: &ServiceContainer, command: &CommentCommands) -> CliResult<()> {
    match command {
        CommentCommands::Add {
            user,
            post,
            parent,
            dry_run,
            operator,
            operand,
        } => {
            let request = CommentRequest::new(*post, *parent, operator.as_str(), *operand);
            if *dry_run {
                let result = c.comments.preview(&request)?;
                output::info(&result);
                return Ok(());
            }
            let owner = c.users.find(user)?;
            let comment = c.comments.create_comment(owner.id, &request)?;
            output::success(&format!(
                "{} {} = {}",
                comment.comment.operator, comment.comment.right_operand, comment.comment.result
            ));
            output::detail(&comment.comment.id);
        }
    }
    Ok(())
}
