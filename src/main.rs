use clap::error::ErrorKind as ClapErrorKind;
use clap::{Parser, Subcommand};
use gitlet::areas::repository::Repository;
use gitlet::errors::GitletError;
use is_terminal::IsTerminal;
use std::io::Write;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const LOG_ENV_VAR: &str = "GITLET_LOG";
const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Parser)]
#[command(
    name = "gitlet",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A miniature version-control system",
    long_about = "Gitlet keeps snapshots of a flat working directory as commits, \
    with branches, checkouts, resets and three-way merges. \
    Repository data lives in the .gitlet directory.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

COMMANDS:
{subcommands}
"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(name = "init", about = "Create a repository in the current directory")]
    Init,
    #[command(name = "add", about = "Stage a file for the next commit")]
    Add {
        #[arg(index = 1)]
        path: String,
    },
    #[command(name = "rm", about = "Unstage a file, or stage its removal")]
    Rm {
        #[arg(index = 1)]
        path: String,
    },
    #[command(name = "commit", about = "Record the staged snapshot")]
    Commit {
        #[arg(index = 1, help = "The commit message")]
        message: Option<String>,
    },
    #[command(name = "log", about = "Show the history of the current branch")]
    Log,
    #[command(name = "global-log", about = "Show every commit reachable from a branch")]
    GlobalLog,
    #[command(name = "find", about = "Print the ids of commits with the given message")]
    Find {
        #[arg(index = 1)]
        message: String,
    },
    #[command(name = "status", about = "Show branches, staged files and working tree changes")]
    Status,
    #[command(
        name = "checkout",
        about = "Restore a file or switch branches",
        long_about = "checkout -- <file> restores a file from the head commit, \
        checkout <commit> -- <file> restores it from the given commit, \
        checkout <branch> switches to the given branch."
    )]
    Checkout {
        #[arg(index = 1, help = "A commit id or a branch name")]
        target: Option<String>,
        #[arg(index = 2, last = true, help = "The file to restore")]
        path: Option<String>,
    },
    #[command(name = "branch", about = "Create a branch at the current head commit")]
    Branch {
        #[arg(index = 1)]
        name: String,
    },
    #[command(name = "rm-branch", about = "Delete a branch pointer")]
    RmBranch {
        #[arg(index = 1)]
        name: String,
    },
    #[command(name = "reset", about = "Move the current branch to a commit")]
    Reset {
        #[arg(index = 1)]
        commit: String,
    },
    #[command(name = "merge", about = "Merge a branch into the current branch")]
    Merge {
        #[arg(index = 1)]
        branch: String,
    },
}

fn main() -> ExitCode {
    init_tracing();
    colored::control::set_override(
        std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
    );

    let outcome = parse_cli().and_then(|cli| {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?
            .block_on(run(cli))
    });

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => report(error),
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

/// Parse arguments, mapping usage failures to their fixed messages
fn parse_cli() -> anyhow::Result<Cli> {
    Cli::try_parse().or_else(|error| match error.kind() {
        ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion => error.exit(),
        ClapErrorKind::MissingSubcommand
        | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            Err(GitletError::MissingCommand.into())
        }
        ClapErrorKind::InvalidSubcommand => Err(GitletError::UnknownCommand.into()),
        _ => {
            tracing::debug!(%error, "rejected arguments");
            Err(GitletError::IncorrectOperands.into())
        }
    })
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let pwd = std::env::current_dir()?;
    let mut repository = Repository::new(&pwd.to_string_lossy(), Box::new(std::io::stdout()))?;

    if !matches!(cli.command, Commands::Init) {
        repository.ensure_initialized()?;
    }

    match cli.command {
        Commands::Init => repository.init().await?,
        Commands::Add { path } => repository.add(&path).await?,
        Commands::Rm { path } => repository.rm(&path).await?,
        Commands::Commit { message } => {
            repository
                .commit(message.as_deref().unwrap_or_default())
                .await?
        }
        Commands::Log => repository.log().await?,
        Commands::GlobalLog => repository.global_log().await?,
        Commands::Find { message } => repository.find(&message).await?,
        Commands::Status => repository.status().await?,
        Commands::Checkout { target, path } => match (target, path) {
            (target, Some(path)) => repository.checkout_file(target.as_deref(), &path).await?,
            (Some(branch), None) => repository.checkout_branch(&branch).await?,
            (None, None) => return Err(GitletError::IncorrectOperands.into()),
        },
        Commands::Branch { name } => repository.branch(&name).await?,
        Commands::RmBranch { name } => repository.rm_branch(&name).await?,
        Commands::Reset { commit } => repository.reset(&commit).await?,
        Commands::Merge { branch } => repository.merge(&branch).await?,
    }

    repository.writer().flush()?;

    Ok(())
}

/// User-facing failures go to stdout with exit code 1, anything else is fatal
fn report(error: anyhow::Error) -> ExitCode {
    match error.downcast_ref::<GitletError>() {
        Some(gitlet_error) => {
            tracing::debug!(kind = ?gitlet_error.kind(), "command rejected");
            println!("{gitlet_error}");
            ExitCode::from(1)
        }
        None => {
            eprintln!("fatal: {error:#}");
            ExitCode::from(2)
        }
    }
}
