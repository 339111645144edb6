use anyhow::Result;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

use taskgen::contexts::health::DEFAULT_POLL_INTERVAL;
use taskgen::contexts::{EditableCollection, ExportFormat};
use taskgen::data::GenerationRequest;

mod cli;

#[derive(Parser)]
#[command(name = "taskgen")]
#[command(
    about = "Turn a feature idea into user stories, engineering tasks and risks",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true, help = "Enable verbose debug output")]
    verbose: bool,

    #[arg(long, global = true, help = "Directory holding the spec history (defaults to .taskgen)")]
    data_dir: Option<PathBuf>,

    #[arg(long, global = true, help = "Provider registry file (defaults to providers.yml)")]
    providers: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Serve the generation and status endpoints over HTTP")]
    Serve {
        #[arg(long, default_value = "127.0.0.1:3000")]
        addr: SocketAddr,
    },

    #[command(about = "Generate a spec from a feature description and save it")]
    Generate {
        #[arg(long, help = "Feature goal")]
        goal: String,
        #[arg(long, help = "Target users")]
        users: String,
        #[arg(long, help = "Constraints")]
        constraints: String,
        #[arg(long, help = "Project template: mobile_app, web_app, internal_tool or api")]
        template: Option<String>,
    },

    #[command(subcommand)]
    History(HistoryCommands),

    #[command(about = "Edit an entry of a saved spec")]
    Edit {
        id: i64,
        #[command(subcommand)]
        action: cli::EditAction,
    },

    #[command(about = "List the group labels used in a saved spec")]
    Groups { id: i64 },

    #[command(about = "List the stories or tasks of a saved spec in one group")]
    Filter {
        id: i64,
        #[arg(help = "stories or tasks")]
        collection: EditableCollection,
        #[arg(default_value = "all", help = "Group label, or 'all'")]
        group: String,
    },

    #[command(about = "Export a saved spec as markdown or plain text")]
    Export {
        id: i64,
        #[arg(long, default_value = "markdown")]
        format: ExportFormat,
        #[arg(long, conflicts_with = "stdout", help = "Directory to write the export into")]
        out: Option<PathBuf>,
        #[arg(long, help = "Print the export instead of writing a file")]
        stdout: bool,
    },

    #[command(about = "Check backend and LLM provider health")]
    Status {
        #[arg(long, help = "Keep polling until interrupted")]
        watch: bool,
        #[arg(
            long,
            default_value_t = DEFAULT_POLL_INTERVAL.as_secs(),
            value_parser = clap::value_parser!(u64).range(1..)
        )]
        interval: u64,
    },
}

#[derive(Subcommand)]
#[command(about = "Inspect the saved spec history")]
enum HistoryCommands {
    #[command(about = "List saved specs, newest first")]
    List,
    #[command(about = "Show one saved spec")]
    Show { id: i64 },
    #[command(about = "Delete one saved spec")]
    Delete { id: i64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::from_filename(".env.local").ok();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    taskgen::logging::init(cli.verbose);

    let config = cli::Config {
        verbose: cli.verbose,
        data_dir: cli.data_dir,
        providers: cli.providers,
    };

    match cli.command {
        Commands::Serve { addr } => {
            cli::serve(addr, &config).await?;
        }
        Commands::Generate {
            goal,
            users,
            constraints,
            template,
        } => {
            let request = GenerationRequest::new(goal, users, constraints, template);
            cli::generate(request, &config).await?;
        }
        Commands::History(history_cmd) => match history_cmd {
            HistoryCommands::List => cli::history_list(&config)?,
            HistoryCommands::Show { id } => cli::history_show(id, &config)?,
            HistoryCommands::Delete { id } => cli::history_delete(id, &config)?,
        },
        Commands::Edit { id, action } => {
            cli::edit(id, action, &config)?;
        }
        Commands::Groups { id } => {
            cli::groups(id, &config)?;
        }
        Commands::Filter {
            id,
            collection,
            group,
        } => {
            cli::filter(id, collection, &group, &config)?;
        }
        Commands::Export {
            id,
            format,
            out,
            stdout,
        } => {
            cli::export(id, format, out, stdout, &config)?;
        }
        Commands::Status { watch, interval } => {
            cli::status(watch, interval, &config).await?;
        }
    }

    Ok(())
}
