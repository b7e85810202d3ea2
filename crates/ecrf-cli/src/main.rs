//! ecrf - command line tool for form documents.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ecrf")]
#[command(author, version, about = "Create, inspect and validate ecrf form documents")]
struct Cli {
    /// Directory of the form store (defaults to the platform data directory)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Path to config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new, empty form
    New {
        /// Form title
        title: String,

        /// Store key (defaults to the form id)
        #[arg(short, long)]
        key: Option<String>,
    },

    /// List stored forms
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a stored form
    Show {
        /// Store key
        key: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a stored form or a form JSON file
    Validate {
        /// Store key or path to a JSON file
        source: String,
    },

    /// Add a control to a stored form
    Add {
        /// Store key
        key: String,

        /// Control type tag (e.g. "TextInput", "Columns")
        type_tag: String,

        /// Control title
        #[arg(short, long)]
        title: Option<String>,

        /// Target container ("form" or "column-<index>-<columnsId>")
        #[arg(long, default_value = "form")]
        target: String,

        /// Position in the target container (defaults to the end)
        #[arg(long)]
        index: Option<usize>,

        /// Extra options as a JSON object
        #[arg(long)]
        options: Option<String>,
    },

    /// Delete a stored form
    Delete {
        /// Store key
        key: String,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let context = commands::Context::open(cli.store, cli.config.as_deref())?;

    match cli.command {
        Commands::New { title, key } => {
            commands::new_form(&context, &title, key.as_deref())?;
        }
        Commands::List { json } => {
            commands::list(&context, json)?;
        }
        Commands::Show { key, json } => {
            commands::show(&context, &key, json)?;
        }
        Commands::Validate { source } => {
            commands::validate(&context, &source)?;
        }
        Commands::Add {
            key,
            type_tag,
            title,
            target,
            index,
            options,
        } => {
            commands::add(
                &context,
                commands::AddArgs {
                    key: &key,
                    type_tag: &type_tag,
                    title: title.as_deref(),
                    target: &target,
                    index,
                    options: options.as_deref(),
                },
            )?;
        }
        Commands::Delete { key } => {
            commands::delete(&context, &key)?;
        }
    }

    Ok(())
}
