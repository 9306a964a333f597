mod add;
mod delete;
mod query;

use std::path::{Path, PathBuf};

use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand};
use stringslator::{Catalog, DeleteTarget, EntityKind, InfoTarget, ListFilter, SearchMode};

use crate::{
    add::run_add_command,
    delete::run_delete_command,
    query::{ListRequest, run_export_command, run_info_command, run_list_command, run_search_command},
};
use stringslator_cli::config;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Catalog and search the localized strings of applications",
    long_about = None,
    after_help = "Examples:\n  stringslator add -r /System/ /Applications/Mail.app\n  stringslator search '% Update%'\n  stringslator export 714 kWDLocPerfSignalGraphToolTip"
)]
struct Args {
    /// Catalog database file
    #[arg(long, global = true, env = config::DB_ENV, value_name = "PATH")]
    db: Option<PathBuf>,

    /// Log more (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    commands: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Add applications to the catalog.
    #[command(visible_alias = "a")]
    Add {
        /// Repeat for subdirectories
        #[arg(short, long)]
        recursive: bool,

        /// Application, Contents or Resources directory
        #[arg(required = true, value_name = "PATH")]
        paths: Vec<PathBuf>,
    },

    /// Delete applications from the catalog.
    #[command(visible_alias = "rm")]
    Delete {
        /// Delete applications in subdirectories as well
        #[arg(short, long)]
        recursive: bool,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,

        /// File id or application path
        #[arg(required = true, value_name = "FILE_ID|PATH")]
        targets: Vec<DeleteTarget>,
    },

    /// List files, components, languages or keys.
    #[command(visible_alias = "ls", after_help = "<TERM> can be either a row id or a search string.")]
    List(ListArgs),

    /// Search translations or keys.
    #[command(visible_alias = "s")]
    Search {
        /// Search keys instead of translations
        #[arg(short, long)]
        keys: bool,

        /// Language name pattern to search in (repeatable, default: en%, de%, Ger%)
        #[arg(short, long = "lang", value_name = "PATTERN", conflicts_with = "all_languages")]
        lang: Vec<String>,

        /// Search translations in every language
        #[arg(short, long)]
        all_languages: bool,

        /// Pattern using % and _ wildcards
        term: String,
    },

    /// Export the translations of one key.
    #[command(visible_alias = "e")]
    Export {
        /// Component id
        id: i64,

        /// Key within the component
        key: String,

        /// Print JSON instead of `language|value` lines
        #[arg(long)]
        json: bool,
    },

    /// Show details of a file.
    #[command(visible_alias = "i")]
    Info {
        /// File id, or component id with --component
        id: i64,

        /// Treat the id as a component id
        #[arg(short, long)]
        component: bool,
    },
}

#[derive(ClapArgs, Debug)]
#[group(required = true, multiple = false)]
struct ListArgs {
    /// List files
    #[arg(short = 'f', long = "files", value_name = "TERM", num_args = 0..=1, default_missing_value = "")]
    files: Option<String>,

    /// List components
    #[arg(short = 'c', long = "components", value_name = "TERM", num_args = 0..=1, default_missing_value = "")]
    components: Option<String>,

    /// List languages
    #[arg(short = 'l', long = "languages", value_name = "TERM", num_args = 0..=1, default_missing_value = "")]
    languages: Option<String>,

    /// List the keys of a file
    #[arg(short = 'k', long = "keys", value_name = "FILE_ID")]
    keys: Option<i64>,
}

impl ListArgs {
    fn into_request(self) -> Option<ListRequest> {
        if let Some(file_id) = self.keys {
            return Some(ListRequest::Keys { file_id });
        }
        let (kind, term) = [
            (EntityKind::File, self.files),
            (EntityKind::Component, self.components),
            (EntityKind::Language, self.languages),
        ]
        .into_iter()
        .find_map(|(kind, term)| term.map(|term| (kind, term)))?;
        let filter = if term.is_empty() {
            None
        } else {
            term.parse::<ListFilter>().ok()
        };
        Some(ListRequest::Entities { kind, filter })
    }
}

fn main() {
    let args = Args::parse();
    config::init_tracing(args.verbose);

    let db_path = args.db.unwrap_or_else(config::default_db_path);
    if let Err(e) = run(args.commands, &db_path) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(commands: Commands, db_path: &Path) -> Result<(), String> {
    config::ensure_parent_dir(db_path)?;
    let mut catalog = Catalog::open(db_path)
        .map_err(|e| format!("Failed to open catalog {}: {}", db_path.display(), e))?;

    match commands {
        Commands::Add { recursive, paths } => run_add_command(&mut catalog, &paths, recursive),
        Commands::Delete {
            recursive,
            yes,
            targets,
        } => run_delete_command(&mut catalog, &targets, recursive, yes),
        Commands::List(list) => match list.into_request() {
            Some(request) => run_list_command(&catalog, request),
            None => Err("Nothing to list".to_string()),
        },
        Commands::Search {
            keys,
            lang,
            all_languages,
            term,
        } => {
            let mode = if keys {
                SearchMode::Keys
            } else {
                SearchMode::Values {
                    languages: config::search_languages(lang, all_languages),
                }
            };
            run_search_command(&catalog, &term, &mode)
        }
        Commands::Export { id, key, json } => run_export_command(&catalog, id, &key, json),
        Commands::Info { id, component } => {
            let target = if component {
                InfoTarget::Component(id)
            } else {
                InfoTarget::File(id)
            };
            run_info_command(&catalog, target)
        }
    }
}
