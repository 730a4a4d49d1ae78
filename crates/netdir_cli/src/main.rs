//! Admin and maintenance entry point.
//!
//! # Responsibility
//! - Trigger the dedup sweep and the edge rebuild on a local cache file.
//! - Print aliases and recommendations without leaking real names by default.

use clap::{Parser, Subcommand};
use log::{error, info};
use netdir_core::repo::company_repo::SqliteCompanyRepository;
use netdir_core::{
    init_logging, CompanyService, CoreConfig, LocalCache, NameGate, PersonService, Viewer,
};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

type CliResult<T> = Result<T, Box<dyn Error>>;

#[derive(Parser)]
#[command(name = "netdir")]
#[command(about = "Relationship directory maintenance tool", long_about = None)]
struct Cli {
    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the display alias for a name
    Alias {
        #[arg(required = true)]
        name: Vec<String>,
    },
    /// Collapse companies sharing a normalized name
    Dedup {
        /// Local cache file; defaults to `database_path` from the config
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// Recompute every relationship edge
    Infer {
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// Suggest second-degree contacts for a person
    Recommend {
        #[arg(long)]
        db: Option<PathBuf>,
        /// Person id
        #[arg(long)]
        person: String,
        /// Defaults to `recommendation_limit` from the config
        #[arg(long)]
        limit: Option<usize>,
        /// Show real names instead of aliases
        #[arg(long)]
        privileged: bool,
    },
    /// Print the core version
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_command module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult<()> {
    let config = match &cli.config {
        Some(path) => CoreConfig::from_file(path)?,
        None => CoreConfig::default(),
    };
    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, log_dir)?;
    }

    match cli.command {
        Commands::Alias { name } => {
            let name = name.join(" ");
            println!("{}", config.alias_engine().alias(&name));
        }
        Commands::Dedup { db } => {
            let cache = open_cache(db, &config)?;
            let repo = SqliteCompanyRepository::try_new(cache.connection())?;
            let service = CompanyService::new(repo);
            let report = service.run_dedup()?;
            println!("original={}", report.original);
            println!("deduplicated={}", report.deduplicated);
            println!("removed={}", report.removed);
            for merge in &report.merges {
                println!(
                    "merged {} <- {}",
                    merge.canonical_id,
                    merge.absorbed_ids.join(",")
                );
            }
        }
        Commands::Infer { db } => {
            let cache = open_cache(db, &config)?;
            let service = PersonService::for_cache(&cache)?;
            let edges = service.rebuild_edges()?;
            println!("people={}", service.list_people()?.len());
            println!("edges={edges}");
        }
        Commands::Recommend {
            db,
            person,
            limit,
            privileged,
        } => {
            let cache = open_cache(db, &config)?;
            let service = PersonService::for_cache(&cache)?;
            let limit = limit.unwrap_or_else(|| config.recommendation_limit());
            let engine = config.alias_engine();
            let gate = NameGate::new(&engine);
            let viewer = Viewer { privileged };
            for pick in service.recommend_for(&person, limit)? {
                println!(
                    "{:.2}\t{}\t{}\t{}",
                    pick.score,
                    pick.person.id,
                    gate.display_name(&pick.person.name, viewer),
                    pick.reason
                );
            }
        }
        Commands::Version => {
            println!("netdir_core version={}", netdir_core::core_version());
        }
    }

    Ok(())
}

fn open_cache(db: Option<PathBuf>, config: &CoreConfig) -> CliResult<LocalCache> {
    let path = db
        .or_else(|| config.database_path.clone())
        .ok_or("no database given; pass --db or set database_path in the config")?;
    let cache = LocalCache::open(&path)?;
    if let Some(opened) = cache.path() {
        info!("event=cli_open module=cli status=ok path={}", opened.display());
    }
    Ok(cache)
}
