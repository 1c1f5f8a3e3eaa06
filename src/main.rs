use clap::Parser;
use mtimeline::application::{
    find_years, init::init, open_milestone, tag_year, ConfigService, TimelineOptions,
    TimelineService,
};
use mtimeline::cli::{format_timeline, format_year_list, Cli, Commands};
use mtimeline::domain::{Language, OrderPreference, SortOrder};
use mtimeline::error::TimelineError;
use mtimeline::infrastructure::{
    EditorSession, FileSystemRepository, TimelineRepository,
};
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
const LOG_ENV: &str = "MTIMELINE_LOG";

fn main() {
    init_logging();

    let cli = Cli::parse();

    match run(cli) {
        Ok(_) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {}", e.display_with_suggestions());
            std::process::exit(e.exit_code());
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<(), TimelineError> {
    match cli.command {
        Some(Commands::Init { path }) => init(&path),
        Some(Commands::Config { key, value, list }) => {
            let repo = FileSystemRepository::discover()?;
            let service = ConfigService::new(repo);

            if list {
                for (key, value) in service.list()? {
                    println!("{} = {}", key, value);
                }
            } else if let Some(k) = key {
                if let Some(v) = value {
                    service.set(&k, &v)?;
                    println!("Set {} = {}", k, v);
                } else {
                    println!("{}", service.get(&k)?);
                }
            } else {
                println!("Usage: mtimeline config [--list | <key> [<value>]]");
                println!(
                    "Valid keys: {}",
                    mtimeline::application::manage_config::KEYS.join(", ")
                );
            }
            Ok(())
        }
        Some(Commands::Timeline { sort, lang, format }) => {
            let options = TimelineOptions {
                sort_order: sort
                    .as_deref()
                    .map(SortOrder::from_str)
                    .transpose()
                    .map_err(TimelineError::Config)?,
                language: lang.as_deref().map(Language::from_str).transpose()?,
                date_format_preference: format
                    .as_deref()
                    .map(OrderPreference::from_str)
                    .transpose()
                    .map_err(TimelineError::Config)?,
            };

            let repo = FileSystemRepository::discover()?;
            let built = TimelineService::new(repo).execute(&options)?;
            print!("{}", format_timeline(&built.report, &built.settings));
            Ok(())
        }
        Some(Commands::Years) => {
            let repo = FileSystemRepository::discover()?;
            let found = find_years(&repo)?;
            println!("{}", format_year_list(&found).trim_end());
            Ok(())
        }
        Some(Commands::TagYear { file, line, year }) => {
            let repo = FileSystemRepository::discover()?;
            let rewritten = tag_year(&repo, &file, line, year)?;
            println!("{}:{}  {}", file, line, rewritten);
            Ok(())
        }
        Some(Commands::Open { file, line }) => {
            let repo = FileSystemRepository::discover()?;
            let editor = EditorSession::new(repo.load_settings()?.get_editor());
            let path = open_milestone(&repo, &editor, &file, line)?;
            println!("Opened {}", path.display());
            Ok(())
        }
        None => {
            println!("mtimeline - Milestone timelines from markdown notes");
            println!("Use --help for usage information");
            Ok(())
        }
    }
}
