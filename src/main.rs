use anyhow::Result;
use clap::{Parser, Subcommand};
use popup_search::classify::NavigationTarget;
use popup_search::controller::{CommitOutcome, Navigator, SearchController, SystemNavigator};
use popup_search::logging;
use popup_search::merger::SuggestionSource;
use popup_search::settings::{Settings, SETTINGS_FILE};
use popup_search::SearchBackend;
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(name = "popup-search")]
#[command(about = "Quick-launch search bar: open a URL or search the web", long_about = None)]
struct Cli {
    /// Settings file
    #[arg(long, default_value = SETTINGS_FILE)]
    settings: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the text as a URL or search for it, and remember it
    Go {
        text: Vec<String>,
        #[arg(short, long)]
        backend: Option<SearchBackend>,
        /// Print the target instead of opening it
        #[arg(long)]
        dry_run: bool,
    },
    /// Show suggestions for a fragment
    Suggest {
        text: Vec<String>,
        /// Only use local history
        #[arg(long)]
        offline: bool,
        #[arg(long, default_value_t = 3000)]
        timeout_ms: u64,
    },
    /// Show how the text would be resolved
    Classify {
        text: Vec<String>,
        #[arg(short, long)]
        backend: Option<SearchBackend>,
    },
    /// List remembered URLs and searches
    History,
    /// Forget all remembered URLs and searches
    Clear,
}

/// Prints the target rather than opening a browser.
struct PrintNavigator;

impl Navigator for PrintNavigator {
    fn open(&mut self, target: &NavigationTarget) -> anyhow::Result<()> {
        println!("{}", target.destination);
        Ok(())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(&cli.settings)?;
    logging::init(settings.debug_logging, settings.log_file.clone());

    match cli.command {
        Commands::Go {
            text,
            backend,
            dry_run,
        } => {
            let text = text.join(" ");
            let backend = backend.unwrap_or(settings.default_backend);
            let outcome = if dry_run {
                go(&settings, PrintNavigator, &text, backend)?
            } else {
                go(&settings, SystemNavigator, &text, backend)?
            };
            if outcome == CommitOutcome::Ignored {
                println!("nothing to open");
            }
        }
        Commands::Suggest {
            text,
            offline,
            timeout_ms,
        } => {
            let remote = if offline {
                None
            } else {
                settings.suggest_client()
            };
            let mut ctrl = SearchController::new(
                settings.open_history(),
                remote,
                settings.classifier(),
                PrintNavigator,
                settings.default_backend,
            );
            ctrl.type_text(&text.join(" "), Instant::now());
            ctrl.wait_for_remote(Duration::from_millis(timeout_ms));
            if let Some(ghost) = ctrl.ghost_text() {
                println!("> {ghost}");
            }
            for item in ctrl.items() {
                let source = match item.source {
                    SuggestionSource::History => "history",
                    SuggestionSource::Remote => "remote",
                };
                println!("{:>3}  {:<8} {}", item.rank, source, item.text);
            }
        }
        Commands::Classify { text, backend } => {
            let backend = backend.unwrap_or(settings.default_backend);
            let target = settings.classifier().classify(&text.join(" "), backend);
            println!("{:?}", target.kind);
            if let Some(b) = target.search_backend {
                println!("backend: {b}");
            }
            println!("{}", target.destination);
        }
        Commands::History => {
            let history = settings.open_history();
            println!("Recent URLs");
            for url in history.all_urls() {
                println!("  {url}");
            }
            println!("Recent searches");
            for rec in history.all_queries() {
                println!("  {:>4}  {}", rec.count, rec.query);
            }
        }
        Commands::Clear => {
            let mut history = settings.open_history();
            history.clear()?;
            println!("history cleared");
        }
    }
    Ok(())
}

fn go<N: Navigator>(
    settings: &Settings,
    navigator: N,
    text: &str,
    backend: SearchBackend,
) -> Result<CommitOutcome> {
    let mut ctrl = SearchController::new(
        settings.open_history(),
        None,
        settings.classifier(),
        navigator,
        backend,
    );
    // A one-shot commit opens exactly what was typed, not the inline hint.
    Ok(ctrl.commit_exact(text)?)
}
