use std::sync::Arc;

use clap::Parser;
use cf_core::{CompanyApi, Config, HttpCompanyApi, SearchQuery, PLACEHOLDER};
use cf_web::view::{PanelContent, PanelState};
use cf_web::{AppState, Frontend, PipelineOutcome};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Find companies similar to a given one and view their profiles", long_about = None)]
pub struct Cli {
    /// Base URL of the company service (overrides CF_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Search for similar companies and optionally open one of them
    Search {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        location: String,
        #[arg(long, default_value = "")]
        industry: String,
        /// Row of the result table to open (0-based)
        #[arg(long)]
        select: Option<usize>,
    },
    /// Fetch and render a single company profile
    Profile {
        #[arg(long)]
        name: String,
    },
    /// Serve the company finder page
    Serve {
        /// Address to listen on (overrides CF_LISTEN_ADDR)
        #[arg(long)]
        listen: Option<String>,
    },
}

fn print_panel(title: &str, state: &PanelState) {
    println!("== {} ==", title);
    if !state.error.is_empty() {
        eprintln!("{}", state.error);
    }
    let html = state.content.html();
    if !html.is_empty() {
        println!("{}", html);
    }
}

fn list_rows(state: &PanelState) {
    if let PanelContent::Selection(table) = &state.content {
        for row in 0..table.row_count() {
            println!("[{}] {}", row, table.key(row).unwrap_or(PLACEHOLDER));
        }
    }
}

/// Turns a pipeline that did not finish into a non-zero exit.
fn ensure_completed(outcome: PipelineOutcome, what: &str) -> anyhow::Result<()> {
    match outcome {
        PipelineOutcome::Completed => Ok(()),
        PipelineOutcome::Failed(kind) => anyhow::bail!("{} failed: {}", what, kind),
        PipelineOutcome::Stale => anyhow::bail!("{} was superseded", what),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cf_core::logging::init_logging();
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(url) = cli.api_url.as_deref() {
        config = config.with_api_url(url)?;
    }
    let api: Arc<dyn CompanyApi> = Arc::new(HttpCompanyApi::new(&config)?);
    info!("🔌 Using company service at {}", config.api_base_url);

    match cli.command {
        Commands::Search {
            name,
            location,
            industry,
            select,
        } => {
            let frontend = Frontend::new(api);
            let form = SearchQuery {
                name,
                location,
                industry,
            };
            let outcome = frontend.submit_search(&form).await;
            let state = frontend.page().search.state();
            print_panel("Companies", &state);
            ensure_completed(outcome, "search")?;
            list_rows(&state);

            if let Some(row) = select {
                match frontend.click_row(row).await {
                    Some(outcome) => {
                        print_panel("Profile", &frontend.page().profile.state());
                        ensure_completed(outcome, "profile")?;
                    }
                    None => anyhow::bail!("row {} has no company to open", row),
                }
            }
        }
        Commands::Profile { name } => {
            let frontend = Frontend::new(api);
            let outcome = frontend.show_profile(&name).await;
            print_panel("Profile", &frontend.page().profile.state());
            ensure_completed(outcome, "profile")?;
        }
        Commands::Serve { listen } => {
            if let Some(addr) = listen.as_deref() {
                config = config.with_listen_addr(addr)?;
            }
            cf_web::serve(AppState { api }, config.listen_addr).await?;
        }
    }

    Ok(())
}
