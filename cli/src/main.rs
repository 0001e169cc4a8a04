use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use todo_grid_cli::{App, Config, ListRequest, UreqTransport};
use todo_grid_core::{StoreOptions, TodoClient, TodoPayload, ViewState, ViewStateStore};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "todo-grid")]
#[command(about = "Browse and edit a remote todo list", long_about = None)]
struct Cli {
    /// API origin (overrides API_URL)
    #[arg(long)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show one page of the grid
    List {
        /// Zero-based page index
        #[arg(short, long)]
        page: Option<u32>,
        #[arg(short = 's', long)]
        page_size: Option<u32>,
        /// Click a column header; repeat to toggle the direction
        #[arg(long = "sort", value_name = "FIELD")]
        sort: Vec<String>,
        /// Column filter, e.g. `title=milk` or `completed=true`
        #[arg(short, long = "filter", value_name = "FIELD=VALUE", value_parser = parse_filter)]
        filter: Vec<(String, String)>,
        /// Go back to the first page when a filter changes
        #[arg(long)]
        reset_page_on_filter: bool,
    },
    /// Show the full description of one todo
    Show { id: String },
    /// Add a new todo
    Create {
        #[arg(short, long)]
        title: String,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long)]
        completed: bool,
    },
    /// Change fields of an existing todo
    Update {
        id: String,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long)]
        completed: Option<bool>,
    },
    /// Delete one todo
    Delete { id: String },
    /// Delete several todos at once
    BulkDelete {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Dump every todo as JSON
    All,
}

fn parse_filter(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected FIELD=VALUE, got {raw:?}"))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env().context("reading configuration")?;
    if let Some(url) = cli.api_url {
        config.api_url = url;
    }
    if let Commands::List {
        reset_page_on_filter: true,
        ..
    } = &cli.command
    {
        config.reset_page_on_filter_change = true;
    }

    let initial = ViewState {
        page_size: config.page_size,
        ..ViewState::default()
    };
    let options: StoreOptions = config.store_options();
    let store = ViewStateStore::with_state(initial, options).context("initial view state")?;
    let app = App::new(UreqTransport::new(), TodoClient::new(&config.api_url), store);

    let output = match cli.command {
        Commands::List {
            page,
            page_size,
            sort,
            filter,
            ..
        } => app.list(&ListRequest {
            page,
            page_size,
            sort_clicks: sort,
            filters: filter,
        })?,
        Commands::Show { id } => app.show(&id)?,
        Commands::Create {
            title,
            description,
            completed,
        } => {
            let mut payload = TodoPayload::default()
                .with_title(title)
                .with_completed(completed);
            payload.description = description;
            app.create(&payload)?
        }
        Commands::Update {
            id,
            title,
            description,
            completed,
        } => {
            let payload = TodoPayload {
                title,
                description,
                completed,
            };
            app.update(&id, &payload)?
        }
        Commands::Delete { id } => app.delete(&id)?,
        Commands::BulkDelete { ids } => app.bulk_delete(&ids)?,
        Commands::All => app.all()?,
    };
    print!("{output}");
    Ok(())
}
