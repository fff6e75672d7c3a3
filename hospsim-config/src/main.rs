mod config;
mod display;
mod error;
mod flow;
mod form;
mod lab;
mod mock;
mod parser;
mod schedule;
mod store;
mod templates;
mod web;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use config::AppConfig;
use display::{print_fleet, print_rows, print_templates, print_time_ranges, write_ranges_to_file};
use flow::{load_active, save_active, ArrivalSlot, FloorFlow, FlowRow, Scenario};
use form::export_rows_to_file;
use parser::import_rows_from_path;
use schedule::fleet::load_fleet;
use schedule::{label_ranges, ScheduleDraft};
use store::JsonStore;
use templates::TemplateLibrary;

#[derive(Parser, Debug)]
#[command(name = "hospsim-config", about = "Configuration service for the hospital lab and elevator simulations")]
struct Cli {
    /// Directory holding the saved configuration (overrides HOSPSIM_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the web server (default)
    Serve {
        #[arg(long)]
        port: Option<u16>,
    },
    /// Derive the time ranges of a schedule draft stored as JSON
    Derive {
        file: PathBuf,
        /// Also write the ranges to this file
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Export a flow table (the active one, or a template) to .xlsx, or CSV for a .csv path
    Export {
        kind: Scenario,
        output: PathBuf,
        #[arg(long)]
        template: Option<String>,
    },
    /// Import a flow table from a workbook or CSV and print it as JSON
    Import {
        kind: Scenario,
        input: PathBuf,
        /// Store the imported rows as the active table
        #[arg(long)]
        save: bool,
    },
    /// List preset and custom templates
    Templates { kind: Scenario },
    /// Show the elevator fleet with saved schedules
    Elevators,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    let (port, command) = match cli.command {
        None => (None, None),
        Some(Command::Serve { port }) => (port, None),
        Some(other) => (None, Some(other)),
    };
    let config = AppConfig::from_env().with_overrides(port, cli.data_dir);
    let store = JsonStore::open(&config.data_dir)?;

    let Some(command) = command else {
        println!("Starting web server on port {}...", config.port);
        println!("Data directory: {}", store.root().display());
        println!("Access the site at http://localhost:{}", config.port);

        web::start_server(config, store).await?;
        return Ok(());
    };

    // CLI mode
    match command {
        Command::Derive { file, output } => derive_from_file(&file, output.as_deref())?,
        Command::Export { kind, output, template } => match kind {
            Scenario::Lab => export_table::<ArrivalSlot>(&store, &output, template.as_deref())?,
            Scenario::Elevator => export_table::<FloorFlow>(&store, &output, template.as_deref())?,
        },
        Command::Import { kind, input, save } => match kind {
            Scenario::Lab => import_table::<ArrivalSlot>(&store, &input, save)?,
            Scenario::Elevator => import_table::<FloorFlow>(&store, &input, save)?,
        },
        Command::Templates { kind } => match kind {
            Scenario::Lab => print_templates(&TemplateLibrary::<ArrivalSlot>::new(&store).list()),
            Scenario::Elevator => print_templates(&TemplateLibrary::<FloorFlow>::new(&store).list()),
        },
        Command::Elevators => print_fleet(&load_fleet(&store)),
        Command::Serve { .. } => {}
    }

    Ok(())
}

fn derive_from_file(file: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let draft: ScheduleDraft = serde_json::from_str(&std::fs::read_to_string(file)?)?;
    if let Err(e) = draft.validate() {
        tracing::warn!(error = %e, "draft would be rejected on save");
    }

    let name = file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ranges = label_ranges(&draft.time_ranges());
    print_time_ranges(&name, &ranges);

    if let Some(path) = output {
        write_ranges_to_file(&name, &ranges, path)?;
        println!("Time ranges saved to: {}", path.display());
    }
    Ok(())
}

fn export_table<R: FlowRow>(
    store: &JsonStore,
    output: &Path,
    template: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let rows: Vec<R> = match template {
        Some(id) => TemplateLibrary::<R>::new(store).apply(id)?,
        None => load_active(store),
    };
    export_rows_to_file(&rows, output)?;
    println!("Exported {} rows to {}", rows.len(), output.display());
    Ok(())
}

fn import_table<R: FlowRow>(
    store: &JsonStore,
    input: &Path,
    save: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let rows: Vec<R> = import_rows_from_path(input)?;
    print_rows(&rows);
    println!("{}", serde_json::to_string_pretty(&rows)?);

    if save {
        save_active(store, &rows)?;
        println!("Saved as the active {} table", R::SHEET_NAME);
    }
    Ok(())
}
