use anyhow::{Context, Result};
use pokedex_seed::{
    catalog::HttpTransport,
    cli::{Cli, Commands},
    ingest::UnitKind,
    schema::table_names,
    store::query,
    LogUi, Pipeline, Settings, Store, Ui, UiApp,
};
use serde::Serialize;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // The full-screen view owns the terminal; logging would tear it
    if !cli.uses_tui() {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    let settings = Settings::resolve(cli.database, cli.base_url)?;

    match cli.command {
        Commands::Seed { tui } => {
            let start = Instant::now();
            let mut pipeline = open_pipeline(&settings)?;
            let summary = if tui {
                let mut ui = UiApp::new()?;
                let outcome = pipeline
                    .run(&mut ui)
                    .map(|report| report.summary(UnitKind::Subject));
                finish(ui, outcome)?
            } else {
                let mut ui = LogUi::new();
                pipeline.run(&mut ui)?.summary(UnitKind::Subject)
            };
            println!(
                "\nSeeded {:?}: {} in {:.1}s",
                settings.database,
                summary,
                start.elapsed().as_secs_f64()
            );
        }

        Commands::RefreshSprites { tui } => {
            let mut pipeline = open_pipeline(&settings)?;
            let summary = if tui {
                let mut ui = UiApp::new()?;
                let outcome = pipeline
                    .refresh_sprites(&mut ui)
                    .map(|report| report.summary(UnitKind::Sprite));
                finish(ui, outcome)?
            } else {
                let mut ui = LogUi::new();
                pipeline.refresh_sprites(&mut ui)?.summary(UnitKind::Sprite)
            };
            println!("\nRefreshed sprites: {}", summary);
        }

        Commands::List { generation } => {
            let store = Store::open(&settings.database)?;
            print_json(&query::list_by_generation(&store, generation)?)?;
        }

        Commands::Show { id } => {
            let store = Store::open(&settings.database)?;
            match query::get_pokemon(&store, id)? {
                Some(detail) => print_json(&detail)?,
                None => anyhow::bail!("pokemon {} not found", id),
            }
        }

        Commands::Search { query: text } => {
            let store = Store::open(&settings.database)?;
            print_json(&query::search(&store, &text)?)?;
        }

        Commands::Tables => {
            println!("Tables:\n");
            for name in table_names() {
                println!("  {}", name);
            }
        }
    }

    Ok(())
}

fn open_pipeline(settings: &Settings) -> Result<Pipeline<HttpTransport>> {
    let store = Store::open(&settings.database)
        .with_context(|| format!("Failed to open {:?}", settings.database))?;
    Ok(Pipeline::from_settings(settings, store, HttpTransport::new()?))
}

/// Show the outcome in the full-screen view, then hand the terminal back
fn finish<E>(ui: UiApp, outcome: std::result::Result<String, E>) -> Result<String>
where
    E: std::error::Error + Send + Sync + 'static,
{
    match outcome {
        Ok(summary) => {
            ui.finish(&summary)?;
            Ok(summary)
        }
        Err(err) => {
            ui.finish("Run failed")?;
            Err(err.into())
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
