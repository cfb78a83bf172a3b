pub mod types;
pub mod config;
pub mod data;
pub mod classify;
pub mod transform;
pub mod scene;
pub mod page;
pub mod server;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the TFR column map page
    Render {
        #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
        config: PathBuf,
    },
    /// Render the page, then serve it with the lookup API
    Serve {
        #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Render { config } => {
            let app_config = config::AppConfig::load_from_file(config)?;
            let dataset = data::load_dataset(&app_config)?;
            let path = render_map(&app_config, &dataset)?;
            println!("Wrote {:?}", path);
        }
        Commands::Serve { config } => {
            let app_config = config::AppConfig::load_from_file(config)?;
            let dataset = data::load_dataset(&app_config)?;
            let path = render_map(&app_config, &dataset)?;
            println!("Wrote {:?}", path);

            server::start_server(app_config, dataset).await?;
        }
    }

    Ok(())
}

/// The single linear pass: transform, classify, build the scene, write
/// the page. Any error aborts before a page reaches its final name.
fn render_map(
    app_config: &config::AppConfig,
    dataset: &types::Dataset,
) -> anyhow::Result<PathBuf> {
    let columns = transform::transform(&dataset.records)?;
    let scene = scene::build_scene(columns)?;
    let path = page::write_page(app_config, &scene, dataset)?;
    Ok(path)
}
