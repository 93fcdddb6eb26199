use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use planeweaver::{
    config::Scenario,
    generator,
    store::PlaneStore,
    web::{self, ViewerConfig},
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Concentric-strata plane synthesizer")]
struct Cli {
    /// Path to the scenario YAML file
    #[arg(long, default_value = "scenarios/astral_reach.yaml")]
    scenario: PathBuf,

    /// Override the scenario seed
    #[arg(long)]
    seed: Option<u64>,

    /// Directory for persisted planes
    #[arg(long, default_value = "planes")]
    store_dir: PathBuf,

    /// Print a summary of a previously stored plane instead of generating
    #[arg(long)]
    load: Option<String>,

    /// Serve the interactive viewer after generating
    #[arg(long)]
    serve: bool,

    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    #[arg(long, default_value_t = 4700)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let store = PlaneStore::new(&cli.store_dir);

    if let Some(label) = cli.load.as_deref() {
        let record = store
            .load(label)
            .with_context(|| format!("failed to load stored plane '{label}'"))?;
        println!(
            "Plane '{}' (seed {}, generated {}): {} strata, {} nodes, {} edges",
            record.label,
            record.seed,
            record.generated_at,
            record.num_circles(),
            record.nodes.len(),
            record.edges.len()
        );
        return Ok(());
    }

    let scenario = Scenario::load(&cli.scenario)?;
    let seed = cli.seed.unwrap_or(scenario.seed);
    let plane = generator::generate_seeded(&scenario, seed)?;
    let path = store.save(&plane)?;
    println!(
        "Plane '{}' generated with seed {}: {} nodes, {} edges across {} clusters. Stored at {}",
        plane.label,
        seed,
        plane.nodes.len(),
        plane.edges.len(),
        plane.clusters.len(),
        path.display()
    );

    if cli.serve {
        web::run(ViewerConfig {
            scenario,
            initial: plane,
            host: cli.host,
            port: cli.port,
        })
        .await?;
    }
    Ok(())
}
