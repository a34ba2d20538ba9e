//! DentForge batch generator
//!
//! Builds the configured teeth and writes them to the output directory.

use std::error::Error;
use std::fs;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use dentforge::config::{AppConfig, OutputFormat};
use dentforge_core::export::{save_obj, save_ron};
use dentforge_core::{GeneratedTooth, ToothFactory};

fn main() -> ExitCode {
    // Logging isn't up yet, so hold on to a load failure until it is
    let (config, load_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.debug.log_level.as_str()),
    )
    .init();

    if let Some(e) = load_error {
        log::warn!("Failed to load config: {}. Using defaults.", e);
    }
    log::info!("Starting DentForge");

    match run(&config) {
        Ok(count) => {
            log::info!("Wrote {} teeth to {}", count, config.output.directory);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(config: &AppConfig) -> Result<usize, Box<dyn Error>> {
    let factory = match config.generation.cavity_seed {
        Some(seed) => {
            log::info!("Cavity seed: {}", seed);
            ToothFactory::with_seed(seed)
        }
        None => ToothFactory::new(),
    };

    if config.generation.prewarm {
        let count = factory.prewarm()?;
        log::info!("Prewarmed {} teeth", count);
    }

    let teeth = requested_teeth(&factory, config)?;

    let dir = Path::new(&config.output.directory);
    fs::create_dir_all(dir)?;

    for tooth in &teeth {
        match config.output.format {
            OutputFormat::Obj => save_obj(tooth, dir)?,
            OutputFormat::Ron => save_ron(tooth, dir.join(format!("{}.ron", tooth.name())))?,
        }
        log::info!(
            "{}: {} vertices, {} triangles, materials [{}]",
            tooth.name(),
            tooth.mesh().vertex_count(),
            tooth.mesh().triangle_count(),
            tooth
                .materials()
                .iter()
                .map(|m| &*m.name)
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    log::debug!("{} builds, {} cached", factory.build_count(), factory.cached_count());
    Ok(teeth.len())
}

/// The configured request list, or every pair when it's empty
fn requested_teeth(factory: &ToothFactory, config: &AppConfig) -> Result<Vec<Arc<GeneratedTooth>>, Box<dyn Error>> {
    if config.generation.requests.is_empty() {
        let mut teeth = Vec::new();
        for &category in ToothFactory::list_categories() {
            for &condition in ToothFactory::list_conditions() {
                teeth.push(factory.request(category, condition)?);
            }
        }
        return Ok(teeth);
    }

    let mut teeth = Vec::with_capacity(config.generation.requests.len());
    for request in &config.generation.requests {
        teeth.push(factory.request_named(&request.category, &request.condition)?);
    }
    Ok(teeth)
}
