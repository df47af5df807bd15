//! Interactive fractal lab viewer -- press Space for a new seed.
//!
//! Run with:
//!   cargo run --example fractal_tiles --features renderer -p sketchlab-engine
//!   cargo run --example fractal_tiles --features renderer -p sketchlab-engine -- centered
//!   cargo run --example fractal_tiles --features renderer -p sketchlab-engine -- tiled lab.json
//!
//! The first argument picks the lab (`tiled` or `centered`, default `tiled`).
//! The optional second argument is a JSON [`LabConfig`] file; fields it omits
//! keep their defaults.
//!
//! Controls:
//!   Space -- re-roll the seed
//!   Escape -- quit

use sketchlab_engine::lab::{Lab, LabConfig};
use sketchlab_engine::render::run_windowed;

fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let lab: Lab = match args.next() {
        Some(name) => name.parse()?,
        None => Lab::Tiled,
    };
    let config = match args.next() {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .map_err(|e| anyhow::anyhow!("failed to read config {path}: {e}"))?;
            LabConfig::from_json(&json)?
        }
        None => LabConfig::default(),
    };

    let title = format!("Sketchlab -- {} lab (Space: new seed, ESC: quit)", lab.name());
    run_windowed(lab, config, &title)
}
