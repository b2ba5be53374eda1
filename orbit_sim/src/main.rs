//! Orbit Simulation
//!
//! Direct-summation N-body gravity for small planetary systems.
//!
//! Usage:
//!   orbit_sim [SCENARIO.yaml] [--preset inner-planets|random-planets] [--headless]
//!
//! Without a scenario file the inner solar system is simulated.

mod diagnostics_ui;
mod renderer;
mod scene;
mod viewer;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use celestial::config::Preset;
use celestial::{LogRenderer, ScenarioConfig, SimulationDriver};
use clap::{Parser, ValueEnum};
use common::WindowOptions;
use log::info;

use crate::scene::SceneCapture;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum PresetArg {
    InnerPlanets,
    RandomPlanets,
}

#[derive(Parser, Debug)]
#[command(version, about = "Newtonian N-body orbit simulator")]
struct Args {
    /// YAML scenario file
    scenario: Option<PathBuf>,

    /// Built-in body set, replaces the scenario's preset
    #[arg(long, value_enum)]
    preset: Option<PresetArg>,

    /// Bodies generated by the random-planets preset
    #[arg(long, default_value_t = 10)]
    count: usize,

    /// Total mass (kg) shared by the random-planets preset
    #[arg(long, default_value_t = 1.0e30)]
    mass: f64,

    /// Run without a window, logging each frame
    #[arg(long)]
    headless: bool,

    /// Stop after this many ticks
    #[arg(long)]
    ticks: Option<u64>,

    /// Seed for generated presets
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Half-width of the viewed region in AU
    #[arg(long, default_value_t = 2.0)]
    view_size: f64,

    /// Present frames as fast as possible instead of at the display rate
    #[arg(long)]
    no_vsync: bool,
}

fn load_scenario(args: &Args) -> Result<ScenarioConfig> {
    let mut scenario = match &args.scenario {
        Some(path) => {
            let source = fs::read_to_string(path)
                .with_context(|| format!("failed to read scenario {}", path.display()))?;
            ScenarioConfig::from_yaml(&source)
                .with_context(|| format!("invalid scenario {}", path.display()))?
        }
        None => ScenarioConfig {
            preset: Some(Preset::InnerPlanets),
            ..Default::default()
        },
    };

    match args.preset {
        Some(PresetArg::InnerPlanets) => scenario.preset = Some(Preset::InnerPlanets),
        Some(PresetArg::RandomPlanets) => {
            scenario.preset = Some(Preset::RandomPlanets {
                count: args.count,
                overall_mass: args.mass,
            })
        }
        None => {}
    }
    if args.ticks.is_some() {
        scenario.simulation.max_ticks = args.ticks;
    }

    Ok(scenario)
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    anyhow::ensure!(
        args.view_size.is_finite() && args.view_size > 0.0,
        "--view-size must be positive, got {}",
        args.view_size
    );

    let scenario = load_scenario(&args)?;
    let bodies = scenario
        .build_bodies(args.seed)
        .context("failed to build bodies")?;
    let sim = &scenario.simulation;

    info!(
        "{} bodies, {:?} integrator, dt {} s, softening {} m, frame every {} ticks",
        bodies.len(),
        sim.integrator,
        sim.dt,
        sim.softening,
        sim.render_interval
    );

    if args.headless {
        let mut driver = SimulationDriver::from_config(bodies, sim, LogRenderer::new())?;
        let reason = driver.run()?;
        info!(
            "stopped ({reason:?}) after {} ticks, {} frames, {} merges, {} bodies left",
            driver.ticks(),
            driver.renderer().frames(),
            driver.merges(),
            driver.engine().bodies().len()
        );
        return Ok(());
    }

    println!("=== Orbit Simulation ===");
    println!("Controls:");
    println!("  Left mouse drag: Orbit camera");
    println!("  Scroll: Zoom in/out");
    println!("  Space: Pause/resume");
    println!("  R: Reset view");
    println!("  +/-: Simulation speed");
    println!("  Escape: Quit");
    println!();

    let options = WindowOptions {
        title: "Orbit Simulation - Rust/wgpu".to_string(),
        vsync: !args.no_vsync,
        ..WindowOptions::default()
    };
    let driver = SimulationDriver::from_config(bodies, sim, SceneCapture::new(args.view_size))?;
    viewer::run(driver, &options)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIOS: &[(&str, &str)] = &[
        ("inner_planets", include_str!("../scenarios/inner_planets.yaml")),
        ("random_planets", include_str!("../scenarios/random_planets.yaml")),
        ("head_on", include_str!("../scenarios/head_on.yaml")),
    ];

    #[test]
    fn bundled_scenarios_build() {
        for (name, source) in SCENARIOS {
            let scenario = ScenarioConfig::from_yaml(source)
                .unwrap_or_else(|e| panic!("{name}: {e}"));
            let bodies = scenario.build_bodies(7).unwrap();
            assert!(!bodies.is_empty(), "{name} has no bodies");
            SimulationDriver::from_config(bodies, &scenario.simulation, LogRenderer::new())
                .unwrap_or_else(|e| panic!("{name}: {e}"));
        }
    }

    #[test]
    fn default_run_is_inner_planets() {
        let args = Args::parse_from(["orbit_sim"]);
        let scenario = load_scenario(&args).unwrap();
        assert_eq!(scenario.preset, Some(Preset::InnerPlanets));
        assert_eq!(scenario.build_bodies(0).unwrap().len(), 8);
    }

    #[test]
    fn command_line_overrides_preset_and_ticks() {
        let args = Args::parse_from([
            "orbit_sim",
            "--preset",
            "random-planets",
            "--count",
            "4",
            "--ticks",
            "100",
            "--headless",
        ]);
        let scenario = load_scenario(&args).unwrap();
        assert_eq!(
            scenario.preset,
            Some(Preset::RandomPlanets {
                count: 4,
                overall_mass: 1.0e30
            })
        );
        assert_eq!(scenario.simulation.max_ticks, Some(100));
        assert!(args.headless);
    }

    #[test]
    fn missing_scenario_file_is_reported() {
        let args = Args::parse_from(["orbit_sim", "does/not/exist.yaml"]);
        let err = load_scenario(&args).unwrap_err();
        assert!(err.to_string().contains("failed to read scenario"));
    }
}
