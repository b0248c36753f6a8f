use boxsim::{ScenarioConfig, Scenario, FixedStepHost, SimulationLoop};
use boxsim::{bench_step, bench_step_curve};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    /// Scenario file under `scenarios/`
    #[arg(short, default_value = "default.yaml")]
    file_name: String,

    /// Override the scenario's headless frame count
    #[arg(long)]
    frames: Option<u64>,

    /// Open the 3D viewer (needs the `viewer` feature)
    #[arg(long)]
    viewer: bool,

    /// Print the final particle state as YAML
    #[arg(long)]
    dump: bool,

    /// Run the frame-cost benchmark instead of a scenario
    #[arg(long)]
    bench: bool,

    /// With --bench, print the CSV curve instead of the summary
    #[arg(long)]
    curve: bool,
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name);
    let file = File::open(&config_path)
        .with_context(|| format!("opening scenario {}", config_path.display()))?;
    let reader = BufReader::new(file);
    let scenario_cfg: ScenarioConfig = serde_yaml::from_reader(reader)
        .with_context(|| format!("parsing scenario {}", config_path.display()))?;

    Ok(scenario_cfg)
}

fn run_headless(mut sim: SimulationLoop, frame_dt: f64, frames: u64, dump: bool) -> Result<()> {
    let mut host = FixedStepHost::new(frame_dt);

    let p0 = sim.system().total_momentum();
    let e0 = sim.system().kinetic_energy();

    sim.start(&mut host);
    let delivered = host.pump(&mut sim, frames);
    sim.stop(&mut host);

    let p1 = sim.system().total_momentum();
    let e1 = sim.system().kinetic_energy();
    tracing::info!(
        frames = delivered,
        t = sim.time(),
        ke_start = e0,
        ke_end = e1,
        dp = (p1 - p0).norm(),
        "headless run finished"
    );

    if dump {
        let yaml = serde_yaml::to_string(&sim.snapshot()).context("serializing snapshot")?;
        println!("{yaml}");
    }

    sim.dispose(&mut host);
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    if args.bench {
        if args.curve {
            bench_step_curve()?;
        } else {
            bench_step()?;
        }
        return Ok(());
    }

    let scenario_cfg = load_scenario_from_yaml(&args.file_name)?;
    let scenario = Scenario::build(scenario_cfg).context("invalid scenario")?;

    let frames = args.frames.unwrap_or(scenario.engine.frames);
    let frame_dt = scenario.engine.frame_dt;
    let viewer = args.viewer || scenario.engine.viewer;

    if viewer {
        #[cfg(feature = "viewer")]
        {
            boxsim::run_3d(scenario.into_loop()?, frame_dt);
            return Ok(());
        }
        #[cfg(not(feature = "viewer"))]
        tracing::warn!("built without the `viewer` feature, running headless");
    }

    run_headless(scenario.into_loop()?, frame_dt, frames, args.dump)
}
