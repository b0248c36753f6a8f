use std::time::Instant;

use crate::simulation::engine::SimulationLoop;
use crate::simulation::error::ConfigResult;
use crate::simulation::params::SimulationConfig;
use crate::simulation::states::{NVec3, Particle, ParticleSystem};

/// Frame period at 60 Hz, in milliseconds
pub const FRAME_BUDGET_MS: f64 = 1000.0 / 60.0;

const FRAME_DT: f64 = 1.0 / 60.0;

/// Helper to build a packed box of size `n`
fn make_loop(n: usize, substeps: u32) -> ConfigResult<SimulationLoop> {
    let config = SimulationConfig {
        particle_count: n,
        radius: 0.05,
        half_extent: 2.0,
        substeps_per_frame: substeps,
        ..Default::default()
    };

    // deterministic positions, no rand needed
    let particles = (0..n)
        .map(|i| {
            let i_f = i as f64;
            let x = NVec3::new(
                (i_f * 0.37).sin() * 1.5,
                (i_f * 0.13).cos() * 1.5,
                (i_f * 0.07).sin() * 1.5,
            );
            let v = NVec3::new((i_f * 0.11).cos(), (i_f * 0.29).sin(), 0.0);
            Particle::new(x, v, 1.0 + (i % 3) as f64)
        })
        .collect();

    SimulationLoop::new(config, ParticleSystem::new(particles))
}

/// Average wall time of one `advance`, in milliseconds
fn time_advance(sim: &mut SimulationLoop, frames: u32) -> f64 {
    // Warm up
    sim.advance(FRAME_DT);

    let t0 = Instant::now();
    for _ in 0..frames {
        sim.advance(FRAME_DT);
    }
    t0.elapsed().as_secs_f64() * 1000.0 / frames as f64
}

/// Time one frame for growing populations and compare with the 60 Hz budget
pub fn bench_step() -> ConfigResult<()> {
    let ns = [8, 16, 32, 64, 128, 256, 512, 1024];
    let substeps = 4;

    for n in ns {
        let mut sim = make_loop(n, substeps)?;
        // Large n: fewer frames to keep the run short
        let frames = if n <= 256 { 60 } else { 5 };
        let ms = time_advance(&mut sim, frames);

        let verdict = if ms < FRAME_BUDGET_MS { "ok" } else { "over budget" };
        println!("N = {n:5}, substeps = {substeps}, frame = {ms:9.4} ms ({verdict})");
    }

    Ok(())
}

/// Frame cost over (N, substeps)
/// Paste output directly into a spreadsheet to graph
pub fn bench_step_curve() -> ConfigResult<()> {
    println!("N,substeps,frame_ms");

    for substeps in [1, 2, 4, 8] {
        for n in (16..=512).step_by(16) {
            let mut sim = make_loop(n, substeps)?;
            let frames = if n <= 128 { 20 } else { 3 };
            let ms = time_advance(&mut sim, frames);
            println!("{},{},{:.6}", n, substeps, ms);
        }
    }

    Ok(())
}
