use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{info, warn};

use cyber_dublin::simulation::{
    LaneLookup, Position, SimConfig, SimRng, SimWorld, CARS_PER_STREET, STREET_COUNT,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LaneLookupArg {
    /// Compare every pair of cars
    Pairwise,
    /// Per-lane z-sorted neighbour lookup
    Sorted,
}

impl From<LaneLookupArg> for LaneLookup {
    fn from(arg: LaneLookupArg) -> Self {
        match arg {
            LaneLookupArg::Pairwise => LaneLookup::Pairwise,
            LaneLookupArg::Sorted => LaneLookup::SortedLanes,
        }
    }
}

#[derive(Parser)]
#[command(name = "cyber_dublin")]
#[command(about = "Endless city flyover with traffic, headless or with a UI")]
struct Cli {
    /// Run with the Bevy game engine UI
    #[arg(long)]
    ui: bool,

    /// Number of simulation ticks to run in headless mode
    #[arg(long, default_value = "600")]
    ticks: u32,

    /// Time delta per tick in seconds
    #[arg(long, default_value = "0.0166667")]
    delta: f32,

    /// Seed for building heights and car speeds (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Camera x movement per tick in headless mode
    #[arg(long, default_value = "0.0", allow_negative_numbers = true)]
    camera_velocity_x: f32,

    /// Camera z movement per tick in headless mode
    #[arg(long, default_value = "-0.25", allow_negative_numbers = true)]
    camera_velocity_z: f32,

    /// Teleport the camera to this x once, at `--teleport-tick`
    #[arg(long, allow_negative_numbers = true)]
    teleport_x: Option<f32>,

    /// Tick at which `--teleport-x` applies
    #[arg(long, default_value = "300")]
    teleport_tick: u32,

    /// Number of streets
    #[arg(long, default_value_t = STREET_COUNT)]
    streets: usize,

    /// Cars spawned on each street
    #[arg(long, default_value_t = CARS_PER_STREET)]
    cars_per_street: usize,

    /// Same-lane neighbour lookup strategy
    #[arg(long, value_enum, default_value = "pairwise")]
    lane_lookup: LaneLookupArg,

    /// Print a summary and map every this many ticks (0 disables)
    #[arg(long, default_value = "120")]
    report_every: u32,
}

impl Cli {
    fn sim_config(&self) -> SimConfig {
        SimConfig {
            street_count: self.streets,
            cars_per_street: self.cars_per_street,
            lane_lookup: self.lane_lookup.into(),
            ..SimConfig::default()
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.ui {
        #[cfg(feature = "ui")]
        {
            run_with_ui(cli.sim_config(), cli.seed)?;
        }
        #[cfg(not(feature = "ui"))]
        {
            anyhow::bail!("UI feature is not enabled. Rebuild with --features ui");
        }
    } else {
        env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or("warn,cyber_dublin=info"),
        )
        .init();
        run_headless(&cli)?;
    }

    Ok(())
}

/// Run the simulation in headless mode (no graphics)
fn run_headless(cli: &Cli) -> Result<()> {
    if cli.delta.is_nan() || cli.delta <= 0.0 {
        anyhow::bail!("--delta must be positive (got {})", cli.delta);
    }

    info!("Running city simulation in headless mode...");
    info!(
        "Ticks: {}, Delta: {}s, Seed: {}",
        cli.ticks,
        cli.delta,
        cli.seed
            .map(|s| s.to_string())
            .unwrap_or_else(|| "random".to_string())
    );

    let mut world = SimWorld::with_config(
        cli.sim_config(),
        Box::new(SimRng::from_seed_option(cli.seed)),
    )
    .context("Failed to build the city")?;

    let mut camera = world.camera.position;
    let mut containment_failures = 0u32;

    if cli.report_every > 0 {
        println!("Initial state:");
        world.print_summary();
        world.draw_map();
    }

    for tick in 1..=cli.ticks {
        camera = camera.offset(cli.camera_velocity_x, 0.0, cli.camera_velocity_z);
        if tick == cli.teleport_tick {
            if let Some(x) = cli.teleport_x {
                info!("Teleporting camera from x={:.1} to x={:.1}", camera.x, x);
                world.camera.teleport(Position::new(x, camera.y, camera.z));
                camera = world.camera.position;
            }
        }

        world.tick(camera, cli.delta);

        if !world.grid.contains_camera(&camera) {
            containment_failures += 1;
            warn!(
                "tick {}: grid did not settle around camera ({:.2}, {:.2})",
                tick, camera.x, camera.z
            );
        }

        if cli.report_every > 0 && tick % cli.report_every == 0 {
            println!(
                "--- After tick {} ({:.1}s simulated time) ---",
                tick,
                world.elapsed()
            );
            world.print_summary();
            world.draw_map();
        }
    }

    let recycling = world.stats.recycling;
    let traffic = world.traffic.stats;
    info!("=== SIMULATION COMPLETE ===");
    info!("Ticks run: {}", world.stats.ticks);
    info!("Elapsed time: {:.2}s", world.elapsed());
    info!("Final camera: ({:.2}, {:.2})", camera.x, camera.z);
    info!("Column shifts: {}", recycling.column_shifts);
    info!("Row shifts: {}", recycling.row_shifts);
    info!("Cells regrown: {}", recycling.cells_regenerated);
    info!("Total cars: {}", world.traffic.len());
    info!("Braking now: {}", world.traffic.braking_count());
    info!("Braking entries: {}", traffic.braking_entries);
    info!("Wraps: {}", traffic.wraps);
    info!("Containment failures: {}", containment_failures);

    Ok(())
}

#[cfg(feature = "ui")]
fn run_with_ui(config: SimConfig, seed: Option<u64>) -> Result<()> {
    use bevy::log::LogPlugin;
    use bevy::prelude::*;

    let world = SimWorld::with_config(config, Box::new(SimRng::from_seed_option(seed)))
        .context("Failed to build the city")?;

    println!("Starting city flyover UI...");
    println!();
    println!("Camera Controls:");
    println!("  W/A/S/D or arrows - Move camera");
    println!("  ESC               - Exit");
    println!();

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(LogPlugin {
                    filter: "warn,cyber_dublin=debug".to_string(),
                    level: bevy::log::Level::DEBUG,
                    ..default()
                })
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "CyberDublin".into(),
                        resolution: (1080, 800).into(),
                        ..default()
                    }),
                    ..default()
                }),
        )
        .insert_resource(cyber_dublin::ui::SimWorldResource(world))
        .add_plugins(cyber_dublin::ui::CityUIPlugin)
        .run();

    Ok(())
}
