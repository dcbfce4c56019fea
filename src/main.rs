use clap::Parser;
use hideandseek::arena::{Arena, WallLayout};
use hideandseek::config::{self, ARENA_HEIGHT, ARENA_WIDTH, SCATTER_CLEARANCE};
use hideandseek::control::TickInput;
use hideandseek::error::WorldError;
use hideandseek::geometry::Point;
use hideandseek::logging;
use hideandseek::render::Renderer;
use hideandseek::sight::HitPolicy;
use hideandseek::world::{World, spawn_points};
use log::{error, info};
use macroquad::prelude::*;
use std::process;

// --- Command Line Arguments ---
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Arena width in pixels
    #[arg(long, default_value_t = ARENA_WIDTH)]
    width: f64,

    /// Arena height in pixels
    #[arg(long, default_value_t = ARENA_HEIGHT)]
    height: f64,

    /// Scatter this many random walls instead of using the built-in layout
    #[arg(long)]
    obstacles: Option<usize>,

    /// Seed for the wall scatter
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Use exact ray hits (true nearest wall) instead of the axis-based ordering
    #[arg(long)]
    exact_sight: bool,

    /// Run this many ticks without a window, then exit
    #[arg(long)]
    headless: Option<u64>,

    /// Debug filter to specify log topics (e.g., "movement,sight")
    /// Available topics: arena, movement, sight, combat, world
    #[arg(long)]
    debug_filter: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn build_world(args: &Args) -> Result<World, WorldError> {
    let arena = match args.obstacles {
        Some(count) => {
            let mut arena = Arena::new(args.width, args.height)?;
            let (player, chaser) = spawn_points(args.width, args.height);
            arena.scatter_obstacles(count, args.seed, &[player, chaser], SCATTER_CLEARANCE);
            arena
        }
        None => Arena::with_layout(args.width, args.height, WallLayout::classic())?,
    };

    let policy = if args.exact_sight {
        HitPolicy::Exact
    } else {
        HitPolicy::Reference
    };
    World::new(arena, policy)
}

// Stands still, keeps the first chaser in sight and fires whenever the gun allows
fn run_headless(world: &mut World, ticks: u64) -> Result<(), WorldError> {
    info!("Running {} ticks headless...", ticks);
    for _ in 0..ticks {
        let aim = world
            .chasers
            .first()
            .map(|c| c.position())
            .unwrap_or_else(|| world.arena.center());
        let input = TickInput {
            aim,
            shoot: true,
            ..TickInput::default()
        };
        world.tick(&input)?;
    }

    let player = world.player.position();
    info!(
        "Done after {} ticks: player at ({:.1}, {:.1}), {} bullets in flight",
        world.tick_count(),
        player.x,
        player.y,
        world.bullets.len()
    );
    for chaser in &world.chasers {
        info!(
            "Chaser {} at ({:.1}, {:.1}), {:.1} from the player",
            chaser.id,
            chaser.position().x,
            chaser.position().y,
            chaser.position().distance(&player)
        );
    }
    Ok(())
}

fn read_input() -> TickInput {
    let (mx, my) = mouse_position();
    TickInput {
        up: is_key_down(KeyCode::W) || is_key_down(KeyCode::Up),
        down: is_key_down(KeyCode::S) || is_key_down(KeyCode::Down),
        left: is_key_down(KeyCode::A) || is_key_down(KeyCode::Left),
        right: is_key_down(KeyCode::D) || is_key_down(KeyCode::Right),
        aim: Point::new(mx as f64, my as f64),
        shoot: is_mouse_button_down(MouseButton::Left),
    }
}

async fn run_viewer(mut world: World) {
    info!("Starting main loop...");
    let mut renderer = Renderer::new();
    let tick_duration = 1.0 / config::FRAME_RATE as f32;
    let mut time_accumulator = 0.0;

    while !Renderer::window_should_close() {
        let (w, h) = (screen_width() as f64, screen_height() as f64);
        if w != world.arena.width() || h != world.arena.height() {
            if let Err(e) = world.resize(w, h) {
                error!("Resize to {}x{} failed: {}", w, h, e);
            }
        }
        if is_key_pressed(KeyCode::R) {
            renderer.toggle_rays();
        }

        // Fixed simulation rate, independent of the display rate
        time_accumulator += get_frame_time();
        while time_accumulator >= tick_duration {
            time_accumulator -= tick_duration;
            if let Err(e) = world.tick(&read_input()) {
                error!("Tick {} failed: {}", world.tick_count(), e);
                process::exit(1);
            }
        }

        renderer.draw_frame(&world);
        next_frame().await;
    }
    info!("Exiting after {} ticks.", world.tick_count());
}

fn main() {
    let args = Args::parse();

    // Setup logger with debug filters if provided
    let log_level = logging::parse_level(&args.log_level);
    if let Err(e) = logging::init_logger(log_level, args.debug_filter.clone()) {
        eprintln!("Warning: Failed to initialize logger: {}", e);
    }

    info!("Initializing arena...");
    let mut world = match build_world(&args) {
        Ok(world) => world,
        Err(e) => {
            error!("Cannot set up the world: {}", e);
            process::exit(1);
        }
    };

    if let Some(ticks) = args.headless {
        if let Err(e) = run_headless(&mut world, ticks) {
            error!("Simulation failed: {}", e);
            process::exit(1);
        }
        return;
    }

    let conf = Conf {
        window_title: "Hide and Seek".to_owned(),
        window_width: args.width as i32,
        window_height: args.height as i32,
        window_resizable: true,
        ..Default::default()
    };
    macroquad::Window::from_config(conf, run_viewer(world));
}
