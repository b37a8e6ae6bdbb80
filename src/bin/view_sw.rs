//! Walk around a grid map with the software canvas.
//!
//! ```bash
//! cargo run --release -- [--map level.txt] [--width 960 --height 600]
//! ```

use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::Context;
use clap::Parser;
use glam::DVec2;
use minifb::{Key, KeyRepeat, Window, WindowOptions};

use gridcast::{
    engine::RayCaster,
    renderer::SoftwareCanvas,
    world::{Camera, DEFAULT_MAP, GridMap, TextureBank, install_default_textures},
};

const MOVE_SPEED: f64 = 0.06; // cells per frame
const TURN_SPEED: f64 = 2.5; // degrees per frame
const PITCH_SPEED: f64 = 0.01;
const BOB_SPEED: f64 = 0.006;

/// CLI options handled via `clap` derive.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Opts {
    /// Window width in pixels
    #[arg(long, default_value_t = 960)]
    width: usize,

    /// Window height in pixels
    #[arg(long, default_value_t = 600)]
    height: usize,

    /// Text grid to load instead of the built-in map
    #[arg(long, value_name = "FILE")]
    map: Option<PathBuf>,

    /// Target frame rate
    #[arg(long, default_value_t = 60)]
    fps: usize,

    /// Head-bob amplitude while walking, fraction of screen height
    #[arg(long, default_value_t = 0.02)]
    bob: f64,
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let opts = Opts::parse();

    let text = match &opts.map {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading map {}", path.display()))?,
        None => DEFAULT_MAP.to_owned(),
    };

    let mut bank = TextureBank::default_with_checker();
    install_default_textures(&mut bank)?;
    let map = GridMap::parse(&text, &bank)?;
    let mut sprites = map.sprites();
    log::info!(
        "{}x{} map, {} enemies, {} textures",
        map.width(),
        map.height(),
        sprites.len(),
        bank.len()
    );

    let mut caster = RayCaster::new(Camera::new(map.start(), DVec2::new(0.0, 1.0)));
    let mut canvas = SoftwareCanvas::new(opts.width, opts.height);

    let mut win = Window::new(
        "gridcast software render",
        opts.width,
        opts.height,
        WindowOptions::default(),
    )?;
    win.set_target_fps(opts.fps);

    // ────────────────── benchmarking state ──────────────────────────────
    let mut acc_time = Duration::ZERO;
    let mut acc_frames = 0usize;
    let mut last_print = Instant::now();

    while win.is_open() && !win.is_key_down(Key::Escape) {
        let t0 = Instant::now();

        /* movement --------------------------------------------------------- */
        let mut forward = 0.0;
        let mut strafe = 0.0;
        if win.is_key_down(Key::Up) || win.is_key_down(Key::W) {
            forward += MOVE_SPEED;
        }
        if win.is_key_down(Key::Down) || win.is_key_down(Key::S) {
            forward -= MOVE_SPEED;
        }
        if win.is_key_down(Key::A) {
            strafe -= MOVE_SPEED;
        }
        if win.is_key_down(Key::D) {
            strafe += MOVE_SPEED;
        }

        let camera = caster.camera_mut();
        if win.is_key_down(Key::Left) {
            camera.rotate(-TURN_SPEED);
        }
        if win.is_key_down(Key::Right) {
            camera.rotate(TURN_SPEED);
        }
        if win.is_key_down(Key::PageUp) {
            camera.pitch_by(PITCH_SPEED);
        }
        if win.is_key_down(Key::PageDown) {
            camera.pitch_by(-PITCH_SPEED);
        }

        let walking = forward != 0.0 || strafe != 0.0;
        if walking {
            camera.move_by(forward, strafe, &map);
        }
        // range 0 lets the bob settle back onto the horizon
        camera.set_bob_range(if walking { opts.bob } else { 0.0 });
        camera.advance_bob(BOB_SPEED);

        /* actions ---------------------------------------------------------- */
        if win.is_key_pressed(Key::Space, KeyRepeat::No) {
            let (pos, dir) = (camera.position(), camera.coordinate_system());
            if let Some(i) = map.hit_test(pos, dir, &sprites) {
                let hit = sprites.remove(i);
                log::info!("hit enemy at {}", hit.pos);
            }
        }

        /* draw */
        let (w, h) = win.get_size();
        canvas.begin_frame(w.max(1), h.max(1));
        caster.draw(&mut canvas, &map, &sprites);
        canvas.end_frame(|fb, w, h| {
            acc_time += t0.elapsed();
            acc_frames += 1;
            win.update_with_buffer(fb, w, h)
        })?;

        if last_print.elapsed() >= Duration::from_secs(3) {
            let avg_ms = acc_time.as_secs_f64() * 1000.0 / acc_frames as f64;
            log::info!("avg render: {:.2} ms  ({:.1} FPS)", avg_ms, 1000.0 / avg_ms);
            acc_time = Duration::ZERO;
            acc_frames = 0;
            last_print = Instant::now();
        }
    }
    Ok(())
}
