use std::time::Instant;

use pixels::{Error as PixelsError, Pixels, SurfaceTexture};
use thiserror::Error;
use tracing::{info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowBuilder};

use crate::assets::AssetError;
use crate::sprite::{Sprite, SpriteFrames};
use crate::tilefield::{generate_tile_field, TileFieldError};
use crate::{resolve_app_paths, StartupError, TextureStore};

use super::config::{Config, ConfigError};
use super::input::{EventQueue, GameEvent};
use super::rendering::{OffscreenBuffer, Presenter, ScrollOffset};
use super::scene::{Stage, GB_GREEN};
use super::stats::FrameStats;
use super::timer::AnimationTimer;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to load startup asset: {0}")]
    Asset(#[from] AssetError),
    #[error("failed to generate tile field: {0}")]
    TileField(#[from] TileFieldError),
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize presentation surface: {0}")]
    CreateRenderer(#[source] PixelsError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

/// Builds the whole scene once, then drives the single-threaded frame loop:
/// drain queued input/timer events, compose into the off-screen buffer,
/// present the cropped window nearest-neighbor onto the display surface.
pub fn run_app(config: Config) -> Result<(), AppError> {
    config.validate()?;
    let bindings = config.bindings.resolve()?;
    let paths = resolve_app_paths()?;
    info!(root = %paths.root.display(), "startup");

    let mut store = TextureStore::new();
    let base_tile = store.load(&paths.tiles_dir.join("field_rough.png"))?;
    let frames = SpriteFrames::load(&mut store, &paths.sprites_dir.join("player"))?;

    let field = generate_tile_field(
        config.grid_width,
        config.grid_height,
        config.cell_pitch,
        config.inclusion_probability,
        &base_tile,
        &mut rand::thread_rng(),
    )?;

    let mut offscreen = OffscreenBuffer::new(config.buffer_size);
    let spawn = player_spawn_px(config.buffer_size, frames.frame_size());
    let mut stage = Stage::new(GB_GREEN, field, Sprite::new(frames, spawn));
    let presenter = Presenter::new(
        config.virtual_resolution(),
        ScrollOffset {
            x: config.scroll_x,
            y: config.scroll_y,
        },
    );

    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window: &'static Window = Box::leak(Box::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    ));
    let size = window.inner_size();
    let mut surface_width = size.width;
    let mut surface_height = size.height;
    let mut pixels =
        build_pixels(window, surface_width, surface_height).map_err(AppError::CreateRenderer)?;

    event_loop.set_control_flow(ControlFlow::Poll);
    info!(
        virtual_width = config.virtual_width,
        virtual_height = config.virtual_height,
        buffer_size = config.buffer_size,
        window_width = surface_width,
        window_height = surface_height,
        "presentation_configured"
    );

    let mut queue = EventQueue::new();
    let mut timer = AnimationTimer::new(config.animation_interval(), Instant::now());
    let mut stats = FrameStats::new(config.stats_log_interval());
    let mut last_frame_instant = Instant::now();

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    info!(reason = "window_close", "shutdown_requested");
                    window_target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    if new_size.width == 0 || new_size.height == 0 {
                        return;
                    }
                    match build_pixels(window, new_size.width, new_size.height) {
                        Ok(rebuilt) => {
                            pixels = rebuilt;
                            surface_width = new_size.width;
                            surface_height = new_size.height;
                        }
                        Err(error) => {
                            warn!(error = %error, "surface_resize_failed");
                            window_target.exit();
                        }
                    }
                }
                WindowEvent::KeyboardInput { event: key_event, .. } => {
                    if key_event.state != ElementState::Pressed || key_event.repeat {
                        return;
                    }
                    let PhysicalKey::Code(code) = key_event.physical_key else {
                        return;
                    };
                    match bindings.event_for_key(code) {
                        Some(GameEvent::Quit) => {
                            // Shutdown is immediate: no pending-frame drain.
                            info!(reason = "quit_key", "shutdown_requested");
                            window_target.exit();
                        }
                        Some(game_event) => queue.push(game_event),
                        None => {}
                    }
                }
                WindowEvent::RedrawRequested => {
                    let now = Instant::now();
                    let frame_dt = now.saturating_duration_since(last_frame_instant);
                    last_frame_instant = now;

                    for _ in 0..timer.due_ticks(now) {
                        queue.push(GameEvent::AnimationTick);
                    }
                    for game_event in queue.drain() {
                        if game_event == GameEvent::Quit {
                            window_target.exit();
                            return;
                        }
                        if game_event == GameEvent::AnimationTick {
                            stats.record_anim_tick();
                        }
                        stage.apply_event(game_event);
                    }

                    stage.compose(&mut offscreen);
                    presenter.present(
                        &offscreen,
                        pixels.frame_mut(),
                        surface_width,
                        surface_height,
                    );
                    if let Err(error) = pixels.render() {
                        warn!(error = %error, "present_failed");
                        window_target.exit();
                    }

                    stats.record_frame(frame_dt);
                    if let Some(snapshot) = stats.maybe_snapshot(now) {
                        info!(
                            fps = snapshot.fps,
                            anim_ticks_per_second = snapshot.anim_ticks_per_second,
                            frame_time_ms = snapshot.frame_time_ms,
                            "frame_stats"
                        );
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                window.request_redraw();
            }
            Event::LoopExiting => {
                info!("shutdown");
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)
}

fn build_pixels(
    window: &'static Window,
    width: u32,
    height: u32,
) -> Result<Pixels<'static>, PixelsError> {
    let surface = SurfaceTexture::new(width, height, window);
    Pixels::new(width, height, surface)
}

/// Top-left texel placing the player frame at the buffer midpoint.
fn player_spawn_px(buffer_size: u32, frame_size: (u32, u32)) -> (i32, i32) {
    (
        (buffer_size as i64 / 2 - frame_size.0 as i64 / 2) as i32,
        (buffer_size as i64 / 2 - frame_size.1 as i64 / 2) as i32,
    )
}
