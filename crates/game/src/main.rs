use std::process::ExitCode;

use engine::run_app;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod settings;

const SETTINGS_FILE: &str = "retroge.json";

fn main() -> ExitCode {
    init_tracing();
    info!("=== Retro GE Startup ===");

    let app_paths = match engine::resolve_app_paths() {
        Ok(paths) => paths,
        Err(error) => {
            error!(error = %error, "startup_failed");
            return ExitCode::FAILURE;
        }
    };

    let config = match settings::load_settings(&app_paths.root.join(SETTINGS_FILE)) {
        Ok(config) => config,
        Err(error) => {
            error!(error = %error, "startup_failed");
            return ExitCode::FAILURE;
        }
    };

    if let Err(error) = run_app(config) {
        error!(error = %error, "fatal");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use engine::{
        generate_tile_field, AnimationTimer, Direction, EventQueue, GameEvent, OffscreenBuffer,
        Sprite, SpriteFrames, Stage, Texture, TextureHandle,
    };
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn frame(value: u8) -> TextureHandle {
        Arc::new(Texture::solid(2, 2, [value, 0, 0, 255]))
    }

    struct PlayerFixture {
        down: [TextureHandle; 2],
        right: [TextureHandle; 2],
        stage: Stage,
    }

    fn player_fixture() -> PlayerFixture {
        let down = [frame(10), frame(11)];
        let up = [frame(20), frame(21)];
        let right = [frame(30), frame(31)];
        let frames = SpriteFrames::new(
            [Arc::clone(&down[0]), Arc::clone(&down[1])],
            up,
            [Arc::clone(&right[0]), Arc::clone(&right[1])],
        );
        let tile = Texture::solid(2, 2, [0, 255, 0, 255]);
        let field = generate_tile_field(2, 2, 2, 1.0, &tile, &mut StdRng::seed_from_u64(3))
            .expect("field");
        let stage = Stage::new(
            engine::GB_GREEN,
            field,
            Sprite::new(frames, (2, 2)),
        );
        PlayerFixture { down, right, stage }
    }

    fn drain_into(stage: &mut Stage, queue: &mut EventQueue) {
        for event in queue.drain() {
            stage.apply_event(event);
        }
    }

    #[test]
    fn facing_sequence_ends_mirrored_on_right_frame_zero() {
        // Scenario: fresh spawn, then up, right, left with no timer ticks.
        let mut fixture = player_fixture();
        let mut queue = EventQueue::new();

        assert_eq!(fixture.stage.player().facing(), Direction::Down);
        assert!(!fixture.stage.player().frame_parity());
        assert!(Arc::ptr_eq(
            fixture.stage.player().bound_texture(),
            &fixture.down[0]
        ));

        queue.push(GameEvent::Face(Direction::Up));
        queue.push(GameEvent::Face(Direction::Right));
        queue.push(GameEvent::Face(Direction::Left));
        drain_into(&mut fixture.stage, &mut queue);

        let player = fixture.stage.player();
        assert_eq!(player.facing(), Direction::Left);
        assert!(player.is_mirrored());
        assert!(Arc::ptr_eq(player.bound_texture(), &fixture.right[0]));
    }

    #[test]
    fn three_timer_fires_alternate_parity_without_changing_facing() {
        let mut fixture = player_fixture();
        let mut queue = EventQueue::new();
        let start = Instant::now();
        let interval = Duration::from_millis(250);
        let mut timer = AnimationTimer::new(interval, start);

        let mut parity_sequence = vec![fixture.stage.player().frame_parity()];
        for fire in 1..=3u32 {
            for _ in 0..timer.due_ticks(start + fire * interval) {
                queue.push(GameEvent::AnimationTick);
            }
            drain_into(&mut fixture.stage, &mut queue);
            parity_sequence.push(fixture.stage.player().frame_parity());
        }

        assert_eq!(parity_sequence, vec![false, true, false, true]);
        assert_eq!(fixture.stage.player().facing(), Direction::Down);
    }

    #[test]
    fn events_queued_during_a_frame_apply_before_the_next_compose() {
        let mut fixture = player_fixture();
        let mut queue = EventQueue::new();
        let mut buffer = OffscreenBuffer::new(8);

        queue.push(GameEvent::Face(Direction::Right));
        queue.push(GameEvent::AnimationTick);
        drain_into(&mut fixture.stage, &mut queue);
        fixture.stage.compose(&mut buffer);

        let player = fixture.stage.player();
        assert_eq!(player.facing(), Direction::Right);
        assert!(player.frame_parity());
        assert!(Arc::ptr_eq(player.bound_texture(), &fixture.right[1]));
    }

    #[test]
    fn quit_event_does_not_disturb_sprite_state() {
        let mut fixture = player_fixture();
        let mut queue = EventQueue::new();

        queue.push(GameEvent::Face(Direction::Up));
        queue.push(GameEvent::Quit);
        drain_into(&mut fixture.stage, &mut queue);

        assert_eq!(fixture.stage.player().facing(), Direction::Up);
    }
}
