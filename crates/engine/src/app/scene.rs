use tracing::info;

use super::input::GameEvent;
use super::rendering::OffscreenBuffer;
use crate::sprite::{Direction, Sprite};
use crate::tilefield::TileField;

/// Game Boy green, the stock background card color.
pub const GB_GREEN: [u8; 4] = [134, 192, 108, 255];

/// Explicit owner of everything composed into the off-screen buffer: the
/// background card, the merged tile field, and the live sprites. Construction
/// order is deterministic and teardown is this one value being dropped at
/// process end; nothing is detached or reparented in between.
#[derive(Debug)]
pub struct Stage {
    background: [u8; 4],
    field: TileField,
    sprites: Vec<Sprite>,
    player: usize,
}

impl Stage {
    pub fn new(background: [u8; 4], field: TileField, player: Sprite) -> Self {
        info!(
            tile_count = field.tile_count(),
            field_width_px = field.width_px(),
            field_height_px = field.height_px(),
            "stage_built"
        );
        Self {
            background,
            field,
            sprites: vec![player],
            player: 0,
        }
    }

    pub fn add_sprite(&mut self, sprite: Sprite) -> usize {
        self.sprites.push(sprite);
        self.sprites.len() - 1
    }

    pub fn player(&self) -> &Sprite {
        &self.sprites[self.player]
    }

    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    pub fn field(&self) -> &TileField {
        &self.field
    }

    /// Applies one drained event. Facing goes to the player; the animation
    /// tick advances every live sprite in lockstep. `Quit` is the loop's
    /// concern and a no-op here.
    pub fn apply_event(&mut self, event: GameEvent) {
        match event {
            GameEvent::Face(direction) => self.face_player(direction),
            GameEvent::AnimationTick => self.advance_all_frames(),
            GameEvent::Quit => {}
        }
    }

    pub fn face_player(&mut self, direction: Direction) {
        self.sprites[self.player].set_facing(direction);
    }

    pub fn advance_all_frames(&mut self) {
        for sprite in &mut self.sprites {
            sprite.advance_frame();
        }
    }

    /// Composes the frame back-to-front. Layering is draw order alone: the
    /// full-buffer card, then the merged field, then sprites.
    pub fn compose(&self, buffer: &mut OffscreenBuffer) {
        buffer.fill(self.background);
        buffer.blit_raw(
            self.field.rgba(),
            self.field.width_px(),
            self.field.height_px(),
            0,
            0,
        );
        for sprite in &self.sprites {
            let (x, y) = sprite.position_px();
            buffer.blit_texture(sprite.bound_texture(), x, y, sprite.is_mirrored());
        }
    }
}
