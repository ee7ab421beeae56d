use std::path::Path;
use std::sync::Arc;

use crate::assets::{AssetError, TextureHandle, TextureStore};

/// Cardinal facing. There is no idle variant; the last commanded direction
/// persists until the next input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Two animation frames per stored direction. `Left` is not stored: it reuses
/// the `Right` pair with a mirrored sampling transform at draw time.
#[derive(Debug, Clone)]
pub struct SpriteFrames {
    down: [TextureHandle; 2],
    up: [TextureHandle; 2],
    right: [TextureHandle; 2],
}

impl SpriteFrames {
    pub fn new(
        down: [TextureHandle; 2],
        up: [TextureHandle; 2],
        right: [TextureHandle; 2],
    ) -> Self {
        Self { down, up, right }
    }

    /// Loads the six frame textures from a sprite directory
    /// (`d1.png d2.png u1.png u2.png r1.png r2.png`). Any missing file is
    /// fatal; there is no placeholder frame.
    pub fn load(store: &mut TextureStore, sprite_dir: &Path) -> Result<Self, AssetError> {
        let mut frame = |name: &str| store.load(&sprite_dir.join(name));
        Ok(Self {
            down: [frame("d1.png")?, frame("d2.png")?],
            up: [frame("u1.png")?, frame("u2.png")?],
            right: [frame("r1.png")?, frame("r2.png")?],
        })
    }

    /// Pixel dimensions of a frame (all six frames share them in practice;
    /// this reports the default-facing frame 0).
    pub fn frame_size(&self) -> (u32, u32) {
        (self.down[0].width(), self.down[0].height())
    }

    fn texture(&self, facing: Direction, parity: bool) -> &TextureHandle {
        let pair = match facing {
            Direction::Down => &self.down,
            Direction::Up => &self.up,
            // Left has no stored frames; the mirror flag handles it.
            Direction::Left | Direction::Right => &self.right,
        };
        &pair[usize::from(parity)]
    }
}

/// One animated entity: a facing/frame-parity state machine plus the texture
/// currently bound to its quad.
#[derive(Debug, Clone)]
pub struct Sprite {
    frames: SpriteFrames,
    facing: Direction,
    frame_parity: bool,
    bound: TextureHandle,
    mirrored: bool,
    position_px: (i32, i32),
}

impl Sprite {
    /// Spawns facing down on frame 0, with the matching texture bound.
    pub fn new(frames: SpriteFrames, position_px: (i32, i32)) -> Self {
        let bound = Arc::clone(frames.texture(Direction::Down, false));
        Self {
            frames,
            facing: Direction::Down,
            frame_parity: false,
            bound,
            mirrored: false,
            position_px,
        }
    }

    /// Rebinds the displayed texture for `direction` at the current frame
    /// parity. The mirror flag is set iff the direction is `Left` and cleared
    /// otherwise, so repeated mirroring never accumulates. Re-issuing the
    /// current direction is a visual no-op but still rebinds.
    pub fn set_facing(&mut self, direction: Direction) {
        self.bound = Arc::clone(self.frames.texture(direction, self.frame_parity));
        self.mirrored = direction == Direction::Left;
        self.facing = direction;
    }

    /// Flips the animation frame and re-applies the current facing with the
    /// new parity. Two calls restore both parity and bound texture.
    pub fn advance_frame(&mut self) {
        self.frame_parity = !self.frame_parity;
        self.set_facing(self.facing);
    }

    pub fn facing(&self) -> Direction {
        self.facing
    }

    pub fn frame_parity(&self) -> bool {
        self.frame_parity
    }

    pub fn bound_texture(&self) -> &TextureHandle {
        &self.bound
    }

    pub fn is_mirrored(&self) -> bool {
        self.mirrored
    }

    pub fn position_px(&self) -> (i32, i32) {
        self.position_px
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::Texture;

    fn handle(color: [u8; 4]) -> TextureHandle {
        Arc::new(Texture::solid(2, 2, color))
    }

    fn test_frames() -> SpriteFrames {
        SpriteFrames::new(
            [handle([1, 0, 0, 255]), handle([2, 0, 0, 255])],
            [handle([3, 0, 0, 255]), handle([4, 0, 0, 255])],
            [handle([5, 0, 0, 255]), handle([6, 0, 0, 255])],
        )
    }

    #[test]
    fn spawns_facing_down_frame_zero() {
        let sprite = Sprite::new(test_frames(), (0, 0));
        assert_eq!(sprite.facing(), Direction::Down);
        assert!(!sprite.frame_parity());
        assert!(!sprite.is_mirrored());
        assert!(Arc::ptr_eq(
            sprite.bound_texture(),
            sprite.frames.texture(Direction::Down, false)
        ));
    }

    #[test]
    fn left_binds_right_frames_with_mirror() {
        let mut sprite = Sprite::new(test_frames(), (0, 0));
        sprite.set_facing(Direction::Left);
        assert!(sprite.is_mirrored());
        assert!(Arc::ptr_eq(
            sprite.bound_texture(),
            sprite.frames.texture(Direction::Right, false)
        ));
    }

    #[test]
    fn mirror_transform_is_reentrant_not_cumulative() {
        let mut sprite = Sprite::new(test_frames(), (0, 0));
        sprite.set_facing(Direction::Left);
        sprite.set_facing(Direction::Right);
        assert!(!sprite.is_mirrored());
        sprite.set_facing(Direction::Left);
        assert!(sprite.is_mirrored());
        // A second Left while already mirrored must not double-flip.
        sprite.set_facing(Direction::Left);
        assert!(sprite.is_mirrored());
    }

    #[test]
    fn advance_frame_has_period_two() {
        let mut sprite = Sprite::new(test_frames(), (0, 0));
        sprite.set_facing(Direction::Up);
        let before = Arc::clone(sprite.bound_texture());

        sprite.advance_frame();
        assert!(sprite.frame_parity());
        assert!(!Arc::ptr_eq(sprite.bound_texture(), &before));

        sprite.advance_frame();
        assert!(!sprite.frame_parity());
        assert!(Arc::ptr_eq(sprite.bound_texture(), &before));
    }

    #[test]
    fn advance_frame_keeps_facing_and_mirror() {
        let mut sprite = Sprite::new(test_frames(), (0, 0));
        sprite.set_facing(Direction::Left);
        sprite.advance_frame();
        assert_eq!(sprite.facing(), Direction::Left);
        assert!(sprite.is_mirrored());
        assert!(Arc::ptr_eq(
            sprite.bound_texture(),
            sprite.frames.texture(Direction::Right, true)
        ));
    }

    #[test]
    fn reissuing_same_direction_is_idempotent() {
        let mut sprite = Sprite::new(test_frames(), (0, 0));
        sprite.set_facing(Direction::Up);
        let bound = Arc::clone(sprite.bound_texture());
        sprite.set_facing(Direction::Up);
        assert_eq!(sprite.facing(), Direction::Up);
        assert!(Arc::ptr_eq(sprite.bound_texture(), &bound));
    }
}
