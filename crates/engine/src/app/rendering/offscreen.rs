use tracing::info;

use crate::assets::Texture;

/// Copies `src` RGBA8 into `dst` at (`x`, `y`), clipping at the destination
/// edges. Texels with alpha 0 leave the destination untouched; everything
/// else is copied without blending, which keeps layering a pure draw-order
/// concern. `mirrored` flips the source horizontally (scale -1 on U).
pub(crate) fn blit_rgba(
    dst: &mut [u8],
    dst_width: u32,
    dst_height: u32,
    src: &[u8],
    src_width: u32,
    src_height: u32,
    x: i32,
    y: i32,
    mirrored: bool,
) {
    if src_width == 0 || src_height == 0 || dst_width == 0 || dst_height == 0 {
        return;
    }
    debug_assert_eq!(src.len(), src_width as usize * src_height as usize * 4);
    debug_assert_eq!(dst.len(), dst_width as usize * dst_height as usize * 4);

    for src_y in 0..src_height as i32 {
        let dst_y = y + src_y;
        if dst_y < 0 || dst_y >= dst_height as i32 {
            continue;
        }
        let src_row = src_y as usize * src_width as usize * 4;
        let dst_row = dst_y as usize * dst_width as usize * 4;
        for src_x in 0..src_width as i32 {
            let dst_x = x + src_x;
            if dst_x < 0 || dst_x >= dst_width as i32 {
                continue;
            }
            let sampled_x = if mirrored {
                src_width as i32 - 1 - src_x
            } else {
                src_x
            } as usize;
            let src_offset = src_row + sampled_x * 4;
            if src[src_offset + 3] == 0 {
                continue;
            }
            let dst_offset = dst_row + dst_x as usize * 4;
            dst[dst_offset..dst_offset + 4].copy_from_slice(&src[src_offset..src_offset + 4]);
        }
    }
}

/// Square off-screen render target the whole scene composes into. Allocated
/// once at startup and reused every frame; only its contents change.
#[derive(Debug)]
pub struct OffscreenBuffer {
    size: u32,
    rgba: Vec<u8>,
}

impl OffscreenBuffer {
    pub fn new(size: u32) -> Self {
        info!(size, "offscreen_buffer_created");
        Self {
            size,
            rgba: vec![0; size as usize * size as usize * 4],
        }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    /// The solid background card: fills the whole buffer, so it must be the
    /// first draw of a frame.
    pub fn fill(&mut self, color: [u8; 4]) {
        for chunk in self.rgba.chunks_exact_mut(4) {
            chunk.copy_from_slice(&color);
        }
    }

    pub fn blit_texture(&mut self, texture: &Texture, x: i32, y: i32, mirrored: bool) {
        blit_rgba(
            &mut self.rgba,
            self.size,
            self.size,
            texture.rgba(),
            texture.width(),
            texture.height(),
            x,
            y,
            mirrored,
        );
    }

    pub fn blit_raw(&mut self, src: &[u8], src_width: u32, src_height: u32, x: i32, y: i32) {
        blit_rgba(
            &mut self.rgba,
            self.size,
            self.size,
            src,
            src_width,
            src_height,
            x,
            y,
            false,
        );
    }

    #[cfg(test)]
    pub(crate) fn texel(&self, x: u32, y: u32) -> [u8; 4] {
        let offset = (y as usize * self.size as usize + x as usize) * 4;
        [
            self.rgba[offset],
            self.rgba[offset + 1],
            self.rgba[offset + 2],
            self.rgba[offset + 3],
        ]
    }
}
