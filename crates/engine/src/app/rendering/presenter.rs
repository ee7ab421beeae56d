use super::offscreen::OffscreenBuffer;

/// The fixed logical pixel grid the game renders at, before upscaling.
/// 256x144 is the closest 16:9 fit to classic handheld output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualResolution {
    pub width: u32,
    pub height: u32,
}

/// Texel-space displacement of the sampling window from the buffer center.
/// This is the whole camera: scrolling moves the window, never the scene.
/// Granularity is therefore one backing-buffer texel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollOffset {
    pub x: i32,
    pub y: i32,
}

/// Half of the sampled UV rectangle per axis. Exactly
/// `(virtual / buffer) / 2`, so the displayed region always spans the
/// virtual resolution in texels no matter how large the backing buffer is.
pub fn crop_half_extent(virtual_res: VirtualResolution, buffer_size: u32) -> (f64, f64) {
    (
        virtual_res.width as f64 / buffer_size as f64 / 2.0,
        virtual_res.height as f64 / buffer_size as f64 / 2.0,
    )
}

/// Samples a cropped, centered window of the off-screen buffer onto the full
/// display surface using nearest-neighbor filtering only. Hard texel edges
/// are the point; there is deliberately no bilinear path.
#[derive(Debug, Clone, Copy)]
pub struct Presenter {
    virtual_res: VirtualResolution,
    scroll: ScrollOffset,
}

impl Presenter {
    pub fn new(virtual_res: VirtualResolution, scroll: ScrollOffset) -> Self {
        Self {
            virtual_res,
            scroll,
        }
    }

    pub fn virtual_resolution(&self) -> VirtualResolution {
        self.virtual_res
    }

    pub fn scroll(&self) -> ScrollOffset {
        self.scroll
    }

    pub fn set_scroll(&mut self, scroll: ScrollOffset) {
        self.scroll = scroll;
    }

    /// Top-left texel of the sampled window in buffer space.
    fn crop_origin(&self, buffer_size: u32) -> (i64, i64) {
        let center_x = buffer_size as i64 / 2 + self.scroll.x as i64;
        let center_y = buffer_size as i64 / 2 + self.scroll.y as i64;
        (
            center_x - self.virtual_res.width as i64 / 2,
            center_y - self.virtual_res.height as i64 / 2,
        )
    }

    /// Fills `frame` (RGBA8, `display_width * display_height`) from the crop
    /// window. Each display pixel maps to the floor-nearest source texel, so
    /// upscaling replicates texels without blending.
    pub fn present(
        &self,
        buffer: &OffscreenBuffer,
        frame: &mut [u8],
        display_width: u32,
        display_height: u32,
    ) {
        if display_width == 0 || display_height == 0 {
            return;
        }
        debug_assert_eq!(
            frame.len(),
            display_width as usize * display_height as usize * 4
        );

        let buffer_size = buffer.size();
        let src = buffer.rgba();
        let (origin_x, origin_y) = self.crop_origin(buffer_size);

        for out_y in 0..display_height {
            let crop_y = (out_y as u64 * self.virtual_res.height as u64
                / display_height as u64) as i64;
            let src_y = origin_y + crop_y;
            let dst_row = out_y as usize * display_width as usize * 4;
            for out_x in 0..display_width {
                let crop_x = (out_x as u64 * self.virtual_res.width as u64
                    / display_width as u64) as i64;
                let src_x = origin_x + crop_x;
                let dst_offset = dst_row + out_x as usize * 4;
                let texel = sample_or_black(src, buffer_size, src_x, src_y);
                frame[dst_offset..dst_offset + 4].copy_from_slice(&texel);
            }
        }
    }
}

/// Startup validation rejects out-of-bounds windows, so this path is only a
/// belt against scroll mutations at runtime; outside texels read as black.
fn sample_or_black(src: &[u8], buffer_size: u32, x: i64, y: i64) -> [u8; 4] {
    if x < 0 || y < 0 || x >= buffer_size as i64 || y >= buffer_size as i64 {
        return [0, 0, 0, 255];
    }
    let offset = (y as usize * buffer_size as usize + x as usize) * 4;
    [src[offset], src[offset + 1], src[offset + 2], src[offset + 3]]
}
