use rand::distributions::{Bernoulli, Distribution};
use rand::Rng;
use thiserror::Error;
use tracing::info;

use crate::app::rendering::blit_rgba;
use crate::assets::Texture;

#[derive(Debug, Error)]
pub enum TileFieldError {
    #[error("tile inclusion probability {0} is outside [0, 1]")]
    InvalidProbability(f64),
    #[error("cell pitch must be non-zero")]
    ZeroCellPitch,
    #[error(
        "field of {grid_width}x{grid_height} cells at pitch {cell_pitch} \
exceeds the texel coordinate range"
    )]
    FieldTooLarge {
        grid_width: u32,
        grid_height: u32,
        cell_pitch: u32,
    },
}

/// One included grid cell. Tiles reference the shared base texture by
/// construction; they never own texels of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub cell: (u32, u32),
}

/// Per-row accumulation of included tiles. Batches exist only during
/// generation: each is folded into a baked row strip before the next row
/// starts, bounding the merge working set to one row.
#[derive(Debug)]
struct TileBatch {
    row: u32,
    tiles: Vec<Tile>,
}

/// A row batch folded into a single drawable strip.
#[derive(Debug)]
struct RowDrawable {
    y_px: u32,
    strip: Vec<u8>,
    width_px: u32,
    height_px: u32,
}

impl TileBatch {
    fn new(row: u32) -> Self {
        Self {
            row,
            tiles: Vec::new(),
        }
    }

    fn bake(self, base_tile: &Texture, cell_pitch: u32, field_width_px: u32) -> RowDrawable {
        // A base tile taller than the pitch overhangs into the rows below;
        // the strip covers the overhang so the merge keeps those texels.
        let strip_height = cell_pitch.max(base_tile.height());
        let mut strip = vec![0u8; field_width_px as usize * strip_height as usize * 4];
        for tile in &self.tiles {
            blit_rgba(
                &mut strip,
                field_width_px,
                strip_height,
                base_tile.rgba(),
                base_tile.width(),
                base_tile.height(),
                (tile.cell.0 * cell_pitch) as i32,
                0,
                false,
            );
        }
        RowDrawable {
            y_px: self.row * cell_pitch,
            strip,
            width_px: field_width_px,
            height_px: strip_height,
        }
    }
}

/// The merged tile field: every included tile baked into one RGBA layer that
/// is blitted once per frame. Immutable after generation.
#[derive(Debug, Clone)]
pub struct TileField {
    width_px: u32,
    height_px: u32,
    rgba: Vec<u8>,
    cells: Vec<(u32, u32)>,
    cell_pitch: u32,
}

impl TileField {
    pub fn width_px(&self) -> u32 {
        self.width_px
    }

    pub fn height_px(&self) -> u32 {
        self.height_px
    }

    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    pub fn tile_count(&self) -> usize {
        self.cells.len()
    }

    pub fn cells(&self) -> &[(u32, u32)] {
        &self.cells
    }

    /// Buffer-local texel position of each included tile.
    pub fn texel_positions(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let pitch = self.cell_pitch;
        self.cells.iter().map(move |(x, y)| (x * pitch, y * pitch))
    }
}

/// Builds the randomized background field. One independent Bernoulli trial
/// per cell decides inclusion; included cells are positioned at
/// `(x * cell_pitch, y * cell_pitch)` and all reference `base_tile`.
///
/// Merging happens in two phases: per-row strips first, then all strips into
/// the final layer. The row granularity bounds the peak merge working set to
/// one row of texels no matter how many tiles the trials include, and must
/// not be collapsed into a single unbounded pass.
pub fn generate_tile_field(
    grid_width: u32,
    grid_height: u32,
    cell_pitch: u32,
    inclusion_probability: f64,
    base_tile: &Texture,
    rng: &mut impl Rng,
) -> Result<TileField, TileFieldError> {
    if cell_pitch == 0 {
        return Err(TileFieldError::ZeroCellPitch);
    }
    let trial = Bernoulli::new(inclusion_probability)
        .map_err(|_| TileFieldError::InvalidProbability(inclusion_probability))?;

    let too_large = || TileFieldError::FieldTooLarge {
        grid_width,
        grid_height,
        cell_pitch,
    };
    let width_px = grid_width.checked_mul(cell_pitch).ok_or_else(too_large)?;
    let height_px = grid_height.checked_mul(cell_pitch).ok_or_else(too_large)?;
    let mut rgba = vec![0u8; width_px as usize * height_px as usize * 4];
    let mut cells = Vec::new();

    for row in 0..grid_height {
        // Phase 1: accumulate this row's tiles, then fold the batch into one
        // strip before the next row starts.
        let mut batch = TileBatch::new(row);
        for column in 0..grid_width {
            if trial.sample(rng) {
                batch.tiles.push(Tile {
                    cell: (column, row),
                });
                cells.push((column, row));
            }
        }
        let drawable = batch.bake(base_tile, cell_pitch, width_px);

        // Phase 2: merge the row drawable into the final layer.
        blit_rgba(
            &mut rgba,
            width_px,
            height_px,
            &drawable.strip,
            drawable.width_px,
            drawable.height_px,
            0,
            drawable.y_px as i32,
            false,
        );
    }

    info!(
        grid_width,
        grid_height,
        cell_pitch,
        tile_count = cells.len(),
        "tile_field_generated"
    );

    Ok(TileField {
        width_px,
        height_px,
        rgba,
        cells,
        cell_pitch,
    })
}
