mod offscreen;
mod presenter;

pub(crate) use offscreen::blit_rgba;
pub use offscreen::OffscreenBuffer;
pub use presenter::{crop_half_extent, Presenter, ScrollOffset, VirtualResolution};
