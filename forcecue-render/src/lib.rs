//! Monitor screen rendering: force palette, text rasterization and the
//! tiny-skia frame renderer.

pub mod palette;
pub mod render;
pub mod text;

pub use ab_glyph::FontVec;
pub use palette::{banner_color, bar_color, readout_color, Rgb};
pub use render::{Align, FrameStats, Layout, SkiaRenderer, TextSize};
pub use text::{find_font, load_font, render_text_pixmap};
