//! Software rasterization: pixel buffers, drawing primitives and blits.

pub mod blit;
pub mod canvas;
pub mod drawable;
pub mod highdpi;
pub mod pixel;
pub mod surface;
pub mod viewport;

pub use canvas::Canvas;
pub use drawable::{Drawable, DEFAULT_DPI};
pub use highdpi::{HighDPISurface, HIGH_DPI_RATIO};
pub use pixel::BYTES_PER_PIXEL;
pub use surface::Surface;
pub use viewport::SurfaceViewPort;
