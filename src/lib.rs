//! Software rasterization and compositing.
//!
//! [`Surface`] owns a 4-byte-per-pixel buffer, [`SurfaceViewPort`] draws into
//! a window of a parent under translation and clipping, and
//! [`HighDPISurface`] supersamples each logical pixel into a 2x2 block. All
//! three implement [`Drawable`].

pub mod codec;
pub mod colour;
pub mod config;
#[cfg(feature = "preview")]
pub mod display;
pub mod geometry;
pub mod gfx;
pub mod logging;

pub use codec::{ImageError, ImageFormat};
pub use colour::{Colour, ParseColourError};
pub use config::RenderConfig;
pub use geometry::{Point, Rect};
pub use gfx::{Drawable, HighDPISurface, Surface, SurfaceViewPort};
