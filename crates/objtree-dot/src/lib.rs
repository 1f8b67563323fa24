pub mod error;
pub mod palette;
pub mod render;

pub use error::RenderError;
pub use palette::Palette;
pub use render::{render, RenderOptions, Renderer};
