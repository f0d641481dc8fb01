mod color;
mod window;

pub use color::Color;
pub use window::WindowState;
