pub mod platform;
pub mod registry;

pub use platform::*;
pub use registry::*;
