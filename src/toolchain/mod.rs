pub mod local;
pub mod registry;
pub mod toolchain;

pub use local::*;
pub use registry::*;
pub use toolchain::*;
