pub mod api;
pub mod joint;
pub mod normalizer;
pub mod pipeline;
pub mod worker;

pub use api::*;
pub use joint::*;
pub use normalizer::*;
pub use pipeline::*;
pub use worker::*;
