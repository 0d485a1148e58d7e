pub mod element;
pub mod error;
pub mod graph;
pub mod path;

pub use element::*;
pub use error::*;
pub use graph::*;
pub use path::*;
