pub mod binary;
pub mod compile;
pub mod component;
pub mod task;

pub use binary::*;
pub use compile::*;
pub use component::*;
pub use task::*;
