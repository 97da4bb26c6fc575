pub mod progress;
pub mod result_store;

pub use progress::*;
pub use result_store::*;
