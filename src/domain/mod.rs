pub mod classification;
pub mod company;
pub mod platform;

pub use classification::*;
pub use company::*;
pub use platform::*;
