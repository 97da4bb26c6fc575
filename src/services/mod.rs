pub mod crawler;
pub mod droid;
pub mod export;
pub mod google_search;
pub mod maintenance;
pub mod reanalyzer;
pub mod resolver;
pub mod rules;

pub use crawler::*;
pub use droid::*;
pub use export::*;
pub use google_search::*;
pub use maintenance::*;
pub use reanalyzer::*;
pub use resolver::*;
pub use rules::*;
