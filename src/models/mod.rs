pub mod person;
pub mod union;
pub mod dataset;
pub mod config;

pub use person::*;
pub use union::*;
pub use dataset::*;
pub use config::*;
