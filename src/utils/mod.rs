pub mod date;
pub mod error;

pub use error::{AppError, AppResult};
