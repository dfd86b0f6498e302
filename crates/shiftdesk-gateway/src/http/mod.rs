pub mod ai;
pub mod assignments;
pub mod employees;
pub mod error;
pub mod health;
pub mod shifts;

pub use error::ApiError;
