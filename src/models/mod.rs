pub mod enums;
pub mod interaction;
pub mod medication;

pub use enums::*;
pub use interaction::*;
pub use medication::*;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Invalid {field} value: {value}")]
    InvalidEnum { field: String, value: String },
}
