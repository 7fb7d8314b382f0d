//! Earmarks ("Zweckbindungen"): restricted-purpose funds.

pub mod error;
pub mod service;
pub mod types;

pub use error::EarmarkError;
pub use service::EarmarkService;
pub use types::{CreateEarmarkInput, Earmark, UpdateEarmarkInput};
