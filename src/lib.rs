pub mod args;
pub mod calc;
pub mod commands;
pub mod export;
mod error;
pub mod model;
pub mod paste;
mod sheet;
mod utils;

pub use error::Error;
pub use error::Result;
pub use sheet::{CostingSheet, Year};
