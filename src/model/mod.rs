//! Types that represent the core data model, such as `LineItem` and `Summary`.
pub mod amount;
mod discounts;
mod header;
mod line_item;
mod summary;

pub use discounts::Discounts;
pub use header::{DealType, HeaderConfig, Region};
pub use line_item::{CalculatedLineItem, Category, LineItem};
pub use summary::{CrayonCosts, Summary, YearFigures};
