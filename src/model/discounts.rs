use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Absolute funding-discount values, one per deal year, entered manually
/// and independently of the line items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct Discounts {
    pub year1: Decimal,
    pub year2: Decimal,
    pub year3: Decimal,
}

impl Discounts {
    pub fn total(&self) -> Decimal {
        self.year1 + self.year2 + self.year3
    }
}
