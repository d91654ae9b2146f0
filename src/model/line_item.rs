use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Product category of a line item.
///
/// Declaration order is the fixed display/export order, so the derived `Ord`
/// is the sort key for rendered tables.
#[derive(
    Debug, Clone, Copy, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    #[default]
    EnterpriseOnline,
    Additional,
    AdditionalOnPremise,
}

serde_plain::derive_display_from_serialize!(Category);
serde_plain::derive_fromstr_from_deserialize!(Category);

impl Category {
    /// Full heading as it appears on the costing sheet.
    pub fn label(&self) -> &'static str {
        match self {
            Category::EnterpriseOnline => "Enterprise Online Products",
            Category::Additional => "Additional Products",
            Category::AdditionalOnPremise => "Additional Products - On Premise",
        }
    }

    /// Short form for table cells.
    pub fn short_label(&self) -> &'static str {
        match self {
            Category::EnterpriseOnline => "Enterprise Online",
            Category::Additional => "Additional",
            Category::AdditionalOnPremise => "On Premise",
        }
    }
}

/// One priced product row as entered (or pasted) by the user.
///
/// All percentage fields are fractions (0.20 means 20%). `unit_type` is the
/// billing-period multiplier, 12 for a monthly-billed annual subscription.
/// `swo_gp_pct` is the gross-profit split fraction used for the Africa
/// partner split; it defaults to an even 0.5 split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct LineItem {
    /// Unique within the year's line-item list.
    pub id: u64,
    pub part_number: String,
    pub item_name: String,
    pub category: Category,
    /// Vendor net (cost) unit price in USD.
    pub unit_net_usd: Decimal,
    /// Vendor estimated retail unit price in USD.
    pub unit_erp_usd: Decimal,
    pub ms_discount_pct: Decimal,
    pub crayon_markup_pct: Decimal,
    pub unit_type: u32,
    pub quantity: u32,
    pub rebate_pct: Decimal,
    pub swo_gp_pct: Decimal,
}

impl Default for LineItem {
    fn default() -> Self {
        Self {
            id: 0,
            part_number: String::new(),
            item_name: String::new(),
            category: Category::EnterpriseOnline,
            unit_net_usd: Decimal::ZERO,
            unit_erp_usd: Decimal::ZERO,
            ms_discount_pct: Decimal::ZERO,
            crayon_markup_pct: Decimal::ZERO,
            unit_type: 12,
            quantity: 0,
            rebate_pct: Decimal::ZERO,
            swo_gp_pct: Decimal::new(5, 1), // 0.5, even split
        }
    }
}

impl LineItem {
    /// A row with neither part number nor item name is a placeholder and is
    /// skipped by rendered tables and exports.
    pub fn is_blank(&self) -> bool {
        self.part_number.is_empty() && self.item_name.is_empty()
    }
}

/// A line item together with every figure derived from it.
///
/// Derived fields are a pure function of (`LineItem`, exchange rate, deal
/// type); they are recomputed on every access and never persisted. All
/// monetary figures are already rounded to 2 decimal places by the cascade
/// in [`crate::calc::calculate_line_item`]; the two markup fractions are
/// left unrounded since they are display-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CalculatedLineItem {
    #[serde(flatten)]
    pub item: LineItem,
    pub discounted_net: Decimal,
    pub discounted_erp: Decimal,
    pub total_net: Decimal,
    pub total_erp: Decimal,
    pub default_markup: Decimal,
    pub eup_unit: Decimal,
    pub total_eup: Decimal,
    pub calculated_markup: Decimal,
    pub rebate_amount: Decimal,
    pub gp: Decimal,
    pub swo_gp: Decimal,
    pub partner_gp: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_category_serialized_form() {
        assert_eq!(Category::AdditionalOnPremise.to_string(), "ADDITIONAL_ON_PREMISE");
        assert_eq!(
            "ENTERPRISE_ONLINE".parse::<Category>().unwrap(),
            Category::EnterpriseOnline
        );
    }

    #[test]
    fn test_category_sort_order() {
        let mut cats = vec![
            Category::AdditionalOnPremise,
            Category::EnterpriseOnline,
            Category::Additional,
        ];
        cats.sort();
        assert_eq!(
            cats,
            vec![
                Category::EnterpriseOnline,
                Category::Additional,
                Category::AdditionalOnPremise,
            ]
        );
    }

    #[test]
    fn test_line_item_defaults() {
        let item = LineItem::default();
        assert_eq!(item.unit_type, 12);
        assert_eq!(item.swo_gp_pct, Decimal::from_str("0.5").unwrap());
        assert!(item.is_blank());
    }

    #[test]
    fn test_line_item_deserializes_with_missing_fields() {
        let item: LineItem =
            serde_json::from_str(r#"{"id": 3, "part_number": "AAA-28605"}"#).unwrap();
        assert_eq!(item.id, 3);
        assert_eq!(item.unit_type, 12);
        assert!(!item.is_blank());
    }
}
