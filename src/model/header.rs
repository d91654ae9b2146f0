use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Sales region of the deal. The region drives whether gross profit is split
/// with a local partner (Africa) or kept whole (Middle East).
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum Region {
    /// Middle East.
    #[default]
    #[serde(rename = "ME")]
    Me,
    /// Africa.
    #[serde(rename = "AF")]
    Af,
}

serde_plain::derive_display_from_serialize!(Region);
serde_plain::derive_fromstr_from_deserialize!(Region);

/// Shape of the multi-year deal.
///
/// A `Normal` deal is flat: Year 1 line items are replicated across all three
/// years. A `Ramped` deal carries an independent line-item list per year, and
/// the end-user price uses a margin-on-price divisor instead of a markup
/// multiplier.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum DealType {
    #[default]
    Normal,
    Ramped,
}

impl DealType {
    pub fn is_ramped(self) -> bool {
        self == DealType::Ramped
    }
}

serde_plain::derive_display_from_serialize!(DealType);
serde_plain::derive_fromstr_from_deserialize!(DealType);

/// Deal-level parameters entered once per costing sheet.
///
/// Customer identity fields are free text with no invariants. The rates and
/// bond percentages are fractions (0.05 means 5%). `tender_cost` is an
/// absolute amount charged once against Year 1. The `other_lsp_rebate_*` and
/// `cif_*` values are display/export-only and are never folded into the
/// gross-profit totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct HeaderConfig {
    pub customer_name: String,
    pub opportunity_id: String,
    pub region: Region,
    pub currency_code: String,
    pub exchange_rate: Decimal,
    pub account_manager: String,
    pub agreement_type: String,
    pub vat_rate: Decimal,
    pub sales_location: String,
    pub new_or_renewal: String,
    pub agreement_level_system: String,
    pub agreement_level_server: String,
    pub agreement_level_application: String,
    pub bid_bond_pct: Decimal,
    pub bank_charges_pct: Decimal,
    pub performance_bond_pct: Decimal,
    pub performance_bank_charges_pct: Decimal,
    pub tender_cost: Decimal,
    pub other_lsp_rebate_y1: Decimal,
    pub other_lsp_rebate_y2: Decimal,
    pub other_lsp_rebate_y3: Decimal,
    pub cif_m365_e5: Decimal,
    pub cif_m365_e3: Decimal,
    pub cif_azure: Decimal,
    pub cif_dynamics365: Decimal,
    pub partner_name: String,
    pub deal_type: DealType,
    pub erp_customer_id: String,
    pub customer_segment: String,
    pub business_area: String,
    pub producer_name: String,
    pub account_manager_id: String,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            customer_name: String::new(),
            opportunity_id: String::new(),
            region: Region::Me,
            currency_code: "AED".to_string(),
            exchange_rate: Decimal::new(36725, 4), // 3.6725, USD -> AED peg
            account_manager: String::new(),
            agreement_type: "Enterprise Enrollment".to_string(),
            vat_rate: Decimal::new(5, 2),
            sales_location: "UAE".to_string(),
            new_or_renewal: "Renewal".to_string(),
            agreement_level_system: "D".to_string(),
            agreement_level_server: "D".to_string(),
            agreement_level_application: "D".to_string(),
            bid_bond_pct: Decimal::ZERO,
            bank_charges_pct: Decimal::new(3, 2),
            performance_bond_pct: Decimal::ZERO,
            performance_bank_charges_pct: Decimal::new(1, 2),
            tender_cost: Decimal::ZERO,
            other_lsp_rebate_y1: Decimal::ZERO,
            other_lsp_rebate_y2: Decimal::ZERO,
            other_lsp_rebate_y3: Decimal::ZERO,
            cif_m365_e5: Decimal::ZERO,
            cif_m365_e3: Decimal::ZERO,
            cif_azure: Decimal::ZERO,
            cif_dynamics365: Decimal::ZERO,
            partner_name: String::new(),
            deal_type: DealType::Normal,
            erp_customer_id: String::new(),
            customer_segment: String::new(),
            business_area: String::new(),
            producer_name: String::new(),
            account_manager_id: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_round_trip() {
        assert_eq!(Region::Me.to_string(), "ME");
        assert_eq!("AF".parse::<Region>().unwrap(), Region::Af);
    }

    #[test]
    fn test_deal_type_round_trip() {
        assert_eq!(DealType::Ramped.to_string(), "Ramped");
        assert_eq!("Normal".parse::<DealType>().unwrap(), DealType::Normal);
    }

    #[test]
    fn test_header_deserializes_with_missing_fields() {
        let header: HeaderConfig = serde_json::from_str(r#"{"customer_name":"Acme"}"#).unwrap();
        assert_eq!(header.customer_name, "Acme");
        assert_eq!(header.deal_type, DealType::Normal);
        assert_eq!(header.exchange_rate.to_string(), "3.6725");
    }
}
