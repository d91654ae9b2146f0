//! The costing sheet document.
//!
//! A [`CostingSheet`] is the unit of persistence: one JSON file per deal,
//! holding the header configuration, three line-item lists (one per deal
//! year) and the per-year funding discounts. Under a Normal deal only the
//! Year 1 list is live and the other two are carried along untouched; every
//! year accessor resolves through [`CostingSheet::live_year`] so that rule
//! sits in exactly one place.

use crate::model::{
    CalculatedLineItem, Category, Discounts, HeaderConfig, LineItem, Summary,
};
use crate::paste::{self, PasteOutcome};
use crate::{calc, utils, Result};
use anyhow::bail;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A deal year. Used to address one of the three line-item lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Year {
    One,
    Two,
    Three,
}

impl TryFrom<u8> for Year {
    type Error = crate::Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(Year::One),
            2 => Ok(Year::Two),
            3 => Ok(Year::Three),
            other => bail!("Invalid year {other}, expected 1, 2 or 3"),
        }
    }
}

impl std::fmt::Display for Year {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let n = match self {
            Year::One => 1,
            Year::Two => 2,
            Year::Three => 3,
        };
        write!(f, "{n}")
    }
}

/// One deal's costing sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct CostingSheet {
    sheet_id: String,
    header: HeaderConfig,
    line_items: Vec<LineItem>,
    line_items_y2: Vec<LineItem>,
    line_items_y3: Vec<LineItem>,
    discounts: Discounts,
}

impl Default for CostingSheet {
    fn default() -> Self {
        Self::new()
    }
}

fn blank_list() -> Vec<LineItem> {
    vec![LineItem {
        id: 1,
        ..LineItem::default()
    }]
}

fn generate_sheet_id() -> String {
    let year = chrono::Utc::now().format("%Y");
    let uuid = uuid::Uuid::new_v4().simple().to_string();
    format!("CS-{year}-{}", &uuid[..8])
}

impl CostingSheet {
    /// A fresh sheet: default header, zero discounts, one blank row per year.
    pub fn new() -> Self {
        Self {
            sheet_id: generate_sheet_id(),
            header: HeaderConfig::default(),
            line_items: blank_list(),
            line_items_y2: blank_list(),
            line_items_y3: blank_list(),
            discounts: Discounts::default(),
        }
    }

    /// A pre-populated demonstration deal, handy for trying the tool out.
    pub fn sample() -> Self {
        fn dec(s: &str) -> rust_decimal::Decimal {
            s.parse().unwrap_or_default()
        }
        let row = |id: u64, part: &str, name: &str, net: &str, erp: &str, qty: u32| LineItem {
            id,
            part_number: part.to_string(),
            item_name: name.to_string(),
            category: Category::EnterpriseOnline,
            unit_net_usd: dec(net),
            unit_erp_usd: dec(erp),
            ms_discount_pct: dec("0.20"),
            crayon_markup_pct: dec("0.015"),
            quantity: qty,
            rebate_pct: dec("0.0325"),
            ..LineItem::default()
        };
        let items = vec![
            row(
                1,
                "AAA-28605",
                "M365 E5 Original Existing Customer Sub Per User",
                "50.54",
                "52.2",
                33,
            ),
            row(
                2,
                "AAD-33177",
                "M365 E5 Unified FSA Renewal Sub Per User",
                "45.86",
                "47.3",
                2018,
            ),
            LineItem {
                id: 3,
                ..LineItem::default()
            },
        ];
        let header = HeaderConfig {
            customer_name: "Etihad Water and Electricity (EtihadWE)".to_string(),
            opportunity_id: "OPP-2025-ME-001".to_string(),
            account_manager: "Mohammed Areff".to_string(),
            cif_m365_e5: dec("3321665.88"),
            ..HeaderConfig::default()
        };
        Self {
            sheet_id: generate_sheet_id(),
            header,
            line_items: items,
            line_items_y2: blank_list(),
            line_items_y3: blank_list(),
            discounts: Discounts {
                year1: dec("18362.50"),
                year2: dec("14690.00"),
                year3: dec("11017.50"),
            },
        }
    }

    pub fn sheet_id(&self) -> &str {
        &self.sheet_id
    }

    pub fn header(&self) -> &HeaderConfig {
        &self.header
    }

    pub fn header_mut(&mut self) -> &mut HeaderConfig {
        &mut self.header
    }

    pub fn discounts(&self) -> &Discounts {
        &self.discounts
    }

    pub fn discounts_mut(&mut self) -> &mut Discounts {
        &mut self.discounts
    }

    /// Under a Normal deal every year resolves to the Year 1 list.
    fn live_year(&self, year: Year) -> Year {
        if self.header.deal_type.is_ramped() {
            year
        } else {
            Year::One
        }
    }

    pub fn items(&self, year: Year) -> &[LineItem] {
        match self.live_year(year) {
            Year::One => &self.line_items,
            Year::Two => &self.line_items_y2,
            Year::Three => &self.line_items_y3,
        }
    }

    fn items_mut(&mut self, year: Year) -> &mut Vec<LineItem> {
        match self.live_year(year) {
            Year::One => &mut self.line_items,
            Year::Two => &mut self.line_items_y2,
            Year::Three => &mut self.line_items_y3,
        }
    }

    fn next_id(items: &[LineItem]) -> u64 {
        items.iter().map(|i| i.id).max().unwrap_or(0) + 1
    }

    /// Appends a blank row and returns its id.
    pub fn add_item(&mut self, year: Year) -> u64 {
        let items = self.items_mut(year);
        let id = Self::next_id(items);
        items.push(LineItem {
            id,
            ..LineItem::default()
        });
        id
    }

    pub fn remove_item(&mut self, year: Year, id: u64) -> Result<()> {
        let items = self.items_mut(year);
        let before = items.len();
        items.retain(|i| i.id != id);
        if items.len() == before {
            bail!("No line item with id {id} in year {year}");
        }
        Ok(())
    }

    /// Replaces the target year's list with a copy of Year 1. Ids are
    /// reassigned positionally so the copy is self-contained.
    pub fn copy_year1_to(&mut self, year: Year) -> Result<()> {
        if !self.header.deal_type.is_ramped() {
            bail!("Copying years only applies to Ramped deals");
        }
        if year == Year::One {
            bail!("Cannot copy Year 1 onto itself");
        }
        let copied: Vec<LineItem> = self
            .line_items
            .iter()
            .enumerate()
            .map(|(idx, item)| LineItem {
                id: idx as u64 + 1,
                ..item.clone()
            })
            .collect();
        *self.items_mut(year) = copied;
        Ok(())
    }

    /// Imports pasted spreadsheet text at the row identified by `target_id`.
    ///
    /// Text without a tab character is not spreadsheet data and is ignored.
    /// A single parsed row overwrites the target row in place, keeping its
    /// id; multiple rows replace the target row, the first inheriting its id
    /// and the rest taking fresh ids. Returns the number of imported rows.
    pub fn paste(&mut self, year: Year, target_id: u64, text: &str) -> Result<usize> {
        if !text.contains('\t') {
            return Ok(0);
        }
        let items = self.items_mut(year);
        let Some(index) = items.iter().position(|i| i.id == target_id) else {
            bail!("No line item with id {target_id} in year {year}");
        };
        let initial_category = items[index].category;

        let mut new_items = Vec::new();
        let mut max_id = items.iter().map(|i| i.id).max().unwrap_or(0);
        for outcome in paste::parse_paste(text, initial_category) {
            if let PasteOutcome::Item(mut item) = outcome {
                max_id += 1;
                item.id = max_id;
                new_items.push(item);
            }
        }
        if new_items.is_empty() {
            return Ok(0);
        }

        let count = new_items.len();
        new_items[0].id = target_id;
        items.splice(index..=index, new_items);
        Ok(count)
    }

    /// Per-line calculated figures for a year, in entry order.
    pub fn calculated(&self, year: Year) -> Vec<CalculatedLineItem> {
        self.items(year)
            .iter()
            .map(|item| calc::calculate_line_item(item, self.header.exchange_rate, self.header.deal_type))
            .collect()
    }

    /// Like [`CostingSheet::calculated`], grouped by category for display.
    pub fn sorted_calculated(&self, year: Year) -> Vec<CalculatedLineItem> {
        calc::sorted_by_category(self.calculated(year))
    }

    /// The full multi-year summary and reconciliation.
    pub fn summary(&self) -> Summary {
        calc::summarize(
            &self.calculated(Year::One),
            &self.calculated(Year::Two),
            &self.calculated(Year::Three),
            &self.discounts,
            &self.header,
        )
    }

    pub async fn load(path: &Path) -> Result<Self> {
        utils::deserialize(path).await
    }

    pub async fn save(&self, path: &Path) -> Result<()> {
        let data = serde_json::to_string_pretty(self)?;
        utils::write(path, data).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DealType;

    const PASTE_TWO_ROWS: &str =
        "AAA-28605\tFirst Item\t50.54\t52.20\nAAD-33177\tSecond Item\t45.86\t47.30";

    #[test]
    fn test_new_sheet_has_one_blank_row_per_year() {
        let sheet = CostingSheet::new();
        assert_eq!(sheet.items(Year::One).len(), 1);
        assert!(sheet.items(Year::One)[0].is_blank());
        assert!(sheet.sheet_id().starts_with("CS-"));
    }

    #[test]
    fn test_normal_deal_resolves_every_year_to_year_one() {
        let mut sheet = CostingSheet::new();
        let id = sheet.add_item(Year::Two);
        // deal_type is Normal, so the row landed in the Year 1 list.
        assert!(sheet.items(Year::One).iter().any(|i| i.id == id));
        assert_eq!(sheet.items(Year::Three).len(), 2);
    }

    #[test]
    fn test_ramped_years_are_independent() {
        let mut sheet = CostingSheet::new();
        sheet.header_mut().deal_type = DealType::Ramped;
        sheet.add_item(Year::Two);
        assert_eq!(sheet.items(Year::One).len(), 1);
        assert_eq!(sheet.items(Year::Two).len(), 2);
    }

    #[test]
    fn test_add_item_ids_do_not_collide_after_removal() {
        let mut sheet = CostingSheet::new();
        let a = sheet.add_item(Year::One); // 2
        let b = sheet.add_item(Year::One); // 3
        sheet.remove_item(Year::One, a).unwrap();
        let c = sheet.add_item(Year::One);
        assert!(c > b);
    }

    #[test]
    fn test_remove_missing_item_fails() {
        let mut sheet = CostingSheet::new();
        assert!(sheet.remove_item(Year::One, 999).is_err());
    }

    #[test]
    fn test_paste_without_tab_is_a_no_op() {
        let mut sheet = CostingSheet::new();
        let count = sheet.paste(Year::One, 1, "just some text").unwrap();
        assert_eq!(count, 0);
        assert!(sheet.items(Year::One)[0].is_blank());
    }

    #[test]
    fn test_paste_single_row_overwrites_target_keeping_id() {
        let mut sheet = CostingSheet::new();
        let count = sheet
            .paste(Year::One, 1, "AAA-28605\tOnly Item\t50.54\t52.20")
            .unwrap();
        assert_eq!(count, 1);
        let items = sheet.items(Year::One);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, 1);
        assert_eq!(items[0].part_number, "AAA-28605");
    }

    #[test]
    fn test_paste_multiple_rows_splices_at_target() {
        let mut sheet = CostingSheet::new();
        sheet.add_item(Year::One); // id 2
        sheet.add_item(Year::One); // id 3
        let count = sheet.paste(Year::One, 2, PASTE_TWO_ROWS).unwrap();
        assert_eq!(count, 2);
        let items = sheet.items(Year::One);
        assert_eq!(items.len(), 4);
        // First pasted row inherits the target id, the second a fresh one.
        assert_eq!(items[1].id, 2);
        assert_eq!(items[1].part_number, "AAA-28605");
        assert_eq!(items[2].part_number, "AAD-33177");
        assert!(items[2].id > 3);
        assert_eq!(items[3].id, 3);
    }

    #[test]
    fn test_paste_inherits_target_row_category() {
        let mut sheet = CostingSheet::new();
        sheet.items_mut(Year::One)[0].category = Category::AdditionalOnPremise;
        sheet
            .paste(Year::One, 1, "AAA-28605\tItem\t1\t2")
            .unwrap();
        assert_eq!(
            sheet.items(Year::One)[0].category,
            Category::AdditionalOnPremise
        );
    }

    #[test]
    fn test_paste_missing_target_fails() {
        let mut sheet = CostingSheet::new();
        assert!(sheet.paste(Year::One, 42, "AAA-28605\tItem").is_err());
    }

    #[test]
    fn test_copy_year1_reassigns_ids() {
        let mut sheet = CostingSheet::sample();
        sheet.header_mut().deal_type = DealType::Ramped;
        sheet.copy_year1_to(Year::Three).unwrap();
        let y3 = sheet.items(Year::Three);
        assert_eq!(y3.len(), 3);
        assert_eq!(y3[0].id, 1);
        assert_eq!(y3[1].id, 2);
        assert_eq!(y3[0].part_number, "AAA-28605");
        // Year 2 untouched.
        assert_eq!(sheet.items(Year::Two).len(), 1);
    }

    #[test]
    fn test_copy_year1_rejected_for_normal_deal() {
        let mut sheet = CostingSheet::sample();
        assert!(sheet.copy_year1_to(Year::Two).is_err());
    }

    #[test]
    fn test_sample_summary_is_consistent() {
        let sheet = CostingSheet::sample();
        let summary = sheet.summary();
        assert!(summary.net.y1 > rust_decimal::Decimal::ZERO);
        assert_eq!(summary.net.y1, summary.net.y2);
        assert_eq!(
            summary.eup_after_discount.y1,
            summary.eup.y1 - sheet.discounts().year1
        );
    }
}
