//! The clipboard import parser.
//!
//! Sales staff populate the costing sheet by copy-pasting blocks of rows out
//! of a spreadsheet application, so the input is tab-and-newline-delimited
//! plain text with no reliable schema: long item-name cells sometimes wrap
//! onto extra physical lines, category headings appear between product rows,
//! and stray header or blank rows show up everywhere. The parser is
//! best-effort by contract: anything it cannot recognize is silently dropped,
//! never an error.
//!
//! The category in scope while parsing is threaded through as a fold
//! accumulator, which keeps [`parse_paste`] a pure function of
//! (text, initial category).

use crate::model::{amount, Category, LineItem};
use regex::Regex;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::sync::OnceLock;

// Fixed column positions of a product row as copied from the sheet.
const COL_PART_NUMBER: usize = 0;
const COL_ITEM_NAME: usize = 1;
const COL_UNIT_NET_USD: usize = 2;
const COL_UNIT_ERP_USD: usize = 3;
const COL_MS_DISCOUNT: usize = 5;
const COL_CRAYON_MARKUP: usize = 6;
const COL_UNIT_TYPE: usize = 7;
const COL_QUANTITY: usize = 12;
const COL_REBATE: usize = 16;
const COL_SWO_GP: usize = 19;

const DEFAULT_UNIT_TYPE: u32 = 12;

fn part_number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^[A-Z0-9]{2,}-[A-Z0-9]+$").expect("part number pattern is valid")
    })
}

/// True if the cell looks like a vendor part number, e.g. `AAA-28605`.
pub fn looks_like_part_number(cell: &str) -> bool {
    part_number_re().is_match(cell.trim())
}

/// Detects a category heading anywhere in `text`.
///
/// Ordered guards, not a grammar: "on premise" wins over "additional
/// products", which wins over "enterprise online", when several keywords
/// co-occur ("Additional Products - On Premise" must land on premise).
pub fn detect_category(text: &str) -> Option<Category> {
    let lower = text.to_lowercase();
    if lower.contains("on premise") || lower.contains("on-premise") {
        Some(Category::AdditionalOnPremise)
    } else if lower.contains("additional products") {
        Some(Category::Additional)
    } else if lower.contains("enterprise online") {
        Some(Category::EnterpriseOnline)
    } else {
        None
    }
}

fn is_category_heading(line: &str) -> bool {
    detect_category(line).is_some()
}

/// Rebuilds logical rows from the pasted text.
///
/// A physical line starts a new logical row when its first tab-cell looks
/// like a part number, or when that cell is empty and the line reads as a
/// category heading. Any other non-blank line is a continuation of the
/// previous row (a wrapped item-name cell) and is appended with a joining
/// space.
pub fn reconstruct_rows(text: &str) -> Vec<String> {
    let mut rows = Vec::new();
    let mut current: Option<String> = None;

    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let first_cell = line.split('\t').next().unwrap_or("").trim();
        let starts_new_row =
            looks_like_part_number(first_cell) || (first_cell.is_empty() && is_category_heading(line));

        if starts_new_row {
            if let Some(row) = current.take() {
                rows.push(row);
            }
            current = Some(line.to_string());
        } else if let Some(row) = current.as_mut() {
            row.push(' ');
            row.push_str(line);
        } else {
            current = Some(line.to_string());
        }
    }
    if let Some(row) = current {
        rows.push(row);
    }
    rows
}

/// One outcome of parsing a logical row.
#[derive(Debug, Clone, PartialEq)]
pub enum PasteOutcome {
    /// The row was a category heading; subsequent product rows belong to it.
    CategoryChange(Category),
    /// A structured product row. `id` is 0; the caller assigns identifiers
    /// when splicing into its list.
    Item(LineItem),
}

/// Strips surrounding quote characters and collapses internal whitespace,
/// which undoes what the spreadsheet does to long text cells on copy.
pub fn clean_item_name(raw: &str) -> String {
    let trimmed = raw.trim();
    let stripped = trimmed.strip_prefix(['"', '\'']).unwrap_or(trimmed);
    let stripped = stripped.strip_suffix(['"', '\'']).unwrap_or(stripped);
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Classifies one reconstructed row.
///
/// A row is a category change when the joined cell text contains a category
/// keyword and the keyword plausibly sits in the leading cells (first cell
/// blank, or either of the first two cells reads as a heading on its own) —
/// this keeps a product whose *name* mentions "on premise" from being taken
/// for a heading. Otherwise the row is a product row only if its first cell
/// looks like a part number; anything else is dropped.
pub fn parse_row(row: &str, current_category: Category) -> Option<PasteOutcome> {
    let cells: Vec<&str> = row.split('\t').collect();

    let joined = cells.join(" ");
    if let Some(detected) = detect_category(&joined) {
        let first_blank = cells.first().is_none_or(|c| c.trim().is_empty());
        let first_is_heading = cells.first().is_some_and(|c| is_category_heading(c));
        let second_is_heading = cells.get(1).is_some_and(|c| is_category_heading(c));
        if first_blank || first_is_heading || second_is_heading {
            return Some(PasteOutcome::CategoryChange(detected));
        }
    }

    let part_number = cells.first().map(|c| c.trim()).unwrap_or("");
    if !looks_like_part_number(part_number) {
        return None;
    }

    let cell = |ix: usize| cells.get(ix).copied().unwrap_or("");
    let unit_type = match amount::parse_number(cell(COL_UNIT_TYPE)).trunc().to_u32() {
        Some(n) if n > 0 => n,
        _ => DEFAULT_UNIT_TYPE,
    };
    let quantity = amount::parse_number(cell(COL_QUANTITY))
        .trunc()
        .to_u32()
        .unwrap_or(0);
    // 0.5 stands for an even regional profit split and applies only when the
    // column is missing or blank; an explicitly pasted 0 must survive.
    let swo_gp_pct = match cells.get(COL_SWO_GP) {
        Some(c) if !c.trim().is_empty() => amount::parse_percent(c),
        _ => Decimal::new(5, 1),
    };

    Some(PasteOutcome::Item(LineItem {
        id: 0,
        part_number: part_number.to_string(),
        item_name: clean_item_name(cell(COL_ITEM_NAME)),
        category: current_category,
        unit_net_usd: amount::parse_number(cell(COL_UNIT_NET_USD)),
        unit_erp_usd: amount::parse_number(cell(COL_UNIT_ERP_USD)),
        ms_discount_pct: amount::parse_percent(cell(COL_MS_DISCOUNT)),
        crayon_markup_pct: amount::parse_percent(cell(COL_CRAYON_MARKUP)),
        unit_type,
        quantity,
        rebate_pct: amount::parse_percent(cell(COL_REBATE)),
        swo_gp_pct,
    }))
}

/// Parses a whole paste into an ordered sequence of outcomes.
///
/// Category changes update the category that later product rows inherit.
/// Unrecognizable rows are dropped without note.
pub fn parse_paste(text: &str, initial_category: Category) -> Vec<PasteOutcome> {
    let mut outcomes = Vec::new();
    let mut category = initial_category;
    for row in reconstruct_rows(text) {
        match parse_row(&row, category) {
            Some(PasteOutcome::CategoryChange(detected)) => {
                category = detected;
                outcomes.push(PasteOutcome::CategoryChange(detected));
            }
            Some(outcome) => outcomes.push(outcome),
            None => {}
        }
    }
    outcomes
}

/// Convenience view over [`parse_paste`]: just the product rows, categories
/// already applied.
pub fn parse_paste_items(text: &str, initial_category: Category) -> Vec<LineItem> {
    parse_paste(text, initial_category)
        .into_iter()
        .filter_map(|outcome| match outcome {
            PasteOutcome::Item(item) => Some(item),
            PasteOutcome::CategoryChange(_) => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    // A realistic product row: 20 columns as copied from the costing sheet.
    const FULL_ROW: &str = "AAA-28605\tM365 E5 Original Existing Customer Sub Per User\t50.54\t52.20\t\t20%\t1.5%\t12\t\t\t\t\t33\t\t\t\t3.25%\t\t\t50%";

    #[test]
    fn test_part_number_shapes() {
        assert!(looks_like_part_number("AAA-28605"));
        assert!(looks_like_part_number("aad-33177"));
        assert!(looks_like_part_number(" 9EA-00278 "));
        assert!(!looks_like_part_number("A-28605")); // needs 2+ leading chars
        assert!(!looks_like_part_number("AAA28605")); // needs a hyphen
        assert!(!looks_like_part_number("AAA-286 05"));
        assert!(!looks_like_part_number(""));
    }

    #[test]
    fn test_detect_category_priority() {
        assert_eq!(
            detect_category("Additional Products - On Premise"),
            Some(Category::AdditionalOnPremise)
        );
        assert_eq!(detect_category("additional products"), Some(Category::Additional));
        assert_eq!(
            detect_category("Enterprise Online Products"),
            Some(Category::EnterpriseOnline)
        );
        assert_eq!(detect_category("on-premise servers"), Some(Category::AdditionalOnPremise));
        assert_eq!(detect_category("Core Infrastructure"), None);
    }

    #[test]
    fn test_clean_item_name() {
        assert_eq!(clean_item_name("\"M365 E5\""), "M365 E5");
        assert_eq!(clean_item_name("'quoted'"), "quoted");
        assert_eq!(clean_item_name("  spread   out\ttext  "), "spread out text");
    }

    #[test]
    fn test_reconstruct_keeps_simple_rows() {
        let text = "AAA-28605\tItem One\t1\nAAD-33177\tItem Two\t2\n";
        assert_eq!(
            reconstruct_rows(text),
            vec!["AAA-28605\tItem One\t1", "AAD-33177\tItem Two\t2"]
        );
    }

    #[test]
    fn test_reconstruct_joins_wrapped_item_name() {
        // The second physical line has no tabs: it is the tail of a wrapped
        // item-name cell and must be glued back with a single space.
        let text = "AAA-28605\tM365 E5 Original Existing\nCustomer Sub Per User\t50.54";
        assert_eq!(
            reconstruct_rows(text),
            vec!["AAA-28605\tM365 E5 Original Existing Customer Sub Per User\t50.54"]
        );
    }

    #[test]
    fn test_reconstruct_category_heading_with_blank_first_cell() {
        let text = "\tAdditional Products\nAAA-28605\tItem\t1";
        let rows = reconstruct_rows(text);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], "\tAdditional Products");
    }

    #[test]
    fn test_parse_row_extracts_fields() {
        let outcome = parse_row(FULL_ROW, Category::EnterpriseOnline).unwrap();
        let PasteOutcome::Item(item) = outcome else {
            panic!("expected a product row");
        };
        assert_eq!(item.part_number, "AAA-28605");
        assert_eq!(item.item_name, "M365 E5 Original Existing Customer Sub Per User");
        assert_eq!(item.unit_net_usd, dec("50.54"));
        assert_eq!(item.unit_erp_usd, dec("52.20"));
        assert_eq!(item.ms_discount_pct, dec("0.2"));
        assert_eq!(item.crayon_markup_pct, dec("0.015"));
        assert_eq!(item.unit_type, 12);
        assert_eq!(item.quantity, 33);
        assert_eq!(item.rebate_pct, dec("0.0325"));
        assert_eq!(item.swo_gp_pct, dec("0.5"));
        assert_eq!(item.category, Category::EnterpriseOnline);
    }

    #[test]
    fn test_parse_row_defaults() {
        // Bare row: only part number and name. Numerics default to zero,
        // unit type to 12, the GP split to the even 0.5.
        let outcome = parse_row("AAA-28605\tSomething", Category::Additional).unwrap();
        let PasteOutcome::Item(item) = outcome else {
            panic!("expected a product row");
        };
        assert_eq!(item.unit_net_usd, Decimal::ZERO);
        assert_eq!(item.unit_type, 12);
        assert_eq!(item.quantity, 0);
        assert_eq!(item.swo_gp_pct, dec("0.5"));
        assert_eq!(item.category, Category::Additional);
    }

    #[test]
    fn test_parse_row_explicit_zero_swo_gp_survives() {
        let mut cells = vec![""; 20];
        cells[0] = "AAA-28605";
        cells[1] = "Item";
        cells[19] = "0";
        let row = cells.join("\t");
        let PasteOutcome::Item(item) = parse_row(&row, Category::EnterpriseOnline).unwrap() else {
            panic!("expected a product row");
        };
        assert_eq!(item.swo_gp_pct, Decimal::ZERO);
    }

    #[test]
    fn test_parse_row_blank_swo_gp_defaults() {
        let mut cells = vec![""; 20];
        cells[0] = "AAA-28605";
        cells[1] = "Item";
        cells[19] = "  ";
        let row = cells.join("\t");
        let PasteOutcome::Item(item) = parse_row(&row, Category::EnterpriseOnline).unwrap() else {
            panic!("expected a product row");
        };
        assert_eq!(item.swo_gp_pct, dec("0.5"));
    }

    #[test]
    fn test_parse_row_category_heading() {
        assert_eq!(
            parse_row("\tAdditional Products\t", Category::EnterpriseOnline),
            Some(PasteOutcome::CategoryChange(Category::Additional))
        );
        assert_eq!(
            parse_row("Enterprise Online Products", Category::Additional),
            Some(PasteOutcome::CategoryChange(Category::EnterpriseOnline))
        );
    }

    #[test]
    fn test_parse_row_keyword_in_name_cell_reads_as_heading() {
        // Known quirk carried from the sheets this parses: a product whose
        // item-name cell itself contains a category keyword satisfies the
        // second-cell guard and is taken for a heading.
        let row = "AAA-28605\tExchange Server On Premise CAL\t10\t12";
        assert_eq!(
            parse_row(row, Category::Additional),
            Some(PasteOutcome::CategoryChange(Category::AdditionalOnPremise))
        );
    }

    #[test]
    fn test_parse_row_keyword_spanning_cells_stays_a_product() {
        // The keyword only appears once the cells are joined; no single
        // leading cell reads as a heading, so the row stays a product row.
        let row = "AAA-28605\tExchange On\tPremise CAL\t12";
        let PasteOutcome::Item(item) = parse_row(row, Category::Additional).unwrap() else {
            panic!("expected a product row");
        };
        assert_eq!(item.part_number, "AAA-28605");
        assert_eq!(item.category, Category::Additional);
    }

    #[test]
    fn test_parse_row_drops_junk() {
        assert_eq!(parse_row("Part Number\tItem Name\tNet", Category::Additional), None);
        assert_eq!(parse_row("totals\t100\t200", Category::Additional), None);
        assert_eq!(parse_row("", Category::Additional), None);
    }

    #[test]
    fn test_parse_paste_single_row_inherits_scope_category() {
        let items = parse_paste_items(FULL_ROW, Category::AdditionalOnPremise);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].category, Category::AdditionalOnPremise);
    }

    #[test]
    fn test_parse_paste_category_switch_applies_to_following_rows() {
        let text = "AAA-28605\tFirst\t1\t2\n\tAdditional Products\nAAD-33177\tSecond\t3\t4\nAAE-00001\tThird\t5\t6";
        let outcomes = parse_paste(text, Category::EnterpriseOnline);
        assert_eq!(outcomes.len(), 4);
        assert_eq!(
            outcomes[1],
            PasteOutcome::CategoryChange(Category::Additional)
        );
        let items = parse_paste_items(text, Category::EnterpriseOnline);
        assert_eq!(items[0].category, Category::EnterpriseOnline);
        assert_eq!(items[1].category, Category::Additional);
        assert_eq!(items[2].category, Category::Additional);
    }

    #[test]
    fn test_parse_paste_heading_then_two_rows() {
        let text = "Additional Products\nAAA-28605\tOne\nAAD-33177\tTwo";
        let items = parse_paste_items(text, Category::EnterpriseOnline);
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.category == Category::Additional));
    }

    #[test]
    fn test_parse_paste_ignores_debris() {
        let text = "Part Number\tItem Name\n\n\nAAA-28605\tReal Item\t50.54\t52.20\nGrand Total\t\t99999";
        let items = parse_paste_items(text, Category::EnterpriseOnline);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].part_number, "AAA-28605");
    }
}
