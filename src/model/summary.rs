use crate::model::amount::round2;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One summary figure broken out per deal year plus the 3-year total.
///
/// Per-year values and the total are each rounded once, at the point they are
/// reported; the underlying accumulation is not rounded term by term. This is
/// deliberately asymmetric with the per-line cascade (which rounds every
/// intermediate) because it mirrors how a spreadsheet's report cells differ
/// from its per-row cell formulas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct YearFigures {
    pub y1: Decimal,
    pub y2: Decimal,
    pub y3: Decimal,
    pub total: Decimal,
}

impl YearFigures {
    /// Builds the figure set from unrounded per-year values, rounding each
    /// reported value and the 3-year total exactly once.
    pub(crate) fn reported(y1: Decimal, y2: Decimal, y3: Decimal) -> Self {
        Self {
            y1: round2(y1),
            y2: round2(y2),
            y3: round2(y3),
            total: round2(y1 + y2 + y3),
        }
    }
}

/// Deal-level cost reconciliation: bid bond, performance bond and tender
/// charges held against the gross profit.
///
/// The bid bond and tender cost are charged once, against Year 1 only; the
/// performance bond is charged identically in each of the three years.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CrayonCosts {
    pub bid_bond_cost: Decimal,
    pub performance_bond_cost_per_year: Decimal,
    pub tender_cost: Decimal,
    pub total: Decimal,
    /// GP + rebate per year after the charges above.
    pub net_profit: YearFigures,
    /// (GP + rebate − total cost) / 3-year net, as an unrounded fraction.
    pub overall_markup: Decimal,
}

/// Aggregate of the whole deal, derived from the calculated line-item lists,
/// the funding discounts and the header. Recomputed whenever any input
/// changes; no entity owns it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Summary {
    pub net: YearFigures,
    pub erp: YearFigures,
    pub eup: YearFigures,
    pub discount: YearFigures,
    pub eup_after_discount: YearFigures,
    /// 3-year EUP after discount with VAT applied, rounded.
    pub eup_after_discount_with_vat: Decimal,
    /// Sum of per-item gross profit (EUP − net before funding discounts).
    pub gp: YearFigures,
    pub swo_gp: YearFigures,
    pub partner_gp: YearFigures,
    /// Gross profit after funding discount, plus rebate.
    pub gp_with_rebate: YearFigures,
    pub rebate: YearFigures,
    /// 3-year GP + rebate over 3-year net, as an unrounded fraction.
    pub blended_margin: Decimal,
    pub crayon_costs: CrayonCosts,
}
