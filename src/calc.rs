//! The costing calculation engine.
//!
//! Pure functions only: one maps a line item plus deal context to its fully
//! derived figures, the other folds the per-year calculated lists into a deal
//! summary. Both reproduce a reference spreadsheet cell for cell, which means
//! every intermediate in the per-line cascade is rounded to 2 decimal places
//! and the *rounded* value is fed forward. Do not simplify the cascade
//! algebraically; the numbers stop reconciling if you do.

use crate::model::amount::round2;
use crate::model::{
    CalculatedLineItem, CrayonCosts, DealType, Discounts, HeaderConfig, LineItem, Region, Summary,
    YearFigures,
};
use rust_decimal::Decimal;

/// Net and retail unit prices within this tolerance are deemed identical,
/// meaning the product carries no markup structure at all.
fn markup_tolerance() -> Decimal {
    Decimal::new(1, 3) // 0.001
}

/// Derives every calculated figure for one line item.
///
/// Never fails and never panics on zero inputs: every division has a guard.
/// Malformed numeric inputs are the caller's problem; this function only
/// promises the cascade semantics below.
///
/// The cascade, with `r2` meaning "round to 2 dp, half away from zero":
///
/// 1. `discounted_net = r2(unit_net_usd * (1 - ms_discount_pct) * rate)`
/// 2. `discounted_erp = r2(unit_erp_usd * (1 - ms_discount_pct) * rate)`
/// 3. `total_net = r2(discounted_net * unit_type * quantity)` (rounded input!)
/// 4. `total_erp = r2(discounted_erp * unit_type * quantity)`
/// 5. `default_markup = (erp - net) / erp`, unrounded, display-only
/// 6. if net and ERP are identical within tolerance, the markup step is
///    bypassed entirely and `eup_unit = discounted_erp`
/// 7. otherwise, with a positive markup percentage:
///    Normal `eup_unit = r2(discounted_net * (1 + markup))`,
///    Ramped `eup_unit = r2(discounted_net / (1 - markup))`
/// 8. `total_eup = r2(eup_unit * quantity * unit_type)`
/// 9. `rebate_amount = r2(total_net * rebate_pct)`
/// 10. `gp = r2(total_eup - total_net)`
/// 11. `swo_gp = r2(gp * swo_gp_pct)`, `partner_gp = r2(gp - swo_gp)` — the
///     partner share is the remainder so the split always reconstructs `gp`
/// 12. `calculated_markup = (eup_unit - discounted_net) / discounted_net`,
///     unrounded, display-only
pub fn calculate_line_item(
    item: &LineItem,
    exchange_rate: Decimal,
    deal_type: DealType,
) -> CalculatedLineItem {
    let one = Decimal::ONE;
    let unit_type = Decimal::from(item.unit_type);
    let quantity = Decimal::from(item.quantity);

    let discounted_net = round2(item.unit_net_usd * (one - item.ms_discount_pct) * exchange_rate);
    let discounted_erp = round2(item.unit_erp_usd * (one - item.ms_discount_pct) * exchange_rate);

    let total_net = round2(discounted_net * unit_type * quantity);
    let total_erp = round2(discounted_erp * unit_type * quantity);

    let default_markup = if item.unit_erp_usd > Decimal::ZERO {
        (item.unit_erp_usd - item.unit_net_usd) / item.unit_erp_usd
    } else {
        Decimal::ZERO
    };

    let has_default_markup = (item.unit_erp_usd - item.unit_net_usd).abs() > markup_tolerance();

    let eup_unit = if has_default_markup && item.crayon_markup_pct > Decimal::ZERO {
        match deal_type {
            DealType::Normal => round2(discounted_net * (one + item.crayon_markup_pct)),
            // Margin-on-price divisor. A 100% markup would divide by zero;
            // such a row has no usable markup structure, so it takes the
            // same fallback as the no-markup branch.
            DealType::Ramped if item.crayon_markup_pct == one => discounted_erp,
            DealType::Ramped => round2(discounted_net / (one - item.crayon_markup_pct)),
        }
    } else {
        discounted_erp
    };

    let total_eup = round2(eup_unit * quantity * unit_type);
    let rebate_amount = round2(total_net * item.rebate_pct);

    let gp = round2(total_eup - total_net);
    let swo_gp = round2(gp * item.swo_gp_pct);
    let partner_gp = round2(gp - swo_gp);

    let calculated_markup = if discounted_net > Decimal::ZERO {
        (eup_unit - discounted_net) / discounted_net
    } else {
        Decimal::ZERO
    };

    CalculatedLineItem {
        item: item.clone(),
        discounted_net,
        discounted_erp,
        total_net,
        total_erp,
        default_markup,
        eup_unit,
        total_eup,
        calculated_markup,
        rebate_amount,
        gp,
        swo_gp,
        partner_gp,
    }
}

/// Sorts calculated rows into the fixed display order: Enterprise Online,
/// then Additional, then On Premise. The sort is stable so rows keep their
/// entry order within a category.
pub fn sorted_by_category(mut items: Vec<CalculatedLineItem>) -> Vec<CalculatedLineItem> {
    items.sort_by_key(|calc| calc.item.category);
    items
}

/// Per-year column sums of the already-rounded line-item figures.
#[derive(Debug, Clone, Copy, Default)]
struct YearAgg {
    net: Decimal,
    erp: Decimal,
    eup: Decimal,
    rebate: Decimal,
    gp: Decimal,
    swo_gp: Decimal,
    partner_gp: Decimal,
}

impl YearAgg {
    fn sum(items: &[CalculatedLineItem]) -> Self {
        let mut agg = YearAgg::default();
        for calc in items {
            agg.net += calc.total_net;
            agg.erp += calc.total_erp;
            agg.eup += calc.total_eup;
            agg.rebate += calc.rebate_amount;
            agg.gp += calc.gp;
            agg.swo_gp += calc.swo_gp;
            agg.partner_gp += calc.partner_gp;
        }
        agg
    }
}

/// Folds the three calculated year lists, the funding discounts and the
/// header into the deal [`Summary`].
///
/// Under a Normal deal the Year 2 and Year 3 net/ERP/EUP/GP figures are by
/// definition identical to Year 1's and rebate is recognized in Year 1 only.
/// Under a Ramped deal each year stands on its own list and discount.
///
/// Accumulation here is unrounded; each reported figure is rounded exactly
/// once (see [`YearFigures`]). The two margin fractions are left unrounded.
pub fn summarize(
    year1: &[CalculatedLineItem],
    year2: &[CalculatedLineItem],
    year3: &[CalculatedLineItem],
    discounts: &Discounts,
    header: &HeaderConfig,
) -> Summary {
    let y1 = YearAgg::sum(year1);
    let (y2, y3) = match header.deal_type {
        DealType::Ramped => (YearAgg::sum(year2), YearAgg::sum(year3)),
        DealType::Normal => {
            // Flat deal: replicate Year 1, but rebate is Year-1-only.
            let replicated = YearAgg {
                rebate: Decimal::ZERO,
                ..y1
            };
            (replicated, replicated)
        }
    };

    let (d1, d2, d3) = (discounts.year1, discounts.year2, discounts.year3);
    let (ed1, ed2, ed3) = (y1.eup - d1, y2.eup - d2, y3.eup - d3);
    let ed_total = ed1 + ed2 + ed3;

    // GP here is the profit after the funding discount, per year.
    let (gp1, gp2, gp3) = (ed1 - y1.net, ed2 - y2.net, ed3 - y3.net);
    let (gr1, gr2, gr3) = (gp1 + y1.rebate, gp2 + y2.rebate, gp3 + y3.rebate);

    let net_total = y1.net + y2.net + y3.net;
    let gr_total = gr1 + gr2 + gr3;

    let eup_after_discount_with_vat = round2(ed_total * (Decimal::ONE + header.vat_rate));
    let blended_margin = if net_total > Decimal::ZERO {
        gr_total / net_total
    } else {
        Decimal::ZERO
    };

    let summary = Summary {
        net: YearFigures::reported(y1.net, y2.net, y3.net),
        erp: YearFigures::reported(y1.erp, y2.erp, y3.erp),
        eup: YearFigures::reported(y1.eup, y2.eup, y3.eup),
        discount: YearFigures::reported(d1, d2, d3),
        eup_after_discount: YearFigures::reported(ed1, ed2, ed3),
        eup_after_discount_with_vat,
        gp: YearFigures::reported(y1.gp, y2.gp, y3.gp),
        swo_gp: YearFigures::reported(y1.swo_gp, y2.swo_gp, y3.swo_gp),
        partner_gp: YearFigures::reported(y1.partner_gp, y2.partner_gp, y3.partner_gp),
        gp_with_rebate: YearFigures::reported(gr1, gr2, gr3),
        rebate: YearFigures::reported(y1.rebate, y2.rebate, y3.rebate),
        blended_margin,
        crayon_costs: CrayonCosts::default(),
    };

    let crayon_costs = reconcile_crayon_costs(&summary, header);
    Summary {
        crayon_costs,
        ..summary
    }
}

/// Charges the bid bond, performance bond and tender costs against the GP +
/// rebate figures. The bid bond and tender cost hit Year 1 only; the
/// performance bond hits every year. In region AF the charged basis is the
/// SWO share of GP, elsewhere it is the full GP.
fn reconcile_crayon_costs(summary: &Summary, header: &HeaderConfig) -> CrayonCosts {
    let ed_vat = summary.eup_after_discount_with_vat;
    let bid_bond = ed_vat * header.bid_bond_pct * header.bank_charges_pct;
    let perf_bond_per_year =
        ed_vat * header.performance_bond_pct * header.performance_bank_charges_pct;
    let tender = header.tender_cost;
    let total = bid_bond + perf_bond_per_year * Decimal::from(3) + tender;

    let (base1, base2, base3) = match header.region {
        Region::Af => (
            summary.swo_gp.y1 + summary.rebate.y1,
            summary.swo_gp.y2 + summary.rebate.y2,
            summary.swo_gp.y3 + summary.rebate.y3,
        ),
        Region::Me => (
            summary.gp_with_rebate.y1,
            summary.gp_with_rebate.y2,
            summary.gp_with_rebate.y3,
        ),
    };

    let np1 = base1 - bid_bond - perf_bond_per_year - tender;
    let np2 = base2 - perf_bond_per_year;
    let np3 = base3 - perf_bond_per_year;
    let np_total = np1 + np2 + np3;

    let overall_markup = if summary.net.total > Decimal::ZERO {
        np_total / summary.net.total
    } else {
        Decimal::ZERO
    };

    CrayonCosts {
        bid_bond_cost: round2(bid_bond),
        performance_bond_cost_per_year: round2(perf_bond_per_year),
        tender_cost: tender,
        total: round2(total),
        net_profit: YearFigures::reported(np1, np2, np3),
        overall_markup,
    }
}
