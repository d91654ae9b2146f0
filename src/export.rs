//! CSV export of a costing sheet.
//!
//! The export is one CSV document in two parts: the costing table (the
//! per-line calculated figures, one table per year for a Ramped deal) and a
//! reconciliation block mirroring the summary panel, section by section.
//! Rows have uneven lengths, so the writer runs in flexible mode.

use crate::model::{amount, CalculatedLineItem, Region, Summary};
use crate::{utils, CostingSheet, Result, Year};
use anyhow::Context;
use rust_decimal::Decimal;
use std::path::Path;

/// Renders the sheet to CSV and writes it to `path`.
pub async fn write_csv(sheet: &CostingSheet, path: &Path) -> Result<()> {
    let data = to_csv(sheet)?;
    utils::write(path, data).await
}

/// Renders the sheet to CSV bytes.
pub fn to_csv(sheet: &CostingSheet) -> Result<Vec<u8>> {
    let mut w = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());
    let header = sheet.header();
    let summary = sheet.summary();
    let af = header.region == Region::Af;

    // Header info block.
    row(&mut w, &["Sheet ID", sheet.sheet_id()])?;
    row(&mut w, &["Customer Name", &header.customer_name])?;
    row(&mut w, &["Sales Location", &header.sales_location])?;
    row(&mut w, &["Account Manager", &header.account_manager])?;
    if af {
        row(&mut w, &["Partner Name", &header.partner_name])?;
    }
    row(&mut w, &["Agreement Type", &header.agreement_type])?;
    row(&mut w, &["New/Renewal", &header.new_or_renewal])?;
    row(&mut w, &["Currency", &header.currency_code])?;
    row(&mut w, &["Exchange Rate", &header.exchange_rate.to_string()])?;
    row(&mut w, &["VAT Rate", &pct(header.vat_rate)])?;
    let region_name = if af { "Africa" } else { "Middle East" };
    row(&mut w, &["Region", region_name])?;
    row(&mut w, &["Deal Type", &header.deal_type.to_string()])?;
    blank(&mut w)?;

    if header.deal_type.is_ramped() {
        let mut grand = YearTotals::default();
        for year in [Year::One, Year::Two, Year::Three] {
            let items = sheet.sorted_calculated(year);
            row(&mut w, &[&format!("=== YEAR {year} ===")])?;
            line_item_table(&mut w, &items, af)?;
            let totals = YearTotals::of(&items);
            totals_row(&mut w, &format!("YEAR {year} TOTALS"), &totals)?;
            grand.add(&totals);
            blank(&mut w)?;
        }
        totals_row(&mut w, "GRAND TOTAL (3 Years)", &grand)?;
    } else {
        let items = sheet.sorted_calculated(Year::One);
        line_item_table(&mut w, &items, af)?;
        blank(&mut w)?;
        let yearly = YearTotals {
            net: summary.net.y1,
            erp: summary.erp.y1,
            eup: summary.eup.y1,
        };
        let three = YearTotals {
            net: summary.net.total,
            erp: summary.erp.total,
            eup: summary.eup.total,
        };
        totals_row(&mut w, "TOTALS (Yearly)", &yearly)?;
        totals_row(&mut w, "TOTALS (3 Years)", &three)?;
    }
    blank(&mut w)?;

    reconciliation(&mut w, &summary, sheet)?;

    let bytes = w
        .into_inner()
        .context("Failed to flush CSV export buffer")?;
    Ok(bytes)
}

fn row<W: std::io::Write>(w: &mut csv::Writer<W>, cells: &[&str]) -> Result<()> {
    w.write_record(cells)
        .context("Failed to write CSV record")?;
    Ok(())
}

fn blank<W: std::io::Write>(w: &mut csv::Writer<W>) -> Result<()> {
    row(w, &[""])
}

fn pct(value: Decimal) -> String {
    amount::format_percent(value)
}

fn num(value: Decimal) -> String {
    value.to_string()
}

/// Dash for absent optional values, matching the on-screen rendering.
fn dash_or(value: Decimal) -> String {
    if value.is_zero() {
        "-".to_string()
    } else {
        num(value)
    }
}

fn line_item_table<W: std::io::Write>(
    w: &mut csv::Writer<W>,
    items: &[CalculatedLineItem],
    af: bool,
) -> Result<()> {
    let mut headers = vec![
        "Category",
        "Part Number",
        "Item Name",
        "Unit Net USD",
        "Unit ERP USD",
        "Default Markup %",
        "MS Discount %",
        "Crayon Markup %",
        "Unit Type",
        "MS Disc Net",
        "MS Disc ERP",
        "Total Net",
        "Total ERP",
        "Qty",
        "EUP Unit",
        "Total EUP/Yr",
        "Markup %",
        "Rebate %",
        "Rebate",
    ];
    if af {
        headers.extend(["GP", "SWO GP %", "SWO GP", "Partner GP"]);
    }
    row(w, &headers)?;

    for calc in items.iter().filter(|c| !c.item.is_blank()) {
        let item = &calc.item;
        // List-price markup over net, as shown on the sheet.
        let list_markup = if item.unit_net_usd.is_zero() {
            Decimal::ZERO
        } else {
            (item.unit_erp_usd - item.unit_net_usd) / item.unit_net_usd
        };
        let mut cells = vec![
            item.category.short_label().to_string(),
            item.part_number.clone(),
            item.item_name.clone(),
            num(item.unit_net_usd),
            num(item.unit_erp_usd),
            pct(list_markup),
            pct(item.ms_discount_pct),
            pct(item.crayon_markup_pct),
            item.unit_type.to_string(),
            num(calc.discounted_net),
            num(calc.discounted_erp),
            num(calc.total_net),
            num(calc.total_erp),
            item.quantity.to_string(),
            num(calc.eup_unit),
            num(calc.total_eup),
            pct(calc.calculated_markup),
            pct(item.rebate_pct),
            num(calc.rebate_amount),
        ];
        if af {
            cells.extend([
                num(calc.gp),
                pct(item.swo_gp_pct),
                num(calc.swo_gp),
                num(calc.partner_gp),
            ]);
        }
        let cells: Vec<&str> = cells.iter().map(String::as_str).collect();
        row(w, &cells)?;
    }
    Ok(())
}

#[derive(Default)]
struct YearTotals {
    net: Decimal,
    erp: Decimal,
    eup: Decimal,
}

impl YearTotals {
    fn of(items: &[CalculatedLineItem]) -> Self {
        items.iter().fold(Self::default(), |mut acc, c| {
            acc.net += c.total_net;
            acc.erp += c.total_erp;
            acc.eup += c.total_eup;
            acc
        })
    }

    fn add(&mut self, other: &Self) {
        self.net += other.net;
        self.erp += other.erp;
        self.eup += other.eup;
    }
}

/// Totals land under the Total Net, Total ERP and Total EUP/Yr columns.
fn totals_row<W: std::io::Write>(
    w: &mut csv::Writer<W>,
    label: &str,
    totals: &YearTotals,
) -> Result<()> {
    let mut cells = vec![label.to_string()];
    cells.extend(std::iter::repeat_n(String::new(), 10));
    cells.push(num(totals.net));
    cells.push(num(totals.erp));
    cells.push(String::new());
    cells.push(String::new());
    cells.push(num(totals.eup));
    let cells: Vec<&str> = cells.iter().map(String::as_str).collect();
    row(w, &cells)
}

fn figures_section<W: std::io::Write>(
    w: &mut csv::Writer<W>,
    title: &str,
    labels: [&str; 4],
    figures: &crate::model::YearFigures,
) -> Result<()> {
    row(w, &[title, "Values"])?;
    row(w, &[labels[0], &num(figures.y1)])?;
    row(w, &[labels[1], &num(figures.y2)])?;
    row(w, &[labels[2], &num(figures.y3)])?;
    row(w, &[labels[3], &num(figures.total)])?;
    blank(w)
}

fn reconciliation<W: std::io::Write>(
    w: &mut csv::Writer<W>,
    summary: &Summary,
    sheet: &CostingSheet,
) -> Result<()> {
    let header = sheet.header();
    let af = header.region == Region::Af;
    let costs = &summary.crayon_costs;

    figures_section(
        w,
        "Cost Price / CPS Price",
        [
            "Total Net Year 1",
            "Total Net Year 2",
            "Total Net Year 3",
            "Grand Total Net Over 3 Years",
        ],
        &summary.net,
    )?;
    figures_section(
        w,
        "Estimated Retail Price",
        [
            "Total ERP Year 1",
            "Total ERP Year 2",
            "Total ERP Year 3",
            "Grand Total ERP Over 3 Years",
        ],
        &summary.erp,
    )?;
    figures_section(
        w,
        "End User Price without Crayon Discount",
        [
            "Total EUP Year 1",
            "Total EUP Year 2",
            "Total EUP Year 3",
            "Grand Total EUP (3 Years) w/o Discount",
        ],
        &summary.eup,
    )?;
    figures_section(
        w,
        "Crayon Discount/Funding",
        [
            "Discount Value Year 1",
            "Discount Value Year 2",
            "Discount Value Year 3",
            "Total Discount",
        ],
        &summary.discount,
    )?;

    row(w, &["End User Price with Crayon Discount", "Values"])?;
    row(w, &["Total EUP Year 1 with Discount", &num(summary.eup_after_discount.y1)])?;
    row(w, &["Total EUP Year 2 with Discount", &num(summary.eup_after_discount.y2)])?;
    row(w, &["Total EUP Year 3 with Discount", &num(summary.eup_after_discount.y3)])?;
    row(w, &["Grand Total EUP (3 Years) w/ Discount", &num(summary.eup_after_discount.total)])?;
    row(w, &[
        "Grand Total EUP (3 Years) w/ Discount + VAT",
        &num(summary.eup_after_discount_with_vat),
    ])?;
    blank(w)?;

    figures_section(
        w,
        "Crayon Rebate",
        [
            "Rebate Year 1",
            "Rebate Year 2",
            "Rebate Year 3",
            "Total Rebate Over 3 Years",
        ],
        &summary.rebate,
    )?;

    if af {
        row(w, &["GP without Rebates", "Crayon GP", "Partner GP"])?;
        row(w, &["GP Year 1", &num(summary.swo_gp.y1), &num(summary.partner_gp.y1)])?;
        row(w, &["GP Year 2", &num(summary.swo_gp.y2), &num(summary.partner_gp.y2)])?;
        row(w, &["GP Year 3", &num(summary.swo_gp.y3), &num(summary.partner_gp.y3)])?;
        row(w, &[
            "GP Over 3 Years",
            &num(summary.swo_gp.total),
            &num(summary.partner_gp.total),
        ])?;
    } else {
        row(w, &["GP without Rebates", "Values"])?;
        row(w, &["GP Year 1", &num(summary.eup_after_discount.y1 - summary.net.y1)])?;
        row(w, &["GP Year 2", &num(summary.eup_after_discount.y2 - summary.net.y2)])?;
        row(w, &["GP Year 3", &num(summary.eup_after_discount.y3 - summary.net.y3)])?;
        row(w, &[
            "GP Over 3 Years",
            &num(summary.eup_after_discount.total - summary.net.total),
        ])?;
    }
    blank(w)?;

    row(w, &["Gross Profit with Rebates", "Values"])?;
    row(w, &["GP + Rebate Year 1", &num(summary.gp_with_rebate.y1)])?;
    row(w, &["GP + Rebate Year 2", &num(summary.gp_with_rebate.y2)])?;
    row(w, &["GP + Rebate Year 3", &num(summary.gp_with_rebate.y3)])?;
    row(w, &[
        "Total GP + Rebate Over 3 Years",
        &num(summary.gp_with_rebate.total),
    ])?;
    row(w, &["Overall Markup", &pct(summary.blended_margin)])?;
    blank(w)?;

    row(w, &["Gross Profit with Rebates + Crayon Cost", "Values"])?;
    row(w, &["GP + Rebate + Crayon Cost Year 1", &num(costs.net_profit.y1)])?;
    row(w, &["GP + Rebate + Crayon Cost Year 2", &num(costs.net_profit.y2)])?;
    row(w, &["GP + Rebate + Crayon Cost Year 3", &num(costs.net_profit.y3)])?;
    row(w, &[
        "Total GP + Rebate + Crayon Cost Over 3 Years",
        &num(costs.net_profit.total),
    ])?;
    row(w, &["Overall Markup %", &pct(costs.overall_markup)])?;
    blank(w)?;

    let ed_vat = summary.eup_after_discount_with_vat;
    row(w, &["Bid Bond & Bank Charges", "%", "Value"])?;
    row(w, &["Bid Bond", &pct(header.bid_bond_pct), &num(ed_vat * header.bid_bond_pct)])?;
    row(w, &["Bank Charges", &pct(header.bank_charges_pct), "-"])?;
    row(w, &["Total BB Cost", "", &num(costs.bid_bond_cost)])?;
    blank(w)?;
    row(w, &[
        "Performance Bond",
        &pct(header.performance_bond_pct),
        &num(ed_vat * header.performance_bond_pct),
    ])?;
    row(w, &["Bank Charges", &pct(header.performance_bank_charges_pct), "-"])?;
    row(w, &["Cost Year 1", "", &num(costs.performance_bond_cost_per_year)])?;
    row(w, &["Cost Year 2", "", &num(costs.performance_bond_cost_per_year)])?;
    row(w, &["Cost Year 3", "", &num(costs.performance_bond_cost_per_year)])?;
    row(w, &[
        "Total PB Cost over 3 years",
        "",
        &num(costs.performance_bond_cost_per_year * Decimal::from(3)),
    ])?;
    blank(w)?;
    row(w, &["Tender Cost", "", &dash_or(costs.tender_cost)])?;
    blank(w)?;
    row(w, &["Total Crayon Cost", "", &num(costs.total)])?;
    blank(w)?;

    row(w, &["CIF Products", "Yearly Value"])?;
    row(w, &["M365E5", &dash_or(header.cif_m365_e5)])?;
    row(w, &["M365E3", &dash_or(header.cif_m365_e3)])?;
    row(w, &["Azure", &dash_or(header.cif_azure)])?;
    row(w, &["Dynamics365", &dash_or(header.cif_dynamics365)])?;
    Ok(())
}
