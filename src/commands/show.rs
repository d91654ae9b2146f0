use crate::commands::Out;
use crate::model::{amount, Region, Summary};
use crate::{CostingSheet, Result, Year};
use std::fmt::Write;
use std::path::Path;

/// Renders the calculated line items for `year` and the deal summary.
///
/// The summary is also returned as structured data for `--log-level debug`.
pub async fn show(sheet_path: &Path, year: u8) -> Result<Out<Summary>> {
    let sheet = CostingSheet::load(sheet_path).await?;
    let year = Year::try_from(year)?;
    let rendered = render(&sheet, year);
    let summary = sheet.summary();
    Ok(Out::new(rendered, summary))
}

fn render(sheet: &CostingSheet, year: Year) -> String {
    let header = sheet.header();
    let code = &header.currency_code;
    let summary = sheet.summary();
    let mut s = String::new();

    let w = &mut s;
    // Infallible for String.
    let _ = writeln!(w, "Costing Sheet {}", sheet.sheet_id());
    let _ = writeln!(w, "Customer: {}", header.customer_name);
    let _ = writeln!(
        w,
        "Deal: {} | Region: {} | {} @ {}",
        header.deal_type, header.region, code, header.exchange_rate
    );
    let _ = writeln!(w, "Year {year} line items:");
    let _ = writeln!(
        w,
        "{:>4}  {:<12} {:<40} {:>6} {:>12} {:>14}",
        "ID", "PART", "ITEM", "QTY", "EUP UNIT", "TOTAL EUP/YR"
    );

    let mut category = None;
    for calc in sheet.sorted_calculated(year) {
        if calc.item.is_blank() {
            continue;
        }
        if category != Some(calc.item.category) {
            category = Some(calc.item.category);
            let _ = writeln!(w, "{}", calc.item.category.label());
        }
        let mut name = calc.item.item_name.clone();
        if name.chars().count() > 40 {
            name = name.chars().take(37).collect();
            name.push_str("...");
        }
        let _ = writeln!(
            w,
            "{:>4}  {:<12} {:<40} {:>6} {:>12} {:>14}",
            calc.item.id,
            calc.item.part_number,
            name,
            calc.item.quantity,
            calc.eup_unit,
            calc.total_eup
        );
    }

    let money = |v| amount::format_currency(v, code);
    let _ = writeln!(w, "---");
    let _ = writeln!(w, "Total Net (3 years):      {}", money(summary.net.total));
    let _ = writeln!(w, "Total EUP (3 years):      {}", money(summary.eup.total));
    let _ = writeln!(
        w,
        "Funding discount:         {}",
        money(summary.discount.total)
    );
    let _ = writeln!(
        w,
        "EUP after discount:       {}",
        money(summary.eup_after_discount.total)
    );
    let _ = writeln!(
        w,
        "EUP after discount + VAT: {}",
        money(summary.eup_after_discount_with_vat)
    );
    let _ = writeln!(w, "Rebate:                   {}", money(summary.rebate.total));
    if header.region == Region::Af {
        let _ = writeln!(w, "Crayon GP:                {}", money(summary.swo_gp.total));
        let _ = writeln!(
            w,
            "Partner GP:               {}",
            money(summary.partner_gp.total)
        );
    }
    let _ = writeln!(
        w,
        "GP with rebate:           {}",
        money(summary.gp_with_rebate.total)
    );
    let _ = writeln!(
        w,
        "Blended margin:           {}",
        amount::format_percent(summary.blended_margin)
    );
    let _ = writeln!(
        w,
        "Total Crayon cost:        {}",
        money(summary.crayon_costs.total)
    );
    let _ = write!(
        w,
        "Net profit (3 years):     {} ({})",
        money(summary.crayon_costs.net_profit.total),
        amount::format_percent(summary.crayon_costs.overall_markup)
    );
    s
}
