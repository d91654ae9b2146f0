use crate::commands::Out;
use crate::{utils, CostingSheet, Result, Year};
use anyhow::Context;
use std::path::Path;
use tokio::io::AsyncReadExt;

/// Imports pasted spreadsheet text into the sheet at line item `item_id`.
///
/// The text comes from `input` when given, otherwise from stdin, which lets
/// the clipboard be piped in directly (`pbpaste | costing paste --item 1`).
pub async fn paste(
    sheet_path: &Path,
    year: u8,
    item_id: u64,
    input: Option<&Path>,
) -> Result<Out<()>> {
    let text = match input {
        Some(path) => utils::read(path).await?,
        None => {
            let mut text = String::new();
            tokio::io::stdin()
                .read_to_string(&mut text)
                .await
                .context("Failed to read pasted text from stdin")?;
            text
        }
    };

    let mut sheet = CostingSheet::load(sheet_path).await?;
    let year = Year::try_from(year)?;
    let count = sheet.paste(year, item_id, &text)?;
    if count == 0 {
        return Ok("No spreadsheet rows recognized in the pasted text, sheet unchanged".into());
    }
    sheet.save(sheet_path).await?;
    Ok(format!(
        "Imported {count} line item{} into year {year}",
        if count == 1 { "" } else { "s" }
    )
    .into())
}
