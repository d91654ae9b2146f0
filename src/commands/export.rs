use crate::commands::Out;
use crate::{export, CostingSheet, Result};
use std::path::Path;

/// Writes the costing sheet and its reconciliation to `output` as CSV.
pub async fn export(sheet_path: &Path, output: &Path) -> Result<Out<()>> {
    let sheet = CostingSheet::load(sheet_path).await?;
    export::write_csv(&sheet, output).await?;
    Ok(format!(
        "Exported costing sheet {} to '{}'",
        sheet.sheet_id(),
        output.display()
    )
    .into())
}
