use crate::commands::Out;
use crate::{CostingSheet, Result};
use anyhow::bail;
use std::path::Path;

/// Creates a new costing sheet JSON file at `sheet_path`.
///
/// Refuses to overwrite an existing file. With `sample` the sheet is
/// populated with demonstration data.
pub async fn new(sheet_path: &Path, sample: bool) -> Result<Out<()>> {
    if sheet_path.exists() {
        bail!(
            "A costing sheet already exists at '{}'",
            sheet_path.display()
        );
    }
    let sheet = if sample {
        CostingSheet::sample()
    } else {
        CostingSheet::new()
    };
    sheet.save(sheet_path).await?;
    Ok(format!(
        "Created costing sheet {} at '{}'",
        sheet.sheet_id(),
        sheet_path.display()
    )
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_new_creates_sheet_file() {
        let env = TestEnv::new();
        let path = env.path().join("costing.json");
        let out = new(&path, false).await.unwrap();
        assert!(out.message().starts_with("Created costing sheet CS-"));
        let sheet = CostingSheet::load(&path).await.unwrap();
        assert!(sheet.items(crate::Year::One)[0].is_blank());
    }

    #[tokio::test]
    async fn test_new_refuses_to_overwrite() {
        let env = TestEnv::new();
        let path = env.path().join("costing.json");
        new(&path, true).await.unwrap();
        assert!(new(&path, false).await.is_err());
    }
}
