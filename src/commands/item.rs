use crate::commands::Out;
use crate::{CostingSheet, Result, Year};
use std::path::Path;

/// Appends a blank line item to `year`.
pub async fn add(sheet_path: &Path, year: u8) -> Result<Out<()>> {
    let mut sheet = CostingSheet::load(sheet_path).await?;
    let year = Year::try_from(year)?;
    let id = sheet.add_item(year);
    sheet.save(sheet_path).await?;
    Ok(format!("Added line item {id} to year {year}").into())
}

/// Deletes line item `id` from `year`.
pub async fn delete(sheet_path: &Path, year: u8, id: u64) -> Result<Out<()>> {
    let mut sheet = CostingSheet::load(sheet_path).await?;
    let year = Year::try_from(year)?;
    sheet.remove_item(year, id)?;
    sheet.save(sheet_path).await?;
    Ok(format!("Deleted line item {id} from year {year}").into())
}

/// Copies the Year 1 line items onto each year in `targets`.
pub async fn copy_year(sheet_path: &Path, targets: &[u8]) -> Result<Out<()>> {
    let mut sheet = CostingSheet::load(sheet_path).await?;
    let mut copied = Vec::new();
    for &target in targets {
        let year = Year::try_from(target)?;
        sheet.copy_year1_to(year)?;
        copied.push(year.to_string());
    }
    sheet.save(sheet_path).await?;
    Ok(format!("Copied Year 1 line items to year(s) {}", copied.join(", ")).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DealType;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_add_and_delete_round_trip_through_the_file() {
        let env = TestEnv::new();
        let path = env.sample_sheet().await;

        let out = add(&path, 1).await.unwrap();
        assert_eq!(out.message(), "Added line item 4 to year 1");
        let sheet = CostingSheet::load(&path).await.unwrap();
        assert_eq!(sheet.items(Year::One).len(), 4);

        delete(&path, 1, 4).await.unwrap();
        let sheet = CostingSheet::load(&path).await.unwrap();
        assert_eq!(sheet.items(Year::One).len(), 3);
    }

    #[tokio::test]
    async fn test_delete_unknown_id_fails_without_saving() {
        let env = TestEnv::new();
        let path = env.sample_sheet().await;
        assert!(delete(&path, 1, 99).await.is_err());
        let sheet = CostingSheet::load(&path).await.unwrap();
        assert_eq!(sheet.items(Year::One).len(), 3);
    }

    #[tokio::test]
    async fn test_copy_year_defaults_to_both_later_years() {
        let env = TestEnv::new();
        let path = env.sample_sheet().await;
        let mut sheet = CostingSheet::load(&path).await.unwrap();
        sheet.header_mut().deal_type = DealType::Ramped;
        sheet.save(&path).await.unwrap();

        copy_year(&path, &[2, 3]).await.unwrap();
        let sheet = CostingSheet::load(&path).await.unwrap();
        assert_eq!(sheet.items(Year::Two).len(), 3);
        assert_eq!(sheet.items(Year::Three).len(), 3);
    }

    #[tokio::test]
    async fn test_copy_year_rejected_for_normal_deal() {
        let env = TestEnv::new();
        let path = env.sample_sheet().await;
        assert!(copy_year(&path, &[2]).await.is_err());
    }
}
