use crate::reconciliation::domain::{Barcode, HoldingRecord, OutputRow, RowFlag, ShelfStatus};
use crate::shared::Result;
use std::str::FromStr;

/// Column titles of the output report, in the order they are written.
pub const REPORT_HEADER: [&str; 10] = [
    "Flag",
    "Barcode",
    "Status",
    "Call number",
    "Copy number",
    "Location code",
    "Location name",
    "TIND id",
    "Item type",
    "Holdings total",
];

/// Serializes one row to its report fields, in `REPORT_HEADER` order.
pub fn report_fields(row: &OutputRow) -> [String; 10] {
    let r = &row.record;
    [
        row.flag.as_str().to_string(),
        r.barcode.as_str().to_string(),
        r.status.as_str().to_string(),
        r.call_number.clone(),
        r.copy_number.clone(),
        r.location_code.clone(),
        r.location_name.clone(),
        r.catalog_item_id.clone(),
        r.item_type.clone(),
        r.holdings_total.to_string(),
    ]
}

/// Reconstructs a row from report fields. Inverse of [`report_fields`].
pub fn row_from_fields(fields: &[String]) -> Result<OutputRow> {
    if fields.len() != REPORT_HEADER.len() {
        anyhow::bail!(
            "Report row has {} fields, expected {}",
            fields.len(),
            REPORT_HEADER.len()
        );
    }

    let flag = RowFlag::from_str(&fields[0]).map_err(|e| anyhow::anyhow!(e))?;
    let record = HoldingRecord {
        barcode: Barcode::new(fields[1].clone())?,
        status: ShelfStatus::new(fields[2].clone()),
        call_number: fields[3].clone(),
        copy_number: fields[4].clone(),
        location_code: fields[5].clone(),
        location_name: fields[6].clone(),
        catalog_item_id: fields[7].clone(),
        item_type: fields[8].clone(),
        holdings_total: fields[9]
            .parse()
            .map_err(|e| anyhow::anyhow!("Bad holdings total '{}': {}", fields[9], e))?,
    };

    Ok(OutputRow { flag, record })
}
