use super::Barcode;

/// The canonical status label meaning a copy is expected on the shelf.
/// Every other label the catalog emits counts as a shelf discrepancy.
const ON_SHELF_LABEL: &str = "on shelf";

/// Shelf state of one physical copy, as reported by the catalog.
///
/// The raw label is kept verbatim so reports reproduce exactly what the
/// catalog said ("On loan", "lost", "in processing", ...); classification
/// only distinguishes on-shelf from everything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShelfStatus(String);

impl ShelfStatus {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn is_on_shelf(&self) -> bool {
        self.0.trim().eq_ignore_ascii_case(ON_SHELF_LABEL)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ShelfStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One physical copy of a catalog item.
///
/// A catalog item (bibliographic record, identified by `catalog_item_id`)
/// can have several copies, each with its own barcode. `holdings_total` is
/// the number of copies the catalog reports for the item; every record of
/// the same item carries the same value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoldingRecord {
    pub barcode: Barcode,
    pub status: ShelfStatus,
    pub call_number: String,
    pub copy_number: String,
    pub location_code: String,
    pub location_name: String,
    pub catalog_item_id: String,
    pub item_type: String,
    pub holdings_total: usize,
}
