use super::HoldingRecord;

/// Why a row is present in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowFlag {
    /// The row's barcode was explicitly present in the input.
    Original,
    /// The row is a sibling holding of a requested item that is not on
    /// shelf and was not itself in the input.
    Added,
}

impl RowFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            RowFlag::Original => "original",
            RowFlag::Added => "added",
        }
    }
}

impl std::fmt::Display for RowFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RowFlag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "original" => Ok(RowFlag::Original),
            "added" => Ok(RowFlag::Added),
            other => Err(format!("unknown row flag: {}", other)),
        }
    }
}

/// A holding record annotated with the reason it appears in the report.
///
/// Rows are accumulated in memory for the duration of one run and written
/// once at the end; nothing is persisted across runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRow {
    pub flag: RowFlag,
    pub record: HoldingRecord,
}

impl OutputRow {
    pub fn original(record: HoldingRecord) -> Self {
        Self { flag: RowFlag::Original, record }
    }

    pub fn added(record: HoldingRecord) -> Self {
        Self { flag: RowFlag::Added, record }
    }
}
