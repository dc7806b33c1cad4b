use crate::shared::Result;

/// Maximum length for barcodes (security limit)
const MAX_BARCODE_LENGTH: usize = 64;

/// NewType wrapper for an item barcode.
///
/// Barcodes are opaque identifiers; the catalog assigns one per physical
/// copy. Input order of barcodes is significant and preserved end to end.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Barcode(String);

impl Barcode {
    pub fn new(raw: impl Into<String>) -> Result<Self> {
        let value = raw.into().trim().to_string();

        if value.is_empty() {
            anyhow::bail!("Barcode cannot be empty");
        }

        // Security: Length limit to prevent DoS via absurd identifiers
        if value.len() > MAX_BARCODE_LENGTH {
            anyhow::bail!(
                "Barcode is too long ({} bytes). Maximum allowed: {} bytes",
                value.len(),
                MAX_BARCODE_LENGTH
            );
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether a raw input field looks like a barcode.
    ///
    /// Catalog barcodes are all-digit strings; items without a physical
    /// barcode are recorded under a `nobarcode` prefix. Anything else
    /// (CSV header cells, stray notes) is not a barcode.
    pub fn is_barcode_like(text: &str) -> bool {
        let text = text.trim();
        !text.is_empty()
            && (text.chars().all(|c| c.is_ascii_digit()) || text.starts_with("nobarcode"))
    }
}

impl std::fmt::Display for Barcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
