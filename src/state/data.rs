/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the dataset layer and the UI layer.
use rusqlite::types::Value;

/// Barcodes shorter than this never trigger an image lookup
pub const MIN_BARCODE_LEN: usize = 8;

/// One row of the `foods` table
///
/// Every column is kept as display text: the dataset stores numbers as
/// INTEGER, REAL or TEXT depending on the import, and nothing here does
/// arithmetic on them. `None` means NULL or an empty string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FoodRecord {
    /// Raw barcode as stored (not yet normalized)
    pub code: Option<String>,
    pub product_name: Option<String>,
    pub brands: Option<String>,
    pub nova_group: Option<String>,
    /// Grams per 100 g
    pub sugars: Option<String>,
    pub salt: Option<String>,
    pub fat: Option<String>,
    pub carbohydrates: Option<String>,
    pub proteins: Option<String>,
    /// Kilocalories per 100 g
    pub energy_kcal: Option<String>,
    pub ingredients_text: Option<String>,
}

impl FoodRecord {
    /// Normalized barcode for this record
    pub fn barcode(&self) -> Barcode {
        Barcode::normalize(self.code.as_deref().unwrap_or_default())
    }
}

/// A barcode reduced to its digits
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Barcode(String);

impl Barcode {
    /// Trim the raw code and drop every non-digit character.
    pub fn normalize(raw: &str) -> Self {
        Barcode(raw.trim().chars().filter(char::is_ascii_digit).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the barcode is long enough to be worth a lookup request
    pub fn is_resolvable(&self) -> bool {
        self.0.len() >= MIN_BARCODE_LEN
    }
}

impl std::fmt::Display for Barcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Convert a SQLite cell into display text.
///
/// Integers and reals print without a trailing `.0`, text is trimmed and an
/// empty string counts as absent. Blobs are never displayable.
pub fn value_to_text(value: Value) -> Option<String> {
    match value {
        Value::Null | Value::Blob(_) => None,
        Value::Integer(i) => Some(i.to_string()),
        Value::Real(f) => Some(f.to_string()),
        Value::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
    }
}
