/// Text shown for one food, with per-field fallbacks for missing values
use crate::state::data::{Barcode, FoodRecord};

const UNKNOWN: &str = "Unknown";
const NOT_AVAILABLE: &str = "N/A";
const NOT_LISTED: &str = "Not listed";
const UNNAMED: &str = "Unnamed product";

/// Display lines for a food card
#[derive(Debug, Clone, PartialEq)]
pub struct FoodDetails {
    pub name: String,
    pub lines: Vec<String>,
}

impl FoodDetails {
    pub fn new(record: &FoodRecord, barcode: &Barcode) -> Self {
        let barcode = if barcode.is_empty() {
            NOT_AVAILABLE
        } else {
            barcode.as_str()
        };

        let lines = vec![
            format!("Brand: {}", or(&record.brands, UNKNOWN)),
            format!("Barcode: {barcode}"),
            format!("NOVA Group: {}", or(&record.nova_group, UNKNOWN)),
            format!("Sugar: {} g", or(&record.sugars, NOT_AVAILABLE)),
            format!("Salt: {} g", or(&record.salt, NOT_AVAILABLE)),
            format!("Fat: {} g", or(&record.fat, NOT_AVAILABLE)),
            format!("Carbs: {} g", or(&record.carbohydrates, NOT_AVAILABLE)),
            format!("Proteins: {} g", or(&record.proteins, NOT_AVAILABLE)),
            format!("Calories: {} kcal", or(&record.energy_kcal, NOT_AVAILABLE)),
            format!("Ingredients: {}", or(&record.ingredients_text, NOT_LISTED)),
        ];

        Self {
            name: or(&record.product_name, UNNAMED).to_string(),
            lines,
        }
    }
}

fn or<'a>(value: &'a Option<String>, fallback: &'a str) -> &'a str {
    value.as_deref().unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(record: &FoodRecord) -> FoodDetails {
        FoodDetails::new(record, &record.barcode())
    }

    #[test]
    fn test_empty_record_uses_every_fallback() {
        let details = details(&FoodRecord::default());

        assert_eq!(details.name, "Unnamed product");
        assert_eq!(
            details.lines,
            vec![
                "Brand: Unknown",
                "Barcode: N/A",
                "NOVA Group: Unknown",
                "Sugar: N/A g",
                "Salt: N/A g",
                "Fat: N/A g",
                "Carbs: N/A g",
                "Proteins: N/A g",
                "Calories: N/A kcal",
                "Ingredients: Not listed",
            ]
        );
    }

    #[test]
    fn test_present_fields_are_shown() {
        let record = FoodRecord {
            code: Some("301-762-042-2003 ".into()),
            product_name: Some("Nutella".into()),
            brands: Some("Ferrero".into()),
            nova_group: Some("4".into()),
            sugars: Some("56.3".into()),
            salt: Some("0.107".into()),
            fat: Some("30.9".into()),
            carbohydrates: Some("57.5".into()),
            proteins: Some("6.3".into()),
            energy_kcal: Some("539".into()),
            ingredients_text: Some("Sugar, palm oil, hazelnuts".into()),
        };

        let details = details(&record);

        assert_eq!(details.name, "Nutella");
        assert_eq!(details.lines[0], "Brand: Ferrero");
        assert_eq!(details.lines[1], "Barcode: 3017620422003");
        assert_eq!(details.lines[2], "NOVA Group: 4");
        assert_eq!(details.lines[8], "Calories: 539 kcal");
        assert_eq!(details.lines[9], "Ingredients: Sugar, palm oil, hazelnuts");
    }

    #[test]
    fn test_missing_nova_group_is_unknown() {
        let record = FoodRecord {
            product_name: Some("Apple".into()),
            sugars: Some("10".into()),
            ..Default::default()
        };

        let details = details(&record);

        assert_eq!(details.lines[2], "NOVA Group: Unknown");
        assert_eq!(details.lines[3], "Sugar: 10 g");
    }

    #[test]
    fn test_code_without_digits_shows_na() {
        let record = FoodRecord {
            code: Some("n/a".into()),
            ..Default::default()
        };

        assert_eq!(details(&record).lines[1], "Barcode: N/A");
    }
}
