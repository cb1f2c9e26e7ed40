use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Menu sections, in the order the filter bar shows them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Section {
    Starters,
    Mains,
    Desserts,
}

impl Section {
    pub const COUNT: usize = 3;
    pub const ALL: [Section; Section::COUNT] = [Section::Starters, Section::Mains, Section::Desserts];

    /// Category name as stored in the `category` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Starters => "starters",
            Section::Mains => "mains",
            Section::Desserts => "desserts",
        }
    }

    /// Label for the filter button.
    pub fn title(&self) -> &'static str {
        match self {
            Section::Starters => "Starters",
            Section::Mains => "Mains",
            Section::Desserts => "Desserts",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "starters" => Ok(Section::Starters),
            "mains" => Ok(Section::Mains),
            "desserts" => Ok(Section::Desserts),
            other => Err(format!("unknown section: {}", other)),
        }
    }
}

/// A single dish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct MenuItem {
    pub name: String,
    pub category: String,
    pub description: String,
    pub price: f64,
    /// Relative image file name, resolved with `utils::image_url`.
    pub image: String,
}

impl MenuItem {
    /// List identity. Names are not unique, so the position is appended.
    pub fn row_key(&self, index: usize) -> String {
        format!("{}{}", self.name, index)
    }
}

/// Price as it may appear on the wire: a number or a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawPrice {
    Number(f64),
    Text(String),
}

/// A remote menu record before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMenuItem {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<RawPrice>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Error, Debug, PartialEq)]
pub enum InvalidRecord {
    #[error("record is not an object: {0}")]
    Shape(String),

    #[error("missing name")]
    MissingName,

    #[error("missing category for {0}")]
    MissingCategory(String),

    #[error("missing price for {0}")]
    MissingPrice(String),

    #[error("invalid price for {name}: {value}")]
    InvalidPrice { name: String, value: String },
}

impl TryFrom<RawMenuItem> for MenuItem {
    type Error = InvalidRecord;

    fn try_from(raw: RawMenuItem) -> Result<Self, Self::Error> {
        let name = raw
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .ok_or(InvalidRecord::MissingName)?;

        let category = raw
            .category
            .map(|c| c.trim().to_lowercase())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| InvalidRecord::MissingCategory(name.clone()))?;

        let price = match raw.price {
            Some(RawPrice::Number(p)) => p,
            Some(RawPrice::Text(text)) => {
                text.trim()
                    .parse::<f64>()
                    .map_err(|_| InvalidRecord::InvalidPrice {
                        name: name.clone(),
                        value: text.clone(),
                    })?
            }
            None => return Err(InvalidRecord::MissingPrice(name)),
        };
        if !price.is_finite() || price < 0.0 {
            return Err(InvalidRecord::InvalidPrice {
                name,
                value: price.to_string(),
            });
        }

        Ok(MenuItem {
            name,
            category,
            description: raw.description.unwrap_or_default(),
            price,
            image: raw.image.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct RawMenuDocument {
    menu: Vec<serde_json::Value>,
}

/// The remote menu document, already validated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MenuDocument {
    pub menu: Vec<MenuItem>,
    /// Number of records dropped during validation.
    pub rejected: usize,
}

impl MenuDocument {
    /// Parse a `{ "menu": [...] }` body.
    ///
    /// Fails only if the body is not JSON or has no `menu` array. Individual
    /// records that do not validate are logged and skipped.
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        let raw: RawMenuDocument = serde_json::from_str(body)?;

        let mut doc = MenuDocument::default();
        for (index, value) in raw.menu.into_iter().enumerate() {
            let parsed = serde_json::from_value::<RawMenuItem>(value)
                .map_err(|e| InvalidRecord::Shape(e.to_string()))
                .and_then(MenuItem::try_from);
            match parsed {
                Ok(item) => doc.menu.push(item),
                Err(e) => {
                    warn!(index, error = %e, "Skipping invalid menu record");
                    doc.rejected += 1;
                }
            }
        }
        Ok(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_document() {
        let body = r#"{"menu": [
            {"name": "Greek Salad", "category": "starters", "description": "Crispy lettuce", "price": 12.99, "image": "greekSalad.jpg"},
            {"name": "Lemon Dessert", "category": "desserts", "description": "Light and fluffy", "price": "6.99", "image": "lemonDessert.jpg"}
        ]}"#;

        let doc = MenuDocument::from_json(body).unwrap();
        assert_eq!(doc.menu.len(), 2);
        assert_eq!(doc.rejected, 0);
        assert_eq!(doc.menu[0].name, "Greek Salad");
        assert_eq!(doc.menu[1].price, 6.99);
    }

    #[test]
    fn test_invalid_records_are_skipped() {
        let body = r#"{"menu": [
            {"name": "", "category": "mains", "price": 1},
            {"name": "Pasta", "category": "mains", "price": -3},
            {"name": "Soup", "price": 4},
            "not an object",
            {"name": "Grilled Fish", "category": " Mains ", "price": 20}
        ]}"#;

        let doc = MenuDocument::from_json(body).unwrap();
        assert_eq!(doc.rejected, 4);
        assert_eq!(doc.menu.len(), 1);
        assert_eq!(doc.menu[0].category, "mains");
        assert_eq!(doc.menu[0].description, "");
    }

    #[test]
    fn test_document_without_menu_fails() {
        assert!(MenuDocument::from_json(r#"{"items": []}"#).is_err());
        assert!(MenuDocument::from_json("<html>").is_err());
    }

    #[test]
    fn test_text_price_must_be_numeric() {
        let raw = RawMenuItem {
            name: Some("Bruschetta".to_string()),
            category: Some("starters".to_string()),
            price: Some(RawPrice::Text("cheap".to_string())),
            ..Default::default()
        };
        assert!(matches!(
            MenuItem::try_from(raw),
            Err(InvalidRecord::InvalidPrice { .. })
        ));
    }

    #[test]
    fn test_section_round_trip() {
        for section in Section::ALL {
            assert_eq!(section.as_str().parse::<Section>(), Ok(section));
        }
        assert!("drinks".parse::<Section>().is_err());
    }

    #[test]
    fn test_row_key_includes_index() {
        let item = MenuItem {
            name: "Pasta".to_string(),
            category: "mains".to_string(),
            description: String::new(),
            price: 18.99,
            image: String::new(),
        };
        assert_eq!(item.row_key(3), "Pasta3");
    }
}
