use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use utoipa::ToSchema;
use validator::Validate;

/// Equipment category of a catalog item
///
/// Category membership drives the completion discount: selecting every
/// catalog item of a category unlocks an extra discount on those lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "varchar", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    Elevator,
    Pump,
    Generator,
    Hvac,
    Gate,
    FireSystem,
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemCategory::Elevator => write!(f, "elevator"),
            ItemCategory::Pump => write!(f, "pump"),
            ItemCategory::Generator => write!(f, "generator"),
            ItemCategory::Hvac => write!(f, "hvac"),
            ItemCategory::Gate => write!(f, "gate"),
            ItemCategory::FireSystem => write!(f, "fire_system"),
        }
    }
}

impl std::str::FromStr for ItemCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "elevator" => Ok(ItemCategory::Elevator),
            "pump" => Ok(ItemCategory::Pump),
            "generator" => Ok(ItemCategory::Generator),
            "hvac" => Ok(ItemCategory::Hvac),
            "gate" => Ok(ItemCategory::Gate),
            "fire_system" => Ok(ItemCategory::FireSystem),
            _ => Err(format!("Invalid item category: {}", s)),
        }
    }
}

/// Represents a catalog item (equipment/service) in the database
///
/// Catalog rows are the read-only input of the pricing engine: quotes and
/// proposals snapshot `unit_rate`/`labor_rate` at selection time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CatalogItem {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Hydraulic elevator - monthly service")]
    pub name: String,
    pub category: ItemCategory,
    /// Material/equipment rate per unit
    #[schema(value_type = f64, example = 450.0)]
    pub unit_rate: Decimal,
    /// Labor rate per unit-hour; zero for items priced as equipment only
    #[schema(value_type = f64, example = 80.0)]
    pub labor_rate: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data needed to create a new catalog item
///
/// Used for POST /api/catalog requests. id and timestamps are generated.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateCatalogItem {
    #[validate(length(min = 1, max = 120, message = "Name must be between 1 and 120 characters"))]
    #[schema(example = "Submersible pump - preventive maintenance")]
    pub name: String,
    pub category: ItemCategory,
    #[validate(custom = "crate::validation::validate_positive_money")]
    #[schema(value_type = f64, example = 320.0)]
    pub unit_rate: Decimal,
    #[validate(custom = "crate::validation::validate_non_negative_money")]
    #[schema(value_type = f64, example = 60.0)]
    pub labor_rate: Decimal,
}

/// Data for updating an existing catalog item
///
/// Used for PUT /api/catalog/{id} requests. All fields optional to support
/// partial updates.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateCatalogItem {
    #[validate(length(min = 1, max = 120, message = "Name must be between 1 and 120 characters"))]
    pub name: Option<String>,
    pub category: Option<ItemCategory>,
    #[validate(custom = "crate::validation::validate_optional_positive_money")]
    #[schema(value_type = Option<f64>)]
    pub unit_rate: Option<Decimal>,
    #[validate(custom = "crate::validation::validate_optional_non_negative_money")]
    #[schema(value_type = Option<f64>)]
    pub labor_rate: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[test]
    fn test_item_category_display() {
        assert_eq!(ItemCategory::Elevator.to_string(), "elevator");
        assert_eq!(ItemCategory::Pump.to_string(), "pump");
        assert_eq!(ItemCategory::FireSystem.to_string(), "fire_system");
    }

    #[test]
    fn test_item_category_from_str() {
        assert_eq!(ItemCategory::from_str("generator").unwrap(), ItemCategory::Generator);
        assert_eq!(ItemCategory::from_str("fire_system").unwrap(), ItemCategory::FireSystem);
        assert!(ItemCategory::from_str("unknown").is_err());
    }

    #[test]
    fn test_item_category_serialization() {
        let json = serde_json::to_string(&ItemCategory::Hvac).unwrap();
        assert_eq!(json, "\"hvac\"");

        let back: ItemCategory = serde_json::from_str("\"fire_system\"").unwrap();
        assert_eq!(back, ItemCategory::FireSystem);
    }

    #[test]
    fn test_catalog_item_serialization() {
        let item = CatalogItem {
            id: 1,
            name: "Hydraulic elevator - monthly service".to_string(),
            category: ItemCategory::Elevator,
            unit_rate: dec!(450.00),
            labor_rate: dec!(80.00),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&item).expect("Failed to serialize CatalogItem");

        assert!(json.contains("\"id\":1"));
        assert!(json.contains("\"name\":\"Hydraulic elevator - monthly service\""));
        assert!(json.contains("\"category\":\"elevator\""));
        assert!(json.contains("\"unit_rate\":\"450.00\""));
        assert!(json.contains("\"labor_rate\":\"80.00\""));
    }

    #[test]
    fn test_create_catalog_item_deserialization() {
        let json = r#"{
            "name": "Submersible pump - preventive maintenance",
            "category": "pump",
            "unit_rate": "320.00",
            "labor_rate": "60.00"
        }"#;

        let create: CreateCatalogItem =
            serde_json::from_str(json).expect("Failed to deserialize CreateCatalogItem");

        assert_eq!(create.name, "Submersible pump - preventive maintenance");
        assert_eq!(create.category, ItemCategory::Pump);
        assert_eq!(create.unit_rate, dec!(320.00));
        assert_eq!(create.labor_rate, dec!(60.00));
    }

    #[test]
    fn test_create_catalog_item_validation() {
        let valid = CreateCatalogItem {
            name: "Generator load test".to_string(),
            category: ItemCategory::Generator,
            unit_rate: dec!(500),
            labor_rate: Decimal::ZERO,
        };
        assert!(valid.validate().is_ok());

        let bad_rate = CreateCatalogItem {
            name: "Generator load test".to_string(),
            category: ItemCategory::Generator,
            unit_rate: dec!(-1),
            labor_rate: Decimal::ZERO,
        };
        assert!(bad_rate.validate().is_err());

        let empty_name = CreateCatalogItem {
            name: "".to_string(),
            category: ItemCategory::Generator,
            unit_rate: dec!(500),
            labor_rate: Decimal::ZERO,
        };
        assert!(empty_name.validate().is_err());
    }

    #[test]
    fn test_update_catalog_item_partial() {
        let json = r#"{"unit_rate": "199.90"}"#;
        let update: UpdateCatalogItem =
            serde_json::from_str(json).expect("Failed to deserialize UpdateCatalogItem");

        assert_eq!(update.unit_rate, Some(dec!(199.90)));
        assert_eq!(update.name, None);
        assert_eq!(update.category, None);
        assert_eq!(update.labor_rate, None);
    }
}
