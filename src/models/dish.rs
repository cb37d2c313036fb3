use crate::entities::dish_entity as dishes;
use crate::models::lifecycle::ParseEnumError;
use crate::models::pagination::PaginationParams;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

/// Dishes at or above this rating qualify for the "top rated" filter.
pub const TOP_RATED_MIN: f64 = 4.5;

/// The fixed category set. Restaurants declare a subset; each dish must use
/// a category from its restaurant's declared set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DishCategory {
    Rice,
    Swallow,
    Grills,
    Snacks,
    Drinks,
    Breakfast,
}

impl DishCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            DishCategory::Rice => "rice",
            DishCategory::Swallow => "swallow",
            DishCategory::Grills => "grills",
            DishCategory::Snacks => "snacks",
            DishCategory::Drinks => "drinks",
            DishCategory::Breakfast => "breakfast",
        }
    }
}

impl fmt::Display for DishCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DishCategory {
    type Err = ParseEnumError;

    // Case-sensitive on purpose: the filter contract is an exact enum match.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rice" => Ok(DishCategory::Rice),
            "swallow" => Ok(DishCategory::Swallow),
            "grills" => Ok(DishCategory::Grills),
            "snacks" => Ok(DishCategory::Snacks),
            "drinks" => Ok(DishCategory::Drinks),
            "breakfast" => Ok(DishCategory::Breakfast),
            other => Err(ParseEnumError::new(other)),
        }
    }
}

/// Category filter semantics for dish listing: `all` (or no parameter)
/// returns the unfiltered set, anything else must name one category exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    Only(DishCategory),
}

impl CategoryFilter {
    pub fn parse(raw: Option<&str>) -> Result<Self, ParseEnumError> {
        match raw {
            None | Some("all") => Ok(CategoryFilter::All),
            Some(value) => value.parse::<DishCategory>().map(CategoryFilter::Only),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateDishRequest {
    #[schema(example = "Jollof Rice")]
    pub name: String,
    /// Naira; must be greater than zero.
    #[schema(example = 1500)]
    pub price: i64,
    pub category: DishCategory,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateDishRequest {
    pub name: Option<String>,
    pub price: Option<i64>,
    pub category: Option<DishCategory>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DishQuery {
    /// Free-text search over name and description.
    pub q: Option<String>,
    /// `all` or one exact category identifier.
    pub category: Option<String>,
    /// Only dishes rated at or above 4.5.
    pub top_rated: Option<bool>,
    pub restaurant_id: Option<Uuid>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl DishQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DishResponse {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub category: DishCategory,
    pub image_url: Option<String>,
    pub rating: f64,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<dishes::Model> for DishResponse {
    type Error = ParseEnumError;

    fn try_from(dish: dishes::Model) -> Result<Self, Self::Error> {
        let category = dish.category.parse::<DishCategory>()?;
        Ok(Self {
            id: dish.id,
            restaurant_id: dish.restaurant_id,
            name: dish.name,
            description: dish.description,
            price: dish.price,
            category,
            image_url: dish.image_url,
            rating: dish.rating,
            is_available: dish.is_available,
            created_at: dish.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_filter_all() {
        assert_eq!(CategoryFilter::parse(None).unwrap(), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::parse(Some("all")).unwrap(),
            CategoryFilter::All
        );
    }

    #[test]
    fn test_category_filter_exact() {
        assert_eq!(
            CategoryFilter::parse(Some("rice")).unwrap(),
            CategoryFilter::Only(DishCategory::Rice)
        );
        assert_eq!(
            CategoryFilter::parse(Some("grills")).unwrap(),
            CategoryFilter::Only(DishCategory::Grills)
        );
    }

    #[test]
    fn test_category_filter_case_sensitive() {
        assert!(CategoryFilter::parse(Some("Rice")).is_err());
        assert!(CategoryFilter::parse(Some("RICE")).is_err());
        assert!(CategoryFilter::parse(Some("All")).is_err());
        assert!(CategoryFilter::parse(Some("suya")).is_err());
    }

    #[test]
    fn test_category_round_trip() {
        for category in [
            DishCategory::Rice,
            DishCategory::Swallow,
            DishCategory::Grills,
            DishCategory::Snacks,
            DishCategory::Drinks,
            DishCategory::Breakfast,
        ] {
            assert_eq!(category.as_str().parse::<DishCategory>().unwrap(), category);
        }
    }
}
