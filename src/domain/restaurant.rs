use serde::{Deserialize, Serialize};
use super::UserId;

pub type RestaurantId = u64;
pub type DishId = u64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: RestaurantId,
    pub name: String,
    pub owner_id: UserId,
}

#[derive(Debug, Clone)]
pub struct RestaurantCreate {
    pub name: String,
    pub owner_id: UserId,
}

/// One selectable value of a dish option, e.g. "Large" for "Size".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DishChoice {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<u64>,
}

/// An option on a dish. Priced either by its own `extra` or by the `extra`
/// of the choice the customer picked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DishOption {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<DishChoice>>,
}

impl DishOption {
    pub fn flat(name: impl Into<String>, extra: u64) -> Self {
        Self { name: name.into(), extra: Some(extra), choices: None }
    }

    pub fn with_choices(name: impl Into<String>, choices: Vec<DishChoice>) -> Self {
        Self { name: name.into(), extra: None, choices: Some(choices) }
    }
}

impl DishChoice {
    pub fn new(name: impl Into<String>, extra: Option<u64>) -> Self {
        Self { name: name.into(), extra }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dish {
    pub id: DishId,
    pub restaurant_id: RestaurantId,
    pub name: String,
    /// Price in the smallest currency unit.
    pub price: u64,
    #[serde(default)]
    pub options: Vec<DishOption>,
}

#[derive(Debug, Clone)]
pub struct DishCreate {
    pub restaurant_id: RestaurantId,
    pub name: String,
    pub price: u64,
    pub options: Vec<DishOption>,
}
