//! Cart pricing.
//!
//! Option and choice names are matched case-sensitively against the dish
//! catalog. Names that match nothing cost nothing.

use crate::domain::{Dish, OrderItemOption};

/// Price of one dish with the options the customer picked.
pub fn item_price(dish: &Dish, picked: &[OrderItemOption]) -> u64 {
    picked.iter().fold(dish.price, |price, picked| {
        price.saturating_add(option_extra(dish, picked))
    })
}

fn option_extra(dish: &Dish, picked: &OrderItemOption) -> u64 {
    let Some(option) = dish.options.iter().find(|o| o.name == picked.name) else {
        return 0;
    };
    match option.extra {
        Some(extra) if extra > 0 => extra,
        _ => option
            .choices
            .as_deref()
            .unwrap_or_default()
            .iter()
            .find(|c| c.name == picked.choice)
            .and_then(|c| c.extra)
            .unwrap_or(0),
    }
}
