use crate::actor_framework::Entity;
use crate::domain::{Dish, DishCreate, DishId, Restaurant, RestaurantCreate, RestaurantId};

impl Entity for Restaurant {
    type Id = RestaurantId;
    type CreatePayload = RestaurantCreate;
    type Action = ();
    type ActionResult = ();

    fn id(&self) -> &RestaurantId { &self.id }

    fn from_create(id: RestaurantId, payload: RestaurantCreate) -> Result<Self, String> {
        if payload.name.trim().is_empty() {
            return Err("Restaurant name is required".to_string());
        }
        Ok(Self {
            id,
            name: payload.name,
            owner_id: payload.owner_id,
        })
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), String> {
        Ok(())
    }
}

impl Entity for Dish {
    type Id = DishId;
    type CreatePayload = DishCreate;
    type Action = ();
    type ActionResult = ();

    fn id(&self) -> &DishId { &self.id }

    /// Creates a new Dish.
    ///
    /// Option names must be unique within a dish, since orders refer to
    /// options by name.
    fn from_create(id: DishId, payload: DishCreate) -> Result<Self, String> {
        for (i, option) in payload.options.iter().enumerate() {
            if payload.options[..i].iter().any(|o| o.name == option.name) {
                return Err(format!("Duplicate dish option: {}", option.name));
            }
        }
        Ok(Self {
            id,
            restaurant_id: payload.restaurant_id,
            name: payload.name,
            price: payload.price,
            options: payload.options,
        })
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), String> {
        Ok(())
    }
}
