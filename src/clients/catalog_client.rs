use tracing::{debug, instrument};
use crate::actor_framework::ResourceClient;
use crate::catalog_actor::CatalogError;
use crate::domain::{Dish, Restaurant, RestaurantId, UserId};

/// Client for the restaurant and dish actors.
#[derive(Clone)]
pub struct CatalogClient {
    restaurants: ResourceClient<Restaurant>,
    dishes: ResourceClient<Dish>,
}

impl CatalogClient {
    pub fn new(restaurants: ResourceClient<Restaurant>, dishes: ResourceClient<Dish>) -> Self {
        Self { restaurants, dishes }
    }

    /// Ids of every restaurant owned by `owner_id`.
    #[instrument(skip(self))]
    pub async fn restaurants_owned_by(&self, owner_id: UserId) -> Result<Vec<RestaurantId>, CatalogError> {
        debug!("Sending request");
        let owned = self
            .restaurants
            .list(move |restaurant: &Restaurant| restaurant.owner_id == owner_id)
            .await
            .map_err(|e| CatalogError::ActorCommunicationError(e.to_string()))?;
        Ok(owned.into_iter().map(|restaurant| restaurant.id).collect())
    }
}

impl_client_methods!(CatalogClient, restaurants: Restaurant, CatalogError, restaurant);
impl_client_methods!(CatalogClient, dishes: Dish, CatalogError, dish);
