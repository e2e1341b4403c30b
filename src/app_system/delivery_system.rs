use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{error, info};
use crate::actor_framework::{Entity, ResourceActor, ResourceClient};
use crate::api::OrderResolver;
use crate::clients::{CatalogClient, OrderClient, UserClient};
use crate::domain::{Dish, Order, OrderItem, Restaurant, User};
use crate::events::EventBus;
use super::{Config, SystemError};

/// The main application system that orchestrates all actors.
///
/// Responsible for starting up actors, wiring them together with the event
/// bus, and handling shutdown.
pub struct DeliverySystem {
    pub user_client: UserClient,
    pub catalog_client: CatalogClient,
    pub order_client: OrderClient,
    pub resolver: OrderResolver,
    pub bus: EventBus,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

fn spawn_store<T>(buffer_size: usize, handles: &mut Vec<tokio::task::JoinHandle<()>>) -> ResourceClient<T>
where
    T: Entity<Id = u64>,
{
    let counter = Arc::new(AtomicU64::new(1));
    let next_id = move || counter.fetch_add(1, Ordering::SeqCst);
    let (actor, client) = ResourceActor::<T>::new(buffer_size, next_id);
    handles.push(tokio::spawn(actor.run()));
    client
}

impl DeliverySystem {
    pub fn new(config: &Config) -> Self {
        info!(?config, "Starting delivery system");
        let buffer = config.actor_buffer_size;
        let mut handles = Vec::new();

        // 1. Identity
        let user_client = UserClient::new(spawn_store::<User>(buffer, &mut handles));

        // 2. Catalog
        let catalog_client = CatalogClient::new(
            spawn_store::<Restaurant>(buffer, &mut handles),
            spawn_store::<Dish>(buffer, &mut handles),
        );

        // 3. Orders, publishing on the shared bus
        let bus = EventBus::new(config.event_channel_capacity);
        let order_client = OrderClient::new(
            spawn_store::<Order>(buffer, &mut handles),
            spawn_store::<OrderItem>(buffer, &mut handles),
            catalog_client.clone(),
            bus.clone(),
        );

        let resolver = OrderResolver::new(order_client.clone(), bus.clone());

        Self {
            user_client,
            catalog_client,
            order_client,
            resolver,
            bus,
            handles,
        }
    }

    /// Drops every client so the actor mailboxes close, then waits for the
    /// actors to drain. Clones held elsewhere keep their actor alive.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down system...");
        let Self { user_client, catalog_client, order_client, resolver, bus, handles } = self;
        drop(resolver);
        drop(order_client);
        drop(catalog_client);
        drop(user_client);
        drop(bus);

        for handle in handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(SystemError::ActorTaskFailed(e.to_string()));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
