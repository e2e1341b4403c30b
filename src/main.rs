mod actor_framework;
mod api;
mod app_system;
mod catalog_actor;
mod clients;
mod domain;
mod events;
mod order_actor;
mod user_actor;

#[cfg(test)]
mod mock_framework;

use futures::StreamExt;
use tracing::{error, info, Instrument};
use crate::api::{CreateOrderInput, EditOrderInput, RequestContext};
use crate::app_system::{setup_tracing, Config, DeliverySystem, SystemError};
use crate::domain::{
    CartItem, DishChoice, DishCreate, DishOption, OrderItemOption, OrderStatus, RestaurantCreate,
    UserRole,
};
use crate::events::{Subscription, Topic};

/// Logs every event a subscription receives until the bus goes away.
fn watch(name: &'static str, subscription: Subscription) -> tokio::task::JoinHandle<()> {
    info!(subscription = name, topic = %subscription.topic(), "Watching");
    tokio::spawn(async move {
        let mut events = Box::pin(subscription.into_stream());
        while let Some(event) = events.next().await {
            match serde_json::to_string(&event) {
                Ok(json) => info!(subscription = name, %json, "Event delivered"),
                Err(e) => error!(subscription = name, error = %e, "Event could not be rendered"),
            }
        }
    })
}

fn seed_error(e: impl std::fmt::Display) -> SystemError {
    SystemError::Seed(e.to_string())
}

fn log_output<T: serde::Serialize>(operation: &str, output: &T) {
    match serde_json::to_string(output) {
        Ok(json) => info!(operation, %json, "Resolver output"),
        Err(e) => error!(operation, error = %e, "Output could not be rendered"),
    }
}

#[tokio::main]
async fn main() -> Result<(), SystemError> {
    let config = Config::from_env()?;
    // Setup tracing once for the entire application
    setup_tracing(&config.log_level);

    info!("Starting application with complete delivery system");

    let system = DeliverySystem::new(&config);

    // Accounts and catalog
    let span = tracing::info_span!("seeding");
    let (customer, owner, driver, restaurant_id, dish_id) = async {
        let customer = system.user_client.register_user("alice@example.com", UserRole::Client).await.map_err(seed_error)?;
        let owner = system.user_client.register_user("bob@example.com", UserRole::Owner).await.map_err(seed_error)?;
        let driver = system.user_client.register_user("carol@example.com", UserRole::Delivery).await.map_err(seed_error)?;

        let restaurant_id = system
            .catalog_client
            .create_restaurant(RestaurantCreate { name: "Noodle Bar".to_string(), owner_id: owner.id })
            .await
            .map_err(seed_error)?;
        let dish_id = system
            .catalog_client
            .create_dish(DishCreate {
                restaurant_id,
                name: "Ramen".to_string(),
                price: 1000,
                options: vec![
                    DishOption::flat("Extra egg", 150),
                    DishOption::with_choices("Size", vec![
                        DishChoice::new("Regular", None),
                        DishChoice::new("Large", Some(300)),
                    ]),
                ],
            })
            .await
            .map_err(seed_error)?;
        Ok::<_, SystemError>((customer, owner, driver, restaurant_id, dish_id))
    }
    .instrument(span)
    .await?;

    // Callers are resolved from their bearer tokens, as a transport would
    let customer_ctx = RequestContext::resolve(&system.user_client, Some(customer.token.as_str())).await;
    let owner_ctx = RequestContext::resolve(&system.user_client, Some(owner.token.as_str())).await;
    let driver_ctx = RequestContext::resolve(&system.user_client, Some(driver.token.as_str())).await;

    let resolver = &system.resolver;
    let mut watchers = Vec::new();
    match resolver.pending_orders(&owner_ctx) {
        Ok(subscription) => watchers.push(watch("pendingOrders", subscription)),
        Err(e) => error!(error = %e, "pendingOrders refused"),
    }
    match resolver.cooked_orders(&driver_ctx) {
        Ok(subscription) => watchers.push(watch("cookedOrders", subscription)),
        Err(e) => error!(error = %e, "cookedOrders refused"),
    }

    info!(
        pending = system.bus.subscriber_count(Topic::NewPendingOrder),
        cooked = system.bus.subscriber_count(Topic::NewCookedOrder),
        "Subscribers connected"
    );

    let span = tracing::info_span!("order_processing");
    async {
        let created = resolver
            .create_order(&customer_ctx, CreateOrderInput {
                restaurant_id,
                items: vec![CartItem::new(dish_id, vec![
                    OrderItemOption::new("Size", "Large"),
                    OrderItemOption::new("Extra egg", ""),
                ])],
            })
            .await;
        log_output("createOrder", &created);
        let Some(order_id) = created.payload.map(|p| p.order_id) else {
            return;
        };

        match resolver.order_update(&customer_ctx, order_id) {
            Ok(subscription) => watchers.push(watch("orderUpdate", subscription)),
            Err(e) => error!(error = %e, "orderUpdate refused"),
        }

        // A client may not move the order along
        log_output("editOrder", &resolver.edit_order(&customer_ctx, EditOrderInput { id: order_id, status: OrderStatus::Cooking }).await);

        for status in [OrderStatus::Cooking, OrderStatus::Cooked] {
            log_output("editOrder", &resolver.edit_order(&owner_ctx, EditOrderInput { id: order_id, status }).await);
        }
        log_output("takeOrder", &resolver.take_order(&driver_ctx, order_id).await);
        for status in [OrderStatus::PickedUp, OrderStatus::Delivered] {
            log_output("editOrder", &resolver.edit_order(&driver_ctx, EditOrderInput { id: order_id, status }).await);
        }

        log_output("getOrder", &resolver.get_order(&customer_ctx, order_id).await);
    }
    .instrument(span)
    .await;

    // Shutdown system gracefully; watchers end once the bus is gone
    system.shutdown().await?;
    for watcher in watchers {
        if let Err(e) = watcher.await {
            error!(error = %e, "Subscription watcher failed");
        }
    }

    info!("Application completed successfully");
    Ok(())
}
