use tracing::{error, info, instrument, warn};
use crate::actor_framework::{FrameworkError, ResourceClient};
use crate::catalog_actor::CatalogError;
use crate::clients::CatalogClient;
use crate::domain::{
    CallerIdentity, CartItem, Order, OrderCreate, OrderId, OrderItem, OrderItemCreate,
    OrderStatus, RestaurantId, UserId, UserRole,
};
use crate::events::{EventBus, OrderEvent};
use crate::order_actor::pricing::item_price;
use crate::order_actor::rules::{can_see_order, can_set_status};
use crate::order_actor::{OrderAction, OrderActionResult, OrderCriteria, OrderError};

/// Client for interacting with the Order actor.
///
/// Owns the order lifecycle: pricing a cart into a new order, who may read
/// which order, who may move it to which status, and which events each change
/// publishes.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
    items: ResourceClient<OrderItem>,
    catalog: CatalogClient,
    bus: EventBus,
}

impl OrderClient {
    pub fn new(
        inner: ResourceClient<Order>,
        items: ResourceClient<OrderItem>,
        catalog: CatalogClient,
        bus: EventBus,
    ) -> Self {
        Self { inner, items, catalog, bus }
    }

    /// Prices the cart, stores its items and the order, and notifies the
    /// restaurant owner.
    #[instrument(skip(self, cart), fields(customer_id = customer.id, items = cart.len()))]
    pub async fn create_order(
        &self,
        customer: &CallerIdentity,
        restaurant_id: RestaurantId,
        cart: Vec<CartItem>,
    ) -> Result<Order, OrderError> {
        info!("Processing create_order request");

        let restaurant = self
            .catalog
            .get_restaurant(restaurant_id)
            .await
            .map_err(creation_failed)?
            .ok_or(OrderError::RestaurantNotFound(restaurant_id))?;

        // Every dish is resolved before any item is stored.
        let mut total: u64 = 0;
        for line in &cart {
            let dish = self
                .catalog
                .get_dish(line.dish_id)
                .await
                .map_err(creation_failed)?
                .ok_or(OrderError::DishNotFound(line.dish_id))?;
            total = total.saturating_add(item_price(&dish, &line.options));
        }

        let mut items = Vec::with_capacity(cart.len());
        for line in cart {
            let payload = OrderItemCreate { dish_id: line.dish_id, options: line.options.clone() };
            let id = self.items.create(payload).await.map_err(creation_failed)?;
            items.push(OrderItem { id, dish_id: line.dish_id, options: line.options });
        }

        let id = self
            .inner
            .create(OrderCreate { customer_id: customer.id, restaurant_id, items, total })
            .await
            .map_err(creation_failed)?;
        let order = self
            .inner
            .get(id)
            .await
            .map_err(creation_failed)?
            .ok_or_else(|| OrderError::OrderCreationFailed(format!("order {id} missing after insert")))?;

        info!(order_id = order.id, total, owner_id = restaurant.owner_id, "Order created");
        self.bus.publish(OrderEvent::NewPendingOrder { order: order.clone(), owner_id: restaurant.owner_id });
        Ok(order)
    }

    /// Fetches one order if the caller is allowed to see it.
    #[instrument(skip(self), fields(caller_id = caller.id, role = %caller.role))]
    pub async fn get_order(&self, caller: &CallerIdentity, order_id: OrderId) -> Result<Order, OrderError> {
        let order = self.load(order_id).await?;
        let owner_id = self.owner_of(&order).await?;
        if !can_see_order(caller, &order, owner_id) {
            warn!("Order is not visible to caller");
            return Err(OrderError::NotAuthorized);
        }
        Ok(order)
    }

    /// Lists the caller's orders: placed (client), delivered (driver), or
    /// received by one of their restaurants (owner).
    #[instrument(skip(self), fields(caller_id = caller.id, role = %caller.role))]
    pub async fn get_orders(
        &self,
        caller: &CallerIdentity,
        status: Option<OrderStatus>,
    ) -> Result<Vec<Order>, OrderError> {
        let criteria = match caller.role {
            UserRole::Client => OrderCriteria { customer_id: Some(caller.id), status, ..Default::default() },
            UserRole::Delivery => OrderCriteria { driver_id: Some(caller.id), status, ..Default::default() },
            UserRole::Owner => {
                let restaurant_ids = self.catalog.restaurants_owned_by(caller.id).await?;
                OrderCriteria { restaurant_ids: Some(restaurant_ids), status, ..Default::default() }
            }
        };
        let orders = self.inner.list(move |order: &Order| criteria.matches(order)).await?;
        info!(count = orders.len(), "Orders listed");
        Ok(orders)
    }

    /// Moves an order to `status` if the caller can see it and their role may
    /// set that status.
    #[instrument(skip(self), fields(caller_id = caller.id, role = %caller.role))]
    pub async fn edit_order(
        &self,
        caller: &CallerIdentity,
        order_id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, OrderError> {
        let order = self.load(order_id).await?;
        let owner_id = self.owner_of(&order).await?;
        if !can_see_order(caller, &order, owner_id) {
            warn!("Order is not visible to caller");
            return Err(OrderError::NotAuthorized);
        }
        if !can_set_status(caller.role, order.status, status) {
            warn!(current = %order.status, "Status change rejected");
            return Err(OrderError::CannotEditOrder { role: caller.role, status });
        }

        let action = OrderAction::SetStatus { expected: order.status, status };
        let updated = match self.perform(order_id, action).await? {
            OrderActionResult::StatusSet(updated) => updated,
            OrderActionResult::StatusChanged { current } => {
                warn!(%current, "Order changed while being edited");
                return Err(OrderError::OrderConflict { order_id, current });
            }
            other => return Err(unexpected(other)),
        };
        info!(from = %order.status, to = %status, "Order status changed");

        if updated.status == OrderStatus::Cooked {
            self.bus.publish(OrderEvent::NewCookedOrder { order: updated.clone() });
        }
        self.bus.publish(OrderEvent::NewOrderUpdate { order: updated.clone(), owner_id });
        Ok(updated)
    }

    /// Assigns the calling driver to an order nobody has claimed yet.
    #[instrument(skip(self), fields(caller_id = driver.id, role = %driver.role))]
    pub async fn take_order(&self, driver: &CallerIdentity, order_id: OrderId) -> Result<Order, OrderError> {
        if driver.role != UserRole::Delivery {
            warn!("Only drivers can take orders");
            return Err(OrderError::NotAuthorized);
        }

        // Everything the update event needs is read before the claim is written.
        let order = self.load(order_id).await?;
        let owner_id = self.owner_of(&order).await?;

        let updated = match self.perform(order_id, OrderAction::Claim { driver_id: driver.id }).await? {
            OrderActionResult::Claimed(updated) => updated,
            OrderActionResult::AlreadyTaken { driver_id } => {
                warn!(taken_by = driver_id, "Order already taken");
                return Err(OrderError::OrderAlreadyTaken(order_id));
            }
            other => return Err(unexpected(other)),
        };
        info!("Order taken");

        self.bus.publish(OrderEvent::NewOrderUpdate { order: updated.clone(), owner_id });
        Ok(updated)
    }

    async fn load(&self, order_id: OrderId) -> Result<Order, OrderError> {
        self.inner.get(order_id).await?.ok_or(OrderError::OrderNotFound(order_id))
    }

    async fn perform(&self, order_id: OrderId, action: OrderAction) -> Result<OrderActionResult, OrderError> {
        self.inner.perform_action(order_id, action).await.map_err(|e| match e {
            FrameworkError::NotFound(_) => OrderError::OrderNotFound(order_id),
            other => {
                error!(error = %other, "Order store failed");
                OrderError::from(other)
            }
        })
    }

    /// Owner of the order's restaurant, if the restaurant still exists.
    async fn owner_of(&self, order: &Order) -> Result<Option<UserId>, OrderError> {
        let Some(restaurant_id) = order.restaurant_id else {
            return Ok(None);
        };
        let restaurant = self.catalog.get_restaurant(restaurant_id).await?;
        Ok(restaurant.map(|r| r.owner_id))
    }
}

fn creation_failed(e: impl std::fmt::Display) -> OrderError {
    error!(error = %e, "Order creation failed");
    OrderError::OrderCreationFailed(e.to_string())
}

fn unexpected(result: OrderActionResult) -> OrderError {
    OrderError::Persistence(format!("Unexpected result: {result:?}"))
}

impl From<CatalogError> for OrderError {
    fn from(e: CatalogError) -> Self {
        OrderError::Persistence(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::domain::{Dish, Restaurant};
    use crate::events::{CookedOrdersFilter, Topic};
    use crate::mock_framework::{create_mock_client, expect_action, expect_create, expect_get};

    struct Mocks {
        client: OrderClient,
        orders: tokio::sync::mpsc::Receiver<crate::actor_framework::ResourceRequest<Order>>,
        items: tokio::sync::mpsc::Receiver<crate::actor_framework::ResourceRequest<OrderItem>>,
        restaurants: tokio::sync::mpsc::Receiver<crate::actor_framework::ResourceRequest<Restaurant>>,
        dishes: tokio::sync::mpsc::Receiver<crate::actor_framework::ResourceRequest<Dish>>,
        bus: EventBus,
    }

    fn mocks() -> Mocks {
        let (orders_client, orders) = create_mock_client::<Order>(10);
        let (items_client, items) = create_mock_client::<OrderItem>(10);
        let (restaurants_client, restaurants) = create_mock_client::<Restaurant>(10);
        let (dishes_client, dishes) = create_mock_client::<Dish>(10);
        let bus = EventBus::new(16);
        let catalog = CatalogClient::new(restaurants_client, dishes_client);
        let client = OrderClient::new(orders_client, items_client, catalog, bus.clone());
        Mocks { client, orders, items, restaurants, dishes, bus }
    }

    fn stored_order(status: OrderStatus, driver_id: Option<UserId>) -> Order {
        let now = Utc::now();
        Order {
            id: 1,
            customer_id: Some(1),
            driver_id,
            restaurant_id: Some(7),
            items: vec![],
            total: 1000,
            status,
            created_at: now,
            updated_at: now,
        }
    }

    fn restaurant() -> Restaurant {
        Restaurant { id: 7, name: "Noodle Bar".to_string(), owner_id: 9 }
    }

    #[tokio::test]
    async fn test_create_order_flow() {
        let mut m = mocks();
        let client = m.client.clone();
        let task = tokio::spawn(async move {
            client.create_order(&CallerIdentity::client(1), 7, vec![CartItem::new(3, vec![])]).await
        });

        let (id, responder) = expect_get(&mut m.restaurants).await.expect("Expected Restaurant Get");
        assert_eq!(id, 7);
        responder.send(Ok(Some(restaurant()))).unwrap();

        let (id, responder) = expect_get(&mut m.dishes).await.expect("Expected Dish Get");
        assert_eq!(id, 3);
        let dish = Dish { id: 3, restaurant_id: 7, name: "Ramen".into(), price: 1000, options: vec![] };
        responder.send(Ok(Some(dish))).unwrap();

        let (payload, responder) = expect_create(&mut m.items).await.expect("Expected OrderItem Create");
        assert_eq!(payload.dish_id, 3);
        responder.send(Ok(11)).unwrap();

        let (payload, responder) = expect_create(&mut m.orders).await.expect("Expected Order Create");
        assert_eq!(payload.total, 1000);
        assert_eq!(payload.customer_id, 1);
        assert_eq!(payload.items[0].id, 11);
        responder.send(Ok(1)).unwrap();

        let (id, responder) = expect_get(&mut m.orders).await.expect("Expected Order Get");
        assert_eq!(id, 1);
        responder.send(Ok(Some(stored_order(OrderStatus::Pending, None)))).unwrap();

        let order = task.await.unwrap().unwrap();
        assert_eq!(order.id, 1);
    }

    #[tokio::test]
    async fn test_create_order_store_failure_is_reported() {
        let mut m = mocks();
        let client = m.client.clone();
        let task = tokio::spawn(async move {
            client.create_order(&CallerIdentity::client(1), 7, vec![]).await
        });

        let (_, responder) = expect_get(&mut m.restaurants).await.unwrap();
        responder.send(Ok(Some(restaurant()))).unwrap();

        let (_, responder) = expect_create(&mut m.orders).await.unwrap();
        responder.send(Err(FrameworkError::ActorDropped)).unwrap();

        let err = task.await.unwrap().unwrap_err();
        assert!(matches!(err, OrderError::OrderCreationFailed(_)));
    }

    #[tokio::test]
    async fn test_edit_order_reports_concurrent_change() {
        let mut m = mocks();
        let client = m.client.clone();
        let task = tokio::spawn(async move {
            client.edit_order(&CallerIdentity::owner(9), 1, OrderStatus::Cooked).await
        });

        let (_, responder) = expect_get(&mut m.orders).await.unwrap();
        responder.send(Ok(Some(stored_order(OrderStatus::Pending, None)))).unwrap();
        let (_, responder) = expect_get(&mut m.restaurants).await.unwrap();
        responder.send(Ok(Some(restaurant()))).unwrap();

        let (id, action, responder) = expect_action(&mut m.orders).await.expect("Expected Order Action");
        assert_eq!(id, 1);
        match action {
            OrderAction::SetStatus { expected, status } => {
                assert_eq!(expected, OrderStatus::Pending);
                assert_eq!(status, OrderStatus::Cooked);
            }
            _ => panic!("Unexpected action: {:?}", action),
        }
        responder.send(Ok(OrderActionResult::StatusChanged { current: OrderStatus::Cooking })).unwrap();

        let err = task.await.unwrap().unwrap_err();
        assert_eq!(err, OrderError::OrderConflict { order_id: 1, current: OrderStatus::Cooking });
    }

    #[tokio::test]
    async fn test_edit_order_publishes_cooked_and_update() {
        let mut m = mocks();
        let mut cooked = m.bus.subscribe(Topic::NewCookedOrder, CallerIdentity::delivery(2), CookedOrdersFilter);
        let client = m.client.clone();
        let task = tokio::spawn(async move {
            client.edit_order(&CallerIdentity::owner(9), 1, OrderStatus::Cooked).await
        });

        let (_, responder) = expect_get(&mut m.orders).await.unwrap();
        responder.send(Ok(Some(stored_order(OrderStatus::Cooking, None)))).unwrap();
        let (_, responder) = expect_get(&mut m.restaurants).await.unwrap();
        responder.send(Ok(Some(restaurant()))).unwrap();
        let (_, _, responder) = expect_action(&mut m.orders).await.unwrap();
        responder.send(Ok(OrderActionResult::StatusSet(stored_order(OrderStatus::Cooked, None)))).unwrap();

        let updated = task.await.unwrap().unwrap();
        assert_eq!(updated.status, OrderStatus::Cooked);
        assert_eq!(cooked.next().await.unwrap().order().status, OrderStatus::Cooked);
    }

    #[tokio::test]
    async fn test_take_order_missing_order() {
        let mut m = mocks();
        let client = m.client.clone();
        let task = tokio::spawn(async move {
            client.take_order(&CallerIdentity::delivery(2), 5).await
        });

        let (id, responder) = expect_get(&mut m.orders).await.expect("Expected Order Get");
        assert_eq!(id, 5);
        responder.send(Ok(None)).unwrap();

        assert_eq!(task.await.unwrap().unwrap_err(), OrderError::OrderNotFound(5));
    }

    #[tokio::test]
    async fn test_take_order_removed_before_claim() {
        let mut m = mocks();
        let client = m.client.clone();
        let task = tokio::spawn(async move {
            client.take_order(&CallerIdentity::delivery(2), 1).await
        });

        let (_, responder) = expect_get(&mut m.orders).await.unwrap();
        responder.send(Ok(Some(stored_order(OrderStatus::Cooked, None)))).unwrap();
        let (_, responder) = expect_get(&mut m.restaurants).await.unwrap();
        responder.send(Ok(Some(restaurant()))).unwrap();
        let (_, _, responder) = expect_action(&mut m.orders).await.expect("Expected Order Action");
        responder.send(Err(FrameworkError::NotFound("1".to_string()))).unwrap();

        assert_eq!(task.await.unwrap().unwrap_err(), OrderError::OrderNotFound(1));
    }

    #[tokio::test]
    async fn test_take_order_does_not_claim_when_owner_lookup_fails() {
        let mut m = mocks();
        let mut updates = m.bus.subscribe(
            Topic::NewOrderUpdate,
            CallerIdentity::client(1),
            crate::events::OrderUpdateFilter::new(1),
        );
        let client = m.client.clone();
        let task = tokio::spawn(async move {
            client.take_order(&CallerIdentity::delivery(2), 1).await
        });

        let (_, responder) = expect_get(&mut m.orders).await.unwrap();
        responder.send(Ok(Some(stored_order(OrderStatus::Cooked, None)))).unwrap();
        let (_, responder) = expect_get(&mut m.restaurants).await.expect("Expected Restaurant Get");
        responder.send(Err(FrameworkError::ActorDropped)).unwrap();

        let err = task.await.unwrap().unwrap_err();
        assert_eq!(err.kind(), crate::order_actor::ErrorKind::PersistenceFailure);
        // The claim was never sent to the store, so a retry can still succeed.
        assert!(m.orders.try_recv().is_err());
        assert!(tokio::time::timeout(std::time::Duration::from_millis(50), updates.next()).await.is_err());
    }

    #[tokio::test]
    async fn test_take_order_publishes_update_with_owner() {
        let mut m = mocks();
        let mut updates = m.bus.subscribe(
            Topic::NewOrderUpdate,
            CallerIdentity::owner(9),
            crate::events::OrderUpdateFilter::new(1),
        );
        let client = m.client.clone();
        let task = tokio::spawn(async move {
            client.take_order(&CallerIdentity::delivery(2), 1).await
        });

        let (_, responder) = expect_get(&mut m.orders).await.unwrap();
        responder.send(Ok(Some(stored_order(OrderStatus::Cooked, None)))).unwrap();
        let (_, responder) = expect_get(&mut m.restaurants).await.unwrap();
        responder.send(Ok(Some(restaurant()))).unwrap();
        let (_, action, responder) = expect_action(&mut m.orders).await.unwrap();
        assert!(matches!(action, OrderAction::Claim { driver_id: 2 }));
        responder.send(Ok(OrderActionResult::Claimed(stored_order(OrderStatus::Cooked, Some(2))))).unwrap();

        assert_eq!(task.await.unwrap().unwrap().driver_id, Some(2));
        match updates.next().await.unwrap() {
            OrderEvent::NewOrderUpdate { order, owner_id } => {
                assert_eq!(order.driver_id, Some(2));
                assert_eq!(owner_id, Some(9));
            }
            other => panic!("Unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_order_unknown_dish_stores_no_items() {
        let mut m = mocks();
        let client = m.client.clone();
        let task = tokio::spawn(async move {
            let cart = vec![CartItem::new(3, vec![]), CartItem::new(4, vec![])];
            client.create_order(&CallerIdentity::client(1), 7, cart).await
        });

        let (_, responder) = expect_get(&mut m.restaurants).await.unwrap();
        responder.send(Ok(Some(restaurant()))).unwrap();

        let (id, responder) = expect_get(&mut m.dishes).await.unwrap();
        assert_eq!(id, 3);
        let dish = Dish { id: 3, restaurant_id: 7, name: "Ramen".into(), price: 1000, options: vec![] };
        responder.send(Ok(Some(dish))).unwrap();
        let (id, responder) = expect_get(&mut m.dishes).await.unwrap();
        assert_eq!(id, 4);
        responder.send(Ok(None)).unwrap();

        assert_eq!(task.await.unwrap().unwrap_err(), OrderError::DishNotFound(4));
        assert!(m.items.try_recv().is_err());
        assert!(m.orders.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_take_order_requires_driver_role() {
        let m = mocks();
        let err = m.client.take_order(&CallerIdentity::client(1), 1).await.unwrap_err();
        assert_eq!(err, OrderError::NotAuthorized);
    }

    #[tokio::test]
    async fn test_store_outage_is_a_persistence_failure() {
        let m = mocks();
        drop(m.orders);
        let err = m.client.get_order(&CallerIdentity::client(1), 1).await.unwrap_err();
        assert_eq!(err.kind(), crate::order_actor::ErrorKind::PersistenceFailure);
    }
}
