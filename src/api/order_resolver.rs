use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use crate::clients::OrderClient;
use crate::order_actor::OrderError;
use crate::domain::{CartItem, Order, OrderId, OrderStatus, RestaurantId, UserRole};
use crate::events::{
    CookedOrdersFilter, EventBus, OrderUpdateFilter, PendingOrdersFilter, Subscription, Topic,
};
use super::{authorize, AllowedRoles, GuardError, Output, RequestContext};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderInput {
    pub restaurant_id: RestaurantId,
    pub items: Vec<CartItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EditOrderInput {
    pub id: OrderId,
    pub status: OrderStatus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderPayload {
    pub order_id: OrderId,
}

#[derive(Debug, Clone, Serialize)]
pub struct GetOrderPayload {
    pub order: Order,
}

#[derive(Debug, Clone, Serialize)]
pub struct GetOrdersPayload {
    pub orders: Vec<Order>,
}

/// Queries, mutations and subscriptions over orders, each behind a role guard.
#[derive(Clone)]
pub struct OrderResolver {
    orders: OrderClient,
    bus: EventBus,
}

impl OrderResolver {
    pub fn new(orders: OrderClient, bus: EventBus) -> Self {
        Self { orders, bus }
    }

    #[instrument(skip(self, ctx))]
    pub async fn get_order(&self, ctx: &RequestContext, order_id: OrderId) -> Output<GetOrderPayload> {
        let caller = match authorize(ctx, AllowedRoles::Any) {
            Ok(caller) => caller,
            Err(e) => return Output::fail(e),
        };
        settle(self.orders.get_order(&caller, order_id).await.map(|order| GetOrderPayload { order }))
    }

    #[instrument(skip(self, ctx))]
    pub async fn get_orders(&self, ctx: &RequestContext, status: Option<OrderStatus>) -> Output<GetOrdersPayload> {
        let caller = match authorize(ctx, AllowedRoles::Any) {
            Ok(caller) => caller,
            Err(e) => return Output::fail(e),
        };
        settle(self.orders.get_orders(&caller, status).await.map(|orders| GetOrdersPayload { orders }))
    }

    #[instrument(skip(self, ctx, input), fields(restaurant_id = input.restaurant_id))]
    pub async fn create_order(&self, ctx: &RequestContext, input: CreateOrderInput) -> Output<CreateOrderPayload> {
        let customer = match authorize(ctx, AllowedRoles::Only(UserRole::Client)) {
            Ok(caller) => caller,
            Err(e) => return Output::fail(e),
        };
        settle(
            self.orders
                .create_order(&customer, input.restaurant_id, input.items)
                .await
                .map(|order| CreateOrderPayload { order_id: order.id }),
        )
    }

    #[instrument(skip(self, ctx))]
    pub async fn edit_order(&self, ctx: &RequestContext, input: EditOrderInput) -> Output<()> {
        let caller = match authorize(ctx, AllowedRoles::Any) {
            Ok(caller) => caller,
            Err(e) => return Output::fail(e),
        };
        settle(self.orders.edit_order(&caller, input.id, input.status).await.map(|_| ()))
    }

    #[instrument(skip(self, ctx))]
    pub async fn take_order(&self, ctx: &RequestContext, order_id: OrderId) -> Output<()> {
        let driver = match authorize(ctx, AllowedRoles::Only(UserRole::Delivery)) {
            Ok(caller) => caller,
            Err(e) => return Output::fail(e),
        };
        settle(self.orders.take_order(&driver, order_id).await.map(|_| ()))
    }

    /// New orders at the calling owner's restaurants.
    pub fn pending_orders(&self, ctx: &RequestContext) -> Result<Subscription, GuardError> {
        let owner = authorize(ctx, AllowedRoles::Only(UserRole::Owner))?;
        info!(caller_id = owner.id, "pendingOrders subscription");
        Ok(self.bus.subscribe(Topic::NewPendingOrder, owner, PendingOrdersFilter))
    }

    /// Every cooked order, for any driver.
    pub fn cooked_orders(&self, ctx: &RequestContext) -> Result<Subscription, GuardError> {
        let driver = authorize(ctx, AllowedRoles::Only(UserRole::Delivery))?;
        info!(caller_id = driver.id, "cookedOrders subscription");
        Ok(self.bus.subscribe(Topic::NewCookedOrder, driver, CookedOrdersFilter))
    }

    /// Updates of one order, for its customer, driver or restaurant owner.
    pub fn order_update(&self, ctx: &RequestContext, order_id: OrderId) -> Result<Subscription, GuardError> {
        let caller = authorize(ctx, AllowedRoles::Any)?;
        info!(caller_id = caller.id, order_id, "orderUpdate subscription");
        Ok(self.bus.subscribe(Topic::NewOrderUpdate, caller, OrderUpdateFilter::new(order_id)))
    }
}

/// Folds an order result into the tagged output, logging the failure kind.
fn settle<T>(result: Result<T, OrderError>) -> Output<T> {
    if let Err(e) = &result {
        warn!(kind = ?e.kind(), error = %e, "Order operation failed");
    }
    result.into()
}
