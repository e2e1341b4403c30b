use std::fmt::Debug;
use crate::domain::{CallerIdentity, OrderId};
use super::OrderEvent;

/// Per-subscription predicate evaluated against each event on a topic.
///
/// Returning `false` drops the event for this subscriber only. A filter that
/// receives an event it does not understand must return `false`.
pub trait SubscriptionFilter: Send + Sync + Debug + 'static {
    fn accepts(&self, event: &OrderEvent, caller: &CallerIdentity) -> bool;
}

/// `pendingOrders`: owners hear about new orders at their own restaurants.
#[derive(Debug, Clone, Copy, Default)]
pub struct PendingOrdersFilter;

impl SubscriptionFilter for PendingOrdersFilter {
    fn accepts(&self, event: &OrderEvent, caller: &CallerIdentity) -> bool {
        match event {
            OrderEvent::NewPendingOrder { owner_id, .. } => *owner_id == caller.id,
            _ => false,
        }
    }
}

/// `cookedOrders`: every driver hears about every cooked order.
#[derive(Debug, Clone, Copy, Default)]
pub struct CookedOrdersFilter;

impl SubscriptionFilter for CookedOrdersFilter {
    fn accepts(&self, event: &OrderEvent, _caller: &CallerIdentity) -> bool {
        matches!(event, OrderEvent::NewCookedOrder { .. })
    }
}

/// `orderUpdate(orderId)`: updates of one order, for the people involved in it.
#[derive(Debug, Clone, Copy)]
pub struct OrderUpdateFilter {
    pub order_id: OrderId,
}

impl OrderUpdateFilter {
    pub fn new(order_id: OrderId) -> Self {
        Self { order_id }
    }
}

impl SubscriptionFilter for OrderUpdateFilter {
    fn accepts(&self, event: &OrderEvent, caller: &CallerIdentity) -> bool {
        let OrderEvent::NewOrderUpdate { order, owner_id } = event else {
            return false;
        };
        if order.id != self.order_id {
            return false;
        }
        let me = Some(caller.id);
        order.customer_id == me || order.driver_id == me || *owner_id == me
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::domain::{Order, OrderStatus};

    fn order(id: OrderId) -> Order {
        let now = Utc::now();
        Order {
            id,
            customer_id: Some(1),
            driver_id: Some(2),
            restaurant_id: Some(7),
            items: vec![],
            total: 1000,
            status: OrderStatus::Cooking,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_pending_filter_matches_owner_only() {
        let event = OrderEvent::NewPendingOrder { order: order(1), owner_id: 9 };
        assert!(PendingOrdersFilter.accepts(&event, &CallerIdentity::owner(9)));
        assert!(!PendingOrdersFilter.accepts(&event, &CallerIdentity::owner(8)));
    }

    #[test]
    fn test_filters_reject_foreign_payloads() {
        let update = OrderEvent::NewOrderUpdate { order: order(1), owner_id: Some(9) };
        let cooked = OrderEvent::NewCookedOrder { order: order(1) };
        assert!(!PendingOrdersFilter.accepts(&update, &CallerIdentity::owner(9)));
        assert!(!CookedOrdersFilter.accepts(&update, &CallerIdentity::delivery(2)));
        assert!(!OrderUpdateFilter::new(1).accepts(&cooked, &CallerIdentity::client(1)));
    }

    #[test]
    fn test_order_update_requires_matching_order_and_involvement() {
        let event = OrderEvent::NewOrderUpdate { order: order(5), owner_id: Some(3) };
        let filter = OrderUpdateFilter::new(5);
        assert!(filter.accepts(&event, &CallerIdentity::client(1)));
        assert!(filter.accepts(&event, &CallerIdentity::delivery(2)));
        assert!(filter.accepts(&event, &CallerIdentity::owner(3)));
        assert!(!filter.accepts(&event, &CallerIdentity::client(4)));
        assert!(!OrderUpdateFilter::new(6).accepts(&event, &CallerIdentity::client(1)));
    }

    #[test]
    fn test_order_update_without_owner_still_reaches_customer() {
        let event = OrderEvent::NewOrderUpdate { order: order(5), owner_id: None };
        let filter = OrderUpdateFilter::new(5);
        assert!(filter.accepts(&event, &CallerIdentity::client(1)));
        assert!(!filter.accepts(&event, &CallerIdentity::owner(3)));
    }
}
