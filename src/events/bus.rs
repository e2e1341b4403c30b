use std::panic::{catch_unwind, AssertUnwindSafe};
use futures::Stream;
use tokio::sync::broadcast;
use tracing::{debug, instrument, warn};
use crate::domain::CallerIdentity;
use super::{OrderEvent, SubscriptionFilter, Topic};

/// Broadcast hub with one channel per topic.
///
/// Constructed once by the system and handed to whoever publishes or
/// subscribes. Publishing on a topic delivers to its subscribers in publish
/// order; nothing is ordered across topics.
#[derive(Debug, Clone)]
pub struct EventBus {
    pending: broadcast::Sender<OrderEvent>,
    cooked: broadcast::Sender<OrderEvent>,
    updates: broadcast::Sender<OrderEvent>,
}

impl EventBus {
    /// `capacity` is how many events a slow subscriber may fall behind on
    /// each topic before it starts skipping.
    pub fn new(capacity: usize) -> Self {
        let (pending, _) = broadcast::channel(capacity);
        let (cooked, _) = broadcast::channel(capacity);
        let (updates, _) = broadcast::channel(capacity);
        Self { pending, cooked, updates }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<OrderEvent> {
        match topic {
            Topic::NewPendingOrder => &self.pending,
            Topic::NewCookedOrder => &self.cooked,
            Topic::NewOrderUpdate => &self.updates,
        }
    }

    /// Fire-and-forget. Returns how many subscriptions the event was handed to
    /// (before filtering).
    #[instrument(skip(self, event), fields(topic = %event.topic(), order_id = %event.order().id))]
    pub fn publish(&self, event: OrderEvent) -> usize {
        match self.sender(event.topic()).send(event) {
            Ok(receivers) => {
                debug!(receivers, "Event published");
                receivers
            }
            Err(_) => {
                debug!("Event published with no subscribers");
                0
            }
        }
    }

    /// Opens a filtered subscription for `caller` on `topic`.
    pub fn subscribe(
        &self,
        topic: Topic,
        caller: CallerIdentity,
        filter: impl SubscriptionFilter,
    ) -> Subscription {
        debug!(%topic, caller_id = caller.id, ?filter, "Subscription opened");
        Subscription {
            topic,
            caller,
            receiver: self.sender(topic).subscribe(),
            filter: Box::new(filter),
        }
    }

    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.sender(topic).receiver_count()
    }
}

/// A live, per-connection view of one topic. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    topic: Topic,
    caller: CallerIdentity,
    receiver: broadcast::Receiver<OrderEvent>,
    filter: Box<dyn SubscriptionFilter>,
}

impl Subscription {
    pub fn topic(&self) -> Topic {
        self.topic
    }

    /// Waits for the next event that passes the filter.
    ///
    /// Returns `None` only once the bus is gone.
    pub async fn next(&mut self) -> Option<OrderEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => {
                    if self.passes(&event) {
                        return Some(event);
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(topic = %self.topic, caller_id = self.caller.id, skipped, "Subscriber lagged, events skipped");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// A panicking filter drops the event instead of ending the subscription.
    fn passes(&self, event: &OrderEvent) -> bool {
        let filter = &self.filter;
        let caller = &self.caller;
        catch_unwind(AssertUnwindSafe(|| filter.accepts(event, caller))).unwrap_or_else(|_| {
            warn!(topic = %self.topic, caller_id = caller.id, order_id = event.order().id, "Subscription filter panicked, event dropped");
            false
        })
    }

    pub fn into_stream(self) -> impl Stream<Item = OrderEvent> {
        futures::stream::unfold(self, |mut subscription| async move {
            subscription.next().await.map(|event| (event, subscription))
        })
    }
}
