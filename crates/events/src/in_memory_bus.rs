//! Process-local bus used by tests and single-device setups.

use std::sync::{Mutex, mpsc};

use crate::bus::{EventBus, MessageFilter, Subscription};

#[derive(Debug, thiserror::Error)]
pub enum InMemoryBusError {
    #[error("subscriber registry lock poisoned")]
    LockPoisoned,
}

struct Subscriber<M> {
    outbox: mpsc::Sender<M>,
    filter: MessageFilter<M>,
}

/// Synchronous fan-out over std channels.
///
/// Subscribers whose receiving end was dropped are forgotten on the next publish
/// that would have reached them.
pub struct InMemoryEventBus<M> {
    subscribers: Mutex<Vec<Subscriber<M>>>,
}

impl<M> InMemoryEventBus<M> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().map(|subs| subs.len()).unwrap_or(0)
    }
}

impl<M> Default for InMemoryEventBus<M> {
    fn default() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
        }
    }
}

impl<M> core::fmt::Debug for InMemoryEventBus<M> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InMemoryEventBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl<M> EventBus<M> for InMemoryEventBus<M>
where
    M: Clone + Send + 'static,
{
    type Error = InMemoryBusError;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        let mut subs = self.subscribers.lock().map_err(|_| InMemoryBusError::LockPoisoned)?;
        subs.retain(|sub| !(sub.filter)(&message) || sub.outbox.send(message.clone()).is_ok());
        Ok(())
    }

    fn subscribe_filtered(&self, filter: MessageFilter<M>) -> Subscription<M> {
        let (outbox, inbox) = mpsc::channel();
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push(Subscriber { outbox, filter });
        }
        Subscription::new(inbox)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn every_subscriber_receives_each_message() {
        let bus = InMemoryEventBus::new();
        let banner = bus.subscribe();
        let feed = bus.subscribe();

        bus.publish("opened").unwrap();
        bus.publish("moved").unwrap();

        assert_eq!(banner.drain(), vec!["opened", "moved"]);
        assert_eq!(feed.drain(), vec!["opened", "moved"]);
    }

    #[test]
    fn filters_only_admit_matching_messages() {
        let bus = InMemoryEventBus::new();
        let evens = bus.subscribe_filtered(Arc::new(|n: &u32| n % 2 == 0));

        for n in 1..=5u32 {
            bus.publish(n).unwrap();
        }

        assert_eq!(evens.drain(), vec![2, 4]);
        assert_eq!(evens.poll(), None);
    }

    #[test]
    fn dropped_subscribers_are_forgotten() {
        let bus = InMemoryEventBus::new();
        let keep = bus.subscribe();
        drop(bus.subscribe());

        bus.publish(1u32).unwrap();

        assert_eq!(bus.subscriber_count(), 1);
        assert_eq!(keep.next_within(Duration::from_millis(10)), Some(1));
    }

    #[test]
    fn dropped_filtered_subscriber_lingers_until_a_message_matches() {
        let bus = InMemoryEventBus::new();
        drop(bus.subscribe_filtered(Arc::new(|n: &u32| *n > 10)));

        bus.publish(1u32).unwrap();
        assert_eq!(bus.subscriber_count(), 1);

        bus.publish(11u32).unwrap();
        assert_eq!(bus.subscriber_count(), 0);
    }
}
