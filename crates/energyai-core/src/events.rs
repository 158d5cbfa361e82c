use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Notifications raised by the progression model.
/// Views subscribe to them; each fires at most once per learner action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// Points were added to the learner's total (after the streak multiplier).
    PointsAwarded {
        amount: u64,
        reason: String,
        at: DateTime<Utc>,
    },
    /// The learner reached a higher level.
    LevelUp {
        new_level: u32,
        title: String,
        at: DateTime<Utc>,
    },
    AchievementUnlocked {
        id: String,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Event::PointsAwarded { at, .. }
            | Event::LevelUp { at, .. }
            | Event::AchievementUnlocked { at, .. } => *at,
        }
    }
}

/// Handle returned by `subscribe`, used to detach an observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);

/// Returns `false` once the observer is gone; it is then dropped from the bus.
pub(crate) type Callback = Box<dyn FnMut(&Event) -> bool + Send>;

/// Observer list. Delivery is synchronous and in subscription order.
#[derive(Default)]
pub(crate) struct EventBus {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Callback)>,
}

impl EventBus {
    pub(crate) fn subscribe(&mut self, callback: Callback) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, callback));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    pub(crate) fn publish(&mut self, events: Vec<Event>) {
        for event in &events {
            self.subscribers.retain_mut(|(id, callback)| {
                let alive = callback(event);
                if !alive {
                    debug!(subscription = id.0, "dropping disconnected observer");
                }
                alive
            });
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.subscribers.len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn points(amount: u64) -> Event {
        Event::PointsAwarded {
            amount,
            reason: "test".into(),
            at: Utc::now(),
        }
    }

    #[test]
    fn publish_reaches_every_subscriber_in_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut bus = EventBus::default();
        for tag in ["a", "b"] {
            let seen = Arc::clone(&seen);
            bus.subscribe(Box::new(move |e| {
                if let Event::PointsAwarded { amount, .. } = e {
                    seen.lock().unwrap().push(format!("{tag}{amount}"));
                }
                true
            }));
        }
        bus.publish(vec![points(1), points(2)]);
        assert_eq!(*seen.lock().unwrap(), vec!["a1", "b1", "a2", "b2"]);
    }

    #[test]
    fn unsubscribe_detaches_only_that_observer() {
        let mut bus = EventBus::default();
        let first = bus.subscribe(Box::new(|_| true));
        let _second = bus.subscribe(Box::new(|_| true));
        assert!(bus.unsubscribe(first));
        assert!(!bus.unsubscribe(first));
        assert_eq!(bus.len(), 1);
    }

    #[test]
    fn disconnected_observer_is_dropped_on_publish() {
        let mut bus = EventBus::default();
        let calls = Arc::new(Mutex::new(0usize));
        let sink = Arc::clone(&calls);
        bus.subscribe(Box::new(move |_| {
            *sink.lock().unwrap() += 1;
            false
        }));
        bus.subscribe(Box::new(|_| true));
        bus.publish(vec![points(1), points(2)]);
        assert_eq!(*calls.lock().unwrap(), 1);
        assert_eq!(bus.len(), 1);
    }

    #[test]
    fn events_serialize_with_type_tag() {
        let json = serde_json::to_value(Event::AchievementUnlocked {
            id: "streak_7".into(),
            at: Utc::now(),
        })
        .unwrap();
        assert_eq!(json["type"], "AchievementUnlocked");
        assert_eq!(json["id"], "streak_7");
    }
}
