//! The outbound messaging boundary.
//!
//! The engine publishes through [`GameBus`] and never knows what carries
//! the events. [`BroadcastBus`] is the in-process implementation: one
//! `tokio::sync::broadcast` channel per topic, lazily created, delivery
//! best-effort (a topic nobody subscribes to drops its events).

use dashmap::DashMap;
use tokio::sync::broadcast;
use trustmarket_types::{GameEvent, PlayerId, SessionId, event::topics};

/// Where game events go. Publishing is fire-and-forget; a bus never
/// surfaces delivery failures back into game logic.
pub trait GameBus: Send + Sync + 'static {
    /// Publish on the event's public topic for the session.
    fn publish(&self, session: &SessionId, event: &GameEvent);

    /// Publish on one player's private queue.
    fn publish_to_player(&self, player: &PlayerId, event: &GameEvent);
}

const TOPIC_CAPACITY: usize = 64;

/// In-memory bus over per-topic broadcast channels.
#[derive(Debug, Default)]
pub struct BroadcastBus {
    topics: DashMap<String, broadcast::Sender<GameEvent>>,
}

impl BroadcastBus {
    #[must_use]
    pub fn new() -> Self {
        Self {
            topics: DashMap::new(),
        }
    }

    fn sender(&self, topic: &str) -> broadcast::Sender<GameEvent> {
        self.topics
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(TOPIC_CAPACITY).0)
            .clone()
    }

    /// Subscribe to a raw topic string.
    pub fn subscribe(&self, topic: &str) -> broadcast::Receiver<GameEvent> {
        self.sender(topic).subscribe()
    }

    /// Subscribe to a session's main room topic.
    pub fn subscribe_room(&self, session: &SessionId) -> broadcast::Receiver<GameEvent> {
        self.subscribe(&topics::room(session))
    }

    /// Subscribe to a player's private queue.
    pub fn subscribe_private(&self, player: &PlayerId) -> broadcast::Receiver<GameEvent> {
        self.subscribe(&topics::private(player))
    }

    fn send(&self, topic: &str, event: &GameEvent) {
        // Err means no live receivers; that's fine.
        let _ = self.sender(topic).send(event.clone());
    }
}

impl GameBus for BroadcastBus {
    fn publish(&self, session: &SessionId, event: &GameEvent) {
        self.send(&event.topic(session), event);
    }

    fn publish_to_player(&self, player: &PlayerId, event: &GameEvent) {
        self.send(&topics::private(player), event);
    }
}

#[cfg(test)]
mod tests {
    use trustmarket_types::HiddenRole;

    use super::*;

    #[tokio::test]
    async fn room_events_reach_room_subscribers() {
        let bus = BroadcastBus::new();
        let sid = SessionId::new("r1");
        let mut rx = bus.subscribe(&topics::error(&sid));

        bus.publish(
            &sid,
            &GameEvent::RoomError {
                message: "market crash".to_string(),
            },
        );

        let ev = rx.recv().await.unwrap();
        assert!(matches!(ev, GameEvent::RoomError { message } if message == "market crash"));
    }

    #[tokio::test]
    async fn private_events_stay_private() {
        let bus = BroadcastBus::new();
        let sid = SessionId::new("r1");
        let p1 = PlayerId::new("p1");
        let mut room = bus.subscribe_room(&sid);
        let mut private = bus.subscribe_private(&p1);

        bus.publish_to_player(
            &p1,
            &GameEvent::HiddenRoleReveal {
                role: HiddenRole::Scammer,
            },
        );

        assert!(matches!(
            private.recv().await.unwrap(),
            GameEvent::HiddenRoleReveal {
                role: HiddenRole::Scammer
            }
        ));
        assert!(matches!(
            room.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_a_no_op() {
        let bus = BroadcastBus::new();
        bus.publish(
            &SessionId::new("empty"),
            &GameEvent::RoomError {
                message: "nobody listening".to_string(),
            },
        );
    }
}
