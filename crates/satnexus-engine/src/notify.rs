//! In-process notification hub
//!
//! Fans notifications out over tokio broadcast channels: one for the global
//! topic and one per analysis room. Rooms are created lazily when the first
//! subscriber joins. New analyses are announced on the global topic only; a
//! room carries events about an analysis that already exists. Publishing never
//! blocks, and slow receivers lag and lose the oldest events.

use satnexus_core::error::{Result, SatnexusError};
use satnexus_core::models::AnalysisId;
use satnexus_core::ports::{Notification, Notifier, Topic};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;

/// Channel capacity for each topic
const CHANNEL_CAPACITY: usize = 256;

/// Broadcast-backed implementation of [`Notifier`]
#[derive(Clone, Debug)]
pub struct NotificationHub {
    global: broadcast::Sender<Notification>,
    rooms: Arc<RwLock<HashMap<AnalysisId, broadcast::Sender<Notification>>>>,
    capacity: usize,
}

impl NotificationHub {
    pub fn new() -> Self {
        Self::with_capacity(CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (global, _) = broadcast::channel(capacity);
        Self { global, rooms: Arc::new(RwLock::new(HashMap::new())), capacity }
    }

    /// Receive every notification published to the global topic
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.global.subscribe()
    }

    /// Join the room of a single analysis
    pub fn subscribe_room(&self, id: AnalysisId) -> Result<broadcast::Receiver<Notification>> {
        let mut rooms = self
            .rooms
            .write()
            .map_err(|_| SatnexusError::storage("Notification room registry poisoned"))?;

        let sender = rooms.entry(id).or_insert_with(|| broadcast::channel(self.capacity).0);
        Ok(sender.subscribe())
    }

    /// Number of receivers currently subscribed to the global topic
    pub fn subscriber_count(&self) -> usize {
        self.global.receiver_count()
    }

    /// Drop rooms nobody listens to anymore
    pub fn prune_rooms(&self) {
        if let Ok(mut rooms) = self.rooms.write() {
            rooms.retain(|_, sender| sender.receiver_count() > 0);
        }
    }
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for NotificationHub {
    fn publish(&self, topic: Topic, notification: Notification) -> Result<usize> {
        let sender = match topic {
            Topic::Global => Some(self.global.clone()),
            Topic::Analysis(id) => self
                .rooms
                .read()
                .map_err(|_| SatnexusError::storage("Notification room registry poisoned"))?
                .get(&id)
                .cloned(),
        };

        // No subscribers is not an error
        let delivered = sender.and_then(|s| s.send(notification).ok()).unwrap_or(0);

        tracing::debug!(topic = %topic, delivered, "Published notification");
        Ok(delivered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use satnexus_core::geo::LatLng;
    use satnexus_core::models::{AnalysisDetail, Image, ImageId, UserId};
    use std::collections::BTreeSet;

    fn notification(id: AnalysisId) -> Notification {
        let now = Utc::now();
        let image = Image {
            id: ImageId::new(),
            title: "scene".to_string(),
            description: None,
            image_url: "/uploads/scene.png".to_string(),
            coordinates: LatLng::new(0.0, 0.0),
            date_taken: now,
            uploaded_by: UserId::new("u1"),
            tags: BTreeSet::new(),
            created_at: now,
            updated_at: now,
        };
        Notification::NewAnalysis(Box::new(AnalysisDetail {
            id,
            title: "T".to_string(),
            description: None,
            before_image: image.clone(),
            after_image: image,
            change_map: "/uploads/change-map.png".to_string(),
            change_percentage: 1.0,
            change_areas: vec![],
            created_by: UserId::new("u1"),
            creator: None,
            is_public: false,
            created_at: now,
            updated_at: now,
        }))
    }

    #[tokio::test]
    async fn test_publish_without_subscribers() {
        let hub = NotificationHub::new();
        let id = AnalysisId::new();
        assert_eq!(hub.publish(Topic::Global, notification(id)).unwrap(), 0);
        assert_eq!(hub.publish(Topic::Analysis(id), notification(id)).unwrap(), 0);
    }

    #[tokio::test]
    async fn test_global_fan_out() {
        let hub = NotificationHub::new();
        let mut a = hub.subscribe();
        let mut b = hub.subscribe();
        assert_eq!(hub.subscriber_count(), 2);

        let id = AnalysisId::new();
        assert_eq!(hub.publish(Topic::Global, notification(id)).unwrap(), 2);

        for rx in [&mut a, &mut b] {
            match rx.recv().await.unwrap() {
                Notification::NewAnalysis(detail) => assert_eq!(detail.id, id),
            }
        }
    }

    #[tokio::test]
    async fn test_rooms_are_isolated() {
        let hub = NotificationHub::new();
        let watched = AnalysisId::new();
        let other = AnalysisId::new();
        let mut room = hub.subscribe_room(watched).unwrap();
        let mut global = hub.subscribe();

        assert_eq!(hub.publish(Topic::Analysis(other), notification(other)).unwrap(), 0);
        assert_eq!(hub.publish(Topic::Analysis(watched), notification(watched)).unwrap(), 1);

        match room.recv().await.unwrap() {
            Notification::NewAnalysis(detail) => assert_eq!(detail.id, watched),
        }
        assert!(room.try_recv().is_err());
        assert!(global.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_prune_rooms() {
        let hub = NotificationHub::new();
        let id = AnalysisId::new();
        let room = hub.subscribe_room(id).unwrap();
        drop(room);

        hub.prune_rooms();
        assert!(hub.rooms.read().unwrap().is_empty());
    }

    #[test]
    fn test_wire_format() {
        let id = AnalysisId::new();
        let json = serde_json::to_value(notification(id)).unwrap();
        assert_eq!(json["event"], "new-analysis");
        assert_eq!(json["data"]["id"], id.to_string());
    }
}
