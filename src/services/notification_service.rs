//! Centro de notificaciones
//!
//! Una cola FIFO acotada por usuario. Los handlers publican aquí el resultado
//! de cada acción; el dashboard las lista y las descarta una a una.

use chrono::Utc;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{Notification, NotificationKind};

pub const DEFAULT_QUEUE_CAPACITY: usize = 50;

#[derive(Clone)]
pub struct NotificationCenter {
    queues: Arc<RwLock<HashMap<String, VecDeque<Notification>>>>,
    capacity: usize,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_QUEUE_CAPACITY)
    }
}

impl NotificationCenter {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            queues: Arc::new(RwLock::new(HashMap::new())),
            capacity: capacity.max(1),
        }
    }

    /// Publica una notificación; si la cola está llena se descarta la más antigua
    pub async fn push(
        &self,
        user_id: &str,
        kind: NotificationKind,
        message: impl Into<String>,
    ) -> Notification {
        let notification = Notification {
            id: Uuid::new_v4().to_string(),
            message: message.into(),
            kind,
            created_at: Utc::now(),
        };

        let mut queues = self.queues.write().await;
        let queue = queues.entry(user_id.to_string()).or_default();
        while queue.len() >= self.capacity {
            queue.pop_front();
        }
        queue.push_back(notification.clone());
        notification
    }

    /// Notificaciones pendientes, de la más antigua a la más reciente
    pub async fn list(&self, user_id: &str) -> Vec<Notification> {
        let queues = self.queues.read().await;
        queues
            .get(user_id)
            .map(|queue| queue.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Devuelve `false` si no existía
    pub async fn dismiss(&self, user_id: &str, notification_id: &str) -> bool {
        let mut queues = self.queues.write().await;
        let Some(queue) = queues.get_mut(user_id) else {
            return false;
        };
        let before = queue.len();
        queue.retain(|n| n.id != notification_id);
        queue.len() != before
    }

    /// Descarta todas; devuelve cuántas había
    pub async fn clear(&self, user_id: &str) -> usize {
        let mut queues = self.queues.write().await;
        queues.remove(user_id).map(|q| q.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_queue_is_fifo_and_bounded() {
        let center = NotificationCenter::with_capacity(2);
        center.push("u1", NotificationKind::Info, "first").await;
        center.push("u1", NotificationKind::Info, "second").await;
        center.push("u1", NotificationKind::Success, "third").await;

        let messages: Vec<String> = center
            .list("u1")
            .await
            .into_iter()
            .map(|n| n.message)
            .collect();
        assert_eq!(messages, vec!["second", "third"]);
    }

    #[tokio::test]
    async fn test_dismiss_only_touches_own_queue() {
        let center = NotificationCenter::default();
        let mine = center.push("u1", NotificationKind::Warning, "delayed").await;
        center.push("u2", NotificationKind::Info, "other").await;

        assert!(!center.dismiss("u2", &mine.id).await);
        assert!(center.dismiss("u1", &mine.id).await);
        assert!(!center.dismiss("u1", &mine.id).await);
        assert!(center.list("u1").await.is_empty());
        assert_eq!(center.list("u2").await.len(), 1);
    }

    #[tokio::test]
    async fn test_clear() {
        let center = NotificationCenter::default();
        center.push("u1", NotificationKind::Error, "a").await;
        center.push("u1", NotificationKind::Error, "b").await;
        assert_eq!(center.clear("u1").await, 2);
        assert_eq!(center.clear("u1").await, 0);
    }
}
