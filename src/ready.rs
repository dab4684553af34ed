//! One-shot readiness signal for data loaded in the background.
//!
//! A [`Publisher`] hands a value over exactly once; any number of [`Ready`]
//! handles can poll for it or wait until it arrives.

use std::sync::Arc;

use tokio::sync::watch;

/// Create a linked publisher / subscriber pair
pub fn channel<T>() -> (Publisher<T>, Ready<T>) {
    let (tx, rx) = watch::channel(None);
    (Publisher { tx }, Ready { rx })
}

/// Sending half; consumed on publish
pub struct Publisher<T> {
    tx: watch::Sender<Option<Arc<T>>>,
}

impl<T> Publisher<T> {
    pub fn publish(self, value: T) {
        // send_replace stores the value even when no subscriber is alive
        self.tx.send_replace(Some(Arc::new(value)));
    }
}

/// Receiving half
pub struct Ready<T> {
    rx: watch::Receiver<Option<Arc<T>>>,
}

impl<T> Clone for Ready<T> {
    fn clone(&self) -> Self {
        Self {
            rx: self.rx.clone(),
        }
    }
}

impl<T> Ready<T> {
    /// Value published so far, if any
    pub fn get(&self) -> Option<Arc<T>> {
        self.rx.borrow().clone()
    }

    pub fn is_ready(&self) -> bool {
        self.rx.borrow().is_some()
    }

    /// True once the publisher was dropped without publishing
    pub fn is_abandoned(&self) -> bool {
        let empty = self.rx.borrow().is_none();
        empty && self.rx.has_changed().is_err()
    }

    /// Wait for the value. Resolves to `None` if the publisher was dropped
    /// without publishing.
    pub async fn wait(&self) -> Option<Arc<T>> {
        let mut rx = self.rx.clone();
        if let Ok(value) = rx.wait_for(Option::is_some).await {
            return value.clone();
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_get_before_and_after_publish() {
        let (publisher, ready) = channel::<u32>();
        assert!(ready.get().is_none());
        assert!(!ready.is_ready());

        publisher.publish(7);
        assert_eq!(ready.get().as_deref(), Some(&7));
        assert!(ready.is_ready());
    }

    #[tokio::test]
    async fn test_wait_resolves_when_published() {
        let (publisher, ready) = channel::<String>();
        let waiter = {
            let ready = ready.clone();
            tokio::spawn(async move { ready.wait().await })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        publisher.publish("loaded".to_string());

        let value = waiter.await.unwrap();
        assert_eq!(value.as_deref().map(String::as_str), Some("loaded"));
    }

    #[tokio::test]
    async fn test_wait_after_publish_returns_immediately() {
        let (publisher, ready) = channel::<u32>();
        publisher.publish(1);
        assert_eq!(ready.wait().await.as_deref(), Some(&1));
    }

    #[tokio::test]
    async fn test_dropped_publisher_resolves_none() {
        let (publisher, ready) = channel::<u32>();
        assert!(!ready.is_abandoned());
        drop(publisher);
        assert!(ready.is_abandoned());
        assert!(ready.wait().await.is_none());
    }

    #[tokio::test]
    async fn test_published_value_is_not_abandoned() {
        let (publisher, ready) = channel::<u32>();
        publisher.publish(3);
        assert!(!ready.is_abandoned());
        assert_eq!(ready.get().as_deref(), Some(&3));
    }
}
