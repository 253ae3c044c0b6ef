use crate::dev::{ReloadEvent, SharedHub};
use crate::notification::{Notification, Notifier};

/// Shows step failures in connected browsers.
pub struct BrowserNotifier {
    hub: SharedHub,
}

impl BrowserNotifier {
    pub fn new(hub: SharedHub) -> Self {
        Self { hub }
    }
}

impl Notifier for BrowserNotifier {
    fn notify(&self, notification: &Notification) {
        self.hub.broadcast(&ReloadEvent::Error {
            title: notification.title.clone(),
            message: notification.message.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dev::ReloadHub;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_forwards_error_event() {
        let hub = Arc::new(ReloadHub::new());
        let (_, mut rx) = hub.register_client();

        BrowserNotifier::new(hub.clone()).notify(&Notification::new("Styles", "bad"));

        let json = rx.recv().await.unwrap();
        let event: ReloadEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(
            event,
            ReloadEvent::Error {
                title: "Styles".to_string(),
                message: "bad".to_string()
            }
        );
    }
}
