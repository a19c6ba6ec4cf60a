use std::collections::HashMap;

use telecast_core::{ChangeNotification, EventCategory};
use tokio::sync::broadcast;
use tracing::trace;

/// In-process fan-out of change notifications.
///
/// One bounded [`broadcast`] channel per [`EventCategory`]. When a
/// receiver falls more than the buffer capacity behind, the oldest
/// buffered notifications are dropped and the receiver observes a
/// [`broadcast::error::RecvError::Lagged`] marker — an explicit
/// drop-oldest policy, acceptable because every notification carries the
/// full snapshot and only the latest one matters.
#[derive(Debug, Clone)]
pub struct Notifier {
    channels: HashMap<EventCategory, broadcast::Sender<ChangeNotification>>,
}

impl Notifier {
    /// Creates a notifier buffering up to `capacity` notifications per category.
    pub fn new(capacity: usize) -> Self {
        let channels = EventCategory::ALL
            .into_iter()
            .map(|category| (category, broadcast::channel(capacity).0))
            .collect();
        Notifier { channels }
    }

    /// Subscribes to one category's notifications.
    pub fn subscribe(&self, category: EventCategory) -> broadcast::Receiver<ChangeNotification> {
        self.channels[&category].subscribe()
    }

    /// Broadcasts a notification to the subscribers of its category.
    ///
    /// Returns how many receivers the notification reached; zero means
    /// nobody is currently listening, which is not an error.
    pub fn notify(&self, notification: ChangeNotification) -> usize {
        let category = notification.category();
        match self.channels[&category].send(notification) {
            Ok(receivers) => receivers,
            Err(_) => {
                trace!(%category, "notification dropped, no subscribers");
                0
            }
        }
    }
}

impl Default for Notifier {
    fn default() -> Self {
        // Enough slack for bursty TVs; subscribers that lag past this see
        // a lag marker instead of stalling the notifier.
        Notifier::new(16)
    }
}

#[cfg(test)]
mod tests {
    use telecast_core::VolumeState;
    use tokio::sync::broadcast::error::RecvError;

    use super::*;

    fn volume_changed(level: u8) -> ChangeNotification {
        ChangeNotification::VolumeChanged(VolumeState {
            level,
            muted: false,
        })
    }

    #[tokio::test]
    async fn subscriber_receives_only_its_category() {
        let notifier = Notifier::new(4);
        let mut volume = notifier.subscribe(EventCategory::VolumeChanged);
        let mut power = notifier.subscribe(EventCategory::PowerStateChanged);

        assert_eq!(notifier.notify(volume_changed(20)), 1);
        assert_eq!(volume.recv().await.unwrap(), volume_changed(20));
        assert!(power.try_recv().is_err());
    }

    #[tokio::test]
    async fn without_subscribers_nothing_is_reached() {
        let notifier = Notifier::new(4);
        assert_eq!(notifier.notify(volume_changed(20)), 0);
    }

    #[tokio::test]
    async fn overflow_drops_oldest_and_marks_the_lag() {
        let notifier = Notifier::new(2);
        let mut receiver = notifier.subscribe(EventCategory::VolumeChanged);

        for level in 1..=3 {
            notifier.notify(volume_changed(level));
        }

        // The first notification was dropped; the receiver is told by how much.
        assert!(matches!(receiver.recv().await, Err(RecvError::Lagged(1))));
        assert_eq!(receiver.recv().await.unwrap(), volume_changed(2));
        assert_eq!(receiver.recv().await.unwrap(), volume_changed(3));
    }
}
