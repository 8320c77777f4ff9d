//! In-process change feed
//!
//! Listeners subscribe for a channel receiver and are told about every
//! record insert, update and delete committed through `Storage`. A
//! subscriber that dropped its receiver is pruned on the next publish.

use std::fmt;
use std::sync::mpsc;
use std::sync::Mutex;

use crate::audit::{EntityType, Operation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

impl From<Operation> for ChangeKind {
    fn from(operation: Operation) -> Self {
        match operation {
            Operation::Create => ChangeKind::Insert,
            Operation::Update => ChangeKind::Update,
            Operation::Delete => ChangeKind::Delete,
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeKind::Insert => write!(f, "insert"),
            ChangeKind::Update => write!(f, "update"),
            ChangeKind::Delete => write!(f, "delete"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub table: EntityType,
    pub kind: ChangeKind,
    pub id: String,
}

#[derive(Default)]
pub struct ChangeFeed {
    subscribers: Mutex<Vec<mpsc::Sender<ChangeEvent>>>,
}

impl ChangeFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for all subsequent changes
    pub fn subscribe(&self) -> mpsc::Receiver<ChangeEvent> {
        let (sender, receiver) = mpsc::channel();
        match self.subscribers.lock() {
            Ok(mut subscribers) => subscribers.push(sender),
            Err(poisoned) => poisoned.into_inner().push(sender),
        }
        receiver
    }

    /// Deliver an event to every live subscriber
    pub fn publish(&self, event: ChangeEvent) {
        let mut subscribers = match self.subscribers.lock() {
            Ok(subscribers) => subscribers,
            Err(poisoned) => poisoned.into_inner(),
        };
        subscribers.retain(|sender| sender.send(event.clone()).is_ok());
        tracing::trace!(
            table = %event.table,
            kind = %event.kind,
            id = %event.id,
            listeners = subscribers.len(),
            "change published"
        );
    }

    pub fn subscriber_count(&self) -> usize {
        match self.subscribers.lock() {
            Ok(subscribers) => subscribers.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(kind: ChangeKind) -> ChangeEvent {
        ChangeEvent {
            table: EntityType::Facility,
            kind,
            id: "fac-12345678".into(),
        }
    }

    #[test]
    fn test_every_subscriber_receives() {
        let feed = ChangeFeed::new();
        let first = feed.subscribe();
        let second = feed.subscribe();

        feed.publish(event(ChangeKind::Insert));

        assert_eq!(first.try_recv().unwrap(), event(ChangeKind::Insert));
        assert_eq!(second.try_recv().unwrap(), event(ChangeKind::Insert));
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let feed = ChangeFeed::new();
        let kept = feed.subscribe();
        drop(feed.subscribe());
        assert_eq!(feed.subscriber_count(), 2);

        feed.publish(event(ChangeKind::Delete));
        assert_eq!(feed.subscriber_count(), 1);
        assert_eq!(kept.try_recv().unwrap().kind, ChangeKind::Delete);
    }

    #[test]
    fn test_no_history_for_late_subscribers() {
        let feed = ChangeFeed::new();
        feed.publish(event(ChangeKind::Update));
        let late = feed.subscribe();
        assert!(late.try_recv().is_err());
    }

    #[test]
    fn test_kind_from_operation() {
        assert_eq!(ChangeKind::from(Operation::Create), ChangeKind::Insert);
        assert_eq!(ChangeKind::from(Operation::Update), ChangeKind::Update);
        assert_eq!(ChangeKind::from(Operation::Delete), ChangeKind::Delete);
    }
}
