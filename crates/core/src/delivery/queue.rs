use crate::error::{InsightsError, Result};
use insights_api::Payload;
use std::sync::Mutex;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// Fixed-capacity queue between report generation and delivery.
///
/// Submission never blocks; a full queue is reported to the caller, which
/// decides whether to drop the payload.
pub struct WorkQueue {
    tx: mpsc::Sender<Payload>,
    rx: Mutex<Option<mpsc::Receiver<Payload>>>,
    capacity: usize,
}

impl WorkQueue {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, rx) = mpsc::channel(capacity);
        Self {
            tx,
            rx: Mutex::new(Some(rx)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Payloads currently waiting.
    pub fn len(&self) -> usize {
        self.capacity - self.tx.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn submit(&self, payload: Payload) -> Result<()> {
        self.tx.try_send(payload).map_err(|e| match e {
            TrySendError::Full(p) => InsightsError::Delivery(format!(
                "work queue full ({} slots), dropping {} payload",
                self.capacity, p.kind
            )),
            TrySendError::Closed(p) => {
                InsightsError::Delivery(format!("work queue closed, dropping {} payload", p.kind))
            }
        })
    }

    /// The single consumer end; `None` once taken.
    pub fn take_receiver(&self) -> Option<mpsc::Receiver<Payload>> {
        self.rx.lock().unwrap_or_else(|e| e.into_inner()).take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insights_api::PayloadKind;

    fn payload(kind: PayloadKind) -> Payload {
        Payload {
            kind,
            id_hash: "id".to_string(),
            body: b"{}".to_vec(),
        }
    }

    #[test]
    fn test_full_queue_rejects() {
        let queue = WorkQueue::new(1);
        queue.submit(payload(PayloadKind::Connect)).unwrap();
        assert_eq!(queue.len(), 1);

        let err = queue.submit(payload(PayloadKind::Update)).unwrap_err();
        assert!(err.to_string().contains("full"));
    }

    #[test]
    fn test_receiver_taken_once() {
        let queue = WorkQueue::new(4);
        queue.submit(payload(PayloadKind::Connect)).unwrap();

        let mut rx = queue.take_receiver().unwrap();
        assert!(queue.take_receiver().is_none());
        assert_eq!(rx.try_recv().unwrap().kind, PayloadKind::Connect);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_closed_queue_rejects() {
        let queue = WorkQueue::new(2);
        drop(queue.take_receiver());
        assert!(queue.submit(payload(PayloadKind::Connect)).is_err());
    }
}
