use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::entities::job_card::JobStatus;

/// Domain events emitted by the service layer after a successful commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Customer events
    CustomerCreated(Uuid),
    CustomerUpdated(Uuid),
    CustomerDeleted(Uuid),

    // Vehicle events
    VehicleCreated(Uuid),
    VehicleUpdated(Uuid),
    VehicleDeleted(Uuid),

    // Job card events
    JobCardCreated(Uuid),
    JobCardUpdated(Uuid),
    JobCardDeleted(Uuid),
    JobCardStatusChanged {
        job_card_id: Uuid,
        old_status: JobStatus,
        new_status: JobStatus,
    },
    JobNoteAdded {
        job_card_id: Uuid,
        note_id: Uuid,
    },

    // Inspection events
    InspectionReportCreated {
        job_card_id: Uuid,
        report_id: Uuid,
    },
    InspectionReportUpdated(Uuid),
    InspectionReportDeleted(Uuid),

    // Quotation events
    QuotationCreated {
        job_card_id: Uuid,
        quotation_id: Uuid,
        quotation_number: String,
    },
    QuotationUpdated(Uuid),
    QuotationDeleted(Uuid),
}

/// Cloneable handle for emitting events into the in-process channel.
#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously.
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {e}"))
    }
}

/// Consumes events for the lifetime of the process. The channel only
/// feeds the structured log today; the loop is the seam for outbound
/// integrations.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    info!("Event processor started");
    while let Some(event) = receiver.recv().await {
        match &event {
            Event::JobCardStatusChanged {
                job_card_id,
                old_status,
                new_status,
            } => {
                info!(
                    job_card_id = %job_card_id,
                    old_status = %old_status,
                    new_status = %new_status,
                    "Job card status changed"
                );
            }
            Event::QuotationCreated {
                quotation_number, ..
            } => {
                info!(quotation_number = %quotation_number, "Quotation issued");
            }
            other => {
                info!(event = ?other, "Domain event");
            }
        }
    }
    warn!("Event channel closed; event processor stopping");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_delivers_to_receiver() {
        let (tx, mut rx) = mpsc::channel(4);
        let sender = EventSender::new(tx);
        let id = Uuid::new_v4();

        sender.send(Event::CustomerCreated(id)).await.unwrap();

        match rx.recv().await {
            Some(Event::CustomerCreated(received)) => assert_eq!(received, id),
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
