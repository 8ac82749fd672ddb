pub mod common;
pub mod customers;
pub mod dashboard;
pub mod health;
pub mod inspections;
pub mod job_cards;
pub mod quotations;
pub mod vehicles;

use crate::db::DbPool;
use crate::events::EventSender;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers.
#[derive(Clone)]
pub struct AppServices {
    pub customers: Arc<crate::services::customers::CustomerService>,
    pub vehicles: Arc<crate::services::vehicles::VehicleService>,
    pub job_cards: Arc<crate::services::job_cards::JobCardService>,
    pub inspections: Arc<crate::services::inspections::InspectionService>,
    pub quotations: Arc<crate::services::quotations::QuotationService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            customers: Arc::new(crate::services::customers::CustomerService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            vehicles: Arc::new(crate::services::vehicles::VehicleService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            job_cards: Arc::new(crate::services::job_cards::JobCardService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            inspections: Arc::new(crate::services::inspections::InspectionService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            quotations: Arc::new(crate::services::quotations::QuotationService::new(
                db_pool,
                event_sender,
            )),
        }
    }
}
