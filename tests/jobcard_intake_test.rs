//! Intake and board behavior for job cards:
//! - get-or-create of customer (name + phone) and vehicle (plate)
//! - freely settable status transitions
//! - active/completed board scopes

mod common;

use garage_api::entities::job_card::JobStatus;
use garage_api::errors::ServiceError;
use garage_api::services::job_cards::{
    AddJobNoteRequest, JobCardIntakeRequest, JobCardScope, JobCardService, SetJobStatusRequest,
    UpdateJobCardRequest,
};

fn intake_request(plate: &str) -> JobCardIntakeRequest {
    JobCardIntakeRequest {
        customer_name: "Omar Haddad".to_string(),
        customer_phone: "+971501234567".to_string(),
        customer_email: Some("omar@example.com".to_string()),
        customer_company: None,
        customer_trn: None,
        vehicle_make: "Toyota".to_string(),
        vehicle_model: "Land Cruiser".to_string(),
        vehicle_color: "White".to_string(),
        vehicle_year: 2021,
        vehicle_plate: plate.to_string(),
        vehicle_vin: Some("JTMHY05J704123456".to_string()),
        vehicle_mileage: Some(84000),
        status: None,
        customer_comments: Some("AC blows warm".to_string()),
        workshop_comments: None,
        required_jobs: Some("AC diagnosis".to_string()),
        received_at: None,
    }
}

#[tokio::test]
async fn intake_same_plate_twice_reuses_vehicle() {
    let fixture = common::setup_db().await;
    let service = JobCardService::new(fixture.db.clone(), None);

    let first = service.intake(intake_request("D-12345")).await.unwrap();
    let second = service.intake(intake_request("D-12345")).await.unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(first.vehicle_id, second.vehicle_id);
    assert_eq!(first.customer_id, second.customer_id);
}

#[tokio::test]
async fn intake_same_customer_different_vehicle_reuses_customer() {
    let fixture = common::setup_db().await;
    let service = JobCardService::new(fixture.db.clone(), None);

    let first = service.intake(intake_request("D-11111")).await.unwrap();
    let second = service.intake(intake_request("D-22222")).await.unwrap();

    assert_eq!(first.customer_id, second.customer_id);
    assert_ne!(first.vehicle_id, second.vehicle_id);
}

#[tokio::test]
async fn intake_different_phone_creates_new_customer() {
    let fixture = common::setup_db().await;
    let service = JobCardService::new(fixture.db.clone(), None);

    let first = service.intake(intake_request("D-33333")).await.unwrap();

    let mut request = intake_request("D-44444");
    request.customer_phone = "+971509999999".to_string();
    let second = service.intake(request).await.unwrap();

    assert_ne!(first.customer_id, second.customer_id);
}

#[tokio::test]
async fn existing_vehicle_details_are_not_overwritten_on_reintake() {
    let fixture = common::setup_db().await;
    let service = JobCardService::new(fixture.db.clone(), None);

    let first = service.intake(intake_request("D-55555")).await.unwrap();

    let mut request = intake_request("D-55555");
    request.vehicle_make = "Nissan".to_string();
    request.vehicle_mileage = Some(90000);
    let second = service.intake(request).await.unwrap();

    assert_eq!(first.vehicle_id, second.vehicle_id);
    let detail = service.get_job_card_detail(second.id).await.unwrap();
    assert_eq!(detail.vehicle.make, "Toyota");
    assert_eq!(detail.vehicle.mileage, Some(84000));
}

#[tokio::test]
async fn new_job_cards_start_under_inspection_with_a_job_number() {
    let fixture = common::setup_db().await;
    let service = JobCardService::new(fixture.db.clone(), None);

    let card = service.intake(intake_request("D-60001")).await.unwrap();

    assert_eq!(card.status, JobStatus::UnderInspection);
    assert!(card.job_number.starts_with("JC"));
    assert!(card.job_number.contains('-'));
}

#[tokio::test]
async fn status_transitions_are_freely_settable() {
    let fixture = common::setup_db().await;
    let service = JobCardService::new(fixture.db.clone(), None);

    let card = service.intake(intake_request("D-66666")).await.unwrap();

    // Straight to the end, then back to the middle: no ordering rule
    let delivered = service
        .set_status(
            card.id,
            SetJobStatusRequest {
                status: JobStatus::Delivered,
            },
        )
        .await
        .unwrap();
    assert_eq!(delivered.status, JobStatus::Delivered);

    let reopened = service
        .set_status(
            card.id,
            SetJobStatusRequest {
                status: JobStatus::WaitingParts,
            },
        )
        .await
        .unwrap();
    assert_eq!(reopened.status, JobStatus::WaitingParts);
}

#[tokio::test]
async fn board_scopes_split_on_collection_boundary() {
    let fixture = common::setup_db().await;
    let service = JobCardService::new(fixture.db.clone(), None);

    let active_card = service.intake(intake_request("D-70001")).await.unwrap();
    let done_card = service.intake(intake_request("D-70002")).await.unwrap();
    service
        .set_status(
            done_card.id,
            SetJobStatusRequest {
                status: JobStatus::ReadyCollection,
            },
        )
        .await
        .unwrap();

    let active = service
        .list_job_cards(JobCardScope::Active, 1, 20)
        .await
        .unwrap();
    assert_eq!(active.total, 1);
    assert_eq!(active.job_cards[0].job_card.id, active_card.id);

    let completed = service
        .list_job_cards(JobCardScope::Completed, 1, 20)
        .await
        .unwrap();
    assert_eq!(completed.total, 1);
    assert_eq!(completed.job_cards[0].job_card.id, done_card.id);

    let all = service.list_job_cards(JobCardScope::All, 1, 20).await.unwrap();
    assert_eq!(all.total, 2);
}

#[tokio::test]
async fn list_joins_customer_and_vehicle() {
    let fixture = common::setup_db().await;
    let service = JobCardService::new(fixture.db.clone(), None);

    service.intake(intake_request("D-80001")).await.unwrap();

    let listing = service
        .list_job_cards(JobCardScope::All, 1, 20)
        .await
        .unwrap();
    let row = &listing.job_cards[0];
    assert_eq!(row.customer.as_ref().unwrap().name, "Omar Haddad");
    assert_eq!(row.vehicle.as_ref().unwrap().plate, "D-80001");
}

#[tokio::test]
async fn update_rewrites_comments() {
    let fixture = common::setup_db().await;
    let service = JobCardService::new(fixture.db.clone(), None);

    let card = service.intake(intake_request("D-90001")).await.unwrap();
    let updated = service
        .update_job_card(
            card.id,
            UpdateJobCardRequest {
                customer_comments: Some("Rattle from rear".to_string()),
                workshop_comments: Some("Suspension checked".to_string()),
                required_jobs: None,
                received_at: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.customer_comments.as_deref(), Some("Rattle from rear"));
    assert_eq!(updated.workshop_comments.as_deref(), Some("Suspension checked"));
    assert!(updated.required_jobs.is_none());
    assert!(updated.updated_at.is_some());
}

#[tokio::test]
async fn notes_append_in_order() {
    let fixture = common::setup_db().await;
    let service = JobCardService::new(fixture.db.clone(), None);

    let card = service.intake(intake_request("D-90002")).await.unwrap();
    service
        .add_note(
            card.id,
            AddJobNoteRequest {
                note: "Customer approved quote by phone".to_string(),
            },
        )
        .await
        .unwrap();
    service
        .add_note(
            card.id,
            AddJobNoteRequest {
                note: "Parts ordered".to_string(),
            },
        )
        .await
        .unwrap();

    let notes = service.list_notes(card.id).await.unwrap();
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0].note, "Customer approved quote by phone");
    assert_eq!(notes[1].note, "Parts ordered");
}

#[tokio::test]
async fn missing_job_card_is_not_found() {
    let fixture = common::setup_db().await;
    let service = JobCardService::new(fixture.db.clone(), None);

    let result = service.get_job_card(uuid::Uuid::new_v4()).await;
    assert!(matches!(result, Err(ServiceError::NotFound(_))));
}

#[tokio::test]
async fn delete_removes_the_card() {
    let fixture = common::setup_db().await;
    let service = JobCardService::new(fixture.db.clone(), None);

    let card = service.intake(intake_request("D-90003")).await.unwrap();
    service.delete_job_card(card.id).await.unwrap();

    let result = service.get_job_card(card.id).await;
    assert!(matches!(result, Err(ServiceError::NotFound(_))));
}
