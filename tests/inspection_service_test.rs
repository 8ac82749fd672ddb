//! Inspection report lifecycle: one report per job card, nested
//! replace of findings with their parts and consumables.

mod common;

use garage_api::entities::inspection_finding::Severity;
use garage_api::entities::required_consumable::ConsumableUnit;
use garage_api::entities::required_part::PartStatus;
use garage_api::errors::ServiceError;
use garage_api::services::inspections::{
    CreateInspectionRequest, FindingRequest, InspectionService, RequiredConsumableRequest,
    RequiredPartRequest, UpdateInspectionRequest,
};
use garage_api::services::job_cards::{JobCardIntakeRequest, JobCardService};

fn intake_request(plate: &str) -> JobCardIntakeRequest {
    JobCardIntakeRequest {
        customer_name: "Yusuf Khan".to_string(),
        customer_phone: "+971505556677".to_string(),
        customer_email: None,
        customer_company: None,
        customer_trn: None,
        vehicle_make: "Honda".to_string(),
        vehicle_model: "Accord".to_string(),
        vehicle_color: "Silver".to_string(),
        vehicle_year: 2018,
        vehicle_plate: plate.to_string(),
        vehicle_vin: None,
        vehicle_mileage: Some(143000),
        status: None,
        customer_comments: Some("Grinding noise when braking".to_string()),
        workshop_comments: None,
        required_jobs: None,
        received_at: None,
    }
}

fn findings() -> Vec<FindingRequest> {
    vec![
        FindingRequest {
            description: "Front brake discs worn below minimum".to_string(),
            severity: Some(Severity::High),
            estimated_hours: Some(2.5),
            remarks: Some("Discs scored; resurfacing not possible".to_string()),
            parts: vec![RequiredPartRequest {
                part_number: Some("45251-T2A-A01".to_string()),
                description: "Front brake disc".to_string(),
                quantity: 2,
                status: Some(PartStatus::Required),
                notes: None,
            }],
            consumables: vec![RequiredConsumableRequest {
                name: "Brake cleaner".to_string(),
                quantity: 0.5,
                unit: Some(ConsumableUnit::L),
                notes: None,
            }],
        },
        FindingRequest {
            description: "Cabin filter dirty".to_string(),
            severity: None,
            estimated_hours: None,
            remarks: None,
            parts: vec![],
            consumables: vec![],
        },
    ]
}

#[tokio::test]
async fn create_stores_nested_findings() {
    let fixture = common::setup_db().await;
    let job_cards = JobCardService::new(fixture.db.clone(), None);
    let inspections = InspectionService::new(fixture.db.clone(), None);

    let card = job_cards.intake(intake_request("I-10001")).await.unwrap();
    let report = inspections
        .create_report(card.id, CreateInspectionRequest { findings: findings() })
        .await
        .unwrap();

    assert_eq!(report.total_findings, 2);
    assert_eq!(report.total_estimated_hours, 3.5);

    let brake_finding = &report.findings[0];
    assert_eq!(brake_finding.finding.severity, Severity::High);
    assert_eq!(brake_finding.parts.len(), 1);
    assert_eq!(brake_finding.parts[0].quantity, 2);
    assert_eq!(brake_finding.consumables.len(), 1);
    assert_eq!(brake_finding.consumables[0].unit, ConsumableUnit::L);

    // Unspecified fields take the workshop defaults
    let filter_finding = &report.findings[1];
    assert_eq!(filter_finding.finding.severity, Severity::Medium);
    assert_eq!(filter_finding.finding.estimated_hours, 1.0);
}

#[tokio::test]
async fn second_report_for_a_job_card_is_a_conflict() {
    let fixture = common::setup_db().await;
    let job_cards = JobCardService::new(fixture.db.clone(), None);
    let inspections = InspectionService::new(fixture.db.clone(), None);

    let card = job_cards.intake(intake_request("I-20001")).await.unwrap();
    inspections
        .create_report(card.id, CreateInspectionRequest { findings: vec![] })
        .await
        .unwrap();

    let second = inspections
        .create_report(card.id, CreateInspectionRequest { findings: vec![] })
        .await;

    assert!(matches!(second, Err(ServiceError::Conflict(_))));
}

#[tokio::test]
async fn report_for_missing_job_card_is_not_found() {
    let fixture = common::setup_db().await;
    let inspections = InspectionService::new(fixture.db.clone(), None);

    let result = inspections
        .create_report(
            uuid::Uuid::new_v4(),
            CreateInspectionRequest { findings: vec![] },
        )
        .await;

    assert!(matches!(result, Err(ServiceError::NotFound(_))));
}

#[tokio::test]
async fn update_replaces_findings_and_their_rows() {
    let fixture = common::setup_db().await;
    let job_cards = JobCardService::new(fixture.db.clone(), None);
    let inspections = InspectionService::new(fixture.db.clone(), None);

    let card = job_cards.intake(intake_request("I-30001")).await.unwrap();
    let created = inspections
        .create_report(card.id, CreateInspectionRequest { findings: findings() })
        .await
        .unwrap();

    let updated = inspections
        .update_report(
            created.report.id,
            UpdateInspectionRequest {
                findings: vec![FindingRequest {
                    description: "Battery weak under load".to_string(),
                    severity: Some(Severity::Critical),
                    estimated_hours: Some(0.5),
                    remarks: None,
                    parts: vec![RequiredPartRequest {
                        part_number: None,
                        description: "12V AGM battery".to_string(),
                        quantity: 1,
                        status: Some(PartStatus::Ordered),
                        notes: None,
                    }],
                    consumables: vec![],
                }],
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.total_findings, 1);
    assert_eq!(updated.findings[0].finding.severity, Severity::Critical);
    assert_eq!(updated.findings[0].parts[0].status, PartStatus::Ordered);
    assert!(updated.report.updated_at.is_some());

    // The old rows are gone, not orphaned
    let reread = inspections.get_report(created.report.id).await.unwrap();
    assert_eq!(reread.total_findings, 1);
    assert_eq!(reread.total_estimated_hours, 0.5);
}

#[tokio::test]
async fn listing_carries_job_card_and_vehicle_summary() {
    let fixture = common::setup_db().await;
    let job_cards = JobCardService::new(fixture.db.clone(), None);
    let inspections = InspectionService::new(fixture.db.clone(), None);

    let card = job_cards.intake(intake_request("I-40001")).await.unwrap();
    inspections
        .create_report(card.id, CreateInspectionRequest { findings: findings() })
        .await
        .unwrap();

    let listing = inspections.list_reports().await.unwrap();
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0].total_findings, 2);
    assert_eq!(listing[0].job_card.as_ref().unwrap().id, card.id);
    assert_eq!(listing[0].vehicle.as_ref().unwrap().plate, "I-40001");
}

#[tokio::test]
async fn delete_removes_the_report() {
    let fixture = common::setup_db().await;
    let job_cards = JobCardService::new(fixture.db.clone(), None);
    let inspections = InspectionService::new(fixture.db.clone(), None);

    let card = job_cards.intake(intake_request("I-50001")).await.unwrap();
    let report = inspections
        .create_report(card.id, CreateInspectionRequest { findings: vec![] })
        .await
        .unwrap();

    inspections.delete_report(report.report.id).await.unwrap();

    let result = inspections.get_report(report.report.id).await;
    assert!(matches!(result, Err(ServiceError::NotFound(_))));

    // The job card can take a fresh report afterwards
    inspections
        .create_report(card.id, CreateInspectionRequest { findings: vec![] })
        .await
        .unwrap();
}
