//! Quotation issuing, numbering and total derivation.

mod common;

use garage_api::entities::job_card::JobStatus;
use garage_api::entities::quotation_item::ItemType;
use garage_api::errors::ServiceError;
use garage_api::services::job_cards::{JobCardIntakeRequest, JobCardService, SetJobStatusRequest};
use garage_api::services::quotations::{
    CreateQuotationRequest, QuotationItemRequest, QuotationService, UpdateQuotationRequest,
};
use rust_decimal_macros::dec;

fn intake_request(plate: &str) -> JobCardIntakeRequest {
    JobCardIntakeRequest {
        customer_name: "Fatima Al Suwaidi".to_string(),
        customer_phone: "+971502223344".to_string(),
        customer_email: None,
        customer_company: Some("Al Suwaidi Trading".to_string()),
        customer_trn: Some("100222334455667".to_string()),
        vehicle_make: "BMW".to_string(),
        vehicle_model: "X5".to_string(),
        vehicle_color: "Black".to_string(),
        vehicle_year: 2019,
        vehicle_plate: plate.to_string(),
        vehicle_vin: None,
        vehicle_mileage: Some(112000),
        status: None,
        customer_comments: None,
        workshop_comments: None,
        required_jobs: Some("Front brake overhaul".to_string()),
        received_at: None,
    }
}

fn items() -> Vec<QuotationItemRequest> {
    vec![
        QuotationItemRequest {
            item_type: Some(ItemType::Part),
            description: "Front brake pads".to_string(),
            quantity: 2,
            unit_price: dec!(100.00),
        },
        QuotationItemRequest {
            item_type: Some(ItemType::Service),
            description: "Brake service labour".to_string(),
            quantity: 1,
            unit_price: dec!(50.00),
        },
    ]
}

#[tokio::test]
async fn totals_match_the_formula() {
    let fixture = common::setup_db().await;
    let job_cards = JobCardService::new(fixture.db.clone(), None);
    let quotations = QuotationService::new(fixture.db.clone(), None);

    let card = job_cards.intake(intake_request("Q-10001")).await.unwrap();
    let detail = quotations
        .create_quotation(
            card.id,
            CreateQuotationRequest {
                vat_percentage: Some(dec!(5.00)),
                discount_percentage: Some(dec!(10.00)),
                items: items(),
            },
        )
        .await
        .unwrap();

    // subtotal 250.00, discount 25.00, vat on 225.00 = 11.25
    assert_eq!(detail.totals.subtotal, dec!(250.00));
    assert_eq!(detail.totals.discount_amount, dec!(25.00));
    assert_eq!(detail.totals.vat_amount, dec!(11.25));
    assert_eq!(detail.totals.grand_total, dec!(236.25));
}

#[tokio::test]
async fn defaults_are_five_percent_vat_and_no_discount() {
    let fixture = common::setup_db().await;
    let job_cards = JobCardService::new(fixture.db.clone(), None);
    let quotations = QuotationService::new(fixture.db.clone(), None);

    let card = job_cards.intake(intake_request("Q-10002")).await.unwrap();
    let detail = quotations
        .create_quotation(
            card.id,
            CreateQuotationRequest {
                vat_percentage: None,
                discount_percentage: None,
                items: items(),
            },
        )
        .await
        .unwrap();

    assert_eq!(detail.quotation.vat_percentage, dec!(5.00));
    assert_eq!(detail.quotation.discount_percentage, dec!(0.00));
    assert_eq!(detail.totals.grand_total, dec!(262.50));
}

#[tokio::test]
async fn quotation_numbers_increment_within_the_day() {
    let fixture = common::setup_db().await;
    let job_cards = JobCardService::new(fixture.db.clone(), None);
    let quotations = QuotationService::new(fixture.db.clone(), None);

    let first_card = job_cards.intake(intake_request("Q-20001")).await.unwrap();
    let second_card = job_cards.intake(intake_request("Q-20002")).await.unwrap();

    let first = quotations
        .create_quotation(
            first_card.id,
            CreateQuotationRequest {
                vat_percentage: None,
                discount_percentage: None,
                items: items(),
            },
        )
        .await
        .unwrap();
    let second = quotations
        .create_quotation(
            second_card.id,
            CreateQuotationRequest {
                vat_percentage: None,
                discount_percentage: None,
                items: items(),
            },
        )
        .await
        .unwrap();

    let day = chrono::Utc::now().format("%y%m%d").to_string();
    assert_eq!(first.quotation.quotation_number, format!("Q{day}-01"));
    assert_eq!(second.quotation.quotation_number, format!("Q{day}-02"));
}

#[tokio::test]
async fn update_replaces_the_item_set() {
    let fixture = common::setup_db().await;
    let job_cards = JobCardService::new(fixture.db.clone(), None);
    let quotations = QuotationService::new(fixture.db.clone(), None);

    let card = job_cards.intake(intake_request("Q-30001")).await.unwrap();
    let created = quotations
        .create_quotation(
            card.id,
            CreateQuotationRequest {
                vat_percentage: None,
                discount_percentage: None,
                items: items(),
            },
        )
        .await
        .unwrap();

    let updated = quotations
        .update_quotation(
            created.quotation.id,
            UpdateQuotationRequest {
                vat_percentage: dec!(5.00),
                discount_percentage: dec!(0.00),
                items: vec![QuotationItemRequest {
                    item_type: None,
                    description: "Full detail wash".to_string(),
                    quantity: 1,
                    unit_price: dec!(80.00),
                }],
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.items.len(), 1);
    assert_eq!(updated.items[0].description, "Full detail wash");
    assert_eq!(updated.items[0].item_type, ItemType::Part);
    assert_eq!(updated.totals.subtotal, dec!(80.00));
    assert_eq!(updated.totals.grand_total, dec!(84.00));
}

#[tokio::test]
async fn eligible_job_cards_excludes_quoted_and_completed() {
    let fixture = common::setup_db().await;
    let job_cards = JobCardService::new(fixture.db.clone(), None);
    let quotations = QuotationService::new(fixture.db.clone(), None);

    let quoted = job_cards.intake(intake_request("Q-40001")).await.unwrap();
    let open = job_cards.intake(intake_request("Q-40002")).await.unwrap();
    let delivered = job_cards.intake(intake_request("Q-40003")).await.unwrap();

    quotations
        .create_quotation(
            quoted.id,
            CreateQuotationRequest {
                vat_percentage: None,
                discount_percentage: None,
                items: items(),
            },
        )
        .await
        .unwrap();
    job_cards
        .set_status(
            delivered.id,
            SetJobStatusRequest {
                status: JobStatus::Delivered,
            },
        )
        .await
        .unwrap();

    let eligible = quotations.eligible_job_cards().await.unwrap();
    let ids: Vec<_> = eligible.iter().map(|card| card.id).collect();

    assert!(ids.contains(&open.id));
    assert!(!ids.contains(&quoted.id));
    assert!(!ids.contains(&delivered.id));
}

#[tokio::test]
async fn quotation_for_missing_job_card_is_not_found() {
    let fixture = common::setup_db().await;
    let quotations = QuotationService::new(fixture.db.clone(), None);

    let result = quotations
        .create_quotation(
            uuid::Uuid::new_v4(),
            CreateQuotationRequest {
                vat_percentage: None,
                discount_percentage: None,
                items: items(),
            },
        )
        .await;

    assert!(matches!(result, Err(ServiceError::NotFound(_))));
}

#[tokio::test]
async fn document_assembles_customer_and_vehicle_context() {
    let fixture = common::setup_db().await;
    let job_cards = JobCardService::new(fixture.db.clone(), None);
    let quotations = QuotationService::new(fixture.db.clone(), None);

    let card = job_cards.intake(intake_request("Q-50001")).await.unwrap();
    let created = quotations
        .create_quotation(
            card.id,
            CreateQuotationRequest {
                vat_percentage: None,
                discount_percentage: None,
                items: items(),
            },
        )
        .await
        .unwrap();

    let document = quotations
        .get_quotation_document(created.quotation.id)
        .await
        .unwrap();

    assert_eq!(document.customer.name, "Fatima Al Suwaidi");
    assert_eq!(document.vehicle.plate, "Q-50001");
    assert_eq!(document.job_card.id, card.id);
    assert_eq!(document.items.len(), 2);
}
