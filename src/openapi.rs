use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Garage API",
        version = "0.2.0",
        description = r#"
# Garage Workshop Management API

Backend for a vehicle repair shop: customer, vehicle, job-card,
inspection-report and quotation records, with PDF export of quotations
and inspection reports.

## Highlights

- **Job-card intake**: one flattened form creates or reuses the
  customer (matched by name and phone) and the vehicle (matched by
  plate) and opens the card
- **Workshop board**: twelve freely settable stages from
  `under_inspection` to `delivered`; active/completed scopes
- **Inspection reports**: one per job card, nested findings with
  required parts and consumables
- **Quotations**: daily-numbered documents with derived
  subtotal/discount/VAT/grand-total amounts
- **PDF export**: quotations and inspection reports rendered in-process

## Error Handling

Failures return a consistent JSON body with appropriate status codes:

```json
{
  "error": "Not Found",
  "message": "Job card ... not found",
  "timestamp": "2025-03-01T00:00:00Z"
}
```

## Pagination

List endpoints accept `page` (default 1) and `per_page` (default 20).
"#
    ),
    paths(
        crate::handlers::customers::create_customer,
        crate::handlers::customers::get_customer,
        crate::handlers::customers::list_customers,
        crate::handlers::customers::update_customer,
        crate::handlers::customers::delete_customer,
        crate::handlers::customers::get_customer_vehicles,
        crate::handlers::vehicles::create_vehicle,
        crate::handlers::vehicles::get_vehicle,
        crate::handlers::vehicles::list_vehicles,
        crate::handlers::vehicles::update_vehicle,
        crate::handlers::vehicles::delete_vehicle,
        crate::handlers::job_cards::intake_job_card,
        crate::handlers::job_cards::list_job_cards,
        crate::handlers::job_cards::get_job_card,
        crate::handlers::job_cards::update_job_card,
        crate::handlers::job_cards::set_job_card_status,
        crate::handlers::job_cards::delete_job_card,
        crate::handlers::job_cards::add_job_note,
        crate::handlers::job_cards::list_job_notes,
        crate::handlers::inspections::create_inspection,
        crate::handlers::inspections::list_inspections,
        crate::handlers::inspections::get_inspection,
        crate::handlers::inspections::update_inspection,
        crate::handlers::inspections::delete_inspection,
        crate::handlers::inspections::inspection_pdf,
        crate::handlers::quotations::create_quotation,
        crate::handlers::quotations::list_quotations,
        crate::handlers::quotations::eligible_job_cards,
        crate::handlers::quotations::get_quotation,
        crate::handlers::quotations::update_quotation,
        crate::handlers::quotations::delete_quotation,
        crate::handlers::quotations::quotation_pdf,
        crate::handlers::dashboard::dashboard,
    ),
    components(schemas(
        crate::errors::ErrorResponse,
        crate::entities::customer::Model,
        crate::entities::vehicle::Model,
        crate::entities::job_card::Model,
        crate::entities::job_card::JobStatus,
        crate::entities::job_note::Model,
        crate::entities::inspection_report::Model,
        crate::entities::inspection_finding::Model,
        crate::entities::inspection_finding::Severity,
        crate::entities::required_part::Model,
        crate::entities::required_part::PartStatus,
        crate::entities::required_consumable::Model,
        crate::entities::required_consumable::ConsumableUnit,
        crate::entities::quotation::Model,
        crate::entities::quotation_item::Model,
        crate::entities::quotation_item::ItemType,
        crate::services::quotations::QuotationTotals,
    )),
    tags(
        (name = "customers", description = "Customer records"),
        (name = "vehicles", description = "Vehicle records"),
        (name = "job-cards", description = "Workshop job cards"),
        (name = "inspections", description = "Inspection reports"),
        (name = "quotations", description = "Quotations and pricing"),
        (name = "dashboard", description = "Workshop overview"),
    )
)]
pub struct ApiDoc;

/// Swagger UI mounted at `/docs`, serving the generated document.
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}
