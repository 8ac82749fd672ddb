use std::collections::HashMap;

use text_placeholder::Template;

use crate::config::WorkshopConfig;
use crate::services::inspections::InspectionDocument;
use crate::services::quotations::QuotationDocument;

const QUOTATION_TEMPLATE: &str = include_str!("../../templates/quotation.typ.tpl");
const INSPECTION_TEMPLATE: &str = include_str!("../../templates/inspection.typ.tpl");

/// Escapes a value for interpolation into Typst markup. Symbol
/// characters would otherwise be parsed as syntax.
fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' | '#' | '[' | ']' | '*' | '_' | '`' | '$' | '@' | '<' | '>' | '~' | '/' => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
    out
}

fn or_dash(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => escape(v),
        _ => "-".to_string(),
    }
}

/// Builds the Typst source for a quotation document.
pub fn quotation_source(doc: &QuotationDocument, workshop: &WorkshopConfig) -> String {
    let currency = escape(&workshop.currency);

    let table_rows = doc
        .items
        .iter()
        .map(|item| {
            format!(
                "[{}], [{}], [{} {:.2}], [{} {:.2}],",
                item.quantity,
                escape(&item.description),
                currency,
                item.unit_price,
                currency,
                item.line_total(),
            )
        })
        .collect::<Vec<_>>()
        .join("\n  ");

    let mut totals = vec![format!(
        "[Subtotal:], [{} {:.2}],",
        currency, doc.totals.subtotal
    )];
    if doc.quotation.discount_percentage > rust_decimal::Decimal::ZERO {
        totals.push(format!(
            "[Discount ({}%):], [-{} {:.2}],",
            doc.quotation.discount_percentage, currency, doc.totals.discount_amount
        ));
    }
    if doc.quotation.vat_percentage > rust_decimal::Decimal::ZERO {
        totals.push(format!(
            "[VAT ({}%):], [{} {:.2}],",
            doc.quotation.vat_percentage, currency, doc.totals.vat_amount
        ));
    }
    totals.push(format!(
        "[#strong[Grand Total:]], [#strong[{} {:.2}]],",
        currency, doc.totals.grand_total
    ));
    let totals_rows = totals.join("\n    ");

    let workshop_name = escape(&workshop.name);
    let workshop_city = escape(&workshop.city);
    let workshop_phone = escape(&workshop.phone);
    let workshop_email = escape(&workshop.email);
    let workshop_trn = escape(&workshop.trn);
    let quotation_number = escape(&doc.quotation.quotation_number);
    let quotation_date = doc.quotation.issued_on.format("%Y-%m-%d").to_string();
    let job_number = escape(&doc.job_card.job_number);
    let customer_name = escape(&doc.customer.name);
    let customer_phone = escape(&doc.customer.phone);
    let customer_company = or_dash(doc.customer.company.as_deref());
    let customer_trn = or_dash(doc.customer.trn.as_deref());
    let vehicle_make = escape(&doc.vehicle.make);
    let vehicle_model = escape(&doc.vehicle.model);
    let vehicle_year = doc.vehicle.year.to_string();
    let vehicle_plate = escape(&doc.vehicle.plate);
    let vehicle_vin = or_dash(doc.vehicle.vin.as_deref());
    let vehicle_mileage = doc
        .vehicle
        .mileage
        .map(|m| m.to_string())
        .unwrap_or_else(|| "-".to_string());
    let bank_name = escape(&workshop.bank_name);
    let bank_iban = escape(&workshop.bank_iban);
    let bank_account_name = escape(&workshop.bank_account_name);

    let vars: HashMap<&str, &str> = HashMap::from([
        ("workshop-name", workshop_name.as_str()),
        ("workshop-city", workshop_city.as_str()),
        ("workshop-phone", workshop_phone.as_str()),
        ("workshop-email", workshop_email.as_str()),
        ("workshop-trn", workshop_trn.as_str()),
        ("quotation-number", quotation_number.as_str()),
        ("quotation-date", quotation_date.as_str()),
        ("job-number", job_number.as_str()),
        ("customer-name", customer_name.as_str()),
        ("customer-phone", customer_phone.as_str()),
        ("customer-company", customer_company.as_str()),
        ("customer-trn", customer_trn.as_str()),
        ("vehicle-make", vehicle_make.as_str()),
        ("vehicle-model", vehicle_model.as_str()),
        ("vehicle-year", vehicle_year.as_str()),
        ("vehicle-plate", vehicle_plate.as_str()),
        ("vehicle-vin", vehicle_vin.as_str()),
        ("vehicle-mileage", vehicle_mileage.as_str()),
        ("table-rows", table_rows.as_str()),
        ("totals-rows", totals_rows.as_str()),
        ("bank-name", bank_name.as_str()),
        ("bank-iban", bank_iban.as_str()),
        ("bank-account-name", bank_account_name.as_str()),
    ]);

    Template::new(QUOTATION_TEMPLATE).fill_with_hashmap(&vars)
}

/// Builds the Typst source for an inspection report document.
pub fn inspection_report_source(doc: &InspectionDocument, workshop: &WorkshopConfig) -> String {
    let mut findings_body = String::new();
    for (index, detail) in doc.findings.iter().enumerate() {
        findings_body.push_str(&format!(
            "#v(10pt)\n#text(weight: \"bold\")[Finding {}: {} (est. {:.1} h)]\n\n{}\n",
            index + 1,
            detail.finding.severity,
            detail.finding.estimated_hours,
            escape(&detail.finding.description),
        ));

        if let Some(remarks) = detail.finding.remarks.as_deref().filter(|r| !r.is_empty()) {
            findings_body.push_str(&format!("\nRemarks: {}\n", escape(remarks)));
        }

        if !detail.parts.is_empty() {
            findings_body.push_str(
                "\n#table(\n  columns: (auto, 1fr, auto, auto),\n  stroke: 0.5pt + gray,\n  table.header([Part No.], [Description], [Qty], [Status]),\n",
            );
            for part in &detail.parts {
                findings_body.push_str(&format!(
                    "  [{}], [{}], [{}], [{}],\n",
                    or_dash(part.part_number.as_deref()),
                    escape(&part.description),
                    part.quantity,
                    part.status,
                ));
            }
            findings_body.push_str(")\n");
        }

        if !detail.consumables.is_empty() {
            findings_body.push_str(
                "\n#table(\n  columns: (1fr, auto, auto),\n  stroke: 0.5pt + gray,\n  table.header([Consumable], [Qty], [Unit]),\n",
            );
            for consumable in &detail.consumables {
                findings_body.push_str(&format!(
                    "  [{}], [{:.2}], [{}],\n",
                    escape(&consumable.name),
                    consumable.quantity,
                    consumable.unit,
                ));
            }
            findings_body.push_str(")\n");
        }
    }
    if doc.findings.is_empty() {
        findings_body.push_str("No findings were recorded for this inspection.\n");
    }

    let workshop_name = escape(&workshop.name);
    let workshop_city = escape(&workshop.city);
    let workshop_phone = escape(&workshop.phone);
    let workshop_email = escape(&workshop.email);
    let workshop_trn = escape(&workshop.trn);
    let report_date = doc.report.created_at.format("%Y-%m-%d").to_string();
    let job_number = escape(&doc.job_card.job_number);
    let job_status = doc.job_card.status.to_string();
    let customer_name = escape(doc.customer.display_name());
    let customer_phone = escape(&doc.customer.phone);
    let vehicle_make = escape(&doc.vehicle.make);
    let vehicle_model = escape(&doc.vehicle.model);
    let vehicle_year = doc.vehicle.year.to_string();
    let vehicle_plate = escape(&doc.vehicle.plate);
    let vehicle_vin = or_dash(doc.vehicle.vin.as_deref());
    let vehicle_mileage = doc
        .vehicle
        .mileage
        .map(|m| m.to_string())
        .unwrap_or_else(|| "-".to_string());
    let total_findings = doc.findings.len().to_string();
    let total_hours = format!("{:.1}", doc.total_estimated_hours);

    let vars: HashMap<&str, &str> = HashMap::from([
        ("workshop-name", workshop_name.as_str()),
        ("workshop-city", workshop_city.as_str()),
        ("workshop-phone", workshop_phone.as_str()),
        ("workshop-email", workshop_email.as_str()),
        ("workshop-trn", workshop_trn.as_str()),
        ("report-date", report_date.as_str()),
        ("job-number", job_number.as_str()),
        ("job-status", job_status.as_str()),
        ("customer-name", customer_name.as_str()),
        ("customer-phone", customer_phone.as_str()),
        ("vehicle-make", vehicle_make.as_str()),
        ("vehicle-model", vehicle_model.as_str()),
        ("vehicle-year", vehicle_year.as_str()),
        ("vehicle-plate", vehicle_plate.as_str()),
        ("vehicle-vin", vehicle_vin.as_str()),
        ("vehicle-mileage", vehicle_mileage.as_str()),
        ("total-findings", total_findings.as_str()),
        ("total-hours", total_hours.as_str()),
        ("findings-body", findings_body.as_str()),
    ]);

    Template::new(INSPECTION_TEMPLATE).fill_with_hashmap(&vars)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_neutralizes_markup_syntax() {
        assert_eq!(escape("a#b"), "a\\#b");
        assert_eq!(escape("[x] *y*"), "\\[x\\] \\*y\\*");
        assert_eq!(escape("plain text"), "plain text");
    }

    #[test]
    fn or_dash_falls_back_for_missing_values() {
        assert_eq!(or_dash(None), "-");
        assert_eq!(or_dash(Some("")), "-");
        assert_eq!(or_dash(Some("TRN-1")), "TRN-1");
    }
}
