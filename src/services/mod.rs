pub mod customers;
pub mod inspections;
pub mod job_cards;
pub mod quotations;
pub mod vehicles;
