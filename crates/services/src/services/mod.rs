pub mod report_registry;
pub mod report_types;
pub mod tax_exemption;
