pub mod reports;
pub mod tax_rules;
