pub mod tax_rule;
