pub mod tax_id;
