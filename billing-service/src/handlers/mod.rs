pub mod catalog;
pub mod health;
pub mod invoices;
pub mod patients;
pub mod schemes;
