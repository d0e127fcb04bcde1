pub mod health;
pub mod icu;
pub mod lab;
