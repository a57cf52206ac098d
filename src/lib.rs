pub mod application;
pub mod domain;
pub mod error;
pub mod harness;
pub mod infrastructure;
pub mod interfaces;
