pub mod customer;
pub mod email;
pub mod invoice;
pub mod ports;
