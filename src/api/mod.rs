pub mod admin;
pub mod employee;
pub mod leave;
