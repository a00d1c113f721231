pub mod handlers;
pub mod validation;
