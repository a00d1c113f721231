pub mod record;
pub mod resume;
