pub mod auth_handlers;
pub mod extract_handlers;
pub mod job_handlers;
pub mod jwt;
