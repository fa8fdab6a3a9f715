pub mod job_link;
pub mod user;
