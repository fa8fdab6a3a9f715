pub mod job_links;
pub mod users;

use thiserror::Error;

pub use job_links::JobLinkStore;
pub use users::UserStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("User email or id required.")]
    IdentifierRequired,

    #[error("User not found.")]
    UserNotFound,

    #[error("This email has already been used.")]
    EmailTaken,

    #[error("You have already saved this job.")]
    Duplicate,

    #[error("Job not found.")]
    NotFound,

    #[error("You do not have permission to {0} this job.")]
    PermissionDenied(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
