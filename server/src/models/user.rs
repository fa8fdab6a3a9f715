use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// How a request names the user it acts for. Email wins when both are given.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UserRef {
    Email(String),
    Id(i64),
}

impl UserRef {
    pub fn from_parts(email: Option<String>, user_id: Option<i64>) -> Option<Self> {
        match (email.filter(|e| !e.trim().is_empty()), user_id) {
            (Some(email), _) => Some(UserRef::Email(email.trim().to_string())),
            (None, Some(id)) => Some(UserRef::Id(id)),
            (None, None) => None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UserQuery {
    pub email: Option<String>,
    pub user_id: Option<i64>,
}

impl UserQuery {
    pub fn user_ref(&self) -> Option<UserRef> {
        UserRef::from_parts(self.email.clone(), self.user_id)
    }
}
