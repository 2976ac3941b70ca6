use serde::{Deserialize, Serialize};

use super::user::User;

/// The organizer details denormalized onto every event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizerSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl From<&User> for OrganizerSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            avatar: user.avatar.clone(),
        }
    }
}
