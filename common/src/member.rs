use serde::{Deserialize, Serialize};

/// A registered member. The password is only ever held as a hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: u64,
    pub login_id: String,
    pub name: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
}

impl Member {
    pub fn new(
        login_id: impl Into<String>,
        name: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            login_id: login_id.into(),
            name: name.into(),
            password_hash: password_hash.into(),
        }
    }
}
