use crate::shared::entity::{Entity, ID};
use chime_utils::create_random_secret;

const API_KEY_LEN: usize = 30;

/// The caller identity. Premium users bypass every quota.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: ID,
    pub username: String,
    pub secret_api_key: String,
    pub premium: bool,
}

impl User {
    pub fn new(username: impl Into<String>, premium: bool) -> Self {
        Self {
            id: Default::default(),
            username: username.into(),
            secret_api_key: Self::generate_secret_api_key(),
            premium,
        }
    }

    pub fn generate_secret_api_key() -> String {
        let rand_secret = create_random_secret(API_KEY_LEN);
        format!("sk_{}", rand_secret)
    }

    /// Key used by the quota bookkeeping to group calls of this `User`
    pub fn quota_identity(&self) -> &str {
        &self.username
    }
}

impl Entity for User {
    fn id(&self) -> &ID {
        &self.id
    }
}
