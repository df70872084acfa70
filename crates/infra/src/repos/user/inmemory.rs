use super::IUserRepo;
use crate::repos::shared::inmemory_repo::*;
use chime_domain::{User, ID};

pub struct InMemoryUserRepo {
    users: std::sync::Mutex<Vec<User>>,
}

impl InMemoryUserRepo {
    pub fn new() -> Self {
        Self {
            users: std::sync::Mutex::new(vec![]),
        }
    }
}

#[async_trait::async_trait]
impl IUserRepo for InMemoryUserRepo {
    async fn insert(&self, user: &User) -> anyhow::Result<()> {
        if find_by(&self.users, |u| u.username == user.username).is_empty() {
            insert(user, &self.users);
            return Ok(());
        }
        Err(anyhow::anyhow!("Username {} is already taken", user.username))
    }

    async fn find(&self, user_id: &ID) -> Option<User> {
        find(user_id, &self.users)
    }

    async fn find_by_apikey(&self, api_key: &str) -> Option<User> {
        find_by(&self.users, |u| u.secret_api_key == api_key)
            .into_iter()
            .next()
    }

    async fn find_by_username(&self, username: &str) -> Option<User> {
        find_by(&self.users, |u| u.username == username)
            .into_iter()
            .next()
    }
}
