mod inmemory;
mod postgres;

use chime_domain::{User, ID};
pub use inmemory::InMemoryUserRepo;
pub use postgres::PostgresUserRepo;

#[async_trait::async_trait]
pub trait IUserRepo: Send + Sync {
    async fn insert(&self, user: &User) -> anyhow::Result<()>;
    async fn find(&self, user_id: &ID) -> Option<User>;
    async fn find_by_apikey(&self, api_key: &str) -> Option<User>;
    async fn find_by_username(&self, username: &str) -> Option<User>;
}

#[cfg(test)]
mod tests {
    use crate::ChimeContext;
    use chime_domain::User;

    #[tokio::test]
    async fn finds_user_by_apikey_and_username() {
        let ctx = ChimeContext::create_inmemory();
        let user = User::new("alice", true);
        ctx.repos.users.insert(&user).await.expect("To insert user");

        let found = ctx.repos.users.find(&user.id).await.expect("To find user");
        assert_eq!(found, user);
        let found = ctx
            .repos
            .users
            .find_by_apikey(&user.secret_api_key)
            .await
            .expect("To find user by api key");
        assert_eq!(found.id, user.id);
        assert!(found.premium);
        assert!(ctx.repos.users.find_by_username("alice").await.is_some());

        assert!(ctx.repos.users.find_by_apikey("sk_unknown").await.is_none());
        assert!(ctx.repos.users.find_by_username("bob").await.is_none());
    }
}
