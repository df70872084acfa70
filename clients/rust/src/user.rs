use crate::{APIResponse, BaseClient};
use chime_api_structs::create_user;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct UserClient {
    base: Arc<BaseClient>,
}

pub struct CreateUserInput {
    /// The secret code configured on the server
    pub code: String,
    pub username: String,
    pub premium: bool,
}

impl UserClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn create(&self, input: CreateUserInput) -> APIResponse<create_user::APIResponse> {
        let body = create_user::RequestBody {
            code: input.code,
            username: input.username,
            premium: input.premium,
        };

        self.base
            .post(body, "user".into(), StatusCode::CREATED)
            .await
    }
}
