use crate::dtos::UserDTO;
use chime_domain::User;
use serde::{Deserialize, Serialize};

pub mod create_user {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        /// Secret code that allows creating users
        pub code: String,
        pub username: String,
        #[serde(default)]
        pub premium: bool,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub user: UserDTO,
        pub secret_api_key: String,
    }

    impl APIResponse {
        pub fn new(user: User) -> Self {
            Self {
                secret_api_key: user.secret_api_key.clone(),
                user: UserDTO::new(user),
            }
        }
    }
}
