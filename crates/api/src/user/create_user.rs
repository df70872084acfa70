use crate::{
    error::ChimeError,
    shared::usecase::{execute, UseCase},
};
use actix_web::{web, HttpResponse};
use chime_api_structs::create_user::{APIResponse, RequestBody};
use chime_domain::User;
use chime_infra::ChimeContext;

pub async fn create_user_controller(
    ctx: web::Data<ChimeContext>,
    body: web::Json<RequestBody>,
) -> Result<HttpResponse, ChimeError> {
    let body = body.0;
    let usecase = CreateUserUseCase {
        code: body.code,
        username: body.username,
        premium: body.premium,
    };
    execute(usecase, &ctx)
        .await
        .map(|user| HttpResponse::Created().json(APIResponse::new(user)))
        .map_err(ChimeError::from)
}

#[derive(Debug)]
struct CreateUserUseCase {
    code: String,
    username: String,
    premium: bool,
}

#[derive(Debug, PartialEq)]
enum UseCaseError {
    StorageError,
    InvalidCreateUserCode,
    InvalidUsername,
    UsernameTaken(String),
}

impl From<UseCaseError> for ChimeError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidCreateUserCode => Self::Unauthorized("Invalid code provided".into()),
            UseCaseError::InvalidUsername => {
                Self::BadClientData("The username can not be empty".into())
            }
            UseCaseError::UsernameTaken(username) => Self::Conflict(format!(
                "A user with the username: {}, already exists.",
                username
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateUserUseCase {
    type Response = User;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateUser";

    async fn execute(&mut self, ctx: &ChimeContext) -> Result<Self::Response, Self::Error> {
        if self.code != ctx.config.create_user_secret_code {
            return Err(UseCaseError::InvalidCreateUserCode);
        }
        let username = self.username.trim();
        if username.is_empty() {
            return Err(UseCaseError::InvalidUsername);
        }
        if ctx.repos.users.find_by_username(username).await.is_some() {
            return Err(UseCaseError::UsernameTaken(username.to_string()));
        }

        let user = User::new(username, self.premium);
        let res = ctx.repos.users.insert(&user).await;

        res.map(|_| user).map_err(|_| UseCaseError::StorageError)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn usecase_factory(ctx: &ChimeContext, username: &str) -> CreateUserUseCase {
        CreateUserUseCase {
            code: ctx.config.create_user_secret_code.clone(),
            username: username.into(),
            premium: false,
        }
    }

    #[actix_web::main]
    #[test]
    async fn creates_user_with_valid_code() {
        let ctx = ChimeContext::create_inmemory();
        let mut usecase = usecase_factory(&ctx, " alice ");

        let user = usecase.execute(&ctx).await.expect("To create user");
        assert_eq!(user.username, "alice");
        assert!(!user.premium);
        assert!(ctx.repos.users.find_by_apikey(&user.secret_api_key).await.is_some());
    }

    #[actix_web::main]
    #[test]
    async fn rejects_invalid_code_and_taken_username() {
        let ctx = ChimeContext::create_inmemory();
        let mut usecase = usecase_factory(&ctx, "alice");
        usecase.code = "wrong".into();
        assert_eq!(
            usecase.execute(&ctx).await.unwrap_err(),
            UseCaseError::InvalidCreateUserCode
        );

        let mut usecase = usecase_factory(&ctx, "alice");
        assert!(usecase.execute(&ctx).await.is_ok());
        assert_eq!(
            usecase.execute(&ctx).await.unwrap_err(),
            UseCaseError::UsernameTaken("alice".into())
        );
    }
}
