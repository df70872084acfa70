use crate::error::ChimeError;
use actix_web::HttpRequest;
use chime_domain::User;
use chime_infra::ChimeContext;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Finds the `User` owning the api key of the request, if any
pub async fn get_client_user(req: &HttpRequest, ctx: &ChimeContext) -> Option<User> {
    let api_key = req.headers().get(API_KEY_HEADER)?.to_str().ok()?;
    ctx.repos.users.find_by_apikey(api_key).await
}

/// Only lets requests through that carry the api key of an existing `User`
pub async fn protect_route(req: &HttpRequest, ctx: &ChimeContext) -> Result<User, ChimeError> {
    match get_client_user(req, ctx).await {
        Some(user) => Ok(user),
        None => Err(ChimeError::Unauthorized(format!(
            "Authentication required. Provide a valid api key in the `{}` header",
            API_KEY_HEADER
        ))),
    }
}
