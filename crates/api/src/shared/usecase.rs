use super::quota::{with_quota, QuotaError, QuotaGuard};
use crate::error::ChimeError;
use chime_domain::{QuotaLimits, User};
use chime_infra::ChimeContext;
use std::fmt::Debug;
use tracing::error;

#[async_trait::async_trait(?Send)]
pub trait UseCase: Debug {
    type Response;
    type Error;

    const NAME: &'static str;

    async fn execute(&mut self, ctx: &ChimeContext) -> Result<Self::Response, Self::Error>;
}

/// A `UseCase` that every non premium `User` may only execute a limited
/// number of times per time window
pub trait QuotaLimited: UseCase {
    /// Name of the quota rule, also used as part of the quota key
    const QUOTA_RULE: &'static str;

    /// Limits that take precedence over the configured rule
    fn quota_override(&self) -> QuotaLimits {
        Default::default()
    }
}

#[derive(Debug)]
pub enum UseCaseErrorContainer<T: Debug> {
    Quota(QuotaError),
    UseCase(T),
}

impl<T> From<UseCaseErrorContainer<T>> for ChimeError
where
    T: Debug,
    ChimeError: From<T>,
{
    fn from(e: UseCaseErrorContainer<T>) -> Self {
        match e {
            UseCaseErrorContainer::Quota(e) => e.into(),
            UseCaseErrorContainer::UseCase(e) => e.into(),
        }
    }
}

#[tracing::instrument(name = "Executing usecase with quota", skip(usecase, user, ctx), fields(usecase = U::NAME))]
pub async fn execute_with_quota<U>(
    usecase: U,
    user: &User,
    ctx: &ChimeContext,
) -> Result<U::Response, UseCaseErrorContainer<U::Error>>
where
    U: QuotaLimited,
    U::Error: Debug,
{
    let guard = QuotaGuard::from_context(ctx);
    let overrides = usecase.quota_override();
    with_quota(
        &guard,
        Some(user),
        U::QUOTA_RULE,
        &overrides,
        execute(usecase, ctx),
    )
    .await
    .map_err(UseCaseErrorContainer::Quota)?
    .map_err(UseCaseErrorContainer::UseCase)
}

#[tracing::instrument(name = "Executing usecase", skip(usecase, ctx), fields(usecase = U::NAME))]
pub async fn execute<U>(mut usecase: U, ctx: &ChimeContext) -> Result<U::Response, U::Error>
where
    U: UseCase,
    U::Error: Debug,
{
    let res = usecase.execute(ctx).await;

    if let Err(e) = &res {
        error!("Use case error: {:?}", e);
    }

    res
}
