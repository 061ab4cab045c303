use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Response},
};
use futures_util::future::BoxFuture;
use tower::{Layer, Service};

use crate::{
    auth::{AuthUser, Role},
    error::AppError,
};

/// Lets a request through only when the authenticated caller holds one of
/// `allowed`. Must sit inside `require_auth`.
#[derive(Clone, Copy)]
pub struct RequireRoleLayer {
    allowed: &'static [Role],
}

impl RequireRoleLayer {
    pub fn new(allowed: &'static [Role]) -> Self {
        Self { allowed }
    }
}

#[derive(Clone)]
pub struct RequireRole<S> {
    inner: S,
    allowed: &'static [Role],
}

impl<S> Layer<S> for RequireRoleLayer {
    type Service = RequireRole<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequireRole {
            inner,
            allowed: self.allowed,
        }
    }
}

impl<S> Service<Request<Body>> for RequireRole<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let allowed = self.allowed;
        // Call the instance that was polled ready; leave a fresh clone behind.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let Some(user) = req.extensions().get::<AuthUser>().copied() else {
                return Ok(AppError::forbidden("role not found in context").into_response());
            };

            if !allowed.contains(&user.role) {
                return Ok(AppError::forbidden("insufficient permissions").into_response());
            }

            inner.call(req).await
        })
    }
}
