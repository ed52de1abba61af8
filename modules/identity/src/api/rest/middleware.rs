//! Tower layer resolving bearer credentials, plus handler-side extractors.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::extract::{FromRequestParts, Request};
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use taskforge_http::Problem;
use taskforge_http::auth_header::{bearer_token, is_preflight};
use tower::{Layer, Service};

use crate::api::rest::error::{auth_error_to_problem, codes};
use crate::domain::gateway::IdentityGateway;
use crate::domain::model::{Account, AccountBinding, AuthContext};

/// Extractor for the request's [`AuthContext`].
#[derive(Debug, Clone)]
pub struct Identity(pub AuthContext);

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = Problem;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .map(Identity)
            .ok_or_else(missing_middleware)
    }
}

/// Extractor for the bound account. Only valid behind
/// [`AccountBinding::Required`]; anywhere else the route is miswired.
#[derive(Debug, Clone)]
pub struct BoundAccount(pub Account);

impl<S> FromRequestParts<S> for BoundAccount
where
    S: Send + Sync,
{
    type Rejection = Problem;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .and_then(|ctx| ctx.account.clone())
            .map(BoundAccount)
            .ok_or_else(missing_middleware)
    }
}

fn missing_middleware() -> Problem {
    Problem::new(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal Server Error",
        "auth middleware not configured for this route",
    )
    .with_code(codes::INTERNAL)
}

struct AuthState {
    gateway: Arc<IdentityGateway>,
    binding: AccountBinding,
}

/// Layer that authenticates every request before it reaches a handler.
///
/// # Example
/// ```ignore
/// router = router.layer(AuthLayer::new(gateway, AccountBinding::Required));
/// ```
#[derive(Clone)]
pub struct AuthLayer {
    state: Arc<AuthState>,
}

impl AuthLayer {
    #[must_use]
    pub fn new(gateway: Arc<IdentityGateway>, binding: AccountBinding) -> Self {
        Self {
            state: Arc::new(AuthState { gateway, binding }),
        }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthService {
            inner,
            state: self.state.clone(),
        }
    }
}

#[derive(Clone)]
pub struct AuthService<S> {
    inner: S,
    state: Arc<AuthState>,
}

impl<S> Service<Request<Body>> for AuthService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<Body>) -> Self::Future {
        let state = self.state.clone();
        let not_ready_inner = self.inner.clone();
        let mut ready_inner = std::mem::replace(&mut self.inner, not_ready_inner);

        Box::pin(async move {
            // CORS preflights never carry credentials.
            if is_preflight(request.method(), request.headers()) {
                return ready_inner.call(request).await;
            }

            let token = bearer_token(request.headers());
            match state.gateway.resolve(token, state.binding).await {
                Ok(ctx) => {
                    request.extensions_mut().insert(ctx);
                    ready_inner.call(request).await
                }
                Err(err) => {
                    let problem =
                        auth_error_to_problem(&err).with_instance(request.uri().path());
                    Ok(problem.into_response())
                }
            }
        })
    }
}
