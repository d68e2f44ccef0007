//! Request-scoped authentication gate
//!
//! Every request passes through. The gate only records who is calling:
//! a valid `Authorization: Bearer <token>` yields `AuthState::Authenticated`,
//! anything else (missing, malformed, expired, tampered) yields
//! `AuthState::Anonymous`. Handlers and resolvers decide whether to reject.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderValue, AUTHORIZATION},
    Error, HttpMessage,
};
use futures_util::future::LocalBoxFuture;
use std::future::{ready, Ready};
use tracing::debug;
use uuid::Uuid;

use crate::security::TokenService;

/// Identity decoded from a valid bearer credential
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
}

/// Outcome of the gate, stored in request extensions and GraphQL context
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthState {
    #[default]
    Anonymous,
    Authenticated(AuthenticatedUser),
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }

    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            AuthState::Authenticated(user) => Some(user.user_id),
            AuthState::Anonymous => None,
        }
    }
}

/// Decide the auth state for a raw `Authorization` header value
pub fn authenticate(tokens: &TokenService, header: Option<&HeaderValue>) -> AuthState {
    let Some(header) = header else {
        return AuthState::Anonymous;
    };

    let Ok(value) = header.to_str() else {
        debug!("Authorization header is not valid ASCII");
        return AuthState::Anonymous;
    };

    let token = match value.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") => token.trim(),
        _ => {
            debug!("Authorization header does not use Bearer scheme");
            return AuthState::Anonymous;
        }
    };

    let claims = match tokens.verify(token) {
        Ok(claims) => claims,
        Err(e) => {
            debug!(error = %e, "Bearer token rejected");
            return AuthState::Anonymous;
        }
    };

    match claims.user_id() {
        Some(user_id) => AuthState::Authenticated(AuthenticatedUser {
            user_id,
            email: claims.email,
        }),
        None => {
            debug!("Bearer token subject is not a user id");
            AuthState::Anonymous
        }
    }
}

/// Authentication gate middleware
pub struct AuthGate {
    tokens: TokenService,
}

impl AuthGate {
    pub fn new(tokens: TokenService) -> Self {
        Self { tokens }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthGateService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthGateService {
            service,
            tokens: self.tokens.clone(),
        }))
    }
}

pub struct AuthGateService<S> {
    service: S,
    tokens: TokenService,
}

impl<S, B> Service<ServiceRequest> for AuthGateService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let state = authenticate(&self.tokens, req.headers().get(AUTHORIZATION));
        req.extensions_mut().insert(state);

        let fut = self.service.call(req);
        Box::pin(async move {
            let res = fut.await?;
            Ok(res)
        })
    }
}
