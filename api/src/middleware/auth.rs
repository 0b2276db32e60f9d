//! Authentication extractors for protecting API endpoints.
//!
//! `CurrentSubject` and `AdminSubject` read the access token from the
//! configured transport and run the access gate inside a fresh unit of work.
//! Adding either one to a handler's arguments protects that route.

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use std::ops::Deref;

use tk_core::domain::Subject;

use crate::handlers::error::ApiError;
use crate::sessions::AuthSessions;
use crate::transport::extract_access_token;

/// Subject authenticated by a valid access token
#[derive(Debug, Clone, Copy)]
pub struct CurrentSubject(pub Subject);

/// Authenticated subject holding admin rights
#[derive(Debug, Clone, Copy)]
pub struct AdminSubject(pub Subject);

impl Deref for CurrentSubject {
    type Target = Subject;

    fn deref(&self) -> &Subject {
        &self.0
    }
}

impl Deref for AdminSubject {
    type Target = Subject;

    fn deref(&self) -> &Subject {
        &self.0
    }
}

/// Session handle plus the presented access token
fn session_and_token(req: &HttpRequest) -> Result<(web::Data<dyn AuthSessions>, Option<String>), ApiError> {
    let sessions = req
        .app_data::<web::Data<dyn AuthSessions>>()
        .cloned()
        .ok_or_else(|| {
            log::error!("AuthSessions is not registered as app data");
            ApiError::Internal
        })?;
    let token = extract_access_token(req, sessions.transport());
    Ok((sessions, token))
}

impl FromRequest for CurrentSubject {
    type Error = ApiError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let lookup = session_and_token(req);

        Box::pin(async move {
            let (sessions, token) = lookup?;
            let subject = sessions.authenticate(token).await?;
            Ok(CurrentSubject(subject))
        })
    }
}

impl FromRequest for AdminSubject {
    type Error = ApiError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let lookup = session_and_token(req);

        Box::pin(async move {
            let (sessions, token) = lookup?;
            let subject = sessions.authorize_admin(token).await?;
            Ok(AdminSubject(subject))
        })
    }
}
