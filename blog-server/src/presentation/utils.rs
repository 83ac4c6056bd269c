use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{FromRequest, HttpMessage, HttpRequest, HttpResponse};
use futures_util::future::{Ready, ready};
use uuid::Uuid;

use crate::application::auth_service::AuthService;
use crate::domain::error::DomainError;
use crate::domain::visibility::Viewer;
use crate::presentation::middleware::RequestId;

/// Login-required routes take this; it answers 401 for anonymous calls.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub username: String,
}

impl AuthenticatedUser {
    pub fn viewer(&self) -> Viewer {
        Viewer::User(self.id)
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = DomainError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>() {
            Some(user) => ready(Ok(user.clone())),
            None => ready(Err(DomainError::Unauthorized)),
        }
    }
}

impl FromRequest for Viewer {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let id = req.extensions().get::<AuthenticatedUser>().map(|u| u.id);
        ready(Ok(Viewer::from(id)))
    }
}

pub async fn extract_user_from_token(
    token: &str,
    auth_service: &AuthService,
) -> Result<AuthenticatedUser, DomainError> {
    let claims = auth_service
        .keys()
        .verify_token(token)
        .map_err(|_| DomainError::Unauthorized)?;
    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| DomainError::Unauthorized)?;

    // A token for a deleted account is as good as no token.
    let user = auth_service.get_user(user_id).await.map_err(|err| match err {
        DomainError::UserNotFound(_) => DomainError::Unauthorized,
        other => other,
    })?;

    Ok(AuthenticatedUser {
        id: user.id,
        username: user.username,
    })
}

pub fn request_id(req: &HttpRequest) -> String {
    req.extensions()
        .get::<RequestId>()
        .map(|rid| rid.0.clone())
        .unwrap_or_else(|| "unknown".into())
}

pub fn see_other(location: String) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

pub fn post_detail_url(post_id: Uuid) -> String {
    format!("/posts/{post_id}/")
}

pub fn profile_url(username: &str) -> String {
    format!("/profile/{}/", urlencoding::encode(username))
}
