use actix_web::{HttpRequest, HttpResponse, Responder, Scope, post, web};
use tracing::info;

use crate::application::auth_service::AuthService;
use crate::domain::error::DomainError;
use crate::presentation::dto::{AuthResponse, LoginRequest, RegisterRequest};
use crate::presentation::utils::request_id;

pub fn scope() -> Scope {
    web::scope("/auth").service(registration).service(login)
}

#[post("/registration/")]
async fn registration(
    req: HttpRequest,
    service: web::Data<AuthService>,
    payload: web::Json<RegisterRequest>,
) -> Result<impl Responder, DomainError> {
    let user = service.register(&payload).await?;

    info!(
        request_id = %request_id(&req),
        user_id = %user.id,
        username = %user.username,
        "user registered"
    );

    let jwt = service
        .keys()
        .generate_token(user.id)
        .map_err(|err| DomainError::Internal(err.to_string()))?;

    Ok(HttpResponse::Created().json(AuthResponse {
        access_token: jwt,
        expires_in: service.keys().expires_in(),
        token_type: "Bearer".to_string(),
    }))
}

#[post("/login/")]
async fn login(
    req: HttpRequest,
    service: web::Data<AuthService>,
    payload: web::Json<LoginRequest>,
) -> Result<impl Responder, DomainError> {
    let jwt = service.login(&payload).await?;

    info!(
        request_id = %request_id(&req),
        username = %payload.username,
        "user logged in"
    );

    Ok(HttpResponse::Ok().json(AuthResponse {
        access_token: jwt,
        expires_in: service.keys().expires_in(),
        token_type: "Bearer".to_string(),
    }))
}
