use actix_web::{HttpRequest, HttpResponse, get, post, web};
use serde_json::json;
use tracing::info;

use crate::application::auth_service::AuthService;
use crate::application::feed_service::FeedService;
use crate::domain::error::DomainError;
use crate::domain::visibility::Viewer;
use crate::presentation::dto::{PageQuery, UpdateProfileRequest};
use crate::presentation::utils::{AuthenticatedUser, profile_url, request_id, see_other};

#[get("/profile/edit/")]
async fn edit_form(
    user: AuthenticatedUser,
    auth: web::Data<AuthService>,
) -> Result<HttpResponse, DomainError> {
    let account = auth.get_user(user.id).await?;
    Ok(HttpResponse::Ok().json(json!({
        "form": {
            "username": account.username,
            "first_name": account.first_name,
            "last_name": account.last_name,
            "email": account.email,
        }
    })))
}

#[post("/profile/edit/")]
async fn edit(
    req: HttpRequest,
    user: AuthenticatedUser,
    auth: web::Data<AuthService>,
    payload: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, DomainError> {
    let updated = auth.update_profile(user.id, &payload).await?;

    info!(
        request_id = %request_id(&req),
        username = %updated.username,
        "profile updated"
    );

    Ok(see_other(profile_url(&updated.username)))
}

#[get("/profile/{username}/")]
async fn profile(
    req: HttpRequest,
    viewer: Viewer,
    feed: web::Data<FeedService>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, DomainError> {
    let username = path.into_inner();
    let (profile, page) = feed
        .profile(viewer, &username, query.page.as_deref())
        .await?;

    info!(
        request_id = %request_id(&req),
        profile = %username,
        page = page.number,
        "profile served"
    );

    Ok(HttpResponse::Ok().json(json!({
        "profile": profile,
        "page_obj": page,
    })))
}
