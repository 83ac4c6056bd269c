use actix_web::{HttpRequest, HttpResponse, get, post, web};
use chrono::Utc;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::application::Guarded;
use crate::application::post_service::PostService;
use crate::domain::error::DomainError;
use crate::domain::visibility::Viewer;
use crate::presentation::dto::{CreatePostRequest, UpdatePostRequest};
use crate::presentation::utils::{
    AuthenticatedUser, post_detail_url, profile_url, request_id, see_other,
};

#[get("/posts/create/")]
async fn create_form(
    _user: AuthenticatedUser,
    posts: web::Data<PostService>,
) -> Result<HttpResponse, DomainError> {
    let choices = posts.form_choices().await?;
    Ok(HttpResponse::Ok().json(json!({
        "form": {
            "pub_date": Utc::now(),
            "is_published": true,
        },
        "choices": choices,
        "is_edit": false,
    })))
}

#[post("/posts/create/")]
async fn create(
    req: HttpRequest,
    user: AuthenticatedUser,
    posts: web::Data<PostService>,
    payload: web::Json<CreatePostRequest>,
) -> Result<HttpResponse, DomainError> {
    let post = posts.create_post(user.id, payload.into_inner()).await?;

    info!(
        request_id = %request_id(&req),
        user_id = %user.id,
        post_id = %post.id,
        "post created"
    );

    Ok(see_other(profile_url(&user.username)))
}

#[get("/posts/{post_id}/")]
async fn detail(
    viewer: Viewer,
    posts: web::Data<PostService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let detail = posts.get_detail(viewer, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(detail))
}

#[get("/posts/{post_id}/edit/")]
async fn edit_form(
    user: AuthenticatedUser,
    posts: web::Data<PostService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let post_id = path.into_inner();
    match posts.edit_form(user.viewer(), post_id).await? {
        Guarded::Owner(entry) => {
            let choices = posts.form_choices().await?;
            Ok(HttpResponse::Ok().json(json!({
                "form": entry,
                "choices": choices,
                "is_edit": true,
            })))
        }
        Guarded::NotOwner => Ok(see_other(post_detail_url(post_id))),
    }
}

#[post("/posts/{post_id}/edit/")]
async fn edit(
    req: HttpRequest,
    user: AuthenticatedUser,
    posts: web::Data<PostService>,
    path: web::Path<Uuid>,
    payload: web::Json<UpdatePostRequest>,
) -> Result<HttpResponse, DomainError> {
    let post_id = path.into_inner();
    if let Guarded::Owner(post) = posts
        .update_post(user.viewer(), post_id, payload.into_inner())
        .await?
    {
        info!(
            request_id = %request_id(&req),
            user_id = %user.id,
            post_id = %post.id,
            "post updated"
        );
    }
    Ok(see_other(post_detail_url(post_id)))
}

#[get("/posts/{post_id}/delete/")]
async fn delete_confirmation(
    user: AuthenticatedUser,
    posts: web::Data<PostService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let post_id = path.into_inner();
    match posts.delete_confirmation(user.viewer(), post_id).await? {
        Guarded::Owner(entry) => Ok(HttpResponse::Ok().json(json!({ "post": entry }))),
        Guarded::NotOwner => Ok(see_other(post_detail_url(post_id))),
    }
}

#[post("/posts/{post_id}/delete/")]
async fn delete(
    req: HttpRequest,
    user: AuthenticatedUser,
    posts: web::Data<PostService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let post_id = path.into_inner();
    match posts.delete_post(user.viewer(), post_id).await? {
        Guarded::Owner(()) => {
            info!(
                request_id = %request_id(&req),
                user_id = %user.id,
                post_id = %post_id,
                "post deleted"
            );
            Ok(see_other(profile_url(&user.username)))
        }
        Guarded::NotOwner => Ok(see_other(post_detail_url(post_id))),
    }
}
