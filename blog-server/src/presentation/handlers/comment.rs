use actix_web::{HttpRequest, HttpResponse, get, post, web};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::application::Guarded;
use crate::application::comment_service::CommentService;
use crate::domain::error::DomainError;
use crate::presentation::dto::CommentRequest;
use crate::presentation::utils::{AuthenticatedUser, post_detail_url, request_id, see_other};

#[post("/posts/{post_id}/comment/")]
async fn add(
    req: HttpRequest,
    user: AuthenticatedUser,
    comments: web::Data<CommentService>,
    path: web::Path<Uuid>,
    payload: web::Json<CommentRequest>,
) -> Result<HttpResponse, DomainError> {
    let post_id = path.into_inner();
    let comment = comments
        .add_comment(user.id, post_id, payload.into_inner())
        .await?;

    info!(
        request_id = %request_id(&req),
        user_id = %user.id,
        post_id = %post_id,
        comment_id = %comment.id,
        "comment added"
    );

    Ok(see_other(post_detail_url(post_id)))
}

#[get("/posts/{post_id}/comment/{comment_id}/edit/")]
async fn edit_form(
    user: AuthenticatedUser,
    comments: web::Data<CommentService>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, DomainError> {
    let (post_id, comment_id) = path.into_inner();
    match comments
        .owned_comment(user.viewer(), post_id, comment_id)
        .await?
    {
        Guarded::Owner(comment) => Ok(HttpResponse::Ok().json(json!({
            "form": { "text": comment.text },
            "comment": comment,
        }))),
        Guarded::NotOwner => Ok(see_other(post_detail_url(post_id))),
    }
}

#[post("/posts/{post_id}/comment/{comment_id}/edit/")]
async fn edit(
    req: HttpRequest,
    user: AuthenticatedUser,
    comments: web::Data<CommentService>,
    path: web::Path<(Uuid, Uuid)>,
    payload: web::Json<CommentRequest>,
) -> Result<HttpResponse, DomainError> {
    let (post_id, comment_id) = path.into_inner();
    if let Guarded::Owner(_) = comments
        .update_comment(user.viewer(), post_id, comment_id, payload.into_inner())
        .await?
    {
        info!(
            request_id = %request_id(&req),
            user_id = %user.id,
            comment_id = %comment_id,
            "comment updated"
        );
    }
    Ok(see_other(post_detail_url(post_id)))
}

#[get("/posts/{post_id}/comment/{comment_id}/delete/")]
async fn delete_confirmation(
    user: AuthenticatedUser,
    comments: web::Data<CommentService>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, DomainError> {
    let (post_id, comment_id) = path.into_inner();
    match comments
        .owned_comment(user.viewer(), post_id, comment_id)
        .await?
    {
        Guarded::Owner(comment) => Ok(HttpResponse::Ok().json(json!({ "comment": comment }))),
        Guarded::NotOwner => Ok(see_other(post_detail_url(post_id))),
    }
}

#[post("/posts/{post_id}/comment/{comment_id}/delete/")]
async fn delete(
    req: HttpRequest,
    user: AuthenticatedUser,
    comments: web::Data<CommentService>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, DomainError> {
    let (post_id, comment_id) = path.into_inner();
    if let Guarded::Owner(()) = comments
        .delete_comment(user.viewer(), post_id, comment_id)
        .await?
    {
        info!(
            request_id = %request_id(&req),
            user_id = %user.id,
            comment_id = %comment_id,
            "comment deleted"
        );
    }
    Ok(see_other(post_detail_url(post_id)))
}
