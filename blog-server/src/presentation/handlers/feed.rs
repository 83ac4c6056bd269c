use actix_web::{HttpRequest, HttpResponse, get, web};
use serde_json::json;
use tracing::info;

use crate::application::feed_service::FeedService;
use crate::application::post_service::PostService;
use crate::domain::error::DomainError;
use crate::presentation::dto::PageQuery;
use crate::presentation::utils::request_id;

#[get("/")]
async fn index(
    req: HttpRequest,
    feed: web::Data<FeedService>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, DomainError> {
    let page = feed.index(query.page.as_deref()).await?;

    info!(
        request_id = %request_id(&req),
        page = page.number,
        "index served"
    );

    Ok(HttpResponse::Ok().json(json!({ "page_obj": page })))
}

#[get("/category/{slug}/")]
async fn category_posts(
    req: HttpRequest,
    feed: web::Data<FeedService>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, DomainError> {
    let slug = path.into_inner();
    let (category, page) = feed.category(&slug, query.page.as_deref()).await?;

    info!(
        request_id = %request_id(&req),
        category = %slug,
        page = page.number,
        "category feed served"
    );

    Ok(HttpResponse::Ok().json(json!({
        "category": category,
        "page_obj": page,
    })))
}

#[get("/categories/")]
async fn list_categories(posts: web::Data<PostService>) -> Result<HttpResponse, DomainError> {
    let choices = posts.form_choices().await?;
    Ok(HttpResponse::Ok().json(json!({ "categories": choices.categories })))
}

#[get("/locations/")]
async fn list_locations(posts: web::Data<PostService>) -> Result<HttpResponse, DomainError> {
    let choices = posts.form_choices().await?;
    Ok(HttpResponse::Ok().json(json!({ "locations": choices.locations })))
}
