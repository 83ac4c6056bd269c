use actix_web::web;

pub mod auth;
pub mod comment;
pub mod feed;
pub mod post;
pub mod profile;


/// Registers every page route. Literal segments come before the
/// `{param}` routes they would otherwise collide with.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::scope())
        .service(feed::index)
        .service(feed::category_posts)
        .service(feed::list_categories)
        .service(feed::list_locations)
        .service(profile::edit_form)
        .service(profile::edit)
        .service(profile::profile)
        .service(post::create_form)
        .service(post::create)
        .service(post::detail)
        .service(post::edit_form)
        .service(post::edit)
        .service(post::delete_confirmation)
        .service(post::delete)
        .service(comment::add)
        .service(comment::edit_form)
        .service(comment::edit)
        .service(comment::delete_confirmation)
        .service(comment::delete);
}
