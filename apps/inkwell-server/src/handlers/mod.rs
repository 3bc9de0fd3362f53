//! HTTP handlers and route configuration.

mod admin;
mod auth;
mod health;
mod pages;
mod views;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(pages::index))
        .service(
            web::resource("/post/{slug}/")
                .route(web::get().to(pages::post_detail))
                .route(web::post().to(pages::submit_comment)),
        )
        .route("/category/{slug}/", web::get().to(pages::category))
        .route("/tag/{slug}/", web::get().to(pages::tag))
        .route("/search/", web::get().to(pages::search))
        .route("/about/", web::get().to(pages::about))
        .service(web::scope("/api").route("/health", web::get().to(health::health_check)))
        .service(
            web::scope("/admin")
                .route("/login", web::post().to(auth::login))
                .service(
                    web::resource("/categories")
                        .route(web::get().to(admin::list_categories))
                        .route(web::post().to(admin::create_category)),
                )
                .service(
                    web::resource("/categories/{id}")
                        .route(web::get().to(admin::get_category))
                        .route(web::put().to(admin::update_category))
                        .route(web::delete().to(admin::delete_category)),
                )
                .service(
                    web::resource("/tags")
                        .route(web::get().to(admin::list_tags))
                        .route(web::post().to(admin::create_tag)),
                )
                .service(
                    web::resource("/tags/{id}")
                        .route(web::get().to(admin::get_tag))
                        .route(web::put().to(admin::update_tag))
                        .route(web::delete().to(admin::delete_tag)),
                )
                .service(
                    web::resource("/posts")
                        .route(web::get().to(admin::list_posts))
                        .route(web::post().to(admin::create_post)),
                )
                .service(
                    web::resource("/posts/{id}")
                        .route(web::get().to(admin::get_post))
                        .route(web::put().to(admin::update_post))
                        .route(web::delete().to(admin::delete_post)),
                )
                .route("/posts/{id}/tags", web::put().to(admin::set_post_tags))
                .route("/comments/approve", web::post().to(admin::approve_comments))
                .route("/comments/disapprove", web::post().to(admin::disapprove_comments))
                .service(
                    web::resource("/comments")
                        .route(web::get().to(admin::list_comments))
                        .route(web::post().to(admin::create_comment)),
                )
                .service(
                    web::resource("/comments/{id}")
                        .route(web::get().to(admin::get_comment))
                        .route(web::put().to(admin::update_comment))
                        .route(web::delete().to(admin::delete_comment)),
                ),
        );
}
