pub mod admin;
pub mod auth;
pub mod categories;
pub mod health;
pub mod messages;
pub mod recipes;

use actix_web::web;

/// Wires every `/api` resource. Literal paths (`/mine`, `/unread`) are
/// registered ahead of their `/{id}` siblings so they match first.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(auth::register)
            .service(auth::login)
            .service(auth::logout),
    )
    .service(
        web::scope("/recipes")
            .service(recipes::list)
            .service(recipes::my_recipes)
            .service(recipes::show)
            .service(recipes::create)
            .service(recipes::update)
            .service(recipes::remove)
            .service(recipes::add_comment),
    )
    .service(web::scope("/categories").service(categories::list))
    .service(
        web::scope("/messages")
            .service(messages::conversations)
            .service(messages::unread)
            .service(messages::contacts)
            .service(messages::thread)
            .service(messages::send)
            .service(messages::remove),
    )
    .service(
        web::scope("/admin")
            .service(admin::dashboard)
            .service(admin::show_user)
            .service(admin::update_user)
            .service(admin::delete_user)
            .service(admin::recipes)
            .service(admin::delete_recipe)
            .service(admin::delete_comment),
    );
}
