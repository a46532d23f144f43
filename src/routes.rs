use actix_web::{middleware::from_fn, web::{self, scope}};

use crate::{handlers::{self, lesson::MAX_IMAGE_BYTES}, middlewares};

pub fn configure(cfg: &mut web::ServiceConfig){
    cfg.service(
        scope("/api/v1")
        .service(handlers::hello_world)
        // guarded scopes go before their unguarded prefixes, else /admin and /user match first
        .service(
            scope("/admin/coupons")
            .wrap(from_fn(middlewares::admin::admin_middleware))
            .service(handlers::coupon::issue_coupons_handler)
            .service(handlers::coupon::get_all_templates_handler)
            .service(handlers::coupon::get_template_coupons_handler)
        )
        .service(
            scope("/admin/lessons")
            .app_data(web::PayloadConfig::new(MAX_IMAGE_BYTES))
            .wrap(from_fn(middlewares::admin::admin_middleware))
            .service(handlers::lesson::create_lesson_handler)
            .service(handlers::lesson::update_lesson_handler)
            .service(handlers::lesson::upload_lesson_image_handler)
            .service(handlers::lesson::get_all_lessons_handler)
            .service(handlers::lesson::get_lesson_applicants_handler)
        )
        .service(
            scope("/admin/profiles")
            .wrap(from_fn(middlewares::admin::admin_middleware))
            .service(handlers::profile::get_all_profiles_handler)
        )
        .service(
            scope("/admin")
            .service(handlers::admin::signup_admin)
            .service(handlers::admin::signin_admin)
        )
        .service(
            scope("/user/payments")
            .wrap(from_fn(middlewares::user::user_middleware))
            .service(handlers::user::user_payments)
        )
        .service(
            scope("/user/profile")
            .wrap(from_fn(middlewares::user::user_middleware))
            .service(handlers::profile::get_profile_handler)
            .service(handlers::profile::upsert_profile_handler)
        )
        .service(
            scope("/user")
            .service(handlers::user::signup_user)
            .service(handlers::user::signin_user)
        )
        .service(
            scope("/checkout")
            .wrap(from_fn(middlewares::user::user_middleware))
            .service(handlers::checkout::create_checkout_handler)
            .service(handlers::checkout::get_checkout_handler)
            .service(handlers::checkout::pay_checkout_handler)
        )
        .service(
            scope("/lessons")
            .service(handlers::lesson::get_published_lessons_handler)
            .service(handlers::lesson::get_lesson_handler)
        )
    );
}
