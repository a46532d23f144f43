pub mod admin;
pub mod user;
pub mod lesson;
pub mod coupon;
pub mod checkout;
pub mod profile;

use actix_web::{get, HttpMessage, HttpRequest, Responder};
use sqlx::{types::Uuid, Pool, Postgres};

use crate::{errors::CustomError, models::user::get_user_id_by_email, schema::StructWithEmail};

#[get("/hello")]
pub async fn hello_world() -> impl Responder{
    "hello_world!"
}

/// Email put in the request extensions by the auth middlewares.
pub(crate) fn caller_email(req:&HttpRequest) -> Result<String, CustomError>{
    req.extensions()
        .get::<StructWithEmail>()
        .map(|caller| caller.email.clone())
        .ok_or_else(|| CustomError::forbidden("email missing"))
}

/// Signup inserts skip taken emails, so a missing id means the account exists.
pub(crate) fn created_account(id:Option<Uuid>) -> Result<Uuid, CustomError>{
    id.ok_or_else(|| CustomError::bad_request("User exists already with this email"))
}

pub(crate) async fn current_user_id(pool:&Pool<Postgres>, req:&HttpRequest) -> Result<Uuid, CustomError>{
    let email = caller_email(req)?;
    get_user_id_by_email(pool, &email).await
}

#[cfg(test)]
mod tests{
    use actix_web::{http::StatusCode, test::{self, TestRequest}};

    use super::*;

    #[actix_web::test]
    async fn taken_email_is_a_bad_request(){
        let err = created_account(None).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.error, "User exists already with this email");

        let id = Uuid::new_v4();
        assert_eq!(created_account(Some(id)).unwrap(), id);
    }

    #[actix_web::test]
    async fn test_hello_world(){
        let app = crate::test_init_app::init().await;

        let req = TestRequest::get().uri("/api/v1/hello").to_request();
        let res = test::call_service(&app, req).await;

        let body_bytes = test::read_body(res).await;
        let body_str = std::str::from_utf8(&body_bytes).unwrap();
        
        assert_eq!(body_str, "hello_world!");
    }
}
