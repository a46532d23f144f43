use actix_web::{post, web::{self, Json}, HttpRequest, HttpResponse};

use crate::{errors::CustomError, handlers::created_account, models::admin::{check_admin_exists, create_admin, retrieve_admin_password}, schema::{CreateAccount, EmailAndPassword, SigninResponse, SignupResponse}, utils::{hash_password, issue_token, verify_password}, GlobalState};

pub const SIGNUP_KEY_HEADER: &str = "X-Admin-Signup-Key";

/// Admin accounts can only be created by callers holding the configured key.
fn check_signup_key(configured:Option<&str>, presented:Option<&str>) -> Result<(), CustomError>{
    let Some(configured) = configured else {
        return Err(CustomError::forbidden("Admin signup is disabled"));
    };

    match presented {
        Some(key) if key == configured => Ok(()),
        _ => Err(CustomError::forbidden("Invalid signup key")),
    }
}

#[post("/signup")]
pub async fn signup_admin(data:web::Data<GlobalState>, admin:Json<CreateAccount>, req:HttpRequest) -> Result<HttpResponse, CustomError>{

    let presented = req.headers()
        .get(SIGNUP_KEY_HEADER)
        .and_then(|val| val.to_str().ok());

    check_signup_key(data.config.admin_signup_key.as_deref(), presented)?;

    let admin = admin.into_inner();

    admin.validate()?;

    let pool = &data.pool;

    let password_hash = hash_password(&admin.password)
        .map_err(|_e| CustomError::internal("Something went wrong !"))?;

    let admin_meta = CreateAccount{
        email: admin.email.trim().to_string(),
        name: admin.name.trim().to_string(),
        password: password_hash
    };

    let id = created_account(create_admin(pool, admin_meta).await?)?;

    tracing::info!(admin_id = %id, "admin signed up");

    Ok(HttpResponse::Ok().json(SignupResponse{message:String::from("Signed up successfully"), id: id.to_string()}))
}

#[post("/signin")]
pub async fn signin_admin(data:web::Data<GlobalState>, admin_data:web::Json<EmailAndPassword>) -> Result<HttpResponse, CustomError> {

    let pool = &data.pool;
    let email = admin_data.email.trim();

    // throw when admin not found
    if !check_admin_exists(pool, email).await? {
        return Err(CustomError::bad_request("Signup first"));
    }

    let hash = retrieve_admin_password(pool, email).await?;

    verify_password(&admin_data.password, &hash)
        .map_err(|_| CustomError::bad_request("Enter Valid Password"))?;

    let token = issue_token(email, &data.config.admin_jwt_secret)
        .map_err(|_| CustomError::internal("Internal Error"))?;

    Ok(HttpResponse::Ok().json(SigninResponse{message:String::from("Signined in Successfully"), token}))
}

#[cfg(test)]
mod tests{
    use actix_web::test;

    use actix_web::http::StatusCode;

    use crate::test_init_app::{init, ADMIN_SIGNUP_KEY};

    use super::*;

    fn sample_admin() -> CreateAccount{
        CreateAccount{
            email: String::from("admin@dance.com"),
            name: String::from("Browny"),
            password: String::from("THERIYATHU")
        }
    }

    #[actix_web::test]
    async fn signup_key_must_match(){
        assert!(check_signup_key(Some("key"), Some("key")).is_ok());
        assert_eq!(check_signup_key(Some("key"), Some("other")).unwrap_err().error, "Invalid signup key");
        assert_eq!(check_signup_key(Some("key"), None).unwrap_err().error, "Invalid signup key");
        assert_eq!(check_signup_key(None, Some("key")).unwrap_err().error, "Admin signup is disabled");
    }

    #[actix_web::test]
    async fn test_signup_without_key_is_forbidden(){
        let app = init().await;

        let res = test::TestRequest::post()
        .set_json(sample_admin())
        .uri("/api/v1/admin/signup")
        .send_request(&app)
        .await;

        assert_eq!(res.status(), StatusCode::FORBIDDEN);

        let res_body:CustomError = test::read_body_json(res).await;
        assert_eq!(res_body.error, "Invalid signup key");
    }

    #[actix_web::test]
    async fn test_signup_with_wrong_key_is_forbidden(){
        let app = init().await;

        let res = test::TestRequest::post()
        .set_json(sample_admin())
        .append_header((SIGNUP_KEY_HEADER, "guess"))
        .uri("/api/v1/admin/signup")
        .send_request(&app)
        .await;

        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_signup_with_short_password(){
        let app = init().await;

        let admin = CreateAccount{
            email: String::from("admin@dance.com"),
            name: String::from("Browny"),
            password: String::from("short")
        };

        let res = test::TestRequest::post()
        .set_json(admin)
        .append_header((SIGNUP_KEY_HEADER, ADMIN_SIGNUP_KEY))
        .uri("/api/v1/admin/signup")
        .send_request(&app)
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let res_body:CustomError = test::read_body_json(res).await;
        assert_eq!(res_body.error, "Password must be at least 8 characters");
    }

    #[actix_web::test]
    async fn test_signup_with_invalid_email(){
        let app = init().await;

        let admin = CreateAccount{
            email: String::from("admin.dance.com"),
            name: String::from("Browny"),
            password: String::from("THERIYATHU")
        };

        let res = test::TestRequest::post()
        .set_json(admin)
        .append_header((SIGNUP_KEY_HEADER, ADMIN_SIGNUP_KEY))
        .uri("/api/v1/admin/signup")
        .send_request(&app)
        .await;

        let res_body:CustomError = test::read_body_json(res).await;
        assert_eq!(res_body.error, "Enter a valid email");
    }
}
