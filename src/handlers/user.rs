use actix_web::{get, post, web::{self, Json}, HttpRequest, HttpResponse};

use crate::{errors::CustomError, handlers::{created_account, current_user_id}, models::{checkout::get_user_payments, user::{check_user_exists, create_user, retrieve_password}}, schema::{CreateAccount, EmailAndPassword, SigninResponse, SignupResponse}, utils::{hash_password, issue_token, verify_password}, GlobalState};

#[post("/signup")]
pub async fn signup_user(data:web::Data<GlobalState>, user:Json<CreateAccount>) -> Result<HttpResponse, CustomError>{
    let user = user.into_inner();

    user.validate()?;

    let pool = &data.pool;

    let password_hash = hash_password(&user.password)
        .map_err(|_e| CustomError::internal("Something went wrong !"))?;

    let user_meta = CreateAccount{
        email: user.email.trim().to_string(),
        name: user.name.trim().to_string(),
        password: password_hash
    };

    let id = created_account(create_user(pool, user_meta).await?)?;

    tracing::info!(user_id = %id, "user signed up");

    Ok(HttpResponse::Ok().json(SignupResponse{message:String::from("Signed up successfully"), id: id.to_string()}))
}

#[post("/signin")]
pub async fn signin_user(data:web::Data<GlobalState>, user_data:web::Json<EmailAndPassword>) -> Result<HttpResponse, CustomError> {

    let pool = &data.pool;
    let email = user_data.email.trim();

    // throw when user not found
    if !check_user_exists(pool, email).await? {
        return Err(CustomError::bad_request("Signup first"));
    }

    let hash = retrieve_password(pool, email).await?;

    verify_password(&user_data.password, &hash)
        .map_err(|_| CustomError::bad_request("Enter Valid Password"))?;

    let token = issue_token(email, &data.config.user_jwt_secret)
        .map_err(|_| CustomError::internal("Internal Error"))?;

    Ok(HttpResponse::Ok().json(SigninResponse{message:String::from("Signined in Successfully"), token}))
}

#[get("")]
pub async fn user_payments(data:web::Data<GlobalState>, req:HttpRequest) -> Result<HttpResponse, CustomError>{
    let pool = &data.pool;

    let user_id = current_user_id(pool, &req).await?;

    let payments = get_user_payments(pool, user_id).await?;

    Ok(HttpResponse::Ok().json(payments))
}
