use actix_web::{get, put, web::{self, Json}, HttpRequest, HttpResponse};

use crate::{errors::CustomError, handlers::current_user_id, models::profile::{get_all_profiles, get_user_profile, upsert_profile}, schema::profile::ProfileForm, GlobalState};

#[put("")]
pub async fn upsert_profile_handler(data:web::Data<GlobalState>, form:Json<ProfileForm>, req:HttpRequest) -> Result<HttpResponse, CustomError>{

    let bank_info = form.validate()?;

    let pool = &data.pool;

    let user_id = current_user_id(pool, &req).await?;

    let profile = upsert_profile(pool, user_id, &form, bank_info).await?;

    Ok(HttpResponse::Ok().json(profile))
}

#[get("")]
pub async fn get_profile_handler(data:web::Data<GlobalState>, req:HttpRequest) -> Result<HttpResponse, CustomError>{

    let pool = &data.pool;

    let user_id = current_user_id(pool, &req).await?;

    let profile = get_user_profile(pool, user_id)
        .await?
        .ok_or_else(|| CustomError::not_found("Profile not found"))?;

    Ok(HttpResponse::Ok().json(profile))
}

#[get("")]
pub async fn get_all_profiles_handler(data:web::Data<GlobalState>) -> Result<HttpResponse, CustomError>{

    let profiles = get_all_profiles(&data.pool).await?;

    Ok(HttpResponse::Ok().json(profiles))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test};

    use crate::{schema::profile::Sex, test_init_app::{init, user_token}};

    use super::*;

    #[actix_web::test]
    async fn test_partial_bank_info_is_rejected() {
        let app = init().await;

        let form = ProfileForm{
            nickname: "kali".to_string(),
            sex: Sex::F,
            is_instructor: true,
            contacts: vec![],
            bank: Some("toss".to_string()),
            account: None,
            account_owner: None,
        };

        let res = test::TestRequest::put()
            .set_json(form)
            .append_header(("Authorization", user_token()))
            .uri("/api/v1/user/profile")
            .send_request(&app)
            .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let body: CustomError = test::read_body_json(res).await;
        assert_eq!(body.error, "Fill in all bank account fields");
    }

    #[actix_web::test]
    async fn test_profile_list_is_admin_only() {
        let app = init().await;

        let res = test::TestRequest::get()
            .append_header(("Authorization", user_token()))
            .uri("/api/v1/admin/profiles")
            .send_request(&app)
            .await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
