use actix_web::{get, post, web::{self, Json}, HttpResponse};

use crate::{errors::CustomError, issuance::issue_coupons, models::coupon::{get_all_templates, get_template_coupons, template_exists, PgCouponStore}, schema::coupon::{IssueCoupons, IssueCouponsForm}, GlobalState};

#[post("")]
pub async fn issue_coupons_handler(data:web::Data<GlobalState>, form:Json<IssueCouponsForm>) -> Result<HttpResponse, CustomError>{

    let request = IssueCoupons::try_from(form.into_inner())?;

    let store = PgCouponStore::begin(&data.pool).await?;

    let issued = issue_coupons(store, &request).await?;

    Ok(HttpResponse::Created().json(issued))
}

#[get("")]
pub async fn get_all_templates_handler(data:web::Data<GlobalState>) -> Result<HttpResponse, CustomError>{

    let templates = get_all_templates(&data.pool).await?;

    Ok(HttpResponse::Ok().json(templates))
}

#[get("/{template_id}")]
pub async fn get_template_coupons_handler(data:web::Data<GlobalState>, path:web::Path<i64>) -> Result<HttpResponse, CustomError>{

    let pool = &data.pool;
    let template_id = path.into_inner();

    if !template_exists(pool, template_id).await? {
        return Err(CustomError::not_found("Coupon template not found"));
    }

    let coupons = get_template_coupons(pool, template_id).await?;

    Ok(HttpResponse::Ok().json(coupons))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test};

    use crate::test_init_app::{admin_token, init, user_token};

    use super::*;

    fn form(quantity:&str) -> IssueCouponsForm{
        IssueCouponsForm{
            name: "Spring promo".to_string(),
            discount_amount: "5000".to_string(),
            lesson_no: "1".to_string(),
            quantity: quantity.to_string(),
        }
    }

    #[actix_web::test]
    async fn test_issue_without_token() {
        let app = init().await;

        let res = test::TestRequest::post()
            .set_json(form("10"))
            .uri("/api/v1/admin/coupons")
            .send_request(&app)
            .await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let body: CustomError = test::read_body_json(res).await;
        assert_eq!(body.error, "Token Not found");
    }

    #[actix_web::test]
    async fn test_issue_with_user_token() {
        let app = init().await;

        let res = test::TestRequest::post()
            .set_json(form("10"))
            .append_header(("Authorization", user_token()))
            .uri("/api/v1/admin/coupons")
            .send_request(&app)
            .await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_issue_rejects_zero_quantity() {
        let app = init().await;

        let res = test::TestRequest::post()
            .set_json(form("0"))
            .append_header(("Authorization", admin_token()))
            .uri("/api/v1/admin/coupons")
            .send_request(&app)
            .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let body: CustomError = test::read_body_json(res).await;
        assert_eq!(body.error, "Quantity must be greater than zero");
    }

    #[actix_web::test]
    async fn test_issue_rejects_negative_quantity() {
        let app = init().await;

        let res = test::TestRequest::post()
            .set_json(form("-3"))
            .append_header(("Authorization", format!("Bearer {}", admin_token())))
            .uri("/api/v1/admin/coupons")
            .send_request(&app)
            .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_template_listing_needs_token() {
        let app = init().await;

        let res = test::TestRequest::get()
            .uri("/api/v1/admin/coupons/1")
            .send_request(&app)
            .await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
