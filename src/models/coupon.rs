use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Pool, Postgres, Transaction};

use crate::{errors::{db_error, CustomError}, issuance::CouponStore, schema::coupon::IssueCoupons};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "coupon_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CouponStatus{
    Available,
    Used,
    Expired,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CouponTemplate{
    pub id: i64,
    pub name: String,
    pub discount_amount: i32,
    pub lesson_no: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Coupon{
    pub id: i64,
    pub template_id: i64,
    pub code: String,
    pub status: CouponStatus,
    pub used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// A template together with how many of its coupons exist and are still redeemable.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CouponTemplateSummary{
    pub id: i64,
    pub name: String,
    pub discount_amount: i32,
    pub lesson_no: i32,
    pub created_at: DateTime<Utc>,
    pub total_coupons: i64,
    pub available_coupons: i64,
}

/// Issuance store backed by one Postgres transaction.
///
/// Dropping the store without calling `commit` rolls every write back.
pub struct PgCouponStore{
    tx: Transaction<'static, Postgres>,
}

impl PgCouponStore{
    pub async fn begin(pool:&Pool<Postgres>) -> Result<Self, CustomError>{
        let tx = pool.begin().await.map_err(db_error("Error while starting coupon issuance"))?;
        Ok(PgCouponStore{ tx })
    }
}

#[async_trait]
impl CouponStore for PgCouponStore{
    async fn lesson_exists(&mut self, lesson_no:i32) -> Result<bool, CustomError>{
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM lessons WHERE lesson_no = $1)")
            .bind(lesson_no)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(db_error("Error while fetching the lesson"))
    }

    async fn insert_template(&mut self, request:&IssueCoupons) -> Result<CouponTemplate, CustomError>{
        sqlx::query_as::<_, CouponTemplate>(
            r#"
                INSERT INTO coupon_templates (name, discount_amount, lesson_no)
                VALUES ($1, $2, $3)
                RETURNING id, name, discount_amount, lesson_no, created_at
            "#
        )
        .bind(&request.name)
        .bind(request.discount_amount)
        .bind(request.lesson_no)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(db_error("Error while creating the coupon template"))
    }

    async fn taken_codes(&mut self, candidates:&[String]) -> Result<Vec<String>, CustomError>{
        sqlx::query_scalar::<_, String>("SELECT code FROM coupons WHERE code = ANY($1)")
            .bind(candidates)
            .fetch_all(&mut *self.tx)
            .await
            .map_err(db_error("Error while checking coupon codes"))
    }

    async fn insert_coupons(&mut self, template_id:i64, codes:&[String]) -> Result<Vec<Coupon>, CustomError>{
        sqlx::query_as::<_, Coupon>(
            r#"
                INSERT INTO coupons (template_id, code)
                SELECT $1, code FROM UNNEST($2::text[]) AS code
                RETURNING id, template_id, code, status, used_at, created_at
            "#
        )
        .bind(template_id)
        .bind(codes)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(db_error("Error while creating coupons"))
    }

    async fn commit(self) -> Result<(), CustomError>{
        self.tx.commit().await.map_err(db_error("Error while saving coupons"))
    }
}

pub async fn get_all_templates(pool:&Pool<Postgres>) -> Result<Vec<CouponTemplateSummary>, CustomError>{

    sqlx::query_as::<_, CouponTemplateSummary>(
        r#"
            SELECT t.id, t.name, t.discount_amount, t.lesson_no, t.created_at,
                   COUNT(c.id) AS total_coupons,
                   COUNT(c.id) FILTER (WHERE c.status = 'available') AS available_coupons
            FROM coupon_templates t
            LEFT JOIN coupons c ON c.template_id = t.id
            GROUP BY t.id
            ORDER BY t.created_at DESC
        "#
    )
    .fetch_all(pool)
    .await
    .map_err(db_error("Error while fetching coupon templates"))
}

pub async fn template_exists(pool:&Pool<Postgres>, template_id:i64) -> Result<bool, CustomError>{

    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM coupon_templates WHERE id = $1)")
        .bind(template_id)
        .fetch_one(pool)
        .await
        .map_err(db_error("Error while fetching the coupon template"))
}

pub async fn get_template_coupons(pool:&Pool<Postgres>, template_id:i64) -> Result<Vec<Coupon>, CustomError>{

    sqlx::query_as::<_, Coupon>(
        r#"
            SELECT id, template_id, code, status, used_at, created_at
            FROM coupons
            WHERE template_id = $1
            ORDER BY created_at DESC, id DESC
        "#
    )
    .bind(template_id)
    .fetch_all(pool)
    .await
    .map_err(db_error("Error while fetching coupons"))
}

#[cfg(test)]
mod tests{
    use crate::{issuance::issue_coupons, models::lesson::create_lesson, schema::lesson::tests::sample_form, test_init_app::db_pool};

    use super::*;

    fn request(lesson_no:i32, quantity:usize) -> IssueCoupons{
        IssueCoupons{ name: "Spring welcome".to_string(), discount_amount: 5000, lesson_no, quantity }
    }

    #[actix_web::test]
    #[ignore = "needs a Postgres DATABASE_URL"]
    async fn issued_coupons_are_persisted_and_counted(){
        let pool = db_pool().await;
        let lesson = create_lesson(&pool, &sample_form()).await.unwrap();

        let store = PgCouponStore::begin(&pool).await.unwrap();
        let issued = issue_coupons(store, &request(lesson.lesson_no, 20)).await.unwrap();

        let coupons = get_template_coupons(&pool, issued.template.id).await.unwrap();
        assert_eq!(coupons.len(), 20);
        assert!(coupons.iter().all(|c| c.status == CouponStatus::Available));

        let summary = get_all_templates(&pool).await.unwrap()
            .into_iter()
            .find(|t| t.id == issued.template.id)
            .unwrap();
        assert_eq!(summary.total_coupons, 20);
        assert_eq!(summary.available_coupons, 20);
    }

    #[actix_web::test]
    #[ignore = "needs a Postgres DATABASE_URL"]
    async fn duplicate_code_rolls_back_the_template(){
        let pool = db_pool().await;
        let lesson = create_lesson(&pool, &sample_form()).await.unwrap();

        let store = PgCouponStore::begin(&pool).await.unwrap();
        let existing = issue_coupons(store, &request(lesson.lesson_no, 1)).await.unwrap();
        let taken = existing.coupons[0].code.clone();

        let mut store = PgCouponStore::begin(&pool).await.unwrap();
        assert_eq!(store.taken_codes(&[taken.clone()]).await.unwrap(), vec![taken.clone()]);

        let template = store.insert_template(&request(lesson.lesson_no, 1)).await.unwrap();
        assert!(store.insert_coupons(template.id, &[taken]).await.is_err());
        drop(store);

        assert!(!template_exists(&pool, template.id).await.unwrap());
    }

    #[actix_web::test]
    #[ignore = "needs a Postgres DATABASE_URL"]
    async fn unknown_lesson_is_not_found(){
        let pool = db_pool().await;

        let store = PgCouponStore::begin(&pool).await.unwrap();
        let err = issue_coupons(store, &request(i32::MAX, 3)).await.unwrap_err();

        assert_eq!(err.status, actix_web::http::StatusCode::NOT_FOUND);
    }
}
