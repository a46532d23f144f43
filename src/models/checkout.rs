use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::{Json, Uuid}, FromRow, Pool, Postgres};

use crate::{errors::{db_error, CustomError}, models::lesson::Lesson, schema::lesson::Discount};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Checkout{
    pub checkout_id: Uuid,
    pub lesson_no: i32,
    pub user_id: Uuid,
    pub discounts: Json<Vec<Discount>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicantStatus{
    Confirmed,
    Pending,
}

/// Someone who opened a checkout for a lesson. Confirmed once any of their
/// checkouts for it is paid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Applicant{
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub status: ApplicantStatus,
}

#[derive(FromRow)]
struct ApplicantRow{
    user_id: Uuid,
    name: String,
    email: String,
    paid: bool,
}

impl From<ApplicantRow> for Applicant{
    fn from(row: ApplicantRow) -> Self{
        let status = if row.paid { ApplicantStatus::Confirmed } else { ApplicantStatus::Pending };
        Applicant{ user_id: row.user_id, name: row.name, email: row.email, status }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Payment{
    pub payment_id: Uuid,
    pub checkout_id: Uuid,
    pub lesson_no: i32,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Opens a checkout for `lesson`, snapshotting its current discount options.
pub async fn create_checkout(pool:&Pool<Postgres>, lesson:&Lesson, user_id:Uuid) -> Result<Checkout, CustomError>{

    sqlx::query_as::<_, Checkout>(
        r#"
            INSERT INTO checkout (checkout_id, lesson_no, user_id, discounts)
            VALUES ($1, $2, $3, $4)
            RETURNING *
        "#
    )
    .bind(Uuid::new_v4())
    .bind(lesson.lesson_no)
    .bind(user_id)
    .bind(&lesson.discounts)
    .fetch_one(pool)
    .await
    .map_err(db_error("Error while creating the checkout"))
}

pub async fn get_checkout(pool:&Pool<Postgres>, checkout_id:Uuid) -> Result<Option<Checkout>, CustomError>{

    sqlx::query_as::<_, Checkout>(
        r#"
            SELECT * FROM checkout
            WHERE checkout_id = $1
        "#
    )
    .bind(checkout_id)
    .fetch_optional(pool)
    .await
    .map_err(db_error("Error while fetching the checkout"))
}

/// Records the payment of `checkout`. Returns `None` when the checkout was
/// already paid, including by a concurrent request.
pub async fn create_payment(pool:&Pool<Postgres>, checkout:&Checkout) -> Result<Option<Payment>, CustomError>{

    sqlx::query_as::<_, Payment>(
        r#"
            INSERT INTO payments (payment_id, checkout_id, lesson_no, user_id)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (checkout_id) DO NOTHING
            RETURNING *
        "#
    )
    .bind(Uuid::new_v4())
    .bind(checkout.checkout_id)
    .bind(checkout.lesson_no)
    .bind(checkout.user_id)
    .fetch_optional(pool)
    .await
    .map_err(db_error("Error while saving the payment"))
}

pub async fn get_user_payments(pool:&Pool<Postgres>, user_id:Uuid) -> Result<Vec<Payment>, CustomError>{

    sqlx::query_as::<_, Payment>(
        r#"
            SELECT * FROM payments
            WHERE user_id = $1
            ORDER BY created_at DESC
        "#
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .map_err(db_error("Error while fetching user payments"))
}

pub async fn get_lesson_applicants(pool:&Pool<Postgres>, lesson_no:i32) -> Result<Vec<Applicant>, CustomError>{

    let rows = sqlx::query_as::<_, ApplicantRow>(
        r#"
            SELECT u.id AS user_id, u.name, u.email, BOOL_OR(p.payment_id IS NOT NULL) AS paid
            FROM checkout c
            JOIN user_table u ON u.id = c.user_id
            LEFT JOIN payments p ON p.checkout_id = c.checkout_id
            WHERE c.lesson_no = $1
            GROUP BY u.id, u.name, u.email
            ORDER BY u.name
        "#
    )
    .bind(lesson_no)
    .fetch_all(pool)
    .await
    .map_err(db_error("Error while fetching lesson applicants"))?;

    Ok(rows.into_iter().map(Applicant::from).collect())
}

#[cfg(test)]
mod tests{
    use crate::{models::{lesson::create_lesson, user::create_user}, schema::{lesson::tests::sample_form, CreateAccount}, test_init_app::db_pool};

    use super::*;

    async fn new_user(pool:&Pool<Postgres>, name:&str) -> Uuid{
        let account = CreateAccount{
            name: name.to_string(),
            email: format!("{}@dance.com", Uuid::new_v4()),
            password: "not-a-real-hash".to_string(),
        };
        create_user(pool, account).await.unwrap().unwrap()
    }

    #[test]
    fn applicants_are_confirmed_once_paid(){
        let row = |paid| ApplicantRow{ user_id: Uuid::new_v4(), name: "Kali".to_string(), email: "kali@dance.com".to_string(), paid };

        assert_eq!(Applicant::from(row(true)).status, ApplicantStatus::Confirmed);
        assert_eq!(Applicant::from(row(false)).status, ApplicantStatus::Pending);
    }

    #[actix_web::test]
    #[ignore = "needs a Postgres DATABASE_URL"]
    async fn concurrent_payments_record_exactly_one(){
        let pool = db_pool().await;
        let lesson = create_lesson(&pool, &sample_form()).await.unwrap();
        let user_id = new_user(&pool, "Kali").await;
        let checkout = create_checkout(&pool, &lesson, user_id).await.unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let pool = pool.clone();
                let checkout = checkout.clone();
                actix_web::rt::spawn(async move { create_payment(&pool, &checkout).await })
            })
            .collect();

        let mut recorded = 0;
        for handle in handles {
            if handle.await.unwrap().unwrap().is_some() {
                recorded += 1;
            }
        }
        assert_eq!(recorded, 1);

        assert!(create_payment(&pool, &checkout).await.unwrap().is_none());
        assert_eq!(get_user_payments(&pool, user_id).await.unwrap().len(), 1);
    }

    #[actix_web::test]
    #[ignore = "needs a Postgres DATABASE_URL"]
    async fn applicants_list_each_user_once(){
        let pool = db_pool().await;
        let lesson = create_lesson(&pool, &sample_form()).await.unwrap();

        let paying = new_user(&pool, "Browny").await;
        let waiting = new_user(&pool, "Kali").await;

        let first = create_checkout(&pool, &lesson, paying).await.unwrap();
        create_checkout(&pool, &lesson, paying).await.unwrap();
        create_payment(&pool, &first).await.unwrap();
        create_checkout(&pool, &lesson, waiting).await.unwrap();

        let applicants = get_lesson_applicants(&pool, lesson.lesson_no).await.unwrap();

        assert_eq!(applicants.len(), 2);
        assert_eq!(applicants[0].user_id, paying);
        assert_eq!(applicants[0].status, ApplicantStatus::Confirmed);
        assert_eq!(applicants[1].user_id, waiting);
        assert_eq!(applicants[1].status, ApplicantStatus::Pending);
    }
}
