use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::{Json, Uuid}, FromRow, Pool, Postgres};

use crate::{errors::{db_error, CustomError}, schema::{lesson::{Discount, LessonForm, LessonStatus}, Contact}};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Lesson{
    pub lesson_no: i32,
    pub lesson_id: Uuid,
    pub title: String,
    pub genre: String,
    pub instructor1: String,
    pub instructor2: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub datetime_sub_texts: Vec<String>,
    pub region: String,
    pub place: String,
    pub place_url: Option<String>,
    pub price: i32,
    pub discounts: Json<Vec<Discount>>,
    pub discount_sub_texts: Vec<String>,
    pub bank: String,
    pub account_number: String,
    pub account_owner: String,
    pub contacts: Json<Vec<Contact>>,
    pub notices: Vec<String>,
    pub image_url: Option<String>,
    pub status: LessonStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Inserts the lesson under the next free `lesson_no`.
///
/// The table is locked for the duration of the transaction so that two
/// concurrent creations cannot pick the same number.
pub async fn create_lesson(pool:&Pool<Postgres>, form:&LessonForm) -> Result<Lesson, CustomError>{

    let mut tx = pool.begin().await.map_err(db_error("Error while creating a lesson"))?;

    sqlx::query("LOCK TABLE lessons IN EXCLUSIVE MODE")
        .execute(&mut *tx)
        .await
        .map_err(db_error("Error while creating a lesson"))?;

    let next_lesson_no: i32 = sqlx::query_scalar("SELECT COALESCE(MAX(lesson_no), 0) + 1 FROM lessons")
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error("Error while numbering the lesson"))?;

    let lesson = sqlx::query_as::<_, Lesson>(
        r#"
            INSERT INTO lessons (
                lesson_no, lesson_id, title, genre, instructor1, instructor2,
                start_date, end_date, start_time, end_time, datetime_sub_texts,
                region, place, place_url, price, discounts, discount_sub_texts,
                bank, account_number, account_owner, contacts, notices, image_url, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, $21, $22, $23, $24)
            RETURNING *
        "#
    )
    .bind(next_lesson_no)
    .bind(Uuid::new_v4())
    .bind(&form.title)
    .bind(&form.genre)
    .bind(&form.instructor1)
    .bind(&form.instructor2)
    .bind(form.start_date)
    .bind(form.end_date)
    .bind(form.start_time)
    .bind(form.end_time)
    .bind(&form.datetime_sub_texts)
    .bind(&form.region)
    .bind(&form.place)
    .bind(&form.place_url)
    .bind(form.price)
    .bind(Json(&form.discounts))
    .bind(&form.discount_sub_texts)
    .bind(&form.bank)
    .bind(&form.account_number)
    .bind(&form.account_owner)
    .bind(Json(&form.contacts))
    .bind(&form.notices)
    .bind(&form.image_url)
    .bind(form.status)
    .fetch_one(&mut *tx)
    .await
    .map_err(db_error("Error while creating a lesson"))?;

    tx.commit().await.map_err(db_error("Error while creating a lesson"))?;

    Ok(lesson)
}

pub async fn get_lesson(pool:&Pool<Postgres>, lesson_no:i32) -> Result<Option<Lesson>, CustomError>{

    sqlx::query_as::<_, Lesson>(
        r#"
            SELECT * FROM lessons
            WHERE lesson_no = $1
        "#
    )
    .bind(lesson_no)
    .fetch_optional(pool)
    .await
    .map_err(db_error("Error while fetching the lesson"))
}

pub async fn update_lesson(pool:&Pool<Postgres>, lesson_no:i32, form:&LessonForm) -> Result<Option<Lesson>, CustomError>{

    sqlx::query_as::<_, Lesson>(
        r#"
            UPDATE lessons
            SET title = $2, genre = $3, instructor1 = $4, instructor2 = $5,
                start_date = $6, end_date = $7, start_time = $8, end_time = $9,
                datetime_sub_texts = $10, region = $11, place = $12, place_url = $13,
                price = $14, discounts = $15, discount_sub_texts = $16, bank = $17,
                account_number = $18, account_owner = $19, contacts = $20, notices = $21,
                image_url = COALESCE($22, image_url), status = $23, updated_at = now()
            WHERE lesson_no = $1
            RETURNING *
        "#
    )
    .bind(lesson_no)
    .bind(&form.title)
    .bind(&form.genre)
    .bind(&form.instructor1)
    .bind(&form.instructor2)
    .bind(form.start_date)
    .bind(form.end_date)
    .bind(form.start_time)
    .bind(form.end_time)
    .bind(&form.datetime_sub_texts)
    .bind(&form.region)
    .bind(&form.place)
    .bind(&form.place_url)
    .bind(form.price)
    .bind(Json(&form.discounts))
    .bind(&form.discount_sub_texts)
    .bind(&form.bank)
    .bind(&form.account_number)
    .bind(&form.account_owner)
    .bind(Json(&form.contacts))
    .bind(&form.notices)
    .bind(&form.image_url)
    .bind(form.status)
    .fetch_optional(pool)
    .await
    .map_err(db_error("Error while updating the lesson"))
}

pub async fn set_lesson_image(pool:&Pool<Postgres>, lesson_no:i32, image_url:&str) -> Result<Option<Lesson>, CustomError>{

    sqlx::query_as::<_, Lesson>(
        r#"
            UPDATE lessons
            SET image_url = $2, updated_at = now()
            WHERE lesson_no = $1
            RETURNING *
        "#
    )
    .bind(lesson_no)
    .bind(image_url)
    .fetch_optional(pool)
    .await
    .map_err(db_error("Error while saving the lesson image"))
}

impl Lesson{
    pub fn is_published(&self) -> bool{
        self.status == LessonStatus::Published
    }
}

/// Every lesson, drafts included.
pub async fn get_all_lessons(pool:&Pool<Postgres>) -> Result<Vec<Lesson>, CustomError>{

    sqlx::query_as::<_, Lesson>(
        r#"
            SELECT * FROM lessons
            ORDER BY created_at DESC
        "#
    )
    .fetch_all(pool)
    .await
    .map_err(db_error("Error while fetching all the lessons"))
}

pub async fn get_published_lessons(pool:&Pool<Postgres>) -> Result<Vec<Lesson>, CustomError>{

    sqlx::query_as::<_, Lesson>(
        r#"
            SELECT * FROM lessons
            WHERE status = 'published'
            ORDER BY created_at DESC
        "#
    )
    .fetch_all(pool)
    .await
    .map_err(db_error("Error while fetching the lessons"))
}
