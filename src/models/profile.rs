use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::{Json, Uuid}, FromRow, Pool, Postgres};

use crate::{errors::{db_error, CustomError}, schema::{profile::{BankInfo, ProfileForm}, Contact}, utils::random_string};

const PROFILE_ID_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const PROFILE_ID_LENGTH: usize = 8;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile{
    pub profile_id: String,
    pub user_id: Uuid,
    pub nickname: String,
    pub sex: String,
    pub is_instructor: bool,
    pub contacts: Json<Vec<Contact>>,
    pub bank_info: Option<Json<BankInfo>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub fn generate_profile_id() -> String{
    random_string(PROFILE_ID_CHARSET, PROFILE_ID_LENGTH)
}

/// Creates the user's profile or updates it in place. An existing
/// `profile_id` is never changed.
pub async fn upsert_profile(pool:&Pool<Postgres>, user_id:Uuid, form:&ProfileForm, bank_info:Option<BankInfo>) -> Result<Profile, CustomError>{

    sqlx::query_as::<_, Profile>(
        r#"
            INSERT INTO profiles (profile_id, user_id, nickname, sex, is_instructor, contacts, bank_info)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (user_id) DO UPDATE
            SET nickname = EXCLUDED.nickname,
                sex = EXCLUDED.sex,
                is_instructor = EXCLUDED.is_instructor,
                contacts = EXCLUDED.contacts,
                bank_info = EXCLUDED.bank_info,
                updated_at = now()
            RETURNING *
        "#
    )
    .bind(generate_profile_id())
    .bind(user_id)
    .bind(form.nickname.trim())
    .bind(form.sex.as_str())
    .bind(form.is_instructor)
    .bind(Json(&form.contacts))
    .bind(bank_info.map(Json))
    .fetch_one(pool)
    .await
    .map_err(db_error("Error while saving the profile"))
}

pub async fn get_user_profile(pool:&Pool<Postgres>, user_id:Uuid) -> Result<Option<Profile>, CustomError>{

    sqlx::query_as::<_, Profile>(
        r#"
            SELECT * FROM profiles
            WHERE user_id = $1
        "#
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .map_err(db_error("Error while fetching the profile"))
}

pub async fn get_all_profiles(pool:&Pool<Postgres>) -> Result<Vec<Profile>, CustomError>{

    sqlx::query_as::<_, Profile>(
        r#"
            SELECT * FROM profiles
            ORDER BY created_at DESC
        "#
    )
    .fetch_all(pool)
    .await
    .map_err(db_error("Error while fetching profiles"))
}

#[cfg(test)]
mod tests{
    use crate::{models::user::create_user, schema::{profile::Sex, CreateAccount}, test_init_app::db_pool};

    use super::*;

    fn form(nickname:&str) -> ProfileForm{
        ProfileForm{
            nickname: nickname.to_string(),
            sex: Sex::M,
            is_instructor: false,
            contacts: vec![],
            bank: None,
            account: None,
            account_owner: None,
        }
    }

    #[actix_web::test]
    #[ignore = "needs a Postgres DATABASE_URL"]
    async fn upsert_keeps_the_profile_id(){
        let pool = db_pool().await;

        let account = CreateAccount{
            name: "Kali".to_string(),
            email: format!("{}@dance.com", Uuid::new_v4()),
            password: "not-a-real-hash".to_string(),
        };
        let user_id = create_user(&pool, account).await.unwrap().unwrap();

        let created = upsert_profile(&pool, user_id, &form("kali"), None).await.unwrap();
        let updated = upsert_profile(&pool, user_id, &form("kali_swing"), None).await.unwrap();

        assert_eq!(updated.profile_id, created.profile_id);
        assert_eq!(updated.nickname, "kali_swing");
        assert!(updated.updated_at >= created.updated_at);

        let stored = get_user_profile(&pool, user_id).await.unwrap().unwrap();
        assert_eq!(stored.profile_id, created.profile_id);
    }

    #[test]
    fn profile_ids_are_eight_alphanumerics(){
        let id = generate_profile_id();

        assert_eq!(id.len(), 8);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
