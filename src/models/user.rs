use sqlx::{types::Uuid, Pool, Postgres};

use crate::{errors::{db_error, CustomError}, schema::{CreateAccount, StructWithId, StructWithVal}};

pub async fn check_user_exists(pool:&Pool<Postgres>, email:&str) -> Result<bool, CustomError>{

    let result = sqlx::query_as::<_, StructWithVal>(
        r#"
            SELECT email as val FROM user_table
            WHERE email = $1
        "#
    )
    .bind(email)
    .fetch_optional(pool)
    .await
    .map_err(db_error("Error while fetching user by email"))?;

    Ok(result.is_some())
}   

/// Returns `None` when the email is already registered.
pub async fn create_user(pool:&Pool<Postgres>, user_meta: CreateAccount) -> Result<Option<Uuid>, CustomError>{

    let user = sqlx::query_as::<_, StructWithId>(
        r#"
            INSERT INTO user_table (name, email, password)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO NOTHING
            RETURNING id
        "#
    )
    .bind(user_meta.name)
    .bind(user_meta.email)
    .bind(user_meta.password)
    .fetch_optional(pool)
    .await
    .map_err(db_error("Error while creating user"))?;

    Ok(user.map(|row| row.id))
}

pub async fn retrieve_password(pool:&Pool<Postgres>, email:&str) -> Result<String, CustomError>{

    let res = sqlx::query_as::<_, StructWithVal>(
        r#"
            SELECT password AS val FROM user_table
            WHERE email = $1
        "#
    )
    .bind(email)
    .fetch_one(pool)
    .await
    .map_err(db_error("Error while retrieving user password"))?;

    Ok(res.val)
}

pub async fn get_user_id_by_email(pool:&Pool<Postgres>, email:&str) -> Result<Uuid, CustomError>{

    let result = sqlx::query_as::<_, StructWithId>(
        r#"
            SELECT id FROM user_table
            WHERE email = $1
        "#
    )
    .bind(email)
    .fetch_optional(pool)
    .await
    .map_err(db_error("Error while fetching user id"))?;

    result
        .map(|row| row.id)
        .ok_or_else(|| CustomError::forbidden("Unknown user"))
}

#[cfg(test)]
mod tests{
    use crate::test_init_app::db_pool;

    use super::*;

    #[actix_web::test]
    #[ignore = "needs a Postgres DATABASE_URL"]
    async fn second_signup_with_same_email_is_skipped(){
        let pool = db_pool().await;

        let account = CreateAccount{
            name: "Kali".to_string(),
            email: format!("{}@dance.com", Uuid::new_v4()),
            password: "not-a-real-hash".to_string(),
        };

        let id = create_user(&pool, account.clone()).await.unwrap();
        assert!(id.is_some());
        assert!(check_user_exists(&pool, &account.email).await.unwrap());

        assert!(create_user(&pool, account).await.unwrap().is_none());
    }
}
