use sqlx::{types::Uuid, Pool, Postgres};

use crate::{errors::{db_error, CustomError}, schema::{CreateAccount, StructWithId, StructWithVal}};

/// Returns `None` when the email is already registered.
pub async fn create_admin(pool:&Pool<Postgres>, admin_meta: CreateAccount) -> Result<Option<Uuid>, CustomError>{

    let admin = sqlx::query_as::<_, StructWithId>(
        r#"
            INSERT INTO admin_table (name, email, password)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO NOTHING
            RETURNING id
        "#
    )
    .bind(admin_meta.name)
    .bind(admin_meta.email)
    .bind(admin_meta.password)
    .fetch_optional(pool)
    .await
    .map_err(db_error("Error while creating admin"))?;

    Ok(admin.map(|row| row.id))
}

pub async fn retrieve_admin_password(pool:&Pool<Postgres>, email:&str) -> Result<String, CustomError>{

    let res = sqlx::query_as::<_, StructWithVal>(
        r#"
            SELECT password AS val FROM admin_table
            WHERE email = $1
        "#
    )
    .bind(email)
    .fetch_one(pool)
    .await
    .map_err(db_error("Error while retrieving admin password"))?;

    Ok(res.val)
}

pub async fn check_admin_exists(pool:&Pool<Postgres>, email:&str) -> Result<bool, CustomError>{

    let result = sqlx::query_as::<_, StructWithVal>(
        r#"
            SELECT email as val FROM admin_table
            WHERE email = $1
        "#
    )
    .bind(email)
    .fetch_optional(pool)
    .await
    .map_err(db_error("Error while fetching admin by email"))?;

    Ok(result.is_some())
}
