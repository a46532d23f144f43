use argon2::{
    password_hash::{
        rand_core::OsRng, Error, PasswordHasher, SaltString
    }, Argon2, PasswordHash, PasswordVerifier
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;

use crate::schema::JWTClaims;

const TOKEN_TTL_HOURS: i64 = 24;

pub fn hash_password(password:&str)->Result<String, Error>{

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let password_hash = argon2.hash_password(password.as_bytes(), salt.as_salt())?.to_string();
    Ok(password_hash)
}

pub fn verify_password(password:&str, hash:&str)->Result<(), Error>{

    let argon2 = Argon2::default(); 
    let parsed_hash = PasswordHash::new(hash)?;
    argon2.verify_password(password.as_bytes(), &parsed_hash)?;

    Ok(())
}

pub fn issue_token(email:&str, secret:&str) -> Result<String, jsonwebtoken::errors::Error>{

    let expires_at = Utc::now() + Duration::hours(TOKEN_TTL_HOURS);

    let claims = JWTClaims{
        sub: email.to_string(),
        exp: expires_at.timestamp() as usize
    };

    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
}

/// Returns the email stored in the token's `sub` claim.
pub fn decode_token(token:&str, secret:&str) -> Result<String, jsonwebtoken::errors::Error>{

    let token = token.strip_prefix("Bearer ").unwrap_or(token);

    let decoded = decode::<JWTClaims>(token, &DecodingKey::from_secret(secret.as_bytes()), &Validation::default())?;

    Ok(decoded.claims.sub)
}

/// Draws `len` characters independently from `charset`.
pub fn random_string(charset:&[u8], len:usize) -> String{

    let mut rng = rand::rng();

    (0..len)
        .map(|_| charset[rng.random_range(0..charset.len())] as char)
        .collect()
}
