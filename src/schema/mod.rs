use serde::{Deserialize, Serialize};
use sqlx::{types::Uuid, FromRow};

use crate::errors::CustomError;

pub mod lesson;
pub mod coupon;
pub mod checkout;
pub mod profile;

#[derive(Deserialize, Serialize, Debug)]
pub struct JWTClaims{
    pub sub: String,
    pub exp: usize,
}

#[derive(FromRow)]
pub struct StructWithId{
    pub id: Uuid,
}

#[derive(FromRow)]
pub struct StructWithVal{
    pub val: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct SignupResponse{
    pub message: String,
    pub id: String
}

#[derive(Deserialize, Serialize)]
pub struct EmailAndPassword{
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize)]
pub struct SigninResponse{
    pub message: String,
    pub token: String,
}

/// Signup body shared by admins and users.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateAccount{
    pub name: String,
    pub email: String,
    pub password: String,
}

impl CreateAccount{
    pub fn validate(&self) -> Result<(), CustomError>{
        validate_account(&self.name, &self.email, &self.password)
    }
}

#[derive(Serialize, Clone)]
pub struct StructWithEmail{
    pub email: String,
}

fn validate_account(name:&str, email:&str, password:&str) -> Result<(), CustomError>{
    if name.trim().is_empty(){
        return Err(CustomError::bad_request("Name is required"));
    }

    let email = email.trim();
    if email.is_empty() || !email.contains('@'){
        return Err(CustomError::bad_request("Enter a valid email"));
    }

    if password.chars().count() < 8 {
        return Err(CustomError::bad_request("Password must be at least 8 characters"));
    }

    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactKind{
    Phone,
    Kakaotalk,
    Instagram,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact{
    #[serde(rename = "type")]
    pub kind: ContactKind,
    pub address: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl Contact{
    pub fn validate(&self) -> Result<(), CustomError>{
        if self.address.trim().is_empty(){
            return Err(CustomError::bad_request("Contact address is required"));
        }

        let has_name = self.name.as_deref().is_some_and(|name| !name.trim().is_empty());

        match self.kind {
            ContactKind::Phone | ContactKind::Kakaotalk if !has_name => {
                Err(CustomError::bad_request("Contact name is required for phone and kakaotalk"))
            },
            _ => Ok(()),
        }
    }
}
