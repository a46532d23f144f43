use serde::{Deserialize, Serialize};

use crate::{errors::CustomError, schema::Contact};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex{
    M,
    F,
}

impl Sex{
    pub fn as_str(&self) -> &'static str{
        match self {
            Sex::M => "M",
            Sex::F => "F",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankInfo{
    pub bank: String,
    pub account: String,
    pub owner: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileForm{
    pub nickname: String,
    pub sex: Sex,
    #[serde(default)]
    pub is_instructor: bool,
    #[serde(default)]
    pub contacts: Vec<Contact>,
    #[serde(default)]
    pub bank: Option<String>,
    #[serde(default)]
    pub account: Option<String>,
    #[serde(default)]
    pub account_owner: Option<String>,
}

impl ProfileForm{
    /// Validates the form and returns the bank info to store, if any.
    ///
    /// Bank details are only kept for instructors, and only when all three
    /// fields are filled in.
    pub fn validate(&self) -> Result<Option<BankInfo>, CustomError>{
        if self.nickname.trim().is_empty(){
            return Err(CustomError::bad_request("Nickname is required"));
        }

        for contact in &self.contacts {
            contact.validate()?;
        }

        if !self.is_instructor {
            return Ok(None);
        }

        let filled = |field: &Option<String>| {
            field.as_deref().map(str::trim).filter(|val| !val.is_empty()).map(str::to_string)
        };

        match (filled(&self.bank), filled(&self.account), filled(&self.account_owner)) {
            (None, None, None) => Ok(None),
            (Some(bank), Some(account), Some(owner)) => Ok(Some(BankInfo{ bank, account, owner })),
            _ => Err(CustomError::bad_request("Fill in all bank account fields")),
        }
    }
}
