use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::{errors::CustomError, schema::Contact};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountKind{
    Earlybird,
    Gender,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenderCondition{
    Male,
    Female,
}

/// Drafts are only visible to admins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "lesson_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LessonStatus{
    #[default]
    Draft,
    Published,
}

/// A discount option offered on a lesson. Early-bird discounts apply until
/// `date`, gender discounts apply to buyers matching `condition`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Discount{
    #[serde(rename = "type")]
    pub kind: DiscountKind,
    #[serde(default)]
    pub condition: Option<GenderCondition>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    pub amount: i32,
}

impl Discount{
    pub fn validate(&self) -> Result<(), CustomError>{
        if self.amount <= 0 {
            return Err(CustomError::bad_request("Discount amount must be positive"));
        }

        match self.kind {
            DiscountKind::Earlybird if self.date.is_none() => {
                Err(CustomError::bad_request("Early-bird discount needs a date"))
            },
            DiscountKind::Gender if self.condition.is_none() => {
                Err(CustomError::bad_request("Gender discount needs a condition"))
            },
            _ => Ok(()),
        }
    }
}

/// Body of both the create and the update lesson requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonForm{
    pub title: String,
    pub genre: String,
    pub instructor1: String,
    #[serde(default)]
    pub instructor2: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(default)]
    pub datetime_sub_texts: Vec<String>,
    pub region: String,
    pub place: String,
    #[serde(default)]
    pub place_url: Option<String>,
    pub price: i32,
    #[serde(default)]
    pub discounts: Vec<Discount>,
    #[serde(default)]
    pub discount_sub_texts: Vec<String>,
    pub bank: String,
    pub account_number: String,
    pub account_owner: String,
    #[serde(default)]
    pub contacts: Vec<Contact>,
    #[serde(default)]
    pub notices: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub status: LessonStatus,
}

impl LessonForm{
    pub fn validate(&self) -> Result<(), CustomError>{
        let required = [
            ("Title", &self.title),
            ("Genre", &self.genre),
            ("Instructor", &self.instructor1),
            ("Region", &self.region),
            ("Place", &self.place),
        ];

        for (field, value) in required {
            if value.trim().is_empty(){
                return Err(CustomError::bad_request(format!("{} is required", field)));
            }
        }

        if self.price < 0 {
            return Err(CustomError::bad_request("Price cannot be negative"));
        }

        if self.end_date < self.start_date {
            return Err(CustomError::bad_request("End date is before start date"));
        }

        if self.start_date == self.end_date && self.end_time <= self.start_time {
            return Err(CustomError::bad_request("End time must be after start time on a one-day lesson"));
        }

        for discount in &self.discounts {
            discount.validate()?;
        }

        for contact in &self.contacts {
            contact.validate()?;
        }

        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
pub struct ImageUploadResponse{
    pub url: String,
}
