use serde::{Deserialize, Serialize};

use crate::errors::CustomError;

pub const MAX_COUPON_QUANTITY: usize = 1000;

/// Coupon issuance request as typed into the form; every field is text.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IssueCouponsForm{
    pub name: String,
    pub discount_amount: String,
    pub lesson_no: String,
    pub quantity: String,
}

/// A validated issuance request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueCoupons{
    pub name: String,
    pub discount_amount: i32,
    pub lesson_no: i32,
    pub quantity: usize,
}

fn parse_positive(value:&str, field:&str) -> Result<i64, CustomError>{
    let trimmed = value.trim();

    if trimmed.is_empty(){
        return Err(CustomError::bad_request(format!("{} is required", field)));
    }

    match trimmed.parse::<i64>() {
        Ok(n) if n > 0 => Ok(n),
        Ok(_) => Err(CustomError::bad_request(format!("{} must be greater than zero", field))),
        Err(_) => Err(CustomError::bad_request(format!("{} must be a whole number", field))),
    }
}

impl TryFrom<IssueCouponsForm> for IssueCoupons{
    type Error = CustomError;

    fn try_from(form: IssueCouponsForm) -> Result<Self, Self::Error>{
        let name = form.name.trim().to_string();

        if name.is_empty(){
            return Err(CustomError::bad_request("Coupon name is required"));
        }

        let discount_amount = i32::try_from(parse_positive(&form.discount_amount, "Discount amount")?)
            .map_err(|_| CustomError::bad_request("Discount amount is too large"))?;

        let lesson_no = i32::try_from(parse_positive(&form.lesson_no, "Lesson number")?)
            .map_err(|_| CustomError::bad_request("Lesson number is too large"))?;

        let quantity = parse_positive(&form.quantity, "Quantity")?;

        if quantity > MAX_COUPON_QUANTITY as i64 {
            return Err(CustomError::bad_request(format!("Quantity cannot exceed {}", MAX_COUPON_QUANTITY)));
        }

        Ok(IssueCoupons{
            name,
            discount_amount,
            lesson_no,
            quantity: quantity as usize,
        })
    }
}
