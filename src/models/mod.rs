pub mod admin;
pub mod user;
pub mod lesson;
pub mod coupon;
pub mod checkout;
pub mod profile;
