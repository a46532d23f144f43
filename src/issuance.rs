//! Coupon issuance: one template plus `quantity` individually coded coupons,
//! written through a [`CouponStore`] that either commits everything or nothing.

use std::collections::HashSet;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};

use crate::{errors::CustomError, models::coupon::{Coupon, CouponTemplate}, schema::coupon::IssueCoupons, utils::random_string};

pub const CODE_LENGTH: usize = 6;
pub const CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
pub const MAX_CODE_ATTEMPTS: usize = 5;

/// Transactional writes needed to issue coupons.
#[async_trait]
pub trait CouponStore: Send {
    async fn lesson_exists(&mut self, lesson_no:i32) -> Result<bool, CustomError>;

    async fn insert_template(&mut self, request:&IssueCoupons) -> Result<CouponTemplate, CustomError>;

    /// Returns the subset of `candidates` already used by existing coupons.
    async fn taken_codes(&mut self, candidates:&[String]) -> Result<Vec<String>, CustomError>;

    async fn insert_coupons(&mut self, template_id:i64, codes:&[String]) -> Result<Vec<Coupon>, CustomError>;

    async fn commit(self) -> Result<(), CustomError>;
}

#[derive(Debug, Serialize)]
pub struct IssuedCoupons{
    pub template: CouponTemplate,
    pub coupons: Vec<Coupon>,
}

pub fn generate_code() -> String{
    random_string(CODE_CHARSET, CODE_LENGTH)
}

/// Draws `quantity` codes that are distinct from each other and from every
/// code the store already holds.
async fn reserve_codes<S: CouponStore>(store:&mut S, quantity:usize) -> Result<Vec<String>, CustomError>{

    let mut codes: Vec<String> = Vec::with_capacity(quantity);
    let mut seen: HashSet<String> = HashSet::with_capacity(quantity);

    for attempt in 1..=MAX_CODE_ATTEMPTS {
        let mut batch = Vec::with_capacity(quantity - codes.len());

        while codes.len() + batch.len() < quantity {
            let code = generate_code();
            if seen.insert(code.clone()) {
                batch.push(code);
            }
        }

        let taken: HashSet<String> = store.taken_codes(&batch).await?.into_iter().collect();

        if !taken.is_empty() {
            warn!(attempt, collisions = taken.len(), "coupon codes already in use, drawing again");
        }

        codes.extend(batch.into_iter().filter(|code| !taken.contains(code)));

        if codes.len() == quantity {
            return Ok(codes);
        }
    }

    Err(CustomError::internal("Could not generate unique coupon codes"))
}

/// Issues the coupons described by `request` and commits the store.
///
/// On any error the store is dropped uncommitted, so neither the template
/// nor any coupon is persisted.
pub async fn issue_coupons<S: CouponStore>(mut store:S, request:&IssueCoupons) -> Result<IssuedCoupons, CustomError>{

    if !store.lesson_exists(request.lesson_no).await? {
        return Err(CustomError::not_found(format!("Lesson #{} not found", request.lesson_no)));
    }

    let template = store.insert_template(request).await?;

    let codes = reserve_codes(&mut store, request.quantity).await?;

    let coupons = store.insert_coupons(template.id, &codes).await?;

    store.commit().await?;

    info!(template_id = template.id, lesson_no = template.lesson_no, issued = coupons.len(), "coupons issued");

    Ok(IssuedCoupons{ template, coupons })
}
