use actix_web::{get, post, web::{self, Json}, HttpRequest, HttpResponse};
use sqlx::types::Uuid;

use crate::{errors::CustomError, handlers::current_user_id, models::{checkout::{self, Checkout, Payment}, lesson::get_lesson}, schema::checkout::{CreateCheckout, PaymentResponse}, GlobalState};

fn parse_checkout_id(raw:&str) -> Result<Uuid, CustomError>{
    Uuid::parse_str(raw).map_err(|_| CustomError::bad_request("Invalid checkout id"))
}

/// Only the user who opened a checkout may see or pay it.
fn ensure_owner(checkout:Option<Checkout>, user_id:Uuid) -> Result<Checkout, CustomError>{

    let checkout = checkout.ok_or_else(|| CustomError::not_found("Checkout not found"))?;

    if checkout.user_id != user_id {
        return Err(CustomError::forbidden("Unauthorized"));
    }

    Ok(checkout)
}

/// The payment insert skips checkouts that already have one.
fn recorded_payment(payment:Option<Payment>) -> Result<Payment, CustomError>{
    payment.ok_or_else(|| CustomError::bad_request("Already Paid"))
}

async fn owned_checkout(data:&GlobalState, checkout_id:Uuid, user_id:Uuid) -> Result<Checkout, CustomError>{
    ensure_owner(checkout::get_checkout(&data.pool, checkout_id).await?, user_id)
}

#[post("")]
pub async fn create_checkout_handler(data:web::Data<GlobalState>, body:Json<CreateCheckout>, req:HttpRequest) -> Result<HttpResponse, CustomError>{

    let pool = &data.pool;

    let user_id = current_user_id(pool, &req).await?;

    let lesson = get_lesson(pool, body.lesson_no)
        .await?
        .ok_or_else(|| CustomError::not_found(format!("Lesson #{} not found", body.lesson_no)))?;

    if !lesson.is_published() {
        return Err(CustomError::bad_request("Lesson is not open for booking"));
    }

    let checkout = checkout::create_checkout(pool, &lesson, user_id).await?;

    Ok(HttpResponse::Created().json(checkout))
}

#[get("/{checkout_id}")]
pub async fn get_checkout_handler(data:web::Data<GlobalState>, path:web::Path<String>, req:HttpRequest) -> Result<HttpResponse, CustomError>{

    let checkout_id = parse_checkout_id(&path.into_inner())?;

    let user_id = current_user_id(&data.pool, &req).await?;

    let checkout = owned_checkout(&data, checkout_id, user_id).await?;

    Ok(HttpResponse::Ok().json(checkout))
}

#[post("/{checkout_id}/pay")]
pub async fn pay_checkout_handler(data:web::Data<GlobalState>, path:web::Path<String>, req:HttpRequest) -> Result<HttpResponse, CustomError>{

    let checkout_id = parse_checkout_id(&path.into_inner())?;

    let pool = &data.pool;

    let user_id = current_user_id(pool, &req).await?;

    let checkout = owned_checkout(&data, checkout_id, user_id).await?;

    let payment = recorded_payment(checkout::create_payment(pool, &checkout).await?)?;

    tracing::info!(payment_id = %payment.payment_id, lesson_no = payment.lesson_no, "payment completed");

    Ok(HttpResponse::Ok().json(PaymentResponse{ payment_id: payment.payment_id.to_string(), message: "Paid Successfully".to_string() }))
}
