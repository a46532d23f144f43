use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
pub struct CreateCheckout{
    pub lesson_no: i32,
}

#[derive(Serialize, Deserialize)]
pub struct PaymentResponse{
    pub payment_id: String,
    pub message: String,
}
