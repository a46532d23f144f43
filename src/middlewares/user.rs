use actix_web::{body::{EitherBody, MessageBody}, dev::{ServiceRequest, ServiceResponse}, middleware::Next, Error};

use crate::middlewares::authenticate;

pub async fn user_middleware(
    req:ServiceRequest, 
    next: Next<impl MessageBody>) -> Result<ServiceResponse<EitherBody<impl MessageBody>>, Error>
{   

    match authenticate(&req, |state| state.config.user_jwt_secret.as_str()) {
        Ok(()) => next.call(req).await.map(ServiceResponse::map_into_left_body),
        // reject here so the error reaches the client as a normal response
        Err(e) => Ok(req.error_response(e).map_into_right_body()),
    }
}
