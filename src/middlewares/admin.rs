use actix_web::{body::{EitherBody, MessageBody}, dev::{ServiceRequest, ServiceResponse}, middleware::Next, Error};

use crate::middlewares::authenticate;

pub async fn admin_middleware(
    req:ServiceRequest,
    next: Next<impl MessageBody>
) -> Result<ServiceResponse<EitherBody<impl MessageBody>>, Error>{

    match authenticate(&req, |state| state.config.admin_jwt_secret.as_str()) {
        Ok(()) => next.call(req).await.map(ServiceResponse::map_into_left_body),
        Err(e) => Ok(req.error_response(e).map_into_right_body()),
    }
}
