pub mod admin;
pub mod user;

use actix_web::{dev::ServiceRequest, web, HttpMessage};

use crate::{errors::CustomError, schema::StructWithEmail, utils::decode_token, GlobalState};

/// Verifies the `Authorization` token against the secret picked by `secret`
/// and stores the caller's email in the request extensions.
pub(crate) fn authenticate(req:&ServiceRequest, secret: impl Fn(&GlobalState) -> &str) -> Result<(), CustomError>{

    let state = req
        .app_data::<web::Data<GlobalState>>()
        .ok_or_else(|| CustomError::internal("Internal Error"))?;

    let token = req
        .headers()
        .get("Authorization")
        .ok_or_else(|| CustomError::unauthorized("Token Not found"))?
        .to_str()
        .map_err(|_| CustomError::unauthorized("Invalid token"))?;

    let email = decode_token(token, secret(state.get_ref())).map_err(|e| {
        tracing::warn!(error = %e, path = req.path(), "rejected token");
        CustomError::unauthorized("Invalid token")
    })?;

    req.extensions_mut().insert(StructWithEmail{ email });

    Ok(())
}
