use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::error::PayrollError;
use actix_web::middleware::Next;
use actix_web::{
    Error, HttpMessage, ResponseError,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    web::Data,
};

/// Verifies the bearer token once per request and stores the caller in the
/// request extensions for the [`AuthUser`] extractor.
pub async fn auth_middleware(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let config = req
        .app_data::<Data<Config>>()
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("App config missing"))?;

    let header = req
        .headers()
        .get("Authorization")
        .map(|h| h.to_str())
        .transpose()
        .map_err(|_| PayrollError::Unauthenticated("Invalid Authorization header encoding".into()));

    let auth_user = match header.and_then(|h| AuthUser::from_bearer(h, &config.jwt_secret)) {
        Ok(user) => user,
        Err(e) => {
            let resp = e.error_response();
            return Ok(req.into_response(resp));
        }
    };

    req.extensions_mut().insert(auth_user);

    next.call(req).await
}
