use crate::auth::jwt::verify_token;
use crate::config::Config;
use crate::error::PayrollError;
use crate::model::role::Role;
use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload, web::Data};
use futures::future::{Ready, ready};

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: u64,
    pub username: String,
    pub role: Role,
    pub company_id: u64,

    /// Present only if this user is linked to an employee record
    pub employee_id: Option<u64>,
}

impl AuthUser {
    /// Builds the caller from an `Authorization` header value.
    pub fn from_bearer(header: Option<&str>, secret: &str) -> Result<Self, PayrollError> {
        let header = header
            .ok_or_else(|| PayrollError::Unauthenticated("Missing Authorization header".into()))?;
        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            PayrollError::Unauthenticated("Authorization header must start with Bearer".into())
        })?;

        let claims = verify_token(token, secret).map_err(|e| {
            tracing::debug!(error = %e, "Token rejected");
            PayrollError::Unauthenticated("Invalid or expired token".into())
        })?;

        let role = Role::from_id(claims.role)
            .ok_or_else(|| PayrollError::Unauthenticated("Invalid role".into()))?;

        Ok(AuthUser {
            user_id: claims.user_id,
            username: claims.sub,
            role,
            company_id: claims.company_id,
            employee_id: claims.employee_id,
        })
    }

    pub fn is_admin(&self) -> bool {
        self.role.manages_payroll()
    }

    pub fn require_admin(&self) -> Result<(), PayrollError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(PayrollError::Authorization("Admin only".into()))
        }
    }

    /// Admins see their whole company; employees only their own record.
    pub fn can_view_employee(&self, employee_id: u64) -> bool {
        self.is_admin() || self.employee_id == Some(employee_id)
    }
}

impl FromRequest for AuthUser {
    type Error = PayrollError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        if let Some(user) = req.extensions().get::<AuthUser>() {
            return ready(Ok(user.clone()));
        }

        let config = match req.app_data::<Data<Config>>() {
            Some(c) => c,
            None => {
                return ready(Err(PayrollError::Unauthenticated(
                    "Authentication is not configured".into(),
                )));
            }
        };

        let header = req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok());

        ready(AuthUser::from_bearer(header, &config.jwt_secret))
    }
}
