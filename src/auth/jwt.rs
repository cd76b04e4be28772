use crate::models::{Claims, TokenType};
use jsonwebtoken::{DecodingKey, Validation, decode};

/// Decodes and validates an access token; refresh tokens are refused.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, String> {
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())?;

    if claims.token_type != TokenType::Access {
        return Err("Access token required".to_string());
    }
    Ok(claims)
}

#[cfg(test)]
pub(crate) mod testing {
    use std::time::{SystemTime, UNIX_EPOCH};

    use jsonwebtoken::{EncodingKey, Header, encode};

    use crate::model::role::Role;
    use crate::models::{Claims, TokenType};

    pub const SECRET: &str = "test-secret";

    pub fn token(
        role: Role,
        company_id: u64,
        employee_id: Option<u64>,
        token_type: TokenType,
    ) -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as usize;
        let claims = Claims {
            user_id: 500 + employee_id.unwrap_or(0),
            sub: "tester".to_string(),
            role: role as u8,
            exp: now + 900,
            jti: format!("jti-{now}"),
            token_type,
            employee_id,
            company_id,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    pub fn admin(company_id: u64) -> String {
        token(Role::Admin, company_id, None, TokenType::Access)
    }

    pub fn employee(company_id: u64, employee_id: u64) -> String {
        token(Role::Employee, company_id, Some(employee_id), TokenType::Access)
    }
}
