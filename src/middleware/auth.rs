use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

pub const ROLE_RECRUITER: &str = "recruiter";
pub const ROLE_SEEKER: &str = "seeker";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub role: Option<String>,
}

impl Claims {
    pub fn user_id(&self) -> crate::error::Result<Uuid> {
        self.sub
            .parse()
            .map_err(|_| crate::error::Error::Unauthorized("Invalid subject claim".to_string()))
    }
}

fn unauthorized(code: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": code }))).into_response()
}

fn decode_claims(req: &Request) -> Result<Claims, Response> {
    let Some(auth_header) = req.headers().get(axum::http::header::AUTHORIZATION) else {
        return Err(unauthorized("missing_authorization"));
    };
    let Ok(auth_str) = auth_header.to_str() else {
        return Err(unauthorized("bad_authorization"));
    };
    let Some(token) = auth_str.strip_prefix("Bearer ") else {
        return Err(unauthorized("unsupported_scheme"));
    };

    let config = crate::config::get_config();
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    match decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    ) {
        Ok(data) => Ok(data.claims),
        Err(_) => Err(unauthorized("invalid_token")),
    }
}

async fn require_role(mut req: Request, next: Next, allowed: &[&str]) -> Response {
    let claims = match decode_claims(&req) {
        Ok(claims) => claims,
        Err(response) => return response,
    };

    let role = claims.role.clone().unwrap_or_default();
    if !allowed.is_empty() && !allowed.iter().any(|r| r.eq_ignore_ascii_case(&role)) {
        return (StatusCode::FORBIDDEN, Json(json!({"error":"forbidden"}))).into_response();
    }

    req.extensions_mut().insert(claims);
    next.run(req).await
}

pub async fn require_bearer_auth(req: Request, next: Next) -> Response {
    require_role(req, next, &[]).await
}

pub async fn require_recruiter(req: Request, next: Next) -> Response {
    require_role(req, next, &[ROLE_RECRUITER]).await
}

pub async fn require_seeker(req: Request, next: Next) -> Response {
    require_role(req, next, &[ROLE_SEEKER]).await
}
