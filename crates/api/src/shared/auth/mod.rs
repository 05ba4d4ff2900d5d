use crate::error::MedimateError;
use actix_web::HttpRequest;
use jsonwebtoken::{decode, DecodingKey, Validation};
use medimate_domain::{User, ID};
use medimate_infra::MedimateContext;
use serde::{Deserialize, Serialize};

/// Token claims issued by the account system at login.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub exp: usize,
    pub iat: usize,
    pub user_id: String,
}

fn parse_authtoken_header(token_header_value: &str) -> String {
    if token_header_value.len() < 6 || !token_header_value[..6].eq_ignore_ascii_case("bearer") {
        String::new()
    } else {
        token_header_value.trim()[6..].trim().to_string()
    }
}

/// Authenticates the request and resolves the calling `User`.
pub async fn protect_route(
    http_req: &HttpRequest,
    ctx: &MedimateContext,
) -> Result<User, MedimateError> {
    let token = match http_req.headers().get("Authorization") {
        Some(token) => token.to_str().map_err(|_| {
            MedimateError::Unauthorized("Authorization header is not valid utf-8".into())
        })?,
        None => {
            return Err(MedimateError::Unauthorized(
                "Missing authorization header".into(),
            ))
        }
    };
    let token = parse_authtoken_header(token);

    let claims = decode::<Claims>(
        &token,
        &DecodingKey::from_secret(ctx.config.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| MedimateError::Unauthorized(format!("Invalid token: {}", e)))?
    .claims;

    let user_id = claims
        .user_id
        .parse::<ID>()
        .map_err(|_| MedimateError::Unauthorized("Malformed user id in token".into()))?;

    ctx.repos.users.find(&user_id).await.ok_or_else(|| {
        MedimateError::Unauthorized("The user in the token could not be found".into())
    })
}
