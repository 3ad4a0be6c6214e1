/*
 *
 *  *
 *  *      Copyright (c) 2018-2025, SnackCloud All rights reserved.
 *  *
 *  *   Redistribution and use in source and binary forms, with or without
 *  *   modification, are permitted provided that the following conditions are met:
 *  *
 *  *   Redistributions of source code must retain the above copyright notice,
 *  *   this list of conditions and the following disclaimer.
 *  *   Redistributions in binary form must reproduce the above copyright
 *  *   notice, this list of conditions and the following disclaimer in the
 *  *   documentation and/or other materials provided with the distribution.
 *  *   Neither the name of the www.snackcloud.cn developer nor the names of its
 *  *   contributors may be used to endorse or promote products derived from
 *  *   this software without specific prior written permission.
 *  *   Author: SnackCloud
 *  *
 *
 */

//!
//! JWT identities and a path based access check.
//!
//! Tokens are HS512 signed. Claims carry `userId`, `userRoles`, `userType`
//! and optionally `openId`; expiry is the standard `exp` claim in seconds.
//!
use std::time::{Duration, Instant};
use chrono::Utc;
use glob::Pattern;
use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use crate::errors::BusinessError;

pub type Claims = Map<String, JsonValue>;

/// Default lifetime of `JwtTokenTool` tokens.
pub const JWT_TOKEN_VALIDITY: Duration = Duration::from_secs(15 * 60);
/// Lifetime of identity tokens.
pub const IDENTITY_TOKEN_VALIDITY: Duration = Duration::from_secs(5 * 60 * 60);
pub const SYSTEM_USER: &str = "System";

const BEARER: &str = "Bearer ";

pub struct JwtTokenTool {
    secret: String,
    validity: Duration,
}

impl JwtTokenTool {
    pub fn new<S: Into<String>>(secret: S) -> Self {
        JwtTokenTool { secret: secret.into(), validity: JWT_TOKEN_VALIDITY }
    }

    pub fn with_validity(mut self, validity: Duration) -> Self {
        self.validity = validity;
        self
    }

    /// Signs `claims` valid for the configured duration from now.
    pub fn generate_token(&self, claims: Claims, subject: Option<&str>) -> Result<String, JwtError> {
        let validity = i64::try_from(self.validity.as_secs()).unwrap_or(i64::MAX);
        let expiration = Utc::now().timestamp().saturating_add(validity);
        self.generate_token_until(claims, subject, expiration)
    }

    /// Signs `claims` expiring at `expiration` epoch seconds.
    pub fn generate_token_until(&self, mut claims: Claims, subject: Option<&str>, expiration: i64) -> Result<String, JwtError> {
        claims.insert("exp".to_string(), JsonValue::from(expiration));
        if let Some(subject) = subject {
            claims.insert("sub".to_string(), JsonValue::from(subject));
        }
        encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
    }

    fn validation(check_expiry: bool) -> Validation {
        let mut validation = Validation::new(Algorithm::HS512);
        validation.leeway = 0;
        validation.validate_exp = check_expiry;
        validation
    }

    /// Verified claims. Expired tokens fail with `ErrorKind::ExpiredSignature`.
    pub fn all_claims(&self, token: &str) -> Result<Claims, JwtError> {
        let key = DecodingKey::from_secret(self.secret.as_bytes());
        Ok(decode::<Claims>(token, &key, &Self::validation(true))?.claims)
    }

    /// Signature checked, expiry compared with the current time.
    pub fn is_token_expired(&self, token: &str) -> Result<bool, JwtError> {
        let key = DecodingKey::from_secret(self.secret.as_bytes());
        let claims = decode::<Claims>(token, &key, &Self::validation(false))?.claims;
        let expiration = claims.get("exp").and_then(JsonValue::as_i64).unwrap_or(0);
        Ok(expiration < Utc::now().timestamp())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JwtToken(String);

impl JwtToken {
    pub fn token(&self) -> &str {
        &self.0
    }

    pub fn into_token(self) -> String {
        self.0
    }
}

/// The authenticated caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub user_type: Option<String>,
    pub user_id: Option<String>,
    pub user_roles: Vec<String>,
    pub is_authenticated: bool,
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub open_id: Option<String>,
}

impl Identity {
    pub fn new<S: Into<String>>(user_id: S, user_roles: Vec<String>) -> Self {
        Identity {
            user_id: Some(user_id.into()),
            user_roles,
            ..Default::default()
        }
    }

    /// Identity used for calls between services.
    pub fn system() -> Self {
        Identity::new(SYSTEM_USER, vec![SYSTEM_USER.to_string()])
    }

    fn claims(&self) -> Claims {
        let mut claims = Claims::new();
        claims.insert("userId".to_string(), JsonValue::from(self.user_id.clone()));
        claims.insert("userRoles".to_string(), JsonValue::from(self.user_roles.clone()));
        claims.insert("userType".to_string(), JsonValue::from(self.user_type.clone()));
        if let Some(open_id) = &self.open_id {
            claims.insert("openId".to_string(), JsonValue::from(open_id.as_str()));
        }
        claims
    }

    /// A token valid for five hours.
    pub fn generate_jwt_token(&self, secret: &str) -> Result<JwtToken, BusinessError> {
        self.generate_jwt_token_for(secret, IDENTITY_TOKEN_VALIDITY)
    }

    pub fn generate_jwt_token_for(&self, secret: &str, validity: Duration) -> Result<JwtToken, BusinessError> {
        JwtTokenTool::new(secret)
            .with_validity(validity)
            .generate_token(self.claims(), self.user_id.as_deref())
            .map(JwtToken)
            .map_err(|e| BusinessError::error("com-5001", e.to_string()))
    }

    /// Verifies `token`. Expired tokens map to `iam-4001`, anything else
    /// that fails verification to `iam-4002`.
    pub fn from_jwt_token(token: &str, secret: &str) -> Result<Identity, BusinessError> {
        let claims = JwtTokenTool::new(secret).all_claims(token).map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => BusinessError::token_expired(),
            _ => BusinessError::token_invalid(),
        })?;
        let text = |key: &str| claims.get(key).and_then(JsonValue::as_str).map(ToString::to_string);
        let user_roles: Vec<String> = claims
            .get("userRoles")
            .and_then(JsonValue::as_array)
            .map(|roles| roles.iter().filter_map(JsonValue::as_str).map(ToString::to_string).collect())
            .unwrap_or_default();
        Ok(Identity {
            user_type: text("userType"),
            user_id: text("userId"),
            user_roles,
            is_authenticated: true,
            password: None,
            open_id: text("openId"),
        })
    }

    pub fn has_any_role(&self, roles: &[&str]) -> bool {
        self.user_roles.iter().any(|role| roles.contains(&role.as_str()))
    }
}

/// `Authorization` header value for service to service calls.
pub fn service_authorization(secret: &str) -> Result<String, BusinessError> {
    let begin = Instant::now();
    let token = Identity::system().generate_jwt_token(secret)?;
    tracing::debug!("service token generated in {} ms", begin.elapsed().as_millis());
    Ok(token.into_token())
}

/// Which paths need a token, and the signing secret.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SecurityProperties {
    /// Glob patterns of protected paths. Empty protects every path.
    pub path_patterns: Vec<String>,
    pub exclude_path_patterns: Vec<String>,
    pub secret: String,
}

impl SecurityProperties {
    pub fn new<S: Into<String>>(secret: S) -> Self {
        SecurityProperties { secret: secret.into(), ..Default::default() }
    }

    pub fn add_path_pattern<S: Into<String>>(mut self, pattern: S) -> Self {
        self.path_patterns.push(pattern.into());
        self
    }

    pub fn exclude_path_pattern<S: Into<String>>(mut self, pattern: S) -> Self {
        self.exclude_path_patterns.push(pattern.into());
        self
    }

    fn matches_any(patterns: &[String], path: &str) -> bool {
        patterns.iter().any(|pattern| match Pattern::new(pattern) {
            Ok(glob) => glob.matches(path),
            Err(e) => {
                tracing::warn!("ignoring invalid path pattern {}: {}", pattern, e);
                false
            }
        })
    }

    pub fn is_protected(&self, path: &str) -> bool {
        if Self::matches_any(&self.exclude_path_patterns, path) {
            return false;
        }
        self.path_patterns.is_empty() || Self::matches_any(&self.path_patterns, path)
    }
}

/// Checks the `Authorization` header of a request.
#[derive(Debug, Clone)]
pub struct AccessInterceptor {
    properties: SecurityProperties,
}

impl AccessInterceptor {
    pub fn new(properties: SecurityProperties) -> Self {
        AccessInterceptor { properties }
    }

    /// `Ok(None)` for paths that need no token, the caller's identity
    /// otherwise. With `required_roles` the caller needs at least one of them.
    pub fn pre_handle(
        &self,
        path: &str,
        authorization: Option<&str>,
        required_roles: &[&str],
    ) -> Result<Option<Identity>, BusinessError> {
        if !self.properties.is_protected(path) {
            return Ok(None);
        }
        let token = match authorization.map(str::trim).filter(|t| !t.is_empty()) {
            Some(token) => token.strip_prefix(BEARER).unwrap_or(token),
            None => return Err(BusinessError::token_missing()),
        };
        let identity = Identity::from_jwt_token(token, &self.properties.secret)?;
        if !required_roles.is_empty() && !identity.has_any_role(required_roles) {
            tracing::warn!("{} denied on {}", identity.user_id.as_deref().unwrap_or_default(), path);
            return Err(BusinessError::role_denied());
        }
        Ok(Some(identity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";

    #[test]
    fn test_token_tool() {
        let tool = JwtTokenTool::new(SECRET);
        let mut claims = Claims::new();
        claims.insert("k".to_string(), JsonValue::from("v"));
        let token = tool.generate_token(claims.clone(), Some("me")).unwrap();
        let back = tool.all_claims(&token).unwrap();
        assert_eq!(back.get("k"), Some(&JsonValue::from("v")));
        assert_eq!(back.get("sub"), Some(&JsonValue::from("me")));
        assert!(!tool.is_token_expired(&token).unwrap());

        let old = tool.generate_token_until(claims, None, Utc::now().timestamp() - 120).unwrap();
        assert!(tool.is_token_expired(&old).unwrap());
        assert!(matches!(tool.all_claims(&old).unwrap_err().kind(), ErrorKind::ExpiredSignature));
        assert!(JwtTokenTool::new("other").all_claims(&token).is_err());
    }

    #[test]
    fn test_identity_round_trip() {
        let mut identity = Identity::new("u1", vec!["admin".to_string()]);
        identity.user_type = Some("staff".to_string());
        let token = identity.generate_jwt_token(SECRET).unwrap();
        let back = Identity::from_jwt_token(token.token(), SECRET).unwrap();
        assert_eq!(back.user_id.as_deref(), Some("u1"));
        assert_eq!(back.user_type.as_deref(), Some("staff"));
        assert_eq!(back.user_roles, vec!["admin".to_string()]);
        assert!(back.is_authenticated);

        assert_eq!(Identity::from_jwt_token(token.token(), "wrong").unwrap_err().code, "iam-4002");
        assert_eq!(Identity::from_jwt_token("garbage", SECRET).unwrap_err().code, "iam-4002");
    }

    #[test]
    fn test_service_authorization() {
        let token = service_authorization(SECRET).unwrap();
        let identity = Identity::from_jwt_token(&token, SECRET).unwrap();
        assert_eq!(identity.user_id.as_deref(), Some(SYSTEM_USER));
        assert!(identity.has_any_role(&[SYSTEM_USER]));
    }

    #[test]
    fn test_path_matching() {
        let props = SecurityProperties::new(SECRET)
            .add_path_pattern("/api/**")
            .exclude_path_pattern("/api/login");
        assert!(props.is_protected("/api/users/1"));
        assert!(!props.is_protected("/api/login"));
        assert!(!props.is_protected("/health"));
        assert!(SecurityProperties::new(SECRET).is_protected("/anything"));
    }
}
