/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /auth/register` - Register a new user
/// - `POST /auth/login` - Login and get a session token
///
/// Both endpoints are public. Request fields are all optional at the
/// deserialization layer so that each missing piece gets its own
/// descriptive 400 instead of a generic decode failure, and a missing or
/// malformed body is reported as "No input data provided".

use crate::{
    app::AppState,
    auth::{jwt, password},
    error::{ApiError, ApiResult},
    models::user::{CreateUser, User},
};
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

/// Register request
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Desired username
    pub username: Option<String>,

    /// Plaintext password (validated for strength, then hashed)
    pub password: Option<String>,
}

/// Register response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    /// Confirmation message
    pub message: String,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Username
    pub username: Option<String>,

    /// Plaintext password
    pub password: Option<String>,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Signed session token identifying the user
    pub access_token: String,
}

/// Register a new user
///
/// Validation order is part of the contract: missing body, then missing
/// username, then duplicate username, then weak password. Nothing is
/// written to storage until every check passes.
///
/// # Endpoint
///
/// ```text
/// POST /auth/register
/// Content-Type: application/json
///
/// {
///   "username": "alice",
///   "password": "ValidP@ssw0rd"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: missing input, duplicate username, or weak password
pub async fn register(
    State(state): State<AppState>,
    body: Option<Json<RegisterRequest>>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    let Some(Json(req)) = body else {
        return Err(ApiError::BadRequest("No input data provided".to_string()));
    };

    // An empty object is indistinguishable from no body at all
    if req.username.is_none() && req.password.is_none() {
        return Err(ApiError::BadRequest("No input data provided".to_string()));
    }

    // Presence is checked against the trimmed form; the username is stored
    // exactly as supplied
    let username = match req.username {
        Some(name) if !name.trim().is_empty() => name,
        _ => return Err(ApiError::BadRequest("Username is required".to_string())),
    };

    // Early duplicate check so the client gets the specific message; the
    // UNIQUE constraint on users.username still backstops concurrent
    // registrations racing past this read (see error.rs).
    if User::find_by_username(&state.db, &username).await?.is_some() {
        return Err(ApiError::Conflict("Username already taken".to_string()));
    }

    let plaintext = req.password.as_deref().unwrap_or("");
    password::validate_password(plaintext).map_err(ApiError::BadRequest)?;

    let password_hash = password::hash_password(plaintext)?;

    User::create(
        &state.db,
        CreateUser {
            username,
            password_hash,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully".to_string(),
        }),
    ))
}

/// Login endpoint
///
/// An unknown username and a wrong password produce byte-identical 401
/// responses, so the endpoint cannot be used to enumerate usernames.
///
/// # Endpoint
///
/// ```text
/// POST /auth/login
/// Content-Type: application/json
///
/// {
///   "username": "alice",
///   "password": "ValidP@ssw0rd"
/// }
/// ```
///
/// # Response
///
/// ```json
/// { "access_token": "eyJ..." }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: missing input
/// - `401 Unauthorized`: invalid credentials
pub async fn login(
    State(state): State<AppState>,
    body: Option<Json<LoginRequest>>,
) -> ApiResult<Json<LoginResponse>> {
    let Some(Json(req)) = body else {
        return Err(ApiError::BadRequest("No input data provided".to_string()));
    };

    if req.username.is_none() && req.password.is_none() {
        return Err(ApiError::BadRequest("No input data provided".to_string()));
    }

    let (username, plaintext) = match (req.username.as_deref(), req.password.as_deref()) {
        (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => (u, p),
        _ => {
            return Err(ApiError::BadRequest(
                "Username and password are required".to_string(),
            ))
        }
    };

    let user = User::find_by_username(&state.db, username)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid username or password".to_string()))?;

    let valid = password::verify_password(plaintext, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid username or password".to_string(),
        ));
    }

    let access_token = jwt::issue_token(user.id, state.jwt_secret())?;

    Ok(Json(LoginResponse { access_token }))
}
