use axum::{
    extract::{rejection::JsonRejection, FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        claims::CallerIdentity,
        dto::{
            AuthResponse, CheckRegistrationRequest, CheckRegistrationResponse, LoginRequest,
            Profile, SignupRequest, WhoAmIResponse,
        },
        jwt::JwtKeys,
        password::{hash_password_async, verify_password_async},
    },
    error::{AppError, Result},
    state::AppState,
    users::{Interests, NewUser},
};

pub const MIN_PASSWORD_LEN: usize = 6;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Routes that need no session.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/check_registration", post(check_registration))
        .route("/signup", post(signup))
        .route("/login", post(login))
}

/// Routes that expect the session gate in front of them.
pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/test", post(whoami))
        .route("/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn check_registration(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CheckRegistrationRequest>, JsonRejection>,
) -> Result<Json<CheckRegistrationResponse>> {
    let Json(payload) = payload?;
    let email = normalize_email(&payload.email);
    let user_exists = state.users.find_by_email(&email).await?.is_some();
    Ok(Json(CheckRegistrationResponse { user_exists }))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    let Json(mut payload) = payload?;
    payload.email = normalize_email(&payload.email);

    if payload.password.chars().count() < MIN_PASSWORD_LEN {
        warn!("password too short");
        return Err(AppError::Validation(format!(
            "Password must be {MIN_PASSWORD_LEN} characters or more"
        )));
    }

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(AppError::Validation("Invalid email".into()));
    }

    let birthday = payload
        .birthday
        .to_birthday()
        .ok_or_else(|| AppError::Validation("Invalid birthday".into()))?;

    if state.users.find_by_email(&payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(AppError::Conflict("Email already exists".into()));
    }

    let password_hash = hash_password_async(payload.password).await?;

    let user = state
        .users
        .create(NewUser {
            email: payload.email,
            password_hash,
            first_name: payload.first_name,
            last_name: payload.last_name,
            image_url: payload.image_url,
            country: payload.country,
            gender: payload.gender,
            about_me: payload.about_me,
            birthday,
            interests: Interests::new(payload.interested_in),
        })
        .await?;

    let token = JwtKeys::from_ref(&state).sign(user.id, &user.email)?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User created",
            data: Profile::from(&user),
            token,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>> {
    let Json(payload) = payload?;
    let email = normalize_email(&payload.email);

    let Some(user) = state.users.find_by_email(&email).await? else {
        warn!(email = %email, "login unknown email");
        return Err(AppError::AuthenticationFailed);
    };

    let ok = match verify_password_async(payload.password, user.password_hash.clone()).await {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, user_id = %user.id, "password verification failed");
            false
        }
    };

    if !ok {
        warn!(email = %email, user_id = %user.id, "login invalid password");
        return Err(AppError::AuthenticationFailed);
    }

    let token = JwtKeys::from_ref(&state).sign(user.id, &user.email)?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(AuthResponse {
        message: "Authentication successful",
        data: Profile::from(&user),
        token,
    }))
}

#[instrument(skip_all)]
pub async fn whoami(Extension(caller): Extension<CallerIdentity>) -> Json<WhoAmIResponse> {
    Json(WhoAmIResponse {
        unique_data: caller,
    })
}

#[instrument(skip_all)]
pub async fn get_me(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
) -> Result<Json<Profile>> {
    let Some(user) = state.users.find_by_id(caller.id).await? else {
        warn!(user_id = %caller.id, "session for missing user");
        return Err(AppError::AuthenticationFailed);
    };
    Ok(Json(Profile::from(&user)))
}
