use actix_web::{web, HttpResponse};
use secrecy::ExposeSecret;
use sqlx::PgPool;

use crate::config::jwt::JwtSettings;
use crate::db::user_queries;
use crate::middleware::auth::generate_token;
use crate::models::user::{
    AuthResponse, LoginRequest, RegistrationRequest, UserResponse, UserRole,
};

#[tracing::instrument(
    name = "Register user",
    skip(form, pool, jwt_settings),
    fields(username = %form.username, email = %form.email)
)]
pub async fn register_user(
    form: web::Json<RegistrationRequest>,
    pool: web::Data<PgPool>,
    jwt_settings: web::Data<JwtSettings>,
) -> HttpResponse {
    if form.username.trim().is_empty() || form.email.trim().is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "success": false,
            "error": "username and email are required"
        }));
    }

    match user_queries::get_user_by_email(pool.get_ref(), &form.email).await {
        Ok(Some(_)) => {
            return HttpResponse::Conflict().json(serde_json::json!({
                "success": false,
                "error": "email is already registered"
            }));
        }
        Ok(None) => {}
        Err(e) => {
            tracing::error!("Database error during registration: {:?}", e);
            return HttpResponse::InternalServerError().finish();
        }
    }

    let password_hash = match bcrypt::hash(form.password.expose_secret(), bcrypt::DEFAULT_COST) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!("Failed to hash password: {:?}", e);
            return HttpResponse::InternalServerError().finish();
        }
    };

    // Self-registration never grants elevated roles.
    if matches!(form.role, Some(role) if role != UserRole::Viewer) {
        tracing::warn!("Registration requested role {:?}, ignoring", form.role);
    }
    let role = UserRole::Viewer;

    let user = match user_queries::create_user(
        pool.get_ref(),
        &form.username,
        &form.email,
        &password_hash,
        role,
    )
    .await
    {
        Ok(user) => user,
        Err(e) => {
            tracing::error!("Failed to create user: {:?}", e);
            return HttpResponse::InternalServerError().finish();
        }
    };

    let token = match generate_token(&user, jwt_settings.get_ref()) {
        Ok(token) => token,
        Err(e) => {
            tracing::error!("Error generating JWT token: {:?}", e);
            return HttpResponse::InternalServerError().finish();
        }
    };

    HttpResponse::Ok().json(AuthResponse {
        token,
        user: UserResponse::from(&user),
    })
}

#[tracing::instrument(
    name = "Login user attempt",
    skip(form, pool, jwt_settings),
    fields(email = %form.email)
)]
pub async fn login_user(
    form: web::Json<LoginRequest>,
    pool: web::Data<PgPool>,
    jwt_settings: web::Data<JwtSettings>,
) -> HttpResponse {
    let user = match user_queries::get_user_by_email(pool.get_ref(), &form.email).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            tracing::info!("User not found or invalid credentials");
            return HttpResponse::Unauthorized().finish();
        }
        Err(e) => {
            tracing::error!("Database error occurred: {:?}", e);
            return HttpResponse::InternalServerError().finish();
        }
    };

    match bcrypt::verify(form.password.expose_secret(), &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            tracing::info!("Invalid password");
            return HttpResponse::Unauthorized().finish();
        }
        Err(e) => {
            tracing::error!("Password verification failed: {:?}", e);
            return HttpResponse::InternalServerError().finish();
        }
    }

    let token = match generate_token(&user, jwt_settings.get_ref()) {
        Ok(token) => token,
        Err(e) => {
            tracing::error!("Error generating JWT token: {:?}", e);
            return HttpResponse::InternalServerError().finish();
        }
    };

    HttpResponse::Ok().json(AuthResponse {
        token,
        user: UserResponse::from(&user),
    })
}
