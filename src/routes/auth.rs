use actix_web::{post, web, HttpResponse};
use sqlx::PgPool;

use crate::config::jwt::JwtSettings;
use crate::handlers::auth_handler::{login_user, register_user};
use crate::models::user::{LoginRequest, RegistrationRequest};

#[post("/register")]
async fn register(
    form: web::Json<RegistrationRequest>,
    pool: web::Data<PgPool>,
    jwt_settings: web::Data<JwtSettings>,
) -> HttpResponse {
    register_user(form, pool, jwt_settings).await
}

#[post("/login")]
async fn login(
    form: web::Json<LoginRequest>,
    pool: web::Data<PgPool>,
    jwt_settings: web::Data<JwtSettings>,
) -> HttpResponse {
    login_user(form, pool, jwt_settings).await
}
