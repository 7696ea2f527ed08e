// src/seeders.rs
//
// Carga inicial de desenvolvimento. As faixas de taxa e a lista mestre de
// serviços são semeadas por migração; aqui só entra o que precisa de lógica
// em tempo de execução (hash de senha).

use std::env;

use crate::{
    common::error::AppError,
    config::AppState,
    models::auth::{UserRole, UserStatus},
    services::auth,
};

pub async fn seed_admin_user(app_state: &AppState) -> Result<(), AppError> {
    let email = env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@specialists.com".to_string());
    let password = env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "Admin@123456".to_string());

    if app_state.user_repo.find_by_email(&email).await?.is_some() {
        tracing::info!("✅ Super admin já existe, seed ignorado");
        return Ok(());
    }

    let hashed = auth::ensure_hashed(password).await?;

    let admin = app_state
        .user_repo
        .create_user(
            &app_state.db_pool,
            &email,
            &hashed,
            "System Administrator",
            None,
            Some("Administration"),
            None,
            UserRole::SuperAdmin,
            UserStatus::Active,
            None,
        )
        .await?;

    tracing::info!("🌱 Super admin criado: {}", admin.email);
    tracing::warn!("⚠️ Troque a senha padrão do admin em produção!");
    Ok(())
}
