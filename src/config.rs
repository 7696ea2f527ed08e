// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    db::{
        CatalogRepository, CompanyRepository, FeeRepository, MediaRepository,
        SecretaryRepository, SpecialistRepository, UserRepository,
    },
    services::{
        auth::AuthService, catalog_service::CatalogService, company_service::CompanyService,
        media_service::MediaService, secretary_service::SecretaryService,
        specialist_service::SpecialistService, storage::StorageService,
        user_service::UserService,
    },
};

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub is_production: bool,

    // Repositórios expostos para handlers simples e para o seeder
    pub user_repo: UserRepository,
    pub fee_repo: FeeRepository,

    // Serviços de domínio
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub specialist_service: SpecialistService,
    pub secretary_service: SecretaryService,
    pub company_service: CompanyService,
    pub media_service: MediaService,
    pub catalog_service: CatalogService,
}

impl AppState {
    // A assinatura retorna um Result: se a configuração falhar, a aplicação
    // não deve subir.
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");
        let jwt_refresh_secret =
            env::var("JWT_REFRESH_SECRET").expect("JWT_REFRESH_SECRET deve ser definido");

        // O serviço de armazenamento é colaborador externo; em dev aponta
        // para um mock local.
        let storage_url = env::var("STORAGE_API_URL")
            .unwrap_or_else(|_| "http://localhost:9000".to_string());
        let storage_key = env::var("STORAGE_API_KEY").unwrap_or_default();

        let is_production = env::var("APP_ENV")
            .map(|v| v == "production")
            .unwrap_or(false);

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let specialist_repo = SpecialistRepository::new(db_pool.clone());
        let secretary_repo = SecretaryRepository::new(db_pool.clone());
        let company_repo = CompanyRepository::new(db_pool.clone());
        let media_repo = MediaRepository::new(db_pool.clone());
        let catalog_repo = CatalogRepository::new(db_pool.clone());
        let fee_repo = FeeRepository::new(db_pool.clone());

        let storage = StorageService::new(storage_url, storage_key);

        let auth_service = AuthService::new(
            user_repo.clone(),
            jwt_secret,
            jwt_refresh_secret,
            db_pool.clone(),
        );
        let user_service = UserService::new(user_repo.clone(), db_pool.clone());
        let specialist_service = SpecialistService::new(
            specialist_repo.clone(),
            secretary_repo.clone(),
            media_repo.clone(),
            fee_repo.clone(),
            storage.clone(),
            db_pool.clone(),
        );
        let secretary_service = SecretaryService::new(
            secretary_repo.clone(),
            user_repo.clone(),
            storage.clone(),
            db_pool.clone(),
        );
        let company_service =
            CompanyService::new(company_repo, secretary_repo, db_pool.clone());
        let media_service = MediaService::new(
            media_repo,
            specialist_repo.clone(),
            storage,
            db_pool.clone(),
        );
        let catalog_service = CatalogService::new(catalog_repo, specialist_repo);

        Ok(Self {
            db_pool,
            is_production,
            user_repo,
            fee_repo,
            auth_service,
            user_service,
            specialist_service,
            secretary_service,
            company_service,
            media_service,
            catalog_service,
        })
    }
}
