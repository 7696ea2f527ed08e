//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod seeders;
mod services;

use crate::config::AppState;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .compact()
        .init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Seed de desenvolvimento (faixas de taxa e catálogo vêm das migrações)
    if !app_state.is_production {
        seeders::seed_admin_user(&app_state)
            .await
            .expect("Falha ao semear o usuário administrador.");
    }

    // Rotas de autenticação. As duas primeiras exigem sessão; o .layer() só
    // envolve o que foi adicionado antes dele, então o restante fica público.
    let auth_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .route("/change-password", post(handlers::auth::change_password))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ))
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/refresh", post(handlers::auth::refresh))
        .route("/logout", post(handlers::auth::logout))
        .route("/forgot-password", post(handlers::auth::forgot_password))
        .route("/reset-password", post(handlers::auth::reset_password));

    let user_routes = Router::new()
        .route("/", get(handlers::users::list_users))
        .route(
            "/{id}",
            get(handlers::users::get_user)
                .put(handlers::users::update_user)
                .delete(handlers::users::delete_user),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let specialist_routes = Router::new()
        .route(
            "/",
            get(handlers::specialists::list_specialists)
                .post(handlers::specialists::create_specialist),
        )
        .route("/stats", get(handlers::specialists::get_stats))
        .route(
            "/{id}",
            get(handlers::specialists::get_specialist)
                .put(handlers::specialists::update_specialist)
                .delete(handlers::specialists::delete_specialist),
        )
        .route("/{id}/publish", post(handlers::specialists::publish_specialist))
        .route(
            "/{id}/unpublish",
            post(handlers::specialists::unpublish_specialist),
        )
        .route(
            "/{id}/verification",
            patch(handlers::specialists::update_verification),
        )
        .route("/{id}/rating", post(handlers::specialists::rate_specialist))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let secretary_routes = Router::new()
        .route(
            "/",
            get(handlers::secretaries::list_secretaries)
                .post(handlers::secretaries::create_secretary),
        )
        .route(
            "/{id}",
            get(handlers::secretaries::get_secretary)
                .put(handlers::secretaries::update_secretary)
                .delete(handlers::secretaries::delete_secretary),
        )
        .route("/{id}/stats", get(handlers::secretaries::get_secretary_stats))
        .route(
            "/{id}/verification",
            patch(handlers::secretaries::verify_secretary),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let company_routes = Router::new()
        .route(
            "/",
            get(handlers::companies::list_companies).post(handlers::companies::create_company),
        )
        .route(
            "/{id}",
            get(handlers::companies::get_company)
                .put(handlers::companies::update_company)
                .delete(handlers::companies::delete_company),
        )
        .route("/{id}/compliance", get(handlers::companies::get_compliance))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let media_routes = Router::new()
        .route("/", post(handlers::media::upload_media))
        .route("/specialist/{id}", get(handlers::media::list_by_specialist))
        .route(
            "/{id}",
            axum::routing::put(handlers::media::update_media)
                .delete(handlers::media::delete_media),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let service_routes = Router::new()
        .route(
            "/",
            get(handlers::catalog::list_services).post(handlers::catalog::create_service),
        )
        .route(
            "/{id}",
            get(handlers::catalog::get_service)
                .put(handlers::catalog::update_service)
                .delete(handlers::catalog::delete_service),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let offering_routes = Router::new()
        .route("/", post(handlers::catalog::create_offering))
        .route(
            "/specialist/{id}",
            get(handlers::catalog::list_offerings_by_specialist),
        )
        .route(
            "/service/{id}",
            get(handlers::catalog::list_offerings_by_service),
        )
        .route("/{id}", axum::routing::delete(handlers::catalog::delete_offering))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let fee_routes = Router::new()
        .route(
            "/",
            get(handlers::fees::list_fees).put(handlers::fees::upsert_fee),
        )
        .route("/quote", get(handlers::fees::quote_fee))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/specialists", specialist_routes)
        .nest("/api/secretaries", secretary_routes)
        .nest("/api/companies", company_routes)
        .nest("/api/media", media_routes)
        .nest("/api/services", service_routes)
        .nest("/api/offerings", offering_routes)
        .nest("/api/fees", fee_routes)
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.expect("Erro no servidor Axum");
}
