// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::refresh,
        handlers::auth::logout,
        handlers::auth::get_me,
        handlers::auth::change_password,
        handlers::auth::forgot_password,
        handlers::auth::reset_password,

        // --- Users ---
        handlers::users::list_users,
        handlers::users::get_user,
        handlers::users::update_user,
        handlers::users::delete_user,

        // --- Specialists ---
        handlers::specialists::list_specialists,
        handlers::specialists::get_stats,
        handlers::specialists::get_specialist,
        handlers::specialists::create_specialist,
        handlers::specialists::update_specialist,
        handlers::specialists::delete_specialist,
        handlers::specialists::publish_specialist,
        handlers::specialists::unpublish_specialist,
        handlers::specialists::update_verification,
        handlers::specialists::rate_specialist,

        // --- Secretaries ---
        handlers::secretaries::list_secretaries,
        handlers::secretaries::get_secretary,
        handlers::secretaries::get_secretary_stats,
        handlers::secretaries::create_secretary,
        handlers::secretaries::update_secretary,
        handlers::secretaries::verify_secretary,
        handlers::secretaries::delete_secretary,

        // --- Companies ---
        handlers::companies::list_companies,
        handlers::companies::get_company,
        handlers::companies::get_compliance,
        handlers::companies::create_company,
        handlers::companies::update_company,
        handlers::companies::delete_company,

        // --- Media ---
        handlers::media::list_by_specialist,
        handlers::media::upload_media,
        handlers::media::update_media,
        handlers::media::delete_media,

        // --- Service Catalog ---
        handlers::catalog::list_services,
        handlers::catalog::get_service,
        handlers::catalog::create_service,
        handlers::catalog::update_service,
        handlers::catalog::delete_service,
        handlers::catalog::list_offerings_by_specialist,
        handlers::catalog::list_offerings_by_service,
        handlers::catalog::create_offering,
        handlers::catalog::delete_offering,

        // --- Platform Fees ---
        handlers::fees::list_fees,
        handlers::fees::quote_fee,
        handlers::fees::upsert_fee,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::UserRole,
            models::auth::UserStatus,
            models::auth::User,
            models::auth::UserSummary,
            models::auth::AuthResponse,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::ChangePasswordPayload,
            models::auth::ForgotPasswordPayload,
            models::auth::ResetPasswordPayload,
            services::user_service::UpdateUserPayload,

            // --- Specialists ---
            models::specialist::VerificationStatus,
            models::specialist::SpecialistStatus,
            models::specialist::Certification,
            models::specialist::Specialist,
            models::specialist::CreateSpecialistPayload,
            models::specialist::UpdateSpecialistPayload,
            models::specialist::UpdateVerificationPayload,
            models::specialist::RatingPayload,
            models::specialist::SpecialistListResponse,
            models::specialist::SpecialistStats,

            // --- Secretaries ---
            models::secretary::SecretaryStatus,
            models::secretary::SecretaryType,
            models::secretary::ContactInformation,
            models::secretary::Secretary,
            models::secretary::CreateSecretaryPayload,
            models::secretary::UpdateSecretaryPayload,
            models::secretary::VerifySecretaryPayload,
            models::secretary::SecretaryStats,
            models::secretary::SecretaryWithUser,

            // --- Companies ---
            models::company::CompanyType,
            models::company::CompanyStatus,
            models::company::Director,
            models::company::Shareholder,
            models::company::CompanySecretaryRecord,
            models::company::Auditor,
            models::company::BankAccount,
            models::company::Company,
            models::company::CreateCompanyPayload,
            models::company::UpdateCompanyPayload,
            models::company::ComplianceReport,

            // --- Media ---
            models::media::MimeType,
            models::media::MediaType,
            models::media::Media,
            models::media::UpdateMediaPayload,

            // --- Service Catalog ---
            models::catalog::ServiceMaster,
            models::catalog::ServiceOffering,
            models::catalog::ServiceOfferingDetail,
            models::catalog::CreateServiceMasterPayload,
            models::catalog::UpdateServiceMasterPayload,
            models::catalog::CreateServiceOfferingPayload,

            // --- Platform Fees ---
            models::fees::TierName,
            models::fees::PlatformFee,
            models::fees::UpsertPlatformFeePayload,
            models::fees::FeeQuote,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação, registro e redefinição de senha"),
        (name = "Users", description = "Gestão de usuários"),
        (name = "Specialists", description = "Anúncios de especialistas: rascunho, publicação e verificação"),
        (name = "Secretaries", description = "Perfis de secretária e carga de trabalho"),
        (name = "Companies", description = "Empresas administradas e compliance"),
        (name = "Media", description = "Arquivos vinculados aos especialistas"),
        (name = "Service Catalog", description = "Catálogo mestre e vínculos de serviço"),
        (name = "Platform Fees", description = "Faixas de taxa da plataforma")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
