// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    middleware::auth::CurrentUser,
    models::auth::UserRole,
};

// ---
// SLUGS DE PERMISSÃO (resource.action)
// ---

pub mod perms {
    // Especialistas
    pub const SPECIALIST_CREATE: &str = "specialist.create";
    pub const SPECIALIST_READ_ANY: &str = "specialist.read.any";
    pub const SPECIALIST_READ_OWN: &str = "specialist.read.own";
    pub const SPECIALIST_UPDATE_ANY: &str = "specialist.update.any";
    pub const SPECIALIST_UPDATE_OWN: &str = "specialist.update.own";
    pub const SPECIALIST_DELETE_ANY: &str = "specialist.delete.any";
    pub const SPECIALIST_PUBLISH: &str = "specialist.publish";

    // Empresas
    pub const COMPANY_CREATE: &str = "company.create";
    pub const COMPANY_READ_ANY: &str = "company.read.any";
    pub const COMPANY_READ_OWN: &str = "company.read.own";
    pub const COMPANY_UPDATE_ANY: &str = "company.update.any";
    pub const COMPANY_UPDATE_OWN: &str = "company.update.own";
    pub const COMPANY_DELETE_ANY: &str = "company.delete.any";
    pub const COMPANY_MANAGE_COMPLIANCE: &str = "company.manage.compliance";

    // Secretárias
    pub const SECRETARY_CREATE: &str = "secretary.create";
    pub const SECRETARY_READ: &str = "secretary.read";
    pub const SECRETARY_UPDATE: &str = "secretary.update";
    pub const SECRETARY_DELETE: &str = "secretary.delete";
    pub const SECRETARY_MANAGE_CLIENTS: &str = "secretary.manage.clients";
    pub const SECRETARY_MANAGE_SPECIALISTS: &str = "secretary.manage.specialists";

    // Mídias
    pub const MEDIA_UPLOAD: &str = "media.upload";
    pub const MEDIA_DELETE: &str = "media.delete";
    pub const MEDIA_READ: &str = "media.read";

    // Usuários
    pub const USER_MANAGE: &str = "user.manage";
    pub const USER_READ: &str = "user.read";
    pub const USER_UPDATE: &str = "user.update";
    pub const USER_DELETE: &str = "user.delete";

    // Taxas da plataforma
    pub const PLATFORM_FEE_MANAGE: &str = "platform_fee.manage";
    pub const PLATFORM_FEE_READ: &str = "platform_fee.read";

    // Catálogo de serviços
    pub const SERVICE_MANAGE: &str = "service.manage";
    pub const SERVICE_READ: &str = "service.read";
}

// Conjunto de permissões derivado do papel. Match exaustivo: adicionar um
// papel novo obriga a decidir as permissões dele aqui.
pub fn role_permissions(role: UserRole) -> &'static [&'static str] {
    use perms::*;
    match role {
        UserRole::SuperAdmin => &[
            SPECIALIST_CREATE,
            SPECIALIST_READ_ANY,
            SPECIALIST_UPDATE_ANY,
            SPECIALIST_DELETE_ANY,
            SPECIALIST_PUBLISH,
            COMPANY_CREATE,
            COMPANY_READ_ANY,
            COMPANY_UPDATE_ANY,
            COMPANY_DELETE_ANY,
            COMPANY_MANAGE_COMPLIANCE,
            SECRETARY_CREATE,
            SECRETARY_READ,
            SECRETARY_UPDATE,
            SECRETARY_DELETE,
            SECRETARY_MANAGE_CLIENTS,
            SECRETARY_MANAGE_SPECIALISTS,
            MEDIA_UPLOAD,
            MEDIA_DELETE,
            MEDIA_READ,
            USER_MANAGE,
            USER_READ,
            USER_UPDATE,
            USER_DELETE,
            PLATFORM_FEE_MANAGE,
            PLATFORM_FEE_READ,
            SERVICE_MANAGE,
            SERVICE_READ,
        ],
        UserRole::Admin => &[
            SPECIALIST_CREATE,
            SPECIALIST_READ_ANY,
            SPECIALIST_UPDATE_ANY,
            SPECIALIST_DELETE_ANY,
            SPECIALIST_PUBLISH,
            COMPANY_CREATE,
            COMPANY_READ_ANY,
            COMPANY_UPDATE_ANY,
            COMPANY_DELETE_ANY,
            COMPANY_MANAGE_COMPLIANCE,
            SECRETARY_READ,
            SECRETARY_UPDATE,
            MEDIA_UPLOAD,
            MEDIA_DELETE,
            MEDIA_READ,
            USER_READ,
            PLATFORM_FEE_READ,
            SERVICE_READ,
        ],
        UserRole::Manager => &[
            SPECIALIST_CREATE,
            SPECIALIST_READ_ANY,
            SPECIALIST_UPDATE_OWN,
            SPECIALIST_PUBLISH,
            COMPANY_READ_ANY,
            SECRETARY_READ,
            MEDIA_UPLOAD,
            MEDIA_READ,
        ],
        UserRole::Specialist => &[
            SPECIALIST_READ_OWN,
            SPECIALIST_UPDATE_OWN,
            MEDIA_UPLOAD,
            MEDIA_READ,
        ],
        UserRole::Secretary => &[
            COMPANY_CREATE,
            COMPANY_READ_OWN,
            COMPANY_UPDATE_OWN,
            COMPANY_MANAGE_COMPLIANCE,
            SPECIALIST_READ_ANY,
            MEDIA_UPLOAD,
            MEDIA_READ,
        ],
        UserRole::Client => &[
            COMPANY_READ_OWN,
            COMPANY_UPDATE_OWN,
            SPECIALIST_READ_ANY,
            MEDIA_UPLOAD,
            MEDIA_READ,
        ],
        UserRole::Viewer => &[
            SPECIALIST_READ_ANY, // Somente publicados
            MEDIA_READ,
        ],
    }
}

// Conjunto efetivo: a lista explícita do usuário tem precedência quando
// presente; senão, o conjunto do papel.
pub fn effective_permissions(role: UserRole, explicit: Option<&[String]>) -> Vec<String> {
    match explicit {
        Some(list) if !list.is_empty() => list.to_vec(),
        _ => role_permissions(role).iter().map(|s| s.to_string()).collect(),
    }
}

// Falha com Forbidden se o papel não está na lista. Sem bypass de super
// admin: quem pede papel específico, recebe papel específico.
pub fn require_role(user: &CurrentUser, allowed: &[UserRole]) -> Result<(), AppError> {
    if allowed.contains(&user.role) {
        return Ok(());
    }
    Err(AppError::Forbidden(
        "Seu papel não permite realizar esta ação.".into(),
    ))
}

// Regra de posse: papéis privilegiados (dependentes da operação) passam
// direto; os demais precisam ser o criador/dono do recurso.
pub fn ensure_owner_or_privileged(
    user: &CurrentUser,
    owner_id: Uuid,
    privileged: &[UserRole],
) -> Result<(), AppError> {
    if user.role == UserRole::SuperAdmin
        || privileged.contains(&user.role)
        || user.id == owner_id
    {
        return Ok(());
    }
    Err(AppError::Forbidden(
        "Você não é dono(a) deste recurso.".into(),
    ))
}

// ---
// GUARDIÃO TIPADO DE ROTA (permissão grossa, sem posse)
// ---

/// 1. O Trait que define o que é uma Permissão
pub trait PermissionDef: Send + Sync + 'static {
    fn slug() -> &'static str;
}

/// 2. O Extractor (Guardião)
pub struct RequirePermission<T>(pub PhantomData<T>);

// 3. Implementação do FromRequestParts

impl<T, S> FromRequestParts<S> for RequirePermission<T>
where
    T: PermissionDef,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // A. Extrai Usuário (o auth_guard já rodou)
        let user = parts
            .extensions
            .get::<CurrentUser>()
            .ok_or(AppError::InvalidToken)?;

        // B. Verifica na tabela estática
        let required_perm = T::slug();
        if !user.has_permission(required_perm) {
            return Err(AppError::Forbidden(format!(
                "Você precisa da permissão '{}' para realizar esta ação.",
                required_perm
            )));
        }

        Ok(RequirePermission(PhantomData))
    }
}

// ---
// DEFINIÇÃO DAS PERMISSÕES (TIPOS)
// ---

macro_rules! permission_def {
    ($name:ident, $slug:expr) => {
        pub struct $name;
        impl PermissionDef for $name {
            fn slug() -> &'static str {
                $slug
            }
        }
    };
}

permission_def!(PermSpecialistCreate, perms::SPECIALIST_CREATE);
permission_def!(PermSecretaryCreate, perms::SECRETARY_CREATE);
permission_def!(PermSecretaryRead, perms::SECRETARY_READ);
permission_def!(PermSecretaryUpdate, perms::SECRETARY_UPDATE);
permission_def!(PermSecretaryDelete, perms::SECRETARY_DELETE);
permission_def!(PermCompanyCreate, perms::COMPANY_CREATE);
permission_def!(PermMediaUpload, perms::MEDIA_UPLOAD);
permission_def!(PermMediaRead, perms::MEDIA_READ);
permission_def!(PermUserRead, perms::USER_READ);
permission_def!(PermUserDelete, perms::USER_DELETE);
permission_def!(PermPlatformFeeManage, perms::PLATFORM_FEE_MANAGE);
permission_def!(PermPlatformFeeRead, perms::PLATFORM_FEE_READ);
permission_def!(PermServiceManage, perms::SERVICE_MANAGE);
permission_def!(PermServiceRead, perms::SERVICE_READ);

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: UserRole, permissions: Vec<String>) -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            email: "teste@exemplo.com".into(),
            role,
            permissions,
        }
    }

    fn user_with_role_perms(role: UserRole) -> CurrentUser {
        user(role, effective_permissions(role, None))
    }

    #[test]
    fn super_admin_bypasses_any_permission_check() {
        let admin = user(UserRole::SuperAdmin, vec![]);
        assert!(admin.has_permission("qualquer.coisa"));
        assert!(admin.has_permission(perms::PLATFORM_FEE_MANAGE));
    }

    #[test]
    fn viewer_can_read_but_not_create_specialists() {
        let viewer = user_with_role_perms(UserRole::Viewer);
        assert!(viewer.has_permission(perms::SPECIALIST_READ_ANY));
        assert!(!viewer.has_permission(perms::SPECIALIST_CREATE));
        assert!(!viewer.has_permission(perms::MEDIA_UPLOAD));
    }

    #[test]
    fn explicit_permission_list_overrides_the_role_set() {
        let restricted = user(UserRole::Admin, vec![perms::USER_READ.to_string()]);
        assert!(restricted.has_permission(perms::USER_READ));
        // Do papel teria, mas a lista explícita manda
        assert!(!restricted.has_permission(perms::SPECIALIST_CREATE));
    }

    #[test]
    fn empty_explicit_list_falls_back_to_role_set() {
        let perms_list = effective_permissions(UserRole::Client, Some(&[]));
        assert!(perms_list.contains(&perms::COMPANY_READ_OWN.to_string()));
    }

    #[test]
    fn require_role_has_no_super_admin_bypass() {
        let root = user_with_role_perms(UserRole::SuperAdmin);
        assert!(require_role(&root, &[UserRole::Secretary]).is_err());
        assert!(require_role(&root, &[UserRole::SuperAdmin, UserRole::Admin]).is_ok());
    }

    #[test]
    fn ownership_check_passes_owner_and_privileged_roles() {
        let owner = user_with_role_perms(UserRole::Specialist);
        assert!(ensure_owner_or_privileged(&owner, owner.id, &[]).is_ok());

        let other = user_with_role_perms(UserRole::Specialist);
        assert!(ensure_owner_or_privileged(&other, Uuid::new_v4(), &[]).is_err());

        let manager = user_with_role_perms(UserRole::Manager);
        assert!(
            ensure_owner_or_privileged(&manager, Uuid::new_v4(), &[UserRole::Manager]).is_ok()
        );

        // Super admin passa sempre, mesmo fora da lista privilegiada
        let root = user_with_role_perms(UserRole::SuperAdmin);
        assert!(ensure_owner_or_privileged(&root, Uuid::new_v4(), &[]).is_ok());
    }

    #[test]
    fn every_role_resolves_to_a_non_empty_set() {
        for role in [
            UserRole::SuperAdmin,
            UserRole::Admin,
            UserRole::Manager,
            UserRole::Specialist,
            UserRole::Secretary,
            UserRole::Client,
            UserRole::Viewer,
        ] {
            assert!(!role_permissions(role).is_empty());
        }
    }
}
