// src/services/user_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    middleware::{auth::CurrentUser, rbac::perms},
    models::auth::User,
    services::auth,
};

#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    pool: sqlx::PgPool,
}

// Campos administrativos exigem user.manage; o restante é perfil próprio
#[derive(Debug, Default, serde::Deserialize, validator::Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserPayload {
    #[validate(length(min = 1, message = "O nome completo não pode ficar vazio."))]
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub profile_image: Option<String>,
    pub department: Option<String>,

    #[validate(length(min = 8, message = "A senha deve ter no mínimo 8 caracteres."))]
    pub password: Option<String>,

    // Administrativos
    pub role: Option<crate::models::auth::UserRole>,
    pub status: Option<crate::models::auth::UserStatus>,
    pub permissions: Option<Vec<String>>,
    pub manager_id: Option<Uuid>,
}

impl UserService {
    pub fn new(user_repo: UserRepository, pool: sqlx::PgPool) -> Self {
        Self { user_repo, pool }
    }

    pub async fn list(&self) -> Result<Vec<User>, AppError> {
        self.user_repo.list_all().await
    }

    // O próprio usuário ou quem tem user.read
    pub async fn get(&self, id: Uuid, user: &CurrentUser) -> Result<User, AppError> {
        if id != user.id && !user.has_permission(perms::USER_READ) {
            return Err(AppError::Forbidden(
                "Você não pode consultar outros usuários.".into(),
            ));
        }

        self.user_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Usuário"))
    }

    pub async fn update(
        &self,
        id: Uuid,
        payload: UpdateUserPayload,
        user: &CurrentUser,
    ) -> Result<User, AppError> {
        let is_self = id == user.id;
        if !is_self && !user.has_permission(perms::USER_MANAGE) {
            return Err(AppError::Forbidden(
                "Você não pode alterar outros usuários.".into(),
            ));
        }

        let wants_admin_fields = payload.role.is_some()
            || payload.status.is_some()
            || payload.permissions.is_some()
            || payload.manager_id.is_some();
        if wants_admin_fields && !user.has_permission(perms::USER_MANAGE) {
            return Err(AppError::Forbidden(
                "Papel, status e permissões só podem ser alterados pela gestão.".into(),
            ));
        }

        let mut target = self
            .user_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Usuário"))?;

        if let Some(full_name) = payload.full_name {
            target.full_name = full_name;
        }
        if payload.phone_number.is_some() {
            target.phone_number = payload.phone_number;
        }
        if payload.address.is_some() {
            target.address = payload.address;
        }
        if payload.profile_image.is_some() {
            target.profile_image = payload.profile_image;
        }
        if payload.department.is_some() {
            target.department = payload.department;
        }
        if let Some(role) = payload.role {
            target.role = role;
        }
        if let Some(status) = payload.status {
            target.status = status;
        }
        if payload.permissions.is_some() {
            target.permissions = payload.permissions;
        }
        if payload.manager_id.is_some() {
            target.manager_id = payload.manager_id;
        }

        // Troca de senha sempre re-hasheia; o hash armazenado intocado não
        // passa de novo pelo bcrypt (guarda do ensure_hashed).
        if let Some(password) = payload.password {
            target.password = auth::ensure_hashed(password).await?;
        }

        self.user_repo.update(&self.pool, &target).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.user_repo.soft_delete(id).await
    }
}
