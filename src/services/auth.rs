// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    middleware::{auth::CurrentUser, rbac},
    models::auth::{
        AccessClaims, AuthResponse, RefreshClaims, RegisterUserPayload, ResetClaims, User,
        UserRole, UserStatus, UserSummary,
    },
};

pub const ACCESS_TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60; // 7 dias
pub const REFRESH_TOKEN_TTL_SECS: i64 = 30 * 24 * 60 * 60; // 30 dias
const RESET_TOKEN_TTL_SECS: i64 = 60 * 60; // 1 hora

// Papéis permitidos no auto-registro. Papéis administrativos e o de
// secretária só nascem por onboarding iniciado por admin.
const SELF_SERVICE_ROLES: &[UserRole] = &[UserRole::Viewer, UserRole::Client, UserRole::Specialist];

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
    jwt_refresh_secret: String,
    pool: PgPool,
}

// ---
// Primitivas de token como funções livres (testáveis sem banco)
// ---

fn sign_access_token(secret: &str, user: &User, permissions: &[String]) -> Result<String, AppError> {
    let now = Utc::now();
    let claims = AccessClaims {
        sub: user.id,
        email: user.email.clone(),
        role: user.role,
        permissions: permissions.to_vec(),
        exp: (now.timestamp() + ACCESS_TOKEN_TTL_SECS) as usize,
        iat: now.timestamp() as usize,
    };
    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )?)
}

fn sign_refresh_token(secret: &str, user_id: Uuid) -> Result<String, AppError> {
    let now = Utc::now();
    let claims = RefreshClaims {
        sub: user_id,
        exp: (now.timestamp() + REFRESH_TOKEN_TTL_SECS) as usize,
        iat: now.timestamp() as usize,
    };
    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )?)
}

fn sign_reset_token(secret: &str, user_id: Uuid) -> Result<String, AppError> {
    let now = Utc::now();
    let claims = ResetClaims {
        sub: user_id,
        exp: (now.timestamp() + RESET_TOKEN_TTL_SECS) as usize,
        iat: now.timestamp() as usize,
    };
    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )?)
}

// Distingue expiração de qualquer outra falha de verificação
fn map_token_error(e: jsonwebtoken::errors::Error) -> AppError {
    match e.kind() {
        ErrorKind::ExpiredSignature => AppError::ExpiredToken,
        _ => AppError::InvalidToken,
    }
}

fn decode_access_token(secret: &str, token: &str) -> Result<AccessClaims, AppError> {
    let data = decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )
    .map_err(map_token_error)?;
    Ok(data.claims)
}

fn decode_refresh_token(secret: &str, token: &str) -> Result<RefreshClaims, AppError> {
    let data = decode::<RefreshClaims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )
    .map_err(map_token_error)?;
    Ok(data.claims)
}

// Hash bcrypt, pulando valores que já são hash (guarda contra re-hash em
// atualizações sem troca de senha). Roda fora do executor async.
pub(crate) async fn ensure_hashed(password: String) -> Result<String, AppError> {
    if password.starts_with("$2") {
        return Ok(password);
    }
    let hashed = tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
    Ok(hashed)
}

async fn verify_password(password: String, password_hash: String) -> Result<bool, AppError> {
    let is_valid = tokio::task::spawn_blocking(move || verify(&password, &password_hash))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;
    Ok(is_valid)
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        jwt_secret: String,
        jwt_refresh_secret: String,
        pool: PgPool,
    ) -> Self {
        Self {
            user_repo,
            jwt_secret,
            jwt_refresh_secret,
            pool,
        }
    }

    // Exposto para os fluxos que criam usuários em outros serviços
    // (onboarding de secretária, seed do admin)
    pub async fn hash_password(&self, password: &str) -> Result<String, AppError> {
        ensure_hashed(password.to_owned()).await
    }

    pub async fn register(&self, payload: RegisterUserPayload) -> Result<User, AppError> {
        let role = payload.role.unwrap_or(UserRole::Viewer);
        if !SELF_SERVICE_ROLES.contains(&role) {
            return Err(AppError::Forbidden(
                "Este papel não pode ser auto-atribuído no registro.".into(),
            ));
        }

        if self.user_repo.find_by_email(&payload.email).await?.is_some() {
            return Err(AppError::EmailAlreadyExists);
        }

        let hashed_password = ensure_hashed(payload.password).await?;

        // Permissões ficam NULL: o conjunto efetivo deriva do papel na
        // autenticação, e a coluna vira override explícito quando um admin
        // a preencher.
        let user = self
            .user_repo
            .create_user(
                &self.pool,
                &payload.email,
                &hashed_password,
                &payload.full_name,
                payload.phone_number.as_deref(),
                payload.department.as_deref(),
                None,
                role,
                UserStatus::Active,
                None,
            )
            .await?;

        Ok(user)
    }

    // Login: apenas usuários ativos; atualiza last_login_at.
    // Devolve a resposta pública e, separado, o refresh token para o cookie.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(AuthResponse, String), AppError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if user.status != UserStatus::Active {
            return Err(AppError::InvalidCredentials);
        }

        if !verify_password(password.to_owned(), user.password.clone()).await? {
            return Err(AppError::InvalidCredentials);
        }

        self.user_repo.touch_last_login(user.id).await?;

        self.build_auth_response(user)
    }

    // Reemite os dois tokens a partir do refresh token do cookie
    pub async fn refresh(&self, refresh_token: &str) -> Result<(AuthResponse, String), AppError> {
        let claims = decode_refresh_token(&self.jwt_refresh_secret, refresh_token)?;

        let user = self
            .user_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)?;

        if user.status != UserStatus::Active {
            return Err(AppError::InvalidToken);
        }

        self.build_auth_response(user)
    }

    // Valida o access token e recarrega o usuário do banco: papel, status e
    // overrides valem sempre na versão corrente, não na do token.
    pub async fn authenticate(&self, token: &str) -> Result<CurrentUser, AppError> {
        let claims = decode_access_token(&self.jwt_secret, token)?;

        let user = self
            .user_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)?;

        if user.status != UserStatus::Active {
            return Err(AppError::InvalidToken);
        }

        let permissions = rbac::effective_permissions(user.role, user.permissions.as_deref());

        Ok(CurrentUser {
            id: user.id,
            email: user.email,
            role: user.role,
            permissions,
        })
    }

    pub async fn change_password(
        &self,
        user_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(current_password.to_owned(), user.password.clone()).await? {
            return Err(AppError::InvalidCredentials);
        }

        let hashed = ensure_hashed(new_password.to_owned()).await?;
        self.user_repo
            .update_password(&self.pool, user.id, &hashed)
            .await?;

        Ok(())
    }

    // Nunca revela se o e-mail existe: o handler responde a mesma mensagem
    // genérica em ambos os casos.
    pub async fn request_password_reset(&self, email: &str) -> Result<(), AppError> {
        let Some(user) = self.user_repo.find_by_email(email).await? else {
            tracing::info!("Pedido de redefinição para e-mail desconhecido, ignorando");
            return Ok(());
        };

        if user.status != UserStatus::Active {
            return Ok(());
        }

        let token = sign_reset_token(&self.jwt_secret, user.id)?;
        let expires = Utc::now() + chrono::Duration::seconds(RESET_TOKEN_TTL_SECS);

        self.user_repo
            .set_password_reset(user.id, &token, expires)
            .await?;

        // TODO: disparar o e-mail com o token quando o serviço de envio existir
        tracing::info!("🔑 Token de redefinição registrado para o usuário {}", user.id);
        Ok(())
    }

    // Uso único: exige token armazenado com validade futura E assinatura
    // válida; limpa o token na troca.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AppError> {
        let user = self
            .user_repo
            .find_by_valid_reset_token(token)
            .await?
            .ok_or(AppError::InvalidOrExpiredResetToken)?;

        decode::<ResetClaims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidOrExpiredResetToken)?;

        let hashed = ensure_hashed(new_password.to_owned()).await?;
        self.user_repo
            .consume_password_reset(user.id, &hashed)
            .await?;

        Ok(())
    }

    fn build_auth_response(&self, user: User) -> Result<(AuthResponse, String), AppError> {
        let permissions = rbac::effective_permissions(user.role, user.permissions.as_deref());

        let access_token = sign_access_token(&self.jwt_secret, &user, &permissions)?;
        let refresh_token = sign_refresh_token(&self.jwt_refresh_secret, user.id)?;

        let response = AuthResponse {
            user: UserSummary {
                id: user.id,
                email: user.email,
                full_name: user.full_name,
                role: user.role,
                permissions,
            },
            access_token,
            expires_in: ACCESS_TOKEN_TTL_SECS,
        };

        Ok((response, refresh_token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            email: "ana@exemplo.com".into(),
            password: "$2b$04$invalido".into(),
            full_name: "Ana Souza".into(),
            phone_number: None,
            address: None,
            profile_image: None,
            department: None,
            role: UserRole::Specialist,
            status: UserStatus::Active,
            permissions: None,
            password_reset_token: None,
            password_reset_expires: None,
            last_login_at: None,
            manager_id: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[test]
    fn access_token_round_trips_with_claims() {
        let user = sample_user();
        let perms = vec!["specialist.read.own".to_string()];
        let token = sign_access_token("segredo-de-teste", &user, &perms).unwrap();

        let claims = decode_access_token("segredo-de-teste", &token).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.role, UserRole::Specialist);
        assert_eq!(claims.permissions, perms);
    }

    #[test]
    fn wrong_secret_is_an_invalid_token() {
        let user = sample_user();
        let token = sign_access_token("segredo-a", &user, &[]).unwrap();
        let err = decode_access_token("segredo-b", &token).unwrap_err();
        assert!(matches!(err, AppError::InvalidToken));
    }

    #[test]
    fn refresh_token_is_not_a_valid_access_token() {
        let user = sample_user();
        // Mesmo segredo: os claims não batem (faltam email/role/permissions)
        let refresh = sign_refresh_token("mesmo-segredo", user.id).unwrap();
        assert!(decode_access_token("mesmo-segredo", &refresh).is_err());
    }

    #[test]
    fn expired_token_maps_to_expired_error() {
        let now = Utc::now();
        let claims = RefreshClaims {
            sub: Uuid::new_v4(),
            // Bem além da tolerância padrão de validação
            exp: (now.timestamp() - 3600) as usize,
            iat: (now.timestamp() - 7200) as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret("segredo".as_ref()),
        )
        .unwrap();

        let err = decode_refresh_token("segredo", &token).unwrap_err();
        assert!(matches!(err, AppError::ExpiredToken));
    }

    #[tokio::test]
    async fn ensure_hashed_skips_already_hashed_values() {
        let hashed = bcrypt::hash("senha-forte", 4).unwrap();
        let again = ensure_hashed(hashed.clone()).await.unwrap();
        assert_eq!(hashed, again);
    }

    #[tokio::test]
    async fn ensure_hashed_hashes_plaintext_and_verifies() {
        let hashed = ensure_hashed("senha-forte".into()).await.unwrap();
        assert!(hashed.starts_with("$2"));
        assert_ne!(hashed, "senha-forte");
        assert!(verify_password("senha-forte".into(), hashed.clone())
            .await
            .unwrap());
        assert!(!verify_password("senha-errada".into(), hashed).await.unwrap());
    }
}
