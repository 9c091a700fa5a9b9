//! Authentication service
//!
//! Handles registration, login, session token resolution and password changes.

use canvas_common::{hash_password, validate_password, verify_password, AppError};
use canvas_core::{DomainError, Role, User};
use chrono::{Duration, Utc};
use tracing::{info, instrument, warn};

use crate::dto::{
    ChangePasswordRequest, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse,
    UserResponse,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create an account. Does not sign the user in.
    #[instrument(skip(self, request), fields(email = %request.email, role = %request.role))]
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<RegisterResponse> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(ServiceError::validation("Please provide all required fields."));
        }
        validate_password(&request.password)?;

        let specialization = non_blank(request.specialization);
        if request.role == Role::Artist && specialization.is_none() {
            return Err(DomainError::MissingSpecialization.into());
        }

        let email = request.email.trim().to_lowercase();
        if self.ctx.user_repo().email_exists(&email).await? {
            return Err(DomainError::EmailAlreadyExists.into());
        }

        let password_hash = hash_password(&request.password)?;

        let mut user = User::new(
            self.ctx.generate_id(),
            name.to_string(),
            email,
            request.role,
            specialization,
        );
        if user.role == Role::Artist {
            user.bio = non_blank(request.bio);
        }

        self.ctx.user_repo().create(&user, &password_hash).await?;
        info!(user_id = %user.id, "User registered");

        let message = match user.role {
            Role::Artist => "Registration successful! Your account is pending admin approval.",
            Role::Buyer | Role::Admin => "Registration successful! You can now log in.",
        };

        Ok(RegisterResponse {
            status: "success",
            message: message.to_string(),
            user: UserResponse::from(&user),
        })
    }

    /// Check credentials and issue a session token
    #[instrument(skip(self, request))]
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<LoginResponse> {
        let email = request.email.trim().to_lowercase();

        let Some(user) = self.ctx.user_repo().find_by_email(&email).await? else {
            warn!("Login failed: unknown email");
            return Err(AppError::InvalidCredentials.into());
        };

        let password_hash = self
            .ctx
            .user_repo()
            .get_password_hash(user.id)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(&request.password, &password_hash)? {
            warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(AppError::InvalidCredentials.into());
        }

        if !user.can_sign_in() {
            warn!(user_id = %user.id, status = %user.status, "Login refused: account not approved");
            return Err(DomainError::AccountNotApproved.into());
        }

        info!(user_id = %user.id, "User logged in");
        self.session_for(&user)
    }

    /// Resolve a session token to its user
    ///
    /// # Errors
    /// `InvalidToken`/`TokenExpired` for bad tokens, `UserGone` when the account no
    /// longer exists, `PasswordChanged` when the token predates a password change.
    #[instrument(skip(self, token))]
    pub async fn authenticate(&self, token: &str) -> ServiceResult<User> {
        let claims = self.ctx.jwt_service().verify(token)?;
        let user_id = claims.user_id()?;

        let user = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::UserGone)?;

        if user.changed_password_after(claims.iat) {
            return Err(AppError::PasswordChanged.into());
        }

        Ok(user)
    }

    /// Replace the caller's password and hand out a fresh session
    #[instrument(skip(self, user, request), fields(user_id = %user.id))]
    pub async fn change_password(
        &self,
        user: &User,
        request: ChangePasswordRequest,
    ) -> ServiceResult<LoginResponse> {
        let current_hash = self
            .ctx
            .user_repo()
            .get_password_hash(user.id)
            .await?
            .ok_or(AppError::UserGone)?;

        if !verify_password(&request.current_password, &current_hash)? {
            return Err(AppError::InvalidCredentials.into());
        }
        validate_password(&request.new_password)?;

        let new_hash = hash_password(&request.new_password)?;
        // Backdated so the token issued below is not caught by its own change
        let changed_at = Utc::now() - Duration::seconds(1);
        self.ctx
            .user_repo()
            .update_password(user.id, &new_hash, changed_at)
            .await?;

        info!("Password changed");

        let mut refreshed = user.clone();
        refreshed.password_changed_at = Some(changed_at);
        self.session_for(&refreshed)
    }

    fn session_for(&self, user: &User) -> ServiceResult<LoginResponse> {
        let session = self.ctx.jwt_service().issue(user.id)?;
        Ok(LoginResponse {
            status: "success",
            token: session.token,
            expires_in: session.expires_in,
            user: UserResponse::from(user),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
