//! Authentication service for registration, login, OTP, and token management
//!
//! Farmers and traders authenticate by phone + OTP; staff roles carry a
//! bcrypt password. Both paths end in the same JWT pair. Refresh tokens
//! are stored hashed and rotated on use.

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::services::{AuditService, NotificationService, OtpStore, SequenceService};
use shared::{
    normalize_indian_phone, validate_email, validate_password, AuditEvent, Language, SequenceKind,
    UserRole,
};

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db: PgPool,
    jwt_secret: String,
    access_token_expiry: i64,
    refresh_token_expiry: i64,
    sequence: SequenceService,
    audit: AuditService,
    notifications: NotificationService,
}

/// Input for registering a new profile
#[derive(Debug, Deserialize)]
pub struct RegisterInput {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub role: UserRole,
    pub village: Option<String>,
    /// Required for staff roles; ignored for farmers and traders
    pub password: Option<String>,
    pub preferred_language: Option<Language>,
}

/// Response after successful registration
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user_id: Uuid,
    pub custom_id: Option<String>,
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub phone: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Authentication tokens
#[derive(Debug, Serialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Credential columns for login lookups
#[derive(Debug, sqlx::FromRow)]
struct CredentialRow {
    id: Uuid,
    phone: String,
    role: String,
    password_hash: Option<String>,
    is_active: bool,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(db: PgPool, config: &Config) -> Self {
        Self {
            jwt_secret: config.jwt.secret.clone(),
            access_token_expiry: config.jwt.access_token_expiry,
            refresh_token_expiry: config.jwt.refresh_token_expiry,
            sequence: SequenceService::new(db.clone()),
            audit: AuditService::new(db.clone()),
            notifications: NotificationService::new(db.clone(), config),
            db,
        }
    }

    /// Register a new profile
    pub async fn register(&self, input: RegisterInput) -> AppResult<RegisterResponse> {
        let phone = normalize_indian_phone(&input.phone).ok_or_else(|| AppError::Validation {
            field: "phone".to_string(),
            message: "Invalid Indian mobile number".to_string(),
            message_mr: "फोन नंबर अवैध आहे".to_string(),
        })?;

        if input.name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Name cannot be empty".to_string(),
                message_mr: "नाव आवश्यक आहे".to_string(),
            });
        }

        if let Some(ref email) = input.email {
            if validate_email(email).is_err() {
                return Err(AppError::Validation {
                    field: "email".to_string(),
                    message: "Invalid email format".to_string(),
                    message_mr: "ईमेल अवैध आहे".to_string(),
                });
            }
        }

        // Staff roles log in with a password; OTP-only roles do not carry one
        let password_hash = if input.role.is_staff() {
            let password = input.password.as_deref().ok_or_else(|| AppError::Validation {
                field: "password".to_string(),
                message: "Password is required for staff roles".to_string(),
                message_mr: "कर्मचारी भूमिकेसाठी पासवर्ड आवश्यक आहे".to_string(),
            })?;
            if let Err(msg) = validate_password(password) {
                return Err(AppError::Validation {
                    field: "password".to_string(),
                    message: msg.to_string(),
                    message_mr: "पासवर्ड किमान ८ अक्षरांचा असावा".to_string(),
                });
            }
            Some(
                hash(password, DEFAULT_COST)
                    .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?,
            )
        } else {
            None
        };

        // Check if phone already registered
        let existing =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM profiles WHERE phone = $1")
                .bind(&phone)
                .fetch_one(&self.db)
                .await?;
        if existing > 0 {
            return Err(AppError::Conflict {
                resource: "profile".to_string(),
                message: "A profile with this phone number already exists".to_string(),
                message_mr: "या फोन नंबरची प्रोफाइल आधीपासून अस्तित्वात आहे".to_string(),
            });
        }

        // Privileged roles get a one-time role-prefixed custom id
        let custom_id = match SequenceKind::for_role(input.role) {
            Some(kind) => Some(self.sequence.next_code(kind).await?),
            None => None,
        };

        let language = input.preferred_language.unwrap_or_default();

        let user_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO profiles (custom_id, name, phone, email, role, village, password_hash, preferred_language)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(&custom_id)
        .bind(input.name.trim())
        .bind(&phone)
        .bind(&input.email)
        .bind(input.role.as_str())
        .bind(&input.village)
        .bind(&password_hash)
        .bind(language.code())
        .fetch_one(&self.db)
        .await
        .map_err(|e| AppError::unique_violation(e, "phone"))?;

        self.audit
            .record(
                user_id,
                "profile",
                user_id,
                &AuditEvent::ProfileRegistered {
                    role: input.role,
                    custom_id: custom_id.clone(),
                },
            )
            .await;

        let tokens = self
            .issue_tokens(user_id, &phone, input.role)
            .await?;

        Ok(RegisterResponse {
            user_id,
            custom_id,
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            token_type: tokens.token_type,
            expires_in: tokens.expires_in,
        })
    }

    /// Authenticate a staff member with phone and password
    pub async fn login(&self, phone: &str, password: &str) -> AppResult<AuthTokens> {
        let phone = normalize_indian_phone(phone).ok_or(AppError::InvalidCredentials)?;
        let user = self.credentials_for(&phone).await?;

        if !user.is_active {
            return Err(AppError::InvalidCredentials);
        }

        let password_hash = user.password_hash.ok_or(AppError::InvalidCredentials)?;
        let valid = verify(password, &password_hash)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))?;
        if !valid {
            return Err(AppError::InvalidCredentials);
        }

        let role = UserRole::from_str(&user.role)
            .ok_or_else(|| AppError::Internal(format!("invalid role '{}'", user.role)))?;
        self.issue_tokens(user.id, &user.phone, role).await
    }

    /// Issue a login OTP for a registered phone number.
    /// Delivery is best-effort; the code itself is never returned.
    pub async fn request_otp(&self, otp: &OtpStore, phone: &str) -> AppResult<i64> {
        let phone = normalize_indian_phone(phone).ok_or_else(|| AppError::Validation {
            field: "phone".to_string(),
            message: "Invalid Indian mobile number".to_string(),
            message_mr: "फोन नंबर अवैध आहे".to_string(),
        })?;

        let user = self.credentials_for(&phone).await?;
        if !user.is_active {
            return Err(AppError::InvalidCredentials);
        }

        let code = otp.issue(&phone);
        self.notifications
            .send_otp(&phone, &code, otp.ttl_seconds())
            .await;

        Ok(otp.ttl_seconds())
    }

    /// Verify a login OTP and issue tokens
    pub async fn verify_otp(
        &self,
        otp: &OtpStore,
        phone: &str,
        code: &str,
    ) -> AppResult<AuthTokens> {
        let phone = normalize_indian_phone(phone).ok_or(AppError::InvalidOtp)?;

        if !otp.verify(&phone, code) {
            return Err(AppError::InvalidOtp);
        }

        let user = self.credentials_for(&phone).await?;
        if !user.is_active {
            return Err(AppError::InvalidCredentials);
        }

        let role = UserRole::from_str(&user.role)
            .ok_or_else(|| AppError::Internal(format!("invalid role '{}'", user.role)))?;
        self.issue_tokens(user.id, &user.phone, role).await
    }

    /// Rotate a refresh token into a fresh token pair
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<AuthTokens> {
        let token_hash = Self::hash_token(refresh_token);

        let row = sqlx::query_as::<_, (Uuid, String, String, bool)>(
            r#"
            SELECT p.id, p.phone, p.role, p.is_active
            FROM refresh_tokens rt
            JOIN profiles p ON p.id = rt.user_id
            WHERE rt.token_hash = $1
              AND rt.expires_at > NOW()
              AND rt.revoked_at IS NULL
            "#,
        )
        .bind(&token_hash)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::InvalidToken)?;

        let (user_id, phone, role, is_active) = row;
        if !is_active {
            return Err(AppError::InvalidCredentials);
        }

        // Rotate: the presented token is spent either way
        sqlx::query("UPDATE refresh_tokens SET revoked_at = NOW() WHERE token_hash = $1")
            .bind(&token_hash)
            .execute(&self.db)
            .await?;

        let role = UserRole::from_str(&role)
            .ok_or_else(|| AppError::Internal(format!("invalid role '{}'", role)))?;
        self.issue_tokens(user_id, &phone, role).await
    }

    async fn credentials_for(&self, phone: &str) -> AppResult<CredentialRow> {
        sqlx::query_as::<_, CredentialRow>(
            "SELECT id, phone, role, password_hash, is_active FROM profiles WHERE phone = $1",
        )
        .bind(phone)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::InvalidCredentials)
    }

    async fn issue_tokens(
        &self,
        user_id: Uuid,
        phone: &str,
        role: UserRole,
    ) -> AppResult<AuthTokens> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            phone: phone.to_string(),
            role: role.as_str().to_string(),
            exp: (now + Duration::seconds(self.access_token_expiry)).timestamp(),
            iat: now.timestamp(),
        };

        let access_token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;

        // Opaque refresh token; only its hash is stored
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        let refresh_token: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();

        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (user_id, token_hash, expires_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(user_id)
        .bind(Self::hash_token(&refresh_token))
        .bind(now + Duration::seconds(self.refresh_token_expiry))
        .execute(&self.db)
        .await?;

        Ok(AuthTokens {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_expiry,
        })
    }

    fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}
