//! Domain errors

use thiserror::Error;

use crate::value_objects::Snowflake;

#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(Snowflake),

    #[error("Artist not found: {0}")]
    ArtistNotFound(Snowflake),

    #[error("Community not found: {0}")]
    CommunityNotFound(Snowflake),

    #[error("Artwork not found: {0}")]
    ArtworkNotFound(Snowflake),

    #[error("Post not found: {0}")]
    PostNotFound(Snowflake),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Password too weak: {0}")]
    WeakPassword(String),

    #[error("Artists must provide a specialization")]
    MissingSpecialization,

    #[error("Message content cannot be empty")]
    EmptyMessage,

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Only the community creator can do this")]
    NotCommunityCreator,

    #[error("Only community members can access the message feed")]
    NotCommunityMember,

    #[error("Not a member of this community")]
    NotMemberToLeave,

    #[error("The creator cannot leave their own community")]
    CreatorCannotLeave,

    #[error("Account is pending admin approval")]
    AccountNotApproved,

    #[error("Role '{0}' is not allowed to perform this action")]
    RoleNotAllowed(String),

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Email already in use")]
    EmailAlreadyExists,

    #[error("A community with this name already exists")]
    CommunityNameTaken,

    // =========================================================================
    // Business Rule Violations
    // =========================================================================
    #[error("You cannot buy your own artwork.")]
    CannotBuyOwnArtwork,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::ArtistNotFound(_) => "UNKNOWN_ARTIST",
            Self::CommunityNotFound(_) => "UNKNOWN_COMMUNITY",
            Self::ArtworkNotFound(_) => "UNKNOWN_ARTWORK",
            Self::PostNotFound(_) => "UNKNOWN_POST",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::WeakPassword(_) => "WEAK_PASSWORD",
            Self::MissingSpecialization => "MISSING_SPECIALIZATION",
            Self::EmptyMessage => "EMPTY_MESSAGE",

            // Authorization
            Self::NotCommunityCreator => "NOT_COMMUNITY_CREATOR",
            Self::NotCommunityMember => "NOT_COMMUNITY_MEMBER",
            Self::NotMemberToLeave => "NOT_COMMUNITY_MEMBER",
            Self::CreatorCannotLeave => "CREATOR_CANNOT_LEAVE",
            Self::AccountNotApproved => "ACCOUNT_NOT_APPROVED",
            Self::RoleNotAllowed(_) => "ROLE_NOT_ALLOWED",

            // Conflict
            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            Self::CommunityNameTaken => "COMMUNITY_NAME_TAKEN",

            // Business Rules
            Self::CannotBuyOwnArtwork => "CANNOT_BUY_OWN_ARTWORK",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_)
                | Self::ArtistNotFound(_)
                | Self::CommunityNotFound(_)
                | Self::ArtworkNotFound(_)
                | Self::PostNotFound(_)
        )
    }

    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::InvalidEmail
                | Self::WeakPassword(_)
                | Self::MissingSpecialization
                | Self::EmptyMessage
        )
    }

    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::NotCommunityCreator
                | Self::NotCommunityMember
                | Self::NotMemberToLeave
                | Self::CreatorCannotLeave
                | Self::AccountNotApproved
                | Self::RoleNotAllowed(_)
        )
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::EmailAlreadyExists | Self::CommunityNameTaken)
    }

    /// Business rule violations are the caller's fault, reported as bad requests
    pub fn is_business_rule(&self) -> bool {
        matches!(self, Self::CannotBuyOwnArtwork)
    }
}
