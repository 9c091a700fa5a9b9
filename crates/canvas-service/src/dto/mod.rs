//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{
    ChangePasswordRequest, CommunityListQuery, CreateCommunityRequest, LoginRequest,
    MemberActionRequest, MessagesQuery, PostMessageRequest, PurchaseRequest, RegisterRequest,
};

pub use responses::{
    AnalyticsResponse, ApiResponse, ArtistRankingResponse, ArtworkResponse, BadgeResponse,
    BadgesResponse, CommunityDetailResponse, CommunityRanking, CommunityResponse,
    CreatedArtworkResponse, DailyMessages, HealthResponse, LoginResponse, MemberSummary,
    MembershipResponse, MessageOnlyResponse, MessageResponse, PostResponse, ReadinessResponse,
    RegisterResponse, StatsResponse, TagShare, UserResponse, UserSummary,
};

pub use mappers::{badge_responses, UserDirectory};
