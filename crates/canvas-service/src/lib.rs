//! # canvas-service
//!
//! Application layer containing business logic, services, and DTOs.
//!
//! Services borrow a [`ServiceContext`] for the duration of one call and take the
//! resolved caller as an explicit argument.

pub mod dto;
pub mod services;

pub use services::{
    AdminService, ArtworkService, AuthService, CommunityService, MessageService, NewArtwork,
    NewPost, PostService, ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult,
    UserService,
};
