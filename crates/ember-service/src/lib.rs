//! # ember-service
//!
//! Application layer containing business logic, services, and DTOs.

pub mod dto;
pub mod services;

// Re-export commonly used types at crate root
pub use dto::{
    AddPhotoRequest, AuthResponse, BlockedUserResponse, CandidateResponse,
    ConversationDetailResponse, ConversationResponse, DeleteAccountRequest, EditMessageRequest,
    LastMessageResponse, LoginRequest, MarkReadRequest, MatchResponse, MatchSummaryResponse,
    MessageResponse, MessagesResponse, MuteConversationRequest, Page, Pagination,
    PinMessageRequest, PrivateUserResponse, ReactionRequest, RefreshRequest, RegisterRequest,
    ReorderPhotosRequest, SendMessageRequest, SwipeResponse, UpdateLocationRequest,
    UpdatePreferencesRequest, UpdateProfileRequest, UserResponse,
};
pub use services::{
    haversine_miles, AuthService, BlockService, BlockedUser, Candidate, ConversationService,
    ConversationSummary, DiscoveryService, LastMessage, MatchService, MatchSummary, MessageService,
    NewMessage, ReactionService, ServiceContext, ServiceContextBuilder, ServiceError,
    ServiceResult, SuperLikeOutcome, SwipeOutcome, SwipeService, UserService,
};
