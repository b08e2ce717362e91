//! Request and response DTOs

mod requests;
mod responses;

pub use requests::{
    AddPhotoRequest, DeleteAccountRequest, EditMessageRequest, LoginRequest, MarkReadRequest,
    MuteConversationRequest, PinMessageRequest, ReactionRequest, RefreshRequest, RegisterRequest,
    ReorderPhotosRequest, SendMessageRequest, UpdateLocationRequest, UpdatePreferencesRequest,
    UpdateProfileRequest,
};
pub use responses::{
    AuthResponse, BlockedUserResponse, CandidateResponse, ConversationDetailResponse,
    ConversationResponse, LastMessageResponse, MatchResponse, MatchSummaryResponse,
    MessageResponse, MessagesResponse, Page, Pagination, PrivateUserResponse, SwipeResponse,
    UserResponse,
};
