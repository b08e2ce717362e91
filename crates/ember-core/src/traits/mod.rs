//! Ports consumed by the application layer

mod external;
mod repositories;

pub use external::{GeocodedPlace, Geocoder, ObjectStorage};
pub use repositories::{
    BlockRepository, CandidateQuery, ConversationRepository, CreatedMatch, MatchRepository,
    MessageRepository, RepoResult, SwipeRepository, UserRepository,
};
