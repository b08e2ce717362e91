//! Discovery service
//!
//! Computes the candidate pool for a user: preference filter at the store,
//! then exclusion, distance, and common-interest computation in memory.
//! Pagination is applied after filtering, so `total` reflects the post-filter
//! count.

use std::collections::HashSet;

use ember_core::entities::User;
use ember_core::traits::CandidateQuery;
use ember_core::{DomainError, Snowflake};
use tracing::instrument;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Radius of Earth in miles
const EARTH_RADIUS_MILES: f64 = 3956.0;

/// A discovery candidate with derived fields
#[derive(Debug, Clone)]
pub struct Candidate {
    pub user: User,
    /// Great-circle distance in miles; None when either side lacks coordinates
    pub distance_miles: Option<f64>,
    pub common_interests: Vec<String>,
}

/// Discovery service
pub struct DiscoveryService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> DiscoveryService<'a> {
    /// Create a new DiscoveryService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Potential matches for a user, paginated after full filtering
    #[instrument(skip(self))]
    pub async fn find_candidates(
        &self,
        user_id: Snowflake,
        limit: usize,
        offset: usize,
    ) -> ServiceResult<(Vec<Candidate>, usize)> {
        let user = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::UserNotFound(user_id))?;

        // Exclusion set: already swiped, blocked in either direction, self
        let mut excluded: HashSet<Snowflake> =
            self.ctx.swipe_repo().swiped_ids(user_id).await?.into_iter().collect();
        for block in self.ctx.block_repo().involving(user_id).await? {
            excluded.insert(block.blocker_id);
            excluded.insert(block.blocked_id);
        }
        excluded.insert(user_id);

        let query = CandidateQuery {
            gender: user.looking_for,
            looking_for: user.gender,
            min_age: user.preferences.min_age,
            max_age: user.preferences.max_age,
        };
        let pool = self.ctx.user_repo().find_candidates(&query).await?;

        let seeker_coords = user.coordinates();
        let max_distance = f64::from(user.preferences.max_distance);

        let mut results = Vec::new();
        for candidate in pool {
            if excluded.contains(&candidate.id) {
                continue;
            }

            // Candidates without coordinates are never excluded by distance
            let distance_miles = match (seeker_coords, candidate.coordinates()) {
                (Some(a), Some(b)) => {
                    let distance =
                        haversine_miles(a.latitude, a.longitude, b.latitude, b.longitude);
                    if distance > max_distance {
                        continue;
                    }
                    Some(distance)
                }
                _ => None,
            };

            let common_interests = user.common_interests(&candidate);

            results.push(Candidate {
                user: candidate,
                distance_miles,
                common_interests,
            });
        }

        let total = results.len();
        let page = results.into_iter().skip(offset).take(limit).collect();

        Ok((page, total))
    }
}

/// Great-circle distance between two points in miles (haversine)
#[must_use]
pub fn haversine_miles(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (lat1, lon1, lat2, lon2) = (
        lat1.to_radians(),
        lon1.to_radians(),
        lat2.to_radians(),
        lon2.to_radians(),
    );

    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_MILES * c
}
