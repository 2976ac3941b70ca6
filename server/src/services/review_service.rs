use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use crate::models::review::{MAX_RATING, MIN_RATING};
use crate::models::{prefixed_id, NewReview, RatingSummary, Review, User};
use crate::services::latency::Latency;
use crate::services::seed::sample_reviews;
use crate::storage::{keys, load_collection, save_collection, Storage, StorageError};
use crate::utils::error::AppError;

/// Arithmetic mean of the given ratings, `0.0` for none.
pub fn average_rating<I>(ratings: I) -> RatingSummary
where
    I: IntoIterator<Item = u8>,
{
    let (sum, count) = ratings
        .into_iter()
        .fold((0u32, 0u32), |(sum, count), rating| {
            (sum + u32::from(rating), count + 1)
        });
    let average = if count == 0 {
        0.0
    } else {
        f64::from(sum) / f64::from(count)
    };
    RatingSummary { average, count }
}

fn newest_first(mut reviews: Vec<Review>) -> Vec<Review> {
    reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    reviews
}

pub struct ReviewService {
    storage: Arc<dyn Storage>,
    reviews: RwLock<Vec<Review>>,
    latency: Latency,
}

impl ReviewService {
    pub async fn load(
        storage: Arc<dyn Storage>,
        latency: Latency,
        seed: bool,
    ) -> Result<Self, StorageError> {
        let reviews = match load_collection::<Review>(storage.as_ref(), keys::REVIEWS).await? {
            Some(reviews) => reviews,
            None if seed => {
                let reviews = sample_reviews();
                save_collection(storage.as_ref(), keys::REVIEWS, &reviews).await?;
                info!(count = reviews.len(), "Seeded sample reviews");
                reviews
            }
            None => Vec::new(),
        };

        Ok(Self {
            storage,
            reviews: RwLock::new(reviews),
            latency,
        })
    }

    /// Writes `staged`, then swaps it in; memory is untouched on failure.
    async fn commit(&self, reviews: &mut Vec<Review>, staged: Vec<Review>) -> Result<(), StorageError> {
        save_collection(self.storage.as_ref(), keys::REVIEWS, &staged).await?;
        *reviews = staged;
        Ok(())
    }

    pub async fn create_review(
        &self,
        event_id: &str,
        author: &User,
        new_review: NewReview,
    ) -> Result<Review, AppError> {
        self.latency.simulate(Latency::WRITE_MS).await;

        if !(MIN_RATING..=MAX_RATING).contains(&new_review.rating) {
            return Err(AppError::ValidationError(format!(
                "Rating must be between {} and {}",
                MIN_RATING, MAX_RATING
            )));
        }
        let comment = new_review.comment.trim();
        if comment.is_empty() {
            return Err(AppError::ValidationError("Comment is required".to_string()));
        }

        let review = Review {
            id: prefixed_id("review"),
            event_id: event_id.to_string(),
            user_id: author.id.clone(),
            user_name: author.name.clone(),
            user_avatar: author.avatar.clone(),
            rating: new_review.rating,
            comment: comment.to_string(),
            helpful: 0,
            created_at: Utc::now(),
        };

        let mut reviews = self.reviews.write().await;
        let mut staged = reviews.clone();
        staged.push(review.clone());
        self.commit(&mut reviews, staged).await?;

        info!(review_id = %review.id, event_id, rating = review.rating, "Review created");
        Ok(review)
    }

    pub async fn event_reviews(&self, event_id: &str) -> Vec<Review> {
        self.latency.simulate(Latency::QUERY_MS).await;
        let reviews = self.reviews.read().await;
        newest_first(
            reviews
                .iter()
                .filter(|review| review.event_id == event_id)
                .cloned()
                .collect(),
        )
    }

    pub async fn user_reviews(&self, user_id: &str) -> Vec<Review> {
        self.latency.simulate(Latency::QUERY_MS).await;
        let reviews = self.reviews.read().await;
        newest_first(
            reviews
                .iter()
                .filter(|review| review.user_id == user_id)
                .cloned()
                .collect(),
        )
    }

    pub async fn rating_summary(&self, event_id: &str) -> RatingSummary {
        let reviews = self.reviews.read().await;
        average_rating(
            reviews
                .iter()
                .filter(|review| review.event_id == event_id)
                .map(|review| review.rating),
        )
    }

    /// Unguarded increment; the same user may mark a review any number of
    /// times. Returns `false` for an unknown review.
    pub async fn mark_helpful(&self, review_id: &str) -> Result<bool, AppError> {
        self.latency.simulate(Latency::LOOKUP_MS).await;

        let mut reviews = self.reviews.write().await;
        let Some(index) = reviews.iter().position(|review| review.id == review_id) else {
            return Ok(false);
        };
        let mut staged = reviews.clone();
        staged[index].helpful += 1;
        self.commit(&mut reviews, staged).await?;
        Ok(true)
    }

    /// Deletes a review written by `user_id`, returning it.
    pub async fn delete_review(
        &self,
        review_id: &str,
        user_id: &str,
    ) -> Result<Option<Review>, AppError> {
        self.latency.simulate(Latency::QUERY_MS).await;

        let mut reviews = self.reviews.write().await;
        let Some(index) = reviews
            .iter()
            .position(|review| review.id == review_id && review.user_id == user_id)
        else {
            return Ok(None);
        };
        let mut staged = reviews.clone();
        let removed = staged.remove(index);
        self.commit(&mut reviews, staged).await?;

        info!(review_id, "Review deleted");
        Ok(Some(removed))
    }
}
