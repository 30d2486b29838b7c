//! Storage contract consumed by the track and its expanding timeline.

use crate::core::TrackError;

/// Bucket index on a track.
pub type CartId = u64;

/// Abstraction for storage backends that hold buckets and commitments.
///
/// Methods take `&self`; implementations synchronize internally so a single
/// handle can be shared between a [`Track`](crate::core::Track) and its
/// timeline. A lookup miss is `Ok(None)`, never an error.
pub trait StreamingRepository<T>: Send + Sync {
    /// Commitment type persisted through [`save_commitment`](Self::save_commitment).
    type Commitment;

    /// Fetch the item stored under `id`.
    fn get_by_id(&self, id: CartId) -> Result<Option<T>, TrackError>;
    /// Insert or replace an item.
    fn save(&self, item: T) -> Result<(), TrackError>;
    /// Persist a commitment and assign it an identity if it has none.
    ///
    /// The commitment is borrowed, so a failing backend cannot consume it.
    fn save_commitment(&self, commitment: &mut Self::Commitment) -> Result<(), TrackError>;
    /// Remove the item stored under `id`; absent ids are ignored.
    fn remove(&self, id: CartId) -> Result<(), TrackError>;
    /// Whether the store holds no items.
    fn is_empty(&self) -> bool;
}
