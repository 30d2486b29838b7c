//! Identity helpers.

use crate::core::EventId;

/// Random event identity derived from a v4 UUID.
pub fn random_event_id() -> EventId {
    let (high, low) = uuid::Uuid::new_v4().as_u64_pair();
    high ^ low
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_ids_differ() {
        assert_ne!(random_event_id(), random_event_id());
    }
}
