//! Integration tests for resources and expanding resources.
//!
//! Covers:
//! 1. Concurrent exhaustion without duplicates or omissions
//! 2. Bounded take under arbitrary limits
//! 3. Lazy expansion of a cart timeline

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use cart_track::core::{
    Cart, ExpandingResource, Resource, ResourceState, ScheduledEvent, StreamingRepository,
};
use cart_track::infra::InMemoryRepository;
use rand::Rng;

#[test]
fn test_concurrent_take_exhausts_without_duplicates() {
    const N: usize = 64;

    let resource = Arc::new(Resource::from_vec((0..N).collect::<Vec<_>>()));
    let mut handles = vec![];

    for _ in 0..N {
        let resource = Arc::clone(&resource);
        handles.push(thread::spawn(move || resource.take(1)));
    }

    let mut taken: Vec<usize> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();
    taken.sort_unstable();

    assert_eq!(taken, (0..N).collect::<Vec<_>>());
    assert_eq!(resource.state(), ResourceState::Exhausted);
    assert_eq!(resource.position(), N);
}

#[test]
fn test_concurrent_oversubscribed_take() {
    const N: usize = 100;
    const THREADS: usize = 8;

    let resource = Arc::new(Resource::lazy(N, || (0..N).collect()));
    let mut handles = vec![];

    for _ in 0..THREADS {
        let resource = Arc::clone(&resource);
        handles.push(thread::spawn(move || {
            let mut mine = Vec::new();
            loop {
                let slice = resource.take(3);
                if slice.is_empty() {
                    break;
                }
                mine.extend(slice);
            }
            mine
        }));
    }

    let all: Vec<usize> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();
    let unique: HashSet<usize> = all.iter().copied().collect();

    assert_eq!(all.len(), N);
    assert_eq!(unique.len(), N);
    assert!(resource.is_exhausted());
}

#[test]
fn test_bounded_take_with_random_limits() {
    let mut rng = rand::rng();

    for _ in 0..50 {
        let size = rng.random_range(0..40usize);
        let resource = Resource::from_vec((0..size).collect::<Vec<_>>());
        let mut collected = Vec::new();

        while collected.len() < size {
            let limit = rng.random_range(0..6usize);
            let before = resource.position();
            let slice = resource.take(limit);
            assert!(slice.len() <= limit.min(size - before));
            assert_eq!(resource.position(), before + slice.len());
            collected.extend(slice);
        }

        assert_eq!(collected, (0..size).collect::<Vec<_>>());
        assert!(resource.take(rng.random_range(1..10usize)).is_empty());
        assert_eq!(resource.state(), ResourceState::Exhausted);
    }
}

fn three_item_cart(id: u64) -> Arc<Cart<u32>> {
    let cart = Cart::new(id);
    cart.commit(ScheduledEvent::new(id, Resource::from_vec(vec![1, 1, 1])));
    Arc::new(cart)
}

#[test]
fn test_lazy_expansion_materializes_one_cart_per_take() {
    let repository = Arc::new(InMemoryRepository::<u32>::new());
    let timeline: ExpandingResource<Arc<Cart<u32>>, _> =
        ExpandingResource::new(three_item_cart, Arc::clone(&repository));

    let mut seen = Vec::new();
    for i in 0..40u64 {
        assert_eq!(timeline.size(), i);
        let cart = timeline.take(1).unwrap().pop().expect("one cart per take");
        assert_eq!(cart.id(), i);
        assert_eq!(cart.deliver_with(10), vec![1, 1, 1]);
        seen.push(cart);
    }

    let ids: HashSet<u64> = seen.iter().map(|c| c.id()).collect();
    assert_eq!(ids.len(), 40);
    for pair in seen.windows(2) {
        assert!(!Arc::ptr_eq(&pair[0], &pair[1]));
    }
    assert_eq!(timeline.window_len(), 0);
    assert!(repository.is_empty());
}

#[test]
fn test_lazy_expansion_prefers_repository_entries() {
    let repository = Arc::new(InMemoryRepository::<u32>::new());
    for id in 10..20u64 {
        let cart = Cart::new(id);
        cart.commit(ScheduledEvent::new(id, Resource::from_vec(vec![0, 1, 2, 3])));
        repository.save(Arc::new(cart)).unwrap();
    }

    let timeline: ExpandingResource<Arc<Cart<u32>>, _> =
        ExpandingResource::new(three_item_cart, Arc::clone(&repository));

    for i in 0..40u64 {
        let cart = timeline.take(1).unwrap().pop().unwrap();
        let items = cart.deliver_with(10);
        if (10..20).contains(&i) {
            assert_eq!(items, vec![0, 1, 2, 3], "bucket {i} should come from storage");
        } else {
            assert_eq!(items, vec![1, 1, 1], "bucket {i} should be defaulted");
        }
    }
}

#[test]
fn test_expanding_take_of_many_grows_in_one_step() {
    let repository = Arc::new(InMemoryRepository::<u32>::new());
    let timeline: ExpandingResource<Arc<Cart<u32>>, _> =
        ExpandingResource::new(Cart::shared, repository);

    let carts = timeline.take(5).unwrap();
    assert_eq!(carts.iter().map(|c| c.id()).collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
    assert_eq!(timeline.position(), 5);
    assert_eq!(timeline.size(), 5);
}
