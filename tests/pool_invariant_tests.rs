// tests/pool_invariant_tests.rs
//
// Pool invariants under adversarial call sequences:
// - total queue length always equals the sum of per-checkout wait lists,
// - the open count never drops below the configured floor,
// - removal never evicts a busy checkout and never panics.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use tillsim::{CheckoutPool, RequestOutcome, Ticket};

#[test]
fn consistency_holds_under_random_interleavings() {
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let mut pool = CheckoutPool::new(3, 2);
    let mut seated: Vec<Ticket> = Vec::new();
    let mut next_customer = 0u64;

    for _ in 0..5_000 {
        match rng.gen_range(0..100) {
            0..=49 => {
                let outcome = pool.request(next_customer);
                next_customer += 1;
                if let RequestOutcome::Seated(ticket) = outcome {
                    seated.push(ticket);
                }
            }
            50..=79 => {
                if !seated.is_empty() {
                    let idx = rng.gen_range(0..seated.len());
                    let ticket = seated.swap_remove(idx);
                    if let Some(customer) = pool.release(ticket) {
                        seated.push(Ticket {
                            checkout_id: ticket.checkout_id,
                            customer,
                        });
                    }
                }
            }
            80..=89 => pool.add_checkout(),
            _ => {
                pool.remove_checkout();
            }
        }

        // Consistency: the aggregate observation matches the parts.
        let per_checkout: usize = pool.queue_lengths().iter().sum();
        assert_eq!(pool.queue_length(), per_checkout);
        // Invariant: the floor holds whatever the call sequence.
        assert!(pool.open_count() >= pool.min_open());
        // Every seated ticket refers to a live checkout.
        for ticket in &seated {
            assert!(
                pool.checkouts().iter().any(|c| c.id() == ticket.checkout_id),
                "busy checkout was removed"
            );
        }
    }
}

#[test]
fn removal_at_the_floor_is_a_silent_noop() {
    let mut pool = CheckoutPool::new(2, 2);
    for _ in 0..100 {
        assert!(!pool.remove_checkout());
        assert_eq!(pool.open_count(), 2);
    }
}

#[test]
fn shrink_after_growth_returns_to_the_floor() {
    let mut pool = CheckoutPool::new(1, 1);
    for _ in 0..9 {
        pool.add_checkout();
    }
    assert_eq!(pool.open_count(), 10);
    for _ in 0..20 {
        pool.remove_checkout();
    }
    assert_eq!(pool.open_count(), 1);
}

#[test]
fn busy_pool_refuses_to_shrink_until_a_release() {
    let mut pool = CheckoutPool::new(2, 1);
    let t1 = match pool.request(1) {
        RequestOutcome::Seated(t) => t,
        other => panic!("expected seat, got {other:?}"),
    };
    match pool.request(2) {
        RequestOutcome::Seated(_) => {}
        other => panic!("expected seat, got {other:?}"),
    }

    assert!(!pool.remove_checkout(), "both checkouts are busy");
    assert_eq!(pool.open_count(), 2);

    // Freeing one seat makes exactly one checkout removable.
    assert_eq!(pool.release(t1), None);
    assert!(pool.remove_checkout());
    assert_eq!(pool.open_count(), 1);
    assert!(!pool.remove_checkout(), "floor reached");
}
