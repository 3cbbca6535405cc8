use rulebatch::scheduler::{BatchTracker, Observation};

#[test]
fn test_first_sighting_never_submits() {
    let mut tracker = BatchTracker::new();

    assert_eq!(tracker.observe("fit", 5), Observation::FirstSighting);
    assert_eq!(tracker.tracked("fit"), Some(0));
}

#[test]
fn test_two_identical_observations_stabilize() {
    let mut tracker = BatchTracker::new();

    tracker.observe("fit", 5);
    assert_eq!(tracker.observe("fit", 5), Observation::Accumulating);
    assert_eq!(tracker.tracked("fit"), Some(5));
    assert_eq!(tracker.observe("fit", 5), Observation::Stable);
}

#[test]
fn test_growing_batch_keeps_accumulating() {
    let mut tracker = BatchTracker::new();

    tracker.observe("fit", 2);
    assert_eq!(tracker.observe("fit", 4), Observation::Accumulating);
    assert_eq!(tracker.observe("fit", 9), Observation::Accumulating);
    assert_eq!(tracker.observe("fit", 12), Observation::Accumulating);
    assert_eq!(tracker.observe("fit", 12), Observation::Stable);
}

#[test]
fn test_empty_rule_leaves_state_unchanged() {
    let mut tracker = BatchTracker::new();

    // Never seen
    assert_eq!(tracker.observe("fit", 0), Observation::Empty);
    assert_eq!(tracker.tracked("fit"), None);

    // Already tracked
    tracker.observe("fit", 3);
    tracker.observe("fit", 3);
    assert_eq!(tracker.observe("fit", 0), Observation::Empty);
    assert_eq!(tracker.tracked("fit"), Some(3));
}

#[test]
fn test_shrinking_batch_keeps_tracked_count() {
    let mut tracker = BatchTracker::new();

    tracker.observe("fit", 1);
    tracker.observe("fit", 8);
    assert_eq!(tracker.observe("fit", 6), Observation::Shrunk);
    assert_eq!(tracker.tracked("fit"), Some(8));
    assert_eq!(tracker.observe("fit", 8), Observation::Stable);
}

#[test]
fn test_reset_starts_next_batch_from_zero() {
    let mut tracker = BatchTracker::new();

    tracker.observe("fit", 4);
    tracker.observe("fit", 4);
    assert_eq!(tracker.observe("fit", 4), Observation::Stable);

    tracker.reset("fit");
    assert_eq!(tracker.tracked("fit"), Some(0));

    // Rule stays known, so the next batch does not need a first sighting
    assert_eq!(tracker.observe("fit", 2), Observation::Accumulating);
    assert_eq!(tracker.observe("fit", 2), Observation::Stable);
}

#[test]
fn test_rules_are_tracked_independently() {
    let mut tracker = BatchTracker::new();

    tracker.observe("fit", 3);
    tracker.observe("register", 7);
    assert_eq!(tracker.observe("fit", 3), Observation::Accumulating);
    assert_eq!(tracker.observe("register", 7), Observation::Accumulating);
    assert_eq!(tracker.observe("fit", 3), Observation::Stable);
    assert_eq!(tracker.observe("register", 8), Observation::Accumulating);

    tracker.reset("fit");
    assert_eq!(tracker.tracked("fit"), Some(0));
    assert_eq!(tracker.tracked("register"), Some(8));
}
