use crate::{AdaptiveStep, Identity, Phase, Probe, SearchRequest, Walk};
use rust_decimal::Decimal;
use std::str::FromStr;

fn d(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn identity_walk(start: &str, target: &str) -> Vec<Probe> {
    Walk::new(
        &Identity,
        AdaptiveStep::default(),
        SearchRequest::new(d(start), d(target)),
    )
    .collect()
}

#[test]
fn test_coarse_steps_until_within_threshold() {
    let probes = identity_walk("0", "10");

    let first_six: Vec<Decimal> = probes[..6].iter().map(|p| p.state.gross_salary()).collect();
    assert_eq!(
        first_six,
        vec![d("1"), d("2"), d("3"), d("4"), d("5"), d("6")]
    );
    for probe in &probes[..6] {
        assert_eq!(probe.step, Some(Decimal::ONE));
    }
}

#[test]
fn test_distance_of_exactly_threshold_still_takes_coarse_step() {
    let probes = identity_walk("0", "10");

    // At 5 the distance is exactly 5, so 5 -> 6 is a whole step
    let from_five = probes
        .iter()
        .find(|p| p.state.gross_salary() == d("6"))
        .unwrap();
    assert_eq!(from_five.step, Some(d("1")));
    assert_eq!(from_five.iteration, 6);
}

#[test]
fn test_fine_steps_after_threshold() {
    let probes = identity_walk("0", "10");

    assert_eq!(probes[6].state.gross_salary(), d("6.01"));
    assert_eq!(probes[6].step, Some(d("0.01")));
    assert_eq!(probes[7].state.gross_salary(), d("6.02"));
    for probe in &probes[6..] {
        assert_eq!(probe.step, Some(d("0.01")));
    }
}

#[test]
fn test_walk_stops_at_first_probe_meeting_target() {
    let probes = identity_walk("0", "10");

    assert_eq!(probes.len(), 406);
    let last = probes.last().unwrap();
    assert_eq!(last.state.gross_salary(), d("10.00"));
    assert_eq!(last.state.net_salary(), d("10.00"));
    assert!(probes[probes.len() - 2].state.net_salary() < d("10"));
}

#[test]
fn test_net_salary_always_matches_gross_salary() {
    let engine = |gross: Decimal| gross * d("0.8");
    let walk = Walk::new(
        &engine,
        AdaptiveStep::default(),
        SearchRequest::new(d("100"), d("250")),
    );

    for probe in walk {
        assert_eq!(
            probe.state.net_salary(),
            probe.state.gross_salary() * d("0.8")
        );
    }
}

#[test]
fn test_overshoot_up_to_one_step() {
    let engine = |gross: Decimal| gross * d("3");
    let probes: Vec<Probe> = Walk::new(
        &engine,
        AdaptiveStep::default(),
        SearchRequest::new(d("0"), d("10")),
    )
    .collect();

    let last = probes.last().unwrap();
    assert_eq!(last.state.gross_salary(), d("3.34"));
    assert_eq!(last.state.net_salary(), d("10.02"));
    assert_eq!(last.iteration, 136);
}

#[test]
fn test_target_already_met_yields_starting_state_only() {
    let probes = identity_walk("10", "10");

    assert_eq!(probes.len(), 1);
    assert!(probes[0].is_start());
    assert_eq!(probes[0].iteration, 0);
    assert_eq!(probes[0].state.gross_salary(), d("10"));
}

#[test]
fn test_negative_target_ends_immediately() {
    let probes = identity_walk("0", "-5");

    assert_eq!(probes.len(), 1);
    assert_eq!(probes[0].state.gross_salary(), Decimal::ZERO);
}

#[test]
fn test_phase_transitions() {
    let mut walk = Walk::new(
        &Identity,
        AdaptiveStep::default(),
        SearchRequest::new(d("9.98"), d("10")),
    );

    assert_eq!(walk.phase(), Phase::Searching);
    assert_eq!(walk.current().gross_salary(), d("9.98"));

    let first = walk.advance().unwrap().unwrap();
    assert_eq!(first.state.gross_salary(), d("9.99"));
    assert_eq!(walk.phase(), Phase::Searching);

    let second = walk.advance().unwrap().unwrap();
    assert_eq!(second.state.gross_salary(), d("10.00"));
    assert_eq!(walk.phase(), Phase::Done);

    assert!(walk.advance().unwrap().is_none());
    assert_eq!(walk.iterations(), 2);
}

#[test]
fn test_identical_walks_produce_identical_probes() {
    let first = identity_walk("3", "42.5");
    let second = identity_walk("3", "42.5");

    assert_eq!(first, second);
}

#[test]
fn test_engine_called_once_per_step_plus_start() {
    use std::sync::atomic::{AtomicUsize, Ordering};

    let calls = AtomicUsize::new(0);
    let engine = |gross: Decimal| {
        calls.fetch_add(1, Ordering::SeqCst);
        gross
    };
    let probes: Vec<Probe> = Walk::new(
        &engine,
        AdaptiveStep::default(),
        SearchRequest::new(d("0"), d("3")),
    )
    .collect();

    // Within 5 of the target from the start, so every step is a cent
    assert_eq!(probes.len(), 300);
    assert_eq!(calls.load(Ordering::SeqCst), 301);
}

#[test]
fn test_overflow_is_reported() {
    let never = |_: Decimal| Decimal::ZERO;
    let mut walk = Walk::new(
        &never,
        AdaptiveStep::default(),
        SearchRequest::new(Decimal::MAX, d("10")),
    );

    // Far from the target, so the next step is a whole unit past Decimal::MAX
    assert!(matches!(
        walk.advance(),
        Err(crate::GrossUpError::Overflow { .. })
    ));
    assert_eq!(walk.phase(), Phase::Searching);
}

#[test]
fn test_overflow_ends_iteration_without_finishing() {
    let never = |_: Decimal| Decimal::ZERO;
    let mut walk = Walk::new(
        &never,
        AdaptiveStep::default(),
        SearchRequest::new(Decimal::MAX - d("2"), d("10")),
    );

    let probes: Vec<Probe> = walk.by_ref().collect();

    // Two whole steps fit below Decimal::MAX, the third does not
    assert_eq!(probes.len(), 2);
    assert_eq!(probes[1].state.gross_salary(), Decimal::MAX);
    assert!(!walk.is_done());
    assert!(matches!(
        walk.advance(),
        Err(crate::GrossUpError::Overflow { .. })
    ));
}

#[test]
fn test_custom_step_policy() {
    let step = AdaptiveStep {
        threshold: d("100"),
        coarse: d("50"),
        fine: d("1"),
    };
    let probes: Vec<Probe> =
        Walk::new(&Identity, step, SearchRequest::new(d("0"), d("175"))).collect();

    let grosses: Vec<Decimal> = probes.iter().map(|p| p.state.gross_salary()).collect();
    assert_eq!(&grosses[..2], &[d("50"), d("100")]);
    assert_eq!(grosses[2], d("101"));
    assert_eq!(*grosses.last().unwrap(), d("175"));
}
