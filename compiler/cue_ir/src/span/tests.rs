use super::*;
use pretty_assertions::assert_eq;

#[test]
fn from_range_round_trip() {
    let span = Span::try_from_range(3..9).unwrap();
    assert_eq!(span, Span::new(3, 9));
    assert_eq!(span.len(), 6);
    assert!(!span.is_empty());
}

#[test]
fn contains_is_half_open() {
    let span = Span::new(2, 5);
    assert!(span.contains(2));
    assert!(span.contains(4));
    assert!(!span.contains(5));
}

#[test]
fn merge_covers_both() {
    let a = Span::new(2, 5);
    let b = Span::new(4, 9);
    assert_eq!(a.merge(b), Span::new(2, 9));
}

#[test]
fn oversized_range_is_rejected() {
    let big = usize::try_from(u64::from(u32::MAX) + 1).unwrap();
    assert_eq!(
        Span::try_from_range(big..big + 1),
        Err(SpanError::StartTooLarge(big))
    );
}
