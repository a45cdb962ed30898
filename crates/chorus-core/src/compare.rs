use std::cmp::Ordering;

/// Lexicographic comparison of two neighborhood criticality vectors.
///
/// Both bags are sorted in decreasing order and walked in lockstep; the
/// first pairwise difference decides. Driving the largest criticality down
/// first, then the next largest, gives the lex-min-max objective.
///
/// The two vectors being compared always describe the same neighborhood, so
/// they have equal length on the hot path. When one sorted bag is a strict
/// prefix of the other the result is `Equal`, which keeps the comparator a
/// total preorder instead of panicking; debug builds assert the lengths
/// match so the caller bug surfaces early.
pub fn compare_vectors<C: Ord + Clone>(left: &[C], right: &[C]) -> Ordering {
    debug_assert_eq!(
        left.len(),
        right.len(),
        "criticality vectors must describe the same neighborhood"
    );

    let mut left = left.to_vec();
    let mut right = right.to_vec();
    left.sort_by(|a, b| b.cmp(a));
    right.sort_by(|a, b| b.cmp(a));

    for (l, r) in left.iter().zip(right.iter()) {
        match l.cmp(r) {
            Ordering::Equal => continue,
            unequal => return unequal,
        }
    }

    Ordering::Equal
}
