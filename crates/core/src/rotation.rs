//! Rotation/reversal maths for previewing a circularly rotated list.
//!
//! Physical indices address the list in its current (sorted) order. Display
//! slots are what the user sees: slot 0 is always the chosen start entry,
//! and the remaining slots walk forward (or backward when reversed) around
//! the list.

use crate::error::CoreError;

fn check_bounds(index: usize, len: usize) -> Result<(), CoreError> {
    if len == 0 {
        return Err(CoreError::ListEmpty);
    }
    if index >= len {
        return Err(CoreError::OutOfRange { index, len });
    }
    Ok(())
}

/// Physical index shown at display slot `slot`.
///
/// Forward: `(slot + start) mod len`. Reversed: `(start - slot) mod len`,
/// normalised to be non-negative.
pub fn display_index(slot: usize, start: usize, len: usize, reverse: bool) -> Result<usize, CoreError> {
    check_bounds(start, len)?;
    check_bounds(slot, len)?;

    let idx = if reverse {
        (start + len - slot) % len
    } else {
        (slot + start) % len
    };
    Ok(idx)
}

/// Physical indices for every display slot `0..len`.
pub fn display_order(start: usize, len: usize, reverse: bool) -> Result<Vec<usize>, CoreError> {
    check_bounds(start, len)?;
    (0..len)
        .map(|slot| display_index(slot, start, len, reverse))
        .collect()
}

/// Display slot the entry at `physical` ends up in. Inverse of
/// [`display_index`].
pub fn target_position(physical: usize, start: usize, len: usize, reverse: bool) -> Result<usize, CoreError> {
    check_bounds(start, len)?;
    check_bounds(physical, len)?;

    let forward = (physical + len - start) % len;
    Ok(if reverse { (len - forward) % len } else { forward })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn forward_example() {
        assert_eq!(display_order(2, 5, false).unwrap(), vec![2, 3, 4, 0, 1]);
    }

    #[test]
    fn reverse_example() {
        assert_eq!(display_order(2, 5, true).unwrap(), vec![2, 1, 0, 4, 3]);
    }

    #[test]
    fn empty_list_fails_fast() {
        assert_matches!(display_index(0, 0, 0, false), Err(CoreError::ListEmpty));
        assert_matches!(display_order(0, 0, true), Err(CoreError::ListEmpty));
    }

    #[test]
    fn out_of_range_inputs() {
        assert_matches!(
            display_index(5, 0, 5, false),
            Err(CoreError::OutOfRange { index: 5, len: 5 })
        );
        assert_matches!(
            display_index(0, 7, 5, true),
            Err(CoreError::OutOfRange { index: 7, len: 5 })
        );
    }

    #[test]
    fn mapping_is_a_bijection() {
        for len in 1..=12 {
            for start in 0..len {
                for reverse in [false, true] {
                    let mut order = display_order(start, len, reverse).unwrap();
                    order.sort_unstable();
                    assert_eq!(order, (0..len).collect::<Vec<_>>(), "len={len} start={start} reverse={reverse}");
                }
            }
        }
    }

    #[test]
    fn slot_zero_is_start() {
        for len in 1..=12 {
            for start in 0..len {
                assert_eq!(display_index(0, start, len, false).unwrap(), start);
                assert_eq!(display_index(0, start, len, true).unwrap(), start);
            }
        }
    }

    #[test]
    fn reverse_mirrors_the_tail() {
        for len in 2..=12 {
            for start in 0..len {
                let forward = display_order(start, len, false).unwrap();
                let mut backward = display_order(start, len, true).unwrap();
                assert_eq!(forward[0], backward[0]);
                backward[1..].reverse();
                assert_eq!(forward, backward);
            }
        }
    }

    #[test]
    fn target_position_inverts_display_index() {
        for len in 1..=9 {
            for start in 0..len {
                for reverse in [false, true] {
                    for slot in 0..len {
                        let physical = display_index(slot, start, len, reverse).unwrap();
                        assert_eq!(target_position(physical, start, len, reverse).unwrap(), slot);
                    }
                }
            }
        }
    }

    #[test]
    fn single_entry_list() {
        assert_eq!(display_order(0, 1, true).unwrap(), vec![0]);
    }
}
