use helper::*;

use scrypto_test::prelude::*;

/// `[1(100), 2(90), 3(80)]`
fn three_positions() -> Result<Helper, RuntimeError> {
    let mut helper = Helper::new().unwrap();
    helper.open_all(&[(1, dec!(100)), (2, dec!(90)), (3, dec!(80))])?;
    Ok(helper)
}

#[test]
fn test_stale_hint_is_repaired_by_descent() -> Result<(), RuntimeError> {
    let mut helper = three_positions()?;

    // A = 1, B = 2, C = 3: 88 belongs between B and C
    let position = helper.find_insert_position(dec!(88), 1, 2)?;
    assert_eq!(position, (hint(2), hint(3)));

    Ok(())
}

#[test]
fn test_find_insert_position_does_not_mutate() -> Result<(), RuntimeError> {
    let mut helper = three_positions()?;

    helper.find_insert_position(dec!(85), 0, 0)?;
    helper.find_insert_position(dec!(120), 3, 0)?;

    assert_eq!(helper.list()?, pids(&[1, 2, 3]));
    assert_eq!(helper.registry.get_size(&mut helper.env)?, 3);
    helper.assert_consistent()?;

    Ok(())
}

#[test]
fn test_find_insert_position_on_empty_list() -> Result<(), RuntimeError> {
    let mut helper = Helper::new().unwrap();

    assert_eq!(helper.find_insert_position(dec!(100), 0, 0)?, (None, None));
    assert_eq!(helper.find_insert_position(dec!(100), 1, 2)?, (None, None));

    Ok(())
}

#[test]
fn test_valid_insert_position_on_empty_list() -> Result<(), RuntimeError> {
    let mut helper = Helper::new().unwrap();

    assert!(helper.valid_insert_position(dec!(100), 0, 0)?);
    assert!(!helper.valid_insert_position(dec!(100), 1, 0)?);
    assert!(!helper.valid_insert_position(dec!(100), 0, 1)?);
    assert!(!helper.valid_insert_position(dec!(100), 1, 2)?);

    Ok(())
}

#[test]
fn test_valid_insert_position_between_neighbors() -> Result<(), RuntimeError> {
    let mut helper = three_positions()?;

    assert!(helper.valid_insert_position(dec!(95), 1, 2)?);
    // Bounds are inclusive on both sides.
    assert!(helper.valid_insert_position(dec!(100), 1, 2)?);
    assert!(helper.valid_insert_position(dec!(90), 1, 2)?);
    assert!(helper.valid_insert_position(dec!(85), 2, 3)?);

    assert!(!helper.valid_insert_position(dec!(85), 1, 2)?);
    assert!(!helper.valid_insert_position(dec!(101), 1, 2)?);

    // Not adjacent, or in the wrong order.
    assert!(!helper.valid_insert_position(dec!(85), 1, 3)?);
    assert!(!helper.valid_insert_position(dec!(95), 2, 1)?);

    // Unknown ids.
    assert!(!helper.valid_insert_position(dec!(95), 42, 43)?);
    assert!(!helper.valid_insert_position(dec!(95), 1, 42)?);

    Ok(())
}

#[test]
fn test_valid_insert_position_at_the_ends() -> Result<(), RuntimeError> {
    let mut helper = three_positions()?;

    assert!(helper.valid_insert_position(dec!(100), 0, 1)?);
    assert!(helper.valid_insert_position(dec!(150), 0, 1)?);
    assert!(!helper.valid_insert_position(dec!(99), 0, 1)?);
    assert!(!helper.valid_insert_position(dec!(150), 0, 2)?);

    assert!(helper.valid_insert_position(dec!(80), 3, 0)?);
    assert!(helper.valid_insert_position(dec!(1), 3, 0)?);
    assert!(!helper.valid_insert_position(dec!(81), 3, 0)?);
    assert!(!helper.valid_insert_position(dec!(1), 2, 0)?);

    // Only an empty list accepts no neighbors at all.
    assert!(!helper.valid_insert_position(dec!(85), 0, 0)?);

    Ok(())
}

#[test]
fn test_result_does_not_depend_on_hint() -> Result<(), RuntimeError> {
    let mut helper = Helper::new().unwrap();
    helper.open_all(&[(1, dec!(100)), (2, dec!(90)), (3, dec!(80)), (4, dec!(70))])?;

    // 0 is no hint, 42 is not a member
    let hints = [0, 1, 2, 3, 4, 42];

    for prev in hints {
        for next in hints {
            assert_eq!(
                helper.find_insert_position(dec!(75), prev, next)?,
                (hint(3), hint(4)),
                "hint ({}, {})",
                prev,
                next
            );
            assert_eq!(
                helper.find_insert_position(dec!(150), prev, next)?,
                (None, hint(1)),
                "hint ({}, {})",
                prev,
                next
            );
            assert_eq!(
                helper.find_insert_position(dec!(10), prev, next)?,
                (hint(4), None),
                "hint ({}, {})",
                prev,
                next
            );
        }
    }

    Ok(())
}

#[test]
fn test_ascend_from_next_hint() -> Result<(), RuntimeError> {
    let mut helper = Helper::new().unwrap();
    helper.open_all(&[(1, dec!(100)), (2, dec!(90)), (3, dec!(80)), (4, dec!(70)), (5, dec!(60))])?;

    // Previous hint scores too low, next hint scores below the new position: walk towards the head.
    helper.open(6, dec!(95), 4, 5)?;

    assert_eq!(helper.list()?, pids(&[1, 6, 2, 3, 4, 5]));
    helper.assert_consistent()?;

    Ok(())
}

#[test]
fn test_descend_from_prev_hint() -> Result<(), RuntimeError> {
    let mut helper = Helper::new().unwrap();
    helper.open_all(&[(1, dec!(100)), (2, dec!(90)), (3, dec!(80)), (4, dec!(70)), (5, dec!(60))])?;

    helper.open(6, dec!(65), 2, 3)?;

    assert_eq!(helper.list()?, pids(&[1, 2, 3, 4, 6, 5]));
    helper.assert_consistent()?;

    Ok(())
}

#[test]
fn test_unusable_hints_fall_back_to_the_head() -> Result<(), RuntimeError> {
    let mut helper = three_positions()?;

    // Non-members
    helper.open(4, dec!(85), 42, 43)?;
    // Previous hint scores too low, no next hint
    helper.open(5, dec!(95), 3, 0)?;

    assert_eq!(helper.list()?, pids(&[1, 5, 2, 4, 3]));
    helper.assert_consistent()?;

    Ok(())
}

#[test]
fn test_valid_hint_costs_constant_lookups() -> Result<(), RuntimeError> {
    let mut helper = Helper::new().unwrap();
    helper.open_all(&[(1, dec!(100)), (2, dec!(90)), (3, dec!(80)), (4, dec!(70)), (5, dec!(60))])?;

    helper.reset_lookup_count()?;
    helper.open(6, dec!(85), 2, 3)?;
    assert_eq!(helper.lookup_count()?, 2);

    helper.reset_lookup_count()?;
    helper.open(7, dec!(120), 0, 1)?;
    assert_eq!(helper.lookup_count()?, 1);

    helper.reset_lookup_count()?;
    helper.open(8, dec!(50), 5, 0)?;
    assert_eq!(helper.lookup_count()?, 1);

    helper.reset_lookup_count()?;
    helper.remove(6)?;
    assert_eq!(helper.lookup_count()?, 0);

    assert_eq!(helper.list()?, pids(&[7, 1, 2, 3, 4, 5, 8]));

    Ok(())
}

#[test]
fn test_insert_into_empty_list_needs_no_lookup() -> Result<(), RuntimeError> {
    let mut helper = Helper::new().unwrap();

    helper.reset_lookup_count()?;
    helper.open(1, dec!(100), 0, 0)?;

    assert_eq!(helper.lookup_count()?, 0);

    Ok(())
}

#[test]
fn test_ties_without_hint_go_after_equal_scores() -> Result<(), RuntimeError> {
    let mut helper = Helper::new().unwrap();
    helper.open_all(&[(1, dec!(100)), (2, dec!(90)), (3, dec!(90)), (4, dec!(90)), (5, dec!(80))])?;

    helper.open(6, dec!(90), 0, 0)?;
    // Ascending from the next hint also stops behind the equal scores.
    helper.open(7, dec!(90), 0, 5)?;

    assert_eq!(helper.list()?, pids(&[1, 2, 3, 4, 6, 7, 5]));
    helper.assert_consistent()?;

    Ok(())
}

#[test]
fn test_ties_with_valid_hint_stay_where_hinted() -> Result<(), RuntimeError> {
    let mut helper = Helper::new().unwrap();
    helper.open_all(&[(1, dec!(100)), (2, dec!(90)), (3, dec!(90)), (4, dec!(80))])?;

    helper.open(5, dec!(90), 2, 3)?;
    helper.open(6, dec!(90), 1, 2)?;

    assert_eq!(helper.list()?, pids(&[1, 6, 2, 5, 3, 4]));
    helper.assert_consistent()?;

    Ok(())
}

#[test]
fn test_stale_scores_are_not_reordered() -> Result<(), RuntimeError> {
    let mut helper = three_positions()?;

    // Position 1 becomes risky while the list still has it at the head.
    helper.set_risk_score(1, dec!(50))?;
    assert_eq!(helper.list()?, pids(&[1, 2, 3]));

    // Searches read live scores, so the head now accepts anything from 50 up.
    assert!(helper.valid_insert_position(dec!(60), 0, 1)?);
    helper.open(4, dec!(85), 0, 0)?;
    assert_eq!(helper.list()?, pids(&[4, 1, 2, 3]));

    // Re-inserting moves it to where its live score belongs.
    helper.re_insert(1, dec!(50), 3, 0)?;
    assert_eq!(helper.list()?, pids(&[4, 2, 3, 1]));
    helper.assert_consistent()?;

    Ok(())
}

#[test]
fn test_re_insert_with_stale_hint() -> Result<(), RuntimeError> {
    let mut helper = Helper::new().unwrap();
    helper.open_all(&[(1, dec!(100)), (2, dec!(90)), (3, dec!(80)), (4, dec!(70))])?;

    // Hint computed before position 2 moved out from between 1 and 3.
    helper.adjust(2, dec!(75), 1, 2)?;

    assert_eq!(helper.list()?, pids(&[1, 3, 2, 4]));
    helper.assert_consistent()?;

    Ok(())
}
