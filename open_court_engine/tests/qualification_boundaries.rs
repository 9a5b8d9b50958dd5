use itertools::Itertools;
use open_court_entities::prelude::*;
use open_court_engine::qualification::{
    compute_qualification_plan, plan_for_category, qualifiers, QualificationError,
};

fn standings(ids: &[u128], base_wins: u32) -> Vec<GroupStanding> {
    ids.iter()
        .enumerate()
        .map(|(idx, id)| GroupStanding {
            participant: Uuid::from_u128(*id),
            wins: base_wins.saturating_sub(idx as u32),
            games_won: 30 - idx as u32 * 3,
            games_lost: 10 + idx as u32 * 3,
        })
        .collect_vec()
}

#[test]
fn test_non_integer_division_uses_floor_and_remainder() {
    // Five groups into eight seats: one each, three best runners-up.
    let plan = compute_qualification_plan(5, 8);
    assert_eq!(plan.qualified_per_group, 1);
    assert_eq!(plan.extra_wildcards_needed, 3);
    assert_eq!(plan.wildcard_source_position, 2);

    // Even division leaves no wildcards.
    let plan = compute_qualification_plan(4, 16);
    assert_eq!(plan.qualified_per_group, 4);
    assert_eq!(plan.extra_wildcards_needed, 0);
    assert_eq!(plan.wildcard_source_position, 5);
}

#[test]
fn test_individual_stage_sizes_are_doubled() {
    let team_category = Category::new("teams", TournamentFormat::GroupsKnockout)
        .with_groups(4)
        .with_knockout_stage(KnockoutStage::Quarterfinals);
    let plan = plan_for_category(&team_category);
    assert_eq!(plan.qualified_per_group, 2);
    assert_eq!(plan.extra_wildcards_needed, 0);

    let individual_category =
        Category::new("players", TournamentFormat::IndividualGroupsKnockout)
            .with_groups(4)
            .with_knockout_stage(KnockoutStage::Quarterfinals);
    let plan = plan_for_category(&individual_category);
    assert_eq!(plan.qualified_per_group, 4);
    assert_eq!(plan.wildcard_source_position, 5);
}

#[test]
fn test_odd_group_sizes_fill_the_stage_when_wildcards_exist() -> Result<(), anyhow::Error> {
    // Groups of 3, 3 and 2 into eight seats: six guaranteed, two wildcards
    // from third place. Only the two bigger groups have a third place.
    let groups = vec![
        standings(&[1, 2, 3], 2),
        standings(&[4, 5, 6], 2),
        standings(&[7, 8], 1),
    ];
    let plan = compute_qualification_plan(3, 8);
    assert_eq!(plan.qualified_per_group, 2);
    assert_eq!(plan.extra_wildcards_needed, 2);
    assert_eq!(plan.wildcard_source_position, 3);

    let qualified = qualifiers(&groups, &plan, 8)?;
    assert_eq!(qualified.all().len(), 8);
    assert_eq!(
        qualified.wildcards.iter().copied().sorted().collect_vec(),
        vec![Uuid::from_u128(3), Uuid::from_u128(6)]
    );
    Ok(())
}

#[test]
fn test_shortfall_when_no_group_reaches_the_source_position() {
    let groups = vec![
        standings(&[1, 2], 1),
        standings(&[3, 4], 1),
        standings(&[5, 6], 1),
    ];
    let plan = compute_qualification_plan(3, 8);

    let result = qualifiers(&groups, &plan, 8);
    assert_eq!(
        result,
        Err(QualificationError::Shortfall {
            expected: 8,
            available: 6,
        })
    );
}

#[test]
fn test_wildcards_never_drawn_deeper_than_the_source_position() -> Result<(), anyhow::Error> {
    // Group one is deep, group two is short. The second wildcard must not
    // come from group one's fourth place; the engine reports a shortfall
    // instead.
    let groups = vec![standings(&[1, 2, 3, 4], 3), standings(&[5, 6], 1)];
    let plan = compute_qualification_plan(2, 6);
    assert_eq!(plan.qualified_per_group, 3);
    assert_eq!(plan.wildcard_source_position, 4);
    assert_eq!(plan.extra_wildcards_needed, 0);

    // Guaranteed slots alone cannot be met by the short group.
    let result = qualifiers(&groups, &plan, 6);
    assert_eq!(
        result,
        Err(QualificationError::Shortfall {
            expected: 6,
            available: 5,
        })
    );
    Ok(())
}
