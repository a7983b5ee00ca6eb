//! Allocation properties and end-to-end scenarios over the pure core

use nextid_core::prelude::*;
use nextid_core::{Identifier, ReportStatus, DEFAULT_THRESHOLD};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn render(ids: &[Identifier]) -> String {
    let mut out = String::from("public enum DiagnosticId\n{\n    None = 0,\n");
    for (i, id) in ids.iter().enumerate() {
        out.push_str(&format!("    Rule{i} = {id},\n"));
    }
    out.push('}');
    out
}

fn sample(number: u64, ids: &[Identifier]) -> ProposalSample {
    ProposalSample::retrieved(
        Proposal::new(number, format!("Proposal {number}"), format!("head{number}")),
        render(ids),
        &IdentifierParser::default(),
    )
}

fn baseline_of(ids: &[Identifier]) -> IdentifierSet {
    IdentifierParser::default().parse(&render(ids))
}

#[test]
fn scenario_a_no_open_proposals() {
    let baseline = baseline_of(&[2000, 2001, 2159]);
    let result = allocate(&baseline, &[]).unwrap();
    assert_eq!(result.next_id, 2160);
}

#[test]
fn scenario_b_two_proposals_distinct_ids() {
    let base = [2000, 2001, 2159];
    let baseline = baseline_of(&base);
    let samples = [
        sample(1, &[2000, 2001, 2159, 2160]),
        sample(2, &[2000, 2001, 2159, 2161]),
    ];

    let result = allocate(&baseline, &samples).unwrap();
    assert_eq!(result.next_id, 2162);

    let listed: Vec<(u64, Vec<Identifier>)> = result
        .proposals_with_new_ids
        .iter()
        .map(|p| (p.proposal.number, p.new_ids.to_vec()))
        .collect();
    assert_eq!(listed, vec![(1, vec![2160]), (2, vec![2161])]);
}

#[test]
fn scenario_d_same_value_in_two_proposals() {
    let baseline = baseline_of(&[2000, 2159]);
    let samples = [sample(10, &[2000, 2159, 2160]), sample(11, &[2000, 2159, 2160])];

    let result = allocate(&baseline, &samples).unwrap();
    assert_eq!(result.next_id, 2161);
    assert_eq!(result.proposals_with_new_ids.len(), 2);
    assert!(result
        .proposals_with_new_ids
        .iter()
        .all(|p| p.new_ids.to_vec() == vec![2160]));

    let report = Reporter::default().report(&result, &Coverage::Complete { open_proposals: 2 });
    assert_eq!(report.status, ReportStatus::Success);
    assert_eq!(report.collisions.len(), 1);
    assert_eq!(report.collisions[0].proposal_numbers, vec![10, 11]);
}

#[test]
fn failed_fetch_contributes_nothing() {
    let baseline = baseline_of(&[2000, 2159]);
    let samples = [
        sample(1, &[2160]),
        ProposalSample::failed(Proposal::new(2, "Broken", "head2"), "decode error"),
    ];

    let result = allocate(&baseline, &samples).unwrap();
    assert_eq!(result.next_id, 2161);
    assert_eq!(result.proposals_with_new_ids.len(), 1);
}

fn ids_strategy() -> impl Strategy<Value = Vec<Identifier>> {
    prop::collection::vec(0u64..4000, 0..40)
}

fn proposals_strategy() -> impl Strategy<Value = Vec<Vec<Identifier>>> {
    prop::collection::vec(ids_strategy(), 0..6)
}

proptest! {
    #[test]
    fn prop_parsed_ids_respect_threshold(ids in ids_strategy()) {
        let parsed = IdentifierParser::default().parse(&render(&ids));
        prop_assert!(parsed.iter().all(|id| id >= DEFAULT_THRESHOLD));

        let expected: IdentifierSet = ids.iter().copied().filter(|&id| id >= DEFAULT_THRESHOLD).collect();
        prop_assert_eq!(parsed, expected);
    }

    #[test]
    fn prop_next_id_is_max_plus_one_and_unused(
        base in prop::collection::vec(2000u64..3000, 1..30),
        proposals in proposals_strategy(),
    ) {
        let baseline = baseline_of(&base);
        let samples: Vec<_> = proposals
            .iter()
            .enumerate()
            .map(|(i, ids)| sample(i as u64 + 1, ids))
            .collect();

        let result = allocate(&baseline, &samples).unwrap();
        prop_assert_eq!(Some(result.next_id), result.global_used.max().map(|m| m + 1));
        prop_assert!(!result.global_used.contains(result.next_id));
        for sample in &samples {
            for id in &sample.parsed_ids {
                prop_assert!(result.global_used.contains(id));
                prop_assert!(id < result.next_id);
            }
        }
    }

    #[test]
    fn prop_order_independent(
        base in prop::collection::vec(2000u64..3000, 1..30),
        proposals in proposals_strategy(),
    ) {
        let baseline = baseline_of(&base);
        let samples: Vec<_> = proposals
            .iter()
            .enumerate()
            .map(|(i, ids)| sample(i as u64 + 1, ids))
            .collect();
        let mut reversed = samples.clone();
        reversed.reverse();

        let forward = allocate(&baseline, &samples).unwrap();
        let backward = allocate(&baseline, &reversed).unwrap();
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn prop_monotonic_when_adding_proposal(
        base in prop::collection::vec(2000u64..3000, 1..30),
        proposals in proposals_strategy(),
        extra in ids_strategy(),
    ) {
        let baseline = baseline_of(&base);
        let mut samples: Vec<_> = proposals
            .iter()
            .enumerate()
            .map(|(i, ids)| sample(i as u64 + 1, ids))
            .collect();
        let before = allocate(&baseline, &samples).unwrap();

        let added = sample(1000, &extra);
        let adds_new = !added.new_ids(&baseline).is_empty();
        samples.push(added);
        let after = allocate(&baseline, &samples).unwrap();

        prop_assert!(after.next_id >= before.next_id);
        if !adds_new {
            prop_assert_eq!(after.next_id, before.next_id);
        }
    }

    #[test]
    fn prop_larger_baseline_never_lowers_next_id(
        base in prop::collection::vec(2000u64..3000, 1..30),
        more in prop::collection::vec(2000u64..5000, 0..10),
        proposals in proposals_strategy(),
    ) {
        let samples: Vec<_> = proposals
            .iter()
            .enumerate()
            .map(|(i, ids)| sample(i as u64 + 1, ids))
            .collect();
        let small = baseline_of(&base);
        let large = small.union(&more.iter().copied().collect::<IdentifierSet>());

        let before = allocate(&small, &samples).unwrap();
        let after = allocate(&large, &samples).unwrap();
        prop_assert!(after.next_id >= before.next_id);
        prop_assert!(after.baseline_max >= before.baseline_max);
    }

    #[test]
    fn prop_removing_one_sample_only_drops_its_contribution(
        base in prop::collection::vec(2000u64..3000, 1..30),
        proposals in prop::collection::vec(ids_strategy(), 1..6),
        victim in any::<prop::sample::Index>(),
    ) {
        let baseline = baseline_of(&base);
        let samples: Vec<_> = proposals
            .iter()
            .enumerate()
            .map(|(i, ids)| sample(i as u64 + 1, ids))
            .collect();
        let victim = victim.index(samples.len());
        let victim_number = samples[victim].proposal.number;

        let full = allocate(&baseline, &samples).unwrap();
        let mut reduced_samples = samples.clone();
        reduced_samples[victim] = ProposalSample::failed(samples[victim].proposal.clone(), "fetch failed");
        let reduced = allocate(&baseline, &reduced_samples).unwrap();

        let others = |r: &AllocationResult| -> Vec<_> {
            r.proposals_with_new_ids
                .iter()
                .filter(|p| p.proposal.number != victim_number)
                .cloned()
                .collect()
        };
        prop_assert_eq!(others(&full), others(&reduced));
        prop_assert!(reduced
            .proposals_with_new_ids
            .iter()
            .all(|p| p.proposal.number != victim_number));
    }
}
