//! Property tests: replicas converge whatever order moves arrive in.

use proptest::prelude::*;
use sn_tree::{
    apply_move, has_unique_parents, insert_all, insert_move, is_acyclic, undo_move, wire, OpMove,
    State,
};

type TestOp = OpMove<u8, u8, u32>;
type TestState = State<u8, u8, u32>;

const NODES: u8 = 6;

// Moves over a small set of nodes so that conflicts and cycles are common.
// Timestamps are the position in the generated list, hence distinct.
fn arbitrary_ops(max: usize) -> impl Strategy<Value = Vec<TestOp>> {
    prop::collection::vec(
        (prop::option::of(0..NODES), 0..NODES, 0u8..3),
        1..max,
    )
    .prop_map(|moves| {
        moves
            .into_iter()
            .enumerate()
            .map(|(ts, (parent, child, meta))| OpMove::new(ts as u32, parent, meta, child))
            .collect()
    })
}

fn ops_and_permutations() -> impl Strategy<Value = (Vec<TestOp>, Vec<TestOp>, Vec<TestOp>)> {
    arbitrary_ops(40).prop_flat_map(|ops| {
        (
            Just(ops.clone()),
            Just(ops.clone()).prop_shuffle(),
            Just(ops).prop_shuffle(),
        )
    })
}

fn timestamps(state: &TestState) -> Vec<u32> {
    state.log().iter().map(|l| *l.timestamp()).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn permutations_converge((ops, p1, p2) in ops_and_permutations()) {
        let expected = insert_all(ops, None);

        let s1 = insert_all(p1, None);
        let s2 = insert_all(p2, None);

        prop_assert_eq!(s1.tree(), expected.tree());
        prop_assert_eq!(&s1, &expected);
        prop_assert_eq!(&s2, &expected);
    }

    #[test]
    fn invariants_hold_after_every_insert((_, shuffled, _) in ops_and_permutations()) {
        let mut state = TestState::new();
        for op in shuffled {
            state = insert_move(op, state);
            prop_assert!(has_unique_parents(state.tree()));
            prop_assert!(is_acyclic(state.tree()));
        }
    }

    #[test]
    fn log_is_sorted_and_replays((_, shuffled, _) in ops_and_permutations()) {
        let count = shuffled.len();
        let state = insert_all(shuffled, None);

        let ts = timestamps(&state);
        prop_assert_eq!(ts.len(), count);
        prop_assert!(ts.windows(2).all(|w| w[0] < w[1]));

        let replayed = State::from_log(state.log().to_vec());
        prop_assert_eq!(replayed, state);
    }

    #[test]
    fn split_replicas_converge_over_wire(
        (ops, _, _) in ops_and_permutations(),
        split in any::<prop::sample::Index>(),
    ) {
        let at = split.index(ops.len() + 1);
        let (left, right) = ops.split_at(at);

        let a = insert_all(left.to_vec(), None);
        let b = insert_all(right.to_vec(), None);

        let a_msg = wire::encode_ops(a.log()).unwrap();
        let b_msg = wire::encode_ops(b.log()).unwrap();

        let from_b: Vec<_> = wire::decode_ops(&b_msg).unwrap();
        let from_a: Vec<_> = wire::decode_ops(&a_msg).unwrap();
        let a = insert_all(from_b.into_iter().map(OpMove::from), Some(a));
        let b = insert_all(from_a.into_iter().map(OpMove::from), Some(b));

        prop_assert_eq!(&a, &b);
        prop_assert_eq!(a, insert_all(ops, None));
    }

    #[test]
    fn undo_inverts_apply(
        (ops, _, _) in ops_and_permutations(),
        parent in prop::option::of(0..NODES),
        child in 0..NODES,
    ) {
        let state = insert_all(ops, None);
        let tree = state.tree().clone();

        let (after, logged) = apply_move(tree.clone(), OpMove::new(1000, parent, 9, child));
        prop_assert!(is_acyclic(&after));
        prop_assert_eq!(undo_move(after, &logged), tree);
    }

    #[test]
    fn moves_under_descendants_are_rejected(
        (ops, _, _) in ops_and_permutations(),
        child in 0..NODES,
    ) {
        let state = insert_all(ops, None);
        let tree = state.tree().clone();

        let mut targets: Vec<u8> = tree
            .iter()
            .map(|(id, _)| *id)
            .filter(|id| tree.is_ancestor(&child, id))
            .collect();
        targets.push(child);

        for target in targets {
            let (after, logged) = apply_move(tree.clone(), OpMove::new(1000, Some(target), 9, child));
            prop_assert_eq!(&after, &tree);
            prop_assert_eq!(logged.new_parent(), Some(&target));
        }
    }
}

#[test]
fn literal_orders_converge() {
    let ops = vec![
        OpMove::new(0, None, 0, b'c'),
        OpMove::new(1, Some(b'c'), 0, b'b'),
        OpMove::new(2, Some(b'c'), 0, b'd'),
        OpMove::new(3, Some(b'b'), 0, b'a'),
    ];
    let reordered = vec![ops[0].clone(), ops[2].clone(), ops[1].clone(), ops[3].clone()];

    let mut one_by_one: State<u8, u8, u32> = State::new();
    for op in reordered {
        one_by_one = insert_move(op, one_by_one);
    }

    assert_eq!(one_by_one.tree(), insert_all(ops, None).tree());
    assert_eq!(one_by_one.tree().path_to_root(&b'a'), vec![b'b', b'c']);
}
