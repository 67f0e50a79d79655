//! Property tests for the sequence composition law

use proptest::prelude::*;
use revmig_changes::Changes;
use revmig_transform::{
    DynTransformation, ExplicitReversal, Move, Replace, Sequence, TracingConsole, Transformation,
    TransformWork, WorkTree,
};
use std::sync::Arc;

fn replace_steps() -> impl Strategy<Value = Vec<DynTransformation>> {
    prop::collection::vec(("[a-z]{1,6}", "[a-z]{1,6}"), 0..8).prop_map(|pairs| {
        pairs
            .into_iter()
            .filter_map(|(before, after)| Replace::new(before, after).ok())
            .map(|step| Arc::new(step) as DynTransformation)
            .collect()
    })
}

proptest! {
    #[test]
    fn reverse_is_mirrored_inverses(steps in replace_steps()) {
        let seq = Sequence::new(steps.clone());
        let expected: Sequence = steps
            .iter()
            .rev()
            .map(|s| s.reverse().unwrap())
            .collect();
        prop_assert_eq!(seq.reversed().unwrap(), expected);
    }

    #[test]
    fn double_reverse_is_identity(steps in replace_steps()) {
        let seq = Sequence::new(steps);
        prop_assert_eq!(seq.reversed().unwrap().reversed().unwrap(), seq);
    }

    #[test]
    fn explicit_reversal_double_swap(a in "[a-z]{1,4}", b in "[A-Z]{1,4}") {
        let f: DynTransformation = Arc::new(Replace::new(a.clone(), b.clone()).unwrap());
        let g: DynTransformation = Arc::new(Replace::new(b, a).unwrap());
        let pairing = ExplicitReversal::new(f, g);
        let twice = pairing.reverse().unwrap().reverse().unwrap();
        let pairing: DynTransformation = Arc::new(pairing);
        prop_assert_eq!(&*twice, &*pairing);
    }

    #[test]
    fn move_chain_roundtrips(len in 1usize..10) {
        let steps: Vec<DynTransformation> = (0..len)
            .map(|i| Arc::new(Move::new(format!("f{i}"), format!("f{}", i + 1)).unwrap()) as DynTransformation)
            .collect();
        let seq = Sequence::new(steps);
        let inverse = seq.reversed().unwrap();

        let original = WorkTree::from_files([("f0", "content")]);
        let mut tree = original.clone();
        let console = TracingConsole;
        {
            let mut work = TransformWork::new(&mut tree, "", Changes::empty(), &console);
            seq.apply(&mut work).unwrap();
        }
        let last = format!("f{len}");
        prop_assert_eq!(tree.read(&last), Some("content"));
        {
            let mut work = TransformWork::new(&mut tree, "", Changes::empty(), &console);
            inverse.apply(&mut work).unwrap();
        }
        prop_assert_eq!(tree, original);
    }
}
