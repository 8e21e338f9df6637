//! Property tests for element ordering and channel mappings

use std::collections::{BTreeMap, BTreeSet};

use partnet_core::{BlockPos, Facing, PartPos, PartTypeId};
use partnet_network::{ChannelMappings, ElementKey};
use proptest::prelude::*;

fn arb_facing() -> impl Strategy<Value = Facing> {
    (0..6i32).prop_map(|o| Facing::from_ordinal(o).unwrap_or(Facing::Down))
}

fn arb_key() -> impl Strategy<Value = ElementKey> {
    prop_oneof![
        (0..4u32, -3..3i32, -3..3i32, -3..3i32, arb_facing()).prop_map(|(t, x, y, z, side)| {
            ElementKey::part(PartTypeId::new(t), PartPos::new(BlockPos::new(x, y, z), side))
        }),
        (0..3u32, 0..8u64).prop_map(|(kind, id)| ElementKey::Other { kind, id }),
    ]
}

#[derive(Clone, Debug)]
enum ChannelOp {
    Add(String),
    Remove(String),
    Rename(String, String),
}

fn arb_name() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["red", "green", "blue", "lamps", "doors"]).prop_map(String::from)
}

fn arb_op() -> impl Strategy<Value = ChannelOp> {
    prop_oneof![
        arb_name().prop_map(ChannelOp::Add),
        arb_name().prop_map(ChannelOp::Remove),
        (arb_name(), arb_name()).prop_map(|(a, b)| ChannelOp::Rename(a, b)),
    ]
}

proptest! {
    #[test]
    fn element_order_is_strict_total(a in arb_key(), b in arb_key(), c in arb_key()) {
        // exactly one of <, ==, >
        let lt = a < b;
        let eq = a == b;
        let gt = a > b;
        prop_assert_eq!(u8::from(lt) + u8::from(eq) + u8::from(gt), 1);

        if a < b && b < c {
            prop_assert!(a < c);
        }
    }

    #[test]
    fn part_keys_sort_before_other_keys(a in arb_key(), b in arb_key()) {
        if let (ElementKey::Part { .. }, ElementKey::Other { .. }) = (a, b) {
            prop_assert!(a < b);
        }
    }

    #[test]
    fn sorting_is_stable_under_permutation(mut keys in prop::collection::vec(arb_key(), 0..24)) {
        let expected: Vec<ElementKey> = keys.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();
        keys.reverse();
        keys.sort();
        keys.dedup();
        prop_assert_eq!(keys, expected);
    }

    #[test]
    fn channel_map_stays_bijective(ops in prop::collection::vec(arb_op(), 0..40)) {
        let mut channels = ChannelMappings::new();
        for op in ops {
            match op {
                ChannelOp::Add(name) => {
                    let id = channels.add(&name);
                    prop_assert_eq!(channels.id(&name), Some(id));
                }
                ChannelOp::Remove(name) => {
                    let _ = channels.remove(&name);
                    prop_assert_eq!(channels.id(&name), None);
                }
                ChannelOp::Rename(old, new) => {
                    let before = channels.id(&old);
                    if let Ok(id) = channels.rename(&old, &new) {
                        prop_assert_eq!(before, Some(id));
                        prop_assert_eq!(channels.id(&new), Some(id));
                    }
                }
            }

            let forward: BTreeMap<String, _> = channels.iter().map(|(n, id)| (n.to_string(), id)).collect();
            let ids: BTreeSet<_> = forward.values().copied().collect();
            prop_assert_eq!(ids.len(), forward.len());
            for (name, id) in &forward {
                prop_assert_eq!(channels.name(*id), Some(name.as_str()));
            }
        }
    }

    #[test]
    fn channel_ids_are_dense(count in 1usize..10) {
        let mut channels = ChannelMappings::new();
        for i in 0..count {
            channels.add(&format!("c{}", i));
        }
        let ids: Vec<u32> = channels.iter().map(|(_, id)| id.0).collect::<BTreeSet<_>>().into_iter().collect();
        prop_assert_eq!(ids, (0..count as u32).collect::<Vec<_>>());
    }
}
