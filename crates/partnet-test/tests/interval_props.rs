//! Property tests over committed settings

use partnet_runtime::{SettingChange, SettingsIntent};
use partnet_test::ScenarioBuilder;
use proptest::prelude::*;

const MINIMUM: u32 = 8;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn interval_never_below_minimum(requests in prop::collection::vec(-20i32..40, 1..12)) {
        let mut scenario = ScenarioBuilder::new()
            .part_type("parttype.partnet.gated", |p| p.with_minimum_update_interval(MINIMUM))
            .part("g", "parttype.partnet.gated", 0, 0)
            .build()
            .unwrap();
        let center = scenario.center("g").unwrap();
        let sender = scenario.sim.intent_sender();

        let mut expected = MINIMUM;
        for requested in requests {
            sender
                .send(SettingsIntent::new(center, SettingChange::UpdateInterval(requested)))
                .unwrap();
            let tick = scenario.tick();

            if requested >= MINIMUM as i32 {
                expected = requested as u32;
                prop_assert!(tick.rejected.is_empty());
            } else {
                prop_assert_eq!(tick.rejected.len(), 1);
            }
            let committed = scenario.state("g").unwrap().update_interval();
            prop_assert!(committed >= MINIMUM);
            prop_assert_eq!(committed, expected);
        }
    }

    #[test]
    fn update_order_follows_priority(priorities in prop::collection::vec(-50i32..50, 2..6)) {
        let mut builder = ScenarioBuilder::new();
        let labels: Vec<String> = (0..priorities.len()).map(|i| format!("p{}", i)).collect();
        for (i, priority) in priorities.iter().enumerate() {
            builder = builder.part(&labels[i], partnet_test::RECORDER, i as i32, *priority);
        }
        let mut scenario = builder.build().unwrap();
        scenario.tick();

        let order = scenario.journal.update_order();
        let ranked: Vec<i32> = order
            .iter()
            .map(|id| {
                let label = labels
                    .iter()
                    .find(|l| scenario.id(l).ok() == Some(*id))
                    .unwrap();
                scenario.state(label).unwrap().priority()
            })
            .collect();
        prop_assert_eq!(ranked.len(), priorities.len());
        prop_assert!(ranked.windows(2).all(|w| w[0] <= w[1]));
    }
}
