//! End-to-end scenarios across part, network and runtime

use partnet_core::{BlockPos, Facing, PartnetError};
use partnet_network::{Addition, Network, NetworkPhase, PartNetworkElement};
use partnet_part::PartNetworkView;
use partnet_runtime::{RuntimeConfig, SettingChange, SettingsIntent};
use partnet_test::{Hook, ScenarioBuilder, RECORDER};

#[test]
fn lower_priority_updates_first() {
    let mut scenario = ScenarioBuilder::new()
        .part("a", RECORDER, 0, 10)
        .part("b", RECORDER, 1, -5)
        .build()
        .unwrap();

    scenario.tick();
    let a = scenario.id("a").unwrap();
    let b = scenario.id("b").unwrap();
    assert_eq!(scenario.journal.update_order(), vec![b, a]);
}

#[test]
fn priority_change_reorders_next_tick() {
    let mut scenario = ScenarioBuilder::new()
        .part("a", RECORDER, 0, 0)
        .part("b", RECORDER, 1, 1)
        .build()
        .unwrap();
    let b_center = scenario.center("b").unwrap();

    scenario
        .sim
        .intent_sender()
        .send(SettingsIntent::new(b_center, SettingChange::Priority(-1)))
        .unwrap();
    scenario.tick();

    let a = scenario.id("a").unwrap();
    let b = scenario.id("b").unwrap();
    assert_eq!(scenario.journal.update_order(), vec![b, a]);
}

#[test]
fn interval_below_minimum_is_rejected() {
    let mut scenario = ScenarioBuilder::new()
        .part_type("parttype.partnet.slow", |p| p.with_minimum_update_interval(20))
        .part("slow", "parttype.partnet.slow", 0, 0)
        .build()
        .unwrap();
    let center = scenario.center("slow").unwrap();
    assert_eq!(scenario.state("slow").unwrap().update_interval(), 20);

    scenario
        .sim
        .intent_sender()
        .send(SettingsIntent::new(center, SettingChange::UpdateInterval(5)))
        .unwrap();
    let tick = scenario.tick();

    assert_eq!(tick.rejected.len(), 1);
    assert!(matches!(tick.rejected[0].error, PartnetError::Validation(_)));
    assert_eq!(scenario.state("slow").unwrap().update_interval(), 20);

    // the form never offers less than the minimum
    let mut form = scenario.sim.open_settings(center).unwrap();
    form.apply_all(&scenario.sim.sync().drain());
    form.set_update_interval_text("5");
    form.submit(&scenario.sim.intent_sender()).unwrap();
    let tick = scenario.tick();
    assert!(tick.rejected.is_empty());
    assert_eq!(scenario.state("slow").unwrap().update_interval(), 20);
}

#[test]
fn side_change_raises_interval_to_new_minimum() {
    let mut scenario = ScenarioBuilder::new()
        .part_type("parttype.partnet.directional", |p| p.with_side_minimum_update_interval(10))
        .part("dir", "parttype.partnet.directional", 0, 0)
        .build()
        .unwrap();
    let center = scenario.center("dir").unwrap();
    assert_eq!(scenario.state("dir").unwrap().update_interval(), 1);

    let sender = scenario.sim.intent_sender();
    sender
        .send(SettingsIntent::new(center, SettingChange::Side(Some(Facing::East))))
        .unwrap();
    let tick = scenario.tick();

    assert!(tick.rejected.is_empty());
    let state = scenario.state("dir").unwrap();
    assert_eq!(state.side_override(), Some(Facing::East));
    assert_eq!(state.update_interval(), 10);

    // an unrelated change keeps the raised interval
    sender
        .send(SettingsIntent::new(center, SettingChange::Priority(3)))
        .unwrap();
    scenario.tick();
    assert_eq!(scenario.state("dir").unwrap().update_interval(), 10);

    sender
        .send(SettingsIntent::new(center, SettingChange::UpdateInterval(4)))
        .unwrap();
    let tick = scenario.tick();
    assert_eq!(tick.rejected.len(), 1);
    assert_eq!(scenario.state("dir").unwrap().update_interval(), 10);

    // dropping the override lowers the minimum again
    sender
        .send(SettingsIntent::new(center, SettingChange::Side(None)))
        .unwrap();
    sender
        .send(SettingsIntent::new(center, SettingChange::UpdateInterval(4)))
        .unwrap();
    let tick = scenario.tick();
    assert!(tick.rejected.is_empty());
    assert_eq!(scenario.state("dir").unwrap().update_interval(), 4);
}

#[test]
fn kill_and_revive_fire_re_alive_once() {
    let mut scenario = ScenarioBuilder::new()
        .part("a", RECORDER, 0, 0)
        .part("b", RECORDER, 1, 0)
        .build()
        .unwrap();
    let network = scenario.network().unwrap();
    assert_eq!(scenario.journal.count(Hook::Alive), 2);
    scenario.journal.clear();

    scenario.sim.kill_network(network).unwrap();
    assert_eq!(scenario.journal.count(Hook::BeforeKill), 2);
    assert_eq!(
        scenario.sim.network(network).unwrap().phase(),
        NetworkPhase::Killed
    );
    scenario.run(3);
    assert_eq!(scenario.journal.count(Hook::Update), 0);

    scenario.sim.revive_network(network).unwrap();
    for label in ["a", "b"] {
        let id = scenario.id(label).unwrap();
        assert_eq!(scenario.journal.count_for(id, Hook::ReAlive), 1);
        assert_eq!(scenario.journal.count_for(id, Hook::Alive), 0);
    }

    // killed state was preserved
    assert_eq!(scenario.state("a").unwrap().priority(), 0);
    scenario.tick();
    assert_eq!(scenario.journal.count(Hook::Update), 2);
}

#[test]
fn non_numeric_priority_is_ignored() {
    let mut scenario = ScenarioBuilder::new().part("a", RECORDER, 0, 4).build().unwrap();
    let center = scenario.center("a").unwrap();

    let mut form = scenario.sim.open_settings(center).unwrap();
    form.apply_all(&scenario.sim.sync().drain());
    assert_eq!(form.priority_text(), "4");

    form.set_priority_text("four");
    form.submit(&scenario.sim.intent_sender()).unwrap();
    let tick = scenario.tick();

    assert!(tick.rejected.is_empty());
    assert_eq!(scenario.state("a").unwrap().priority(), 4);
}

#[test]
fn duplicate_identity_is_rejected() {
    let mut scenario = ScenarioBuilder::new()
        .part("a", RECORDER, 0, 0)
        .unformed()
        .build()
        .unwrap();
    let center = scenario.center("a").unwrap();
    let mut network = Network::new(Default::default());

    for expected in [Addition::Added, Addition::Rejected] {
        let element =
            PartNetworkElement::from_world(scenario.sim.registry(), scenario.sim.world(), center)
                .unwrap();
        let added = network
            .add_element(Box::new(element), scenario.sim.world_mut())
            .unwrap();
        assert_eq!(added, expected);
    }
    assert_eq!(network.len(), 1);
    assert_eq!(scenario.journal.count(Hook::NetworkAddition), 1);
}

#[test]
fn removal_unregisters_despite_failing_callback() {
    let mut scenario = ScenarioBuilder::new()
        .part_type("parttype.partnet.stubborn", |p| p.failing_removal())
        .part("s", "parttype.partnet.stubborn", 0, 0)
        .part("p", RECORDER, 1, 0)
        .build()
        .unwrap();
    let network = scenario.network().unwrap();
    let id = scenario.id("s").unwrap();
    let center = scenario.center("s").unwrap();

    let drops = scenario.sim.remove_part(center).unwrap();
    assert_eq!(drops.len(), 1);
    assert_eq!(scenario.journal.count_for(id, Hook::NetworkRemoval), 1);
    assert_eq!(scenario.journal.count_for(id, Hook::PreRemoved), 1);
    assert_eq!(scenario.journal.count_for(id, Hook::PostRemoved), 1);

    let net = scenario.sim.network(network).unwrap();
    assert!(!net.part_network().contains_part(id));
    assert_eq!(net.len(), 1);
}

#[test]
fn missing_state_is_contained_to_one_member() {
    let mut scenario = ScenarioBuilder::new()
        .part("a", RECORDER, 0, 0)
        .part("b", RECORDER, 1, 0)
        .build()
        .unwrap();
    let network = scenario.network().unwrap();
    let center = scenario.center("a").unwrap();
    scenario.sim.world_mut().remove_part(center);

    let tick = scenario.tick();
    let report = &tick.reports[&network];
    assert_eq!(report.failed, 1);
    assert_eq!(report.updated, 1);
    assert_eq!(
        scenario.journal.update_order(),
        vec![scenario.id("b").unwrap()]
    );
}

#[test]
fn cables_join_distant_parts() {
    let scenario = ScenarioBuilder::new()
        .part("a", RECORDER, 0, 0)
        .part("b", RECORDER, 5, 0)
        .cable(1)
        .cable(2)
        .cable(3)
        .cable(4)
        .build()
        .unwrap();
    let network = scenario.network().unwrap();
    assert_eq!(scenario.sim.network(network).unwrap().len(), 2);
    assert_eq!(
        scenario.sim.network_of(scenario.center("b").unwrap()),
        Some(network)
    );
}

#[test]
fn channel_lifecycle_through_settings() {
    let mut scenario = ScenarioBuilder::new().part("a", RECORDER, 0, 0).build().unwrap();
    let network = scenario.network().unwrap();
    let center = scenario.center("a").unwrap();

    let mut form = scenario.sim.open_settings(center).unwrap();
    scenario
        .sim
        .intent_sender()
        .send(form.new_channel("lamps"))
        .unwrap();
    scenario.tick();
    form.apply_all(&scenario.sim.sync().drain());
    assert!(form.channels().contains_key("lamps"));

    form.select_channel(Some("lamps"));
    form.submit(&scenario.sim.intent_sender()).unwrap();
    scenario.tick();
    let lamps = scenario.state("a").unwrap().channel().unwrap();

    let renamed = scenario.sim.rename_channel(network, "lamps", "lights").unwrap();
    assert_eq!(renamed, lamps);
    assert_eq!(scenario.state("a").unwrap().channel(), Some(lamps));

    scenario.sim.remove_channel(network, "lights").unwrap();
    assert_eq!(scenario.state("a").unwrap().channel(), None);
    assert!(scenario
        .sim
        .network(network)
        .unwrap()
        .part_network()
        .channel_id("lights")
        .is_none());
}

#[test]
fn channels_disabled_by_policy() {
    let mut scenario = ScenarioBuilder::new()
        .config(RuntimeConfig::energy_free())
        .part("a", RECORDER, 0, 0)
        .build()
        .unwrap();
    let center = scenario.center("a").unwrap();

    let form = scenario.sim.open_settings(center).unwrap();
    assert!(!form.is_channel_editable());
    let tick = scenario.tick();
    assert_eq!(tick.energy, 0.0);
}

#[test]
fn neighbor_change_reaches_mounted_parts_only() {
    let mut scenario = ScenarioBuilder::new()
        .part("a", RECORDER, 0, 0)
        .part("b", RECORDER, 1, 0)
        .build()
        .unwrap();
    let a = scenario.center("a").unwrap();

    scenario.sim.neighbor_changed(a.pos, BlockPos::new(0, 1, 0));
    assert_eq!(scenario.journal.count(Hook::NeighborChange), 1);
    assert_eq!(
        scenario
            .journal
            .count_for(scenario.id("a").unwrap(), Hook::NeighborChange),
        1
    );
}

#[test]
fn slower_parts_still_post_update_every_tick() {
    let mut scenario = ScenarioBuilder::new()
        .part_type("parttype.partnet.slow", |p| {
            p.with_minimum_update_interval(3).with_consumption_rate(4)
        })
        .part("slow", "parttype.partnet.slow", 0, 0)
        .build()
        .unwrap();

    let ticks = scenario.run(6);
    assert_eq!(scenario.journal.count(Hook::Update), 2);
    assert_eq!(scenario.journal.count(Hook::PostUpdate { updated: false }), 4);
    let energy: f64 = ticks.iter().map(|t| t.energy).sum();
    assert_eq!(energy, 8.0);
    assert_eq!(scenario.sim.energy_consumed(), 8.0);
}

#[test]
fn listing_shows_published_values() {
    let mut scenario = ScenarioBuilder::new().part("a", RECORDER, 0, 3).build().unwrap();
    scenario.tick();

    let listing = scenario.sim.listing(scenario.center("a").unwrap()).unwrap();
    let priority = listing
        .row("aspect.partnet.read.integer.priority")
        .unwrap();
    assert_eq!(priority.value, "3");
    assert!(priority.configurable);
    assert!(!listing
        .row("aspect.partnet.write.boolean.signal")
        .unwrap()
        .configurable);
}

#[test]
fn scenario_rejects_unknown_labels() {
    let scenario = ScenarioBuilder::new().build().unwrap();
    assert!(scenario.center("ghost").is_err());
    assert!(scenario.network().is_none());
}
