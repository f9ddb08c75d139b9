//! Replays the bundled scenario through the runtime with invariant checks.

use roomlist_core::{
    ARCHIVED, DIRECT, FAVOURITE, INVITE, LOW_PRIORITY, RECENT, RoomListView, Runtime,
};
use roomlist_harness::{InvariantRegistry, Scenario, SimRoom};

const RETAG: &str = include_str!("../../roomlist-replay/scenarios/retag.json");

fn placement<'a>(view: &'a RoomListView<SimRoom>, room_id: &str) -> Vec<&'a str> {
    view.lists.keys_for(room_id)
}

#[tokio::test]
async fn retag_scenario_replays() {
    let scenario = Scenario::from_json(RETAG);
    assert!(scenario.is_ok(), "{scenario:?}");
    let Ok(driver) = scenario.and_then(Scenario::into_driver) else { return };
    let driver = driver.with_invariants(InvariantRegistry::standard());

    let runtime = Runtime::new(driver.clone(), driver.direct_messages().clone());
    let result = runtime.run().await;
    assert!(result.is_ok(), "{result:?}");

    let renders = driver.renders();
    assert_eq!(renders.len(), 7);
    assert!(renders.iter().all(|view| view.ready));

    let first = &renders[0];
    assert_eq!(first.lists.room_ids(INVITE), vec!["!invite:example.org"]);
    assert_eq!(first.lists.room_ids(DIRECT), vec!["!bob:example.org"]);
    assert_eq!(first.lists.room_ids(ARCHIVED), vec!["!old:example.org"]);
    assert_eq!(placement(first, "!work:example.org"), vec![LOW_PRIORITY, "u.work"]);
    assert_eq!(placement(first, "!kicked:example.org"), vec![RECENT]);

    // Pending favourite shows before the server confirms it.
    assert_eq!(placement(&renders[1], "!lobby:example.org"), vec![FAVOURITE]);
    assert_eq!(placement(&renders[3], "!fav:example.org"), vec![LOW_PRIORITY]);
    assert_eq!(placement(&renders[4], "!fav:example.org"), vec![FAVOURITE]);

    let last = &renders[6];
    assert_eq!(last.generation, 7);
    assert_eq!(last.lists.room_ids(FAVOURITE), vec!["!fav:example.org", "!lobby:example.org"]);
    assert_eq!(
        last.lists.room_ids(RECENT),
        vec!["!invite:example.org", "!bob:example.org", "!kicked:example.org"]
    );
    assert!(last.lists.get(INVITE).is_empty());
    assert!(last.lists.get(DIRECT).is_empty());
    assert!(driver.is_stopped());
}
