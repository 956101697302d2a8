/// Three-way completion behaviour of declarative levels run through the host:
/// - success: on_complete once, progress recorded
/// - out of bounds: agent returned to start, still running
/// - wrong arrangement at the end tile: agent returned, retry trigger placed
use blockpuzzle::config::Config;
use blockpuzzle::engine::GameHost;
use blockpuzzle::level::{
    catalog_from_definitions, BlockCondition, BlockPlacement, BlockPos, LevelDefinition,
    LevelState, RecoveryKind, SimWorld, TickOutcome, World,
};
use blockpuzzle::store::{MemoryProperties, StoreValue};

const START: BlockPos = BlockPos::new(0, 1, 0);
const END: BlockPos = BlockPos::new(0, 1, 3);
const RETRY: BlockPos = BlockPos::new(1, 1, 0);

fn two_block_level() -> LevelDefinition {
    LevelDefinition {
        name: "bridge".into(),
        title: "Cross the moat".into(),
        hint: None,
        start: START,
        end: END,
        out_of_bounds_block: "water".into(),
        conditions: vec![
            BlockCondition::new(BlockPos::new(0, 0, 1), "planks"),
            BlockCondition::new(BlockPos::new(0, 0, 2), "planks"),
        ],
        retry_trigger: Some(BlockPlacement {
            position: RETRY,
            block: "pressure_plate".into(),
        }),
        setup: vec![],
    }
}

fn running_host() -> GameHost<MemoryProperties, SimWorld> {
    let mut host = GameHost::from_config(
        &Config::default(),
        MemoryProperties::new(),
        SimWorld::new(),
        catalog_from_definitions(vec![two_block_level()]),
    );
    host.boot().unwrap();
    assert_eq!(host.on_tick(), TickOutcome::Started);
    assert_eq!(host.driver().state(), LevelState::Running);
    host
}

#[test]
fn both_conditions_met_completes_once() {
    let mut host = running_host();
    let world = host.world_mut();
    world.set_block(BlockPos::new(0, 0, 1), "planks");
    world.set_block(BlockPos::new(0, 0, 2), "planks");
    world.move_agent(BlockPos::new(0, 1, 1));

    assert_eq!(host.on_tick(), TickOutcome::Completed);
    assert_eq!(host.driver().state(), LevelState::Completed);
    assert_eq!(host.registry().get("level").unwrap(), StoreValue::Number(1.0));
    let completions = host
        .world()
        .titles()
        .iter()
        .filter(|t| t.as_str() == "Level complete!")
        .count();
    assert_eq!(completions, 1);

    // The completed level is replaced, never completed twice.
    assert_eq!(host.on_tick(), TickOutcome::AllComplete);
    assert_eq!(host.on_tick(), TickOutcome::AllComplete);
    assert_eq!(host.registry().get("level").unwrap(), StoreValue::Number(1.0));
}

#[test]
fn out_of_bounds_returns_agent_to_start() {
    let mut host = running_host();
    let world = host.world_mut();
    // Both conditions hold, but the agent stands on water: disqualified.
    world.set_block(BlockPos::new(0, 0, 1), "planks");
    world.set_block(BlockPos::new(0, 0, 2), "planks");
    world.set_block(BlockPos::new(1, 0, 2), "water");
    world.move_agent(BlockPos::new(1, 1, 2));

    assert_eq!(
        host.on_tick(),
        TickOutcome::Recovered(RecoveryKind::OutOfBounds)
    );
    assert_eq!(host.world().agent_position(), START);
    assert_eq!(host.driver().state(), LevelState::Running);
    assert_eq!(host.registry().get("level").unwrap(), StoreValue::Number(0.0));
}

#[test]
fn wrong_arrangement_at_end_tile_fires_retry_trigger() {
    let mut host = running_host();
    let world = host.world_mut();
    world.set_block(BlockPos::new(0, 0, 1), "planks");
    world.set_block(BlockPos::new(0, 0, 2), "dirt");
    world.move_agent(END);

    assert_eq!(
        host.on_tick(),
        TickOutcome::Recovered(RecoveryKind::IncorrectArrangement)
    );
    assert_eq!(host.world().agent_position(), START);
    assert_eq!(host.world().block_at(RETRY), "pressure_plate");
    assert_eq!(host.driver().state(), LevelState::Running);
    assert!(host
        .world()
        .titles()
        .iter()
        .any(|t| t.as_str() == "Incorrect, try again"));
}

#[test]
fn partial_progress_away_from_end_keeps_running() {
    let mut host = running_host();
    host.world_mut()
        .set_block(BlockPos::new(0, 0, 1), "planks");
    host.world_mut().move_agent(BlockPos::new(0, 1, 1));
    assert_eq!(host.on_tick(), TickOutcome::Running);
    assert_eq!(host.world().hud(), Some("1/2 blocks in place"));
    assert_eq!(host.world().teleport_count(), 1);
}

#[test]
fn progress_survives_into_next_boot() {
    let adapter = MemoryProperties::new();
    let defs = vec![two_block_level(), two_block_level()];
    let mut host = GameHost::from_config(
        &Config::default(),
        adapter,
        SimWorld::new(),
        catalog_from_definitions(defs),
    );
    host.boot().unwrap();
    host.on_chat("!set level 1");
    host.boot().unwrap();
    assert_eq!(host.driver().active_index(), Some(1));
}

fn solve(host: &mut GameHost<MemoryProperties, SimWorld>) {
    let world = host.world_mut();
    world.set_block(BlockPos::new(0, 0, 1), "planks");
    world.set_block(BlockPos::new(0, 0, 2), "planks");
    world.move_agent(BlockPos::new(0, 1, 1));
}

fn three_level_host() -> GameHost<MemoryProperties, SimWorld> {
    let mut host = GameHost::from_config(
        &Config::default(),
        MemoryProperties::new(),
        SimWorld::new(),
        catalog_from_definitions(vec![two_block_level(), two_block_level(), two_block_level()]),
    );
    host.boot().unwrap();
    assert_eq!(host.on_tick(), TickOutcome::Started);
    host
}

#[test]
fn operator_set_during_play_moves_next_level() {
    let mut host = three_level_host();
    host.on_chat("!set level 1");
    solve(&mut host);
    assert_eq!(host.on_tick(), TickOutcome::Completed);
    assert_eq!(host.registry().get("level").unwrap(), StoreValue::Number(2.0));

    assert_eq!(host.on_tick(), TickOutcome::Advanced);
    assert_eq!(host.driver().active_index(), Some(2));

    // A restart on the same progress lands on the same level.
    host.boot().unwrap();
    assert_eq!(host.driver().active_index(), Some(2));
}

#[test]
fn progress_after_wipe_is_recorded() {
    let mut host = three_level_host();
    solve(&mut host);
    assert_eq!(host.on_tick(), TickOutcome::Completed);
    assert_eq!(host.on_tick(), TickOutcome::Advanced);
    assert_eq!(host.driver().active_index(), Some(1));

    host.on_chat("!deleteStores");
    host.on_chat("!deleteStoresConfirm");
    assert_eq!(host.on_chat("!get level"), vec!["level: 0"]);
    assert_eq!(host.driver().active_index(), Some(0));
    assert_eq!(host.driver().state(), LevelState::Pending);

    assert_eq!(host.on_tick(), TickOutcome::Started);
    solve(&mut host);
    assert_eq!(host.on_tick(), TickOutcome::Completed);
    assert_eq!(host.registry().get("level").unwrap(), StoreValue::Number(1.0));
    assert_eq!(host.on_tick(), TickOutcome::Advanced);
    assert_eq!(host.driver().active_index(), Some(1));
}
