//! Integration tests for the full interaction pipeline.
//!
//! These tests drive interactors tick by tick, testing:
//! - Scanner acquisition -> solve -> publication
//! - Input routing to the resolved interaction
//! - Drop-out notification as the view moves away
//! - Tick-gated availability through a shared clock
//! - Interaction arguments reaching effects

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glam::Vec3;

use crate::behaviour::{Conditional, Cooldown, InteractionBehaviour, Limited};
use crate::clock::TickClock;
use crate::config::InteractionConfig;
use crate::context::InteractionArgs;
use crate::entity::{InteractableEntity, InteractableRegistry};
use crate::identity::InteractorRegistry;
use crate::input::{InputEvent, InputStream};
use crate::interactor::{supplier_fn, CandidateSupplier, Interactor};
use crate::solver::SolverConfig;
use crate::supplier::{ProximityScanner, ScannerConfig};

use super::helpers::{behaviour, init_tracing, spawn_simple, HookCounter, PublicationLog};

// =============================================================================
// Scenario
// =============================================================================

/// A corridor with a door at z=2 and a crate at z=4, viewed down +Z.
struct Corridor {
    input: InputStream,
    door: Rc<InteractableEntity>,
    crate_box: Rc<InteractableEntity>,
    interactor: Interactor,
}

fn corridor(config: &InteractionConfig) -> Corridor {
    let input = InputStream::new();
    let mut interactables = InteractableRegistry::new();
    let mut interactors = InteractorRegistry::new();

    let door = spawn_simple(&mut interactables, "Interact", "Open Door");
    let crate_box = InteractableEntity::spawn(
        &mut interactables,
        vec![behaviour("Interact", "Search Crate"), behaviour("Kick", "Kick Crate")],
    );

    let mut scanner = ProximityScanner::new(config.scanner);
    scanner.place(&door, Vec3::new(0.0, 0.0, 2.0), 0.5);
    scanner.place(&crate_box, Vec3::new(0.0, 0.0, 4.0), 0.5);
    scanner.set_view(Vec3::ZERO, Vec3::Z);

    let interactor = Interactor::register(&mut interactors, "player", &input, config.solver, scanner);

    Corridor {
        input,
        door,
        crate_box,
        interactor,
    }
}

// =============================================================================
// Pipeline Tests
// =============================================================================

#[test]
fn scanner_feeds_solver_nearest_first() {
    init_tracing();
    let mut config = InteractionConfig::default();
    config.scanner.range = 10.0;
    let mut scene = corridor(&config);
    let log = PublicationLog::attach(scene.interactor.solver());

    assert!(scene.interactor.tick(0));

    // The crate is the later candidate, so it wins "Interact".
    let active = scene.interactor.solver().active();
    assert_eq!(active.get("Interact").unwrap().prompt(), "Search Crate");
    assert_eq!(active.get("Kick").unwrap().source(), scene.crate_box.id());
    assert_eq!(log.len(), 1);
    assert_eq!(log.last_actions(), vec!["Interact", "Kick"]);
}

#[test]
fn range_limits_candidates() {
    init_tracing();
    let scene_config = InteractionConfig::default();
    let mut scene = corridor(&scene_config);

    scene.interactor.tick(0);

    let active = scene.interactor.solver().active();
    assert_eq!(active.get("Interact").unwrap().source(), scene.door.id());
    assert!(!active.contains("Kick"));
}

#[test]
fn input_performs_resolved_interaction() {
    init_tracing();
    let mut scene = corridor(&InteractionConfig::default());
    let door_hooks = HookCounter::watch(&scene.door);

    scene.interactor.tick(0);
    scene.input.publish(&InputEvent::triggered("Interact"));
    scene.input.publish(&InputEvent::triggered("Jump"));
    scene.input.publish(&InputEvent::untriggered("Interact"));

    assert_eq!(door_hooks.performed.get(), 1);
    assert_eq!(door_hooks.queried.get(), 1);
}

#[test]
fn reset_ends_interaction_and_clears_prompts() {
    init_tracing();
    let mut scene = corridor(&InteractionConfig::default());
    let door_hooks = HookCounter::watch(&scene.door);
    let log = PublicationLog::attach(scene.interactor.solver());

    scene.interactor.tick(0);
    scene.interactor.tick(1);
    assert_eq!(door_hooks.ended.get(), 0);

    scene.interactor.solver_mut().reset();

    assert_eq!(door_hooks.ended.get(), 1);
    assert_eq!(log.len(), 3);
    assert!(log.last_actions().is_empty());

    scene.input.publish(&InputEvent::triggered("Interact"));
    assert_eq!(door_hooks.performed.get(), 0);
}

#[test]
fn moving_view_switches_target() {
    init_tracing();
    let input = InputStream::new();
    let mut interactables = InteractableRegistry::new();
    let mut interactors = InteractorRegistry::new();
    let left = spawn_simple(&mut interactables, "Interact", "Left Lever");
    let right = spawn_simple(&mut interactables, "Interact", "Right Lever");
    let left_hooks = HookCounter::watch(&left);
    let right_hooks = HookCounter::watch(&right);

    let scanner = Rc::new(RefCell::new(ProximityScanner::new(ScannerConfig::default())));
    scanner.borrow_mut().place(&left, Vec3::new(-1.0, 0.0, 0.0), 0.3);
    scanner.borrow_mut().place(&right, Vec3::new(1.0, 0.0, 0.0), 0.3);

    let shared = Rc::clone(&scanner);
    let mut interactor = Interactor::register(
        &mut interactors,
        (),
        &input,
        SolverConfig::default(),
        supplier_fn(move |tick| shared.borrow_mut().scan(tick)),
    );

    scanner.borrow_mut().set_view(Vec3::ZERO, Vec3::NEG_X);
    interactor.tick(0);
    input.publish(&InputEvent::triggered("Interact"));

    scanner.borrow_mut().set_view(Vec3::ZERO, Vec3::X);
    interactor.tick(1);
    input.publish(&InputEvent::triggered("Interact"));

    assert_eq!(left_hooks.performed.get(), 1);
    assert_eq!(left_hooks.ended.get(), 1);
    assert_eq!(right_hooks.performed.get(), 1);
    assert_eq!(right_hooks.ended.get(), 0);
}

#[test]
fn throttled_scans_keep_previous_interactions() {
    init_tracing();
    let mut config = InteractionConfig::default();
    config.scanner.scan_interval = 5;
    let mut scene = corridor(&config);
    let log = PublicationLog::attach(scene.interactor.solver());

    assert!(scene.interactor.tick(0));
    assert!(!scene.interactor.tick(1));
    assert!(!scene.interactor.tick(4));
    assert!(scene.interactor.tick(5));

    assert_eq!(log.len(), 2);
    assert!(scene.interactor.solver().active().contains("Interact"));
}

// =============================================================================
// Availability Tests
// =============================================================================

#[test]
fn cooldown_hides_interaction_until_clock_advances() {
    init_tracing();
    let clock = TickClock::new();
    let input = InputStream::new();
    let mut interactables = InteractableRegistry::new();
    let mut interactors = InteractorRegistry::new();

    let drinks = Rc::new(Cell::new(0));
    let sink = Rc::clone(&drinks);
    let fountain = InteractableEntity::spawn(
        &mut interactables,
        vec![InteractionBehaviour::new("Interact", "Drink")
            .unwrap()
            .with_availability(Cooldown::new(clock.clone(), 2))
            .with_effect_fn(move |_| sink.set(sink.get() + 1))],
    );

    let target = Rc::clone(&fountain);
    let mut interactor = Interactor::register(
        &mut interactors,
        (),
        &input,
        SolverConfig::default(),
        supplier_fn(move |_| Some(vec![Rc::clone(&target)])),
    );

    let mut offered = Vec::new();
    for _ in 0..5 {
        let tick = clock.now();
        interactor.tick(tick);
        offered.push(interactor.solver().active().contains("Interact"));
        input.publish(&InputEvent::triggered("Interact"));
        clock.advance();
    }

    assert_eq!(offered, vec![true, false, true, false, true]);
    assert_eq!(drinks.get(), 3);
}

#[test]
fn limited_interaction_disappears_after_last_use() {
    init_tracing();
    let input = InputStream::new();
    let mut interactables = InteractableRegistry::new();
    let mut interactors = InteractorRegistry::new();
    let apple = InteractableEntity::spawn(
        &mut interactables,
        vec![behaviour("Take", "Take Apple").with_availability(Limited::new(1))],
    );
    let hooks = HookCounter::watch(&apple);

    let target = Rc::clone(&apple);
    let mut interactor = Interactor::register(
        &mut interactors,
        (),
        &input,
        SolverConfig::default(),
        supplier_fn(move |_| Some(vec![Rc::clone(&target)])),
    );

    interactor.tick(0);
    input.publish(&InputEvent::triggered("Take"));
    // The context from tick 0 is still active, but the behaviour refuses.
    input.publish(&InputEvent::triggered("Take"));
    interactor.tick(1);

    assert_eq!(hooks.performed.get(), 1);
    assert!(interactor.solver().active().is_empty());
}

#[test]
fn query_hook_refreshes_availability() {
    init_tracing();
    let input = InputStream::new();
    let mut interactables = InteractableRegistry::new();
    let mut interactors = InteractorRegistry::new();

    let powered = Rc::new(Cell::new(false));
    let flag = Rc::clone(&powered);
    let terminal = InteractableEntity::spawn(
        &mut interactables,
        vec![behaviour("Interact", "Use Terminal")
            .with_availability(Conditional::new(move || flag.get()))],
    );
    let refresh = Rc::clone(&powered);
    let _power = terminal.on_query(move |()| refresh.set(true));

    let target = Rc::clone(&terminal);
    let mut interactor = Interactor::register(
        &mut interactors,
        (),
        &input,
        SolverConfig::default(),
        supplier_fn(move |_| Some(vec![Rc::clone(&target)])),
    );

    interactor.tick(0);

    assert!(interactor.solver().active().contains("Interact"));
}

// =============================================================================
// Argument Tests
// =============================================================================

#[test]
fn configured_args_reach_effect() {
    init_tracing();
    let config = InteractionConfig::from_json_str(r#"{"solver": {"generate_args": true}}"#).unwrap();
    let input = InputStream::new();
    let mut interactables = InteractableRegistry::new();
    let mut interactors = InteractorRegistry::new();

    let seen = Rc::new(Cell::new(None));
    let sink = Rc::clone(&seen);
    let chest = InteractableEntity::spawn(
        &mut interactables,
        vec![behaviour("Interact", "Open Chest").with_effect_fn(move |args| sink.set(args))],
    );

    let target = Rc::clone(&chest);
    let mut interactor = Interactor::register(
        &mut interactors,
        "player",
        &input,
        config.solver,
        supplier_fn(move |_| Some(vec![Rc::clone(&target)])),
    );

    interactor.tick(0);
    input.publish(&InputEvent::triggered("Interact"));

    assert_eq!(
        seen.get(),
        Some(InteractionArgs::new(interactor.id(), chest.id()))
    );
}

#[test]
fn interactors_resolve_independently() {
    init_tracing();
    let input = InputStream::new();
    let mut interactables = InteractableRegistry::new();
    let mut interactors = InteractorRegistry::new();
    let lamp = spawn_simple(&mut interactables, "Toggle", "Toggle Lamp");
    let hooks = HookCounter::watch(&lamp);

    let target = Rc::clone(&lamp);
    let mut near = Interactor::register(
        &mut interactors,
        "near",
        &input,
        SolverConfig::default(),
        supplier_fn(move |_| Some(vec![Rc::clone(&target)])),
    );
    let mut far = Interactor::register(
        &mut interactors,
        "far",
        &input,
        SolverConfig::default(),
        supplier_fn(|_| Some(Vec::new())),
    );

    near.tick(0);
    far.tick(0);
    input.publish(&InputEvent::triggered("Toggle"));

    assert_eq!(hooks.performed.get(), 1);
    assert_eq!(interactors.len(), 2);
    assert_ne!(near.id(), far.id());
}
