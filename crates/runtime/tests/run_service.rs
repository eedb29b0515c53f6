//! End-to-end behaviour of the run service over an in-memory store.

mod common;

use std::sync::Arc;
use std::thread;

use game_core::{
    CheckOutcome, DungeonId, GameError, IntentKind, OracleError, RunStatus, TurnError,
};
use runtime::{GameStore, RunService, RuntimeError, WriteBatch};

use common::*;

#[test]
fn new_character_rolls_stats_and_gets_starting_gold() {
    let service = service();

    let hero = service.create_character("  Ayla ", None).expect("created");

    assert_eq!(hero.name, "Ayla");
    assert_eq!(hero.gold, 100);
    assert_eq!(hero.hp, hero.max_hp);
    for stat in [
        hero.stats.strength,
        hero.stats.dexterity,
        hero.stats.constitution,
        hero.stats.intelligence,
        hero.stats.wisdom,
        hero.stats.charisma,
    ] {
        assert!((3..=18).contains(&stat), "rolled {stat}");
    }
    assert!(matches!(
        service.create_character("   ", None),
        Err(RuntimeError::EmptyName)
    ));
}

#[test]
fn entering_a_dungeon_pays_and_starts_on_floor_one() {
    let service = service();
    let hero = service.create_character("Ayla", Some(fighter())).unwrap();

    let error = service.enter_dungeon(hero.id, VAULT).unwrap_err();
    assert!(matches!(
        error,
        RuntimeError::InsufficientGold {
            needed: 500,
            available: 100,
            ..
        }
    ));
    assert_eq!(error.severity(), game_core::ErrorSeverity::Validation);

    let run = service.enter_dungeon(hero.id, CRYPT).expect("crypt is affordable");
    assert_eq!((run.floor, run.room, run.status), (1, 1, RunStatus::Active));
    assert_eq!(stored_character(&service, hero.id).gold, 80);
    let floor = service.store().floor(run.id).unwrap().expect("floor 1 generated");
    assert_eq!(floor.floor, 1);

    assert!(matches!(
        service.enter_dungeon(hero.id, CRYPT),
        Err(RuntimeError::RunAlreadyOpen { run: open, .. }) if open == run.id
    ));
}

#[test]
fn unknown_ids_are_rejected() {
    let service = service();
    let hero = service.create_character("Ayla", Some(fighter())).unwrap();

    assert!(matches!(
        service.enter_dungeon(hero.id, DungeonId(99)),
        Err(RuntimeError::Oracle(OracleError::DungeonNotFound(DungeonId(99))))
    ));
    assert!(matches!(
        service.enter_dungeon(game_core::CharacterId(42), CRYPT),
        Err(RuntimeError::NoCharacter(_))
    ));
    assert!(matches!(
        service.process_action(hero.id, "look around"),
        Err(RuntimeError::NoActiveRun(_))
    ));
}

#[test]
fn a_busy_run_rejects_the_second_action() {
    let service = service();
    let (hero, run) = enter_crypt(&service, "Ayla");
    assert!(service.store().try_begin_turn(run.id, "look around", 1).unwrap());

    let error = service.process_action(hero, "attack").unwrap_err();

    assert!(matches!(
        error,
        RuntimeError::RunNotActive {
            status: RunStatus::Processing,
            ..
        }
    ));
    assert!(error.severity().is_recoverable());
    // the first request still owns the lock
    let stored = stored_run(&service, run.id);
    assert_eq!(stored.status, RunStatus::Processing);
    assert_eq!(stored.pending_action.as_deref(), Some("look around"));
}

#[test]
fn locked_room_is_rejected_and_the_run_stays_active() {
    let service = service();
    let (hero, run) = enter_crypt(&service, "Ayla");
    plant_floor(&service, run.id, locked_door());

    let error = service.process_action(hero, "go to room 2").unwrap_err();

    assert!(matches!(error, RuntimeError::Turn(TurnError::RoomLocked(2))));
    let stored = stored_run(&service, run.id);
    assert_eq!(stored.status, RunStatus::Active);
    assert_eq!(stored.stats.turns, 0);
    assert_eq!(service.store().floor(run.id).unwrap(), Some(locked_door()));
}

#[test]
fn failed_commit_rolls_the_turn_back() {
    let service = service_over(FlakyStore::default());
    let (hero, run) = enter_crypt(&service, "Ayla");
    plant_floor(&service, run.id, corridor());
    let before = stored_character(&service, hero);

    service.store().fail_commits(true);
    let error = service.process_action(hero, "go to room 2").unwrap_err();

    assert!(matches!(error, RuntimeError::Repository(_)));
    assert!(error.severity().is_internal());
    let stored = stored_run(&service, run.id);
    assert_eq!((stored.status, stored.room, stored.stats.turns), (RunStatus::Active, 1, 0));
    assert_eq!(stored.pending_action, None);
    assert_eq!(stored_character(&service, hero), before);
    assert_eq!(service.store().floor(run.id).unwrap(), Some(corridor()));

    service.store().fail_commits(false);
    let summary = service.process_action(hero, "go to room 2").expect("retry succeeds");
    assert_eq!(summary.movement.map(|m| m.to), Some(2));
    assert_eq!(stored_run(&service, run.id).room, 2);
}

#[test]
fn exit_room_leads_to_a_fresh_floor() {
    let service = service();
    let (hero, run) = enter_crypt(&service, "Ayla");
    plant_floor(&service, run.id, stairwell());
    service.process_action(hero, "look around").expect("search");
    assert_eq!(service.context(hero).unwrap().len(), 1);

    let summary = service.process_action(hero, "go to room 2").expect("descend");

    let movement = summary.movement.expect("moved");
    assert_eq!(movement.new_floor, Some(2));
    assert_eq!(movement.to, 1);
    let stored = stored_run(&service, run.id);
    assert_eq!((stored.floor, stored.room), (2, 1));
    assert_eq!(stored.stats.floors_descended, 1);
    assert_eq!(stored.stats.turns, 2);
    let floor = service.store().floor(run.id).unwrap().expect("floor stored");
    assert_eq!(floor.floor, 2);
    assert!(!floor.final_floor);

    // the window restarted with the new floor
    let context = service.context(hero).unwrap();
    assert_eq!(context.len(), 1);
    assert_eq!(context[0].floor, 2);
    assert_eq!(context[0].intent, IntentKind::Move);
}

#[test]
fn slaying_the_boss_completes_the_run() {
    let service = service();
    let (hero, run) = enter_crypt(&service, "Ayla");
    plant_floor(&service, run.id, throne_room(service.content()));
    let mut deep = stored_run(&service, run.id);
    deep.floor = 3;
    service.store().commit(WriteBatch::new().run(deep)).unwrap();

    let entered = service.process_action(hero, "go to room 2").expect("enter");
    // the boss waits a round when the player walks in
    assert!(entered.enemy_turns.is_empty());

    let mut last = None;
    for _ in 0..10 {
        let summary = service.process_action(hero, "attack").expect("attack resolves");
        let done = summary.status != RunStatus::Active;
        last = Some(summary);
        if done {
            break;
        }
    }
    let last = last.expect("at least one attack");
    assert!(last.completed, "final summary: {}", last.compact());
    assert_eq!(last.status, RunStatus::Completed);
    assert!(last.attacks.iter().any(|a| a.check.outcome != CheckOutcome::Failure));

    let hero_after = stored_character(&service, hero);
    assert_eq!(hero_after.hp, hero_after.max_hp);
    assert_eq!(hero_after.completions_of(CRYPT), 1);
    // 80 after the entry fee, plus the tier-1 bonus and the boss purse
    assert!(hero_after.gold >= 80 + 50);
    assert_eq!(stored_run(&service, run.id).status, RunStatus::Completed);
    assert!(service.store().open_run(hero).unwrap().is_none());
    assert!(matches!(
        service.process_action(hero, "look around"),
        Err(RuntimeError::NoActiveRun(_))
    ));
}

#[test]
fn abandoning_closes_the_run_for_good() {
    let service = service();
    let (hero, run) = enter_crypt(&service, "Ayla");

    let abandoned = service.abandon_run(hero).expect("abandon");
    assert_eq!(abandoned.status, RunStatus::Abandoned);
    assert_eq!(stored_run(&service, run.id).status, RunStatus::Abandoned);
    assert!(matches!(service.abandon_run(hero), Err(RuntimeError::NoActiveRun(_))));

    // terminal runs are immutable
    let mut revived = stored_run(&service, run.id);
    revived.status = RunStatus::Active;
    assert!(service.store().commit(WriteBatch::new().run(revived)).is_err());

    let second = service.enter_dungeon(hero, CRYPT).expect("a new run may start");
    assert_ne!(second.id, run.id);
    assert_eq!(stored_character(&service, hero).gold, 60);
}

#[test]
fn abandoning_keeps_turns_committed_in_the_meantime() {
    let service = service_over(FlakyStore::default());
    let (hero, run) = enter_crypt(&service, "Ayla");
    plant_floor(&service, run.id, corridor());
    let seen_before_the_move = stored_run(&service, run.id);

    service.process_action(hero, "go to room 2").expect("move");
    service.store().lag_open_run(Some(seen_before_the_move));
    let abandoned = service.abandon_run(hero).expect("abandon");

    assert_eq!(abandoned.status, RunStatus::Abandoned);
    let stored = stored_run(&service, run.id);
    assert_eq!(stored.status, RunStatus::Abandoned);
    assert_eq!(stored.room, 2);
    assert_eq!(stored.stats.turns, 1);
    assert_eq!(stored.context.len(), 1);
}

#[test]
fn stale_locks_are_recovered_after_the_lease() {
    let service = service();
    let (hero, run) = enter_crypt(&service, "Ayla");
    assert!(service.store().try_begin_turn(run.id, "look around", 1_000).unwrap());

    assert!(service.recover_stale_runs(20_000).unwrap().is_empty());
    assert_eq!(service.recover_stale_runs(31_000).unwrap(), vec![run.id]);

    assert_eq!(stored_run(&service, run.id).status, RunStatus::Active);
    service.process_action(hero, "look around").expect("unlocked");
}

#[test]
fn distinct_runs_resolve_in_parallel() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RunService<runtime::InMemoryStore>>();

    let service = Arc::new(service());
    let heroes: Vec<_> = ["Ayla", "Brin", "Cato", "Dara"]
        .into_iter()
        .map(|name| {
            let (hero, run) = enter_crypt(&service, name);
            plant_floor(&service, run.id, corridor());
            (hero, run.id)
        })
        .collect();

    thread::scope(|scope| {
        for &(hero, _) in &heroes {
            let service = Arc::clone(&service);
            scope.spawn(move || {
                service.process_action(hero, "look around").expect("search");
                service.process_action(hero, "go to room 2").expect("move");
            });
        }
    });

    for (_, run) in heroes {
        let stored = stored_run(&service, run);
        assert_eq!(stored.status, RunStatus::Active);
        assert_eq!(stored.room, 2);
        assert_eq!(stored.stats.turns, 2);
    }
}
