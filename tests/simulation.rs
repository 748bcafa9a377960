//! Tests for the simulation engine's traversal rules.
mod common;
use common::*;
use stepflow::prelude::*;

fn entry(step_id: &str, sub_step_index: usize, outcome: Outcome) -> HistoryEntry {
    HistoryEntry {
        step_id: StepId::from(step_id),
        sub_step_index,
        outcome,
    }
}

fn at(step_id: &str, sub_step_index: usize) -> Cursor {
    Cursor {
        step_id: StepId::from(step_id),
        sub_step_index,
    }
}

#[test]
fn test_initial_state() {
    let simulation = SimulationSession::new(vec![step("S1", vec![next("X")]), step("S2", vec![])]);
    assert_eq!(simulation.cursor(), Some(&at("S1", 0)));
    assert!(simulation.history().is_empty());
    assert!(!simulation.is_complete());
    assert_eq!(simulation.current_sub_step().unwrap().id.as_str(), "X");
}

#[test]
fn test_empty_snapshot_starts_complete() {
    let mut simulation = SimulationSession::new(vec![]);
    assert!(simulation.is_complete());
    assert!(simulation.cursor().is_none());
    assert_eq!(
        simulation.submit_outcome(Outcome::Success),
        Err(SimulationError::AlreadyComplete)
    );
}

#[test]
fn test_scenario_a_first_step_without_sub_steps_is_terminal() {
    let s1 = link_success(step("S1", vec![]), "S2");
    let mut simulation = SimulationSession::new(vec![s1, step("S2", vec![next("X")])]);

    assert!(simulation.is_complete());
    assert_eq!(simulation.cursor(), Some(&at("S1", 0)));
    assert_eq!(
        simulation.submit_outcome(Outcome::Success),
        Err(SimulationError::AlreadyComplete)
    );
    assert!(simulation.history().is_empty());
}

#[test]
fn test_scenario_b_single_sub_step_without_link_completes() {
    let mut simulation = SimulationSession::new(vec![step("S1", vec![next("X")])]);

    let transition = simulation.submit_outcome(Outcome::Success).unwrap();
    assert_eq!(transition, Transition::Completed);
    assert_eq!(simulation.history(), &[entry("S1", 0, Outcome::Success)]);
    assert!(simulation.is_complete());
    assert!(simulation.cursor().is_none());
}

#[test]
fn test_scenario_c_next_advances_within_step() {
    let mut simulation = SimulationSession::new(vec![step("S1", vec![next("X"), next("Y")])]);

    let transition = simulation.submit_outcome(Outcome::Success).unwrap();
    assert_eq!(transition, Transition::Advanced(at("S1", 1)));
    assert_eq!(simulation.cursor(), Some(&at("S1", 1)));
    assert_eq!(simulation.current_sub_step().unwrap().id.as_str(), "Y");
    assert!(!simulation.is_complete());
    assert_eq!(simulation.history().len(), 1);
}

#[test]
fn test_scenario_d_goto_skips_remaining_sub_steps() {
    let s1 = link_success(step("S1", vec![goto_on_success("X", "S3"), next("Y")]), "S2");
    let mut simulation = SimulationSession::new(vec![
        s1,
        step("S2", vec![next("P")]),
        step("S3", vec![next("Q")]),
    ]);

    let transition = simulation.submit_outcome(Outcome::Success).unwrap();
    assert_eq!(transition, Transition::Jumped(at("S3", 0)));
    assert_eq!(simulation.cursor(), Some(&at("S3", 0)));
    assert_eq!(simulation.history(), &[entry("S1", 0, Outcome::Success)]);
}

#[test]
fn test_goto_only_applies_to_its_outcome() {
    let s1 = link_failure(step("S1", vec![goto_on_success("X", "S3"), next("Y")]), "S2");
    let mut simulation = SimulationSession::new(vec![
        s1,
        step("S2", vec![next("P")]),
        step("S3", vec![next("Q")]),
    ]);

    assert_eq!(
        simulation.submit_outcome(Outcome::Failure).unwrap(),
        Transition::Advanced(at("S1", 1))
    );
    assert_eq!(
        simulation.submit_outcome(Outcome::Failure).unwrap(),
        Transition::Linked(at("S2", 0))
    );
}

#[test]
fn test_scenario_e_cycles_are_followed() {
    let s1 = link_success(step("S1", vec![next("X")]), "S2");
    let s2 = link_success(step("S2", vec![next("Y")]), "S1");
    let mut simulation = SimulationSession::new(vec![s1, s2]);

    for round in 0..50 {
        let expected = if round % 2 == 0 { "S2" } else { "S1" };
        let transition = simulation.submit_outcome(Outcome::Success).unwrap();
        assert_eq!(transition, Transition::Linked(at(expected, 0)));
        assert!(!simulation.is_complete());
    }
    assert_eq!(simulation.history().len(), 50);
}

#[test]
fn test_goto_without_target_behaves_like_next() {
    let mut x = next("X");
    x.success_action = SubStepAction::Goto;
    let mut simulation = SimulationSession::new(vec![step("S1", vec![x, next("Y")])]);

    assert_eq!(
        simulation.submit_outcome(Outcome::Success).unwrap(),
        Transition::Advanced(at("S1", 1))
    );
}

#[test]
fn test_last_sub_step_never_re_executes() {
    let s1 = link_success(step("S1", vec![next("X"), next("Y")]), "S2");
    let mut simulation = SimulationSession::new(vec![s1, step("S2", vec![next("Z")])]);

    simulation.submit_outcome(Outcome::Success).unwrap();
    let transition = simulation.submit_outcome(Outcome::Success).unwrap();
    assert_eq!(transition, Transition::Linked(at("S2", 0)));
    assert_eq!(
        simulation.history(),
        &[
            entry("S1", 0, Outcome::Success),
            entry("S1", 1, Outcome::Success)
        ]
    );
}

#[test]
fn test_entering_step_without_sub_steps_records_terminal_entry() {
    let s1 = link_failure(step("S1", vec![next("X")]), "Lost");
    let mut simulation = SimulationSession::new(vec![s1, step("Lost", vec![])]);

    let transition = simulation.submit_outcome(Outcome::Failure).unwrap();
    assert_eq!(transition, Transition::Terminal(StepId::from("Lost")));
    assert!(transition.is_final());
    assert!(simulation.is_complete());
    assert_eq!(simulation.cursor(), Some(&at("Lost", 0)));
    assert_eq!(
        simulation.history(),
        &[entry("S1", 0, Outcome::Failure), entry("Lost", 0, Outcome::Failure)]
    );
    assert_eq!(simulation.decision_count(), 1);
}

#[test]
fn test_dangling_link_completes() {
    let s1 = link_success(step("S1", vec![next("X")]), "deleted");
    let mut simulation = SimulationSession::new(vec![s1]);

    assert_eq!(
        simulation.submit_outcome(Outcome::Success).unwrap(),
        Transition::Completed
    );
    assert!(simulation.is_complete());
    assert_eq!(simulation.history().len(), 1);
}

#[test]
fn test_double_submit_after_complete_is_rejected() {
    let mut simulation = SimulationSession::new(vec![step("S1", vec![next("X")])]);
    simulation.submit_outcome(Outcome::Success).unwrap();
    let history = simulation.history().to_vec();

    assert_eq!(
        simulation.submit_outcome(Outcome::Success),
        Err(SimulationError::AlreadyComplete)
    );
    assert_eq!(
        simulation.submit_outcome(Outcome::Failure),
        Err(SimulationError::AlreadyComplete)
    );
    assert_eq!(simulation.history(), history.as_slice());
}

#[test]
fn test_reset_restores_initial_state() {
    let s1 = link_success(step("S1", vec![next("X")]), "S2");
    let mut simulation = SimulationSession::new(vec![s1, step("S2", vec![])]);
    simulation.submit_outcome(Outcome::Success).unwrap();
    assert!(simulation.is_complete());

    simulation.reset();
    assert!(!simulation.is_complete());
    assert!(simulation.history().is_empty());
    assert_eq!(simulation.cursor(), Some(&at("S1", 0)));
}

#[test]
fn test_replay_stops_at_completion() {
    let s1 = link_success(step("S1", vec![next("X"), next("Y")]), "S2");
    let mut simulation = SimulationSession::new(vec![s1, step("S2", vec![next("Z")])]);

    let accepted = simulation
        .replay([Outcome::Success; 10])
        .expect("replay should succeed");
    assert_eq!(accepted, 3);
    assert!(simulation.is_complete());
}

#[test]
fn test_decision_limit_bounds_cycles() {
    let s1 = link_success(step("S1", vec![next("X")]), "S1");
    let mut simulation = SimulationSession::builder(vec![s1])
        .with_decision_limit(5)
        .build()
        .unwrap();

    assert_eq!(
        simulation.replay([Outcome::Success; 10]),
        Err(SimulationError::DecisionLimitReached(5))
    );
    assert_eq!(simulation.decision_count(), 5);
    assert!(!simulation.is_complete());
    assert_eq!(simulation.decision_limit(), Some(5));
}

#[test]
fn test_reset_clears_decision_count() {
    let s1 = link_success(step("S1", vec![next("X")]), "S1");
    let mut simulation = SimulationSession::builder(vec![s1])
        .with_decision_limit(3)
        .build()
        .unwrap();

    assert_eq!(simulation.replay([Outcome::Success; 3]), Ok(3));
    assert_eq!(simulation.decision_count(), 3);
    simulation.reset();
    assert_eq!(simulation.decision_count(), 0);
    assert_eq!(simulation.replay([Outcome::Success; 3]), Ok(3));
    assert!(simulation.undo());
    assert_eq!(simulation.decision_count(), 2);
}

#[test]
fn test_start_at_other_step() {
    let steps = vec![step("S1", vec![next("X")]), step("S2", vec![next("Y")])];
    let simulation = SimulationSession::builder(steps.clone())
        .start_at("S2")
        .build()
        .unwrap();
    assert_eq!(simulation.cursor(), Some(&at("S2", 0)));

    let err = SimulationSession::builder(steps)
        .start_at("S9")
        .build()
        .unwrap_err();
    assert_eq!(err, SimulationError::UnknownStartStep(StepId::from("S9")));
}

#[test]
fn test_undo_matches_shorter_replay() {
    let fixture = create_troubleshooting_flow();
    let outcomes = [Outcome::Success, Outcome::Failure, Outcome::Success];

    let mut undone = fixture.flow.start_simulation();
    undone.replay(outcomes).unwrap();
    assert!(undone.undo());

    let mut expected = fixture.flow.start_simulation();
    expected.replay(outcomes[..2].iter().copied()).unwrap();

    assert_eq!(undone.history(), expected.history());
    assert_eq!(undone.cursor(), expected.cursor());
    assert_eq!(undone.is_complete(), expected.is_complete());
}

#[test]
fn test_undo_reopens_terminal_arrival() {
    let fixture = create_troubleshooting_flow();
    let mut simulation = fixture.flow.start_simulation();

    simulation.replay([Outcome::Success, Outcome::Success]).unwrap();
    assert!(simulation.is_complete());
    assert_eq!(simulation.history().len(), 3);

    assert!(simulation.undo());
    assert!(!simulation.is_complete());
    assert_eq!(simulation.history().len(), 1);
    assert_eq!(simulation.cursor(), Some(&Cursor {
        step_id: fixture.power.clone(),
        sub_step_index: 1,
    }));

    assert!(simulation.undo());
    assert!(simulation.history().is_empty());
    assert!(!simulation.undo());
}

#[test]
fn test_simulation_ignores_later_edits() {
    let mut fixture = create_troubleshooting_flow();
    let mut simulation = fixture.flow.start_simulation();

    fixture.flow.delete_step(fixture.cable.as_str());
    fixture.flow.rename_step(fixture.power.as_str(), "Changed");

    assert_eq!(simulation.current_step().unwrap().title, "Check power");
    simulation.submit_outcome(Outcome::Success).unwrap();
    let transition = simulation.submit_outcome(Outcome::Failure).unwrap();
    assert_eq!(
        transition,
        Transition::Jumped(Cursor::at_start_of(fixture.cable.clone()))
    );
}

#[test]
fn test_troubleshooting_happy_path() {
    let fixture = create_troubleshooting_flow();
    let mut simulation = fixture.flow.start_simulation();

    simulation.submit_outcome(Outcome::Success).unwrap();
    let transition = simulation.submit_outcome(Outcome::Success).unwrap();
    assert_eq!(transition, Transition::Terminal(fixture.resolved.clone()));
    assert_eq!(simulation.current_step().unwrap().title, "Resolved");
    assert_eq!(simulation.decision_count(), 2);
}

#[test]
fn test_troubleshooting_escalation_path() {
    let fixture = create_troubleshooting_flow();
    let mut simulation = fixture.flow.start_simulation();

    // A failed first check still moves on to the second question.
    assert_eq!(
        simulation.submit_outcome(Outcome::Failure).unwrap(),
        Transition::Advanced(Cursor {
            step_id: fixture.power.clone(),
            sub_step_index: 1,
        })
    );
    assert_eq!(
        simulation.submit_outcome(Outcome::Failure).unwrap(),
        Transition::Jumped(Cursor::at_start_of(fixture.cable.clone()))
    );
    assert_eq!(
        simulation.submit_outcome(Outcome::Failure).unwrap(),
        Transition::Terminal(fixture.escalate.clone())
    );
    assert_eq!(
        simulation.history().last(),
        Some(&HistoryEntry {
            step_id: fixture.escalate.clone(),
            sub_step_index: 0,
            outcome: Outcome::Failure,
        })
    );
}
