//! Guided procedure runs over the engine ECU fixture
//!
//! Run with: cargo test -p gds-tests --test procedure_test

use gds_core::MockTransport;
use gds_procedure::{
    AbortReason, ProcedureRun, RunOptions, RunState, ScriptedSelector, StepVisit,
};
use gds_tests::{engine_catalog, scripted_transport};
use pretty_assertions::assert_eq;
use rstest::rstest;

/// (step, chosen keystring, matched rule, jump) per visit
fn path(trace: &[StepVisit]) -> Vec<(u32, Option<usize>, Option<usize>, Option<u32>)> {
    trace
        .iter()
        .map(|v| (v.step_no, v.chosen_keystring, v.matched_rule, v.jump_target))
        .collect()
}

#[test]
fn test_relay_check_passes() {
    let catalog = engine_catalog();
    let procedure = catalog.procedure(10).unwrap();
    let transport = scripted_transport();

    let mut run = ProcedureRun::new(
        procedure,
        &catalog.communication,
        &transport,
        RunOptions::default(),
    );
    let state = run.run_to_end(&mut ScriptedSelector::new([0, 0])).unwrap();

    assert_eq!(state, RunState::Completed);
    assert_eq!(
        path(run.trace()),
        vec![
            (1, Some(0), None, None),
            (2, None, Some(0), Some(3)),
            (3, Some(0), None, Some(0)),
        ]
    );
    assert_eq!(transport.sent_requests(), vec![vec![0x31, 0x01, 0x0A]]);
    assert_eq!(
        run.trace()[1].message.as_deref(),
        Some("Do not start the engine.\\nThe relay will be switched for 5 seconds.")
    );
}

#[rstest]
#[case::relay_faulty(Some(vec![0x71, 0x01, 0x01]), vec![1, 2, 4])]
#[case::no_answer(None, vec![1, 2, 3])]
fn test_relay_check_branches(#[case] reply: Option<Vec<u8>>, #[case] visited: Vec<u32>) {
    let catalog = engine_catalog();
    let procedure = catalog.procedure(10).unwrap();
    let transport = MockTransport::new();
    match reply {
        Some(reply) => transport.add_response(vec![0x31, 0x01, 0x0A], reply),
        None => transport.add_timeout(vec![0x31, 0x01, 0x0A]),
    }

    let mut run = ProcedureRun::new(
        procedure,
        &catalog.communication,
        &transport,
        RunOptions::default(),
    );
    let state = run.run_to_end(&mut ScriptedSelector::new([0, 0])).unwrap();

    assert_eq!(state, RunState::Completed);
    let steps: Vec<_> = run.trace().iter().map(|v| v.step_no).collect();
    assert_eq!(steps, visited);
}

#[test]
fn test_start_communication_before_run() {
    let catalog = engine_catalog();
    let procedure = catalog.procedure(10).unwrap();
    let transport = scripted_transport();

    let mut run = ProcedureRun::new(
        procedure,
        &catalog.communication,
        &transport,
        RunOptions::default(),
    );
    assert_eq!(run.start_communication(), 1);
    run.run_to_end(&mut ScriptedSelector::new([0, 0])).unwrap();
    assert_eq!(
        transport.sent_requests(),
        vec![vec![0x10, 0x81], vec![0x31, 0x01, 0x0A]]
    );
}

#[test]
fn test_operator_cancels_at_first_step() {
    let catalog = engine_catalog();
    let procedure = catalog.procedure(10).unwrap();
    let transport = scripted_transport();

    let mut run = ProcedureRun::new(
        procedure,
        &catalog.communication,
        &transport,
        RunOptions::default(),
    );

    // Keystring "Cancel" jumps to 0
    let state = run.run_to_end(&mut ScriptedSelector::new([1])).unwrap();
    assert_eq!(state, RunState::Completed);
    assert!(transport.sent_requests().is_empty());

    // Running out of choices aborts
    let mut run = ProcedureRun::new(
        procedure,
        &catalog.communication,
        &transport,
        RunOptions::default(),
    );
    let state = run.run_to_end(&mut ScriptedSelector::default()).unwrap();
    assert_eq!(
        state,
        RunState::Aborted(AbortReason::SelectionCancelled { step_no: 1 })
    );
}

#[test]
fn test_invalid_jump_aborts_after_timeout() {
    let catalog = engine_catalog();
    let procedure = catalog.procedure(11).unwrap();
    let transport = scripted_transport();

    let mut run = ProcedureRun::new(
        procedure,
        &catalog.communication,
        &transport,
        RunOptions::default(),
    );
    let state = run.run_to_end(&mut ScriptedSelector::default()).unwrap();

    assert_eq!(
        state,
        RunState::Aborted(AbortReason::InvalidJumpTarget { from: 1, target: 9 })
    );
    // The first rule timed out, the second produced the jump
    assert_eq!(path(run.trace()), vec![(1, None, Some(1), Some(9))]);
    assert_eq!(
        transport.sent_requests(),
        vec![vec![0x31, 0x01, 0x0C], vec![0x31, 0x01, 0x0B]]
    );

    let outcome = run.into_outcome();
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["procedure"], "Injector circuit check");
    assert_eq!(json["state"]["aborted"]["reason"], "invalid_jump_target");
}

#[test]
fn test_runs_share_one_catalog() {
    let catalog = engine_catalog();
    let procedure = catalog.procedure(10).unwrap();

    let states: Vec<RunState> = std::thread::scope(|scope| {
        let handles: Vec<_> = [0usize, 1]
            .into_iter()
            .map(|first_choice| {
                let catalog = &catalog;
                scope.spawn(move || {
                    let transport = scripted_transport();
                    let mut run = ProcedureRun::new(
                        procedure,
                        &catalog.communication,
                        &transport,
                        RunOptions::default(),
                    );
                    run.run_to_end(&mut ScriptedSelector::new([first_choice, 0]))
                        .unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(states, vec![RunState::Completed, RunState::Completed]);
}
