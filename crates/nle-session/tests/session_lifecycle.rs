//! Integration test: full session lifecycle over caller-owned buffers.
//!
//! Drives a `Session` with the scripted engine and checks that the engine
//! writes exactly into the bound buffers, that validation failures leave
//! earlier bindings intact, and that the state machine rejects illegal
//! calls without touching the engine.

use nle_buffer::ErrorClass;
use nle_core::{DType, Slot};
use nle_session::{BufferSet, EngineOp, Session, SessionError, SessionState};
use nle_test_utils::{EngineProbe, NotAnArray, ObsBuffers, RawArray, ScriptedEngine};

fn session(episode_len: u32) -> (Session<ScriptedEngine>, EngineProbe) {
    let engine = ScriptedEngine::new(episode_len);
    let probe = engine.probe();
    (Session::new(engine), probe)
}

fn assert_frame(bufs: &ObsBuffers, turn: u32) {
    let glyphs = bufs.glyphs.to_vec();
    assert!(glyphs
        .iter()
        .enumerate()
        .all(|(i, &g)| g == ScriptedEngine::glyph(turn, i)));
    let chars = bufs.chars.to_vec();
    assert!(chars
        .iter()
        .enumerate()
        .all(|(i, &c)| c == ScriptedEngine::char(turn, i)));
    let blstats = bufs.blstats.to_vec();
    assert!(blstats
        .iter()
        .enumerate()
        .all(|(i, &b)| b == ScriptedEngine::blstat(turn, i)));
    assert_eq!(
        bufs.program_state.get(1),
        Some(ScriptedEngine::program_state(turn, 1))
    );
}

fn expect_bind_class(result: Result<(), SessionError>, slot: Slot, class: ErrorClass) {
    match result {
        Err(SessionError::Bind(err)) => {
            assert_eq!(err.slot, slot);
            assert_eq!(err.class(), class, "{err}");
        }
        other => panic!("expected bind error on {slot}, got {other:?}"),
    }
}

// ── End-to-end ──────────────────────────────────────────────────────

#[test]
fn all_six_slots_run_to_game_over() {
    let bufs = ObsBuffers::new();
    let (mut s, probe) = session(4);
    s.bind_buffers(&bufs.buffer_set()).unwrap();
    for slot in Slot::ALL {
        assert!(s.is_bound(slot));
    }

    s.reset().unwrap();
    assert!(!s.done());
    assert_eq!(s.state(), SessionState::Running);
    assert_frame(&bufs, 0);

    let mut turns = 0;
    while !s.done() {
        s.step(0).unwrap();
        turns += 1;
        assert_frame(&bufs, turns);
    }
    assert_eq!(turns, 4);
    assert_eq!(s.state(), SessionState::Done);
    assert_eq!(probe.steps(), 4);
    assert_eq!(probe.record_moves(), 0);

    assert!(matches!(s.step(0), Err(SessionError::IllegalState { .. })));
    s.reset().unwrap();
    assert!(!s.done());
    assert_frame(&bufs, 0);
}

#[test]
fn action_reaches_the_engine() {
    let (mut s, probe) = session(10);
    s.reset().unwrap();
    s.step(107).unwrap();
    assert_eq!(probe.last_action(), 107);
}

#[test]
fn reset_without_buffers_runs_engine() {
    let (mut s, probe) = session(2);
    s.reset().unwrap();
    s.step(0).unwrap();
    assert_eq!((probe.starts(), probe.steps()), (1, 1));
}

// ── Partial binding ─────────────────────────────────────────────────

#[test]
fn absent_slot_is_never_written() {
    for skip in Slot::ALL {
        let bufs = ObsBuffers::new();
        let (mut s, _) = session(3);
        s.bind_buffers(&bufs.buffer_set_without(skip)).unwrap();
        assert!(!s.is_bound(skip));
        s.reset().unwrap();
        s.step(0).unwrap();
        for slot in Slot::ALL {
            assert_eq!(bufs.untouched(slot), slot == skip, "skip {skip}, slot {slot}");
        }
    }
}

#[test]
fn rebinding_mid_episode_redirects_writes() {
    let first = ObsBuffers::new();
    let second = ObsBuffers::new();
    let (mut s, _) = session(10);
    s.bind_buffers(&first.buffer_set()).unwrap();
    s.reset().unwrap();
    s.step(0).unwrap();

    s.bind_buffers(&second.buffer_set()).unwrap();
    let before = first.glyphs.to_vec();
    s.step(0).unwrap();
    assert_eq!(first.glyphs.to_vec(), before);
    assert_eq!(second.glyphs.get(0), Some(ScriptedEngine::glyph(2, 0)));
}

#[test]
fn empty_set_unbinds_everything() {
    let bufs = ObsBuffers::new();
    let (mut s, _) = session(10);
    s.bind_buffers(&bufs.buffer_set()).unwrap();
    s.bind_buffers(&BufferSet::new()).unwrap();
    s.reset().unwrap();
    for slot in Slot::ALL {
        assert!(!s.is_bound(slot));
        assert!(bufs.untouched(slot));
    }
}

// ── Validation failures ─────────────────────────────────────────────

#[test]
fn type_mismatch_keeps_prior_bindings() {
    let bufs = ObsBuffers::new();
    let (mut s, _) = session(10);
    s.bind_buffers(&bufs.buffer_set()).unwrap();

    let wrong = RawArray::new(DType::I32, &[21, 79]);
    let replacement = ObsBuffers::new();
    let set = replacement.buffer_set().with(Slot::Glyphs, &wrong);
    expect_bind_class(s.bind_buffers(&set), Slot::Glyphs, ErrorClass::Type);

    s.reset().unwrap();
    assert!(!bufs.untouched(Slot::Glyphs));
    for slot in Slot::ALL {
        assert!(replacement.untouched(slot));
    }
}

#[test]
fn not_an_array_is_a_type_error() {
    let (mut s, _) = session(10);
    let set = BufferSet::new().with(Slot::Blstats, &NotAnArray);
    expect_bind_class(s.bind_buffers(&set), Slot::Blstats, ErrorClass::Type);
}

#[test]
fn wrong_rank_and_extent_are_shape_errors() {
    let (mut s, _) = session(10);
    let flat = RawArray::new(DType::U8, &[21 * 79]);
    expect_bind_class(
        s.bind_buffers(&BufferSet::new().with(Slot::Chars, &flat)),
        Slot::Chars,
        ErrorClass::Shape,
    );
    let full_width = RawArray::new(DType::U8, &[21, 80]);
    expect_bind_class(
        s.bind_buffers(&BufferSet::new().with(Slot::Colors, &full_width)),
        Slot::Colors,
        ErrorClass::Shape,
    );
}

#[test]
fn reverse_strided_grid_is_a_layout_error() {
    let (mut s, _) = session(10);
    let reversed = RawArray::new(DType::U8, &[21, 79]).with_strides(&[79, -1]);
    expect_bind_class(
        s.bind_buffers(&BufferSet::new().with(Slot::Specials, &reversed)),
        Slot::Specials,
        ErrorClass::Layout,
    );
}

#[test]
fn misaligned_status_line_is_a_layout_error() {
    let (mut s, _) = session(10);
    let slot = Slot::ProgramState;
    let shifted = RawArray::for_slot(slot).with_offset(1);
    expect_bind_class(
        s.bind_buffers(&BufferSet::new().with(slot, &shifted)),
        slot,
        ErrorClass::Layout,
    );
}

// ── State machine ───────────────────────────────────────────────────

#[test]
fn step_after_done_changes_nothing() {
    let bufs = ObsBuffers::new();
    let (mut s, probe) = session(1);
    s.bind_buffers(&bufs.buffer_set()).unwrap();
    s.reset().unwrap();
    s.step(0).unwrap();
    assert!(s.done());

    let snapshot = bufs.glyphs.to_vec();
    let calls = probe.calls();
    match s.step(0) {
        Err(SessionError::IllegalState { operation, state }) => {
            assert_eq!(operation, "step");
            assert_eq!(state, SessionState::Done);
        }
        other => panic!("expected IllegalState, got {other:?}"),
    }
    assert!(s.done());
    assert_eq!(bufs.glyphs.to_vec(), snapshot);
    assert_eq!(probe.calls(), calls);
}

#[test]
fn double_close_matches_single_close() {
    let bufs = ObsBuffers::new();
    let (mut s, probe) = session(5);
    s.bind_buffers(&bufs.buffer_set()).unwrap();
    s.reset().unwrap();
    s.close();
    let after_first = (s.state(), s.done(), probe.ends());
    s.close();
    assert_eq!((s.state(), s.done(), probe.ends()), after_first);
    assert_eq!(probe.ends(), 1);
}

#[test]
fn drop_ends_live_engine() {
    let (mut s, probe) = session(5);
    s.reset().unwrap();
    drop(s);
    assert_eq!(probe.ends(), 1);
}

#[test]
fn engine_step_failure_is_fatal() {
    let engine = ScriptedEngine::new(5).failing_on(EngineOp::Step);
    let probe = engine.probe();
    let mut s = Session::new(engine);
    s.reset().unwrap();
    assert!(matches!(s.step(0), Err(SessionError::Engine(_))));
    assert_eq!(s.state(), SessionState::Failed);
    assert!(matches!(s.reset(), Err(SessionError::IllegalState { .. })));
    s.close();
    assert_eq!(probe.ends(), 1);
}

#[test]
fn engine_start_failure_leaves_nothing_to_end() {
    let engine = ScriptedEngine::new(5).failing_on(EngineOp::Start);
    let probe = engine.probe();
    let mut s = Session::new(engine);
    assert!(matches!(s.reset(), Err(SessionError::Engine(_))));
    s.close();
    assert_eq!(probe.ends(), 0);
}

// ── Holds ───────────────────────────────────────────────────────────

#[test]
fn holds_released_on_rebind_and_close() {
    let bufs = ObsBuffers::new();
    let (mut s, _) = session(5);
    s.bind_buffers(&bufs.buffer_set()).unwrap();
    for slot in Slot::ALL {
        assert_eq!(bufs.holders(slot), 2);
    }

    s.bind_buffers(&bufs.buffer_set_without(Slot::Chars)).unwrap();
    assert_eq!(bufs.holders(Slot::Chars), 1);
    assert_eq!(bufs.holders(Slot::Glyphs), 2);

    s.close();
    for slot in Slot::ALL {
        assert_eq!(bufs.holders(slot), 1);
    }
}

#[test]
fn bound_buffer_outlives_caller_handle() {
    let (mut s, _) = session(5);
    {
        let bufs = ObsBuffers::new();
        s.bind_buffers(&bufs.buffer_set()).unwrap();
    }
    s.reset().unwrap();
    s.step(0).unwrap();
}
