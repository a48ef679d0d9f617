//! Integration test: driving a scripted session through the C entry
//! points with raw `NleBuffer` descriptors over Rust-owned memory.

use std::ffi::c_void;
use std::ptr;

use nle_core::{DType, Long, Slot};
use nle_ffi::session::{
    nle_session_bind_buffers, nle_session_destroy, nle_session_done, nle_session_reset,
    nle_session_state, nle_session_step,
};
use nle_ffi::{register, NleBuffer, NleBufferSet, NleStatus};
use nle_session::{Session, SessionState};
use nle_test_utils::ScriptedEngine;

const GRID: [i64; 2] = [21, 79];
const GRID_LEN: usize = 21 * 79;

struct Memory {
    glyphs: Vec<i16>,
    chars: Vec<u8>,
    colors: Vec<u8>,
    specials: Vec<u8>,
    blstats: Vec<Long>,
    program_state: Vec<i32>,
}

impl Memory {
    fn new() -> Self {
        Self {
            glyphs: vec![-1; GRID_LEN],
            chars: vec![0; GRID_LEN],
            colors: vec![0; GRID_LEN],
            specials: vec![0; GRID_LEN],
            blstats: vec![-1; 23],
            program_state: vec![-1; 5],
        }
    }
}

fn grid<T>(data: &mut [T], dtype: DType) -> NleBuffer {
    NleBuffer {
        data: data.as_mut_ptr().cast::<c_void>(),
        dtype: dtype.code(),
        ndim: 2,
        shape: GRID.as_ptr(),
        strides: ptr::null(),
    }
}

fn vector<T>(data: &mut [T], dtype: DType, len: &'static [i64; 1]) -> NleBuffer {
    NleBuffer {
        data: data.as_mut_ptr().cast::<c_void>(),
        dtype: dtype.code(),
        ndim: 1,
        shape: len.as_ptr(),
        strides: ptr::null(),
    }
}

fn scripted(episode_len: u32) -> u64 {
    register(Box::new(Session::new(ScriptedEngine::new(episode_len)))).unwrap()
}

#[test]
fn six_slots_written_through_c_descriptors() {
    let mut mem = Memory::new();
    let glyphs = grid(&mut mem.glyphs, DType::I16);
    let chars = grid(&mut mem.chars, DType::U8);
    let colors = grid(&mut mem.colors, DType::U8);
    let specials = grid(&mut mem.specials, DType::U8);
    let blstats = vector(&mut mem.blstats, Slot::Blstats.dtype(), &[23]);
    let program_state = vector(&mut mem.program_state, DType::I32, &[5]);
    let set = NleBufferSet {
        glyphs: &glyphs,
        chars: &chars,
        colors: &colors,
        specials: &specials,
        blstats: &blstats,
        program_state: &program_state,
    };

    let h = scripted(3);
    assert_eq!(nle_session_bind_buffers(h, &set), NleStatus::Ok as i32);
    assert_eq!(nle_session_reset(h), 0);

    let mut done = 1u8;
    let mut steps = 0;
    loop {
        assert_eq!(nle_session_done(h, &mut done), 0);
        if done == 1 {
            break;
        }
        assert_eq!(nle_session_step(h, 0), 0);
        steps += 1;
    }
    assert_eq!(steps, 3);
    let mut state = 0;
    assert_eq!(nle_session_state(h, &mut state), 0);
    assert_eq!(state, SessionState::Done.code());
    assert_eq!(nle_session_destroy(h), 0);

    assert_eq!(mem.glyphs[10], ScriptedEngine::glyph(3, 10));
    assert_eq!(mem.chars[10], ScriptedEngine::char(3, 10));
    assert_eq!(mem.blstats[4], ScriptedEngine::blstat(3, 4));
    assert_eq!(mem.program_state[0], 1);
}

#[test]
fn null_member_leaves_memory_untouched() {
    let mut mem = Memory::new();
    let glyphs = grid(&mut mem.glyphs, DType::I16);
    let set = NleBufferSet {
        glyphs: &glyphs,
        ..NleBufferSet::default()
    };
    let h = scripted(5);
    assert_eq!(nle_session_bind_buffers(h, &set), 0);
    assert_eq!(nle_session_reset(h), 0);
    assert_eq!(nle_session_step(h, 0), 0);
    assert_eq!(nle_session_destroy(h), 0);

    assert_eq!(mem.glyphs[0], ScriptedEngine::glyph(1, 0));
    assert!(mem.chars.iter().all(|&c| c == 0));
    assert!(mem.blstats.iter().all(|&b| b == -1));
}

#[test]
fn validation_failures_map_to_distinct_statuses() {
    let mut mem = Memory::new();
    let h = scripted(5);

    let wrong_type = grid(&mut mem.chars, DType::I8);
    let set = NleBufferSet {
        chars: &wrong_type,
        ..NleBufferSet::default()
    };
    assert_eq!(
        nle_session_bind_buffers(h, &set),
        NleStatus::ElementTypeMismatch as i32
    );

    let flat = vector(&mut mem.colors, DType::U8, &[1659]);
    let set = NleBufferSet {
        colors: &flat,
        ..NleBufferSet::default()
    };
    assert_eq!(nle_session_bind_buffers(h, &set), NleStatus::WrongRank as i32);

    let short = vector(&mut mem.blstats, Slot::Blstats.dtype(), &[22]);
    let set = NleBufferSet {
        blstats: &short,
        ..NleBufferSet::default()
    };
    assert_eq!(nle_session_bind_buffers(h, &set), NleStatus::WrongShape as i32);

    let reversed_strides = [79i64, -1];
    let reversed = NleBuffer {
        strides: reversed_strides.as_ptr(),
        ..grid(&mut mem.specials, DType::U8)
    };
    let set = NleBufferSet {
        specials: &reversed,
        ..NleBufferSet::default()
    };
    assert_eq!(
        nle_session_bind_buffers(h, &set),
        NleStatus::NotContiguous as i32
    );

    let opaque = NleBuffer {
        data: ptr::null_mut(),
        ..grid(&mut mem.glyphs, DType::I16)
    };
    let set = NleBufferSet {
        glyphs: &opaque,
        ..NleBufferSet::default()
    };
    assert_eq!(nle_session_bind_buffers(h, &set), NleStatus::NotArrayLike as i32);

    assert_eq!(nle_session_destroy(h), 0);
}

#[test]
fn oversized_extents_are_rejected_without_panicking() {
    let mut mem = Memory::new();
    let h = scripted(5);
    let huge = [i64::MAX, 4];
    let glyphs = NleBuffer {
        shape: huge.as_ptr(),
        ..grid(&mut mem.glyphs, DType::I16)
    };
    let set = NleBufferSet {
        glyphs: &glyphs,
        ..NleBufferSet::default()
    };
    assert_eq!(nle_session_bind_buffers(h, &set), NleStatus::NotArrayLike as i32);
    assert!(mem.glyphs.iter().all(|&g| g == -1));
    assert_eq!(nle_session_destroy(h), 0);
}
