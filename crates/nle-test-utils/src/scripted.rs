use std::os::raw::c_int;
use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};
use std::sync::Arc;

use nle_core::nethack::MAX_GLYPH;
use nle_core::{Long, Slot, COLNO};
use nle_session::{Engine, EngineError, EngineOp, ObsRecord};

#[derive(Debug, Default)]
struct ProbeCounts {
    starts: AtomicUsize,
    steps: AtomicUsize,
    resets: AtomicUsize,
    ends: AtomicUsize,
    last_action: AtomicI32,
    record_addr: AtomicUsize,
    moved_record: AtomicUsize,
}

/// Shared view of a [`ScriptedEngine`]'s call history.
///
/// Clone it before moving the engine into a session.
#[derive(Clone, Debug, Default)]
pub struct EngineProbe(Arc<ProbeCounts>);

impl EngineProbe {
    pub fn starts(&self) -> usize {
        self.0.starts.load(Ordering::SeqCst)
    }

    pub fn steps(&self) -> usize {
        self.0.steps.load(Ordering::SeqCst)
    }

    pub fn resets(&self) -> usize {
        self.0.resets.load(Ordering::SeqCst)
    }

    pub fn ends(&self) -> usize {
        self.0.ends.load(Ordering::SeqCst)
    }

    /// Total engine calls of any kind.
    pub fn calls(&self) -> usize {
        self.starts() + self.steps() + self.resets() + self.ends()
    }

    pub fn last_action(&self) -> i32 {
        self.0.last_action.load(Ordering::SeqCst)
    }

    /// Number of calls that saw the record at a different address than
    /// the first call did.
    pub fn record_moves(&self) -> usize {
        self.0.moved_record.load(Ordering::SeqCst)
    }

    fn see_record(&self, obs: &ObsRecord) {
        let addr = obs as *const ObsRecord as usize;
        let first = self
            .0
            .record_addr
            .compare_exchange(0, addr, Ordering::SeqCst, Ordering::SeqCst);
        if let Err(prev) = first {
            if prev != addr {
                self.0.moved_record.fetch_add(1, Ordering::SeqCst);
            }
        }
    }
}

/// Handle of a scripted engine instance.
#[derive(Debug, PartialEq, Eq)]
pub struct ScriptedHandle {
    pub instance: usize,
}

/// Deterministic engine: turn `t` of an episode writes frame `t` into
/// every bound slot and ends the episode after `episode_len` steps.
#[derive(Debug)]
pub struct ScriptedEngine {
    episode_len: u32,
    fail_on: Option<EngineOp>,
    turn: u32,
    probe: EngineProbe,
}

impl ScriptedEngine {
    pub fn new(episode_len: u32) -> Self {
        Self {
            episode_len,
            fail_on: None,
            turn: 0,
            probe: EngineProbe::default(),
        }
    }

    /// Makes every call of `op` fail.
    pub fn failing_on(mut self, op: EngineOp) -> Self {
        self.fail_on = Some(op);
        self
    }

    pub fn probe(&self) -> EngineProbe {
        self.probe.clone()
    }

    /// Glyph written at flat `index` on `turn`.
    pub fn glyph(turn: u32, index: usize) -> i16 {
        ((turn as usize * 7 + index) % MAX_GLYPH as usize) as i16
    }

    /// Character written at flat `index` on `turn`.
    pub fn char(turn: u32, index: usize) -> u8 {
        b' ' + ((turn as usize + index) % 95) as u8
    }

    /// Colour written at flat `index` on `turn`.
    pub fn color(turn: u32, index: usize) -> u8 {
        ((turn as usize + index / (COLNO - 1)) % 16) as u8
    }

    /// Special flags written at flat `index` on `turn`.
    pub fn special(turn: u32, index: usize) -> u8 {
        ((turn as usize ^ index) & 0xff) as u8
    }

    /// Bottom-line statistic `index` on `turn`.
    pub fn blstat(turn: u32, index: usize) -> Long {
        Long::from(turn as i32) * 100 + index as Long
    }

    /// Program-state word `index` on `turn`.
    pub fn program_state(turn: u32, index: usize) -> c_int {
        if index == 0 {
            1
        } else {
            turn as c_int
        }
    }

    fn check(&self, op: EngineOp) -> Result<(), EngineError> {
        if self.fail_on == Some(op) {
            return Err(EngineError::Failed {
                op,
                reason: "scripted failure".into(),
            });
        }
        Ok(())
    }

    #[allow(unsafe_code)]
    fn write_frame(&self, obs: &mut ObsRecord) {
        let t = self.turn;
        // SAFETY: only called from engine operations, where the session
        // guarantees bound slots point at live, exclusively used memory.
        unsafe {
            if let Some(s) = obs.slot_slice_mut::<i16>(Slot::Glyphs) {
                s.iter_mut().enumerate().for_each(|(i, v)| *v = Self::glyph(t, i));
            }
            if let Some(s) = obs.slot_slice_mut::<u8>(Slot::Chars) {
                s.iter_mut().enumerate().for_each(|(i, v)| *v = Self::char(t, i));
            }
            if let Some(s) = obs.slot_slice_mut::<u8>(Slot::Colors) {
                s.iter_mut().enumerate().for_each(|(i, v)| *v = Self::color(t, i));
            }
            if let Some(s) = obs.slot_slice_mut::<u8>(Slot::Specials) {
                s.iter_mut().enumerate().for_each(|(i, v)| *v = Self::special(t, i));
            }
            if let Some(s) = obs.slot_slice_mut::<Long>(Slot::Blstats) {
                s.iter_mut().enumerate().for_each(|(i, v)| *v = Self::blstat(t, i));
            }
            if let Some(s) = obs.slot_slice_mut::<c_int>(Slot::ProgramState) {
                s.iter_mut()
                    .enumerate()
                    .for_each(|(i, v)| *v = Self::program_state(t, i));
            }
        }
        obs.done = c_int::from(t >= self.episode_len);
    }
}

impl Engine for ScriptedEngine {
    type Handle = ScriptedHandle;

    fn start(&mut self, obs: &mut ObsRecord) -> Result<ScriptedHandle, EngineError> {
        self.probe.see_record(obs);
        let instance = self.probe.0.starts.fetch_add(1, Ordering::SeqCst);
        self.check(EngineOp::Start)?;
        self.turn = 0;
        self.write_frame(obs);
        Ok(ScriptedHandle { instance })
    }

    fn step(&mut self, _: &mut ScriptedHandle, obs: &mut ObsRecord) -> Result<(), EngineError> {
        self.probe.see_record(obs);
        self.probe.0.steps.fetch_add(1, Ordering::SeqCst);
        self.probe.0.last_action.store(obs.action, Ordering::SeqCst);
        self.check(EngineOp::Step)?;
        self.turn += 1;
        self.write_frame(obs);
        Ok(())
    }

    fn reset(&mut self, _: &mut ScriptedHandle, obs: &mut ObsRecord) -> Result<(), EngineError> {
        self.probe.see_record(obs);
        self.probe.0.resets.fetch_add(1, Ordering::SeqCst);
        self.check(EngineOp::Reset)?;
        self.turn = 0;
        self.write_frame(obs);
        Ok(())
    }

    fn end(&mut self, _: ScriptedHandle) {
        self.probe.0.ends.fetch_add(1, Ordering::SeqCst);
    }
}
