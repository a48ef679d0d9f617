//! The real engine, loaded from a shared library.

use std::ffi::CString;
use std::os::raw::{c_char, c_void};
use std::path::{Path, PathBuf};
use std::ptr;

use libloading::Library;
use nle_core::nethack::{MAXMCLASSES, NUMMONS};
use nle_core::{ClassInfo, ClassSym, MonsterInfo, Permonst};
use tracing::{debug, info, warn};

use crate::config::SessionConfig;
use crate::engine::{Engine, EngineOp};
use crate::error::EngineError;
use crate::obs::ObsRecord;

type StartFn = unsafe extern "C" fn(*const c_char, *mut ObsRecord) -> *mut c_void;
type StepFn = unsafe extern "C" fn(*mut c_void, *mut ObsRecord) -> *mut c_void;
type ResetFn = unsafe extern "C" fn(*mut c_void, *mut ObsRecord);
type EndFn = unsafe extern "C" fn(*mut c_void);

/// Opaque engine context returned by `nle_start`.
#[derive(Debug)]
pub struct DlContext(*mut c_void);

// SAFETY: the context is only ever touched through `DlEngine` calls,
// which the owning session serialises.
#[allow(unsafe_code)]
unsafe impl Send for DlContext {}

impl DlContext {
    /// Whether the engine has lost this context.
    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }
}

/// [`Engine`] backed by the `nle_start`/`nle_step`/`nle_reset`/`nle_end`
/// entry points of a shared library.
pub struct DlEngine {
    start: StartFn,
    step: StepFn,
    reset: ResetFn,
    end: EndFn,
    mons: *const Permonst,
    monsyms: *const ClassSym,
    dlpath: CString,
    path: PathBuf,
    // Dropped last: every pointer above points into it.
    _library: Library,
}

// SAFETY: the table pointers are read-only static data of `_library`;
// entry points are only called with `&mut self`.
#[allow(unsafe_code)]
unsafe impl Send for DlEngine {}

#[allow(unsafe_code)]
fn entry_point<T: Copy>(
    library: &Library,
    path: &Path,
    symbol: &'static str,
) -> Result<T, EngineError> {
    // SAFETY: `T` is one of the `*Fn` aliases above, matching the C
    // prototypes of the engine's entry points.
    let sym = unsafe { library.get::<T>(symbol.as_bytes()) }.map_err(|source| {
        EngineError::MissingSymbol {
            path: path.to_path_buf(),
            symbol,
            source,
        }
    })?;
    Ok(*sym)
}

#[allow(unsafe_code)]
fn table<T>(library: &Library, symbol: &str) -> *const T {
    // SAFETY: data symbols resolve to the address of the table itself.
    match unsafe { library.get::<*const T>(symbol.as_bytes()) } {
        Ok(sym) => *sym,
        Err(_) => ptr::null(),
    }
}

impl DlEngine {
    /// Validates `config` and opens the engine library.
    ///
    /// # Errors
    ///
    /// [`EngineError::Config`] for a bad config, [`EngineError::Load`] if
    /// the library cannot be opened, [`EngineError::MissingSymbol`] if an
    /// entry point is absent.
    #[allow(unsafe_code)]
    pub fn load(config: &SessionConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let dlpath = config.dlpath_cstring()?;
        let path = config.library_path()?.to_path_buf();

        // SAFETY: loading runs the library's initialisers; the engine
        // library has none with side effects beyond its own state.
        let library = unsafe { Library::new(&path) }.map_err(|source| EngineError::Load {
            path: path.clone(),
            source,
        })?;

        let start = entry_point::<StartFn>(&library, &path, "nle_start")?;
        let step = entry_point::<StepFn>(&library, &path, "nle_step")?;
        let reset = entry_point::<ResetFn>(&library, &path, "nle_reset")?;
        let end = entry_point::<EndFn>(&library, &path, "nle_end")?;
        let mons = table::<Permonst>(&library, "mons");
        let monsyms = table::<ClassSym>(&library, "def_monsyms");

        info!(
            library = %path.display(),
            dlpath = %config.dlpath.display(),
            descriptors = !mons.is_null(),
            "engine library loaded"
        );
        Ok(Self {
            start,
            step,
            reset,
            end,
            mons,
            monsyms,
            dlpath,
            path,
            _library: library,
        })
    }

    /// Path of the loaded library.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Descriptor of monster species `index`, if the library exports the
    /// species table and `index` is in range.
    #[allow(unsafe_code)]
    pub fn monster(&self, index: usize) -> Option<MonsterInfo> {
        if self.mons.is_null() || index >= NUMMONS as usize {
            return None;
        }
        // SAFETY: `mons` has NUMMONS + 1 entries; `index` is in range.
        Some(unsafe { &*self.mons.add(index) }.to_info())
    }

    /// Descriptor of monster class `mlet`, if the library exports the
    /// class table and `mlet` is in range.
    #[allow(unsafe_code)]
    pub fn class_sym(&self, mlet: usize) -> Option<ClassInfo> {
        if self.monsyms.is_null() || mlet >= MAXMCLASSES as usize {
            return None;
        }
        // SAFETY: `def_monsyms` has MAXMCLASSES entries.
        Some(unsafe { &*self.monsyms.add(mlet) }.to_info())
    }
}

impl std::fmt::Debug for DlEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DlEngine")
            .field("path", &self.path)
            .field("dlpath", &self.dlpath)
            .finish_non_exhaustive()
    }
}

impl Engine for DlEngine {
    type Handle = DlContext;

    #[allow(unsafe_code)]
    fn start(&mut self, obs: &mut ObsRecord) -> Result<DlContext, EngineError> {
        // SAFETY: `dlpath` is NUL-terminated; `obs` outlives the context.
        let ctx = unsafe { (self.start)(self.dlpath.as_ptr(), obs) };
        if ctx.is_null() {
            return Err(EngineError::Failed {
                op: EngineOp::Start,
                reason: "engine returned a null context".into(),
            });
        }
        debug!(ctx = ?ctx, "engine context created");
        Ok(DlContext(ctx))
    }

    #[allow(unsafe_code)]
    fn step(&mut self, handle: &mut DlContext, obs: &mut ObsRecord) -> Result<(), EngineError> {
        if handle.is_null() {
            return Err(EngineError::Failed {
                op: EngineOp::Step,
                reason: "engine context was lost".into(),
            });
        }
        // SAFETY: `handle` came from `start` and has not been ended.
        let next = unsafe { (self.step)(handle.0, obs) };
        handle.0 = next;
        if next.is_null() {
            warn!("engine step returned a null context");
            return Err(EngineError::Failed {
                op: EngineOp::Step,
                reason: "engine returned a null context".into(),
            });
        }
        Ok(())
    }

    #[allow(unsafe_code)]
    fn reset(&mut self, handle: &mut DlContext, obs: &mut ObsRecord) -> Result<(), EngineError> {
        if handle.is_null() {
            return Err(EngineError::Failed {
                op: EngineOp::Reset,
                reason: "engine context was lost".into(),
            });
        }
        // SAFETY: as in `step`.
        unsafe { (self.reset)(handle.0, obs) };
        Ok(())
    }

    #[allow(unsafe_code)]
    fn end(&mut self, handle: DlContext) {
        if handle.is_null() {
            return;
        }
        // SAFETY: `end` consumes the only copy of the context.
        unsafe { (self.end)(handle.0) };
        debug!(ctx = ?handle.0, "engine context ended");
    }
}
