// crates/cutter-ffi/src/lib.rs
//
// The C ABI surface, matching the `render.h` contract this crate's
// `version`/`init`/`get_arguments`/`render` quartet is grounded on:
// plain `extern "C"` functions taking flat wire structs and a pair of
// callback function pointers, with nothing Rust-specific crossing the
// boundary. Callers own every pointer they pass in; this crate never
// retains one past the call that received it.

use std::ffi::{c_char, c_double, CStr, CString};
use std::path::PathBuf;
use std::slice;
use std::sync::Once;

use cutter_core::{Cut, CutList};
use cutter_engine::{ProgressSink, RenderArgs, ARGUMENTS};

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "\0");

pub type ErrorCallback = extern "C" fn(*const c_char);
pub type ProgressCallback = extern "C" fn(*const c_char, c_double);

#[repr(C)]
pub struct CCut {
    pub start: i64,
    pub end: i64,
}

#[repr(C)]
pub struct CCutList {
    pub num_cuts: i64,
    pub cuts: *const CCut,
}

#[repr(C)]
pub struct CArgumentResult {
    pub name: *const c_char,
    pub value: *const c_char,
}

#[repr(C)]
pub struct CArgumentResultList {
    pub num_args: i64,
    pub args: *const CArgumentResult,
}

#[repr(C)]
pub struct CArgument {
    pub short_name: c_char,
    pub long_name: *const c_char,
    pub description: *const c_char,
    pub required: bool,
    pub is_flag: bool,
}

#[repr(C)]
pub struct CArgumentList {
    pub num_args: i64,
    pub args: *const CArgument,
}

/// Returns the crate version as a NUL-terminated static string. Never
/// calls `error` — kept in the signature only to match `render.h`.
#[no_mangle]
pub extern "C" fn version(_error: Option<ErrorCallback>) -> *const c_char {
    VERSION.as_ptr() as *const c_char
}

/// One-time FFmpeg setup: lowers `av_log`'s verbosity and brings up
/// network protocol support for remote inputs. Safe to call more than
/// once; only the first call takes effect.
#[no_mangle]
pub extern "C" fn init(_error: Option<ErrorCallback>) {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        ffmpeg_the_third::init().ok();
        // No safe wrapper for av_log_set_level in this version of
        // ffmpeg-the-third; same FFI drop as miquels-hls-server's
        // startup sequence.
        unsafe {
            ffmpeg_the_third::ffi::av_log_set_level(ffmpeg_the_third::ffi::AV_LOG_ERROR as i32);
        }
    });
}

/// Describes the arguments `render` accepts, as a pointer the caller must
/// not free — it points at a process-lifetime static table.
#[no_mangle]
pub extern "C" fn get_arguments(_error: Option<ErrorCallback>) -> CArgumentList {
    // Leaked once per process: get_arguments is called rarely (typically
    // once, at startup) and the caller is never told to free the result,
    // matching render.h's "static table" contract.
    let entries: &'static [CArgument] = Box::leak(
        ARGUMENTS
            .iter()
            .map(|a| CArgument {
                short_name: a.short_name as c_char,
                long_name: Box::leak(CString::new(a.long_name).unwrap().into_boxed_c_str()).as_ptr(),
                description: Box::leak(CString::new(a.description).unwrap().into_boxed_c_str()).as_ptr(),
                required: a.required,
                is_flag: a.is_flag,
            })
            .collect::<Vec<_>>()
            .into_boxed_slice(),
    );

    CArgumentList {
        num_args: entries.len() as i64,
        args: entries.as_ptr(),
    }
}

struct CallbackSink {
    progress: Option<ProgressCallback>,
    error: Option<ErrorCallback>,
    // The four pipeline workers all report through the same sink; render.h
    // says nothing about the callback itself being reentrant, so calls are
    // serialized here rather than trusting every possible host to marshal
    // them itself.
    call_lock: std::sync::Mutex<()>,
}

// The callbacks are plain C function pointers; the caller is responsible
// for making them safe to invoke from any thread, per render.h's progress
// callback contract ("may be invoked from any worker thread"). `call_lock`
// only serializes this crate's own invocations against each other.
unsafe impl Send for CallbackSink {}
unsafe impl Sync for CallbackSink {}

impl ProgressSink for CallbackSink {
    fn on_progress(&self, stage: &str, fraction: f64) {
        if let (Some(cb), Ok(stage)) = (self.progress, CString::new(stage)) {
            let _guard = self.call_lock.lock().unwrap();
            cb(stage.as_ptr(), fraction);
        }
    }

    fn on_error(&self, message: &str) {
        if let (Some(cb), Ok(message)) = (self.error, CString::new(message)) {
            let _guard = self.call_lock.lock().unwrap();
            cb(message.as_ptr());
        }
    }
}

/// Cuts `file` down to `cuts` and writes the result to `output`. Blocks
/// the calling thread until the render finishes or fails; `progress` may
/// be called from any worker thread mid-render, `error` at most once on
/// failure.
///
/// # Safety
/// `file` and `output` must be valid NUL-terminated UTF-8 strings.
/// `cuts.cuts` must point at `cuts.num_cuts` contiguous `CCut` values.
/// `args.args` must point at `args.num_args` contiguous `CArgumentResult`
/// values whose `name`/`value` are valid NUL-terminated UTF-8 strings.
#[no_mangle]
pub unsafe extern "C" fn render(
    file: *const c_char,
    output: *const c_char,
    cuts: CCutList,
    args: CArgumentResultList,
    progress: Option<ProgressCallback>,
    error: Option<ErrorCallback>,
) -> bool {
    let sink = std::sync::Arc::new(CallbackSink {
        progress,
        error,
        call_lock: std::sync::Mutex::new(()),
    });

    let result = (|| -> Result<(), String> {
        let file = cstr_to_path(file)?;
        let output = cstr_to_path(output)?;
        let cut_list = build_cut_list(cuts)?;
        let render_args = build_render_args(args)?;

        cutter_engine::render(&file, &output, cut_list, render_args, sink.clone())
            .map_err(|e| e.to_string())
    })();

    match result {
        Ok(()) => true,
        Err(message) => {
            sink.on_error(&message);
            false
        }
    }
}

unsafe fn cstr_to_path(ptr: *const c_char) -> Result<PathBuf, String> {
    if ptr.is_null() {
        return Err("null path".to_string());
    }
    CStr::from_ptr(ptr)
        .to_str()
        .map(PathBuf::from)
        .map_err(|e| format!("invalid UTF-8 in path: {e}"))
}

unsafe fn build_cut_list(cuts: CCutList) -> Result<CutList, String> {
    let raw = if cuts.num_cuts == 0 || cuts.cuts.is_null() {
        &[][..]
    } else {
        slice::from_raw_parts(cuts.cuts, cuts.num_cuts as usize)
    };
    let parsed = raw.iter().map(|c| Cut::new(c.start, c.end)).collect();
    CutList::new(parsed).map_err(|e| e.to_string())
}

unsafe fn build_render_args(args: CArgumentResultList) -> Result<RenderArgs, String> {
    if args.num_args == 0 || args.args.is_null() {
        return Ok(RenderArgs::default());
    }
    let raw = slice::from_raw_parts(args.args, args.num_args as usize);
    let mut pairs = Vec::with_capacity(raw.len());
    for entry in raw {
        let name = CStr::from_ptr(entry.name)
            .to_str()
            .map_err(|e| format!("invalid UTF-8 in argument name: {e}"))?;
        let value = CStr::from_ptr(entry.value)
            .to_str()
            .map_err(|e| format!("invalid UTF-8 in argument value: {e}"))?;
        pairs.push((name, value));
    }
    Ok(RenderArgs::from_pairs(pairs))
}
