//! # C ABI
//!
//! `extern "C"` entry points for the terminal UI host.
//!
//! ## Ownership Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  host                               payterm                             │
//! │  ────                               ───────                             │
//! │  payterm_init(path | NULL) ───────► 0 ok / 1 failure                    │
//! │                                                                         │
//! │  payterm_calculate_fees(..) ──────► *mut c_char  (owned JSON, NUL-term) │
//! │        │                                                                │
//! │        ▼  read / copy                                                   │
//! │  payterm_free_string(ptr) ────────► released                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every string-returning function yields either the success DTO or an
//! error object (`{"error":..,"code":..}`); null pointers, invalid UTF-8 and
//! calls made before `payterm_init` come back as error objects too.
//! Strings must be released with [`payterm_free_string`] and nothing else.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::path::PathBuf;

use serde::Serialize;
use tracing::{error, info};

use crate::config::EngineConfig;
use crate::dto::{error_json, render};
use crate::engine::{Engine, EngineHandle};
use crate::error::{ApiError, ApiResult};
use crate::logging::init_tracing;

/// Hands an owned JSON string to the host.
fn into_c_string(json: String) -> *mut c_char {
    // serde_json escapes NUL, so this only strips bytes a hand-built string
    // could carry.
    let bytes: Vec<u8> = json.into_bytes().into_iter().filter(|b| *b != 0).collect();
    CString::new(bytes).unwrap_or_default().into_raw()
}

fn respond<T: Serialize>(result: ApiResult<T>) -> *mut c_char {
    into_c_string(render(result))
}

fn with_engine<T>(call: impl FnOnce(&Engine) -> ApiResult<T>) -> ApiResult<T> {
    EngineHandle::global().get().and_then(call)
}

/// Reads a borrowed C string argument.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string that stays valid
/// for the duration of the call.
unsafe fn read_str<'a>(ptr: *const c_char, what: &str) -> ApiResult<&'a str> {
    if ptr.is_null() {
        return Err(ApiError::invalid_input(format!("{} is null", what)));
    }
    CStr::from_ptr(ptr)
        .to_str()
        .map_err(|_| ApiError::invalid_input(format!("{} is not valid UTF-8", what)))
}

// =============================================================================
// Lifecycle
// =============================================================================

/// Loads configuration, installs logging and initializes the engine.
///
/// `config_path` may be null to use the default config location.
/// Returns 0 on success, 1 on failure. Calling it again after a successful
/// init is harmless and keeps the first configuration.
///
/// # Safety
/// `config_path` must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn payterm_init(config_path: *const c_char) -> i32 {
    let path = if config_path.is_null() {
        None
    } else {
        match read_str(config_path, "config_path") {
            Ok(path) => Some(PathBuf::from(path)),
            Err(e) => {
                init_tracing(None);
                error!("payterm_init rejected: {}", e);
                return 1;
            }
        }
    };

    let config = match EngineConfig::load(path) {
        Ok(config) => config,
        Err(e) => {
            init_tracing(None);
            error!("payterm_init failed: {}", e);
            return 1;
        }
    };

    init_tracing(Some(&config.logging.filter));
    EngineHandle::global().init(Engine::new(config));
    info!("payterm engine ready");
    0
}

/// Releases a string returned by any `payterm_*` function. Null is ignored.
///
/// # Safety
/// `ptr` must be null or a pointer previously returned by this library that
/// has not been freed yet.
#[no_mangle]
pub unsafe extern "C" fn payterm_free_string(ptr: *mut c_char) {
    if ptr.is_null() {
        return;
    }
    drop(CString::from_raw(ptr));
}

// =============================================================================
// Operations
// =============================================================================

/// `{"is_valid":..,"brand":..,"message":..}`
///
/// # Safety
/// `card_number` must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn payterm_validate_card(card_number: *const c_char) -> *mut c_char {
    let card_number = read_str(card_number, "card_number");
    respond(card_number.and_then(|number| with_engine(|engine| Ok(engine.validate_card(number)))))
}

/// `{"fixed_fee":..,"percentage_fee":..,"total_fee":..,"net_amount":..,"effective_rate":..}`
#[no_mangle]
pub extern "C" fn payterm_calculate_fees(amount: f64, channel: i32) -> *mut c_char {
    respond(with_engine(|engine| engine.calculate_fees(amount, channel)))
}

/// `{"transaction_id":"TXN-<secs>-<seq>"}`
#[no_mangle]
pub extern "C" fn payterm_next_transaction_id() -> *mut c_char {
    respond(with_engine(|engine| Ok(engine.next_transaction_id())))
}

/// `{"total":..,"average":..,"max":..,"min":..,"count":..}`
///
/// # Safety
/// `amounts` must point to `len` readable `f64` values. It may be null only
/// when `len` is 0.
#[no_mangle]
pub unsafe extern "C" fn payterm_aggregate_batch(amounts: *const f64, len: usize) -> *mut c_char {
    let amounts: &[f64] = if len == 0 {
        &[]
    } else if amounts.is_null() {
        return into_c_string(error_json(&ApiError::invalid_input("amounts is null")));
    } else {
        std::slice::from_raw_parts(amounts, len)
    };

    respond(with_engine(|engine| engine.aggregate_batch(amounts)))
}

/// `{"approved":..,"risk_score":..,"message":..}`
#[no_mangle]
pub extern "C" fn payterm_authorize(amount: f64, tip: f64, channel: i32) -> *mut c_char {
    respond(with_engine(|engine| engine.authorize(amount, tip, channel)))
}

/// `{"index":..,"name":..,"description":..,"percentage_rate":..,"fixed_fee":..}`
#[no_mangle]
pub extern "C" fn payterm_describe_channel(channel: i32) -> *mut c_char {
    respond(with_engine(|engine| engine.describe_channel(channel)))
}

// =============================================================================
// Unit Tests
// =============================================================================
