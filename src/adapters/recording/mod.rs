//! Recording adapters that capture interactions to cassettes.

pub mod object_store;

use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::cassette::format::RecordedError;
use crate::cassette::recorder::CassetteRecorder;
use crate::error::Error;

/// Record a `Result<T, Error>` interaction using the Ok/Err JSON convention.
///
/// Errors are stored with their kind and variant so a replay reproduces the
/// same error.
pub(crate) fn record_result<T, I>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    result: &Result<T, Error>,
) where
    T: Serialize,
    I: Serialize,
{
    let input_json = serde_json::to_value(input).expect("failed to serialize recording input");

    let output_json = match result {
        Ok(v) => {
            let inner = serde_json::to_value(v).expect("failed to serialize Ok value");
            serde_json::json!({ "Ok": inner })
        }
        Err(e) => {
            let recorded = RecordedError {
                kind: e.kind(),
                variant: Some(e.variant().to_string()),
                message: e.message(),
            };
            serde_json::json!({ "Err": recorded })
        }
    };

    let mut guard = recorder.lock().expect("recorder lock poisoned");
    guard.record(port, method, input_json, output_json);
}
