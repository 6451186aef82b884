//! Replaying adapters that serve recorded interactions from cassettes.

pub mod object_store;

use std::sync::{Arc, Mutex};

use crate::cassette::format::RecordedError;
use crate::cassette::replayer::CassetteReplayer;
use crate::error::Error;

/// Retrieve the next recorded output for a given port and method.
pub(crate) fn next_output(
    replayer: &Arc<Mutex<CassetteReplayer>>,
    port: &str,
    method: &str,
) -> Result<serde_json::Value, Error> {
    let mut guard =
        replayer.lock().map_err(|e| Error::Config(format!("Replayer lock poisoned: {e}")))?;
    Ok(guard.next_interaction(port, method)?.output)
}

/// Deserialize a replayed output as `Result<T, Error>`.
pub(crate) fn replay_result<T: serde::de::DeserializeOwned>(
    output: serde_json::Value,
) -> Result<T, Error> {
    if let Some(err_val) = output.get("Err").or_else(|| output.get("err")) {
        return Err(match serde_json::from_value::<RecordedError>(err_val.clone()) {
            Ok(recorded) => {
                Error::from_recorded(recorded.kind, recorded.variant.as_deref(), recorded.message)
            }
            Err(_) => Error::Transport(err_val.as_str().unwrap_or("replayed error").to_string()),
        });
    }
    let value = output.get("Ok").or_else(|| output.get("ok")).cloned().unwrap_or(output);
    serde_json::from_value(value)
        .map_err(|e| Error::Config(format!("Malformed cassette output: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn ok_value_is_unwrapped() {
        let value: Vec<u32> = replay_result(json!({"Ok": [1, 2]})).unwrap();
        assert_eq!(value, vec![1, 2]);
    }

    #[test]
    fn structured_error_keeps_kind() {
        let err = replay_result::<Vec<u32>>(json!({"Err": {"kind": "not_found", "message": "x"}}))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn recorded_variant_is_restored() {
        let output = json!({"Err": {
            "kind": "other",
            "variant": "invalid_argument",
            "message": "storage rejected a.png (400): InvalidKey",
        }});
        let err = replay_result::<Vec<u32>>(output).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Other);
        assert!(err.to_string().starts_with("Invalid argument:"));
    }

    #[test]
    fn bare_string_error_is_transport() {
        let err = replay_result::<Vec<u32>>(json!({"Err": "connection reset"})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(err.message(), "connection reset");
    }
}
