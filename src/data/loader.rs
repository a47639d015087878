// ============================================================
// Layer 3 — Pickle Loader
// ============================================================
// Loads Python pickle artifacts (label maps, vocabularies,
// fitted encoders, ...) written by the training side.
//
// Path rule:
//   <dir>/<name>.pkl: the ".pkl" suffix is appended to the
//   joined path as text, so "model.v2" → "model.v2.pkl".
//
// The payload has no schema. Callers either ask for the dynamic
// serde_pickle::Value (a tagged union over Python's builtin
// types) or name a concrete type T they expect to find.
//
// The file handle lives inside load_*; it is dropped on every
// return path, error paths included.
//
// Reference: serde-pickle crate docs
//            Rust Book §9 (Error Handling)

use anyhow::Result;
use serde::de::DeserializeOwned;
use serde_pickle::{DeOptions, HashableValue, Value};
use std::{
    ffi::OsString,
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use crate::infra::observe::LogOnError;

/// Resolve `<dir>/<name>.pkl`
pub fn pickle_path(dir: impl AsRef<Path>, name: &str) -> PathBuf {
    let mut path: OsString = dir.as_ref().join(name).into_os_string();
    path.push(".pkl");
    PathBuf::from(path)
}

/// Load a pickle as a dynamic value.
pub fn load_pickle_value(dir: impl AsRef<Path>, name: &str) -> Result<Value> {
    read_pickle(dir.as_ref(), name, |reader| {
        Ok(serde_pickle::value_from_reader(reader, DeOptions::new())?)
    })
}

/// Load a pickle into a concrete type.
pub fn load_pickle<T: DeserializeOwned>(dir: impl AsRef<Path>, name: &str) -> Result<T> {
    read_pickle(dir.as_ref(), name, |reader| {
        Ok(serde_pickle::from_reader(reader, DeOptions::new())?)
    })
}

/// Render a pickle value as JSON for display.
///
/// JSON objects need string keys, so dict keys are stringified:
/// strings stay as they are, anything else becomes its JSON text
/// (`0` → `"0"`, `(1, 2)` → `"[1,2]"`). Tuples and sets become
/// arrays, bytes an array of numbers, big ints and non-finite
/// floats strings / null.
pub fn pickle_to_json(value: Value) -> serde_json::Value {
    use serde_json::Value as Json;

    match value {
        Value::None      => Json::Null,
        Value::Bool(b)   => Json::Bool(b),
        Value::I64(n)    => Json::from(n),
        Value::Int(n)    => Json::String(n.to_string()),
        Value::F64(f)    => serde_json::Number::from_f64(f).map_or(Json::Null, Json::Number),
        Value::Bytes(b)  => Json::from(b),
        Value::String(s) => Json::String(s),
        Value::List(items) | Value::Tuple(items) => {
            Json::Array(items.into_iter().map(pickle_to_json).collect())
        }
        Value::Set(items) | Value::FrozenSet(items) => Json::Array(
            items.into_iter().map(|k| pickle_to_json(k.into_value())).collect(),
        ),
        Value::Dict(entries) => Json::Object(
            entries
                .into_iter()
                .map(|(k, v)| (json_key(k), pickle_to_json(v)))
                .collect(),
        ),
    }
}

fn json_key(key: HashableValue) -> String {
    match pickle_to_json(key.into_value()) {
        serde_json::Value::String(s) => s,
        other                        => other.to_string(),
    }
}

/// Shared open → decode → close sequence. Failures are logged and
/// handed back as the original io::Error / serde_pickle::Error.
fn read_pickle<T>(
    dir:    &Path,
    name:   &str,
    decode: impl FnOnce(BufReader<File>) -> Result<T>,
) -> Result<T> {
    let path = pickle_path(dir, name);
    tracing::info!("Reading files from {}", path.display());

    let result = File::open(&path)
        .map_err(anyhow::Error::from)
        .and_then(|file| decode(BufReader::new(file)));

    result.log_on_error()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::observe::capture::capture_logs;
    use serde_pickle::SerOptions;
    use std::collections::BTreeMap;
    use std::io::ErrorKind;

    fn write_pickle<T: serde::Serialize>(dir: &Path, file: &str, value: &T) {
        let mut f = File::create(dir.join(file)).unwrap();
        serde_pickle::to_writer(&mut f, value, SerOptions::new()).unwrap();
    }

    fn label_map() -> BTreeMap<String, i64> {
        BTreeMap::from([
            ("negative".to_string(), 0),
            ("neutral".to_string(), 1),
            ("positive".to_string(), 2),
        ])
    }

    #[test]
    fn test_path_appends_suffix() {
        assert_eq!(pickle_path("/models", "model"), PathBuf::from("/models/model.pkl"));
        assert_eq!(pickle_path("/models", "model.v2"), PathBuf::from("/models/model.v2.pkl"));
    }

    #[test]
    fn test_typed_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        write_pickle(dir.path(), "labels.pkl", &label_map());

        let loaded: BTreeMap<String, i64> = load_pickle(dir.path(), "labels").unwrap();
        assert_eq!(loaded, label_map());
    }

    #[test]
    fn test_value_load_is_schema_free() {
        let dir = tempfile::tempdir().unwrap();
        write_pickle(dir.path(), "vocab.pkl", &vec!["the", "cat", "sat"]);

        let value = load_pickle_value(dir.path(), "vocab").unwrap();
        let expected = Value::List(vec![
            Value::String("the".to_string()),
            Value::String("cat".to_string()),
            Value::String("sat".to_string()),
        ]);
        assert_eq!(value, expected);
    }

    #[test]
    fn test_reads_exact_file_name() {
        let dir = tempfile::tempdir().unwrap();
        // "model" must not pick up "model.v2.pkl" or a bare "model"
        write_pickle(dir.path(), "model.v2.pkl", &1i64);
        std::fs::write(dir.path().join("model"), b"not a pickle").unwrap();
        write_pickle(dir.path(), "model.pkl", &42i64);

        let n: i64 = load_pickle(dir.path(), "model").unwrap();
        assert_eq!(n, 42);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_pickle_value(dir.path(), "absent").unwrap_err();
        let io_err = err.downcast_ref::<std::io::Error>().unwrap();
        assert_eq!(io_err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_class_payloads_are_rejected() {
        // PROTO 2, GLOBAL numpy.ndarray, BINPUT 0, STOP
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("array.pkl"), b"\x80\x02cnumpy\nndarray\nq\x00.").unwrap();

        let err = load_pickle_value(dir.path(), "array").unwrap_err();
        assert!(err.downcast_ref::<serde_pickle::Error>().is_some());
    }

    #[test]
    fn test_json_stringifies_non_string_keys() {
        let dir = tempfile::tempdir().unwrap();
        let labels = BTreeMap::from([(0i64, "neg"), (1i64, "pos")]);
        write_pickle(dir.path(), "labels.pkl", &labels);

        let json = pickle_to_json(load_pickle_value(dir.path(), "labels").unwrap());
        assert_eq!(json, serde_json::json!({ "0": "neg", "1": "pos" }));
    }

    #[test]
    fn test_json_keeps_nested_structure() {
        let dir = tempfile::tempdir().unwrap();
        let nested = BTreeMap::from([("ids".to_string(), vec![3i64, 1, 2])]);
        write_pickle(dir.path(), "nested.pkl", &nested);

        let json = pickle_to_json(load_pickle_value(dir.path(), "nested").unwrap());
        assert_eq!(json, serde_json::json!({ "ids": [3, 1, 2] }));
    }

    #[test]
    fn test_logs_resolved_path_at_info() {
        let dir = tempfile::tempdir().unwrap();
        write_pickle(dir.path(), "model.pkl", &42i64);

        let (res, logs) = capture_logs(|| load_pickle::<i64>(dir.path(), "model"));
        assert_eq!(res.unwrap(), 42);

        let expected = format!("Reading files from {}", dir.path().join("model.pkl").display());
        let line = logs.lines().find(|l| l.contains(&expected)).unwrap();
        assert!(line.contains("INFO"), "line: {line}");
        assert!(!logs.contains("ERROR"), "logs: {logs}");
    }

    #[test]
    fn test_missing_file_is_logged_at_error() {
        let dir = tempfile::tempdir().unwrap();
        let (res, logs) = capture_logs(|| load_pickle_value(dir.path(), "absent"));

        assert!(res.is_err());
        assert!(logs.contains("Reading files from"), "logs: {logs}");
        assert!(logs.lines().any(|l| l.contains("ERROR")), "logs: {logs}");
    }

    #[test]
    fn test_corrupt_file_is_a_pickle_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.pkl"), [0xFF, 0x00, 0x13, 0x37]).unwrap();

        let err = load_pickle::<i64>(dir.path(), "broken").unwrap_err();
        assert!(err.downcast_ref::<serde_pickle::Error>().is_some());
    }
}
