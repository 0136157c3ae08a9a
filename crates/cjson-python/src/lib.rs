//! # cjson-python
//!
//! Python bindings for cjson-core, built with PyO3.
//!
//! Exposes the following functions to Python as the `custom_json` module:
//!
//! - `loads(s)` -- JSON `str` or `bytes` -> Python object
//! - `dumps(obj)` -- Python object -> JSON `str`
//!
//! Every failure surfaces as `TypeError`, carrying the codec's message.

use cjson_core::{Error, RawInteger, Value};
use pyo3::exceptions::PyTypeError;
use pyo3::prelude::*;
use pyo3::types::{PyBool, PyByteArray, PyBytes, PyDict, PyFloat, PyInt, PyList, PyString, PyTuple};
use serde::ser::{Error as _, Serialize, SerializeMap, SerializeSeq, Serializer};

fn to_py_err(e: Error) -> PyErr {
    PyTypeError::new_err(e.to_string())
}

/// Parse a JSON document into Python objects.
///
/// Args:
///     s: The document, as `str` or UTF-8 `bytes`.
///
/// Returns:
///     `None`, `bool`, `int`, `float`, `str`, `list` or `dict`.
///
/// Raises:
///     TypeError: If the document is malformed, has trailing characters, or
///         `s` is neither `str` nor `bytes`.
#[pyfunction]
fn loads(py: Python<'_>, s: &Bound<'_, PyAny>) -> PyResult<PyObject> {
    // The decoder never touches Python objects, so the GIL is released for it.
    let decoded = if let Ok(bytes) = s.downcast::<PyBytes>() {
        let buf = bytes.as_bytes();
        py.allow_threads(|| cjson_core::decode(buf))
    } else if let Ok(text) = s.downcast::<PyString>() {
        let buf = text.to_str()?.as_bytes();
        py.allow_threads(|| cjson_core::decode(buf))
    } else {
        return Err(PyTypeError::new_err(format!(
            "loads() argument must be str or bytes, not {}",
            type_name(s)
        )));
    };
    let value = decoded.map_err(to_py_err)?;
    Ok(to_py(py, &value)?.unbind())
}

/// Serialize a Python object to a JSON string.
///
/// Strings and keys are written without escaping.
///
/// Args:
///     obj: `None`, `bool`, `int` (any size), `float`, `str`, `list`, `tuple`
///         or `dict` (with `str` keys), nested arbitrarily.
///
/// Returns:
///     The JSON text.
///
/// Raises:
///     TypeError: On any other type, or on a `dict` key that is not `str`.
#[pyfunction]
fn dumps(obj: &Bound<'_, PyAny>) -> PyResult<String> {
    cjson_core::to_string(&PyNode(obj)).map_err(to_py_err)
}

fn to_py<'py>(py: Python<'py>, value: &Value) -> PyResult<Bound<'py, PyAny>> {
    Ok(match value {
        Value::Null => py.None().into_bound(py),
        Value::Bool(b) => PyBool::new(py, *b).to_owned().into_any(),
        Value::Integer(n) => (*n).into_pyobject(py)?.into_any(),
        Value::Float(f) => PyFloat::new(py, *f).into_any(),
        Value::String(s) => PyString::new(py, s).into_any(),
        Value::Array(items) => {
            let list = PyList::empty(py);
            for item in items {
                list.append(to_py(py, item)?)?;
            }
            list.into_any()
        }
        Value::Object(map) => {
            let dict = PyDict::new(py);
            for (k, v) in map {
                dict.set_item(k, to_py(py, v)?)?;
            }
            dict.into_any()
        }
    })
}

fn type_name(obj: &Bound<'_, PyAny>) -> String {
    obj.get_type()
        .name()
        .map(|n| n.to_string())
        .unwrap_or_else(|_| "object".to_string())
}

/// A Python object viewed through serde, so the codec's encoder can walk it
/// directly without building an intermediate [`Value`].
struct PyNode<'a, 'py>(&'a Bound<'py, PyAny>);

impl Serialize for PyNode<'_, '_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let obj = self.0;
        if obj.is_none() {
            return serializer.serialize_unit();
        }
        // bool subclasses int; test it first.
        if let Ok(b) = obj.downcast::<PyBool>() {
            return serializer.serialize_bool(b.is_true());
        }
        if let Ok(s) = obj.downcast::<PyString>() {
            let text = s.to_cow().map_err(S::Error::custom)?;
            return serializer.serialize_str(&text);
        }
        if obj.is_instance_of::<PyInt>() {
            if let Ok(n) = obj.extract::<i64>() {
                return serializer.serialize_i64(n);
            }
            if let Ok(n) = obj.extract::<i128>() {
                return serializer.serialize_i128(n);
            }
            if let Ok(n) = obj.extract::<u128>() {
                return serializer.serialize_u128(n);
            }
            // Wider still: take the decimal text Python itself prints.
            let text = obj.str().map_err(S::Error::custom)?;
            let text = text.to_cow().map_err(S::Error::custom)?;
            return RawInteger::new(&text)
                .map_err(S::Error::custom)?
                .serialize(serializer);
        }
        if let Ok(f) = obj.downcast::<PyFloat>() {
            return serializer.serialize_f64(f.value());
        }
        if let Ok(list) = obj.downcast::<PyList>() {
            let mut seq = serializer.serialize_seq(Some(list.len()))?;
            for item in list.iter() {
                seq.serialize_element(&PyNode(&item))?;
            }
            return seq.end();
        }
        if let Ok(tuple) = obj.downcast::<PyTuple>() {
            let mut seq = serializer.serialize_seq(Some(tuple.len()))?;
            for item in tuple.iter() {
                seq.serialize_element(&PyNode(&item))?;
            }
            return seq.end();
        }
        if let Ok(dict) = obj.downcast::<PyDict>() {
            let mut map = serializer.serialize_map(Some(dict.len()))?;
            for (k, v) in dict.iter() {
                map.serialize_entry(&PyNode(&k), &PyNode(&v))?;
            }
            return map.end();
        }
        if let Ok(bytes) = obj.downcast::<PyBytes>() {
            return serializer.serialize_bytes(bytes.as_bytes());
        }
        if let Ok(bytes) = obj.downcast::<PyByteArray>() {
            return serializer.serialize_bytes(&bytes.to_vec());
        }
        Err(S::Error::custom(type_name(obj)))
    }
}

/// The `custom_json` Python module, implemented in Rust via PyO3.
#[pymodule]
fn custom_json(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(loads, m)?)?;
    m.add_function(wrap_pyfunction!(dumps, m)?)?;
    Ok(())
}
