//! Raw query strings for the validation layer.
//!
//! Handlers take every parameter as text and let the core filters parse it,
//! so a malformed value is a 422 listing every bad parameter rather than an
//! extractor rejection.

use std::collections::HashMap;

use serde_json::{Map, Value};

pub type Params = HashMap<String, String>;

/// The parameters as a JSON object of strings.
pub fn object(params: Params) -> Value {
  Value::Object(
    params
      .into_iter()
      .map(|(k, v)| (k, Value::String(v)))
      .collect::<Map<_, _>>(),
  )
}
