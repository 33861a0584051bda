use serde_json::Value as JsonValue;
use tracing::trace;

use super::Reducer;
use crate::storage::StoreState;

/// Sets an application prop that lives next to the entity collections.
pub fn set_prop(key: impl Into<String>, value: JsonValue) -> Reducer {
    let key = key.into();

    Box::new(move |state: StoreState| {
        if state.prop(&key) == Some(&value) {
            return Ok(state);
        }
        trace!(key = %key, "set_prop");
        Ok(state.with_prop(key, value))
    })
}
