//! PropertyMap — properties on a record, and the seed handed to instantiators.

use std::collections::HashMap;
use super::Value;

/// A map of property names to values.
pub type PropertyMap = HashMap<String, Value>;
