//! Domain models: rules as written in policy text, and the objects they annotate.

pub mod object;
pub mod rule;

use std::collections::BTreeMap;

/// Annotation mapping. Ordered so JSON encoding and iteration are deterministic.
pub type Annotations = BTreeMap<String, String>;

pub use object::{SourceObject, TargetObject};
pub use rule::RawRule;
