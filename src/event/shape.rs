//! Shape tokens: identity for event tuple shapes and selector tuple shapes.

use std::any::{type_name, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A unique, stable identity token for a tuple shape.
///
/// Two shapes are equal iff their ordered element-type sequences are
/// identical, which for Rust tuples is exactly type identity. The token is
/// the `TypeId` of the tuple type together with its name for diagnostics.
/// Tokens are hashable and serve as map keys; a published event only ever
/// searches groups whose event-shape token equals its own, so cross-shape
/// matches are structurally impossible.
#[derive(Debug, Clone, Copy)]
pub struct ShapeToken {
    id: TypeId,
    name: &'static str,
}

impl ShapeToken {
    /// Get the shape token of a tuple type.
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Human-readable shape name, for debug output.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for ShapeToken {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ShapeToken {}

impl Hash for ShapeToken {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for ShapeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
