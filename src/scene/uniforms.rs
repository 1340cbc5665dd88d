//! Named shader inputs with object-literal semantics.

use glam::{Vec2, Vec3};
use rustc_hash::FxHashMap;

/// A uniform value as assigned by the application.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    /// Scalar.
    Float(f32),
    /// 2-component vector.
    Vec2(Vec2),
    /// 3-component vector.
    Vec3(Vec3),
}

impl UniformValue {
    /// WGSL-style type name, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Float(_) => "f32",
            Self::Vec2(_) => "vec2<f32>",
            Self::Vec3(_) => "vec3<f32>",
        }
    }

    /// The scalar, if this is a [`Float`](Self::Float).
    pub fn as_f32(&self) -> Option<f32> {
        match *self {
            Self::Float(v) => Some(v),
            _ => None,
        }
    }

    /// The vector, if this is a [`Vec2`](Self::Vec2).
    pub fn as_vec2(&self) -> Option<Vec2> {
        match *self {
            Self::Vec2(v) => Some(v),
            _ => None,
        }
    }

    /// The vector, if this is a [`Vec3`](Self::Vec3).
    pub fn as_vec3(&self) -> Option<Vec3> {
        match *self {
            Self::Vec3(v) => Some(v),
            _ => None,
        }
    }
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<Vec2> for UniformValue {
    fn from(v: Vec2) -> Self {
        Self::Vec2(v)
    }
}

impl From<Vec3> for UniformValue {
    fn from(v: Vec3) -> Self {
        Self::Vec3(v)
    }
}

/// Insertion-ordered map from uniform name to value.
///
/// Inserting a name that is already present replaces its value but keeps
/// its original position, like a repeated key in an object literal. When
/// the replacement changes the value's type the collision is logged, since
/// only the last value is ever bound.
#[derive(Debug, Clone, Default)]
pub struct UniformMap {
    entries: Vec<(String, UniformValue)>,
    index: FxHashMap<String, usize>,
}

impl UniformMap {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a uniform. Returns the replaced value, if any.
    pub fn insert(
        &mut self,
        name: &str,
        value: impl Into<UniformValue>,
    ) -> Option<UniformValue> {
        let value = value.into();
        if let Some(&slot) = self.index.get(name) {
            let previous = std::mem::replace(&mut self.entries[slot].1, value);
            if previous.type_name() != value.type_name() {
                log::warn!(
                    "uniform `{name}` assigned twice ({} then {}); only the \
                     {} value is bound",
                    previous.type_name(),
                    value.type_name(),
                    value.type_name(),
                );
            }
            return Some(previous);
        }
        let _ = self.index.insert(name.to_owned(), self.entries.len());
        self.entries.push((name.to_owned(), value));
        None
    }

    /// Overwrite an existing uniform's value without type checks. Returns
    /// `false` if the name is unknown.
    pub fn set(&mut self, name: &str, value: impl Into<UniformValue>) -> bool {
        match self.index.get(name) {
            Some(&slot) => {
                self.entries[slot].1 = value.into();
                true
            }
            None => false,
        }
    }

    /// Look up a uniform.
    pub fn get(&self, name: &str) -> Option<&UniformValue> {
        self.index.get(name).map(|&slot| &self.entries[slot].1)
    }

    /// Scalar lookup.
    pub fn float(&self, name: &str) -> Option<f32> {
        self.get(name).and_then(UniformValue::as_f32)
    }

    /// 2-vector lookup.
    pub fn vec2(&self, name: &str) -> Option<Vec2> {
        self.get(name).and_then(UniformValue::as_vec2)
    }

    /// 3-vector lookup.
    pub fn vec3(&self, name: &str) -> Option<Vec3> {
        self.get(name).and_then(UniformValue::as_vec3)
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map holds no uniforms.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &UniformValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_key_keeps_last_value_and_first_position() {
        let mut map = UniformMap::new();
        let _ = map.insert("a", 1.0_f32);
        let _ = map.insert("b", Vec2::ONE);
        let previous = map.insert("a", Vec3::new(1.0, 2.0, 3.0));

        assert_eq!(previous, Some(UniformValue::Float(1.0)));
        assert_eq!(map.len(), 2);
        assert_eq!(map.vec3("a"), Some(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(map.float("a"), None);
        let names: Vec<_> = map.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn set_only_touches_known_names() {
        let mut map = UniformMap::new();
        let _ = map.insert("uTime", 0.0_f32);
        assert!(map.set("uTime", 2.5_f32));
        assert!(!map.set("uMissing", 1.0_f32));
        assert_eq!(map.float("uTime"), Some(2.5));
        assert!(map.get("uMissing").is_none());
    }

    #[test]
    fn typed_lookups_reject_other_types() {
        let mut map = UniformMap::new();
        let _ = map.insert("m", Vec2::new(0.5, 0.25));
        assert_eq!(map.vec2("m"), Some(Vec2::new(0.5, 0.25)));
        assert_eq!(map.vec3("m"), None);
        assert_eq!(map.float("m"), None);
    }
}
