//! Object headers.

use super::MetaData;

/// Header information for an object in the hierarchy.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObjectHeader {
    /// Name of this object (not full path).
    pub name: String,
    /// Full path from root (e.g., "/parent/child").
    pub full_name: String,
    /// Metadata containing schema info, etc.
    pub meta_data: MetaData,
}

impl ObjectHeader {
    /// Create a new object header.
    pub fn new(name: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            full_name: full_name.into(),
            meta_data: MetaData::new(),
        }
    }

    /// Create with metadata.
    pub fn with_meta_data(
        name: impl Into<String>,
        full_name: impl Into<String>,
        meta_data: MetaData,
    ) -> Self {
        Self {
            name: name.into(),
            full_name: full_name.into(),
            meta_data,
        }
    }

    /// Header for a child named `name` below the object at `parent_path`.
    pub fn child_of(parent_path: &str, name: impl Into<String>, meta_data: MetaData) -> Self {
        let name = name.into();
        let full_name = if parent_path.ends_with('/') {
            format!("{parent_path}{name}")
        } else {
            format!("{parent_path}/{name}")
        };
        Self::with_meta_data(name, full_name, meta_data)
    }

    /// Get the schema name from metadata.
    pub fn schema(&self) -> Option<&str> {
        self.meta_data.schema()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_of() {
        let h = ObjectHeader::child_of("/", "A", MetaData::new());
        assert_eq!(h.full_name, "/A");

        let h = ObjectHeader::child_of("/A", "Mesh", MetaData::new());
        assert_eq!(h.name, "Mesh");
        assert_eq!(h.full_name, "/A/Mesh");
    }
}
