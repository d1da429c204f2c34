use std::fmt;

/// One element of a query key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyPart {
    Name(String),
    Id(i64),
}

impl fmt::Display for KeyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => write!(f, "{:?}", name),
            Self::Id(id) => write!(f, "{}", id),
        }
    }
}

/// Ordered tuple identifying a read, e.g. `["schedules", 3]`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    parts: Vec<KeyPart>,
}

impl QueryKey {
    /// Key for a whole resource family
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            parts: vec![KeyPart::Name(resource.into())],
        }
    }

    /// Append a numeric parameter
    pub fn id(mut self, id: i64) -> Self {
        self.parts.push(KeyPart::Id(id));
        self
    }

    /// Append a named parameter
    pub fn part(mut self, name: impl Into<String>) -> Self {
        self.parts.push(KeyPart::Name(name.into()));
        self
    }

    pub fn parts(&self) -> &[KeyPart] {
        &self.parts
    }

    /// Whether `prefix` matches the leading parts of this key
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.parts.starts_with(&prefix.parts)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", part)?;
        }
        f.write_str("]")
    }
}
