use alloc::string::{String, ToString as _};
use core::fmt::{self, Display, Formatter};

const ROOT: &str = "::";

/// Canonical reference to a type in the catalog.
///
/// Identifiers are always anchored at the root, so `Foo`, `::Foo` and `::::Foo` name the same type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeIdentifier(String);

impl TypeIdentifier {
    #[must_use]
    pub fn new(path: &str) -> Self {
        let mut canonical = String::with_capacity(ROOT.len() + path.len());
        canonical.push_str(ROOT);
        canonical.push_str(bare(path.trim()));
        Self(canonical)
    }

    /// Identifier a key points to when no target is given: `foo` -> `::Foo`.
    #[must_use]
    pub fn capitalized(key: &str) -> Self {
        let key = bare(key.trim());
        let mut chars = key.chars();
        match chars.next() {
            Some(first) => {
                let mut path = first.to_uppercase().to_string();
                path.push_str(chars.as_str());
                Self::new(&path)
            }
            None => Self::new(key),
        }
    }

    /// Canonical form, with the leading `::`.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Form without the root anchor. Autowiring looks up bindings by this name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0[ROOT.len()..]
    }
}

fn bare(mut path: &str) -> &str {
    while let Some(rest) = path.strip_prefix(ROOT) {
        path = rest;
    }
    path
}

impl Display for TypeIdentifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeIdentifier {
    #[inline]
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for TypeIdentifier {
    #[inline]
    fn from(path: String) -> Self {
        Self::new(&path)
    }
}
