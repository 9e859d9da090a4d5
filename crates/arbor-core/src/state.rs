use convert_case::{Case, Casing};

/// True for characters permitted in a node name.
fn valid_nodename_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'
}

/// A node name: lowercase ASCII alphanumerics plus underscores. Used for
/// tracing output and debugging, never for layout decisions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeName {
    /// The validated name string.
    name: String,
}

impl NodeName {
    /// Munge an arbitrary string into a valid node name by snake-casing it
    /// and dropping invalid characters.
    pub fn convert(name: &str) -> Self {
        let name = name.to_case(Case::Snake);
        Self {
            name: name.chars().filter(|c| valid_nodename_char(*c)).collect(),
        }
    }
}

impl std::fmt::Display for NodeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl PartialEq<&str> for NodeName {
    fn eq(&self, other: &&str) -> bool {
        self.name == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convert() {
        assert_eq!(NodeName::convert("Foo"), "foo");
        assert_eq!(NodeName::convert("FooBar"), "foo_bar");
        assert_eq!(NodeName::convert("Foo Bar-Voing"), "foo_bar_voing");
    }
}
