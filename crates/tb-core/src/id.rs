use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

/// Global string interner for unit IDs.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// A lightweight, interned identifier for a unit definition in the catalog.
/// Internally a 4-byte `Spur` index, so equality and hashing are O(1).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnitId(Spur);

impl UnitId {
    /// Intern a new string as a UnitId, or return existing if already interned.
    pub fn intern(s: &str) -> Self {
        UnitId(INTERNER.get_or_intern(s))
    }

    /// Look up an already-interned id without interning a new one.
    /// Returns `None` for strings no catalog has ever used.
    pub fn lookup(s: &str) -> Option<Self> {
        INTERNER.get(s).map(UnitId)
    }

    /// Resolve back to a string slice.
    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }
}

impl fmt::Debug for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for UnitId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for UnitId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(UnitId::intern(&s))
    }
}

/// Handle of a placed token. Assigned monotonically by the scene and never
/// reused, so a stale handle can only ever resolve to a deleted token.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TokenId(pub u32);

impl fmt::Debug for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit-{}", self.0)
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit-{}", self.0)
    }
}

impl TokenId {
    /// Parse the `unit-N` form produced by `Display`.
    pub fn parse(s: &str) -> Option<Self> {
        s.strip_prefix("unit-")?.parse().ok().map(TokenId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_roundtrip() {
        let a = UnitId::intern("legionaries");
        let b = UnitId::intern("legionaries");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "legionaries");
    }

    #[test]
    fn lookup_does_not_intern() {
        assert!(UnitId::lookup("never-interned-unit-xyz").is_none());
        let id = UnitId::intern("helbrute");
        assert_eq!(UnitId::lookup("helbrute"), Some(id));
    }

    #[test]
    fn token_id_display_and_parse() {
        let id = TokenId(7);
        assert_eq!(id.to_string(), "unit-7");
        assert_eq!(TokenId::parse("unit-7"), Some(id));
        assert_eq!(TokenId::parse("token-7"), None);
        assert_eq!(TokenId::parse("unit-x"), None);
    }
}
