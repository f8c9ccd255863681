//! String interner for identifiers.
//!
//! The prelude and every user program compiled by one interpreter share a
//! single interner, so a `Name` taken from either resolves against the same
//! table. Interned text is leaked to obtain `&'static str`; the table only
//! ever holds identifiers, which are few.

use crate::Name;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

#[derive(Default)]
struct Table {
    map: FxHashMap<&'static str, Name>,
    strings: Vec<&'static str>,
}

/// Error when the interner runs out of 32-bit indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternOverflow {
    pub count: usize,
}

impl std::fmt::Display for InternOverflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "interner exceeded capacity at {} strings", self.count)
    }
}

impl std::error::Error for InternOverflow {}

/// Thread-safe identifier interner.
pub struct StringInterner {
    table: RwLock<Table>,
}

impl StringInterner {
    pub fn new() -> Self {
        let mut table = Table::default();
        table.map.insert("", Name::EMPTY);
        table.strings.push("");
        StringInterner {
            table: RwLock::new(table),
        }
    }

    /// Intern `s`, failing only when the index space is exhausted.
    pub fn try_intern(&self, s: &str) -> Result<Name, InternOverflow> {
        if let Some(&name) = self.table.read().map.get(s) {
            return Ok(name);
        }

        let mut table = self.table.write();
        if let Some(&name) = table.map.get(s) {
            return Ok(name);
        }
        let count = table.strings.len();
        let index = u32::try_from(count).map_err(|_| InternOverflow { count })?;
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        let name = Name::from_index(index);
        table.strings.push(leaked);
        table.map.insert(leaked, name);
        Ok(name)
    }

    /// Intern `s`.
    ///
    /// # Panics
    /// Panics after 2^32 distinct identifiers.
    pub fn intern(&self, s: &str) -> Name {
        self.try_intern(s).unwrap_or_else(|e| panic!("{}", e))
    }

    /// Text of an interned name. Unknown names resolve to `""`.
    pub fn lookup(&self, name: Name) -> &'static str {
        self.table
            .read()
            .strings
            .get(name.index())
            .copied()
            .unwrap_or("")
    }

    /// Look up an existing name without interning.
    pub fn get(&self, s: &str) -> Option<Name> {
        self.table.read().map.get(s).copied()
    }

    pub fn len(&self) -> usize {
        self.table.read().strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}
