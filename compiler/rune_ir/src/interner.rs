//! String interner for identifier names.
//!
//! Interned strings are leaked so lookups can hand out `&'static str`
//! without holding the lock.

use super::Name;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

struct InternTable {
    map: FxHashMap<&'static str, u32>,
    strings: Vec<&'static str>,
}

/// Interns identifier text into [`Name`] handles.
pub struct StringInterner {
    table: RwLock<InternTable>,
}

impl StringInterner {
    /// Create an interner with the names the binder looks up by text.
    pub fn new() -> Self {
        let empty: &'static str = "";
        let mut map = FxHashMap::default();
        map.insert(empty, 0);
        let interner = Self {
            table: RwLock::new(InternTable {
                map,
                strings: vec![empty],
            }),
        };
        for word in PRE_INTERNED {
            interner.intern(word);
        }
        interner
    }

    /// Intern a string, returning its Name.
    pub fn intern(&self, s: &str) -> Name {
        {
            let guard = self.table.read();
            if let Some(&index) = guard.map.get(s) {
                return Name::from_raw(index);
            }
        }

        let mut guard = self.table.write();
        if let Some(&index) = guard.map.get(s) {
            return Name::from_raw(index);
        }
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        #[expect(
            clippy::cast_possible_truncation,
            reason = "identifier count never approaches u32::MAX"
        )]
        let index = guard.strings.len() as u32;
        guard.strings.push(leaked);
        guard.map.insert(leaked, index);
        Name::from_raw(index)
    }

    /// Look up the text of a Name.
    pub fn lookup(&self, name: Name) -> &'static str {
        let guard = self.table.read();
        guard.strings.get(name.index()).copied().unwrap_or("")
    }

    /// Look up a name without interning it.
    pub fn get(&self, s: &str) -> Option<Name> {
        self.table.read().map.get(s).copied().map(Name::from_raw)
    }

    /// Number of interned strings, including the empty string.
    pub fn len(&self) -> usize {
        self.table.read().strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

const PRE_INTERNED: &[&str] = &[
    "self",
    "main",
    "package",
    "values",
    "toString",
    "show",
    "destroy",
    "nextFree",
    "Class",
];
