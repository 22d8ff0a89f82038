use core::{fmt, num::NonZeroU32};

use serde::{Deserialize, Serialize};

/// Handle to an interned string. Ids start at 1; the zero slot is reserved
/// and `Option<StringId>` stands in for "unset".
#[derive(PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize, Debug, PartialOrd, Ord)]
pub struct StringId(NonZeroU32);

impl StringId {
    pub fn get(self) -> u32 {
        self.0.get()
    }

    pub(crate) fn from_raw(raw: u32) -> Option<Self> {
        NonZeroU32::new(raw).map(Self)
    }

    fn index(self) -> usize {
        self.0.get() as usize - 1
    }
}

// heapless maps hash their keys with hash32
impl hash32::Hash for StringId {
    fn hash<H: hash32::Hasher>(&self, state: &mut H) {
        hash32::Hash::hash(&self.0.get(), state)
    }
}

impl fmt::Display for StringId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Append-only string table. Lookup is a linear scan in insertion order;
/// the table only ever holds the distinct words a program has seen.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Interner {
    strings: Vec<String>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, text: &str) -> StringId {
        if let Some(id) = self.lookup(text) {
            return id;
        }
        self.strings.push(text.to_owned());
        let id = StringId::from_raw(self.strings.len() as u32)
            .expect("interner length is never zero after a push");
        forth_trace!("intern {:?} -> {}", text, id);
        id
    }

    pub fn lookup(&self, text: &str) -> Option<StringId> {
        self.strings
            .iter()
            .position(|s| s == text)
            .and_then(|idx| StringId::from_raw(idx as u32 + 1))
    }

    pub fn resolve(&self, id: StringId) -> Option<&str> {
        self.strings.get(id.index()).map(String::as_str)
    }

    pub(crate) fn contains(&self, id: StringId) -> bool {
        id.index() < self.strings.len()
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StringId, &str)> {
        self.strings
            .iter()
            .enumerate()
            .filter_map(|(idx, s)| StringId::from_raw(idx as u32 + 1).map(|id| (id, s.as_str())))
    }

    pub(crate) fn strings(&self) -> &[String] {
        &self.strings
    }

    pub(crate) fn from_strings(strings: Vec<String>) -> Self {
        Self { strings }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idempotent() {
        let mut interner = Interner::new();
        let a = interner.intern("dup");
        let b = interner.intern("dup");
        assert_eq!(a, b);
        assert_eq!(interner.len(), 1);
    }

    #[test]
    fn test_distinct_and_nonzero() {
        let mut interner = Interner::new();
        let ids: Vec<_> = ["foo", "bar", "baz", "foo"]
            .iter()
            .map(|s| interner.intern(s))
            .collect();
        assert_ne!(ids[0], ids[1]);
        assert_ne!(ids[1], ids[2]);
        assert_eq!(ids[0], ids[3]);
        assert!(ids.iter().all(|id| id.get() != 0));
        assert_eq!(ids[0].get(), 1);
    }

    #[test]
    fn test_resolve() {
        let mut interner = Interner::new();
        let emit = interner.intern("emit");
        let period = interner.intern(".");
        assert_eq!(interner.resolve(emit), Some("emit"));
        assert_eq!(interner.resolve(period), Some("."));

        let stray = StringId::from_raw(42).unwrap();
        assert_eq!(interner.resolve(stray), None);
        assert!(!interner.contains(stray));
    }

    #[test]
    fn test_ids_are_stable() {
        let mut interner = Interner::new();
        let first = interner.intern("first");
        for i in 0..100 {
            interner.intern(&format!("word{i}"));
        }
        assert_eq!(interner.intern("first"), first);
        assert_eq!(interner.resolve(first), Some("first"));
        let order: Vec<_> = interner.iter().take(2).map(|(_, s)| s).collect();
        assert_eq!(order, ["first", "word0"]);
    }
}
