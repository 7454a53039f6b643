/// Interned byte strings.
///
/// Every string value in the interpreter is an opaque `StringId` into one
/// interner: identifier names and string literals enter during parsing,
/// concatenation results enter at runtime. Interning deduplicates, so two
/// string values are byte-equal iff their ids are equal.
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// An opaque handle to a string in the interner.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct StringId(pub u32);

/// String interner: owns all string bytes and deduplicates on insert.
pub struct StringInterner {
    /// All strings, indexed by StringId.
    strings: Vec<Vec<u8>>,
    /// Lookup table: hash → candidate StringIds with that hash.
    lookup: HashMap<u64, Vec<u32>>,
}

impl StringInterner {
    /// Create a new empty interner.
    pub fn new() -> Self {
        StringInterner {
            strings: Vec::new(),
            lookup: HashMap::new(),
        }
    }

    /// Intern a byte string, returning the id of the existing entry if one
    /// matches, or creating a new entry otherwise.
    pub fn intern_or_create(&mut self, bytes: &[u8]) -> StringId {
        let hash = hash_bytes(bytes);
        if let Some(candidates) = self.lookup.get(&hash) {
            for &id in candidates {
                if self.strings[id as usize] == bytes {
                    return StringId(id);
                }
            }
        }
        let id = self.strings.len() as u32;
        self.strings.push(bytes.to_vec());
        self.lookup.entry(hash).or_default().push(id);
        StringId(id)
    }

    /// Get the bytes of an interned string.
    pub fn get_bytes(&self, id: StringId) -> &[u8] {
        &self.strings[id.0 as usize]
    }

    /// Get an interned string as lossy UTF-8 (for messages and display).
    pub fn get_lossy(&self, id: StringId) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(self.get_bytes(id))
    }

    /// Number of interned strings.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Returns true if nothing has been interned yet.
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StringInterner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StringInterner")
            .field("strings", &self.strings.len())
            .finish()
    }
}

fn hash_bytes(bytes: &[u8]) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    bytes.hash(&mut hasher);
    hasher.finish()
}
