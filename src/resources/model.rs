/*!
 * In-memory model of an Android string resource dictionary.
 *
 * Grouped `<plurals>` elements are flattened at parse time into one entry per
 * quantity, addressed by a composite key, so everything downstream reasons
 * about a single key/text shape.
 */

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Document used for a target dictionary that does not exist on disk yet
pub const EMPTY_DOCUMENT: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<resources>\n</resources>\n";

/// Build the composite key addressing one variant of a grouped entry
pub fn composite_key(group: &str, selector: &str) -> String {
    format!("{}_{}", group, selector)
}

/// Shape of a dictionary entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    /// A plain `<string name="...">`
    Simple,
    /// One `<item quantity="...">` of a `<plurals name="...">` group
    Variant {
        /// Name of the enclosing group
        group: String,
        /// Quantity selector (`zero`, `one`, `two`, `few`, `many`, `other`)
        selector: String,
    },
}

/// A single translatable text addressed by a stable key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryEntry {
    /// Simple key or composite `group_selector` key
    pub key: String,

    /// Text content with XML entities and resource escapes decoded
    pub text: String,

    /// Simple or grouped variant
    pub kind: EntryKind,

    /// False when the resource is marked `translatable="false"`
    pub translatable: bool,

    /// Set by the merge engine when the text came from machine translation
    pub machine_translated: bool,
}

impl DictionaryEntry {
    /// Create a simple entry
    pub fn simple(key: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            text: text.into(),
            kind: EntryKind::Simple,
            translatable: true,
            machine_translated: false,
        }
    }

    /// Create a grouped variant entry keyed by `group_selector`
    pub fn variant(group: impl Into<String>, selector: impl Into<String>, text: impl Into<String>) -> Self {
        let group = group.into();
        let selector = selector.into();
        Self {
            key: composite_key(&group, &selector),
            text: text.into(),
            kind: EntryKind::Variant { group, selector },
            translatable: true,
            machine_translated: false,
        }
    }

    /// Builder-style setter for the translatable flag
    pub fn with_translatable(mut self, translatable: bool) -> Self {
        self.translatable = translatable;
        self
    }

    /// Whether this entry came from a grouped element
    pub fn is_composite(&self) -> bool {
        matches!(self.kind, EntryKind::Variant { .. })
    }

    /// Whether the entry holds non-whitespace text
    pub fn has_content(&self) -> bool {
        !self.text.trim().is_empty()
    }

    /// Group name for variants
    pub fn group(&self) -> Option<&str> {
        match &self.kind {
            EntryKind::Variant { group, .. } => Some(group),
            EntryKind::Simple => None,
        }
    }
}

/// Ordered key → entry mapping for one (language, file) pair
#[derive(Debug, Clone)]
pub struct ResourceDictionary {
    /// Language qualifier this dictionary belongs to
    pub language: String,

    /// File the dictionary was read from or will be written to
    pub path: PathBuf,

    entries: Vec<DictionaryEntry>,
    index: HashMap<String, usize>,
    document: String,
}

/// Returned when inserting a key the dictionary already holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateKey(pub String);

impl ResourceDictionary {
    /// Create an empty dictionary backed by an empty `<resources>` document
    pub fn new(language: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::with_document(language, path, EMPTY_DOCUMENT)
    }

    /// Create an empty dictionary backed by the given document text
    pub fn with_document(language: impl Into<String>, path: impl Into<PathBuf>, document: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            path: path.into(),
            entries: Vec::new(),
            index: HashMap::new(),
            document: document.into(),
        }
    }

    /// Append an entry, rejecting duplicate keys
    pub fn insert(&mut self, entry: DictionaryEntry) -> Result<(), DuplicateKey> {
        if self.index.contains_key(&entry.key) {
            return Err(DuplicateKey(entry.key));
        }
        self.index.insert(entry.key.clone(), self.entries.len());
        self.entries.push(entry);
        Ok(())
    }

    /// Store a machine translation for `source`'s key
    ///
    /// Existing entries keep their position and kind; absent keys are appended
    /// with the source entry's shape.
    pub fn fill_translation(&mut self, source: &DictionaryEntry, text: impl Into<String>) {
        let text = text.into();
        match self.index.get(&source.key) {
            Some(&position) => {
                let entry = &mut self.entries[position];
                entry.text = text;
                entry.machine_translated = true;
            }
            None => {
                let mut entry = source.clone();
                entry.text = text;
                entry.machine_translated = true;
                self.index.insert(entry.key.clone(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&DictionaryEntry> {
        self.index.get(key).map(|&position| &self.entries[position])
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Entries in document order
    pub fn entries(&self) -> impl Iterator<Item = &DictionaryEntry> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }

    /// Entries filled by machine translation during this run
    pub fn machine_translated(&self) -> impl Iterator<Item = &DictionaryEntry> {
        self.entries.iter().filter(|e| e.machine_translated)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The exact text this dictionary was parsed from
    pub fn document(&self) -> &str {
        &self.document
    }

    /// File name component of the dictionary's path, for logging
    pub fn file_name(&self) -> String {
        file_name_of(&self.path)
    }
}

pub(crate) fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
