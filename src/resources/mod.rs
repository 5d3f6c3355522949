/*!
 * Android string resource handling.
 *
 * - `model`: dictionary and entry types
 * - `parser`: XML to dictionary
 * - `writer`: dictionary back to XML, preserving untouched content
 * - `validator`: well-formedness checks
 * - `escape`: aapt string escaping
 */

pub mod escape;
pub mod model;
pub mod parser;
pub mod validator;
pub mod writer;

pub use model::{DictionaryEntry, EntryKind, ResourceDictionary, composite_key};
pub use writer::PROVENANCE_MARKER;
