/*!
 * Resource dictionary parser.
 *
 * Reads `<resources>` documents with quick-xml and produces a
 * `ResourceDictionary` in document order. `<string>` elements become simple
 * entries; each `<item>` of a `<plurals>` group becomes a composite entry.
 */

use log::{debug, warn};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::path::Path;

use crate::errors::ParseError;
use super::escape::unescape_resource_text;
use super::model::{DictionaryEntry, ResourceDictionary};

/// Entry under construction while its element is open
#[derive(Debug)]
struct PendingEntry {
    name: Option<String>,
    text: String,
    translatable: bool,
}

/// Open element on the parser stack
#[derive(Debug)]
enum Frame {
    Root,
    String(PendingEntry),
    Plurals { name: Option<String>, translatable: bool },
    Item(PendingEntry),
    Other,
}

/// Parse the dictionary stored at `path`
pub fn parse(path: &Path, language: &str) -> Result<ResourceDictionary, ParseError> {
    let text = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_str(&text, path, language)
}

/// Parse dictionary text; `path` is only recorded, never read
pub fn parse_str(text: &str, path: &Path, language: &str) -> Result<ResourceDictionary, ParseError> {
    let malformed = |message: String| ParseError::Malformed {
        path: path.to_path_buf(),
        message,
    };

    let mut dictionary = ResourceDictionary::with_document(language, path, text);
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(false);

    let mut stack: Vec<Frame> = Vec::new();
    let mut seen_root = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| malformed(format!("at byte {}: {}", reader.buffer_position(), e)))?;

        match event {
            Event::Start(e) => {
                let frame = open_frame(&e, &stack, seen_root, path)?;
                if matches!(frame, Frame::Root) {
                    seen_root = true;
                }
                stack.push(frame);
            }
            Event::Empty(e) => {
                let frame = open_frame(&e, &stack, seen_root, path)?;
                if matches!(frame, Frame::Root) {
                    seen_root = true;
                }
                close_frame(frame, &stack, &mut dictionary, path)?;
            }
            Event::End(_) => {
                let frame = stack
                    .pop()
                    .ok_or_else(|| malformed("closing tag without matching opening tag".to_string()))?;
                close_frame(frame, &stack, &mut dictionary, path)?;
            }
            Event::Text(t) => {
                let decoded = t.unescape().map_err(|e| malformed(e.to_string()))?;
                if stack.is_empty() && !decoded.trim().is_empty() {
                    return Err(malformed("text outside the root element".to_string()));
                }
                append_text(&mut stack, &decoded);
            }
            Event::CData(c) => {
                let decoded = String::from_utf8_lossy(&c).into_owned();
                append_text(&mut stack, &decoded);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(malformed(format!("{} unclosed element(s) at end of file", stack.len())));
    }
    if !seen_root {
        return Err(malformed("no root element found".to_string()));
    }

    debug!("Parsed {} entries from {}", dictionary.len(), path.display());
    Ok(dictionary)
}

fn attribute(e: &BytesStart, name: &str, path: &Path) -> Result<Option<String>, ParseError> {
    let malformed = |message: String| ParseError::Malformed {
        path: path.to_path_buf(),
        message,
    };
    match e.try_get_attribute(name).map_err(|err| malformed(err.to_string()))? {
        Some(attr) => Ok(Some(
            attr.unescape_value()
                .map_err(|err| malformed(err.to_string()))?
                .into_owned(),
        )),
        None => Ok(None),
    }
}

fn is_translatable(e: &BytesStart, path: &Path) -> Result<bool, ParseError> {
    Ok(attribute(e, "translatable", path)?
        .map(|v| !v.trim().eq_ignore_ascii_case("false"))
        .unwrap_or(true))
}

fn open_frame(e: &BytesStart, stack: &[Frame], seen_root: bool, path: &Path) -> Result<Frame, ParseError> {
    let name = e.name();
    let name = name.as_ref();

    let Some(parent) = stack.last() else {
        if seen_root {
            return Err(ParseError::Malformed {
                path: path.to_path_buf(),
                message: "more than one root element".to_string(),
            });
        }
        if name != b"resources" {
            return Err(ParseError::UnexpectedRoot {
                path: path.to_path_buf(),
                found: String::from_utf8_lossy(name).into_owned(),
            });
        }
        return Ok(Frame::Root);
    };

    let frame = match (parent, name) {
        (Frame::Root, b"string") => Frame::String(PendingEntry {
            name: attribute(e, "name", path)?,
            text: String::new(),
            translatable: is_translatable(e, path)?,
        }),
        (Frame::Root, b"plurals") => Frame::Plurals {
            name: attribute(e, "name", path)?,
            translatable: is_translatable(e, path)?,
        },
        (Frame::Plurals { translatable, .. }, b"item") => Frame::Item(PendingEntry {
            name: attribute(e, "quantity", path)?,
            text: String::new(),
            translatable: *translatable,
        }),
        _ => Frame::Other,
    };

    Ok(frame)
}

fn close_frame(
    frame: Frame,
    stack: &[Frame],
    dictionary: &mut ResourceDictionary,
    path: &Path,
) -> Result<(), ParseError> {
    let entry = match frame {
        Frame::String(pending) => {
            let Some(name) = pending.name else {
                warn!("Skipping <string> without a name attribute in {}", path.display());
                return Ok(());
            };
            DictionaryEntry::simple(name, unescape_resource_text(&pending.text))
                .with_translatable(pending.translatable)
        }
        Frame::Item(pending) => {
            let group = match stack.last() {
                Some(Frame::Plurals { name: Some(group), .. }) => group.clone(),
                _ => {
                    warn!("Skipping plural item of an unnamed <plurals> in {}", path.display());
                    return Ok(());
                }
            };
            let Some(selector) = pending.name else {
                warn!("Skipping <item> without a quantity attribute in plurals '{}' of {}", group, path.display());
                return Ok(());
            };
            DictionaryEntry::variant(group, selector, unescape_resource_text(&pending.text))
                .with_translatable(pending.translatable)
        }
        Frame::Plurals { name: None, .. } => {
            warn!("Skipping <plurals> without a name attribute in {}", path.display());
            return Ok(());
        }
        Frame::Root | Frame::Plurals { .. } | Frame::Other => return Ok(()),
    };

    dictionary.insert(entry).map_err(|dup| ParseError::DuplicateKey {
        path: path.to_path_buf(),
        key: dup.0,
    })
}

/// Character data belongs to the innermost open `<string>` or `<item>`
fn append_text(stack: &mut [Frame], text: &str) {
    for frame in stack.iter_mut().rev() {
        match frame {
            Frame::String(pending) | Frame::Item(pending) => {
                pending.text.push_str(text);
                return;
            }
            Frame::Root => return,
            _ => {}
        }
    }
}
