/*!
 * Resource dictionary serializer.
 *
 * The dictionary's original document is streamed through a quick-xml reader
 * and copied slice by slice, so every byte outside a machine-translated entry
 * is written back exactly as it was read. Filled elements get their content
 * replaced by the translation followed by the provenance comment, and
 * translations for keys the document never contained are appended to the
 * enclosing `<plurals>` or `<resources>` element.
 */

use log::debug;
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::{HashMap, HashSet};
use std::io::Write;
use std::path::Path;

use crate::errors::WriteError;
use super::escape::escape_resource_text;
use super::validator;
use super::model::{DictionaryEntry, EntryKind, ResourceDictionary};

/// Declaration prepended when the document does not carry one
pub const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n";

/// Comment placed right after machine-translated text
pub const PROVENANCE_MARKER: &str = "<!-- MT fallback -->";

const DEFAULT_INDENT: &str = "    ";

const BOM: &str = "\u{feff}";

/// Render the dictionary back to resource XML
pub fn render(dictionary: &ResourceDictionary) -> Result<String, WriteError> {
    // Stream positions exclude a byte order mark, so it is carried separately
    let (bom, document) = match dictionary.document().strip_prefix(BOM) {
        Some(rest) => (BOM, rest),
        None => ("", dictionary.document()),
    };
    let render_error = |message: String| WriteError::Render {
        path: dictionary.path.clone(),
        message,
    };

    let fills: HashMap<&str, &DictionaryEntry> = dictionary
        .machine_translated()
        .map(|e| (e.key.as_str(), e))
        .collect();
    let indent = detect_indent(document);

    let mut out = String::with_capacity(document.len() + fills.len() * 64 + XML_DECLARATION.len());
    out.push_str(bom);
    if !has_declaration(document) {
        out.push_str(XML_DECLARATION);
    }

    let mut emitted: HashSet<String> = HashSet::new();
    let mut reader = Reader::from_str(document);
    reader.config_mut().trim_text(false);

    let mut depth = 0usize;
    let mut last = 0usize;
    let mut current_group: Option<String> = None;
    // Depth of the element whose original content is being dropped
    let mut replacing: Option<usize> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| render_error(format!("at byte {}: {}", reader.buffer_position(), e)))?;
        let end = reader.buffer_position() as usize;
        let raw = &document[last..end];
        last = end;

        if let Some(level) = replacing {
            match event {
                Event::Start(_) => depth += 1,
                Event::End(_) => {
                    depth -= 1;
                    if depth == level {
                        replacing = None;
                        out.push_str(raw);
                    }
                }
                Event::Eof => return Err(render_error("unexpected end of document".to_string())),
                _ => {}
            }
            continue;
        }

        match event {
            Event::Start(e) => {
                let level = depth;
                depth += 1;
                out.push_str(raw);
                if level == 1 && e.name().as_ref() == b"plurals" {
                    current_group = name_attribute(&e, "name");
                }
                if let Some(entry) = fill_for(&e, level, current_group.as_deref(), &fills, &emitted) {
                    out.push_str(&filled_content(entry));
                    emitted.insert(entry.key.clone());
                    replacing = Some(level);
                }
            }
            Event::Empty(e) => {
                let level = depth;
                if let Some(entry) = fill_for(&e, level, current_group.as_deref(), &fills, &emitted) {
                    let tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    out.push_str(&open_tag_of_empty(raw));
                    out.push_str(&filled_content(entry));
                    out.push_str(&format!("</{}>", tag));
                    emitted.insert(entry.key.clone());
                } else if level == 1 && e.name().as_ref() == b"plurals" {
                    let group = name_attribute(&e, "name");
                    let items = group
                        .as_deref()
                        .map(|g| pending_items(dictionary, g, &emitted))
                        .unwrap_or_default();
                    if items.is_empty() {
                        out.push_str(raw);
                    } else {
                        out.push_str(&open_tag_of_empty(raw));
                        let child = indent.repeat(2);
                        insert_before_close(&mut out, items.iter().map(|(_, b)| b.as_str()), &child, &indent);
                        out.push_str("</plurals>");
                        emitted.extend(items.into_iter().map(|(k, _)| k));
                    }
                } else if level == 0 {
                    let blocks = pending_top_level(dictionary, &emitted, &indent);
                    if blocks.is_empty() {
                        out.push_str(raw);
                    } else {
                        out.push_str(&open_tag_of_empty(raw));
                        insert_before_close(&mut out, blocks.iter().map(|(_, b)| b.as_str()), &indent, "");
                        out.push_str("</resources>");
                        emitted.extend(blocks.into_iter().flat_map(|(keys, _)| keys));
                    }
                } else {
                    out.push_str(raw);
                }
            }
            Event::End(e) => {
                depth = depth.saturating_sub(1);
                let level = depth;
                if level == 1 && e.name().as_ref() == b"plurals" {
                    if let Some(group) = current_group.take() {
                        let items = pending_items(dictionary, &group, &emitted);
                        if !items.is_empty() {
                            let child = indent.repeat(2);
                            insert_before_close(&mut out, items.iter().map(|(_, b)| b.as_str()), &child, &indent);
                            emitted.extend(items.into_iter().map(|(k, _)| k));
                        }
                    }
                } else if level == 0 {
                    let blocks = pending_top_level(dictionary, &emitted, &indent);
                    if !blocks.is_empty() {
                        insert_before_close(&mut out, blocks.iter().map(|(_, b)| b.as_str()), &indent, "");
                        emitted.extend(blocks.into_iter().flat_map(|(keys, _)| keys));
                    }
                }
                out.push_str(raw);
            }
            Event::Eof => {
                out.push_str(raw);
                break;
            }
            _ => out.push_str(raw),
        }
    }

    let missing = fills.keys().filter(|k| !emitted.contains(**k)).count();
    if missing > 0 {
        return Err(render_error(format!(
            "{} translated entr{} had no place in the document",
            missing,
            if missing == 1 { "y" } else { "ies" }
        )));
    }

    Ok(out)
}

/// Render and atomically replace the file at `path`
///
/// The rendered text is checked before the rename; a document that fails the
/// check leaves the existing file untouched.
pub fn write(dictionary: &ResourceDictionary, path: &Path) -> Result<(), WriteError> {
    let rendered = render(dictionary)?;
    validator::check_str(&rendered, path).map_err(|e| WriteError::Render {
        path: path.to_path_buf(),
        message: format!("rendered document is not well-formed: {}", e),
    })?;
    let io_error = |source: std::io::Error| WriteError::Io {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::path::PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir).map_err(io_error)?;

    let mut temp = tempfile::NamedTempFile::new_in(&dir).map_err(io_error)?;
    temp.write_all(rendered.as_bytes()).map_err(io_error)?;
    temp.flush().map_err(io_error)?;
    temp.persist(path).map_err(|e| io_error(e.error))?;

    debug!("Wrote {} bytes to {}", rendered.len(), path.display());
    Ok(())
}

fn has_declaration(document: &str) -> bool {
    document.trim_start().starts_with("<?xml")
}

/// Indentation of the first child of `<resources>`
fn detect_indent(document: &str) -> String {
    let mut in_resources = false;
    for line in document.lines() {
        if !in_resources {
            if line.contains("<resources") {
                in_resources = true;
            }
            continue;
        }
        let trimmed = line.trim_start();
        if trimmed.starts_with('<') && !trimmed.starts_with("</resources") {
            let indent = &line[..line.len() - trimmed.len()];
            if !indent.is_empty() && indent.chars().all(|c| c == ' ' || c == '\t') {
                return indent.to_string();
            }
            break;
        }
    }
    DEFAULT_INDENT.to_string()
}

fn name_attribute(e: &BytesStart, name: &str) -> Option<String> {
    e.try_get_attribute(name)
        .ok()
        .flatten()
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.into_owned()))
}

/// The machine-translated entry an element holds, if any
fn fill_for<'a>(
    e: &BytesStart,
    level: usize,
    current_group: Option<&str>,
    fills: &HashMap<&str, &'a DictionaryEntry>,
    emitted: &HashSet<String>,
) -> Option<&'a DictionaryEntry> {
    let key = match (level, e.name().as_ref()) {
        (1, b"string") => name_attribute(e, "name")?,
        (2, b"item") => {
            let quantity = name_attribute(e, "quantity")?;
            super::model::composite_key(current_group?, &quantity)
        }
        _ => return None,
    };
    if emitted.contains(&key) {
        return None;
    }
    fills.get(key.as_str()).copied()
}

fn filled_content(entry: &DictionaryEntry) -> String {
    format!("{}{}", escape_resource_text(&entry.text), PROVENANCE_MARKER)
}

/// Turn the raw text of `<tag attr="v"/>` into `<tag attr="v">`
fn open_tag_of_empty(raw: &str) -> String {
    let inner = raw.trim_end();
    let inner = inner.strip_suffix("/>").unwrap_or(inner).trim_end();
    format!("{}>", inner)
}

fn string_element(entry: &DictionaryEntry) -> String {
    format!(
        "<string name=\"{}\">{}</string>",
        escape(entry.key.as_str()),
        filled_content(entry)
    )
}

fn item_element(selector: &str, entry: &DictionaryEntry) -> String {
    format!(
        "<item quantity=\"{}\">{}</item>",
        escape(selector),
        filled_content(entry)
    )
}

/// Missing `<item>`s of `group`, keyed for bookkeeping
fn pending_items(
    dictionary: &ResourceDictionary,
    group: &str,
    emitted: &HashSet<String>,
) -> Vec<(String, String)> {
    dictionary
        .machine_translated()
        .filter(|e| !emitted.contains(&e.key))
        .filter_map(|e| match &e.kind {
            EntryKind::Variant { group: g, selector } if g == group => {
                Some((e.key.clone(), item_element(selector, e)))
            }
            _ => None,
        })
        .collect()
}

/// Missing `<string>`s and whole `<plurals>` groups, in dictionary order
fn pending_top_level(
    dictionary: &ResourceDictionary,
    emitted: &HashSet<String>,
    indent: &str,
) -> Vec<(Vec<String>, String)> {
    let mut blocks: Vec<(Vec<String>, String)> = Vec::new();
    let mut groups_done: HashSet<&str> = HashSet::new();

    for entry in dictionary.machine_translated().filter(|e| !emitted.contains(&e.key)) {
        match &entry.kind {
            EntryKind::Simple => blocks.push((vec![entry.key.clone()], string_element(entry))),
            EntryKind::Variant { group, .. } => {
                if !groups_done.insert(group.as_str()) {
                    continue;
                }
                let items = pending_items(dictionary, group, emitted);
                let mut block = format!("<plurals name=\"{}\">", escape(group.as_str()));
                for (_, item) in &items {
                    block.push('\n');
                    block.push_str(indent);
                    block.push_str(indent);
                    block.push_str(item);
                }
                block.push('\n');
                block.push_str(indent);
                block.push_str("</plurals>");
                blocks.push((items.into_iter().map(|(k, _)| k).collect(), block));
            }
        }
    }

    blocks
}

/// Insert child blocks right before a closing tag that is about to be written
///
/// When the output already ends with a newline plus the closing tag's
/// indentation, the children go on their own lines above it; otherwise the
/// layout is created from scratch.
fn insert_before_close<'a>(
    out: &mut String,
    blocks: impl IntoIterator<Item = &'a str>,
    child_indent: &str,
    parent_indent: &str,
) {
    let line_start = out.rfind('\n').map(|i| i + 1);
    let tail_is_blank = line_start.is_some_and(|start| out[start..].chars().all(|c| c == ' ' || c == '\t'));

    if let (true, Some(start)) = (tail_is_blank, line_start) {
        let closing_indent = out.split_off(start);
        for block in blocks {
            out.push_str(child_indent);
            out.push_str(block);
            out.push('\n');
        }
        out.push_str(&closing_indent);
    } else {
        for block in blocks {
            out.push('\n');
            out.push_str(child_indent);
            out.push_str(block);
        }
        out.push('\n');
        out.push_str(parent_indent);
    }
}
