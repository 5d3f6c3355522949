/*!
 * Well-formedness checks for resource files.
 *
 * Used before a file is touched (broken inputs are skipped) and after it is
 * written (corruption is reported, never repaired).
 */

use log::warn;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::path::Path;

use crate::errors::ValidationError;

/// Check that `text` is a single well-formed XML document
pub fn check_str(text: &str, path: &Path) -> Result<(), ValidationError> {
    let malformed = |message: String| ValidationError::Malformed {
        path: path.to_path_buf(),
        message,
    };

    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(false);

    let mut depth = 0usize;
    let mut roots = 0usize;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| malformed(format!("at byte {}: {}", reader.buffer_position(), e)))?;

        match event {
            Event::Start(e) => {
                check_attributes(&e).map_err(malformed)?;
                if depth == 0 {
                    roots += 1;
                }
                depth += 1;
            }
            Event::Empty(e) => {
                check_attributes(&e).map_err(malformed)?;
                if depth == 0 {
                    roots += 1;
                }
            }
            Event::End(_) => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| malformed("closing tag without matching opening tag".to_string()))?;
            }
            Event::Text(t) => {
                let text = t
                    .unescape()
                    .map_err(|e| malformed(format!("at byte {}: {}", reader.buffer_position(), e)))?;
                if depth == 0 && !text.trim_start_matches('\u{feff}').trim().is_empty() {
                    return Err(malformed("text outside the root element".to_string()));
                }
            }
            Event::CData(_) if depth == 0 => {
                return Err(malformed("CDATA outside the root element".to_string()));
            }
            Event::Eof => break,
            _ => {}
        }

        if roots > 1 {
            return Err(ValidationError::MultipleRoots {
                path: path.to_path_buf(),
            });
        }
    }

    if depth > 0 {
        return Err(malformed(format!("{} unclosed element(s) at end of file", depth)));
    }
    if roots == 0 {
        return Err(ValidationError::MissingRoot {
            path: path.to_path_buf(),
        });
    }

    Ok(())
}

// @checks: Attribute syntax, duplicates and entity references in values
fn check_attributes(e: &BytesStart) -> Result<(), String> {
    let tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    for attribute in e.attributes() {
        let attribute = attribute.map_err(|err| format!("in <{}>: {}", tag, err))?;
        attribute
            .unescape_value()
            .map_err(|err| format!("in <{}>: {}", tag, err))?;
    }
    Ok(())
}

/// Read `path` as UTF-8 and check it
pub fn check_file(path: &Path) -> Result<(), ValidationError> {
    let text = std::fs::read_to_string(path).map_err(|e| ValidationError::Unreadable {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    check_str(&text, path)
}

/// Boolean form of [`check_file`]; failures are logged as warnings
pub fn is_well_formed(path: &Path) -> bool {
    match check_file(path) {
        Ok(()) => true,
        Err(e) => {
            warn!("{}", e);
            false
        }
    }
}
