//! Shared XML helpers for the URDF and SRDF readers and writers.

use std::io::BufRead;

use nalgebra::Vector3;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::{Result, UrdfError};

/// Get a required attribute value.
pub(crate) fn get_attribute(e: &BytesStart, name: &'static str) -> Result<String> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == name.as_bytes() {
            return attr
                .unescape_value()
                .map(|v| v.into_owned())
                .map_err(|_| UrdfError::invalid_attribute(name, element_name(e), "invalid text"));
        }
    }
    Err(UrdfError::missing_attribute(name, element_name(e)))
}

/// Get an optional attribute value.
pub(crate) fn get_attribute_opt(e: &BytesStart, name: &str) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == name.as_bytes())
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.into_owned()))
}

/// Parse a float attribute, returning None if not present.
pub(crate) fn parse_float_attr(e: &BytesStart, name: &'static str) -> Result<Option<f64>> {
    get_attribute_opt(e, name)
        .map(|s| {
            s.trim()
                .parse::<f64>()
                .map_err(|_| UrdfError::invalid_attribute(name, element_name(e), format!("expected a number, got '{s}'")))
        })
        .transpose()
}

/// Parse a space-separated vector3 string.
pub(crate) fn parse_vector3(s: &str) -> Result<Vector3<f64>> {
    let parts: Vec<f64> = s
        .split_whitespace()
        .map(str::parse::<f64>)
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|_| UrdfError::XmlParse(format!("invalid vector3: {s}")))?;

    match parts.as_slice() {
        [x, y, z] => Ok(Vector3::new(*x, *y, *z)),
        _ => Err(UrdfError::XmlParse(format!(
            "expected 3 values in vector, got {}: {s}",
            parts.len()
        ))),
    }
}

/// Get element name as string for error messages.
pub(crate) fn element_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.name().as_ref()).to_string()
}

/// Skip an element and all its children.
pub(crate) fn skip_element<R: BufRead>(reader: &mut Reader<R>, name: &[u8]) -> Result<()> {
    let mut buf = Vec::new();
    let mut depth = 1;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.name().as_ref() == name => {
                depth += 1;
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == name => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(UrdfError::XmlParse(e.to_string())),
        }
        buf.clear();
    }

    Ok(())
}

/// Escape text for use inside a double-quoted attribute.
pub(crate) fn escape_attr(s: &str) -> std::borrow::Cow<'_, str> {
    quick_xml::escape::escape(s)
}

/// Indented line writer.
#[derive(Debug, Default)]
pub(crate) struct XmlWriter {
    output: String,
    indent: usize,
}

impl XmlWriter {
    pub(crate) fn new() -> Self {
        Self {
            output: String::with_capacity(4096),
            indent: 0,
        }
    }

    pub(crate) fn write_line(&mut self, line: &str) {
        for _ in 0..self.indent {
            self.output.push_str("  ");
        }
        self.output.push_str(line);
        self.output.push('\n');
    }

    pub(crate) fn open(&mut self, line: &str) {
        self.write_line(line);
        self.indent += 1;
    }

    pub(crate) fn close(&mut self, line: &str) {
        self.indent = self.indent.saturating_sub(1);
        self.write_line(line);
    }

    pub(crate) fn finish(self) -> String {
        self.output
    }
}

/// Format a vector as space-separated values.
pub(crate) fn format_vector3(v: &Vector3<f64>) -> String {
    format!("{} {} {}", v.x, v.y, v.z)
}
