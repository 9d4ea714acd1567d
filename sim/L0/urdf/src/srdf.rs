//! Semantic robot descriptions (SRDF).
//!
//! Only the part the planner consumes is modelled: pairs of links whose
//! collisions are ignored.

use std::io::BufRead;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::{Result, UrdfError};
use crate::xml::{XmlWriter, escape_attr, get_attribute, get_attribute_opt, skip_element};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A `<disable_collisions>` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisabledCollision {
    /// First link.
    pub link1: String,
    /// Second link.
    pub link2: String,
    /// Free-form reason, e.g. `"Adjacent"`.
    pub reason: String,
}

impl DisabledCollision {
    /// Create an entry.
    pub fn new(
        link1: impl Into<String>,
        link2: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            link1: link1.into(),
            link2: link2.into(),
            reason: reason.into(),
        }
    }
}

/// Parsed SRDF document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SrdfRobot {
    /// Robot name.
    pub name: String,
    /// Link pairs excluded from collision checking.
    pub disabled_collisions: Vec<DisabledCollision>,
}

impl SrdfRobot {
    /// Create an empty description.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            disabled_collisions: Vec::new(),
        }
    }

    /// Add a disabled pair.
    #[must_use]
    pub fn with_disabled_collision(mut self, entry: DisabledCollision) -> Self {
        self.disabled_collisions.push(entry);
        self
    }
}

/// Parse an SRDF string.
///
/// An empty string is accepted and yields an unnamed description with no
/// entries. Groups, end effectors and other semantic elements are skipped.
pub fn parse_srdf_str(xml: &str) -> Result<SrdfRobot> {
    if xml.trim().is_empty() {
        return Ok(SrdfRobot::default());
    }

    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut robot: Option<SrdfRobot> = None;
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"robot" => {
                robot = Some(parse_robot(&mut reader, e)?);
            }
            Ok(Event::Empty(ref e)) if e.name().as_ref() == b"robot" => {
                robot = Some(SrdfRobot::new(get_attribute_opt(e, "name").unwrap_or_default()));
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(UrdfError::XmlParse(e.to_string())),
        }
        buf.clear();
    }

    robot.ok_or_else(|| UrdfError::missing_element("robot", "SRDF document"))
}

fn parse_robot<R: BufRead>(reader: &mut Reader<R>, start: &BytesStart) -> Result<SrdfRobot> {
    let mut robot = SrdfRobot::new(get_attribute_opt(start, "name").unwrap_or_default());
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(ref e)) if e.name().as_ref() == b"disable_collisions" => {
                robot.disabled_collisions.push(parse_disabled(e)?);
            }
            Ok(Event::Start(ref e)) => {
                let elem_name = e.name().as_ref().to_vec();
                if elem_name == b"disable_collisions" {
                    robot.disabled_collisions.push(parse_disabled(e)?);
                }
                skip_element(reader, &elem_name)?;
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == b"robot" => break,
            Ok(Event::Eof) => return Err(UrdfError::XmlParse("unexpected EOF in robot".into())),
            Ok(_) => {}
            Err(e) => return Err(UrdfError::XmlParse(e.to_string())),
        }
        buf.clear();
    }

    Ok(robot)
}

fn parse_disabled(e: &BytesStart) -> Result<DisabledCollision> {
    Ok(DisabledCollision {
        link1: get_attribute(e, "link1")?,
        link2: get_attribute(e, "link2")?,
        reason: get_attribute_opt(e, "reason").unwrap_or_default(),
    })
}

/// Serialize an SRDF description.
#[must_use]
pub fn write_srdf(robot: &SrdfRobot) -> String {
    let mut w = XmlWriter::new();
    w.write_line(r#"<?xml version="1.0"?>"#);
    w.open(&format!(r#"<robot name="{}">"#, escape_attr(&robot.name)));
    for entry in &robot.disabled_collisions {
        w.write_line(&format!(
            r#"<disable_collisions link1="{}" link2="{}" reason="{}"/>"#,
            escape_attr(&entry.link1),
            escape_attr(&entry.link2),
            escape_attr(&entry.reason)
        ));
    }
    w.close("</robot>");
    w.finish()
}
