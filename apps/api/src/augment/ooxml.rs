//! Streaming edits of WordprocessingML parts with `quick-xml`.
//!
//! Events are copied through as read. Elements are matched by local name
//! inside the WordprocessingML namespace, so whatever prefix the part binds to
//! it (`w:`, `ns0:`, a default namespace) is found and reused for new content.

use std::io::Cursor;

use quick_xml::escape::escape;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;
use quick_xml::Writer;
use tracing::debug;

use crate::errors::AnalysisError;

pub const WORDPROCESSING_NS: &[u8] =
    b"http://schemas.openxmlformats.org/wordprocessingml/2006/main";
pub const HEADING_STYLE_ID: &str = "Heading1";
const SECTION_HEADING: &str = "Skills";

type XmlWriter = Writer<Cursor<Vec<u8>>>;

/// Rewrites `document.xml` with a `Heading1` "Skills" paragraph and one
/// paragraph per skill as the last content of the body, ahead of the body's
/// own `sectPr`. Paragraph-level `sectPr` elements are not body children and
/// are left where they are.
pub fn insert_skills_section(xml: &str, skills: &[String]) -> Result<Vec<u8>, AnalysisError> {
    let mut reader = NsReader::from_str(xml);
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    let mut depth = 0usize;
    // depth and prefix of the body element once seen
    let mut body: Option<(usize, String)> = None;
    let mut inserted = false;

    loop {
        let (wordml, event) = {
            let (ns, event) = reader.read_resolved_event().map_err(xml_error)?;
            (in_wordprocessing_ns(&ns), event)
        };

        match &event {
            Event::Eof => break,
            Event::Start(e) => {
                if wordml && body.is_none() && e.local_name().as_ref() == b"body" {
                    body = Some((depth, prefix_of(e)));
                } else if let Some((body_depth, prefix)) = &body {
                    if !inserted
                        && wordml
                        && depth == body_depth + 1
                        && e.local_name().as_ref() == b"sectPr"
                    {
                        write_skills_section(&mut writer, prefix, skills)?;
                        inserted = true;
                    }
                }
                depth += 1;
            }
            Event::Empty(e) => {
                if wordml && body.is_none() && e.local_name().as_ref() == b"body" {
                    // <w:body/>: open it so the section has somewhere to go
                    let prefix = prefix_of(e);
                    write(&mut writer, Event::Start(e.clone()))?;
                    write_skills_section(&mut writer, &prefix, skills)?;
                    write(&mut writer, Event::End(e.to_end()))?;
                    body = Some((depth, prefix));
                    inserted = true;
                    continue;
                }
                if let Some((body_depth, prefix)) = &body {
                    if !inserted
                        && wordml
                        && depth == body_depth + 1
                        && e.local_name().as_ref() == b"sectPr"
                    {
                        write_skills_section(&mut writer, prefix, skills)?;
                        inserted = true;
                    }
                }
            }
            Event::End(e) => {
                depth = depth.saturating_sub(1);
                if let Some((body_depth, prefix)) = &body {
                    if !inserted
                        && wordml
                        && depth == *body_depth
                        && e.local_name().as_ref() == b"body"
                    {
                        write_skills_section(&mut writer, prefix, skills)?;
                        inserted = true;
                    }
                }
            }
            _ => {}
        }

        write(&mut writer, event)?;
    }

    if body.is_none() || !inserted {
        return Err(AnalysisError::MalformedDocument {
            format: "docx",
            reason: "document part has no body element".to_string(),
        });
    }

    debug!(skills = skills.len(), "Skills section written into document body");
    Ok(writer.into_inner().into_inner())
}

/// Returns a rewritten `styles.xml` carrying a `Heading1` paragraph style,
/// or `None` when the part already defines one.
pub fn ensure_heading_style(xml: &str) -> Result<Option<Vec<u8>>, AnalysisError> {
    if has_heading_style(xml)? {
        return Ok(None);
    }

    let mut reader = NsReader::from_str(xml);
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    let mut depth = 0usize;
    let mut root_prefix: Option<String> = None;
    let mut added = false;

    loop {
        let (wordml, event) = {
            let (ns, event) = reader.read_resolved_event().map_err(xml_error)?;
            (in_wordprocessing_ns(&ns), event)
        };

        match &event {
            Event::Eof => break,
            Event::Start(e) => {
                if depth == 0 && wordml && e.local_name().as_ref() == b"styles" {
                    root_prefix = Some(prefix_of(e));
                }
                depth += 1;
            }
            Event::Empty(e) if depth == 0 && wordml && e.local_name().as_ref() == b"styles" => {
                let prefix = prefix_of(e);
                write(&mut writer, Event::Start(e.clone()))?;
                write_heading_style(&mut writer, &prefix)?;
                write(&mut writer, Event::End(e.to_end()))?;
                added = true;
                continue;
            }
            Event::End(e) => {
                depth = depth.saturating_sub(1);
                if let Some(prefix) = &root_prefix {
                    if depth == 0 && !added && wordml && e.local_name().as_ref() == b"styles" {
                        write_heading_style(&mut writer, prefix)?;
                        added = true;
                    }
                }
            }
            _ => {}
        }

        write(&mut writer, event)?;
    }

    if !added {
        // not a styles part we understand; leave it alone
        return Ok(None);
    }
    Ok(Some(writer.into_inner().into_inner()))
}

fn has_heading_style(xml: &str) -> Result<bool, AnalysisError> {
    let mut reader = NsReader::from_str(xml);
    loop {
        let (wordml, event) = {
            let (ns, event) = reader.read_resolved_event().map_err(xml_error)?;
            (in_wordprocessing_ns(&ns), event)
        };
        match event {
            Event::Eof => return Ok(false),
            Event::Start(e) | Event::Empty(e) if wordml && e.local_name().as_ref() == b"style" => {
                for attr in e.attributes() {
                    let attr = attr.map_err(xml_error)?;
                    if attr.key.local_name().as_ref() == b"styleId"
                        && attr.value.as_ref() == HEADING_STYLE_ID.as_bytes()
                    {
                        return Ok(true);
                    }
                }
            }
            _ => {}
        }
    }
}

fn write_skills_section(
    writer: &mut XmlWriter,
    prefix: &str,
    skills: &[String],
) -> Result<(), AnalysisError> {
    let mut out = Emitter { writer, prefix };

    out.start("p", &[])?;
    out.start("pPr", &[])?;
    out.empty("pStyle", &[("val", HEADING_STYLE_ID)])?;
    out.end("pPr")?;
    out.start("r", &[])?;
    out.start("t", &[])?;
    out.text(SECTION_HEADING)?;
    out.end("t")?;
    out.end("r")?;
    out.end("p")?;

    for skill in skills {
        out.start("p", &[])?;
        out.start("r", &[])?;
        out.start("t", &[("xml:space", "preserve")])?;
        out.text(skill)?;
        out.end("t")?;
        out.end("r")?;
        out.end("p")?;
    }
    Ok(())
}

fn write_heading_style(writer: &mut XmlWriter, prefix: &str) -> Result<(), AnalysisError> {
    let mut out = Emitter { writer, prefix };

    out.start("style", &[("type", "paragraph"), ("styleId", HEADING_STYLE_ID)])?;
    out.empty("name", &[("val", "heading 1")])?;
    out.empty("basedOn", &[("val", "Normal")])?;
    out.empty("next", &[("val", "Normal")])?;
    out.empty("qFormat", &[])?;
    out.start("pPr", &[])?;
    out.empty("keepNext", &[])?;
    out.empty("spacing", &[("before", "240"), ("after", "0")])?;
    out.empty("outlineLvl", &[("val", "0")])?;
    out.end("pPr")?;
    out.start("rPr", &[])?;
    out.empty("b", &[])?;
    out.empty("sz", &[("val", "32")])?;
    out.end("rPr")?;
    out.end("style")
}

/// Writes WordprocessingML elements under the part's own prefix.
struct Emitter<'a> {
    writer: &'a mut XmlWriter,
    prefix: &'a str,
}

impl Emitter<'_> {
    fn qualify(&self, local: &str) -> String {
        if self.prefix.is_empty() || local.contains(':') {
            local.to_string()
        } else {
            format!("{}:{local}", self.prefix)
        }
    }

    fn tag(&self, local: &str, attrs: &[(&str, &str)]) -> BytesStart<'static> {
        let mut start = BytesStart::new(self.qualify(local));
        for (key, value) in attrs {
            start.push_attribute((self.qualify(key).as_str(), *value));
        }
        start
    }

    fn start(&mut self, local: &str, attrs: &[(&str, &str)]) -> Result<(), AnalysisError> {
        let tag = self.tag(local, attrs);
        write(self.writer, Event::Start(tag))
    }

    fn empty(&mut self, local: &str, attrs: &[(&str, &str)]) -> Result<(), AnalysisError> {
        let tag = self.tag(local, attrs);
        write(self.writer, Event::Empty(tag))
    }

    fn end(&mut self, local: &str) -> Result<(), AnalysisError> {
        let name = self.qualify(local);
        write(self.writer, Event::End(BytesEnd::new(name)))
    }

    fn text(&mut self, text: &str) -> Result<(), AnalysisError> {
        write(self.writer, Event::Text(BytesText::from_escaped(escape(text))))
    }
}

fn write(writer: &mut XmlWriter, event: Event<'_>) -> Result<(), AnalysisError> {
    writer.write_event(event).map_err(xml_error)
}

fn in_wordprocessing_ns(ns: &ResolveResult) -> bool {
    matches!(ns, ResolveResult::Bound(Namespace(uri)) if *uri == WORDPROCESSING_NS)
}

fn prefix_of(start: &BytesStart) -> String {
    start
        .name()
        .prefix()
        .map(|p| String::from_utf8_lossy(p.as_ref()).into_owned())
        .unwrap_or_default()
}

fn xml_error(e: impl std::fmt::Display) -> AnalysisError {
    AnalysisError::MalformedDocument {
        format: "docx",
        reason: format!("invalid XML: {e}"),
    }
}
