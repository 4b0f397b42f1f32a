//! XML encoding of website documents
//!
//! The on-disk layout is
//!
//! ```xml
//! <website>
//!   <groupSections>
//!     <groupSection>
//!       <title>...</title>
//!       <contentSections>
//!         <contentSection>
//!           <url>...</url>
//!           <title>...</title>
//!           <description>...</description>
//!           <image>...</image>        <!-- optional -->
//!           <hashtags>...</hashtags>  <!-- optional -->
//!         </contentSection>
//!       </contentSections>
//!     </groupSection>
//!   </groupSections>
//! </website>
//! ```
//!
//! The root element may have any name; it is preserved on save.

use quick_xml::{
    Reader,
    escape::escape,
    events::{BytesStart, Event},
    se::Serializer,
};
use serde::Serialize;

use crate::domain::{Config, ContentSection, Document, GroupSection};

const DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Parses a document from its XML encoding.
///
/// Text is kept exactly as written, including surrounding whitespace.
/// Elements the format does not know are skipped wherever they appear.
///
/// # Errors
///
/// Returns an error if the bytes are not UTF-8, are not well-formed XML, or
/// lack an element the format requires, such as the `groupSections`
/// container under the root element.
pub fn parse(bytes: &[u8]) -> Result<Document, ParseError> {
    let text = std::str::from_utf8(bytes)?;
    let mut reader = Reader::from_str(text);
    let config = reader.config_mut();
    config.trim_text(false);
    config.expand_empty_elements = true;

    let root = loop {
        match reader.read_event()? {
            Event::Start(element) => break name(&element),
            Event::Eof => return Err(ParseError::MissingRoot),
            _ => {}
        }
    };

    let mut groups = None;
    children(&mut reader, |reader, child| match child.name().as_ref() {
        b"groupSections" if groups.is_none() => {
            groups = Some(read_groups(reader)?);
            Ok(())
        }
        _ => skip(reader, child),
    })?;

    let groups = groups.ok_or_else(|| ParseError::Structure {
        element: "groupSections",
        parent: root.clone(),
    })?;
    Ok(Document::with_groups(root, groups))
}

/// Renders a document to its XML encoding.
///
/// # Errors
///
/// Returns an error if the document cannot be serialized. This only happens
/// for root names that are not valid XML names.
pub fn render(document: &Document, config: &Config) -> Result<Vec<u8>, RenderError> {
    let mut out = String::new();
    out.push_str(DECLARATION);
    out.push('\n');
    if let Some(href) = config.stylesheet() {
        out.push_str(&format!(
            r#"<?xml-stylesheet type="text/xsl" href="{}"?>"#,
            escape(href)
        ));
        out.push('\n');
    }

    let mut serializer = Serializer::with_root(&mut out, Some(document.root()))?;
    if config.indent() > 0 {
        serializer.indent(' ', config.indent());
    }
    Wire::from(document).serialize(serializer)?;

    out.push('\n');
    Ok(out.into_bytes())
}

type Input<'i> = Reader<&'i [u8]>;

fn name(element: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(element.name().as_ref()).into_owned()
}

/// Feeds each child element of the element just opened to `on_child`, up to
/// and including the closing tag. `on_child` must consume the whole child.
fn children<'i, F>(reader: &mut Input<'i>, mut on_child: F) -> Result<(), ParseError>
where
    F: FnMut(&mut Input<'i>, &BytesStart<'i>) -> Result<(), ParseError>,
{
    loop {
        match reader.read_event()? {
            Event::Start(child) => on_child(reader, &child)?,
            Event::End(_) => return Ok(()),
            Event::Eof => return Err(ParseError::Truncated),
            _ => {}
        }
    }
}

fn skip(reader: &mut Input<'_>, element: &BytesStart<'_>) -> Result<(), ParseError> {
    reader.read_to_end(element.name())?;
    Ok(())
}

/// Reads the text of the element just opened, unescaped and untrimmed.
fn text(reader: &mut Input<'_>) -> Result<String, ParseError> {
    let mut out = String::new();
    loop {
        match reader.read_event()? {
            Event::Text(text) => out.push_str(&text.unescape()?),
            Event::CData(data) => out.push_str(&String::from_utf8_lossy(&data)),
            Event::Start(child) => skip(reader, &child)?,
            Event::End(_) => return Ok(out),
            Event::Eof => return Err(ParseError::Truncated),
            _ => {}
        }
    }
}

fn read_groups(reader: &mut Input<'_>) -> Result<Vec<GroupSection>, ParseError> {
    let mut groups = Vec::new();
    children(reader, |reader, child| match child.name().as_ref() {
        b"groupSection" => {
            groups.push(read_group(reader)?);
            Ok(())
        }
        _ => skip(reader, child),
    })?;
    Ok(groups)
}

fn read_group(reader: &mut Input<'_>) -> Result<GroupSection, ParseError> {
    let mut title = None;
    let mut content = None;
    children(reader, |reader, child| {
        match child.name().as_ref() {
            b"title" if title.is_none() => title = Some(text(reader)?),
            b"contentSections" if content.is_none() => content = Some(read_entries(reader)?),
            _ => skip(reader, child)?,
        }
        Ok(())
    })?;

    Ok(GroupSection {
        title: title.ok_or_else(|| missing("title", "groupSection"))?,
        content: content.unwrap_or_default(),
    })
}

fn read_entries(reader: &mut Input<'_>) -> Result<Vec<ContentSection>, ParseError> {
    let mut entries = Vec::new();
    children(reader, |reader, child| match child.name().as_ref() {
        b"contentSection" => {
            entries.push(read_entry(reader)?);
            Ok(())
        }
        _ => skip(reader, child),
    })?;
    Ok(entries)
}

fn read_entry(reader: &mut Input<'_>) -> Result<ContentSection, ParseError> {
    let mut url = None;
    let mut title = None;
    let mut description = None;
    let mut image = None;
    let mut hashtags = None;
    children(reader, |reader, child| {
        let field = match child.name().as_ref() {
            b"url" => &mut url,
            b"title" => &mut title,
            b"description" => &mut description,
            b"image" => &mut image,
            b"hashtags" => &mut hashtags,
            _ => return skip(reader, child),
        };
        if field.is_some() {
            return skip(reader, child);
        }
        *field = Some(text(reader)?);
        Ok(())
    })?;

    Ok(ContentSection {
        url: url.ok_or_else(|| missing("url", "contentSection"))?,
        title: title.ok_or_else(|| missing("title", "contentSection"))?,
        description: description.ok_or_else(|| missing("description", "contentSection"))?,
        image,
        hashtags,
    })
}

fn missing(element: &'static str, parent: &str) -> ParseError {
    ParseError::Structure {
        element,
        parent: parent.to_string(),
    }
}

/// Errors that can occur when parsing a document.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The document is not valid UTF-8.
    #[error("document is not valid UTF-8")]
    Encoding(#[from] std::str::Utf8Error),

    /// The document is not well-formed XML.
    #[error("malformed XML")]
    Xml(#[from] quick_xml::Error),

    /// The document contains no elements at all.
    #[error("document has no root element")]
    MissingRoot,

    /// The document ends before all elements are closed.
    #[error("document ends inside an element")]
    Truncated,

    /// A required element is missing.
    #[error("missing <{element}> in <{parent}>")]
    Structure {
        /// The element that was expected.
        element: &'static str,
        /// The element it was expected in.
        parent: String,
    },
}

/// A document could not be serialized.
#[derive(Debug, thiserror::Error)]
#[error("failed to render document")]
pub struct RenderError(#[from] quick_xml::SeError);

#[derive(Debug, Serialize)]
struct Wire {
    #[serde(rename = "groupSections")]
    group_sections: WireGroups,
}

#[derive(Debug, Serialize)]
struct WireGroups {
    #[serde(rename = "groupSection")]
    groups: Vec<WireGroup>,
}

#[derive(Debug, Serialize)]
struct WireGroup {
    title: String,
    #[serde(rename = "contentSections")]
    content_sections: WireEntries,
}

#[derive(Debug, Serialize)]
struct WireEntries {
    #[serde(rename = "contentSection")]
    entries: Vec<WireEntry>,
}

#[derive(Debug, Serialize)]
struct WireEntry {
    url: String,
    title: String,
    description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hashtags: Option<String>,
}

impl From<&Document> for Wire {
    fn from(document: &Document) -> Self {
        let groups = document
            .groups()
            .iter()
            .map(|group| WireGroup {
                title: group.title.clone(),
                content_sections: WireEntries {
                    entries: group.content.iter().cloned().map(WireEntry::from).collect(),
                },
            })
            .collect();
        Self {
            group_sections: WireGroups { groups },
        }
    }
}

impl From<ContentSection> for WireEntry {
    fn from(entry: ContentSection) -> Self {
        let ContentSection {
            url,
            title,
            description,
            image,
            hashtags,
        } = entry;
        Self {
            url,
            title,
            description,
            image,
            hashtags,
        }
    }
}
