//! Support for XML string-resource documents.
//!
//! A document is a `<resources>` root holding `<string name="…">text</string>`
//! children. The format is flat: nested structure only lives inside the path
//! strings carried by the `name` attribute. Element order is preserved in both
//! directions, and duplicate names are kept as separate entries.

use quick_xml::{
    Reader, Writer,
    events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use std::io::{BufRead, Write};

use crate::{
    error::Error,
    flat::{FlatMap, FlatValue},
    traits::Parser,
};

const ROOT_TAG: &str = "resources";
const STRING_TAG: &str = "string";
const CDATA_END: &str = "]]>";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Format {
    pub strings: Vec<StringResource>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringResource {
    pub name: String,
    pub value: String,
}

impl StringResource {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        StringResource {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl Format {
    /// Entries as path/leaf pairs in document order.
    pub fn entries(&self, infer_scalars: bool) -> impl Iterator<Item = (String, FlatValue)> + '_ {
        self.strings.iter().map(move |sr| {
            (sr.name.clone(), FlatValue::from_text(&sr.value, infer_scalars))
        })
    }

    /// Name → value lookup; later elements win on duplicate names.
    pub fn to_flat_map(&self, infer_scalars: bool) -> FlatMap {
        self.entries(infer_scalars).collect()
    }

    /// Builds a document from path/leaf pairs, rendering leaves as cell text.
    pub fn from_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, FlatValue)>,
        K: Into<String>,
    {
        Format {
            strings: entries
                .into_iter()
                .map(|(name, value)| StringResource::new(name, value.to_string()))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl Parser for Format {
    /// Parse from any reader.
    ///
    /// Only `<string>` elements directly under a `<resources>` root are
    /// collected; a document without them parses to an empty [`Format`].
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.config_mut().trim_text(false);

        let mut buf = Vec::new();
        let mut depth = 0usize;
        let mut in_root = false;
        let mut strings = Vec::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    let tag = e.name();
                    if depth == 0 && tag.as_ref() == ROOT_TAG.as_bytes() {
                        in_root = true;
                    } else if in_root && depth == 1 && tag.as_ref() == STRING_TAG.as_bytes() {
                        let name = read_name(e)?;
                        let value = read_text(&mut xml_reader)?;
                        strings.push(StringResource { name, value });
                        // read_text consumed the matching end tag
                        buf.clear();
                        continue;
                    }
                    depth += 1;
                }
                Ok(Event::Empty(ref e))
                    if in_root && depth == 1 && e.name().as_ref() == STRING_TAG.as_bytes() =>
                {
                    strings.push(StringResource {
                        name: read_name(e)?,
                        value: String::new(),
                    });
                }
                Ok(Event::End(_)) => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        in_root = false;
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => return Err(Error::XmlParse(e)),
            }
            buf.clear();
        }
        Ok(Format { strings })
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut xml_writer = Writer::new(&mut writer);

        xml_writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;

        xml_writer.write_event(Event::Start(BytesStart::new(ROOT_TAG)))?;
        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;

        for sr in &self.strings {
            let mut elem = BytesStart::new(STRING_TAG);
            elem.push_attribute(("name", sr.name.as_str()));

            xml_writer.write_event(Event::Text(BytesText::new("  ")))?;
            xml_writer.write_event(Event::Start(elem))?;
            if needs_cdata(&sr.value) {
                for section in cdata_sections(&sr.value) {
                    xml_writer.write_event(Event::CData(BytesCData::new(section)))?;
                }
            } else {
                xml_writer.write_event(Event::Text(BytesText::new(&sr.value)))?;
            }
            xml_writer.write_event(Event::End(BytesEnd::new(STRING_TAG)))?;
            xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
        }

        xml_writer.write_event(Event::End(BytesEnd::new(ROOT_TAG)))?;
        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
        Ok(())
    }
}

fn read_name(e: &BytesStart) -> Result<String, Error> {
    for attr in e.attributes().with_checks(false) {
        let attr = attr.map_err(|e| Error::DataMismatch(e.to_string()))?;
        if attr.key.as_ref() == b"name" {
            return Ok(attr.unescape_value()?.to_string());
        }
    }
    Err(Error::InvalidResource("string tag missing 'name'".to_string()))
}

/// Collects the character data of the current element up to its end tag.
///
/// Text, entity references and CDATA sections are concatenated; markup of
/// nested elements is dropped but their text is kept.
fn read_text<R: BufRead>(xml_reader: &mut Reader<R>) -> Result<String, Error> {
    let mut buf = Vec::new();
    let mut value = String::new();
    let mut nested = 0usize;
    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Text(e)) => value.push_str(&e.unescape()?),
            Ok(Event::CData(e)) => {
                let text = std::str::from_utf8(&e)
                    .map_err(|err| Error::DataMismatch(format!("CDATA is not UTF-8: {}", err)))?;
                value.push_str(text);
            }
            Ok(Event::Start(_)) => nested += 1,
            Ok(Event::End(_)) if nested == 0 => break,
            Ok(Event::End(_)) => nested -= 1,
            Ok(Event::Eof) => return Err(Error::InvalidResource("Unexpected EOF".to_string())),
            Ok(_) => (),
            Err(e) => return Err(Error::XmlParse(e)),
        }
        buf.clear();
    }
    Ok(value)
}

fn needs_cdata(text: &str) -> bool {
    text.contains(['&', '<', '>'])
}

/// Splits `text` into CDATA section bodies so that no body contains `]]>`.
fn cdata_sections(text: &str) -> Vec<String> {
    let parts: Vec<&str> = text.split(CDATA_END).collect();
    let last = parts.len() - 1;
    parts
        .iter()
        .enumerate()
        .map(|(i, part)| {
            let mut section = String::new();
            if i > 0 {
                section.push('>');
            }
            section.push_str(part);
            if i < last {
                section.push_str("]]");
            }
            section
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Parser;
    use indoc::indoc;

    fn render(format: &Format) -> String {
        let mut out = Vec::new();
        format.to_writer(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_basic_resources() {
        let xml = indoc! {r#"
            <?xml version="1.0" encoding="utf-8"?>
            <resources>
                <string name="app_name">Demo</string>
                <string name="greeting">Hello &amp; welcome</string>
                <string name="empty"></string>
                <string name="self_closing"/>
            </resources>
        "#};
        let format = Format::from_str(xml).unwrap();
        assert_eq!(
            format.strings,
            vec![
                StringResource::new("app_name", "Demo"),
                StringResource::new("greeting", "Hello & welcome"),
                StringResource::new("empty", ""),
                StringResource::new("self_closing", ""),
            ]
        );
    }

    #[test]
    fn test_parse_cdata_and_mixed_text() {
        let xml = r#"<resources><string name="html"><![CDATA[<b>Bold</b>]]> &lt;3</string></resources>"#;
        let format = Format::from_str(xml).unwrap();
        assert_eq!(format.strings[0].value, "<b>Bold</b> <3");
    }

    #[test]
    fn test_parse_keeps_text_of_nested_markup() {
        let xml = r#"<resources><string name="styled">Tap <b>here</b> now</string></resources>"#;
        let format = Format::from_str(xml).unwrap();
        assert_eq!(format.strings, vec![StringResource::new("styled", "Tap here now")]);
    }

    #[test]
    fn test_parse_preserves_whitespace_and_order() {
        let xml = r#"<resources><string name="b"> padded </string><string name="a">x</string></resources>"#;
        let format = Format::from_str(xml).unwrap();
        assert_eq!(format.strings[0], StringResource::new("b", " padded "));
        assert_eq!(format.strings[1].name, "a");
    }

    #[test]
    fn test_parse_ignores_other_elements() {
        let xml = indoc! {r#"
            <resources>
                <string name="hello">Hello</string>
                <plurals name="apples">
                    <item quantity="one">One apple</item>
                </plurals>
            </resources>
        "#};
        let format = Format::from_str(xml).unwrap();
        assert_eq!(format.strings.len(), 1);
        assert_eq!(format.strings[0].name, "hello");
    }

    #[test]
    fn test_parse_without_root_is_empty() {
        let format = Format::from_str(r#"<strings><string name="a">x</string></strings>"#).unwrap();
        assert!(format.is_empty());
        assert!(Format::from_str("<resources/>").unwrap().is_empty());
    }

    #[test]
    fn test_missing_name_attribute() {
        let result = Format::from_str("<resources><string>No name attr</string></resources>");
        let err = format!("{:?}", result.unwrap_err());
        assert!(err.contains("missing 'name'"));
    }

    #[test]
    fn test_malformed_xml() {
        let result = Format::from_str("<resources><string name=\"a\">x</resources>");
        assert!(result.is_err());
    }

    #[test]
    fn test_write_document() {
        let format = Format {
            strings: vec![
                StringResource::new("app_name", "Demo"),
                StringResource::new("menu.items[0]", "Open"),
            ],
        };
        let expected = indoc! {r#"
            <?xml version="1.0" encoding="UTF-8" standalone="yes"?>
            <resources>
              <string name="app_name">Demo</string>
              <string name="menu.items[0]">Open</string>
            </resources>
        "#};
        assert_eq!(render(&format), expected);
    }

    #[test]
    fn test_write_uses_cdata_for_markup() {
        let format = Format {
            strings: vec![StringResource::new("html", "<b>Bold</b> & more")],
        };
        let out = render(&format);
        assert!(out.contains(r#"<string name="html"><![CDATA[<b>Bold</b> & more]]></string>"#));
    }

    #[test]
    fn test_cdata_sections_split_terminator() {
        assert_eq!(cdata_sections("a]]>b"), vec!["a]]".to_string(), ">b".to_string()]);
        assert_eq!(cdata_sections("plain"), vec!["plain".to_string()]);
    }

    #[test]
    fn test_round_trip_tricky_values() {
        let format = Format {
            strings: vec![
                StringResource::new("quote", "say \"hi\""),
                StringResource::new("cdata_end", "x < y ]]> z"),
                StringResource::new("amp&name", "Tom & Jerry"),
            ],
        };
        let reparsed = Format::from_str(&render(&format)).unwrap();
        assert_eq!(format, reparsed);
    }

    #[test]
    fn test_entries_and_flat_map() {
        let format = Format {
            strings: vec![
                StringResource::new("a", "1"),
                StringResource::new("b", "{}"),
                StringResource::new("a", "2"),
            ],
        };
        assert_eq!(format.entries(false).count(), 3);
        let flat = format.to_flat_map(false);
        assert_eq!(flat.len(), 2);
        assert_eq!(flat.get("a"), Some(&FlatValue::from("2")));
        assert_eq!(flat.get("b"), Some(&FlatValue::EmptyMapping));
    }

    #[test]
    fn test_from_entries_renders_cell_text() {
        let format = Format::from_entries([("list", FlatValue::EmptySequence), ("n", FlatValue::Null)]);
        assert_eq!(
            format.strings,
            vec![StringResource::new("list", "[]"), StringResource::new("n", "null")]
        );
    }
}
