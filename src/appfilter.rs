//! Parsing of `appfilter.xml` filter declarations.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::warn;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::models::FilterDeclaration;

/// Location of the filter document relative to the extracted archive root.
pub const APPFILTER_RELATIVE_PATH: &str = "assets/appfilter.xml";

const ITEM_ELEMENT: &[u8] = b"item";
const DRAWABLE_PREFIX: &str = "@drawable/";
const COMPONENT_PREFIX: &str = "ComponentInfo{";

/// Load the filter declaration, treating a missing or broken document as empty.
pub fn load_filter_declaration(path: &Path) -> FilterDeclaration {
    if !path.is_file() {
        return FilterDeclaration::default();
    }

    let parsed = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))
        .and_then(|xml| parse_filter_declaration(&xml));
    match parsed {
        Ok(declaration) => declaration,
        Err(err) => {
            warn!("ignoring filter declaration: {err:#}");
            FilterDeclaration::default()
        }
    }
}

/// Parse the `item` children of the document root into package/drawable pairs.
pub fn parse_filter_declaration(xml: &str) -> Result<FilterDeclaration> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut declaration = FilterDeclaration::default();
    let mut depth = 0usize;

    loop {
        match reader
            .read_event()
            .with_context(|| format!("malformed XML at byte {}", reader.buffer_position()))?
        {
            Event::Start(start) => {
                if depth == 1 {
                    read_item(&reader, &start, &mut declaration)?;
                }
                depth += 1;
            }
            Event::Empty(start) => {
                if depth == 1 {
                    read_item(&reader, &start, &mut declaration)?;
                }
            }
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(declaration)
}

fn read_item(
    reader: &Reader<&[u8]>,
    start: &BytesStart<'_>,
    declaration: &mut FilterDeclaration,
) -> Result<()> {
    if start.local_name().as_ref() != ITEM_ELEMENT {
        return Ok(());
    }

    let mut drawable = None;
    let mut component = None;
    for attr in start.attributes() {
        let attr = attr?;
        let value = attr.decode_and_unescape_value(reader.decoder())?;
        match attr.key.as_ref() {
            b"drawable" => drawable = Some(value.into_owned()),
            b"component" => component = Some(value.into_owned()),
            _ => {}
        }
    }

    let (Some(drawable), Some(component)) = (drawable, component) else {
        return Ok(());
    };
    let resource = drawable_resource_name(&drawable);
    let package = component_package(&component);
    if resource.is_empty() || package.is_empty() {
        return Ok(());
    }

    declaration.insert(package, resource);
    Ok(())
}

/// Resource name of a `drawable` attribute, without the `@drawable/` prefix.
pub fn drawable_resource_name(raw: &str) -> &str {
    let trimmed = raw.trim();
    let name = trimmed.strip_prefix(DRAWABLE_PREFIX).unwrap_or(trimmed);
    name.rsplit('/').next().unwrap_or(name).trim()
}

/// Package name of a `ComponentInfo{package/class}` attribute.
pub fn component_package(raw: &str) -> &str {
    let trimmed = raw.trim();
    let inner = trimmed.strip_prefix(COMPONENT_PREFIX).unwrap_or(trimmed);
    let inner = inner.strip_suffix('}').unwrap_or(inner);
    inner.split('/').next().unwrap_or(inner).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn strips_drawable_prefix() {
        assert_eq!(drawable_resource_name("@drawable/firefox"), "firefox");
        assert_eq!(drawable_resource_name(" firefox_alt "), "firefox_alt");
    }

    #[test]
    fn extracts_package_from_component() {
        assert_eq!(
            component_package("ComponentInfo{org.mozilla.firefox/org.mozilla.gecko.App}"),
            "org.mozilla.firefox"
        );
        assert_eq!(component_package("ComponentInfo{com.foo.bar}"), "com.foo.bar");
        assert_eq!(component_package(":CALENDAR"), ":CALENDAR");
    }

    #[test]
    fn parses_items_and_collapses_duplicates() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<resources>
    <!-- Browsers -->
    <item component="ComponentInfo{org.mozilla.firefox/org.mozilla.gecko.App}" drawable="firefox" />
    <item component="ComponentInfo{org.mozilla.firefox/org.mozilla.fenix.App}" drawable="@drawable/firefox" />
    <item component="ComponentInfo{org.mozilla.firefox/org.mozilla.Other}" drawable="firefox_nightly" />
    <item component="ComponentInfo{com.foo.bar/com.foo.bar.Main}" drawable="foo&amp;bar"></item>
    <item drawable="orphan" />
    <calendar prefix="calendar_" />
</resources>"#;

        let declaration = parse_filter_declaration(xml).expect("document should parse");

        assert_eq!(declaration.len(), 2);
        assert_eq!(
            declaration.drawables("org.mozilla.firefox"),
            Some(&["firefox".to_string(), "firefox_nightly".to_string()][..])
        );
        assert_eq!(
            declaration.drawables("com.foo.bar"),
            Some(&["foo&bar".to_string()][..])
        );
    }

    #[test]
    fn ignores_nested_items() {
        let xml = r#"<resources><group><item component="ComponentInfo{a.b/c}" drawable="x"/></group></resources>"#;
        let declaration = parse_filter_declaration(xml).expect("document should parse");
        assert!(declaration.is_empty());
    }

    #[test]
    fn missing_or_broken_document_degrades_to_empty() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("appfilter.xml");
        assert!(load_filter_declaration(&path).is_empty());

        fs::write(&path, "<resources><item drawable=\"a\" component=\"b\"></resources>").unwrap();
        assert!(load_filter_declaration(&path).is_empty());
    }
}
