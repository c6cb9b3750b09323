//! Structural serializer: collection ↔ element tree, and tree ↔ XML text
//! through quick-xml's event reader/writer. Both directions consume the one
//! field map in `model`, which is what keeps the round trip faithful.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::str;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::reader::Reader;
use quick_xml::writer::Writer;

use crate::error::{CatalogError, Result};
use crate::model::{Car, Engine, FIELDS};
use crate::tree::Element;

/// Real values print in shortest form ("204", "1.8"), matching the
/// persisted format.
fn fmt_real(v: f64) -> String {
    v.to_string()
}

/// Builds the canonical persisted tree: `cars` root, one `car` child per
/// record. Cannot fail for a well-formed collection.
pub fn to_tree(cars: &[Car]) -> Element {
    let mut root = Element::new(FIELDS.root);
    for car in cars {
        let mut node = Element::new(FIELDS.record);
        node.children.push(Element::with_text(FIELDS.model, &car.model));
        node.children
            .push(Element::with_text(FIELDS.year, car.year.to_string()));
        let mut engine = Element::new(FIELDS.engine);
        engine.set_attr(FIELDS.engine_model, &car.engine.model);
        engine.children.push(Element::with_text(
            FIELDS.displacement,
            fmt_real(car.engine.displacement),
        ));
        engine.children.push(Element::with_text(
            FIELDS.horse_power,
            fmt_real(car.engine.horse_power),
        ));
        node.children.push(engine);
        root.children.push(node);
    }
    root
}

fn text_child(node: &Element, field: &'static str, index: usize) -> Result<String> {
    node.child(field)
        .map(|c| c.text.clone())
        .ok_or_else(|| CatalogError::schema(index, field))
}

/// Rebuilds the collection from a `cars`/`car` tree. A childless root is an
/// empty collection; a missing or malformed field is a schema mismatch
/// naming the record index and field.
pub fn from_tree(root: &Element) -> Result<Vec<Car>> {
    if root.name != FIELDS.root {
        return Err(CatalogError::schema(0, FIELDS.root));
    }
    let mut cars = Vec::with_capacity(root.children.len());
    for (index, node) in root.children.iter().enumerate() {
        if node.name != FIELDS.record {
            return Err(CatalogError::schema(index, FIELDS.record));
        }
        let model = text_child(node, FIELDS.model, index)?;
        let year: i32 = text_child(node, FIELDS.year, index)?
            .parse()
            .map_err(|_| CatalogError::schema(index, FIELDS.year))?;
        let engine_node = node
            .child(FIELDS.engine)
            .ok_or_else(|| CatalogError::schema(index, FIELDS.engine))?;
        let engine_model = engine_node
            .attr(FIELDS.engine_model)
            .ok_or_else(|| CatalogError::schema(index, FIELDS.engine_model))?
            .to_string();
        let displacement: f64 = text_child(engine_node, FIELDS.displacement, index)?
            .parse()
            .map_err(|_| CatalogError::schema(index, FIELDS.displacement))?;
        let horse_power: f64 = text_child(engine_node, FIELDS.horse_power, index)?
            .parse()
            .map_err(|_| CatalogError::schema(index, FIELDS.horse_power))?;
        cars.push(Car {
            model,
            year,
            engine: Engine {
                displacement,
                horse_power,
                model: engine_model,
            },
        });
    }
    Ok(cars)
}

fn write_element<W: Write>(w: &mut Writer<W>, el: &Element) -> Result<()> {
    let mut start = BytesStart::new(el.name.as_str());
    for (k, v) in &el.attrs {
        start.push_attribute((k.as_str(), v.as_str()));
    }
    if el.children.is_empty() && el.text.is_empty() {
        return w
            .write_event(Event::Empty(start))
            .map_err(CatalogError::xml);
    }
    w.write_event(Event::Start(start)).map_err(CatalogError::xml)?;
    if !el.text.is_empty() {
        w.write_event(Event::Text(BytesText::new(&el.text)))
            .map_err(CatalogError::xml)?;
    }
    for child in &el.children {
        write_element(w, child)?;
    }
    w.write_event(Event::End(BytesEnd::new(el.name.as_str())))
        .map_err(CatalogError::xml)
}

/// Writes one whole document, indented.
pub fn write_document<W: Write>(root: &Element, out: W) -> Result<()> {
    let mut writer = Writer::new_with_indent(out, b' ', 2);
    write_element(&mut writer, root)
}

/// Parses one whole document into an owned tree. Surrounding whitespace in
/// text nodes is trimmed, so the parse inverts `write_document`.
pub fn parse_document<R: BufRead>(input: R) -> Result<Element> {
    let mut reader = Reader::from_reader(input);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event_into(&mut buf).map_err(CatalogError::xml)? {
            Event::Start(e) => {
                stack.push(element_from_start(&e)?);
            }
            Event::Empty(e) => {
                let el = element_from_start(&e)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(el),
                    None => root = Some(el),
                }
            }
            Event::Text(e) => {
                let text = e.decode().map_err(CatalogError::xml)?;
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&text);
                }
            }
            Event::End(_) => {
                let el = stack
                    .pop()
                    .ok_or_else(|| CatalogError::Xml("unbalanced end tag".into()))?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(el),
                    None => root = Some(el),
                }
            }
            Event::Eof => break,
            _ => {} // declarations, comments, processing instructions
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(CatalogError::Xml("unclosed element at end of input".into()));
    }
    root.ok_or_else(|| CatalogError::Xml("document has no root element".into()))
}

fn element_from_start(e: &BytesStart<'_>) -> Result<Element> {
    let name = str::from_utf8(e.name().as_ref())
        .map_err(CatalogError::xml)?
        .to_string();
    let mut el = Element::new(name);
    for attr in e.attributes() {
        let attr = attr.map_err(CatalogError::xml)?;
        let key = str::from_utf8(attr.key.as_ref())
            .map_err(CatalogError::xml)?
            .to_string();
        let value = attr.unescape_value().map_err(CatalogError::xml)?.to_string();
        el.attrs.push((key, value));
    }
    Ok(el)
}

/// Writes the tree to a file. One scoped handle, released on all paths;
/// the document is written whole or the error propagates.
pub fn save(root: &Element, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);
    write_document(root, &mut out)?;
    out.flush()?;
    Ok(())
}

/// Reads and parses a document from a file. One scoped handle.
pub fn load(path: &Path) -> Result<Element> {
    let file = File::open(path)?;
    parse_document(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::seed_cars;

    #[test]
    fn collection_survives_tree_round_trip() {
        let cars = seed_cars();
        let restored = from_tree(&to_tree(&cars)).unwrap();
        assert_eq!(restored, cars);
    }

    #[test]
    fn tree_survives_text_round_trip() {
        let tree = to_tree(&seed_cars());
        let mut text = Vec::new();
        write_document(&tree, &mut text).unwrap();
        let reparsed = parse_document(text.as_slice()).unwrap();
        assert_eq!(reparsed, tree);
    }

    #[test]
    fn childless_root_is_an_empty_collection() {
        let root = Element::new(FIELDS.root);
        assert_eq!(from_tree(&root).unwrap(), vec![]);
    }

    #[test]
    fn missing_engine_is_a_schema_mismatch_with_context() {
        let mut tree = to_tree(&seed_cars());
        tree.children[3].remove_child(FIELDS.engine).unwrap();
        match from_tree(&tree).unwrap_err() {
            CatalogError::SchemaMismatch { index, field } => {
                assert_eq!(index, 3);
                assert_eq!(field, FIELDS.engine);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_numeric_year_is_a_schema_mismatch() {
        let mut tree = to_tree(&seed_cars());
        tree.children[0].child_mut(FIELDS.year).unwrap().text = "MMXII".into();
        assert!(matches!(
            from_tree(&tree),
            Err(CatalogError::SchemaMismatch { index: 0, .. })
        ));
    }

    #[test]
    fn wrong_root_tag_is_rejected() {
        let root = Element::new("garage");
        assert!(from_tree(&root).is_err());
    }

    #[test]
    fn parse_reads_attributes_and_nested_text() {
        let text = r#"<cars>
  <car>
    <model>A6</model>
    <year>2011</year>
    <engine model="TDI">
      <displacement>2</displacement>
      <horsePower>175</horsePower>
    </engine>
  </car>
</cars>"#;
        let tree = parse_document(text.as_bytes()).unwrap();
        let cars = from_tree(&tree).unwrap();
        assert_eq!(cars.len(), 1);
        assert_eq!(cars[0].engine.model, "TDI");
        assert_eq!(cars[0].engine.horse_power, 175.0);
        assert_eq!(cars[0].year, 2011);
    }

    #[test]
    fn unbalanced_document_is_an_xml_error() {
        let text = "<cars><car></cars>";
        assert!(matches!(
            parse_document(text.as_bytes()),
            Err(CatalogError::Xml(_))
        ));
    }
}
