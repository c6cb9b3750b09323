//! Operations on the serialized tree itself, expressed as document-order
//! tree queries rather than object-graph traversal.

use ahash::AHashSet;

use crate::error::{CatalogError, Result};
use crate::model::{Car, DIESEL_ENGINE_CODE, FIELDS};
use crate::tree::Element;
use crate::xml;

const XSI_URI: &str = "http://www.w3.org/2001/XMLSchema-instance";
const XSD_URI: &str = "http://www.w3.org/2001/XMLSchema";

/// Mean `horsePower` over every engine whose `model` attribute is not
/// "TDI". Selection follows document order; an absent attribute counts as
/// non-diesel. Zero matching engines is an empty-group failure, not NaN.
pub fn average_non_diesel_horsepower(root: &Element) -> Result<f64> {
    let engines = root.select(&|el| {
        el.name == FIELDS.engine && el.attr(FIELDS.engine_model) != Some(DIESEL_ENGINE_CODE)
    });
    if engines.is_empty() {
        return Err(CatalogError::EmptyGroup);
    }
    let mut sum = 0.0;
    for (index, engine) in engines.iter().enumerate() {
        let hp: f64 = engine
            .child(FIELDS.horse_power)
            .and_then(|c| c.text.parse().ok())
            .ok_or_else(|| CatalogError::schema(index, FIELDS.horse_power))?;
        sum += hp;
    }
    Ok(sum / engines.len() as f64)
}

/// First-wins filter on the `model` child text: keeps the earliest `car`
/// node (document order) for each distinct model, drops the rest. Root
/// name and attributes carry over. Applying it to its own output is a
/// no-op.
pub fn deduplicate_by_model(root: &Element) -> Result<Element> {
    let mut seen: AHashSet<String> = AHashSet::new();
    let mut out = Element::new(root.name.clone());
    out.attrs = root.attrs.clone();
    for (index, node) in root.children.iter().enumerate() {
        let model = node
            .child(FIELDS.model)
            .map(|c| c.text.as_str())
            .ok_or_else(|| CatalogError::schema(index, FIELDS.model))?;
        if seen.insert(model.to_string()) {
            out.children.push(node.clone());
        }
    }
    Ok(out)
}

/// In-place edit over every `car` node: the `year` child is removed and its
/// value re-attached as an attribute on `model`, and the engine's
/// `horsePower` child is renamed to `hp`. All-or-nothing: the transform
/// runs against a fresh child list, and the tree is only replaced once
/// every record converted, so a failure leaves the input untouched.
pub fn renumber(root: &mut Element) -> Result<()> {
    let mut updated = Vec::with_capacity(root.children.len());
    for (index, node) in root.children.iter().enumerate() {
        let mut car = node.clone();
        let year = car
            .remove_child(FIELDS.year)
            .ok_or_else(|| CatalogError::schema(index, FIELDS.year))?;
        let model = car
            .child_mut(FIELDS.model)
            .ok_or_else(|| CatalogError::schema(index, FIELDS.model))?;
        model.set_attr(FIELDS.year_attr, year.text);
        let hp = car
            .child_mut(FIELDS.engine)
            .and_then(|e| e.child_mut(FIELDS.horse_power))
            .ok_or_else(|| CatalogError::schema(index, FIELDS.horse_power))?;
        hp.name = FIELDS.hp.to_string();
        updated.push(car);
    }
    root.children = updated;
    Ok(())
}

/// The parallel tree built straight from the object model: same record
/// shape as the canonical form, with two namespace-style string attributes
/// on the root.
pub fn derived_tree(cars: &[Car]) -> Element {
    let mut root = xml::to_tree(cars);
    root.set_attr("xmlns-xsi", XSI_URI);
    root.set_attr("xmlns-xsd", XSD_URI);
    root
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::seed_cars;
    use crate::xml::to_tree;

    #[test]
    fn non_diesel_average_over_seed() {
        let tree = to_tree(&seed_cars());
        let avg = average_non_diesel_horsepower(&tree).unwrap();
        // 204 + 292 + 187 + 220 + 295 + 414 + 513 over 7 engines.
        assert_eq!(avg, 2125.0 / 7.0);
    }

    #[test]
    fn all_diesel_tree_is_an_empty_group() {
        let mut cars = seed_cars();
        for car in &mut cars {
            car.engine.model = "TDI".into();
        }
        let tree = to_tree(&cars);
        assert!(matches!(
            average_non_diesel_horsepower(&tree),
            Err(CatalogError::EmptyGroup)
        ));
    }

    #[test]
    fn dedup_keeps_first_occurrence_per_model_in_order() {
        let tree = to_tree(&seed_cars());
        let unique = deduplicate_by_model(&tree).unwrap();
        let models: Vec<&str> = unique
            .children
            .iter()
            .map(|c| c.child(FIELDS.model).unwrap().text.as_str())
            .collect();
        assert_eq!(models, ["E250", "E350", "A6", "S6", "S8"]);
        // The surviving A6 is the first one: FSI, 2.5 liters, 187 hp.
        let a6 = &unique.children[2];
        let engine = a6.child(FIELDS.engine).unwrap();
        assert_eq!(engine.attr(FIELDS.engine_model), Some("FSI"));
        assert_eq!(engine.child(FIELDS.displacement).unwrap().text, "2.5");
        assert_eq!(engine.child(FIELDS.horse_power).unwrap().text, "187");
    }

    #[test]
    fn dedup_is_idempotent() {
        let tree = to_tree(&seed_cars());
        let once = deduplicate_by_model(&tree).unwrap();
        let twice = deduplicate_by_model(&once).unwrap();
        assert_eq!(twice, once);
    }

    #[test]
    fn renumber_moves_year_and_renames_horsepower() {
        let mut tree = to_tree(&seed_cars());
        renumber(&mut tree).unwrap();
        for car in &tree.children {
            assert!(car.child(FIELDS.year).is_none());
            let model = car.child(FIELDS.model).unwrap();
            assert!(model.attr(FIELDS.year_attr).is_some());
            let engine = car.child(FIELDS.engine).unwrap();
            assert!(engine.child(FIELDS.horse_power).is_none());
            assert!(engine.child(FIELDS.hp).is_some());
        }
        let first = tree.children[0].child(FIELDS.model).unwrap();
        assert_eq!(first.attr(FIELDS.year_attr), Some("2009"));
    }

    #[test]
    fn renumber_failure_leaves_the_tree_unchanged() {
        let mut tree = to_tree(&seed_cars());
        // Break a record in the middle of the document.
        tree.children[4].remove_child(FIELDS.year).unwrap();
        let before = tree.clone();
        let err = renumber(&mut tree).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::SchemaMismatch { index: 4, .. }
        ));
        // No partial edit observable, not even on records before the bad one.
        assert_eq!(tree, before);
    }

    #[test]
    fn derived_tree_carries_namespace_style_attributes() {
        let tree = derived_tree(&seed_cars());
        assert_eq!(tree.attr("xmlns-xsi"), Some(XSI_URI));
        assert_eq!(tree.attr("xmlns-xsd"), Some(XSD_URI));
        assert_eq!(tree.children.len(), 9);
    }
}
