//! Report emitter: one row per car rendered into an XHTML table. The core
//! never reads this output back; it is a one-way sink behind the `Render`
//! seam.

use std::path::PathBuf;

use crate::error::Result;
use crate::model::Car;
use crate::tree::Element;
use crate::xml;

pub trait Render {
    fn render(&self, cars: &[Car]) -> Result<()>;
}

const CELL_STYLE: &str = "border: 1px black solid";

/// `body > table > tr > td`, five columns per row in collection order:
/// model, engine model, displacement, horsePower, year.
pub fn report_tree(cars: &[Car]) -> Element {
    let mut table = Element::new("table");
    table.set_attr("style", CELL_STYLE);
    for car in cars {
        let mut row = Element::new("tr");
        row.set_attr("style", CELL_STYLE);
        let cells = [
            car.model.clone(),
            car.engine.model.clone(),
            car.engine.displacement.to_string(),
            car.engine.horse_power.to_string(),
            car.year.to_string(),
        ];
        for value in cells {
            let mut cell = Element::with_text("td", value);
            cell.set_attr("style", CELL_STYLE);
            row.children.push(cell);
        }
        table.children.push(row);
    }
    let mut body = Element::new("body");
    body.children.push(table);
    body
}

pub struct XhtmlReport {
    pub path: PathBuf,
}

impl Render for XhtmlReport {
    fn render(&self, cars: &[Car]) -> Result<()> {
        xml::save(&report_tree(cars), &self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::seed_cars;

    #[test]
    fn one_row_per_car_in_collection_order() {
        let body = report_tree(&seed_cars());
        let table = body.child("table").unwrap();
        assert_eq!(table.children.len(), 9);
        let first = &table.children[0];
        let cells: Vec<&str> = first.children.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(cells, ["E250", "CGI", "1.8", "204", "2009"]);
        let last = &table.children[8];
        assert_eq!(last.children[0].text, "S8");
        assert_eq!(last.children[4].text, "2012");
    }

    #[test]
    fn every_cell_carries_the_border_style() {
        let body = report_tree(&seed_cars());
        let styled = body.select(&|e| e.attr("style") == Some(CELL_STYLE));
        // 1 table + 9 rows + 45 cells.
        assert_eq!(styled.len(), 55);
    }
}
