//! Record shapes and the static field-to-tag mapping shared by the
//! serializer, the deserializer, and every tree-level query.

#[derive(Debug, Clone, PartialEq)]
pub struct Engine {
    pub displacement: f64,
    pub horse_power: f64,
    pub model: String,
}

impl Engine {
    pub fn new(displacement: f64, horse_power: f64, model: &str) -> Self {
        Self {
            displacement,
            horse_power,
            model: model.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Car {
    pub model: String,
    pub year: i32,
    pub engine: Engine,
}

impl Car {
    pub fn new(model: &str, engine: Engine, year: i32) -> Self {
        Self {
            model: model.to_string(),
            year,
            engine,
        }
    }
}

/// Engine model code that marks the diesel category; every other code
/// counts as petrol. Comparison is exact and case-sensitive.
pub const DIESEL_ENGINE_CODE: &str = "TDI";

/// Tag and attribute names for the persisted tree form. One table, consumed
/// identically by serialize, deserialize, and the tree operations, so the
/// round trip cannot drift.
pub struct FieldMap {
    pub root: &'static str,
    pub record: &'static str,
    pub model: &'static str,
    pub year: &'static str,
    pub engine: &'static str,
    /// Attribute on the `engine` element.
    pub engine_model: &'static str,
    pub displacement: &'static str,
    pub horse_power: &'static str,
    /// Replacement name for `horse_power` after the renumber edit.
    pub hp: &'static str,
    /// Attribute the `year` value moves to (on `model`) after renumber.
    pub year_attr: &'static str,
}

pub const FIELDS: FieldMap = FieldMap {
    root: "cars",
    record: "car",
    model: "model",
    year: "year",
    engine: "engine",
    engine_model: "model",
    displacement: "displacement",
    horse_power: "horsePower",
    hp: "hp",
    year_attr: "year",
};

/// The fixed demo collection. Order matters: grouping and deduplication
/// both follow encounter order.
pub fn seed_cars() -> Vec<Car> {
    vec![
        Car::new("E250", Engine::new(1.8, 204.0, "CGI"), 2009),
        Car::new("E350", Engine::new(3.5, 292.0, "CGI"), 2009),
        Car::new("A6", Engine::new(2.5, 187.0, "FSI"), 2012),
        Car::new("A6", Engine::new(2.8, 220.0, "FSI"), 2012),
        Car::new("A6", Engine::new(3.0, 295.0, "TFSI"), 2012),
        Car::new("A6", Engine::new(2.0, 175.0, "TDI"), 2011),
        Car::new("A6", Engine::new(3.0, 309.0, "TDI"), 2011),
        Car::new("S6", Engine::new(4.0, 414.0, "TFSI"), 2012),
        Car::new("S8", Engine::new(4.0, 513.0, "TFSI"), 2012),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_has_nine_cars_in_fixed_order() {
        let cars = seed_cars();
        assert_eq!(cars.len(), 9);
        let models: Vec<&str> = cars.iter().map(|c| c.model.as_str()).collect();
        assert_eq!(
            models,
            ["E250", "E350", "A6", "A6", "A6", "A6", "A6", "S6", "S8"]
        );
    }

    #[test]
    fn every_seed_car_has_positive_displacement() {
        assert!(seed_cars().iter().all(|c| c.engine.displacement > 0.0));
    }
}
