//! Query engine: filter, project, group, aggregate over the in-memory
//! collection. Pure computation, no I/O; every step preserves encounter
//! order so means are reproducible bit for bit.

use ahash::AHashMap;

use crate::error::{CatalogError, Result};
use crate::model::{Car, DIESEL_ENGINE_CODE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineCategory {
    Diesel,
    Petrol,
}

impl std::fmt::Display for EngineCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineCategory::Diesel => write!(f, "diesel"),
            EngineCategory::Petrol => write!(f, "petrol"),
        }
    }
}

/// Projection of one car: horsepower per liter plus its fuel category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineRating {
    pub hppl: f64,
    pub category: EngineCategory,
}

/// Lazy, order-preserving filter on the car model. Zero matches is a valid
/// empty result, not an error.
pub fn filter_by_model<'a>(cars: &'a [Car], model: &'a str) -> impl Iterator<Item = &'a Car> + 'a {
    cars.iter().filter(move |car| car.model == model)
}

/// Projects one car to its rating. A zero displacement violates the data
/// model and is reported rather than coerced to infinity.
pub fn rate(car: &Car) -> Result<EngineRating> {
    if car.engine.displacement == 0.0 {
        return Err(CatalogError::DivisionByZero {
            model: car.model.clone(),
        });
    }
    let category = if car.engine.model == DIESEL_ENGINE_CODE {
        EngineCategory::Diesel
    } else {
        EngineCategory::Petrol
    };
    Ok(EngineRating {
        hppl: car.engine.horse_power / car.engine.displacement,
        category,
    })
}

/// Partitions ratings by category. Group keys appear in first-encounter
/// order; members keep encounter order within each group.
pub fn group_by_category(
    ratings: impl IntoIterator<Item = EngineRating>,
) -> Vec<(EngineCategory, Vec<f64>)> {
    let mut index: AHashMap<EngineCategory, usize> = AHashMap::new();
    let mut groups: Vec<(EngineCategory, Vec<f64>)> = Vec::new();
    for rating in ratings {
        let slot = *index.entry(rating.category).or_insert_with(|| {
            groups.push((rating.category, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(rating.hppl);
    }
    groups
}

/// Arithmetic mean in slice order. Refuses an empty slice so no NaN can
/// escape into a result.
pub fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(CatalogError::EmptyGroup);
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// The composite pipeline: filter by model, project to hp-per-liter with a
/// diesel/petrol category, group, and average each group. Returns the
/// category → mean mapping in first-encounter order.
pub fn summarize_by_engine_category(
    cars: &[Car],
    filter_model: &str,
) -> Result<Vec<(EngineCategory, f64)>> {
    let ratings = filter_by_model(cars, filter_model)
        .map(rate)
        .collect::<Result<Vec<_>>>()?;
    let mut summary = Vec::new();
    for (category, values) in group_by_category(ratings) {
        // Groups only exist once they received a member, so this mean
        // cannot hit the empty case.
        summary.push((category, mean(&values)?));
    }
    Ok(summary)
}
