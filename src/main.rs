use std::path::Path;

use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use car_catalog::query::{self, summarize_by_engine_category};
use car_catalog::report::{Render, XhtmlReport};
use car_catalog::{model, settings, treeops, xml};

fn log_summary(label: &str, cars: &[car_catalog::Car]) -> anyhow::Result<()> {
    for car in query::filter_by_model(cars, "A6") {
        let rating = query::rate(car)?;
        debug!("engine: {} hppl: {}", rating.category, rating.hppl);
    }
    for (category, mean) in summarize_by_engine_category(cars, "A6")? {
        info!("{label} {category}: {mean}");
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let settings = settings::load()?;
    let cars = model::seed_cars();

    // Query pipeline over the in-memory collection.
    log_summary("summary", &cars)?;

    // Persist, read back, and re-run the pipeline on the restored records.
    let catalog_path = Path::new(&settings.catalog_file);
    xml::save(&xml::to_tree(&cars), catalog_path)?;
    info!("wrote {}", settings.catalog_file);

    let tree = xml::load(catalog_path)?;
    let restored = xml::from_tree(&tree)?;
    log_summary("restored", &restored)?;

    // Structural queries over the serialized tree.
    let avg_hp = treeops::average_non_diesel_horsepower(&tree)?;
    info!("avg HP: {avg_hp}");

    let unique = treeops::deduplicate_by_model(&tree)?;
    xml::save(&unique, Path::new(&settings.unique_file))?;
    info!(
        "wrote {} ({} unique models)",
        settings.unique_file,
        unique.children.len()
    );

    // Parallel tree built straight from the object model.
    xml::save(&treeops::derived_tree(&cars), Path::new(&settings.derived_file))?;
    info!("wrote {}", settings.derived_file);

    // Report sink.
    let report = XhtmlReport {
        path: settings.report_file.clone().into(),
    };
    report.render(&cars)?;
    info!("wrote {}", settings.report_file);

    // In-place structural edit, persisted back over the catalog file.
    let mut edited = tree;
    treeops::renumber(&mut edited)?;
    xml::save(&edited, catalog_path)?;
    info!("renumbered {}", settings.catalog_file);

    Ok(())
}
