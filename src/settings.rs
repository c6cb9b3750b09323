//! Run settings: output file names, fixed by default and overridable from
//! an optional `car_catalog.toml` next to the working directory. Paths stay
//! relative to the cwd at invocation time.

use config::Config;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Canonical persisted collection; also the renumber target.
    pub catalog_file: String,
    /// Deduplicated copy of the catalog.
    pub unique_file: String,
    /// Tree built straight from the object model.
    pub derived_file: String,
    /// XHTML report table.
    pub report_file: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            catalog_file: "cars.xml".into(),
            unique_file: "cars_unique.xml".into(),
            derived_file: "cars_derived.xml".into(),
            report_file: "report.html".into(),
        }
    }
}

pub fn load() -> anyhow::Result<Settings> {
    let cfg = Config::builder()
        .add_source(config::File::with_name("car_catalog").required(false))
        .build()?;
    Ok(cfg.try_deserialize()?)
}
