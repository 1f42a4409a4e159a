//! Loading the static salon dataset.
//!
//! The site ships `salons.json`; the geocoding workflow also produces CSV
//! exports with the same column names. Either is accepted, picked by file
//! extension.

use crate::models::Salon;
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use csv::ReaderBuilder;
use serde_json::{Map, Number, Value};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{info, warn};

/// Columns whose cells are stored as JSON numbers when they parse as one.
const NUMERIC_COLUMNS: [&str; 2] = ["lat", "lon"];

pub fn load_salons(path: &Path) -> Result<Vec<Salon>> {
    let file = File::open(path).wrap_err_with(|| format!("opening {}", path.display()))?;
    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    let salons = if is_csv {
        salons_from_csv(BufReader::new(file))?
    } else {
        serde_json::from_reader(BufReader::new(file))
            .wrap_err_with(|| format!("parsing {}", path.display()))?
    };

    info!("Loaded {} salons from {}", salons.len(), path.display());
    Ok(salons)
}

pub fn salons_from_csv<R: Read>(reader: R) -> Result<Vec<Salon>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .wrap_err("reading CSV headers")?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_lowercase())
        .collect();
    let find_col = |name: &str| headers.iter().position(|h| h == name);

    let idx_id = find_col("id").ok_or_else(|| eyre!("CSV missing 'id' column. Found: {:?}", headers))?;

    let mut salons = Vec::new();
    for (row, result) in rdr.records().enumerate() {
        let record = result.wrap_err_with(|| format!("reading CSV row {}", row + 1))?;

        let cell = |i: usize| record.get(i).map(str::trim).filter(|s| !s.is_empty());
        if cell(idx_id).is_none() {
            warn!("Skipping CSV row {} without an id", row + 1);
            continue;
        }

        // Blank cells are left out rather than stored as empty strings.
        let fields: Map<String, Value> = headers
            .iter()
            .enumerate()
            .filter_map(|(i, header)| {
                let raw = cell(i)?;
                let value = match raw.parse::<f64>().ok().and_then(Number::from_f64) {
                    Some(n) if NUMERIC_COLUMNS.contains(&header.as_str()) => Value::Number(n),
                    _ => Value::String(raw.to_string()),
                };
                Some((header.clone(), value))
            })
            .collect();

        salons.push(Salon::from(fields));
    }
    Ok(salons)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranker::Located;

    #[test]
    fn csv_rows_become_salons() {
        let csv = "\u{feff}id,name,address,suburb,state,postcode,phone,lat,lon,instagram\n\
                   1,Parra,Church St,Parramatta,NSW,2150,02 1111 1111,-33.8121,151.0049,@parra\n\
                   2,Melb,Collins St,Melbourne,VIC,3000,,,,\n\
                   ,Broken,,,,,,,,\n";
        let salons = salons_from_csv(csv.as_bytes()).unwrap();

        assert_eq!(salons.len(), 2);
        assert_eq!(salons[0].text("name").as_deref(), Some("Parra"));
        assert_eq!(salons[0].phone().as_deref(), Some("02 1111 1111"));
        assert_eq!(salons[0].get("instagram"), Some(&serde_json::json!("@parra")));
        assert_eq!(salons[0].get("lat"), Some(&serde_json::json!(-33.8121)));
        assert!(salons[0].coordinate().is_some());

        assert_eq!(salons[1].phone(), None);
        assert_eq!(salons[1].get("instagram"), None);
        assert!(salons[1].coordinate().is_none());
    }

    #[test]
    fn csv_without_id_column_is_an_error() {
        let csv = "name,lat,lon\nParra,-33.8,151.0\n";
        assert!(salons_from_csv(csv.as_bytes()).is_err());
    }

    #[test]
    fn json_file_loads() {
        let dir = std::env::temp_dir().join(format!("salon-finder-dataset-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("salons.json");
        std::fs::write(
            &path,
            r#"[{"id":1,"name":"Parra","suburb":"Parramatta","lat":-33.8121,"lon":151.0049},
                {"id":2,"name":"Nowhere","lat":null,"lon":null}]"#,
        )
        .unwrap();

        let salons = load_salons(&path).unwrap();
        assert_eq!(salons.len(), 2);
        assert_eq!(salons[1].get("lat"), Some(&serde_json::Value::Null));
        assert!(salons[1].coordinate().is_none());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_salons(Path::new("/definitely/not/here/salons.json")).is_err());
    }
}
