use crate::geo::Coordinate;
use crate::ranker::Located;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One branch from the static salon dataset.
///
/// The record is held exactly as loaded. Only `lat`/`lon` are interpreted, for
/// ranking; display fields are read through accessors, so a record with a
/// numeric postcode or a null phone still loads and re-serializes unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Salon {
    fields: Map<String, Value>,
}

impl From<Map<String, Value>> for Salon {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

impl Located for Salon {
    fn coordinate(&self) -> Option<Coordinate> {
        Coordinate::from_parts(self.number("lat"), self.number("lon"))
    }
}

impl Salon {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// A display field as text. Numbers are formatted; null, blank strings and
    /// nested values count as absent.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.fields.get(key)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn id(&self) -> Option<String> {
        self.text("id")
    }

    pub fn phone(&self) -> Option<String> {
        self.text("phone")
    }

    fn number(&self, key: &str) -> Option<f64> {
        match self.fields.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Display name used across every view.
    pub fn display_name(&self) -> String {
        match self.text("name") {
            Some(name) => format!("The Salon Edit (formerly {})", name),
            None => "The Salon Edit".to_string(),
        }
    }

    /// "address, STATE postcode" with missing parts left out.
    pub fn display_address(&self) -> String {
        let locality: Vec<String> = [self.text("state"), self.text("postcode")]
            .into_iter()
            .flatten()
            .collect();
        let mut parts: Vec<String> = self.text("address").into_iter().collect();
        if !locality.is_empty() {
            parts.push(locality.join(" "));
        }
        parts.join(", ")
    }
}

/// Approximate location of the user, normalized from whichever provider answered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
}

impl ResolvedLocation {
    pub fn coordinate(&self) -> Option<Coordinate> {
        Coordinate::from_parts(Some(self.latitude), Some(self.longitude))
    }

    /// "City, Region, Country" with missing parts left out.
    pub fn label(&self) -> String {
        let parts: Vec<&str> = [&self.city, &self.region, &self.country]
            .into_iter()
            .filter_map(|p| p.as_deref())
            .filter(|p| !p.is_empty())
            .collect();
        if parts.is_empty() {
            format!("({:.4}, {:.4})", self.latitude, self.longitude)
        } else {
            parts.join(", ")
        }
    }
}

/// A pickable suburb or city with approximate coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suburb {
    pub name: String,
    pub state: String,
    pub lat: f64,
    pub lon: f64,
}

impl Located for Suburb {
    fn coordinate(&self) -> Option<Coordinate> {
        Coordinate::from_parts(Some(self.lat), Some(self.lon))
    }
}

const AUSTRALIAN_SUBURBS: &[(&str, &str, f64, f64)] = &[
    ("Sydney", "NSW", -33.8688, 151.2093),
    ("Melbourne", "VIC", -37.8136, 144.9631),
    ("Brisbane", "QLD", -27.4698, 153.0251),
    ("Perth", "WA", -31.9505, 115.8605),
    ("Adelaide", "SA", -34.9285, 138.6007),
    ("Hobart", "TAS", -42.8821, 147.3272),
    ("Canberra", "ACT", -35.2809, 149.1300),
    ("Darwin", "NT", -12.4634, 130.8456),
    ("Parramatta", "NSW", -33.8121, 151.0049),
    ("Newcastle", "NSW", -32.9271, 151.7826),
    ("Wollongong", "NSW", -34.4268, 150.8931),
    ("Gold Coast", "QLD", -28.0028, 153.4314),
    ("Sunshine Coast", "QLD", -26.7963, 153.0005),
    ("Townsville", "QLD", -19.2643, 146.8118),
    ("Cairns", "QLD", -16.8661, 145.7781),
    ("Toowoomba", "QLD", -27.5598, 151.9507),
    ("Geelong", "VIC", -38.1499, 144.3617),
    ("Ballarat", "VIC", -37.5550, 143.8503),
    ("Bendigo", "VIC", -36.7597, 144.2801),
    ("Shepparton", "VIC", -36.3817, 145.3927),
    ("Albury", "NSW", -36.0737, 146.9135),
    ("Dubbo", "NSW", -32.2453, 148.6055),
    ("Tamworth", "NSW", -31.0925, 150.8313),
    ("Armidale", "NSW", -30.5076, 151.6337),
    ("Lismore", "NSW", -28.8093, 153.2774),
    ("Coffs Harbour", "NSW", -30.3031, 153.1191),
    ("Port Macquarie", "NSW", -31.4312, 152.9101),
    ("Gosford", "NSW", -33.4409, 151.3424),
    ("Penrith", "NSW", -33.7449, 150.6901),
    ("Bathurst", "NSW", -33.4148, 149.5825),
    ("Orange", "NSW", -33.2869, 149.0984),
    ("Mudgee", "NSW", -32.6127, 149.5781),
    ("Goulburn", "NSW", -34.7516, 149.1203),
    ("Queanbeyan", "ACT", -35.3506, 149.2280),
    ("Wagga Wagga", "NSW", -35.1064, 147.3605),
    ("Riverina", "NSW", -34.5, 147.5),
    ("Nowra", "NSW", -34.8822, 150.5919),
    ("Batemans Bay", "NSW", -35.7110, 150.1770),
    ("Merimbula", "NSW", -36.8942, 149.9043),
    ("Geraldton", "WA", -28.7692, 114.6100),
    ("Busselton", "WA", -33.6488, 115.3303),
    ("Margaret River", "WA", -33.9549, 115.0711),
    ("Albany", "WA", -34.4848, 117.8813),
    ("Esperance", "WA", -33.8603, 121.8947),
    ("Kalgoorlie", "WA", -30.9455, 121.1681),
    ("Bunbury", "WA", -33.3268, 115.6348),
    ("Karratha", "WA", -22.7139, 118.7239),
    ("Port Hedland", "WA", -20.3136, 118.5891),
    ("Mount Gambier", "SA", -37.8252, 140.7811),
    ("Port Augusta", "SA", -32.4999, 137.7693),
    ("Ceduna", "SA", -32.3011, 133.6993),
    ("Barossa Valley", "SA", -34.5000, 139.0000),
    ("Launceston", "TAS", -41.4308, 147.1192),
    ("Devonport", "TAS", -41.1748, 146.3839),
    ("Burnie", "TAS", -41.0562, 145.9133),
    ("Ulverstone", "TAS", -41.1318, 146.1683),
];

/// The suburb picker list, sorted by name.
pub fn australian_suburbs() -> Vec<Suburb> {
    let mut suburbs: Vec<Suburb> = AUSTRALIAN_SUBURBS
        .iter()
        .map(|&(name, state, lat, lon)| Suburb {
            name: name.to_string(),
            state: state.to_string(),
            lat,
            lon,
        })
        .collect();
    suburbs.sort_by(|a, b| a.name.cmp(&b.name));
    suburbs
}
