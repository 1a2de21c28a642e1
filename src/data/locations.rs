//! Location Normalization Module
//! Maps messy location strings to one canonical (city, state) pair.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A recognized (city, state) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub city: String,
    pub state: String,
}

impl Location {
    fn new(city: &str, state: &str) -> Self {
        Self {
            city: city.to_string(),
            state: state.to_string(),
        }
    }
}

/// Known spelling variants, keyed by their normalized form.
/// Unlisted strings are never guessed at.
const LOCATION_VARIANTS: &[(&str, (&str, &str))] = &[
    ("new york, ny", ("New York", "NY")),
    ("new york city, ny", ("New York", "NY")),
    ("new york city", ("New York", "NY")),
    ("new york", ("New York", "NY")),
    ("nyc", ("New York", "NY")),
    ("brooklyn, ny", ("Brooklyn", "NY")),
    ("brooklyn", ("Brooklyn", "NY")),
    ("san francisco, ca", ("San Francisco", "CA")),
    ("san francisco", ("San Francisco", "CA")),
    ("sf", ("San Francisco", "CA")),
    ("san jose, ca", ("San Jose", "CA")),
    ("san jose", ("San Jose", "CA")),
    ("mountain view, ca", ("Mountain View", "CA")),
    ("mountain view", ("Mountain View", "CA")),
    ("palo alto, ca", ("Palo Alto", "CA")),
    ("palo alto", ("Palo Alto", "CA")),
    ("sunnyvale, ca", ("Sunnyvale", "CA")),
    ("sunnyvale", ("Sunnyvale", "CA")),
    ("los angeles, ca", ("Los Angeles", "CA")),
    ("los angeles", ("Los Angeles", "CA")),
    ("la", ("Los Angeles", "CA")),
    ("san diego, ca", ("San Diego", "CA")),
    ("san diego", ("San Diego", "CA")),
    ("seattle, wa", ("Seattle", "WA")),
    ("seattle", ("Seattle", "WA")),
    ("redmond, wa", ("Redmond", "WA")),
    ("redmond", ("Redmond", "WA")),
    ("austin, tx", ("Austin", "TX")),
    ("austin", ("Austin", "TX")),
    ("dallas, tx", ("Dallas", "TX")),
    ("dallas", ("Dallas", "TX")),
    ("houston, tx", ("Houston", "TX")),
    ("houston", ("Houston", "TX")),
    ("boston, ma", ("Boston", "MA")),
    ("boston", ("Boston", "MA")),
    ("cambridge, ma", ("Cambridge", "MA")),
    ("cambridge", ("Cambridge", "MA")),
    ("chicago, il", ("Chicago", "IL")),
    ("chicago", ("Chicago", "IL")),
    ("denver, co", ("Denver", "CO")),
    ("denver", ("Denver", "CO")),
    ("boulder, co", ("Boulder", "CO")),
    ("boulder", ("Boulder", "CO")),
    ("atlanta, ga", ("Atlanta", "GA")),
    ("atlanta", ("Atlanta", "GA")),
    ("washington, dc", ("Washington", "DC")),
    ("washington dc", ("Washington", "DC")),
    ("washington d.c.", ("Washington", "DC")),
    ("dc", ("Washington", "DC")),
    ("portland, or", ("Portland", "OR")),
    ("portland", ("Portland", "OR")),
    ("phoenix, az", ("Phoenix", "AZ")),
    ("phoenix", ("Phoenix", "AZ")),
    ("miami, fl", ("Miami", "FL")),
    ("miami", ("Miami", "FL")),
    ("raleigh, nc", ("Raleigh", "NC")),
    ("raleigh", ("Raleigh", "NC")),
    ("charlotte, nc", ("Charlotte", "NC")),
    ("charlotte", ("Charlotte", "NC")),
    ("salt lake city, ut", ("Salt Lake City", "UT")),
    ("salt lake city", ("Salt Lake City", "UT")),
    ("minneapolis, mn", ("Minneapolis", "MN")),
    ("minneapolis", ("Minneapolis", "MN")),
    ("pittsburgh, pa", ("Pittsburgh", "PA")),
    ("pittsburgh", ("Pittsburgh", "PA")),
    ("philadelphia, pa", ("Philadelphia", "PA")),
    ("philadelphia", ("Philadelphia", "PA")),
    ("nashville, tn", ("Nashville", "TN")),
    ("nashville", ("Nashville", "TN")),
];

lazy_static! {
    static ref LOCATION_LOOKUP: HashMap<&'static str, Location> = LOCATION_VARIANTS
        .iter()
        .map(|(variant, (city, state))| (*variant, Location::new(city, state)))
        .collect();
}

/// Normalize a raw location string to a canonical pair.
///
/// Matching is case-insensitive and whitespace-tolerant; unrecognized
/// strings yield `None` rather than a guess.
pub fn normalize_location(raw: &str) -> Option<Location> {
    let key = raw
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    LOCATION_LOOKUP.get(key.as_str()).cloned()
}
