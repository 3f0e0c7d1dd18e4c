use crate::database::models::Property;

/// Filter facets derived from a loaded catalog: the distinct set of city
/// values and the maximum observed price (used to initialize the upper
/// price bound).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityFacets {
    pub cities: Vec<String>,
    pub max_price: i64,
}

impl CityFacets {
    pub fn derive(catalog: &[Property]) -> Self {
        let mut cities: Vec<String> = Vec::new();
        for property in catalog {
            if let Some(city) = locality(&property.city) {
                if !cities.iter().any(|known| known == &city) {
                    cities.push(city);
                }
            }
        }

        let max_price = catalog.iter().map(|p| p.price).max().unwrap_or(0);

        Self { cities, max_price }
    }
}

/// The city column holds a comma-separated locality string such as
/// "Andheri West, Mumbai, MH"; the facet value is the segment after the
/// last comma, trimmed. A field without commas is its own locality.
pub fn locality(city: &str) -> Option<String> {
    let segment = city.rsplit(',').next().unwrap_or(city).trim();
    if segment.is_empty() {
        None
    } else {
        Some(segment.to_string())
    }
}
