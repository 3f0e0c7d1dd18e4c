use serde::{Deserialize, Serialize};

use crate::catalog::facets::CityFacets;
use crate::database::models::{Listing, Property};

/// Ephemeral, UI-local filter state. Changing any field means building a new
/// value and reapplying it to the catalog; nothing here is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    /// Substring match against the canonical property id
    #[serde(default)]
    pub id: String,
    /// Substring match against the full city field; empty matches all
    #[serde(default)]
    pub city: String,
    /// None matches both RENT and SALE
    #[serde(default)]
    pub listing: Option<Listing>,
    #[serde(default)]
    pub min_price: i64,
    pub max_price: i64,
}

impl FilterState {
    /// The empty filter for a given catalog: matches everything the catalog
    /// contains, with the price range initialized to the observed maximum.
    pub fn default_for(facets: &CityFacets) -> Self {
        Self {
            id: String::new(),
            city: String::new(),
            listing: None,
            min_price: 0,
            max_price: facets.max_price,
        }
    }

    /// Conjunction of the four predicates; every empty field matches all.
    pub fn matches(&self, property: &Property) -> bool {
        let city_match = self.city.is_empty() || property.city.contains(&self.city);
        let id_match = self.id.is_empty() || property.id.to_string().contains(&self.id);
        let listing_match = self.listing.map_or(true, |wanted| property.listing == wanted);
        let price_match = property.price >= self.min_price && property.price <= self.max_price;

        city_match && id_match && listing_match && price_match
    }

    /// Recompute the visible subset. Always a fresh pass over the full
    /// catalog; the catalog is small enough that incremental patching would
    /// buy nothing but bugs.
    pub fn apply(&self, catalog: &[Property]) -> Vec<Property> {
        catalog
            .iter()
            .filter(|property| self.matches(property))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::Utc;
    use uuid::Uuid;

    use crate::database::models::{Condition, Facing, Listing, Property};

    /// A catalog entry with the fields the filter looks at; the rest are
    /// plausible constants.
    pub fn property(id: u128, city: &str, price: i64) -> Property {
        Property {
            id: Uuid::from_u128(id),
            name: format!("Property {}", id),
            description: "Two bedroom apartment close to the station".to_string(),
            social_id: "@estate.example".to_string(),
            address: "14 Hill Road".to_string(),
            city: city.to_string(),
            state: "MH".to_string(),
            postal_code: 400050,
            price,
            area: 850,
            beds: 2,
            baths: 2,
            listing: Listing::Sale,
            facing: Facing::North,
            condition: Condition::New,
            is_corner_plot: false,
            thumbnail_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    pub fn rental(id: u128, city: &str, price: i64) -> Property {
        Property {
            listing: Listing::Rent,
            ..property(id, city, price)
        }
    }
}
