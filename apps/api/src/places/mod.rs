/// Places client — the single point of entry for geocoding and nearby-search
/// calls against the Google Maps platform.
///
/// ARCHITECTURAL RULE: No other module may call the Maps APIs directly.
/// The landmark cache talks to this module through the `PlacesProvider` trait
/// so tests and alternative providers can be swapped in without touching
/// callers.
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

pub mod catalog;

pub use catalog::{Category, PlaceTypeQuery, PLACE_TYPES};

const GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";
const NEARBY_SEARCH_URL: &str = "https://maps.googleapis.com/maps/api/place/nearbysearch/json";

#[derive(Debug, Error)]
pub enum PlacesError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Geocoding failed: {status}")]
    Geocode { status: String },

    #[error("Places API key is invalid or has insufficient permissions")]
    Denied,

    #[error("Places search failed for '{place_type}': {status}")]
    Search { place_type: String, status: String },
}

/// A successfully geocoded street address.
#[derive(Debug, Clone)]
pub struct GeocodedAddress {
    pub latitude: f64,
    pub longitude: f64,
    pub formatted_address: String,
}

/// One nearby-search result as returned by the provider, before it is tagged
/// with a category and cached as a landmark.
#[derive(Debug, Clone)]
pub struct NearbyPlace {
    pub place_id: String,
    pub name: String,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<i32>,
}

/// The places collaborator boundary. Carried in `AppState` as
/// `Arc<dyn PlacesProvider>`.
#[async_trait]
pub trait PlacesProvider: Send + Sync {
    /// Geocodes a composed postal address to coordinates.
    async fn geocode(
        &self,
        address: &str,
        city: &str,
        state: &str,
        zip_code: &str,
    ) -> Result<GeocodedAddress, PlacesError>;

    /// Searches for places of one type within a circular radius.
    /// A provider "zero results" response is success with an empty list.
    async fn search_nearby(
        &self,
        latitude: f64,
        longitude: f64,
        radius_meters: f64,
        place_type: &str,
    ) -> Result<Vec<NearbyPlace>, PlacesError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Google wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    formatted_address: String,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct NearbySearchResponse {
    status: String,
    #[serde(default)]
    results: Vec<NearbySearchResult>,
}

#[derive(Debug, Deserialize)]
struct NearbySearchResult {
    place_id: String,
    name: String,
    vicinity: Option<String>,
    geometry: Option<Geometry>,
    rating: Option<f64>,
    user_ratings_total: Option<i32>,
}

// ────────────────────────────────────────────────────────────────────────────
// Default provider
// ────────────────────────────────────────────────────────────────────────────

/// Google Maps implementation of `PlacesProvider`.
#[derive(Clone)]
pub struct GooglePlacesClient {
    client: Client,
    api_key: String,
}

impl GooglePlacesClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }
}

#[async_trait]
impl PlacesProvider for GooglePlacesClient {
    async fn geocode(
        &self,
        address: &str,
        city: &str,
        state: &str,
        zip_code: &str,
    ) -> Result<GeocodedAddress, PlacesError> {
        let full_address = format!("{address}, {city}, {state} {zip_code}");
        debug!("Geocoding address: {full_address}");

        let response: GeocodeResponse = self
            .client
            .get(GEOCODE_URL)
            .query(&[
                ("address", full_address.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?
            .json()
            .await?;

        if response.status == "OK" {
            if let Some(result) = response.results.into_iter().next() {
                return Ok(GeocodedAddress {
                    latitude: result.geometry.location.lat,
                    longitude: result.geometry.location.lng,
                    formatted_address: result.formatted_address,
                });
            }
        }

        Err(PlacesError::Geocode {
            status: response.status,
        })
    }

    async fn search_nearby(
        &self,
        latitude: f64,
        longitude: f64,
        radius_meters: f64,
        place_type: &str,
    ) -> Result<Vec<NearbyPlace>, PlacesError> {
        let location = format!("{latitude},{longitude}");
        let radius = format!("{radius_meters}");

        let response: NearbySearchResponse = self
            .client
            .get(NEARBY_SEARCH_URL)
            .query(&[
                ("location", location.as_str()),
                ("radius", radius.as_str()),
                ("type", place_type),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?
            .json()
            .await?;

        match response.status.as_str() {
            // ZERO_RESULTS is a legitimate empty answer, not a failure.
            "OK" | "ZERO_RESULTS" => {
                debug!(
                    "Nearby search '{}' returned {} places",
                    place_type,
                    response.results.len()
                );
                Ok(response
                    .results
                    .into_iter()
                    .map(|place| NearbyPlace {
                        place_id: place.place_id,
                        name: place.name,
                        address: place.vicinity,
                        latitude: place.geometry.as_ref().map(|g| g.location.lat),
                        longitude: place.geometry.as_ref().map(|g| g.location.lng),
                        rating: place.rating,
                        user_ratings_total: place.user_ratings_total,
                    })
                    .collect())
            }
            "REQUEST_DENIED" => Err(PlacesError::Denied),
            other => Err(PlacesError::Search {
                place_type: place_type.to_string(),
                status: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearby_response_parses_partial_fields() {
        let json = r#"{
            "status": "OK",
            "results": [
                {"place_id": "abc", "name": "Zilker Park", "vicinity": "2100 Barton Springs Rd"},
                {"place_id": "def", "name": "Austin High",
                 "geometry": {"location": {"lat": 30.27, "lng": -97.76}},
                 "rating": 4.5, "user_ratings_total": 120}
            ]
        }"#;
        let parsed: NearbySearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.status, "OK");
        assert_eq!(parsed.results.len(), 2);
        assert!(parsed.results[0].geometry.is_none());
        assert_eq!(parsed.results[1].rating, Some(4.5));
    }

    #[test]
    fn test_zero_results_parses_with_empty_list() {
        let json = r#"{"status": "ZERO_RESULTS"}"#;
        let parsed: NearbySearchResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.results.is_empty());
    }

    #[test]
    fn test_geocode_response_parses() {
        let json = r#"{
            "status": "OK",
            "results": [{
                "formatted_address": "123 Main St, Austin, TX 78701, USA",
                "geometry": {"location": {"lat": 30.2672, "lng": -97.7431}}
            }]
        }"#;
        let parsed: GeocodeResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.results[0].geometry.location.lat, 30.2672);
    }

    #[test]
    fn test_geocode_error_is_distinct_from_search_error() {
        let geocode = PlacesError::Geocode {
            status: "ZERO_RESULTS".to_string(),
        };
        let search = PlacesError::Search {
            place_type: "school".to_string(),
            status: "OVER_QUERY_LIMIT".to_string(),
        };
        assert!(geocode.to_string().contains("Geocoding failed"));
        assert!(search.to_string().contains("school"));
    }
}
