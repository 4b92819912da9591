//! Itinerary enrichment pipeline.
//!
//! Takes a freshly generated itinerary (place names only) and attaches
//! coordinates and place details while tolerating partial failure of the
//! maps provider. Distinct route/overnight locations are geocoded first and
//! cached for the pass, then per-attraction lookups run with the overnight
//! coordinates available as a fallback anchor. Individual lookup failures
//! never abort the pass; they degrade the itinerary's geocoding status.

use std::collections::{HashMap, HashSet};

use futures::future::join_all;
use rand::Rng;

use crate::models::itinerary::{
    Attraction, Coordinates, GeocodeResult, GeocodingStatus, Itinerary,
};
use crate::services::geocoding_service::PlaceResolver;

/// Maximum offset, in degrees on each axis, for the synthetic position given
/// to an attraction that could not be geocoded at all.
const FALLBACK_OFFSET_DEGREES: f64 = 0.005;

pub struct EnrichmentService<R: PlaceResolver> {
    resolver: R,
}

impl<R: PlaceResolver> EnrichmentService<R> {
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }

    /// Enrich an itinerary in one pass. Purely additive: no existing field
    /// is altered, and the result always carries an explicit geocoding
    /// status (`ok`, `partial`, or `failed`).
    pub async fn enrich_itinerary(&self, mut itinerary: Itinerary) -> Itinerary {
        // Distinct location strings in day order. Keys are trimmed before
        // dedup so references differing only by surrounding whitespace
        // geocode once; case is preserved.
        let mut seen = HashSet::new();
        let mut locations: Vec<String> = Vec::new();
        for day in &itinerary.days {
            for location in [&day.route.from, &day.route.to, &day.overnight_location] {
                let trimmed = location.trim();
                if !trimmed.is_empty() && seen.insert(trimmed.to_string()) {
                    locations.push(trimmed.to_string());
                }
            }
        }

        // Location pass: write-once cache keyed by the trimmed string,
        // shared for the rest of this pass only.
        let mut cache: HashMap<String, GeocodeResult> = HashMap::new();
        let mut location_errors = 0usize;
        for location in &locations {
            match self.resolver.geocode(location).await {
                Ok(result) => {
                    cache.insert(location.clone(), result);
                }
                Err(e) => {
                    log::warn!("failed to geocode {}: {}", location, e);
                    location_errors += 1;
                }
            }
        }

        // Attach cached coordinates, then enrich each day's attractions.
        // Attractions within a day run concurrently; a failed lookup only
        // affects its own attraction.
        let mut attraction_errors = 0usize;
        for day in &mut itinerary.days {
            day.route.from_coordinates = cache.get(day.route.from.trim()).cloned();
            day.route.to_coordinates = cache.get(day.route.to.trim()).cloned();
            day.overnight_coordinates = cache.get(day.overnight_location.trim()).cloned();

            let overnight = day.overnight_coordinates.clone();
            let overnight_location = day.overnight_location.clone();
            let attractions = std::mem::take(&mut day.attractions);

            let lookups = attractions.into_iter().map(|attraction| {
                let overnight = overnight.clone();
                let overnight_location = overnight_location.clone();
                async move {
                    self.enrich_attraction(attraction, &overnight_location, overnight.as_ref())
                        .await
                }
            });

            day.attractions = join_all(lookups)
                .await
                .into_iter()
                .map(|(attraction, failed)| {
                    if failed {
                        attraction_errors += 1;
                    }
                    attraction
                })
                .collect();
        }

        let status = if !locations.is_empty() && cache.is_empty() {
            GeocodingStatus::Failed
        } else if location_errors > 0 || attraction_errors > 0 {
            GeocodingStatus::Partial
        } else {
            GeocodingStatus::Ok
        };

        itinerary.geocoding_status = Some(status);
        itinerary.geocoding_note = match status {
            GeocodingStatus::Failed => Some(
                "Map display unavailable - no itinerary location could be geocoded".to_string(),
            ),
            GeocodingStatus::Partial => Some(format!(
                "{} locations could not be geocoded",
                location_errors + attraction_errors
            )),
            GeocodingStatus::Ok => None,
        };
        itinerary
    }

    /// Enrich one attraction. The lookup chain: place search + details,
    /// then a plain geocode of the contextual query, then a synthetic
    /// position near the overnight stop so the marker still renders, and
    /// finally no coordinates when even the overnight stop is unknown.
    /// Returns the attraction and whether the real lookups failed.
    async fn enrich_attraction(
        &self,
        mut attraction: Attraction,
        overnight_location: &str,
        overnight: Option<&GeocodeResult>,
    ) -> (Attraction, bool) {
        let query = format!("{}, {}", attraction.name, overnight_location);

        match self.resolver.resolve_place(&query).await {
            Ok(place) => {
                attraction.coordinates = Some(place.coordinates);
                attraction.details = Some(place.details);
                return (attraction, false);
            }
            Err(e) => {
                log::warn!("place lookup failed for {}: {}", query, e);
            }
        }

        match self.resolver.geocode(&query).await {
            Ok(result) => {
                attraction.coordinates = Some(result.coordinates());
                return (attraction, false);
            }
            Err(e) => {
                log::warn!("failed to geocode attraction {}: {}", attraction.name, e);
            }
        }

        if let Some(anchor) = overnight {
            let mut rng = rand::thread_rng();
            attraction.coordinates = Some(Coordinates {
                lat: anchor.lat + rng.gen_range(-FALLBACK_OFFSET_DEGREES..FALLBACK_OFFSET_DEGREES),
                lng: anchor.lng + rng.gen_range(-FALLBACK_OFFSET_DEGREES..FALLBACK_OFFSET_DEGREES),
            });
            attraction.approximate = true;
        } else {
            attraction.coordinates = None;
        }
        (attraction, true)
    }
}
