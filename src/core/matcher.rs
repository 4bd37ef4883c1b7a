use crate::config::MatchingSettings;
use crate::core::distance::{distance_km, round_km};
use crate::models::{Coordinates, DonationOffer, Match, MatchedDonor, MatchedNgo, NgoRequest};
use crate::services::{Geocoder, LocationCache};

/// A record whose location resolved to coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct Located<T> {
    pub record: T,
    pub coordinates: Coordinates,
}

/// Nearest candidate and its distance, rounded to two decimals
#[derive(Debug, Clone, PartialEq)]
pub struct Closest<'a, T> {
    pub candidate: &'a Located<T>,
    pub distance_km: f64,
}

/// Find the candidate nearest to `origin`
///
/// Linear scan that only replaces the best candidate on a strictly smaller
/// distance, so ties go to whichever candidate comes first. O(N) per call and
/// O(donors × NGOs) per batch; fine for tens to low hundreds of records, not
/// beyond.
///
/// # Returns
/// `None` only when `candidates` is empty
pub fn find_closest<T>(origin: Coordinates, candidates: &[Located<T>]) -> Option<Closest<'_, T>> {
    let mut best: Option<&Located<T>> = None;
    let mut min_distance = f64::INFINITY;

    for candidate in candidates {
        let distance = distance_km(origin, candidate.coordinates);
        if distance < min_distance {
            min_distance = distance;
            best = Some(candidate);
        }
    }

    best.map(|candidate| Closest {
        candidate,
        distance_km: round_km(min_distance),
    })
}

/// Result of one matching pass
#[derive(Debug, Clone, Default)]
pub struct MatchReport {
    pub total_donors: usize,
    pub total_ngos: usize,
    /// Donors whose location was empty or did not geocode
    pub unresolved_donors: usize,
    /// NGOs whose location was empty or did not geocode
    pub unresolved_ngos: usize,
    pub matches: Vec<Match>,
    /// Distinct locations sent to the geocoder
    pub geocoder_lookups: usize,
}

/// Matching orchestrator
///
/// # Pipeline Stages
/// 1. Optional sort of NGOs by id
/// 2. Geocode every NGO, keeping the ones that resolve in order
/// 3. Geocode each donor, skipping the ones that do not resolve
/// 4. Pair each resolved donor with its nearest resolved NGO
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    sort_ngos_by_id: bool,
}

impl Matcher {
    pub fn new(settings: &MatchingSettings) -> Self {
        Self {
            sort_ngos_by_id: settings.sort_ngos_by_id,
        }
    }

    /// Match every donor against the NGOs
    ///
    /// Each distinct location is geocoded once for the whole pass. Records
    /// that fail to geocode drop out of `matches` and are only counted.
    pub async fn run(
        &self,
        donors: Vec<DonationOffer>,
        mut ngos: Vec<NgoRequest>,
        geocoder: &dyn Geocoder,
    ) -> MatchReport {
        let total_donors = donors.len();
        let total_ngos = ngos.len();

        if self.sort_ngos_by_id {
            ngos.sort_by(|a, b| a.id.cmp(&b.id));
        }

        let mut locations = LocationCache::new(geocoder);

        let mut located_ngos = Vec::with_capacity(ngos.len());
        for ngo in ngos {
            match locations.resolve(&ngo.location).await {
                Some(coordinates) => located_ngos.push(Located { record: ngo, coordinates }),
                None => tracing::warn!("NGO {} excluded: location '{}' did not geocode", ngo.id, ngo.location),
            }
        }
        let unresolved_ngos = total_ngos - located_ngos.len();

        let mut unresolved_donors = 0;
        let mut matches = Vec::new();

        for donor in donors {
            let Some(coordinates) = locations.resolve(&donor.location).await else {
                tracing::warn!("Donor {} skipped: location '{}' did not geocode", donor.id, donor.location);
                unresolved_donors += 1;
                continue;
            };

            if let Some(closest) = find_closest(coordinates, &located_ngos) {
                matches.push(build_match(donor, coordinates, closest));
            }
        }

        tracing::info!(
            "Matched {} of {} donors against {} of {} NGOs ({} geocoder lookups)",
            matches.len(),
            total_donors,
            located_ngos.len(),
            total_ngos,
            locations.lookups()
        );

        MatchReport {
            total_donors,
            total_ngos,
            unresolved_donors,
            unresolved_ngos,
            geocoder_lookups: locations.lookups(),
            matches,
        }
    }
}

fn build_match(donor: DonationOffer, coordinates: Coordinates, closest: Closest<'_, NgoRequest>) -> Match {
    let ngo = &closest.candidate.record;

    Match {
        donor: MatchedDonor {
            id: donor.id,
            food_type: donor.food_type,
            quantity: donor.quantity,
            expiry_time_hours: donor.expiry_time_hours,
            location: donor.location,
            coordinates,
            timestamp: donor.timestamp,
        },
        matched_ngo: MatchedNgo {
            id: ngo.id.clone(),
            ngo_name: ngo.ngo_name.clone(),
            food_needed: ngo.food_needed.clone(),
            location: ngo.location.clone(),
            coordinates: closest.candidate.coordinates,
            distance_km: closest.distance_km,
            timestamp: ngo.timestamp.clone(),
        },
    }
}
