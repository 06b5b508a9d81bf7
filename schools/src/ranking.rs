//! Proximity ranking of schools around a reference point.

use crate::distance::distance_km;
use crate::school::{Coordinates, RankedSchool, School};

/// Annotate every school with its distance from the reference point and
/// sort nearest-first.
///
/// All schools are ranked; nothing is filtered out. Schools at the same
/// rounded distance are ordered by ascending `id`, so the output is
/// deterministic regardless of the input order.
///
/// # Example
///
/// ```ignore
/// let schools = repository.find_all().await?;
/// let ranked = schools::ranking::rank(51.5074, -0.1278, schools);
/// ```
pub fn rank(reference_lat: f64, reference_lon: f64, schools: Vec<School>) -> Vec<RankedSchool> {
    let mut ranked: Vec<RankedSchool> = schools
        .into_iter()
        .map(|school| {
            let distance = distance_km(
                reference_lat,
                reference_lon,
                school.latitude,
                school.longitude,
            );
            RankedSchool {
                school,
                distance_km: distance,
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        a.distance_km
            .total_cmp(&b.distance_km)
            .then_with(|| a.school.id.cmp(&b.school.id))
    });

    ranked
}

/// Same as [`rank`], taking the reference point as [`Coordinates`].
pub fn rank_from(reference: Coordinates, schools: Vec<School>) -> Vec<RankedSchool> {
    rank(reference.latitude, reference.longitude, schools)
}
