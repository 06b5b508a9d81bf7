use anyhow::{bail, Result};
use schools::distance_km;
use schools::validation::validate_coordinates;

pub fn run(from_lat: f64, from_lon: f64, to_lat: f64, to_lon: f64) -> Result<()> {
    for (lat, lon) in [(from_lat, from_lon), (to_lat, to_lon)] {
        if let Err(errors) =
            validate_coordinates(Some(&lat.to_string()), Some(&lon.to_string()))
        {
            bail!("Invalid coordinates: {}", errors);
        }
    }

    println!("{:.2} km", distance_km(from_lat, from_lon, to_lat, to_lon));
    Ok(())
}
