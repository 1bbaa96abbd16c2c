//! MGRS grid references on top of UTM
//!
//! Forward conversion picks the UTM zone (including the Norway and Svalbard
//! exceptions), projects with PROJ and letters the 100 km square. Field
//! digits are truncated, never rounded, so a grid reference always names
//! the cell that contains the point and the inverse returns that cell's
//! south-west corner.
//!
//! Only the UTM domain is covered: latitudes from 80°S to 84°N. The polar
//! UPS lettering is not implemented.

use waypoint_core::error::{Result, WaypointError};
use waypoint_core::models::{GeoPoint, GridCoordinate, Precision, SQUARE_ID_LEN};

use crate::transform::{self, UtmCoordinate, UtmZone};

pub const MIN_LATITUDE: f64 = -80.0;
pub const MAX_LATITUDE: f64 = 84.0;

const BAND_LETTERS: &[u8; 20] = b"CDEFGHJKLMNPQRSTUVWX";
const ROW_LETTERS: &[u8; 20] = b"ABCDEFGHJKLMNPQRSTUV";

/// Column letters repeat every three zones, indexed by `zone % 3`
const COLUMN_SETS: [&[u8; 8]; 3] = [b"STUVWXYZ", b"ABCDEFGH", b"JKLMNPQR"];

const SQUARE_SIZE_M: f64 = 100_000.0;
const ROW_CYCLE_M: f64 = 2_000_000.0;

/// Convert a geographic point to a grid reference
pub fn to_grid(point: GeoPoint, precision: Precision) -> Result<GridCoordinate> {
    if !point.is_valid() {
        return Err(WaypointError::conversion(point, "not a valid latitude/longitude pair"));
    }
    let band = band_letter(point.latitude).ok_or_else(|| {
        WaypointError::conversion(
            point,
            format!(
                "latitude outside the MGRS/UTM domain ({}..={}); polar regions are not supported",
                MIN_LATITUDE, MAX_LATITUDE
            ),
        )
    })?;

    let zone = UtmZone::new(zone_number(point), point.latitude >= 0.0)?;
    let utm = transform::project(point, zone)?;

    // PROJ can hand back -0.0 or sub-nanometre negatives on the equator
    let northing = if utm.northing < 0.0 && utm.northing > -1e-6 { 0.0 } else { utm.northing };
    let (column, row) = square_letters(zone.number, utm.easting, northing)
        .ok_or_else(|| WaypointError::conversion(point, "easting falls outside the zone"))?;

    let cell = f64::from(precision.cell_size_m());
    let easting_field = (utm.easting.rem_euclid(SQUARE_SIZE_M) / cell).floor() as u32;
    let northing_field = (northing.rem_euclid(SQUARE_SIZE_M) / cell).floor() as u32;

    let grid = GridCoordinate::new(
        zone.number,
        band,
        column,
        row,
        easting_field,
        northing_field,
        precision,
    )?;
    tracing::trace!(%point, grid = %grid, "Converted to grid reference");
    Ok(grid)
}

/// Convert a grid reference string to the south-west corner of its cell
pub fn to_latlon(grid: &str) -> Result<GeoPoint> {
    grid_to_latlon(&parse(grid)?)
}

/// Convert a decoded grid reference to the south-west corner of its cell
pub fn grid_to_latlon(grid: &GridCoordinate) -> Result<GeoPoint> {
    let zone = UtmZone::new(grid.zone, grid.is_north())?;
    let (square_easting, square_northing) =
        square_origin(grid.zone, grid.band, grid.column, grid.row)
            .ok_or_else(|| WaypointError::conversion(grid, "unknown 100 km square letters"))?;

    let cell = f64::from(grid.precision.cell_size_m());
    let utm = UtmCoordinate {
        zone,
        easting: square_easting + f64::from(grid.easting) * cell,
        northing: square_northing + f64::from(grid.northing) * cell,
    };
    transform::unproject(&utm)
}

/// Parse a grid reference string.
///
/// Whitespace is ignored and letters are case-insensitive. The zone may be
/// written with one or two digits. The digit part must have an even length
/// between 2 and 10.
pub fn parse(grid: &str) -> Result<GridCoordinate> {
    let cleaned: String =
        grid.chars().filter(|c| !c.is_whitespace()).collect::<String>().to_ascii_uppercase();
    if !cleaned.is_ascii() {
        return Err(WaypointError::conversion(grid, "grid reference must be ASCII"));
    }

    let zone_len = cleaned.bytes().take_while(u8::is_ascii_digit).count();
    if zone_len == 0 || zone_len > 2 {
        return Err(WaypointError::conversion(grid, "expected a 1 or 2 digit zone number"));
    }
    let zone: u8 = cleaned[..zone_len]
        .parse()
        .map_err(|_| WaypointError::conversion(grid, "invalid zone number"))?;

    let rest = cleaned[zone_len..].as_bytes();
    if rest.len() < 3 || !rest[..3].iter().all(u8::is_ascii_alphabetic) {
        return Err(WaypointError::conversion(grid, "expected band and 100 km square letters"));
    }
    let (band, column, row) = (rest[0] as char, rest[1] as char, rest[2] as char);
    if !BAND_LETTERS.contains(&rest[0]) {
        return Err(WaypointError::conversion(grid, format!("invalid latitude band '{}'", band)));
    }

    let digits = &cleaned[zone_len + 3..];
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(WaypointError::conversion(grid, "easting and northing must be digits"));
    }
    if digits.is_empty() || digits.len() % 2 != 0 || digits.len() > 2 * usize::from(Precision::MAX)
    {
        return Err(WaypointError::conversion(
            grid,
            "easting and northing must have the same number of digits (1 to 5)",
        ));
    }

    let width = digits.len() / 2;
    let precision = Precision::new(width as u8)?;
    let (easting, northing) = digits.split_at(width);
    let easting = easting.parse().map_err(|_| WaypointError::conversion(grid, "invalid easting"))?;
    let northing =
        northing.parse().map_err(|_| WaypointError::conversion(grid, "invalid northing"))?;

    let coordinate = GridCoordinate::new(zone, band, column, row, easting, northing, precision)?;
    if square_origin(zone, band, column, row).is_none() {
        return Err(WaypointError::conversion(
            grid,
            format!("'{}{}' is not a 100 km square in zone {}", column, row, zone),
        ));
    }
    Ok(coordinate)
}

/// A grid reference split into its square identifier and the two fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridParts {
    /// Grid square identifier, e.g. `33UWU`
    pub identifier: String,
    pub easting: String,
    pub northing: String,
}

impl GridParts {
    /// Reassemble the original grid reference
    pub fn concat(&self) -> String {
        format!("{}{}{}", self.identifier, self.easting, self.northing)
    }

    pub fn easting_value(&self) -> Result<u32> {
        self.easting.parse().map_err(|_| WaypointError::conversion(&self.easting, "invalid easting"))
    }

    pub fn northing_value(&self) -> Result<u32> {
        self.northing
            .parse()
            .map_err(|_| WaypointError::conversion(&self.northing, "invalid northing"))
    }
}

/// Split a canonical grid reference at the given precision.
///
/// The fields are taken from the end of the string, `precision` characters
/// each; what precedes them is the grid square identifier.
pub fn decompose(grid: &str, precision: Precision) -> Result<GridParts> {
    let width = precision.width();
    let expected = SQUARE_ID_LEN + 2 * width;
    if !grid.is_ascii() || grid.len() != expected {
        return Err(WaypointError::conversion(
            grid,
            format!("expected {} characters for precision {}", expected, precision),
        ));
    }

    let (identifier, digits) = grid.split_at(grid.len() - 2 * width);
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(WaypointError::conversion(grid, "easting and northing must be digits"));
    }
    let (easting, northing) = digits.split_at(width);

    Ok(GridParts {
        identifier: identifier.to_string(),
        easting: easting.to_string(),
        northing: northing.to_string(),
    })
}

/// Build a grid reference from a square identifier and numeric fields,
/// zero-padding each field to the precision's width
pub fn compose(identifier: &str, easting: u32, northing: u32, precision: Precision) -> Result<String> {
    if !identifier.is_ascii() || identifier.len() != SQUARE_ID_LEN {
        return Err(WaypointError::conversion(
            identifier,
            format!("grid square identifier must be {} characters", SQUARE_ID_LEN),
        ));
    }
    let limit = precision.field_limit();
    if easting >= limit || northing >= limit {
        return Err(WaypointError::conversion(
            format!("{}/{}", easting, northing),
            format!("easting and northing must fit in {} digits", precision),
        ));
    }

    let width = precision.width();
    Ok(format!("{}{:0width$}{:0width$}", identifier, easting, northing, width = width))
}

/// Latitude band letter, or `None` outside the UTM domain
pub fn band_letter(latitude: f64) -> Option<char> {
    if !(MIN_LATITUDE..=MAX_LATITUDE).contains(&latitude) {
        return None;
    }
    // Band X is stretched to 12 degrees, so 84°N still lands in it
    let idx = (((latitude - MIN_LATITUDE) / 8.0).floor() as usize).min(BAND_LETTERS.len() - 1);
    Some(BAND_LETTERS[idx] as char)
}

/// UTM zone number for a point, with the Norway and Svalbard exceptions
pub fn zone_number(point: GeoPoint) -> u8 {
    let (lat, lon) = (point.latitude, point.longitude);
    let lon = if lon >= 180.0 { lon - 360.0 } else { lon };

    if (56.0..64.0).contains(&lat) && (3.0..12.0).contains(&lon) {
        return 32;
    }
    if (72.0..=MAX_LATITUDE).contains(&lat) {
        if (0.0..9.0).contains(&lon) {
            return 31;
        } else if (9.0..21.0).contains(&lon) {
            return 33;
        } else if (21.0..33.0).contains(&lon) {
            return 35;
        } else if (33.0..42.0).contains(&lon) {
            return 37;
        }
    }

    let zone = ((lon + 180.0) / 6.0).floor() as i32 + 1;
    zone.clamp(1, 60) as u8
}

fn column_set(zone: u8) -> &'static [u8; 8] {
    COLUMN_SETS[usize::from(zone % 3)]
}

/// 100 km column and row letters for a UTM position
fn square_letters(zone: u8, easting: f64, northing: f64) -> Option<(char, char)> {
    let column_idx = (easting / SQUARE_SIZE_M).floor() as i64;
    if !(1..=8).contains(&column_idx) {
        return None;
    }
    let column = column_set(zone)[(column_idx - 1) as usize];

    let mut row_idx = ((northing / SQUARE_SIZE_M).floor() as i64).rem_euclid(20);
    if zone % 2 == 0 {
        row_idx = (row_idx + 5) % 20;
    }
    let row = ROW_LETTERS[row_idx as usize];

    Some((column as char, row as char))
}

/// UTM easting and northing of the south-west corner of a 100 km square
fn square_origin(zone: u8, band: char, column: char, row: char) -> Option<(f64, f64)> {
    let column_idx = column_set(zone).iter().position(|&c| c as char == column)?;
    let mut row_idx = ROW_LETTERS.iter().position(|&c| c as char == row)?;
    if zone % 2 == 0 {
        row_idx = (row_idx + 15) % 20;
    }

    let easting = (column_idx as f64 + 1.0) * SQUARE_SIZE_M;
    let mut northing = row_idx as f64 * SQUARE_SIZE_M;

    // Row letters cycle every 2000 km; lift into the band
    let min_northing = band_min_northing(band)?;
    while northing < min_northing {
        northing += ROW_CYCLE_M;
    }
    Some((easting, northing))
}

/// Lowest UTM northing reached by a latitude band, rounded down to 100 km
fn band_min_northing(band: char) -> Option<f64> {
    let meters = match band {
        'C' => 1_100_000.0,
        'D' => 2_000_000.0,
        'E' => 2_800_000.0,
        'F' => 3_700_000.0,
        'G' => 4_600_000.0,
        'H' => 5_500_000.0,
        'J' => 6_400_000.0,
        'K' => 7_300_000.0,
        'L' => 8_200_000.0,
        'M' => 9_100_000.0,
        'N' => 0.0,
        'P' => 800_000.0,
        'Q' => 1_700_000.0,
        'R' => 2_600_000.0,
        'S' => 3_500_000.0,
        'T' => 4_400_000.0,
        'U' => 5_300_000.0,
        'V' => 6_200_000.0,
        'W' => 7_000_000.0,
        'X' => 7_900_000.0,
        _ => return None,
    };
    Some(meters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn p(digits: u8) -> Precision {
        Precision::new(digits).unwrap()
    }

    fn grid(lat: f64, lon: f64, precision: u8) -> String {
        to_grid(GeoPoint::new(lat, lon), p(precision)).unwrap().to_string()
    }

    /// Ground distance in meters, good enough at the meter scale
    fn distance_m(a: GeoPoint, b: GeoPoint) -> f64 {
        let mean_lat = ((a.latitude + b.latitude) / 2.0).to_radians();
        let dy = (a.latitude - b.latitude) * 111_320.0;
        let dx = (a.longitude - b.longitude) * 111_320.0 * mean_lat.cos();
        (dx * dx + dy * dy).sqrt()
    }

    #[test]
    fn test_reference_points() {
        assert_eq!(grid(52.705681, 16.396344, 5), "33UWU9434240445");
        assert_eq!(grid(52.0, 16.0, 5), "33UWT6864961510");
        assert_eq!(grid(40.0, -74.0, 5), "18TWK8536028236");
        assert_eq!(grid(-33.8688, 151.2093, 5), "56HLH3436850948");
        assert_eq!(grid(0.0, 0.0, 5), "31NAA6602100000");
    }

    #[test]
    fn test_fields_are_truncated() {
        assert_eq!(grid(52.705681, 16.396344, 3), "33UWU943404");
        assert_eq!(grid(52.705681, 16.396344, 1), "33UWU94");
        assert_eq!(grid(52.0, 16.0, 3), "33UWT686615");
        assert_eq!(grid(52.0, 16.0, 1), "33UWT66");
    }

    #[test]
    fn test_norway_exception() {
        assert_eq!(zone_number(GeoPoint::new(60.0, 5.0)), 32);
        assert_eq!(grid(60.0, 5.0, 5), "32VKM7697958157");
    }

    #[test]
    fn test_svalbard_exceptions() {
        assert_eq!(zone_number(GeoPoint::new(78.0, 8.0)), 31);
        assert_eq!(zone_number(GeoPoint::new(78.0, 15.0)), 33);
        assert_eq!(zone_number(GeoPoint::new(78.0, 25.0)), 35);
        assert_eq!(zone_number(GeoPoint::new(78.0, 40.0)), 37);
        assert_eq!(zone_number(GeoPoint::new(78.0, 45.0)), 38);
    }

    #[test]
    fn test_zone_edges() {
        assert_eq!(zone_number(GeoPoint::new(0.0, -180.0)), 1);
        assert_eq!(zone_number(GeoPoint::new(0.0, 180.0)), 1);
        assert_eq!(zone_number(GeoPoint::new(0.0, 179.9)), 60);
    }

    #[test]
    fn test_band_letters() {
        assert_eq!(band_letter(-80.0), Some('C'));
        assert_eq!(band_letter(0.0), Some('N'));
        assert_eq!(band_letter(-0.1), Some('M'));
        assert_eq!(band_letter(52.7), Some('U'));
        assert_eq!(band_letter(84.0), Some('X'));
        assert_eq!(band_letter(84.1), None);
        assert_eq!(band_letter(-80.1), None);
    }

    #[test]
    fn test_out_of_domain_is_conversion_error() {
        let err = to_grid(GeoPoint::new(90.0, 0.0), Precision::METER).unwrap_err();
        assert!(matches!(err, WaypointError::Conversion { .. }));
        assert!(to_grid(GeoPoint::new(-85.0, 0.0), Precision::METER).is_err());
        assert!(to_grid(GeoPoint::new(f64::NAN, 0.0), Precision::METER).is_err());
        assert!(to_grid(GeoPoint::new(10.0, 200.0), Precision::METER).is_err());
    }

    #[test]
    fn test_to_latlon_returns_south_west_corner() {
        let point = GeoPoint::new(52.705681, 16.396344);
        let corner = to_latlon("33UWU9434240445").unwrap();
        assert!(corner.latitude <= point.latitude);
        assert!(corner.longitude <= point.longitude);
        assert!(distance_m(point, corner) < 1.5);

        // The corner sits inside the coarser cell it was truncated from
        assert_eq!(to_grid(corner, p(3)).unwrap().to_string(), "33UWU943404");
    }

    #[test]
    fn test_to_latlon_southern_hemisphere() {
        let point = GeoPoint::new(-33.8688, 151.2093);
        let corner = to_latlon("56HLH3436850948").unwrap();
        assert!(distance_m(point, corner) < 1.5);
    }

    #[test]
    fn test_parse_is_lenient_about_formatting() {
        let strict = parse("33UWU9434240445").unwrap();
        assert_eq!(parse("33U WU 94342 40445").unwrap(), strict);
        assert_eq!(parse("33uwu9434240445").unwrap(), strict);

        let short_zone = parse("4QFJ12345678").unwrap();
        assert_eq!(short_zone.zone, 4);
        assert_eq!(short_zone.precision.digits(), 4);
        assert_eq!(short_zone.to_string(), "04QFJ12345678");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(parse("").is_err());
        assert!(parse("33UWU943424044").is_err(), "odd digit count");
        assert!(parse("33UWU").is_err(), "no fields");
        assert!(parse("33IWU9434240445").is_err(), "band I does not exist");
        assert!(parse("33UAU9434240445").is_err(), "column A is not used in zone 33");
        assert!(parse("33UWW9434240445").is_err(), "row W does not exist");
        assert!(parse("61UWU9434240445").is_err());
        assert!(parse("33UWU94342404451234").is_err());
        assert!(parse("33UWU94342x0445").is_err());
    }

    #[test]
    fn test_decompose_reference() {
        let parts = decompose("33UWU9434240445", Precision::METER).unwrap();
        assert_eq!(parts.identifier, "33UWU");
        assert_eq!(parts.easting, "94342");
        assert_eq!(parts.northing, "40445");
        assert_eq!(parts.easting_value().unwrap(), 94342);

        let parts = decompose("33UWU943404", p(3)).unwrap();
        assert_eq!(parts.identifier, "33UWU");
        assert_eq!(parts.easting, "943");
        assert_eq!(parts.northing, "404");
    }

    #[test]
    fn test_decompose_keeps_leading_zeros() {
        let parts = decompose("31NAA6602100000", Precision::METER).unwrap();
        assert_eq!(parts.northing, "00000");
        assert_eq!(parts.northing_value().unwrap(), 0);
    }

    #[test]
    fn test_decompose_wrong_length() {
        assert!(decompose("33UWU9434240445", p(4)).is_err());
        assert!(decompose("33UWU94342", Precision::METER).is_err());
    }

    #[test]
    fn test_compose_pads_fields() {
        assert_eq!(compose("33UWU", 7, 42, p(3)).unwrap(), "33UWU007042");
        assert_eq!(compose("33UWU", 94342, 40445, Precision::METER).unwrap(), "33UWU9434240445");
        assert!(compose("33UWU", 1000, 0, p(3)).is_err());
        assert!(compose("33UW", 1, 1, p(3)).is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_decompose_concatenates_back(
            lat in -79.9f64..83.9,
            lon in -179.9f64..179.9,
            digits in 1u8..=5,
        ) {
            let precision = p(digits);
            let grid = to_grid(GeoPoint::new(lat, lon), precision).unwrap().to_string();
            let parts = decompose(&grid, precision).unwrap();
            prop_assert_eq!(parts.identifier.len(), SQUARE_ID_LEN);
            prop_assert_eq!(parts.easting.len(), precision.width());
            prop_assert_eq!(parts.concat(), grid);
        }

        #[test]
        fn prop_round_trip_within_cell(
            lat in -79.9f64..83.9,
            lon in -179.9f64..179.9,
            digits in 1u8..=5,
        ) {
            let precision = p(digits);
            let point = GeoPoint::new(lat, lon);
            let grid = to_grid(point, precision).unwrap();
            let corner = grid_to_latlon(&grid).unwrap();

            let cell = f64::from(precision.cell_size_m());
            let error = distance_m(point, corner);
            prop_assert!(error <= 1.5 * cell, "{} -> {} -> {} ({} m)", point, grid, corner, error);
        }
    }
}
