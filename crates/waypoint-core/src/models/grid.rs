//! MGRS grid reference types.
//!
//! A grid reference such as `33UWU9434240445` is a 5-character grid square
//! identifier (2-digit UTM zone, latitude band, 100 km column and row
//! letters) followed by an easting and a northing field of equal width.
//! The field width is the precision: 1 digit resolves 10 km, 5 digits 1 m.

use crate::error::{Result, WaypointError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of the grid square identifier (`33UWU`)
pub const SQUARE_ID_LEN: usize = 5;

/// Number of digits per axis in a grid reference (1..=5)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Precision(u8);

impl Precision {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// One meter resolution
    pub const METER: Precision = Precision(5);

    pub fn new(digits: u8) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&digits) {
            Ok(Self(digits))
        } else {
            Err(WaypointError::ConfigInvalid {
                key: "precision".to_string(),
                reason: format!(
                    "{} is outside the supported range {}..={}",
                    digits,
                    Self::MIN,
                    Self::MAX
                ),
            })
        }
    }

    pub fn digits(&self) -> u8 {
        self.0
    }

    /// Field width in characters
    pub fn width(&self) -> usize {
        self.0 as usize
    }

    /// Size of one grid cell in meters
    pub fn cell_size_m(&self) -> u32 {
        10u32.pow(u32::from(Self::MAX - self.0))
    }

    /// Exclusive upper bound of a field value
    pub fn field_limit(&self) -> u32 {
        10u32.pow(u32::from(self.0))
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self::METER
    }
}

impl TryFrom<u8> for Precision {
    type Error = WaypointError;

    fn try_from(digits: u8) -> Result<Self> {
        Self::new(digits)
    }
}

impl From<Precision> for u8 {
    fn from(precision: Precision) -> u8 {
        precision.0
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A decoded MGRS grid reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridCoordinate {
    /// UTM zone number (1..=60)
    pub zone: u8,
    /// Latitude band letter (C..X, without I and O)
    pub band: char,
    /// 100 km square column letter
    pub column: char,
    /// 100 km square row letter
    pub row: char,
    /// Easting within the 100 km square, in units of the precision's cell size
    pub easting: u32,
    /// Northing within the 100 km square, in units of the precision's cell size
    pub northing: u32,
    pub precision: Precision,
}

impl GridCoordinate {
    /// Create a grid coordinate, checking that the fields fit the precision
    pub fn new(
        zone: u8,
        band: char,
        column: char,
        row: char,
        easting: u32,
        northing: u32,
        precision: Precision,
    ) -> Result<Self> {
        if !(1..=60).contains(&zone) {
            return Err(WaypointError::conversion(zone, "UTM zone must be between 1 and 60"));
        }
        let limit = precision.field_limit();
        if easting >= limit || northing >= limit {
            return Err(WaypointError::conversion(
                format!("{}/{}", easting, northing),
                format!("easting and northing must fit in {} digits", precision),
            ));
        }
        Ok(Self { zone, band, column, row, easting, northing, precision })
    }

    /// The 5-character grid square identifier, e.g. `33UWU`
    pub fn square_id(&self) -> String {
        format!("{:02}{}{}{}", self.zone, self.band, self.column, self.row)
    }

    /// Zero-padded easting field
    pub fn easting_digits(&self) -> String {
        format!("{:0width$}", self.easting, width = self.precision.width())
    }

    /// Zero-padded northing field
    pub fn northing_digits(&self) -> String {
        format!("{:0width$}", self.northing, width = self.precision.width())
    }

    /// True when the band is in the northern hemisphere
    pub fn is_north(&self) -> bool {
        self.band >= 'N'
    }
}

impl fmt::Display for GridCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.square_id(), self.easting_digits(), self.northing_digits())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precision_bounds() {
        assert!(Precision::new(0).is_err());
        assert!(Precision::new(6).is_err());
        assert_eq!(Precision::new(3).unwrap().digits(), 3);
        assert_eq!(Precision::default(), Precision::METER);
    }

    #[test]
    fn test_precision_cell_size() {
        assert_eq!(Precision::new(1).unwrap().cell_size_m(), 10_000);
        assert_eq!(Precision::new(5).unwrap().cell_size_m(), 1);
        assert_eq!(Precision::new(2).unwrap().field_limit(), 100);
    }

    #[test]
    fn test_precision_deserialize_rejects_out_of_range() {
        let ok: Precision = serde_json::from_str("4").unwrap();
        assert_eq!(ok.digits(), 4);
        assert!(serde_json::from_str::<Precision>("9").is_err());
    }

    #[test]
    fn test_canonical_string() {
        let grid =
            GridCoordinate::new(33, 'U', 'W', 'U', 94342, 40445, Precision::METER).unwrap();
        assert_eq!(grid.square_id(), "33UWU");
        assert_eq!(grid.to_string(), "33UWU9434240445");
        assert!(grid.is_north());
    }

    #[test]
    fn test_fields_are_zero_padded() {
        let precision = Precision::new(3).unwrap();
        let grid = GridCoordinate::new(4, 'Q', 'F', 'J', 7, 42, precision).unwrap();
        assert_eq!(grid.to_string(), "04QFJ007042");
        assert_eq!(grid.easting_digits(), "007");
    }

    #[test]
    fn test_field_overflow_is_rejected() {
        let precision = Precision::new(2).unwrap();
        assert!(GridCoordinate::new(33, 'U', 'W', 'U', 100, 5, precision).is_err());
        assert!(GridCoordinate::new(0, 'U', 'W', 'U', 1, 5, precision).is_err());
    }
}
