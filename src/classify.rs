//! Tag-based classification of point entities.

use osmpbfreader::Tags;

use crate::level::{parse_level, LevelParseError};
use crate::models::ParkingSpaceRecord;
use crate::source::PointEntity;

const PARKING_SPACE_KEY: &str = "amenity";
const PARKING_SPACE_VALUE: &str = "parking_space";
const LEVEL_KEY: &str = "level";

/// Outcome of classifying one point
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// Not a parking space
    Ignored,
    /// A parking space whose level tag could not be parsed
    Rejected {
        osm_id: u64,
        level_text: String,
        error: LevelParseError,
    },
    Accepted(ParkingSpaceRecord),
}

pub fn is_parking_space(tags: &Tags) -> bool {
    tags.contains(PARKING_SPACE_KEY, PARKING_SPACE_VALUE)
}

/// Decide whether a point becomes a record.
///
/// A `level` tag with an empty value counts as no level at all.
pub fn classify(point: &PointEntity) -> Classification {
    if !is_parking_space(&point.tags) {
        return Classification::Ignored;
    }

    let record = ParkingSpaceRecord::new(point.id, point.lat, point.lon);

    let level_text = match point.tags.get(LEVEL_KEY) {
        Some(text) if !text.is_empty() => text.as_str(),
        _ => return Classification::Accepted(record),
    };

    match parse_level(level_text) {
        Ok(level) => Classification::Accepted(record.with_level(level.value, level.precision)),
        Err(error) => Classification::Rejected {
            osm_id: point.id,
            level_text: level_text.to_string(),
            error,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::INVALID_LEVEL;

    fn point(id: u64, tags: &[(&str, &str)]) -> PointEntity {
        let mut t = Tags::new();
        for (k, v) in tags {
            t.insert((*k).into(), (*v).into());
        }
        PointEntity {
            id,
            lat: 52.54,
            lon: 7.5001,
            tags: t,
        }
    }

    #[test]
    fn test_non_parking_ignored() {
        let p = point(1, &[("amenity", "parking"), ("level", "1")]);
        assert_eq!(classify(&p), Classification::Ignored);

        let p = point(2, &[("parking_space", "amenity")]);
        assert_eq!(classify(&p), Classification::Ignored);
    }

    #[test]
    fn test_no_level_gets_sentinel() {
        let p = point(12, &[("amenity", "parking_space")]);
        match classify(&p) {
            Classification::Accepted(record) => {
                assert_eq!(record.osm_id, 12);
                assert_eq!(record.level, INVALID_LEVEL);
                assert_eq!(record.level_precision, 0.0);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_empty_level_treated_as_absent() {
        let p = point(12, &[("amenity", "parking_space"), ("level", "")]);
        match classify(&p) {
            Classification::Accepted(record) => assert!(!record.has_level()),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_level_parsed() {
        let p = point(17, &[("amenity", "parking_space"), ("level", "75.35")]);
        match classify(&p) {
            Classification::Accepted(record) => {
                assert!((record.level - 75.35).abs() < 1e-5);
                assert_eq!(record.level_precision, 2.0);
                assert_eq!(record.lat, 52.54);
                assert_eq!(record.lon, 7.5001);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_reserved_level_rejected() {
        let text = "340282346638528859811704183484516925440";
        let p = point(21, &[("amenity", "parking_space"), ("level", text)]);
        assert!(matches!(
            classify(&p),
            Classification::Rejected {
                osm_id: 21,
                error: LevelParseError::Reserved(_),
                ..
            }
        ));
    }

    #[test]
    fn test_multi_level_rejected() {
        let p = point(20, &[("amenity", "parking_space"), ("level", "1;2")]);
        match classify(&p) {
            Classification::Rejected {
                osm_id, level_text, ..
            } => {
                assert_eq!(osm_id, 20);
                assert_eq!(level_text, "1;2");
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
