use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::geo::{distance_meters, Coordinate};

/// Name given to a landmark synthesized from the device's own position.
pub const MY_LOCATION_NAME: &str = "My Location (Test)";
pub const MOCK_LOCATION_NAME: &str = "Kathmandu (Mock)";

/// Names owned by the ad-hoc slot; configured landmarks may not use them.
const RESERVED_NAMES: [&str; 2] = [MY_LOCATION_NAME, MOCK_LOCATION_NAME];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

impl Landmark {
    pub fn new(name: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            name: name.into(),
            lat,
            lng,
        }
    }

    pub fn at(name: impl Into<String>, coordinate: Coordinate) -> Self {
        Self::new(name, coordinate.lat, coordinate.lng)
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }

    pub fn distance_from(&self, other: Coordinate) -> f64 {
        distance_meters(other, self.coordinate())
    }
}

/// Trekking landmarks in Nepal.
pub fn default_landmarks() -> Vec<Landmark> {
    vec![
        Landmark::new("Kathmandu (Basantapur)", 27.704, 85.307),
        Landmark::new("Poon Hill", 28.397, 83.684),
        Landmark::new("Everest Base Camp", 28.004, 86.858),
        Landmark::new("Annapurna Base Camp", 28.530, 83.939),
    ]
}

/// Stand-in destination for trying the flow without a GPS fix.
pub fn kathmandu_mock() -> Landmark {
    Landmark::new(MOCK_LOCATION_NAME, 27.704, 85.307)
}

/// The selectable landmarks: a fixed list plus at most one ad-hoc entry.
/// Names are unique across both.
#[derive(Debug, Clone)]
pub struct LandmarkSet {
    fixed: Vec<Landmark>,
    custom: Option<Landmark>,
}

impl LandmarkSet {
    pub fn new(landmarks: Vec<Landmark>) -> Result<Self, SessionError> {
        if landmarks.is_empty() {
            return Err(SessionError::NoLandmarks);
        }
        for (i, l) in landmarks.iter().enumerate() {
            if RESERVED_NAMES.contains(&l.name.as_str()) {
                return Err(SessionError::ReservedLandmarkName(l.name.clone()));
            }
            if landmarks[..i].iter().any(|p| p.name == l.name) {
                return Err(SessionError::DuplicateLandmark(l.name.clone()));
            }
        }
        Ok(Self {
            fixed: landmarks,
            custom: None,
        })
    }

    pub fn get(&self, name: &str) -> Option<&Landmark> {
        self.iter().find(|l| l.name == name)
    }

    /// Install the ad-hoc landmark, replacing any previous one.
    pub fn set_custom(&mut self, landmark: Landmark) -> Result<(), SessionError> {
        if self.fixed.iter().any(|l| l.name == landmark.name) {
            return Err(SessionError::DuplicateLandmark(landmark.name));
        }
        self.custom = Some(landmark);
        Ok(())
    }

    pub fn custom(&self) -> Option<&Landmark> {
        self.custom.as_ref()
    }

    pub fn first(&self) -> &Landmark {
        &self.fixed[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Landmark> {
        self.fixed.iter().chain(self.custom.iter())
    }

    pub fn len(&self) -> usize {
        self.fixed.len() + usize::from(self.custom.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for LandmarkSet {
    fn default() -> Self {
        Self {
            fixed: default_landmarks(),
            custom: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_set() {
        let set = LandmarkSet::default();
        assert_eq!(set.len(), 4);
        assert_eq!(set.first().name, "Kathmandu (Basantapur)");
        let ebc = set.get("Everest Base Camp").unwrap();
        assert_eq!(ebc.coordinate(), Coordinate::new(28.004, 86.858));
        assert!(set.get("K2").is_none());
    }

    #[test]
    fn test_rejects_duplicates_and_empty() {
        let dup = vec![Landmark::new("A", 0.0, 0.0), Landmark::new("A", 1.0, 1.0)];
        assert_eq!(
            LandmarkSet::new(dup).unwrap_err(),
            SessionError::DuplicateLandmark("A".into())
        );
        assert_eq!(LandmarkSet::new(vec![]).unwrap_err(), SessionError::NoLandmarks);
    }

    #[test]
    fn test_rejects_reserved_names() {
        for name in [MY_LOCATION_NAME, MOCK_LOCATION_NAME] {
            let mut landmarks = default_landmarks();
            landmarks.push(Landmark::new(name, 0.0, 0.0));
            assert_eq!(
                LandmarkSet::new(landmarks).unwrap_err(),
                SessionError::ReservedLandmarkName(name.into())
            );
        }
    }

    #[test]
    fn test_custom_replaces_previous() {
        let mut set = LandmarkSet::default();
        set.set_custom(Landmark::new(MY_LOCATION_NAME, 1.0, 2.0)).unwrap();
        set.set_custom(Landmark::new("Kathmandu (Mock)", 27.704, 85.307)).unwrap();
        assert_eq!(set.len(), 5);
        assert!(set.get(MY_LOCATION_NAME).is_none());
        assert_eq!(set.custom().unwrap().name, "Kathmandu (Mock)");
    }

    #[test]
    fn test_custom_cannot_shadow_fixed() {
        let mut set = LandmarkSet::default();
        let err = set.set_custom(Landmark::new("Poon Hill", 0.0, 0.0)).unwrap_err();
        assert_eq!(err, SessionError::DuplicateLandmark("Poon Hill".into()));
        assert!(set.custom().is_none());
    }

    #[test]
    fn test_distance_from_self_is_zero() {
        let l = kathmandu_mock();
        assert_eq!(l.distance_from(l.coordinate()), 0.0);
    }
}
