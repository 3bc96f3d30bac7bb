//! Per-user proximity state: selected landmark, last fix, distance, error.
//!
//! The session owns all mutable state; mutating operations take `&mut self`,
//! so a single session can never have two acquisitions in flight.

use tracing::{debug, info};

use crate::error::{LocationError, SessionError};
use crate::geo::{distance_meters, is_eligible, Coordinate, MINT_RADIUS_METERS};
use crate::landmark::{Landmark, LandmarkSet, MY_LOCATION_NAME};
use crate::location::{LocationSource, PositionProvider};

/// What happens to a known distance when the selected landmark changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TargetChangePolicy {
    /// Recompute against the new landmark from the last known coordinate.
    #[default]
    Recompute,
    /// Leave the previous distance in place until the next acquisition.
    KeepStale,
}

/// Snapshot of the session after the latest acquisition or override.
#[derive(Debug, Clone, PartialEq)]
pub struct ProximityResult {
    pub coordinate: Option<Coordinate>,
    pub distance_m: Option<f64>,
    pub error: Option<LocationError>,
}

pub struct ProximitySession<P> {
    source: LocationSource<P>,
    landmarks: LandmarkSet,
    selected: Landmark,
    radius_m: f64,
    policy: TargetChangePolicy,
    coordinate: Option<Coordinate>,
    distance_m: Option<f64>,
    error: Option<LocationError>,
}

impl<P: PositionProvider> ProximitySession<P> {
    /// Starts Idle with the first landmark selected.
    pub fn new(source: LocationSource<P>, landmarks: LandmarkSet) -> Self {
        let selected = landmarks.first().clone();
        Self {
            source,
            landmarks,
            selected,
            radius_m: MINT_RADIUS_METERS,
            policy: TargetChangePolicy::default(),
            coordinate: None,
            distance_m: None,
            error: None,
        }
    }

    pub fn with_radius(mut self, radius_m: f64) -> Self {
        self.radius_m = radius_m;
        self
    }

    pub fn with_policy(mut self, policy: TargetChangePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn landmarks(&self) -> &LandmarkSet {
        &self.landmarks
    }

    pub fn selected(&self) -> &Landmark {
        &self.selected
    }

    pub fn radius_m(&self) -> f64 {
        self.radius_m
    }

    pub fn coordinate(&self) -> Option<Coordinate> {
        self.coordinate
    }

    pub fn distance_m(&self) -> Option<f64> {
        self.distance_m
    }

    pub fn error(&self) -> Option<&LocationError> {
        self.error.as_ref()
    }

    pub fn result(&self) -> ProximityResult {
        ProximityResult {
            coordinate: self.coordinate,
            distance_m: self.distance_m,
            error: self.error.clone(),
        }
    }

    pub fn is_eligible(&self) -> bool {
        self.distance_m
            .is_some_and(|d| is_eligible(d, self.radius_m))
    }

    pub fn select_landmark(&mut self, name: &str) -> Result<&Landmark, SessionError> {
        let landmark = self
            .landmarks
            .get(name)
            .cloned()
            .ok_or_else(|| SessionError::UnknownLandmark(name.to_string()))?;
        self.retarget(landmark);
        Ok(&self.selected)
    }

    /// Install `landmark` as the ad-hoc entry and select it.
    pub fn select_custom(&mut self, landmark: Landmark) -> Result<&Landmark, SessionError> {
        self.landmarks.set_custom(landmark.clone())?;
        self.retarget(landmark);
        Ok(&self.selected)
    }

    /// Acquire one fix and evaluate it against the selected landmark.
    pub async fn sync_position(&mut self) -> Result<f64, LocationError> {
        match self.source.acquire_current_position().await {
            Ok(coordinate) => Ok(self.locate(coordinate)),
            Err(e) => Err(self.fail(e)),
        }
    }

    pub fn set_manual_position(&mut self, coordinate: Coordinate) -> Result<f64, LocationError> {
        match self.source.set_manual_position(coordinate) {
            Ok(coordinate) => Ok(self.locate(coordinate)),
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Use the device's own position as the destination (test mint flow).
    ///
    /// One acquisition serves as both target and fix, so the distance is zero.
    pub async fn use_current_location_as_target(&mut self) -> Result<&Landmark, SessionError> {
        let coordinate = match self.source.acquire_current_position().await {
            Ok(c) => c,
            Err(e) => return Err(self.fail(e).into()),
        };
        self.select_custom(Landmark::at(MY_LOCATION_NAME, coordinate))?;
        self.locate(coordinate);
        info!("Selected current location as destination");
        Ok(&self.selected)
    }

    /// Select `landmark` and place the user exactly on it, no GPS involved.
    pub fn use_mock_target(&mut self, landmark: Landmark) -> Result<f64, SessionError> {
        let coordinate = landmark.coordinate();
        self.select_custom(landmark)?;
        Ok(self.set_manual_position(coordinate)?)
    }

    fn locate(&mut self, coordinate: Coordinate) -> f64 {
        let d = distance_meters(coordinate, self.selected.coordinate());
        self.coordinate = Some(coordinate);
        self.distance_m = Some(d);
        self.error = None;
        debug!(
            "Distance to {}: {:.1} m (eligible: {})",
            self.selected.name,
            d,
            is_eligible(d, self.radius_m)
        );
        d
    }

    /// A failed acquisition invalidates the distance; the coordinate stays.
    fn fail(&mut self, err: LocationError) -> LocationError {
        self.distance_m = None;
        self.error = Some(err.clone());
        err
    }

    fn retarget(&mut self, landmark: Landmark) {
        self.selected = landmark;
        if self.policy == TargetChangePolicy::Recompute && self.error.is_none() {
            if let Some(coordinate) = self.coordinate {
                self.locate(coordinate);
            }
        }
    }
}
