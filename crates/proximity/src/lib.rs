//! # proximity
//!
//! Proof-of-presence core for Hike Passport: acquire the device position
//! (or take a manual override), measure the great-circle distance to the
//! selected landmark, and gate minting on the mint radius.

pub mod error;
pub mod geo;
pub mod gpsd;
pub mod landmark;
pub mod location;
pub mod session;

pub use error::{LocationError, LocationErrorKind, SessionError};
pub use geo::{distance_meters, is_eligible, Coordinate, EARTH_RADIUS_METERS, MINT_RADIUS_METERS};
pub use gpsd::GpsdProvider;
pub use landmark::{Landmark, LandmarkSet};
pub use location::{FixedProvider, HostError, LocationSource, PositionOptions, PositionProvider};
pub use session::{ProximityResult, ProximitySession, TargetChangePolicy};
