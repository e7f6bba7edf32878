//! Ride records: solo rides and pooled rides built on top of them.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::agents::RiderId;
use crate::grid::Location;
use crate::service_type::ServiceType;

/// Fare discount applied to pooled rides.
pub const SHARED_DISCOUNT_RATE: f64 = 0.3;

/// Rider preference stored on the ride; it has no effect on dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RideMode {
    #[default]
    Standard,
    Silent,
}

/// Single-rider trip from pickup to dropoff.
#[derive(Debug, Clone, PartialEq)]
pub struct Ride {
    rider: RiderId,
    pickup: Location,
    dropoff: Location,
    service_type: ServiceType,
    mode: RideMode,
    rating: u8,
}

impl Ride {
    pub fn new(
        rider: RiderId,
        pickup: Location,
        dropoff: Location,
        service_type: ServiceType,
        mode: RideMode,
    ) -> Self {
        Self {
            rider,
            pickup,
            dropoff,
            service_type,
            mode,
            rating: 0,
        }
    }

    pub fn rider(&self) -> RiderId {
        self.rider
    }

    pub fn pickup(&self) -> Location {
        self.pickup
    }

    pub fn dropoff(&self) -> Location {
        self.dropoff
    }

    pub fn service_type(&self) -> ServiceType {
        self.service_type
    }

    pub fn mode(&self) -> RideMode {
        self.mode
    }

    /// Stars given by the rider; 0 while unrated.
    pub fn rating(&self) -> u8 {
        self.rating
    }

    pub fn set_rating(&mut self, stars: u8) {
        self.rating = stars;
    }

    pub fn distance(&self) -> u32 {
        self.pickup.distance(self.dropoff)
    }
}

impl fmt::Display for Ride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.pickup, self.dropoff)
    }
}

/// Rider leaving a pooled ride, with the stars they gave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Departure {
    pub rider: RiderId,
    pub dropoff: Location,
    pub rating: u8,
}

/// Pooled ride anchored on the solo ride it grew out of.
///
/// `riders`, `dropoffs` and `ratings` are index-aligned queues: a rider joins
/// together with their dropoff and leaves together with it, from the head.
/// Ratings of riders who already left are kept in `settled_ratings`, and every
/// dropoff ever queued stays in `itinerary` so distance and reviews can still be
/// settled once the queues are empty.
#[derive(Debug, Clone, PartialEq)]
pub struct SharedRide {
    anchor: Ride,
    riders: VecDeque<RiderId>,
    dropoffs: VecDeque<Location>,
    ratings: VecDeque<u8>,
    itinerary: Vec<Location>,
    settled_ratings: Vec<u8>,
}

impl SharedRide {
    pub fn from_ride(anchor: Ride) -> Self {
        let mut riders = VecDeque::new();
        let mut dropoffs = VecDeque::new();
        let mut ratings = VecDeque::new();
        riders.push_back(anchor.rider());
        dropoffs.push_back(anchor.dropoff());
        ratings.push_back(anchor.rating());
        Self {
            itinerary: vec![anchor.dropoff()],
            anchor,
            riders,
            dropoffs,
            ratings,
            settled_ratings: Vec::new(),
        }
    }

    /// Queues another rider and their dropoff at the back.
    pub fn add_rider(&mut self, rider: RiderId, dropoff: Location) {
        self.riders.push_back(rider);
        self.dropoffs.push_back(dropoff);
        self.ratings.push_back(0);
        self.itinerary.push(dropoff);
        self.check_aligned();
    }

    /// Removes the head rider together with their dropoff and rating.
    pub fn remove_head(&mut self) -> Option<Departure> {
        let rider = self.riders.pop_front()?;
        let dropoff = self.dropoffs.pop_front();
        let rating = self.ratings.pop_front();
        let (Some(dropoff), Some(rating)) = (dropoff, rating) else {
            panic!("shared ride queues out of step: rider {rider} had no dropoff/rating");
        };
        self.settled_ratings.push(rating);
        self.check_aligned();
        Some(Departure {
            rider,
            dropoff,
            rating,
        })
    }

    /// Rates the rider at the head of the queue.
    pub fn rate_head(&mut self, stars: u8) {
        if let Some(rating) = self.ratings.front_mut() {
            *rating = stars;
        }
    }

    pub fn pickup(&self) -> Location {
        self.anchor.pickup()
    }

    /// Next dropoff, i.e. the head rider's.
    pub fn next_dropoff(&self) -> Option<Location> {
        self.dropoffs.front().copied()
    }

    pub fn head_rider(&self) -> Option<RiderId> {
        self.riders.front().copied()
    }

    pub fn riders(&self) -> &VecDeque<RiderId> {
        &self.riders
    }

    pub fn dropoffs(&self) -> &VecDeque<Location> {
        &self.dropoffs
    }

    pub fn ratings(&self) -> &VecDeque<u8> {
        &self.ratings
    }

    /// Every rating given on this ride, departed riders first.
    pub fn all_ratings(&self) -> impl Iterator<Item = u8> + '_ {
        self.settled_ratings
            .iter()
            .chain(self.ratings.iter())
            .copied()
    }

    pub fn is_finished(&self) -> bool {
        self.riders.is_empty() && self.dropoffs.is_empty()
    }

    pub fn service_type(&self) -> ServiceType {
        self.anchor.service_type()
    }

    pub fn mode(&self) -> RideMode {
        self.anchor.mode()
    }

    /// Anchor trip plus each hop between consecutive dropoffs.
    pub fn distance(&self) -> u32 {
        let hops: u32 = self
            .itinerary
            .windows(2)
            .map(|pair| pair[0].distance(pair[1]))
            .sum();
        self.anchor.distance() + hops
    }

    fn check_aligned(&self) {
        assert!(
            self.riders.len() == self.dropoffs.len() && self.dropoffs.len() == self.ratings.len(),
            "shared ride queues out of step: {} riders, {} dropoffs, {} ratings",
            self.riders.len(),
            self.dropoffs.len(),
            self.ratings.len()
        );
    }
}

impl fmt::Display for SharedRide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to ", self.pickup())?;
        let last = self.itinerary.len().saturating_sub(1);
        for (i, dropoff) in self.itinerary.iter().enumerate() {
            match i {
                0 => write!(f, "{dropoff}")?,
                i if i == last => write!(f, " and {dropoff}")?,
                _ => write!(f, ", {dropoff}")?,
            }
        }
        Ok(())
    }
}

/// The ride a vehicle is currently working.
#[derive(Debug, Clone, PartialEq)]
pub enum RideKind {
    Solo(Ride),
    Shared(SharedRide),
}

impl RideKind {
    pub fn pickup(&self) -> Location {
        match self {
            RideKind::Solo(ride) => ride.pickup(),
            RideKind::Shared(shared) => shared.pickup(),
        }
    }

    /// Where the vehicle drops off next. `None` once a pooled ride has let
    /// everyone out.
    pub fn current_dropoff(&self) -> Option<Location> {
        match self {
            RideKind::Solo(ride) => Some(ride.dropoff()),
            RideKind::Shared(shared) => shared.next_dropoff(),
        }
    }

    /// Rider who gets out at [`RideKind::current_dropoff`].
    pub fn current_rider(&self) -> Option<RiderId> {
        match self {
            RideKind::Solo(ride) => Some(ride.rider()),
            RideKind::Shared(shared) => shared.head_rider(),
        }
    }

    pub fn service_type(&self) -> ServiceType {
        match self {
            RideKind::Solo(ride) => ride.service_type(),
            RideKind::Shared(shared) => shared.service_type(),
        }
    }

    pub fn mode(&self) -> RideMode {
        match self {
            RideKind::Solo(ride) => ride.mode(),
            RideKind::Shared(shared) => shared.mode(),
        }
    }

    pub fn distance(&self) -> u32 {
        match self {
            RideKind::Solo(ride) => ride.distance(),
            RideKind::Shared(shared) => shared.distance(),
        }
    }

    pub fn discount_rate(&self) -> f64 {
        match self {
            RideKind::Solo(_) => 0.0,
            RideKind::Shared(_) => SHARED_DISCOUNT_RATE,
        }
    }

    /// `distance * base fare * (1 - discount)`, before the vehicle multiplier.
    pub fn fare_basis(&self) -> f64 {
        f64::from(self.distance()) * self.service_type().base_fare() * (1.0 - self.discount_rate())
    }

    /// Non-zero ratings collected on this ride.
    pub fn reviews(&self) -> Vec<u8> {
        match self {
            RideKind::Solo(ride) => Some(ride.rating()).into_iter().filter(|s| *s > 0).collect(),
            RideKind::Shared(shared) => shared.all_ratings().filter(|s| *s > 0).collect(),
        }
    }

    pub fn is_shared(&self) -> bool {
        matches!(self, RideKind::Shared(_))
    }
}

impl fmt::Display for RideKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RideKind::Solo(ride) => ride.fmt(f),
            RideKind::Shared(shared) => shared.fmt(f),
        }
    }
}
