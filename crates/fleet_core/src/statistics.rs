/// Per-vehicle counters accrued each time a ride ends.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statistics {
    services: u32,
    distance: u64,
    billing: f64,
    reviews: u32,
    stars: u32,
}

impl Statistics {
    pub fn services(&self) -> u32 {
        self.services
    }

    pub fn distance(&self) -> u64 {
        self.distance
    }

    pub fn billing(&self) -> f64 {
        self.billing
    }

    pub fn reviews(&self) -> u32 {
        self.reviews
    }

    pub fn star_sum(&self) -> u32 {
        self.stars
    }

    /// Mean stars per review; `None` until the first review arrives.
    pub fn average_stars(&self) -> Option<f64> {
        if self.reviews == 0 {
            return None;
        }
        Some(f64::from(self.stars) / f64::from(self.reviews))
    }

    pub fn record_service(&mut self, distance: u32, billing: f64) {
        self.services += 1;
        self.distance += u64::from(distance);
        self.billing += billing;
    }

    pub fn record_review(&mut self, stars: u8) {
        self.reviews += 1;
        self.stars += u32::from(stars);
    }
}
