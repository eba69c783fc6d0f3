//! Attraction model.

use serde::{Deserialize, Serialize};

use super::{AttractionId, Service, ServiceId};

/// A ride or venue at a fixed location in the park.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attraction {
    /// Unique identifier.
    id: AttractionId,
    /// Name and description.
    service: Service,
    /// Where in the park it is.
    location: String,
    /// Maximum number of riders at once, when known.
    #[serde(default)]
    capacity: Option<u32>,
}

impl Attraction {
    /// Creates an attraction with no recorded capacity.
    ///
    /// The embedded service carries the same numeric identifier.
    #[inline]
    #[must_use]
    pub fn new<N, L, D>(id: AttractionId, name: N, location: L, description: D) -> Self
    where
        N: Into<String>,
        L: Into<String>,
        D: Into<String>,
    {
        Self {
            id,
            service: Service::new(ServiceId::new(id.into_inner()), name, description),
            location: location.into(),
            capacity: None,
        }
    }

    /// Returns the attraction's identifier.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> AttractionId {
        self.id
    }

    /// Returns the embedded service record.
    #[inline]
    #[must_use]
    pub const fn service(&self) -> &Service {
        &self.service
    }

    /// Returns the embedded service's identifier.
    #[inline]
    #[must_use]
    pub const fn service_id(&self) -> ServiceId {
        self.service.id()
    }

    /// Returns the attraction's name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        self.service.name()
    }

    /// Returns the attraction's description.
    #[inline]
    #[must_use]
    pub fn description(&self) -> &str {
        self.service.description()
    }

    /// Returns the attraction's location.
    #[inline]
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Returns the rider capacity, if recorded.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> Option<u32> {
        self.capacity
    }

    /// Records or clears the rider capacity.
    #[inline]
    pub const fn set_capacity(&mut self, capacity: Option<u32>) {
        self.capacity = capacity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_accessors_read_embedded_service() {
        let mut ride = Attraction::new(AttractionId::new(3), "Falcon Drop", "North Plaza", "Drop tower");
        assert_eq!(ride.name(), "Falcon Drop");
        assert_eq!(ride.description(), "Drop tower");
        assert_eq!(ride.location(), "North Plaza");
        assert_eq!(ride.service_id(), ServiceId::new(3));
        assert_eq!(ride.capacity(), None);
        ride.set_capacity(Some(24));
        assert_eq!(ride.capacity(), Some(24));
    }

    #[test]
    fn record_without_capacity_loads() {
        let json = r#"{"id":1,"service":{"id":1,"name":"Carousel"},"location":"Gate"}"#;
        let ride: Attraction = serde_json::from_str(json).unwrap();
        assert_eq!(ride.name(), "Carousel");
        assert_eq!(ride.description(), "");
        assert_eq!(ride.capacity(), None);
    }
}
