//! Park service model, also the shared core of attractions and events.

use serde::{Deserialize, Serialize};

use super::ServiceId;

/// Something the park offers to guests: a name and a description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    /// Unique identifier.
    id: ServiceId,
    /// Display name.
    name: String,
    /// Free-form description.
    #[serde(default)]
    description: String,
}

impl Service {
    /// Creates a service record.
    #[inline]
    #[must_use]
    pub fn new<N: Into<String>, D: Into<String>>(id: ServiceId, name: N, description: D) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
        }
    }

    /// Returns the service's identifier.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> ServiceId {
        self.id
    }

    /// Returns the service's name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the service's description.
    #[inline]
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_return_fields() {
        let service = Service::new(ServiceId::new(9), "Stroller Rental", "Daily rental");
        assert_eq!(service.id(), ServiceId::new(9));
        assert_eq!(service.name(), "Stroller Rental");
        assert_eq!(service.description(), "Daily rental");
    }

    #[test]
    fn record_without_description_loads() {
        let service: Service = serde_json::from_str(r#"{"id":2,"name":"Lockers"}"#).unwrap();
        assert_eq!(service, Service::new(ServiceId::new(2), "Lockers", ""));
    }

    #[test]
    fn record_without_name_is_rejected() {
        assert!(serde_json::from_str::<Service>(r#"{"id":2}"#).is_err());
    }
}
