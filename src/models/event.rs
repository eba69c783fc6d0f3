//! Scheduled event model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{EventId, Service, ServiceId};

/// A show or festival held on a given day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Unique identifier.
    id: EventId,
    /// Name and description.
    service: Service,
    /// Day the event takes place.
    date: NaiveDate,
}

impl Event {
    /// Creates an event; the embedded service shares its identifier.
    #[inline]
    #[must_use]
    pub fn new<N: Into<String>, D: Into<String>>(
        id: EventId,
        name: N,
        date: NaiveDate,
        description: D,
    ) -> Self {
        Self {
            id,
            service: Service::new(ServiceId::new(id.into_inner()), name, description),
            date,
        }
    }

    /// Returns the event's identifier.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> EventId {
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

    /// Returns the event's name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        self.service.name()
    }

    /// Returns the event's description.
    #[inline]
    #[must_use]
    pub fn description(&self) -> &str {
        self.service.description()
    }

    /// Returns the event date.
    #[inline]
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parade() -> Event {
        let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        Event::new(EventId::new(3), "Night Parade", date, "Floats and fireworks")
    }

    #[test]
    fn flat_accessors_read_embedded_service() {
        let event = parade();
        assert_eq!(event.id(), EventId::new(3));
        assert_eq!(event.service_id(), ServiceId::new(3));
        assert_eq!(event.service().id(), event.service_id());
        assert_eq!(event.name(), "Night Parade");
        assert_eq!(event.description(), "Floats and fireworks");
        assert_eq!(event.date(), NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
    }

    #[test]
    fn date_is_stored_as_calendar_day() {
        let value = serde_json::to_value(parade()).unwrap();
        assert_eq!(value["date"], "2025-01-15");
        assert_eq!(value["service"]["name"], "Night Parade");
    }

    #[test]
    fn record_without_description_loads() {
        let json = r#"{"id":3,"service":{"id":3,"name":"Parade"},"date":"2025-01-15"}"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.name(), "Parade");
        assert_eq!(event.description(), "");
        assert_eq!(event.date(), NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
    }
}
