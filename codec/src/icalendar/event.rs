// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use crate::error::{CodecError, ParseWarning};
use crate::icalendar::alarm::{Alarm, read_alarms};
use crate::icalendar::{push_datetime, push_text, read_datetime, read_number, text};
use crate::keyword::{
    KW_CATEGORIES, KW_CREATED, KW_DESCRIPTION, KW_DTEND, KW_DTSTAMP, KW_DTSTART, KW_DURATION,
    KW_LAST_MODIFIED, KW_LOCATION, KW_RECURRENCE_ID, KW_RRULE, KW_SEQUENCE, KW_STATUS,
    KW_SUMMARY, KW_TRANSP, KW_UID, KW_URL, KW_VEVENT,
};
use crate::property::{Property, PropertyList, PropertyValue};
use crate::reader::Component;
use crate::value::CalDateTime;
use crate::vcard::ObjectMeta;

/// A calendar event, `VEVENT` (RFC 5545 Section 3.6.1).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Event {
    /// Identity; the revision is `LAST-MODIFIED`
    pub meta: ObjectMeta,
    /// Creation time of this revision, `DTSTAMP`
    pub stamp: Option<CalDateTime>,
    /// First creation time, `CREATED`
    pub created: Option<CalDateTime>,
    /// Revision sequence number, `SEQUENCE`
    pub sequence: Option<u32>,
    /// Start, `DTSTART`
    pub start: Option<CalDateTime>,
    /// End, `DTEND`
    pub end: Option<CalDateTime>,
    /// Length when no end is given, `DURATION`
    pub duration: Option<String>,
    /// Title, `SUMMARY`
    pub summary: Option<String>,
    /// Details, `DESCRIPTION`
    pub description: Option<String>,
    /// Place, `LOCATION`
    pub location: Option<String>,
    /// `TENTATIVE`, `CONFIRMED` or `CANCELLED`
    pub status: Option<String>,
    /// `OPAQUE` or `TRANSPARENT`
    pub transparency: Option<String>,
    /// Link, `URL`
    pub url: Option<String>,
    /// Categories, `CATEGORIES`
    pub categories: Vec<String>,
    /// Recurrence rule as written, `RRULE`
    pub rrule: Option<String>,
    /// Instance this overrides, `RECURRENCE-ID`
    pub recurrence_id: Option<CalDateTime>,
    /// Alarms
    pub alarms: Vec<Alarm>,
    /// Properties without a typed slot, e.g. `EXDATE` and `ATTENDEE`
    pub extra: PropertyList,
    /// Nested components other than alarms
    pub children: Vec<Component>,
}

impl Event {
    /// An event with a fresh UID, stamped now.
    pub fn new(summary: impl Into<String>, start: CalDateTime) -> Self {
        Self {
            meta: ObjectMeta::generate(),
            stamp: Some(CalDateTime::now_utc()),
            start: Some(start),
            summary: Some(summary.into()),
            ..Self::default()
        }
    }

    /// Materialize a `VEVENT` component.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MissingRequiredProperty`] when `UID` is absent.
    pub fn from_component(
        component: &Component,
        warnings: &mut Vec<ParseWarning>,
    ) -> Result<Self, CodecError> {
        let properties = &component.properties;
        let mut event = Self {
            meta: ObjectMeta::from_properties(properties, KW_VEVENT, KW_LAST_MODIFIED)?,
            ..Self::default()
        };

        for property in properties {
            let slot = match property.name() {
                KW_UID | KW_LAST_MODIFIED => continue,
                KW_DTSTAMP => &mut event.stamp,
                KW_CREATED => &mut event.created,
                KW_DTSTART => &mut event.start,
                KW_DTEND => &mut event.end,
                KW_RECURRENCE_ID => &mut event.recurrence_id,
                KW_SEQUENCE => {
                    match read_number(property, warnings) {
                        Some(sequence) => event.sequence = Some(sequence),
                        None => event.extra.push(property.clone()),
                    }
                    continue;
                }
                KW_DURATION => {
                    event.duration = Some(text(property));
                    continue;
                }
                KW_SUMMARY => {
                    event.summary = Some(text(property));
                    continue;
                }
                KW_DESCRIPTION => {
                    event.description = Some(text(property));
                    continue;
                }
                KW_LOCATION => {
                    event.location = Some(text(property));
                    continue;
                }
                KW_STATUS => {
                    event.status = Some(text(property).to_ascii_uppercase());
                    continue;
                }
                KW_TRANSP => {
                    event.transparency = Some(text(property).to_ascii_uppercase());
                    continue;
                }
                KW_URL => {
                    event.url = Some(text(property));
                    continue;
                }
                KW_RRULE => {
                    event.rrule = Some(text(property));
                    continue;
                }
                KW_CATEGORIES => {
                    event
                        .categories
                        .extend(property.value.parts().into_iter().map(str::to_owned));
                    continue;
                }
                _ => {
                    event.extra.push(property.clone());
                    continue;
                }
            };
            match read_datetime(property, warnings) {
                Some(value) => *slot = Some(value),
                None => event.extra.push(property.clone()),
            }
        }

        read_alarms(
            &component.children,
            &mut event.alarms,
            &mut event.children,
            warnings,
        );
        Ok(event)
    }

    /// Build the `VEVENT` component.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MissingRequiredProperty`] for a blank UID.
    pub fn to_component(&self) -> Result<Component, CodecError> {
        if self.meta.uid.trim().is_empty() {
            return Err(CodecError::MissingRequiredProperty {
                component: KW_VEVENT,
                property: KW_UID,
            });
        }

        let mut component = Component::new(KW_VEVENT);
        let properties = &mut component.properties;
        properties.push(Property::new(KW_UID, self.meta.uid.as_str()));
        push_datetime(properties, KW_DTSTAMP, self.stamp.as_ref());
        push_datetime(properties, KW_CREATED, self.created.as_ref());
        push_text(properties, KW_LAST_MODIFIED, self.meta.revision.as_deref());
        if let Some(sequence) = self.sequence {
            properties.push(Property::new(KW_SEQUENCE, sequence.to_string()));
        }
        push_datetime(properties, KW_DTSTART, self.start.as_ref());
        push_datetime(properties, KW_DTEND, self.end.as_ref());
        push_text(properties, KW_DURATION, self.duration.as_deref());
        push_datetime(properties, KW_RECURRENCE_ID, self.recurrence_id.as_ref());
        push_text(properties, KW_SUMMARY, self.summary.as_deref());
        push_text(properties, KW_DESCRIPTION, self.description.as_deref());
        push_text(properties, KW_LOCATION, self.location.as_deref());
        push_text(properties, KW_STATUS, self.status.as_deref());
        push_text(properties, KW_TRANSP, self.transparency.as_deref());
        push_text(properties, KW_URL, self.url.as_deref());
        if !self.categories.is_empty() {
            properties.push(Property::new(
                KW_CATEGORIES,
                PropertyValue::List(self.categories.clone()),
            ));
        }
        push_text(properties, KW_RRULE, self.rrule.as_deref());
        properties.extend(self.extra.iter().cloned());

        component
            .children
            .extend(self.alarms.iter().map(Alarm::to_component));
        component.children.extend(self.children.iter().cloned());
        Ok(component)
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    #[test]
    fn unreadable_date_is_kept_as_extra() {
        let mut component = Component::new("VEVENT");
        component.properties.push(Property::new("UID", "e1"));
        component.properties.push(Property::new("DTSTART", "tomorrow"));

        let mut warnings = Vec::new();
        let event = Event::from_component(&component, &mut warnings).unwrap();
        assert!(event.start.is_none());
        assert_eq!(event.extra.len(), 1);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn new_event_has_identity() {
        let event = Event::new("Holiday", CalDateTime::Date(date(2025, 12, 25)));
        assert!(!event.meta.uid.is_empty());
        assert!(matches!(event.stamp, Some(CalDateTime::Utc(_))));

        let component = event.to_component().unwrap();
        let start = component.properties.find("DTSTART").unwrap();
        assert_eq!(start.text(), Some("20251225"));
        assert_eq!(start.parameters.get("VALUE"), Some("DATE"));
    }
}
