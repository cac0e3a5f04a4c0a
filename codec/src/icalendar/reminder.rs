// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::str::FromStr;

use crate::error::{CodecError, ParseWarning};
use crate::icalendar::alarm::{Alarm, read_alarms};
use crate::icalendar::{push_datetime, push_text, read_datetime, read_number, text};
use crate::keyword::{
    KW_CATEGORIES, KW_COMPLETED, KW_CREATED, KW_DESCRIPTION, KW_DTSTAMP, KW_DTSTART, KW_DUE,
    KW_LAST_MODIFIED, KW_LOCATION, KW_PERCENT_COMPLETE, KW_PRIORITY, KW_RRULE, KW_SEQUENCE,
    KW_STATUS, KW_SUMMARY, KW_UID, KW_URL, KW_VTODO,
};
use crate::line::record;
use crate::property::{Property, PropertyList, PropertyValue};
use crate::reader::Component;
use crate::value::CalDateTime;
use crate::vcard::ObjectMeta;

/// Status of a reminder (RFC 5545 Section 3.8.1.11).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "SCREAMING-KEBAB-CASE", ascii_case_insensitive)]
pub enum ReminderStatus {
    /// Not started
    NeedsAction,
    /// Done
    Completed,
    /// Started
    InProcess,
    /// Dropped
    Cancelled,
}

/// A task, `VTODO` (RFC 5545 Section 3.6.2).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reminder {
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
    /// Deadline, `DUE`
    pub due: Option<CalDateTime>,
    /// Completion time, `COMPLETED`
    pub completed: Option<CalDateTime>,
    /// Title, `SUMMARY`
    pub summary: Option<String>,
    /// Details, `DESCRIPTION`
    pub description: Option<String>,
    /// Place, `LOCATION`
    pub location: Option<String>,
    /// Progress state, `STATUS`
    pub status: Option<ReminderStatus>,
    /// 1 (highest) to 9 (lowest), 0 for undefined, `PRIORITY`
    pub priority: Option<u8>,
    /// 0 to 100, `PERCENT-COMPLETE`
    pub percent_complete: Option<u8>,
    /// Link, `URL`
    pub url: Option<String>,
    /// Categories, `CATEGORIES`
    pub categories: Vec<String>,
    /// Recurrence rule as written, `RRULE`
    pub rrule: Option<String>,
    /// Alarms
    pub alarms: Vec<Alarm>,
    /// Properties without a typed slot
    pub extra: PropertyList,
    /// Nested components other than alarms
    pub children: Vec<Component>,
}

impl Reminder {
    /// A reminder with a fresh UID, stamped now, needing action.
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            meta: ObjectMeta::generate(),
            stamp: Some(CalDateTime::now_utc()),
            summary: Some(summary.into()),
            status: Some(ReminderStatus::NeedsAction),
            ..Self::default()
        }
    }

    /// Whether the reminder is done.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == Some(ReminderStatus::Completed) || self.completed.is_some()
    }

    /// Materialize a `VTODO` component.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MissingRequiredProperty`] when `UID` is absent.
    pub fn from_component(
        component: &Component,
        warnings: &mut Vec<ParseWarning>,
    ) -> Result<Self, CodecError> {
        let properties = &component.properties;
        let mut reminder = Self {
            meta: ObjectMeta::from_properties(properties, KW_VTODO, KW_LAST_MODIFIED)?,
            ..Self::default()
        };

        for property in properties {
            let kept = match property.name() {
                KW_UID | KW_LAST_MODIFIED => true,
                KW_DTSTAMP => read_into(&mut reminder.stamp, property, warnings),
                KW_CREATED => read_into(&mut reminder.created, property, warnings),
                KW_DTSTART => read_into(&mut reminder.start, property, warnings),
                KW_DUE => read_into(&mut reminder.due, property, warnings),
                KW_COMPLETED => read_into(&mut reminder.completed, property, warnings),
                KW_SEQUENCE => number_into(&mut reminder.sequence, property, warnings),
                KW_PRIORITY => number_into(&mut reminder.priority, property, warnings),
                KW_PERCENT_COMPLETE => {
                    number_into(&mut reminder.percent_complete, property, warnings)
                }
                KW_STATUS => match ReminderStatus::from_str(&text(property)) {
                    Ok(status) => {
                        reminder.status = Some(status);
                        true
                    }
                    Err(_) => {
                        record(
                            warnings,
                            ParseWarning::InvalidValue {
                                property: KW_STATUS.to_owned(),
                                reason: format!("unknown status '{}'", property.value),
                            },
                        );
                        false
                    }
                },
                KW_SUMMARY => set(&mut reminder.summary, property),
                KW_DESCRIPTION => set(&mut reminder.description, property),
                KW_LOCATION => set(&mut reminder.location, property),
                KW_URL => set(&mut reminder.url, property),
                KW_RRULE => set(&mut reminder.rrule, property),
                KW_CATEGORIES => {
                    reminder
                        .categories
                        .extend(property.value.parts().into_iter().map(str::to_owned));
                    true
                }
                _ => false,
            };
            if !kept {
                reminder.extra.push(property.clone());
            }
        }

        read_alarms(
            &component.children,
            &mut reminder.alarms,
            &mut reminder.children,
            warnings,
        );
        Ok(reminder)
    }

    /// Build the `VTODO` component.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MissingRequiredProperty`] for a blank UID.
    pub fn to_component(&self) -> Result<Component, CodecError> {
        if self.meta.uid.trim().is_empty() {
            return Err(CodecError::MissingRequiredProperty {
                component: KW_VTODO,
                property: KW_UID,
            });
        }

        let mut component = Component::new(KW_VTODO);
        let properties = &mut component.properties;
        properties.push(Property::new(KW_UID, self.meta.uid.as_str()));
        push_datetime(properties, KW_DTSTAMP, self.stamp.as_ref());
        push_datetime(properties, KW_CREATED, self.created.as_ref());
        push_text(properties, KW_LAST_MODIFIED, self.meta.revision.as_deref());
        if let Some(sequence) = self.sequence {
            properties.push(Property::new(KW_SEQUENCE, sequence.to_string()));
        }
        push_datetime(properties, KW_DTSTART, self.start.as_ref());
        push_datetime(properties, KW_DUE, self.due.as_ref());
        push_datetime(properties, KW_COMPLETED, self.completed.as_ref());
        push_text(properties, KW_SUMMARY, self.summary.as_deref());
        push_text(properties, KW_DESCRIPTION, self.description.as_deref());
        push_text(properties, KW_LOCATION, self.location.as_deref());
        if let Some(status) = self.status {
            properties.push(Property::new(KW_STATUS, status.to_string()));
        }
        if let Some(priority) = self.priority {
            properties.push(Property::new(KW_PRIORITY, priority.to_string()));
        }
        if let Some(percent) = self.percent_complete {
            properties.push(Property::new(KW_PERCENT_COMPLETE, percent.to_string()));
        }
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

fn read_into(
    slot: &mut Option<CalDateTime>,
    property: &Property,
    warnings: &mut Vec<ParseWarning>,
) -> bool {
    let value = read_datetime(property, warnings);
    let ok = value.is_some();
    if ok {
        *slot = value;
    }
    ok
}

fn number_into<T: FromStr>(
    slot: &mut Option<T>,
    property: &Property,
    warnings: &mut Vec<ParseWarning>,
) -> bool {
    let value = read_number(property, warnings);
    let ok = value.is_some();
    if ok {
        *slot = value;
    }
    ok
}

fn set(slot: &mut Option<String>, property: &Property) -> bool {
    *slot = Some(text(property));
    true
}
