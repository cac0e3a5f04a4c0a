// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! iCalendar objects (RFC 5545): events, reminders and their alarms.
//!
//! Timezone definitions and component types without a typed model are kept as raw
//! [`Component`]s and written back verbatim.

mod alarm;
mod event;
mod reminder;

pub use crate::icalendar::alarm::Alarm;
pub use crate::icalendar::event::Event;
pub use crate::icalendar::reminder::{Reminder, ReminderStatus};

use crate::context::CodecContext;
use crate::error::{CodecError, ParseWarning};
use crate::keyword::{
    KW_CALSCALE, KW_METHOD, KW_PRODID, KW_VCALENDAR, KW_VERSION, KW_VEVENT, KW_VTIMEZONE, KW_VTODO,
};
use crate::line::record;
use crate::property::{Property, PropertyList};
use crate::reader::{Component, Parsed, read_components};
use crate::value::CalDateTime;
use crate::vcard::ObjectMeta;

/// Version written to every calendar.
pub const ICALENDAR_VERSION: &str = "2.0";

/// A typed calendar component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarComponent {
    /// `VEVENT`
    Event(Event),
    /// `VTODO`
    Reminder(Reminder),
}

impl CalendarComponent {
    /// Identity of the component.
    #[must_use]
    pub fn meta(&self) -> &ObjectMeta {
        match self {
            Self::Event(event) => &event.meta,
            Self::Reminder(reminder) => &reminder.meta,
        }
    }

    fn to_component(&self) -> Result<Component, CodecError> {
        match self {
            Self::Event(event) => event.to_component(),
            Self::Reminder(reminder) => reminder.to_component(),
        }
    }
}

/// A `VCALENDAR` object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Calendar {
    /// Product that produced the object, `PRODID`
    pub product_id: Option<String>,
    /// Calendar scale, `CALSCALE`
    pub scale: Option<String>,
    /// iTIP method, `METHOD`
    pub method: Option<String>,
    /// Events and reminders in wire order
    pub components: Vec<CalendarComponent>,
    /// `VTIMEZONE` definitions, kept verbatim
    pub timezones: Vec<Component>,
    /// Other components, kept verbatim
    pub others: Vec<Component>,
    /// Calendar properties without a typed slot
    pub extra: PropertyList,
}

impl Calendar {
    /// An empty calendar.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A calendar holding one component.
    #[must_use]
    pub fn with_component(component: CalendarComponent) -> Self {
        Self {
            components: vec![component],
            ..Self::default()
        }
    }

    /// Events of the calendar.
    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.components.iter().filter_map(|c| match c {
            CalendarComponent::Event(event) => Some(event),
            CalendarComponent::Reminder(_) => None,
        })
    }

    /// Reminders of the calendar.
    pub fn reminders(&self) -> impl Iterator<Item = &Reminder> {
        self.components.iter().filter_map(|c| match c {
            CalendarComponent::Reminder(reminder) => Some(reminder),
            CalendarComponent::Event(_) => None,
        })
    }

    /// UID of the first component; a `CalDAV` resource holds one UID.
    #[must_use]
    pub fn uid(&self) -> Option<&str> {
        self.components.first().map(|c| c.meta().uid.as_str())
    }

    /// Parse the first calendar of the text.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MissingComponent`] when the text holds no `VCALENDAR`, or
    /// the error of materializing one of its components.
    pub fn parse(text: &str) -> Result<Parsed<Self>, CodecError> {
        let Parsed {
            value: components,
            mut warnings,
        } = read_components(text);
        let root = components
            .iter()
            .find(|c| c.is(KW_VCALENDAR))
            .ok_or(CodecError::MissingComponent {
                expected: KW_VCALENDAR,
            })?;
        let calendar = Self::from_component(root, &mut warnings)?;
        Ok(Parsed {
            value: calendar,
            warnings,
        })
    }

    /// Materialize a `VCALENDAR` component.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MissingComponent`] for another component type and
    /// [`CodecError::MissingRequiredProperty`] for an event or reminder without `UID`.
    pub fn from_component(
        component: &Component,
        warnings: &mut Vec<ParseWarning>,
    ) -> Result<Self, CodecError> {
        if !component.is(KW_VCALENDAR) {
            return Err(CodecError::MissingComponent {
                expected: KW_VCALENDAR,
            });
        }

        let mut calendar = Self::new();
        for property in &component.properties {
            match property.name() {
                KW_VERSION => {}
                KW_PRODID => calendar.product_id = Some(text(property)),
                KW_CALSCALE => calendar.scale = Some(text(property)),
                KW_METHOD => calendar.method = Some(text(property)),
                _ => calendar.extra.push(property.clone()),
            }
        }

        for child in &component.children {
            match child.name.as_str() {
                KW_VEVENT => calendar
                    .components
                    .push(CalendarComponent::Event(Event::from_component(child, warnings)?)),
                KW_VTODO => calendar.components.push(CalendarComponent::Reminder(
                    Reminder::from_component(child, warnings)?,
                )),
                KW_VTIMEZONE => calendar.timezones.push(child.clone()),
                _ => calendar.others.push(child.clone()),
            }
        }
        Ok(calendar)
    }

    /// Build the `VCALENDAR` component.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MissingRequiredProperty`] for a component with a blank UID.
    pub fn to_component(&self, ctx: &CodecContext) -> Result<Component, CodecError> {
        let mut root = Component::new(KW_VCALENDAR);
        let properties = &mut root.properties;
        properties.push(Property::new(KW_VERSION, ICALENDAR_VERSION));
        properties.push(Property::new(
            KW_PRODID,
            self.product_id.as_deref().unwrap_or(&ctx.product_id),
        ));
        push_text(properties, KW_CALSCALE, self.scale.as_deref());
        push_text(properties, KW_METHOD, self.method.as_deref());
        properties.extend(self.extra.iter().cloned());

        root.children.extend(self.timezones.iter().cloned());
        for component in &self.components {
            root.children.push(component.to_component()?);
        }
        root.children.extend(self.others.iter().cloned());
        Ok(root)
    }

    /// Write as `text/calendar`.
    ///
    /// # Errors
    ///
    /// See [`Calendar::to_component`].
    pub fn format(&self, ctx: &CodecContext) -> Result<String, CodecError> {
        Ok(self.to_component(ctx)?.to_text(ctx.fold_width))
    }
}

fn text(property: &Property) -> String {
    property.value.to_string().trim().to_owned()
}

/// Parse a date-time property; an unreadable value is recorded and left to the caller.
fn read_datetime(property: &Property, warnings: &mut Vec<ParseWarning>) -> Option<CalDateTime> {
    let value = CalDateTime::from_property(property);
    if value.is_none() {
        record(
            warnings,
            ParseWarning::InvalidValue {
                property: property.name().to_owned(),
                reason: format!("'{}' is not a date or date-time", property.value),
            },
        );
    }
    value
}

/// Parse an integer property; an unreadable value is recorded and left to the caller.
fn read_number<T: std::str::FromStr>(
    property: &Property,
    warnings: &mut Vec<ParseWarning>,
) -> Option<T> {
    let value = text(property).parse().ok();
    if value.is_none() {
        record(
            warnings,
            ParseWarning::InvalidValue {
                property: property.name().to_owned(),
                reason: format!("'{}' is not a number", property.value),
            },
        );
    }
    value
}

fn push_text(properties: &mut PropertyList, name: &str, value: Option<&str>) {
    if let Some(value) = value {
        properties.push(Property::new(name, value));
    }
}

fn push_datetime(properties: &mut PropertyList, name: &str, value: Option<&CalDateTime>) {
    if let Some(value) = value {
        properties.push(value.to_property(name));
    }
}
