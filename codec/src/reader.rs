// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Component tree reader and writer shared by vCard and iCalendar.
//!
//! The reader is a stack machine over logical lines: `BEGIN` pushes a component,
//! `END` pops it into its parent, every other line becomes a property of the
//! innermost open component. Malformed lines are recorded as [`ParseWarning`]s and
//! skipped; they never abort the surrounding object.

use crate::error::ParseWarning;
use crate::keyword::{
    KW_BEGIN, KW_DAYLIGHT, KW_END, KW_STANDARD, KW_VALARM, KW_VCALENDAR, KW_VCARD, KW_VEVENT,
    KW_VFREEBUSY, KW_VJOURNAL, KW_VTIMEZONE, KW_VTODO,
};
use crate::line::{read_property, record, unfold, write_property};
use crate::property::{Property, PropertyList};

/// Known component types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "UPPERCASE")]
pub enum ComponentKind {
    /// `VCARD`
    VCard,
    /// `VCALENDAR`
    VCalendar,
    /// `VEVENT`
    VEvent,
    /// `VTODO`
    VTodo,
    /// `VJOURNAL`
    VJournal,
    /// `VFREEBUSY`
    VFreeBusy,
    /// `VTIMEZONE`
    VTimezone,
    /// `VALARM`
    VAlarm,
    /// `STANDARD` timezone observance
    Standard,
    /// `DAYLIGHT` timezone observance
    Daylight,
}

impl ComponentKind {
    /// Look up the kind of a component name, case-insensitively.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        [
            (KW_VCARD, Self::VCard),
            (KW_VCALENDAR, Self::VCalendar),
            (KW_VEVENT, Self::VEvent),
            (KW_VTODO, Self::VTodo),
            (KW_VJOURNAL, Self::VJournal),
            (KW_VFREEBUSY, Self::VFreeBusy),
            (KW_VTIMEZONE, Self::VTimezone),
            (KW_VALARM, Self::VAlarm),
            (KW_STANDARD, Self::Standard),
            (KW_DAYLIGHT, Self::Daylight),
        ]
        .into_iter()
        .find(|(kw, _)| kw.eq_ignore_ascii_case(name))
        .map(|(_, kind)| kind)
    }
}

/// A `BEGIN`/`END` delimited component with its properties and nested components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    /// Component name, upper-cased
    pub name: String,
    /// Properties in wire order
    pub properties: PropertyList,
    /// Nested components in wire order
    pub children: Vec<Component>,
}

impl Component {
    /// An empty component.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            name: name.as_ref().trim().to_ascii_uppercase(),
            properties: PropertyList::new(),
            children: Vec::new(),
        }
    }

    /// Kind of this component, if known.
    #[must_use]
    pub fn kind(&self) -> Option<ComponentKind> {
        ComponentKind::from_name(&self.name)
    }

    /// Whether the component has this name.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Nested components with this name.
    pub fn children_named<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a Component> {
        let name = name.to_owned();
        self.children.iter().filter(move |c| c.is(&name))
    }

    /// Write as folded, CRLF-terminated text.
    pub fn write(&self, out: &mut String, width: usize) {
        write_property(out, &Property::new(KW_BEGIN, self.name.as_str()), width);
        for property in &self.properties {
            write_property(out, property, width);
        }
        for child in &self.children {
            child.write(out, width);
        }
        write_property(out, &Property::new(KW_END, self.name.as_str()), width);
    }

    /// Folded, CRLF-terminated text of this component.
    #[must_use]
    pub fn to_text(&self, width: usize) -> String {
        let mut out = String::new();
        self.write(&mut out, width);
        out
    }
}

/// A parse result with the warnings recovered along the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed<T> {
    /// The parsed value
    pub value: T,
    /// Recoverable problems, in input order
    pub warnings: Vec<ParseWarning>,
}

impl<T> Parsed<T> {
    /// Transform the value, keeping the warnings.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Parsed<U> {
        Parsed {
            value: f(self.value),
            warnings: self.warnings,
        }
    }
}

/// Read every top-level component of the text.
///
/// Unbalanced input is repaired: an `END` closing an outer component also closes the
/// inner ones, a stray `END` is skipped, and components open at end of input are closed.
#[must_use]
pub fn read_components(text: &str) -> Parsed<Vec<Component>> {
    let mut warnings = Vec::new();
    let mut stack: Vec<Component> = Vec::new();
    let mut roots = Vec::new();

    for line in unfold(text) {
        if line.text.trim().is_empty() {
            if !stack.is_empty() {
                record(&mut warnings, ParseWarning::BlankLine { line: line.number });
            }
            continue;
        }

        let property = match read_property(&line.text, line.number, &mut warnings) {
            Ok(property) => property,
            Err(warning) => {
                record(&mut warnings, warning);
                continue;
            }
        };

        if property.is(KW_BEGIN) {
            stack.push(Component::new(property.value.to_string()));
        } else if property.is(KW_END) {
            let name = property.value.to_string();
            let name = name.trim();
            match stack.iter().rposition(|c| c.is(name)) {
                Some(position) => {
                    while stack.len() > position + 1 {
                        if let Some(inner) = stack.pop() {
                            record(
                                &mut warnings,
                                ParseWarning::UnclosedComponent {
                                    name: inner.name.clone(),
                                },
                            );
                            attach(inner, &mut stack, &mut roots);
                        }
                    }
                    if let Some(component) = stack.pop() {
                        attach(component, &mut stack, &mut roots);
                    }
                }
                None => record(
                    &mut warnings,
                    ParseWarning::UnexpectedEnd {
                        line: line.number,
                        name: name.to_owned(),
                    },
                ),
            }
        } else if let Some(current) = stack.last_mut() {
            current.properties.push(property);
        } else {
            record(
                &mut warnings,
                ParseWarning::PropertyOutsideComponent {
                    line: line.number,
                    name: property.name().to_owned(),
                },
            );
        }
    }

    while let Some(component) = stack.pop() {
        record(
            &mut warnings,
            ParseWarning::UnclosedComponent {
                name: component.name.clone(),
            },
        );
        attach(component, &mut stack, &mut roots);
    }

    Parsed {
        value: roots,
        warnings,
    }
}

fn attach(component: Component, stack: &mut [Component], roots: &mut Vec<Component>) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(component),
        None => roots.push(component),
    }
}
