// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use crate::error::{CodecError, ParseWarning};
use crate::icalendar::{push_text, read_number, text};
use crate::keyword::{
    KW_ACTION, KW_DESCRIPTION, KW_DURATION, KW_REPEAT, KW_SUMMARY, KW_TRIGGER, KW_VALARM,
};
use crate::property::{Parameters, Property, PropertyList};
use crate::reader::Component;

/// Alarm of an event or reminder, `VALARM` (RFC 5545 Section 3.6.6).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alarm {
    /// `DISPLAY`, `AUDIO` or `EMAIL`
    pub action: String,
    /// Duration relative to start (e.g. `-PT15M`) or an absolute date-time
    pub trigger: String,
    /// Parameters of the trigger such as `RELATED=END` or `VALUE=DATE-TIME`
    pub trigger_parameters: Parameters,
    /// Text to display
    pub description: Option<String>,
    /// Email subject
    pub summary: Option<String>,
    /// Extra repetitions
    pub repeat: Option<u32>,
    /// Delay between repetitions
    pub duration: Option<String>,
    /// Properties without a typed slot
    pub extra: PropertyList,
}

impl Alarm {
    /// A display alarm firing at a relative trigger such as `-PT10M`.
    pub fn display(trigger: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            action: "DISPLAY".to_owned(),
            trigger: trigger.into(),
            trigger_parameters: Parameters::new(),
            description: Some(description.into()),
            summary: None,
            repeat: None,
            duration: None,
            extra: PropertyList::new(),
        }
    }

    pub(crate) fn from_component(
        component: &Component,
        warnings: &mut Vec<ParseWarning>,
    ) -> Result<Self, CodecError> {
        let mut action = None;
        let mut trigger = None;
        let mut alarm = Self::display(String::new(), String::new());
        alarm.description = None;

        for property in &component.properties {
            match property.name() {
                KW_ACTION => action = Some(text(property)),
                KW_TRIGGER => trigger = Some(property),
                KW_DESCRIPTION => alarm.description = Some(text(property)),
                KW_SUMMARY => alarm.summary = Some(text(property)),
                KW_DURATION => alarm.duration = Some(text(property)),
                KW_REPEAT => match read_number(property, warnings) {
                    Some(repeat) => alarm.repeat = Some(repeat),
                    None => alarm.extra.push(property.clone()),
                },
                _ => alarm.extra.push(property.clone()),
            }
        }

        alarm.action = action.ok_or(CodecError::MissingRequiredProperty {
            component: KW_VALARM,
            property: KW_ACTION,
        })?;
        let trigger = trigger.ok_or(CodecError::MissingRequiredProperty {
            component: KW_VALARM,
            property: KW_TRIGGER,
        })?;
        alarm.trigger = text(trigger);
        alarm.trigger_parameters = trigger.parameters.clone();
        Ok(alarm)
    }

    pub(crate) fn to_component(&self) -> Component {
        let mut component = Component::new(KW_VALARM);
        let properties = &mut component.properties;
        properties.push(Property::new(KW_ACTION, self.action.as_str()));
        let mut trigger = Property::new(KW_TRIGGER, self.trigger.as_str());
        trigger.parameters = self.trigger_parameters.clone();
        properties.push(trigger);
        push_text(properties, KW_DESCRIPTION, self.description.as_deref());
        push_text(properties, KW_SUMMARY, self.summary.as_deref());
        push_text(properties, KW_DURATION, self.duration.as_deref());
        if let Some(repeat) = self.repeat {
            properties.push(Property::new(KW_REPEAT, repeat.to_string()));
        }
        properties.extend(self.extra.iter().cloned());
        component
    }
}

/// Read the alarms among the children; a broken alarm is recorded and kept raw.
pub(crate) fn read_alarms(
    children: &[Component],
    alarms: &mut Vec<Alarm>,
    others: &mut Vec<Component>,
    warnings: &mut Vec<ParseWarning>,
) {
    for child in children {
        if !child.is(KW_VALARM) {
            others.push(child.clone());
            continue;
        }
        match Alarm::from_component(child, warnings) {
            Ok(alarm) => alarms.push(alarm),
            Err(err) => {
                crate::line::record(
                    warnings,
                    ParseWarning::InvalidValue {
                        property: KW_VALARM.to_owned(),
                        reason: err.to_string(),
                    },
                );
                others.push(child.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_trigger_parameters() {
        let mut component = Component::new("VALARM");
        component.properties.push(Property::new("ACTION", "AUDIO"));
        component
            .properties
            .push(Property::new("TRIGGER", "PT0S").with_parameter("RELATED", "END"));
        component.properties.push(Property::new("REPEAT", "2"));

        let alarm = Alarm::from_component(&component, &mut Vec::new()).unwrap();
        assert_eq!(alarm.action, "AUDIO");
        assert_eq!(alarm.trigger_parameters.get("RELATED"), Some("END"));
        assert_eq!(alarm.repeat, Some(2));
        assert_eq!(alarm.to_component(), component);
    }

    #[test]
    fn broken_alarm_is_kept_raw() {
        let mut component = Component::new("VALARM");
        component.properties.push(Property::new("ACTION", "DISPLAY"));

        let (mut alarms, mut others, mut warnings) = (Vec::new(), Vec::new(), Vec::new());
        read_alarms(&[component], &mut alarms, &mut others, &mut warnings);
        assert!(alarms.is_empty());
        assert_eq!(others.len(), 1);
        assert_eq!(warnings.len(), 1);
    }
}
