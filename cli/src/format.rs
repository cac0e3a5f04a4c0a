// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{borrow::Cow, fmt};

use colored::{Color, Colorize};
use davsync_codec::{CalDateTime, Contact, ContactGroup, Event, Reminder, ReminderStatus};
use davsync_dav::{AddressBookInfo, CalendarInfo, Resource, SyncItem};

use crate::table::{Column, PaddingDirection};

/// Human-readable form of a calendar date or date-time.
pub fn format_time(value: &CalDateTime) -> String {
    match value {
        CalDateTime::Date(date) => date.strftime("%Y-%m-%d").to_string(),
        CalDateTime::Floating(dt) => dt.strftime("%Y-%m-%d %H:%M").to_string(),
        CalDateTime::Utc(dt) => format!("{} UTC", dt.strftime("%Y-%m-%d %H:%M")),
        CalDateTime::Zoned { tz_id, datetime } => {
            format!("{} {tz_id}", datetime.strftime("%Y-%m-%d %H:%M"))
        }
    }
}

fn or_dash(value: Option<&str>) -> Cow<'_, str> {
    match value {
        Some(v) if !v.is_empty() => v.into(),
        _ => "-".into(),
    }
}

#[derive(Debug, Clone, Copy)]
pub enum CalendarColumn {
    Name,
    Components,
    Href,
}

impl CalendarColumn {
    pub const ALL: [Self; 3] = [Self::Name, Self::Components, Self::Href];
}

impl Column<CalendarInfo> for CalendarColumn {
    fn name(&self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Components => "Components",
            Self::Href => "Href",
        }
    }

    fn format<'a>(&self, data: &'a CalendarInfo) -> Cow<'a, str> {
        match self {
            Self::Name => or_dash(data.display_name.as_deref()),
            Self::Components if data.supported_components.is_empty() => "any".into(),
            Self::Components => data.supported_components.join(",").into(),
            Self::Href => data.href.as_str().into(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum AddressBookColumn {
    Name,
    Href,
}

impl AddressBookColumn {
    pub const ALL: [Self; 2] = [Self::Name, Self::Href];
}

impl Column<AddressBookInfo> for AddressBookColumn {
    fn name(&self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Href => "Href",
        }
    }

    fn format<'a>(&self, data: &'a AddressBookInfo) -> Cow<'a, str> {
        match self {
            Self::Name => or_dash(data.display_name.as_deref()),
            Self::Href => data.href.as_str().into(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum EventColumn {
    Start,
    Summary,
    Uid,
}

impl EventColumn {
    pub const ALL: [Self; 3] = [Self::Start, Self::Summary, Self::Uid];
    pub const BRIEF: [Self; 2] = [Self::Start, Self::Summary];
}

impl Column<Resource<Event>> for EventColumn {
    fn name(&self) -> &'static str {
        match self {
            Self::Start => "Start",
            Self::Summary => "Summary",
            Self::Uid => "UID",
        }
    }

    fn format<'a>(&self, data: &'a Resource<Event>) -> Cow<'a, str> {
        let event = &data.value;
        match self {
            Self::Start => event
                .start
                .as_ref()
                .map_or_else(|| "-".into(), |t| format_time(t).into()),
            Self::Summary => or_dash(event.summary.as_deref()),
            Self::Uid => event.meta.uid.as_str().into(),
        }
    }

    fn color(&self, data: &Resource<Event>) -> Option<Color> {
        match self {
            Self::Summary
                if data
                    .value
                    .status
                    .as_deref()
                    .is_some_and(|s| s.eq_ignore_ascii_case("CANCELLED")) =>
            {
                Some(Color::BrightBlack)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum ReminderColumn {
    Status,
    Due,
    Summary,
    Uid,
}

impl ReminderColumn {
    pub const ALL: [Self; 4] = [Self::Status, Self::Due, Self::Summary, Self::Uid];
    pub const BRIEF: [Self; 3] = [Self::Status, Self::Due, Self::Summary];
}

impl Column<Resource<Reminder>> for ReminderColumn {
    fn name(&self) -> &'static str {
        match self {
            Self::Status => "Status",
            Self::Due => "Due",
            Self::Summary => "Summary",
            Self::Uid => "UID",
        }
    }

    fn format<'a>(&self, data: &'a Resource<Reminder>) -> Cow<'a, str> {
        let reminder = &data.value;
        match self {
            Self::Status => match reminder.status {
                Some(ReminderStatus::Completed) => "[x]".into(),
                Some(ReminderStatus::InProcess) => "[~]".into(),
                Some(ReminderStatus::Cancelled) => "[-]".into(),
                Some(ReminderStatus::NeedsAction) | None => "[ ]".into(),
            },
            Self::Due => reminder
                .due
                .as_ref()
                .map_or_else(|| "-".into(), |t| format_time(t).into()),
            Self::Summary => or_dash(reminder.summary.as_deref()),
            Self::Uid => reminder.meta.uid.as_str().into(),
        }
    }

    fn color(&self, data: &Resource<Reminder>) -> Option<Color> {
        match (self, data.value.status) {
            (
                Self::Summary,
                Some(ReminderStatus::Completed | ReminderStatus::Cancelled),
            ) => Some(Color::BrightBlack),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum ContactColumn {
    Name,
    Email,
    Phone,
    Uid,
}

impl ContactColumn {
    pub const ALL: [Self; 4] = [Self::Name, Self::Email, Self::Phone, Self::Uid];
    pub const BRIEF: [Self; 3] = [Self::Name, Self::Email, Self::Phone];
}

impl Column<Resource<Contact>> for ContactColumn {
    fn name(&self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Email => "Email",
            Self::Phone => "Phone",
            Self::Uid => "UID",
        }
    }

    fn format<'a>(&self, data: &'a Resource<Contact>) -> Cow<'a, str> {
        let contact = &data.value;
        match self {
            Self::Name => contact.display_name().into(),
            Self::Email => {
                let email = preferred(&contact.emails, |e| e.is_preferred);
                or_dash(email.map(|e| e.address.as_str()))
            }
            Self::Phone => {
                let phone = preferred(&contact.phones, |p| p.is_preferred);
                or_dash(phone.map(|p| p.number.as_str()))
            }
            Self::Uid => contact.meta.uid.as_str().into(),
        }
    }
}

fn preferred<T>(values: &[T], is_preferred: impl Fn(&T) -> bool) -> Option<&T> {
    values
        .iter()
        .find(|v| is_preferred(v))
        .or_else(|| values.first())
}

#[derive(Debug, Clone, Copy)]
pub enum GroupColumn {
    Name,
    Members,
    Uid,
}

impl GroupColumn {
    pub const ALL: [Self; 3] = [Self::Name, Self::Members, Self::Uid];
    pub const BRIEF: [Self; 2] = [Self::Name, Self::Members];
}

impl Column<Resource<ContactGroup>> for GroupColumn {
    fn name(&self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Members => "Members",
            Self::Uid => "UID",
        }
    }

    fn format<'a>(&self, data: &'a Resource<ContactGroup>) -> Cow<'a, str> {
        match self {
            Self::Name => data.value.name.as_str().into(),
            Self::Members => data.value.members.len().to_string().into(),
            Self::Uid => data.value.meta.uid.as_str().into(),
        }
    }

    fn padding_direction(&self) -> PaddingDirection {
        match self {
            Self::Members => PaddingDirection::Right,
            _ => PaddingDirection::Left,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum SyncColumn {
    Change,
    Href,
    ETag,
}

impl SyncColumn {
    pub const ALL: [Self; 3] = [Self::Change, Self::Href, Self::ETag];
}

impl Column<SyncItem> for SyncColumn {
    fn name(&self) -> &'static str {
        match self {
            Self::Change => "Change",
            Self::Href => "Href",
            Self::ETag => "ETag",
        }
    }

    fn format<'a>(&self, data: &'a SyncItem) -> Cow<'a, str> {
        match self {
            Self::Change if data.deleted => "deleted".into(),
            Self::Change => "changed".into(),
            Self::Href => data.href.as_str().into(),
            Self::ETag => or_dash(data.etag.as_ref().map(|e| e.as_str())),
        }
    }

    fn color(&self, data: &SyncItem) -> Option<Color> {
        match self {
            Self::Change if data.deleted => Some(Color::Red),
            Self::Change => Some(Color::Green),
            _ => None,
        }
    }
}

/// Detailed multi-line view of a contact.
#[derive(Debug)]
pub struct ContactView<'a>(pub &'a Contact);

impl fmt::Display for ContactView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let contact = self.0;
        writeln!(f, "{}", contact.display_name().bold())?;
        field(f, "UID", &contact.meta.uid)?;
        if !contact.nickname.is_empty() {
            field(f, "Nickname", &contact.nickname.join(", "))?;
        }
        if let Some(org) = &contact.organization {
            match &contact.department {
                Some(dept) => field(f, "Organization", &format!("{org} / {dept}"))?,
                None => field(f, "Organization", org)?,
            }
        }
        if let Some(title) = &contact.job_title {
            field(f, "Title", title)?;
        }
        if let Some(birthday) = &contact.birthday {
            field(f, "Birthday", &birthday.strftime("%Y-%m-%d").to_string())?;
        }
        for phone in &contact.phones {
            let kind = typed(&phone.kind.to_string(), phone.label.as_deref(), phone.is_preferred);
            field(f, &format!("Phone ({kind})"), &phone.number)?;
        }
        for email in &contact.emails {
            let kind = typed(&email.kind.to_string(), email.label.as_deref(), email.is_preferred);
            field(f, &format!("Email ({kind})"), &email.address)?;
        }
        for address in &contact.addresses {
            let kind = typed(&address.kind.to_string(), None, address.is_preferred);
            let lines: Vec<&str> = [
                &address.street,
                &address.city,
                &address.region,
                &address.postal_code,
                &address.country,
            ]
            .into_iter()
            .map(String::as_str)
            .filter(|p| !p.is_empty())
            .collect();
            field(f, &format!("Address ({kind})"), &lines.join(", "))?;
        }
        for website in &contact.websites {
            let kind = typed(&website.kind.to_string(), website.label.as_deref(), website.is_preferred);
            field(f, &format!("URL ({kind})"), &website.url)?;
        }
        for profile in &contact.profiles {
            let kind = typed(&profile.kind.to_string(), profile.label.as_deref(), profile.is_preferred);
            let value = profile.user.as_deref().unwrap_or(&profile.url);
            field(f, &format!("Profile ({kind})"), value)?;
        }
        for date in &contact.dates {
            let kind = typed(&date.kind.to_string(), date.label.as_deref(), date.is_preferred);
            field(f, &format!("Date ({kind})"), &date.date.strftime("%Y-%m-%d").to_string())?;
        }
        for related in &contact.related {
            let kind = typed(&related.kind.to_string(), related.label.as_deref(), related.is_preferred);
            field(f, &format!("Related ({kind})"), &related.name)?;
        }
        if let Some(note) = &contact.note {
            field(f, "Note", note)?;
        }
        if !contact.categories.is_empty() {
            field(f, "Categories", &contact.categories.join(", "))?;
        }
        Ok(())
    }
}

/// Detailed multi-line view of a contact group.
#[derive(Debug)]
pub struct GroupView<'a>(pub &'a ContactGroup);

impl fmt::Display for GroupView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let group = self.0;
        writeln!(f, "{} {}", group.name.bold(), "(group)".dimmed())?;
        field(f, "UID", &group.meta.uid)?;
        for member in &group.members {
            field(f, "Member", member)?;
        }
        Ok(())
    }
}

/// Detailed multi-line view of an event.
#[derive(Debug)]
pub struct EventView<'a>(pub &'a Event);

impl fmt::Display for EventView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let event = self.0;
        writeln!(f, "{}", event.summary.as_deref().unwrap_or("(no summary)").bold())?;
        field(f, "UID", &event.meta.uid)?;
        if let Some(start) = &event.start {
            field(f, "Start", &format_time(start))?;
        }
        if let Some(end) = &event.end {
            field(f, "End", &format_time(end))?;
        } else if let Some(duration) = &event.duration {
            field(f, "Duration", duration)?;
        }
        optional(f, "Location", event.location.as_deref())?;
        optional(f, "Status", event.status.as_deref())?;
        optional(f, "Repeat", event.rrule.as_deref())?;
        optional(f, "URL", event.url.as_deref())?;
        for alarm in &event.alarms {
            field(f, "Alarm", &format!("{} {}", alarm.action, alarm.trigger))?;
        }
        optional(f, "Description", event.description.as_deref())?;
        Ok(())
    }
}

/// Detailed multi-line view of a reminder.
#[derive(Debug)]
pub struct ReminderView<'a>(pub &'a Reminder);

impl fmt::Display for ReminderView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reminder = self.0;
        let summary = reminder.summary.as_deref().unwrap_or("(no summary)");
        writeln!(f, "{}", summary.bold())?;
        field(f, "UID", &reminder.meta.uid)?;
        if let Some(status) = reminder.status {
            field(f, "Status", &status.to_string())?;
        }
        if let Some(due) = &reminder.due {
            field(f, "Due", &format_time(due))?;
        }
        if let Some(completed) = &reminder.completed {
            field(f, "Completed", &format_time(completed))?;
        }
        if let Some(priority) = reminder.priority {
            field(f, "Priority", &priority.to_string())?;
        }
        if let Some(percent) = reminder.percent_complete {
            field(f, "Progress", &format!("{percent}%"))?;
        }
        optional(f, "Location", reminder.location.as_deref())?;
        optional(f, "Repeat", reminder.rrule.as_deref())?;
        for alarm in &reminder.alarms {
            field(f, "Alarm", &format!("{} {}", alarm.action, alarm.trigger))?;
        }
        optional(f, "Description", reminder.description.as_deref())?;
        Ok(())
    }
}

fn field(f: &mut fmt::Formatter<'_>, name: &str, value: &str) -> fmt::Result {
    writeln!(f, "  {}: {}", name.cyan(), value)
}

fn optional(f: &mut fmt::Formatter<'_>, name: &str, value: Option<&str>) -> fmt::Result {
    match value {
        Some(value) => field(f, name, value),
        None => Ok(()),
    }
}

fn typed(kind: &str, label: Option<&str>, preferred: bool) -> String {
    let kind = label.unwrap_or(kind);
    if preferred {
        format!("{kind}, preferred")
    } else {
        kind.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use davsync_codec::{Email, EmailKind, ObjectMeta};
    use davsync_dav::Href;
    use jiff::civil::{date, datetime};

    use crate::table::Table;

    fn resource<T>(href: &str, value: T) -> Resource<T> {
        Resource {
            href: Href::from(href),
            etag: None,
            value,
        }
    }

    #[test]
    fn formats_times() {
        assert_eq!(format_time(&CalDateTime::Date(date(2025, 3, 1))), "2025-03-01");
        assert_eq!(
            format_time(&CalDateTime::Utc(datetime(2025, 3, 1, 9, 30, 0, 0))),
            "2025-03-01 09:30 UTC"
        );
        assert_eq!(
            format_time(&CalDateTime::Zoned {
                tz_id: "Europe/Berlin".to_string(),
                datetime: datetime(2025, 3, 1, 9, 30, 0, 0),
            }),
            "2025-03-01 09:30 Europe/Berlin"
        );
    }

    #[test]
    fn contact_table_prefers_marked_email() {
        colored::control::set_override(false);
        let mut contact = Contact::new("Jane Doe");
        contact.meta = ObjectMeta {
            uid: "jane".to_string(),
            ..ObjectMeta::default()
        };
        contact.emails = vec![
            Email {
                address: "jane@work.example".to_string(),
                kind: EmailKind::Work,
                is_preferred: false,
                label: None,
            },
            Email {
                address: "jane@home.example".to_string(),
                kind: EmailKind::Home,
                is_preferred: true,
                label: None,
            },
        ];
        let data = [resource("/ab/jane.vcf", contact)];

        let text = Table::new(&ContactColumn::BRIEF, &data).to_string();
        let row = text.lines().nth(1).unwrap();
        assert!(row.starts_with("Jane Doe"));
        assert!(row.contains("jane@home.example"));
        assert!(row.ends_with('-'));
    }

    #[test]
    fn sync_table_marks_deletions() {
        colored::control::set_override(false);
        let data = [
            SyncItem {
                href: Href::from("/cal/a.ics"),
                id: "a".to_string(),
                etag: Some("\"1\"".into()),
                deleted: false,
            },
            SyncItem {
                href: Href::from("/cal/b.ics"),
                id: "b".to_string(),
                etag: None,
                deleted: true,
            },
        ];

        let text = Table::new(&SyncColumn::ALL, &data).without_header().to_string();
        assert_eq!(text, "changed  /cal/a.ics  \"1\"\ndeleted  /cal/b.ics  -\n");
    }

    #[test]
    fn reminder_view_lists_details() {
        colored::control::set_override(false);
        let reminder = Reminder {
            meta: ObjectMeta {
                uid: "task-1".to_string(),
                ..ObjectMeta::default()
            },
            summary: Some("File taxes".to_string()),
            status: Some(ReminderStatus::InProcess),
            percent_complete: Some(40),
            ..Reminder::default()
        };

        let text = ReminderView(&reminder).to_string();
        assert!(text.starts_with("File taxes\n"));
        assert!(text.contains("  UID: task-1\n"));
        assert!(text.contains("  Status: IN-PROCESS\n"));
        assert!(text.contains("  Progress: 40%\n"));
    }
}
