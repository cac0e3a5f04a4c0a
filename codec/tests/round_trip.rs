// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for reading and writing contacts through their text form.

use davsync_codec::{
    Address, AddressKind, Card, CodecContext, CodecError, Contact, Email, EmailKind, FieldKind,
    Phone, PhoneKind, Photo, PhotoData, Property, PropertyList, Website, WebsiteKind,
};

fn contact_of(text: &str, ctx: &CodecContext) -> Contact {
    match Card::parse(text, ctx).unwrap().value {
        Card::Contact(contact) => contact,
        Card::Group(_) => panic!("expected a contact"),
    }
}

fn round_trip(contact: &Contact, ctx: &CodecContext) -> Contact {
    let text = Card::Contact(contact.clone()).format(ctx).unwrap();
    contact_of(&text, ctx)
}

#[test]
fn test_fully_populated_contact_round_trips() {
    let ctx = CodecContext::default();
    let mut contact = Contact::new("Jane Doe");
    contact.meta.product_id = Some("-//Test//EN".into());
    contact.name.family = "Doe".into();
    contact.name.given = "Jane".into();
    contact.note = Some("Line one\nLine two; with, separators\\".into());
    contact.addresses.push(Address {
        street: "221B Baker Street".into(),
        city: "London".into(),
        region: "Greater London".into(),
        postal_code: "NW1 6XE".into(),
        country: "United Kingdom".into(),
        country_code: Some("gb".into()),
        ..Address::new(AddressKind::Home)
    });
    contact.phones.push(Phone {
        is_preferred: true,
        ..Phone::new("+44 20 7946 0000", PhoneKind::IPhone)
    });
    contact.emails.push(Email {
        label: Some("Book club".into()),
        ..Email::new("jane@example.org", EmailKind::Custom)
    });
    contact
        .websites
        .push(Website::new("https://example.org", WebsiteKind::HomePage));
    contact.photo = Some(Photo {
        data: PhotoData::Inline((0..=255).collect()),
        media_type: Some("image/png".into()),
    });

    assert_eq!(round_trip(&contact, &ctx), contact);
}

#[test]
fn test_iphone_precedes_mobile() {
    let ctx = CodecContext::default();
    let text = "BEGIN:VCARD\r\nVERSION:3.0\r\nUID:p\r\n\
                TEL;type=IPHONE;type=CELL;type=VOICE:1\r\n\
                TEL;type=CELL;type=VOICE:2\r\n\
                END:VCARD\r\n";
    let contact = contact_of(text, &ctx);
    assert_eq!(contact.phones[0].kind, PhoneKind::IPhone);
    assert_eq!(contact.phones[1].kind, PhoneKind::Mobile);
}

#[test]
fn test_preferred_is_independent_of_category() {
    let ctx = CodecContext::default();
    let text = "BEGIN:VCARD\r\nUID:p\r\nTEL;TYPE=HOME,VOICE,PREF:1\r\nEND:VCARD\r\n";
    let contact = contact_of(text, &ctx);
    assert_eq!(contact.phones[0].kind, PhoneKind::Home);
    assert!(contact.phones[0].is_preferred);
}

#[test]
fn test_custom_label_from_same_group() {
    let ctx = CodecContext::default();
    let text = "BEGIN:VCARD\r\nUID:p\r\n\
                item1.EMAIL;TYPE=X-UNMAPPED:a@example.com\r\n\
                item1.X-ABLabel:MyLabel\r\n\
                item2.X-ABLabel:Unrelated\r\n\
                END:VCARD\r\n";
    let contact = contact_of(text, &ctx);
    assert_eq!(contact.emails[0].kind, EmailKind::Custom);
    assert_eq!(contact.emails[0].label.as_deref(), Some("MyLabel"));
    assert_eq!(contact.extra.len(), 1);
}

#[test]
fn test_empty_address_is_rejected() {
    let ctx = CodecContext::default();
    let address = Address::new(AddressKind::Work);
    assert_eq!(
        address.to_properties(Some("item1"), &ctx),
        Err(CodecError::EmptyField {
            field: FieldKind::Address
        })
    );

    let mut contact = Contact::new("Nobody");
    contact.addresses.push(address);
    let text = Card::Contact(contact).format(&ctx).unwrap();
    assert!(text.lines().all(|line| !line.contains("ADR")));
}

#[test]
fn test_long_values_fold_and_unfold() {
    let ctx = CodecContext::default();
    let mut contact = Contact::new("Folded");
    let note = "Über lange Zeilen, ".repeat(12).trim_end().to_owned();
    contact.note = Some(note.clone());

    let text = Card::Contact(contact).format(&ctx).unwrap();
    assert!(text.split("\r\n").all(|line| line.len() <= 75));
    assert!(text.contains("\r\n "));
    assert_eq!(contact_of(&text, &ctx).note.as_deref(), Some(note.as_str()));
}

#[test]
fn test_custom_fold_width() {
    let ctx = CodecContext::default().with_fold_width(20);
    let mut contact = Contact::new("A rather long formatted name");
    contact.meta.uid = "u".into();
    let text = Card::Contact(contact).format(&ctx).unwrap();
    assert!(text.split("\r\n").all(|line| line.len() <= 20));
    assert_eq!(contact_of(&text, &ctx).formatted_name, "A rather long formatted name");
}

#[test]
fn test_property_list_operations() {
    let mut list: PropertyList = [
        Property::new("FN", "A"),
        Property::new("NOTE", "x").with_group("item1"),
        Property::new("X-ABLABEL", "y").with_group("ITEM1"),
    ]
    .into_iter()
    .collect();

    list.set("fn", "B");
    list.set("TITLE", "Boss");
    assert_eq!(list.find("FN").and_then(Property::text), Some("B"));
    assert_eq!(list.iter().last().map(Property::name), Some("TITLE"));
    assert_eq!(list.find_all_by_group("item1").len(), 2);

    let note = list.find("NOTE").cloned().unwrap();
    assert!(list.remove(&note));
    assert_eq!(
        list.iter().map(Property::name).collect::<Vec<_>>(),
        ["FN", "X-ABLABEL", "TITLE"]
    );
}
