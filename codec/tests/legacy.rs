// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for vCard 2.1 input.

use davsync_codec::{Card, CodecContext, ParseWarning, PhoneKind, PhotoData};

const LEGACY: &str = "BEGIN:VCARD\r\n\
VERSION:2.1\r\n\
UID:legacy-1\r\n\
N;CHARSET=UTF-8;ENCODING=QUOTED-PRINTABLE:M=C3=BCller;J=C3=BCrgen;;;\r\n\
FN;CHARSET=ISO-8859-1;ENCODING=QUOTED-PRINTABLE:J=FCrgen M=FCller\r\n\
TEL;HOME;VOICE:555-1234\r\n\
NOTE;ENCODING=QUOTED-PRINTABLE:first line=0D=0A=\r\n\
second line\r\n\
PHOTO;JPEG;ENCODING=BASE64:\r\n\
 /9j/\r\n\
 4A==\r\n\
END:VCARD\r\n";

#[test]
fn test_reads_legacy_card() {
    let ctx = CodecContext::default();
    let parsed = Card::parse(LEGACY, &ctx).unwrap();
    assert!(parsed.warnings.is_empty(), "{:?}", parsed.warnings);

    let Card::Contact(contact) = parsed.value else {
        panic!("expected a contact");
    };
    assert_eq!(contact.name.family, "Müller");
    assert_eq!(contact.name.given, "Jürgen");
    assert_eq!(contact.formatted_name, "Jürgen Müller");
    assert_eq!(contact.phones[0].kind, PhoneKind::Home);
    assert_eq!(contact.note.as_deref(), Some("first line\r\nsecond line"));

    let photo = contact.photo.unwrap();
    assert_eq!(photo.media_type.as_deref(), Some("image/jpeg"));
    assert_eq!(photo.data, PhotoData::Inline(vec![0xff, 0xd8, 0xff, 0xe0]));
}

#[test]
fn test_unknown_encoding_is_passed_through() {
    let ctx = CodecContext::default();
    let text = "BEGIN:VCARD\r\nUID:x\r\nNOTE;ENCODING=UUENCODE:abc\r\nEND:VCARD\r\n";
    let parsed = Card::parse(text, &ctx).unwrap();
    assert!(matches!(
        parsed.warnings.as_slice(),
        [ParseWarning::UnsupportedEncoding { encoding, .. }] if encoding == "UUENCODE"
    ));
    let Card::Contact(contact) = parsed.value else {
        panic!("expected a contact");
    };
    assert_eq!(contact.note.as_deref(), Some("abc"));
}
