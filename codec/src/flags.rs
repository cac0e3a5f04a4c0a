// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Wire-level type flags decoded from `TYPE` parameter values.
//!
//! Each field kind has its own bit set. `PREF` is part of every set but is handled
//! separately from category mapping, see [`crate::mapping`].

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// A bit set of `TYPE` parameter values.
pub trait TypeFlags: Copy + Eq + BitOr<Output = Self> + fmt::Debug + 'static {
    /// No flags
    const EMPTY: Self;

    /// The preferred marker (`TYPE=PREF`, or `PREF=1` in vCard 4)
    const PREF: Self;

    /// Known flags with their `TYPE` keywords, in emission order
    const NAMES: &'static [(Self, &'static str)];

    /// Raw bits
    fn bits(self) -> u32;

    /// Build from raw bits
    fn from_bits(bits: u32) -> Self;

    /// Whether all flags of `other` are set in `self` (non-strict subset test).
    fn contains(self, other: Self) -> bool {
        self.bits() & other.bits() == other.bits()
    }

    /// `self` with the flags of `other` cleared.
    #[must_use]
    fn without(self, other: Self) -> Self {
        Self::from_bits(self.bits() & !other.bits())
    }

    /// Whether no flag is set.
    fn is_empty(self) -> bool {
        self.bits() == 0
    }

    /// Collect flags from `TYPE` values; unknown values are ignored.
    fn from_type_values<'a>(values: impl IntoIterator<Item = &'a str>) -> Self {
        values.into_iter().fold(Self::EMPTY, |acc, value| {
            let value = value.trim();
            Self::NAMES
                .iter()
                .find(|(_, kw)| kw.eq_ignore_ascii_case(value))
                .map_or(acc, |(flag, _)| acc | *flag)
        })
    }

    /// `TYPE` values for the set flags, `PREF` last.
    fn type_values(self) -> Vec<&'static str> {
        let mut values: Vec<_> = Self::NAMES
            .iter()
            .filter(|(flag, _)| *flag != Self::PREF && self.contains(*flag))
            .map(|(_, kw)| *kw)
            .collect();
        if self.contains(Self::PREF)
            && let Some((_, kw)) = Self::NAMES.iter().find(|(flag, _)| *flag == Self::PREF)
        {
            values.push(*kw);
        }
        values
    }
}

macro_rules! type_flags {
    (
        $(#[$attr:meta])*
        struct $ty:ident {
            $(
                $(#[$flag_attr:meta])*
                $flag:ident = $bit:literal => $kw:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$attr])*
        #[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
        pub struct $ty(u32);

        impl $ty {
            $(
                $(#[$flag_attr])*
                pub const $flag: Self = Self(1 << $bit);
            )+

            /// Both sets of flags, usable in constant tables.
            #[must_use]
            pub const fn union(self, other: Self) -> Self {
                Self(self.0 | other.0)
            }
        }

        impl TypeFlags for $ty {
            const EMPTY: Self = Self(0);
            const PREF: Self = Self::PREF;
            const NAMES: &'static [(Self, &'static str)] = &[$((Self::$flag, $kw)),+];

            fn bits(self) -> u32 {
                self.0
            }

            fn from_bits(bits: u32) -> Self {
                Self(bits)
            }
        }

        impl BitOr for $ty {
            type Output = Self;

            fn bitor(self, rhs: Self) -> Self {
                Self(self.0 | rhs.0)
            }
        }

        impl BitOrAssign for $ty {
            fn bitor_assign(&mut self, rhs: Self) {
                self.0 |= rhs.0;
            }
        }

        impl fmt::Debug for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($ty), self.type_values().join("|"))
            }
        }
    };
}

type_flags! {
    /// Flags of `TEL`
    struct PhoneFlags {
        /// Home number
        HOME = 0 => "HOME",
        /// Work number
        WORK = 1 => "WORK",
        /// Mobile number
        CELL = 2 => "CELL",
        /// Voice line
        VOICE = 3 => "VOICE",
        /// Facsimile
        FAX = 4 => "FAX",
        /// Pager
        PAGER = 5 => "PAGER",
        /// Apple iPhone
        IPHONE = 6 => "IPHONE",
        /// Main number
        MAIN = 7 => "MAIN",
        /// Other number
        OTHER = 8 => "OTHER",
        /// Text messages
        TEXT = 9 => "TEXT",
        /// Preferred
        PREF = 31 => "PREF",
    }
}

type_flags! {
    /// Flags of `ADR`
    struct AddressFlags {
        /// Home address
        HOME = 0 => "HOME",
        /// Work address
        WORK = 1 => "WORK",
        /// Postal delivery address
        POSTAL = 2 => "POSTAL",
        /// Parcel delivery address
        PARCEL = 3 => "PARCEL",
        /// Domestic delivery address
        DOM = 4 => "DOM",
        /// International delivery address
        INTL = 5 => "INTL",
        /// Preferred
        PREF = 31 => "PREF",
    }
}

type_flags! {
    /// Flags of `EMAIL`
    struct EmailFlags {
        /// Internet address
        INTERNET = 0 => "INTERNET",
        /// Home address
        HOME = 1 => "HOME",
        /// Work address
        WORK = 2 => "WORK",
        /// X.400 address
        X400 = 3 => "X400",
        /// Preferred
        PREF = 31 => "PREF",
    }
}

type_flags! {
    /// Flags of `URL`
    struct WebsiteFlags {
        /// Home page
        HOME = 0 => "HOME",
        /// Work page
        WORK = 1 => "WORK",
        /// Preferred
        PREF = 31 => "PREF",
    }
}

type_flags! {
    /// Flags of `X-SOCIALPROFILE`
    struct ProfileFlags {
        /// Twitter
        TWITTER = 0 => "TWITTER",
        /// Facebook
        FACEBOOK = 1 => "FACEBOOK",
        /// `LinkedIn`
        LINKEDIN = 2 => "LINKEDIN",
        /// Flickr
        FLICKR = 3 => "FLICKR",
        /// Myspace
        MYSPACE = 4 => "MYSPACE",
        /// Sina Weibo
        SINAWEIBO = 5 => "SINAWEIBO",
        /// Preferred
        PREF = 31 => "PREF",
    }
}

type_flags! {
    /// Flags of `X-ABDATE`
    struct DateFlags {
        /// Preferred
        PREF = 31 => "PREF",
    }
}

type_flags! {
    /// Flags of `X-ABRELATEDNAMES`
    struct RelatedFlags {
        /// Preferred
        PREF = 31 => "PREF",
    }
}
