// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use crate::field::FieldRegistry;
use crate::mapping::MappingTables;

/// Default maximum octets of a physical line before folding.
pub const DEFAULT_FOLD_WIDTH: usize = 75;

/// Default product identifier written to `PRODID`.
pub const DEFAULT_PRODUCT_ID: &str = concat!("-//davsync//davsync ", env!("CARGO_PKG_VERSION"), "//EN");

/// Read-only configuration shared by every parse and format call.
///
/// Built once and passed explicitly; it holds the type-flag mapping tables and the
/// field codec registry so callers can substitute their own.
#[derive(Debug, Clone)]
pub struct CodecContext {
    /// Type-flag to category tables
    pub tables: MappingTables,
    /// Field kind to codec table
    pub fields: FieldRegistry,
    /// Maximum octets per physical line when writing
    pub fold_width: usize,
    /// Value written to `PRODID` when an object has none
    pub product_id: String,
}

impl CodecContext {
    /// Context with the standard tables and registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tables: MappingTables::standard(),
            fields: FieldRegistry::standard(),
            fold_width: DEFAULT_FOLD_WIDTH,
            product_id: DEFAULT_PRODUCT_ID.to_owned(),
        }
    }

    /// Replace the mapping tables.
    #[must_use]
    pub fn with_tables(mut self, tables: MappingTables) -> Self {
        self.tables = tables;
        self
    }

    /// Replace the fold width; widths below 2 are raised to 2.
    #[must_use]
    pub fn with_fold_width(mut self, width: usize) -> Self {
        self.fold_width = width.max(2);
        self
    }

    /// Replace the product identifier.
    #[must_use]
    pub fn with_product_id(mut self, product_id: impl Into<String>) -> Self {
        self.product_id = product_id.into();
        self
    }
}

impl Default for CodecContext {
    fn default() -> Self {
        Self::new()
    }
}
