//! Default-fill rules for the known nullable columns.

use supply_chain_shared::columns::{
    CUSTOMER_FNAME, CUSTOMER_LNAME, CUSTOMER_ZIPCODE, ORDER_ZIPCODE, PLACEHOLDER,
    PRODUCT_DESCRIPTION,
};

/// How a null cell is replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillStrategy {
    /// Copy the same row's value from another column.
    CopyFrom(&'static str),
    /// Write a fixed literal.
    Literal(&'static str),
}

/// A fill rule for one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillRule {
    /// Normalized name of the column being filled.
    pub column: &'static str,
    /// Replacement for null cells.
    pub strategy: FillStrategy,
}

/// The four columns the source leaves null, and how each is filled.
pub const DEFAULT_FILL_RULES: [FillRule; 4] = [
    FillRule {
        column: CUSTOMER_LNAME,
        strategy: FillStrategy::CopyFrom(CUSTOMER_FNAME),
    },
    FillRule {
        column: CUSTOMER_ZIPCODE,
        strategy: FillStrategy::Literal(PLACEHOLDER),
    },
    FillRule {
        column: ORDER_ZIPCODE,
        strategy: FillStrategy::Literal(PLACEHOLDER),
    },
    FillRule {
        column: PRODUCT_DESCRIPTION,
        strategy: FillStrategy::Literal(PLACEHOLDER),
    },
];
