//! Well-known column names of the `supply_chain` table after normalization.

/// Customer first name. Source for the last-name fill.
pub const CUSTOMER_FNAME: &str = "customer_fname";

/// Customer last name. Filled from the first name when absent.
pub const CUSTOMER_LNAME: &str = "customer_lname";

/// Customer zip code. Filled with the placeholder when absent.
pub const CUSTOMER_ZIPCODE: &str = "customer_zipcode";

/// Order zip code. Filled with the placeholder when absent.
pub const ORDER_ZIPCODE: &str = "order_zipcode";

/// Product description. Filled with the placeholder when absent.
pub const PRODUCT_DESCRIPTION: &str = "product_description";

/// Identifier reported when a row fails to load.
pub const ORDER_ITEM_ID: &str = "order_item_id";

/// Literal written into placeholder-filled cells.
pub const PLACEHOLDER: &str = "-";

/// Header of the row-index column the cleaner writes in front of the data.
pub const ROW_INDEX_COLUMN: &str = "";

/// Normalize a raw column name.
///
/// Spaces become underscores, literal parentheses are dropped and the
/// result is lowercased: `"Order Item Id"` -> `"order_item_id"`,
/// `"Sales per customer (USD)"` -> `"sales_per_customer_usd"`.
pub fn normalize_column_name(name: &str) -> String {
    name.replace(' ', "_")
        .replace(['(', ')'], "")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_spaces_and_case() {
        assert_eq!(normalize_column_name("Order Item Id"), "order_item_id");
        assert_eq!(normalize_column_name("Customer Fname"), CUSTOMER_FNAME);
    }

    #[test]
    fn test_normalize_parentheses() {
        assert_eq!(
            normalize_column_name("order date (DateOrders)"),
            "order_date_dateorders"
        );
        assert_eq!(normalize_column_name("Days for shipping (real)"), "days_for_shipping_real");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize_column_name("Product Description");
        assert_eq!(normalize_column_name(&once), once);
    }

    #[test]
    fn test_normalize_keeps_other_punctuation() {
        assert_eq!(normalize_column_name("Type-Code/2"), "type-code/2");
    }
}
