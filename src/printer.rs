//! Plain-text rendering of a product listing for the console fetcher

use std::io::{self, Write};

use crate::data::Product;

const SEPARATOR: &str = "*****************";

/// Writes one block per product, with its badges when it has any
pub fn show_products<W: Write>(out: &mut W, products: &[Product]) -> io::Result<()> {
    if products.is_empty() {
        writeln!(out, "No products found.")?;
        return Ok(());
    }

    for product in products {
        writeln!(
            out,
            "ID: {}\tName: {}\tSKU: {}\tPrice: {}\tBrand: {}\tSeller: {}",
            product.id,
            product.name,
            product.sku,
            product.original_price,
            product.brand_name,
            product.seller_name
        )?;

        if !product.badges.is_empty() {
            writeln!(out, "Badges:")?;
            for badge in &product.badges {
                writeln!(
                    out,
                    "\tPlacement: {}, Type: {}, Text: {}, Text Color: {}",
                    badge.placement,
                    badge.kind,
                    badge.text,
                    badge.text_color.as_deref().unwrap_or("")
                )?;
            }
        }
        writeln!(out, "{}", SEPARATOR)?;
    }

    Ok(())
}
