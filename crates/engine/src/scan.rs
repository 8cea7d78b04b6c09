use pocketshop_core::Product;

/// Match decoded QR text against the catalog.
///
/// Tried in order: exact id, `product-<text>`, then ids contained in the
/// text. Among contained ids the longest wins, so `product-17` never
/// resolves to `product-1`.
pub fn match_scanned_product<'a>(products: &'a [Product], text: &str) -> Option<&'a Product> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Some(product) = products.iter().find(|p| p.id == text) {
        return Some(product);
    }

    let prefixed = format!("product-{text}");
    if let Some(product) = products.iter().find(|p| p.id == prefixed) {
        return Some(product);
    }

    products
        .iter()
        .filter(|p| !p.id.is_empty() && text.contains(p.id.as_str()))
        .max_by_key(|p| p.id.len())
}
