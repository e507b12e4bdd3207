use crate::domain::model::RawProduct;

/// Keeps a product iff the product type appears in its name
/// (case-insensitive) and its price fits the budget. Order-preserving.
pub fn filter_products(
    products: Vec<RawProduct>,
    product_type: &str,
    budget: u32,
) -> Vec<RawProduct> {
    let needle = product_type.to_lowercase();
    products
        .into_iter()
        .filter(|product| {
            product.name.to_lowercase().contains(&needle) && product.price <= f64::from(budget)
        })
        .collect()
}
