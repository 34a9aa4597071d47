//! Catalog browsing commands.

use shophub_core::{CategoryId, ProductId};
use shophub_storefront::Result;
use shophub_storefront::api::ProductQuery;

use crate::context::Context;
use crate::output;

pub async fn list_products(
    ctx: &Context,
    category: Option<CategoryId>,
    search: Option<String>,
) -> Result<()> {
    let query = ProductQuery { category, search };
    let products = ctx.client.products(&query).await?;
    output::products(&products.data);
    Ok(())
}

pub async fn show_product(ctx: &Context, id: &ProductId) -> Result<()> {
    let product = ctx.client.product(id).await?;
    output::product(&product);
    Ok(())
}

pub async fn list_categories(ctx: &Context) -> Result<()> {
    let categories = ctx.client.categories().await?;
    output::categories(&categories.data);
    Ok(())
}

pub async fn show_category(ctx: &Context, id: &CategoryId) -> Result<()> {
    let category = ctx.client.category(id).await?;
    output::category(&category);
    Ok(())
}
