//! Back-office commands. The caller has already checked the admin role.

use std::path::Path;

use shophub_admin::categories::{self, CategoryDraft};
use shophub_admin::orders;
use shophub_admin::products::{self, ProductDraft};
use shophub_admin::DashboardStats;
use shophub_core::{CategoryId, OrderId, OrderStatus, ProductId};
use shophub_storefront::api::ImageUpload;
use shophub_storefront::{AppError, Result};

use crate::context::Context;
use crate::output;

pub async fn stats(ctx: &Context) -> Result<()> {
    let stats = DashboardStats::fetch(&ctx.client).await?;
    output::stats(&stats);
    Ok(())
}

pub async fn list_products(ctx: &Context, search: &str) -> Result<()> {
    let all = products::list(&ctx.client).await?;
    output::products(products::filter_by_name(&all, search));
    Ok(())
}

pub async fn create_product(ctx: &Context, draft: ProductDraft) -> Result<()> {
    let product = products::create(&ctx.client, draft).await?;
    output::message(&format!("Created product {} ({})", product.name, product.id));
    Ok(())
}

pub async fn update_product(ctx: &Context, id: &ProductId, draft: ProductDraft) -> Result<()> {
    let product = products::update(&ctx.client, id, draft).await?;
    output::message(&format!("Updated product {}", product.name));
    Ok(())
}

pub async fn delete_product(ctx: &Context, id: &ProductId) -> Result<()> {
    products::delete(&ctx.client, id).await?;
    output::message("Product deleted");
    Ok(())
}

pub async fn list_categories(ctx: &Context) -> Result<()> {
    let all = categories::list(&ctx.client).await?;
    output::categories(&all);
    Ok(())
}

pub async fn save_category(ctx: &Context, draft: &CategoryDraft) -> Result<()> {
    let category = categories::save(&ctx.client, draft).await?;
    let verb = if draft.id.is_some() { "Updated" } else { "Created" };
    output::message(&format!("{verb} category {} ({})", category.name, category.id));
    Ok(())
}

pub async fn delete_category(ctx: &Context, id: &CategoryId) -> Result<()> {
    categories::delete(&ctx.client, id).await?;
    output::message("Category deleted");
    Ok(())
}

pub async fn list_orders(ctx: &Context, status: Option<OrderStatus>) -> Result<()> {
    let all = orders::list(&ctx.client, status).await?;
    output::orders(&all);
    Ok(())
}

pub async fn update_order_status(ctx: &Context, id: &OrderId, status: OrderStatus) -> Result<()> {
    let order = orders::update_status(&ctx.client, id, status).await?;
    output::message(&format!(
        "Order {} is now {}",
        orders::short_order_id(&order.id),
        order.status
    ));
    Ok(())
}

/// Load an image file for upload.
pub fn read_image(path: &Path) -> Result<ImageUpload> {
    let content_type = match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => {
            return Err(AppError::BadRequest(format!(
                "{}: only png, jpg, gif and webp images are supported",
                path.display()
            )));
        }
    };

    let bytes = std::fs::read(path)
        .map_err(|e| AppError::BadRequest(format!("{}: {e}", path.display())))?;
    let file_name = path
        .file_name()
        .map_or_else(|| "image".to_string(), |name| name.to_string_lossy().into_owned());

    Ok(ImageUpload {
        file_name,
        content_type: content_type.to_string(),
        bytes,
    })
}
