//! Cart commands. Everything except `add` works offline.

use shophub_core::ProductId;
use shophub_storefront::cart::ProductSnapshot;
use shophub_storefront::{AppError, Result};

use crate::context::Context;
use crate::output;

pub fn list(ctx: &Context) {
    output::cart(&ctx.cart.lines());
}

/// Fetch the product so the cart line carries its current name, price and
/// stock.
pub async fn add(ctx: &Context, id: &ProductId, quantity: u32) -> Result<()> {
    let product = ctx.client.product(id).await?;
    if !product.in_stock() {
        return Err(AppError::BadRequest(format!(
            "{} is out of stock",
            product.name
        )));
    }

    ctx.cart.add(&ProductSnapshot::from(&product), quantity);
    output::message(&format!(
        "{} x {} in cart",
        ctx.cart.quantity_of(id),
        product.name
    ));
    Ok(())
}

pub fn remove(ctx: &Context, id: &ProductId) {
    if ctx.cart.contains(id) {
        ctx.cart.remove(id);
        output::message("Removed from cart");
    } else {
        output::message("Not in cart");
    }
}

pub fn set(ctx: &Context, id: &ProductId, quantity: i64) {
    ctx.cart.set_quantity(id, quantity);
    output::cart(&ctx.cart.lines());
}

pub fn clear(ctx: &Context) {
    ctx.cart.clear();
    output::message("Cart cleared");
}
