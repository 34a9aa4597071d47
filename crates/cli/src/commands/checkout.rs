//! WhatsApp checkout command.

use tracing::info;

use shophub_storefront::Result;
use shophub_storefront::checkout::{CheckoutForm, place_order, prepare_order};

use crate::context::Context;
use crate::output;

/// Hand the cart off to WhatsApp, optionally recording the order with the
/// store first. Nothing is recorded unless the hand-off can go ahead.
pub async fn run(ctx: &Context, form: &CheckoutForm, record: bool) -> Result<()> {
    let receipt = if record {
        let pending = prepare_order(&ctx.cart, &ctx.config.checkout, form)?;
        let order = ctx
            .client
            .create_order(&form.to_new_order(&pending.lines))
            .await?;
        info!(order_id = %order.id, "order recorded");
        pending.complete(&ctx.cart)
    } else {
        place_order(&ctx.cart, &ctx.config.checkout, form)?
    };

    output::receipt(&receipt);
    Ok(())
}
