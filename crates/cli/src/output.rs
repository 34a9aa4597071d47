//! Terminal output.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use shophub_admin::DashboardStats;
use shophub_admin::orders::short_order_id;
use shophub_core::{Category, Order, Product, User};
use shophub_storefront::AppError;
use shophub_storefront::cart::CartLine;
use shophub_storefront::checkout::CheckoutReceipt;
use shophub_storefront::format::{format_date, format_price, truncate_text};

const DESCRIPTION_PREVIEW: usize = 60;

pub fn message(text: &str) {
    println!("{text}");
}

pub fn failure(err: &AppError) {
    eprintln!("error: {}", err.user_message());
}

pub fn products<'a>(products: impl IntoIterator<Item = &'a Product>) {
    let mut empty = true;
    for product in products {
        empty = false;
        let stock = if product.in_stock() {
            format!("{} in stock", product.stock)
        } else {
            "out of stock".to_string()
        };
        println!(
            "{}  {:<30} {:>12}  {:<14} {}",
            product.id,
            truncate_text(&product.name, 30),
            format_price(product.price),
            stock,
            product.category_name().unwrap_or("-"),
        );
    }
    if empty {
        println!("No products found.");
    }
}

pub fn product(product: &Product) {
    println!("{}", product.name);
    println!("  id:       {}", product.id);
    println!("  price:    {}", format_price(product.price));
    println!("  stock:    {}", product.stock);
    if let Some(category) = product.category_name() {
        println!("  category: {category}");
    }
    if let Some(image) = &product.image {
        println!("  image:    {image}");
    }
    if !product.description.is_empty() {
        println!();
        println!("{}", product.description);
    }
}

pub fn categories(categories: &[Category]) {
    if categories.is_empty() {
        println!("No categories found.");
        return;
    }
    for category in categories {
        println!(
            "{}  {:<24} {}",
            category.id,
            category.name,
            truncate_text(&category.description, DESCRIPTION_PREVIEW),
        );
    }
}

pub fn category(category: &Category) {
    println!("{}", category.name);
    if !category.description.is_empty() {
        println!("{}", category.description);
    }
    println!();
    products(&category.products);
}

pub fn cart(lines: &[CartLine]) {
    if lines.is_empty() {
        println!("Your cart is empty.");
        return;
    }
    for line in lines {
        println!(
            "{}  {:<30} {:>3} x {:>10} = {:>12}",
            line.product_id,
            truncate_text(&line.name, 30),
            line.quantity,
            format_price(line.unit_price),
            format_price(line.line_total()),
        );
    }
    let total = lines.iter().map(CartLine::line_total).sum();
    let items: u64 = lines.iter().map(|line| u64::from(line.quantity)).sum();
    println!();
    println!("{items} item(s), total {}", format_price(total));
}

pub fn receipt(receipt: &CheckoutReceipt) {
    println!(
        "Order of {} item(s) totalling {} is ready.",
        receipt.item_count,
        format_price(receipt.total)
    );
    println!("Open this link to send it on WhatsApp:");
    println!("{}", receipt.whatsapp_url);
}

pub fn user(user: &User) {
    println!("{} <{}> ({})", user.name, user.email, user.role);
}

pub fn orders(orders: &[Order]) {
    if orders.is_empty() {
        println!("No orders found.");
        return;
    }
    for order in orders {
        let customer = order
            .user
            .as_ref()
            .map_or("-", |customer| customer.name.as_str());
        println!(
            "{}  {:<18} {:<20} {:>12}  {}",
            short_order_id(&order.id),
            format_date(&order.created_at),
            customer,
            format_price(order.total),
            order.status,
        );
    }
}

pub fn stats(stats: &DashboardStats) {
    println!("Products:   {}", stats.total_products);
    println!("Categories: {}", stats.total_categories);
    println!("Orders:     {}", stats.total_orders);
    println!("Revenue:    {}", format_price(stats.total_revenue));
}
