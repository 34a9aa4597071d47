//! ShopHub CLI - storefront and back-office from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! shophub products list --search lamp
//! shophub categories show 66a1b2c3d4e5f6a7b8c9d0e1
//!
//! # Build a cart (persisted under SHOPHUB_DATA_DIR between runs)
//! shophub cart add 66a1b2c3d4e5f6a7b8c9d0e1 -q 2
//! shophub cart list
//!
//! # Hand the order off to WhatsApp
//! shophub checkout --name "Ada" --phone "+254 700 000000" --address "12 Main St"
//!
//! # Back-office (admin account required)
//! shophub login -e admin@example.com -p secret
//! shophub admin stats
//! ```
//!
//! Logs go to stderr; set `RUST_LOG` to change the level.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use secrecy::SecretString;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shophub_core::{CategoryId, OrderId, OrderStatus, ProductId};
use shophub_storefront::config::StorefrontConfig;

mod commands;
mod context;
mod output;

use context::Context;

#[derive(Parser)]
#[command(name = "shophub")]
#[command(author, version, about = "ShopHub storefront and back-office")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse products
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Browse categories
    Categories {
        #[command(subcommand)]
        action: CategoriesAction,
    },
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Send the cart as a WhatsApp order
    Checkout {
        /// Full name
        #[arg(short, long, default_value = "")]
        name: String,

        /// Phone number
        #[arg(short, long, default_value = "")]
        phone: String,

        /// Delivery address
        #[arg(short, long, default_value = "")]
        address: String,

        /// Additional notes for the order
        #[arg(long, default_value = "")]
        notes: String,

        /// Also record the order with the store (requires login)
        #[arg(long)]
        record: bool,
    },
    /// Sign in
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },
    /// Create an account and sign in
    Register {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },
    /// Sign out
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List your orders
    Orders,
    /// Back-office commands (admin only)
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List products
    List {
        /// Only products in this category
        #[arg(short, long)]
        category: Option<CategoryId>,

        /// Only products matching this term
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show one product
    Show { id: ProductId },
}

#[derive(Subcommand)]
enum CategoriesAction {
    /// List categories
    List,
    /// Show one category and its products
    Show { id: CategoryId },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart contents and total
    List,
    /// Add a product
    Add {
        id: ProductId,

        /// Units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a product
    Remove { id: ProductId },
    /// Set a product's quantity; 0 or less removes it
    Set {
        id: ProductId,

        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum AdminAction {
    /// Dashboard totals
    Stats,
    /// Manage products
    Products {
        #[command(subcommand)]
        action: AdminProductsAction,
    },
    /// Manage categories
    Categories {
        #[command(subcommand)]
        action: AdminCategoriesAction,
    },
    /// Manage orders
    Orders {
        #[command(subcommand)]
        action: AdminOrdersAction,
    },
}

#[derive(Subcommand)]
enum AdminProductsAction {
    /// List products
    List {
        /// Only products whose name contains this term
        #[arg(short, long, default_value = "")]
        search: String,
    },
    /// Create a product
    Create(ProductArgs),
    /// Replace a product
    Update {
        id: ProductId,

        #[command(flatten)]
        product: ProductArgs,
    },
    /// Delete a product
    Delete { id: ProductId },
}

#[derive(clap::Args)]
struct ProductArgs {
    /// Product name
    #[arg(short, long)]
    name: String,

    /// Description
    #[arg(short, long, default_value = "")]
    description: String,

    /// Price, e.g. 19.99
    #[arg(short, long)]
    price: String,

    /// Units in stock
    #[arg(short, long, default_value = "0")]
    stock: String,

    /// Category id
    #[arg(short, long)]
    category: String,

    /// Image file to upload
    #[arg(short, long)]
    image: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
enum AdminCategoriesAction {
    /// List categories
    List,
    /// Create a category, or update it when --id is given
    Save {
        /// Existing category id
        #[arg(long)]
        id: Option<CategoryId>,

        /// Category name
        #[arg(short, long)]
        name: String,

        /// Description
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// Delete a category
    Delete { id: CategoryId },
}

#[derive(Subcommand)]
enum AdminOrdersAction {
    /// List orders
    List {
        /// Only orders with this status
        #[arg(short, long)]
        status: Option<OrderStatus>,
    },
    /// Change an order's status
    Status { id: OrderId, status: OrderStatus },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shophub=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            output::failure(&e);
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: Cli) -> shophub_storefront::Result<()> {
    let config = StorefrontConfig::from_env()?;
    let ctx = Context::new(config);

    match cli.command {
        Commands::Products { action } => match action {
            ProductsAction::List { category, search } => {
                commands::catalog::list_products(&ctx, category, search).await?;
            }
            ProductsAction::Show { id } => commands::catalog::show_product(&ctx, &id).await?,
        },
        Commands::Categories { action } => match action {
            CategoriesAction::List => commands::catalog::list_categories(&ctx).await?,
            CategoriesAction::Show { id } => commands::catalog::show_category(&ctx, &id).await?,
        },
        Commands::Cart { action } => match action {
            CartAction::List => commands::cart::list(&ctx),
            CartAction::Add { id, quantity } => commands::cart::add(&ctx, &id, quantity).await?,
            CartAction::Remove { id } => commands::cart::remove(&ctx, &id),
            CartAction::Set { id, quantity } => commands::cart::set(&ctx, &id, quantity),
            CartAction::Clear => commands::cart::clear(&ctx),
        },
        Commands::Checkout {
            name,
            phone,
            address,
            notes,
            record,
        } => {
            let form = shophub_storefront::checkout::CheckoutForm {
                name,
                phone,
                address,
                notes,
            };
            commands::checkout::run(&ctx, &form, record).await?;
        }
        Commands::Login { email, password } => {
            commands::account::login(&ctx, &email, &SecretString::from(password)).await?;
        }
        Commands::Register {
            name,
            email,
            password,
        } => {
            commands::account::register(&ctx, &name, &email, &SecretString::from(password)).await?;
        }
        Commands::Logout => commands::account::logout(&ctx),
        Commands::Whoami => commands::account::whoami(&ctx).await?,
        Commands::Orders => commands::account::my_orders(&ctx).await?,
        Commands::Admin { action } => run_admin(&ctx, action).await?,
    }
    Ok(())
}

async fn run_admin(ctx: &Context, action: AdminAction) -> shophub_storefront::Result<()> {
    shophub_admin::require_admin(&*ctx.session)?;

    match action {
        AdminAction::Stats => commands::admin::stats(ctx).await?,
        AdminAction::Products { action } => match action {
            AdminProductsAction::List { search } => {
                commands::admin::list_products(ctx, &search).await?;
            }
            AdminProductsAction::Create(product) => {
                commands::admin::create_product(ctx, product.into_draft()?).await?;
            }
            AdminProductsAction::Update { id, product } => {
                commands::admin::update_product(ctx, &id, product.into_draft()?).await?;
            }
            AdminProductsAction::Delete { id } => commands::admin::delete_product(ctx, &id).await?,
        },
        AdminAction::Categories { action } => match action {
            AdminCategoriesAction::List => commands::admin::list_categories(ctx).await?,
            AdminCategoriesAction::Save {
                id,
                name,
                description,
            } => {
                let draft = shophub_admin::categories::CategoryDraft {
                    id,
                    name,
                    description,
                };
                commands::admin::save_category(ctx, &draft).await?;
            }
            AdminCategoriesAction::Delete { id } => {
                commands::admin::delete_category(ctx, &id).await?;
            }
        },
        AdminAction::Orders { action } => match action {
            AdminOrdersAction::List { status } => commands::admin::list_orders(ctx, status).await?,
            AdminOrdersAction::Status { id, status } => {
                commands::admin::update_order_status(ctx, &id, status).await?;
            }
        },
    }
    Ok(())
}

impl ProductArgs {
    fn into_draft(self) -> shophub_storefront::Result<shophub_admin::products::ProductDraft> {
        let image = self
            .image
            .as_deref()
            .map(commands::admin::read_image)
            .transpose()?;

        Ok(shophub_admin::products::ProductDraft {
            name: self.name,
            description: self.description,
            price: self.price,
            stock: self.stock,
            category: self.category,
            image,
        })
    }
}
