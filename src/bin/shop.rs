use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use prettytable::{Cell, Row, Table};
use tracing_subscriber::EnvFilter;

use shopfront::cart::CartStorage;
use shopfront::categories::CategoryStorage;
use shopfront::config::Config;
use shopfront::models::{ProductInput, Registration};
use shopfront::orders::OrderStorage;
use shopfront::products::ProductStorage;
use shopfront::session::Session;
use shopfront::store::{FileStore, KeyValueStore};
use shopfront::users::UserStorage;

#[derive(Parser)]
#[command(name = "shop")]
#[command(about = "A CLI storefront backed by local JSON storage", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Create a new account")]
    Signup {
        #[arg(short, long, help = "Your name")]
        name: String,

        #[arg(short, long, help = "Email address")]
        email: String,

        #[arg(short, long, help = "Password (at least 6 characters)")]
        password: String,

        #[arg(short, long, help = "Password confirmation")]
        confirm: String,
    },

    #[command(about = "Log in with email and password")]
    Login {
        #[arg(short, long, help = "Email address")]
        email: String,

        #[arg(short, long, help = "Password")]
        password: String,
    },

    #[command(about = "Log out of the current session")]
    Logout,

    #[command(about = "Show the current user")]
    Whoami,

    #[command(about = "Manage categories (admin only)")]
    Category {
        #[command(subcommand)]
        command: CategoryCommands,
    },

    #[command(about = "Manage the product catalog")]
    Product {
        #[command(subcommand)]
        command: ProductCommands,
    },

    #[command(about = "Manage your cart")]
    Cart {
        #[command(subcommand)]
        command: CartCommands,
    },

    #[command(about = "Turn your cart into an order")]
    Checkout,

    #[command(about = "List your orders, newest first")]
    Orders {
        #[arg(long, help = "Show every user's orders (admin only)")]
        all: bool,
    },
}

#[derive(Subcommand)]
enum CategoryCommands {
    #[command(about = "Create a category")]
    Add {
        #[arg(short, long, help = "Category name")]
        name: String,
    },

    #[command(about = "List categories")]
    List,

    #[command(about = "Rename a category")]
    Rename {
        #[arg(short, long, help = "Category ID")]
        id: String,

        #[arg(short, long, help = "New name")]
        name: String,
    },

    #[command(about = "Delete a category")]
    Rm {
        #[arg(short, long, help = "Category ID")]
        id: String,
    },
}

#[derive(Subcommand)]
enum ProductCommands {
    #[command(about = "Add a product to the catalog (admin only)")]
    Add {
        #[arg(short, long, help = "Product name")]
        name: String,

        #[arg(short, long, help = "Price, must be positive")]
        price: f64,

        #[arg(short, long, help = "Category ID")]
        category: String,

        #[arg(short, long, help = "Description (at least 10 characters)")]
        description: Option<String>,

        #[arg(short, long, help = "Image reference")]
        image: Option<String>,
    },

    #[command(about = "List the catalog")]
    List,

    #[command(about = "Remove a product (admin only)")]
    Rm {
        #[arg(short, long, help = "Product ID")]
        id: String,
    },
}

#[derive(Subcommand)]
enum CartCommands {
    #[command(about = "Add one unit of a product to your cart")]
    Add {
        #[arg(short, long, help = "Product ID")]
        product: String,
    },

    #[command(about = "Show your cart")]
    List,

    #[command(about = "Set the quantity of a cart entry")]
    Set {
        #[arg(short, long, help = "Product ID")]
        product: String,

        #[arg(short, long, help = "New quantity, at least 1")]
        quantity: u32,
    },

    #[command(about = "Remove a product from your cart")]
    Rm {
        #[arg(short, long, help = "Product ID")]
        product: String,
    },

    #[command(about = "Empty your cart")]
    Clear,
}

fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run_command(cli.command) {
        eprintln!("❌ Error: {e}");
        std::process::exit(1);
    }
}

fn run_command(command: Commands) -> Result<()> {
    let config = Config::from_env();
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(config.data_dir));

    // Seed the admin account the first time the store is touched
    UserStorage::new(store.clone())
        .ensure_admin()
        .context("Failed to initialize user storage")?;

    match command {
        Commands::Signup {
            name,
            email,
            password,
            confirm,
        } => signup(&store, name, email, password, confirm)?,
        Commands::Login { email, password } => login(&store, &email, &password)?,
        Commands::Logout => {
            Session::new(store.clone()).logout()?;
            println!("✅ Logged out successfully!");
        }
        Commands::Whoami => whoami(&store)?,
        Commands::Category { command } => category_command(&store, command)?,
        Commands::Product { command } => product_command(&store, command)?,
        Commands::Cart { command } => cart_command(&store, command)?,
        Commands::Checkout => checkout(&store)?,
        Commands::Orders { all } => orders(&store, all)?,
    }

    Ok(())
}

fn signup(
    store: &Arc<dyn KeyValueStore>,
    name: String,
    email: String,
    password: String,
    confirm: String,
) -> Result<()> {
    let user = UserStorage::new(store.clone()).register(Registration {
        name,
        email,
        password,
        confirm_password: confirm,
    })?;

    println!("✅ Account created successfully!");
    println!("👤 Name: {}", user.name);
    println!("📧 Email: {}", user.email);
    println!("\n💡 You can now log in using: shop login -e {} -p <password>", user.email);

    Ok(())
}

fn login(store: &Arc<dyn KeyValueStore>, email: &str, password: &str) -> Result<()> {
    let user = Session::new(store.clone()).login(email, password)?;

    println!("✅ Login successful!");
    println!("👤 Welcome back, {}!", user.name);

    Ok(())
}

fn whoami(store: &Arc<dyn KeyValueStore>) -> Result<()> {
    match Session::new(store.clone()).current()? {
        Some(user) => {
            println!("👤 Logged in as: {} <{}>", user.name, user.email);
            println!("🆔 User ID: {}", user.id);
        }
        None => {
            println!("❌ Not logged in");
            println!("💡 Use 'shop login -e <email> -p <password>' to log in");
        }
    }
    Ok(())
}

fn require_admin(store: &Arc<dyn KeyValueStore>) -> Result<()> {
    if !Session::new(store.clone()).is_admin()? {
        bail!("This command requires an administrator account");
    }
    Ok(())
}

fn category_command(store: &Arc<dyn KeyValueStore>, command: CategoryCommands) -> Result<()> {
    let categories = CategoryStorage::new(store.clone());

    match command {
        CategoryCommands::Add { name } => {
            require_admin(store)?;
            let category = categories.create(&name)?;
            println!("✅ Category '{}' created!", category.name);
            println!("🆔 ID: {}", category.id);
        }
        CategoryCommands::List => {
            let all = categories.list()?;
            if all.is_empty() {
                println!("📭 No categories yet.");
                return Ok(());
            }

            let mut table = Table::new();
            table.add_row(Row::new(vec![Cell::new("ID"), Cell::new("Name")]));
            for category in all {
                table.add_row(Row::new(vec![
                    Cell::new(&category.id),
                    Cell::new(&category.name),
                ]));
            }
            table.printstd();
        }
        CategoryCommands::Rename { id, name } => {
            require_admin(store)?;
            categories.update(&id, &name)?;
            println!("✅ Category renamed to '{name}'");
        }
        CategoryCommands::Rm { id } => {
            require_admin(store)?;
            categories.delete(&id)?;
            println!("✅ Category deleted");
        }
    }

    Ok(())
}

fn product_command(store: &Arc<dyn KeyValueStore>, command: ProductCommands) -> Result<()> {
    let products = ProductStorage::new(store.clone());

    match command {
        ProductCommands::Add {
            name,
            price,
            category,
            description,
            image,
        } => {
            require_admin(store)?;
            let product = products.create(ProductInput {
                name,
                price,
                description,
                category_id: category,
                image,
            })?;
            println!("✅ Product '{}' added to the catalog!", product.name);
            println!("🆔 ID: {}", product.id);
        }
        ProductCommands::List => {
            let all = products.list()?;
            if all.is_empty() {
                println!("📭 The catalog is empty.");
                return Ok(());
            }

            let mut table = Table::new();
            table.add_row(Row::new(vec![
                Cell::new("ID"),
                Cell::new("Name"),
                Cell::new("Price"),
                Cell::new("Category"),
                Cell::new("Description"),
            ]));
            for product in all {
                table.add_row(Row::new(vec![
                    Cell::new(&product.id),
                    Cell::new(&product.name),
                    Cell::new(&format!("{:.2}", product.price)),
                    Cell::new(&product.category_id),
                    Cell::new(product.description.as_deref().unwrap_or("-")),
                ]));
            }
            table.printstd();
        }
        ProductCommands::Rm { id } => {
            require_admin(store)?;
            products.delete(&id)?;
            println!("✅ Product removed");
        }
    }

    Ok(())
}

fn cart_command(store: &Arc<dyn KeyValueStore>, command: CartCommands) -> Result<()> {
    let cart = CartStorage::new(store.clone());

    match command {
        CartCommands::Add { product } => {
            let found = ProductStorage::new(store.clone())
                .get_by_id(&product)?
                .with_context(|| format!("No product with ID {product}"))?;
            cart.add(&found)?;
            println!("✅ '{}' added to your cart", found.name);
        }
        CartCommands::List => {
            let items = cart.items()?;
            if items.is_empty() {
                println!("📭 Your cart is empty.");
                println!("💡 Use 'shop cart add -p <product-id>' to add something");
                return Ok(());
            }

            let mut table = Table::new();
            table.add_row(Row::new(vec![
                Cell::new("Product"),
                Cell::new("Price"),
                Cell::new("Qty"),
                Cell::new("Subtotal"),
            ]));
            for item in &items {
                table.add_row(Row::new(vec![
                    Cell::new(&item.name),
                    Cell::new(&format!("{:.2}", item.price)),
                    Cell::new(&item.quantity.to_string()),
                    Cell::new(&format!("{:.2}", item.price * f64::from(item.quantity))),
                ]));
            }
            table.printstd();
            println!("💰 Total: {:.2}", cart.total()?);
        }
        CartCommands::Set { product, quantity } => {
            cart.update_quantity(&product, quantity)?;
            println!("✅ Quantity updated to {quantity}");
        }
        CartCommands::Rm { product } => {
            cart.remove(&product)?;
            println!("✅ Removed from your cart");
        }
        CartCommands::Clear => {
            cart.clear()?;
            println!("✅ Cart emptied");
        }
    }

    Ok(())
}

fn checkout(store: &Arc<dyn KeyValueStore>) -> Result<()> {
    let order = OrderStorage::new(store.clone()).checkout()?;

    println!("✅ Order placed!");
    println!("🆔 Order ID: {}", order.id);
    println!("📦 Items: {}", order.items.len());
    println!("💰 Total: {:.2}", order.total);

    Ok(())
}

fn orders(store: &Arc<dyn KeyValueStore>, all: bool) -> Result<()> {
    let storage = OrderStorage::new(store.clone());

    let orders = if all {
        require_admin(store)?;
        storage.all()?
    } else {
        storage.user_orders()?
    };

    if orders.is_empty() {
        println!("📭 No orders yet.");
        return Ok(());
    }

    let mut table = Table::new();
    table.add_row(Row::new(vec![
        Cell::new("ID"),
        Cell::new("Date"),
        Cell::new("User"),
        Cell::new("Items"),
        Cell::new("Total"),
    ]));
    for order in orders {
        table.add_row(Row::new(vec![
            Cell::new(&order.id),
            Cell::new(&order.date.format("%Y-%m-%d %H:%M:%S UTC").to_string()),
            Cell::new(&order.user_name),
            Cell::new(&order.items.len().to_string()),
            Cell::new(&format!("{:.2}", order.total)),
        ]));
    }
    table.printstd();

    Ok(())
}
