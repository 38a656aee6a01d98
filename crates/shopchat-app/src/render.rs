// Terminal presentation: message bubbles, product cards, cart panel
use colored::Colorize;
use shopchat_logging::safe_truncate;
use shopchat_types::{CartItem, Message, Product, Role};
use std::fmt::Display;

const DESCRIPTION_CHARS: usize = 140;

/// First 8 characters of a session id, for display only
pub fn short_session_id(session_id: &str) -> String {
    session_id.chars().take(8).collect()
}

pub fn banner(session_id: &str, api_base: &str) -> String {
    format!(
        "{}\n{}\n{}",
        "🛍️  ShopChat - your shopping assistant".bright_cyan().bold(),
        format!("Session: {} • Backend: {}", short_session_id(session_id), api_base).bright_black(),
        "Type a message, '/help' for commands, 'exit' or 'quit' to leave.".bright_black(),
    )
}

fn role_label(role: Role) -> String {
    match role {
        Role::User => "You:".bright_green().bold().to_string(),
        Role::Assistant => "ShopAI:".bright_blue().bold().to_string(),
    }
}

/// One conversation bubble, followed by its product cards
pub fn format_message(message: &Message) -> String {
    let mut out = format!("{} {}", role_label(message.role), message.text);
    let products = message.product_list();
    if !products.is_empty() {
        out.push('\n');
        out.push_str(&format_products(products));
    }
    out
}

/// Product cards numbered `#1..` in list order, the number users refer to
pub fn format_products(products: &[Product]) -> String {
    products
        .iter()
        .enumerate()
        .map(|(index, product)| format_product_card(index + 1, product))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_product_card(position: usize, product: &Product) -> String {
    let name = if product.product_name.is_empty() {
        "Unnamed product"
    } else {
        product.product_name.as_str()
    };

    let mut card = format!("  {} {}", format!("#{}", position).bright_magenta().bold(), name.bold());
    let price = product.price_label();
    if !price.is_empty() {
        card.push_str(&format!("  {}", price.bright_green()));
    }
    if let Some(description) = product.description.as_deref().filter(|d| !d.trim().is_empty()) {
        card.push_str(&format!("\n     {}", safe_truncate(description.trim(), DESCRIPTION_CHARS).bright_black()));
    }
    if let Some(url) = product.url.as_deref().or(product.image_url.as_deref()) {
        card.push_str(&format!("\n     {}", url.cyan().underline()));
    }
    card
}

/// Cart panel with item count; entries numbered like product cards
pub fn format_cart(cart: &[CartItem]) -> String {
    if cart.is_empty() {
        return format!("{} {}", "🛒".bright_yellow(), "Your cart is empty".bright_black());
    }

    let noun = if cart.len() == 1 { "item" } else { "items" };
    let mut lines = vec![format!("{} {}", "🛒".bright_yellow(), format!("Cart ({} {})", cart.len(), noun).bold())];
    for (index, item) in cart.iter().enumerate() {
        let price = item.price_label();
        let mut line = format!("  #{} {}", index + 1, item.product_name);
        if !price.is_empty() {
            line.push_str(&format!("  {}", price));
        }
        lines.push(line);
    }
    lines.join("\n")
}

pub fn help_text() -> String {
    let rows = [
        ("<text>", "Ask the assistant anything (e.g. \"running shoes under $100\")"),
        ("/add N", "Add product #N from the latest results to the cart"),
        ("/remove N", "Remove entry #N from the cart"),
        ("/cart", "Show the cart"),
        ("/checkout", "Check out the cart"),
        ("/image <url-or-path> [query]", "Find products similar to an image"),
        ("/reset", "Start a fresh session"),
        ("/session", "Show the session id"),
        ("/help", "Show this help"),
        ("exit, quit", "Leave"),
    ];
    let mut out = format!("{} Commands:", "💡".bright_yellow());
    for (command, description) in rows {
        out.push_str(&format!("\n  {:<30} {}", command, description));
    }
    out
}

/// Diagnostic block shown when an error reaches the top level
pub fn failure_diagnostic(error: &anyhow::Error) -> String {
    let mut out = format!("{} {}", "❌".bright_red(), "Something went wrong".bright_red().bold());
    out.push_str(&format!("\n  {}", error));
    for cause in error.chain().skip(1) {
        out.push_str(&format!("\n  {} {}", "caused by:".bright_black(), cause));
    }
    out.push_str(&format!("\n{}", "Run with --verbose for request details.".bright_black()));
    out
}

/// Same banner for panics, so users never see a bare backtrace dump first
pub fn panic_diagnostic(info: &dyn Display) -> String {
    format!(
        "{} {}\n  {}\n{}",
        "❌".bright_red(),
        "Something went wrong".bright_red().bold(),
        info,
        "This is a bug in shopchat; set RUST_BACKTRACE=1 for details.".bright_black(),
    )
}
