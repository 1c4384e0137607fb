//! Checkout handoff: renders the cart into the WhatsApp order message.
//!
//! The storefront has no payment step; checkout hands the order to the
//! shop over a WhatsApp deep link carrying a pre-filled message. Both
//! functions here are pure string transforms.

use crate::cart::CartLine;
use crate::types::Price;

/// Build the human-readable order summary for a cart.
///
/// One bullet per line with the variant fields that are present, then
/// the grand total and a closing prompt. Spanish, matching the shop's
/// audience.
#[must_use]
pub fn build_order_summary(
    lines: &[CartLine],
    total: Price,
    customer_name: Option<&str>,
) -> String {
    let mut out = Vec::with_capacity(lines.len() + 3);

    match customer_name {
        Some(name) if !name.trim().is_empty() => out.push(format!(
            "Hola, soy {}, me gustaría realizar el siguiente pedido:\n",
            name.trim()
        )),
        _ => out.push("Hola, me gustaría realizar el siguiente pedido:\n".to_owned()),
    }

    for line in lines {
        let mut item = format!("• {}", line.name);
        if let Some(size) = &line.size {
            item.push_str(&format!(" - Talla: {size}"));
        }
        if let Some(color) = &line.color {
            item.push_str(&format!(" - Color: {color}"));
        }
        item.push_str(&format!(
            " x{} → ${}",
            line.quantity,
            line.line_total().format_cop()
        ));
        out.push(item);
    }

    out.push(format!("\nTotal: ${}", total.format_cop()));
    out.push("\nQuedo atento a la confirmación. ¡Gracias!".to_owned());

    out.join("\n")
}

/// Build the `wa.me` deep link for an order summary.
///
/// The message is percent-encoded for safe inclusion in the `text`
/// query component.
#[must_use]
pub fn whatsapp_order_url(phone: &str, message: &str) -> String {
    format!("https://wa.me/{phone}?text={}", urlencoding::encode(message))
}
