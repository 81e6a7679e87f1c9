//! Order summary handed to the shop over WhatsApp.
//!
//! Nothing is sent from here: checkout answers with a `wa.me` link and the
//! customer's device opens the chat with the message pre-filled.

use crate::domain::aggregates::{Order, OrderItem};
use crate::domain::value_objects::MoneyError;

pub fn order_message(order: &Order, items: &[OrderItem]) -> Result<String, MoneyError> {
    let mut lines = vec!["🎯 *NOVO PEDIDO - BARBEARIA*".to_string(), String::new()];
    lines.push(format!("👤 *Cliente:* {}", order.customer_name));
    if let Some(phone) = order.customer_phone.as_deref().filter(|p| !p.is_empty()) {
        lines.push(format!("📱 *Telefone:* {}", phone));
    }
    lines.push(format!("📝 *Pedido #{}*", order.id));
    lines.push(String::new());
    lines.push("*🛍️ PRODUTOS:*".to_string());
    for item in items {
        lines.push(format!("• {}", item.product_name));
        lines.push(format!("  Qtd: {}x | {} cada", item.quantity, item.unit_price));
        lines.push(format!("  Subtotal: {}", item.total_price()?));
        lines.push(String::new());
    }
    lines.push(format!("💰 *TOTAL: {}*", order.total_amount));
    lines.push(String::new());
    lines.push("✅ Pedido confirmado! Aguardo contato para combinar entrega/retirada.".to_string());
    Ok(lines.join("\n"))
}

pub fn whatsapp_url(number: &str, order: &Order, items: &[OrderItem]) -> Result<String, MoneyError> {
    let message = order_message(order, items)?;
    Ok(format!("https://wa.me/{}?text={}", number, urlencoding::encode(&message)))
}
