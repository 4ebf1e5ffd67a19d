//! Plain Markdown renderings of the things we send back to users.

use thousands::Separable;

use crate::models::{AlertNotification, CollectionInfo, CollectionSnapshot, PriceAlert};

use super::floor_service::CheckEntry;

fn fmt_price(x: f64) -> String {
    format!("{:.4}", x)
}

/// Thousands separators for counts, "N/A" when unknown.
fn fmt_count(n: Option<u64>) -> String {
    n.map(|n| n.separate_with_commas())
        .unwrap_or_else(|| "N/A".to_string())
}

fn fmt_volume(v: f64) -> String {
    format!("{:.2}", v).separate_with_commas()
}

pub fn alert_triggered(n: &AlertNotification) -> String {
    format!(
        "🚨 *Alert Triggered!*\n\n\
         Collection: `{}`\n\
         Floor Price: *{} {}*\n\
         Target: {} {} {}",
        n.collection_key,
        fmt_price(n.current_price),
        n.currency_symbol,
        n.direction,
        n.threshold,
        n.currency_symbol,
    )
}

pub fn floor_report(snapshot: &CollectionSnapshot, info: Option<&CollectionInfo>) -> String {
    let name = info
        .and_then(|i| i.name.as_deref())
        .unwrap_or("Collection");

    let floor = snapshot
        .floor_price
        .map(fmt_price)
        .unwrap_or_else(|| "N/A".to_string());

    format!(
        "📊 *{}*\n\n\
         💰 *Floor Price:* {} {}\n\
         👥 *Owners:* {}\n\
         📦 *Total Supply:* {}\n\
         📈 *Total Volume:* {} {}",
        name,
        floor,
        snapshot.currency_symbol,
        fmt_count(snapshot.num_owners),
        fmt_count(info.and_then(|i| i.total_supply)),
        fmt_volume(snapshot.total_volume.unwrap_or(0.0)),
        snapshot.currency_symbol,
    )
}

pub fn check_report(entries: &[CheckEntry]) -> String {
    let mut message = String::from("📊 *Your collections:*\n\n");

    for entry in entries {
        match &entry.result {
            Ok(s) => match s.floor_price {
                Some(p) => message.push_str(&format!(
                    "• `{}`: *{} {}*\n",
                    entry.collection_key,
                    fmt_price(p),
                    s.currency_symbol
                )),
                None => message.push_str(&format!("• `{}`: no floor listed\n", entry.collection_key)),
            },
            Err(e) => message.push_str(&format!("• `{}`: ❌ {}\n", entry.collection_key, e)),
        }
    }

    message
}

pub fn alert_list(alerts: &[PriceAlert]) -> String {
    if alerts.is_empty() {
        return "🔔 You have no active alerts.".to_string();
    }

    let mut message = String::from("🔔 *Your active alerts:*\n\n");
    for a in alerts {
        message.push_str(&format!(
            "• `{}`: {} *{}*\n",
            a.collection_key, a.direction, a.threshold
        ));
    }
    message
}
