// src/notify/embed.rs

use crate::domain::{ClassificationResult, Classified, Listing};
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const EMBED_COLOR: u32 = 5814783;

const TITLE_LIMIT: usize = 256;
const FIELD_VALUE_LIMIT: usize = 1024;
const EXTRA_PHOTO_EMBEDS: usize = 3;

#[derive(Debug, Serialize)]
pub struct WebhookMessage {
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Default, Serialize)]
pub struct Embed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<EmbedAuthor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<EmbedImage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<EmbedImage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EmbedAuthor {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct EmbedImage {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl EmbedField {
    fn new(name: &str, value: impl Into<String>, inline: bool) -> Self {
        Self {
            name: name.to_string(),
            value: truncate(value.into(), FIELD_VALUE_LIMIT),
            inline,
        }
    }
}

/// Groups thousands with commas: `1234567` becomes `1,234,567`.
pub fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn format_price(currency_symbol: &str, price: i64) -> String {
    format!("{currency_symbol}{}", group_thousands(price))
}

/// Signed delta, always with a sign: `+1,500`, `-2,000`.
pub fn format_delta(delta: i64) -> String {
    if delta > 0 {
        format!("+{}", group_thousands(delta))
    } else {
        group_thousands(delta)
    }
}

/// `"2024 m3 Long Range RWD - £31,990"`; empty parts are left out.
pub fn listing_title(listing: &Listing, currency_symbol: &str) -> String {
    let year = listing.year.map(|y| y.to_string());
    let name = [
        year.as_deref().unwrap_or(""),
        listing.model.as_str(),
        listing.trim.as_str(),
    ]
    .iter()
    .filter(|s| !s.is_empty())
    .copied()
    .collect::<Vec<_>>()
    .join(" ");

    let price = format_price(currency_symbol, listing.price);
    let title = if name.is_empty() {
        format!("{} - {price}", listing.id)
    } else {
        format!("{name} - {price}")
    };
    truncate(title, TITLE_LIMIT)
}

/// One-line description of what changed, for logs.
pub fn change_summary(result: &ClassificationResult) -> String {
    if result.is_new {
        return "new listing".to_string();
    }
    let mut parts = Vec::new();
    if let Some(delta) = result.price_delta {
        parts.push(format!("price {}", format_delta(delta)));
    }
    if result.photos_added {
        parts.push("photos added".to_string());
    }
    if parts.is_empty() {
        "unchanged".to_string()
    } else {
        parts.join(", ")
    }
}

/// Builds the webhook payload for one classified listing.
pub fn render_message(item: &Classified, currency_symbol: &str, now: DateTime<Utc>) -> WebhookMessage {
    let listing = &item.listing;
    let link = (!listing.link.is_empty()).then(|| listing.link.clone());

    let mut main = Embed {
        title: Some(listing_title(listing, currency_symbol)),
        url: link.clone(),
        color: Some(EMBED_COLOR),
        author: (!listing.location.is_empty()).then(|| EmbedAuthor {
            name: listing.location.clone(),
        }),
        timestamp: Some(now.to_rfc3339()),
        ..Embed::default()
    };

    main.fields.push(EmbedField::new("VIN", listing.id.as_str(), true));
    if let Some(plate) = &listing.plate {
        main.fields.push(EmbedField::new("Plate", plate.as_str(), true));
    }
    if let Some(odometer) = listing.odometer {
        let value = format!("{} {}", group_thousands(odometer), listing.odometer_unit);
        main.fields.push(EmbedField::new("Odometer", value.trim_end(), true));
    }
    if !listing.options.is_empty() {
        main.fields
            .push(EmbedField::new("Options", listing.options.join("\n"), false));
    }

    // Only listings already known can carry change fields.
    if !item.result.is_new {
        if let Some(delta) = item.result.price_delta {
            main.fields
                .push(EmbedField::new("Price Change", format_delta(delta), true));
        }
        if item.result.photos_added {
            main.fields.push(EmbedField::new("Photos Added", "Yes", true));
        }
    }

    let mut photos = listing.photos.iter();
    main.thumbnail = photos.next().map(|url| EmbedImage { url: url.clone() });
    main.image = photos.next().map(|url| EmbedImage { url: url.clone() });

    let mut embeds = vec![main];
    embeds.extend(photos.take(EXTRA_PHOTO_EMBEDS).map(|url| Embed {
        url: link.clone(),
        image: Some(EmbedImage { url: url.clone() }),
        ..Embed::default()
    }));

    WebhookMessage { embeds }
}

fn truncate(mut s: String, max_chars: usize) -> String {
    if let Some((idx, _)) = s.char_indices().nth(max_chars) {
        s.truncate(idx);
    }
    s
}
