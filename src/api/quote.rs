//! Quote forwarder: uniform random pick from a fixed in-process list.

use crate::response;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use rand::seq::IndexedRandom;
use serde::Serialize;

const QUOTE_ERROR: &str = "Could not fetch quote data.";

struct QuoteRecord {
    text: &'static str,
    author: &'static str,
}

static QUOTES: &[QuoteRecord] = &[
    QuoteRecord {
        text: "The only way to do great work is to love what you do.",
        author: "Steve Jobs",
    },
    QuoteRecord {
        text: "Innovation distinguishes between a leader and a follower.",
        author: "Steve Jobs",
    },
    QuoteRecord {
        text: "Life is what happens when you're busy making other plans.",
        author: "John Lennon",
    },
    QuoteRecord {
        text: "The future belongs to those who believe in the beauty of their dreams.",
        author: "Eleanor Roosevelt",
    },
    QuoteRecord {
        text: "It is during our darkest moments that we must focus to see the light.",
        author: "Aristotle",
    },
    QuoteRecord {
        text: "The only impossible journey is the one you never begin.",
        author: "Tony Robbins",
    },
    QuoteRecord {
        text: "Success is not final, failure is not fatal: it is the courage to continue that counts.",
        author: "Winston Churchill",
    },
    QuoteRecord {
        text: "Believe you can and you're halfway there.",
        author: "Theodore Roosevelt",
    },
    QuoteRecord {
        text: "The best time to plant a tree was 20 years ago. The second best time is now.",
        author: "Chinese Proverb",
    },
    QuoteRecord {
        text: "Your time is limited, don't waste it living someone else's life.",
        author: "Steve Jobs",
    },
];

#[derive(Serialize)]
struct QuoteResponse {
    success: bool,
    quote: &'static str,
    author: &'static str,
}

pub fn handle() -> Response<Full<Bytes>> {
    // Selection is independent across calls; repeats are fine
    match QUOTES.choose(&mut rand::rng()) {
        Some(record) => response::json(
            StatusCode::OK,
            &QuoteResponse {
                success: true,
                quote: record.text,
                author: record.author,
            },
        ),
        None => {
            crate::logger::log_error("quote list is empty");
            response::error(StatusCode::INTERNAL_SERVER_ERROR, QUOTE_ERROR)
        }
    }
}
