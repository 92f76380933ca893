//! デモ用モックAPI
//!
//! 固定の取引データ（BTC 5時間分）に対してキーワードで応答を切り替える。

use crate::agent::now_timestamp;
use crate::error::{MinamError, Result};
use serde::{Deserialize, Serialize};

const CONFIDENCE: f64 = 0.85;
const SOURCE: &str = "minam_mock_api";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradingRecord {
    pub timestamp: &'static str,
    pub symbol: &'static str,
    pub price: f64,
    pub volume: f64,
    pub sentiment: f64,
}

const TRADING_DATA: [TradingRecord; 5] = [
    record("2024-01-01T00:00:00Z", 42000.0, 1_500_000_000.0, 0.75),
    record("2024-01-01T01:00:00Z", 42150.0, 1_200_000_000.0, 0.78),
    record("2024-01-01T02:00:00Z", 41900.0, 1_800_000_000.0, 0.72),
    record("2024-01-01T03:00:00Z", 42200.0, 1_100_000_000.0, 0.80),
    record("2024-01-01T04:00:00Z", 41800.0, 2_000_000_000.0, 0.70),
];

const INSIGHTS: [&str; 4] = [
    "Bitcoin shows strong bullish momentum with increasing volume",
    "Price consolidation pattern suggests potential breakout",
    "Sentiment analysis indicates positive market outlook",
    "Technical indicators point to continued upward trend",
];

const fn record(timestamp: &'static str, price: f64, volume: f64, sentiment: f64) -> TradingRecord {
    TradingRecord {
        timestamp,
        symbol: "BTC",
        price,
        volume,
        sentiment,
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MockQuery {
    pub query: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MockAnswer {
    pub query: String,
    pub answer: String,
    pub confidence: f64,
    pub sources: Vec<&'static str>,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MockListing {
    pub data: Vec<TradingRecord>,
    pub total: usize,
    pub timestamp: String,
    pub source: &'static str,
}

/// クエリのキーワードに応じた疑似回答
pub fn answer(query: &str) -> Result<MockAnswer> {
    if query.is_empty() {
        return Err(MinamError::InvalidRequest("Query is required".into()));
    }

    let lower = query.to_lowercase();
    let (answer, sources) = if ["price", "bitcoin", "btc"].iter().any(|k| lower.contains(k)) {
        (price_answer(), vec!["trading_data", "price_analysis"])
    } else if lower.contains("trend") || lower.contains("analysis") {
        (INSIGHTS.join(" "), vec!["technical_analysis", "sentiment_analysis"])
    } else if lower.contains("volume") {
        (volume_answer(), vec!["volume_analysis", "market_metrics"])
    } else {
        (
            format!(
                "I found relevant information about your query: \"{}\". Based on the available data, I can provide insights about Bitcoin trading patterns, price movements, and market sentiment. Would you like me to elaborate on any specific aspect?",
                query
            ),
            vec!["general_analysis"],
        )
    };

    Ok(MockAnswer {
        query: query.to_string(),
        answer,
        confidence: CONFIDENCE,
        sources,
        timestamp: now_timestamp(),
    })
}

/// 先頭 `limit` 件の取引データ
pub fn list(limit: usize) -> MockListing {
    MockListing {
        data: TRADING_DATA.iter().take(limit).cloned().collect(),
        total: TRADING_DATA.len(),
        timestamp: now_timestamp(),
        source: SOURCE,
    }
}

fn price_answer() -> String {
    let latest = &TRADING_DATA[TRADING_DATA.len() - 1];
    let mood = if latest.sentiment > 0.75 { "positive" } else { "neutral" };
    format!(
        "Based on the latest data, Bitcoin is currently trading at ${} with a volume of {:.1}M. The sentiment score is {}, indicating {} market sentiment.",
        group_thousands(latest.price),
        latest.volume / 1_000_000.0,
        latest.sentiment,
        mood
    )
}

fn volume_answer() -> String {
    let average = TRADING_DATA.iter().map(|r| r.volume).sum::<f64>() / TRADING_DATA.len() as f64;
    let high = average > 1_500_000_000.0;
    format!(
        "The average trading volume over the analyzed period is {:.1}M. Volume patterns show {} activity, suggesting {} market interest.",
        average / 1_000_000.0,
        if high { "high" } else { "moderate" },
        if high { "strong" } else { "steady" }
    )
}

/// 整数部を3桁区切りにする（41800 → "41,800"）
fn group_thousands(value: f64) -> String {
    let digits = (value.round() as i64).abs().to_string();
    let mut out = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if value < 0.0 {
        out.insert(0, '-');
    }
    out
}
