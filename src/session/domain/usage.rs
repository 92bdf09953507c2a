//! Token accounting and cost computation for provider sessions.

use serde::{Deserialize, Serialize};

const TOKENS_PER_PRICING_UNIT: f64 = 1_000_000.0;

/// Accumulated token counts for a session.
///
/// `input` is the total input, cache reads and writes included.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    /// Total input tokens, including cached ones.
    pub input: u64,
    /// Input tokens written to the provider cache.
    pub cache_write: u64,
    /// Input tokens served from the provider cache.
    pub cache_read: u64,
    /// Output tokens.
    pub output: u64,
}

impl TokenUsage {
    /// Creates a usage record.
    #[must_use]
    pub const fn new(input: u64, cache_write: u64, cache_read: u64, output: u64) -> Self {
        Self {
            input,
            cache_write,
            cache_read,
            output,
        }
    }

    /// Adds another record's counts to this one, saturating on overflow.
    pub const fn add(&mut self, other: Self) {
        self.input = self.input.saturating_add(other.input);
        self.cache_write = self.cache_write.saturating_add(other.cache_write);
        self.cache_read = self.cache_read.saturating_add(other.cache_read);
        self.output = self.output.saturating_add(other.output);
    }

    /// Input tokens billed at the regular input rate.
    ///
    /// ```
    /// use assistant_core::session::domain::TokenUsage;
    ///
    /// assert_eq!(TokenUsage::new(1_000, 200, 300, 50).regular_input(), 500);
    /// assert_eq!(TokenUsage::new(10, 20, 0, 0).regular_input(), 0);
    /// ```
    #[must_use]
    pub const fn regular_input(&self) -> u64 {
        self.input
            .saturating_sub(self.cache_write)
            .saturating_sub(self.cache_read)
    }
}

/// Provider prices in USD per million tokens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelPricing {
    /// Regular input rate.
    pub input: f64,
    /// Output rate.
    pub output: f64,
    /// Cache read rate; defaults to the input rate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_read: Option<f64>,
    /// Cache write rate; defaults to the input rate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_write: Option<f64>,
}

impl ModelPricing {
    /// Creates pricing without dedicated cache rates.
    #[must_use]
    pub const fn new(input: f64, output: f64) -> Self {
        Self {
            input,
            output,
            cache_read: None,
            cache_write: None,
        }
    }

    /// Sets dedicated cache rates.
    #[must_use]
    pub const fn with_cache_rates(mut self, cache_read: f64, cache_write: f64) -> Self {
        self.cache_read = Some(cache_read);
        self.cache_write = Some(cache_write);
        self
    }

    /// Effective cache read rate.
    #[must_use]
    pub fn cache_read_rate(&self) -> f64 {
        self.cache_read.unwrap_or(self.input)
    }

    /// Effective cache write rate.
    #[must_use]
    pub fn cache_write_rate(&self) -> f64 {
        self.cache_write.unwrap_or(self.input)
    }
}

/// Cost of a session split by token category, in USD.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostBreakdown {
    /// Usage the costs were computed from.
    pub usage: TokenUsage,
    /// Cost of regular input tokens.
    pub input_cost: f64,
    /// Cost of cache writes.
    pub cache_write_cost: f64,
    /// Cost of cache reads.
    pub cache_read_cost: f64,
    /// Cost of output tokens.
    pub output_cost: f64,
}

impl CostBreakdown {
    /// Prices `usage` with `pricing`.
    #[must_use]
    pub fn compute(usage: TokenUsage, pricing: &ModelPricing) -> Self {
        Self {
            usage,
            input_cost: token_cost(usage.regular_input(), pricing.input),
            cache_write_cost: token_cost(usage.cache_write, pricing.cache_write_rate()),
            cache_read_cost: token_cost(usage.cache_read, pricing.cache_read_rate()),
            output_cost: token_cost(usage.output, pricing.output),
        }
    }

    /// Sum of all categories.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "costs are summed in USD")]
    pub fn total_cost(&self) -> f64 {
        self.input_cost + self.cache_write_cost + self.cache_read_cost + self.output_cost
    }
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "token counts stay far below 2^52 and costs are approximate"
)]
fn token_cost(tokens: u64, rate_per_million: f64) -> f64 {
    tokens as f64 / TOKENS_PER_PRICING_UNIT * rate_per_million
}

/// Renders a USD amount with six decimal places.
///
/// ```
/// use assistant_core::session::domain::format_usd;
///
/// assert_eq!(format_usd(0.0125), "0.012500");
/// ```
#[must_use]
pub fn format_usd(value: f64) -> String {
    format!("{value:.6}")
}
