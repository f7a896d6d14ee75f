//! Run controller: one best-effort cycle per scheduled slot.
//!
//! Every sub-step degrades internally (missing signals, empty feeds,
//! Neutral-fallback classification), so a cycle always runs to completion
//! and always produces a report — there are no retries and no early aborts.

use anyhow::Result;
use chrono::{DateTime, FixedOffset};
use tracing::info;

use bias_engine::{estimate, BiasInput};
use common::{MarketSnapshot, PredictionRecord};
use llm_client::{aggregate_score, pair_headlines, LlmClient, SentimentClassifier};
use market_data::QuoteClient;
use news_feed::{collect_headlines, is_market_relevant, FinnhubNewsClient, MarketauxNewsClient};
use notifier::{build_report, EmailNotifier, ReportInput};

use crate::config::AppConfig;
use crate::journal::PredictionLog;

pub struct Bot {
    config: AppConfig,
    quotes: QuoteClient,
    finnhub_news: FinnhubNewsClient,
    marketaux_news: MarketauxNewsClient,
    classifier: SentimentClassifier,
    notifier: EmailNotifier,
    log: PredictionLog,
    dry_run: bool,
}

impl Bot {
    pub fn new(config: AppConfig, dry_run: bool) -> Result<Self> {
        let quotes = QuoteClient::new(config.finnhub_api_key.clone(), config.quotes.timeout_ms);
        let finnhub_news =
            FinnhubNewsClient::new(config.finnhub_api_key.clone(), config.news.timeout_ms);
        let marketaux_news = MarketauxNewsClient::new(
            config.marketaux_api_key.clone(),
            config.news.symbols.clone(),
            config.news.timeout_ms,
        );

        let llm = if config.anthropic_api_key.is_empty() {
            None
        } else {
            Some(LlmClient::new(
                config.anthropic_api_key.clone(),
                config.llm.model.clone(),
                config.llm.timeout_ms,
                config.llm.max_retries,
            ))
        };
        let classifier = SentimentClassifier::new(llm);

        let notifier = EmailNotifier::new(
            &config.email.relay_url,
            &config.email.from,
            &config.email.to,
            config.email.timeout_ms,
        );
        let log = PredictionLog::open(&config.log.path)?;
        info!("Prediction log path: {}", log.path().display());

        Ok(Self {
            config,
            quotes,
            finnhub_news,
            marketaux_news,
            classifier,
            notifier,
            log,
            dry_run,
        })
    }

    /// Run one end-to-end cycle for the given slot.
    pub async fn run_slot(&self, slot_label: &str, now_local: DateTime<FixedOffset>) {
        info!("Running cycle for slot '{}'", slot_label);

        // 1. Market signals — four independent fetches, each may be Missing.
        let snapshot = self.fetch_snapshot().await;
        info!(
            "Signals: SPX={:?} ES={:?} prev ES={:?} VIX={:?}",
            snapshot.spx, snapshot.es, snapshot.prev_es, snapshot.vix
        );

        // 2. Headlines. Collection already filters; filter again in case a
        // source ignored the pre-filter.
        let mut headlines = collect_headlines(&self.finnhub_news, &self.marketaux_news).await;
        headlines.retain(|h| is_market_relevant(&h.text));
        info!("Collected {} market-relevant headlines", headlines.len());

        // 3. Classify, then aggregate the sentiment score.
        let texts: Vec<String> = headlines.iter().map(|h| h.text.clone()).collect();
        let labels = self.classifier.classify(&texts).await;
        let classified = pair_headlines(headlines, &labels);
        let sentiment_score = aggregate_score(&classified);

        // 4. Bias estimation.
        let bias = estimate(&BiasInput::from_snapshot(&snapshot, sentiment_score));
        info!(
            "Market bias: {} (sentiment score {})",
            bias.direction, sentiment_score
        );

        // 5. Append to the prediction log.
        let record = PredictionRecord {
            date: now_local.date_naive(),
            spx: snapshot.spx,
            es: snapshot.es,
            vix: snapshot.vix,
            sentiment_score,
            predicted_trend: bias.direction.to_string(),
            predicted_move_pts: None,
        };
        self.log.append(&record);

        // 6. Render and dispatch the report.
        let generated_at = now_local.format("%I:%M %p").to_string();
        let report = build_report(&ReportInput {
            date: now_local.date_naive(),
            slot_label,
            snapshot: &snapshot,
            sentiment_score,
            headlines: &classified,
            direction: bias.direction,
            rationale: &bias.rationale,
            generated_at: &generated_at,
        });

        if self.dry_run || !self.config.email.enabled {
            info!("Delivery skipped; report follows:\n{}", report.plain_body);
        } else {
            self.notifier.send(&report).await;
        }
    }

    /// Fetch the four signal sources. Each is independent: one failing
    /// leaves the others untouched.
    async fn fetch_snapshot(&self) -> MarketSnapshot {
        let symbols = &self.config.symbols;
        MarketSnapshot {
            spx: self.quotes.fetch_price(&symbols.index).await,
            es: self.quotes.fetch_price(&symbols.futures).await,
            prev_es: self.quotes.fetch_previous_close(&symbols.futures).await,
            vix: self.quotes.fetch_price(&symbols.volatility).await,
        }
    }
}
