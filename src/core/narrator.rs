//! Scan narrator: cosmetic "deep research" steps shown while composing

use std::time::Duration;

use async_trait::async_trait;

use crate::types::{DiagnosticLog, EventCode, LogType};

/// Where narration entries are recorded
#[async_trait]
pub trait ScanSink: Send {
    async fn record(&mut self, kind: LogType, message: String, details: Option<String>);
}

#[async_trait]
impl ScanSink for DiagnosticLog {
    async fn record(&mut self, kind: LogType, message: String, details: Option<String>) {
        self.push(kind, message, details);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanStep {
    pub label: String,
    pub duration: Duration,
}

/// Runs the narration sequence into a diagnostic log
#[derive(Debug, Clone, Copy)]
pub struct ScanNarrator {
    realtime: bool,
}

impl Default for ScanNarrator {
    fn default() -> Self {
        Self::instant()
    }
}

impl ScanNarrator {
    /// Steps hold for their display durations
    pub fn realtime() -> Self {
        Self { realtime: true }
    }

    /// Steps complete immediately
    pub fn instant() -> Self {
        Self { realtime: false }
    }

    pub fn is_realtime(&self) -> bool {
        self.realtime
    }

    /// Step sequence for a query about `product`
    pub fn steps(&self, product: Option<&str>) -> Vec<ScanStep> {
        let third = match product {
            Some(p) => (format!("Tracing {} Supply Chain...", p), 800),
            None => ("Cross-Referencing Vendor APIs...".to_string(), 800),
        };
        [
            ("Connecting to Global Neural Network...".to_string(), 600),
            ("Scraping Real-Time Market Data...".to_string(), 1000),
            third,
            ("Synthesizing Truth Layer...".to_string(), 600),
        ]
        .into_iter()
        .map(|(label, ms)| ScanStep {
            label,
            duration: if self.realtime { Duration::from_millis(ms) } else { Duration::ZERO },
        })
        .collect()
    }

    /// Log the scan start, then each step as it completes
    pub async fn run<S: ScanSink>(&self, sink: &mut S, query: &str, product: Option<&str>) -> usize {
        let scan = EventCode::DEEP_WEB_SCAN;
        sink.record(scan.level(), scan.code().to_string(), Some(format!("Query: \"{}\"", query)))
            .await;
        let steps = self.steps(product);
        for step in &steps {
            if !step.duration.is_zero() {
                tokio::time::sleep(step.duration).await;
            }
            sink.record(LogType::Analysis, step.label.clone(), Some("COMPLETE".to_string()))
                .await;
        }
        steps.len()
    }
}
