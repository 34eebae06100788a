//! Usage and feedback recording
//!
//! The engine itself never persists anything. Callers that want feedback
//! validated register each result with a [`FeedbackGateway`]; feedback for an
//! id that was never tracked (or has been released) is rejected.

use chrono::Utc;
use dashmap::DashMap;
use nac_model::{
    Ack, FeedbackRecord, NotFoundError, RecommendationId, ResultId, SinkError,
    SmartRecommendationResult, TemplateId, UsageRecord,
};
use parking_lot::Mutex;

/// Destination for usage and feedback records
pub trait FeedbackSink: Send + Sync {
    /// Store a usage record
    ///
    /// # Errors
    /// Returns `SinkError` if the record could not be stored
    fn record_usage(&self, record: &UsageRecord) -> Result<(), SinkError>;

    /// Store a feedback record
    ///
    /// # Errors
    /// Returns `SinkError` if the record could not be stored
    fn submit_feedback(&self, record: &FeedbackRecord) -> Result<(), SinkError>;
}

/// Sink keeping records in memory
#[derive(Debug, Default)]
pub struct InMemorySink {
    usage: Mutex<Vec<UsageRecord>>,
    feedback: Mutex<Vec<FeedbackRecord>>,
}

impl InMemorySink {
    /// Create empty sink
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded usage, oldest first
    #[must_use]
    pub fn usage(&self) -> Vec<UsageRecord> {
        self.usage.lock().clone()
    }

    /// Recorded feedback, oldest first
    #[must_use]
    pub fn feedback(&self) -> Vec<FeedbackRecord> {
        self.feedback.lock().clone()
    }
}

impl FeedbackSink for InMemorySink {
    fn record_usage(&self, record: &UsageRecord) -> Result<(), SinkError> {
        self.usage.lock().push(record.clone());
        Ok(())
    }

    fn submit_feedback(&self, record: &FeedbackRecord) -> Result<(), SinkError> {
        self.feedback.lock().push(record.clone());
        Ok(())
    }
}

/// Correlates feedback with issued recommendations before forwarding it
#[derive(Debug)]
pub struct FeedbackGateway<S> {
    sink: S,
    issued: DashMap<RecommendationId, (ResultId, TemplateId)>,
}

impl<S: FeedbackSink> FeedbackGateway<S> {
    /// Create gateway over a sink
    #[must_use]
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            issued: DashMap::new(),
        }
    }

    /// Register every recommendation of a result
    pub fn track(&self, result: &SmartRecommendationResult) {
        for rec in &result.recommendations {
            self.issued
                .insert(rec.recommendation_id, (result.result_id, rec.template_id.clone()));
        }
        tracing::debug!(
            result_id = %result.result_id,
            recommendations = result.recommendations.len(),
            "Tracking recommendations"
        );
    }

    /// Forget every recommendation of a result; returns how many were removed
    pub fn release(&self, result_id: ResultId) -> usize {
        let before = self.issued.len();
        self.issued.retain(|_, (owner, _)| *owner != result_id);
        before - self.issued.len()
    }

    /// Check if a recommendation id is currently tracked
    #[inline]
    #[must_use]
    pub fn is_tracked(&self, id: RecommendationId) -> bool {
        self.issued.contains_key(&id)
    }

    /// Record a usage event; sink failures are logged, never returned
    pub fn record_usage(&self, record: UsageRecord) -> Ack {
        match self.sink.record_usage(&record) {
            Ok(()) => Ack::Accepted,
            Err(e) => {
                tracing::warn!(template = %record.template_id, error = %e, "Dropping usage record");
                Ack::Dropped
            }
        }
    }

    /// Attach caller feedback to a tracked recommendation
    ///
    /// # Errors
    /// Returns `NotFoundError` if the id is not tracked
    pub fn submit_feedback(
        &self,
        recommendation_id: RecommendationId,
        feedback: serde_json::Value,
    ) -> Result<Ack, NotFoundError> {
        let template_id = self
            .issued
            .get(&recommendation_id)
            .map(|entry| entry.value().1.clone())
            .ok_or(NotFoundError { recommendation_id })?;

        let record = FeedbackRecord {
            recommendation_id,
            template_id,
            feedback,
            submitted_at: Utc::now(),
        };

        Ok(match self.sink.submit_feedback(&record) {
            Ok(()) => Ack::Accepted,
            Err(e) => {
                tracing::warn!(recommendation = %recommendation_id, error = %e, "Dropping feedback record");
                Ack::Dropped
            }
        })
    }

    /// Underlying sink
    #[inline]
    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }
}
