//! Iterative map-reduce summarization.

use std::num::NonZeroUsize;

use tracing::{info, warn};
use vsum_models::SummaryIteration;

use crate::chunker::chunk_text;
use crate::error::{PipelineError, PipelineResult};
use crate::metrics::record_reduction_iterations;
use crate::summarizer::ConcurrentSummarizer;

/// Result of a converged reduction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReductionOutcome {
    /// Summary whose length is within the limit
    pub summary: String,
    /// Every pass in depth order; the last one holds `summary`
    pub iterations: Vec<SummaryIteration>,
}

/// Repeatedly chunks and summarizes text until it fits under a size limit.
#[derive(Clone)]
pub struct IterativeReducer {
    summarizer: ConcurrentSummarizer,
    max_depth: usize,
}

impl IterativeReducer {
    pub fn new(summarizer: ConcurrentSummarizer, max_depth: usize) -> Self {
        Self {
            summarizer,
            max_depth,
        }
    }

    /// Reduce `text` to a summary of at most `limit` characters.
    ///
    /// At least one pass always runs, even when `text` already fits. Each pass
    /// chunks the current text, summarizes every chunk concurrently and checks
    /// the concatenated result against `limit`. Shrinking is not assumed;
    /// after `max_depth` passes the reduction fails with
    /// [`PipelineError::ReductionDidNotConverge`].
    pub async fn reduce(
        &self,
        text: &str,
        instruction: &str,
        limit: usize,
    ) -> PipelineResult<ReductionOutcome> {
        let chunk_limit = NonZeroUsize::new(limit)
            .ok_or_else(|| PipelineError::invalid_input("chunk limit must be positive"))?;
        if self.max_depth == 0 {
            return Err(PipelineError::invalid_input("max depth must be positive"));
        }

        let mut iterations = Vec::new();
        let mut current = text.to_string();
        let mut last_len = current.chars().count();

        for depth in 0..self.max_depth {
            let chunks = chunk_text(&current, chunk_limit);
            info!(
                depth,
                chunks = chunks.len(),
                input_chars = last_len,
                "Summarizing reduction pass"
            );

            let candidate = self.summarizer.summarize_all(&chunks, instruction).await?;
            last_len = candidate.chars().count();
            iterations.push(SummaryIteration::new(depth, candidate.clone()));

            if last_len <= limit {
                info!(depth, chars = last_len, limit, "Reduction converged");
                record_reduction_iterations(iterations.len());
                return Ok(ReductionOutcome {
                    summary: candidate,
                    iterations,
                });
            }

            current = candidate;
        }

        warn!(
            max_depth = self.max_depth,
            last_len, limit, "Reduction did not converge"
        );
        Err(PipelineError::ReductionDidNotConverge {
            iterations: self.max_depth,
            last_len,
            limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retry::CallPolicy;
    use crate::test_support::{body_of, failure, instant_completion};
    use std::sync::Arc;
    use vsum_ai::TextCompletion;

    fn reducer(service: Arc<dyn TextCompletion>, max_depth: usize) -> IterativeReducer {
        IterativeReducer::new(
            ConcurrentSummarizer::new(service, CallPolicy::default(), 4),
            max_depth,
        )
    }

    #[tokio::test]
    async fn test_converges_in_one_pass_with_short_output() {
        let service = Arc::new(instant_completion(|_| Ok("ok".to_string())));

        let outcome = reducer(service.clone(), 10)
            .reduce(&"x".repeat(50), "Sum:", 20)
            .await
            .unwrap();

        assert_eq!(outcome.iterations.len(), 1);
        assert_eq!(outcome.iterations[0].depth, 0);
        // 50 chars at limit 20: three chunks, each answered with "ok".
        assert_eq!(outcome.summary, "okokok");
        assert_eq!(service.calls(), 3);
    }

    #[tokio::test]
    async fn test_short_input_still_runs_one_pass() {
        let service = Arc::new(instant_completion(|prompt| Ok(body_of(prompt).to_uppercase())));

        let outcome = reducer(service, 10).reduce("abc", "Sum:", 10).await.unwrap();

        assert_eq!(outcome.summary, "ABC");
        assert_eq!(outcome.iterations.len(), 1);
    }

    #[tokio::test]
    async fn test_non_convergence_stops_at_max_depth() {
        let service = Arc::new(instant_completion(|_| Ok("z".repeat(30))));

        let err = reducer(service.clone(), 3)
            .reduce(&"y".repeat(10), "Sum:", 20)
            .await
            .unwrap_err();

        match err {
            PipelineError::ReductionDidNotConverge {
                iterations,
                last_len,
                limit,
            } => {
                assert_eq!(iterations, 3);
                assert_eq!(limit, 20);
                assert!(last_len > 20);
            }
            other => panic!("unexpected error: {other}"),
        }
        // 10 chars -> 1 chunk, 30 chars -> 2 chunks, 60 chars -> 3 chunks.
        assert_eq!(service.calls(), 1 + 2 + 3);
    }

    #[tokio::test]
    async fn test_halving_summarizer_converges_within_two_passes() {
        let service = Arc::new(instant_completion(|prompt| {
            let body = body_of(prompt);
            let half = body.chars().count() / 2;
            Ok(body.chars().take(half).collect())
        }));

        let outcome = reducer(service, 10)
            .reduce("ABCDEFGHI", "Sum:", 5)
            .await
            .unwrap();

        assert!(outcome.iterations.len() <= 2);
        assert!(outcome.summary.chars().count() <= 5);
    }

    #[tokio::test]
    async fn test_iterations_are_recorded_in_depth_order() {
        // Each pass halves the text: 64 -> 32 -> 16 -> 8 at limit 10.
        let service = Arc::new(instant_completion(|prompt| {
            let body = body_of(prompt);
            let half = body.chars().count() / 2;
            Ok(body.chars().take(half).collect())
        }));

        let outcome = reducer(service, 10)
            .reduce(&"q".repeat(64), "Sum:", 10)
            .await
            .unwrap();

        let depths: Vec<usize> = outcome.iterations.iter().map(|it| it.depth).collect();
        assert_eq!(depths, vec![0, 1, 2]);
        assert_eq!(outcome.iterations.last().unwrap().summary, outcome.summary);
    }

    #[tokio::test]
    async fn test_zero_limit_is_invalid_input() {
        let service = Arc::new(instant_completion(|_| Ok(String::new())));

        let err = reducer(service.clone(), 10)
            .reduce("text", "Sum:", 0)
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::InvalidInput(_)));
        assert_eq!(service.calls(), 0);
    }

    #[tokio::test]
    async fn test_zero_max_depth_is_invalid_input() {
        let service = Arc::new(instant_completion(|_| Ok("ok".to_string())));

        let err = reducer(service.clone(), 0)
            .reduce("abc", "Sum:", 10)
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::InvalidInput(_)));
        assert_eq!(service.calls(), 0);
    }

    #[tokio::test]
    async fn test_chunk_failure_propagates() {
        let service = Arc::new(instant_completion(|_| Err(failure("down"))));

        let err = reducer(service, 10)
            .reduce("text", "Sum:", 10)
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Completion { chunk: Some(0), .. }));
    }
}
