//! Daily-run orchestration
//!
//! One [`PipelineOrchestrator::run`] call covers a full report window: fetch
//! both record categories, summarize insider filings, fan sentiment scoring
//! out across creators, and fold everything into a [`DailyReport`]. The run
//! itself never fails; source and model failures degrade into notes and
//! placeholder sections instead.
//!
//! Ordering is fixed: the summarizer step finishes before any sentiment step
//! starts, because every sentiment prompt embeds the validated brief as
//! market context. Sentiment steps then run concurrently under a pool cap,
//! and their sections land in the report in creator input order regardless
//! of completion order.

use std::collections::HashMap;
use std::sync::Arc;

use brief_core::{
    AgentOutput, AgentRole, AgentTask, DailyReport, DataSource, DegradationNote, RawRecord,
    RecordSet, ReportWindow, TaskContext,
};
use brief_llm::ModelProvider;
use futures::future::join_all;
use tokio::sync::Semaphore;
use tokio::time::Instant;
use tracing::{debug, error, info, instrument, warn};

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::report;
use crate::runner::AgentRunner;
use crate::step::{DEADLINE_EXCEEDED, RetryingAgentStep};

/// Runs the whole fetch-summarize-score pipeline for one window
pub struct PipelineOrchestrator {
    runner: Arc<AgentRunner>,
    config: Arc<PipelineConfig>,
    insider_source: Option<Arc<dyn DataSource>>,
    posts_source: Option<Arc<dyn DataSource>>,
}

impl std::fmt::Debug for PipelineOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineOrchestrator")
            .field("config", &self.config)
            .field("insider_source", &self.insider_source.as_ref().map(|s| s.name()))
            .field("posts_source", &self.posts_source.as_ref().map(|s| s.name()))
            .finish_non_exhaustive()
    }
}

impl PipelineOrchestrator {
    /// Start building an orchestrator
    pub fn builder() -> PipelineOrchestratorBuilder {
        PipelineOrchestratorBuilder::default()
    }

    /// Produce the report for `window`
    ///
    /// Never returns an error: a source failure empties its category and
    /// leaves a note, an exhausted step becomes a placeholder section, and
    /// the report status reflects how much survived.
    #[instrument(skip(self), fields(window = %window))]
    pub async fn run(&self, window: ReportWindow) -> DailyReport {
        let deadline = self
            .config
            .run_deadline()
            .map(|budget| Instant::now() + budget);
        let mut notes = Vec::new();

        let filings = self
            .fetch_category(self.insider_source.as_deref(), &window, &mut notes)
            .await;
        let posts = self
            .fetch_category(self.posts_source.as_deref(), &window, &mut notes)
            .await;
        info!(
            filings = filings.len(),
            posts = posts.len(),
            "Fetched window records"
        );

        let summary_output = self.run_summarizer(filings, deadline).await;
        let summary = summary_output
            .validated
            .then(|| summary_output.content.clone());

        let creators = group_by_creator(posts);
        let sentiment_outputs = self.run_sentiment_pool(creators, summary, deadline).await;

        let mut outputs = Vec::with_capacity(1 + sentiment_outputs.len());
        outputs.push(summary_output);
        outputs.extend(sentiment_outputs);

        let report = report::assemble(window, &outputs, notes);
        info!(
            status = report.status.as_str(),
            sections = report.sections.len(),
            notes = report.notes.len(),
            "Run finished"
        );
        report
    }

    /// Fetch one category, degrading to empty on failure
    async fn fetch_category(
        &self,
        source: Option<&dyn DataSource>,
        window: &ReportWindow,
        notes: &mut Vec<DegradationNote>,
    ) -> Vec<RawRecord> {
        let Some(source) = source else {
            debug!("No source configured for category, skipping");
            return Vec::new();
        };

        match source.fetch(window).await {
            Ok(records) => {
                debug!(
                    origin = %source.origin(),
                    source = source.name(),
                    count = records.len(),
                    "Category fetched"
                );
                records
            }
            Err(e) => {
                warn!(
                    origin = %source.origin(),
                    source = source.name(),
                    error = %e,
                    "Category fetch failed, degrading to empty"
                );
                notes.push(DegradationNote::new(
                    format!("fetch/{}", source.origin()),
                    e.to_string(),
                ));
                Vec::new()
            }
        }
    }

    async fn run_summarizer(
        &self,
        filings: Vec<RawRecord>,
        deadline: Option<Instant>,
    ) -> AgentOutput {
        let records: RecordSet = filings.into();
        let task = AgentTask::new(AgentRole::Summarizer, records);
        let mut step = RetryingAgentStep::new(
            Arc::clone(&self.runner),
            self.config.summarizer_rules.clone(),
            Arc::clone(&self.config),
            deadline,
        );
        step.run(task).await
    }

    /// Score every creator's posts, at most `pool_size` steps in flight
    async fn run_sentiment_pool(
        &self,
        creators: Vec<(String, Vec<RawRecord>)>,
        summary: Option<String>,
        deadline: Option<Instant>,
    ) -> Vec<AgentOutput> {
        if deadline.is_some_and(|d| Instant::now() >= d) {
            warn!(
                creators = creators.len(),
                "Run deadline expired before sentiment fan-out"
            );
            return creators
                .into_iter()
                .map(|(creator, _)| {
                    AgentOutput::exhausted(
                        AgentRole::Sentiment,
                        Some(creator),
                        String::new(),
                        0,
                        DEADLINE_EXCEEDED,
                    )
                })
                .collect();
        }

        let pool = Arc::new(Semaphore::new(self.config.pool_size));
        let labels: Vec<String> = creators.iter().map(|(creator, _)| creator.clone()).collect();

        let mut handles = Vec::with_capacity(creators.len());
        for (creator, records) in creators {
            let runner = Arc::clone(&self.runner);
            let config = Arc::clone(&self.config);
            let pool = Arc::clone(&pool);
            let summary = summary.clone();

            handles.push(tokio::spawn(async move {
                // The pool lives for the whole fan-out and is never closed,
                // so acquisition cannot fail
                let _permit = pool.acquire_owned().await.ok();

                let mut context = TaskContext::new().with_creator(creator);
                if let Some(summary) = summary {
                    context = context.with_summary(summary);
                }

                let records: RecordSet = records.into();
                let task =
                    AgentTask::new(AgentRole::Sentiment, records).with_context(context);
                let mut step = RetryingAgentStep::new(
                    runner,
                    config.sentiment_rules.clone(),
                    Arc::clone(&config),
                    deadline,
                );
                step.run(task).await
            }));
        }

        // Awaiting in spawn order keeps sections in creator input order no
        // matter how the pool interleaves
        join_all(handles)
            .await
            .into_iter()
            .zip(labels)
            .map(|(joined, creator)| {
                joined.unwrap_or_else(|e| {
                    error!(creator = %creator, error = %e, "Sentiment task aborted");
                    AgentOutput::exhausted(
                        AgentRole::Sentiment,
                        Some(creator),
                        String::new(),
                        0,
                        format!("task aborted: {e}"),
                    )
                })
            })
            .collect()
    }
}

/// Group posts by creator, preserving first-appearance order
///
/// Posts without a creator field cannot be scored and are dropped here.
fn group_by_creator(posts: Vec<RawRecord>) -> Vec<(String, Vec<RawRecord>)> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<RawRecord>> = HashMap::new();

    for post in posts {
        let Some(creator) = post.creator().map(str::to_string) else {
            warn!(record = %post.source_id, "Post without creator field, dropping");
            continue;
        };
        if !groups.contains_key(&creator) {
            order.push(creator.clone());
        }
        groups.entry(creator).or_default().push(post);
    }

    order
        .into_iter()
        .map(|creator| {
            let posts = groups.remove(&creator).unwrap_or_default();
            (creator, posts)
        })
        .collect()
}

/// Builder for [`PipelineOrchestrator`]
#[derive(Default)]
pub struct PipelineOrchestratorBuilder {
    provider: Option<Arc<dyn ModelProvider>>,
    config: Option<PipelineConfig>,
    insider_source: Option<Arc<dyn DataSource>>,
    posts_source: Option<Arc<dyn DataSource>>,
}

impl PipelineOrchestratorBuilder {
    /// Model provider backing every step (required)
    pub fn provider(mut self, provider: Arc<dyn ModelProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Pipeline configuration (defaults applied when unset)
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Source for insider filings
    pub fn insider_source(mut self, source: Arc<dyn DataSource>) -> Self {
        self.insider_source = Some(source);
        self
    }

    /// Source for creator posts
    pub fn posts_source(mut self, source: Arc<dyn DataSource>) -> Self {
        self.posts_source = Some(source);
        self
    }

    /// Validate the configuration and build the orchestrator
    ///
    /// # Errors
    ///
    /// Returns a configuration error when no provider is set or the
    /// configuration fails validation, and a template error when the prompt
    /// catalog fails to compile.
    pub fn build(self) -> Result<PipelineOrchestrator> {
        let provider = self
            .provider
            .ok_or_else(|| PipelineError::ConfigError("model provider is required".to_string()))?;
        let config = self.config.unwrap_or_default();
        config.validate()?;

        // One runner for the whole run keeps the rate budget shared across
        // every step
        let runner = Arc::new(AgentRunner::new(provider, &config)?);

        Ok(PipelineOrchestrator {
            runner,
            config: Arc::new(config),
            insider_source: self.insider_source,
            posts_source: self.posts_source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use brief_core::{FetchError, RecordOrigin, ReportStatus};
    use brief_llm::{CompletionRequest, CompletionResponse, ModelError, StopReason, TokenUsage};
    use chrono::{Duration as ChronoDuration, Utc};
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    use crate::prompts::NO_FILINGS_OUTPUT;

    /// Provider that routes scripted replies by task, not call order, so
    /// concurrent steps stay deterministic
    struct RoutedProvider {
        scripts: Mutex<HashMap<String, VecDeque<brief_llm::Result<String>>>>,
        delays: HashMap<String, Duration>,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl RoutedProvider {
        fn new() -> Self {
            Self {
                scripts: Mutex::new(HashMap::new()),
                delays: HashMap::new(),
                requests: Mutex::new(Vec::new()),
            }
        }

        /// Script replies for one task key (`summarizer` or a creator name)
        fn script(self, key: &str, replies: Vec<brief_llm::Result<String>>) -> Self {
            self.scripts
                .lock()
                .unwrap()
                .insert(key.to_string(), replies.into());
            self
        }

        fn delay(mut self, key: &str, delay: Duration) -> Self {
            self.delays.insert(key.to_string(), delay);
            self
        }

        /// Task key from the rendered prompt: sentiment prompts open with a
        /// `Creator:` line, summarizer prompts do not
        fn key_of(request: &CompletionRequest) -> String {
            request
                .messages
                .first()
                .and_then(|m| m.content.lines().next())
                .and_then(|line| line.strip_prefix("Creator: "))
                .map(str::to_string)
                .unwrap_or_else(|| "summarizer".to_string())
        }

        fn calls_for(&self, key: &str) -> usize {
            self.requests
                .lock()
                .unwrap()
                .iter()
                .filter(|r| Self::key_of(r) == key)
                .count()
        }
    }

    #[async_trait]
    impl ModelProvider for RoutedProvider {
        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> brief_llm::Result<CompletionResponse> {
            let key = Self::key_of(&request);
            if let Some(delay) = self.delays.get(&key) {
                tokio::time::sleep(*delay).await;
            }

            self.requests.lock().unwrap().push(request);
            let reply = self
                .scripts
                .lock()
                .unwrap()
                .get_mut(&key)
                .and_then(|queue| queue.pop_front());
            match reply {
                Some(Ok(content)) => Ok(CompletionResponse {
                    content,
                    stop_reason: StopReason::EndTurn,
                    usage: TokenUsage {
                        input_tokens: 10,
                        output_tokens: 5,
                    },
                }),
                Some(Err(e)) => Err(e),
                None => Err(ModelError::UnexpectedResponse(format!(
                    "no scripted reply for {key}"
                ))),
            }
        }

        fn name(&self) -> &str {
            "routed"
        }
    }

    struct StubSource {
        origin: RecordOrigin,
        records: Vec<RawRecord>,
    }

    #[async_trait]
    impl DataSource for StubSource {
        async fn fetch(
            &self,
            _window: &ReportWindow,
        ) -> std::result::Result<Vec<RawRecord>, FetchError> {
            Ok(self.records.clone())
        }

        fn origin(&self) -> RecordOrigin {
            self.origin
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    struct FailingSource {
        origin: RecordOrigin,
    }

    #[async_trait]
    impl DataSource for FailingSource {
        async fn fetch(
            &self,
            _window: &ReportWindow,
        ) -> std::result::Result<Vec<RawRecord>, FetchError> {
            Err(FetchError::Http("service returned 503".to_string()))
        }

        fn origin(&self) -> RecordOrigin {
            self.origin
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn filing(id: &str) -> RawRecord {
        RawRecord::insider_trade(id, Utc::now() - ChronoDuration::hours(1), "4 - ACME CORP (CEO)")
    }

    fn post(id: &str, creator: &str) -> RawRecord {
        RawRecord::social_post(id, Utc::now() - ChronoDuration::hours(1), "chips look strong")
            .with_fields(json!({ "creator": creator }))
    }

    fn filings_source(records: Vec<RawRecord>) -> Arc<dyn DataSource> {
        Arc::new(StubSource {
            origin: RecordOrigin::InsiderTrade,
            records,
        })
    }

    fn posts_source(records: Vec<RawRecord>) -> Arc<dyn DataSource> {
        Arc::new(StubSource {
            origin: RecordOrigin::SocialPost,
            records,
        })
    }

    fn valid_sentiment(creator: &str) -> String {
        json!({
            "creator": creator,
            "posts": [{ "content": "chips look strong", "label": "positive", "theme": "semiconductors" }],
            "overall": "Upbeat on semiconductors this window."
        })
        .to_string()
    }

    fn fast_config() -> PipelineConfig {
        PipelineConfig::builder()
            .max_attempts(3)
            // Zero backoff keeps retry tests fast
            .backoff_seconds(vec![0.0])
            .build()
            .unwrap()
    }

    fn orchestrator(
        provider: Arc<RoutedProvider>,
        config: PipelineConfig,
        insider: Option<Arc<dyn DataSource>>,
        posts: Option<Arc<dyn DataSource>>,
    ) -> PipelineOrchestrator {
        let mut builder = PipelineOrchestrator::builder()
            .provider(provider)
            .config(config);
        if let Some(source) = insider {
            builder = builder.insider_source(source);
        }
        if let Some(source) = posts {
            builder = builder.posts_source(source);
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_build_requires_provider() {
        let err = PipelineOrchestrator::builder().build().unwrap_err();
        assert!(matches!(err, PipelineError::ConfigError(_)));
    }

    #[test]
    fn test_group_by_creator_keeps_first_appearance_order() {
        let posts = vec![
            post("p1", "carol"),
            post("p2", "alice"),
            post("p3", "carol"),
            RawRecord::social_post("p4", Utc::now(), "no creator field"),
        ];
        let groups = group_by_creator(posts);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "carol");
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0, "alice");
        assert_eq!(groups[1].1.len(), 1);
    }

    #[tokio::test]
    async fn test_full_run_with_recovery_on_third_attempt() {
        let provider = Arc::new(
            RoutedProvider::new()
                .script("summarizer", vec![Ok("- CEO bought 10k shares".to_string())])
                .script("alice", vec![Ok(valid_sentiment("alice"))])
                .script(
                    "bob",
                    vec![
                        Ok("not json".to_string()),
                        Ok("still not json".to_string()),
                        Ok(valid_sentiment("bob")),
                    ],
                )
                .script("carol", vec![Ok(valid_sentiment("carol"))]),
        );
        let orchestrator = orchestrator(
            Arc::clone(&provider),
            fast_config(),
            Some(filings_source(vec![filing("f1"), filing("f2")])),
            Some(posts_source(vec![
                post("p1", "alice"),
                post("p2", "bob"),
                post("p3", "carol"),
            ])),
        );

        let report = orchestrator.run(ReportWindow::last_hours(48)).await;

        assert_eq!(report.status, ReportStatus::Complete);
        assert_eq!(report.sections.len(), 4);
        assert_eq!(report.sections[0].role, AgentRole::Summarizer);
        assert_eq!(report.sections[1].creator.as_deref(), Some("alice"));
        assert_eq!(report.sections[2].creator.as_deref(), Some("bob"));
        assert_eq!(report.sections[3].creator.as_deref(), Some("carol"));
        assert!(report.notes.is_empty());
        assert_eq!(provider.calls_for("bob"), 3);
    }

    #[tokio::test]
    async fn test_insider_fetch_failure_degrades_to_note_and_canned_brief() {
        let provider = Arc::new(
            RoutedProvider::new().script("alice", vec![Ok(valid_sentiment("alice"))]),
        );
        let orchestrator = orchestrator(
            Arc::clone(&provider),
            fast_config(),
            Some(Arc::new(FailingSource {
                origin: RecordOrigin::InsiderTrade,
            })),
            Some(posts_source(vec![post("p1", "alice")])),
        );

        let report = orchestrator.run(ReportWindow::last_hours(48)).await;

        // Empty category short-circuits to the canned brief, which still
        // passes validation, so only the fetch note marks the degradation
        assert_eq!(report.status, ReportStatus::Complete);
        assert_eq!(report.sections[0].content, NO_FILINGS_OUTPUT);
        assert_eq!(report.notes.len(), 1);
        assert_eq!(report.notes[0].scope, "fetch/insider_trade");
        assert!(report.notes[0].reason.contains("503"));
        assert_eq!(provider.calls_for("summarizer"), 0);
    }

    #[tokio::test]
    async fn test_missing_sources_yield_canned_complete_report() {
        let provider = Arc::new(RoutedProvider::new());
        let orchestrator = orchestrator(Arc::clone(&provider), fast_config(), None, None);

        let report = orchestrator.run(ReportWindow::last_hours(48)).await;

        assert_eq!(report.status, ReportStatus::Complete);
        assert_eq!(report.sections.len(), 1);
        assert_eq!(report.sections[0].content, NO_FILINGS_OUTPUT);
        assert!(report.notes.is_empty());
        assert!(provider.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_exhausted_sentiment_yields_partial_with_note() {
        let provider = Arc::new(
            RoutedProvider::new()
                .script("summarizer", vec![Ok("- quiet window".to_string())])
                .script("alice", vec![Ok(valid_sentiment("alice"))])
                .script(
                    "bob",
                    vec![
                        Ok("not json".to_string()),
                        Ok("not json".to_string()),
                        Ok("not json".to_string()),
                    ],
                ),
        );
        let orchestrator = orchestrator(
            Arc::clone(&provider),
            fast_config(),
            Some(filings_source(vec![filing("f1")])),
            Some(posts_source(vec![post("p1", "alice"), post("p2", "bob")])),
        );

        let report = orchestrator.run(ReportWindow::last_hours(48)).await;

        assert_eq!(report.status, ReportStatus::Partial);
        assert!(report.sections[2].content.contains("Content unavailable"));
        assert_eq!(report.notes.len(), 1);
        assert_eq!(report.notes[0].scope, "sentiment/bob");
        assert!(report.notes[0].reason.contains("validation failed"));
    }

    #[tokio::test]
    async fn test_all_steps_failing_yields_failed_report() {
        let provider = Arc::new(
            RoutedProvider::new()
                .script("summarizer", vec![Err(ModelError::AuthenticationFailed)])
                .script("alice", vec![Err(ModelError::AuthenticationFailed)]),
        );
        let orchestrator = orchestrator(
            Arc::clone(&provider),
            fast_config(),
            Some(filings_source(vec![filing("f1")])),
            Some(posts_source(vec![post("p1", "alice")])),
        );

        let report = orchestrator.run(ReportWindow::last_hours(48)).await;

        assert_eq!(report.status, ReportStatus::Failed);
        assert_eq!(report.notes.len(), 2);
        assert_eq!(report.notes[0].scope, "summarizer");
        assert_eq!(report.notes[1].scope, "sentiment/alice");
    }

    #[tokio::test]
    async fn test_sentiment_prompts_carry_validated_brief() {
        let provider = Arc::new(
            RoutedProvider::new()
                .script("summarizer", vec![Ok("- CEO bought 10k shares".to_string())])
                .script("alice", vec![Ok(valid_sentiment("alice"))]),
        );
        let orchestrator = orchestrator(
            Arc::clone(&provider),
            fast_config(),
            Some(filings_source(vec![filing("f1")])),
            Some(posts_source(vec![post("p1", "alice")])),
        );

        orchestrator.run(ReportWindow::last_hours(48)).await;

        let requests = provider.requests.lock().unwrap();
        let sentiment = requests
            .iter()
            .find(|r| RoutedProvider::key_of(r) == "alice")
            .unwrap();
        assert!(sentiment.messages[0].content.contains("- CEO bought 10k shares"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sections_keep_input_order_under_concurrency() {
        // Reverse-staircase delays make completion order the opposite of
        // spawn order
        let provider = Arc::new(
            RoutedProvider::new()
                .script("summarizer", vec![Ok("- quiet window".to_string())])
                .script("alice", vec![Ok(valid_sentiment("alice"))])
                .script("bob", vec![Ok(valid_sentiment("bob"))])
                .script("carol", vec![Ok(valid_sentiment("carol"))])
                .script("dave", vec![Ok(valid_sentiment("dave"))])
                .delay("alice", Duration::from_millis(400))
                .delay("bob", Duration::from_millis(300))
                .delay("carol", Duration::from_millis(200))
                .delay("dave", Duration::from_millis(100)),
        );
        let config = PipelineConfig::builder()
            .max_attempts(1)
            .pool_size(2)
            .build()
            .unwrap();
        let orchestrator = orchestrator(
            Arc::clone(&provider),
            config,
            Some(filings_source(vec![filing("f1")])),
            Some(posts_source(vec![
                post("p1", "alice"),
                post("p2", "bob"),
                post("p3", "carol"),
                post("p4", "dave"),
            ])),
        );

        let report = orchestrator.run(ReportWindow::last_hours(48)).await;

        assert_eq!(report.status, ReportStatus::Complete);
        let creators: Vec<_> = report.sections[1..]
            .iter()
            .map(|s| s.creator.as_deref().unwrap().to_string())
            .collect();
        assert_eq!(creators, ["alice", "bob", "carol", "dave"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_exhausts_late_creators_as_partial() {
        // Pool of one serializes the creators; each model call burns 600ms
        // against a one-second budget, so carol's step starts after expiry
        let provider = Arc::new(
            RoutedProvider::new()
                .script("summarizer", vec![Ok("- quiet window".to_string())])
                .script("alice", vec![Ok(valid_sentiment("alice"))])
                .script("bob", vec![Ok(valid_sentiment("bob"))])
                .delay("alice", Duration::from_millis(600))
                .delay("bob", Duration::from_millis(600)),
        );
        let config = PipelineConfig::builder()
            .max_attempts(1)
            .pool_size(1)
            .run_deadline_seconds(1)
            .build()
            .unwrap();
        let orchestrator = orchestrator(
            Arc::clone(&provider),
            config,
            Some(filings_source(vec![filing("f1")])),
            Some(posts_source(vec![
                post("p1", "alice"),
                post("p2", "bob"),
                post("p3", "carol"),
            ])),
        );

        let report = orchestrator.run(ReportWindow::last_hours(48)).await;

        assert_eq!(report.status, ReportStatus::Partial);
        // In-flight attempts finish; only carol never starts
        assert_eq!(provider.calls_for("carol"), 0);
        let note = report
            .notes
            .iter()
            .find(|n| n.scope == "sentiment/carol")
            .unwrap();
        assert_eq!(note.reason, DEADLINE_EXCEEDED);
        assert!(report.sections[3].content.contains(DEADLINE_EXCEEDED));
    }

    #[tokio::test]
    async fn test_expired_deadline_skips_fan_out_entirely() {
        let provider = Arc::new(RoutedProvider::new());
        let config = PipelineConfig::builder()
            .max_attempts(1)
            .run_deadline_seconds(0)
            .build()
            .unwrap();
        let orchestrator = orchestrator(
            Arc::clone(&provider),
            config,
            None,
            Some(posts_source(vec![post("p1", "alice"), post("p2", "bob")])),
        );

        let report = orchestrator.run(ReportWindow::last_hours(48)).await;

        assert_eq!(report.status, ReportStatus::Failed);
        assert!(provider.requests.lock().unwrap().is_empty());
        for section in &report.sections[1..] {
            assert!(section.content.contains(DEADLINE_EXCEEDED));
        }
    }
}
