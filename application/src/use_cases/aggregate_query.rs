//! Aggregate Query use case
//!
//! Fans one prompt out to every endpoint concurrently and joins on all of
//! them. Each endpoint's failure is captured as its own [`Outcome`]; nothing
//! escapes the use case as an error.

use crate::policy::QueryPolicy;
use crate::ports::endpoint_transport::{EndpointTransport, TransportError};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use futures::Stream;
use std::collections::HashMap;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use superbrain_domain::{
    Endpoint, EndpointSet, FailureKind, Outcome, OutcomeEvent, Prompt, ResultSet, preview,
};
use tokio::sync::mpsc;
use tokio::task::{Id, JoinSet};
use tracing::{debug, info, warn};

/// Input for the AggregateQuery use case
#[derive(Debug, Clone)]
pub struct AggregateQueryInput {
    /// The prompt shared by every endpoint
    pub prompt: Prompt,
    /// Endpoints to query, one request each
    pub endpoints: EndpointSet,
}

impl AggregateQueryInput {
    pub fn new(prompt: Prompt, endpoints: EndpointSet) -> Self {
        Self { prompt, endpoints }
    }
}

/// Use case for querying several endpoints with the same prompt
pub struct AggregateQueryUseCase<T: EndpointTransport + 'static> {
    transport: Arc<T>,
    policy: QueryPolicy,
}

impl<T: EndpointTransport + 'static> AggregateQueryUseCase<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self {
            transport,
            policy: QueryPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: QueryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: AggregateQueryInput) -> ResultSet {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    ///
    /// Returns only after every endpoint has settled. The result holds
    /// exactly one outcome per endpoint of `input`.
    pub async fn execute_with_progress(
        &self,
        input: AggregateQueryInput,
        progress: &dyn ProgressNotifier,
    ) -> ResultSet {
        progress.on_query_start(&input.endpoints);

        let mut pending = self.fan_out(&input);
        let mut results = ResultSet::new();

        while let Some((endpoint, outcome)) = pending.next().await {
            progress.on_endpoint_settled(&endpoint, &outcome);
            results.record(endpoint.id, outcome);
        }

        progress.on_query_complete(&results);
        info!(
            "Query complete: {} succeeded, {} failed",
            results.successes().count(),
            results.failures().count()
        );
        results
    }

    /// Start the query and yield outcomes as they settle
    ///
    /// Dropping the returned stream aborts requests that are still running.
    pub fn stream(&self, input: AggregateQueryInput) -> OutcomeStream {
        let mut pending = self.fan_out(&input);
        let (tx, rx) = mpsc::channel(input.endpoints.len());

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    settled = pending.next() => {
                        let Some((endpoint, outcome)) = settled else { break };
                        if tx.send(OutcomeEvent::new(endpoint.id, outcome)).await.is_err() {
                            break;
                        }
                    }
                    _ = tx.closed() => {
                        debug!("Outcome stream dropped, aborting {} requests", pending.len());
                        break;
                    }
                }
            }
            // Dropping the join set aborts whatever is still in flight
            drop(pending);
        });

        OutcomeStream::new(rx, input.endpoints)
    }

    /// Spawn one request task per endpoint
    fn fan_out(&self, input: &AggregateQueryInput) -> PendingQueries {
        info!("Querying {} endpoints", input.endpoints.len());

        let prompt = Arc::new(input.prompt.clone());
        let mut join_set = JoinSet::new();
        let mut tasks = HashMap::new();

        for endpoint in &input.endpoints {
            let transport = Arc::clone(&self.transport);
            let prompt = Arc::clone(&prompt);
            let timeout = self.policy.timeout;
            let task_endpoint = endpoint.clone();

            let handle = join_set.spawn(async move {
                let outcome =
                    Self::query_endpoint(transport.as_ref(), &task_endpoint, &prompt, timeout)
                        .await;
                (task_endpoint, outcome)
            });
            tasks.insert(handle.id(), endpoint.clone());
        }

        PendingQueries { join_set, tasks }
    }

    /// Query a single endpoint and fold every error into a failure outcome
    async fn query_endpoint(
        transport: &T,
        endpoint: &Endpoint,
        prompt: &Prompt,
        timeout: Option<std::time::Duration>,
    ) -> Outcome {
        debug!("Sending prompt to {} ({})", endpoint.id, endpoint.target);

        let request = transport.send(endpoint, prompt);
        let result = match timeout {
            Some(limit) => tokio::time::timeout(limit, request)
                .await
                .unwrap_or(Err(TransportError::Timeout(limit))),
            None => request.await,
        };

        match result {
            Ok(payload) => {
                info!("Endpoint {} responded successfully", endpoint.id);
                debug!("{}: {}", endpoint.id, preview(&payload, 80));
                Outcome::success(payload)
            }
            Err(e) => {
                warn!("Endpoint {} failed: {}", endpoint.id, e);
                Outcome::failure(e.kind(), format!("{} API error: {}", endpoint.name, e))
            }
        }
    }
}

/// Requests still in flight for one submission
struct PendingQueries {
    join_set: JoinSet<(Endpoint, Outcome)>,
    tasks: HashMap<Id, Endpoint>,
}

impl PendingQueries {
    fn len(&self) -> usize {
        self.join_set.len()
    }

    /// Next settled endpoint, in completion order
    ///
    /// A task that panicked or was cancelled still yields a failure for its
    /// endpoint, so no outcome is lost.
    async fn next(&mut self) -> Option<(Endpoint, Outcome)> {
        loop {
            match self.join_set.join_next_with_id().await? {
                Ok((id, settled)) => {
                    self.tasks.remove(&id);
                    return Some(settled);
                }
                Err(e) => {
                    warn!("Task join error: {}", e);
                    if let Some(endpoint) = self.tasks.remove(&e.id()) {
                        let reason = format!("{} API error: request task failed", endpoint.name);
                        return Some((endpoint, Outcome::failure(FailureKind::Internal, reason)));
                    }
                }
            }
        }
    }
}

/// Outcomes of a running query, delivered as they settle
///
/// Implements [`Stream`] over [`OutcomeEvent`]s; use
/// [`OutcomeStream::collect_results`] to wait for the complete [`ResultSet`]
/// instead. Dropping it aborts the requests still in flight.
pub struct OutcomeStream {
    receiver: mpsc::Receiver<OutcomeEvent>,
    endpoints: EndpointSet,
}

impl OutcomeStream {
    fn new(receiver: mpsc::Receiver<OutcomeEvent>, endpoints: EndpointSet) -> Self {
        Self {
            receiver,
            endpoints,
        }
    }

    /// Consume the stream and collect every outcome.
    pub async fn collect_results(self) -> ResultSet {
        self.collect_results_with(|_| {}).await
    }

    /// Like [`collect_results`](Self::collect_results), calling `on_event`
    /// for each outcome as it settles.
    ///
    /// Any endpoint the driver never reported on is recorded as an
    /// internal failure, so the result is always complete.
    pub async fn collect_results_with(
        mut self,
        mut on_event: impl FnMut(&OutcomeEvent),
    ) -> ResultSet {
        let mut results = ResultSet::new();
        while let Some(event) = self.receiver.recv().await {
            on_event(&event);
            results.record_event(event);
        }

        for endpoint in results.missing(&self.endpoints) {
            warn!("No outcome reported for {}", endpoint.id);
            let reason = format!("{} API error: no response recorded", endpoint.name);
            results.record(
                endpoint.id.clone(),
                Outcome::failure(FailureKind::Internal, reason),
            );
        }
        results
    }
}

impl Stream for OutcomeStream {
    type Item = OutcomeEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use futures::StreamExt;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, Instant};

    #[derive(Clone)]
    enum Reply {
        /// Echo `<id>:<prompt>` after the given delay
        Echo(Duration),
        Fail(TransportError),
        Panic,
        /// Never answers; bumps the counter once the request is dropped
        Hang(Arc<AtomicUsize>),
    }

    struct ReleaseGuard(Arc<AtomicUsize>);

    impl Drop for ReleaseGuard {
        fn drop(&mut self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct StubTransport {
        replies: HashMap<String, Reply>,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl StubTransport {
        fn new(replies: &[(&str, Reply)]) -> Self {
            Self {
                replies: replies
                    .iter()
                    .map(|(id, reply)| (id.to_string(), reply.clone()))
                    .collect(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<(String, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl EndpointTransport for StubTransport {
        async fn send(
            &self,
            endpoint: &Endpoint,
            prompt: &Prompt,
        ) -> Result<String, TransportError> {
            self.calls
                .lock()
                .unwrap()
                .push((endpoint.id.to_string(), prompt.content().to_string()));

            match self.replies.get(endpoint.id.as_str()).cloned() {
                Some(Reply::Echo(delay)) => {
                    tokio::time::sleep(delay).await;
                    Ok(format!("{}:{}", endpoint.id, prompt))
                }
                Some(Reply::Fail(e)) => Err(e),
                Some(Reply::Panic) => panic!("stub transport panicked"),
                Some(Reply::Hang(released)) => {
                    let _guard = ReleaseGuard(released);
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Err(TransportError::Timeout(Duration::from_secs(3600)))
                }
                None => Err(TransportError::Connection("no route".to_string())),
            }
        }
    }

    fn endpoints(ids: &[&str]) -> EndpointSet {
        EndpointSet::new(
            ids.iter()
                .map(|id| Endpoint::api(id, &id.to_uppercase()))
                .collect(),
        )
        .unwrap()
    }

    fn input(prompt: &str, ids: &[&str]) -> AggregateQueryInput {
        AggregateQueryInput::new(Prompt::try_new(prompt).unwrap(), endpoints(ids))
    }

    fn echo() -> Reply {
        Reply::Echo(Duration::ZERO)
    }

    #[tokio::test]
    async fn test_one_outcome_per_endpoint() {
        let transport = Arc::new(StubTransport::new(&[
            ("openai", echo()),
            ("claude", echo()),
            ("gemini", echo()),
        ]));
        let use_case = AggregateQueryUseCase::new(transport.clone());

        let results = use_case
            .execute(input("hi", &["openai", "claude", "gemini"]))
            .await;

        assert_eq!(results.len(), 3);
        for id in ["openai", "claude", "gemini"] {
            assert_eq!(
                results.get(id).unwrap().payload(),
                Some(format!("{}:hi", id).as_str())
            );
        }
        assert_eq!(transport.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_mixed_success_and_failure() {
        let transport = Arc::new(StubTransport::new(&[
            ("a", echo()),
            ("b", Reply::Fail(TransportError::Connection("refused".into()))),
        ]));
        let use_case = AggregateQueryUseCase::new(transport);

        let results = use_case.execute(input("q", &["a", "b"])).await;

        assert_eq!(results.len(), 2);
        assert!(results.get("a").unwrap().is_success());
        let failure = results.get("b").unwrap().as_failure().unwrap();
        assert_eq!(failure.kind, FailureKind::Transport);
        assert!(failure.reason.contains("refused"));
    }

    #[tokio::test]
    async fn test_join_on_all_not_first() {
        let transport = Arc::new(StubTransport::new(&[
            ("slow", Reply::Echo(Duration::from_millis(500))),
            (
                "fast",
                Reply::Fail(TransportError::Status {
                    code: 500,
                    message: "Internal Server Error".into(),
                }),
            ),
        ]));
        let use_case = AggregateQueryUseCase::new(transport);

        let started = Instant::now();
        let results = use_case.execute(input("q", &["slow", "fast"])).await;

        assert!(started.elapsed() >= Duration::from_millis(500));
        assert_eq!(results.len(), 2);
        assert_eq!(results.get("slow").unwrap().payload(), Some("slow:q"));
        assert_eq!(
            results.get("fast").unwrap().as_failure().unwrap().kind,
            FailureKind::Status(500)
        );
    }

    #[tokio::test]
    async fn test_requests_run_concurrently() {
        let transport = Arc::new(StubTransport::new(&[
            ("a", Reply::Echo(Duration::from_millis(300))),
            ("b", Reply::Echo(Duration::from_millis(300))),
            ("c", Reply::Echo(Duration::from_millis(300))),
        ]));
        let use_case = AggregateQueryUseCase::new(transport);

        let started = Instant::now();
        let results = use_case.execute(input("q", &["a", "b", "c"])).await;

        assert_eq!(results.len(), 3);
        assert!(started.elapsed() < Duration::from_millis(850));
    }

    #[tokio::test]
    async fn test_failure_reason_names_endpoint() {
        let transport = Arc::new(StubTransport::new(&[(
            "groq",
            Reply::Fail(TransportError::Status {
                code: 500,
                message: "Internal Server Error".into(),
            }),
        )]));
        let use_case = AggregateQueryUseCase::new(transport);

        let results = use_case.execute(input("q", &["groq"])).await;

        let failure = results.get("groq").unwrap().as_failure().unwrap();
        assert_eq!(failure.reason, "GROQ API error: HTTP 500: Internal Server Error");
    }

    #[tokio::test]
    async fn test_decode_error_is_failure() {
        let transport = Arc::new(StubTransport::new(&[(
            "venice",
            Reply::Fail(TransportError::Decode("missing field `response`".into())),
        )]));
        let use_case = AggregateQueryUseCase::new(transport);

        let results = use_case.execute(input("q", &["venice"])).await;

        let failure = results.get("venice").unwrap().as_failure().unwrap();
        assert_eq!(failure.kind, FailureKind::Decode);
        assert!(failure.reason.contains("response"));
    }

    #[tokio::test]
    async fn test_single_endpoint_matches_direct_call() {
        let transport = Arc::new(StubTransport::new(&[("solo", echo())]));
        let direct = transport
            .send(&Endpoint::api("solo", "SOLO"), &Prompt::try_new("x").unwrap())
            .await
            .unwrap();

        let use_case = AggregateQueryUseCase::new(transport);
        let results = use_case.execute(input("x", &["solo"])).await;

        assert_eq!(results.len(), 1);
        assert_eq!(results.get("solo").unwrap().payload(), Some(direct.as_str()));
    }

    #[tokio::test]
    async fn test_sequential_calls_do_not_leak() {
        let transport = Arc::new(StubTransport::new(&[("a", echo()), ("b", echo())]));
        let use_case = AggregateQueryUseCase::new(transport.clone());

        let first = use_case.execute(input("first", &["a", "b"])).await;
        let second = use_case.execute(input("second", &["a"])).await;

        assert_eq!(first.get("a").unwrap().payload(), Some("a:first"));
        assert_eq!(second.len(), 1);
        assert_eq!(second.get("a").unwrap().payload(), Some("a:second"));
        assert!(second.get("b").is_none());
    }

    #[tokio::test]
    async fn test_prompt_shared_unmodified() {
        let transport = Arc::new(StubTransport::new(&[("a", echo()), ("b", echo())]));
        let use_case = AggregateQueryUseCase::new(transport.clone());

        use_case.execute(input("  spaced prompt\n", &["a", "b"])).await;

        let calls = transport.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls.iter().all(|(_, p)| p == "  spaced prompt\n"));
    }

    #[tokio::test]
    async fn test_timeout_only_affects_slow_endpoint() {
        let transport = Arc::new(StubTransport::new(&[
            ("slow", Reply::Echo(Duration::from_secs(5))),
            ("fast", echo()),
        ]));
        let use_case = AggregateQueryUseCase::new(transport)
            .with_policy(QueryPolicy::with_timeout(Duration::from_millis(100)));

        let started = Instant::now();
        let results = use_case.execute(input("q", &["slow", "fast"])).await;

        assert!(started.elapsed() < Duration::from_secs(2));
        assert!(results.get("fast").unwrap().is_success());
        assert_eq!(
            results.get("slow").unwrap().as_failure().unwrap().kind,
            FailureKind::Timeout
        );
    }

    #[tokio::test]
    async fn test_panicking_request_still_yields_outcome() {
        let transport = Arc::new(StubTransport::new(&[("ok", echo()), ("boom", Reply::Panic)]));
        let use_case = AggregateQueryUseCase::new(transport);

        let results = use_case.execute(input("q", &["ok", "boom"])).await;

        assert_eq!(results.len(), 2);
        assert!(results.get("ok").unwrap().is_success());
        assert_eq!(
            results.get("boom").unwrap().as_failure().unwrap().kind,
            FailureKind::Internal
        );
    }

    #[tokio::test]
    async fn test_stream_yields_in_completion_order() {
        let transport = Arc::new(StubTransport::new(&[
            ("slow", Reply::Echo(Duration::from_millis(200))),
            ("fast", echo()),
        ]));
        let use_case = AggregateQueryUseCase::new(transport);

        let mut stream = use_case.stream(input("q", &["slow", "fast"]));

        let first = stream.next().await.unwrap();
        assert_eq!(first.endpoint.as_str(), "fast");
        let second = stream.next().await.unwrap();
        assert_eq!(second.endpoint.as_str(), "slow");
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_stream_collect_matches_execute() {
        let transport = Arc::new(StubTransport::new(&[
            ("a", echo()),
            ("b", Reply::Fail(TransportError::Decode("bad".into()))),
        ]));
        let use_case = AggregateQueryUseCase::new(transport);

        let streamed = use_case
            .stream(input("q", &["a", "b"]))
            .collect_results()
            .await;
        let collected = use_case.execute(input("q", &["a", "b"])).await;

        assert_eq!(streamed, collected);
    }

    #[tokio::test]
    async fn test_collect_results_with_sees_every_event() {
        let transport = Arc::new(StubTransport::new(&[("a", echo()), ("b", echo())]));
        let use_case = AggregateQueryUseCase::new(transport);

        let mut seen = Vec::new();
        let results = use_case
            .stream(input("q", &["a", "b"]))
            .collect_results_with(|event| seen.push(event.endpoint.to_string()))
            .await;

        seen.sort();
        assert_eq!(seen, vec!["a", "b"]);
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn test_stream_works_with_stream_ext() {
        let transport = Arc::new(StubTransport::new(&[
            ("a", echo()),
            ("b", Reply::Fail(TransportError::Connection("down".into()))),
        ]));
        let use_case = AggregateQueryUseCase::new(transport);

        let events: Vec<OutcomeEvent> = use_case.stream(input("q", &["a", "b"])).collect().await;

        assert_eq!(events.len(), 2);
        let mut ids: Vec<_> = events.iter().map(|e| e.endpoint.to_string()).collect();
        ids.sort();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_dropping_stream_aborts_pending_requests() {
        let released = Arc::new(AtomicUsize::new(0));
        let transport = Arc::new(StubTransport::new(&[
            ("a", Reply::Hang(released.clone())),
            ("b", Reply::Hang(released.clone())),
        ]));
        let use_case = AggregateQueryUseCase::new(transport.clone());

        let stream = use_case.stream(input("q", &["a", "b"]));
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(transport.calls().len(), 2);
        assert_eq!(released.load(Ordering::SeqCst), 0);

        drop(stream);
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(released.load(Ordering::SeqCst), 2);
    }

    struct RecordingProgress {
        started: Mutex<usize>,
        settled: Mutex<Vec<(String, bool)>>,
        completed: Mutex<Option<usize>>,
    }

    impl ProgressNotifier for RecordingProgress {
        fn on_query_start(&self, endpoints: &EndpointSet) {
            *self.started.lock().unwrap() = endpoints.len();
        }

        fn on_endpoint_settled(&self, endpoint: &Endpoint, outcome: &Outcome) {
            self.settled
                .lock()
                .unwrap()
                .push((endpoint.id.to_string(), outcome.is_success()));
        }

        fn on_query_complete(&self, results: &ResultSet) {
            *self.completed.lock().unwrap() = Some(results.len());
        }
    }

    #[tokio::test]
    async fn test_progress_callbacks() {
        let transport = Arc::new(StubTransport::new(&[
            ("a", echo()),
            ("b", Reply::Fail(TransportError::Connection("down".into()))),
        ]));
        let use_case = AggregateQueryUseCase::new(transport);
        let progress = RecordingProgress {
            started: Mutex::new(0),
            settled: Mutex::new(Vec::new()),
            completed: Mutex::new(None),
        };

        use_case
            .execute_with_progress(input("q", &["a", "b"]), &progress)
            .await;

        assert_eq!(*progress.started.lock().unwrap(), 2);
        let mut settled = progress.settled.lock().unwrap().clone();
        settled.sort();
        assert_eq!(
            settled,
            vec![("a".to_string(), true), ("b".to_string(), false)]
        );
        assert_eq!(*progress.completed.lock().unwrap(), Some(2));
    }
}
