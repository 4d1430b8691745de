//! Test doubles for the explorer: a scripted graph service whose replies can
//! be held back and released in any order, and a recording engine.

use async_trait::async_trait;
use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap, VecDeque};
use std::rc::Rc;
use std::sync::Mutex;
use tokio::sync::oneshot;

use super::engine::{ContainerId, EngineFactory, InteractionSink, RenderEngine};
use crate::api::{GraphService, GraphStats, Recommendation, RecommendationResult};
use crate::error::{ExplorerError, Result};
use crate::graph::{EdgeRecord, GraphDataset, NodeRecord, UserId};

/// Nodes 1, 2, 3, 7, 9 with edges 1-2, 2-3, 7-1, 7-9.
pub fn sample_dataset() -> GraphDataset {
    dataset(&["1", "2", "3", "7", "9"], &[("1", "2"), ("2", "3"), ("7", "1"), ("7", "9")])
}

pub fn dataset(nodes: &[&str], edges: &[(&str, &str)]) -> GraphDataset {
    GraphDataset::new(
        nodes
            .iter()
            .map(|id| NodeRecord { id: id.to_string() })
            .collect(),
        edges
            .iter()
            .map(|(s, t)| EdgeRecord {
                id: EdgeRecord::composite_id(s, t),
                source: s.to_string(),
                target: t.to_string(),
            })
            .collect(),
    )
    .unwrap()
}

/// Recommendations for `user`, one item per `(user_id, mutual_friends)`.
pub fn recommendation(user: u64, items: &[(u64, &[u64])]) -> RecommendationResult {
    RecommendationResult {
        for_user_id: UserId(user),
        items: items
            .iter()
            .map(|(id, mutual)| Recommendation {
                user_id: UserId(*id),
                mutual_friends_count: mutual.len() as u32,
                mutual_friends: mutual.iter().copied().map(UserId).collect(),
            })
            .collect(),
    }
}

enum Reply<T> {
    Now(Result<T>),
    Gated(oneshot::Receiver<Result<T>>),
}

impl<T> Reply<T> {
    async fn resolve(self) -> Result<T> {
        match self {
            Reply::Now(result) => result,
            Reply::Gated(rx) => rx
                .await
                .unwrap_or_else(|_| Err(ExplorerError::Network("gate dropped".to_string()))),
        }
    }
}

#[derive(Default)]
struct Script {
    datasets: VecDeque<Reply<GraphDataset>>,
    exists: HashMap<u64, bool>,
    exists_replies: VecDeque<Reply<bool>>,
    recommendations: VecDeque<Reply<RecommendationResult>>,
    calls: Vec<String>,
}

/// Scripted `GraphService`.
///
/// Replies are consumed in call order. Gated replies suspend the caller until
/// the returned sender is used, which lets tests complete requests out of order.
#[derive(Default)]
pub struct FakeService {
    script: Mutex<Script>,
}

impl FakeService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<String> {
        self.script.lock().unwrap().calls.clone()
    }

    pub fn push_dataset(&self, result: Result<GraphDataset>) {
        self.script.lock().unwrap().datasets.push_back(Reply::Now(result));
    }

    pub fn gate_dataset(&self) -> oneshot::Sender<Result<GraphDataset>> {
        let (tx, rx) = oneshot::channel();
        self.script.lock().unwrap().datasets.push_back(Reply::Gated(rx));
        tx
    }

    /// Answer for existence checks not covered by a queued reply.
    pub fn set_exists(&self, id: u64, exists: bool) {
        self.script.lock().unwrap().exists.insert(id, exists);
    }

    pub fn gate_exists(&self) -> oneshot::Sender<Result<bool>> {
        let (tx, rx) = oneshot::channel();
        self.script.lock().unwrap().exists_replies.push_back(Reply::Gated(rx));
        tx
    }

    pub fn push_recommendations(&self, result: Result<RecommendationResult>) {
        self.script
            .lock()
            .unwrap()
            .recommendations
            .push_back(Reply::Now(result));
    }

    pub fn gate_recommendations(&self) -> oneshot::Sender<Result<RecommendationResult>> {
        let (tx, rx) = oneshot::channel();
        self.script
            .lock()
            .unwrap()
            .recommendations
            .push_back(Reply::Gated(rx));
        tx
    }

    fn record(&self, call: String) -> std::sync::MutexGuard<'_, Script> {
        let mut script = self.script.lock().unwrap();
        script.calls.push(call);
        script
    }
}

#[async_trait]
impl GraphService for FakeService {
    async fn fetch_dataset(&self) -> Result<GraphDataset> {
        let reply = self
            .record("dataset".to_string())
            .datasets
            .pop_front()
            .unwrap_or_else(|| Reply::Now(Ok(sample_dataset())));
        reply.resolve().await
    }

    async fn check_exists(&self, id: UserId) -> Result<bool> {
        let reply = {
            let mut script = self.record(format!("exists:{}", id));
            let fallback = script.exists.get(&id.0).copied().unwrap_or(true);
            script
                .exists_replies
                .pop_front()
                .unwrap_or(Reply::Now(Ok(fallback)))
        };
        reply.resolve().await
    }

    async fn fetch_recommendations(
        &self,
        id: UserId,
        _count: Option<usize>,
    ) -> Result<RecommendationResult> {
        let reply = self
            .record(format!("recommendations:{}", id))
            .recommendations
            .pop_front()
            .unwrap_or_else(|| Reply::Now(Ok(recommendation(id.0, &[]))));
        reply.resolve().await
    }

    async fn fetch_neighbors(&self, id: UserId) -> Result<Vec<UserId>> {
        self.record(format!("neighbors:{}", id));
        Ok(Vec::new())
    }

    async fn shortest_path(&self, start: UserId, end: UserId) -> Result<Vec<UserId>> {
        self.record(format!("path:{}:{}", start, end));
        Ok(vec![start, end])
    }

    async fn communities(&self) -> Result<Vec<Vec<UserId>>> {
        self.record("communities".to_string());
        Ok(Vec::new())
    }

    async fn fetch_stats(&self) -> Result<GraphStats> {
        self.record("stats".to_string());
        Ok(GraphStats {
            num_vertices: 0,
            num_edges: 0,
        })
    }
}

#[derive(Default)]
struct LogInner {
    calls: Vec<&'static str>,
    live: usize,
    sinks: Vec<InteractionSink>,
}

/// Shared view of what recording engines did.
#[derive(Clone, Default)]
pub struct EngineLog(Rc<RefCell<LogInner>>);

impl EngineLog {
    fn push(&self, call: &'static str) {
        self.0.borrow_mut().calls.push(call);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.0.borrow().calls.clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.0.borrow().calls.iter().filter(|c| **c == call).count()
    }

    /// Instances created and not yet destroyed.
    pub fn live_instances(&self) -> usize {
        self.0.borrow().live
    }

    /// The sink handed to the most recently mounted engine.
    pub fn last_sink(&self) -> Option<InteractionSink> {
        self.0.borrow().sinks.last().cloned()
    }
}

#[derive(Default)]
pub struct RecordingFactory {
    log: EngineLog,
    fail_layout: bool,
}

impl RecordingFactory {
    pub fn failing_layout() -> Self {
        Self {
            log: EngineLog::default(),
            fail_layout: true,
        }
    }

    pub fn log(&self) -> EngineLog {
        self.log.clone()
    }
}

impl EngineFactory for RecordingFactory {
    fn create(&self, _container: &ContainerId) -> Result<Box<dyn RenderEngine>> {
        self.log.push("create");
        self.log.0.borrow_mut().live += 1;
        Ok(Box::new(RecordingEngine {
            log: self.log.clone(),
            fail_layout: self.fail_layout,
            highlighted: BTreeSet::new(),
            destroyed: false,
        }))
    }
}

struct RecordingEngine {
    log: EngineLog,
    fail_layout: bool,
    highlighted: BTreeSet<String>,
    destroyed: bool,
}

impl RenderEngine for RecordingEngine {
    fn load(&mut self, _dataset: &GraphDataset) -> Result<()> {
        self.log.push("load");
        Ok(())
    }

    fn run_layout(&mut self) -> Result<()> {
        self.log.push("layout");
        if self.fail_layout {
            return Err(ExplorerError::Visualization("layout exploded".to_string()));
        }
        Ok(())
    }

    fn fit(&mut self) {
        self.log.push("fit");
    }

    fn center(&mut self) {
        self.log.push("center");
    }

    fn register(&mut self, sink: InteractionSink) {
        self.log.push("register");
        self.log.0.borrow_mut().sinks.push(sink);
    }

    fn detach(&mut self) {
        self.log.push("detach");
    }

    fn clear_highlight(&mut self) {
        self.highlighted.clear();
    }

    fn mark_highlight(&mut self, ids: &BTreeSet<String>) {
        self.highlighted.extend(ids.iter().cloned());
    }

    fn highlighted(&self) -> BTreeSet<String> {
        self.highlighted.clone()
    }

    fn destroy(&mut self) {
        if !self.destroyed {
            self.destroyed = true;
            self.log.push("destroy");
            self.log.0.borrow_mut().live -= 1;
        }
    }
}
