use crate::errors::AppError;
use crate::gateway_client::LeadApiClient;
use crate::models::{DashboardStats, Lead, LeadFilter, NewLead};
use moka::future::Cache;
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::sync::watch;

/// Lifecycle of a cached query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    /// Fetch in flight; the previous value, if any, stays visible.
    Pending,
    /// Last fetch succeeded.
    Fresh,
    /// Last fetch failed; the previous value, if any, stays visible.
    Errored,
}

/// One cached query result. A missing cache entry is the "absent" state.
#[derive(Debug, Clone)]
struct QueryEntry<T> {
    status: QueryStatus,
    value: Option<T>,
    error: Option<String>,
    /// Set by invalidation. A stale entry keeps serving its value to views
    /// but never satisfies a read without a refetch.
    stale: bool,
}

impl<T> QueryEntry<T> {
    fn pending(prior: Option<T>) -> Self {
        Self {
            status: QueryStatus::Pending,
            value: prior,
            error: None,
            stale: false,
        }
    }

    fn fresh(value: T) -> Self {
        Self {
            status: QueryStatus::Fresh,
            value: Some(value),
            error: None,
            stale: false,
        }
    }

    fn errored(error: String, prior: Option<T>) -> Self {
        Self {
            status: QueryStatus::Errored,
            value: prior,
            error: Some(error),
            stale: false,
        }
    }
}

/// Externally visible snapshot of a query, consumed by views.
#[derive(Debug, Clone)]
pub enum QueryState<T> {
    /// Never fetched.
    Absent,
    /// Fetch in flight; `prior` is the last known value, if any.
    Pending { prior: Option<T> },
    /// Last fetch succeeded.
    Fresh { value: T },
    /// Last fetch failed; `prior` is the last known value, if any.
    Errored { error: String, prior: Option<T> },
}

impl<T> QueryState<T> {
    /// The value a view should render right now, fresh or carried over.
    pub fn visible_value(&self) -> Option<&T> {
        match self {
            QueryState::Absent => None,
            QueryState::Pending { prior } => prior.as_ref(),
            QueryState::Fresh { value } => Some(value),
            QueryState::Errored { prior, .. } => prior.as_ref(),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, QueryState::Pending { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            QueryState::Errored { error, .. } => Some(error.as_str()),
            _ => None,
        }
    }
}

impl<T: Clone> From<QueryEntry<T>> for QueryState<T> {
    fn from(entry: QueryEntry<T>) -> Self {
        match entry.status {
            QueryStatus::Pending => QueryState::Pending { prior: entry.value },
            QueryStatus::Fresh => match entry.value {
                Some(value) => QueryState::Fresh { value },
                // A Fresh entry always carries a value; treat the impossible
                // combination as never-fetched.
                None => QueryState::Absent,
            },
            QueryStatus::Errored => QueryState::Errored {
                error: entry.error.unwrap_or_default(),
                prior: entry.value,
            },
        }
    }
}

/// Kind of mutation tracked per target entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    Score,
    Enrich,
    Create,
}

/// Per-(kind, entity) mutation lifecycle. A missing table entry is `Idle`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationState {
    Idle,
    Pending,
    Succeeded,
    Failed(String),
}

/// Result of requesting a mutation through the store.
#[derive(Debug)]
pub enum MutationOutcome {
    /// The backend call completed; the updated entity is attached.
    Completed(Lead),
    /// A mutation of the same kind for the same entity was already in
    /// flight. No second backend call was issued.
    AlreadyPending,
}

/// Process-scoped query/mutation cache.
///
/// Created once at app start and shared behind an `Arc`. Serves cached lead
/// lists, lead details, and dashboard stats; tracks in-flight mutations per
/// (kind, entity id); and marks affected entries stale after a successful
/// mutation. Entries have no expiry beyond process lifetime.
pub struct QueryStore {
    client: LeadApiClient,
    /// Lead list queries, keyed by the filter's canonical key.
    lead_lists: Cache<String, QueryEntry<Vec<Lead>>>,
    /// Lead detail queries, keyed by lead id.
    lead_details: Cache<String, QueryEntry<Lead>>,
    /// Dashboard stats, a singleton query.
    stats: Cache<(), QueryEntry<DashboardStats>>,
    /// In-flight/terminal mutation states. A synchronous mutex keeps the
    /// check-and-set atomic; the guard is never held across an await.
    mutations: Mutex<HashMap<(MutationKind, String), MutationState>>,
    revision_tx: watch::Sender<u64>,
}

impl QueryStore {
    pub fn new(client: LeadApiClient) -> Self {
        let (revision_tx, _) = watch::channel(0);
        tracing::info!("Query store initialized");
        Self {
            client,
            lead_lists: Cache::builder().build(),
            lead_details: Cache::builder().build(),
            stats: Cache::builder().build(),
            mutations: Mutex::new(HashMap::new()),
            revision_tx,
        }
    }

    /// Subscribe to store changes. The receiver yields a monotonically
    /// increasing revision; every cache or mutation-table change bumps it
    /// after the change is applied, so a woken subscriber always observes
    /// the new state.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision_tx.subscribe()
    }

    fn bump(&self) {
        self.revision_tx.send_modify(|rev| *rev += 1);
    }

    // ============ Queries ============

    /// Lead list query. Returns the cached value when fresh; otherwise
    /// fetches through the gateway, recording pending/fresh/errored state.
    pub async fn leads(&self, filter: &LeadFilter) -> Result<Vec<Lead>, AppError> {
        let key = filter.cache_key();

        let prior = match self.lead_lists.get(&key).await {
            Some(entry) => {
                if entry.status == QueryStatus::Fresh && !entry.stale {
                    if let Some(value) = entry.value {
                        tracing::debug!("Lead list cache hit: {}", key);
                        return Ok(value);
                    }
                }
                entry.value
            }
            None => None,
        };

        self.lead_lists
            .insert(key.clone(), QueryEntry::pending(prior.clone()))
            .await;
        self.bump();

        match self.client.list_leads(filter).await {
            Ok(leads) => {
                self.lead_lists
                    .insert(key, QueryEntry::fresh(leads.clone()))
                    .await;
                self.bump();
                Ok(leads)
            }
            Err(e) => {
                self.lead_lists
                    .insert(key, QueryEntry::errored(e.to_string(), prior))
                    .await;
                self.bump();
                Err(e)
            }
        }
    }

    /// Lead detail query.
    pub async fn lead(&self, id: &str) -> Result<Lead, AppError> {
        let key = id.to_string();

        let prior = match self.lead_details.get(&key).await {
            Some(entry) => {
                if entry.status == QueryStatus::Fresh && !entry.stale {
                    if let Some(value) = entry.value {
                        tracing::debug!("Lead detail cache hit: {}", key);
                        return Ok(value);
                    }
                }
                entry.value
            }
            None => None,
        };

        self.lead_details
            .insert(key.clone(), QueryEntry::pending(prior.clone()))
            .await;
        self.bump();

        match self.client.get_lead(id).await {
            Ok(lead) => {
                self.lead_details
                    .insert(key, QueryEntry::fresh(lead.clone()))
                    .await;
                self.bump();
                Ok(lead)
            }
            Err(e) => {
                self.lead_details
                    .insert(key, QueryEntry::errored(e.to_string(), prior))
                    .await;
                self.bump();
                Err(e)
            }
        }
    }

    /// Dashboard stats query (singleton identity).
    pub async fn stats(&self) -> Result<DashboardStats, AppError> {
        let prior = match self.stats.get(&()).await {
            Some(entry) => {
                if entry.status == QueryStatus::Fresh && !entry.stale {
                    if let Some(value) = entry.value {
                        tracing::debug!("Stats cache hit");
                        return Ok(value);
                    }
                }
                entry.value
            }
            None => None,
        };

        self.stats.insert((), QueryEntry::pending(prior.clone())).await;
        self.bump();

        match self.client.get_stats().await {
            Ok(stats) => {
                self.stats.insert((), QueryEntry::fresh(stats.clone())).await;
                self.bump();
                Ok(stats)
            }
            Err(e) => {
                self.stats
                    .insert((), QueryEntry::errored(e.to_string(), prior))
                    .await;
                self.bump();
                Err(e)
            }
        }
    }

    // ============ Query state snapshots ============

    pub async fn leads_state(&self, filter: &LeadFilter) -> QueryState<Vec<Lead>> {
        match self.lead_lists.get(&filter.cache_key()).await {
            Some(entry) => entry.into(),
            None => QueryState::Absent,
        }
    }

    pub async fn lead_state(&self, id: &str) -> QueryState<Lead> {
        match self.lead_details.get(id).await {
            Some(entry) => entry.into(),
            None => QueryState::Absent,
        }
    }

    pub async fn stats_state(&self) -> QueryState<DashboardStats> {
        match self.stats.get(&()).await {
            Some(entry) => entry.into(),
            None => QueryState::Absent,
        }
    }

    // ============ Mutations ============

    /// Triggers backend scoring for a lead. Concurrent calls for the same id
    /// are rejected with `AlreadyPending` instead of issuing a second
    /// backend request.
    pub async fn score_lead(&self, id: &str) -> Result<MutationOutcome, AppError> {
        self.run_lead_mutation(MutationKind::Score, id).await
    }

    /// Triggers backend enrichment for a lead, with the same per-id
    /// coalescing as scoring.
    pub async fn enrich_lead(&self, id: &str) -> Result<MutationOutcome, AppError> {
        self.run_lead_mutation(MutationKind::Enrich, id).await
    }

    /// Requests creation of a new lead. Keyed by the draft email so a
    /// double-submitted form does not create the lead twice.
    pub async fn create_lead(&self, new_lead: &NewLead) -> Result<MutationOutcome, AppError> {
        let key = (MutationKind::Create, new_lead.email.clone());
        if !self.begin_mutation(&key) {
            tracing::warn!("Create already in flight for {}", new_lead.email);
            return Ok(MutationOutcome::AlreadyPending);
        }

        match self.client.create_lead(new_lead).await {
            Ok(lead) => {
                self.finish_mutation(&key, MutationState::Succeeded);
                // A new lead can appear in any list and shifts the
                // aggregates, so both go stale.
                self.invalidate_lead_lists().await;
                self.invalidate_stats().await;
                self.bump();
                Ok(MutationOutcome::Completed(lead))
            }
            Err(e) => {
                self.finish_mutation(&key, MutationState::Failed(e.to_string()));
                self.bump();
                Err(e)
            }
        }
    }

    async fn run_lead_mutation(
        &self,
        kind: MutationKind,
        id: &str,
    ) -> Result<MutationOutcome, AppError> {
        let key = (kind, id.to_string());
        if !self.begin_mutation(&key) {
            tracing::warn!("{:?} already in flight for lead {}", kind, id);
            return Ok(MutationOutcome::AlreadyPending);
        }

        let result = match kind {
            MutationKind::Score => self.client.score_lead(id).await,
            MutationKind::Enrich => self.client.enrich_lead(id).await,
            MutationKind::Create => {
                return Err(AppError::InternalError(
                    "create is not a per-lead mutation".to_string(),
                ))
            }
        };

        match result {
            Ok(lead) => {
                self.finish_mutation(&key, MutationState::Succeeded);
                // Invalidation happens before the revision bump so a woken
                // subscriber never reads a stale list as fresh.
                self.invalidate_lead_lists().await;
                self.invalidate_lead_detail(id).await;
                self.invalidate_stats().await;
                self.bump();
                Ok(MutationOutcome::Completed(lead))
            }
            Err(e) => {
                // A failed mutation must leave every query cache untouched.
                self.finish_mutation(&key, MutationState::Failed(e.to_string()));
                self.bump();
                Err(e)
            }
        }
    }

    /// Atomically transitions a mutation to pending. Returns false when the
    /// mutation is already pending for this key.
    fn begin_mutation(&self, key: &(MutationKind, String)) -> bool {
        let mut table = self.mutations.lock().expect("mutation table poisoned");
        if table.get(key) == Some(&MutationState::Pending) {
            return false;
        }
        table.insert(key.clone(), MutationState::Pending);
        drop(table);
        self.bump();
        true
    }

    fn finish_mutation(&self, key: &(MutationKind, String), state: MutationState) {
        let mut table = self.mutations.lock().expect("mutation table poisoned");
        table.insert(key.clone(), state);
    }

    /// Current mutation state for a (kind, entity) pair. Views use this to
    /// disable action buttons while their own mutation is pending.
    pub fn mutation_state(&self, kind: MutationKind, id: &str) -> MutationState {
        let table = self.mutations.lock().expect("mutation table poisoned");
        table
            .get(&(kind, id.to_string()))
            .cloned()
            .unwrap_or(MutationState::Idle)
    }

    // ============ Invalidation ============

    /// Marks every lead list entry stale. Values stay visible until the next
    /// read triggers a refetch.
    async fn invalidate_lead_lists(&self) {
        let entries: Vec<(String, QueryEntry<Vec<Lead>>)> = self
            .lead_lists
            .iter()
            .map(|(key, entry)| ((*key).clone(), entry))
            .collect();
        for (key, mut entry) in entries {
            entry.stale = true;
            self.lead_lists.insert(key, entry).await;
        }
    }

    async fn invalidate_lead_detail(&self, id: &str) {
        if let Some(mut entry) = self.lead_details.get(id).await {
            entry.stale = true;
            self.lead_details.insert(id.to_string(), entry).await;
        }
    }

    async fn invalidate_stats(&self) {
        if let Some(mut entry) = self.stats.get(&()).await {
            entry.stale = true;
            self.stats.insert((), entry).await;
        }
    }
}
