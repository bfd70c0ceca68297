//! In-memory stand-ins for the external stores, shared by the stage tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use supply_chain_repository::{SearchEngineClient, SearchError, SourceError, TableSource};
use supply_chain_shared::{Document, Table};

/// Table source returning a fixed table, optionally failing the first calls.
pub struct MockTableSource {
    table: Table,
    failures_left: AtomicUsize,
    pub calls: AtomicUsize,
}

impl MockTableSource {
    pub fn new(table: Table) -> Self {
        Self::failing(table, 0)
    }

    /// Fail the first `failures` fetches with a connection error.
    pub fn failing(table: Table, failures: usize) -> Self {
        Self {
            table,
            failures_left: AtomicUsize::new(failures),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl TableSource for MockTableSource {
    async fn fetch_table(&self) -> Result<Table, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let remaining = self.failures_left.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures_left.store(remaining - 1, Ordering::SeqCst);
            return Err(SourceError::connection("Mock connection refused"));
        }
        Ok(self.table.clone())
    }
}

type RejectFn = Box<dyn Fn(&Document) -> bool + Send + Sync>;

/// Search client that keeps submitted documents in memory.
///
/// Like the real engine it assigns a fresh identifier to every submission,
/// so duplicates are stored twice.
pub struct MockSearchClient {
    pub documents: Mutex<Vec<(String, Document)>>,
    reject: RejectFn,
    healthy: bool,
    next_id: AtomicUsize,
    pub refreshes: AtomicUsize,
}

impl MockSearchClient {
    pub fn new() -> Self {
        Self::rejecting(|_| false)
    }

    /// Reject every document for which `reject` returns true.
    pub fn rejecting(reject: impl Fn(&Document) -> bool + Send + Sync + 'static) -> Self {
        Self {
            documents: Mutex::new(Vec::new()),
            reject: Box::new(reject),
            healthy: true,
            next_id: AtomicUsize::new(0),
            refreshes: AtomicUsize::new(0),
        }
    }

    /// A client whose ping reports the engine as down.
    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            ..Self::new()
        }
    }

    pub async fn stored(&self) -> Vec<Document> {
        self.documents
            .lock()
            .await
            .iter()
            .map(|(_, doc)| doc.clone())
            .collect()
    }
}

#[async_trait]
impl SearchEngineClient for MockSearchClient {
    async fn index_document(&self, document: &Document) -> Result<String, SearchError> {
        if (self.reject)(document) {
            return Err(SearchError::index("Mock failure"));
        }
        let id = format!("doc-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        self.documents
            .lock()
            .await
            .push((id.clone(), document.clone()));
        Ok(id)
    }

    async fn health_check(&self) -> Result<bool, SearchError> {
        Ok(self.healthy)
    }

    async fn refresh_index(&self) -> Result<(), SearchError> {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn count_documents(&self) -> Result<u64, SearchError> {
        Ok(self.documents.lock().await.len() as u64)
    }
}

/// A raw `supply_chain`-shaped table with a few nulls in the rule columns.
pub fn raw_supply_chain_table() -> Table {
    let columns = [
        "Order Item Id",
        "Customer Fname",
        "Customer Lname",
        "Customer Zipcode",
        "Order Zipcode",
        "Product Description",
        "Order Item Total",
        "Sales per customer (USD)",
    ];
    let rows: [[Option<&str>; 8]; 4] = [
        [Some("180517"), Some("Cally"), Some("Holloway"), Some("725"), None, None, Some("314.64"), Some("314.64")],
        [Some("179254"), Some("Irene"), None, Some("725"), None, None, Some("311.36"), Some("311.36")],
        [Some("179253"), Some("Gillian"), Some("Maldonado"), None, Some("10035"), None, Some("309.72"), Some("309.72")],
        [Some("179252"), Some("Tana"), Some("Tate"), Some("725"), None, Some("Cleats"), Some("304.81"), None],
    ];

    let mut table = Table::new(columns.iter().map(|c| c.to_string()).collect());
    for row in rows {
        table.push_row(row.iter().map(|c| c.map(str::to_string)).collect());
    }
    table
}
