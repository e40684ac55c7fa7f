//! Remote sync gateway: translates store mutation intents into REST
//! calls against `/api/{transactions,categories,budgets,savings}` and
//! applies the responses to a [`Store`] passed by reference.
//!
//! Two named failure policies govern every operation:
//!
//! - **ReadFailureIsSilent** — a failed `fetch_*` returns `None`,
//!   leaves the collection exactly as it was, and logs at `warn`.
//!   The caller always has some (possibly stale) data to show.
//! - **WriteFailureIsReported** — create/update/delete return the
//!   parsed error body as a [`ClientError`] and leave the store
//!   untouched.
//!
//! No retries, no cancellation beyond reqwest defaults; a failed
//! request reports once to its caller.

use api_types::{
    Deleted, EntityId, ErrorResponse,
    budget::{Budget, BudgetNew},
    category::{Category, CategoryNew},
    savings::{SavingsGoal, SavingsGoalNew},
    transaction::{Transaction, TransactionNew},
};
use reqwest::Url;
use serde::{Serialize, de::DeserializeOwned};
use store::{Collection, Record, Store};
use thiserror::Error;

const TRANSACTIONS: &str = "api/transactions";
const CATEGORIES: &str = "api/categories";
const BUDGETS: &str = "api/budgets";
const SAVINGS: &str = "api/savings";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("server error: {0}")]
    Server(String),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
}

impl Client {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url)
            .map_err(|err| ClientError::Config(format!("invalid base_url: {err}")))?;
        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|err| ClientError::Config(format!("invalid endpoint {path}: {err}")))
    }

    async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ClientError> {
        let res = self.http.get(self.endpoint(path)?).send().await?;
        if res.status().is_success() {
            return Ok(res.json::<Vec<T>>().await?);
        }
        Err(error_for_response(res).await)
    }

    async fn post_json<P, T>(&self, path: &str, payload: &P) -> Result<T, ClientError>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let res = self
            .http
            .post(self.endpoint(path)?)
            .json(payload)
            .send()
            .await?;
        if res.status().is_success() {
            return Ok(res.json::<T>().await?);
        }
        Err(error_for_response(res).await)
    }

    async fn put_json<P, T>(&self, path: &str, payload: &P) -> Result<T, ClientError>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let res = self
            .http
            .put(self.endpoint(path)?)
            .json(payload)
            .send()
            .await?;
        if res.status().is_success() {
            return Ok(res.json::<T>().await?);
        }
        Err(error_for_response(res).await)
    }

    async fn delete_path(&self, path: &str) -> Result<(), ClientError> {
        let res = self.http.delete(self.endpoint(path)?).send().await?;
        if res.status().is_success() {
            // 2xx delete bodies are ignored.
            return Ok(());
        }
        Err(error_for_response(res).await)
    }

    /// Issues the four collection GETs concurrently and applies each
    /// successful response to its own collection, one at a time.
    pub async fn load_all(&self, store: &mut Store) {
        let (transactions, categories, budgets, savings) = tokio::join!(
            self.get_list::<Transaction>(TRANSACTIONS),
            self.get_list::<Category>(CATEGORIES),
            self.get_list::<Budget>(BUDGETS),
            self.get_list::<SavingsGoal>(SAVINGS),
        );
        apply_fetched(&mut store.transactions, transactions, "transactions");
        apply_fetched(&mut store.categories, categories, "categories");
        apply_fetched(&mut store.budgets, budgets, "budgets");
        apply_fetched(&mut store.savings, savings, "savings");
    }

    // Transactions.

    pub async fn fetch_transactions(&self, store: &mut Store) -> Option<Vec<Transaction>> {
        fetch_into(
            self.get_list(TRANSACTIONS).await,
            &mut store.transactions,
            "transactions",
        )
    }

    pub async fn create_transaction(
        &self,
        store: &mut Store,
        payload: &TransactionNew,
    ) -> Result<Transaction, ClientError> {
        let created: Transaction = self.post_json(TRANSACTIONS, payload).await?;
        store.transactions.insert(created.clone());
        Ok(created)
    }

    pub async fn update_transaction(
        &self,
        store: &mut Store,
        tx: &Transaction,
    ) -> Result<Transaction, ClientError> {
        let updated: Transaction = self
            .put_json(&format!("{TRANSACTIONS}/{}", tx.id), tx)
            .await?;
        store.transactions.replace_one(updated.clone());
        Ok(updated)
    }

    pub async fn delete_transaction(
        &self,
        store: &mut Store,
        id: EntityId,
    ) -> Result<Deleted, ClientError> {
        self.delete_path(&format!("{TRANSACTIONS}/{id}")).await?;
        store.transactions.remove(id);
        Ok(Deleted { success: true })
    }

    // Categories.

    pub async fn fetch_categories(&self, store: &mut Store) -> Option<Vec<Category>> {
        fetch_into(
            self.get_list(CATEGORIES).await,
            &mut store.categories,
            "categories",
        )
    }

    pub async fn create_category(
        &self,
        store: &mut Store,
        payload: &CategoryNew,
    ) -> Result<Category, ClientError> {
        let created: Category = self.post_json(CATEGORIES, payload).await?;
        store.categories.insert(created.clone());
        Ok(created)
    }

    pub async fn update_category(
        &self,
        store: &mut Store,
        category: &Category,
    ) -> Result<Category, ClientError> {
        let updated: Category = self
            .put_json(&format!("{CATEGORIES}/{}", category.id), category)
            .await?;
        store.categories.replace_one(updated.clone());
        Ok(updated)
    }

    /// Deleting a category may leave transactions with dangling
    /// references; the remedy is a full transaction reload under the
    /// silent-read policy, never a client-side cascade.
    pub async fn delete_category(
        &self,
        store: &mut Store,
        id: EntityId,
    ) -> Result<Deleted, ClientError> {
        self.delete_path(&format!("{CATEGORIES}/{id}")).await?;
        store.categories.remove(id);
        let _ = self.fetch_transactions(store).await;
        Ok(Deleted { success: true })
    }

    // Budgets.

    pub async fn fetch_budgets(&self, store: &mut Store) -> Option<Vec<Budget>> {
        fetch_into(self.get_list(BUDGETS).await, &mut store.budgets, "budgets")
    }

    pub async fn create_budget(
        &self,
        store: &mut Store,
        payload: &BudgetNew,
    ) -> Result<Budget, ClientError> {
        let created: Budget = self.post_json(BUDGETS, payload).await?;
        store.budgets.insert(created.clone());
        Ok(created)
    }

    pub async fn update_budget(
        &self,
        store: &mut Store,
        budget: &Budget,
    ) -> Result<Budget, ClientError> {
        let updated: Budget = self
            .put_json(&format!("{BUDGETS}/{}", budget.id), budget)
            .await?;
        store.budgets.replace_one(updated.clone());
        Ok(updated)
    }

    pub async fn delete_budget(
        &self,
        store: &mut Store,
        id: EntityId,
    ) -> Result<Deleted, ClientError> {
        self.delete_path(&format!("{BUDGETS}/{id}")).await?;
        store.budgets.remove(id);
        Ok(Deleted { success: true })
    }

    // Savings goals.

    pub async fn fetch_savings(&self, store: &mut Store) -> Option<Vec<SavingsGoal>> {
        fetch_into(self.get_list(SAVINGS).await, &mut store.savings, "savings")
    }

    pub async fn create_savings_goal(
        &self,
        store: &mut Store,
        payload: &SavingsGoalNew,
    ) -> Result<SavingsGoal, ClientError> {
        let created: SavingsGoal = self.post_json(SAVINGS, payload).await?;
        store.savings.insert(created.clone());
        Ok(created)
    }

    pub async fn update_savings_goal(
        &self,
        store: &mut Store,
        goal: &SavingsGoal,
    ) -> Result<SavingsGoal, ClientError> {
        let updated: SavingsGoal = self
            .put_json(&format!("{SAVINGS}/{}", goal.id), goal)
            .await?;
        store.savings.replace_one(updated.clone());
        Ok(updated)
    }

    pub async fn delete_savings_goal(
        &self,
        store: &mut Store,
        id: EntityId,
    ) -> Result<Deleted, ClientError> {
        self.delete_path(&format!("{SAVINGS}/{id}")).await?;
        store.savings.remove(id);
        Ok(Deleted { success: true })
    }
}

/// ReadFailureIsSilent: a successful fetch replaces the collection and
/// hands the records back; a failed one leaves it untouched and logs.
fn fetch_into<T: Record + Clone>(
    result: Result<Vec<T>, ClientError>,
    collection: &mut Collection<T>,
    entity: &str,
) -> Option<Vec<T>> {
    match result {
        Ok(records) => {
            collection.replace_all(records.clone());
            tracing::debug!(count = records.len(), "loaded {entity}");
            Some(records)
        }
        Err(err) => {
            tracing::warn!("fetching {entity} failed: {err}");
            None
        }
    }
}

fn apply_fetched<T: Record>(
    collection: &mut Collection<T>,
    result: Result<Vec<T>, ClientError>,
    entity: &str,
) {
    match result {
        Ok(records) => {
            tracing::debug!(count = records.len(), "loaded {entity}");
            collection.replace_all(records);
        }
        Err(err) => tracing::warn!("fetching {entity} failed: {err}"),
    }
}

async fn error_for_response(res: reqwest::Response) -> ClientError {
    let status = res.status();
    let body = res
        .json::<ErrorResponse>()
        .await
        .map(|err| err.error)
        .unwrap_or_else(|_| "unknown error".to_string());

    match status.as_u16() {
        401 => ClientError::Unauthorized,
        403 => ClientError::Forbidden(body),
        404 => ClientError::NotFound(body),
        400 | 422 => ClientError::Validation(body),
        _ => ClientError::Server(body),
    }
}
