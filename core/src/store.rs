//! View-model for the bill screen.
//!
//! # Design
//! `BillStore` owns everything the screen shows: the bill list, the pending
//! form, the search term, the loading flag, the error banner and the sort
//! direction. Every mutation goes through `&mut self`, so operations on one
//! store run one after another and each finishes (reconciling reload
//! included) before the next starts.
//!
//! Mutations that touch the server follow two phases. First a speculative
//! local change is applied and recorded as a `Speculation`. Then
//! `reconcile` settles it according to the operation's `FailurePolicy`:
//! success is promoted by an authoritative reload (create) or simply kept
//! (delete); failure undoes the speculation locally, reloads, and raises the
//! error banner.

use std::fmt;

use chrono::NaiveDate;
use tokio::sync::watch;
use tracing::{error, warn};

use crate::error::{ApiError, FormError};
use crate::form::{BillForm, Field};
use crate::gateway::BillApi;
use crate::types::{Bill, BillId};

/// Prompt shown before a delete goes ahead.
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this bill?";

/// What happens when an operation's server call fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Log it and keep showing the previous list.
    SilentLog,
    /// Undo the optimistic change, reload, and show an error banner.
    SurfaceAndReload,
    /// Log it and show a result computed from the bills already held.
    SilentFallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Load,
    Create,
    Delete,
    Sort,
    Search,
}

impl Operation {
    pub fn policy(self) -> FailurePolicy {
        match self {
            Operation::Load => FailurePolicy::SilentLog,
            Operation::Create | Operation::Delete => FailurePolicy::SurfaceAndReload,
            Operation::Sort | Operation::Search => FailurePolicy::SilentFallback,
        }
    }

    /// Banner text for operations whose failures are surfaced.
    pub fn failure_message(self) -> Option<&'static str> {
        match self {
            Operation::Create => Some("Failed to add bill. Try again."),
            Operation::Delete => Some("Failed to delete bill. Restoring list."),
            _ => None,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Load => "load",
            Operation::Create => "create",
            Operation::Delete => "delete",
            Operation::Sort => "sort",
            Operation::Search => "search",
        })
    }
}

/// How an operation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The server call succeeded and its result is shown.
    Applied,
    /// The server call failed; the previous list is still shown.
    Stale,
    /// The server call failed; a client-side result is shown instead.
    Fallback,
    /// The server call failed; the optimistic change was undone and the
    /// error banner is up.
    RolledBack,
    /// Nothing was sent: blank search term or declined confirmation.
    Skipped,
}

/// An optimistic change waiting for the server's verdict.
#[derive(Debug)]
enum Speculation {
    None,
    Insert(BillId),
    Remove { bill: Bill, index: usize },
}

pub struct BillStore<A> {
    api: A,
    bills: Vec<Bill>,
    form: BillForm,
    search_term: String,
    loading: watch::Sender<bool>,
    error: Option<String>,
    sort_ascending: bool,
}

impl<A: BillApi> BillStore<A> {
    /// An empty store. Call `load` to populate it.
    pub fn new(api: A) -> Self {
        Self {
            api,
            bills: Vec::new(),
            form: BillForm::default(),
            search_term: String::new(),
            loading: watch::channel(false).0,
            error: None,
            sort_ascending: true,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn bills(&self) -> &[Bill] {
        &self.bills
    }

    pub fn form(&self) -> &BillForm {
        &self.form
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }

    /// Follow the loading flag while a load is in flight.
    pub fn loading_updates(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Direction the next client-side sort will use.
    pub fn sort_ascending(&self) -> bool {
        self.sort_ascending
    }

    /// Input-time validation: a rejected value leaves the field untouched.
    pub fn set_field(&mut self, field: Field, value: &str) -> Result<(), FormError> {
        self.form.set(field, value)
    }

    pub fn preview_total(&self) -> String {
        self.form.preview_total()
    }

    pub fn set_search_term(&mut self, term: &str) {
        self.search_term = term.to_string();
    }

    /// Replace the list with the server's. Failures are logged and the
    /// previous list stays.
    pub async fn load(&mut self) -> Outcome {
        self.loading.send_replace(true);
        self.error = None;
        let result = self.api.list_all().await.map(Some);
        self.loading.send_replace(false);
        self.reconcile(Operation::Load, Speculation::None, result)
    }

    /// Submit the pending form.
    ///
    /// A placeholder bill with a temporary id goes to the front of the list
    /// straight away. The form is cleared only when the server accepts it.
    /// Missing required fields reject the submission before anything else
    /// happens.
    pub async fn submit(&mut self) -> Result<Outcome, FormError> {
        let payload = self.form.to_payload()?;
        self.error = None;

        let pending = Bill::pending(&payload);
        let speculation = Speculation::Insert(pending.id.clone());
        self.bills.insert(0, pending);

        let result = self.api.create(&payload).await.map(|_| None);
        let outcome = self.finish(Operation::Create, speculation, result).await;
        if outcome == Outcome::Applied {
            self.form.clear();
        }
        Ok(outcome)
    }

    /// Delete a bill after `confirm` agrees to `DELETE_PROMPT`. `id` matches
    /// a held bill by its wire text.
    pub async fn delete(&mut self, id: &BillId, confirm: impl FnOnce(&str) -> bool) -> Outcome {
        if !confirm(DELETE_PROMPT) {
            return Outcome::Skipped;
        }
        self.error = None;

        let speculation = match self.bills.iter().position(|b| b.id.same_as(id)) {
            Some(index) => Speculation::Remove {
                bill: self.bills.remove(index),
                index,
            },
            None => Speculation::None,
        };

        let result = self.api.delete(id).await.map(|()| None);
        self.finish(Operation::Delete, speculation, result).await
    }

    /// Ask the server for the date-sorted list, sorting locally if that
    /// fails. The direction flips on every call either way.
    pub async fn sort_by_date(&mut self) -> Outcome {
        self.error = None;
        let result = self.api.list_sorted().await.map(Some);
        let outcome = self.finish(Operation::Sort, Speculation::None, result).await;
        self.sort_ascending = !self.sort_ascending;
        outcome
    }

    /// Search by the current search term. Blank terms do nothing.
    pub async fn search(&mut self) -> Outcome {
        let term = self.search_term.trim().to_string();
        if term.is_empty() {
            return Outcome::Skipped;
        }
        self.error = None;
        let result = self.api.list_by_customer(&term).await.map(Some);
        self.finish(Operation::Search, Speculation::None, result).await
    }

    pub async fn search_for(&mut self, term: &str) -> Outcome {
        self.set_search_term(term);
        self.search().await
    }

    /// Clear the search term and banner, then reload.
    pub async fn reset(&mut self) -> Outcome {
        self.search_term.clear();
        self.error = None;
        self.load().await
    }

    /// Reconcile, then reload when the outcome calls for authoritative state.
    async fn finish(
        &mut self,
        op: Operation,
        speculation: Speculation,
        result: Result<Option<Vec<Bill>>, ApiError>,
    ) -> Outcome {
        let outcome = self.reconcile(op, speculation, result);
        let reload = match outcome {
            Outcome::RolledBack => true,
            Outcome::Applied => op == Operation::Create,
            _ => false,
        };
        if reload {
            self.load().await;
        }
        if outcome == Outcome::RolledBack {
            self.error = op.failure_message().map(str::to_string);
        }
        outcome
    }

    /// Settle a server result against local state.
    ///
    /// `Ok(Some(bills))` replaces the list; `Ok(None)` keeps it. Failures
    /// are handled by the operation's policy.
    fn reconcile(
        &mut self,
        op: Operation,
        speculation: Speculation,
        result: Result<Option<Vec<Bill>>, ApiError>,
    ) -> Outcome {
        let err = match result {
            Ok(Some(bills)) => {
                self.bills = bills;
                return Outcome::Applied;
            }
            Ok(None) => return Outcome::Applied,
            Err(e) => e,
        };

        match op.policy() {
            FailurePolicy::SilentLog => {
                warn!(operation = %op, error = %err, "keeping previous bills");
                Outcome::Stale
            }
            FailurePolicy::SurfaceAndReload => {
                error!(operation = %op, error = %err, "rolling back");
                self.discard(speculation);
                Outcome::RolledBack
            }
            FailurePolicy::SilentFallback => {
                warn!(operation = %op, error = %err, "using client-side fallback");
                match op {
                    Operation::Sort => sort_by_date(&mut self.bills, self.sort_ascending),
                    Operation::Search => filter_by_customer(&mut self.bills, self.search_term.trim()),
                    _ => {}
                }
                Outcome::Fallback
            }
        }
    }

    /// Undo a speculation locally so the list is right even if the
    /// following reload fails too.
    fn discard(&mut self, speculation: Speculation) {
        match speculation {
            Speculation::None => {}
            Speculation::Insert(id) => self.bills.retain(|b| b.id != id),
            Speculation::Remove { bill, index } => {
                let index = index.min(self.bills.len());
                self.bills.insert(index, bill);
            }
        }
    }
}

/// Stable in-memory sort by `billDate`. Dates that do not parse sort before
/// all others when ascending and after them when descending.
pub fn sort_by_date(bills: &mut [Bill], ascending: bool) {
    let key = |b: &Bill| NaiveDate::parse_from_str(&b.bill_date, "%Y-%m-%d").ok();
    if ascending {
        bills.sort_by(|a, b| key(a).cmp(&key(b)));
    } else {
        bills.sort_by(|a, b| key(b).cmp(&key(a)));
    }
}

/// Keep bills whose customer name contains `term`, ignoring case.
pub fn filter_by_customer(bills: &mut Vec<Bill>, term: &str) {
    let needle = term.to_lowercase();
    bills.retain(|b| b.customer_name.to_lowercase().contains(&needle));
}
