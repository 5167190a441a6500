//! Ledger service operations
//!
//! Implements the three operations of the confidential transfer
//! ledger against a per-invocation [`LedgerState`] handle. The
//! service holds no state of its own beyond injected metrics; every
//! invocation is an independent unit of work whose writes the
//! embedding process commits or discards afterwards.

use crate::{
    error::{Error, Result},
    metrics::Metrics,
    types::{
        parse_balance, QueryRequest, QueryResponse, Response, TransferRequest,
        PRIVATE_BALANCE_NA,
    },
};
use bytes::Bytes;
use state_store::{LedgerState, TransientMap};
use std::time::Instant;

/// Metric labels per operation
const OP_INIT: &str = "init";
const OP_MOVE: &str = "move";
const OP_QUERY: &str = "query";

/// Confidential transfer ledger service
pub struct LedgerService {
    metrics: Metrics,
}

impl LedgerService {
    /// Create a service with injected metrics
    pub fn new(metrics: Metrics) -> Self {
        Self { metrics }
    }

    /// Metrics collected by this service
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Seed two public account balances.
    ///
    /// Expects exactly `[accountA, balanceA, accountB, balanceB]`.
    /// Account A's write may already be pending when B's balance
    /// turns out malformed; nothing is rolled back here, the
    /// enclosing transaction's commit/abort decision settles it.
    pub async fn initialize(&self, state: &dyn LedgerState, args: &[String]) -> Result<Response> {
        self.metrics.record_invocation(OP_INIT);

        let result = self.do_initialize(state, args).await;
        if let Err(ref err) = result {
            tracing::warn!(%err, "Initialize failed");
            self.metrics.record_failure(OP_INIT);
        }

        result
    }

    /// Route an invocation to `query` or `move` by exact name match
    pub async fn invoke(
        &self,
        state: &dyn LedgerState,
        function: &str,
        args: &[String],
        transient: &TransientMap,
    ) -> Result<Response> {
        match function {
            OP_QUERY => {
                self.metrics.record_invocation(OP_QUERY);

                let result = self.query(state, args, transient).await;
                if let Err(ref err) = result {
                    tracing::warn!(%err, "Query failed");
                    self.metrics.record_failure(OP_QUERY);
                }

                result
            }
            OP_MOVE => {
                self.metrics.record_invocation(OP_MOVE);
                let started = Instant::now();

                let result = self.transfer(state, args, transient).await;
                match &result {
                    Ok(_) => {
                        self.metrics
                            .observe_transfer_duration(started.elapsed().as_secs_f64());
                    }
                    Err(err) => {
                        tracing::warn!(%err, "Transfer failed");
                        self.metrics.record_failure(OP_MOVE);
                    }
                }

                result
            }
            other => {
                tracing::warn!(function = other, "Unknown action");
                self.metrics.record_failure(other);
                Err(Error::UnknownAction(other.to_string()))
            }
        }
    }

    async fn do_initialize(&self, state: &dyn LedgerState, args: &[String]) -> Result<Response> {
        if args.len() != 4 {
            return Err(Error::InvalidArgument(
                "Initialization requires 4 parameters \
                 [AccountAName, AccountABalance, AccountBName, AccountBBalance]"
                    .to_string(),
            ));
        }

        let account_a = &args[0];
        let balance_a = parse_balance(&args[1])?;
        tracing::info!(account = %account_a, balance = balance_a, "Initializing public balance");
        state
            .put_state(account_a, Bytes::from(balance_a.to_string()))
            .await?;

        let account_b = &args[2];
        let balance_b = parse_balance(&args[3])?;
        tracing::info!(account = %account_b, balance = balance_b, "Initializing public balance");
        state
            .put_state(account_b, Bytes::from(balance_b.to_string()))
            .await?;

        Ok(Response::empty())
    }

    /// Move value from the source's public balance to the
    /// destination's private balance in the named collection.
    ///
    /// All real parameters arrive via the transient channel; they are
    /// never written to world state and never echoed in the returned
    /// payload, so the replicated transaction record only ever shows
    /// the source account's new public balance.
    async fn transfer(
        &self,
        state: &dyn LedgerState,
        args: &[String],
        transient: &TransientMap,
    ) -> Result<Response> {
        if !args.is_empty() {
            return Err(Error::InvalidArgument(
                "Expecting only one parameter".to_string(),
            ));
        }

        let request = TransferRequest::from_transient(transient)?;
        tracing::debug!(
            collection = %request.collection,
            amount = request.amount,
            "Transfer request validated"
        );

        // Destination private balance; absence (or an empty stored
        // value) reads as zero, never as an error.
        let destination_balance = match state
            .get_private(&request.collection, request.to.as_str())
            .await?
        {
            Some(raw) if !raw.is_empty() => parse_balance(&String::from_utf8_lossy(&raw))?,
            _ => {
                tracing::debug!("No private entry for destination, assuming zero balance");
                0
            }
        };

        let source_raw = state
            .get_state(request.from.as_str())
            .await?
            .ok_or_else(|| Error::AccountNotFound(request.from.to_string()))?;
        let source_balance = parse_balance(&String::from_utf8_lossy(&source_raw))?;

        // Plain integer arithmetic, no overflow checking, no floor at
        // zero.
        let new_source = source_balance - request.amount;
        let new_destination = destination_balance + request.amount;

        if new_source < 0 {
            tracing::warn!(balance = new_source, "Source public balance driven negative");
        }

        // Private write must precede the public write; the host's
        // read-your-writes simulation depends on this order.
        state
            .put_private(
                &request.collection,
                request.to.as_str(),
                Bytes::from(new_destination.to_string()),
            )
            .await?;
        state
            .put_state(request.from.as_str(), Bytes::from(new_source.to_string()))
            .await?;

        tracing::info!("Transfer completed");

        Ok(Response::with_payload("move succeed"))
    }

    /// Report an account's public balance and, when a collection is
    /// resolved, its private balance there.
    ///
    /// A missing public balance is an error; a missing private entry
    /// is the valid `"N/A"` state. A real store failure on the
    /// private read surfaces as an error rather than being swallowed.
    async fn query(
        &self,
        state: &dyn LedgerState,
        args: &[String],
        transient: &TransientMap,
    ) -> Result<Response> {
        let request = QueryRequest::from_parts(args, transient)?;

        let balance_raw = state
            .get_state(request.account.as_str())
            .await?
            .ok_or_else(|| Error::AccountNotFound(request.account.to_string()))?;
        let balance = String::from_utf8_lossy(&balance_raw).into_owned();

        let private_balance = match &request.collection {
            Some(collection) => match state
                .get_private(collection, request.account.as_str())
                .await?
            {
                Some(raw) => String::from_utf8_lossy(&raw).into_owned(),
                None => PRIVATE_BALANCE_NA.to_string(),
            },
            None => PRIVATE_BALANCE_NA.to_string(),
        };

        let response = QueryResponse {
            name: request.account.to_string(),
            balance,
            private_balance,
        };

        tracing::debug!(account = %response.name, "Query answered");

        Ok(Response::with_payload(serde_json::to_vec(&response)?))
    }
}

impl Default for LedgerService {
    fn default() -> Self {
        Self::new(Metrics::default())
    }
}
