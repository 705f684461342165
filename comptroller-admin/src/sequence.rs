//! Strictly ordered execution of fallible async operations.

use std::future::Future;

use tracing::debug;

/// Runs `ops` strictly one after another and returns their outputs in input
/// order.
///
/// Proposal submissions must not be interleaved: the relay service assumes
/// it sees a batch in nonce order, so the next operation is not started
/// until the previous one has fully resolved. This is the end-to-end
/// counterpart of the synchronous nonce allocation in
/// [`crate::ProposalPipeline`], covering the network round trip as well.
///
/// Fail-fast: the first error halts execution, operations after it never
/// start, and results collected so far are dropped with the overall call.
pub async fn execute_serially<I, F, T, E>(ops: I) -> Result<Vec<T>, E>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Result<T, E>>,
{
    let mut results = Vec::new();
    for (index, op) in ops.into_iter().enumerate() {
        debug!(index, "running serial operation");
        results.push(op.await?);
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::pin::Pin;
    use std::sync::Arc;
    use std::time::Duration;

    use parking_lot::Mutex;
    use tokio::time::sleep;

    type Op<T> = Pin<Box<dyn Future<Output = Result<T, &'static str>>>>;

    #[tokio::test]
    async fn results_are_in_input_order_despite_uneven_latency() {
        // The first operation is much slower than the second; with any
        // interleaving the second would finish first.
        let ops: Vec<Op<&str>> = vec![
            Box::pin(async {
                sleep(Duration::from_millis(30)).await;
                Ok("a")
            }),
            Box::pin(async { Ok("b") }),
        ];
        assert_eq!(execute_serially(ops).await.unwrap(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn later_op_does_not_start_before_earlier_op_finishes() {
        let events: Arc<Mutex<Vec<&'static str>>> = Arc::new(Mutex::new(Vec::new()));

        let slow_events = events.clone();
        let fast_events = events.clone();
        let ops: Vec<Op<()>> = vec![
            Box::pin(async move {
                slow_events.lock().push("slow start");
                sleep(Duration::from_millis(30)).await;
                slow_events.lock().push("slow end");
                Ok(())
            }),
            Box::pin(async move {
                fast_events.lock().push("fast start");
                Ok(())
            }),
        ];

        execute_serially(ops).await.unwrap();
        assert_eq!(
            *events.lock(),
            vec!["slow start", "slow end", "fast start"]
        );
    }

    #[tokio::test]
    async fn failure_halts_subsequent_operations() {
        let started = Arc::new(Mutex::new(0usize));

        let started_inner = started.clone();
        let ops: Vec<Op<()>> = vec![
            Box::pin(async { Err("boom") }),
            Box::pin(async move {
                *started_inner.lock() += 1;
                Ok(())
            }),
        ];

        let result = execute_serially(ops).await;
        assert_eq!(result.unwrap_err(), "boom");
        assert_eq!(*started.lock(), 0);
    }
}
