//! Source verification of freshly deployed implementations.

use std::sync::Arc;

use derive_new::new;
use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::retry::RetryPolicy;
use crate::sequence::execute_serially;
use crate::traits::{VerificationService, VerifyOutcome, VerifyRequest};
use crate::{AdminError, AdminResult};

/// Attempt budget for verification. The indexers behind the API lag freshly
/// broadcast deployments, so the first attempts routinely fail with
/// "unable to locate contract".
const VERIFY_MAX_ATTEMPTS: usize = 10;

/// Retries verification requests and absorbs the two benign outcomes.
pub struct Verifier<V> {
    service: V,
    retry: RetryPolicy,
}

impl<V: VerificationService> Verifier<V> {
    /// A verifier with the default generous attempt budget.
    pub fn new(service: V) -> Self {
        Self {
            service,
            retry: RetryPolicy::new("try verify", VERIFY_MAX_ATTEMPTS),
        }
    }

    /// Override the retry policy; primarily for tests.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Request verification of one deployed contract.
    ///
    /// "Already verified" is idempotent success. Oversized constructor
    /// arguments are a known service limitation, logged as a skipped
    /// verification rather than raised. Anything else is retried up to the
    /// budget and then propagated.
    #[instrument(skip_all, fields(address = ?request.address, contract = %request.contract))]
    pub async fn try_verify(&self, request: &VerifyRequest) -> AdminResult<()> {
        let outcome = self.retry.run(|| self.service.verify(request)).await?;
        match outcome {
            VerifyOutcome::Verified => info!("verification submitted"),
            VerifyOutcome::AlreadyVerified => info!("already verified"),
            VerifyOutcome::ConstructorArgsTooLong => warn!(
                address = ?request.address,
                "constructor arguments exceed the service's accepted length, \
                 skipping verification"
            ),
        }
        Ok(())
    }

    /// Verify a batch of deployments one at a time, in order, halting on the
    /// first genuine failure. The verification API rate-limits aggressively,
    /// so requests are never issued concurrently.
    pub async fn try_verify_all(&self, requests: &[VerifyRequest]) -> AdminResult<()> {
        execute_serially(requests.iter().map(|request| self.try_verify(request))).await?;
        Ok(())
    }
}

/// Etherscan-compatible verification API client.
///
/// This is the single place that looks at the service's response strings;
/// everything downstream sees a [`VerifyOutcome`].
#[derive(Debug, Clone, new)]
pub struct EtherscanVerifier {
    http: Arc<reqwest::Client>,
    /// E.g. `https://api.etherscan.io/api`.
    api_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct EtherscanResponse {
    status: String,
    result: String,
}

#[async_trait::async_trait]
impl VerificationService for EtherscanVerifier {
    async fn verify(&self, request: &VerifyRequest) -> AdminResult<VerifyOutcome> {
        // "constructorArguements" is the API's own spelling.
        let form = [
            ("apikey", self.api_key.as_str()),
            ("module", "contract"),
            ("action", "verifysourcecode"),
            ("codeformat", "solidity-standard-json-input"),
        ];
        let address = format!("{:?}", request.address);
        let dynamic = [
            ("contractaddress", address.as_str()),
            ("sourceCode", request.source_code.as_str()),
            ("contractname", request.contract.as_str()),
            ("compilerversion", request.compiler_version.as_str()),
            ("constructorArguements", request.constructor_arguments.as_str()),
        ];

        let res = self
            .http
            .post(&self.api_url)
            .form(&[&form[..], &dynamic[..]].concat())
            .send()
            .await?;
        let body: EtherscanResponse = res.json().await?;

        classify(&body.status, &body.result)
    }
}

fn classify(status: &str, result: &str) -> AdminResult<VerifyOutcome> {
    let lowered = result.to_lowercase();
    if lowered.contains("already verified") {
        return Ok(VerifyOutcome::AlreadyVerified);
    }
    if lowered.contains("constructor arguments exceeds max accepted") {
        return Ok(VerifyOutcome::ConstructorArgsTooLong);
    }
    if status == "1" {
        return Ok(VerifyOutcome::Verified);
    }
    Err(AdminError::Verification {
        message: result.to_string(),
    })
}
