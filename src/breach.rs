//! k-anonymity breach lookup against the Pwned Passwords range API.
//!
//! Only the first five hex characters of the password's SHA-1 ever leave
//! the process. The server answers with every suffix in that bucket and the
//! match happens locally.

use std::time::Duration;

use futures::future::join_all;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use tokio_util::sync::CancellationToken;

use crate::config::BreachConfig;
use crate::error::GuardError;

const PREFIX_LEN: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreachCheckResult {
    pub is_pwned: bool,
    /// Times the password appears in the breach corpus.
    pub count: u64,
}

/// One slot of a batch check, flattened for callers that report errors
/// per item instead of handling `Result`s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchEntry {
    pub is_pwned: bool,
    pub count: u64,
    pub error: Option<String>,
}

impl From<Result<BreachCheckResult, GuardError>> for BatchEntry {
    fn from(result: Result<BreachCheckResult, GuardError>) -> Self {
        match result {
            Ok(r) => BatchEntry {
                is_pwned: r.is_pwned,
                count: r.count,
                error: None,
            },
            Err(e) => BatchEntry {
                is_pwned: false,
                count: 0,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Uppercase SHA-1 hex split into the 5-char prefix and 35-char suffix.
pub fn hash_prefix_suffix(password: &str) -> (String, String) {
    let digest = hex::encode_upper(Sha1::digest(password.as_bytes()));
    let (prefix, suffix) = digest.split_at(PREFIX_LEN);
    (prefix.to_string(), suffix.to_string())
}

/// Scans a `SUFFIX:COUNT` body for `suffix`.
///
/// Lines that do not parse are skipped unless they carry the wanted suffix,
/// in which case the response is rejected.
pub fn find_suffix_count(body: &str, suffix: &str) -> Result<Option<u64>, GuardError> {
    for line in body.lines() {
        let Some((candidate, count)) = line.trim().split_once(':') else {
            continue;
        };
        if !candidate.trim().eq_ignore_ascii_case(suffix) {
            continue;
        }
        return count
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| GuardError::MalformedResponse(format!("bad count {:?}", count.trim())));
    }
    Ok(None)
}

pub struct BreachChecker {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl BreachChecker {
    pub fn new(config: &BreachConfig) -> Result<Self, GuardError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()
            .map_err(|e| GuardError::NetworkFailure(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout,
        })
    }

    fn map_request_error(&self, error: reqwest::Error) -> GuardError {
        if error.is_timeout() {
            GuardError::Timeout {
                timeout_ms: self.timeout.as_millis() as u64,
            }
        } else {
            GuardError::NetworkFailure(error.to_string())
        }
    }

    /// Looks the password up by hash prefix.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` for an empty password
    /// - `Timeout`, `NetworkFailure`, `UnexpectedStatus` or
    ///   `MalformedResponse` when the API cannot give an answer
    pub async fn check_password_pwned(
        &self,
        password: &SecretString,
    ) -> Result<BreachCheckResult, GuardError> {
        let pwd = password.expose_secret();
        if pwd.is_empty() {
            return Err(GuardError::InvalidArgument(
                "password must be a non-empty string".to_string(),
            ));
        }

        let (prefix, suffix) = hash_prefix_suffix(pwd);
        let url = format!("{}/range/{}", self.base_url, prefix);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            #[cfg(feature = "tracing")]
            tracing::debug!("Range API returned {} for prefix {}", status, prefix);
            return Err(GuardError::UnexpectedStatus { status });
        }

        let body = response.text().await.map_err(|e| self.map_request_error(e))?;
        let count = find_suffix_count(&body, &suffix)?;

        #[cfg(feature = "tracing")]
        tracing::debug!("Range lookup for prefix {} matched: {}", prefix, count.is_some());

        Ok(match count {
            Some(count) => BreachCheckResult {
                is_pwned: true,
                count,
            },
            None => BreachCheckResult {
                is_pwned: false,
                count: 0,
            },
        })
    }

    /// Same as [`check_password_pwned`](Self::check_password_pwned), abandoned
    /// as soon as `token` is cancelled.
    pub async fn check_password_pwned_cancellable(
        &self,
        password: &SecretString,
        token: CancellationToken,
    ) -> Result<BreachCheckResult, GuardError> {
        tokio::select! {
            biased;
            _ = token.cancelled() => Err(GuardError::Cancelled),
            result = self.check_password_pwned(password) => result,
        }
    }

    /// Checks every password concurrently. Each slot holds its own outcome;
    /// one failure never fails its siblings.
    pub async fn check_passwords_batch(
        &self,
        passwords: &[SecretString],
    ) -> Vec<Result<BreachCheckResult, GuardError>> {
        join_all(passwords.iter().map(|p| self.check_password_pwned(p))).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_prefix_suffix() {
        let (prefix, suffix) = hash_prefix_suffix("password123");
        assert_eq!(prefix, "CBFDA");
        assert_eq!(suffix, "C6008F9CAB4083784CBD1874F76618D2A97");
        assert_eq!(suffix.len(), 35);

        let (prefix, suffix) = hash_prefix_suffix("password");
        assert_eq!(format!("{prefix}{suffix}"), "5BAA61E4C9B93F3F0682250B6CF8331B7EE68FD8");
    }

    #[test]
    fn test_find_suffix_count() {
        let body = "0018A45C4D1DEF81644B54AB7F969B88D65:1\r\n\
                    C6008F9CAB4083784CBD1874F76618D2A97:2254650\r\n\
                    00D4F6E8FA6EECAD2A3AA415EEC418D38EC:2\r\n";
        assert_eq!(
            find_suffix_count(body, "C6008F9CAB4083784CBD1874F76618D2A97").unwrap(),
            Some(2_254_650)
        );
        assert_eq!(find_suffix_count(body, "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF").unwrap(), None);
        assert_eq!(find_suffix_count("", "ABC").unwrap(), None);
    }

    #[test]
    fn test_find_suffix_count_is_case_insensitive() {
        let body = "c6008f9cab4083784cbd1874f76618d2a97:12";
        assert_eq!(
            find_suffix_count(body, "C6008F9CAB4083784CBD1874F76618D2A97").unwrap(),
            Some(12)
        );
    }

    #[test]
    fn test_find_suffix_count_rejects_bad_count_for_match() {
        let body = "garbage line\nABC:notanumber\nDEF:3";
        assert!(matches!(
            find_suffix_count(body, "ABC"),
            Err(GuardError::MalformedResponse(_))
        ));
        assert_eq!(find_suffix_count(body, "DEF").unwrap(), Some(3));
    }

    #[test]
    fn test_batch_entry_from_result() {
        let ok: BatchEntry = Ok(BreachCheckResult { is_pwned: true, count: 7 }).into();
        assert_eq!(ok.error, None);
        assert_eq!(ok.count, 7);

        let err: BatchEntry = Err(GuardError::UnexpectedStatus { status: 503 }).into();
        assert!(!err.is_pwned);
        assert_eq!(err.error.as_deref(), Some("breach API returned status 503"));
    }
}

#[cfg(all(test, feature = "async"))]
mod async_tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PASSWORD123_SUFFIX: &str = "C6008F9CAB4083784CBD1874F76618D2A97";

    fn secret(s: &str) -> SecretString {
        SecretString::new(s.to_string().into())
    }

    fn checker_for(server: &MockServer, timeout: Duration) -> BreachChecker {
        BreachChecker::new(&BreachConfig {
            api_base_url: server.uri(),
            timeout,
            user_agent: "content-guard-tests".to_string(),
        })
        .expect("client")
    }

    fn range_body_with(suffix: &str, count: u64) -> String {
        format!(
            "0018A45C4D1DEF81644B54AB7F969B88D65:1\r\n{suffix}:{count}\r\n00D4F6E8FA6EECAD2A3AA415EEC418D38EC:0\r\n"
        )
    }

    #[tokio::test]
    async fn test_pwned_password_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/range/CBFDA"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(range_body_with(PASSWORD123_SUFFIX, 2_254_650)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let checker = checker_for(&server, Duration::from_secs(10));
        let result = checker.check_password_pwned(&secret("password123")).await.unwrap();

        assert!(result.is_pwned);
        assert_eq!(result.count, 2_254_650);
        assert_eq!(
            crate::severity::categorize_breach_severity(result.count),
            crate::severity::SeverityLevel::Critical
        );
    }

    #[tokio::test]
    async fn test_unknown_password_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(range_body_with(PASSWORD123_SUFFIX, 9)),
            )
            .mount(&server)
            .await;

        let checker = checker_for(&server, Duration::from_secs(10));
        let result = checker
            .check_password_pwned(&secret("a-rather-unusual-passphrase-7731"))
            .await
            .unwrap();

        assert_eq!(result, BreachCheckResult { is_pwned: false, count: 0 });
    }

    #[tokio::test]
    async fn test_only_prefix_leaves_the_process() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(""))
            .mount(&server)
            .await;

        let checker = checker_for(&server, Duration::from_secs(10));
        let password = "password123";
        let (prefix, suffix) = hash_prefix_suffix(password);
        checker.check_password_pwned(&secret(password)).await.unwrap();

        let requests = server.received_requests().await.expect("recording enabled");
        assert_eq!(requests.len(), 1);
        let request = &requests[0];

        assert_eq!(request.url.path(), format!("/range/{prefix}"));
        assert!(request.body.is_empty());

        let full_hash = format!("{prefix}{suffix}");
        let mut exposed = request.url.to_string();
        for (name, value) in request.headers.iter() {
            exposed.push_str(name.as_str());
            exposed.push_str(value.to_str().unwrap_or_default());
        }
        let exposed = exposed.to_uppercase();
        assert!(!exposed.contains(&full_hash));
        assert!(!exposed.contains(&suffix));
        assert!(!exposed.contains(&password.to_uppercase()));

        assert_eq!(
            request.headers.get("user-agent").and_then(|v| v.to_str().ok()),
            Some("content-guard-tests")
        );
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let checker = checker_for(&server, Duration::from_secs(10));
        let err = checker.check_password_pwned(&secret("hunter2")).await.unwrap_err();
        assert!(matches!(err, GuardError::UnexpectedStatus { status: 503 }));
        assert!(err.is_network());
    }

    #[tokio::test]
    async fn test_timeout_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let checker = checker_for(&server, Duration::from_millis(50));
        let err = checker.check_password_pwned(&secret("hunter2")).await.unwrap_err();
        assert!(matches!(err, GuardError::Timeout { timeout_ms: 50 }));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_failure() {
        let checker = BreachChecker::new(&BreachConfig {
            api_base_url: "http://127.0.0.1:1".to_string(),
            timeout: Duration::from_secs(2),
            user_agent: "content-guard-tests".to_string(),
        })
        .unwrap();
        let err = checker.check_password_pwned(&secret("hunter2")).await.unwrap_err();
        assert!(err.is_network());
    }

    #[tokio::test]
    async fn test_empty_password_is_invalid() {
        let server = MockServer::start().await;
        let checker = checker_for(&server, Duration::from_secs(10));
        let err = checker.check_password_pwned(&secret("")).await.unwrap_err();
        assert!(matches!(err, GuardError::InvalidArgument(_)));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_batch_isolates_failures() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/range/CBFDA"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(range_body_with(PASSWORD123_SUFFIX, 2_254_650)),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/range/5BAA6"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let checker = checker_for(&server, Duration::from_secs(10));
        let results = checker
            .check_passwords_batch(&[secret("password123"), secret("password"), secret("")])
            .await;

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().count, 2_254_650);
        assert!(matches!(results[1], Err(GuardError::UnexpectedStatus { status: 500 })));
        assert!(matches!(results[2], Err(GuardError::InvalidArgument(_))));

        let entries: Vec<BatchEntry> = results.into_iter().map(BatchEntry::from).collect();
        assert!(entries[0].error.is_none());
        assert!(entries[1].error.is_some());
    }

    #[tokio::test]
    async fn test_cancelled_lookup() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let checker = checker_for(&server, Duration::from_secs(10));
        let token = CancellationToken::new();
        token.cancel();

        let err = checker
            .check_password_pwned_cancellable(&secret("hunter2"), token)
            .await
            .unwrap_err();
        assert!(matches!(err, GuardError::Cancelled));
    }

    #[tokio::test]
    #[ignore = "hits the live Pwned Passwords API"]
    async fn test_live_password123_is_critical() {
        let checker = BreachChecker::new(&BreachConfig::default()).unwrap();
        let result = checker.check_password_pwned(&secret("password123")).await.unwrap();
        assert!(result.is_pwned);
        assert!(result.count > 1_000_000);
        assert_eq!(
            crate::severity::categorize_breach_severity(result.count),
            crate::severity::SeverityLevel::Critical
        );
    }
}
