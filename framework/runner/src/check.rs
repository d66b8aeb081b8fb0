use seq_load_core::prelude::{TransportError, TransportResponse};
use std::panic::{catch_unwind, AssertUnwindSafe};

pub type CheckFn = fn(&TransportResponse) -> anyhow::Result<bool>;

#[derive(Debug, Clone, Copy)]
pub enum CheckPredicate {
    /// Passes when the response has exactly this status code.
    Status(u16),
    /// Passes when the function returns `Ok(true)`. Errors and panics fail the check.
    Custom(CheckFn),
}

/// A named success predicate, evaluated against every response.
#[derive(Debug, Clone)]
pub struct Check {
    name: String,
    predicate: CheckPredicate,
}

impl Check {
    pub fn status(name: &str, status_code: u16) -> Self {
        Self {
            name: name.to_string(),
            predicate: CheckPredicate::Status(status_code),
        }
    }

    pub fn custom(name: &str, check: CheckFn) -> Self {
        Self {
            name: name.to_string(),
            predicate: CheckPredicate::Custom(check),
        }
    }

    /// `200-ok`, the check every scenario gets unless it defines its own.
    pub fn ok() -> Self {
        Self::status("200-ok", 200)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Never fails. A transport error, a predicate error or a panicking predicate all count as a
    /// failed check.
    pub fn evaluate(&self, response: &Result<TransportResponse, TransportError>) -> bool {
        let Ok(response) = response else {
            return false;
        };

        match self.predicate {
            CheckPredicate::Status(status_code) => response.status_code == status_code,
            CheckPredicate::Custom(check) => {
                match catch_unwind(AssertUnwindSafe(|| check(response))) {
                    Ok(Ok(passed)) => passed,
                    Ok(Err(e)) => {
                        log::debug!("Check {} could not be evaluated: {e:?}", self.name);
                        false
                    }
                    Err(_) => {
                        log::warn!("Check {} panicked, counting it as failed", self.name);
                        false
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use bytes::Bytes;
    use std::time::Duration;

    fn response(status_code: u16, body: &'static str) -> Result<TransportResponse, TransportError> {
        Ok(TransportResponse {
            status_code,
            body: Bytes::from_static(body.as_bytes()),
            latency: Duration::from_millis(1),
        })
    }

    fn has_hits(response: &TransportResponse) -> anyhow::Result<bool> {
        let body: serde_json::Value =
            serde_json::from_slice(&response.body).context("Response is not JSON")?;
        Ok(body.get("hits").is_some())
    }

    #[test]
    fn status_check() {
        let check = Check::ok();

        assert!(check.evaluate(&response(200, "")));
        assert!(!check.evaluate(&response(500, "")));
    }

    #[test]
    fn transport_error_fails_every_check() {
        let failed = Err(TransportError::Connect("refused".to_string()));

        assert!(!Check::ok().evaluate(&failed));
        assert!(!Check::custom("always", |_| Ok(true)).evaluate(&failed));
    }

    #[test]
    fn malformed_body_fails_instead_of_erroring() {
        let check = Check::custom("has-hits", has_hits);

        assert!(check.evaluate(&response(200, r#"{"hits": []}"#)));
        assert!(!check.evaluate(&response(200, "<html>bad gateway</html>")));
    }

    #[test]
    fn panicking_check_fails() {
        let check = Check::custom("panics", |_| panic!("bad predicate"));

        assert!(!check.evaluate(&response(200, "")));
    }
}
