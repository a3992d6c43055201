//! # Mock Supervisor
//!
//! A [`ProcessSupervisor`] that starts nothing. Queue the outcomes you want with
//! [`MockSupervisor::expect_execute`], run the code under test, then inspect
//! [`MockSupervisor::received`] and call [`MockSupervisor::verify`].
//!
//! ```ignore
//! let mock = MockSupervisor::new();
//! mock.expect_execute().return_ok(LaunchReport::default());
//!
//! launch(&orchestrator, &args, &mock).await?;
//!
//! assert_eq!(mock.received()[0].len(), 4);
//! mock.verify();
//! ```

use super::{LaunchReport, ProcessSupervisor, SupervisorError};
use crate::model::LaunchPlan;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

type Expectations = Arc<Mutex<VecDeque<Result<LaunchReport, SupervisorError>>>>;

/// Records every plan it is asked to execute and answers from a queue of
/// expectations. An `execute` call with an empty queue panics.
#[derive(Default)]
pub struct MockSupervisor {
    expectations: Expectations,
    received: Arc<Mutex<Vec<LaunchPlan>>>,
}

impl MockSupervisor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expects one more `execute` call.
    pub fn expect_execute(&self) -> ExecuteExpectationBuilder {
        ExecuteExpectationBuilder {
            expectations: self.expectations.clone(),
        }
    }

    /// Plans received so far, in call order.
    pub fn received(&self) -> Vec<LaunchPlan> {
        self.received.lock().unwrap().clone()
    }

    /// Panics unless every expectation was consumed.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }
}

#[async_trait]
impl ProcessSupervisor for MockSupervisor {
    async fn execute(&self, plan: LaunchPlan) -> Result<LaunchReport, SupervisorError> {
        self.received.lock().unwrap().push(plan);
        let next = self.expectations.lock().unwrap().pop_front();
        match next {
            Some(response) => response,
            None => panic!("Unexpected execute call"),
        }
    }
}

/// Builder for `execute` expectations.
pub struct ExecuteExpectationBuilder {
    expectations: Expectations,
}

impl ExecuteExpectationBuilder {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, report: LaunchReport) {
        self.expectations.lock().unwrap().push_back(Ok(report));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: SupervisorError) {
        self.expectations.lock().unwrap().push_back(Err(error));
    }
}
