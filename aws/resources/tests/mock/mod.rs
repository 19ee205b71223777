/*!

In-memory stand-ins for API Gateway and SageMaker. They implement the reconciler's client traits
on top of the same request and response shapes as the SDK adapters, and mimic the service
behavior that the resource kinds depend on: server-side defaults, JSON patch semantics, error
codes and tag storage.

Each mock records the calls it receives and can be told to fail upcoming calls.

!*/

#![allow(dead_code)]

mod apigateway;
mod sagemaker;

pub(crate) use apigateway::MockApiGateway;
pub(crate) use sagemaker::MockSagemaker;

use resource_reconciler::clients::{ApiError, ApiErrorKind, ApiResult};
use std::collections::{HashMap, VecDeque};

/// Call log and failure injection shared by the mocks.
#[derive(Default)]
struct Recorder {
    calls: Vec<&'static str>,
    failures: HashMap<&'static str, VecDeque<(ApiErrorKind, &'static str)>>,
}

impl Recorder {
    fn fail_next(
        &mut self,
        call: &'static str,
        kind: ApiErrorKind,
        code: &'static str,
        times: usize,
    ) {
        self.failures
            .entry(call)
            .or_default()
            .extend(std::iter::repeat((kind, code)).take(times));
    }

    fn record(&mut self, call: &'static str) -> ApiResult<()> {
        self.calls.push(call);
        match self.failures.get_mut(call).and_then(VecDeque::pop_front) {
            Some((kind, code)) => Err(ApiError::new_with_message(
                kind,
                Some(code),
                format!("injected failure for {}", call),
            )),
            None => Ok(()),
        }
    }

    fn count(&self, call: &str) -> usize {
        self.calls.iter().filter(|c| **c == call).count()
    }
}
