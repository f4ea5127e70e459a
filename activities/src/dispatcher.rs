//! Routes requests to their handlers.
//!
//! The registry maps each [`RequestKind`] to one handler and, optionally, the
//! rule set for that kind. It is built once at startup and never mutated, so
//! a [`Dispatcher`] can be shared freely between concurrent requests.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::{
    error::Fault,
    handlers::{
        CreateHandler, DeleteHandler, DetailsHandler, EditHandler, Handler, ListHandler,
        UpdateAttendanceHandler,
    },
    outcome::{FailureCode, Outcome},
    ports::{ActivityStore, UnitOfWork},
    request::{Output, Request, RequestKind, RequestShape, Response},
    validation::{join_violations, RuleSet, Violation},
};

type Validator = Box<dyn Fn(&Request) -> Vec<Violation> + Send + Sync>;

/// A handler with its request and output types erased.
#[async_trait]
trait ErasedHandler: Send + Sync {
    async fn call(
        &self,
        request: Request,
        store: &mut dyn UnitOfWork,
    ) -> Result<Outcome<Response>, Fault>;
}

struct Typed<H>(H);

#[async_trait]
impl<H: Handler> ErasedHandler for Typed<H> {
    async fn call(
        &self,
        request: Request,
        store: &mut dyn UnitOfWork,
    ) -> Result<Outcome<Response>, Fault> {
        let kind = request.kind();
        let request = H::Request::from_request(request).ok_or(Fault::ShapeMismatch(kind))?;
        let outcome = self.0.handle(request, store).await?;
        Ok(outcome.map(Output::into_response))
    }
}

struct Registration {
    handler: Box<dyn ErasedHandler>,
    validator: Option<Validator>,
}

pub struct DispatcherBuilder {
    store: Arc<dyn ActivityStore>,
    registry: HashMap<RequestKind, Registration>,
}

impl DispatcherBuilder {
    /// Register `handler` for its request kind, with optional rules.
    ///
    /// A second registration for the same kind replaces the first.
    pub fn register<H: Handler>(
        mut self,
        handler: H,
        rules: Option<RuleSet<H::Request>>,
    ) -> Self {
        let kind = <H::Request as RequestShape>::KIND;
        let validator = rules.filter(|rules| !rules.is_empty()).map(|rules| {
            Box::new(move |request: &Request| match H::Request::as_shape(request) {
                Some(shape) => rules.validate(shape),
                None => Vec::new(),
            }) as Validator
        });

        let registration = Registration {
            handler: Box::new(Typed(handler)),
            validator,
        };
        if self.registry.insert(kind, registration).is_some() {
            tracing::warn!(%kind, "Replacing previously registered handler");
        }
        self
    }

    pub fn build(self) -> Dispatcher {
        Dispatcher {
            store: self.store,
            registry: self.registry,
        }
    }
}

pub struct Dispatcher {
    store: Arc<dyn ActivityStore>,
    registry: HashMap<RequestKind, Registration>,
}

impl Dispatcher {
    pub fn builder(store: Arc<dyn ActivityStore>) -> DispatcherBuilder {
        DispatcherBuilder {
            store,
            registry: HashMap::new(),
        }
    }

    /// A dispatcher wired with every activity handler and its rules.
    pub fn standard(store: Arc<dyn ActivityStore>) -> Self {
        Self::builder(store)
            .register(ListHandler, None)
            .register(DetailsHandler, None)
            .register(CreateHandler, Some(CreateHandler::rules()))
            .register(EditHandler, Some(EditHandler::rules()))
            .register(DeleteHandler, None)
            .register(UpdateAttendanceHandler, Some(UpdateAttendanceHandler::rules()))
            .build()
    }

    pub fn handles(&self, kind: RequestKind) -> bool {
        self.registry.contains_key(&kind)
    }

    /// Validate and execute `request`.
    ///
    /// Returns `Err` only for faults: an unregistered kind, a store failure,
    /// or `cancel` firing before the handler finished. Dropping the handler
    /// future on cancellation abandons any in-flight store operation.
    #[instrument(name = "dispatch", skip_all, fields(kind = %request.kind()))]
    pub async fn dispatch(
        &self,
        request: Request,
        cancel: &CancellationToken,
    ) -> Result<Outcome<Response>, Fault> {
        let kind = request.kind();
        let registration = self.registry.get(&kind).ok_or(Fault::NoHandler(kind))?;

        if let Some(validator) = &registration.validator {
            let violations = validator(&request);
            if !violations.is_empty() {
                tracing::debug!(?violations, "Request rejected by validation");
                return Ok(Outcome::failure_with(
                    join_violations(&violations),
                    FailureCode::ValidationFailed,
                ));
            }
        }

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(Fault::Cancelled),
            result = self.execute(registration, request) => result,
        };

        match &result {
            Ok(Outcome::Failure(failure)) => tracing::info!(%failure, "Request failed"),
            Err(fault) => tracing::error!(%fault, "Request faulted"),
            Ok(Outcome::Success(_)) => {}
        }
        result
    }

    async fn execute(
        &self,
        registration: &Registration,
        request: Request,
    ) -> Result<Outcome<Response>, Fault> {
        let mut unit = self.store.begin().await?;
        registration.handler.call(request, unit.as_mut()).await
    }

    /// Typed form of [`dispatch`](Self::dispatch).
    pub async fn send<R: RequestShape>(
        &self,
        request: R,
        cancel: &CancellationToken,
    ) -> Result<Outcome<R::Output>, Fault> {
        match self.dispatch(request.into_request(), cancel).await? {
            Outcome::Success(response) => R::Output::from_response(response)
                .map(Outcome::success)
                .ok_or(Fault::ShapeMismatch(R::KIND)),
            Outcome::Failure(failure) => Ok(Outcome::Failure(failure)),
        }
    }
}
