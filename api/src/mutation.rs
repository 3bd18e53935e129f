//! The validated-mutation pipeline shared by every entity kind.
//!
//! Create: validate -> send -> invalidate. Delete: send -> invalidate.
//! The tag is invalidated only after the gateway reports success; a rejected
//! payload never reaches the gateway and a failed call leaves the tag alone.

use crate::cache::{CacheTag, TagRegistry};
use crate::client::{Gateway, GatewayError};
use crate::entity::EntityKind;
use crate::schema::ValidationError;
use log::{debug, warn};
use serde_json::{Map, Value};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Delete,
}

/// Steps a mutation moves through, reported to the debug log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationPhase {
    Validating,
    Rejected,
    Sending,
    Succeeded,
    Failed,
}

#[derive(Debug)]
pub enum MutationError {
    Invalid(ValidationError),
    /// The kind has no create schema (read-only listings).
    NotCreatable(EntityKind),
    Gateway(GatewayError),
}

impl MutationError {
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            MutationError::Invalid(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for MutationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MutationError::Invalid(err) => write!(f, "{err}"),
            MutationError::NotCreatable(kind) => write!(f, "Não é possível criar {kind} por aqui"),
            MutationError::Gateway(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for MutationError {}

impl From<ValidationError> for MutationError {
    fn from(err: ValidationError) -> Self {
        MutationError::Invalid(err)
    }
}

impl From<GatewayError> for MutationError {
    fn from(err: GatewayError) -> Self {
        MutationError::Gateway(err)
    }
}

/// What a settled, successful mutation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationOutcome {
    pub kind: EntityKind,
    pub operation: Operation,
    pub invalidated: CacheTag,
}

#[derive(Debug, Clone)]
pub struct MutationPipeline<G> {
    gateway: G,
    tags: TagRegistry,
}

impl<G: Gateway> MutationPipeline<G> {
    pub fn new(gateway: G, tags: TagRegistry) -> Self {
        Self { gateway, tags }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn tags(&self) -> &TagRegistry {
        &self.tags
    }

    pub async fn create(
        &self,
        kind: EntityKind,
        raw: &Map<String, Value>,
    ) -> Result<MutationOutcome, MutationError> {
        let schema = kind.schema().ok_or(MutationError::NotCreatable(kind))?;

        trace(kind, Operation::Create, MutationPhase::Validating);
        let payload = schema.validate(raw).inspect_err(|err| {
            trace(kind, Operation::Create, MutationPhase::Rejected);
            warn!("rejected {kind} payload: {err}");
        })?;

        trace(kind, Operation::Create, MutationPhase::Sending);
        let sent = self.gateway.create(payload).await;
        self.settle(kind, Operation::Create, sent)
    }

    pub async fn delete(&self, kind: EntityKind, id: &str) -> Result<MutationOutcome, MutationError> {
        trace(kind, Operation::Delete, MutationPhase::Sending);
        let sent = self.gateway.delete(kind, id).await;
        self.settle(kind, Operation::Delete, sent)
    }

    fn settle(
        &self,
        kind: EntityKind,
        operation: Operation,
        sent: Result<(), GatewayError>,
    ) -> Result<MutationOutcome, MutationError> {
        match sent {
            Ok(()) => {
                trace(kind, operation, MutationPhase::Succeeded);
                let tag = kind.tag();
                self.tags.invalidate(tag);
                Ok(MutationOutcome { kind, operation, invalidated: tag })
            }
            Err(err) => {
                trace(kind, operation, MutationPhase::Failed);
                warn!("{operation:?} {kind} failed: {err}");
                Err(err.into())
            }
        }
    }
}

fn trace(kind: EntityKind, operation: Operation, phase: MutationPhase) {
    debug!("{operation:?} {kind}: {phase:?}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ValidPayload;
    use reqwest::StatusCode;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Create(EntityKind, Value),
        Delete(EntityKind, String),
    }

    /// Records every call; fails them all when `failing` is set.
    #[derive(Debug, Clone, Default)]
    struct RecordingGateway {
        calls: Arc<Mutex<Vec<Call>>>,
        failing: bool,
    }

    impl RecordingGateway {
        fn failing() -> Self {
            Self { failing: true, ..Self::default() }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn outcome(&self, url: &str) -> Result<(), GatewayError> {
            if self.failing {
                Err(GatewayError::UnexpectedResponse(StatusCode::BAD_GATEWAY, url.to_owned()))
            } else {
                Ok(())
            }
        }
    }

    impl Gateway for RecordingGateway {
        async fn create(&self, payload: ValidPayload) -> Result<(), GatewayError> {
            let kind = payload.kind();
            self.calls.lock().unwrap().push(Call::Create(kind, Value::Object(payload.into_body())));
            self.outcome(kind.path())
        }

        async fn delete(&self, kind: EntityKind, id: &str) -> Result<(), GatewayError> {
            self.calls.lock().unwrap().push(Call::Delete(kind, id.to_owned()));
            self.outcome(kind.path())
        }
    }

    fn pipeline(gateway: RecordingGateway) -> MutationPipeline<RecordingGateway> {
        let tags = TagRegistry::new();
        for kind in EntityKind::ALL {
            tags.mark_fresh(kind.tag());
        }
        MutationPipeline::new(gateway, tags)
    }

    fn payload(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn invalid_referee_never_reaches_the_gateway() {
        let pipeline = pipeline(RecordingGateway::default());
        let raw = payload(json!({"name": "Jo", "nationalityId": "n1", "dateOfBirth": "2000-01-01"}));

        let err = pipeline.create(EntityKind::Referee, &raw).await.unwrap_err();

        let validation = err.validation().expect("validation error");
        assert_eq!(validation.issues[0].field, "name");
        assert!(pipeline.gateway().calls().is_empty());
        assert!(EntityKind::ALL.iter().all(|k| !pipeline.tags().is_stale(k.tag())));
    }

    #[tokio::test]
    async fn valid_referee_is_posted_once_then_invalidated() {
        let pipeline = pipeline(RecordingGateway::default());
        let raw = payload(json!({
            "name": "João Silva",
            "nationalityId": "n1",
            "dateOfBirth": "2000-01-01",
            "notes": "not part of the schema"
        }));

        let outcome = pipeline.create(EntityKind::Referee, &raw).await.unwrap();

        assert_eq!(
            pipeline.gateway().calls(),
            vec![Call::Create(
                EntityKind::Referee,
                json!({"name": "João Silva", "nationalityId": "n1", "dateOfBirth": "2000-01-01"})
            )]
        );
        assert_eq!(outcome.invalidated.as_str(), "get-referees");
        assert_eq!(outcome.operation, Operation::Create);
        assert!(pipeline.tags().is_stale(EntityKind::Referee.tag()));
        assert!(!pipeline.tags().is_stale(EntityKind::Sport.tag()));
    }

    #[tokio::test]
    async fn failed_create_keeps_the_tag_fresh() {
        let pipeline = pipeline(RecordingGateway::failing());
        let raw = payload(json!({"name": "Futsal", "icon": "ball", "description": "Futebol de salão"}));

        let err = pipeline.create(EntityKind::Sport, &raw).await.unwrap_err();

        assert!(matches!(err, MutationError::Gateway(_)));
        assert_eq!(pipeline.gateway().calls().len(), 1);
        assert!(!pipeline.tags().is_stale(EntityKind::Sport.tag()));
        assert_eq!(pipeline.tags().generation(EntityKind::Sport.tag()), 0);
    }

    #[tokio::test]
    async fn delete_skips_validation_and_invalidates() {
        let pipeline = pipeline(RecordingGateway::default());

        // "s1" would fail any name rule; delete must not care.
        let outcome = pipeline.delete(EntityKind::Sport, "s1").await.unwrap();

        assert_eq!(pipeline.gateway().calls(), vec![Call::Delete(EntityKind::Sport, "s1".into())]);
        assert_eq!(outcome.invalidated, EntityKind::Sport.tag());
        assert!(pipeline.tags().is_stale(EntityKind::Sport.tag()));
    }

    #[tokio::test]
    async fn failed_delete_keeps_the_tag_fresh() {
        let pipeline = pipeline(RecordingGateway::failing());
        let err = pipeline.delete(EntityKind::Club, "c1").await.unwrap_err();
        assert!(matches!(err, MutationError::Gateway(GatewayError::UnexpectedResponse(..))));
        assert!(!pipeline.tags().is_stale(EntityKind::Club.tag()));
    }

    #[tokio::test]
    async fn read_only_kinds_cannot_be_created() {
        let pipeline = pipeline(RecordingGateway::default());
        let err = pipeline.create(EntityKind::Match, &Map::new()).await.unwrap_err();
        assert!(matches!(err, MutationError::NotCreatable(EntityKind::Match)));
        assert!(pipeline.gateway().calls().is_empty());

        // Matches can still be deleted.
        pipeline.delete(EntityKind::Match, "m1").await.unwrap();
    }

    #[tokio::test]
    async fn every_kind_invalidates_its_own_list_tag() {
        for kind in EntityKind::ALL {
            let pipeline = pipeline(RecordingGateway::default());
            let outcome = pipeline.delete(kind, "x").await.unwrap();
            assert_eq!(outcome.invalidated, kind.config().tag);
            let stale: Vec<_> = EntityKind::ALL
                .iter()
                .filter(|k| pipeline.tags().is_stale(k.tag()))
                .copied()
                .collect();
            assert_eq!(stale, vec![kind]);
        }
    }
}
