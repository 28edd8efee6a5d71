use tracing::Span;

use crate::config::RlnConfig;
use crate::engine::{MembershipEngine, SharedEngine, SharedRoots};
use crate::errors::{ConfigError, SpamHandlerError};
use crate::signal::to_rln_signal;
use crate::types::{Epoch, Message, MessageValidationResult, RateLimitProof};

/// Callback run for every message classified as spam.
pub type SpamHandler = Box<dyn Fn(&Message) -> Result<(), SpamHandlerError> + Send + Sync>;

/// Classifies inbound messages by their rate-limit proof.
///
/// Cheap local checks (epoch distance, root window) run before the engine is
/// asked to verify anything, so stale or foreign proofs never cost a
/// verification.
pub struct RlnValidator<E> {
    engine: SharedEngine<E>,
    roots: SharedRoots,
    config: RlnConfig,
    max_epoch_gap: u64,
    spam_handler: Option<SpamHandler>,
    span: Span,
}

impl<E: MembershipEngine> RlnValidator<E> {
    /// The window behind `roots` must have been built for `config`
    /// (see [`MerkleRootTracker::from_config`](crate::MerkleRootTracker::from_config)).
    pub fn new(
        engine: SharedEngine<E>,
        roots: SharedRoots,
        config: RlnConfig,
        parent: &Span,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let actual = roots.read().capacity();
        if actual != config.root_window_size {
            return Err(ConfigError::RootWindowMismatch {
                configured: config.root_window_size,
                actual,
            });
        }
        Ok(Self {
            engine,
            roots,
            max_epoch_gap: config.max_epoch_gap(),
            config,
            spam_handler: None,
            span: tracing::info_span!(parent: parent, "rln_validator"),
        })
    }

    #[must_use]
    pub fn with_spam_handler(mut self, handler: SpamHandler) -> Self {
        self.spam_handler = Some(handler);
        self
    }

    #[must_use]
    pub const fn max_epoch_gap(&self) -> u64 {
        self.max_epoch_gap
    }

    /// Classify `msg`. Returns `None` when no proof is attached; what to do
    /// with proof-less messages is the caller's decision.
    ///
    /// `now` overrides the local epoch; `None` reads the system clock.
    pub fn validate_message(
        &self,
        msg: &Message,
        now: Option<Epoch>,
    ) -> Option<MessageValidationResult> {
        let proof = msg.rate_limit_proof.as_ref()?;
        let signal = to_rln_signal(&msg.payload, &msg.content_topic);
        let result = self.validate_proof(proof, &signal, now);

        if result == MessageValidationResult::Spam {
            if let Some(handler) = &self.spam_handler {
                if let Err(e) = handler(msg) {
                    tracing::error!(parent: &self.span, error = %e, "spam handler");
                }
            }
        }
        Some(result)
    }

    /// Classify a proof against the exact signal it should be bound to.
    pub fn validate_proof(
        &self,
        proof: &RateLimitProof,
        signal: &[u8],
        now: Option<Epoch>,
    ) -> MessageValidationResult {
        let local = now.unwrap_or_else(|| Epoch::current(self.config.epoch_unit_seconds));
        let gap = proof.epoch.distance(&local);
        if gap > self.max_epoch_gap {
            tracing::debug!(
                parent: &self.span,
                proof_epoch = proof.epoch.as_u64(),
                local_epoch = local.as_u64(),
                gap,
                "invalid message: epoch gap exceeds tolerance"
            );
            return MessageValidationResult::Invalid;
        }

        if !self.roots.read().contains(&proof.merkle_root) {
            tracing::debug!(
                parent: &self.span,
                root = %proof.merkle_root,
                "invalid message: unacceptable merkle root"
            );
            return MessageValidationResult::Invalid;
        }

        let engine = self.engine.read();
        match engine.verify(proof, signal) {
            Ok(true) => {}
            Ok(false) => {
                tracing::debug!(
                    parent: &self.span,
                    nullifier = %proof.nullifier,
                    "invalid message: proof rejected"
                );
                return MessageValidationResult::Invalid;
            }
            Err(e) => {
                tracing::error!(parent: &self.span, error = %e, "verifying rate limit proof");
                return MessageValidationResult::Error;
            }
        }

        match engine.rate_exceeded(proof) {
            Ok(false) => MessageValidationResult::Valid,
            Ok(true) => {
                tracing::info!(
                    parent: &self.span,
                    nullifier = %proof.nullifier,
                    epoch = proof.epoch.as_u64(),
                    "spam message: rate limit exceeded"
                );
                MessageValidationResult::Spam
            }
            Err(e) => {
                tracing::error!(parent: &self.span, error = %e, "checking message rate");
                MessageValidationResult::Error
            }
        }
    }
}
