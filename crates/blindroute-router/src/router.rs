//! The BlindRoute facade.
//!
//! One [`Router`] owns the registry, the match ledger, the ACL and the
//! backend. Every mutating call takes `&mut self` and either completes or
//! fails before any router state is written.
//!
//! ## Routing pipeline
//!
//! ```text
//! route(ticket, need, urgency, proof)
//!   1. ticket already finalized?      → TicketAlreadyExists
//!   2. no active agents?              → NoActiveAgents
//!   3. proof submitter ≠ requester?   → ProofMismatch
//!   4. ingest need[4] + urgency under the one proof
//!   5. encrypted argmax over the index
//!   6. ledger.finalize(ticket, winner)
//!   7. grant winner → {requester, router principal}
//!   8. emit MatchRouted
//! ```

use blindroute_fhe::{
    DecryptionOracle, Euint16, Euint32, ExternalCiphertext, FheBackend, InputProof, MockBackend,
};
use blindroute_ledger::{AclManager, MatchLedger, MatchRecord};
use blindroute_registry::{Agent, AgentRegistry, SkillVector, Transition};
use blindroute_scoring::{RoutingQuery, RoutingReceipt, select_best};
use blindroute_types::constants::{self, SKILL_DIMS};
use blindroute_types::{
    AgentId, BlindRouteError, EventEnvelope, Handle, Principal, Result, RouterConfig, RouterEvent,
    TicketId,
};

use crate::auth::CallerContext;
use crate::sink::{EventSink, MemorySink};

/// Confidential agent router.
pub struct Router<B = MockBackend, S = MemorySink> {
    config: RouterConfig,
    fhe: B,
    registry: AgentRegistry,
    ledger: MatchLedger,
    acl: AclManager,
    sink: S,
}

impl<B: FheBackend, S: EventSink> Router<B, S> {
    /// Build a router from a validated configuration.
    ///
    /// # Errors
    /// Returns `Configuration` if `config` fails validation.
    pub fn new(config: RouterConfig, fhe: B, sink: S) -> Result<Self> {
        config.validate()?;
        tracing::info!(
            engine = constants::ENGINE_NAME,
            version = constants::VERSION,
            owner = %config.owner,
            router_principal = %config.router_principal,
            max_agents = config.max_agents,
            dev_mode = config.dev_mode,
            "Router initialized"
        );
        Ok(Self {
            registry: AgentRegistry::with_capacity(config.max_agents),
            ledger: MatchLedger::new(),
            acl: AclManager::new(),
            config,
            fhe,
            sink,
        })
    }

    // ------------------------------------------------------------------
    // Administrative surface
    // ------------------------------------------------------------------

    /// Register or replace an agent's encrypted skill profile.
    ///
    /// All four skill ciphertexts must be attested by `proof`, and `proof`
    /// must have been produced by the caller.
    ///
    /// # Errors
    /// - `Unauthorized` if the caller is not the owner
    /// - `ProofMismatch` / `CiphertextKindMismatch` on bad inputs
    /// - `CapacityExceeded` if activation needs a new index slot and none is left
    pub fn upsert_agent(
        &mut self,
        caller: &CallerContext,
        agent_id: AgentId,
        skill: &[ExternalCiphertext; SKILL_DIMS],
        proof: &InputProof,
        active: bool,
    ) -> Result<Transition> {
        self.authorize(caller, "upsert_agent")?;
        check_submitter(proof, caller.principal(), &skill[0])?;
        let skill: SkillVector = self.fhe.ingest_all(skill, proof)?;
        self.store_agent(agent_id, skill, active)
    }

    /// [`Router::upsert_agent`] from plaintext skill levels. Dev mode only.
    pub fn upsert_agent_plain(
        &mut self,
        caller: &CallerContext,
        agent_id: AgentId,
        skill: [u16; SKILL_DIMS],
        active: bool,
    ) -> Result<Transition> {
        self.authorize(caller, "upsert_agent_plain")?;
        self.require_dev("upsert_agent_plain")?;
        let skill = self.lift(skill)?;
        self.store_agent(agent_id, skill, active)
    }

    /// Take an active agent out of rotation. Its skill ciphertexts stay.
    ///
    /// # Errors
    /// - `Unauthorized` if the caller is not the owner
    /// - `NotActive` if the agent is unknown or already inactive
    pub fn deactivate_agent(&mut self, caller: &CallerContext, agent_id: AgentId) -> Result<()> {
        self.authorize(caller, "deactivate_agent")?;
        self.registry.deactivate(agent_id)?;
        self.emit(RouterEvent::AgentChanged {
            agent_id,
            active: false,
        });
        tracing::info!(
            agent = %agent_id,
            active_count = self.registry.active_count(),
            "Agent deactivated"
        );
        Ok(())
    }

    /// Rotate the second grantee. Winners already routed keep their grants.
    pub fn set_router_principal(
        &mut self,
        caller: &CallerContext,
        principal: Principal,
    ) -> Result<()> {
        self.authorize(caller, "set_router_principal")?;
        let previous = std::mem::replace(&mut self.config.router_principal, principal);
        self.emit(RouterEvent::RouterPrincipalChanged {
            previous,
            current: principal,
        });
        tracing::info!(%previous, current = %principal, "Router principal rotated");
        Ok(())
    }

    /// Hand administrative control to `new_owner`.
    pub fn transfer_ownership(
        &mut self,
        caller: &CallerContext,
        new_owner: Principal,
    ) -> Result<()> {
        self.authorize(caller, "transfer_ownership")?;
        let previous = std::mem::replace(&mut self.config.owner, new_owner);
        self.emit(RouterEvent::OwnershipTransferred {
            previous,
            current: new_owner,
        });
        tracing::info!(%previous, current = %new_owner, "Ownership transferred");
        Ok(())
    }

    /// Make a ticket's winner decryptable by anyone. Dev mode only.
    ///
    /// # Errors
    /// - `Unauthorized` if the caller is not the owner
    /// - `DevModeDisabled` outside dev mode
    /// - `NoMatch` if the ticket was never routed
    pub fn force_public(&mut self, caller: &CallerContext, ticket: TicketId) -> Result<Euint32> {
        self.authorize(caller, "force_public")?;
        self.require_dev("force_public")?;
        let winner = self.ledger.mark_public(&ticket)?;
        self.acl.make_public(winner.handle());
        self.emit(RouterEvent::MatchMadePublic {
            ticket,
            winner: winner.handle(),
        });
        tracing::warn!(%ticket, winner = %winner.handle(), "Match winner made public");
        Ok(winner)
    }

    // ------------------------------------------------------------------
    // Routing
    // ------------------------------------------------------------------

    /// Route a ticket to the best-matching active agent.
    ///
    /// `need` and `urgency` must all be attested by `proof`, which the
    /// caller must have produced.
    ///
    /// # Errors
    /// - `TicketAlreadyExists` if `ticket` was already routed
    /// - `NoActiveAgents` if nobody is active
    /// - `ProofMismatch` / `CiphertextKindMismatch` on bad inputs
    pub fn route(
        &mut self,
        caller: &CallerContext,
        ticket: TicketId,
        need: &[ExternalCiphertext; SKILL_DIMS],
        urgency: &ExternalCiphertext,
        proof: &InputProof,
    ) -> Result<RoutingReceipt> {
        self.precheck_route(ticket)?;
        let requester = caller.principal();
        check_submitter(proof, requester, urgency)?;

        let need: [Euint16; SKILL_DIMS] = self.fhe.ingest_all(need, proof)?;
        let urgency: Euint16 = self.fhe.ingest(urgency, proof)?;
        self.commit_route(requester, ticket, &RoutingQuery { need, urgency })
    }

    /// [`Router::route`] from plaintext need and urgency. Dev mode only.
    pub fn route_plain(
        &mut self,
        caller: &CallerContext,
        ticket: TicketId,
        need: [u16; SKILL_DIMS],
        urgency: u16,
    ) -> Result<RoutingReceipt> {
        self.require_dev("route_plain")?;
        self.precheck_route(ticket)?;
        let need = self.lift(need)?;
        let urgency = self.fhe.from_plain(urgency)?;
        self.commit_route(caller.principal(), ticket, &RoutingQuery { need, urgency })
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Winner handle for `ticket`, or [`Handle::ZERO`] if it was never routed.
    #[must_use]
    pub fn match_handle(&self, ticket: &TicketId) -> Handle {
        self.ledger
            .lookup(ticket)
            .map_or(Handle::ZERO, |w| w.handle())
    }

    #[must_use]
    pub fn lookup(&self, ticket: &TicketId) -> Option<Euint32> {
        self.ledger.lookup(ticket)
    }

    #[must_use]
    pub fn match_record(&self, ticket: &TicketId) -> Option<&MatchRecord> {
        self.ledger.get(ticket)
    }

    #[must_use]
    pub fn active_count(&self) -> usize {
        self.registry.active_count()
    }

    #[must_use]
    pub fn is_active(&self, agent_id: AgentId) -> bool {
        self.registry.is_active(agent_id)
    }

    #[must_use]
    pub fn agent(&self, agent_id: AgentId) -> Option<&Agent> {
        self.registry.agent(agent_id)
    }

    #[must_use]
    pub fn owner(&self) -> Principal {
        self.config.owner
    }

    #[must_use]
    pub fn router_principal(&self) -> Principal {
        self.config.router_principal
    }

    #[must_use]
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    #[must_use]
    pub fn registry(&self) -> &AgentRegistry {
        &self.registry
    }

    #[must_use]
    pub fn ledger(&self) -> &MatchLedger {
        &self.ledger
    }

    #[must_use]
    pub fn acl(&self) -> &AclManager {
        &self.acl
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.fhe
    }

    /// Client-side access to the backend, e.g. to encrypt inputs.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.fhe
    }

    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn authorize(&self, caller: &CallerContext, operation: &'static str) -> Result<()> {
        let principal = caller.principal();
        if principal != self.config.owner {
            tracing::warn!(caller = %principal, operation, "Rejected admin call");
            return Err(BlindRouteError::Unauthorized(principal));
        }
        Ok(())
    }

    fn require_dev(&self, operation: &'static str) -> Result<()> {
        if !self.config.dev_mode {
            tracing::warn!(operation, "Dev-only operation refused");
            return Err(BlindRouteError::DevModeDisabled { operation });
        }
        Ok(())
    }

    /// Checks that run before any homomorphic work.
    fn precheck_route(&self, ticket: TicketId) -> Result<()> {
        if self.ledger.contains(&ticket) {
            return Err(BlindRouteError::TicketAlreadyExists(ticket));
        }
        if self.registry.active_count() == 0 {
            return Err(BlindRouteError::NoActiveAgents);
        }
        Ok(())
    }

    fn lift(&mut self, levels: [u16; SKILL_DIMS]) -> Result<[Euint16; SKILL_DIMS]> {
        let lifted = levels
            .iter()
            .map(|level| self.fhe.from_plain(*level))
            .collect::<Result<Vec<_>>>()?;
        lifted
            .try_into()
            .map_err(|_| BlindRouteError::Internal("skill vector length mismatch".into()))
    }

    fn store_agent(
        &mut self,
        agent_id: AgentId,
        skill: SkillVector,
        active: bool,
    ) -> Result<Transition> {
        let transition = self.registry.upsert(agent_id, skill, active)?;
        self.emit(RouterEvent::AgentChanged { agent_id, active });
        tracing::info!(
            agent = %agent_id,
            active,
            ?transition,
            active_count = self.registry.active_count(),
            "Agent upserted"
        );
        Ok(transition)
    }

    fn commit_route(
        &mut self,
        requester: Principal,
        ticket: TicketId,
        query: &RoutingQuery,
    ) -> Result<RoutingReceipt> {
        let selection = select_best(&mut self.fhe, query, self.registry.indexed())?;
        let winner = selection.winner;

        self.ledger
            .finalize(MatchRecord::new(ticket, winner, requester))?;

        let router = self.config.router_principal;
        self.acl.grant_value(&winner, requester);
        self.acl.grant_value(&winner, router);

        self.emit(RouterEvent::MatchRouted {
            ticket,
            requester,
            winner: winner.handle(),
        });
        tracing::info!(
            %ticket,
            requester = %requester,
            candidates = selection.scored.len(),
            winner = %winner.handle(),
            "Match routed"
        );

        Ok(RoutingReceipt::new(ticket, requester, selection.scored, winner.handle()))
    }

    fn emit(&mut self, event: RouterEvent) {
        self.sink.emit(EventEnvelope::new(event));
    }
}

impl<B: FheBackend + DecryptionOracle, S: EventSink> Router<B, S> {
    /// Off-boundary decrypt of a ticket's winner on behalf of `principal`.
    ///
    /// # Errors
    /// - `NoMatch` if the ticket was never routed
    /// - `DecryptionDenied` if `principal` holds no grant and the winner is
    ///   not public
    pub fn decrypt_match(&self, ticket: &TicketId, principal: &Principal) -> Result<u32> {
        let winner = self
            .ledger
            .lookup(ticket)
            .ok_or(BlindRouteError::NoMatch(*ticket))?;
        self.fhe.decrypt(&winner, principal, &self.acl)
    }
}

fn check_submitter(
    proof: &InputProof,
    expected: Principal,
    first: &ExternalCiphertext,
) -> Result<()> {
    if proof.submitter != expected {
        return Err(BlindRouteError::ProofMismatch {
            handle: first.handle,
        });
    }
    Ok(())
}
