//! The binding graph.
//!
//! A [`Binding`] is one unit of work: an expression tree to bind for a
//! statement, a parameter default, or a type constraint. It is always in
//! exactly one place:
//!
//! ```text
//!   create ──► ready queue ──► running ──► complete
//!                  ▲              │
//!                  │ wake         │ suspend
//!                  └──── event ◄──┘
//! ```
//!
//! Events are keyed by the fact they wait for. Waking an event moves all of
//! its waiters to the back of the ready queue in the order they suspended
//! and forgets the event.

use std::collections::VecDeque;

use rune_ir::{ExprId, FunctionId, IdentId, SignatureId, StatementId, VariableId};
use rustc_hash::FxHashMap;

/// Handle of a binding in the [`BindingGraph`].
///
/// Indexes the binding arena directly. Bindings are never freed, so every
/// handle stays distinct for the life of the graph.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub(crate) struct BindingId(usize);

impl BindingId {
    #[inline]
    fn index(self) -> usize {
        self.0
    }
}

/// What a binding binds.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum BindingKind {
    Statement(StatementId),
    /// Default value of a parameter the caller did not pass.
    DefaultValue(VariableId),
    /// Type constraint on a variable or parameter.
    VarConstraint(VariableId),
    /// Return type constraint of a function.
    FuncConstraint(FunctionId),
}

/// A fact that suspended bindings wait for.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub(crate) enum Event {
    ReturnTypeKnown(SignatureId),
    VariableTypeKnown(VariableId),
    IdentifierDefined(IdentId),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum BindingState {
    Ready,
    Running,
    Suspended(Event),
    Complete,
}

#[derive(Clone, Debug)]
pub(crate) struct Binding {
    pub kind: BindingKind,
    pub signature: Option<SignatureId>,
    /// Expressions still to bind, children before parents.
    pub queue: VecDeque<ExprId>,
    /// Statement code is needed at runtime.
    pub instantiating: bool,
    pub state: BindingState,
}

/// All bindings, the ready queue and the event table.
#[derive(Default)]
pub(crate) struct BindingGraph {
    bindings: Vec<Binding>,
    ready: VecDeque<BindingId>,
    events: FxHashMap<Event, Vec<BindingId>>,
    statement_bindings: FxHashMap<StatementId, BindingId>,
    /// Unfinished bindings per signature.
    pending: FxHashMap<SignatureId, usize>,
}

impl BindingGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a binding at the back of the ready queue.
    pub fn create(
        &mut self,
        kind: BindingKind,
        signature: Option<SignatureId>,
        instantiating: bool,
    ) -> BindingId {
        let id = BindingId(self.bindings.len());
        self.bindings.push(Binding {
            kind,
            signature,
            queue: VecDeque::new(),
            instantiating,
            state: BindingState::Ready,
        });
        if let BindingKind::Statement(statement) = kind {
            self.statement_bindings.insert(statement, id);
        }
        if let Some(signature) = signature {
            *self.pending.entry(signature).or_insert(0) += 1;
        }
        self.ready.push_back(id);
        tracing::trace!(?id, ?kind, ?signature, "created binding");
        id
    }

    #[inline]
    pub fn binding(&self, id: BindingId) -> &Binding {
        &self.bindings[id.index()]
    }

    #[inline]
    pub fn binding_mut(&mut self, id: BindingId) -> &mut Binding {
        &mut self.bindings[id.index()]
    }

    /// Binding most recently created for `statement`, if still unfinished.
    pub fn statement_binding(&self, statement: StatementId) -> Option<BindingId> {
        let id = *self.statement_bindings.get(&statement)?;
        (self.binding(id).state != BindingState::Complete).then_some(id)
    }

    /// Take the next ready binding.
    pub fn pop_ready(&mut self) -> Option<BindingId> {
        let id = self.ready.pop_front()?;
        self.binding_mut(id).state = BindingState::Running;
        Some(id)
    }

    /// Park a running binding on `event`.
    pub fn suspend(&mut self, id: BindingId, event: Event) {
        debug_assert_eq!(self.binding(id).state, BindingState::Running);
        self.binding_mut(id).state = BindingState::Suspended(event);
        self.events.entry(event).or_default().push(id);
        tracing::trace!(?id, ?event, "suspended binding");
    }

    /// Move every waiter of `event` to the ready queue. Returns how many
    /// bindings woke.
    pub fn wake(&mut self, event: Event) -> usize {
        let Some(waiters) = self.events.remove(&event) else {
            return 0;
        };
        for &id in &waiters {
            self.binding_mut(id).state = BindingState::Ready;
            self.ready.push_back(id);
        }
        tracing::debug!(?event, woken = waiters.len(), "event fired");
        waiters.len()
    }

    /// Mark a running binding finished. Returns its signature when that was
    /// the signature's last unfinished binding.
    pub fn complete(&mut self, id: BindingId) -> Option<SignatureId> {
        self.binding_mut(id).state = BindingState::Complete;
        self.binding_mut(id).queue.clear();
        self.release(id)
    }

    /// Drop an unfinished binding from wherever it waits.
    pub fn remove(&mut self, id: BindingId) {
        match self.binding(id).state {
            BindingState::Complete => return,
            BindingState::Ready => self.ready.retain(|&b| b != id),
            BindingState::Suspended(event) => {
                if let Some(waiters) = self.events.get_mut(&event) {
                    waiters.retain(|&b| b != id);
                    if waiters.is_empty() {
                        self.events.remove(&event);
                    }
                }
            }
            BindingState::Running => {}
        }
        self.binding_mut(id).state = BindingState::Complete;
        self.binding_mut(id).queue.clear();
        self.release(id);
    }

    fn release(&mut self, id: BindingId) -> Option<SignatureId> {
        let signature = self.binding(id).signature?;
        let count = self.pending.get_mut(&signature)?;
        *count = count.saturating_sub(1);
        (*count == 0).then_some(signature)
    }

    /// Number of unfinished bindings of `signature`.
    pub fn pending_bindings(&self, signature: SignatureId) -> usize {
        self.pending.get(&signature).copied().unwrap_or(0)
    }

    /// Remove every unfinished binding for which `keep` is false.
    pub fn retain(&mut self, mut keep: impl FnMut(&Binding) -> bool) -> usize {
        let doomed: Vec<BindingId> = (0..self.bindings.len())
            .map(BindingId)
            .filter(|&id| {
                let binding = self.binding(id);
                binding.state != BindingState::Complete && !keep(binding)
            })
            .collect();
        for &id in &doomed {
            self.remove(id);
        }
        doomed.len()
    }

    /// Events that still have waiters, in a stable order, with the first
    /// binding waiting on each.
    pub fn waiting_events(&self) -> Vec<(Event, BindingId)> {
        let mut events: Vec<(Event, BindingId)> = self
            .events
            .iter()
            .filter_map(|(&event, waiters)| waiters.first().map(|&first| (event, first)))
            .collect();
        events.sort();
        events
    }
}

#[cfg(test)]
mod tests;
