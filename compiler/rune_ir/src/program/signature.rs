//! Signatures: functions specialized to parameter type tuples.

use super::{Paramspec, Program, Signature};
use crate::{BlockId, FunctionId, SignatureId, Span, StatementId, TypeId, VarKind};

impl Program {
    /// Find the signature of `function` for exactly these parameter types.
    pub fn lookup_signature(
        &self,
        function: FunctionId,
        param_types: &[Option<TypeId>],
    ) -> Option<SignatureId> {
        self.signature_table
            .get(&(function, param_types.to_vec()))
            .copied()
    }

    /// Create the signature of `function` for `param_types`. Functions that
    /// are not inherently unique get a private copy of their body.
    pub fn create_signature(
        &mut self,
        function: FunctionId,
        param_types: Vec<Option<TypeId>>,
        span: Span,
        caller: Option<SignatureId>,
        call_statement: Option<StatementId>,
    ) -> SignatureId {
        let id = SignatureId::from_len(self.signatures.len());
        let uniquified = if self.function(function).kind.is_unique() {
            function
        } else {
            let copy = self.uniquify_function(function);
            self.function_mut(copy).uniquified_for = Some(id);
            copy
        };
        let block = self.function(uniquified).sub_block;
        let parameters: Vec<_> = self
            .block(block)
            .variables
            .iter()
            .copied()
            .filter(|&v| self.variable(v).kind == VarKind::Parameter)
            .collect();
        let params = parameters
            .iter()
            .enumerate()
            .map(|(index, &variable)| Paramspec {
                datatype: param_types.get(index).copied().flatten(),
                variable,
                instantiated: false,
                is_type: false,
            })
            .collect();
        #[expect(
            clippy::cast_possible_truncation,
            reason = "signature count per function never approaches u32::MAX"
        )]
        let number = self.function(function).signatures.len() as u32;
        self.signatures.push(Signature {
            function,
            uniquified,
            class: None,
            params,
            return_type: None,
            bound: false,
            instantiated: false,
            queued: false,
            called_by_funcptr: false,
            number,
            span,
            caller,
            call_statement,
        });
        self.function_mut(function).signatures.push(id);
        self.signature_table.insert((function, param_types), id);
        id
    }

    /// Body block bound for the signature.
    pub fn signature_block(&self, signature: SignatureId) -> BlockId {
        self.function(self.signature(signature).uniquified).sub_block
    }

    pub fn signature_param_types(&self, signature: SignatureId) -> Vec<Option<TypeId>> {
        self.signature(signature)
            .params
            .iter()
            .map(|param| param.datatype)
            .collect()
    }

    /// Types passed for the constructor's template parameters.
    pub fn signature_template_params(&self, signature: SignatureId) -> Vec<TypeId> {
        self.signature(signature)
            .params
            .iter()
            .filter(|param| self.variable(param.variable).in_template_signature)
            .filter_map(|param| param.datatype)
            .collect()
    }

    /// True if the signature's function is declared inside a class.
    pub fn is_method_signature(&self, signature: SignatureId) -> bool {
        let function = self.signature(signature).function;
        self.function(function)
            .block
            .is_some_and(|block| self.is_constructor_block(block))
    }
}
