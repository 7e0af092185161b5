//! Deep copies and block splicing.
//!
//! Signatures bind private copies of their function bodies, the transformer
//! executor splices copies of generator blocks into other blocks, and the
//! iterator inliner copies iterator bodies into loops.

use smallvec::SmallVec;

use super::{BlockOwner, Expr, ExprOwner, IdentTarget, Program, Statement};
use crate::{BlockId, ExprId, FuncKind, FunctionId, StatementId, VarKind, VariableId};

impl Program {
    /// Deep copy an expression tree. Bound facts are kept; cached identifier
    /// resolutions are dropped since the copy may live in another scope.
    pub fn copy_expr(&mut self, expr: ExprId) -> ExprId {
        let record = self.expr(expr).clone();
        let children: SmallVec<[ExprId; 4]> =
            record.children.iter().map(|&child| self.copy_expr(child)).collect();
        let id = ExprId::from_len(self.exprs.len());
        self.exprs.push(Expr {
            children: children.clone(),
            parent: None,
            owner: ExprOwner::None,
            ident: None,
            ..record
        });
        for child in children {
            self.expr_mut(child).parent = Some(id);
        }
        id
    }

    /// Deep copy a block with its statements, variables and nested
    /// functions. The copy is detached until spliced somewhere.
    pub fn copy_block(&mut self, block: BlockId) -> BlockId {
        let parent = self.block(block).parent;
        let copy = self.copy_block_with(block, parent, true);
        self.block_mut(copy).owner = BlockOwner::Detached;
        copy
    }

    fn copy_block_with(
        &mut self,
        block: BlockId,
        parent: Option<BlockId>,
        copy_functions: bool,
    ) -> BlockId {
        let source = self.block(block).clone();
        let copy = self.push_block(source.kind, BlockOwner::Detached, parent, source.span);
        for &variable in &source.variables {
            self.copy_variable(variable, copy);
        }
        for &statement in &source.statements {
            let new_statement = self.copy_statement(statement, copy);
            self.block_mut(copy).statements.push(new_statement);
        }
        if copy_functions {
            for &function in &source.functions {
                self.copy_function(function, copy);
            }
        } else {
            let mut shared: Vec<_> = source
                .idents
                .values()
                .filter_map(|&ident| match self.ident(ident).target {
                    IdentTarget::Function(function) => Some((self.ident(ident).name, function)),
                    _ => None,
                })
                .collect();
            shared.sort_by_key(|&(_, function)| function);
            for (name, function) in shared {
                self.declare_ident(copy, name, IdentTarget::Function(function));
            }
        }
        copy
    }

    fn copy_variable(&mut self, variable: VariableId, block: BlockId) -> VariableId {
        let source = self.variable(variable).clone();
        let copy = self.push_variable(block, source.name, source.kind, source.generated, source.span);
        let type_expr = source.type_expr.map(|expr| self.copy_expr(expr));
        let initializer = source.initializer.map(|expr| self.copy_expr(expr));
        for expr in type_expr.into_iter().chain(initializer) {
            self.expr_mut(expr).owner = ExprOwner::Variable(copy);
        }
        let record = self.variable_mut(copy);
        record.is_const = source.is_const;
        record.in_template_signature = source.in_template_signature;
        record.type_expr = type_expr;
        record.initializer = initializer;
        copy
    }

    /// Copy a statement (and its nested block) for placement in `block`.
    /// The caller inserts the returned statement into the block's list.
    pub(super) fn copy_statement(&mut self, statement: StatementId, block: BlockId) -> StatementId {
        let source = self.statement(statement).clone();
        let expr = source.expr.map(|expr| self.copy_expr(expr));
        let id = StatementId::from_len(self.statements.len());
        self.statements.push(Statement {
            block,
            expr,
            sub_block: None,
            ..source
        });
        if let Some(expr) = expr {
            self.expr_mut(expr).owner = ExprOwner::Statement(id);
        }
        if let Some(sub_block) = source.sub_block {
            let copy = self.copy_block_with(sub_block, Some(block), true);
            self.block_mut(copy).owner = BlockOwner::Statement(id);
            self.statement_mut(id).sub_block = Some(copy);
        }
        id
    }

    /// Deep copy a function into `dest`, declaring it there.
    pub fn copy_function(&mut self, function: FunctionId, dest: BlockId) -> FunctionId {
        let source = self.function(function).clone();
        let sub_block = self.copy_block_with(source.sub_block, Some(dest), true);
        let copy = self.push_function(source.name, source.kind, source.linkage, Some(dest), sub_block, source.span);
        let type_expr = source.type_expr.map(|expr| self.copy_expr(expr));
        if let Some(expr) = type_expr {
            self.expr_mut(expr).owner = ExprOwner::Function(copy);
        }
        {
            let record = self.function_mut(copy);
            record.type_expr = type_expr;
            record.generated = source.generated;
            record.exported = source.exported;
            record.relation = source.relation;
        }
        if source.kind == FuncKind::Constructor {
            if let Some(template) = source.template {
                let builtin = self.template(template).builtin;
                let is_template = self.template(template).is_template;
                let new_template = self.create_template(copy, builtin, source.span);
                self.template_mut(new_template).is_template = is_template;
            }
        }
        self.block_mut(dest).functions.push(copy);
        self.add_function_ident(dest, copy, source.name, false);
        copy
    }

    /// Copy `function`'s body for a signature. Nested functions are shared
    /// with the original; the copy is not declared in any block.
    pub(super) fn uniquify_function(&mut self, function: FunctionId) -> FunctionId {
        let source = self.function(function).clone();
        let sub_block = self.copy_block_with(source.sub_block, source.block, false);
        let copy = self.push_function(source.name, source.kind, source.linkage, source.block, sub_block, source.span);
        let type_expr = source.type_expr.map(|expr| self.copy_expr(expr));
        if let Some(expr) = type_expr {
            self.expr_mut(expr).owner = ExprOwner::Function(copy);
        }
        let record = self.function_mut(copy);
        record.template = source.template;
        record.type_expr = type_expr;
        record.generated = source.generated;
        record.exported = source.exported;
        record.relation = source.relation;
        copy
    }

    // === Splicing ===

    /// Move everything in `source` to the end of `dest`.
    pub fn append_block_to_block(&mut self, source: BlockId, dest: BlockId) {
        let position = self.block(dest).statements.len();
        self.splice_block(source, dest, position);
    }

    /// Move everything in `source` to the start of `dest`.
    pub fn prepend_block_to_block(&mut self, source: BlockId, dest: BlockId) {
        self.splice_block(source, dest, 0);
    }

    /// Move the statements of `source` to follow `anchor` in its block.
    pub fn move_block_statements_after(&mut self, source: BlockId, anchor: StatementId) {
        let dest = self.statement(anchor).block;
        let position = self.statement_position(anchor).map_or(0, |p| p + 1);
        self.splice_block(source, dest, position);
    }

    fn splice_block(&mut self, source: BlockId, dest: BlockId, position: usize) {
        let statements = std::mem::take(&mut self.block_mut(source).statements);
        for (offset, &statement) in statements.iter().enumerate() {
            self.statement_mut(statement).block = dest;
            if let Some(sub_block) = self.statement(statement).sub_block {
                self.block_mut(sub_block).parent = Some(dest);
            }
            let list = &mut self.block_mut(dest).statements;
            let at = (position + offset).min(list.len());
            list.insert(at, statement);
        }
        let scope = self.scope_block(dest);
        let variables = std::mem::take(&mut self.block_mut(source).variables);
        for variable in variables {
            let name = self.variable(variable).name;
            self.block_mut(source).idents.remove(&name);
            self.variable_mut(variable).block = scope;
            if self.variable(variable).kind == VarKind::Local {
                self.block_mut(scope).variables.push(variable);
            }
            self.declare_ident(scope, name, IdentTarget::Variable(variable));
        }
        let functions = std::mem::take(&mut self.block_mut(source).functions);
        for function in functions {
            let name = self.function(function).name;
            self.block_mut(source).idents.remove(&name);
            let sub_block = self.function(function).sub_block;
            self.block_mut(sub_block).parent = Some(dest);
            self.function_mut(function).block = Some(dest);
            self.block_mut(dest).functions.push(function);
            self.add_function_ident(dest, function, name, false);
        }
        self.block_mut(source).destroyed = true;
    }
}
