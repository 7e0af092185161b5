//! Entity destruction.
//!
//! Destroyed entities stay in their arenas flagged dead and are unlinked
//! from their owners.

use super::{BlockOwner, IdentTarget, Program};
use crate::{BlockId, BlockKind, FunctionId, RelationId, StatementId, TemplateId};

impl Program {
    /// Destroy a statement and everything nested in it.
    pub fn destroy_statement(&mut self, statement: StatementId) {
        if self.statement(statement).destroyed {
            return;
        }
        let block = self.statement(statement).block;
        self.block_mut(block).statements.retain(|&s| s != statement);
        self.kill_statement(statement);
    }

    fn kill_statement(&mut self, statement: StatementId) {
        self.statement_mut(statement).destroyed = true;
        if let Some(sub_block) = self.statement(statement).sub_block {
            self.kill_block(sub_block);
        }
    }

    /// Destroy a function, its body and the identifier declaring it.
    pub fn destroy_function(&mut self, function: FunctionId) {
        if self.function(function).destroyed {
            return;
        }
        let name = self.function(function).name;
        if let Some(block) = self.function(function).block {
            self.block_mut(block).functions.retain(|&f| f != function);
            let declared = self.block(block).idents.get(&name).copied();
            if let Some(ident) = declared {
                if self.ident(ident).target == IdentTarget::Function(function) {
                    self.block_mut(block).idents.remove(&name);
                }
            }
        }
        self.kill_function(function);
    }

    fn kill_function(&mut self, function: FunctionId) {
        self.function_mut(function).destroyed = true;
        let sub_block = self.function(function).sub_block;
        self.kill_block(sub_block);
    }

    fn kill_block(&mut self, block: BlockId) {
        if self.block(block).destroyed {
            return;
        }
        self.block_mut(block).destroyed = true;
        for statement in std::mem::take(&mut self.block_mut(block).statements) {
            self.kill_statement(statement);
        }
        for variable in std::mem::take(&mut self.block_mut(block).variables) {
            self.variable_mut(variable).destroyed = true;
        }
        for function in std::mem::take(&mut self.block_mut(block).functions) {
            self.kill_function(function);
        }
        self.block_mut(block).idents.clear();
    }

    /// Replace a template's constructor body with a fresh empty block and
    /// remove its relations, destroying code those relations generated.
    pub fn destroy_template_contents(&mut self, template: TemplateId) {
        let constructor = self.template(template).function;
        let old_block = self.function(constructor).sub_block;
        let parent = self.block(old_block).parent;
        let span = self.block(old_block).span;
        self.kill_block(old_block);
        let fresh = self.push_block(BlockKind::Function, BlockOwner::Function(constructor), parent, span);
        self.function_mut(constructor).sub_block = fresh;

        let relations: Vec<RelationId> = self
            .template(template)
            .parent_relations
            .iter()
            .chain(&self.template(template).child_relations)
            .copied()
            .collect();
        for relation in relations {
            self.destroy_relation(relation);
        }
    }

    /// Unlink a relation and destroy the statements and functions it generated.
    pub fn destroy_relation(&mut self, relation: RelationId) {
        let (parent, child) = {
            let record = self.relation(relation);
            (record.parent, record.child)
        };
        self.template_mut(parent).child_relations.retain(|&r| r != relation);
        self.template_mut(child).parent_relations.retain(|&r| r != relation);
        let statements = std::mem::take(&mut self.relation_mut(relation).statements);
        for statement in statements {
            self.destroy_statement(statement);
        }
        let functions = std::mem::take(&mut self.relation_mut(relation).functions);
        for function in functions {
            self.destroy_function(function);
        }
    }

    /// True if the statement and every block enclosing it are alive.
    pub fn statement_is_live(&self, statement: StatementId) -> bool {
        let record = self.statement(statement);
        !record.destroyed && !self.block(record.block).destroyed
    }
}
