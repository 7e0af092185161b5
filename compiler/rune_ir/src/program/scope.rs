//! Scope resolution.

use super::{BlockOwner, IdentTarget, Program};
use crate::{BlockId, BlockKind, FuncKind, FunctionId, IdentId, Name};

impl Program {
    /// The function or class block that holds variables for `block`.
    pub fn scope_block(&self, block: BlockId) -> BlockId {
        let mut current = block;
        while self.block(current).kind == BlockKind::Statement {
            match self.block(current).parent {
                Some(parent) => current = parent,
                None => break,
            }
        }
        current
    }

    /// Function whose body (transitively) contains `block`.
    pub fn owning_function(&self, block: BlockId) -> Option<FunctionId> {
        match self.block(self.scope_block(block)).owner {
            BlockOwner::Function(function) => Some(function),
            _ => None,
        }
    }

    /// Nearest enclosing block owned by a module or package function.
    pub fn module_block(&self, block: BlockId) -> BlockId {
        let mut current = self.scope_block(block);
        loop {
            if let BlockOwner::Function(function) = self.block(current).owner {
                if matches!(self.function(function).kind, FuncKind::Module | FuncKind::Package) {
                    return current;
                }
            }
            match self.block(current).parent {
                Some(parent) => current = self.scope_block(parent),
                None => return current,
            }
        }
    }

    /// Look up `name` in `block` only. Class blocks fall back to methods of
    /// their template's constructor; package blocks fall back to their
    /// `package` submodule.
    pub fn find_ident_in_block(&self, block: BlockId, name: Name) -> Option<IdentId> {
        if let Some(&ident) = self.block(block).idents.get(&name) {
            return Some(ident);
        }
        match self.block(block).owner {
            BlockOwner::Class(class) => {
                let template = self.class(class).template;
                let constructor_block = self.function(self.template(template).function).sub_block;
                let ident = *self.block(constructor_block).idents.get(&name)?;
                matches!(self.ident(ident).target, IdentTarget::Function(_)).then_some(ident)
            }
            BlockOwner::Function(function) if self.function(function).kind == FuncKind::Package => {
                let package_name = self.interner().get("package")?;
                let package = self.block(block).idents.get(&package_name)?;
                let module = self.ident_function(*package)?;
                self.block(self.function(module).sub_block).idents.get(&name).copied()
            }
            _ => None,
        }
    }

    /// Look up `name` starting at the scope of `block` and walking outward
    /// through enclosing lexical scopes to the root.
    pub fn find_ident(&self, block: BlockId, name: Name) -> Option<IdentId> {
        let mut current = Some(self.scope_block(block));
        while let Some(scope) = current {
            if let Some(ident) = self.find_ident_in_block(scope, name) {
                return Some(ident);
            }
            current = self.block(scope).parent.map(|parent| self.scope_block(parent));
        }
        None
    }

    /// True if `block` is the body of a constructor.
    pub fn is_constructor_block(&self, block: BlockId) -> bool {
        matches!(
            self.block(block).owner,
            BlockOwner::Function(function) if self.function(function).kind == FuncKind::Constructor
        )
    }
}
