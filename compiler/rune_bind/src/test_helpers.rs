//! Fixtures for binder unit tests.
//!
//! Builds a [`Program`] and [`Pool`] pair and hands out a [`Binder`] over
//! them, so rules can be exercised on hand-built trees without running
//! the whole driver.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use rune_ir::{BlockId, ExprId, Program, Span, TemplateId, TypeId, VariableId};
use rune_types::Pool;

use crate::binder::Binder;
use crate::options::BindOptions;

pub(crate) struct Fixture {
    pub program: Program,
    pub pool: Pool,
    pub options: BindOptions,
}

impl Fixture {
    pub fn new() -> Self {
        Fixture {
            program: Program::new(),
            pool: Pool::new(),
            options: BindOptions::default(),
        }
    }

    pub fn binder(&mut self) -> Binder<'_> {
        Binder::new(&mut self.program, &mut self.pool, &self.options)
    }

    /// Body of `main`, which is also the root block.
    pub fn main_block(&self) -> BlockId {
        self.program.root_block()
    }

    /// Declare a local `name` in `main` with `datatype`, returning it and a
    /// resolved identifier expression that reads it.
    pub fn local(&mut self, name: &str, datatype: TypeId) -> (VariableId, ExprId) {
        let block = self.main_block();
        let name = self.program.intern(name);
        let variable = self.program.add_local(block, name, false, Span::default());
        self.program.variable_mut(variable).datatype = Some(datatype);
        let expr = self.program.name_expr(name, Span::default());
        let ident = self.program.find_ident(block, name);
        let record = self.program.expr_mut(expr);
        record.ident = ident;
        record.datatype = Some(datatype);
        (variable, expr)
    }

    /// A user template named `name` and its single class type.
    pub fn class_type(&mut self, name: &str) -> (TemplateId, TypeId) {
        let root = self.main_block();
        let constructor = self.program.add_constructor(root, name, Span::default());
        let template = self.program.function(constructor).template.unwrap();
        let class = self.program.create_class(template, Vec::new());
        (template, self.pool.class(class, template))
    }

    /// A bound integer literal.
    pub fn uint(&mut self, value: u64, width: u16) -> ExprId {
        let expr = self.program.int_expr(value, Some(width), false, Span::default());
        self.program.expr_mut(expr).datatype = Some(self.pool.uint(width));
        expr
    }

    /// A bound string literal.
    pub fn string(&mut self, value: &str) -> ExprId {
        let expr = self.program.string_expr(value, Span::default());
        self.program.expr_mut(expr).datatype = Some(TypeId::STRING);
        expr
    }
}
