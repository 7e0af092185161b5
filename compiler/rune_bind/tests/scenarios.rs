#![allow(clippy::unwrap_used, clippy::expect_used)]
//! End-to-end binding of small programs.
//!
//! Each test builds a program the way the parser would hand it over, runs
//! [`bind_program`] on it and checks the resulting datatypes, classes and
//! rewrites.

use pretty_assertions::assert_eq;
use rune_bind::{bind_program, init_tracing, BindErrors, BindOptions, BindReport};
use rune_ir::{
    BlockId, ExprId, ExprKind, FuncKind, FunctionId, Linkage, Program, Span, StmtKind, TemplateId,
    TypeId, VariableId,
};
use rune_types::Pool;

const SPAN: Span = Span::DUMMY;

/// A program under construction, plus the type pool it binds into.
struct Source {
    program: Program,
    pool: Pool,
}

impl Source {
    fn new() -> Self {
        init_tracing();
        Source {
            program: Program::new(),
            pool: Pool::new(),
        }
    }

    fn bind(&mut self) -> Result<BindReport, BindErrors> {
        bind_program(&mut self.program, &mut self.pool, &BindOptions::default())
    }

    fn main(&self) -> BlockId {
        self.program.root_block()
    }

    fn name(&mut self, name: &str) -> ExprId {
        self.program.ident_expr(name, SPAN)
    }

    fn u32(&mut self, value: u64) -> ExprId {
        self.program.int_expr(value, Some(32), false, SPAN)
    }

    /// An integer literal without a width suffix.
    fn int(&mut self, value: u64) -> ExprId {
        self.program.int_expr(value, None, false, SPAN)
    }

    fn node(&mut self, kind: ExprKind, children: &[ExprId]) -> ExprId {
        self.program.new_expr(kind, children, SPAN)
    }

    /// `object.member`
    fn dot(&mut self, object: &str, member: &str) -> ExprId {
        let object = self.name(object);
        let member = self.name(member);
        self.node(ExprKind::Dot, &[object, member])
    }

    fn call(&mut self, callee: ExprId, args: &[ExprId]) -> ExprId {
        let list = self.node(ExprKind::List, args);
        self.node(ExprKind::Call, &[callee, list])
    }

    fn call_named(&mut self, callee: &str, args: &[ExprId]) -> ExprId {
        let callee = self.name(callee);
        self.call(callee, args)
    }

    fn statement(&mut self, block: BlockId, kind: StmtKind, expr: Option<ExprId>) {
        self.program.add_statement(block, kind, expr, SPAN);
    }

    /// `target = value`, where `target` is a name or a member access.
    fn assign(&mut self, block: BlockId, target: ExprId, value: ExprId) {
        let assignment = self.node(ExprKind::Equals, &[target, value]);
        self.statement(block, StmtKind::Assign, Some(assignment));
    }

    fn assign_name(&mut self, block: BlockId, target: &str, value: ExprId) {
        let target = self.name(target);
        self.assign(block, target, value);
    }

    fn function(
        &mut self,
        block: BlockId,
        name: &str,
        kind: FuncKind,
        params: &[&str],
    ) -> (FunctionId, BlockId) {
        let function = self
            .program
            .add_function(block, name, kind, Linkage::Module, SPAN);
        for param in params {
            self.program.add_parameter(function, param, SPAN);
        }
        (function, self.program.function(function).sub_block)
    }

    /// `class name(self, params...)`. Returns the constructor's body.
    fn class(&mut self, name: &str, params: &[&str]) -> (TemplateId, BlockId) {
        let root = self.program.root_block();
        let constructor = self.program.add_constructor(root, name, SPAN);
        self.program.add_parameter(constructor, "self", SPAN);
        for param in params {
            self.program.add_parameter(constructor, param, SPAN);
        }
        let template = self.program.function(constructor).template.unwrap();
        (template, self.program.function(constructor).sub_block)
    }

    /// Mark the constructor parameter `name` of `template` as `<name>`.
    fn template_parameter(&mut self, template: TemplateId, name: &str) {
        let variable = self.variable_in(self.constructor_block(template), name).unwrap();
        self.program.set_template_parameter(variable);
    }

    fn constructor_block(&self, template: TemplateId) -> BlockId {
        let constructor = self.program.template(template).function;
        self.program.function(constructor).sub_block
    }

    /// `self.member = member` in a constructor body.
    fn store_member(&mut self, body: BlockId, member: &str) {
        let target = self.dot("self", member);
        let value = self.name(member);
        self.assign(body, target, value);
    }

    fn variable_in(&self, block: BlockId, name: &str) -> Option<VariableId> {
        let name = self.program.interner().get(name)?;
        let ident = self.program.find_ident_in_block(block, name)?;
        self.program.ident_variable(ident)
    }

    fn variable_type(&self, block: BlockId, name: &str) -> Option<TypeId> {
        let variable = self.variable_in(block, name)?;
        self.program.variable(variable).datatype
    }

    fn class_type(&mut self, template: TemplateId) -> TypeId {
        let class = self.program.template(template).classes[0];
        self.pool.class(class, template)
    }
}

#[test]
fn recursive_function_binds_one_signature() {
    let mut src = Source::new();
    let main = src.main();
    let (fact, body) = src.function(main, "fact", FuncKind::Plain, &["n"]);

    // if n <= 1 { return 1u32 }
    let n = src.name("n");
    let one = src.int(1);
    let condition = src.node(ExprKind::Le, &[n, one]);
    let (_, then_block) =
        src.program
            .add_compound_statement(body, StmtKind::If, Some(condition), SPAN);
    let one = src.u32(1);
    src.statement(then_block, StmtKind::Return, Some(one));

    // return n * fact(n - 1)
    let n = src.name("n");
    let one = src.int(1);
    let smaller = src.node(ExprKind::Sub, &[n, one]);
    let recurse = src.call_named("fact", &[smaller]);
    let n = src.name("n");
    let product = src.node(ExprKind::Mul, &[n, recurse]);
    src.statement(body, StmtKind::Return, Some(product));

    let five = src.u32(5);
    let value = src.call_named("fact", &[five]);
    src.assign_name(main, "x", value);

    let report = src.bind().unwrap();

    assert_eq!(report.signatures, 2);
    assert_eq!(src.program.function(fact).signatures.len(), 1);
    let signature = src.program.function(fact).signatures[0];
    assert_eq!(src.program.signature(signature).return_type, Some(TypeId::U32));
    assert_eq!(src.variable_type(main, "x"), Some(TypeId::U32));
}

#[test]
fn relation_generates_methods_used_by_constructors() {
    let mut src = Source::new();
    let main = src.main();

    // class A(self, name) { self.name = name }
    let (a, a_body) = src.class("A", &["name"]);
    src.store_member(a_body, "name");

    // class B(self, a, <v>) { self.v = v; a.appendB(self) }
    let (b, b_body) = src.class("B", &["a", "v"]);
    src.template_parameter(b, "v");
    src.store_member(b_body, "v");
    let append = src.dot("a", "appendB");
    let this = src.name("self");
    let call = src.call(append, &[this]);
    src.statement(b_body, StmtKind::Call, Some(call));

    // transformer DoublyLinked(parent, child, cascade = false) {
    //     appendcode parent { func append$child(self, child) {} }
    // }
    let (_, generator) = src.function(
        main,
        "DoublyLinked",
        FuncKind::Transformer,
        &["parent", "child", "cascade"],
    );
    let cascade = src.variable_in(generator, "cascade").unwrap();
    let no = src.program.bool_expr(false, SPAN);
    src.program.set_variable_initializer(cascade, no);
    let dest = src.name("parent");
    let (_, code) =
        src.program
            .add_compound_statement(generator, StmtKind::AppendCode, Some(dest), SPAN);
    src.function(code, "append$child", FuncKind::Plain, &["self", "child"]);

    // relation DoublyLinked(A, B, cascade = true)
    let parent = src.name("A");
    let child = src.name("B");
    let flag_name = src.name("cascade");
    let yes = src.program.bool_expr(true, SPAN);
    let flag = src.node(ExprKind::NamedParam, &[flag_name, yes]);
    let directive = src.call_named("DoublyLinked", &[parent, child, flag]);
    src.statement(main, StmtKind::Relation, Some(directive));

    // a = A("x"); b = B(a, 7u32)
    let text = src.program.string_expr("x", SPAN);
    let value = src.call_named("A", &[text]);
    src.assign_name(main, "a", value);
    let owner = src.name("a");
    let seven = src.u32(7);
    let value = src.call_named("B", &[owner, seven]);
    src.assign_name(main, "b", value);

    let report = src.bind().unwrap();

    assert_eq!(report.directives, 1);
    assert_eq!(src.program.template(a).classes.len(), 1);
    assert_eq!(src.program.template(b).classes.len(), 1);
    let b_class = src.program.template(b).classes[0];
    assert_eq!(src.program.class(b_class).template_params, vec![TypeId::U32]);

    let relation = src.program.relation_ids().next().unwrap();
    let record = src.program.relation(relation);
    assert_eq!((record.parent, record.child), (a, b));
    assert!(record.cascade);

    let b_type = src.class_type(b);
    assert_eq!(src.variable_type(main, "b"), Some(b_type));
    assert_eq!(
        src.variable_type(src.program.class(b_class).sub_block, "v"),
        Some(TypeId::U32)
    );
}

#[test]
fn unreferenced_template_is_destroyed() {
    let mut src = Source::new();

    // class Dict(self, <key>) { func get(self) { return self.missing } }
    let (dict, body) = src.class("Dict", &["key"]);
    src.template_parameter(dict, "key");
    let (_, get_body) = src.function(body, "get", FuncKind::Plain, &["self"]);
    let missing = src.dot("self", "missing");
    src.statement(get_body, StmtKind::Return, Some(missing));

    let report = src.bind().unwrap();

    assert_eq!(report.destroyed_templates, 1);
    assert!(src.program.template(dict).classes.is_empty());
}

#[test]
fn null_member_is_refined_by_later_assignment() {
    let mut src = Source::new();
    let main = src.main();

    // class Tree(self, <value>) { self.value = value; self.left = null(Tree) }
    let (tree, body) = src.class("Tree", &["value"]);
    src.template_parameter(tree, "value");
    src.store_member(body, "value");
    let target = src.dot("self", "left");
    let class_name = src.name("Tree");
    let null = src.node(ExprKind::Null, &[class_name]);
    src.assign(body, target, null);

    // t = Tree(1u32); t.left = Tree(3u32); x = t.left.value
    let one = src.u32(1);
    let value = src.call_named("Tree", &[one]);
    src.assign_name(main, "t", value);
    let target = src.dot("t", "left");
    let three = src.u32(3);
    let value = src.call_named("Tree", &[three]);
    src.assign(main, target, value);
    let left = src.dot("t", "left");
    let member = src.name("value");
    let read = src.node(ExprKind::Dot, &[left, member]);
    src.assign_name(main, "x", read);

    src.bind().unwrap();

    let class_type = src.class_type(tree);
    let nullable = src.pool.set_nullable(class_type, true).unwrap();
    let class = src.program.template(tree).classes[0];
    let members = src.program.class(class).sub_block;
    assert_eq!(src.variable_type(members, "left"), Some(nullable));
    assert_eq!(src.variable_type(main, "x"), Some(TypeId::U32));
}

#[test]
fn operator_method_binds_addition_of_objects() {
    let mut src = Source::new();
    let main = src.main();

    // class Vec(self, x) { self.x = x; func +(self, other) { return self } }
    let (vec, body) = src.class("Vec", &["x"]);
    src.store_member(body, "x");
    let (plus, plus_body) = src.function(body, "+", FuncKind::Plain, &["self", "other"]);
    let this = src.name("self");
    src.statement(plus_body, StmtKind::Return, Some(this));

    // a = Vec(1u32); b = Vec(2u32); c = a + b
    let one = src.u32(1);
    let value = src.call_named("Vec", &[one]);
    src.assign_name(main, "a", value);
    let two = src.u32(2);
    let value = src.call_named("Vec", &[two]);
    src.assign_name(main, "b", value);
    let left = src.name("a");
    let right = src.name("b");
    let sum = src.node(ExprKind::Add, &[left, right]);
    src.assign_name(main, "c", sum);

    src.bind().unwrap();

    let vec_type = src.class_type(vec);
    assert_eq!(src.variable_type(main, "c"), Some(vec_type));
    assert_eq!(src.program.expr(sum).datatype, Some(vec_type));
    let signature = src.program.expr(sum).signature.unwrap();
    assert_eq!(src.program.signature(signature).function, plus);
}

#[test]
fn compound_assignment_uses_the_operator_method() {
    let mut src = Source::new();
    let main = src.main();

    // class Vec(self, x) { self.x = x; func +(self, other) { return self } }
    let (vec, body) = src.class("Vec", &["x"]);
    src.store_member(body, "x");
    let (plus, plus_body) = src.function(body, "+", FuncKind::Plain, &["self", "other"]);
    let this = src.name("self");
    src.statement(plus_body, StmtKind::Return, Some(this));

    // a = Vec(1u32); b = Vec(2u32); a += b
    let one = src.u32(1);
    let value = src.call_named("Vec", &[one]);
    src.assign_name(main, "a", value);
    let two = src.u32(2);
    let value = src.call_named("Vec", &[two]);
    src.assign_name(main, "b", value);
    let target = src.name("a");
    let other = src.name("b");
    let step = src.node(ExprKind::AddEquals, &[target, other]);
    src.statement(main, StmtKind::Assign, Some(step));

    src.bind().unwrap();

    let vec_type = src.class_type(vec);
    assert_eq!(src.program.expr(step).datatype, Some(vec_type));
    let signature = src.program.expr(step).signature.unwrap();
    assert_eq!(src.program.signature(signature).function, plus);
    assert_eq!(src.variable_type(main, "a"), Some(vec_type));
}

#[test]
fn loop_over_array_iterates_its_values() {
    let mut src = Source::new();
    let main = src.main();

    // for i = [1u32, 2u32, 3u32] { print i }
    let elements = [src.u32(1), src.u32(2), src.u32(3)];
    let array = src.node(ExprKind::Array, &elements);
    let target = src.name("i");
    let assignment = src.node(ExprKind::Equals, &[target, array]);
    let (statement, loop_body) =
        src.program
            .add_compound_statement(main, StmtKind::Foreach, Some(assignment), SPAN);
    let i = src.name("i");
    let args = src.node(ExprKind::List, &[i]);
    src.statement(loop_body, StmtKind::Print, Some(args));

    let report = src.bind().unwrap();

    assert_eq!(report.inlined_loops, 0);
    assert_eq!(src.variable_type(main, "i"), Some(TypeId::U32));
    let assignment = src.program.statement(statement).expr.unwrap();
    let source = src.program.expr(assignment).children[1];
    assert_eq!(src.program.expr(source).kind, ExprKind::Call);
}

#[test]
fn user_iterator_loop_is_inlined() {
    let mut src = Source::new();
    let main = src.main();

    // iterator count(limit) { n = 0u32; while n < limit { yield n; n += 1u32 } }
    let (_, body) = src.function(main, "count", FuncKind::Iterator, &["limit"]);
    let zero = src.u32(0);
    src.assign_name(body, "n", zero);
    let n = src.name("n");
    let limit = src.name("limit");
    let condition = src.node(ExprKind::Lt, &[n, limit]);
    let (_, while_body) =
        src.program
            .add_compound_statement(body, StmtKind::While, Some(condition), SPAN);
    let n = src.name("n");
    src.statement(while_body, StmtKind::Yield, Some(n));
    let n = src.name("n");
    let one = src.u32(1);
    let step = src.node(ExprKind::AddEquals, &[n, one]);
    src.statement(while_body, StmtKind::Assign, Some(step));

    // for j = count(3u32) { print j }
    let three = src.u32(3);
    let source = src.call_named("count", &[three]);
    let target = src.name("j");
    let assignment = src.node(ExprKind::Equals, &[target, source]);
    let (_, loop_body) =
        src.program
            .add_compound_statement(main, StmtKind::Foreach, Some(assignment), SPAN);
    let j = src.name("j");
    let args = src.node(ExprKind::List, &[j]);
    src.statement(loop_body, StmtKind::Print, Some(args));

    let report = src.bind().unwrap();

    assert_eq!(report.inlined_loops, 1);
    assert_eq!(src.variable_type(main, "j"), Some(TypeId::U32));
    let kinds: Vec<StmtKind> = src
        .program
        .block(main)
        .statements
        .iter()
        .map(|&statement| src.program.statement(statement).kind)
        .collect();
    assert!(!kinds.contains(&StmtKind::Foreach));
    assert!(kinds.contains(&StmtKind::While));
}
