//! Typed tree traversal.
//!
//! Every `visit_*` method defaults to walking into the node's children, so an implementation only overrides the
//! hooks it cares about and calls the matching `walk_*` function to keep descending.
//!
//! ## Examples
//! ```rust
//! use dash_syntax::cst::{Symbol, Visitor};
//!
//! #[derive(Default)]
//! struct Symbols(Vec<String>);
//!
//! impl<'ast> Visitor<'ast> for Symbols {
//!     fn visit_symbol(&mut self, symbol: &'ast Symbol) {
//!         self.0.push(symbol.name.clone());
//!     }
//! }
//!
//! let source = dash_syntax::parse("f(a, k: b)").source;
//! let mut symbols = Symbols::default();
//! symbols.visit_source(&source);
//! assert_eq!(symbols.0, ["f", "a", "b"]);
//! ```

use super::*;

pub trait Visitor<'ast> {
    fn visit_source(&mut self, source: &'ast Source) {
        walk_source(self, source);
    }

    fn visit_form(&mut self, form: &'ast Form) {
        walk_form(self, form);
    }

    fn visit_call(&mut self, call: &'ast Call) {
        walk_call(self, call);
    }

    fn visit_keyval(&mut self, keyval: &'ast KeyVal) {
        walk_keyval(self, keyval);
    }

    fn visit_infix(&mut self, infix: &'ast Infix) {
        walk_infix(self, infix);
    }

    fn visit_fun(&mut self, fun: &'ast Fun) {
        walk_fun(self, fun);
    }

    fn visit_type_decl(&mut self, decl: &'ast TypeDecl) {
        walk_type_decl(self, decl);
    }

    fn visit_type_expr(&mut self, ty: &'ast TypeExpr) {
        walk_type_expr(self, ty);
    }

    fn visit_list(&mut self, list: &'ast List) {
        for value in &list.values {
            self.visit_form(value);
        }
    }

    fn visit_record(&mut self, record: &'ast Record) {
        for kv in &record.key_values {
            self.visit_keyval(kv);
        }
    }

    fn visit_shell(&mut self, shell: &'ast Shell) {
        walk_shell(self, shell);
    }

    fn visit_shell_arg(&mut self, arg: &'ast ShellArg) {
        walk_shell_arg(self, arg);
    }

    fn visit_shell_var(&mut self, var: &'ast ShellVar) {
        match &var.target {
            ShellVarTarget::Symbol(s) => self.visit_symbol(s),
            ShellVarTarget::Form(f) => self.visit_form(f),
        }
    }

    fn visit_literal(&mut self, _literal: &'ast Literal) {}
    fn visit_string(&mut self, _string: &'ast StringLit) {}
    fn visit_quoted(&mut self, _quoted: &'ast Quoted) {}
    fn visit_symbol(&mut self, _symbol: &'ast Symbol) {}
    fn visit_keyword(&mut self, _keyword: &'ast Keyword) {}
    fn visit_path(&mut self, _path: &'ast PathLit) {}
    fn visit_error(&mut self, _error: &'ast ErrorNode) {}
}

pub fn walk_source<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, source: &'ast Source) {
    for form in &source.body {
        v.visit_form(form);
    }
}

pub fn walk_form<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, form: &'ast Form) {
    match form {
        Form::Call(n) => v.visit_call(n),
        Form::Infix(n) => v.visit_infix(n),
        Form::Fun(n) => v.visit_fun(n),
        Form::Type(n) => v.visit_type_decl(n),
        Form::Literal(n) => {
            v.visit_literal(n);
            match n {
                Literal::String(s) => v.visit_string(s),
                Literal::Quoted(q) => v.visit_quoted(q),
                _ => {}
            }
        }
        Form::Symbol(n) => v.visit_symbol(n),
        Form::List(n) => v.visit_list(n),
        Form::Record(n) => v.visit_record(n),
        Form::Path(n) => v.visit_path(n),
        Form::Error(n) => v.visit_error(n),
    }
}

pub fn walk_call<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, call: &'ast Call) {
    v.visit_symbol(&call.name);
    for arg in &call.args.anonymous {
        v.visit_form(arg);
    }
    for kv in &call.args.named {
        v.visit_keyval(kv);
    }
}

pub fn walk_keyval<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, keyval: &'ast KeyVal) {
    v.visit_keyword(&keyval.keyword);
    v.visit_form(&keyval.value);
}

pub fn walk_infix<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, infix: &'ast Infix) {
    v.visit_form(&infix.left);
    match &infix.right {
        InfixRhs::Form(f) => v.visit_form(f),
        InfixRhs::Shell(s) => v.visit_shell(s),
    }
}

pub fn walk_fun<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, fun: &'ast Fun) {
    if let Some(name) = &fun.name {
        v.visit_symbol(name);
    }
    if let Some(args) = &fun.arg_types {
        for kt in &args.named {
            v.visit_keyword(&kt.keyword);
            v.visit_type_expr(&kt.ty);
        }
    }
    if let Some(ret) = &fun.return_type {
        v.visit_type_expr(ret);
    }
    for form in &fun.body {
        v.visit_form(form);
    }
}

pub fn walk_type_decl<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, decl: &'ast TypeDecl) {
    if let Some(name) = &decl.name {
        v.visit_symbol(name);
    }
    for item in &decl.body {
        match item {
            FieldOrFun::Field(kv) => v.visit_keyval(kv),
            FieldOrFun::Fun(f) => v.visit_fun(f),
        }
    }
}

/// Type names are not visited as symbols.
pub fn walk_type_expr<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, ty: &'ast TypeExpr) {
    match ty {
        TypeExpr::Named(_) => {}
        TypeExpr::List(l) => v.visit_type_expr(&l.inner),
        TypeExpr::Fun(f) => {
            v.visit_type_expr(&f.param);
            v.visit_type_expr(&f.ret);
        }
    }
}

pub fn walk_shell<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, shell: &'ast Shell) {
    v.visit_shell_arg(&shell.command);
    for arg in &shell.arguments {
        v.visit_shell_arg(arg);
    }
}

pub fn walk_shell_arg<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, arg: &'ast ShellArg) {
    match arg {
        ShellArg::Call(c) => v.visit_call(c),
        ShellArg::Quoted(q) => v.visit_quoted(q),
        ShellArg::String(s) => v.visit_string(s),
        ShellArg::Path(p) => v.visit_path(p),
        ShellArg::Text(t) => {
            for part in &t.parts {
                if let TextPart::Var(var) = part {
                    v.visit_shell_var(var);
                }
            }
        }
        ShellArg::Var(var) => v.visit_shell_var(var),
        ShellArg::Error(e) => v.visit_error(e),
    }
}
